// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The state of a polling loop, as seen by the polling policies.

use std::time::Instant;

/// The current state of a polling loop.
///
/// Polling policies receive this state to decide if the loop should continue,
/// and how long to wait before the next attempt.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct PollingState {
    /// When the polling loop started.
    pub loop_start: Instant,
    /// The number of requests made so far. The request that submits the job
    /// is attempt 1, each status query adds one.
    pub attempt_count: u32,
}

impl PollingState {
    /// Creates a state for a loop starting at `loop_start`.
    pub fn new(loop_start: Instant) -> Self {
        Self {
            loop_start,
            attempt_count: 0,
        }
    }

    /// Sets the value for [attempt_count][PollingState::attempt_count].
    pub fn with_attempt_count(mut self, v: u32) -> Self {
        self.attempt_count = v;
        self
    }
}

impl Default for PollingState {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}
