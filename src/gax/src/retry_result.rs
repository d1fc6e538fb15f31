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

//! The decision made by a polling error policy.
//!
//! Only applications implementing their own
//! [PollingErrorPolicy][crate::polling_error_policy::PollingErrorPolicy]
//! need these types.

use crate::error::Error;

/// What a polling loop does after an error querying the job.
#[derive(Debug)]
pub enum RetryResult {
    /// Stop polling, the error will not go away by itself.
    Permanent(Error),

    /// Stop polling, the error may go away but the loop reached its limit.
    Exhausted(Error),

    /// Keep polling.
    Continue(Error),
}

impl RetryResult {
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::Permanent(_))
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted(_))
    }

    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue(_))
    }

    /// The error that triggered the decision.
    pub fn into_error(self) -> Error {
        match self {
            Self::Permanent(e) | Self::Exhausted(e) | Self::Continue(e) => e,
        }
    }
}
