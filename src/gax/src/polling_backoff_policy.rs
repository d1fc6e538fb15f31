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

//! Defines the trait for polling backoff policies and common implementations.
//!
//! Report jobs and other long-running jobs are polled until they reach a
//! terminal status. Between polls the loop waits for the period returned by a
//! [PollingBackoffPolicy].
//!
//! The historical behavior of the report examples is a fixed delay of 30
//! seconds between polls, which is what [FixedDelay::default] returns. Jobs
//! with a wide range of expected durations may prefer truncated exponential
//! backoff, see [ExponentialBackoff][crate::exponential_backoff::ExponentialBackoff].
//! Polling backoff policies do not use jitter.
//!
//! # Example
//! ```
//! # use ads_gax::polling_backoff_policy::*;
//! # use ads_gax::polling_state::PollingState;
//! use std::time::Duration;
//!
//! let policy = FixedDelay::new(Duration::from_secs(10));
//! assert_eq!(policy.wait_period(&PollingState::default()), Duration::from_secs(10));
//! ```

use crate::polling_state::PollingState;
use std::sync::Arc;
use std::time::Duration;

/// Defines the trait implemented by all polling backoff strategies.
pub trait PollingBackoffPolicy: Send + Sync + std::fmt::Debug {
    /// Returns the time to wait before the next poll.
    ///
    /// # Parameters
    /// * `state` - the state of the polling loop. This method is always called
    ///   after the first attempt, so `state.attempt_count >= 1`.
    fn wait_period(&self, state: &PollingState) -> Duration;
}

/// A helper type to use [PollingBackoffPolicy] in polling options.
#[derive(Clone)]
pub struct PollingBackoffPolicyArg(pub(crate) Arc<dyn PollingBackoffPolicy>);

impl<T: PollingBackoffPolicy + 'static> std::convert::From<T> for PollingBackoffPolicyArg {
    fn from(value: T) -> Self {
        Self(Arc::new(value))
    }
}

impl std::convert::From<Arc<dyn PollingBackoffPolicy>> for PollingBackoffPolicyArg {
    fn from(value: Arc<dyn PollingBackoffPolicy>) -> Self {
        Self(value)
    }
}

/// Waits the same period between every poll.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    /// The delay used by [FixedDelay::default].
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(30);

    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

impl PollingBackoffPolicy for FixedDelay {
    fn wait_period(&self, _state: &PollingState) -> Duration {
        self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exponential_backoff::ExponentialBackoff;
    use test_case::test_case;

    // Verify `PollingBackoffPolicyArg` can be converted from the desired types.
    #[test]
    fn backoff_policy_arg() {
        let policy = ExponentialBackoff::default();
        let _ = PollingBackoffPolicyArg::from(policy);
        let _ = PollingBackoffPolicyArg::from(FixedDelay::default());

        let policy: Arc<dyn PollingBackoffPolicy> = Arc::new(FixedDelay::default());
        let _ = PollingBackoffPolicyArg::from(policy);
    }

    #[test]
    fn fixed_delay_default() {
        let policy = FixedDelay::default();
        assert_eq!(policy.delay(), Duration::from_secs(30));
    }

    #[test_case(1)]
    #[test_case(2)]
    #[test_case(100)]
    fn fixed_delay_ignores_attempts(attempt_count: u32) {
        let policy = FixedDelay::new(Duration::from_millis(250));
        let state = PollingState::default().with_attempt_count(attempt_count);
        assert_eq!(policy.wait_period(&state), Duration::from_millis(250));
    }
}
