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

//! Polling loop configuration.
//!
//! Every polling loop has an explicit upper bound, either a number of polls or
//! a total elapsed time. Applications pick the bound when creating the
//! [PollingOptions]; there is no unbounded default.
//!
//! # Example
//! ```
//! # use ads_gax::options::*;
//! # use ads_gax::polling_backoff_policy::FixedDelay;
//! use std::time::Duration;
//! let options = PollingOptions::new(PollingLimit::Elapsed(Duration::from_secs(30 * 60)))
//!     .with_polling_backoff_policy(FixedDelay::new(Duration::from_secs(10)));
//! assert_eq!(options.limit(), &PollingLimit::Elapsed(Duration::from_secs(30 * 60)));
//! ```

use crate::error::Error;
use crate::polling_backoff_policy::{FixedDelay, PollingBackoffPolicy, PollingBackoffPolicyArg};
use crate::polling_error_policy::{
    LimitedAttemptCount, LimitedElapsedTime, PollingErrorPolicy, PollingErrorPolicyArg,
    TransientErrors,
};
use crate::polling_state::PollingState;
use crate::retry_result::RetryResult;
use std::sync::Arc;
use std::time::Duration;

/// The upper bound of a polling loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollingLimit {
    /// Stop after this many polls, counting the request that starts the job.
    Attempts(u32),
    /// Stop once this much time has elapsed since the job was started.
    Elapsed(Duration),
}

/// Configures a polling loop.
#[derive(Clone, Debug)]
pub struct PollingOptions {
    limit: PollingLimit,
    polling_error_policy: Option<Arc<dyn PollingErrorPolicy>>,
    polling_backoff_policy: Option<Arc<dyn PollingBackoffPolicy>>,
}

impl PollingOptions {
    /// Creates options with the given limit and the default policies.
    ///
    /// The default error policy is [TransientErrors]; the default backoff
    /// policy is [FixedDelay::default].
    pub fn new(limit: PollingLimit) -> Self {
        Self {
            limit,
            polling_error_policy: None,
            polling_backoff_policy: None,
        }
    }

    pub fn limit(&self) -> &PollingLimit {
        &self.limit
    }

    /// Overrides the policy deciding which polling errors are transient.
    ///
    /// The limit is always applied on top of this policy.
    pub fn with_polling_error_policy<V: Into<PollingErrorPolicyArg>>(mut self, v: V) -> Self {
        self.polling_error_policy = Some(v.into().0);
        self
    }

    /// Overrides the backoff policy.
    pub fn with_polling_backoff_policy<V: Into<PollingBackoffPolicyArg>>(mut self, v: V) -> Self {
        self.polling_backoff_policy = Some(v.into().0);
        self
    }

    /// Returns the effective polling error policy, bounded by the limit.
    pub fn polling_error_policy(&self) -> Arc<dyn PollingErrorPolicy> {
        let inner = Shared(
            self.polling_error_policy
                .clone()
                .unwrap_or_else(|| Arc::new(TransientErrors)),
        );
        match self.limit {
            PollingLimit::Attempts(n) => Arc::new(LimitedAttemptCount::custom(inner, n)),
            PollingLimit::Elapsed(d) => Arc::new(LimitedElapsedTime::custom(inner, d)),
        }
    }

    /// Returns the effective polling backoff policy.
    pub fn polling_backoff_policy(&self) -> Arc<dyn PollingBackoffPolicy> {
        self.polling_backoff_policy
            .clone()
            .unwrap_or_else(|| Arc::new(FixedDelay::default()))
    }
}

#[derive(Debug)]
struct Shared(Arc<dyn PollingErrorPolicy>);

impl PollingErrorPolicy for Shared {
    fn on_error(&self, state: &PollingState, error: Error) -> RetryResult {
        self.0.on_error(state, error)
    }

    fn on_in_progress(&self, state: &PollingState, job_id: &str) -> crate::Result<()> {
        self.0.on_in_progress(state, job_id)
    }
}
