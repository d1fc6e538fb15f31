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

//! Polling error policies decide whether a polling loop continues after an
//! error, and when a loop over a job that is still running must stop.
//!
//! Report jobs and similar long-running jobs are polled until they finish.
//! Querying the job may fail with transient errors, such as quota errors, and
//! the job may never finish. Every polling loop uses a policy bounded by a
//! number of attempts or an elapsed time.
//!
//! # Example
//! ```
//! # use ads_gax::polling_error_policy::*;
//! use std::time::Duration;
//! // Stop after 15 minutes or 50 attempts, whichever comes first.
//! let policy = TransientErrors
//!     .with_time_limit(Duration::from_secs(15 * 60))
//!     .with_attempt_limit(50);
//! ```

use crate::Result;
use crate::error::Error;
use crate::polling_state::PollingState;
use crate::retry_result::RetryResult;
use std::sync::Arc;
use std::time::Duration;

/// Controls a polling loop.
pub trait PollingErrorPolicy: Send + Sync + std::fmt::Debug {
    /// Decides if the loop continues after `error`.
    ///
    /// `state` describes the loop, including the failed attempt.
    fn on_error(&self, state: &PollingState, error: Error) -> RetryResult;

    /// Called each time the job is still running.
    ///
    /// Returns an error to stop the loop, typically because it reached its
    /// limit. The error is returned to the application.
    fn on_in_progress(&self, _state: &PollingState, _job_id: &str) -> Result<()> {
        Ok(())
    }
}

/// Converts policies, or shared policies, for
/// [PollingOptions][crate::options::PollingOptions].
#[derive(Clone)]
pub struct PollingErrorPolicyArg(pub(crate) Arc<dyn PollingErrorPolicy>);

impl<T> From<T> for PollingErrorPolicyArg
where
    T: PollingErrorPolicy + 'static,
{
    fn from(value: T) -> Self {
        Self(Arc::new(value))
    }
}

impl From<Arc<dyn PollingErrorPolicy>> for PollingErrorPolicyArg {
    fn from(value: Arc<dyn PollingErrorPolicy>) -> Self {
        Self(value)
    }
}

/// Adds limits to any [PollingErrorPolicy].
pub trait PollingErrorPolicyExt: PollingErrorPolicy + Sized {
    /// Stops the loop once `maximum_duration` elapsed since it started.
    ///
    /// Before the limit, the inner policy decides. After the limit,
    /// [Continue][RetryResult::Continue] becomes
    /// [Exhausted][RetryResult::Exhausted], and a job still in progress stops
    /// the loop with an [exhausted][Error::is_exhausted] error.
    ///
    /// # Example
    /// ```
    /// # use ads_gax::*;
    /// # use ads_gax::polling_error_policy::*;
    /// # use ads_gax::polling_state::PollingState;
    /// use std::time::{Duration, Instant};
    /// let policy = TransientErrors.with_time_limit(Duration::from_secs(10));
    /// let state = PollingState::new(Instant::now() - Duration::from_secs(20));
    /// assert!(policy.on_error(&state, error::Error::io("transient")).is_exhausted());
    /// assert!(policy.on_in_progress(&state, "report-1").is_err());
    /// ```
    fn with_time_limit(self, maximum_duration: Duration) -> LimitedElapsedTime<Self> {
        LimitedElapsedTime::custom(self, maximum_duration)
    }

    /// Stops the loop once it made `maximum_attempts` requests.
    ///
    /// The request that starts the job counts as the first attempt.
    ///
    /// # Example
    /// ```
    /// # use ads_gax::*;
    /// # use ads_gax::polling_error_policy::*;
    /// # use ads_gax::polling_state::PollingState;
    /// let policy = TransientErrors.with_attempt_limit(3);
    /// let second = PollingState::default().with_attempt_count(2);
    /// let third = PollingState::default().with_attempt_count(3);
    /// assert!(policy.on_error(&second, error::Error::io("transient")).is_continue());
    /// assert!(policy.on_error(&third, error::Error::io("transient")).is_exhausted());
    /// assert!(policy.on_in_progress(&second, "report-1").is_ok());
    /// assert!(policy.on_in_progress(&third, "report-1").is_err());
    /// ```
    fn with_attempt_limit(self, maximum_attempts: u32) -> LimitedAttemptCount<Self> {
        LimitedAttemptCount::custom(self, maximum_attempts)
    }
}

impl<T: PollingErrorPolicy> PollingErrorPolicyExt for T {}

/// Continues on transient errors only.
///
/// I/O errors, timeouts, and service errors with only server, quota, or
/// internal [ApiErrors][crate::error::api::ApiError] are transient.
///
/// This policy has no limit, use it with
/// [PollingErrorPolicyExt] or [PollingOptions][crate::options::PollingOptions].
#[derive(Clone, Debug)]
pub struct TransientErrors;

impl PollingErrorPolicy for TransientErrors {
    fn on_error(&self, _state: &PollingState, error: Error) -> RetryResult {
        match error.is_transient() {
            true => RetryResult::Continue(error),
            false => RetryResult::Permanent(error),
        }
    }
}

/// Continues on any error.
///
/// This policy has no limit, use it with
/// [PollingErrorPolicyExt] or [PollingOptions][crate::options::PollingOptions].
#[derive(Clone, Debug)]
pub struct AlwaysContinue;

impl PollingErrorPolicy for AlwaysContinue {
    fn on_error(&self, _state: &PollingState, error: Error) -> RetryResult {
        RetryResult::Continue(error)
    }
}

/// Limits the time spent in a polling loop, including the time between
/// attempts.
///
/// # Parameters
/// * `P` - the inner policy, [TransientErrors] by default.
#[derive(Debug)]
pub struct LimitedElapsedTime<P = TransientErrors>
where
    P: PollingErrorPolicy,
{
    inner: P,
    maximum_duration: Duration,
}

impl LimitedElapsedTime {
    pub fn new(maximum_duration: Duration) -> Self {
        Self::custom(TransientErrors, maximum_duration)
    }
}

impl<P> LimitedElapsedTime<P>
where
    P: PollingErrorPolicy,
{
    pub fn custom(inner: P, maximum_duration: Duration) -> Self {
        Self {
            inner,
            maximum_duration,
        }
    }

    pub fn maximum_duration(&self) -> Duration {
        self.maximum_duration
    }
}

impl<P> PollingErrorPolicy for LimitedElapsedTime<P>
where
    P: PollingErrorPolicy + 'static,
{
    fn on_error(&self, state: &PollingState, error: Error) -> RetryResult {
        let reached = state.loop_start.elapsed() >= self.maximum_duration;
        limit_continue(self.inner.on_error(state, error), reached)
    }

    fn on_in_progress(&self, state: &PollingState, job_id: &str) -> Result<()> {
        self.inner.on_in_progress(state, job_id)?;
        let elapsed = state.loop_start.elapsed();
        if elapsed < self.maximum_duration {
            return Ok(());
        }
        Err(Error::exhausted(Exhausted::new(
            job_id,
            "elapsed time",
            format!("{elapsed:?}"),
            format!("{:?}", self.maximum_duration),
        )))
    }
}

/// Limits the number of requests in a polling loop.
///
/// # Parameters
/// * `P` - the inner policy, [TransientErrors] by default.
#[derive(Debug)]
pub struct LimitedAttemptCount<P = TransientErrors>
where
    P: PollingErrorPolicy,
{
    inner: P,
    maximum_attempts: u32,
}

impl LimitedAttemptCount {
    pub fn new(maximum_attempts: u32) -> Self {
        Self::custom(TransientErrors, maximum_attempts)
    }
}

impl<P> LimitedAttemptCount<P>
where
    P: PollingErrorPolicy,
{
    pub fn custom(inner: P, maximum_attempts: u32) -> Self {
        Self {
            inner,
            maximum_attempts,
        }
    }

    pub fn maximum_attempts(&self) -> u32 {
        self.maximum_attempts
    }
}

impl<P> PollingErrorPolicy for LimitedAttemptCount<P>
where
    P: PollingErrorPolicy,
{
    fn on_error(&self, state: &PollingState, error: Error) -> RetryResult {
        let reached = state.attempt_count >= self.maximum_attempts;
        limit_continue(self.inner.on_error(state, error), reached)
    }

    fn on_in_progress(&self, state: &PollingState, job_id: &str) -> Result<()> {
        self.inner.on_in_progress(state, job_id)?;
        if state.attempt_count < self.maximum_attempts {
            return Ok(());
        }
        Err(Error::exhausted(Exhausted::new(
            job_id,
            "attempt count",
            state.attempt_count.to_string(),
            self.maximum_attempts.to_string(),
        )))
    }
}

/// Turns `Continue` into `Exhausted` once a limit is reached.
fn limit_continue(result: RetryResult, reached: bool) -> RetryResult {
    match result {
        RetryResult::Continue(e) if reached => RetryResult::Exhausted(e),
        r => r,
    }
}

/// The error returned when a polling loop reaches its limit while the job is
/// still in progress.
#[derive(thiserror::Error, Debug)]
#[error("stopped polling job {job_id} after reaching the {limit_name} limit ({value} >= {limit})")]
pub struct Exhausted {
    job_id: String,
    limit_name: &'static str,
    value: String,
    limit: String,
}

impl Exhausted {
    pub fn new(job_id: &str, limit_name: &'static str, value: String, limit: String) -> Self {
        Self {
            job_id: job_id.to_string(),
            limit_name,
            value,
            limit,
        }
    }

    /// The id of the job that was still in progress.
    pub fn job_id(&self) -> &str {
        &self.job_id
    }
}
