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

//! A [Poller] implementation based on closures.

use crate::{JobOperation, Poller, PollingResult};
use gax::Result;
use gax::error::Error;
use gax::options::PollingOptions;
use gax::polling_backoff_policy::PollingBackoffPolicy;
use gax::polling_error_policy::PollingErrorPolicy;
use gax::polling_state::PollingState;
use gax::retry_result::RetryResult;
use std::future::Future;
use std::sync::Arc;

/// Creates a poller for a job.
///
/// # Parameters
/// * `options` - the polling limit and policies.
/// * `start` - starts the job. Errors starting the job are never retried.
/// * `query` - queries the job status. It receives the id of the job returned
///   by `start`.
pub fn new_poller<O, S, SF, Q, QF>(
    options: &PollingOptions,
    start: S,
    query: Q,
) -> impl Poller<O> + use<O, S, SF, Q, QF>
where
    O: JobOperation + Send,
    S: FnOnce() -> SF + Send,
    SF: Future<Output = Result<O>> + Send,
    Q: FnMut(String) -> QF + Send,
    QF: Future<Output = Result<O>> + Send,
{
    JobPoller::new(
        options.polling_error_policy(),
        options.polling_backoff_policy(),
        start,
        query,
    )
}

struct JobPoller<S, Q> {
    error_policy: Arc<dyn PollingErrorPolicy>,
    backoff_policy: Arc<dyn PollingBackoffPolicy>,
    start: Option<S>,
    query: Q,
    job_id: Option<String>,
    state: PollingState,
}

impl<S, Q> JobPoller<S, Q> {
    fn new(
        error_policy: Arc<dyn PollingErrorPolicy>,
        backoff_policy: Arc<dyn PollingBackoffPolicy>,
        start: S,
        query: Q,
    ) -> Self {
        Self {
            error_policy,
            backoff_policy,
            start: Some(start),
            query,
            job_id: None,
            state: PollingState::default(),
        }
    }
}

impl<S, Q> crate::sealed::Poller for JobPoller<S, Q> {}

impl<O, S, SF, Q, QF> Poller<O> for JobPoller<S, Q>
where
    O: JobOperation + Send,
    S: FnOnce() -> SF + Send,
    SF: Future<Output = Result<O>> + Send,
    Q: FnMut(String) -> QF + Send,
    QF: Future<Output = Result<O>> + Send,
{
    async fn poll(&mut self) -> Option<PollingResult<O>> {
        if let Some(start) = self.start.take() {
            self.state = PollingState::default().with_attempt_count(1);
            let result = start().await;
            let (id, poll) = handle_start(self.error_policy.as_ref(), &self.state, result);
            self.job_id = id;
            return Some(poll);
        }
        if let Some(id) = self.job_id.take() {
            self.state.attempt_count += 1;
            let result = (self.query)(id.clone()).await;
            let (id, poll) = handle_poll(self.error_policy.as_ref(), &self.state, id, result);
            self.job_id = id;
            return Some(poll);
        }
        None
    }

    async fn until_done(mut self) -> Result<O> {
        while let Some(p) = self.poll().await {
            match p {
                // The job reached a terminal status, or the loop stopped.
                PollingResult::Completed(r) => return r,
                PollingResult::InProgress(_) => (),
                // The polling error policy decided the error is recoverable.
                PollingResult::PollingError(_) => (),
            }
            tokio::time::sleep(self.backoff_policy.wait_period(&self.state)).await;
        }
        // `poll()` only returns `None` after returning `Completed`, which exits
        // the loop above.
        unreachable!("loop should exit via the `Completed` branch vs. this line");
    }

    fn into_stream(self) -> impl futures::Stream<Item = PollingResult<O>> + Unpin {
        use futures::stream::unfold;
        Box::pin(unfold(Some(self), move |state| async move {
            if let Some(mut poller) = state {
                if let Some(pr) = poller.poll().await {
                    return Some((pr, Some(poller)));
                }
            };
            None
        }))
    }
}

fn handle_start<O>(
    error_policy: &dyn PollingErrorPolicy,
    state: &PollingState,
    result: Result<O>,
) -> (Option<String>, PollingResult<O>)
where
    O: JobOperation,
{
    match result {
        Err(e) => {
            tracing::debug!("cannot start job: {e}");
            (None, PollingResult::Completed(Err(e)))
        }
        Ok(job) => handle_job(error_policy, state, job),
    }
}

fn handle_poll<O>(
    error_policy: &dyn PollingErrorPolicy,
    state: &PollingState,
    job_id: String,
    result: Result<O>,
) -> (Option<String>, PollingResult<O>)
where
    O: JobOperation,
{
    match result {
        Err(e) => {
            tracing::debug!(
                job_id = %job_id,
                attempt = state.attempt_count,
                "error querying job: {e}"
            );
            handle_polling_error(error_policy.on_error(state, e), job_id)
        }
        Ok(job) => handle_job(error_policy, state, job),
    }
}

fn handle_polling_error<O>(result: RetryResult, job_id: String) -> (Option<String>, PollingResult<O>) {
    match result {
        RetryResult::Continue(e) => (Some(job_id), PollingResult::PollingError(e)),
        RetryResult::Exhausted(e) | RetryResult::Permanent(e) => {
            (None, PollingResult::Completed(Err(e)))
        }
    }
}

fn handle_job<O>(
    error_policy: &dyn PollingErrorPolicy,
    state: &PollingState,
    job: O,
) -> (Option<String>, PollingResult<O>)
where
    O: JobOperation,
{
    let status = job.status();
    tracing::debug!(
        job_id = job.job_id(),
        attempt = state.attempt_count,
        %status,
        "polled job"
    );
    if status.is_terminal() {
        return (None, PollingResult::Completed(Ok(job)));
    }
    let Some(id) = job.job_id().map(str::to_string) else {
        return (
            None,
            PollingResult::Completed(Err(Error::other(format!(
                "the job is {status} but has no id to query its status"
            )))),
        );
    };
    match error_policy.on_in_progress(state, &id) {
        Ok(()) => (Some(id), PollingResult::InProgress(job)),
        Err(e) => (None, PollingResult::Completed(Err(e))),
    }
}
