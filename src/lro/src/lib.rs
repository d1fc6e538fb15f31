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

//! Types and functions to poll report jobs and other long-running jobs.
//!
//! Some operations in the Ads APIs start a job on the server and return
//! immediately. The application then queries the status of the job until it
//! completes or fails. The [Poller] trait captures that loop, and
//! [new_poller] creates a poller from two closures: one to start the job and
//! one to query its status.
//!
//! Every polling loop is bounded, the limit is a required parameter of
//! [PollingOptions].
//!
//! # Example
//! ```
//! # use ads_lro::*;
//! # use gax::options::{PollingLimit, PollingOptions};
//! # use std::time::Duration;
//! #[derive(Debug)]
//! struct ReportJob { id: String, status: JobStatus }
//! impl JobOperation for ReportJob {
//!     fn job_id(&self) -> Option<&str> { Some(&self.id) }
//!     fn status(&self) -> JobStatus { self.status }
//! }
//!
//! # tokio::runtime::Builder::new_current_thread().enable_time().start_paused(true).build().unwrap().block_on(async {
//! let options = PollingOptions::new(PollingLimit::Attempts(10));
//! let start = || async { Ok(ReportJob { id: "123".into(), status: JobStatus::InProgress }) };
//! let query = |id: String| async move { Ok(ReportJob { id, status: JobStatus::Completed }) };
//! let job = new_poller(&options, start, query).until_done().await?;
//! assert_eq!(job.status(), JobStatus::Completed);
//! # gax::Result::<()>::Ok(()) }).unwrap();
//! ```
//!
//! [PollingOptions]: gax::options::PollingOptions

use gax::Result;
use gax::error::Error;
use std::future::Future;

mod job;
mod poller;

pub use job::{JobOperation, JobStatus};
pub use poller::new_poller;

/// The result of polling a job.
///
/// # Parameters
/// * `O` - the job type, as returned by the start and query operations.
#[derive(Debug)]
pub enum PollingResult<O> {
    /// The job is still running. This includes the last job snapshot.
    InProgress(O),
    /// The polling loop is done.
    ///
    /// On success the job reached a terminal status, which may be
    /// [JobStatus::Failed]. Applications must inspect the status. On error the
    /// job could not be started, could not be queried, or the polling loop
    /// reached its limit.
    Completed(Result<O>),
    /// An error trying to query the job.
    ///
    /// The polling error policy decided the error may not repeat. The loop
    /// continues on the next call to [Poller::poll].
    PollingError(Error),
}

/// The trait implemented by job pollers.
///
/// # Parameters
/// * `O` - the job type.
pub trait Poller<O>: Send + sealed::Poller {
    /// Starts the job, or queries its status if already started.
    ///
    /// Returns `None` once a [PollingResult::Completed] was returned.
    fn poll(&mut self) -> impl Future<Output = Option<PollingResult<O>>> + Send;

    /// Polls the job until it reaches a terminal status, waiting between
    /// polls as configured by the backoff policy.
    fn until_done(self) -> impl Future<Output = Result<O>> + Send;

    /// Converts the poller into a [futures::Stream] of polling results.
    fn into_stream(self) -> impl futures::Stream<Item = PollingResult<O>> + Unpin;
}

mod sealed {
    pub trait Poller {}
}
