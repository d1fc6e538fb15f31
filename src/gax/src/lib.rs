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

//! Ads API helpers.
//!
//! This crate contains the types and functions shared by the paging and
//! polling helpers for the statement-based Ads APIs:
//!
//! - [paginator] drives a list operation through every page of a result set.
//! - [accumulator] collects values across all the pages of a session.
//! - [error] defines the error type returned by all the helpers.
//! - [polling_error_policy], [polling_backoff_policy], and [options] configure
//!   the polling loops used for long-running jobs, such as report jobs.
//!
//! None of the types in this crate perform remote calls. The remote calls are
//! injected by the application, typically as closures wrapping an SDK client.

/// An alias of [std::result::Result] where the error is always [crate::error::Error].
///
/// This is the result type used by all functions wrapping remote calls.
pub type Result<T> = std::result::Result<T, crate::error::Error>;

/// The core error types used by the helpers.
pub mod error;

/// Defines types to iterate over statement-based list operations.
pub mod paginator;

pub mod accumulator;

pub mod options;

pub mod exponential_backoff;
pub mod polling_backoff_policy;
pub mod polling_error_policy;
pub mod polling_state;
pub mod retry_result;
