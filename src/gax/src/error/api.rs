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

use serde::{Deserialize, Serialize};

/// The fault returned by the services when a request fails.
///
/// The exception contains a developer-facing message and one [ApiError] for
/// each problem found while processing the request.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct ApiException {
    /// A developer-facing error message, in English.
    pub message: String,

    /// The individual problems found in the request.
    pub errors: Vec<ApiError>,
}

impl ApiException {
    /// Creates an empty exception.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value for [message][ApiException::message].
    pub fn set_message<T: Into<String>>(mut self, v: T) -> Self {
        self.message = v.into();
        self
    }

    /// Sets the value for [errors][ApiException::errors].
    pub fn set_errors<T, I>(mut self, v: T) -> Self
    where
        T: IntoIterator<Item = I>,
        I: Into<ApiError>,
    {
        self.errors = v.into_iter().map(|v| v.into()).collect();
        self
    }

    /// Returns true if the request may succeed if attempted again.
    ///
    /// That is only the case when every error in the exception is transient.
    pub fn is_transient(&self) -> bool {
        !self.errors.is_empty() && self.errors.iter().all(ApiError::is_transient)
    }
}

/// One problem found while processing a request.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct ApiError {
    /// The error type and reason, for example `NotNullError.ARG1_NULL`.
    pub error_string: String,

    /// The path to the field that caused the error, if any.
    pub field_path: String,

    /// The value that caused the error, if any.
    pub trigger: String,
}

/// The error types that may resolve on a future attempt.
const TRANSIENT_ERROR_TYPES: [&str; 3] = ["ServerError", "QuotaError", "InternalApiError"];

impl ApiError {
    /// Creates an empty error.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value for [error_string][ApiError::error_string].
    pub fn set_error_string<T: Into<String>>(mut self, v: T) -> Self {
        self.error_string = v.into();
        self
    }

    /// Sets the value for [field_path][ApiError::field_path].
    pub fn set_field_path<T: Into<String>>(mut self, v: T) -> Self {
        self.field_path = v.into();
        self
    }

    /// Sets the value for [trigger][ApiError::trigger].
    pub fn set_trigger<T: Into<String>>(mut self, v: T) -> Self {
        self.trigger = v.into();
        self
    }

    /// The error type, the portion of `error_string` before the first `.`.
    pub fn error_type(&self) -> &str {
        self.error_string
            .split_once('.')
            .map(|(t, _)| t)
            .unwrap_or(self.error_string.as_str())
    }

    /// The error reason, the portion of `error_string` after the first `.`.
    pub fn reason(&self) -> &str {
        self.error_string
            .split_once('.')
            .map(|(_, r)| r)
            .unwrap_or_default()
    }

    /// Server errors, quota errors, and internal errors are transient.
    pub fn is_transient(&self) -> bool {
        TRANSIENT_ERROR_TYPES.contains(&self.error_type())
    }
}

impl From<&str> for ApiError {
    fn from(value: &str) -> Self {
        Self::new().set_error_string(value)
    }
}

impl std::fmt::Display for ApiException {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let errors = self
            .errors
            .iter()
            .map(|e| e.error_string.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{} [{errors}]", self.message)
    }
}
