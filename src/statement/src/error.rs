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

/// The error type for statement construction and validation.
///
/// All these errors are detected locally, before any request is sent to the
/// service.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error("the limit ({limit}) should be between 1 and the maximum page size ({maximum})")]
    InvalidLimit { limit: u32, maximum: u32 },
    #[error("the maximum page size ({0}) should be greater than zero")]
    InvalidMaximumPageSize(u32),
    #[error("the placeholder `:{0}` does not have a bound value")]
    UnboundVariable(String),
}

impl Error {
    /// All statement errors are caused by invalid arguments.
    ///
    /// They never resolve on their own, repeating the operation with the same
    /// inputs fails again.
    pub fn is_invalid_argument(&self) -> bool {
        match self {
            Self::InvalidLimit { .. } | Self::InvalidMaximumPageSize(_) | Self::UnboundVariable(_) => {
                true
            }
        }
    }
}
