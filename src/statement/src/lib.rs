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

//! Statements for statement-based list APIs.
//!
//! The Ad Manager list methods (`get*ByStatement()`) and the report service
//! receive a [Statement]: a SQL-like filter, an ordering, a paging window, and
//! a set of bind variables. This crate provides the immutable [Statement] value
//! and the mutable [StatementBuilder] used to produce it.
//!
//! # Example
//! ```
//! # use ads_statement::*;
//! let mut builder = StatementBuilder::new()
//!     .with_where("status = :status")
//!     .with_order_by("id ASC")
//!     .with_limit(SUGGESTED_PAGE_LIMIT)?
//!     .add_value("status", "ACTIVE");
//! let first = builder.build();
//! builder.increase_offset_by(SUGGESTED_PAGE_LIMIT);
//! let second = builder.build();
//! assert_eq!(first.offset(), None);
//! assert_eq!(second.offset(), Some(500));
//! assert_eq!(
//!     second.query(),
//!     "WHERE status = :status ORDER BY id ASC LIMIT 500 OFFSET 500"
//! );
//! # Ok::<(), Error>(())
//! ```

mod builder;
mod error;
mod statement;
mod value;

pub use builder::StatementBuilder;
pub use error::Error;
pub use statement::Statement;
pub use value::Value;

/// An alias of [std::result::Result] where the error is always [Error].
pub type Result<T> = std::result::Result<T, Error>;

/// The page size recommended by the service.
///
/// This is also the largest page the service returns, [StatementBuilder] uses
/// it as the default maximum page size.
pub const SUGGESTED_PAGE_LIMIT: u32 = 500;
