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

use crate::{Error, Result, SUGGESTED_PAGE_LIMIT, Statement, Value};

/// Accumulates the state of a [Statement].
///
/// The builder owns the filter, ordering, bind variables, and paging window.
/// Use the `with_*()` functions to initialize a builder, the `set_*()`
/// functions to change an existing builder, and [build()][Self::build] to
/// create a snapshot.
///
/// # Example
/// ```
/// # use ads_statement::*;
/// let mut builder = StatementBuilder::new()
///     .with_where("lineItemId = :lineItemId")
///     .with_order_by("lineItemId ASC, creativeId ASC")
///     .with_limit(SUGGESTED_PAGE_LIMIT)?
///     .add_value("lineItemId", 123456_i64);
/// builder.increase_offset_by(SUGGESTED_PAGE_LIMIT);
/// assert_eq!(builder.build().offset(), Some(SUGGESTED_PAGE_LIMIT));
/// builder.remove_limit_and_offset();
/// assert_eq!(builder.build().limit(), None);
/// assert_eq!(builder.build().offset(), None);
/// # Ok::<(), Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct StatementBuilder {
    statement: Statement,
    max_page_size: u32,
}

impl StatementBuilder {
    /// Creates an empty builder, using [SUGGESTED_PAGE_LIMIT] as the maximum
    /// page size.
    pub fn new() -> Self {
        Self {
            statement: Statement::default(),
            max_page_size: SUGGESTED_PAGE_LIMIT,
        }
    }

    /// Changes the maximum page size accepted by [set_limit][Self::set_limit].
    ///
    /// Services advertise the largest page they return. Set this value if the
    /// service differs from [SUGGESTED_PAGE_LIMIT].
    pub fn with_max_page_size(mut self, v: u32) -> Result<Self> {
        if v == 0 {
            return Err(Error::InvalidMaximumPageSize(v));
        }
        if let Some(limit) = self.statement.limit.filter(|l| *l > v) {
            return Err(Error::InvalidLimit { limit, maximum: v });
        }
        self.max_page_size = v;
        Ok(self)
    }

    /// The maximum page size.
    pub fn max_page_size(&self) -> u32 {
        self.max_page_size
    }

    /// Sets the columns for table queries.
    pub fn with_select<T: Into<String>>(mut self, v: T) -> Self {
        self.set_select(v);
        self
    }

    /// Sets the columns for table queries.
    pub fn set_select<T: Into<String>>(&mut self, v: T) {
        self.statement.select = clause(v.into(), "SELECT");
    }

    /// Sets the table for table queries.
    pub fn with_from<T: Into<String>>(mut self, v: T) -> Self {
        self.set_from(v);
        self
    }

    /// Sets the table for table queries.
    pub fn set_from<T: Into<String>>(&mut self, v: T) {
        self.statement.from = clause(v.into(), "FROM");
    }

    /// Sets the filter predicate.
    ///
    /// The predicate replaces any previous value. A leading `WHERE` keyword is
    /// removed. The predicate syntax is not validated, errors are reported by
    /// the service when the statement executes.
    pub fn with_where<T: Into<String>>(mut self, v: T) -> Self {
        self.set_where(v);
        self
    }

    /// Sets the filter predicate.
    ///
    /// See [with_where][Self::with_where].
    pub fn set_where<T: Into<String>>(&mut self, v: T) {
        self.statement.where_clause = clause(v.into(), "WHERE");
    }

    /// Sets the ordering clause.
    ///
    /// Without an ordering clause the service uses its default ordering,
    /// whatever that may be. A leading `ORDER BY` is removed.
    pub fn with_order_by<T: Into<String>>(mut self, v: T) -> Self {
        self.set_order_by(v);
        self
    }

    /// Sets the ordering clause.
    pub fn set_order_by<T: Into<String>>(&mut self, v: T) {
        self.statement.order_by = clause(v.into(), "ORDER BY");
    }

    /// Sets the page size.
    ///
    /// The limit must be positive, and cannot exceed the maximum page size.
    pub fn with_limit(mut self, v: u32) -> Result<Self> {
        self.set_limit(v)?;
        Ok(self)
    }

    /// Sets the page size.
    ///
    /// On error the builder is unchanged.
    pub fn set_limit(&mut self, v: u32) -> Result<()> {
        if v == 0 || v > self.max_page_size {
            return Err(Error::InvalidLimit {
                limit: v,
                maximum: self.max_page_size,
            });
        }
        self.statement.limit = Some(v);
        Ok(())
    }

    /// The page size, if set.
    pub fn limit(&self) -> Option<u32> {
        self.statement.limit
    }

    /// Sets the index of the first result.
    pub fn with_offset(mut self, v: u32) -> Self {
        self.set_offset(v);
        self
    }

    /// Sets the index of the first result.
    pub fn set_offset(&mut self, v: u32) {
        self.statement.offset = Some(v);
    }

    /// The index of the first result. Zero if not set.
    pub fn offset(&self) -> u32 {
        self.statement.offset.unwrap_or(0)
    }

    /// Advances the offset, typically by the page size after each page.
    pub fn increase_offset_by(&mut self, v: u32) {
        self.statement.offset = Some(self.offset().saturating_add(v));
    }

    /// Removes the paging window.
    ///
    /// Statements built after this call cover the full filtered set, as
    /// needed by report queries and other bulk operations.
    pub fn remove_limit_and_offset(&mut self) {
        self.statement.limit = None;
        self.statement.offset = None;
    }

    /// Binds a value to a placeholder, replacing any previous value.
    pub fn add_value<K, V>(mut self, name: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.set_value(name, value);
        self
    }

    /// Binds a value to a placeholder, replacing any previous value.
    pub fn set_value<K, V>(&mut self, name: K, value: V)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.statement.values.insert(name.into(), value.into());
    }

    /// Creates a snapshot of the current state.
    pub fn build(&self) -> Statement {
        self.statement.clone()
    }
}

impl Default for StatementBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// Trims the clause and removes a leading keyword, matched without regard to
// case and followed by whitespace.
fn clause(v: String, keyword: &str) -> Option<String> {
    let trimmed = v.trim();
    let stripped = match trimmed.get(..keyword.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(keyword) => {
            let rest = &trimmed[keyword.len()..];
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                rest.trim_start()
            } else {
                trimmed
            }
        }
        _ => trimmed,
    };
    if stripped.is_empty() {
        None
    } else {
        Some(stripped.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("id = 1", "id = 1")]
    #[test_case("WHERE id = 1", "id = 1")]
    #[test_case("  where   id = 1  ", "id = 1")]
    #[test_case("whereabouts = 1", "whereabouts = 1")]
    #[test_case("WHERE\tid = 1", "id = 1")]
    fn strip_where(input: &str, want: &str) {
        let statement = StatementBuilder::new().with_where(input).build();
        assert_eq!(statement.where_clause(), Some(want));
    }

    #[test_case("id ASC", "id ASC")]
    #[test_case("ORDER BY id ASC", "id ASC")]
    #[test_case("order by name DESC", "name DESC")]
    fn strip_order_by(input: &str, want: &str) {
        let statement = StatementBuilder::new().with_order_by(input).build();
        assert_eq!(statement.order_by(), Some(want));
    }

    #[test_case("")]
    #[test_case("   ")]
    #[test_case("WHERE ")]
    fn empty_clause(input: &str) {
        let statement = StatementBuilder::new()
            .with_where("id = 1")
            .with_where(input)
            .build();
        assert_eq!(statement.where_clause(), None);
    }

    #[test]
    fn where_last_write_wins() {
        let mut builder = StatementBuilder::new().with_where("a = 1");
        builder.set_where("b = 2");
        assert_eq!(builder.build().where_clause(), Some("b = 2"));
    }

    #[test_case(0)]
    #[test_case(501)]
    #[test_case(u32::MAX)]
    fn invalid_limit(limit: u32) {
        let mut builder = StatementBuilder::new();
        let err = builder.set_limit(limit).unwrap_err();
        assert!(
            matches!(err, Error::InvalidLimit { limit: l, maximum: 500 } if l == limit),
            "{err:?}"
        );
        assert_eq!(builder.limit(), None);
    }

    #[test]
    fn invalid_limit_keeps_previous() -> anyhow::Result<()> {
        let mut builder = StatementBuilder::new().with_limit(20)?;
        assert!(builder.set_limit(0).is_err());
        assert_eq!(builder.limit(), Some(20));
        Ok(())
    }

    #[test_case(1)]
    #[test_case(250)]
    #[test_case(500)]
    fn valid_limit(limit: u32) -> anyhow::Result<()> {
        let builder = StatementBuilder::new().with_limit(limit)?;
        assert_eq!(builder.limit(), Some(limit));
        assert_eq!(builder.build().limit(), Some(limit));
        Ok(())
    }

    #[test]
    fn max_page_size() -> anyhow::Result<()> {
        let builder = StatementBuilder::new().with_max_page_size(1000)?;
        assert_eq!(builder.max_page_size(), 1000);
        let builder = builder.with_limit(1000)?;
        assert_eq!(builder.limit(), Some(1000));

        let err = StatementBuilder::new().with_max_page_size(0).unwrap_err();
        assert_eq!(err, Error::InvalidMaximumPageSize(0));

        let err = StatementBuilder::new()
            .with_limit(100)?
            .with_max_page_size(50)
            .unwrap_err();
        assert_eq!(
            err,
            Error::InvalidLimit {
                limit: 100,
                maximum: 50
            }
        );
        Ok(())
    }

    #[test]
    fn offset() {
        let mut builder = StatementBuilder::new();
        assert_eq!(builder.offset(), 0);
        assert_eq!(builder.build().offset(), None);
        builder.increase_offset_by(10);
        builder.increase_offset_by(10);
        assert_eq!(builder.offset(), 20);
        builder.set_offset(5);
        assert_eq!(builder.build().offset(), Some(5));
        builder.set_offset(u32::MAX - 1);
        builder.increase_offset_by(10);
        assert_eq!(builder.offset(), u32::MAX);
    }

    #[test]
    fn add_value_overwrites() {
        let mut builder = StatementBuilder::new()
            .add_value("id", 1_i64)
            .add_value("id", 2_i64);
        assert_eq!(builder.build().value("id"), Some(&Value::Number(2)));
        builder.set_value("id", "three");
        assert_eq!(builder.build().value("id"), Some(&Value::from("three")));
        assert_eq!(builder.build().values().len(), 1);
    }

    #[test]
    fn build_is_a_snapshot() -> anyhow::Result<()> {
        let mut builder = StatementBuilder::new().with_limit(10)?;
        let before = builder.build();
        builder.increase_offset_by(10);
        let after = builder.build();
        assert_eq!(before.offset(), None);
        assert_eq!(after.offset(), Some(10));
        Ok(())
    }
}
