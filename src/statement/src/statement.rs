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

use crate::{Error, Result, Value};
use std::collections::BTreeMap;

/// An immutable query for a statement-based list method.
///
/// Applications create statements using
/// [StatementBuilder][crate::StatementBuilder]. Each call to
/// [build()][crate::StatementBuilder::build] returns an independent snapshot,
/// later changes to the builder do not affect statements already built.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Statement {
    pub(crate) select: Option<String>,
    pub(crate) from: Option<String>,
    pub(crate) where_clause: Option<String>,
    pub(crate) order_by: Option<String>,
    pub(crate) limit: Option<u32>,
    pub(crate) offset: Option<u32>,
    pub(crate) values: BTreeMap<String, Value>,
}

impl Statement {
    /// The columns in the `SELECT` clause, if any.
    pub fn select(&self) -> Option<&str> {
        self.select.as_deref()
    }

    /// The table in the `FROM` clause, if any.
    pub fn table(&self) -> Option<&str> {
        self.from.as_deref()
    }

    /// The filter predicate, without the `WHERE` keyword.
    pub fn where_clause(&self) -> Option<&str> {
        self.where_clause.as_deref()
    }

    /// The ordering clause, without the `ORDER BY` keywords.
    pub fn order_by(&self) -> Option<&str> {
        self.order_by.as_deref()
    }

    /// The maximum number of results, if paging is enabled.
    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    /// The index of the first result, if paging is enabled.
    pub fn offset(&self) -> Option<u32> {
        self.offset
    }

    /// The bind variables, ordered by name.
    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    /// Returns the value bound to `name`, if any.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Renders the query text sent to the service.
    ///
    /// Absent clauses are omitted. The bind variables are sent separately and
    /// are not interpolated.
    pub fn query(&self) -> String {
        let clauses = [
            ("SELECT", self.select.clone()),
            ("FROM", self.from.clone()),
            ("WHERE", self.where_clause.clone()),
            ("ORDER BY", self.order_by.clone()),
            ("LIMIT", self.limit.map(|v| v.to_string())),
            ("OFFSET", self.offset.map(|v| v.to_string())),
        ];
        clauses
            .into_iter()
            .filter_map(|(keyword, clause)| clause.map(|c| format!("{keyword} {c}")))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The names of the placeholders referenced by the filter predicate.
    ///
    /// Placeholders are written as `:name`. Text inside quoted literals is
    /// ignored. Each name is reported once, in order of first appearance.
    ///
    /// # Example
    /// ```
    /// # use ads_statement::StatementBuilder;
    /// let statement = StatementBuilder::new()
    ///     .with_where("name = ':literal' AND id = :id AND (a = :id OR b = :b)")
    ///     .build();
    /// assert_eq!(statement.placeholders(), vec!["id", "b"]);
    /// ```
    pub fn placeholders(&self) -> Vec<&str> {
        self.where_clause
            .as_deref()
            .map(scan_placeholders)
            .unwrap_or_default()
    }

    /// Verifies every placeholder has a bound value.
    ///
    /// The service rejects statements with unbound placeholders, this
    /// function detects the problem before any request is made.
    pub fn check_bindings(&self) -> Result<()> {
        match self
            .placeholders()
            .into_iter()
            .find(|name| !self.values.contains_key(*name))
        {
            Some(name) => Err(Error::UnboundVariable(name.to_string())),
            None => Ok(()),
        }
    }
}

fn scan_placeholders(text: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    let mut quote: Option<char> = None;
    let mut chars = text.char_indices().peekable();
    while let Some((_, c)) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, ':') => {
                let Some(&(start, first)) = chars.peek() else {
                    continue;
                };
                if !(first.is_ascii_alphabetic() || first == '_') {
                    continue;
                }
                let mut end = start;
                while let Some(&(i, c)) = chars.peek() {
                    if !(c.is_ascii_alphanumeric() || c == '_') {
                        break;
                    }
                    end = i + c.len_utf8();
                    chars.next();
                }
                let name = &text[start..end];
                if !names.contains(&name) {
                    names.push(name);
                }
            }
            (None, _) => {}
        }
    }
    names
}

impl serde::ser::Serialize for Statement {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        use serde::ser::SerializeStruct;

        #[derive(serde::Serialize)]
        struct Entry<'a> {
            key: &'a str,
            value: &'a Value,
        }

        let values = self
            .values
            .iter()
            .map(|(key, value)| Entry { key, value })
            .collect::<Vec<_>>();
        let mut state = serializer.serialize_struct("Statement", 2)?;
        state.serialize_field("query", &self.query())?;
        state.serialize_field("values", &values)?;
        state.end()
    }
}
