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

//! Evaluates the subset of the query language used by the samples.
//!
//! Filters are conjunctions of equality tests, `col = :name`, `col = 'text'`,
//! `col = 42`, or `col = true`, joined by `AND`. Orderings are lists of
//! `col [ASC|DESC]`. The paging window comes from the statement limit and
//! offset.

use super::model::Row;
use gax::Result;
use gax::error::Error;
use gax::error::api::{ApiError, ApiException};
use gax::paginator::Page;
use statement::{Statement, Value};
use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::CharIndices;

/// Runs `statement` over `rows`.
///
/// Pages with results report the size of the full filtered set. Like the
/// service, a window past the end of the result set returns a page without
/// `results` and with a total of 0.
pub(crate) fn execute<T>(rows: &[T], statement: &Statement) -> Result<Page<T>>
where
    T: Row + Clone,
{
    let filter = parse_where(statement.where_clause().unwrap_or_default(), statement)?;
    let order = parse_order_by::<T>(statement.order_by().unwrap_or_default())?;
    let filter = filter
        .into_iter()
        .map(|(c, v)| column::<T>(c).map(|c| (c, v)))
        .collect::<Result<Vec<_>>>()?;

    let mut matched = rows
        .iter()
        .filter(|row| filter.iter().all(|(c, v)| row.column(c).as_ref() == Some(v)))
        .collect::<Vec<_>>();
    matched.sort_by(|a, b| {
        order
            .iter()
            .map(|(c, descending)| {
                let o = compare(&a.column(c), &b.column(c));
                if *descending { o.reverse() } else { o }
            })
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    });

    let offset = statement.offset().unwrap_or_default() as usize;
    let limit = statement.limit().map(|l| l as usize).unwrap_or(usize::MAX);
    let results = matched
        .iter()
        .skip(offset)
        .take(limit)
        .map(|r| (*r).clone())
        .collect::<Vec<_>>();
    let page = Page::new().set_start_index(offset as u32);
    if results.is_empty() {
        return Ok(page);
    }
    Ok(page
        .set_results(results)
        .set_total_result_set_size(matched.len() as u32))
}

/// Rejects statements with unbound variables.
pub(crate) fn validate(statement: &Statement) -> Result<()> {
    match statement.placeholders().into_iter().find(|n| statement.value(n).is_none()) {
        Some(name) => Err(context_error("UNDEFINED_BIND_VARIABLE", name)),
        None => Ok(()),
    }
}

#[derive(Debug, PartialEq)]
enum Token<'a> {
    Word(&'a str),
    Bind(&'a str),
    Text(String),
    Number(i64),
    Equals,
}

fn word_end(start: usize, chars: &mut Peekable<CharIndices<'_>>) -> usize {
    let mut end = start;
    while let Some((i, c)) = chars.peek().copied() {
        if !(c.is_alphanumeric() || c == '_' || c == '.') {
            break;
        }
        end = i + c.len_utf8();
        chars.next();
    }
    end
}

fn tokenize(input: &str) -> Result<Vec<Token<'_>>> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '=' => tokens.push(Token::Equals),
            ':' => {
                let end = word_end(start + 1, &mut chars);
                if end == start + 1 {
                    return Err(syntax_error(&input[start..]));
                }
                tokens.push(Token::Bind(&input[start + 1..end]));
            }
            '\'' => {
                let mut text = String::new();
                let mut closed = false;
                while let Some((_, c)) = chars.next() {
                    if c != '\'' {
                        text.push(c);
                        continue;
                    }
                    if chars.peek().is_some_and(|(_, c)| *c == '\'') {
                        chars.next();
                        text.push('\'');
                        continue;
                    }
                    closed = true;
                    break;
                }
                if !closed {
                    return Err(syntax_error(&input[start..]));
                }
                tokens.push(Token::Text(text));
            }
            c if c.is_ascii_digit() || c == '-' => {
                let end = word_end(start + c.len_utf8(), &mut chars);
                let number = input[start..end]
                    .parse()
                    .map_err(|_| syntax_error(&input[start..end]))?;
                tokens.push(Token::Number(number));
            }
            c if c.is_alphabetic() || c == '_' => {
                let end = word_end(start + c.len_utf8(), &mut chars);
                tokens.push(Token::Word(&input[start..end]));
            }
            _ => return Err(syntax_error(&input[start..])),
        }
    }
    Ok(tokens)
}

fn parse_where<'a>(clause: &'a str, statement: &Statement) -> Result<Vec<(&'a str, Value)>> {
    let tokens = tokenize(clause)?;
    let mut conditions = Vec::new();
    let mut iter = tokens.into_iter();
    loop {
        let Some(first) = iter.next() else {
            return if conditions.is_empty() {
                Ok(conditions)
            } else {
                Err(syntax_error(clause))
            };
        };
        let Token::Word(column) = first else {
            return Err(syntax_error(clause));
        };
        if iter.next() != Some(Token::Equals) {
            return Err(syntax_error(clause));
        }
        let value = match iter.next() {
            Some(Token::Bind(name)) => statement
                .value(name)
                .cloned()
                .ok_or_else(|| context_error("UNDEFINED_BIND_VARIABLE", name))?,
            Some(Token::Text(t)) => Value::Text(t),
            Some(Token::Number(n)) => Value::Number(n),
            Some(Token::Word(w)) if w.eq_ignore_ascii_case("true") => Value::Boolean(true),
            Some(Token::Word(w)) if w.eq_ignore_ascii_case("false") => Value::Boolean(false),
            _ => return Err(syntax_error(clause)),
        };
        conditions.push((column, value));
        match iter.next() {
            None => return Ok(conditions),
            Some(Token::Word(w)) if w.eq_ignore_ascii_case("and") => {}
            Some(_) => return Err(syntax_error(clause)),
        }
    }
}

fn parse_order_by<T: Row>(clause: &str) -> Result<Vec<(&'static str, bool)>> {
    if clause.trim().is_empty() {
        return Ok(Vec::new());
    }
    clause
        .split(',')
        .map(|term| {
            let parts = term.split_whitespace().collect::<Vec<_>>();
            match parts.as_slice() {
                [c] => Ok((column::<T>(c)?, false)),
                [c, d] if d.eq_ignore_ascii_case("asc") => Ok((column::<T>(c)?, false)),
                [c, d] if d.eq_ignore_ascii_case("desc") => Ok((column::<T>(c)?, true)),
                _ => Err(syntax_error(term.trim())),
            }
        })
        .collect()
}

/// Resolves a column name, ignoring case.
fn column<T: Row>(name: &str) -> Result<&'static str> {
    T::COLUMNS
        .iter()
        .find(|c| c.eq_ignore_ascii_case(name))
        .copied()
        .ok_or_else(|| context_error("UNRECOGNIZED_COLUMN", name))
}

fn compare(a: &Option<Value>, b: &Option<Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a.cmp(b),
        (Some(Value::Boolean(a)), Some(Value::Boolean(b))) => a.cmp(b),
        (Some(Value::Text(a)), Some(Value::Text(b))) => a.cmp(b),
        (Some(Value::Date(a)), Some(Value::Date(b))) => a.cmp(b),
        _ => Ordering::Equal,
    }
}

fn syntax_error(trigger: &str) -> Error {
    query_error("PublisherQueryLanguageSyntaxError.UNPARSABLE", trigger)
}

fn context_error(reason: &str, trigger: &str) -> Error {
    query_error(
        &format!("PublisherQueryLanguageContextError.{reason}"),
        trigger,
    )
}

fn query_error(error_string: &str, trigger: &str) -> Error {
    Error::service(
        ApiException::new()
            .set_message(format!("[{error_string} @ {trigger}]"))
            .set_errors([ApiError::new()
                .set_error_string(error_string)
                .set_trigger(trigger)]),
    )
}
