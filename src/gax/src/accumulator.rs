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

//! Collects values across all the pages of a session.
//!
//! Some workflows need a summary of a whole result set before the next step,
//! for example the custom field ids referenced by all the line items in an
//! order, which become the columns of a report.

use crate::Result;
use crate::paginator::{StatementPage, for_each_page};
use statement::{Statement, StatementBuilder};
use std::collections::HashSet;
use std::future::Future;
use std::hash::Hash;

/// Accumulates distinct values, in the order they are first seen.
#[derive(Clone, Debug)]
pub struct DistinctAccumulator<K> {
    seen: HashSet<K>,
    values: Vec<K>,
}

impl<K> DistinctAccumulator<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            seen: HashSet::new(),
            values: Vec::new(),
        }
    }

    /// Adds `value` unless it was already added. Returns `true` if it is new.
    pub fn push(&mut self, value: K) -> bool {
        if !self.seen.insert(value.clone()) {
            return false;
        }
        self.values.push(value);
        true
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[K] {
        &self.values
    }

    pub fn into_vec(self) -> Vec<K> {
        self.values
    }
}

impl<K> Default for DistinctAccumulator<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Extend<K> for DistinctAccumulator<K>
where
    K: Eq + Hash + Clone,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for v in iter {
            self.push(v);
        }
    }
}

/// Runs a paging session and collects the distinct values produced by
/// `project` for each entity.
///
/// # Example
/// ```
/// # use ads_gax::accumulator::collect_distinct;
/// # use ads_gax::paginator::Page;
/// # use statement::StatementBuilder;
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let ids = collect_distinct(
///     StatementBuilder::new(),
///     |_| async {
///         Ok(Page::new()
///             .set_results([vec![1, 2], vec![2, 3]])
///             .set_total_result_set_size(2))
///     },
///     |field_ids: &Vec<i64>| field_ids.clone(),
/// )
/// .await?;
/// assert_eq!(ids, vec![1, 2, 3]);
/// # Ok::<(), ads_gax::error::Error>(()) });
/// ```
pub async fn collect_distinct<P, F, Fut, M, I>(
    builder: StatementBuilder,
    fetch_page: F,
    mut project: M,
) -> Result<Vec<I::Item>>
where
    P: StatementPage,
    F: FnMut(Statement) -> Fut,
    Fut: Future<Output = Result<P>>,
    M: FnMut(&P::PageItem) -> I,
    I: IntoIterator,
    I::Item: Eq + Hash + Clone,
{
    let mut accumulator = DistinctAccumulator::new();
    for_each_page(builder, fetch_page, |page: &P| {
        for item in page.results().unwrap_or_default() {
            accumulator.extend(project(item));
        }
    })
    .await?;
    Ok(accumulator.into_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::paginator::Page;
    use pretty_assertions::assert_eq;

    #[test]
    fn distinct_in_first_seen_order() {
        let mut acc = DistinctAccumulator::new();
        assert!(acc.is_empty());
        assert!(acc.push(3));
        assert!(acc.push(1));
        assert!(!acc.push(3));
        acc.extend([2, 1, 4]);
        assert_eq!(acc.len(), 4);
        assert_eq!(acc.as_slice(), &[3, 1, 2, 4]);
        assert_eq!(acc.into_vec(), vec![3, 1, 2, 4]);
    }

    #[tokio::test]
    async fn collect_across_pages() -> anyhow::Result<()> {
        let pages = [
            vec![vec!["a", "b"], vec![]],
            vec![vec!["b", "c"], vec!["a"]],
            vec![vec!["d"]],
        ];
        let fetch = |statement: Statement| {
            let offset = statement.offset().unwrap_or_default() as usize;
            let page = Page::new()
                .set_results(pages[offset / 2].clone())
                .set_total_result_set_size(5);
            std::future::ready(Ok(page))
        };
        let builder = StatementBuilder::new().with_limit(2)?;
        let got = collect_distinct(builder, fetch, |v: &Vec<&str>| v.clone()).await?;
        assert_eq!(got, vec!["a", "b", "c", "d"]);
        Ok(())
    }

    #[tokio::test]
    async fn error_discards_partial() -> anyhow::Result<()> {
        let mut calls = 0;
        let fetch = |_: Statement| {
            calls += 1;
            let result = if calls == 1 {
                Ok(Page::new().set_results([1_i64]).set_total_result_set_size(4))
            } else {
                Err(Error::io("connection reset"))
            };
            std::future::ready(result)
        };
        let builder = StatementBuilder::new().with_limit(1)?;
        let err = collect_distinct(builder, fetch, |v: &i64| [*v])
            .await
            .unwrap_err();
        assert!(err.is_io(), "{err:?}");
        Ok(())
    }
}
