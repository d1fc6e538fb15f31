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

//! Drives statement-based list operations through every page.
//!
//! The list operations in the Ads APIs take a [Statement] with a `LIMIT` and
//! an `OFFSET`, and return one page of results together with the total size
//! of the result set. The types in this module issue the page requests
//! sequentially, in ascending offset order, until the offset reaches the last
//! observed total.
//!
//! The remote call is injected by the caller: any `FnMut(Statement) -> Future`
//! that returns a page works.
//!
//! # Example
//! ```
//! # use ads_gax::paginator::*;
//! # use statement::StatementBuilder;
//! # tokio_test_block_on(async {
//! let builder = StatementBuilder::new()
//!     .with_where("status = :status")
//!     .add_value("status", "ACTIVE")
//!     .with_limit(2)?;
//! let items = fetch_all(builder, |statement| async move {
//!     let offset = statement.offset().unwrap_or(0);
//!     let results = (offset..(offset + 2).min(5)).collect::<Vec<u32>>();
//!     Ok(Page::new().set_results(results).set_start_index(offset).set_total_result_set_size(5))
//! })
//! .await?;
//! assert_eq!(items, vec![0, 1, 2, 3, 4]);
//! # Ok::<(), ads_gax::error::Error>(()) }).unwrap();
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

use crate::Result;
use crate::error::Error;
use futures::stream::unfold;
use futures::{Stream, StreamExt};
use pin_project::pin_project;
use statement::{Statement, StatementBuilder};
use std::future::Future;
use std::pin::Pin;

/// The page returned by a statement-based list operation.
pub trait StatementPage {
    /// The type of the entities in the page.
    type PageItem;

    /// The entities in the page, `None` if the service omitted them.
    fn results(&self) -> Option<&[Self::PageItem]>;

    /// Consumes the page and returns its entities.
    fn into_results(self) -> Vec<Self::PageItem>;

    /// The absolute index of the first entity in the page.
    fn start_index(&self) -> u32;

    /// The total number of entities matching the statement.
    fn total_result_set_size(&self) -> u32;
}

/// A generic page, as returned by the Ads API list operations.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct Page<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<T>>,
    pub start_index: u32,
    pub total_result_set_size: u32,
}

impl<T> Page<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [results][Page::results].
    pub fn set_results<I: IntoIterator<Item = T>>(mut self, v: I) -> Self {
        self.results = Some(v.into_iter().collect());
        self
    }

    /// Sets the value of [start_index][Page::start_index].
    pub fn set_start_index(mut self, v: u32) -> Self {
        self.start_index = v;
        self
    }

    /// Sets the value of [total_result_set_size][Page::total_result_set_size].
    pub fn set_total_result_set_size(mut self, v: u32) -> Self {
        self.total_result_set_size = v;
        self
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            results: None,
            start_index: 0,
            total_result_set_size: 0,
        }
    }
}

impl<T> StatementPage for Page<T> {
    type PageItem = T;

    fn results(&self) -> Option<&[T]> {
        self.results.as_deref()
    }

    fn into_results(self) -> Vec<T> {
        self.results.unwrap_or_default()
    }

    fn start_index(&self) -> u32 {
        self.start_index
    }

    fn total_result_set_size(&self) -> u32 {
        self.total_result_set_size
    }
}

/// Describes a completed paging session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct PagingSummary {
    /// The number of page requests.
    pub pages: u32,
    /// The last total reported by a page with results.
    pub total_result_set_size: u32,
    /// The offset after the last page.
    pub final_offset: u32,
}

/// The state of one paging session.
struct Session<F> {
    builder: StatementBuilder,
    limit: u32,
    total: u32,
    pages: u32,
    pending: Option<Error>,
    done: bool,
    fetch_page: F,
}

impl<F> Session<F> {
    fn new(mut builder: StatementBuilder, fetch_page: F) -> Self {
        let limit = builder.limit().unwrap_or(builder.max_page_size());
        builder.set_offset(0);
        let pending = builder
            .set_limit(limit)
            .and_then(|_| builder.build().check_bindings())
            .err()
            .map(Error::from);
        Self {
            builder,
            limit,
            total: 0,
            pages: 0,
            pending,
            done: false,
            fetch_page,
        }
    }

    async fn next_page<P, Fut>(&mut self) -> Option<Result<P>>
    where
        F: FnMut(Statement) -> Fut,
        Fut: Future<Output = Result<P>>,
        P: StatementPage,
    {
        if self.done {
            return None;
        }
        if let Some(e) = self.pending.take() {
            self.done = true;
            return Some(Err(e));
        }
        let statement = self.builder.build();
        tracing::debug!(
            offset = self.builder.offset(),
            limit = self.limit,
            "requesting page"
        );
        let page = match (self.fetch_page)(statement).await {
            Ok(page) => page,
            Err(e) => {
                self.done = true;
                tracing::debug!(offset = self.builder.offset(), "page request failed: {e}");
                return Some(Err(e));
            }
        };
        self.pages += 1;
        let count = page.results().map(<[P::PageItem]>::len).unwrap_or_default();
        if count > 0 {
            let total = page.total_result_set_size();
            if self.pages > 1 && total != self.total {
                tracing::warn!(
                    previous = self.total,
                    current = total,
                    "the total result set size changed between pages"
                );
            }
            self.total = total;
        }
        tracing::debug!(
            start_index = page.start_index(),
            results = count,
            total = self.total,
            "received page"
        );
        self.builder.increase_offset_by(self.limit);
        self.done = self.builder.offset() >= self.total;
        Some(Ok(page))
    }

    fn summary(&self) -> PagingSummary {
        PagingSummary {
            pages: self.pages,
            total_result_set_size: self.total,
            final_offset: self.builder.offset(),
        }
    }
}

/// Converts a statement-based list operation into a [futures::Stream] of
/// pages.
///
/// The stream yields each page as it arrives. After an error the stream ends,
/// no further pages are requested.
#[pin_project]
pub struct Paginator<P> {
    #[pin]
    stream: Pin<Box<dyn Stream<Item = Result<P>> + Send>>,
}

impl<P> Paginator<P>
where
    P: StatementPage + Send + 'static,
{
    /// Creates a new [Paginator].
    ///
    /// The limit is read from `builder`; if unset it defaults to the
    /// builder's maximum page size. The session always starts at offset 0.
    /// Unbound placeholders are reported as a configuration error before any
    /// page is requested.
    ///
    /// # Parameters
    /// * `builder` - the filter, ordering, and bind values for the session.
    /// * `fetch_page` - performs the remote call for one statement.
    pub fn new<F, Fut>(builder: StatementBuilder, fetch_page: F) -> Self
    where
        F: FnMut(Statement) -> Fut + Send + 'static,
        Fut: Future<Output = Result<P>> + Send + 'static,
    {
        let session = Session::new(builder, fetch_page);
        let stream = unfold(session, |mut session| async move {
            let page = session.next_page().await?;
            Some((page, session))
        });
        Self {
            stream: Box::pin(stream),
        }
    }

    /// Returns the next page in the session.
    pub fn next(&mut self) -> futures::stream::Next<'_, Self> {
        StreamExt::next(self)
    }

    /// Returns the pages as a [futures::Stream].
    pub fn into_stream(self) -> impl Stream<Item = Result<P>> + Unpin {
        self
    }

    /// Flattens the pages into a stream of entities.
    pub fn items(self) -> ItemPaginator<P::PageItem>
    where
        P::PageItem: Send + 'static,
    {
        ItemPaginator::new(self)
    }
}

impl<P> Stream for Paginator<P> {
    type Item = Result<P>;

    fn poll_next(
        self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Option<Self::Item>> {
        self.project().stream.poll_next(cx)
    }
}

impl<P> std::fmt::Debug for Paginator<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paginator").finish_non_exhaustive()
    }
}

/// A [futures::Stream] of entities, one element per entity across all
/// pages.
#[pin_project]
pub struct ItemPaginator<T> {
    #[pin]
    stream: Pin<Box<dyn Stream<Item = Result<T>> + Send>>,
}

impl<T> ItemPaginator<T>
where
    T: Send + 'static,
{
    fn new<P>(pages: Paginator<P>) -> Self
    where
        P: StatementPage<PageItem = T> + Send + 'static,
    {
        let stream = pages.flat_map(|page| {
            let items: Vec<Result<T>> = match page {
                Ok(page) => page.into_results().into_iter().map(Ok).collect(),
                Err(e) => vec![Err(e)],
            };
            futures::stream::iter(items)
        });
        Self {
            stream: Box::pin(stream),
        }
    }

    /// Returns the next entity.
    pub fn next(&mut self) -> futures::stream::Next<'_, Self> {
        StreamExt::next(self)
    }
}

impl<T> Stream for ItemPaginator<T> {
    type Item = Result<T>;

    fn poll_next(
        self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Option<Self::Item>> {
        self.project().stream.poll_next(cx)
    }
}

/// Fetches every page and returns all the entities, in page order.
///
/// The first error aborts the session and is returned as-is; the entities
/// received before it are discarded.
pub async fn fetch_all<P, F, Fut>(builder: StatementBuilder, fetch_page: F) -> Result<Vec<P::PageItem>>
where
    P: StatementPage,
    F: FnMut(Statement) -> Fut,
    Fut: Future<Output = Result<P>>,
{
    let mut session = Session::new(builder, fetch_page);
    let mut items = Vec::new();
    while let Some(page) = session.next_page().await {
        items.extend(page?.into_results());
    }
    Ok(items)
}

/// Fetches every page, calling `visitor` on each one.
///
/// Returns a summary of the session once the last page is visited. The first
/// error aborts the session; `visitor` is not called for it.
pub async fn for_each_page<P, F, Fut, V>(
    builder: StatementBuilder,
    fetch_page: F,
    mut visitor: V,
) -> Result<PagingSummary>
where
    P: StatementPage,
    F: FnMut(Statement) -> Fut,
    Fut: Future<Output = Result<P>>,
    V: FnMut(&P),
{
    let mut session = Session::new(builder, fetch_page);
    while let Some(page) = session.next_page().await {
        visitor(&page?);
    }
    Ok(session.summary())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::api::ApiException;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};
    use test_case::test_case;

    type TestResult = anyhow::Result<()>;

    /// Serves `total` integers, recording the offset of each request.
    fn numbers(
        total: u32,
        offsets: Arc<Mutex<Vec<u32>>>,
    ) -> impl FnMut(Statement) -> std::future::Ready<Result<Page<u32>>> + Send + 'static {
        move |statement: Statement| {
            let offset = statement.offset().unwrap_or_default();
            let limit = statement.limit().unwrap_or(u32::MAX);
            offsets.lock().unwrap().push(offset);
            let end = total.min(offset.saturating_add(limit));
            let page = Page::new()
                .set_start_index(offset)
                .set_total_result_set_size(total);
            let page = if offset < end {
                page.set_results(offset..end)
            } else {
                page
            };
            std::future::ready(Ok(page))
        }
    }

    #[test_case(5, 2, vec![0, 2, 4])]
    #[test_case(4, 2, vec![0, 2])]
    #[test_case(1, 500, vec![0])]
    #[test_case(0, 3, vec![0])]
    #[tokio::test]
    async fn fetch_all_offsets(total: u32, limit: u32, want: Vec<u32>) -> TestResult {
        let offsets = Arc::new(Mutex::new(Vec::new()));
        let builder = StatementBuilder::new().with_limit(limit)?;
        let items = fetch_all(builder, numbers(total, offsets.clone())).await?;
        assert_eq!(items, (0..total).collect::<Vec<_>>());
        assert_eq!(*offsets.lock().unwrap(), want);
        Ok(())
    }

    #[tokio::test]
    async fn default_limit_is_max_page_size() -> TestResult {
        let offsets = Arc::new(Mutex::new(Vec::new()));
        let builder = StatementBuilder::new().with_max_page_size(3)?;
        let items = fetch_all(builder, numbers(7, offsets.clone())).await?;
        assert_eq!(items.len(), 7);
        assert_eq!(*offsets.lock().unwrap(), vec![0, 3, 6]);
        Ok(())
    }

    #[tokio::test]
    async fn starts_at_offset_zero() -> TestResult {
        let offsets = Arc::new(Mutex::new(Vec::new()));
        let builder = StatementBuilder::new().with_limit(2)?.with_offset(4);
        let items = fetch_all(builder, numbers(3, offsets.clone())).await?;
        assert_eq!(items, vec![0, 1, 2]);
        assert_eq!(*offsets.lock().unwrap(), vec![0, 2]);
        Ok(())
    }

    #[test_case(vec![6, 3], vec![0, 1, 2], vec![0, 2]; "shrinks")]
    #[test_case(vec![3, 6], (0..6).collect(), vec![0, 2, 4]; "grows")]
    #[tokio::test]
    async fn total_changes_between_pages(
        totals: Vec<u32>,
        want: Vec<u32>,
        want_offsets: Vec<u32>,
    ) -> TestResult {
        let offsets = Arc::new(Mutex::new(Vec::new()));
        let mut totals = totals.into_iter();
        let mut total = 0;
        let serve = |statement: Statement| {
            total = totals.next().unwrap_or(total);
            numbers(total, offsets.clone())(statement)
        };
        let builder = StatementBuilder::new().with_limit(2)?;
        let items = fetch_all(builder, serve).await?;
        assert_eq!(items, want);
        assert_eq!(*offsets.lock().unwrap(), want_offsets);
        Ok(())
    }

    #[tokio::test]
    async fn absent_results_keep_previous_total() -> TestResult {
        let mut calls = 0;
        let fetch = move |_: Statement| {
            calls += 1;
            let page = match calls {
                1 => Page::new().set_results([1, 2]).set_total_result_set_size(6),
                // A page without results does not change the total.
                2 => Page::new().set_total_result_set_size(0),
                _ => Page::new().set_results([5, 6]).set_total_result_set_size(6),
            };
            std::future::ready(Ok(page))
        };
        let builder = StatementBuilder::new().with_limit(2)?;
        let summary = for_each_page(builder, fetch, |_: &Page<i32>| {}).await?;
        assert_eq!(
            summary,
            PagingSummary {
                pages: 3,
                total_result_set_size: 6,
                final_offset: 6,
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn empty_first_page() -> TestResult {
        let mut calls = 0;
        let fetch = |_: Statement| {
            calls += 1;
            std::future::ready(Ok(Page::<i32>::new()
                .set_results([])
                .set_total_result_set_size(10)))
        };
        let summary = for_each_page(StatementBuilder::new(), fetch, |_| {}).await?;
        assert_eq!(calls, 1);
        assert_eq!(summary.pages, 1);
        assert_eq!(summary.total_result_set_size, 0);
        Ok(())
    }

    #[tokio::test]
    async fn error_stops_session() -> TestResult {
        let mut calls = 0;
        let fetch = |_: Statement| {
            calls += 1;
            let result = if calls == 1 {
                Ok(Page::new().set_results([1, 2]).set_total_result_set_size(10))
            } else {
                Err(Error::service(
                    ApiException::new().set_errors(["ServerError.SERVER_ERROR"]),
                ))
            };
            std::future::ready(result)
        };
        let builder = StatementBuilder::new().with_limit(2)?;
        let err = fetch_all(builder, fetch).await.unwrap_err();
        assert!(err.status().is_some(), "{err:?}");
        assert_eq!(calls, 2);
        Ok(())
    }

    #[tokio::test]
    async fn unbound_variable() -> TestResult {
        let mut calls = 0;
        let fetch = |_: Statement| {
            calls += 1;
            std::future::ready(Ok(Page::<i32>::new()))
        };
        let builder = StatementBuilder::new().with_where("id = :id");
        let err = fetch_all(builder, fetch).await.unwrap_err();
        assert!(err.is_configuration(), "{err:?}");
        assert_eq!(calls, 0);
        Ok(())
    }

    #[tokio::test]
    async fn paginator_stream() -> TestResult {
        let offsets = Arc::new(Mutex::new(Vec::new()));
        let builder = StatementBuilder::new().with_limit(2)?;
        let mut paginator = Paginator::new(builder, numbers(3, offsets.clone()));
        let mut starts = Vec::new();
        while let Some(page) = paginator.next().await {
            starts.push(page?.start_index());
        }
        assert_eq!(starts, vec![0, 2]);
        Ok(())
    }

    #[tokio::test]
    async fn paginator_items() -> TestResult {
        let offsets = Arc::new(Mutex::new(Vec::new()));
        let builder = StatementBuilder::new().with_limit(4)?;
        let items = Paginator::new(builder, numbers(9, offsets.clone()))
            .items()
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .collect::<Result<Vec<_>>>()?;
        assert_eq!(items, (0..9).collect::<Vec<_>>());
        assert_eq!(*offsets.lock().unwrap(), vec![0, 4, 8]);
        Ok(())
    }

    #[tokio::test]
    async fn paginator_unbound_variable() -> TestResult {
        let offsets = Arc::new(Mutex::new(Vec::new()));
        let builder = StatementBuilder::new().with_where("a = :a AND b = :b").add_value("a", 1);
        let mut paginator = Paginator::new(builder, numbers(3, offsets.clone()));
        let first = paginator.next().await;
        assert!(
            matches!(&first, Some(Err(e)) if e.is_configuration()),
            "{first:?}"
        );
        assert!(paginator.next().await.is_none());
        assert!(offsets.lock().unwrap().is_empty());
        Ok(())
    }

    #[test]
    fn page_wire_format() -> TestResult {
        let page: Page<String> = serde_json::from_value(serde_json::json!({
            "results": ["a", "b"],
            "startIndex": 10,
            "totalResultSetSize": 12,
        }))?;
        assert_eq!(page.results(), Some(["a".to_string(), "b".to_string()].as_slice()));
        assert_eq!(page.start_index(), 10);
        assert_eq!(page.total_result_set_size(), 12);

        let page: Page<String> = serde_json::from_value(serde_json::json!({}))?;
        assert_eq!(page, Page::default());
        assert_eq!(page.into_results(), Vec::<String>::new());
        Ok(())
    }

    #[test]
    fn send() {
        static_assertions::assert_impl_all!(Paginator<Page<String>>: Send, Unpin);
        static_assertions::assert_impl_all!(ItemPaginator<String>: Send, Unpin);
    }
}
