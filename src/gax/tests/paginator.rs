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

use ads_gax::Result;
use ads_gax::error::Error;
use ads_gax::error::api::ApiException;
use ads_gax::paginator::*;
use futures::future::{BoxFuture, FutureExt};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use statement::{Statement, StatementBuilder};
use std::sync::{Arc, Mutex};
use test_case::test_case;

type TestResult = anyhow::Result<()>;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct Placement {
    id: i64,
    name: String,
}

/// Serves a fixed list of placements, the way the list operations in the Ads
/// APIs do: the statement is sent as JSON and the response is a page.
#[derive(Clone)]
struct FakePlacementService {
    placements: Arc<Vec<Placement>>,
    requests: Arc<Mutex<Vec<serde_json::Value>>>,
    fail_at_offset: Option<u32>,
}

impl FakePlacementService {
    fn new(count: i64) -> Self {
        let placements = (0..count)
            .map(|id| Placement {
                id,
                name: format!("placement-{id}"),
            })
            .collect();
        Self {
            placements: Arc::new(placements),
            requests: Arc::new(Mutex::new(Vec::new())),
            fail_at_offset: None,
        }
    }

    fn with_failure_at(mut self, offset: u32) -> Self {
        self.fail_at_offset = Some(offset);
        self
    }

    async fn get_placements_by_statement(&self, statement: Statement) -> Result<Page<Placement>> {
        let wire = serde_json::to_value(&statement).map_err(Error::deser)?;
        self.requests.lock().unwrap().push(wire);
        let offset = statement.offset().unwrap_or_default();
        if self.fail_at_offset == Some(offset) {
            return Err(Error::service(
                ApiException::new()
                    .set_message("internal error")
                    .set_errors(["InternalApiError.UNEXPECTED_INTERNAL_API_ERROR"]),
            ));
        }
        let limit = statement.limit().unwrap_or(u32::MAX) as usize;
        let results: Vec<Placement> = self
            .placements
            .iter()
            .skip(offset as usize)
            .take(limit)
            .cloned()
            .collect();
        let total = self.placements.len() as u32;
        // The service omits the results field past the end of the result set.
        let page = Page::new().set_start_index(offset);
        let page = if results.is_empty() {
            page
        } else {
            page.set_results(results).set_total_result_set_size(total)
        };
        Ok(page)
    }

    fn fetcher(
        &self,
    ) -> impl FnMut(Statement) -> BoxFuture<'static, Result<Page<Placement>>> + Send + 'static {
        let service = self.clone();
        move |statement| {
            let service = service.clone();
            async move { service.get_placements_by_statement(statement).await }.boxed()
        }
    }

    fn offsets(&self) -> Vec<u64> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| {
                let query = r["query"].as_str().unwrap_or_default();
                query
                    .rsplit_once("OFFSET ")
                    .and_then(|(_, o)| o.parse().ok())
                    .unwrap_or_default()
            })
            .collect()
    }
}

#[test_case(5, 2; "partial last page")]
#[test_case(6, 2; "exact pages")]
#[test_case(1, 500; "single entity")]
#[test_case(499, 500; "just under one page")]
#[test_case(501, 500; "just over one page")]
#[test_case(17, 3; "many pages")]
#[tokio::test]
async fn fetch_all_issues_ceil_requests(total: i64, limit: u32) -> TestResult {
    let service = FakePlacementService::new(total);
    let builder = StatementBuilder::new().with_limit(limit)?;
    let items = fetch_all(builder, service.fetcher()).await?;

    assert_eq!(items.len() as i64, total);
    assert_eq!(items, service.placements.to_vec());
    let pages = (total as u64).div_ceil(limit as u64);
    let want = (0..pages).map(|p| p * limit as u64).collect::<Vec<_>>();
    assert_eq!(service.offsets(), want);
    Ok(())
}

#[tokio::test]
async fn empty_result_set_issues_one_request() -> TestResult {
    let service = FakePlacementService::new(0);
    let builder = StatementBuilder::new().with_limit(10)?;
    let summary = for_each_page(builder, service.fetcher(), |page: &Page<Placement>| {
        assert!(page.results().is_none(), "{page:?}");
    })
    .await?;
    assert_eq!(service.offsets(), vec![0]);
    assert_eq!(summary.pages, 1);
    assert_eq!(summary.total_result_set_size, 0);
    assert_eq!(summary.final_offset, 10);
    Ok(())
}

#[tokio::test]
async fn error_aborts_session() -> TestResult {
    let service = FakePlacementService::new(10).with_failure_at(4);
    let builder = StatementBuilder::new().with_limit(2)?;
    let err = fetch_all(builder, service.fetcher()).await.unwrap_err();
    let status = err.status().expect("the service error is preserved");
    assert_eq!(status.message, "internal error");
    assert_eq!(service.offsets(), vec![0, 2, 4]);
    Ok(())
}

#[tokio::test]
async fn stream_stops_after_error() -> TestResult {
    let service = FakePlacementService::new(10).with_failure_at(2);
    let builder = StatementBuilder::new().with_limit(2)?;
    let pages = Paginator::new(builder, service.fetcher())
        .into_stream()
        .collect::<Vec<_>>()
        .await;
    assert_eq!(pages.len(), 2);
    assert!(pages[0].is_ok(), "{pages:?}");
    assert!(pages[1].is_err(), "{pages:?}");
    assert_eq!(service.offsets(), vec![0, 2]);
    Ok(())
}

#[tokio::test]
async fn unbound_placeholder_fails_before_any_request() -> TestResult {
    let service = FakePlacementService::new(10);
    let builder = StatementBuilder::new()
        .with_where("WHERE status = :status AND name = 'a :literal'")
        .with_limit(5)?;
    let err = fetch_all(builder, service.fetcher()).await.unwrap_err();
    assert!(err.is_configuration(), "{err:?}");
    assert!(err.to_string().contains("status"), "{err}");
    assert!(service.offsets().is_empty());
    Ok(())
}

#[tokio::test]
async fn statement_on_the_wire() -> TestResult {
    let service = FakePlacementService::new(3);
    let builder = StatementBuilder::new()
        .with_where("status = :status")
        .with_order_by("id ASC")
        .add_value("status", "ACTIVE")
        .with_limit(2)?;
    let _ = fetch_all(builder, service.fetcher()).await?;

    let requests = service.requests.lock().unwrap().clone();
    assert_eq!(
        requests,
        vec![
            serde_json::json!({
                "query": "WHERE status = :status ORDER BY id ASC LIMIT 2 OFFSET 0",
                "values": [{"key": "status", "value": {"type": "TextValue", "value": "ACTIVE"}}],
            }),
            serde_json::json!({
                "query": "WHERE status = :status ORDER BY id ASC LIMIT 2 OFFSET 2",
                "values": [{"key": "status", "value": {"type": "TextValue", "value": "ACTIVE"}}],
            }),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn items_from_spawned_task() -> TestResult {
    let service = FakePlacementService::new(7);
    let builder = StatementBuilder::new().with_limit(3)?;
    let paginator = Paginator::new(builder, service.fetcher());
    let names = tokio::spawn(async move {
        paginator
            .items()
            .map(|p| p.map(|p| p.name))
            .collect::<Vec<_>>()
            .await
    })
    .await?
    .into_iter()
    .collect::<Result<Vec<_>>>()?;
    assert_eq!(names.len(), 7);
    assert_eq!(names[0], "placement-0");
    assert_eq!(names[6], "placement-6");
    Ok(())
}
