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

//! Runs each sample against the seeded dataset and verifies its output.

use ads_guide_samples::fake::{Dataset, FakeAdManager};
use ads_guide_samples as samples;
use gax::options::{PollingLimit, PollingOptions};
use gax::polling_backoff_policy::FixedDelay;
use lro::JobStatus;
use pretty_assertions::assert_eq;
use std::time::Duration;
use test_case::test_case;

type TestResult = anyhow::Result<()>;

fn seeded() -> FakeAdManager {
    FakeAdManager::new(Dataset::seeded())
}

fn lines(out: Vec<u8>) -> anyhow::Result<Vec<String>> {
    Ok(String::from_utf8(out)?.lines().map(str::to_string).collect())
}

fn offsets(service: &FakeAdManager) -> Vec<Option<u32>> {
    service.requests().iter().map(|s| s.offset()).collect()
}

#[test_case(500, vec![Some(0)])]
#[test_case(5, vec![Some(0), Some(5), Some(10)])]
#[test_case(4, vec![Some(0), Some(4), Some(8)])]
#[test_case(1, (0..12).map(Some).collect())]
#[tokio::test]
async fn placements(page_size: u32, want: Vec<Option<u32>>) -> TestResult {
    let service = seeded();
    let mut out = Vec::new();
    samples::placements::sample(&service, page_size, &mut out).await?;
    let got = lines(out)?;
    assert_eq!(got.len(), 13, "{got:?}");
    assert_eq!(got[0], "0) Placement with ID 101 and name \"Placement #1\" was found.");
    assert_eq!(got[11], "11) Placement with ID 112 and name \"Placement #12\" was found.");
    assert_eq!(got[12], "Number of results found: 12");
    assert_eq!(offsets(&service), want);
    Ok(())
}

#[tokio::test]
async fn activities() -> TestResult {
    let service = seeded();
    let mut out = Vec::new();
    samples::activities::sample(&service, 4, &mut out).await?;
    let got = lines(out)?;
    let want = vec![
        "0) Activity with ID 202, name \"Activity #2\", and type \"DAILY_VISITS\" was found.",
        "1) Activity with ID 203, name \"Activity #3\", and type \"PAGE_VIEWS\" was found.",
        "2) Activity with ID 205, name \"Activity #5\", and type \"DAILY_VISITS\" was found.",
        "3) Activity with ID 206, name \"Activity #6\", and type \"PAGE_VIEWS\" was found.",
        "4) Activity with ID 208, name \"Activity #8\", and type \"DAILY_VISITS\" was found.",
        "5) Activity with ID 209, name \"Activity #9\", and type \"PAGE_VIEWS\" was found.",
        "Number of results found: 6",
    ];
    assert_eq!(got, want);

    let requests = service.requests();
    assert_eq!(requests.len(), 2, "{requests:?}");
    assert_eq!(requests[0].where_clause(), Some("status = :status"));
    assert_eq!(
        requests[1].query(),
        "WHERE status = :status ORDER BY id ASC LIMIT 4 OFFSET 4"
    );
    Ok(())
}

#[tokio::test]
async fn audience_segments() -> TestResult {
    let service = seeded();
    let mut out = Vec::new();
    samples::audience_segments::sample(&service, 4, &mut out).await?;
    let got = lines(out)?;
    assert_eq!(got.len(), 7, "{got:?}");
    assert_eq!(
        got[5],
        "5) Audience segment with ID 606, name \"Segment #6\", and size 6000 was found."
    );
    assert_eq!(got[6], "Number of results found: 6");
    assert_eq!(offsets(&service), vec![Some(0), Some(4)]);
    Ok(())
}

#[tokio::test]
async fn creatives() -> TestResult {
    let service = seeded();
    let mut out = Vec::new();
    samples::creatives::sample(&service, 2, &mut out).await?;
    let got = lines(out)?;
    let want = vec![
        "0) Creative with ID 302 and name \"Creative #2\" was found.",
        "1) Creative with ID 304 and name \"Creative #4\" was found.",
        "2) Creative with ID 306 and name \"Creative #6\" was found.",
        "3) Creative with ID 308 and name \"Creative #8\" was found.",
        "4) Creative with ID 310 and name \"Creative #10\" was found.",
        "Number of results found: 5",
    ];
    assert_eq!(got, want);
    assert_eq!(offsets(&service), vec![Some(0), Some(2), Some(4)]);
    Ok(())
}

#[tokio::test]
async fn line_item_creative_associations() -> TestResult {
    let service = seeded();
    let mut out = Vec::new();
    samples::line_item_creative_associations::sample(&service, 5001, 500, &mut out).await?;
    let got = lines(out)?;
    let want = vec![
        "0) Line item creative association with line item ID 5001 and creative ID 301 was found.",
        "1) Line item creative association with line item ID 5001 and creative ID 302 was found.",
        "2) Line item creative association with line item ID 5001 and creative set ID 9001 was found.",
        "3) Line item creative association with line item ID 5001 and creative ID 304 was found.",
        "4) Line item creative association with line item ID 5001 and creative set ID 9002 was found.",
        "Number of results found: 5",
    ];
    assert_eq!(got, want);
    Ok(())
}

#[tokio::test]
async fn line_item_creative_associations_empty() -> TestResult {
    let service = seeded();
    let mut out = Vec::new();
    samples::line_item_creative_associations::sample(&service, 42, 500, &mut out).await?;
    assert_eq!(lines(out)?, vec!["Number of results found: 0"]);
    assert_eq!(offsets(&service), vec![Some(0)]);
    Ok(())
}

#[tokio::test]
async fn products() -> TestResult {
    let service = seeded();
    let mut out = Vec::new();
    samples::products::sample(&service, 80, 2, &mut out).await?;
    let got = lines(out)?;
    let want = vec![
        "0) Product with ID 702 and name \"Product #2\" was found.",
        "1) Product with ID 704 and name \"Product #4\" was found.",
        "2) Product with ID 706 and name \"Product #6\" was found.",
        "Number of results found: 3",
    ];
    assert_eq!(got, want);
    Ok(())
}

fn polling_options(limit: PollingLimit) -> PollingOptions {
    PollingOptions::new(limit).with_polling_backoff_policy(FixedDelay::new(Duration::from_secs(1)))
}

#[tokio::test(start_paused = true)]
async fn report_custom_fields() -> TestResult {
    let service = seeded();
    let mut out = Vec::new();
    let options = polling_options(PollingLimit::Attempts(10));
    let job = samples::report_custom_fields::sample(&service, 7001, 2, &options, &mut out).await?;
    assert_eq!(job.id, "report-1");
    assert_eq!(job.report_job_status, JobStatus::Completed);
    assert_eq!(job.report_query.custom_field_ids, vec![11, 12, 13]);

    let statement = &job.report_query.statement;
    assert_eq!(statement.query(), "WHERE orderId = :orderId");
    assert_eq!(statement.limit(), None);
    assert_eq!(statement.offset(), None);

    let want = vec![
        "Custom field ids found: [11, 12, 13]",
        "Report job with ID 'report-1' completed successfully.",
    ];
    assert_eq!(lines(out)?, want);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn report_custom_fields_failed() -> TestResult {
    let service = seeded();
    let mut out = Vec::new();
    let options = polling_options(PollingLimit::Elapsed(Duration::from_secs(60)));
    let job = samples::report_custom_fields::sample(&service, 7002, 500, &options, &mut out).await?;
    assert_eq!(job.report_job_status, JobStatus::Failed);
    let want = vec![
        "Custom field ids found: [14]",
        "Report job with ID 'report-1' failed to finish successfully.",
    ];
    assert_eq!(lines(out)?, want);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn report_custom_fields_limit() -> TestResult {
    let service = seeded();
    let mut out = Vec::new();
    let options = polling_options(PollingLimit::Attempts(3));
    let err = samples::report_custom_fields::sample(&service, 7001, 500, &options, &mut out)
        .await
        .unwrap_err();
    let err = err.downcast::<gax::error::Error>()?;
    assert!(err.is_exhausted(), "{err:?}");
    assert!(err.to_string().contains("report-1"), "{err}");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn report_custom_fields_quota_errors() -> TestResult {
    let service = FakeAdManager::new(Dataset {
        report_quota_errors: 2,
        ..Dataset::seeded()
    });
    let mut out = Vec::new();
    let options = polling_options(PollingLimit::Attempts(10));
    let job = samples::report_custom_fields::sample(&service, 7001, 500, &options, &mut out).await?;
    assert_eq!(job.report_job_status, JobStatus::Completed);
    Ok(())
}

#[tokio::test]
async fn remarketing() -> TestResult {
    use ads_guide_samples::fake::{RuleItem, RuleType, UserListStatus};

    let service = seeded();
    let now = chrono::NaiveDate::from_ymd_opt(2017, 5, 31)
        .and_then(|d| d.and_hms_opt(10, 11, 12))
        .expect("valid date and time");
    let mut out = Vec::new();
    let created = samples::remarketing::sample(&service, now, &mut out).await?;
    let got = lines(out)?;
    let want = vec![
        "User list added with ID 900001, name 'Expression based user list created at \
         20170531_101112', status 'OPEN', list type 'RULE_BASED', accountUserListStatus \
         'ACTIVE', description 'Users who checked out in three month window OR visited the \
         checkout page with more than one item in their cart.'.",
        "User list added with ID 900002, name 'Date rule user list created at \
         20170531_101112', status 'OPEN', list type 'RULE_BASED', accountUserListStatus \
         'ACTIVE', description 'Users who visited the site between 20170531 and 20171130 \
         and checked out in three month window OR visited the checkout page with more than \
         one item in their cart.'.",
    ];
    assert_eq!(got, want);
    assert_eq!(service.user_lists(), created);

    let date_specific = &created[1];
    assert_eq!(date_specific.status, UserListStatus::Open);
    assert_eq!(date_specific.start_date.as_deref(), Some("20170531"));
    assert_eq!(date_specific.end_date.as_deref(), Some("20171130"));
    let rule = date_specific.rule.as_ref().expect("lists carry their rule");
    assert_eq!(rule.rule_type, RuleType::Dnf);
    let dates: Vec<&str> = rule.groups[1]
        .items
        .iter()
        .filter_map(|item| match item {
            RuleItem::Date { value, .. } => Some(value.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(dates, vec!["20170531", "20170831"]);
    assert_eq!(created[0].rule, date_specific.rule);
    assert!(service.requests().is_empty());
    Ok(())
}

#[tokio::test]
async fn invalid_page_size() -> TestResult {
    let service = seeded();
    let mut out = Vec::new();
    let err = samples::placements::sample(&service, 0, &mut out).await.unwrap_err();
    let err = err.downcast::<statement::Error>()?;
    assert!(err.is_invalid_argument(), "{err:?}");
    assert!(service.requests().is_empty());
    Ok(())
}
