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

//! An in-memory stand-in for the Ad Manager services used by the samples.
//!
//! The services evaluate a subset of the query language, enough for the
//! filters and orderings in the samples, and page through the results like
//! the real services do.

mod model;
mod pql;

pub use model::*;

use gax::Result;
use gax::error::Error;
use gax::error::api::{ApiError, ApiException};
use gax::paginator::Page;
use lro::JobStatus;
use statement::Statement;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// The entities served by a [FakeAdManager], and the behavior of its report
/// jobs.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    pub placements: Vec<Placement>,
    pub activities: Vec<Activity>,
    pub line_item_creative_associations: Vec<LineItemCreativeAssociation>,
    pub creatives: Vec<Creative>,
    pub audience_segments: Vec<AudienceSegment>,
    pub products: Vec<Product>,
    pub line_items: Vec<LineItem>,
    pub custom_fields: Vec<CustomField>,
    /// How many times a report job is reported as in progress before it
    /// reaches a terminal status.
    pub report_job_polls: u32,
    /// How many report job queries fail with a quota error before the
    /// service answers normally.
    pub report_quota_errors: u32,
}

impl Dataset {
    /// A small, deterministic network used by the `ads-samples` binary and
    /// the tests.
    ///
    /// Line items in order 7001 use custom fields 11, 12 and 13. The line
    /// items in order 7002 use custom field 14, which does not exist, so
    /// reports for that order fail.
    pub fn seeded() -> Self {
        let placements = (1..=12)
            .map(|i| Placement {
                id: 100 + i,
                name: format!("Placement #{i}"),
                description: format!("Inventory slot {i}"),
                status: if i % 4 == 0 {
                    InventoryStatus::Inactive
                } else {
                    InventoryStatus::Active
                },
            })
            .collect();
        let activities = (1..=9)
            .map(|i| Activity {
                id: 200 + i,
                activity_group_id: 20 + i % 2,
                name: format!("Activity #{i}"),
                activity_type: if i % 3 == 0 { "PAGE_VIEWS" } else { "DAILY_VISITS" }
                    .to_string(),
                status: if i % 3 == 1 {
                    ActivityStatus::Inactive
                } else {
                    ActivityStatus::Active
                },
            })
            .collect();
        let line_item_creative_associations = [
            (5001, 301, 0),
            (5001, 302, 0),
            (5001, 303, 9001),
            (5001, 304, 0),
            (5001, 305, 9002),
            (5002, 306, 0),
            (5002, 307, 0),
        ]
        .into_iter()
        .map(|(line_item_id, creative_id, creative_set_id)| LineItemCreativeAssociation {
            line_item_id,
            creative_id,
            creative_set_id,
            status: LineItemCreativeAssociationStatus::Active,
        })
        .collect();
        let creative_types = ["ImageCreative", "VideoCreative", "ImageCreative", "TemplateCreative"];
        let creatives = (1..=10)
            .map(|i| Creative {
                id: 300 + i,
                name: format!("Creative #{i}"),
                advertiser_id: 4000 + i % 3,
                creative_type: creative_types[(i as usize) % creative_types.len()].to_string(),
            })
            .collect();
        let audience_segments = (1..=6)
            .map(|i| AudienceSegment {
                id: 600 + i,
                name: format!("Segment #{i}"),
                segment_type: if i % 2 == 0 { "RULE_BASED" } else { "SHARED" }.to_string(),
                size: 1000 * i,
            })
            .collect();
        let products = (1..=7)
            .map(|i| Product {
                id: 700 + i,
                name: format!("Product #{i}"),
                product_template_id: 80 + i % 2,
                status: ProductStatus::Active,
            })
            .collect();
        let custom_value = |custom_field_id| CustomFieldValue {
            custom_field_id,
            value: format!("value-{custom_field_id}"),
        };
        let line_items = vec![
            LineItem {
                id: 5001,
                order_id: 7001,
                name: "Line item #1".to_string(),
                custom_field_values: vec![custom_value(11), custom_value(12)],
            },
            LineItem {
                id: 5002,
                order_id: 7001,
                name: "Line item #2".to_string(),
                custom_field_values: vec![custom_value(12), custom_value(13)],
            },
            LineItem {
                id: 5003,
                order_id: 7001,
                name: "Line item #3".to_string(),
                custom_field_values: Vec::new(),
            },
            LineItem {
                id: 5004,
                order_id: 7002,
                name: "Line item #4".to_string(),
                custom_field_values: vec![custom_value(14)],
            },
        ];
        let custom_fields = (11..=13)
            .map(|id| CustomField {
                id,
                name: format!("Custom field #{id}"),
            })
            .collect();
        Self {
            placements,
            activities,
            line_item_creative_associations,
            creatives,
            audience_segments,
            products,
            line_items,
            custom_fields,
            report_job_polls: 2,
            report_quota_errors: 0,
        }
    }
}

const FIRST_USER_LIST_ID: i64 = 900_001;

/// An in-memory implementation of the services used in the samples.
///
/// Clones share the same state.
#[derive(Clone, Debug)]
pub struct FakeAdManager {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    dataset: Dataset,
    requests: Mutex<Vec<Statement>>,
    jobs: Mutex<HashMap<String, RunningJob>>,
    next_job: AtomicU64,
    quota_errors: Mutex<u32>,
    user_lists: Mutex<Vec<UserList>>,
    next_user_list: AtomicI64,
}

#[derive(Debug)]
struct RunningJob {
    job: ReportJob,
    remaining_polls: u32,
}

impl FakeAdManager {
    pub fn new(dataset: Dataset) -> Self {
        let quota_errors = dataset.report_quota_errors;
        Self {
            inner: Arc::new(Inner {
                dataset,
                requests: Mutex::new(Vec::new()),
                jobs: Mutex::new(HashMap::new()),
                next_job: AtomicU64::new(1),
                quota_errors: Mutex::new(quota_errors),
                user_lists: Mutex::new(Vec::new()),
                next_user_list: AtomicI64::new(FIRST_USER_LIST_ID),
            }),
        }
    }

    /// The statements received so far, in order.
    pub fn requests(&self) -> Vec<Statement> {
        lock(&self.inner.requests).clone()
    }

    pub async fn get_placements_by_statement(&self, statement: Statement) -> Result<Page<Placement>> {
        self.execute(&self.inner.dataset.placements, statement)
    }

    pub async fn get_activities_by_statement(&self, statement: Statement) -> Result<Page<Activity>> {
        self.execute(&self.inner.dataset.activities, statement)
    }

    pub async fn get_line_item_creative_associations_by_statement(
        &self,
        statement: Statement,
    ) -> Result<Page<LineItemCreativeAssociation>> {
        self.execute(&self.inner.dataset.line_item_creative_associations, statement)
    }

    pub async fn get_creatives_by_statement(&self, statement: Statement) -> Result<Page<Creative>> {
        self.execute(&self.inner.dataset.creatives, statement)
    }

    pub async fn get_audience_segments_by_statement(
        &self,
        statement: Statement,
    ) -> Result<Page<AudienceSegment>> {
        self.execute(&self.inner.dataset.audience_segments, statement)
    }

    pub async fn get_products_by_statement(&self, statement: Statement) -> Result<Page<Product>> {
        self.execute(&self.inner.dataset.products, statement)
    }

    pub async fn get_line_items_by_statement(&self, statement: Statement) -> Result<Page<LineItem>> {
        self.execute(&self.inner.dataset.line_items, statement)
    }

    /// Starts a report job.
    ///
    /// The returned job has a service-assigned id and is in progress. It
    /// fails once it finishes if the query references unknown custom fields.
    pub async fn run_report_job(&self, mut job: ReportJob) -> Result<ReportJob> {
        pql::validate(&job.report_query.statement)?;
        let id = format!("report-{}", self.inner.next_job.fetch_add(1, Ordering::Relaxed));
        job.id = id.clone();
        job.report_job_status = JobStatus::InProgress;
        tracing::debug!(job_id = %id, "report job started");
        lock(&self.inner.jobs).insert(
            id,
            RunningJob {
                job: job.clone(),
                remaining_polls: self.inner.dataset.report_job_polls,
            },
        );
        Ok(job)
    }

    /// Returns the current state of a report job.
    pub async fn get_report_job(&self, job_id: String) -> Result<ReportJob> {
        {
            let mut quota_errors = lock(&self.inner.quota_errors);
            if *quota_errors > 0 {
                *quota_errors -= 1;
                return Err(api_error("QuotaError.EXCEEDED_QUOTA", &job_id));
            }
        }
        let mut jobs = lock(&self.inner.jobs);
        let Some(running) = jobs.get_mut(&job_id) else {
            return Err(api_error("ReportError.REPORT_NOT_FOUND", &job_id));
        };
        if running.remaining_polls > 0 {
            running.remaining_polls -= 1;
        } else if !running.job.report_job_status.is_terminal() {
            let known = |id: &i64| self.inner.dataset.custom_fields.iter().any(|f| f.id == *id);
            running.job.report_job_status =
                if running.job.report_query.custom_field_ids.iter().all(known) {
                    JobStatus::Completed
                } else {
                    JobStatus::Failed
                };
        }
        Ok(running.job.clone())
    }

    /// Applies `operations` to the rule-based user lists of the account.
    ///
    /// Only `ADD` is supported. The operations are validated before any of
    /// them is applied, so a failed request creates no lists. The created
    /// lists are open and active, and are returned in request order.
    pub async fn mutate_user_lists(
        &self,
        operations: Vec<UserListOperation>,
    ) -> Result<Vec<UserList>> {
        for (i, operation) in operations.iter().enumerate() {
            validate_user_list(i, operation)?;
        }
        let created: Vec<UserList> = operations
            .into_iter()
            .map(|operation| UserList {
                id: self.inner.next_user_list.fetch_add(1, Ordering::Relaxed),
                status: UserListStatus::Open,
                list_type: UserListType::RuleBased,
                account_user_list_status: AccountUserListStatus::Active,
                ..operation.operand
            })
            .collect();
        for list in &created {
            tracing::debug!(id = list.id, name = %list.name, "user list created");
        }
        lock(&self.inner.user_lists).extend(created.iter().cloned());
        Ok(created)
    }

    /// The user lists created so far.
    pub fn user_lists(&self) -> Vec<UserList> {
        lock(&self.inner.user_lists).clone()
    }

    fn execute<T>(&self, rows: &[T], statement: Statement) -> Result<Page<T>>
    where
        T: Row + Clone,
    {
        tracing::debug!(query = %statement.query(), "list request");
        let page = pql::execute(rows, &statement);
        lock(&self.inner.requests).push(statement);
        page
    }
}

fn validate_user_list(index: usize, operation: &UserListOperation) -> Result<()> {
    let trigger = |field: &str| format!("operations[{index}].operand.{field}");
    if operation.operator != Operator::Add {
        return Err(api_error(
            "OperatorError.OPERATOR_NOT_SUPPORTED",
            &format!("operations[{index}].operator"),
        ));
    }
    let list = &operation.operand;
    if list.name.trim().is_empty() {
        return Err(api_error("UserListError.NAME_REQUIRED", &trigger("name")));
    }
    let Some(rule) = &list.rule else {
        return Err(api_error("RuleBasedUserListError.RULE_REQUIRED", &trigger("rule")));
    };
    if rule.groups.iter().all(|g| g.items.is_empty()) {
        return Err(api_error("RuleBasedUserListError.EMPTY_RULE", &trigger("rule")));
    }
    if list.is_date_specific() {
        // Date specific lists only accept rules in disjunctive normal form.
        if rule.rule_type != RuleType::Dnf {
            return Err(api_error(
                "RuleBasedUserListError.INVALID_RULE_TYPE",
                &trigger("rule.ruleType"),
            ));
        }
        let dates = [&list.start_date, &list.end_date];
        for date in dates.into_iter().flatten() {
            if chrono::NaiveDate::parse_from_str(date, USER_LIST_DATE_FORMAT).is_err() {
                return Err(api_error("DateError.INVALID_DATE", date));
            }
        }
        if matches!((&list.start_date, &list.end_date), (Some(start), Some(end)) if start > end) {
            return Err(api_error(
                "UserListError.INVALID_DATE_RANGE",
                &trigger("endDate"),
            ));
        }
    }
    Ok(())
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

fn api_error(error_string: &str, trigger: &str) -> Error {
    Error::service(
        ApiException::new()
            .set_message(format!("[{error_string} @ {trigger}]"))
            .set_errors([ApiError::new()
                .set_error_string(error_string)
                .set_trigger(trigger)]),
    )
}
