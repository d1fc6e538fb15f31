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

//! Runs a report that includes the custom fields found in the line items of
//! an order.
//!
//! The sample first collects the custom field ids used by the line items,
//! then reuses the same filter, without limit or offset, as the report
//! statement. Finally, it polls the report job until it is done.

use crate::fake::{
    Column, DateRangeType, Dimension, FakeAdManager, LineItem, ReportJob, ReportQuery,
};
use gax::options::PollingOptions;
use lro::JobStatus;
use std::io::Write;

/// # Parameters
/// - `service`: the line item and report services.
/// - `order_id`: the order containing the line items.
/// - `page_size`: the number of line items requested in each page.
/// - `options`: how often, and how long, to wait for the report.
/// - `out`: receives the custom field ids and the outcome of the report.
///
/// Returns the report job in its terminal state.
pub async fn sample(
    service: &FakeAdManager,
    order_id: i64,
    page_size: u32,
    options: &PollingOptions,
    out: &mut impl Write,
) -> anyhow::Result<ReportJob> {
    use gax::accumulator::collect_distinct;
    use lro::{Poller, new_poller};
    use statement::StatementBuilder;

    // ANCHOR: collect-custom-fields
    let mut builder = StatementBuilder::new()
        .with_where("orderId = :orderId")
        .with_limit(page_size)?
        .add_value("orderId", order_id);
    let custom_field_ids = collect_distinct(
        builder.clone(),
        |statement| service.get_line_items_by_statement(statement),
        |line_item: &LineItem| {
            line_item
                .custom_field_values
                .iter()
                .map(|v| v.custom_field_id)
                .collect::<Vec<_>>()
        },
    )
    .await?;
    writeln!(out, "Custom field ids found: {custom_field_ids:?}")?;
    // ANCHOR_END: collect-custom-fields

    // ANCHOR: report-statement
    builder.remove_limit_and_offset();
    let report_query = ReportQuery::new()
        .set_date_range_type(DateRangeType::LastMonth)
        .set_dimensions([Dimension::LineItemId, Dimension::LineItemName])
        .set_columns([Column::AdServerImpressions])
        .set_custom_field_ids(custom_field_ids)
        .set_statement(builder.build());
    // ANCHOR_END: report-statement

    // ANCHOR: poll
    let job = new_poller(
        options,
        move || service.run_report_job(ReportJob::new(report_query)),
        move |id| service.get_report_job(id),
    )
    .until_done()
    .await?;
    // ANCHOR_END: poll

    if job.report_job_status == JobStatus::Failed {
        writeln!(
            out,
            "Report job with ID '{}' failed to finish successfully.",
            job.id
        )?;
    } else {
        writeln!(out, "Report job with ID '{}' completed successfully.", job.id)?;
    }
    Ok(job)
}
