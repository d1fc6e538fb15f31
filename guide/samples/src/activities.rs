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

//! Gets all active activities, visiting each page.

use crate::fake::{Activity, ActivityStatus, FakeAdManager};
use gax::paginator::Page;
use std::io::Write;

/// # Parameters
/// - `service`: the activity service.
/// - `page_size`: the number of activities requested in each page.
/// - `out`: receives one line per activity, and a summary.
pub async fn sample(
    service: &FakeAdManager,
    page_size: u32,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    use gax::paginator::for_each_page;
    use statement::StatementBuilder;

    let builder = StatementBuilder::new()
        .with_where("WHERE status = :status")
        .with_order_by("id ASC")
        .with_limit(page_size)?
        .add_value("status", ActivityStatus::Active);

    // The visitor cannot return errors, keep the first one.
    let mut written = Ok(());
    let summary = for_each_page(
        builder,
        |statement| service.get_activities_by_statement(statement),
        |page: &Page<Activity>| {
            if written.is_ok() {
                written = write_page(out, page);
            }
        },
    )
    .await?;
    written?;
    writeln!(
        out,
        "Number of results found: {}",
        summary.total_result_set_size
    )?;
    Ok(())
}

fn write_page(out: &mut impl Write, page: &Page<Activity>) -> std::io::Result<()> {
    for (i, activity) in (page.start_index..).zip(page.results.iter().flatten()) {
        writeln!(
            out,
            "{i}) Activity with ID {}, name \"{}\", and type \"{}\" was found.",
            activity.id, activity.name, activity.activity_type
        )?;
    }
    Ok(())
}
