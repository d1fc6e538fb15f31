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

//! Gets all placements, one page at a time.

use crate::fake::FakeAdManager;
use std::io::Write;

/// # Parameters
/// - `service`: the placement service.
/// - `page_size`: the number of placements requested in each page.
/// - `out`: receives one line per placement, and a summary.
pub async fn sample(
    service: &FakeAdManager,
    page_size: u32,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    // ANCHOR: use
    use gax::paginator::Paginator;
    use statement::StatementBuilder;
    // ANCHOR_END: use

    // ANCHOR: paginator
    let builder = StatementBuilder::new()
        .with_order_by("id ASC")
        .with_limit(page_size)?;
    let client = service.clone();
    let mut pages = Paginator::new(builder, move |statement| {
        let client = client.clone();
        async move { client.get_placements_by_statement(statement).await }
    });
    // ANCHOR_END: paginator

    // ANCHOR: iterate-pages
    let mut total = 0;
    while let Some(page) = pages.next().await {
        let page = page?;
        let Some(results) = page.results.as_deref() else {
            continue;
        };
        for (i, placement) in (page.start_index..).zip(results) {
            writeln!(
                out,
                "{i}) Placement with ID {} and name \"{}\" was found.",
                placement.id, placement.name
            )?;
        }
        total = page.total_result_set_size;
    }
    writeln!(out, "Number of results found: {total}")?;
    // ANCHOR_END: iterate-pages
    Ok(())
}
