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

//! Gets all audience segments, iterating over the items instead of the
//! pages.

use crate::fake::FakeAdManager;
use std::io::Write;

/// # Parameters
/// - `service`: the audience segment service.
/// - `page_size`: the number of segments requested in each page.
/// - `out`: receives one line per segment, and a summary.
pub async fn sample(
    service: &FakeAdManager,
    page_size: u32,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    use gax::paginator::Paginator;
    use statement::StatementBuilder;

    let builder = StatementBuilder::new()
        .with_order_by("id ASC")
        .with_limit(page_size)?;
    let client = service.clone();
    // ANCHOR: iterate-items
    let mut items = Paginator::new(builder, move |statement| {
        let client = client.clone();
        async move { client.get_audience_segments_by_statement(statement).await }
    })
    .items();
    let mut count = 0;
    while let Some(segment) = items.next().await.transpose()? {
        writeln!(
            out,
            "{count}) Audience segment with ID {}, name \"{}\", and size {} was found.",
            segment.id, segment.name, segment.size
        )?;
        count += 1;
    }
    // ANCHOR_END: iterate-items
    writeln!(out, "Number of results found: {count}")?;
    Ok(())
}
