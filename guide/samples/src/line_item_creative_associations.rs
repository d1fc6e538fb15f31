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

//! Gets the line item creative associations (LICAs) for a line item.

use crate::fake::FakeAdManager;
use std::io::Write;

/// # Parameters
/// - `service`: the line item creative association service.
/// - `line_item_id`: the line item to query.
/// - `page_size`: the number of associations requested in each page.
/// - `out`: receives one line per association, and a summary.
pub async fn sample(
    service: &FakeAdManager,
    line_item_id: i64,
    page_size: u32,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    use futures::StreamExt;
    use gax::paginator::Paginator;
    use statement::StatementBuilder;

    let builder = StatementBuilder::new()
        .with_where("lineItemId = :lineItemId")
        .with_order_by("ORDER BY lineItemId ASC, creativeId ASC")
        .with_limit(page_size)?
        .add_value("lineItemId", line_item_id);
    let client = service.clone();
    let mut stream = Paginator::new(builder, move |statement| {
        let client = client.clone();
        async move {
            client
                .get_line_item_creative_associations_by_statement(statement)
                .await
        }
    })
    .into_stream();

    let mut total = 0;
    while let Some(page) = stream.next().await {
        let page = page?;
        for (i, lica) in (page.start_index..).zip(page.results.iter().flatten()) {
            if lica.creative_set_id != 0 {
                writeln!(
                    out,
                    "{i}) Line item creative association with line item ID {} and creative set ID {} was found.",
                    lica.line_item_id, lica.creative_set_id
                )?;
            } else {
                writeln!(
                    out,
                    "{i}) Line item creative association with line item ID {} and creative ID {} was found.",
                    lica.line_item_id, lica.creative_id
                )?;
            }
        }
        if page.results.is_some() {
            total = page.total_result_set_size;
        }
    }
    writeln!(out, "Number of results found: {total}")?;
    Ok(())
}
