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

//! Gets all image creatives in a single call.

use crate::fake::FakeAdManager;
use std::io::Write;

/// # Parameters
/// - `service`: the creative service.
/// - `page_size`: the number of creatives requested in each page.
/// - `out`: receives one line per creative, and a summary.
pub async fn sample(
    service: &FakeAdManager,
    page_size: u32,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    use gax::paginator::fetch_all;
    use statement::StatementBuilder;

    let builder = StatementBuilder::new()
        .with_where("creativeType = :creativeType")
        .with_order_by("id ASC")
        .with_limit(page_size)?
        .add_value("creativeType", "ImageCreative");

    let creatives = fetch_all(builder, |statement| {
        service.get_creatives_by_statement(statement)
    })
    .await?;
    for (i, creative) in creatives.iter().enumerate() {
        writeln!(
            out,
            "{i}) Creative with ID {} and name \"{}\" was found.",
            creative.id, creative.name
        )?;
    }
    writeln!(out, "Number of results found: {}", creatives.len())?;
    Ok(())
}
