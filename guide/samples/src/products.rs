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

//! Gets the products created from a product template.

use crate::fake::{FakeAdManager, Product};
use gax::paginator::Page;
use std::io::Write;

/// # Parameters
/// - `service`: the product service.
/// - `product_template_id`: the template of the products.
/// - `page_size`: the number of products requested in each page.
/// - `out`: receives one line per product, and a summary.
pub async fn sample(
    service: &FakeAdManager,
    product_template_id: i64,
    page_size: u32,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    use gax::paginator::for_each_page;
    use statement::StatementBuilder;

    let builder = StatementBuilder::new()
        .with_where("productTemplateId = :productTemplateId")
        .with_order_by("id ASC")
        .with_limit(page_size)?
        .add_value("productTemplateId", product_template_id);

    let mut lines = Vec::new();
    let summary = for_each_page(
        builder,
        |statement| service.get_products_by_statement(statement),
        |page: &Page<Product>| {
            lines.extend((page.start_index..).zip(page.results.iter().flatten()).map(
                |(i, product)| {
                    format!(
                        "{i}) Product with ID {} and name \"{}\" was found.",
                        product.id, product.name
                    )
                },
            ));
        },
    )
    .await?;
    for line in lines {
        writeln!(out, "{line}")?;
    }
    writeln!(
        out,
        "Number of results found: {}",
        summary.total_result_set_size
    )?;
    Ok(())
}
