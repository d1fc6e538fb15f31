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

//! Runs the samples against an in-memory copy of an Ad Manager network.

mod args;

use ads_guide_samples::fake::{Dataset, FakeAdManager};
use ads_guide_samples::{
    activities, audience_segments, creatives, line_item_creative_associations, placements,
    products, remarketing, report_custom_fields,
};
use args::{Args, Recipe};
use clap::{Parser, ValueEnum};
use gax::options::{PollingLimit, PollingOptions};
use gax::polling_backoff_policy::FixedDelay;
use std::io::Write;

const DESCRIPTION: &str = concat!(
    "This program runs the paging and polling samples against a fake service.",
    " Use `--page-size` to observe how the results are split across pages,",
    " and `RUST_LOG=debug` to see each request."
);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = Args::parse();
    args.validate()?;
    if args.recipes.is_empty() {
        args.recipes = Recipe::value_variants().to_vec();
    }
    enable_tracing()?;
    tracing::info!("Configuration: {args:?}");

    let service = FakeAdManager::new(Dataset {
        report_job_polls: args.report_polls,
        ..Dataset::seeded()
    });
    let mut out = std::io::stdout().lock();
    for recipe in &args.recipes {
        writeln!(out, "{}", recipe.description())?;
        run(*recipe, &args, &service, &mut out).await?;
        writeln!(out)?;
    }
    tracing::info!("DONE");
    Ok(())
}

async fn run(
    recipe: Recipe,
    args: &Args,
    service: &FakeAdManager,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match recipe {
        Recipe::Placements => placements::sample(service, args.page_size, out).await,
        Recipe::Activities => activities::sample(service, args.page_size, out).await,
        Recipe::AudienceSegments => audience_segments::sample(service, args.page_size, out).await,
        Recipe::Creatives => creatives::sample(service, args.page_size, out).await,
        Recipe::Licas => {
            line_item_creative_associations::sample(
                service,
                args.line_item_id,
                args.page_size,
                out,
            )
            .await
        }
        Recipe::Products => {
            products::sample(service, args.product_template_id, args.page_size, out).await
        }
        Recipe::ReportCustomFields => {
            let options = PollingOptions::new(PollingLimit::Attempts(args.max_polls))
                .with_polling_backoff_policy(FixedDelay::new(args.poll_interval));
            report_custom_fields::sample(service, args.order_id, args.page_size, &options, out)
                .await
                .map(|_| ())
        }
        Recipe::Remarketing => {
            let now = chrono::Local::now().naive_local();
            remarketing::sample(service, now, out).await.map(|_| ())
        }
    }
}

fn enable_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    let subscriber = tracing_subscriber::fmt()
        .with_level(true)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
