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

use anyhow::bail;
use clap::Parser;
use humantime::parse_duration;
use statement::{SUGGESTED_PAGE_LIMIT, StatementBuilder};
use std::time::Duration;

/// Configuration options for the samples.
#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = super::DESCRIPTION)]
pub struct Args {
    /// The number of entities requested in each page.
    #[arg(long, default_value_t = SUGGESTED_PAGE_LIMIT)]
    pub page_size: u32,

    /// The order used by the custom fields report.
    #[arg(long, default_value_t = 7001)]
    pub order_id: i64,

    /// The line item used by the line item creative associations sample.
    #[arg(long, default_value_t = 5001)]
    pub line_item_id: i64,

    /// The product template used by the products sample.
    #[arg(long, default_value_t = 80)]
    pub product_template_id: i64,

    /// The delay between queries of the report job status.
    #[arg(long, value_parser = parse_duration, default_value = "1s")]
    pub poll_interval: Duration,

    /// The maximum number of report job requests, including the request
    /// that starts the job.
    #[arg(long, default_value_t = 20)]
    pub max_polls: u32,

    /// How many times the fake service reports a job as in progress.
    #[arg(long, default_value_t = 2)]
    pub report_polls: u32,

    /// The samples to run. Runs all of them if empty.
    pub recipes: Vec<Recipe>,
}

impl Args {
    /// Validates the arguments after parsing.
    pub fn validate(&self) -> anyhow::Result<()> {
        StatementBuilder::new().with_limit(self.page_size)?;
        if self.max_polls == 0 {
            bail!("invalid number of polls, should be > 0")
        }
        Ok(())
    }
}

/// The available samples.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum Recipe {
    Placements,
    Activities,
    AudienceSegments,
    Creatives,
    Licas,
    Products,
    ReportCustomFields,
    Remarketing,
}

impl Recipe {
    pub fn description(&self) -> &'static str {
        match self {
            Self::Placements => "Gets all placements.",
            Self::Activities => "Gets all active activities.",
            Self::AudienceSegments => "Gets all audience segments.",
            Self::Creatives => "Gets all image creatives.",
            Self::Licas => "Gets all line item creative associations for a line item.",
            Self::Products => "Gets all products created from a product template.",
            Self::ReportCustomFields => {
                "Runs a report with the custom fields found in the line items of an order."
            }
            Self::Remarketing => "Adds two rule-based remarketing user lists.",
        }
    }
}
