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

//! Samples for the statement paging and job polling helpers.
//!
//! Each sample runs against [fake::FakeAdManager], an in-memory service with
//! the same paging behavior as the Ad Manager list methods. The
//! `ads-samples` binary runs them against [fake::Dataset::seeded].

pub mod fake;

pub mod activities;
pub mod audience_segments;
pub mod creatives;
pub mod line_item_creative_associations;
pub mod placements;
pub mod products;
pub mod remarketing;
pub mod report_custom_fields;
