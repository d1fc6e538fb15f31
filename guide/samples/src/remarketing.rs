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

//! Adds two rule-based remarketing user lists.
//!
//! The first list has no restrictions on the site visit date. The second one
//! only includes users who visit the site in the next six months.

use crate::fake::{FakeAdManager, UserList};
use std::io::Write;

/// # Parameters
/// - `service`: the user list service.
/// - `now`: the local time, used in the list names and the date rules.
/// - `out`: receives one line per created list.
pub async fn sample(
    service: &FakeAdManager,
    now: chrono::NaiveDateTime,
    out: &mut impl Write,
) -> anyhow::Result<Vec<UserList>> {
    use crate::fake::{
        DateOperator, NumberOperator, PrepopulationStatus, Rule, RuleItem, RuleItemGroup,
        RuleType, StringOperator, USER_LIST_DATE_FORMAT, UserListOperation,
    };
    use anyhow::Context;
    use chrono::Months;

    let today = now.date();
    let in_months = |months| {
        today
            .checked_add_months(Months::new(months))
            .with_context(|| format!("{today} plus {months} months is out of range"))
    };

    // Users who visited the checkout page with more than one item in their
    // cart.
    let checkout_multiple_items = RuleItemGroup::new([
        RuleItem::string("ecomm_pagetype", StringOperator::Equals, "checkout"),
        RuleItem::number("cartsize", NumberOperator::GreaterThan, 1.0),
    ]);
    // Users who check out within the next three months.
    let checked_out_next_three_months = RuleItemGroup::new([
        RuleItem::date("checkoutdate", DateOperator::After, today),
        RuleItem::date("checkoutdate", DateOperator::Before, in_months(3)?),
    ]);
    // DNF matches when at least one whole group matches. Date specific lists
    // only support DNF.
    let rule = Rule {
        groups: vec![checkout_multiple_items, checked_out_next_three_months],
        rule_type: RuleType::Dnf,
    };

    let created_at = now.format("%Y%m%d_%H%M%S");
    let expression = UserList {
        name: format!("Expression based user list created at {created_at}"),
        description: "Users who checked out in three month window OR visited the checkout \
                      page with more than one item in their cart."
            .into(),
        rule: Some(rule.clone()),
        prepopulation_status: PrepopulationStatus::Requested,
        ..UserList::default()
    };

    let start = today.format(USER_LIST_DATE_FORMAT).to_string();
    let end = in_months(6)?.format(USER_LIST_DATE_FORMAT).to_string();
    let date_specific = UserList {
        name: format!("Date rule user list created at {created_at}"),
        description: format!(
            "Users who visited the site between {start} and {end} and checked out in three \
             month window OR visited the checkout page with more than one item in their cart."
        ),
        rule: Some(rule),
        start_date: Some(start),
        end_date: Some(end),
        ..UserList::default()
    };

    let created = service
        .mutate_user_lists(vec![
            UserListOperation::add(expression),
            UserListOperation::add(date_specific),
        ])
        .await
        .context("failed to add rule based user lists")?;
    for list in &created {
        writeln!(
            out,
            "User list added with ID {}, name '{}', status '{}', list type '{}', \
             accountUserListStatus '{}', description '{}'.",
            list.id,
            list.name,
            list.status,
            list.list_type,
            list.account_user_list_status,
            list.description
        )?;
    }
    Ok(created)
}
