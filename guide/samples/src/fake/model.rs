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

//! The entities served by [FakeAdManager][super::FakeAdManager].
//!
//! The field names follow the Ad Manager API. Each entity implements [Row],
//! which maps the filterable columns to bind values.

use lro::{JobOperation, JobStatus};
use serde::{Deserialize, Serialize};
use statement::{Statement, Value};

/// An entity that can be filtered and sorted by a statement.
pub trait Row {
    /// The columns accepted in `WHERE` and `ORDER BY` clauses.
    const COLUMNS: &'static [&'static str];

    /// Returns the value of `column`, which is always one of [Row::COLUMNS].
    fn column(&self, column: &str) -> Option<Value>;
}

macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            #[default]
            $($variant),+
        }

        impl $name {
            /// The name of the value on the wire.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for Value {
            fn from(v: $name) -> Value {
                Value::from(v.as_str())
            }
        }
    };
}

wire_enum!(
    /// The status of inventory, such as placements.
    InventoryStatus {
        Active => "ACTIVE",
        Inactive => "INACTIVE",
        Archived => "ARCHIVED",
    }
);

wire_enum!(ActivityStatus {
    Active => "ACTIVE",
    Inactive => "INACTIVE",
});

wire_enum!(LineItemCreativeAssociationStatus {
    Active => "ACTIVE",
    NotServing => "NOT_SERVING",
    Inactive => "INACTIVE",
});

wire_enum!(ProductStatus {
    Active => "ACTIVE",
    Inactive => "INACTIVE",
    Archived => "ARCHIVED",
});

wire_enum!(Dimension {
    LineItemId => "LINE_ITEM_ID",
    LineItemName => "LINE_ITEM_NAME",
    OrderId => "ORDER_ID",
});

wire_enum!(Column {
    AdServerImpressions => "AD_SERVER_IMPRESSIONS",
    AdServerClicks => "AD_SERVER_CLICKS",
});

wire_enum!(DateRangeType {
    LastMonth => "LAST_MONTH",
    LastWeek => "LAST_WEEK",
    Yesterday => "YESTERDAY",
});

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Placement {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub status: InventoryStatus,
}

impl Row for Placement {
    const COLUMNS: &'static [&'static str] = &["id", "name", "description", "status"];

    fn column(&self, column: &str) -> Option<Value> {
        match column {
            "id" => Some(self.id.into()),
            "name" => Some(self.name.as_str().into()),
            "description" => Some(self.description.as_str().into()),
            "status" => Some(self.status.into()),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Activity {
    pub id: i64,
    pub activity_group_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub status: ActivityStatus,
}

impl Row for Activity {
    const COLUMNS: &'static [&'static str] = &["id", "activityGroupId", "name", "type", "status"];

    fn column(&self, column: &str) -> Option<Value> {
        match column {
            "id" => Some(self.id.into()),
            "activityGroupId" => Some(self.activity_group_id.into()),
            "name" => Some(self.name.as_str().into()),
            "type" => Some(self.activity_type.as_str().into()),
            "status" => Some(self.status.into()),
            _ => None,
        }
    }
}

/// Associates a creative, or a creative set, with a line item.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineItemCreativeAssociation {
    pub line_item_id: i64,
    pub creative_id: i64,
    /// Zero unless the association is for a creative set.
    pub creative_set_id: i64,
    pub status: LineItemCreativeAssociationStatus,
}

impl Row for LineItemCreativeAssociation {
    const COLUMNS: &'static [&'static str] =
        &["lineItemId", "creativeId", "creativeSetId", "status"];

    fn column(&self, column: &str) -> Option<Value> {
        match column {
            "lineItemId" => Some(self.line_item_id.into()),
            "creativeId" => Some(self.creative_id.into()),
            "creativeSetId" => Some(self.creative_set_id.into()),
            "status" => Some(self.status.into()),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Creative {
    pub id: i64,
    pub name: String,
    pub advertiser_id: i64,
    /// The concrete creative type, for example `ImageCreative`.
    pub creative_type: String,
}

impl Row for Creative {
    const COLUMNS: &'static [&'static str] = &["id", "name", "advertiserId", "creativeType"];

    fn column(&self, column: &str) -> Option<Value> {
        match column {
            "id" => Some(self.id.into()),
            "name" => Some(self.name.as_str().into()),
            "advertiserId" => Some(self.advertiser_id.into()),
            "creativeType" => Some(self.creative_type.as_str().into()),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AudienceSegment {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub segment_type: String,
    pub size: i64,
}

impl Row for AudienceSegment {
    const COLUMNS: &'static [&'static str] = &["id", "name", "type", "size"];

    fn column(&self, column: &str) -> Option<Value> {
        match column {
            "id" => Some(self.id.into()),
            "name" => Some(self.name.as_str().into()),
            "type" => Some(self.segment_type.as_str().into()),
            "size" => Some(self.size.into()),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub product_template_id: i64,
    pub status: ProductStatus,
}

impl Row for Product {
    const COLUMNS: &'static [&'static str] = &["id", "name", "productTemplateId", "status"];

    fn column(&self, column: &str) -> Option<Value> {
        match column {
            "id" => Some(self.id.into()),
            "name" => Some(self.name.as_str().into()),
            "productTemplateId" => Some(self.product_template_id.into()),
            "status" => Some(self.status.into()),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomFieldValue {
    pub custom_field_id: i64,
    pub value: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineItem {
    pub id: i64,
    pub order_id: i64,
    pub name: String,
    pub custom_field_values: Vec<CustomFieldValue>,
}

impl Row for LineItem {
    const COLUMNS: &'static [&'static str] = &["id", "orderId", "name"];

    fn column(&self, column: &str) -> Option<Value> {
        match column {
            "id" => Some(self.id.into()),
            "orderId" => Some(self.order_id.into()),
            "name" => Some(self.name.as_str().into()),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomField {
    pub id: i64,
    pub name: String,
}

/// The definition of a report.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub dimensions: Vec<Dimension>,
    pub columns: Vec<Column>,
    pub date_range_type: DateRangeType,
    pub custom_field_ids: Vec<i64>,
    pub statement: Statement,
}

impl ReportQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_dimensions<I: IntoIterator<Item = Dimension>>(mut self, v: I) -> Self {
        self.dimensions = v.into_iter().collect();
        self
    }

    pub fn set_columns<I: IntoIterator<Item = Column>>(mut self, v: I) -> Self {
        self.columns = v.into_iter().collect();
        self
    }

    pub fn set_date_range_type(mut self, v: DateRangeType) -> Self {
        self.date_range_type = v;
        self
    }

    pub fn set_custom_field_ids<I: IntoIterator<Item = i64>>(mut self, v: I) -> Self {
        self.custom_field_ids = v.into_iter().collect();
        self
    }

    pub fn set_statement(mut self, v: Statement) -> Self {
        self.statement = v;
        self
    }
}

/// A report job. The service assigns the id when the job starts.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportJob {
    pub id: String,
    pub report_query: ReportQuery,
    pub report_job_status: JobStatus,
}

impl ReportJob {
    pub fn new(report_query: ReportQuery) -> Self {
        Self {
            id: String::new(),
            report_query,
            report_job_status: JobStatus::Submitted,
        }
    }
}

impl JobOperation for ReportJob {
    fn job_id(&self) -> Option<&str> {
        Some(self.id.as_str()).filter(|id| !id.is_empty())
    }

    fn status(&self) -> JobStatus {
        self.report_job_status
    }
}

wire_enum!(StringOperator {
    Equals => "EQUALS",
    Contains => "CONTAINS",
    StartsWith => "STARTS_WITH",
});

wire_enum!(NumberOperator {
    GreaterThan => "GREATER_THAN",
    Equals => "EQUALS",
    LessThan => "LESS_THAN",
});

wire_enum!(DateOperator {
    After => "AFTER",
    Before => "BEFORE",
    Equals => "EQUALS",
});

wire_enum!(
    /// How the groups of a [Rule] combine. With `Dnf` one whole group must
    /// match, with `Cnf` one item in each group must match.
    RuleType {
        Dnf => "DNF",
        Cnf => "CNF",
    }
);

wire_enum!(PrepopulationStatus {
    None => "NONE",
    Requested => "REQUESTED",
    Finished => "FINISHED",
});

wire_enum!(UserListStatus {
    Open => "OPEN",
    Closed => "CLOSED",
});

wire_enum!(AccountUserListStatus {
    Active => "ACTIVE",
    Inactive => "INACTIVE",
});

wire_enum!(UserListType {
    Unknown => "UNKNOWN",
    RuleBased => "RULE_BASED",
    Remarketing => "REMARKETING",
});

wire_enum!(Operator {
    Add => "ADD",
    Set => "SET",
    Remove => "REMOVE",
});

/// The date format used by rule items and user lists.
pub const USER_LIST_DATE_FORMAT: &str = "%Y%m%d";

/// One condition on a key collected from the site visitors.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum RuleItem {
    #[serde(rename = "StringRuleItem")]
    String {
        key: String,
        op: StringOperator,
        value: String,
    },
    #[serde(rename = "NumberRuleItem")]
    Number {
        key: String,
        op: NumberOperator,
        value: f64,
    },
    #[serde(rename = "DateRuleItem")]
    Date {
        key: String,
        op: DateOperator,
        value: String,
    },
}

impl RuleItem {
    pub fn string<K: Into<String>, V: Into<String>>(key: K, op: StringOperator, value: V) -> Self {
        Self::String {
            key: key.into(),
            op,
            value: value.into(),
        }
    }

    pub fn number<K: Into<String>>(key: K, op: NumberOperator, value: f64) -> Self {
        Self::Number {
            key: key.into(),
            op,
            value,
        }
    }

    pub fn date<K: Into<String>>(key: K, op: DateOperator, value: chrono::NaiveDate) -> Self {
        Self::Date {
            key: key.into(),
            op,
            value: value.format(USER_LIST_DATE_FORMAT).to_string(),
        }
    }
}

/// Rule items that are AND-ed together.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RuleItemGroup {
    pub items: Vec<RuleItem>,
}

impl RuleItemGroup {
    pub fn new<I: IntoIterator<Item = RuleItem>>(items: I) -> Self {
        Self {
            items: items.into_iter().collect(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Rule {
    pub groups: Vec<RuleItemGroup>,
    pub rule_type: RuleType,
}

/// A rule-based user list.
///
/// Lists with a start and end date only include the users that visit the
/// site between those dates.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserList {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub status: UserListStatus,
    pub list_type: UserListType,
    pub account_user_list_status: AccountUserListStatus,
    pub rule: Option<Rule>,
    pub prepopulation_status: PrepopulationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl UserList {
    pub fn is_date_specific(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct UserListOperation {
    pub operator: Operator,
    pub operand: UserList,
}

impl UserListOperation {
    pub fn add(operand: UserList) -> Self {
        Self {
            operator: Operator::Add,
            operand,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names() -> anyhow::Result<()> {
        let status = LineItemCreativeAssociationStatus::NotServing;
        assert_eq!(status.to_string(), "NOT_SERVING");
        assert_eq!(serde_json::to_value(status)?, serde_json::json!("NOT_SERVING"));
        assert_eq!(Value::from(status), Value::from("NOT_SERVING"));

        let dimension: Dimension = serde_json::from_value(serde_json::json!("LINE_ITEM_NAME"))?;
        assert_eq!(dimension, Dimension::LineItemName);
        assert_eq!(InventoryStatus::default(), InventoryStatus::Active);
        Ok(())
    }

    #[test]
    fn columns_are_complete() {
        let placement = Placement::default();
        for c in Placement::COLUMNS {
            assert!(placement.column(c).is_some(), "{c}");
        }
        let lica = LineItemCreativeAssociation::default();
        for c in LineItemCreativeAssociation::COLUMNS {
            assert!(lica.column(c).is_some(), "{c}");
        }
        assert!(lica.column("unknown").is_none());
    }

    #[test]
    fn report_job_id() {
        let mut job = ReportJob::new(ReportQuery::new());
        assert_eq!(job.job_id(), None);
        job.id = "123".into();
        assert_eq!(job.job_id(), Some("123"));
        assert_eq!(job.status(), JobStatus::Submitted);
    }

    #[test]
    fn rule_item_wire_format() -> anyhow::Result<()> {
        let today = chrono::NaiveDate::from_ymd_opt(2017, 5, 31).expect("valid date");
        let items = [
            RuleItem::string("ecomm_pagetype", StringOperator::Equals, "checkout"),
            RuleItem::number("cartsize", NumberOperator::GreaterThan, 1.0),
            RuleItem::date("checkoutdate", DateOperator::After, today),
        ];
        assert_eq!(
            serde_json::to_value(&items)?,
            serde_json::json!([
                {"type": "StringRuleItem", "key": "ecomm_pagetype", "op": "EQUALS", "value": "checkout"},
                {"type": "NumberRuleItem", "key": "cartsize", "op": "GREATER_THAN", "value": 1.0},
                {"type": "DateRuleItem", "key": "checkoutdate", "op": "AFTER", "value": "20170531"},
            ])
        );
        let rule = Rule {
            groups: vec![RuleItemGroup::new(items)],
            rule_type: RuleType::Dnf,
        };
        let got = serde_json::to_value(&rule)?;
        assert_eq!(got["ruleType"], serde_json::json!("DNF"));
        assert_eq!(got["groups"][0]["items"].as_array().map(Vec::len), Some(3));
        Ok(())
    }

    #[test]
    fn date_specific() {
        let list = UserList::default();
        assert!(!list.is_date_specific());
        let list = UserList {
            start_date: Some("20170531".into()),
            ..UserList::default()
        };
        assert!(list.is_date_specific());
        assert_eq!(PrepopulationStatus::default().as_str(), "NONE");
    }
}
