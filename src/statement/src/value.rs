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

/// The value bound to a placeholder in a [Statement][crate::Statement].
///
/// Enumerations are sent as text, use the enumeration's name as the value.
///
/// # Example
/// ```
/// # use ads_statement::Value;
/// assert_eq!(Value::from("ACTIVE"), Value::Text("ACTIVE".to_string()));
/// assert_eq!(Value::from(42_i64), Value::Number(42));
/// assert_eq!(Value::from(true).to_string(), "true");
/// assert_eq!(Value::from("it's").to_string(), "'it''s'");
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "value")]
#[non_exhaustive]
pub enum Value {
    #[serde(rename = "TextValue")]
    Text(String),
    #[serde(rename = "NumberValue")]
    Number(i64),
    #[serde(rename = "BooleanValue")]
    Boolean(bool),
    /// A calendar date, formatted as `YYYY-MM-DD`.
    #[serde(rename = "DateValue")]
    Date(String),
}

impl Value {
    /// Creates a date value.
    pub fn date<T: Into<String>>(v: T) -> Self {
        Self::Date(v.into())
    }

    /// Returns the contained text, if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the contained number, if this is a number value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the contained flag, if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) | Self::Date(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Self::Number(n) => write!(f, "{n}"),
            Self::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Number(value.into())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(Value::from("abc"), json!({"type": "TextValue", "value": "abc"}))]
    #[test_case(Value::from(7_i32), json!({"type": "NumberValue", "value": 7}))]
    #[test_case(Value::from(false), json!({"type": "BooleanValue", "value": false}))]
    #[test_case(Value::date("2017-06-01"), json!({"type": "DateValue", "value": "2017-06-01"}))]
    fn wire_format(input: Value, want: serde_json::Value) -> anyhow::Result<()> {
        let got = serde_json::to_value(&input)?;
        assert_eq!(got, want);
        let back = serde_json::from_value::<Value>(got)?;
        assert_eq!(back, input);
        Ok(())
    }

    #[test]
    fn accessors() {
        let v = Value::from("ACTIVE");
        assert_eq!(v.as_str(), Some("ACTIVE"));
        assert_eq!(v.as_i64(), None);
        assert_eq!(v.as_bool(), None);

        let v = Value::from(123_u32);
        assert_eq!(v.as_i64(), Some(123));
        assert_eq!(v.as_str(), None);

        let v = Value::from(true);
        assert_eq!(v.as_bool(), Some(true));
    }

    #[test]
    fn display() {
        assert_eq!(Value::from(-5_i64).to_string(), "-5");
        assert_eq!(Value::from("O'Brien").to_string(), "'O''Brien'");
        assert_eq!(Value::date("2017-06-01").to_string(), "'2017-06-01'");
    }
}
