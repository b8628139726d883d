use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize, Serializer};

/// Wire format for date values
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Value attached to a condition
///
/// Dates travel as `Text` in `YYYY-MM-DD` form; range operators carry a
/// two-element `List`, list operators an arbitrary-length one.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<RuleValue>),
}

impl Serialize for RuleValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RuleValue::Null => serializer.serialize_unit(),
            RuleValue::Bool(b) => serializer.serialize_bool(*b),
            RuleValue::Number(n) => match integral(*n) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            RuleValue::Text(s) => serializer.serialize_str(s),
            RuleValue::List(items) => items.serialize(serializer),
        }
    }
}

impl RuleValue {
    /// Null, empty text and empty lists count as "no value"
    pub fn is_missing(&self) -> bool {
        match self {
            RuleValue::Null => true,
            RuleValue::Text(s) => s.is_empty(),
            RuleValue::List(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Numeric view: numbers directly, text when it parses as a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RuleValue::Number(n) if n.is_finite() => Some(*n),
            RuleValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RuleValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean view: booleans directly, `"true"`/`"false"` text
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RuleValue::Bool(b) => Some(*b),
            RuleValue::Text(s) => match s.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        self.as_text().and_then(parse_date)
    }

    pub fn as_list(&self) -> Option<&[RuleValue]> {
        match self {
            RuleValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Lower and upper bound of a range value
    pub fn as_range(&self) -> Option<(&RuleValue, &RuleValue)> {
        match self.as_list() {
            Some([low, high]) => Some((low, high)),
            _ => None,
        }
    }

    /// Plain text rendering used for option matching and messages
    pub fn to_plain_string(&self) -> String {
        match self {
            RuleValue::Null => String::new(),
            RuleValue::Bool(b) => b.to_string(),
            RuleValue::Number(n) => format_number(*n),
            RuleValue::Text(s) => s.clone(),
            RuleValue::List(items) => items
                .iter()
                .map(RuleValue::to_plain_string)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Parses a date value; full RFC 3339 timestamps contribute their date part
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
}

/// Formats a number without a trailing `.0` when it is integral
pub fn format_number(n: f64) -> String {
    match integral(n) {
        Some(i) => i.to_string(),
        None => n.to_string(),
    }
}

fn integral(n: f64) -> Option<i64> {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15 {
        Some(n as i64)
    } else {
        None
    }
}

impl From<&str> for RuleValue {
    fn from(value: &str) -> Self {
        RuleValue::Text(value.to_string())
    }
}

impl From<String> for RuleValue {
    fn from(value: String) -> Self {
        RuleValue::Text(value)
    }
}

impl From<f64> for RuleValue {
    fn from(value: f64) -> Self {
        RuleValue::Number(value)
    }
}

impl From<i64> for RuleValue {
    fn from(value: i64) -> Self {
        RuleValue::Number(value as f64)
    }
}

impl From<i32> for RuleValue {
    fn from(value: i32) -> Self {
        RuleValue::Number(f64::from(value))
    }
}

impl From<bool> for RuleValue {
    fn from(value: bool) -> Self {
        RuleValue::Bool(value)
    }
}

impl From<NaiveDate> for RuleValue {
    fn from(value: NaiveDate) -> Self {
        RuleValue::Text(value.format(DATE_FORMAT).to_string())
    }
}

impl<T: Into<RuleValue>> From<Vec<T>> for RuleValue {
    fn from(values: Vec<T>) -> Self {
        RuleValue::List(values.into_iter().map(Into::into).collect())
    }
}
