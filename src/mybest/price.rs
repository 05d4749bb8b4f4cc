//! Price normalization into Indonesian Rupiah display strings.

use serde::Deserialize;
use serde_json::Value;

/// Display prefix for formatted prices.
pub const CURRENCY_PREFIX: &str = "Rp ";

/// A price as found in structured data, whose shape varies between pages.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum PriceValue {
    Integer(i64),
    Float(f64),
    Text(String),
    /// Missing, `null`, or a shape that cannot carry a price.
    #[default]
    Absent,
}

impl From<Value> for PriceValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) => match n.as_i64() {
                Some(i) => PriceValue::Integer(i),
                None => n.as_f64().map(PriceValue::Float).unwrap_or_default(),
            },
            Value::String(s) => PriceValue::Text(s),
            _ => PriceValue::Absent,
        }
    }
}

impl PriceValue {
    /// Formats as `"Rp 1.234.567"`, or an empty string when there is no usable price.
    ///
    /// Non-digit characters are dropped before grouping and fractional prices
    /// are rounded to whole Rupiah.
    pub fn to_display(&self) -> String {
        let raw = match self {
            PriceValue::Integer(n) => n.to_string(),
            PriceValue::Float(f) => format!("{:.0}", f),
            PriceValue::Text(s) => s.clone(),
            PriceValue::Absent => return String::new(),
        };

        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return String::new();
        }

        let digits = match digits.trim_start_matches('0') {
            "" => "0",
            trimmed => trimmed,
        };

        format!("{}{}", CURRENCY_PREFIX, group_thousands(digits))
    }
}

/// Inserts `.` every three digits from the right: `"1234567"` -> `"1.234.567"`.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}
