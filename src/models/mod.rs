/// Records exchanged with the Sigma Cloud APIs and the inbound opening request

pub mod account;
pub mod event;
pub mod receiver;
pub mod request;

pub use account::{AccountMap, PartitionMap};
pub use event::{AccessControlEvent, EventBatch, EVENT_ID, PROTOCOL_TYPE};
pub use receiver::ReceiverMap;
pub use request::{OpeningRequest, REQUIRED_FIELDS};

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// A JSON scalar that remote services send either as a string or a number.
///
/// Serializes back in its original form, so forwarded values keep their type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(Number),
}

impl Scalar {
    /// Base-10 integer prefix, read the way JavaScript's `parseInt` reads it
    pub fn leading_int(&self) -> Option<i64> {
        match self {
            Scalar::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
            Scalar::Text(s) => parse_leading_int(s),
        }
    }

    /// Strict equality against an inbound value: strings match strings,
    /// numbers match numbers of equal value, nothing else matches.
    pub fn same_as(&self, value: &Value) -> bool {
        match (self, value) {
            (Scalar::Text(s), Value::String(other)) => s == other,
            (Scalar::Number(n), Value::Number(other)) => match (n.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => n == other,
            },
            _ => false,
        }
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Number(n) => write!(f, "{}", n),
        }
    }
}

fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let value: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Truthiness of an inbound JSON value: missing, `null`, `""`, `0` and `false` are absent
pub fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn leading_int_follows_parse_int() {
        assert_eq!(Scalar::Text("3".into()).leading_int(), Some(3));
        assert_eq!(Scalar::Text("  07".into()).leading_int(), Some(7));
        assert_eq!(Scalar::Text("12abc".into()).leading_int(), Some(12));
        assert_eq!(Scalar::Text("-2".into()).leading_int(), Some(-2));
        assert_eq!(Scalar::Text("abc".into()).leading_int(), None);
        assert_eq!(Scalar::Text("".into()).leading_int(), None);
        assert_eq!(Scalar::Number(Number::from(4)).leading_int(), Some(4));
    }

    #[test]
    fn scalar_keeps_original_json_type() {
        let text: Scalar = serde_json::from_value(json!("C1")).unwrap();
        let number: Scalar = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(serde_json::to_value(&text).unwrap(), json!("C1"));
        assert_eq!(serde_json::to_value(&number).unwrap(), json!(42));
        assert_eq!(number.to_string(), "42");
    }

    #[test]
    fn same_as_compares_type_and_value() {
        let text = Scalar::Text("22".into());
        let number = Scalar::Number(Number::from(22));
        assert!(text.same_as(&json!("22")));
        assert!(!text.same_as(&json!(22)));
        assert!(number.same_as(&json!(22)));
        assert!(number.same_as(&json!(22.0)));
        assert!(!number.same_as(&json!("22")));
        assert!(!number.same_as(&Value::Null));
    }

    #[test]
    fn presence_treats_falsy_values_as_missing() {
        assert!(!is_present(None));
        assert!(!is_present(Some(&Value::Null)));
        assert!(!is_present(Some(&json!(""))));
        assert!(!is_present(Some(&json!(0))));
        assert!(!is_present(Some(&json!(false))));
        assert!(is_present(Some(&json!("x"))));
        assert!(is_present(Some(&json!(17))));
        assert!(is_present(Some(&json!(true))));
        assert!(is_present(Some(&json!({}))));
    }
}
