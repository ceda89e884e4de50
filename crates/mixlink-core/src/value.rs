//! Raw wire values and human-facing values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A value as it travels on the wire and sits in the data store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RawValue {
    Int(i64),
    Text(String),
}

impl RawValue {
    /// Integer if the token parses as one, text otherwise.
    pub fn from_token(token: &str) -> Self {
        match token.parse::<i64>() {
            Ok(n) => RawValue::Int(n),
            Err(_) => RawValue::Text(token.to_string()),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            RawValue::Int(n) => Some(*n),
            RawValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Int(_) => None,
            RawValue::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Int(n) => write!(f, "{n}"),
            RawValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        RawValue::Int(n)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

/// A value as entered on, or shown by, a control surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UiValue {
    /// Value in display units (dB, Hz, scene number...).
    Number(f64),
    /// The `-Inf` fader position.
    NegInf,
    /// Flip a two-state control.
    Toggle,
    Text(String),
}

impl UiValue {
    /// Parse surface input. `-Inf` and `Toggle` are matched case-insensitively.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.eq_ignore_ascii_case("-inf") {
            UiValue::NegInf
        } else if input.eq_ignore_ascii_case("toggle") {
            UiValue::Toggle
        } else if let Ok(n) = input.parse::<f64>() {
            if n.is_finite() {
                UiValue::Number(n)
            } else {
                UiValue::Text(input.to_string())
            }
        } else {
            UiValue::Text(input.to_string())
        }
    }
}

impl fmt::Display for UiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiValue::Number(n) => write!(f, "{n}"),
            UiValue::NegInf => f.write_str("-Inf"),
            UiValue::Toggle => f.write_str("Toggle"),
            UiValue::Text(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_from_token() {
        assert_eq!(RawValue::from_token("-32768"), RawValue::Int(-32768));
        assert_eq!(RawValue::from_token("12.00"), RawValue::Text("12.00".into()));
        assert_eq!(RawValue::from_token(""), RawValue::Text(String::new()));
    }

    #[test]
    fn test_ui_parse() {
        assert_eq!(UiValue::parse("-inf"), UiValue::NegInf);
        assert_eq!(UiValue::parse("-INF"), UiValue::NegInf);
        assert_eq!(UiValue::parse("TOGGLE"), UiValue::Toggle);
        assert_eq!(UiValue::parse(" -3.5 "), UiValue::Number(-3.5));
        assert_eq!(UiValue::parse("Kick"), UiValue::Text("Kick".into()));
        assert_eq!(UiValue::parse("NaN"), UiValue::Text("NaN".into()));
    }

    #[test]
    fn test_display() {
        assert_eq!(RawValue::Int(-1000).to_string(), "-1000");
        assert_eq!(UiValue::NegInf.to_string(), "-Inf");
    }
}
