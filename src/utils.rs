//! Shared deserialization utilities and common type aliases.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserializer, de, de::Visitor};

/// A stack-allocated string for short symbol names (e.g. "BTCUSDT", "DOGEUSDT").
/// Avoids heap allocation for all symbols that fit within 16 bytes.
pub type SymbolStr = smallstr::SmallString<[u8; 16]>;

// ── f64 from JSON string ───────────────────────────────────────────────────────

struct F64Visitor;

impl Visitor<'_> for F64Visitor {
    type Value = Option<f64>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string containing an f64 number")
    }

    fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        if s.is_empty() {
            Ok(None)
        } else {
            Ok(Some(s.parse::<f64>().map_err(de::Error::custom)?))
        }
    }
}

/// Deserialize a JSON string (`"1.23"`) into `f64`. Empty string → `0.0`.
///
/// Binance sends prices, quantities, and volumes as JSON strings; everything
/// the engine reads is scalar `f64`, so values are parsed straight through.
pub fn from_str_to_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer
        .deserialize_str(F64Visitor)
        .map(|value| value.unwrap_or(0.0))
}

// ── Timestamp helpers ──────────────────────────────────────────────────────────

/// Format a Unix-seconds timestamp as `"YYYY-MM-DD HH:MM"` UTC for axis and
/// cursor read-outs. Falls back to the raw number if out of `Timestamp` range.
pub fn format_time(secs: u64) -> String {
    match Timestamp::from_second(secs as i64) {
        Ok(ts) => ts.strftime("%Y-%m-%d %H:%M").to_string(),
        Err(_) => secs.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Wrapper {
        #[serde(deserialize_with = "from_str_to_f64")]
        v: f64,
    }

    #[test]
    fn parses_string_floats() {
        let w: Wrapper = serde_json::from_str(r#"{"v":"108.25"}"#).unwrap();
        assert_eq!(w.v, 108.25);
    }

    #[test]
    fn empty_string_is_zero() {
        let w: Wrapper = serde_json::from_str(r#"{"v":""}"#).unwrap();
        assert_eq!(w.v, 0.0);
    }

    #[test]
    fn formats_unix_seconds() {
        assert_eq!(format_time(0), "1970-01-01 00:00");
    }
}
