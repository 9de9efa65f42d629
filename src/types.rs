//! Shared data-model types for Binance kline streams and REST responses.
//!
//! # Deserialization strategy
//!
//! Binance sends prices and volumes as **JSON strings** (e.g. `"o":"0.00100"`).
//! Every numeric field here is only ever read as a scalar, so everything goes
//! through `from_str_to_f64` — the engine is `f64` math end to end and no
//! value is used as an exact map key. Symbol names use `SymbolStr` so names
//! like "BTCUSDT" (≤ 16 bytes) stay on the stack.

use crate::utils::{SymbolStr, from_str_to_f64};
use serde::Deserialize;

// ── Candle ─────────────────────────────────────────────────────────────────────

/// One OHLCV bar. `time` is the bar's open time in Unix **seconds**.
///
/// The candle series owned by the app is ordered ascending by `time`, one
/// entry per bar; the engine only reads it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    pub time: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

// ── REST: Exchange Info ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ExchangeInfo {
    pub symbols: Vec<SymbolInfo>,
}

#[derive(Deserialize)]
pub struct SymbolInfo {
    /// Stack-allocated symbol name (e.g. "BTCUSDT").
    pub symbol: SymbolStr,
    pub filters: Vec<Filter>,
}

#[derive(Deserialize)]
pub struct Filter {
    #[serde(rename = "filterType")]
    pub filter_type: String,
    #[serde(rename = "tickSize")]
    pub tick_size: Option<String>,
}

// ── REST: Kline history ────────────────────────────────────────────────────────

/// One row from `GET /fapi/v1/klines`.
///
/// Binance returns each kline as a heterogeneous 12-element JSON array
/// (`[openTime, "open", "high", "low", "close", "volume", closeTime, …]`),
/// which maps onto a serde tuple struct. Only the first six elements are
/// meaningful here; the tail is carried to satisfy the array length.
#[derive(Deserialize)]
pub struct RestKline(
    pub u64,    // open time (ms)
    #[serde(deserialize_with = "from_str_to_f64")] pub f64, // open
    #[serde(deserialize_with = "from_str_to_f64")] pub f64, // high
    #[serde(deserialize_with = "from_str_to_f64")] pub f64, // low
    #[serde(deserialize_with = "from_str_to_f64")] pub f64, // close
    #[serde(deserialize_with = "from_str_to_f64")] pub f64, // volume
    pub u64,    // close time (ms)
    pub serde_json::Value, // quote volume
    pub u64,    // trade count
    pub serde_json::Value, // taker buy base volume
    pub serde_json::Value, // taker buy quote volume
    pub serde_json::Value, // unused
);

impl From<RestKline> for Candle {
    fn from(k: RestKline) -> Self {
        Candle {
            time: k.0 / 1000,
            open: k.1,
            high: k.2,
            low: k.3,
            close: k.4,
            volume: k.5,
        }
    }
}

// ── WebSocket: Kline event ─────────────────────────────────────────────────────

/// A kline update from the `@kline_<interval>` stream.
///
/// Arrives once per ~250ms for the in-progress bar; `closed` flips to `true`
/// on the final update of a bar.
#[allow(dead_code)]
#[derive(Deserialize, Clone)]
pub struct KlineEvent {
    #[serde(rename = "e")]
    pub event_type: String,
    #[serde(rename = "E")]
    pub event_time: u64,
    #[serde(rename = "s")]
    pub symbol: SymbolStr,
    #[serde(rename = "k")]
    pub kline: KlineData,
}

#[allow(dead_code)]
#[derive(Deserialize, Clone)]
pub struct KlineData {
    /// Bar open time in milliseconds.
    #[serde(rename = "t")]
    pub start_time: u64,
    #[serde(rename = "i")]
    pub interval: String,
    #[serde(rename = "o", deserialize_with = "from_str_to_f64")]
    pub open: f64,
    #[serde(rename = "h", deserialize_with = "from_str_to_f64")]
    pub high: f64,
    #[serde(rename = "l", deserialize_with = "from_str_to_f64")]
    pub low: f64,
    #[serde(rename = "c", deserialize_with = "from_str_to_f64")]
    pub close: f64,
    #[serde(rename = "v", deserialize_with = "from_str_to_f64")]
    pub volume: f64,
    /// Whether this update closes the bar.
    #[serde(rename = "x")]
    pub closed: bool,
}

impl From<&KlineData> for Candle {
    fn from(k: &KlineData) -> Self {
        Candle {
            time: k.start_time / 1000,
            open: k.open,
            high: k.high,
            low: k.low,
            close: k.close,
            volume: k.volume,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rest_kline_row_to_candle() {
        let row = r#"[1700000000000,"100.0","101.0","99.0","100.5","1234.5",1700000059999,"124000.0",42,"600.0","60300.0","0"]"#;
        let k: RestKline = serde_json::from_str(row).unwrap();
        let c = Candle::from(k);
        assert_eq!(c.time, 1_700_000_000);
        assert_eq!(c.open, 100.0);
        assert_eq!(c.high, 101.0);
        assert_eq!(c.low, 99.0);
        assert_eq!(c.close, 100.5);
        assert_eq!(c.volume, 1234.5);
    }

    #[test]
    fn kline_event_to_candle() {
        let msg = r#"{"e":"kline","E":1700000001000,"s":"BTCUSDT","k":{
            "t":1700000000000,"T":1700000059999,"s":"BTCUSDT","i":"1m",
            "f":1,"L":2,"o":"100.0","c":"100.5","h":"101.0","l":"99.0",
            "v":"12.0","n":2,"x":false,"q":"1200.0","V":"6.0","Q":"600.0","B":"0"}}"#;
        let ev: KlineEvent = serde_json::from_str(msg).unwrap();
        assert_eq!(ev.symbol, "BTCUSDT");
        assert!(!ev.kline.closed);
        let c = Candle::from(&ev.kline);
        assert_eq!(c.time, 1_700_000_000);
        assert_eq!(c.close, 100.5);
    }
}
