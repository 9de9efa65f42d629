//! Level generation: the hypothetical liquidation prices implied by one
//! candle's close under a fixed leverage assumption.

use crate::types::Candle;

/// Which way the hypothetical position points. Determines the trigger
/// condition and is never reassigned after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Long,
    Short,
}

/// One hypothetical liquidation trigger.
///
/// Created in pairs (one per side) for every candle; owned exclusively by
/// the tracker's active set and removed when triggered by price or pruned
/// for distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiquidationLevel {
    pub price: f64,
    pub intensity: f64,
    pub side: Side,
    /// Open time of the candle that created this level (Unix seconds).
    pub created_at: u64,
}

/// Intensity of the levels a candle contributes: `log10(volume + 10)`.
///
/// The log damping keeps single outlier bars from dominating the density
/// scale; the `+10` floor keeps near-zero-volume bars at a small positive
/// value instead of a large negative one.
pub fn intensity(volume: f64) -> f64 {
    (volume + 10.0).log10()
}

/// The long/short level pair for a position opened at `candle.close`.
///
/// A long at entry `close` with leverage `L` liquidates at `close * (1 - 1/L)`;
/// the short is symmetric at `close * (1 + 1/L)`. Non-positive leverage is a
/// configuration error guarded by [`crate::engine::run`]; the generator
/// itself degrades to producing no levels rather than panicking.
pub fn levels_for_candle(candle: &Candle, leverage: f64) -> Option<[LiquidationLevel; 2]> {
    if !(leverage.is_finite() && leverage > 0.0) {
        return None;
    }

    let intensity = intensity(candle.volume);
    let offset = candle.close / leverage;

    Some([
        LiquidationLevel {
            price: candle.close - offset,
            intensity,
            side: Side::Long,
            created_at: candle.time,
        },
        LiquidationLevel {
            price: candle.close + offset,
            intensity,
            side: Side::Short,
            created_at: candle.time,
        },
    ])
}
