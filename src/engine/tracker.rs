//! Level tracker: the evolving set of active liquidation levels, carried
//! across the candles of one run.

use crate::engine::level::{LiquidationLevel, Side, levels_for_candle};
use crate::types::Candle;

/// Levels further than this fraction from the current close are pruned.
///
/// A visual-relevance cutoff, not a liquidation event: it bounds the active
/// set so per-step cost stays proportional to levels near the current price.
pub const MAX_DISTANCE: f64 = 0.5;

/// Owns the active level set and applies the per-candle filter/insert step.
///
/// Processing is strictly sequential: whether a level survives a candle
/// depends on the cumulative set built from all prior candles, so steps
/// must not be reordered.
pub struct LevelTracker {
    active: Vec<LiquidationLevel>,
    leverage: f64,
    /// Relative-distance prune threshold; defaults to [`MAX_DISTANCE`].
    pub max_distance: f64,
}

impl LevelTracker {
    pub fn new(leverage: f64) -> Self {
        Self {
            active: Vec::new(),
            leverage,
            max_distance: MAX_DISTANCE,
        }
    }

    /// The current active set, valid for the most recently stepped candle.
    pub fn active(&self) -> &[LiquidationLevel] {
        &self.active
    }

    /// Advance the tracker by one candle.
    ///
    /// First a single removal pass over the existing set (surviving levels
    /// are never mutated): a Long level is triggered when `candle.low`
    /// trades through it, a Short level when `candle.high` does, and any
    /// level too far from the close is pruned. Then the candle's own two
    /// levels are inserted.
    pub fn step(&mut self, candle: &Candle) {
        let close = candle.close;
        let max_distance = self.max_distance;

        self.active.retain(|level| {
            let triggered = match level.side {
                Side::Long => candle.low <= level.price,
                Side::Short => candle.high >= level.price,
            };
            if triggered {
                return false;
            }
            close > 0.0 && ((level.price - close) / close).abs() <= max_distance
        });

        if let Some(pair) = levels_for_candle(candle, self.leverage) {
            self.active.extend(pair);
        }
    }
}
