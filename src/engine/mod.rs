//! Engine sub-modules: level generation, active-level tracking, snapshot
//! aggregation, and render-time normalization.
//!
//! The batch path (`run`) is a one-shot synchronous fold over the whole
//! candle series: tracker state flows forward candle by candle, and each
//! step's active set is collapsed into one density snapshot. The render
//! path (`normalize`) only reads the produced [`EngineResult`].

pub mod aggregate;
pub mod level;
pub mod normalize;
pub mod tracker;

use crate::error::{AppError, Result};
use crate::types::Candle;
use self::aggregate::{EngineResult, snapshot_levels};
use self::tracker::LevelTracker;

/// Run the full simulation over `candles` and aggregate every step into a
/// price-bucketed density snapshot.
///
/// `leverage` and `bucket_size` are configuration: non-positive or non-finite
/// values are refused with an error rather than producing NaN output. An
/// empty candle slice is not an error and yields an empty result.
///
/// Candles must be ordered ascending by time; trigger decisions depend on
/// the cumulative active set, so processing is strictly sequential.
pub fn run(candles: &[Candle], leverage: f64, bucket_size: f64) -> Result<EngineResult> {
    if !(leverage.is_finite() && leverage > 0.0) {
        return Err(AppError::InvalidLeverage(leverage));
    }
    if !(bucket_size.is_finite() && bucket_size > 0.0) {
        return Err(AppError::InvalidBucketSize(bucket_size));
    }

    let mut tracker = LevelTracker::new(leverage);
    let mut result = EngineResult::with_capacity(candles.len());

    for candle in candles {
        tracker.step(candle);
        let snapshot = snapshot_levels(tracker.active(), bucket_size, candle.time);
        result.push(snapshot);
    }

    Ok(result)
}
