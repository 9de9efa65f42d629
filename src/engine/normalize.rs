//! Render-pass normalization: raw bucket density → bounded `[0, 1]` level,
//! with a noise floor and a sensitivity gain.

use crate::engine::aggregate::EngineResult;
use std::ops::Range;

/// Per-render-pass normalization settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizeParams {
    /// Buckets at or below this fraction of the effective max are not drawn.
    pub noise_filter: f64,
    /// Post-hoc gain applied after division, clamped into `[0, 1]`.
    pub sensitivity: f64,
    /// Normalize against the visible window's max instead of the global max.
    pub local: bool,
}

impl Default for NormalizeParams {
    fn default() -> Self {
        Self {
            noise_filter: 0.05,
            sensitivity: 1.0,
            local: false,
        }
    }
}

/// The denominator for this render pass.
///
/// Global normalization uses the run's `global_max_density`. Local
/// normalization scans only buckets inside the visible time-index range
/// whose `[price_floor, price_floor + bucket_size]` span overlaps the
/// visible price range — the same admission test the painter uses, so every
/// drawn bucket is in the scan. This lets the display auto-contrast to a
/// quiet region after zooming in; if the restricted set is empty or all-zero
/// it falls back to the global max so nothing divides by zero and a viewport
/// with no qualifying buckets does not go blank.
pub fn effective_max(
    result: &EngineResult,
    visible_time: Range<usize>,
    visible_price: (f64, f64),
    bucket_size: f64,
    local: bool,
) -> f64 {
    if !local {
        return result.global_max_density;
    }

    let start = visible_time.start.min(result.snapshots.len());
    let end = visible_time.end.min(result.snapshots.len());
    let (price_lo, price_hi) = visible_price;

    let windowed = result.snapshots[start..end]
        .iter()
        .flat_map(|s| s.buckets.iter())
        .filter(|b| b.price_floor + bucket_size >= price_lo && b.price_floor <= price_hi)
        .map(|b| b.density)
        .fold(0.0, f64::max);

    if windowed > 0.0 {
        windowed
    } else {
        result.global_max_density
    }
}

/// Map one bucket density to a display level, or `None` when the bucket is
/// suppressed.
///
/// `raw = density / effective_max`; a raw value at or below the noise filter
/// is a hard visual cutoff (the threshold itself is not drawn), everything
/// above it is scaled by the sensitivity gain and clamped to 1. A
/// non-positive `effective_max` suppresses rather than dividing by zero.
pub fn normalize(density: f64, effective_max: f64, params: &NormalizeParams) -> Option<f64> {
    if effective_max <= 0.0 {
        return None;
    }
    let raw = density / effective_max;
    if params.noise_filter > 0.0 && raw <= params.noise_filter {
        return None;
    }
    Some((raw * params.sensitivity).min(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::aggregate::{HeatmapBucket, HeatmapSnapshot};

    fn snapshot(time: u64, buckets: &[(f64, f64)]) -> HeatmapSnapshot {
        HeatmapSnapshot {
            time,
            buckets: buckets
                .iter()
                .map(|&(price_floor, density)| HeatmapBucket {
                    price_floor,
                    density,
                })
                .collect(),
        }
    }

    fn result(snaps: Vec<HeatmapSnapshot>) -> EngineResult {
        let mut r = EngineResult::default();
        for s in snaps {
            r.push(s);
        }
        r
    }

    #[test]
    fn noise_filter_boundary_is_suppressed() {
        let params = NormalizeParams {
            noise_filter: 0.25,
            sensitivity: 1.0,
            local: false,
        };
        // Exactly at the threshold: suppressed.
        assert_eq!(normalize(25.0, 100.0, &params), None);
        // Just above: drawn.
        assert!(normalize(25.1, 100.0, &params).is_some());
        // Below: suppressed.
        assert_eq!(normalize(10.0, 100.0, &params), None);
    }

    #[test]
    fn sensitivity_amplifies_and_clamps() {
        let params = NormalizeParams {
            noise_filter: 0.0,
            sensitivity: 4.0,
            local: false,
        };
        assert_eq!(normalize(10.0, 100.0, &params), Some(0.4));
        assert_eq!(normalize(50.0, 100.0, &params), Some(1.0));
    }

    #[test]
    fn zero_effective_max_never_divides() {
        let params = NormalizeParams::default();
        assert_eq!(normalize(5.0, 0.0, &params), None);
        assert_eq!(normalize(5.0, -1.0, &params), None);
    }

    #[test]
    fn global_mode_uses_run_maximum() {
        let r = result(vec![
            snapshot(0, &[(100.0, 2.0)]),
            snapshot(60, &[(110.0, 8.0)]),
        ]);
        assert_eq!(effective_max(&r, 0..1, (0.0, 1000.0), 1.0, false), 8.0);
    }

    #[test]
    fn local_mode_restricts_to_visible_window() {
        let r = result(vec![
            snapshot(0, &[(100.0, 2.0)]),
            snapshot(60, &[(110.0, 8.0)]),
            snapshot(120, &[(120.0, 4.0)]),
        ]);
        // Time window excludes the 8.0 snapshot.
        assert_eq!(effective_max(&r, 2..3, (0.0, 1000.0), 1.0, true), 4.0);
        // Price window excludes everything above 105.
        assert_eq!(effective_max(&r, 0..3, (0.0, 105.0), 1.0, true), 2.0);
    }

    #[test]
    fn straddling_bucket_counts_toward_local_max() {
        // The 99.5 bucket spans [99.5, 100.5]: it pokes into a window that
        // starts at 100, so it is drawn and must also be in the scan.
        let r = result(vec![snapshot(0, &[(99.5, 9.0), (104.0, 2.0)])]);
        assert_eq!(effective_max(&r, 0..1, (100.0, 105.0), 1.0, true), 9.0);
        // Shrunk to a zero-width span it no longer overlaps.
        assert_eq!(effective_max(&r, 0..1, (100.0, 105.0), 0.25, true), 2.0);
    }

    #[test]
    fn empty_visible_window_falls_back_to_global() {
        let r = result(vec![snapshot(0, &[(100.0, 2.0)])]);
        // Price window sees no buckets.
        assert_eq!(effective_max(&r, 0..1, (500.0, 600.0), 1.0, true), 2.0);
        // Time window out of range entirely.
        assert_eq!(effective_max(&r, 5..9, (0.0, 1000.0), 1.0, true), 2.0);
    }
}
