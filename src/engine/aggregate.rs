//! Snapshot aggregation: collapsing the active level set into fixed-width
//! price buckets, one density snapshot per candle.

use crate::engine::level::LiquidationLevel;
use std::collections::HashMap;

/// One fixed-width price bin. `price_floor` is always a multiple of the
/// bucket size in effect at aggregation time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatmapBucket {
    pub price_floor: f64,
    pub density: f64,
}

/// The complete density profile at one time step.
///
/// Buckets are sorted by `price_floor` ascending at construction, so equal
/// inputs always produce byte-equal snapshots. Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapSnapshot {
    /// Open time of the corresponding candle (Unix seconds).
    pub time: u64,
    pub buckets: Vec<HeatmapBucket>,
}

impl HeatmapSnapshot {
    /// The bucket whose price floor is closest to `target_price`, by
    /// absolute distance. Linear scan — used for cursor read-outs, not
    /// rendering, so bucket counts stay small enough not to matter.
    pub fn nearest_bucket(&self, target_price: f64) -> Option<&HeatmapBucket> {
        self.buckets.iter().min_by(|a, b| {
            let da = (a.price_floor - target_price).abs();
            let db = (b.price_floor - target_price).abs();
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    /// Maximum bucket density at this step; 0 for an empty snapshot.
    pub fn max_density(&self) -> f64 {
        self.buckets.iter().map(|b| b.density).fold(0.0, f64::max)
    }
}

/// The complete output of one engine run: snapshot `i` corresponds to
/// candle `i`, and `global_max_density` is the maximum density over every
/// bucket of every snapshot (monotonically non-decreasing as snapshots are
/// folded in).
#[derive(Debug, Clone, Default)]
pub struct EngineResult {
    pub snapshots: Vec<HeatmapSnapshot>,
    pub global_max_density: f64,
}

impl EngineResult {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            snapshots: Vec::with_capacity(capacity),
            global_max_density: 0.0,
        }
    }

    /// Fold one snapshot in, updating the running global maximum.
    pub fn push(&mut self, snapshot: HeatmapSnapshot) {
        self.global_max_density = self.global_max_density.max(snapshot.max_density());
        self.snapshots.push(snapshot);
    }
}

/// Group `levels` into buckets of `bucket_size` and sum intensity per bucket.
///
/// Only buckets with at least one contributing level are materialized; each
/// bucket's density is the exact sum of the intensities of the active levels
/// whose price falls in its range. Grouping is by integer bucket index so
/// float prices never serve as map keys.
pub fn snapshot_levels(
    levels: &[LiquidationLevel],
    bucket_size: f64,
    time: u64,
) -> HeatmapSnapshot {
    let mut grouped: HashMap<i64, f64> = HashMap::with_capacity(levels.len());
    for level in levels {
        let index = (level.price / bucket_size).floor() as i64;
        *grouped.entry(index).or_insert(0.0) += level.intensity;
    }

    let mut buckets: Vec<HeatmapBucket> = grouped
        .into_iter()
        .map(|(index, density)| HeatmapBucket {
            price_floor: index as f64 * bucket_size,
            density,
        })
        .collect();
    buckets.sort_by(|a, b| a.price_floor.total_cmp(&b.price_floor));

    HeatmapSnapshot { time, buckets }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::level::Side;

    fn level(price: f64, intensity: f64) -> LiquidationLevel {
        LiquidationLevel {
            price,
            intensity,
            side: Side::Long,
            created_at: 0,
        }
    }

    #[test]
    fn nearby_levels_share_a_bucket() {
        let levels = [level(100.1, 1.0), level(100.4, 2.0), level(101.2, 0.5)];
        let snap = snapshot_levels(&levels, 0.5, 0);

        assert_eq!(snap.buckets.len(), 2);
        assert_eq!(snap.buckets[0].price_floor, 100.0);
        assert_eq!(snap.buckets[0].density, 3.0);
        assert_eq!(snap.buckets[1].price_floor, 101.0);
        assert_eq!(snap.buckets[1].density, 0.5);
    }

    #[test]
    fn price_floor_is_a_bucket_multiple() {
        let levels = [level(123.456, 1.0), level(98.76, 1.0)];
        let snap = snapshot_levels(&levels, 0.25, 0);
        for b in &snap.buckets {
            let ratio = b.price_floor / 0.25;
            assert!((ratio - ratio.round()).abs() < 1e-9);
        }
    }

    #[test]
    fn buckets_are_sorted_by_price() {
        let levels = [level(150.0, 1.0), level(50.0, 1.0), level(100.0, 1.0)];
        let snap = snapshot_levels(&levels, 1.0, 0);
        assert!(
            snap.buckets
                .windows(2)
                .all(|w| w[0].price_floor < w[1].price_floor)
        );
    }

    #[test]
    fn empty_set_materializes_no_buckets() {
        let snap = snapshot_levels(&[], 1.0, 42);
        assert_eq!(snap.time, 42);
        assert!(snap.buckets.is_empty());
        assert_eq!(snap.max_density(), 0.0);
        assert!(snap.nearest_bucket(100.0).is_none());
    }

    #[test]
    fn nearest_bucket_minimizes_distance() {
        let levels = [level(50.0, 1.0), level(150.0, 2.0)];
        let snap = snapshot_levels(&levels, 1.0, 0);

        assert_eq!(snap.nearest_bucket(60.0).unwrap().price_floor, 50.0);
        assert_eq!(snap.nearest_bucket(140.0).unwrap().price_floor, 150.0);
    }

    #[test]
    fn global_max_is_monotone_under_push() {
        let mut result = EngineResult::default();
        result.push(snapshot_levels(&[level(10.0, 3.0)], 1.0, 0));
        assert_eq!(result.global_max_density, 3.0);

        // A weaker snapshot must not lower the global max.
        result.push(snapshot_levels(&[level(10.0, 1.0)], 1.0, 60));
        assert_eq!(result.global_max_density, 3.0);

        result.push(snapshot_levels(&[level(10.0, 5.0)], 1.0, 120));
        assert_eq!(result.global_max_density, 5.0);
    }
}
