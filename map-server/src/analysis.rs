//! Distance aggregation for the charts.
//!
//! Buckets relation distances into fixed-width intervals plus an
//! open-ended overflow bucket, and derives the share of relations longer
//! than the nominal short-distance definition. Bucket width, upper bound
//! and threshold are configuration because the source data has no single
//! canonical choice.

use crate::domain::StationActivity;

/// Histogram configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketConfig {
    /// Width of each closed bucket in metres.
    pub width_m: u32,

    /// Upper bound of the last closed bucket; values at or beyond fall
    /// into the overflow bucket.
    pub max_m: u32,

    /// Distances at or beyond this count towards `too_long_percent`.
    pub too_long_threshold_m: u32,
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self {
            width_m: 500,
            max_m: 1500,
            too_long_threshold_m: 1500,
        }
    }
}

impl BucketConfig {
    /// Number of closed buckets (excluding overflow).
    fn closed_buckets(&self) -> usize {
        if self.width_m == 0 {
            return 0;
        }
        (self.max_m / self.width_m) as usize
    }

    /// Replace a degenerate configuration with a usable one, logging what
    /// was wrong. A zero width cannot partition anything; an upper bound
    /// below the width would leave no closed bucket.
    pub fn sanitized(self) -> Self {
        if self.width_m == 0 {
            tracing::warn!("ignoring bucket width of 0 m, using defaults");
            return Self::default();
        }
        if self.max_m < self.width_m {
            tracing::warn!(
                "bucket upper bound {} m is below the width {} m, using one closed bucket",
                self.max_m,
                self.width_m
            );
            return Self {
                max_m: self.width_m,
                ..self
            };
        }
        self
    }
}

/// One histogram bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    /// Interval label, e.g. "500-1000" or ">1500".
    pub label: String,
    pub count: usize,
    /// Share of all values in percent, rounded to one decimal.
    pub percent: f64,
}

/// A bucketed distance distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub buckets: Vec<Bucket>,
    pub total: usize,
    /// Share of values at or beyond the too-long threshold, in percent.
    /// A lower bound on relations exceeding the nominal short-distance
    /// definition.
    pub too_long_percent: f64,
}

/// Partition `values` into the configured buckets.
///
/// Buckets are mutually exclusive and collectively exhaustive: every value
/// lands in exactly one bucket and the counts sum to `values.len()`.
pub fn bucket_distances(values: &[u32], config: &BucketConfig) -> Histogram {
    let n = config.closed_buckets();
    let mut counts = vec![0usize; n + 1];

    for &v in values {
        let idx = if config.width_m == 0 || v >= config.max_m {
            n
        } else {
            (v / config.width_m) as usize
        };
        counts[idx] += 1;
    }

    let total = values.len();
    let buckets = counts
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            let label = if i == n {
                format!(">{}", config.max_m)
            } else {
                format!("{}-{}", i as u32 * config.width_m, (i as u32 + 1) * config.width_m)
            };
            Bucket {
                label,
                count,
                percent: percent(count, total),
            }
        })
        .collect();

    let too_long = values
        .iter()
        .filter(|&&v| v >= config.too_long_threshold_m)
        .count();

    Histogram {
        buckets,
        total,
        too_long_percent: percent(too_long, total),
    }
}

/// Heatmap payload: activity points plus the maximum count, which the
/// heatmap renderer needs for scaling.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapData {
    pub max: u64,
    pub points: Vec<StationActivity>,
}

/// Shape activity rows into the structure the heatmap renderer expects.
pub fn heatmap(points: Vec<StationActivity>) -> HeatmapData {
    let max = points.iter().map(|p| p.count).max().unwrap_or(0);
    HeatmapData { max, points }
}

/// `100 * count / total`, rounded to one decimal. Zero when `total` is 0.
fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (1000.0 * count as f64 / total as f64).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LatLng;

    #[test]
    fn worked_example() {
        let h = bucket_distances(&[200, 600, 1200, 1600], &BucketConfig::default());
        let pairs: Vec<(&str, usize)> = h
            .buckets
            .iter()
            .map(|b| (b.label.as_str(), b.count))
            .collect();
        assert_eq!(
            pairs,
            [("0-500", 1), ("500-1000", 1), ("1000-1500", 1), (">1500", 1)]
        );
        assert_eq!(h.total, 4);
        assert_eq!(h.too_long_percent, 25.0);
        for b in &h.buckets {
            assert_eq!(b.percent, 25.0);
        }
    }

    #[test]
    fn boundary_values_land_in_upper_bucket() {
        let h = bucket_distances(&[0, 500, 1000, 1500], &BucketConfig::default());
        let counts: Vec<usize> = h.buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, [1, 1, 1, 1]);
    }

    #[test]
    fn empty_input() {
        let h = bucket_distances(&[], &BucketConfig::default());
        assert_eq!(h.total, 0);
        assert_eq!(h.too_long_percent, 0.0);
        assert!(h.buckets.iter().all(|b| b.count == 0 && b.percent == 0.0));
    }

    #[test]
    fn wider_configuration() {
        let config = BucketConfig {
            width_m: 500,
            max_m: 4500,
            too_long_threshold_m: 1500,
        };
        let h = bucket_distances(&[100, 2600, 4400, 9000], &config);
        assert_eq!(h.buckets.len(), 10);
        assert_eq!(h.buckets[0].count, 1);
        assert_eq!(h.buckets[5].count, 1); // 2500-3000
        assert_eq!(h.buckets[8].count, 1); // 4000-4500
        assert_eq!(h.buckets[9].count, 1); // >4500
        assert_eq!(h.too_long_percent, 75.0);
    }

    #[test]
    fn zero_width_never_panics() {
        let config = BucketConfig {
            width_m: 0,
            max_m: 1500,
            too_long_threshold_m: 1500,
        };
        let h = bucket_distances(&[200, 1600], &config);
        // Everything collapses into the single overflow bucket.
        assert_eq!(h.buckets.len(), 1);
        assert_eq!(h.buckets[0].label, ">1500");
        assert_eq!(h.buckets[0].count, 2);
    }

    #[test]
    fn sanitized_rejects_zero_width() {
        let config = BucketConfig {
            width_m: 0,
            max_m: 1500,
            too_long_threshold_m: 1500,
        };
        assert_eq!(config.sanitized(), BucketConfig::default());
    }

    #[test]
    fn sanitized_lifts_max_to_width() {
        let config = BucketConfig {
            width_m: 500,
            max_m: 100,
            too_long_threshold_m: 1500,
        };
        let fixed = config.sanitized();
        assert_eq!(fixed.max_m, 500);
        assert_eq!(fixed.width_m, 500);

        // A sane configuration passes through unchanged.
        let config = BucketConfig::default();
        assert_eq!(config.clone().sanitized(), config);
    }

    #[test]
    fn percent_rounds_to_one_decimal() {
        // 1/3 = 33.333... -> 33.3
        let h = bucket_distances(&[100, 600, 1100], &BucketConfig::default());
        assert_eq!(h.buckets[0].percent, 33.3);
    }

    #[test]
    fn heatmap_max() {
        let points = vec![
            StationActivity {
                name: "Bern".into(),
                pos: LatLng::new(46.9, 7.4),
                count: 23,
            },
            StationActivity {
                name: "Thun".into(),
                pos: LatLng::new(46.8, 7.6),
                count: 7,
            },
        ];
        let data = heatmap(points);
        assert_eq!(data.max, 23);
        assert_eq!(data.points.len(), 2);
    }

    #[test]
    fn heatmap_empty() {
        assert_eq!(heatmap(Vec::new()).max, 0);
    }
}
