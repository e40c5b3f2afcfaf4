//! Distance Service
//!
//! Turns a destination list into the kilometres a quote is priced on.
//!
//! The one-way figure comes from a [`DistanceSource`]. The only source shipped
//! today is [`SegmentDistanceSource`], a flat per-leg estimate standing in for
//! a road-distance lookup. Manual adjustments and the empty-return option are
//! then applied by [`normalize`].

use serde::{Deserialize, Serialize};

use crate::models::quote::DistanceEstimate;

pub const DEFAULT_KM_PER_SEGMENT: f64 = 100.0;

/// Anything able to estimate the one-way driving distance of an ordered route.
pub trait DistanceSource {
    fn one_way_km(&self, destinations: &[String]) -> f64;
}

/// Straight-line placeholder: every leg between consecutive stops counts the same.
#[derive(Debug, Clone, Copy)]
pub struct SegmentDistanceSource {
    pub km_per_segment: f64,
}

impl SegmentDistanceSource {
    pub fn new(km_per_segment: f64) -> Self {
        Self { km_per_segment }
    }
}

impl Default for SegmentDistanceSource {
    fn default() -> Self {
        Self::new(DEFAULT_KM_PER_SEGMENT)
    }
}

impl DistanceSource for SegmentDistanceSource {
    fn one_way_km(&self, destinations: &[String]) -> f64 {
        destinations.len().saturating_sub(1) as f64 * self.km_per_segment
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedDistance {
    pub effective_one_way_km: f64,
    /// Kilometres actually driven, dead-head legs and extras included.
    pub total_km: f64,
    /// Plain round trip of the effective distance.
    pub base_round_trip_km: f64,
    pub extra_km: f64,
}

/// Applies the manual override and extra kilometres, then multiplies the
/// one-way distance by 2 (round trip) or 4 (vehicle also returns empty).
pub fn normalize(estimate: &DistanceEstimate, return_vehicle_empty: bool) -> NormalizedDistance {
    let adjustment = &estimate.adjustment;
    let effective_one_way_km = if adjustment.adjusted_one_way_km > 0.0 {
        adjustment.adjusted_one_way_km
    } else {
        estimate.one_way_km
    };
    let extra_km = if adjustment.extra_km.is_finite() {
        adjustment.extra_km
    } else {
        0.0
    };
    let multiplier = if return_vehicle_empty { 4.0 } else { 2.0 };

    NormalizedDistance {
        effective_one_way_km,
        total_km: effective_one_way_km * multiplier + extra_km,
        base_round_trip_km: effective_one_way_km * 2.0,
        extra_km,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quote::ManualAdjustment;

    fn estimate(one_way_km: f64, adjusted_one_way_km: f64, extra_km: f64) -> DistanceEstimate {
        DistanceEstimate {
            one_way_km,
            adjustment: ManualAdjustment {
                adjusted_one_way_km,
                extra_km,
            },
        }
    }

    #[test]
    fn test_segment_source_counts_legs() {
        let source = SegmentDistanceSource::default();
        let stops: Vec<String> = ["CDMX", "Puebla", "Oaxaca"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(source.one_way_km(&stops), 200.0);
        assert_eq!(source.one_way_km(&stops[..1]), 0.0);
        assert_eq!(source.one_way_km(&[]), 0.0);

        let custom = SegmentDistanceSource::new(75.0);
        assert_eq!(custom.one_way_km(&stops), 150.0);
    }

    #[test]
    fn test_round_trip_without_adjustments() {
        let distance = normalize(&estimate(300.0, 0.0, 0.0), false);
        assert_eq!(distance.effective_one_way_km, 300.0);
        assert_eq!(distance.total_km, 600.0);
        assert_eq!(distance.base_round_trip_km, 600.0);
        assert_eq!(distance.extra_km, 0.0);
    }

    #[test]
    fn test_adjusted_distance_overrides_estimate() {
        let distance = normalize(&estimate(300.0, 420.0, 35.0), false);
        assert_eq!(distance.effective_one_way_km, 420.0);
        assert_eq!(distance.total_km, 875.0);
        assert_eq!(distance.base_round_trip_km, 840.0);

        // Non-positive overrides are ignored.
        let ignored = normalize(&estimate(300.0, -5.0, 0.0), false);
        assert_eq!(ignored.effective_one_way_km, 300.0);
    }

    #[test]
    fn test_empty_return_adds_two_one_way_legs() {
        let base = estimate(250.0, 0.0, 40.0);
        let normal = normalize(&base, false);
        let empty_return = normalize(&base, true);

        assert_eq!(empty_return.total_km, 1040.0);
        assert_eq!(
            empty_return.total_km,
            normal.total_km + 2.0 * normal.effective_one_way_km
        );
        assert_eq!(empty_return.base_round_trip_km, normal.base_round_trip_km);
    }

    #[test]
    fn test_non_finite_extra_km_counts_as_zero() {
        let distance = normalize(&estimate(100.0, 0.0, f64::NAN), false);
        assert_eq!(distance.extra_km, 0.0);
        assert_eq!(distance.total_km, 200.0);
    }
}
