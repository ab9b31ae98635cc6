use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::types::{Dimensionality, Margin, Viewport};
use crate::error::{VisError, VisResult};

/// Half-open interval `[low, high)` over the density metric.
///
/// An unbounded `high` (`+inf`) also admits a density of `+inf`, so a
/// default range applies even when the drawing area has collapsed.
/// `NaN` is never contained.
///
/// Serialized as `{"low": f64, "high": f64 | null}` where `null` marks an
/// unbounded `high`. Deserialization goes through [`DensityRange::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RangeBounds", into = "RangeBounds")]
pub struct DensityRange {
    low: f64,
    high: f64,
}

impl DensityRange {
    /// `[0, +inf)`: applies to every well-formed density.
    pub const ALWAYS: Self = Self {
        low: 0.0,
        high: f64::INFINITY,
    };

    pub fn new(low: f64, high: f64) -> VisResult<Self> {
        if low.is_nan() || high.is_nan() || low > high {
            return Err(VisError::InvalidRange { low, high });
        }
        Ok(Self { low, high })
    }

    /// Compile-time constructor for bounds known to be ordered.
    pub(crate) const fn from_ordered(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// `[low, +inf)`.
    pub fn at_least(low: f64) -> VisResult<Self> {
        Self::new(low, f64::INFINITY)
    }

    #[must_use]
    pub fn low(self) -> f64 {
        self.low
    }

    #[must_use]
    pub fn high(self) -> f64 {
        self.high
    }

    #[must_use]
    pub fn is_unbounded(self) -> bool {
        self.high == f64::INFINITY
    }

    #[must_use]
    pub fn contains(self, density: f64) -> bool {
        if density.is_nan() || density < self.low {
            return false;
        }
        density < self.high || (density == f64::INFINITY && self.is_unbounded())
    }
}

#[derive(Serialize, Deserialize)]
struct RangeBounds {
    low: f64,
    #[serde(default)]
    high: Option<f64>,
}

impl TryFrom<RangeBounds> for DensityRange {
    type Error = VisError;

    fn try_from(bounds: RangeBounds) -> VisResult<Self> {
        Self::new(bounds.low, bounds.high.unwrap_or(f64::INFINITY))
    }
}

impl From<DensityRange> for RangeBounds {
    fn from(range: DensityRange) -> Self {
        Self {
            low: range.low,
            high: (!range.is_unbounded()).then_some(range.high),
        }
    }
}

impl Default for DensityRange {
    fn default() -> Self {
        Self::ALWAYS
    }
}

/// Pixel extent inside the margins selected by `dimensionality`.
#[must_use]
pub fn drawable_extent(viewport: Viewport, margin: Margin, dimensionality: Dimensionality) -> f64 {
    let width = margin.inner_width(viewport);
    let height = margin.inner_height(viewport);
    match dimensionality {
        Dimensionality::Area => width * height,
        Dimensionality::Width => width,
        Dimensionality::Height => height,
    }
}

/// Data points per pixel.
///
/// A non-positive extent (margins swallowing the viewport) is not clamped:
/// it yields `+inf` for a non-empty dataset and `NaN` for an empty one, so
/// only unbounded ranges apply. Either side collapsing counts, even when
/// the area product of two negative sides would be positive.
#[must_use]
pub fn compute_density(
    record_count: usize,
    viewport: Viewport,
    margin: Margin,
    dimensionality: Dimensionality,
) -> f64 {
    let width = margin.inner_width(viewport);
    let height = margin.inner_height(viewport);
    let positive = |extent: f64| extent > 0.0;
    let degenerate = match dimensionality {
        Dimensionality::Area => !(positive(width) && positive(height)),
        Dimensionality::Width => !positive(width),
        Dimensionality::Height => !positive(height),
    };

    if degenerate {
        let density = if record_count == 0 {
            f64::NAN
        } else {
            f64::INFINITY
        };
        warn!(
            width,
            height,
            ?dimensionality,
            density,
            "drawable extent is not positive"
        );
        return density;
    }

    record_count as f64 / drawable_extent(viewport, margin, dimensionality)
}

#[cfg(test)]
mod tests {
    use super::{DensityRange, compute_density};
    use crate::core::{Dimensionality, Margin, Viewport};

    #[test]
    fn range_rejects_inverted_bounds() {
        assert!(DensityRange::new(2.0, 1.0).is_err());
        assert!(DensityRange::new(f64::NAN, 1.0).is_err());
        assert!(DensityRange::new(1.0, 1.0).is_ok());
    }

    #[test]
    fn empty_range_contains_nothing() {
        let range = DensityRange::new(1.0, 1.0).expect("valid range");
        assert!(!range.contains(1.0));
    }

    #[test]
    fn infinity_only_matches_unbounded_ranges() {
        assert!(DensityRange::ALWAYS.contains(f64::INFINITY));
        let bounded = DensityRange::new(0.0, 1e9).expect("valid range");
        assert!(!bounded.contains(f64::INFINITY));
        assert!(!DensityRange::ALWAYS.contains(f64::NAN));
    }

    #[test]
    fn unbounded_range_round_trips_through_json() {
        let json = serde_json::to_string(&DensityRange::ALWAYS).expect("serialize");
        assert_eq!(json, r#"{"low":0.0,"high":null}"#);
        let parsed: DensityRange = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, DensityRange::ALWAYS);

        let bounded = DensityRange::new(5e-3, 1e-2).expect("valid range");
        let json = serde_json::to_string(&bounded).expect("serialize");
        let parsed: DensityRange = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, bounded);

        let open: DensityRange = serde_json::from_str(r#"{"low":1e-4}"#).expect("deserialize");
        assert!(open.is_unbounded());
    }

    #[test]
    fn deserialization_rejects_inverted_bounds() {
        let parsed = serde_json::from_str::<DensityRange>(r#"{"low":2.0,"high":1.0}"#);
        let err = parsed.expect_err("inverted bounds must be rejected");
        assert!(err.to_string().contains("invalid density range"), "{err}");
    }

    #[test]
    fn collapsed_axis_is_degenerate_even_when_area_is_positive() {
        let margin = Margin::uniform(100.0);
        let viewport = Viewport::new(50.0, 50.0);
        let density = compute_density(10, viewport, margin, Dimensionality::Area);
        assert_eq!(density, f64::INFINITY);
        assert!(compute_density(0, viewport, margin, Dimensionality::Area).is_nan());
    }

    #[test]
    fn single_axis_modes_ignore_the_other_axis() {
        let margin = Margin::new(0.0, 200.0, 10.0, 10.0);
        let viewport = Viewport::new(120.0, 100.0);
        assert_eq!(
            compute_density(50, viewport, margin, Dimensionality::Width),
            0.5
        );
        assert_eq!(
            compute_density(50, viewport, margin, Dimensionality::Height),
            f64::INFINITY
        );
    }
}
