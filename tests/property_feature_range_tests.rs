use rdv::core::{DensityRange, Dimensionality, Margin, Viewport, compute_density};
use proptest::prelude::*;

proptest! {
    #[test]
    fn applies_matches_half_open_interval(
        low in 0.0f64..1.0,
        span in 0.0f64..1.0,
        density in -0.5f64..2.5
    ) {
        let high = low + span;
        let range = DensityRange::new(low, high).expect("ordered bounds");
        prop_assert_eq!(range.contains(density), low <= density && density < high);
        prop_assert!(range.contains(low) || span == 0.0);
        prop_assert!(!range.contains(high));
    }

    #[test]
    fn default_range_contains_every_non_negative_density(density in 0.0f64..1e12) {
        prop_assert!(DensityRange::ALWAYS.contains(density));
    }

    #[test]
    fn area_density_matches_formula(
        count in 0usize..100_000,
        width in 50.0f64..4_000.0,
        height in 50.0f64..4_000.0,
        side in 0.0f64..20.0
    ) {
        let margin = Margin::uniform(side);
        let viewport = Viewport::new(width, height);
        let expected = count as f64 / ((width - 2.0 * side) * (height - 2.0 * side));
        let density = compute_density(count, viewport, margin, Dimensionality::Area);
        prop_assert!((density - expected).abs() <= expected * 1e-12);
    }
}
