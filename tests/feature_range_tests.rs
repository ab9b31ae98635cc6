mod support;

use rdv::core::DensityRange;
use rdv::feature::{Feature, FeatureConfig, Transition};
use rdv::render::Scene;
use support::range;

fn feature(range: DensityRange) -> FeatureConfig<u32, Scene> {
    FeatureConfig::new("probe").with_range(range)
}

#[test]
fn range_is_half_open() {
    let probe = feature(range(5e-3, 1e-2));
    assert!(probe.applies(5e-3));
    assert!(probe.applies(7e-3));
    assert!(!probe.applies(1e-2));
    assert!(!probe.applies(4.9e-3));
}

#[test]
fn select_maps_applicability_to_transition() {
    let probe = feature(range(0.0, 1.0));
    assert_eq!(probe.select(0.5), Transition::Activate);
    assert_eq!(probe.select(1.0), Transition::Deactivate);
}

#[test]
fn default_range_applies_everywhere() {
    let probe = FeatureConfig::<u32, Scene>::new("always");
    assert_eq!(probe.range(), DensityRange::ALWAYS);
    for density in [0.0, 1.0, 1e9, f64::INFINITY] {
        assert!(probe.applies(density), "density {density}");
    }
}

#[test]
fn nan_density_applies_to_no_range() {
    assert!(!feature(DensityRange::ALWAYS).applies(f64::NAN));
    assert_eq!(
        feature(DensityRange::ALWAYS).select(f64::NAN),
        Transition::Deactivate
    );
}

#[test]
fn infinite_density_only_applies_to_unbounded_ranges() {
    assert!(feature(range(1e-2, f64::INFINITY)).applies(f64::INFINITY));
    assert!(!feature(range(0.0, 1e12)).applies(f64::INFINITY));
}

#[test]
fn inverted_range_is_rejected() {
    let err = DensityRange::new(1.0, 0.5).expect_err("inverted range must fail");
    assert!(matches!(err, rdv::VisError::InvalidRange { .. }));
}

#[test]
fn callbacks_default_to_no_op() {
    let mut probe = FeatureConfig::<u32, Scene>::new("noop");
    let mut scene = Scene::default();
    let data = [1_u32, 2, 3];
    let context = rdv::vis::VisContext::new(
        &data,
        rdv::core::Viewport::new(10.0, 10.0),
        rdv::core::Margin::default(),
        rdv::core::Dimensionality::Area,
    );
    probe.activate(&mut scene, &context).expect("activate");
    probe.deactivate(&mut scene, &context).expect("deactivate");
    assert_eq!(scene, Scene::default());
}

#[test]
fn private_state_survives_between_calls() {
    let mut probe = FeatureConfig::<u32, Scene, usize>::with_state("counter", 0)
        .on_activate(|calls, _, _| {
            *calls += 1;
            Ok(())
        });
    let mut scene = Scene::default();
    let data: [u32; 0] = [];
    let context = rdv::vis::VisContext::new(
        &data,
        rdv::core::Viewport::new(10.0, 10.0),
        rdv::core::Margin::default(),
        rdv::core::Dimensionality::Area,
    );
    probe.activate(&mut scene, &context).expect("activate");
    probe.activate(&mut scene, &context).expect("activate");
    assert_eq!(*probe.state(), 2);
}
