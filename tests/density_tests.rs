mod support;

use approx::assert_relative_eq;
use rdv::core::{Dimensionality, Margin, Viewport, compute_density, drawable_extent};
use rdv::render::Scene;
use rdv::vis::{Vis, VisConfig};

const MARGIN: Margin = Margin::new(15.0, 30.0, 30.0, 15.0);

#[test]
fn area_density_uses_inner_box() {
    let viewport = Viewport::new(130.0, 130.0);
    assert_eq!(drawable_extent(viewport, MARGIN, Dimensionality::Area), 7225.0);
    let density = compute_density(1000, viewport, MARGIN, Dimensionality::Area);
    assert_relative_eq!(density, 1000.0 / 7225.0);
    assert_relative_eq!(density, 0.1384, epsilon = 1e-4);
}

#[test]
fn orchestrator_density_tracks_resize_and_data() {
    let config = VisConfig::new(MARGIN, Dimensionality::Area);
    let mut vis: Vis<u32, Scene> = Vis::new(config, Vec::new()).expect("vis init");
    vis.bind(Scene::new(Viewport::new(130.0, 130.0)));
    vis.resize().expect("resize");
    vis.set_data(support::records(1000));
    assert_relative_eq!(vis.density(), 1000.0 / 7225.0);
    assert_relative_eq!(vis.context().density(), vis.density());

    vis.target_mut()
        .expect("bound")
        .set_size(Viewport::new(230.0, 130.0));
    vis.resize().expect("resize");
    assert_relative_eq!(vis.density(), 1000.0 / (185.0 * 85.0));
}

#[test]
fn width_and_height_modes_use_one_axis() {
    let viewport = Viewport::new(130.0, 230.0);
    assert_relative_eq!(
        compute_density(85, viewport, MARGIN, Dimensionality::Width),
        1.0
    );
    assert_relative_eq!(
        compute_density(370, viewport, MARGIN, Dimensionality::Height),
        2.0
    );
}

#[test]
fn empty_dataset_has_zero_density() {
    let viewport = Viewport::new(130.0, 130.0);
    assert_eq!(
        compute_density(0, viewport, MARGIN, Dimensionality::Area),
        0.0
    );
}

#[test]
fn margins_exceeding_viewport_yield_non_finite_density() {
    let viewport = Viewport::new(40.0, 40.0);
    assert_eq!(
        compute_density(10, viewport, MARGIN, Dimensionality::Area),
        f64::INFINITY
    );
    assert!(compute_density(0, viewport, MARGIN, Dimensionality::Area).is_nan());
}

#[test]
fn unmeasured_orchestrator_reports_non_finite_density() {
    let mut vis: Vis<u32, Scene> = Vis::new(VisConfig::default(), Vec::new()).expect("vis init");
    assert!(vis.density().is_nan());
    vis.set_data(support::records(3));
    assert_eq!(vis.density(), f64::INFINITY);
}
