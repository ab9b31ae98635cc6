#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use rdv::core::{DensityRange, Dimensionality, Margin, Viewport};
use rdv::feature::{Feature, FeatureConfig};
use rdv::render::{CirclePrimitive, Color, Element, RenderTarget, Scene, Shape};
use rdv::vis::{Vis, VisConfig};

pub type Log = Rc<RefCell<Vec<String>>>;

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

/// Feature that only records which callback ran.
pub fn recording(id: &'static str, range: DensityRange, log: &Log) -> Box<dyn Feature<u32, Scene>> {
    let on = log.clone();
    let off = log.clone();
    Box::new(
        FeatureConfig::<u32, Scene>::new(id)
            .with_range(range)
            .on_activate(move |_, _, _| {
                on.borrow_mut().push(format!("{id}:on"));
                Ok(())
            })
            .on_deactivate(move |_, _, _| {
                off.borrow_mut().push(format!("{id}:off"));
                Ok(())
            }),
    )
}

/// Feature drawing one dot per record into its own region.
pub fn dots(id: &'static str, range: DensityRange) -> Box<dyn Feature<u32, Scene>> {
    Box::new(
        FeatureConfig::<u32, Scene>::new(id)
            .with_range(range)
            .on_activate(move |_, scene, vis| {
                let region = scene.ensure_region(id);
                region.join(vis.data().len(), |index| {
                    Element::new(Shape::Circle(CirclePrimitive::new(
                        index as f64,
                        1.0,
                        1.0,
                        Color::BLACK,
                    )))
                    .with_datum(index)
                });
                Ok(())
            })
            .on_deactivate(move |_, scene, _| {
                scene.remove_region(id);
                Ok(())
            }),
    )
}

pub fn range(low: f64, high: f64) -> DensityRange {
    DensityRange::new(low, high).expect("valid range")
}

/// Unit-margin-free area orchestrator bound to a scene of the given size.
pub fn bound_vis(
    features: Vec<Box<dyn Feature<u32, Scene>>>,
    width: f64,
    height: f64,
) -> Vis<u32, Scene> {
    let config = VisConfig::new(Margin::default(), Dimensionality::Area);
    let mut vis = Vis::new(config, features).expect("vis init");
    vis.bind(Scene::new(Viewport::new(width, height)));
    vis.resize().expect("resize");
    vis
}

pub fn records(count: u32) -> Vec<u32> {
    (0..count).collect()
}
