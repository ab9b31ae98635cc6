use tracing::trace;

use crate::core::{DensityRange, LinearScale};
use crate::error::VisResult;
use crate::feature::Feature;
use crate::render::{
    CirclePrimitive, Color, Element, LinePrimitive, RectPrimitive, RenderTarget, Scene, Shape,
    TextHAlign, TextPrimitive,
};
use crate::vis::VisContext;

use super::{
    AXES_REGION, BINS_REGION, CIRCLES_REGION, LABELS_REGION, Record, SharedState, bin_counts,
    plot_region, ranges,
};

const MIN_TICK_SPACING_PX: f64 = 30.0;
const MAX_TICKS: usize = 10;
const TICK_SIZE_PX: f64 = 6.0;
const AXIS_FONT_PX: f64 = 10.0;
const LABEL_FONT_PX: f64 = 11.0;

const CIRCLE_TARGET_DENSITY: f64 = 2e-2;
const CIRCLE_MIN_RADIUS: f64 = 2.0;
const CIRCLE_MAX_RADIUS: f64 = 12.0;
const BIN_TARGET_DENSITY: f64 = 5e-3;

/// X and y axes. Always applies and leaves nothing to clean up.
pub(crate) struct Axes {
    state: SharedState,
}

impl Axes {
    pub(crate) fn new(state: SharedState) -> Self {
        Self { state }
    }
}

impl Feature<Record, Scene> for Axes {
    fn id(&self) -> &str {
        "axes"
    }

    fn activate(&mut self, scene: &mut Scene, vis: &VisContext<'_, Record>) -> VisResult<()> {
        let state = self.state.borrow();
        let width = vis.inner_width();
        let height = vis.inner_height();
        let region = plot_region(scene, AXES_REGION, vis.margin());
        region.clear();

        region.push(axis_line(0.0, height, width, height));
        for (value, label) in tick_labels(state.x, tick_count(width)) {
            let px = state.x.map(value);
            region.push(axis_line(px, height, px, height + TICK_SIZE_PX));
            region.push(axis_text(label, px, height + TICK_SIZE_PX + 12.0, TextHAlign::Center));
        }

        region.push(axis_line(0.0, 0.0, 0.0, height));
        for (value, label) in tick_labels(state.y, tick_count(height)) {
            let py = state.y.map(value);
            region.push(axis_line(-TICK_SIZE_PX, py, 0.0, py));
            region.push(axis_text(label, -TICK_SIZE_PX - 3.0, py + 3.0, TextHAlign::Right));
        }
        trace!(elements = region.len(), "axes drawn");
        Ok(())
    }
}

fn tick_count(extent: f64) -> usize {
    let fitting = (extent / MIN_TICK_SPACING_PX).floor();
    if fitting.is_finite() && fitting > 0.0 {
        (fitting as usize).min(MAX_TICKS)
    } else {
        0
    }
}

fn tick_labels(scale: LinearScale, count: usize) -> Vec<(f64, String)> {
    let ticks = scale.ticks(count);
    let step = match ticks.as_slice() {
        [first, second, ..] => (second - first).abs(),
        _ => 1.0,
    };
    let decimals = if step > 0.0 && step < 1.0 {
        (-step.log10().floor()) as usize
    } else {
        0
    };
    ticks
        .into_iter()
        .map(|value| (value, format!("{value:.decimals$}")))
        .collect()
}

fn axis_line(x1: f64, y1: f64, x2: f64, y2: f64) -> Element {
    Element::new(Shape::Line(LinePrimitive::new(x1, y1, x2, y2, 1.0, Color::BLACK)))
}

fn axis_text(label: String, x: f64, y: f64, align: TextHAlign) -> Element {
    Element::new(Shape::Text(TextPrimitive::new(
        label,
        x,
        y,
        AXIS_FONT_PX,
        Color::BLACK,
        align,
    )))
}

/// Radius that spreads the ink of `count` circles to roughly the target
/// density over the plot area.
#[must_use]
pub(crate) fn circle_radius(width: f64, height: f64, count: usize) -> f64 {
    let radius = (CIRCLE_TARGET_DENSITY * width * height / count as f64).sqrt();
    if radius.is_nan() {
        return CIRCLE_MIN_RADIUS;
    }
    radius.clamp(CIRCLE_MIN_RADIUS, CIRCLE_MAX_RADIUS)
}

/// One circle per record, joined by index.
pub(crate) struct Circles {
    state: SharedState,
}

impl Circles {
    pub(crate) fn new(state: SharedState) -> Self {
        Self { state }
    }
}

impl Feature<Record, Scene> for Circles {
    fn id(&self) -> &str {
        "circles"
    }

    fn range(&self) -> DensityRange {
        ranges::LOW
    }

    fn activate(&mut self, scene: &mut Scene, vis: &VisContext<'_, Record>) -> VisResult<()> {
        let state = self.state.borrow();
        let data = vis.data();
        let radius = circle_radius(vis.inner_width(), vis.inner_height(), data.len());
        let region = plot_region(scene, CIRCLES_REGION, vis.margin());
        let elements = region.join(data.len(), |index| {
            Element::new(Shape::Circle(CirclePrimitive::new(
                0.0,
                0.0,
                radius,
                Color::STEEL_BLUE,
            )))
            .with_datum(index)
        });
        for (element, record) in elements.iter_mut().zip(data) {
            element.shape = Shape::Circle(CirclePrimitive::new(
                state.x.map(record.x),
                state.y.map(record.y),
                radius,
                Color::STEEL_BLUE,
            ));
        }
        Ok(())
    }

    fn deactivate(&mut self, scene: &mut Scene, _vis: &VisContext<'_, Record>) -> VisResult<()> {
        scene.remove_region(CIRCLES_REGION);
        Ok(())
    }
}

/// Square grid of count-shaded cells replacing circles at high density.
pub(crate) struct Bins {
    state: SharedState,
}

impl Bins {
    pub(crate) fn new(state: SharedState) -> Self {
        Self { state }
    }
}

/// Cells per side so that each cell holds roughly the target density.
#[must_use]
pub(crate) fn bins_per_side(width: f64, height: f64) -> usize {
    let side = (width * height * BIN_TARGET_DENSITY).sqrt().floor();
    if side.is_finite() && side > 0.0 {
        side as usize
    } else {
        0
    }
}

impl Feature<Record, Scene> for Bins {
    fn id(&self) -> &str {
        "bins"
    }

    fn range(&self) -> DensityRange {
        ranges::MED_HIGH
    }

    fn activate(&mut self, scene: &mut Scene, vis: &VisContext<'_, Record>) -> VisResult<()> {
        let mut state = self.state.borrow_mut();
        let width = vis.inner_width();
        let height = vis.inner_height();
        let side = bins_per_side(width, height);
        let counts = bin_counts(vis.data(), state.x.domain(), state.y.domain(), side);
        let max = counts.iter().copied().max().unwrap_or(0);

        let region = plot_region(scene, BINS_REGION, vis.margin());
        let cell_width = if side == 0 { 0.0 } else { width / side as f64 };
        let cell_height = if side == 0 { 0.0 } else { height / side as f64 };
        let elements = region.join(counts.len(), |index| {
            Element::new(Shape::Rect(RectPrimitive::new(
                0.0,
                0.0,
                0.0,
                0.0,
                Color::STEEL_BLUE,
            )))
            .with_datum(index)
        });
        for (index, (element, count)) in elements.iter_mut().zip(&counts).enumerate() {
            let column = (index % side) as f64;
            let row = (index / side) as f64;
            let opacity = if max == 0 {
                0.0
            } else {
                (f64::from(*count) / f64::from(max)).sqrt()
            };
            element.shape = Shape::Rect(RectPrimitive::new(
                column * cell_width,
                height - cell_height - row * cell_height,
                cell_width,
                cell_height,
                Color::STEEL_BLUE.with_alpha(opacity),
            ));
        }
        trace!(side, max, "bins drawn");
        state.bin_counts = counts;
        Ok(())
    }

    fn deactivate(&mut self, scene: &mut Scene, _vis: &VisContext<'_, Record>) -> VisResult<()> {
        scene.remove_region(BINS_REGION);
        self.state.borrow_mut().bin_counts.clear();
        Ok(())
    }
}

/// Record names next to their points, only when very sparse.
pub(crate) struct Labels {
    state: SharedState,
}

impl Labels {
    pub(crate) fn new(state: SharedState) -> Self {
        Self { state }
    }
}

impl Feature<Record, Scene> for Labels {
    fn id(&self) -> &str {
        "labels"
    }

    fn range(&self) -> DensityRange {
        ranges::SUPER_LOW
    }

    fn activate(&mut self, scene: &mut Scene, vis: &VisContext<'_, Record>) -> VisResult<()> {
        let state = self.state.borrow();
        let data = vis.data();
        let width = vis.inner_width();
        let region = plot_region(scene, LABELS_REGION, vis.margin());
        let elements = region.join(data.len(), |index| {
            Element::new(Shape::Text(TextPrimitive::new(
                "",
                0.0,
                0.0,
                LABEL_FONT_PX,
                Color::BLACK,
                TextHAlign::Center,
            )))
            .with_datum(index)
        });
        for (element, record) in elements.iter_mut().zip(data) {
            let px = state.x.map(record.x);
            let py = state.y.map(record.y);
            // Labels sit above their point unless that would leave the plot,
            // and hang inward near the left/right edges.
            let dy = if py > 40.0 { -15.0 } else { 25.0 };
            let (dx, align) = if px < 20.0 {
                (-13.0, TextHAlign::Left)
            } else if px > width - 20.0 {
                (13.0, TextHAlign::Right)
            } else {
                (0.0, TextHAlign::Center)
            };
            element.shape = Shape::Text(TextPrimitive::new(
                record.name.clone(),
                px + dx,
                py + dy,
                LABEL_FONT_PX,
                Color::BLACK,
                align,
            ));
        }
        Ok(())
    }

    fn deactivate(&mut self, scene: &mut Scene, _vis: &VisContext<'_, Record>) -> VisResult<()> {
        scene.remove_region(LABELS_REGION);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{bins_per_side, circle_radius, tick_count};

    #[test]
    fn circle_radius_is_clamped() {
        assert_eq!(circle_radius(100.0, 100.0, 1), 12.0);
        assert_eq!(circle_radius(100.0, 100.0, 1_000_000), 2.0);
        let mid = circle_radius(100.0, 100.0, 50);
        assert!((mid - 2.0).abs() < 1e-12);
        assert_eq!(circle_radius(100.0, 100.0, 0), 12.0);
    }

    #[test]
    fn bins_per_side_tracks_plot_area() {
        assert_eq!(bins_per_side(400.0, 400.0), 28);
        assert_eq!(bins_per_side(0.0, 400.0), 0);
        assert_eq!(bins_per_side(-10.0, 400.0), 0);
    }

    #[test]
    fn tick_count_is_capped() {
        assert_eq!(tick_count(85.0), 2);
        assert_eq!(tick_count(10_000.0), 10);
        assert_eq!(tick_count(-5.0), 0);
    }
}
