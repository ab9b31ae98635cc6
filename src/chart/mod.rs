//! Density-adaptive scatterplot built on [`Vis`].
//!
//! Sparse data is drawn as labelled, selectable circles; as density rises
//! labels, tooltips and point selection drop out in favour of a brush, and
//! past `5e-3` points per pixel the circles give way to aggregated bins.

mod binning;
mod interaction;
mod marks;

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{Dimensionality, LinearScale, Margin, Viewport};
use crate::error::{VisError, VisResult};
use crate::feature::Feature;
use crate::render::{
    Action, Color, Element, ElementRef, PointerEventKind, RectPrimitive, Region, RenderTarget,
    Scene, Shape, TextHAlign, TextPrimitive,
};
use crate::vis::{RenderPass, Vis, VisConfig};

pub use binning::bin_counts;

/// Density ranges the scatterplot's features switch on.
pub mod ranges {
    use crate::core::DensityRange;

    pub const SUPER_LOW: DensityRange = DensityRange::from_ordered(0.0, 1e-4);
    pub const VERY_LOW: DensityRange = DensityRange::from_ordered(0.0, 8e-4);
    pub const LOW: DensityRange = DensityRange::from_ordered(0.0, 5e-3);
    pub const MED_LOW: DensityRange = DensityRange::from_ordered(1e-4, 5e-3);
    pub const HIGH_LOW: DensityRange = DensityRange::from_ordered(8e-4, 5e-3);
    pub const MED: DensityRange = DensityRange::from_ordered(5e-3, 1e-2);
    pub const HIGH: DensityRange = DensityRange::from_ordered(1e-2, f64::INFINITY);
    pub const MED_HIGH: DensityRange = DensityRange::from_ordered(5e-3, f64::INFINITY);
}

pub const MARGIN: Margin = Margin::new(15.0, 30.0, 30.0, 15.0);

pub(crate) const AXES_REGION: &str = "axes";
pub(crate) const CIRCLES_REGION: &str = "circles";
pub(crate) const BINS_REGION: &str = "bins";
pub(crate) const BRUSH_REGION: &str = "brush";
pub(crate) const LABELS_REGION: &str = "labels";
pub(crate) const TOOLTIP_REGION: &str = "tooltip";

pub(crate) const SELECTED_CLASS: &str = "selected";
pub(crate) const BRUSHED_CLASS: &str = "selected-brush";

const HIGHLIGHT: Color = Color::RED;
const TOOLTIP_OFFSET_Y: f64 = -5.0;

/// One scatterplot datum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub name: String,
}

impl Record {
    #[must_use]
    pub fn new(x: f64, y: f64, name: impl Into<String>) -> Self {
        Self {
            x,
            y,
            name: name.into(),
        }
    }
}

/// Points and bins the user has selected, by index.
///
/// Replacing the dataset clears it, since indices no longer refer to the
/// same records.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    points: IndexSet<usize>,
    bins: IndexSet<usize>,
}

impl Selection {
    #[must_use]
    pub fn contains_point(&self, index: usize) -> bool {
        self.points.contains(&index)
    }

    #[must_use]
    pub fn contains_bin(&self, index: usize) -> bool {
        self.bins.contains(&index)
    }

    pub fn points(&self) -> impl Iterator<Item = usize> + '_ {
        self.points.iter().copied()
    }

    pub fn bins(&self) -> impl Iterator<Item = usize> + '_ {
        self.bins.iter().copied()
    }

    /// Sets or flips membership of a point; returns whether it is now selected.
    pub fn toggle_point(&mut self, index: usize, selected: Option<bool>) -> bool {
        toggle(&mut self.points, index, selected)
    }

    pub fn toggle_bin(&mut self, index: usize, selected: Option<bool>) -> bool {
        toggle(&mut self.bins, index, selected)
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.bins.clear();
    }
}

fn toggle(set: &mut IndexSet<usize>, index: usize, selected: Option<bool>) -> bool {
    let selected = selected.unwrap_or(!set.contains(&index));
    if selected {
        set.insert(index);
    } else {
        set.shift_remove(&index);
    }
    selected
}

/// Data-space rectangle swept by the brush.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushExtent {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BrushExtent {
    #[must_use]
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    /// Strict containment; points on the edge are outside.
    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        self.x0 < x && x < self.x1 && self.y0 < y && y < self.y1
    }
}

/// State shared between the chart's features and event handlers.
#[derive(Debug, Clone, Default)]
pub struct ChartState {
    pub x: LinearScale,
    pub y: LinearScale,
    pub selection: Selection,
    pub(crate) bin_counts: Vec<u32>,
}

pub(crate) type SharedState = Rc<RefCell<ChartState>>;

/// Density-adaptive scatterplot: a [`Vis`] over [`Record`]s drawing into a
/// [`Scene`], plus the pointer and brush interactions its features enable.
pub struct Scatterplot {
    vis: Vis<Record, Scene>,
    state: SharedState,
}

impl Scatterplot {
    pub fn new() -> VisResult<Self> {
        Self::with_config(VisConfig::new(MARGIN, Dimensionality::Area))
    }

    pub fn with_config(config: VisConfig) -> VisResult<Self> {
        let state = SharedState::default();
        let features: Vec<Box<dyn Feature<Record, Scene>>> = vec![
            Box::new(marks::Axes::new(state.clone())),
            Box::new(marks::Circles::new(state.clone())),
            Box::new(marks::Bins::new(state.clone())),
            Box::new(interaction::PointSelection::new(state.clone())),
            Box::new(interaction::BrushSelection::new(state.clone())),
            Box::new(interaction::BinSelection::new(state.clone())),
            Box::new(marks::Labels::new(state.clone())),
            Box::new(interaction::Tooltips::new()),
            Box::new(interaction::BinTooltips::new(state.clone())),
        ];
        let mut vis = Vis::new(config, features)?;

        let margin = config.margin;
        let on_data = state.clone();
        vis.on_data(move |records: &[Record]| {
            let mut state = on_data.borrow_mut();
            state.selection.clear();
            if let Some((x, y)) = data_extent(records) {
                if let Err(err) = set_nice_domain(&mut state, x, y) {
                    warn!(error = %err, "skipping scale domain update for non-finite data");
                }
            }
        });

        let on_resize = state.clone();
        vis.on_resize(move |width, height| {
            let mut state = on_resize.borrow_mut();
            let inner_width = width - margin.horizontal();
            let inner_height = height - margin.vertical();
            let updated = state
                .x
                .set_range(0.0, inner_width)
                .and_then(|()| state.y.set_range(inner_height, 0.0));
            if let Err(err) = updated {
                warn!(error = %err, "skipping scale range update");
            }
        });

        Ok(Self { vis, state })
    }

    #[must_use]
    pub fn vis(&self) -> &Vis<Record, Scene> {
        &self.vis
    }

    pub fn vis_mut(&mut self) -> &mut Vis<Record, Scene> {
        &mut self.vis
    }

    pub fn bind(&mut self, scene: Scene) -> Option<Scene> {
        self.vis.bind(scene)
    }

    #[must_use]
    pub fn scene(&self) -> Option<&Scene> {
        self.vis.target()
    }

    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.vis.target_mut()
    }

    pub fn set_data(&mut self, records: Vec<Record>) {
        self.vis.set_data(records);
    }

    pub fn resize(&mut self) -> VisResult<Viewport> {
        self.vis.resize()
    }

    pub fn render(&mut self) -> VisResult<RenderPass> {
        self.vis.render()
    }

    #[must_use]
    pub fn density(&self) -> f64 {
        self.vis.density()
    }

    #[must_use]
    pub fn selection(&self) -> Selection {
        self.state.borrow().selection.clone()
    }

    #[must_use]
    pub fn scales(&self) -> (LinearScale, LinearScale) {
        let state = self.state.borrow();
        (state.x, state.y)
    }

    /// Delivers a pointer event to one element and runs the actions bound
    /// to it. Returns `false` when the element is missing or has no
    /// binding for `event`.
    pub fn pointer(&mut self, event: PointerEventKind, at: &ElementRef) -> VisResult<bool> {
        let scene = self
            .vis
            .target_mut()
            .ok_or(VisError::Unbound {
                operation: "pointer",
            })?;
        let Some(element) = scene.element(at) else {
            return Ok(false);
        };
        let actions: Vec<Action> = element.actions_for(event).cloned().collect();
        if actions.is_empty() {
            return Ok(false);
        }

        let mut state = self.state.borrow_mut();
        for action in actions {
            apply_action(scene, &mut state, at, action);
        }
        Ok(true)
    }

    /// Pointer event at a scene-space position, routed to the topmost
    /// element under it.
    pub fn pointer_at(&mut self, event: PointerEventKind, x: f64, y: f64) -> VisResult<bool> {
        let scene = self.vis.target().ok_or(VisError::Unbound {
            operation: "pointer_at",
        })?;
        match scene.hit_test(x, y) {
            Some(at) => self.pointer(event, &at),
            None => Ok(false),
        }
    }

    /// Applies a brush sweep. Every drawn point strictly inside `extent` is
    /// selected and every other point deselected. Returns `None` when the
    /// brush feature is inactive, otherwise the number of brushed points.
    pub fn brush(&mut self, extent: BrushExtent) -> VisResult<Option<usize>> {
        let positions: Vec<(f64, f64)> = self
            .vis
            .data()
            .iter()
            .map(|record| (record.x, record.y))
            .collect();
        let scene = self.vis.target_mut().ok_or(VisError::Unbound {
            operation: "brush",
        })?;
        if scene.region_mut(BRUSH_REGION).is_none() {
            return Ok(None);
        }

        let mut state = self.state.borrow_mut();
        let mut brushed = 0;
        if let Some(circles) = scene.region_mut(CIRCLES_REGION) {
            for element in circles.elements_mut() {
                let Some(datum) = element.datum else {
                    continue;
                };
                let Some(&(x, y)) = positions.get(datum) else {
                    continue;
                };
                let inside = extent.contains(x, y);
                state.selection.toggle_point(datum, Some(inside));
                element.classed(BRUSHED_CLASS, inside);
                brushed += usize::from(inside);
            }
        }

        let (x0, x1) = (state.x.map(extent.x0), state.x.map(extent.x1));
        let (y0, y1) = (state.y.map(extent.y0), state.y.map(extent.y1));
        if let Some(region) = scene.region_mut(BRUSH_REGION) {
            interaction::set_brush_extent(
                region,
                x0.min(x1),
                y0.min(y1),
                (x1 - x0).abs(),
                (y1 - y0).abs(),
            );
        }
        debug!(brushed, "brush sweep");
        Ok(Some(brushed))
    }

    /// Ends a brush gesture: the drawn extent collapses, the selection stays.
    pub fn brush_end(&mut self) -> VisResult<()> {
        let scene = self.vis.target_mut().ok_or(VisError::Unbound {
            operation: "brush_end",
        })?;
        if let Some(region) = scene.region_mut(BRUSH_REGION) {
            interaction::set_brush_extent(region, 0.0, 0.0, 0.0, 0.0);
        }
        Ok(())
    }
}

fn apply_action(scene: &mut Scene, state: &mut ChartState, at: &ElementRef, action: Action) {
    match action {
        Action::Highlight => {
            if let Some(element) = scene.element_mut(at) {
                element.highlight = Some(HIGHLIGHT);
            }
        }
        Action::ClearHighlight => {
            if let Some(element) = scene.element_mut(at) {
                element.highlight = None;
            }
        }
        Action::ToggleSelection => {
            let Some(element) = scene.element_mut(at) else {
                return;
            };
            let index = element.datum.unwrap_or(at.index);
            let selected = if at.region == BINS_REGION {
                state.selection.toggle_bin(index, None)
            } else {
                state.selection.toggle_point(index, None)
            };
            element.classed(SELECTED_CLASS, selected);
            if !selected {
                element.highlight = None;
            }
        }
        Action::ShowTooltip(text) => {
            let Some((x, y)) = anchor_of(scene, at) else {
                return;
            };
            let region = scene.ensure_region(TOOLTIP_REGION);
            region.clear();
            region.push(Element::new(Shape::Text(TextPrimitive::new(
                text,
                x,
                y + TOOLTIP_OFFSET_Y,
                12.0,
                Color::BLACK,
                TextHAlign::Center,
            ))));
        }
        Action::HideTooltip => {
            scene.remove_region(TOOLTIP_REGION);
        }
    }
}

/// Scene-space top-center of an element.
fn anchor_of(scene: &Scene, at: &ElementRef) -> Option<(f64, f64)> {
    let (dx, dy) = scene.region(&at.region)?.offset();
    let element = scene.element(at)?;
    let (x, y) = match &element.shape {
        Shape::Circle(circle) => (circle.cx, circle.cy - circle.radius),
        Shape::Rect(RectPrimitive { x, y, width, .. }) => (x + width / 2.0, *y),
        Shape::Text(text) => (text.x, text.y),
        Shape::Line(line) => ((line.x1 + line.x2) / 2.0, line.y1.min(line.y2)),
    };
    Some((x + dx, y + dy))
}

/// `(x extent, y extent)` over finite coordinates.
fn data_extent(records: &[Record]) -> Option<((f64, f64), (f64, f64))> {
    let mut x = (f64::INFINITY, f64::NEG_INFINITY);
    let mut y = (f64::INFINITY, f64::NEG_INFINITY);
    for record in records {
        if record.x.is_finite() {
            x = (x.0.min(record.x), x.1.max(record.x));
        }
        if record.y.is_finite() {
            y = (y.0.min(record.y), y.1.max(record.y));
        }
    }
    (x.0 <= x.1 && y.0 <= y.1).then_some((x, y))
}

fn set_nice_domain(state: &mut ChartState, x: (f64, f64), y: (f64, f64)) -> VisResult<()> {
    state.x.set_domain(x.0, x.1)?;
    state.x.nice(10);
    state.y.set_domain(y.0, y.1)?;
    state.y.nice(10);
    Ok(())
}

/// Keyed container shared by the chart's drawing features: created on first
/// use and shifted inside the margin.
pub(crate) fn plot_region<'a>(
    scene: &'a mut Scene,
    key: &str,
    margin: Margin,
) -> &'a mut Region {
    let region = scene.ensure_region(key);
    region.set_offset(margin.left, margin.top);
    region
}

#[cfg(test)]
mod tests {
    use super::{BrushExtent, Record, Selection, data_extent};

    #[test]
    fn brush_extent_is_normalized_and_strict() {
        let extent = BrushExtent::new(5.0, 5.0, 1.0, 1.0);
        assert!(extent.contains(3.0, 3.0));
        assert!(!extent.contains(1.0, 3.0));
        assert!(!extent.contains(3.0, 5.0));
    }

    #[test]
    fn toggle_without_explicit_state_flips_membership() {
        let mut selection = Selection::default();
        assert!(selection.toggle_point(3, None));
        assert!(selection.contains_point(3));
        assert!(!selection.toggle_point(3, None));
        assert!(!selection.contains_point(3));
        assert!(selection.toggle_point(4, Some(true)));
        assert!(selection.toggle_point(4, Some(true)));
        assert_eq!(selection.points().count(), 1);
    }

    #[test]
    fn data_extent_skips_non_finite_coordinates() {
        let records = vec![
            Record::new(1.0, 10.0, "a"),
            Record::new(f64::NAN, 30.0, "b"),
            Record::new(4.0, f64::INFINITY, "c"),
        ];
        assert_eq!(data_extent(&records), Some(((1.0, 4.0), (10.0, 30.0))));
        assert_eq!(data_extent(&[]), None);
    }
}
