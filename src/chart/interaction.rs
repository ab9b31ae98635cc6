use crate::core::DensityRange;
use crate::error::VisResult;
use crate::feature::Feature;
use crate::render::{
    Action, BindingKey, Color, Cursor, Element, PointerEventKind, RectPrimitive, Region,
    RenderTarget, Scene, Shape,
};
use crate::vis::VisContext;

use super::{
    BINS_REGION, BRUSHED_CLASS, BRUSH_REGION, CIRCLES_REGION, Record, SELECTED_CLASS,
    SharedState, TOOLTIP_REGION, plot_region, ranges,
};

const HIGHLIGHT_OVER: BindingKey = BindingKey::new(PointerEventKind::Over, "highlight");
const HIGHLIGHT_OUT: BindingKey = BindingKey::new(PointerEventKind::Out, "highlight");
const SELECTION_CLICK: BindingKey = BindingKey::new(PointerEventKind::Click, "selection");
const TIP_OVER: BindingKey = BindingKey::new(PointerEventKind::Over, "tip");
const TIP_OUT: BindingKey = BindingKey::new(PointerEventKind::Out, "tip");

const BRUSH_EXTENT_FILL: Color = Color::rgba(0.5, 0.5, 0.5, 0.25);

fn bind_selectable(element: &mut Element, selected: bool) {
    element.classed(SELECTED_CLASS, selected);
    element.cursor = Cursor::Pointer;
    element.bind(HIGHLIGHT_OVER, Action::Highlight);
    element.bind(HIGHLIGHT_OUT, Action::ClearHighlight);
    element.bind(SELECTION_CLICK, Action::ToggleSelection);
}

fn unbind_selectable(element: &mut Element) {
    element.classed(SELECTED_CLASS, false);
    element.cursor = Cursor::Default;
    element.unbind(&HIGHLIGHT_OVER);
    element.unbind(&HIGHLIGHT_OUT);
    element.unbind(&SELECTION_CLICK);
}

fn unbind_tips(element: &mut Element) {
    element.unbind(&TIP_OVER);
    element.unbind(&TIP_OUT);
}

/// Click-to-select and hover highlight on individual circles.
pub(crate) struct PointSelection {
    state: SharedState,
}

impl PointSelection {
    pub(crate) fn new(state: SharedState) -> Self {
        Self { state }
    }
}

impl Feature<Record, Scene> for PointSelection {
    fn id(&self) -> &str {
        "point-selection"
    }

    fn range(&self) -> DensityRange {
        ranges::VERY_LOW
    }

    fn activate(&mut self, scene: &mut Scene, _vis: &VisContext<'_, Record>) -> VisResult<()> {
        let state = self.state.borrow();
        if let Some(circles) = scene.region_mut(CIRCLES_REGION) {
            for element in circles.elements_mut() {
                let selected = element
                    .datum
                    .is_some_and(|datum| state.selection.contains_point(datum));
                bind_selectable(element, selected);
            }
        }
        Ok(())
    }

    fn deactivate(&mut self, scene: &mut Scene, _vis: &VisContext<'_, Record>) -> VisResult<()> {
        if let Some(circles) = scene.region_mut(CIRCLES_REGION) {
            circles.elements_mut().iter_mut().for_each(unbind_selectable);
        }
        Ok(())
    }
}

/// Rectangular brush over the circles for mid densities, where single
/// points are too small to click.
pub(crate) struct BrushSelection {
    state: SharedState,
}

impl BrushSelection {
    pub(crate) fn new(state: SharedState) -> Self {
        Self { state }
    }
}

/// Redraws the swept extent, element 1 of the brush region.
pub(crate) fn set_brush_extent(region: &mut Region, x: f64, y: f64, width: f64, height: f64) {
    if let Some(extent) = region.elements_mut().get_mut(1) {
        extent.shape = Shape::Rect(RectPrimitive::new(x, y, width, height, BRUSH_EXTENT_FILL));
    }
}

impl Feature<Record, Scene> for BrushSelection {
    fn id(&self) -> &str {
        "brush-selection"
    }

    fn range(&self) -> DensityRange {
        ranges::HIGH_LOW
    }

    fn activate(&mut self, scene: &mut Scene, vis: &VisContext<'_, Record>) -> VisResult<()> {
        let state = self.state.borrow();
        if let Some(circles) = scene.region_mut(CIRCLES_REGION) {
            for element in circles.elements_mut() {
                let selected = element
                    .datum
                    .is_some_and(|datum| state.selection.contains_point(datum));
                element.classed(BRUSHED_CLASS, selected);
            }
        }

        let width = vis.inner_width().max(0.0);
        let height = vis.inner_height().max(0.0);
        let region = plot_region(scene, BRUSH_REGION, vis.margin());
        // Overlay catching the gesture, then the extent drawn on top of it.
        region.join(2, |_| {
            Element::new(Shape::Rect(RectPrimitive::new(
                0.0,
                0.0,
                0.0,
                0.0,
                Color::rgba(0.0, 0.0, 0.0, 0.0),
            )))
        });
        if let Some(overlay) = region.elements_mut().first_mut() {
            overlay.shape = Shape::Rect(RectPrimitive::new(
                0.0,
                0.0,
                width,
                height,
                Color::rgba(0.0, 0.0, 0.0, 0.0),
            ));
            overlay.cursor = Cursor::Pointer;
        }
        Ok(())
    }

    fn deactivate(&mut self, scene: &mut Scene, _vis: &VisContext<'_, Record>) -> VisResult<()> {
        scene.remove_region(BRUSH_REGION);
        if let Some(circles) = scene.region_mut(CIRCLES_REGION) {
            for element in circles.elements_mut() {
                element.classed(BRUSHED_CLASS, false);
            }
        }
        Ok(())
    }
}

/// Click-to-select and hover highlight on bins.
pub(crate) struct BinSelection {
    state: SharedState,
}

impl BinSelection {
    pub(crate) fn new(state: SharedState) -> Self {
        Self { state }
    }
}

impl Feature<Record, Scene> for BinSelection {
    fn id(&self) -> &str {
        "bin-selection"
    }

    fn range(&self) -> DensityRange {
        ranges::MED_HIGH
    }

    fn activate(&mut self, scene: &mut Scene, _vis: &VisContext<'_, Record>) -> VisResult<()> {
        let state = self.state.borrow();
        if let Some(bins) = scene.region_mut(BINS_REGION) {
            for element in bins.elements_mut() {
                let selected = element
                    .datum
                    .is_some_and(|datum| state.selection.contains_bin(datum));
                bind_selectable(element, selected);
            }
        }
        Ok(())
    }

    fn deactivate(&mut self, scene: &mut Scene, _vis: &VisContext<'_, Record>) -> VisResult<()> {
        if let Some(bins) = scene.region_mut(BINS_REGION) {
            bins.elements_mut().iter_mut().for_each(unbind_selectable);
        }
        Ok(())
    }
}

/// Hover tooltips naming the record under the pointer.
pub(crate) struct Tooltips;

impl Tooltips {
    pub(crate) fn new() -> Self {
        Self
    }
}

impl Feature<Record, Scene> for Tooltips {
    fn id(&self) -> &str {
        "tooltips"
    }

    fn range(&self) -> DensityRange {
        ranges::MED_LOW
    }

    fn activate(&mut self, scene: &mut Scene, vis: &VisContext<'_, Record>) -> VisResult<()> {
        let data = vis.data();
        if let Some(circles) = scene.region_mut(CIRCLES_REGION) {
            for element in circles.elements_mut() {
                let Some(record) = element.datum.and_then(|datum| data.get(datum)) else {
                    continue;
                };
                element.bind(TIP_OVER, Action::ShowTooltip(record.name.clone()));
                element.bind(TIP_OUT, Action::HideTooltip);
            }
        }
        Ok(())
    }

    fn deactivate(&mut self, scene: &mut Scene, _vis: &VisContext<'_, Record>) -> VisResult<()> {
        scene.remove_region(TOOLTIP_REGION);
        if let Some(circles) = scene.region_mut(CIRCLES_REGION) {
            circles.elements_mut().iter_mut().for_each(unbind_tips);
        }
        Ok(())
    }
}

/// Hover tooltips with the point count of a bin.
pub(crate) struct BinTooltips {
    state: SharedState,
}

impl BinTooltips {
    pub(crate) fn new(state: SharedState) -> Self {
        Self { state }
    }
}

impl Feature<Record, Scene> for BinTooltips {
    fn id(&self) -> &str {
        "bin-tooltips"
    }

    fn range(&self) -> DensityRange {
        ranges::MED_HIGH
    }

    fn activate(&mut self, scene: &mut Scene, _vis: &VisContext<'_, Record>) -> VisResult<()> {
        let state = self.state.borrow();
        if let Some(bins) = scene.region_mut(BINS_REGION) {
            for element in bins.elements_mut() {
                let Some(count) = element.datum.and_then(|datum| state.bin_counts.get(datum))
                else {
                    continue;
                };
                element.bind(TIP_OVER, Action::ShowTooltip(format!("{count} points")));
                element.bind(TIP_OUT, Action::HideTooltip);
            }
        }
        Ok(())
    }

    fn deactivate(&mut self, scene: &mut Scene, _vis: &VisContext<'_, Record>) -> VisResult<()> {
        scene.remove_region(TOOLTIP_REGION);
        if let Some(bins) = scene.region_mut(BINS_REGION) {
            bins.elements_mut().iter_mut().for_each(unbind_tips);
        }
        Ok(())
    }
}
