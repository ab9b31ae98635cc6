use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::core::Viewport;
use crate::error::VisResult;
use crate::render::{
    CirclePrimitive, Color, LinePrimitive, RectPrimitive, RenderFrame, RenderTarget, Renderer,
    TextPrimitive,
};

/// Geometry carried by one scene element, in region-local pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle(CirclePrimitive),
    Rect(RectPrimitive),
    Text(TextPrimitive),
    Line(LinePrimitive),
}

impl Shape {
    fn contains(&self, x: f64, y: f64) -> bool {
        match self {
            Self::Circle(circle) => {
                let dx = x - circle.cx;
                let dy = y - circle.cy;
                dx * dx + dy * dy <= circle.radius * circle.radius
            }
            Self::Rect(rect) => rect.contains(x, y),
            Self::Text(_) | Self::Line(_) => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Over,
    Out,
    Click,
}

/// Pointer handler slot. One action per `(event, namespace)` pair, so
/// re-binding the same slot replaces rather than stacks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindingKey {
    pub event: PointerEventKind,
    pub namespace: &'static str,
}

impl BindingKey {
    #[must_use]
    pub const fn new(event: PointerEventKind, namespace: &'static str) -> Self {
        Self { event, namespace }
    }
}

/// Interaction verbs an element can respond to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Highlight,
    ClearHighlight,
    ToggleSelection,
    ShowTooltip(String),
    HideTooltip,
}

/// One drawn item plus its retained interaction state.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub shape: Shape,
    pub datum: Option<usize>,
    pub cursor: Cursor,
    pub highlight: Option<Color>,
    classes: SmallVec<[&'static str; 2]>,
    bindings: IndexMap<BindingKey, Action>,
}

impl Element {
    #[must_use]
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            datum: None,
            cursor: Cursor::Default,
            highlight: None,
            classes: SmallVec::new(),
            bindings: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_datum(mut self, datum: usize) -> Self {
        self.datum = Some(datum);
        self
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|existing| *existing == class)
    }

    /// Adds or removes `class`; adding twice keeps one copy.
    pub fn classed(&mut self, class: &'static str, enabled: bool) {
        let present = self.has_class(class);
        if enabled && !present {
            self.classes.push(class);
        } else if !enabled && present {
            self.classes.retain(|existing| *existing != class);
        }
    }

    pub fn classes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.classes.iter().copied()
    }

    pub fn bind(&mut self, key: BindingKey, action: Action) {
        self.bindings.insert(key, action);
    }

    pub fn unbind(&mut self, key: &BindingKey) -> Option<Action> {
        self.bindings.shift_remove(key)
    }

    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn binding(&self, key: &BindingKey) -> Option<&Action> {
        self.bindings.get(key)
    }

    /// Actions registered for `event`, in binding order.
    pub fn actions_for(&self, event: PointerEventKind) -> impl Iterator<Item = &Action> + '_ {
        self.bindings
            .iter()
            .filter(move |(key, _)| key.event == event)
            .map(|(_, action)| action)
    }
}

/// Uniquely keyed child container of a [`Scene`].
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    key: String,
    offset: (f64, f64),
    elements: Vec<Element>,
}

impl Region {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            offset: (0.0, 0.0),
            elements: Vec::new(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn offset(&self) -> (f64, f64) {
        self.offset
    }

    pub fn set_offset(&mut self, x: f64, y: f64) {
        self.offset = (x, y);
    }

    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn elements_mut(&mut self) -> &mut [Element] {
        &mut self.elements
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Index-keyed data join: keeps the first `count` elements, creates the
    /// missing ones with `enter`, and drops the rest. Repeating a join with
    /// the same count leaves the region unchanged.
    pub fn join(&mut self, count: usize, mut enter: impl FnMut(usize) -> Element) -> &mut [Element] {
        self.elements.truncate(count);
        let existing = self.elements.len();
        self.elements.extend((existing..count).map(&mut enter));
        &mut self.elements
    }
}

/// Address of one element inside a scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRef {
    pub region: String,
    pub index: usize,
}

impl ElementRef {
    #[must_use]
    pub fn new(region: impl Into<String>, index: usize) -> Self {
        Self {
            region: region.into(),
            index,
        }
    }
}

/// Retained-mode, in-memory render target.
///
/// Regions draw in creation order; later regions paint over earlier ones.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    size: Viewport,
    regions: IndexMap<String, Region>,
}

impl Scene {
    #[must_use]
    pub fn new(size: Viewport) -> Self {
        Self {
            size,
            regions: IndexMap::new(),
        }
    }

    /// Changes the box reported by the next measurement.
    pub fn set_size(&mut self, size: Viewport) {
        self.size = size;
    }

    #[must_use]
    pub fn region(&self, key: &str) -> Option<&Region> {
        self.regions.get(key)
    }

    pub fn region_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.regions.keys().map(String::as_str)
    }

    #[must_use]
    pub fn element(&self, at: &ElementRef) -> Option<&Element> {
        self.regions.get(&at.region)?.elements.get(at.index)
    }

    pub fn element_mut(&mut self, at: &ElementRef) -> Option<&mut Element> {
        self.regions.get_mut(&at.region)?.elements.get_mut(at.index)
    }

    /// Topmost circle or rect under a scene-space point.
    #[must_use]
    pub fn hit_test(&self, x: f64, y: f64) -> Option<ElementRef> {
        self.regions.values().rev().find_map(|region| {
            let (dx, dy) = region.offset;
            region
                .elements
                .iter()
                .rposition(|element| element.shape.contains(x - dx, y - dy))
                .map(|index| ElementRef::new(region.key.clone(), index))
        })
    }

    /// Flattens every region into scene-space draw commands.
    #[must_use]
    pub fn frame(&self) -> RenderFrame {
        let mut frame = RenderFrame::new(self.size);
        for region in self.regions.values() {
            let (dx, dy) = region.offset;
            for element in &region.elements {
                match &element.shape {
                    Shape::Circle(circle) => {
                        let mut circle = circle.translated(dx, dy);
                        if let Some(highlight) = element.highlight {
                            circle.fill = highlight;
                        }
                        frame.circles.push(circle);
                    }
                    Shape::Rect(rect) => {
                        let mut rect = rect.translated(dx, dy);
                        if let Some(highlight) = element.highlight {
                            rect.fill = highlight.with_alpha(rect.fill.alpha);
                        }
                        frame.rects.push(rect);
                    }
                    Shape::Text(text) if !text.text.is_empty() => {
                        frame.texts.push(text.translated(dx, dy));
                    }
                    Shape::Text(_) => {}
                    Shape::Line(line) => frame.lines.push(line.translated(dx, dy)),
                }
            }
        }
        frame
    }

    pub fn present<R: Renderer>(&self, renderer: &mut R) -> VisResult<()> {
        renderer.render(&self.frame())
    }
}

impl RenderTarget for Scene {
    type Region = Region;

    fn measure(&self) -> Viewport {
        self.size
    }

    fn ensure_region(&mut self, key: &str) -> &mut Region {
        self.regions
            .entry(key.to_owned())
            .or_insert_with(|| Region::new(key))
    }

    fn region_mut(&mut self, key: &str) -> Option<&mut Region> {
        self.regions.get_mut(key)
    }

    fn remove_region(&mut self, key: &str) -> bool {
        self.regions.shift_remove(key).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{Element, Region, Scene, Shape};
    use crate::core::Viewport;
    use crate::render::{CirclePrimitive, Color, RenderTarget};

    fn dot(index: usize) -> Element {
        Element::new(Shape::Circle(CirclePrimitive::new(
            index as f64 * 10.0,
            5.0,
            2.0,
            Color::BLACK,
        )))
        .with_datum(index)
    }

    #[test]
    fn join_converges_to_requested_count() {
        let mut region = Region::new("dots");
        region.join(5, dot);
        region.join(5, dot);
        assert_eq!(region.len(), 5);
        region.join(2, dot);
        assert_eq!(region.len(), 2);
        assert_eq!(region.elements()[1].datum, Some(1));
    }

    #[test]
    fn ensure_region_reuses_existing_container() {
        let mut scene = Scene::new(Viewport::new(100.0, 100.0));
        scene.ensure_region("dots").push(dot(0));
        scene.ensure_region("dots").push(dot(1));
        assert_eq!(scene.region_keys().count(), 1);
        assert_eq!(scene.region("dots").map(Region::len), Some(2));
        assert!(scene.remove_region("dots"));
        assert!(!scene.remove_region("dots"));
    }

    #[test]
    fn classed_is_idempotent() {
        let mut element = dot(0);
        element.classed("selected", true);
        element.classed("selected", true);
        assert_eq!(element.classes().count(), 1);
        element.classed("selected", false);
        assert!(!element.has_class("selected"));
    }

    #[test]
    fn hit_test_accounts_for_region_offset() {
        let mut scene = Scene::new(Viewport::new(100.0, 100.0));
        let region = scene.ensure_region("dots");
        region.set_offset(30.0, 15.0);
        region.push(dot(0));
        let hit = scene.hit_test(31.0, 20.0).expect("hit");
        assert_eq!(hit.region, "dots");
        assert_eq!(hit.index, 0);
        assert!(scene.hit_test(0.0, 0.0).is_none());
    }
}
