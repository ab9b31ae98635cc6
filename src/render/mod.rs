mod frame;
mod null_renderer;
mod primitives;
mod scene;

pub use frame::RenderFrame;
pub use null_renderer::NullRenderer;
pub use primitives::{
    CirclePrimitive, Color, LinePrimitive, RectPrimitive, TextHAlign, TextPrimitive,
};
pub use scene::{
    Action, BindingKey, Cursor, Element, ElementRef, PointerEventKind, Region, Scene, Shape,
};

use crate::core::Viewport;
use crate::error::VisResult;

/// Capability contract between the orchestrator and the surface features
/// draw into.
///
/// Regions are created on first request and keyed by a stable identifier,
/// so a feature that re-acquires its region converges on one container.
pub trait RenderTarget {
    type Region;

    /// Current on-screen pixel box.
    fn measure(&self) -> Viewport;

    /// Returns the region for `key`, creating an empty one if absent.
    fn ensure_region(&mut self, key: &str) -> &mut Self::Region;

    /// Returns the region for `key` only if it already exists.
    fn region_mut(&mut self, key: &str) -> Option<&mut Self::Region>;

    /// Removes the region for `key`. Returns `false` if there was none.
    fn remove_region(&mut self, key: &str) -> bool;
}

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized `RenderFrame` so drawing code stays
/// isolated from density dispatch and interaction state.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> VisResult<()>;
}
