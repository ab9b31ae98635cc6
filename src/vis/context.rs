use crate::core::{Dimensionality, Margin, Viewport, compute_density};

/// Read-only view of orchestrator state lent to feature callbacks and event
/// handlers for the duration of one call.
#[derive(Debug)]
pub struct VisContext<'a, T> {
    data: &'a [T],
    viewport: Viewport,
    margin: Margin,
    dimensionality: Dimensionality,
}

impl<T> Clone for VisContext<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for VisContext<'_, T> {}

impl<'a, T> VisContext<'a, T> {
    #[must_use]
    pub fn new(
        data: &'a [T],
        viewport: Viewport,
        margin: Margin,
        dimensionality: Dimensionality,
    ) -> Self {
        Self {
            data,
            viewport,
            margin,
            dimensionality,
        }
    }

    #[must_use]
    pub fn data(&self) -> &'a [T] {
        self.data
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.viewport.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.viewport.height
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn margin(&self) -> Margin {
        self.margin
    }

    #[must_use]
    pub fn dimensionality(&self) -> Dimensionality {
        self.dimensionality
    }

    /// Width inside the horizontal margins.
    #[must_use]
    pub fn inner_width(&self) -> f64 {
        self.margin.inner_width(self.viewport)
    }

    /// Height inside the vertical margins.
    #[must_use]
    pub fn inner_height(&self) -> f64 {
        self.margin.inner_height(self.viewport)
    }

    #[must_use]
    pub fn density(&self) -> f64 {
        compute_density(
            self.data.len(),
            self.viewport,
            self.margin,
            self.dimensionality,
        )
    }
}
