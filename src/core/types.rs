use serde::{Deserialize, Serialize};

use crate::error::{VisError, VisResult};

/// Measured pixel box of a render target.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Space reserved around the plot area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Margin {
    #[must_use]
    pub const fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    #[must_use]
    pub const fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    #[must_use]
    pub fn horizontal(self) -> f64 {
        self.left + self.right
    }

    #[must_use]
    pub fn vertical(self) -> f64 {
        self.top + self.bottom
    }

    pub fn validate(self) -> VisResult<()> {
        let sides = [self.top, self.bottom, self.left, self.right];
        if sides.iter().any(|side| !side.is_finite() || *side < 0.0) {
            return Err(VisError::InvalidMargin {
                top: self.top,
                bottom: self.bottom,
                left: self.left,
                right: self.right,
            });
        }
        Ok(())
    }

    /// Width left for drawing once the horizontal margins are removed.
    #[must_use]
    pub fn inner_width(self, viewport: Viewport) -> f64 {
        viewport.width - self.horizontal()
    }

    /// Height left for drawing once the vertical margins are removed.
    #[must_use]
    pub fn inner_height(self, viewport: Viewport) -> f64 {
        viewport.height - self.vertical()
    }
}

/// Pixel extent used as the denominator of the density metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimensionality {
    /// Full inner area (`width * height`).
    #[default]
    Area,
    /// Inner width only.
    Width,
    /// Inner height only.
    Height,
}

#[cfg(test)]
mod tests {
    use super::{Margin, Viewport};

    #[test]
    fn margin_rejects_negative_and_non_finite_sides() {
        assert!(Margin::new(1.0, 2.0, 3.0, 4.0).validate().is_ok());
        assert!(Margin::new(-1.0, 0.0, 0.0, 0.0).validate().is_err());
        assert!(Margin::new(0.0, f64::NAN, 0.0, 0.0).validate().is_err());
        assert!(Margin::new(0.0, 0.0, f64::INFINITY, 0.0).validate().is_err());
    }

    #[test]
    fn inner_extent_subtracts_both_sides() {
        let margin = Margin::new(15.0, 30.0, 30.0, 15.0);
        let viewport = Viewport::new(130.0, 100.0);
        assert_eq!(margin.inner_width(viewport), 85.0);
        assert_eq!(margin.inner_height(viewport), 55.0);
    }
}
