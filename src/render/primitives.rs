use serde::{Deserialize, Serialize};

use crate::error::{VisError, VisResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const STEEL_BLUE: Self = Self::rgb(0.275, 0.51, 0.706);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    #[must_use]
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self { alpha, ..self }
    }

    pub fn validate(self) -> VisResult<()> {
        let channels = [self.red, self.green, self.blue, self.alpha];
        ensure(
            channels.iter().all(|value| (0.0..=1.0).contains(value)),
            "color channels must lie in [0, 1]",
        )
    }
}

fn ensure(valid: bool, message: &str) -> VisResult<()> {
    if valid {
        Ok(())
    } else {
        Err(VisError::InvalidData(message.to_owned()))
    }
}

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|value| value.is_finite())
}

/// Draw command for one line segment in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinePrimitive {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_width: f64,
    pub color: Color,
}

impl LinePrimitive {
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64, stroke_width: f64, color: Color) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            stroke_width,
            color,
        }
    }

    #[must_use]
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self {
            x1: self.x1 + dx,
            y1: self.y1 + dy,
            x2: self.x2 + dx,
            y2: self.y2 + dy,
            ..self
        }
    }

    pub fn validate(self) -> VisResult<()> {
        ensure(
            all_finite(&[self.x1, self.y1, self.x2, self.y2]),
            "line endpoints must be finite",
        )?;
        ensure(self.stroke_width > 0.0, "line stroke must be positive")?;
        self.color.validate()
    }
}

/// Filled axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectPrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Color,
}

impl RectPrimitive {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64, fill: Color) -> Self {
        Self {
            x,
            y,
            width,
            height,
            fill,
        }
    }

    #[must_use]
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    pub fn validate(self) -> VisResult<()> {
        ensure(
            all_finite(&[self.x, self.y, self.width, self.height])
                && self.width >= 0.0
                && self.height >= 0.0,
            "rect must have a finite origin and a non-negative size",
        )?;
        self.fill.validate()
    }
}

/// Filled circle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CirclePrimitive {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub fill: Color,
}

impl CirclePrimitive {
    #[must_use]
    pub const fn new(cx: f64, cy: f64, radius: f64, fill: Color) -> Self {
        Self {
            cx,
            cy,
            radius,
            fill,
        }
    }

    #[must_use]
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self {
            cx: self.cx + dx,
            cy: self.cy + dy,
            ..self
        }
    }

    pub fn validate(self) -> VisResult<()> {
        ensure(
            all_finite(&[self.cx, self.cy, self.radius]) && self.radius > 0.0,
            "circle must have a finite center and a positive radius",
        )?;
        self.fill.validate()
    }
}

/// Horizontal text alignment relative to `TextPrimitive::x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

/// Draw command for one label in pixel space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size_px: f64,
    pub color: Color,
    pub h_align: TextHAlign,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        x: f64,
        y: f64,
        font_size_px: f64,
        color: Color,
        h_align: TextHAlign,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size_px,
            color,
            h_align,
        }
    }

    #[must_use]
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self.clone()
        }
    }

    /// Empty labels never reach a frame, so only placement is checked.
    pub fn validate(&self) -> VisResult<()> {
        ensure(
            all_finite(&[self.x, self.y]) && self.font_size_px > 0.0,
            "text needs a finite anchor and a positive font size",
        )?;
        self.color.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::{CirclePrimitive, Color, RectPrimitive, TextHAlign, TextPrimitive};

    #[test]
    fn collapsed_rect_is_drawable_but_collapsed_circle_is_not() {
        assert!(RectPrimitive::new(4.0, 4.0, 0.0, 0.0, Color::BLACK).validate().is_ok());
        assert!(CirclePrimitive::new(4.0, 4.0, 0.0, Color::BLACK).validate().is_err());
    }

    #[test]
    fn translucent_colors_stay_in_gamut() {
        let tint = Color::RED.with_alpha(0.5);
        let label = TextPrimitive::new("p1", 1.0, 2.0, 10.0, tint, TextHAlign::Left);
        assert!(label.validate().is_ok());
        assert!(label.translated(f64::NAN, 0.0).validate().is_err());
        assert!(Color::STEEL_BLUE.with_alpha(1.5).validate().is_err());
    }
}
