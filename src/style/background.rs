use super::color::{Color, ColorLike};
use crate::error::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GradientDirection {
    Horizontal,
    Vertical,
}

/// Paint used to fill a panel's background rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Brush {
    Solid(Color),
    LinearGradient {
        start: Color,
        end: Color,
        direction: GradientDirection,
    },
}

impl Brush {
    pub fn solid(color: Color) -> Self {
        Self::Solid(color)
    }

    /// Parses a skin color literal into a solid brush.
    pub fn parse_solid(raw: &str) -> Result<Self> {
        Color::parse(raw).map(Self::Solid)
    }

    /// Linear RGBA at texture coordinate `uv`, with alpha scaled by `opacity`.
    pub fn color_at(&self, uv: [f32; 2], opacity: f32) -> [f32; 4] {
        match *self {
            Brush::Solid(color) => color.to_rgba_f32_with_opacity(opacity),
            Brush::LinearGradient {
                start,
                end,
                direction,
            } => {
                let t = match direction {
                    GradientDirection::Horizontal => uv[0],
                    GradientDirection::Vertical => uv[1],
                }
                .clamp(0.0, 1.0);
                let from = start.to_rgba_f32_with_opacity(opacity);
                let to = end.to_rgba_f32_with_opacity(opacity);
                std::array::from_fn(|i| from[i] + (to[i] - from[i]) * t)
            }
        }
    }

    pub fn is_transparent(&self) -> bool {
        match self {
            Brush::Solid(color) => color.to_rgba_u8()[3] == 0,
            Brush::LinearGradient { start, end, .. } => {
                start.to_rgba_u8()[3] == 0 && end.to_rgba_u8()[3] == 0
            }
        }
    }
}
