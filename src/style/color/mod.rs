use crate::error::{LayoutError, Result};
use once_cell::sync::Lazy;

mod hex_color;

pub use hex_color::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn to_rgba_u8(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn hex(raw: &str) -> HexColor<'_> {
        HexColor::new(raw)
    }

    /// Strict parse of a skin color literal (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`).
    pub fn parse(raw: &str) -> Result<Self> {
        let hex = HexColor::new(raw);
        if !hex.is_valid() {
            return Err(LayoutError::InvalidColor(raw.to_string()));
        }
        let [r, g, b, a] = hex.to_rgba_u8();
        Ok(Self::rgba(r, g, b, a))
    }

    pub fn transparent() -> Self {
        Self::rgba(0, 0, 0, 0)
    }
}

pub trait ColorLike {
    fn box_clone(&self) -> Box<dyn ColorLike>;
    fn to_rgba_f32(&self) -> [f32; 4];
    fn to_rgba_u8(&self) -> [u8; 4] {
        let rgba_f32 = self.to_rgba_f32();
        [
            (linear_to_srgb_f32(rgba_f32[0].clamp(0.0, 1.0)) * 255.0).round() as u8,
            (linear_to_srgb_f32(rgba_f32[1].clamp(0.0, 1.0)) * 255.0).round() as u8,
            (linear_to_srgb_f32(rgba_f32[2].clamp(0.0, 1.0)) * 255.0).round() as u8,
            (rgba_f32[3].clamp(0.0, 1.0) * 255.0).round() as u8,
        ]
    }

    /// Linear color with alpha multiplied by an inherited opacity.
    fn to_rgba_f32_with_opacity(&self, opacity: f32) -> [f32; 4] {
        let [r, g, b, a] = self.to_rgba_f32();
        [r, g, b, a * opacity.clamp(0.0, 1.0)]
    }

    fn is_transparent(&self) -> bool {
        self.to_rgba_u8()[3] != 255
    }
}

impl Clone for Box<dyn ColorLike> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

impl ColorLike for Color {
    fn box_clone(&self) -> Box<dyn ColorLike> {
        Box::new(*self)
    }

    fn to_rgba_f32(&self) -> [f32; 4] {
        [
            srgb_to_linear(self.r),
            srgb_to_linear(self.g),
            srgb_to_linear(self.b),
            self.a as f32 / 255.0,
        ]
    }

    fn to_rgba_u8(&self) -> [u8; 4] {
        Color::to_rgba_u8(*self)
    }
}

static SRGB8_TO_LINEAR: Lazy<[f32; 256]> = Lazy::new(|| {
    let mut t = [0.0f32; 256];
    for (i, slot) in t.iter_mut().enumerate() {
        *slot = srgb_to_linear_f32(i as f32 / 255.0);
    }
    t
});

pub fn srgb_to_linear(c: u8) -> f32 {
    SRGB8_TO_LINEAR[c as usize]
}

pub fn srgb_to_linear_f32(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

pub fn linear_to_srgb_f32(c: f32) -> f32 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}
