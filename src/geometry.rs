//! Plain layout geometry values.
//!
//! Widths and heights may be NaN: on an available size NaN means "no
//! constraint along this axis", on an explicit element size it means "auto".

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size::new(0.0, 0.0);

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub const fn unconstrained() -> Self {
        Self::new(f32::NAN, f32::NAN)
    }

    /// NaN-aware equality used by the measure cache.
    pub fn same_as(self, other: Size) -> bool {
        same_length(self.width, other.width) && same_length(self.height, other.height)
    }

    pub fn is_empty(self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub const fn origin(self) -> Point {
        Point::new(self.x, self.y)
    }

    pub const fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn left(self) -> f32 {
        self.x
    }

    pub fn top(self) -> f32 {
        self.y
    }

    pub fn right(self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(self) -> f32 {
        self.y + self.height
    }

    pub fn contains(self, px: f32, py: f32) -> bool {
        px >= self.left() && px <= self.right() && py >= self.top() && py <= self.bottom()
    }

    /// True when `inner` lies inside `self`, allowing `tolerance` pixels of overhang per edge.
    pub fn contains_rect(self, inner: Rect, tolerance: f32) -> bool {
        inner.left() >= self.left() - tolerance
            && inner.top() >= self.top() - tolerance
            && inner.right() <= self.right() + tolerance
            && inner.bottom() <= self.bottom() + tolerance
    }

    pub fn same_as(self, other: Rect) -> bool {
        same_length(self.x, other.x)
            && same_length(self.y, other.y)
            && same_length(self.width, other.width)
            && same_length(self.height, other.height)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Thickness {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Thickness {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub const fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn horizontal(self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(self) -> f32 {
        self.top + self.bottom
    }

    pub fn scaled(self, zoom_x: f32, zoom_y: f32) -> Self {
        Self::new(
            self.left * zoom_x,
            self.top * zoom_y,
            self.right * zoom_x,
            self.bottom * zoom_y,
        )
    }
}

pub(crate) fn same_length(a: f32, b: f32) -> bool {
    (a.is_nan() && b.is_nan()) || a == b
}

/// `a - b` clamped at zero, keeping NaN ("unconstrained") as NaN.
pub(crate) fn shrink(a: f32, b: f32) -> f32 {
    if a.is_nan() { a } else { (a - b).max(0.0) }
}

/// Max that ignores NaN operands instead of propagating or swallowing them silently.
pub(crate) fn max_len(a: f32, b: f32) -> f32 {
    if a.is_nan() {
        b
    } else if b.is_nan() {
        a
    } else {
        a.max(b)
    }
}

#[cfg(test)]
mod tests {
    use super::{Rect, Size, max_len, shrink};

    #[test]
    fn unconstrained_sizes_compare_equal() {
        assert!(Size::unconstrained().same_as(Size::unconstrained()));
        assert!(!Size::new(1.0, f32::NAN).same_as(Size::new(1.0, 2.0)));
    }

    #[test]
    fn shrink_keeps_nan_and_clamps_at_zero() {
        assert!(shrink(f32::NAN, 10.0).is_nan());
        assert_eq!(shrink(5.0, 10.0), 0.0);
        assert_eq!(shrink(15.0, 10.0), 5.0);
        assert_eq!(max_len(f32::NAN, 3.0), 3.0);
    }

    #[test]
    fn contains_rect_uses_tolerance() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(outer.contains_rect(Rect::new(0.0, 0.0, 100.4, 50.0), 0.5));
        assert!(!outer.contains_rect(Rect::new(0.0, 0.0, 101.0, 50.0), 0.5));
    }
}
