use crate::geometry::{Point, Rect, Size};
use glam::{Affine2, Mat2, Vec2};

/// 2D layout transform applied to an element and composed with its ancestors.
pub type LayoutTransform = Affine2;

pub fn transform_point(transform: &LayoutTransform, point: Point) -> Point {
    let p = transform.transform_point2(Vec2::new(point.x, point.y));
    Point::new(p.x, p.y)
}

/// Axis-aligned bounds of a `size` box after the linear part of `transform`.
pub fn transform_size(transform: &LayoutTransform, size: Size) -> Size {
    bounding_size(transform.matrix2, size)
}

pub fn transform_rect(transform: &LayoutTransform, rect: Rect) -> Rect {
    let corners = [
        transform.transform_point2(Vec2::new(rect.left(), rect.top())),
        transform.transform_point2(Vec2::new(rect.right(), rect.top())),
        transform.transform_point2(Vec2::new(rect.right(), rect.bottom())),
        transform.transform_point2(Vec2::new(rect.left(), rect.bottom())),
    ];
    let mut min = corners[0];
    let mut max = corners[0];
    for corner in &corners[1..] {
        min = min.min(*corner);
        max = max.max(*corner);
    }
    Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
}

/// Largest untransformed size whose transformed bounds still fit into `available`.
pub fn find_max_transformed_size(transform: &LayoutTransform, available: Size) -> Size {
    let linear = transform.matrix2;
    if linear.determinant().abs() <= f32::EPSILON {
        return available;
    }
    bounding_size(linear.inverse(), available)
}

pub fn has_linear_part(transform: &LayoutTransform) -> bool {
    transform.matrix2 != Mat2::IDENTITY
}

/// Drops the translation, keeping rotation/scale/skew.
pub fn linear_part(transform: &LayoutTransform) -> LayoutTransform {
    Affine2::from_mat2(transform.matrix2)
}

fn bounding_size(linear: Mat2, size: Size) -> Size {
    let cols = linear.to_cols_array();
    // column-major: [m00, m10, m01, m11]
    let width = weighted(cols[0], size.width) + weighted(cols[2], size.height);
    let height = weighted(cols[1], size.width) + weighted(cols[3], size.height);
    Size::new(width, height)
}

fn weighted(coefficient: f32, length: f32) -> f32 {
    if coefficient == 0.0 {
        0.0
    } else {
        coefficient.abs() * length
    }
}

#[cfg(test)]
mod tests {
    use super::{LayoutTransform, find_max_transformed_size, transform_rect, transform_size};
    use crate::geometry::{Rect, Size};
    use glam::Vec2;

    #[test]
    fn quarter_turn_swaps_axes() {
        let rotate = LayoutTransform::from_angle(std::f32::consts::FRAC_PI_2);
        let size = transform_size(&rotate, Size::new(40.0, 10.0));
        assert!((size.width - 10.0).abs() < 1e-4);
        assert!((size.height - 40.0).abs() < 1e-4);
    }

    #[test]
    fn max_transformed_size_inverts_scale() {
        let scale = LayoutTransform::from_scale(Vec2::new(2.0, 4.0));
        let size = find_max_transformed_size(&scale, Size::new(100.0, 100.0));
        assert_eq!(size, Size::new(50.0, 25.0));
    }

    #[test]
    fn unconstrained_axis_stays_unconstrained_under_scale() {
        let scale = LayoutTransform::from_scale(Vec2::new(2.0, 2.0));
        let size = find_max_transformed_size(&scale, Size::new(100.0, f32::NAN));
        assert_eq!(size.width, 50.0);
        assert!(size.height.is_nan());
    }

    #[test]
    fn translated_rect_keeps_size() {
        let shift = LayoutTransform::from_translation(Vec2::new(5.0, 7.0));
        let rect = transform_rect(&shift, Rect::new(1.0, 1.0, 10.0, 20.0));
        assert_eq!(rect, Rect::new(6.0, 8.0, 10.0, 20.0));
    }
}
