use crate::geometry::Rect;
use crate::style::Brush;
use crate::transform::LayoutTransform;
use glam::Vec2;

#[derive(Default, Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct BackgroundVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub uv: [f32; 2],
}

const QUAD_UVS: [[f32; 2]; 6] = [
    [0.0, 0.0],
    [1.0, 0.0],
    [1.0, 1.0],
    [0.0, 0.0],
    [1.0, 1.0],
    [0.0, 1.0],
];

/// Two triangles covering a panel's arranged bounds in final (transformed) coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct BackgroundGeometry {
    vertices: [BackgroundVertex; 6],
    bounds: Rect,
}

impl BackgroundGeometry {
    pub fn build(
        bounds: Rect,
        transform: &LayoutTransform,
        brush: &Brush,
        opacity: f32,
    ) -> Option<Self> {
        if bounds.size().is_empty() {
            return None;
        }
        let vertices = QUAD_UVS.map(|uv| {
            let local = Vec2::new(bounds.x + bounds.width * uv[0], bounds.y + bounds.height * uv[1]);
            let p = transform.transform_point2(local);
            BackgroundVertex {
                position: [p.x, p.y, 1.0],
                color: brush.color_at(uv, opacity),
                uv,
            }
        });
        Some(Self { vertices, bounds })
    }

    /// Re-derives vertex colors without touching positions.
    pub fn recolor(&mut self, brush: &Brush, opacity: f32) {
        for vertex in &mut self.vertices {
            vertex.color = brush.color_at(vertex.uv, opacity);
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn vertices(&self) -> &[BackgroundVertex] {
        &self.vertices
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::BackgroundGeometry;
    use crate::geometry::Rect;
    use crate::style::{Brush, Color};
    use crate::transform::LayoutTransform;
    use glam::Vec2;

    #[test]
    fn quad_covers_bounds_under_transform() {
        let shift = LayoutTransform::from_translation(Vec2::new(5.0, 0.0));
        let geometry = BackgroundGeometry::build(
            Rect::new(0.0, 0.0, 10.0, 20.0),
            &shift,
            &Brush::solid(Color::rgb(255, 255, 255)),
            1.0,
        )
        .expect("non-empty bounds");
        let positions: Vec<[f32; 3]> = geometry.vertices().iter().map(|v| v.position).collect();
        assert_eq!(positions[0], [5.0, 0.0, 1.0]);
        assert_eq!(positions[2], [15.0, 20.0, 1.0]);
        assert_eq!(positions[5], [5.0, 20.0, 1.0]);
        assert_eq!(geometry.as_bytes().len(), 6 * 36);
    }

    #[test]
    fn recolor_keeps_positions() {
        let brush = Brush::solid(Color::rgb(255, 0, 0));
        let mut geometry = BackgroundGeometry::build(
            Rect::new(0.0, 0.0, 4.0, 4.0),
            &LayoutTransform::IDENTITY,
            &brush,
            1.0,
        )
        .expect("non-empty bounds");
        let before = geometry.vertices()[1].position;
        geometry.recolor(&brush, 0.25);
        assert_eq!(geometry.vertices()[1].position, before);
        assert_eq!(geometry.vertices()[1].color[3], 0.25);
    }

    #[test]
    fn empty_bounds_produce_no_geometry() {
        let geometry = BackgroundGeometry::build(
            Rect::new(3.0, 3.0, 0.0, 10.0),
            &LayoutTransform::IDENTITY,
            &Brush::solid(Color::rgb(0, 0, 0)),
            1.0,
        );
        assert!(geometry.is_none());
    }
}
