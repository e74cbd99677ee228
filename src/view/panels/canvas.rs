use super::{LayoutStrategy, Panel, desired_or_zero};
use crate::geometry::{Point, Rect, Size, max_len};
use crate::transform::{linear_part, transform_point};
use crate::view::attached::{CANVAS_BOTTOM, CANVAS_LEFT, CANVAS_RIGHT, CANVAS_TOP};
use crate::view::base_component::{ElementCore, ElementTrait, LayoutContext};

pub type Canvas = Panel<CanvasLayout>;

/// Absolute positioning by attached Left/Top (or Right/Bottom) offsets.
#[derive(Clone, Copy, Debug, Default)]
pub struct CanvasLayout;

fn horizontal_anchor(core: &ElementCore) -> Anchor {
    if !core.attached().contains(CANVAS_LEFT) && core.attached().contains(CANVAS_RIGHT) {
        Anchor::End(core.attached_value(CANVAS_RIGHT))
    } else {
        Anchor::Start(core.attached_value(CANVAS_LEFT))
    }
}

fn vertical_anchor(core: &ElementCore) -> Anchor {
    if !core.attached().contains(CANVAS_TOP) && core.attached().contains(CANVAS_BOTTOM) {
        Anchor::End(core.attached_value(CANVAS_BOTTOM))
    } else {
        Anchor::Start(core.attached_value(CANVAS_TOP))
    }
}

#[derive(Clone, Copy, Debug)]
enum Anchor {
    Start(f32),
    End(f32),
}

impl Anchor {
    fn offset(self) -> f32 {
        match self {
            Anchor::Start(v) | Anchor::End(v) => v,
        }
    }

    fn position(self, zoom: f32, extent: f32, desired: f32) -> f32 {
        match self {
            Anchor::Start(v) => v * zoom,
            Anchor::End(v) => extent - v * zoom - desired,
        }
    }
}

impl LayoutStrategy for CanvasLayout {
    fn kind(&self) -> &'static str {
        "Canvas"
    }

    fn calculate_desired_size(
        &mut self,
        children: &mut [Box<dyn ElementTrait>],
        available: Size,
        ctx: &LayoutContext,
    ) -> Size {
        let mut extent = Size::ZERO;
        for child in children.iter_mut().filter(|child| child.is_visible()) {
            let desired = child.measure(available, ctx);
            let right = horizontal_anchor(child.core()).offset() * ctx.zoom.x + desired_or_zero(desired.width);
            let bottom = vertical_anchor(child.core()).offset() * ctx.zoom.y + desired_or_zero(desired.height);
            extent.width = max_len(extent.width, right);
            extent.height = max_len(extent.height, bottom);
        }
        extent
    }

    fn arrange_children(
        &mut self,
        children: &mut [Box<dyn ElementTrait>],
        inner: Rect,
        ctx: &LayoutContext,
    ) {
        let linear = linear_part(&ctx.transform);
        for child in children.iter_mut().filter(|child| child.is_visible()) {
            let desired = child.desired_size();
            let width = desired_or_zero(desired.width);
            let height = desired_or_zero(desired.height);
            let offset = Point::new(
                horizontal_anchor(child.core()).position(ctx.zoom.x, inner.width, width),
                vertical_anchor(child.core()).position(ctx.zoom.y, inner.height, height),
            );
            let offset = transform_point(&linear, offset);
            let location = Point::new(inner.x + offset.x, inner.y + offset.y);
            child.arrange(Rect::from_origin_size(location, Size::new(width, height)), ctx);
        }
    }
}
