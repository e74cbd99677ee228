use super::{LayoutStrategy, Panel, arrange_in_slot, desired_or_zero};
use crate::geometry::{Rect, Size, shrink};
use crate::view::attached::DOCK;
use crate::view::base_component::{ElementTrait, LayoutContext};

pub type DockPanel = Panel<DockLayout>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Dock {
    Left,
    Top,
    Right,
    Bottom,
    #[default]
    Center,
}

#[derive(Clone, Copy, Debug)]
pub struct DockLayout {
    pub last_child_fill: bool,
}

impl Default for DockLayout {
    fn default() -> Self {
        Self {
            last_child_fill: true,
        }
    }
}

impl LayoutStrategy for DockLayout {
    fn kind(&self) -> &'static str {
        "DockPanel"
    }

    fn calculate_desired_size(
        &mut self,
        children: &mut [Box<dyn ElementTrait>],
        available: Size,
        ctx: &LayoutContext,
    ) -> Size {
        let mut remaining = available;
        let mut measured = Vec::with_capacity(children.len());
        for child in children.iter_mut().filter(|child| child.is_visible()) {
            let desired = child.measure(remaining, ctx);
            let size = Size::new(desired_or_zero(desired.width), desired_or_zero(desired.height));
            let dock = child.core().attached_value(DOCK);
            match dock {
                Dock::Top | Dock::Bottom => remaining.height = shrink(remaining.height, size.height),
                Dock::Left | Dock::Right => remaining.width = shrink(remaining.width, size.width),
                Dock::Center => {}
            }
            measured.push((dock, size));
        }

        // Innermost child first: each level stacks along its dock axis onto what the
        // children after it need.
        measured
            .into_iter()
            .rev()
            .fold(Size::ZERO, |rest, (dock, size)| match dock {
                Dock::Top | Dock::Bottom => {
                    Size::new(size.width.max(rest.width), size.height + rest.height)
                }
                Dock::Left | Dock::Right => {
                    Size::new(size.width + rest.width, size.height.max(rest.height))
                }
                Dock::Center => Size::new(size.width.max(rest.width), size.height.max(rest.height)),
            })
    }

    fn arrange_children(
        &mut self,
        children: &mut [Box<dyn ElementTrait>],
        inner: Rect,
        ctx: &LayoutContext,
    ) {
        let last_visible = children.iter().rposition(|child| child.is_visible());
        let (mut left, mut top, mut right, mut bottom) = (0.0f32, 0.0f32, 0.0f32, 0.0f32);
        let mut available = inner.size();

        for (index, child) in children.iter_mut().enumerate() {
            if !child.is_visible() {
                continue;
            }
            let origin_x = inner.x + left;
            let origin_y = inner.y + top;
            if self.last_child_fill && Some(index) == last_visible {
                child.arrange(Rect::new(origin_x, origin_y, available.width, available.height), ctx);
                break;
            }

            let desired = child.desired_size();
            let width = desired_or_zero(desired.width).min(available.width);
            let height = desired_or_zero(desired.height).min(available.height);
            match child.core().attached_value(DOCK) {
                Dock::Top => {
                    let slot = Rect::new(origin_x, origin_y, available.width, height);
                    arrange_in_slot(child, slot, ctx);
                    top += height;
                    available.height -= height;
                }
                Dock::Bottom => {
                    let y = inner.y + inner.height - bottom - height;
                    let slot = Rect::new(origin_x, y, available.width, height);
                    arrange_in_slot(child, slot, ctx);
                    bottom += height;
                    available.height -= height;
                }
                Dock::Left => {
                    let slot = Rect::new(origin_x, origin_y, width, available.height);
                    arrange_in_slot(child, slot, ctx);
                    left += width;
                    available.width -= width;
                }
                Dock::Right => {
                    let x = inner.x + inner.width - right - width;
                    let slot = Rect::new(x, origin_y, width, available.height);
                    arrange_in_slot(child, slot, ctx);
                    right += width;
                    available.width -= width;
                }
                Dock::Center => {
                    let slot = Rect::new(origin_x, origin_y, available.width, available.height);
                    arrange_in_slot(child, slot, ctx);
                }
            }
            available.width = available.width.max(0.0);
            available.height = available.height.max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Dock, DockLayout, DockPanel};
    use crate::geometry::{Rect, Size};
    use crate::view::attached::DOCK;
    use crate::view::base_component::{Element, ElementTrait, LayoutContext, Layoutable};

    fn docked(dock: Dock, width: f32, height: f32) -> Box<Element> {
        let mut element = Element::new(width, height);
        element.core_mut().set_attached(DOCK, dock);
        Box::new(element)
    }

    fn layout(panel: &mut DockPanel, rect: Rect) {
        let ctx = LayoutContext::default();
        panel.measure(rect.size(), &ctx);
        panel.arrange(rect, &ctx);
    }

    fn bounds_of(panel: &DockPanel, id: u64) -> Option<Rect> {
        panel.child(id).map(|child| child.actual_bounds())
    }

    #[test]
    fn last_child_fills_remaining_area_regardless_of_desired_size() {
        for fill_size in [1.0, 50.0, 500.0] {
            let mut panel = DockPanel::new(DockLayout::default());
            panel.add_child(docked(Dock::Top, 40.0, 20.0));
            panel.add_child(docked(Dock::Top, 40.0, 30.0));
            let fill = docked(Dock::Center, fill_size, fill_size);
            let fill_id = fill.id();
            panel.add_child(fill);

            layout(&mut panel, Rect::new(0.0, 0.0, 200.0, 150.0));
            assert_eq!(bounds_of(&panel, fill_id), Some(Rect::new(0.0, 50.0, 200.0, 100.0)));
        }
    }

    #[test]
    fn border_children_consume_their_desired_extent() {
        let mut panel = DockPanel::new(DockLayout::default());
        let left = docked(Dock::Left, 30.0, 10.0);
        let right = docked(Dock::Right, 20.0, 10.0);
        let bottom = docked(Dock::Bottom, 10.0, 25.0);
        let (left_id, right_id, bottom_id) = (left.id(), right.id(), bottom.id());
        panel.add_child(left);
        panel.add_child(right);
        panel.add_child(bottom);
        panel.add_child(docked(Dock::Center, 0.0, 0.0));

        layout(&mut panel, Rect::new(0.0, 0.0, 200.0, 100.0));
        assert_eq!(bounds_of(&panel, left_id), Some(Rect::new(0.0, 0.0, 30.0, 100.0)));
        assert_eq!(bounds_of(&panel, right_id), Some(Rect::new(180.0, 0.0, 20.0, 100.0)));
        assert_eq!(bounds_of(&panel, bottom_id), Some(Rect::new(30.0, 75.0, 150.0, 25.0)));
    }

    #[test]
    fn center_child_does_not_reserve_space() {
        let mut panel = DockPanel::new(DockLayout {
            last_child_fill: false,
        });
        panel.add_child(docked(Dock::Center, 10.0, 10.0));
        let top = docked(Dock::Top, 10.0, 10.0);
        let top_id = top.id();
        panel.add_child(top);

        layout(&mut panel, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(bounds_of(&panel, top_id), Some(Rect::new(0.0, 0.0, 100.0, 10.0)));
    }

    #[test]
    fn desired_size_sums_along_dock_axis() {
        let mut panel = DockPanel::new(DockLayout::default());
        panel.add_child(docked(Dock::Top, 40.0, 20.0));
        panel.add_child(docked(Dock::Left, 30.0, 50.0));
        panel.add_child(docked(Dock::Center, 25.0, 10.0));
        let desired = panel.measure(Size::new(500.0, 500.0), &LayoutContext::default());
        assert_eq!(desired, Size::new(55.0, 70.0));
    }
}
