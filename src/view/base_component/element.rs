use super::{ElementCore, LayoutContext};
use crate::geometry::{Rect, Size};
use crate::style::LayoutState;
use crate::ui::ChangeFlags;

pub trait Layoutable {
    fn measure(&mut self, available: Size, ctx: &LayoutContext) -> Size;
    fn arrange(&mut self, outer: Rect, ctx: &LayoutContext);
    fn desired_size(&self) -> Size;
    fn actual_bounds(&self) -> Rect;
}

pub trait ElementTrait: Layoutable + std::any::Any {
    fn core(&self) -> &ElementCore;
    fn core_mut(&mut self) -> &mut ElementCore;
    fn children(&self) -> Option<&[Box<dyn ElementTrait>]>;
    fn children_mut(&mut self) -> Option<&mut [Box<dyn ElementTrait>]>;

    fn as_any(&self) -> &dyn std::any::Any;
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;

    fn id(&self) -> u64 {
        self.core().id
    }

    fn parent_id(&self) -> Option<u64> {
        self.core().parent_id
    }

    fn set_parent_id(&mut self, parent_id: Option<u64>) {
        self.core_mut().parent_id = parent_id;
    }

    fn is_visible(&self) -> bool {
        self.core().is_visible()
    }

    fn invalidate_layout(&mut self) {
        self.core_mut().invalidate_layout();
    }

    /// Frame sweep: drains pending changes bottom-up and returns what the parent
    /// has to react to.
    fn propagate_invalidation(&mut self) -> ChangeFlags {
        self.core_mut().take_changes()
    }

    /// Per-frame state update after arrange.
    fn update(&mut self) {}

    /// Child ids in hit-test order, topmost first.
    fn children_front_to_back(&self) -> Vec<u64> {
        self.children()
            .map(|children| children.iter().rev().map(|child| child.id()).collect())
            .unwrap_or_default()
    }

    /// Whether `child_id` is drawn at `(x, y)` inside this element.
    fn is_child_rendered_at(&self, _child_id: u64, _x: f32, _y: f32) -> bool {
        true
    }

    fn layout_state(&self) -> LayoutState {
        let core = self.core();
        LayoutState::new(
            core.id,
            core.parent_id,
            core.actual_bounds(),
            core.desired_size(),
            core.is_visible(),
        )
    }
}

/// Leaf element with a fixed intrinsic content size.
pub struct Element {
    core: ElementCore,
    content_size: Size,
}

impl Element {
    pub fn new(content_width: f32, content_height: f32) -> Self {
        Self {
            core: ElementCore::new("Element"),
            content_size: Size::new(content_width, content_height),
        }
    }

    pub fn new_with_id(id: u64, content_width: f32, content_height: f32) -> Self {
        Self {
            core: ElementCore::new_with_id(id, "Element"),
            content_size: Size::new(content_width, content_height),
        }
    }

    pub fn content_size(&self) -> Size {
        self.content_size
    }

    pub fn set_content_size(&mut self, content_size: Size) {
        self.content_size = content_size;
        self.core.invalidate_layout();
    }
}

impl Layoutable for Element {
    fn measure(&mut self, available: Size, ctx: &LayoutContext) -> Size {
        let content = self.content_size;
        self.core.measure_with(available, ctx, |_, _| content)
    }

    fn arrange(&mut self, outer: Rect, ctx: &LayoutContext) {
        self.core.arrange_with(outer, ctx, |_, _| {});
    }

    fn desired_size(&self) -> Size {
        self.core.desired_size()
    }

    fn actual_bounds(&self) -> Rect {
        self.core.actual_bounds()
    }
}

impl ElementTrait for Element {
    fn core(&self) -> &ElementCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ElementCore {
        &mut self.core
    }

    fn children(&self) -> Option<&[Box<dyn ElementTrait>]> {
        None
    }

    fn children_mut(&mut self) -> Option<&mut [Box<dyn ElementTrait>]> {
        None
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
