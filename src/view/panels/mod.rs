use crate::config::LayoutConfig;
use crate::geometry::{Point, Rect, Size};
use crate::style::Brush;
use crate::ui::{ChangeFlags, UiEvent};
use crate::view::attached::Z_INDEX;
use crate::view::base_component::{
    ElementCore, ElementTrait, HorizontalAlignment, LayoutContext, Layoutable, VerticalAlignment,
};
use crate::view::render_pass::BackgroundGeometry;
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

mod canvas;
mod definitions;
mod dock_panel;
mod grid;
mod stack_panel;
mod uniform_grid;
mod wrap_panel;

pub use canvas::*;
pub use definitions::*;
pub use dock_panel::*;
pub use grid::*;
pub use stack_panel::*;
pub use uniform_grid::*;
pub use wrap_panel::*;

/// Positioning rules of one panel kind. `Panel` owns children, background and render
/// order and delegates the two layout passes here.
pub trait LayoutStrategy: 'static {
    fn kind(&self) -> &'static str;

    fn calculate_desired_size(
        &mut self,
        children: &mut [Box<dyn ElementTrait>],
        available: Size,
        ctx: &LayoutContext,
    ) -> Size;

    fn arrange_children(
        &mut self,
        children: &mut [Box<dyn ElementTrait>],
        inner: Rect,
        ctx: &LayoutContext,
    );

    /// Fills `out` with the ids to draw, back to front.
    fn update_render_order(
        &self,
        children: &[Box<dyn ElementTrait>],
        _bounds: Rect,
        _tolerance: f32,
        out: &mut Vec<u64>,
    ) {
        z_sorted_visible(children.iter(), out);
    }

    fn is_child_rendered_at(&self, _child: &dyn ElementTrait, _bounds: Rect, _tolerance: f32) -> bool {
        true
    }
}

/// Visible children stable-sorted by ascending z-index.
pub(crate) fn z_sorted_visible<'a>(
    children: impl Iterator<Item = &'a Box<dyn ElementTrait>>,
    out: &mut Vec<u64>,
) {
    let mut ordered: Vec<(f32, u64)> = children
        .filter(|child| child.is_visible())
        .map(|child| (child.core().attached_value(Z_INDEX), child.id()))
        .collect();
    ordered.sort_by(|a, b| a.0.total_cmp(&b.0));
    out.extend(ordered.into_iter().map(|(_, id)| id));
}

/// Layout outputs shared with the render thread. The layout thread is the only
/// writer; readers take short read locks and may observe the previous frame.
#[derive(Debug)]
pub struct PanelRenderState {
    needs_layout: AtomicBool,
    needs_render_order_update: AtomicBool,
    render_order: RwLock<Vec<u64>>,
    background: RwLock<Option<BackgroundGeometry>>,
    actual_bounds: RwLock<Rect>,
}

impl PanelRenderState {
    fn new() -> Self {
        Self {
            needs_layout: AtomicBool::new(true),
            needs_render_order_update: AtomicBool::new(true),
            render_order: RwLock::new(Vec::new()),
            background: RwLock::new(None),
            actual_bounds: RwLock::new(Rect::default()),
        }
    }

    pub fn needs_layout(&self) -> bool {
        self.needs_layout.load(Ordering::Acquire)
    }

    pub fn needs_render_order_update(&self) -> bool {
        self.needs_render_order_update.load(Ordering::Acquire)
    }

    pub fn render_order(&self) -> Vec<u64> {
        self.render_order.read().clone()
    }

    pub fn background(&self) -> Option<BackgroundGeometry> {
        self.background.read().clone()
    }

    pub fn actual_bounds(&self) -> Rect {
        *self.actual_bounds.read()
    }

    fn mark_layout(&self) {
        self.needs_layout.store(true, Ordering::Release);
    }

    fn mark_render_order(&self) {
        self.needs_render_order_update.store(true, Ordering::Release);
    }
}

pub struct Panel<L: LayoutStrategy> {
    core: ElementCore,
    children: Vec<Box<dyn ElementTrait>>,
    background: Option<Brush>,
    layout: L,
    render_state: Arc<PanelRenderState>,
    config: LayoutConfig,
}

impl<L: LayoutStrategy> Panel<L> {
    pub fn new(layout: L) -> Self {
        Self {
            core: ElementCore::new(layout.kind()),
            children: Vec::new(),
            background: None,
            layout,
            render_state: Arc::new(PanelRenderState::new()),
            config: LayoutConfig::default(),
        }
    }

    pub fn layout(&self) -> &L {
        &self.layout
    }

    /// Mutable access to the strategy settings; invalidates measure.
    pub fn layout_mut(&mut self) -> &mut L {
        self.core.invalidate_layout();
        &mut self.layout
    }

    pub fn child(&self, id: u64) -> Option<&dyn ElementTrait> {
        self.children
            .iter()
            .find(|child| child.id() == id)
            .map(|child| child.as_ref())
    }

    pub fn child_mut(&mut self, id: u64) -> Option<&mut Box<dyn ElementTrait>> {
        self.children.iter_mut().find(|child| child.id() == id)
    }

    pub(crate) fn visible_children(&self) -> impl Iterator<Item = &dyn ElementTrait> {
        self.children
            .iter()
            .filter(|child| child.is_visible())
            .map(|child| child.as_ref())
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn add_child(&mut self, child: Box<dyn ElementTrait>) {
        let index = self.children.len();
        self.insert_child(index, child);
    }

    pub fn insert_child(&mut self, index: usize, mut child: Box<dyn ElementTrait>) {
        child.set_parent_id(Some(self.core.id));
        let index = index.min(self.children.len());
        self.children.insert(index, child);
        self.on_children_changed();
    }

    pub fn remove_child(&mut self, id: u64) -> Option<Box<dyn ElementTrait>> {
        let index = self.children.iter().position(|child| child.id() == id)?;
        let mut child = self.children.remove(index);
        child.set_parent_id(None);
        self.on_children_changed();
        Some(child)
    }

    /// Replaces the whole child collection and hands back the previous one with
    /// its parent links cleared.
    pub fn set_children(&mut self, children: Vec<Box<dyn ElementTrait>>) -> Vec<Box<dyn ElementTrait>> {
        let mut previous = std::mem::replace(&mut self.children, children);
        for child in &mut previous {
            child.set_parent_id(None);
        }
        let id = self.core.id;
        for child in &mut self.children {
            child.set_parent_id(Some(id));
        }
        self.on_children_changed();
        previous
    }

    fn on_children_changed(&mut self) {
        self.core.invalidate_layout();
        self.render_state.mark_layout();
        self.render_state.mark_render_order();
    }

    pub fn background(&self) -> Option<&Brush> {
        self.background.as_ref()
    }

    pub fn set_background(&mut self, background: Option<Brush>) {
        self.background = background;
        self.render_state.mark_layout();
    }

    pub fn render_handle(&self) -> Arc<PanelRenderState> {
        Arc::clone(&self.render_state)
    }

    pub fn render_order(&self) -> Vec<u64> {
        self.render_state.render_order()
    }

    pub fn needs_layout(&self) -> bool {
        self.render_state.needs_layout()
    }

    pub fn invalidate_render_order(&mut self) {
        self.render_state.mark_render_order();
    }

    /// Queues a UI event for the next `update`.
    pub fn fire_ui_event(&mut self, event: UiEvent) {
        self.core.push_event(event);
    }

    pub fn update_render_order(&mut self) {
        if !self.render_state.needs_render_order_update.swap(false, Ordering::AcqRel) {
            return;
        }
        let mut order = Vec::with_capacity(self.children.len());
        self.layout.update_render_order(
            &self.children,
            self.core.actual_bounds(),
            self.config.fit_tolerance,
            &mut order,
        );
        debug_assert!(order.len() <= self.children.len());
        debug_assert!(order.iter().all(|id| self.child(*id).is_some_and(|child| child.is_visible())));
        tracing::debug!(panel = self.core.id, kind = self.layout.kind(), len = order.len(), "render order rebuilt");
        *self.render_state.render_order.write() = order;
    }

    /// Rebuilds the background geometry for the current bounds and transform.
    pub fn perform_layout(&mut self) {
        if !self.render_state.needs_layout.swap(false, Ordering::AcqRel) {
            return;
        }
        let geometry = self.background.as_ref().and_then(|brush| {
            BackgroundGeometry::build(
                self.core.actual_bounds(),
                &self.core.final_transform(),
                brush,
                self.core.opacity(),
            )
        });
        tracing::debug!(panel = self.core.id, has_background = geometry.is_some(), "background rebuilt");
        *self.render_state.background.write() = geometry;
    }

    fn setup_brush(&mut self) {
        let mut background = self.render_state.background.write();
        if let (Some(geometry), Some(brush)) = (background.as_mut(), self.background.as_ref()) {
            geometry.recolor(brush, self.core.opacity());
        }
    }

    /// Point hit-test for `child_id`: inside its bounds, drawn by this panel and, with
    /// `occlusion_hit_test`, not covered by a sibling later in the render order.
    pub fn is_child_visible_at(&self, child_id: u64, x: f32, y: f32) -> bool {
        let Some(child) = self.child(child_id) else {
            return false;
        };
        if !child.is_visible() || !child.actual_bounds().contains(x, y) {
            return false;
        }
        if !self
            .layout
            .is_child_rendered_at(child, self.core.actual_bounds(), self.config.fit_tolerance)
        {
            return false;
        }
        if self.config.occlusion_hit_test {
            for id in self.render_state.render_order.read().iter().rev() {
                if *id == child_id {
                    break;
                }
                if self.child(*id).is_some_and(|other| other.actual_bounds().contains(x, y)) {
                    return false;
                }
            }
        }
        true
    }
}

impl<L: LayoutStrategy> Layoutable for Panel<L> {
    fn measure(&mut self, available: Size, ctx: &LayoutContext) -> Size {
        let children = &mut self.children;
        let layout = &mut self.layout;
        self.core.measure_with(available, ctx, |size, ctx| {
            layout.calculate_desired_size(children, size, ctx)
        })
    }

    fn arrange(&mut self, outer: Rect, ctx: &LayoutContext) {
        let previous_bounds = self.core.actual_bounds();
        let previous_transform = self.core.final_transform();
        let children = &mut self.children;
        let layout = &mut self.layout;
        let arranged = self.core.arrange_with(outer, ctx, |inner, ctx| {
            layout.arrange_children(children, inner, ctx);
        });
        if !arranged {
            return;
        }
        self.config = ctx.config;
        let bounds = self.core.actual_bounds();
        *self.render_state.actual_bounds.write() = bounds;
        if !bounds.same_as(previous_bounds) || self.core.final_transform() != previous_transform {
            self.render_state.mark_layout();
        }
        self.render_state.mark_render_order();
    }

    fn desired_size(&self) -> Size {
        self.core.desired_size()
    }

    fn actual_bounds(&self) -> Rect {
        self.core.actual_bounds()
    }
}

impl<L: LayoutStrategy> ElementTrait for Panel<L> {
    fn core(&self) -> &ElementCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ElementCore {
        &mut self.core
    }

    fn children(&self) -> Option<&[Box<dyn ElementTrait>]> {
        Some(&self.children)
    }

    fn children_mut(&mut self) -> Option<&mut [Box<dyn ElementTrait>]> {
        Some(&mut self.children)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }

    fn propagate_invalidation(&mut self) -> ChangeFlags {
        let mut from_children = ChangeFlags::empty();
        for child in &mut self.children {
            from_children |= child.propagate_invalidation();
        }
        if from_children.affects_layout() {
            self.core.invalidate_layout();
        } else if from_children.contains(ChangeFlags::ARRANGE) {
            self.core.invalidate_arrange();
        }
        if from_children.intersects(ChangeFlags::RENDER_ORDER | ChangeFlags::VISIBILITY) {
            self.render_state.mark_render_order();
        }
        self.core.take_changes()
    }

    fn update(&mut self) {
        if self.core.is_visible() {
            self.perform_layout();
        }
        self.update_render_order();

        let events = self.core.take_events();
        if events.contains(UiEvent::HIDDEN) {
            *self.render_state.background.write() = None;
            self.render_state.mark_layout();
        }
        if events.contains(UiEvent::OPACITY_CHANGE) {
            self.setup_brush();
        }
    }

    fn children_front_to_back(&self) -> Vec<u64> {
        let mut order = if self.render_state.needs_render_order_update() {
            let mut order = Vec::with_capacity(self.children.len());
            self.layout.update_render_order(
                &self.children,
                self.core.actual_bounds(),
                self.config.fit_tolerance,
                &mut order,
            );
            order
        } else {
            self.render_state.render_order()
        };
        order.reverse();
        order
    }

    fn is_child_rendered_at(&self, child_id: u64, x: f32, y: f32) -> bool {
        self.is_child_visible_at(child_id, x, y)
    }
}

/// Positions `child` inside `(location, size)` honouring its alignment. Only shrinks
/// an axis when the child's desired extent fits.
pub fn arrange_child(child: &dyn ElementTrait, location: &mut Point, size: &mut Size) {
    arrange_child_horizontal(child, child.core().horizontal_alignment(), location, size);
    arrange_child_vertical(child, child.core().vertical_alignment(), location, size);
}

pub fn arrange_child_horizontal(
    child: &dyn ElementTrait,
    alignment: HorizontalAlignment,
    location: &mut Point,
    size: &mut Size,
) {
    let desired = child.desired_size().width;
    if desired.is_nan() || desired > size.width {
        return;
    }
    // Explicit width wins over Stretch.
    let stretch_with_width = alignment == HorizontalAlignment::Stretch && !child.core().width().is_nan();
    match alignment {
        HorizontalAlignment::Center => {
            location.x += (size.width - desired) / 2.0;
            size.width = desired;
        }
        HorizontalAlignment::Stretch if stretch_with_width => {
            location.x += (size.width - desired) / 2.0;
            size.width = desired;
        }
        HorizontalAlignment::Right => {
            location.x += size.width - desired;
            size.width = desired;
        }
        HorizontalAlignment::Left => size.width = desired,
        HorizontalAlignment::Stretch => {}
    }
}

pub fn arrange_child_vertical(
    child: &dyn ElementTrait,
    alignment: VerticalAlignment,
    location: &mut Point,
    size: &mut Size,
) {
    let desired = child.desired_size().height;
    if desired.is_nan() || desired > size.height {
        return;
    }
    let stretch_with_height = alignment == VerticalAlignment::Stretch && !child.core().height().is_nan();
    match alignment {
        VerticalAlignment::Center => {
            location.y += (size.height - desired) / 2.0;
            size.height = desired;
        }
        VerticalAlignment::Stretch if stretch_with_height => {
            location.y += (size.height - desired) / 2.0;
            size.height = desired;
        }
        VerticalAlignment::Bottom => {
            location.y += size.height - desired;
            size.height = desired;
        }
        VerticalAlignment::Top => size.height = desired,
        VerticalAlignment::Stretch => {}
    }
}

/// Shorthand for arranging with alignment into a slot rect.
pub(crate) fn arrange_in_slot(child: &mut Box<dyn ElementTrait>, slot: Rect, ctx: &LayoutContext) {
    let mut location = slot.origin();
    let mut size = slot.size();
    arrange_child(child.as_ref(), &mut location, &mut size);
    child.arrange(Rect::from_origin_size(location, size), ctx);
}

pub(crate) fn desired_or_zero(value: f32) -> f32 {
    if value.is_nan() { 0.0 } else { value }
}
