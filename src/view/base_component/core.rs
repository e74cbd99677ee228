use super::next_ui_node_id;
use crate::config::LayoutConfig;
use crate::geometry::{Rect, Size, Thickness, shrink};
use crate::transform::{
    LayoutTransform, find_max_transformed_size, has_linear_part, linear_part, transform_size,
};
use crate::ui::{ChangeFlags, UiEvent};
use crate::view::attached::{AttachedKey, AttachedPropertyStore, AttachedType};
use glam::Vec2;
use smol_str::SmolStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HorizontalAlignment {
    Left,
    Center,
    Right,
    #[default]
    Stretch,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VerticalAlignment {
    Top,
    Center,
    Bottom,
    #[default]
    Stretch,
}

/// State threaded explicitly through measure and arrange.
#[derive(Clone, Copy, Debug)]
pub struct LayoutContext {
    pub zoom: Vec2,
    /// Accumulated layout transform of all ancestors.
    pub transform: LayoutTransform,
    pub config: LayoutConfig,
}

impl LayoutContext {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            zoom: Vec2::new(config.zoom_x, config.zoom_y),
            transform: LayoutTransform::IDENTITY,
            config,
        }
    }

    pub fn with_layout_transform(&self, local: Option<LayoutTransform>) -> Self {
        match local {
            Some(local) => Self {
                transform: self.transform * local,
                ..*self
            },
            None => *self,
        }
    }
}

impl Default for LayoutContext {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

pub struct ElementCore {
    pub id: u64,
    pub parent_id: Option<u64>,
    kind: &'static str,
    name: Option<SmolStr>,
    visible: bool,
    opacity: f32,
    focusable: bool,
    margin: Thickness,
    width: f32,
    height: f32,
    min_size: Size,
    max_size: Size,
    horizontal_alignment: HorizontalAlignment,
    vertical_alignment: VerticalAlignment,
    layout_transform: Option<LayoutTransform>,
    attached: AttachedPropertyStore,

    desired_size: Size,
    inner_desired_size: Size,
    actual_bounds: Rect,
    final_transform: LayoutTransform,
    last_available: Option<(Size, Vec2)>,
    last_outer: Option<Rect>,
    layout_dirty: bool,
    arrange_dirty: bool,
    pending_changes: ChangeFlags,
    pending_events: UiEvent,
}

impl ElementCore {
    pub fn new(kind: &'static str) -> Self {
        Self::new_with_id(next_ui_node_id(), kind)
    }

    pub fn new_with_id(id: u64, kind: &'static str) -> Self {
        Self {
            id,
            parent_id: None,
            kind,
            name: None,
            visible: true,
            opacity: 1.0,
            focusable: false,
            margin: Thickness::default(),
            width: f32::NAN,
            height: f32::NAN,
            min_size: Size::ZERO,
            max_size: Size::new(f32::INFINITY, f32::INFINITY),
            horizontal_alignment: HorizontalAlignment::default(),
            vertical_alignment: VerticalAlignment::default(),
            layout_transform: None,
            attached: AttachedPropertyStore::new(),
            desired_size: Size::ZERO,
            inner_desired_size: Size::ZERO,
            actual_bounds: Rect::default(),
            final_transform: LayoutTransform::IDENTITY,
            last_available: None,
            last_outer: None,
            layout_dirty: true,
            arrange_dirty: true,
            pending_changes: ChangeFlags::empty(),
            pending_events: UiEvent::empty(),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<SmolStr>) {
        self.name = Some(name.into());
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        if self.visible == visible {
            return;
        }
        self.visible = visible;
        self.pending_events |= if visible {
            UiEvent::VISIBLE
        } else {
            UiEvent::HIDDEN
        };
        self.pending_changes |= ChangeFlags::VISIBILITY;
        self.invalidate_layout();
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        let opacity = opacity.clamp(0.0, 1.0);
        if self.opacity == opacity {
            return;
        }
        self.opacity = opacity;
        self.pending_events |= UiEvent::OPACITY_CHANGE;
        self.pending_changes |= ChangeFlags::OPACITY;
    }

    pub fn is_focusable(&self) -> bool {
        self.focusable
    }

    pub fn set_focusable(&mut self, focusable: bool) {
        self.focusable = focusable;
    }

    pub fn margin(&self) -> Thickness {
        self.margin
    }

    pub fn set_margin(&mut self, margin: Thickness) {
        self.margin = margin;
        self.invalidate_layout();
    }

    /// Explicit width; NaN means auto.
    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = width;
        self.invalidate_layout();
    }

    pub fn set_height(&mut self, height: f32) {
        self.height = height;
        self.invalidate_layout();
    }

    pub fn set_size(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.invalidate_layout();
    }

    pub fn set_min_size(&mut self, min_size: Size) {
        self.min_size = min_size;
        self.invalidate_layout();
    }

    pub fn set_max_size(&mut self, max_size: Size) {
        self.max_size = max_size;
        self.invalidate_layout();
    }

    pub fn horizontal_alignment(&self) -> HorizontalAlignment {
        self.horizontal_alignment
    }

    pub fn vertical_alignment(&self) -> VerticalAlignment {
        self.vertical_alignment
    }

    pub fn set_alignment(&mut self, horizontal: HorizontalAlignment, vertical: VerticalAlignment) {
        self.horizontal_alignment = horizontal;
        self.vertical_alignment = vertical;
        self.invalidate_arrange();
    }

    pub fn layout_transform(&self) -> Option<LayoutTransform> {
        self.layout_transform
    }

    pub fn set_layout_transform(&mut self, transform: Option<LayoutTransform>) {
        self.layout_transform = transform;
        self.invalidate_layout();
    }

    pub fn attached(&self) -> &AttachedPropertyStore {
        &self.attached
    }

    pub fn attached_value<T: AttachedType>(&self, key: AttachedKey<T>) -> T {
        self.attached.get(key)
    }

    pub fn set_attached<T: AttachedType>(&mut self, key: AttachedKey<T>, value: T) {
        self.attached.set(key, value);
    }

    pub fn get_or_create_attached<T: AttachedType>(&mut self, key: AttachedKey<T>) -> T {
        self.attached.get_or_create(key)
    }

    pub fn desired_size(&self) -> Size {
        self.desired_size
    }

    pub fn actual_bounds(&self) -> Rect {
        self.actual_bounds
    }

    pub fn final_transform(&self) -> LayoutTransform {
        self.final_transform
    }

    pub fn is_layout_dirty(&self) -> bool {
        self.layout_dirty
    }

    pub fn invalidate_layout(&mut self) {
        self.layout_dirty = true;
        self.arrange_dirty = true;
        self.pending_changes |= ChangeFlags::MEASURE | ChangeFlags::ARRANGE;
    }

    pub fn invalidate_arrange(&mut self) {
        self.arrange_dirty = true;
        self.pending_changes |= ChangeFlags::ARRANGE;
    }

    /// Drains the invalidations to report to the parent. Attached-property writes
    /// count as a measure change.
    pub fn take_changes(&mut self) -> ChangeFlags {
        if self.attached.take_changed() {
            self.pending_changes |= ChangeFlags::MEASURE | ChangeFlags::RENDER_ORDER;
            self.layout_dirty = true;
            self.arrange_dirty = true;
        }
        std::mem::take(&mut self.pending_changes)
    }

    pub fn push_event(&mut self, event: UiEvent) {
        self.pending_events |= event;
    }

    pub fn take_events(&mut self) -> UiEvent {
        std::mem::take(&mut self.pending_events)
    }

    fn explicit_size(&self, zoom: Vec2) -> Size {
        Size::new(self.width * zoom.x, self.height * zoom.y)
    }

    fn clamp_size(&self, size: Size, zoom: Vec2) -> Size {
        let clamp = |value: f32, min: f32, max: f32| {
            if value.is_nan() { value } else { value.max(min).min(max) }
        };
        Size::new(
            clamp(size.width, self.min_size.width * zoom.x, self.max_size.width * zoom.x),
            clamp(size.height, self.min_size.height * zoom.y, self.max_size.height * zoom.y),
        )
    }

    /// Measure skeleton shared by every element: margin, explicit size, min/max and
    /// layout transform are handled here, `calculate` only sizes the content.
    pub fn measure_with(
        &mut self,
        available: Size,
        ctx: &LayoutContext,
        calculate: impl FnOnce(Size, &LayoutContext) -> Size,
    ) -> Size {
        if !self.layout_dirty
            && self
                .last_available
                .is_some_and(|(last, zoom)| last.same_as(available) && zoom == ctx.zoom)
        {
            return self.desired_size;
        }
        self.last_available = Some((available, ctx.zoom));

        let margin = self.margin.scaled(ctx.zoom.x, ctx.zoom.y);
        let mut size = Size::new(
            shrink(available.width, margin.horizontal()),
            shrink(available.height, margin.vertical()),
        );
        if let Some(transform) = self.layout_transform {
            size = find_max_transformed_size(&transform, size);
        }
        let explicit = self.explicit_size(ctx.zoom);
        override_explicit(&mut size, explicit);

        let child_ctx = ctx.with_layout_transform(self.layout_transform);
        size = calculate(size, &child_ctx);

        override_explicit(&mut size, explicit);
        size = self.clamp_size(size, ctx.zoom);
        self.inner_desired_size = size;

        if let Some(transform) = self.layout_transform {
            size = transform_size(&transform, size);
        }
        size.width += margin.horizontal();
        size.height += margin.vertical();

        self.desired_size = size;
        self.layout_dirty = false;
        self.arrange_dirty = true;
        if ctx.config.trace_layout {
            tracing::debug!(id = self.id, kind = self.kind, ?available, desired = ?size, "measure");
        } else {
            tracing::trace!(id = self.id, kind = self.kind, ?available, desired = ?size, "measure");
        }
        size
    }

    /// Arrange skeleton: removes the margin, centers a transformed element inside the
    /// remaining rect, then hands the inner rect to `arrange`. Returns false when the
    /// cached arrangement was still valid.
    pub fn arrange_with(
        &mut self,
        outer: Rect,
        ctx: &LayoutContext,
        arrange: impl FnOnce(Rect, &LayoutContext),
    ) -> bool {
        let child_ctx = ctx.with_layout_transform(self.layout_transform);
        if !self.arrange_dirty
            && self.last_outer.is_some_and(|last| last.same_as(outer))
            && self.final_transform == child_ctx.transform
        {
            return false;
        }
        self.last_outer = Some(outer);

        let margin = self.margin.scaled(ctx.zoom.x, ctx.zoom.y);
        let mut rect = Rect::new(
            outer.x + margin.left,
            outer.y + margin.top,
            (outer.width - margin.horizontal()).max(0.0),
            (outer.height - margin.vertical()).max(0.0),
        );

        if let Some(transform) = self.layout_transform.filter(has_linear_part) {
            let linear = linear_part(&transform);
            let mut inner = self.inner_desired_size;
            let transformed = transform_size(&linear, inner);
            let tolerance = ctx.config.fit_tolerance;
            if !(transformed.width <= rect.width + tolerance)
                || !(transformed.height <= rect.height + tolerance)
            {
                inner = find_max_transformed_size(&linear, rect.size());
            }
            rect = Rect::new(
                rect.x + (rect.width - inner.width) / 2.0,
                rect.y + (rect.height - inner.height) / 2.0,
                inner.width,
                inner.height,
            );
        }

        self.actual_bounds = rect;
        self.final_transform = child_ctx.transform;
        self.arrange_dirty = false;
        if ctx.config.trace_layout {
            tracing::debug!(id = self.id, kind = self.kind, ?outer, bounds = ?rect, "arrange");
        } else {
            tracing::trace!(id = self.id, kind = self.kind, ?outer, bounds = ?rect, "arrange");
        }
        arrange(rect, &child_ctx);
        true
    }
}

fn override_explicit(size: &mut Size, explicit: Size) {
    if !explicit.width.is_nan() {
        size.width = explicit.width;
    }
    if !explicit.height.is_nan() {
        size.height = explicit.height;
    }
}
