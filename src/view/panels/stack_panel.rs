use super::{
    LayoutStrategy, Panel, arrange_child_horizontal, arrange_child_vertical, desired_or_zero,
    z_sorted_visible,
};
use crate::geometry::{Point, Rect, Size, max_len};
use crate::ui::{ScrolledEvent, ScrolledHandlers};
use crate::view::base_component::{ElementTrait, LayoutContext, contains_element, find_element};
use crate::view::focus::{
    FocusCandidate, FocusDirection, FocusPredictor, collect_focus_candidates, walk_focus,
};

pub type StackPanel = Panel<StackLayout>;

/// Focusable children added before and after the visible range when predicting focus moves.
pub const NUM_ADD_MORE_FOCUS_ELEMENTS: usize = 2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

impl Orientation {
    pub fn along(self, size: Size) -> f32 {
        match self {
            Orientation::Vertical => size.height,
            Orientation::Horizontal => size.width,
        }
    }

    pub fn across(self, size: Size) -> f32 {
        match self {
            Orientation::Vertical => size.width,
            Orientation::Horizontal => size.height,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PendingScroll {
    index: usize,
    to_first: bool,
}

/// Stacks children along one axis with optional logical (whole-child) scrolling.
#[derive(Debug, Default)]
pub struct StackLayout {
    orientation: Orientation,
    can_scroll: bool,
    pending_scroll: Option<PendingScroll>,
    first_visible: usize,
    last_visible: Option<usize>,
    total_width: f32,
    total_height: f32,
    scrolled: ScrolledHandlers,
}

impl StackLayout {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            ..Self::default()
        }
    }

    pub fn scrollable(orientation: Orientation) -> Self {
        Self {
            orientation,
            can_scroll: true,
            ..Self::default()
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    pub fn can_scroll(&self) -> bool {
        self.can_scroll
    }

    pub fn set_can_scroll(&mut self, can_scroll: bool) {
        self.can_scroll = can_scroll;
    }

    /// Index (among visible children) of the first child inside the viewport.
    pub fn first_visible(&self) -> usize {
        self.first_visible
    }

    /// Index of the last child fully inside the viewport; `None` when nothing fits.
    pub fn last_visible(&self) -> Option<usize> {
        self.last_visible
    }

    pub fn on_scrolled<F>(&mut self, handler: F)
    where
        F: FnMut(&ScrolledEvent) + 'static,
    {
        self.scrolled.push(handler);
    }
}

/// First/last child that fit into `space`, starting from `first` (or, inverted, ending
/// at `last`) and then pulling the other end outwards while space is left.
fn visible_range(
    extents: &[f32],
    space: f32,
    first: usize,
    last: usize,
    invert: bool,
    delta: f32,
) -> (usize, Option<usize>) {
    let count = extents.len();
    let mut space_left = space;
    if invert {
        let last = last.min(count - 1);
        let mut first = None;
        for i in (0..=last).rev() {
            space_left -= extents[i];
            if space_left + delta < 0.0 {
                break;
            }
            first = Some(i);
        }
        let Some(first) = first else {
            return (last, None);
        };
        let mut last = last;
        if space_left > 0.0 {
            for (i, extent) in extents.iter().enumerate().skip(last + 1) {
                space_left -= extent;
                if space_left + delta < 0.0 {
                    break;
                }
                last = i;
            }
        }
        (first, Some(last))
    } else {
        let mut first = first.min(count - 1);
        let mut last = None;
        for (i, extent) in extents.iter().enumerate().skip(first) {
            space_left -= extent;
            if space_left + delta < 0.0 {
                break;
            }
            last = Some(i);
        }
        if space_left > 0.0 {
            for i in (0..first).rev() {
                space_left -= extents[i];
                if space_left + delta < 0.0 {
                    break;
                }
                first = i;
            }
        }
        (first, last)
    }
}

impl LayoutStrategy for StackLayout {
    fn kind(&self) -> &'static str {
        "StackPanel"
    }

    fn calculate_desired_size(
        &mut self,
        children: &mut [Box<dyn ElementTrait>],
        available: Size,
        ctx: &LayoutContext,
    ) -> Size {
        let constraint = match self.orientation {
            Orientation::Vertical => Size::new(available.width, f32::NAN),
            Orientation::Horizontal => Size::new(f32::NAN, available.height),
        };
        let mut along = 0.0;
        let mut across = 0.0;
        for child in children.iter_mut().filter(|child| child.is_visible()) {
            let desired = child.measure(constraint, ctx);
            along += desired_or_zero(self.orientation.along(desired));
            across = max_len(across, self.orientation.across(desired));
        }
        match self.orientation {
            Orientation::Vertical => Size::new(across, along),
            Orientation::Horizontal => Size::new(along, across),
        }
    }

    fn arrange_children(
        &mut self,
        children: &mut [Box<dyn ElementTrait>],
        inner: Rect,
        ctx: &LayoutContext,
    ) {
        self.total_width = 0.0;
        self.total_height = 0.0;
        let mut visible: Vec<&mut Box<dyn ElementTrait>> =
            children.iter_mut().filter(|child| child.is_visible()).collect();
        if visible.is_empty() {
            self.first_visible = 0;
            self.last_visible = None;
            return;
        }

        let orientation = self.orientation;
        let extent_along = orientation.along(inner.size());
        let extent_across = orientation.across(inner.size());

        let mut invert = false;
        if let Some(pending) = self.pending_scroll.take() {
            if pending.to_first {
                self.first_visible = pending.index;
            } else {
                self.last_visible = Some(pending.index);
                invert = true;
            }
        }
        if !self.can_scroll {
            self.first_visible = 0;
            invert = false;
        }

        let extents: Vec<f32> = visible
            .iter()
            .map(|child| desired_or_zero(orientation.along(child.desired_size())))
            .collect();
        let previous = (self.first_visible, self.last_visible);
        let (first, last) = visible_range(
            &extents,
            extent_along,
            self.first_visible,
            self.last_visible.unwrap_or(0),
            invert,
            ctx.config.fit_tolerance,
        );
        self.first_visible = first;
        self.last_visible = last;
        debug_assert!(last.is_none_or(|last| last >= first));
        if previous != (first, last) {
            tracing::debug!(first, ?last, "stack panel visible range changed");
        }

        // Children before the first visible one are laid out ahead of the viewport.
        let mut start: f32 = -extents[..first].iter().sum::<f32>();
        match orientation {
            Orientation::Vertical => self.total_width = extent_across,
            Orientation::Horizontal => self.total_height = extent_across,
        }
        for (child, extent) in visible.iter_mut().zip(&extents) {
            let child: &mut Box<dyn ElementTrait> = child;
            match orientation {
                Orientation::Vertical => {
                    let mut location = Point::new(inner.x, inner.y + start);
                    let mut size = Size::new(extent_across, *extent);
                    let alignment = child.core().horizontal_alignment();
                    arrange_child_horizontal(child.as_ref(), alignment, &mut location, &mut size);
                    child.arrange(Rect::from_origin_size(location, size), ctx);
                    self.total_height += extent;
                }
                Orientation::Horizontal => {
                    let mut location = Point::new(inner.x + start, inner.y);
                    let mut size = Size::new(*extent, extent_across);
                    let alignment = child.core().vertical_alignment();
                    arrange_child_vertical(child.as_ref(), alignment, &mut location, &mut size);
                    child.arrange(Rect::from_origin_size(location, size), ctx);
                    self.total_width += extent;
                }
            }
            start += extent;
        }
    }

    fn update_render_order(
        &self,
        children: &[Box<dyn ElementTrait>],
        bounds: Rect,
        tolerance: f32,
        out: &mut Vec<u64>,
    ) {
        if !self.can_scroll {
            z_sorted_visible(children.iter(), out);
            return;
        }
        let Some(last) = self.last_visible else {
            return;
        };
        let in_view = children
            .iter()
            .filter(|child| child.is_visible())
            .enumerate()
            .filter(|(index, _)| (self.first_visible..=last).contains(index))
            .map(|(_, child)| child)
            .filter(|child| bounds.contains_rect(child.actual_bounds(), tolerance));
        z_sorted_visible(in_view, out);
    }

    fn is_child_rendered_at(&self, child: &dyn ElementTrait, bounds: Rect, tolerance: f32) -> bool {
        !self.can_scroll || bounds.contains_rect(child.actual_bounds(), tolerance)
    }
}

impl Panel<StackLayout> {
    /// Requests `index` to become the first (or, with `first == false`, the last)
    /// visible child at the next arrange.
    pub fn set_scroll_index(&mut self, index: usize, first: bool) {
        if !self.layout.can_scroll {
            return;
        }
        let requested = PendingScroll {
            index,
            to_first: first,
        };
        let layout = &self.layout;
        let unchanged = layout.pending_scroll == Some(requested)
            || (layout.pending_scroll.is_none()
                && if first {
                    layout.first_visible == index
                } else {
                    layout.last_visible == Some(index)
                });
        if unchanged {
            return;
        }
        self.layout.pending_scroll = Some(requested);
        self.core.invalidate_arrange();
        tracing::debug!(panel = self.core.id, index, first, "scroll index requested");
        let event = ScrolledEvent {
            panel_id: self.core.id,
            index,
            scroll_to_first: first,
        };
        self.layout.scrolled.invoke(&event);
    }

    /// Registers a `Scrolled` listener without invalidating the layout.
    pub fn on_scrolled<F>(&mut self, handler: F)
    where
        F: FnMut(&ScrolledEvent) + 'static,
    {
        self.layout.scrolled.push(handler);
    }

    pub fn scroll_to_last(&mut self, index: usize) {
        self.set_scroll_index(index, false);
    }

    pub fn make_item_visible(&mut self, index: usize) {
        if index < self.layout.first_visible {
            self.set_scroll_index(index, true);
        } else if self.layout.last_visible.is_none_or(|last| index > last) {
            self.set_scroll_index(index, false);
        }
    }

    pub fn scroll_down(&mut self, lines: usize) -> bool {
        if self.layout.orientation != Orientation::Vertical || self.is_viewport_at_bottom() {
            return false;
        }
        self.set_scroll_index(self.layout.first_visible.saturating_add(lines), true);
        true
    }

    pub fn scroll_up(&mut self, lines: usize) -> bool {
        if self.layout.orientation != Orientation::Vertical || self.is_viewport_at_top() {
            return false;
        }
        self.set_scroll_index(self.layout.first_visible.saturating_sub(lines), true);
        true
    }

    pub fn total_width(&self) -> f32 {
        self.layout.total_width
    }

    pub fn total_height(&self) -> f32 {
        self.layout.total_height
    }

    pub fn viewport_width(&self) -> f32 {
        self.core.actual_bounds().width
    }

    pub fn viewport_height(&self) -> f32 {
        self.core.actual_bounds().height
    }

    pub fn viewport_start_x(&self) -> f32 {
        if self.layout.orientation == Orientation::Vertical {
            return 0.0;
        }
        self.space_before_first(|size| size.width)
    }

    pub fn viewport_start_y(&self) -> f32 {
        if self.layout.orientation == Orientation::Horizontal {
            return 0.0;
        }
        self.space_before_first(|size| size.height)
    }

    fn space_before_first(&self, extent: impl Fn(Size) -> f32) -> f32 {
        let scroll_index = self.layout.first_visible;
        self.visible_children()
            .take(scroll_index)
            .map(|child| desired_or_zero(extent(child.desired_size())))
            .sum()
    }

    pub fn is_viewport_at_top(&self) -> bool {
        self.layout.orientation == Orientation::Horizontal || self.layout.first_visible == 0
    }

    pub fn is_viewport_at_bottom(&self) -> bool {
        self.layout.orientation == Orientation::Horizontal || self.last_is_visible()
    }

    pub fn is_viewport_at_left(&self) -> bool {
        self.layout.orientation == Orientation::Vertical || self.layout.first_visible == 0
    }

    pub fn is_viewport_at_right(&self) -> bool {
        self.layout.orientation == Orientation::Vertical || self.last_is_visible()
    }

    fn last_is_visible(&self) -> bool {
        let count = self.visible_children().count();
        count == 0 || self.layout.last_visible == Some(count - 1)
    }

    /// Focusable elements in the visible range, extended by `around` focusable
    /// children on either side.
    pub fn focus_candidates(&self, around: usize) -> Vec<FocusCandidate> {
        let mut out = Vec::new();
        if !self.core.is_visible() {
            return out;
        }
        if self.core.is_focusable() {
            out.push(FocusCandidate {
                id: self.core.id,
                bounds: self.core.actual_bounds(),
            });
        }
        let visible: Vec<&dyn ElementTrait> = self.visible_children().collect();
        if visible.is_empty() {
            return out;
        }
        let last_index = visible.len() - 1;
        let first = self.layout.first_visible.min(last_index);
        let last = self.layout.last_visible.unwrap_or(first).min(last_index);

        let mut before = around;
        for child in visible[..first].iter().rev() {
            if before == 0 {
                break;
            }
            let len = out.len();
            collect_focus_candidates(*child, &mut out);
            if out.len() != len {
                before -= 1;
            }
        }
        for child in visible.iter().take(last + 1).skip(first) {
            collect_focus_candidates(*child, &mut out);
        }
        let mut after = around;
        for child in visible.iter().skip(last + 1) {
            if after == 0 {
                break;
            }
            let len = out.len();
            collect_focus_candidates(*child, &mut out);
            if out.len() != len {
                after -= 1;
            }
        }
        out
    }

    fn move_focus(
        &self,
        focused: u64,
        direction: FocusDirection,
        predictor: &dyn FocusPredictor,
    ) -> Option<u64> {
        let current = find_element(self, focused)?.actual_bounds();
        let candidates: Vec<FocusCandidate> = self
            .focus_candidates(NUM_ADD_MORE_FOCUS_ELEMENTS)
            .into_iter()
            .filter(|candidate| candidate.id != focused)
            .collect();
        predictor.find_next(&candidates, current, direction)
    }

    pub fn focus_up(&self, focused: u64, predictor: &dyn FocusPredictor) -> Option<u64> {
        if self.layout.orientation != Orientation::Vertical {
            return None;
        }
        self.move_focus(focused, FocusDirection::Up, predictor)
    }

    pub fn focus_down(&self, focused: u64, predictor: &dyn FocusPredictor) -> Option<u64> {
        if self.layout.orientation != Orientation::Vertical {
            return None;
        }
        self.move_focus(focused, FocusDirection::Down, predictor)
    }

    pub fn focus_left(&self, focused: u64, predictor: &dyn FocusPredictor) -> Option<u64> {
        if self.layout.orientation != Orientation::Horizontal {
            return None;
        }
        self.move_focus(focused, FocusDirection::Left, predictor)
    }

    pub fn focus_right(&self, focused: u64, predictor: &dyn FocusPredictor) -> Option<u64> {
        if self.layout.orientation != Orientation::Horizontal {
            return None;
        }
        self.move_focus(focused, FocusDirection::Right, predictor)
    }

    /// Walks focus through all visible children in `direction` while `within_page`
    /// accepts the next candidate's bounds.
    fn page_focus(
        &self,
        focused: u64,
        direction: FocusDirection,
        predictor: &dyn FocusPredictor,
        within_page: impl Fn(Rect) -> bool,
    ) -> Option<u64> {
        let current = find_element(self, focused)?.actual_bounds();
        let mut candidates = Vec::new();
        for child in self.visible_children() {
            collect_focus_candidates(child, &mut candidates);
        }
        Some(walk_focus(&candidates, focused, current, direction, predictor, within_page))
    }

    /// `(child bounds, focus inside it)` for the first or last visible child.
    fn edge_child(&self, focused: u64, last: bool) -> Option<(Rect, bool)> {
        let visible: Vec<&dyn ElementTrait> = self.visible_children().collect();
        let last_index = visible.len().checked_sub(1)?;
        let index = if last {
            self.layout.last_visible.unwrap_or(0).min(last_index)
        } else {
            self.layout.first_visible.min(last_index)
        };
        let child = visible[index];
        Some((child.actual_bounds(), contains_element(child, focused)))
    }

    pub fn focus_page_up(&self, focused: u64, predictor: &dyn FocusPredictor) -> Option<u64> {
        if self.layout.orientation != Orientation::Vertical {
            return None;
        }
        let (edge, at_edge) = self.edge_child(focused, false)?;
        let bounds = self.core.actual_bounds();
        let limit = if at_edge { edge.bottom() - bounds.height } else { bounds.y };
        let delta = self.config.fit_tolerance;
        self.page_focus(focused, FocusDirection::Up, predictor, |next| next.y > limit - delta)
    }

    pub fn focus_page_down(&self, focused: u64, predictor: &dyn FocusPredictor) -> Option<u64> {
        if self.layout.orientation != Orientation::Vertical {
            return None;
        }
        let (edge, at_edge) = self.edge_child(focused, true)?;
        let bounds = self.core.actual_bounds();
        let limit = if at_edge { edge.y + bounds.height } else { bounds.bottom() };
        let delta = self.config.fit_tolerance;
        self.page_focus(focused, FocusDirection::Down, predictor, |next| next.bottom() < limit + delta)
    }

    pub fn focus_page_left(&self, focused: u64, predictor: &dyn FocusPredictor) -> Option<u64> {
        if self.layout.orientation != Orientation::Horizontal {
            return None;
        }
        let (edge, at_edge) = self.edge_child(focused, false)?;
        let bounds = self.core.actual_bounds();
        let limit = if at_edge { edge.right() - bounds.width } else { bounds.x };
        let delta = self.config.fit_tolerance;
        self.page_focus(focused, FocusDirection::Left, predictor, |next| next.x > limit - delta)
    }

    pub fn focus_page_right(&self, focused: u64, predictor: &dyn FocusPredictor) -> Option<u64> {
        if self.layout.orientation != Orientation::Horizontal {
            return None;
        }
        let (edge, at_edge) = self.edge_child(focused, true)?;
        let bounds = self.core.actual_bounds();
        let limit = if at_edge { edge.x + bounds.width } else { bounds.right() };
        let delta = self.config.fit_tolerance;
        self.page_focus(focused, FocusDirection::Right, predictor, |next| next.right() < limit + delta)
    }

    /// Scrolls to the first child and returns it as the new focus target.
    pub fn focus_home(&mut self) -> Option<u64> {
        let first = self.visible_children().next()?.id();
        self.set_scroll_index(0, true);
        Some(first)
    }

    pub fn focus_end(&mut self) -> Option<u64> {
        let last = self.visible_children().last()?.id();
        self.set_scroll_index(usize::MAX, false);
        Some(last)
    }
}
