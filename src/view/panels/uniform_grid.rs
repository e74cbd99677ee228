use super::{LayoutStrategy, Panel, arrange_in_slot, desired_or_zero, z_sorted_visible};
use crate::geometry::{Rect, Size, max_len};
use crate::ui::{ScrolledEvent, ScrolledHandlers};
use crate::view::base_component::{ElementTrait, LayoutContext, contains_element, find_element};
use crate::view::focus::{FocusDirection, FocusPredictor, collect_focus_candidates, walk_focus};

pub type UniformGrid = Panel<UniformGridLayout>;

/// Grid shape for `count` children. A zero count is derived from the other one; with
/// both zero the children fill the smallest square that holds them.
pub fn cell_counts(count: usize, columns: usize, rows: usize) -> (usize, usize) {
    match (columns, rows) {
        (0, 0) => {
            let mut side = count.isqrt();
            if side * side < count {
                side += 1;
            }
            (side, side)
        }
        (columns, 0) => (columns, count.div_ceil(columns)),
        (0, rows) => (count.div_ceil(rows), rows),
        shape => shape,
    }
}

/// Whole-pixel share of `total` per cell; NaN stays unconstrained.
fn cell_extent(total: f32, count: usize) -> f32 {
    if total.is_nan() || count == 0 {
        f32::NAN
    } else {
        (total.trunc() / count as f32).trunc()
    }
}

/// Equal-sized cells, each as large as the largest visible child.
#[derive(Debug, Default)]
pub struct UniformGridLayout {
    columns: usize,
    rows: usize,
    can_scroll: bool,
    scroll_x: usize,
    scroll_y: usize,
    actual_columns: usize,
    actual_rows: usize,
    column_width: f32,
    row_height: f32,
    visible_columns: usize,
    visible_rows: usize,
    scrolled: ScrolledHandlers,
}

impl UniformGridLayout {
    /// `0` for either count derives it from the number of visible children.
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            ..Self::default()
        }
    }

    pub fn scrollable(columns: usize, rows: usize) -> Self {
        Self {
            can_scroll: true,
            ..Self::new(columns, rows)
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn set_columns(&mut self, columns: usize) {
        self.columns = columns;
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn set_rows(&mut self, rows: usize) {
        self.rows = rows;
    }

    pub fn can_scroll(&self) -> bool {
        self.can_scroll
    }

    pub fn set_can_scroll(&mut self, can_scroll: bool) {
        self.can_scroll = can_scroll;
    }

    /// `(column, row)` of the cell drawn at the panel origin.
    pub fn scroll_index(&self) -> (usize, usize) {
        (self.scroll_x, self.scroll_y)
    }

    pub fn actual_columns(&self) -> usize {
        self.actual_columns
    }

    pub fn actual_rows(&self) -> usize {
        self.actual_rows
    }

    pub fn column_width(&self) -> f32 {
        self.column_width
    }

    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    pub fn visible_columns(&self) -> usize {
        self.visible_columns
    }

    pub fn visible_rows(&self) -> usize {
        self.visible_rows
    }

    fn uniform_cell<'a>(&self, children: impl Iterator<Item = &'a Box<dyn ElementTrait>>, total: Size) -> Size {
        let mut cell = Size::new(
            cell_extent(total.width, self.actual_columns),
            cell_extent(total.height, self.actual_rows),
        );
        for child in children {
            let desired = child.desired_size();
            cell.width = max_len(cell.width, desired.width);
            cell.height = max_len(cell.height, desired.height);
        }
        Size::new(desired_or_zero(cell.width), desired_or_zero(cell.height))
    }
}

impl LayoutStrategy for UniformGridLayout {
    fn kind(&self) -> &'static str {
        "UniformGrid"
    }

    fn calculate_desired_size(
        &mut self,
        children: &mut [Box<dyn ElementTrait>],
        available: Size,
        ctx: &LayoutContext,
    ) -> Size {
        let count = children.iter().filter(|child| child.is_visible()).count();
        (self.actual_columns, self.actual_rows) = cell_counts(count, self.columns, self.rows);
        if self.actual_columns == 0 || self.actual_rows == 0 {
            return Size::ZERO;
        }

        let cell = Size::new(
            available.width / self.actual_columns as f32,
            available.height / self.actual_rows as f32,
        );
        for child in children.iter_mut().filter(|child| child.is_visible()) {
            child.measure(cell, ctx);
        }
        let cell = self.uniform_cell(children.iter().filter(|child| child.is_visible()), available);
        Size::new(
            cell.width * self.actual_columns as f32,
            cell.height * self.actual_rows as f32,
        )
    }

    fn arrange_children(
        &mut self,
        children: &mut [Box<dyn ElementTrait>],
        inner: Rect,
        ctx: &LayoutContext,
    ) {
        let count = children.iter().filter(|child| child.is_visible()).count();
        (self.actual_columns, self.actual_rows) = cell_counts(count, self.columns, self.rows);
        let (columns, rows) = (self.actual_columns, self.actual_rows);
        if columns == 0 || rows == 0 {
            self.visible_columns = 0;
            self.visible_rows = 0;
            return;
        }

        let cell = if self.can_scroll {
            self.uniform_cell(children.iter().filter(|child| child.is_visible()), inner.size())
        } else {
            Size::new(inner.width / columns as f32, inner.height / rows as f32)
        };
        self.column_width = cell.width;
        self.row_height = cell.height;
        self.visible_columns = if cell.width > 0.0 {
            (inner.width / cell.width) as usize
        } else {
            columns
        };
        self.visible_rows = if cell.height > 0.0 {
            (inner.height / cell.height) as usize
        } else {
            rows
        };

        if self.can_scroll {
            self.scroll_x = self.scroll_x.min(columns.saturating_sub(self.visible_columns));
            self.scroll_y = self.scroll_y.min(rows.saturating_sub(self.visible_rows));
        } else {
            self.scroll_x = 0;
            self.scroll_y = 0;
        }

        // Cells before the scroll index still get bounds, ahead of the viewport.
        let visible = children.iter_mut().filter(|child| child.is_visible());
        for (index, child) in visible.enumerate() {
            let column = (index % columns) as f32 - self.scroll_x as f32;
            let row = (index / columns) as f32 - self.scroll_y as f32;
            let slot = Rect::new(
                inner.x + column * cell.width,
                inner.y + row * cell.height,
                cell.width,
                cell.height,
            );
            arrange_in_slot(child, slot, ctx);
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
        let in_view = children
            .iter()
            .filter(|child| bounds.contains_rect(child.actual_bounds(), tolerance));
        z_sorted_visible(in_view, out);
    }

    fn is_child_rendered_at(&self, child: &dyn ElementTrait, bounds: Rect, tolerance: f32) -> bool {
        !self.can_scroll || bounds.contains_rect(child.actual_bounds(), tolerance)
    }
}

impl Panel<UniformGridLayout> {
    pub fn on_scrolled<F>(&mut self, handler: F)
    where
        F: FnMut(&ScrolledEvent) + 'static,
    {
        self.layout.scrolled.push(handler);
    }

    /// Requests `(column, row)` as the top-left cell. Out-of-range indices are clamped
    /// at the next arrange. The `Scrolled` event reports the child index of that cell.
    pub fn set_scroll_index(&mut self, column: usize, row: usize) {
        let layout = &self.layout;
        if !layout.can_scroll || (layout.scroll_x, layout.scroll_y) == (column, row) {
            return;
        }
        self.layout.scroll_x = column;
        self.layout.scroll_y = row;
        self.core.invalidate_arrange();
        tracing::debug!(panel = self.core.id, column, row, "uniform grid scroll requested");
        let event = ScrolledEvent {
            panel_id: self.core.id,
            index: row.saturating_mul(self.layout.actual_columns).saturating_add(column),
            scroll_to_first: true,
        };
        self.layout.scrolled.invoke(&event);
    }

    pub fn scroll_down(&mut self, lines: usize) -> bool {
        if self.is_viewport_at_bottom() {
            return false;
        }
        let (column, row) = self.layout.scroll_index();
        self.set_scroll_index(column, row.saturating_add(lines));
        true
    }

    pub fn scroll_up(&mut self, lines: usize) -> bool {
        if self.is_viewport_at_top() {
            return false;
        }
        let (column, row) = self.layout.scroll_index();
        self.set_scroll_index(column, row.saturating_sub(lines));
        true
    }

    /// Scrolls the least amount that brings the `index`-th visible child into view.
    pub fn make_item_visible(&mut self, index: usize) {
        let layout = &self.layout;
        let columns = layout.actual_columns;
        if columns == 0 {
            return;
        }
        let (column, row) = (index % columns, index / columns);
        let (mut scroll_x, mut scroll_y) = layout.scroll_index();
        if column < scroll_x {
            scroll_x = column;
        } else if column >= scroll_x + layout.visible_columns {
            scroll_x = (column + 1).saturating_sub(layout.visible_columns.max(1));
        }
        if row < scroll_y {
            scroll_y = row;
        } else if row >= scroll_y + layout.visible_rows {
            scroll_y = (row + 1).saturating_sub(layout.visible_rows.max(1));
        }
        self.set_scroll_index(scroll_x, scroll_y);
    }

    pub fn total_width(&self) -> f32 {
        self.layout.actual_columns as f32 * self.layout.column_width
    }

    pub fn total_height(&self) -> f32 {
        self.layout.actual_rows as f32 * self.layout.row_height
    }

    pub fn viewport_width(&self) -> f32 {
        self.core.actual_bounds().width
    }

    pub fn viewport_height(&self) -> f32 {
        self.core.actual_bounds().height
    }

    pub fn viewport_start_x(&self) -> f32 {
        self.layout.scroll_x as f32 * self.layout.column_width
    }

    pub fn viewport_start_y(&self) -> f32 {
        self.layout.scroll_y as f32 * self.layout.row_height
    }

    pub fn is_viewport_at_top(&self) -> bool {
        self.layout.scroll_y == 0
    }

    pub fn is_viewport_at_bottom(&self) -> bool {
        self.layout.scroll_y + self.layout.visible_rows >= self.layout.actual_rows
    }

    pub fn is_viewport_at_left(&self) -> bool {
        self.layout.scroll_x == 0
    }

    pub fn is_viewport_at_right(&self) -> bool {
        self.layout.scroll_x + self.layout.visible_columns >= self.layout.actual_columns
    }

    pub fn number_of_visible_lines(&self) -> usize {
        self.layout.visible_rows
    }

    fn walk_cells(
        &self,
        focused: u64,
        direction: FocusDirection,
        predictor: &dyn FocusPredictor,
        accept: impl Fn(Rect) -> bool,
    ) -> Option<u64> {
        let current = find_element(self, focused)?.actual_bounds();
        let mut candidates = Vec::new();
        for child in self.visible_children() {
            collect_focus_candidates(child, &mut candidates);
        }
        Some(walk_focus(&candidates, focused, current, direction, predictor, accept))
    }

    fn move_focus(
        &self,
        focused: u64,
        direction: FocusDirection,
        predictor: &dyn FocusPredictor,
    ) -> Option<u64> {
        let current = find_element(self, focused)?.actual_bounds();
        let mut candidates = Vec::new();
        for child in self.visible_children() {
            collect_focus_candidates(child, &mut candidates);
        }
        candidates.retain(|candidate| candidate.id != focused);
        predictor.find_next(&candidates, current, direction)
    }

    pub fn focus_up(&self, focused: u64, predictor: &dyn FocusPredictor) -> Option<u64> {
        self.move_focus(focused, FocusDirection::Up, predictor)
    }

    pub fn focus_down(&self, focused: u64, predictor: &dyn FocusPredictor) -> Option<u64> {
        self.move_focus(focused, FocusDirection::Down, predictor)
    }

    pub fn focus_left(&self, focused: u64, predictor: &dyn FocusPredictor) -> Option<u64> {
        self.move_focus(focused, FocusDirection::Left, predictor)
    }

    pub fn focus_right(&self, focused: u64, predictor: &dyn FocusPredictor) -> Option<u64> {
        self.move_focus(focused, FocusDirection::Right, predictor)
    }

    /// Bounds of the child in one of `cells` (column, row) that holds the focus.
    fn focused_edge(
        &self,
        cells: impl Iterator<Item = (usize, usize)>,
        focused: u64,
    ) -> Option<Rect> {
        let columns = self.layout.actual_columns;
        let visible: Vec<&dyn ElementTrait> = self.visible_children().collect();
        cells
            .filter(|(column, _)| *column < columns)
            .filter_map(|(column, row)| visible.get(row * columns + column).copied())
            .find(|child| contains_element(*child, focused))
            .map(|child| child.actual_bounds())
    }

    pub fn focus_page_up(&self, focused: u64, predictor: &dyn FocusPredictor) -> Option<u64> {
        let layout = &self.layout;
        let (x, y) = layout.scroll_index();
        let bounds = self.core.actual_bounds();
        let top_row = (x..x + layout.visible_columns).map(|column| (column, y));
        let limit = match self.focused_edge(top_row, focused) {
            Some(edge) => edge.bottom() - bounds.height,
            None => bounds.y,
        };
        let delta = self.config.fit_tolerance;
        self.walk_cells(focused, FocusDirection::Up, predictor, |next| next.y > limit - delta)
    }

    pub fn focus_page_down(&self, focused: u64, predictor: &dyn FocusPredictor) -> Option<u64> {
        let layout = &self.layout;
        let (x, y) = layout.scroll_index();
        let bounds = self.core.actual_bounds();
        let last_row = (y + layout.visible_rows).saturating_sub(1);
        let bottom_row = (x..x + layout.visible_columns).map(|column| (column, last_row));
        let limit = match self.focused_edge(bottom_row, focused) {
            Some(edge) => edge.y + bounds.height,
            None => bounds.bottom(),
        };
        let delta = self.config.fit_tolerance;
        self.walk_cells(focused, FocusDirection::Down, predictor, |next| next.bottom() < limit + delta)
    }

    pub fn focus_page_left(&self, focused: u64, predictor: &dyn FocusPredictor) -> Option<u64> {
        let layout = &self.layout;
        let (x, y) = layout.scroll_index();
        let bounds = self.core.actual_bounds();
        let left_column = (y..y + layout.visible_rows).map(|row| (x, row));
        let limit = match self.focused_edge(left_column, focused) {
            Some(edge) => edge.right() - bounds.width,
            None => bounds.x,
        };
        let delta = self.config.fit_tolerance;
        self.walk_cells(focused, FocusDirection::Left, predictor, |next| next.x > limit - delta)
    }

    pub fn focus_page_right(&self, focused: u64, predictor: &dyn FocusPredictor) -> Option<u64> {
        let layout = &self.layout;
        let (x, y) = layout.scroll_index();
        let bounds = self.core.actual_bounds();
        let last_column = (x + layout.visible_columns).saturating_sub(1);
        let right_column = (y..y + layout.visible_rows).map(|row| (last_column, row));
        let limit = match self.focused_edge(right_column, focused) {
            Some(edge) => edge.x + bounds.width,
            None => bounds.right(),
        };
        let delta = self.config.fit_tolerance;
        self.walk_cells(focused, FocusDirection::Right, predictor, |next| next.right() < limit + delta)
    }

    /// Moves focus as far up, then as far left, as the children go.
    pub fn focus_home(&self, focused: u64, predictor: &dyn FocusPredictor) -> Option<u64> {
        let top = self.walk_cells(focused, FocusDirection::Up, predictor, |_| true)?;
        self.walk_cells(top, FocusDirection::Left, predictor, |_| true)
    }

    pub fn focus_end(&self, focused: u64, predictor: &dyn FocusPredictor) -> Option<u64> {
        let bottom = self.walk_cells(focused, FocusDirection::Down, predictor, |_| true)?;
        self.walk_cells(bottom, FocusDirection::Right, predictor, |_| true)
    }
}
