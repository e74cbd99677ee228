use super::{LayoutStrategy, Panel, arrange_in_slot};
use super::definitions::{ColumnDefinitions, GridLength, RowDefinitions};
use crate::geometry::{Rect, Size};
use crate::view::attached::{GRID_COLUMN, GRID_COLUMN_SPAN, GRID_ROW, GRID_ROW_SPAN};
use crate::view::base_component::{ElementCore, ElementTrait, LayoutContext};

pub type Grid = Panel<GridLayout>;

#[derive(Clone, Debug, Default)]
pub struct GridLayout {
    pub row_definitions: RowDefinitions,
    pub column_definitions: ColumnDefinitions,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Cell {
    column: usize,
    column_span: usize,
    row: usize,
    row_span: usize,
}

impl GridLayout {
    pub fn new(
        columns: impl IntoIterator<Item = GridLength>,
        rows: impl IntoIterator<Item = GridLength>,
    ) -> Self {
        Self {
            row_definitions: RowDefinitions::from_lengths(rows),
            column_definitions: ColumnDefinitions::from_lengths(columns),
        }
    }

    fn cell_of(&self, core: &ElementCore) -> Cell {
        let (column, column_span) = self
            .column_definitions
            .clamp_span(core.attached_value(GRID_COLUMN), core.attached_value(GRID_COLUMN_SPAN));
        let (row, row_span) = self
            .row_definitions
            .clamp_span(core.attached_value(GRID_ROW), core.attached_value(GRID_ROW_SPAN));
        Cell {
            column,
            column_span,
            row,
            row_span,
        }
    }
}

impl LayoutStrategy for GridLayout {
    fn kind(&self) -> &'static str {
        "Grid"
    }

    fn calculate_desired_size(
        &mut self,
        children: &mut [Box<dyn ElementTrait>],
        available: Size,
        ctx: &LayoutContext,
    ) -> Size {
        self.column_definitions.ensure_default();
        self.row_definitions.ensure_default();
        self.column_definitions.reset_all_cell_lengths(ctx.zoom.x);
        self.row_definitions.reset_all_cell_lengths(ctx.zoom.y);

        for child in children.iter_mut().filter(|child| child.is_visible()) {
            let cell = self.cell_of(child.core());
            // Children see the whole grid, not their cell.
            let desired = child.measure(available, ctx);
            self.column_definitions
                .set_desired_length(cell.column, cell.column_span, desired.width);
            self.row_definitions
                .set_desired_length(cell.row, cell.row_span, desired.height);
        }

        Size::new(
            self.column_definitions.total_desired_length(),
            self.row_definitions.total_desired_length(),
        )
    }

    fn arrange_children(
        &mut self,
        children: &mut [Box<dyn ElementTrait>],
        inner: Rect,
        ctx: &LayoutContext,
    ) {
        self.column_definitions.ensure_default();
        self.row_definitions.ensure_default();
        self.column_definitions.set_available_size(inner.width);
        self.row_definitions.set_available_size(inner.height);

        for child in children.iter_mut().filter(|child| child.is_visible()) {
            let cell = self.cell_of(child.core());
            let slot = Rect::new(
                inner.x + self.column_definitions.get_offset(cell.column),
                inner.y + self.row_definitions.get_offset(cell.row),
                self.column_definitions.get_length(cell.column, cell.column_span),
                self.row_definitions.get_length(cell.row, cell.row_span),
            );
            arrange_in_slot(child, slot, ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Grid, GridLayout};
    use crate::geometry::{Rect, Size};
    use crate::view::attached::{GRID_COLUMN, GRID_COLUMN_SPAN, GRID_ROW};
    use crate::view::base_component::{Element, ElementTrait, LayoutContext, Layoutable};
    use crate::view::panels::GridLength;

    fn in_cell(column: i32, row: i32, width: f32, height: f32) -> Box<Element> {
        let mut element = Element::new(width, height);
        element.core_mut().set_attached(GRID_COLUMN, column);
        element.core_mut().set_attached(GRID_ROW, row);
        Box::new(element)
    }

    #[test]
    fn auto_and_star_columns_resolve_against_available_width() {
        let mut grid = Grid::new(GridLayout::new(
            [GridLength::auto(), GridLength::star(1.0)],
            [GridLength::auto()],
        ));
        grid.add_child(in_cell(0, 0, 50.0, 20.0));
        grid.add_child(in_cell(1, 0, 137.0, 10.0));

        let ctx = LayoutContext::default();
        grid.measure(Size::new(300.0, 200.0), &ctx);
        grid.arrange(Rect::new(0.0, 0.0, 300.0, 200.0), &ctx);

        let columns = &grid.layout().column_definitions;
        assert_eq!(columns.get_length(0, 1), 50.0);
        assert_eq!(columns.get_length(1, 1), 250.0);
    }

    #[test]
    fn missing_definitions_become_one_star_cell() {
        let mut grid = Grid::new(GridLayout::default());
        let child = in_cell(3, -1, 40.0, 30.0);
        let child_id = child.id();
        grid.add_child(child);

        let ctx = LayoutContext::default();
        let desired = grid.measure(Size::new(100.0, 100.0), &ctx);
        assert_eq!(desired, Size::new(40.0, 30.0));
        grid.arrange(Rect::new(0.0, 0.0, 100.0, 100.0), &ctx);
        assert_eq!(grid.layout().column_definitions.len(), 1);
        let bounds = grid.child(child_id).map(|c| c.actual_bounds());
        assert_eq!(bounds, Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
    }

    #[test]
    fn out_of_range_cells_are_clamped() {
        let mut grid = Grid::new(GridLayout::new(
            [GridLength::pixel(30.0), GridLength::pixel(70.0)],
            [GridLength::pixel(40.0)],
        ));
        let mut child = in_cell(7, 2, 5.0, 5.0);
        child.core_mut().set_attached(GRID_COLUMN_SPAN, 4);
        let child_id = child.id();
        grid.add_child(child);

        let ctx = LayoutContext::default();
        assert_eq!(grid.measure(Size::new(500.0, 500.0), &ctx), Size::new(100.0, 40.0));
        grid.arrange(Rect::new(10.0, 10.0, 100.0, 40.0), &ctx);
        let bounds = grid.child(child_id).map(|c| c.actual_bounds());
        assert_eq!(bounds, Some(Rect::new(40.0, 10.0, 70.0, 40.0)));
    }

    #[test]
    fn spanning_child_covers_several_cells() {
        let mut grid = Grid::new(GridLayout::new(
            [GridLength::pixel(20.0), GridLength::pixel(30.0), GridLength::star(1.0)],
            [GridLength::star(1.0)],
        ));
        let mut child = in_cell(0, 0, 1.0, 1.0);
        child.core_mut().set_attached(GRID_COLUMN_SPAN, 2);
        let child_id = child.id();
        grid.add_child(child);

        let ctx = LayoutContext::default();
        grid.measure(Size::new(200.0, 50.0), &ctx);
        grid.arrange(Rect::new(0.0, 0.0, 200.0, 50.0), &ctx);
        let bounds = grid.child(child_id).map(|c| c.actual_bounds());
        assert_eq!(bounds, Some(Rect::new(0.0, 0.0, 50.0, 50.0)));
    }
}
