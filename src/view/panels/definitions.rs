//! Row/column sizing for `Grid`.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GridUnit {
    Auto,
    Pixel,
    Star,
}

/// Sizing mode plus raw value of one row or column, and the length resolved for it
/// in the current layout pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLength {
    unit: GridUnit,
    value: f32,
    length: f32,
}

impl GridLength {
    pub const fn new(unit: GridUnit, value: f32) -> Self {
        Self {
            unit,
            value,
            length: 0.0,
        }
    }

    pub const fn auto() -> Self {
        Self::new(GridUnit::Auto, 0.0)
    }

    pub const fn pixel(value: f32) -> Self {
        Self::new(GridUnit::Pixel, value)
    }

    pub const fn star(weight: f32) -> Self {
        Self::new(GridUnit::Star, weight)
    }

    pub fn unit(&self) -> GridUnit {
        self.unit
    }

    pub fn is_absolute(&self) -> bool {
        self.unit == GridUnit::Pixel
    }

    pub fn is_auto(&self) -> bool {
        self.unit == GridUnit::Auto
    }

    pub fn is_star(&self) -> bool {
        self.unit == GridUnit::Star
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn set_length(&mut self, length: f32) {
        self.length = length;
    }
}

impl Default for GridLength {
    fn default() -> Self {
        Self::star(1.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Definition {
    pub grid_length: GridLength,
    // Length reached during measure; arrange redistributes starting from here.
    measured: f32,
}

impl Definition {
    pub const fn new(grid_length: GridLength) -> Self {
        Self {
            grid_length,
            measured: 0.0,
        }
    }

    pub fn length(&self) -> f32 {
        self.grid_length.length()
    }
}

impl From<GridLength> for Definition {
    fn from(grid_length: GridLength) -> Self {
        Self::new(grid_length)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DefinitionsCollection {
    definitions: Vec<Definition>,
}

pub type RowDefinitions = DefinitionsCollection;
pub type ColumnDefinitions = DefinitionsCollection;

impl DefinitionsCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lengths(lengths: impl IntoIterator<Item = GridLength>) -> Self {
        Self {
            definitions: lengths.into_iter().map(Definition::new).collect(),
        }
    }

    pub fn push(&mut self, grid_length: GridLength) {
        self.definitions.push(Definition::new(grid_length));
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Definition> {
        self.definitions.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Definition> {
        self.definitions.get(index)
    }

    pub(crate) fn ensure_default(&mut self) {
        if self.definitions.is_empty() {
            self.push(GridLength::default());
        }
    }

    /// Clamps `(cell_index, cell_span)` so the span lies inside the collection.
    pub fn clamp_span(&self, cell_index: i32, cell_span: i32) -> (usize, usize) {
        let count = self.definitions.len();
        if count == 0 {
            return (0, 0);
        }
        let index = (cell_index.max(0) as usize).min(count - 1);
        let span = (cell_span.max(1) as usize).min(count - index);
        (index, span)
    }

    pub fn reset_all_cell_lengths(&mut self, zoom: f32) {
        for definition in &mut self.definitions {
            let length = if definition.grid_length.is_absolute() {
                definition.grid_length.value() * zoom
            } else {
                0.0
            };
            definition.grid_length.set_length(length);
            definition.measured = length;
        }
    }

    /// Grows the Auto/Star definitions in the span so together with the span's Pixel
    /// definitions they cover `desired_length`. Never shrinks a definition.
    pub fn set_desired_length(&mut self, cell_index: usize, cell_span: usize, desired_length: f32) {
        if desired_length.is_nan() {
            return;
        }
        debug_assert!(
            cell_index + cell_span <= self.definitions.len(),
            "span {cell_index}+{cell_span} outside {} definitions",
            self.definitions.len()
        );
        let range = self.span_range(cell_index, cell_span);
        let span = &mut self.definitions[range];

        let mut claimed = 0.0;
        let mut relative_count = 0usize;
        for definition in span.iter() {
            if definition.grid_length.is_absolute() {
                claimed += definition.length();
            } else {
                relative_count += 1;
            }
        }
        if relative_count == 0 {
            return;
        }
        let remaining = desired_length - claimed;
        if remaining <= 0.0 {
            return;
        }
        let share = remaining / relative_count as f32;
        for definition in span.iter_mut() {
            if !definition.grid_length.is_absolute() && definition.length() < share {
                definition.grid_length.set_length(share);
                definition.measured = share;
            }
        }
    }

    pub fn total_desired_length(&self) -> f32 {
        self.definitions.iter().map(Definition::length).sum()
    }

    /// Resolves final lengths for `total_length`: Pixel and Auto keep their measured
    /// length (the last one shrinks on overflow), Star splits what is left by weight.
    pub fn set_available_size(&mut self, total_length: f32) {
        if total_length.is_nan() {
            return;
        }
        let mut fixed = 0.0;
        let mut star_weight = 0.0;
        for definition in &mut self.definitions {
            if definition.grid_length.is_star() {
                star_weight += definition.grid_length.value();
                continue;
            }
            let mut length = definition.measured;
            fixed += length;
            if fixed > total_length {
                length = (length - (fixed - total_length)).max(0.0);
                fixed = total_length;
            }
            definition.grid_length.set_length(length);
        }

        let remaining = (total_length - fixed).max(0.0);
        for definition in &mut self.definitions {
            if !definition.grid_length.is_star() {
                continue;
            }
            let length = if star_weight > 0.0 {
                (remaining * definition.grid_length.value() / star_weight).max(0.0)
            } else {
                0.0
            };
            definition.grid_length.set_length(length);
        }
        debug_assert!(self.definitions.iter().all(|d| !(d.length() < 0.0)));
    }

    pub fn get_length(&self, cell_index: usize, cell_span: usize) -> f32 {
        self.definitions[self.span_range(cell_index, cell_span)]
            .iter()
            .map(Definition::length)
            .sum()
    }

    pub fn get_offset(&self, cell_index: usize) -> f32 {
        let end = cell_index.min(self.definitions.len());
        self.definitions[..end].iter().map(Definition::length).sum()
    }

    fn span_range(&self, cell_index: usize, cell_span: usize) -> std::ops::Range<usize> {
        let start = cell_index.min(self.definitions.len());
        let end = cell_index.saturating_add(cell_span).min(self.definitions.len());
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::{DefinitionsCollection, GridLength};

    #[test]
    fn star_columns_split_space_by_weight() {
        let mut columns = DefinitionsCollection::from_lengths([
            GridLength::star(1.0),
            GridLength::star(2.0),
            GridLength::star(1.0),
        ]);
        columns.reset_all_cell_lengths(1.0);
        columns.set_available_size(400.0);
        assert_eq!(columns.get_length(0, 1), 100.0);
        assert_eq!(columns.get_length(1, 1), 200.0);
        assert_eq!(columns.get_length(2, 1), 100.0);
    }

    #[test]
    fn pixel_lengths_scale_with_zoom_and_ignore_children() {
        let mut rows = DefinitionsCollection::from_lengths([GridLength::pixel(20.0), GridLength::auto()]);
        rows.reset_all_cell_lengths(1.5);
        rows.set_desired_length(0, 1, 500.0);
        assert_eq!(rows.get_length(0, 1), 30.0);
        assert_eq!(rows.total_desired_length(), 30.0);
    }

    #[test]
    fn desired_length_grows_but_never_shrinks() {
        let mut columns = DefinitionsCollection::from_lengths([GridLength::auto()]);
        columns.reset_all_cell_lengths(1.0);
        columns.set_desired_length(0, 1, 80.0);
        columns.set_desired_length(0, 1, 30.0);
        columns.set_desired_length(0, 1, f32::NAN);
        assert_eq!(columns.get_length(0, 1), 80.0);
    }

    #[test]
    fn spanning_child_discounts_pixel_cells() {
        let mut columns = DefinitionsCollection::from_lengths([
            GridLength::pixel(40.0),
            GridLength::auto(),
            GridLength::auto(),
        ]);
        columns.reset_all_cell_lengths(1.0);
        columns.set_desired_length(0, 3, 100.0);
        assert_eq!(columns.get_length(1, 1), 30.0);
        assert_eq!(columns.get_length(2, 1), 30.0);
    }

    #[test]
    fn span_without_relative_definitions_is_ignored() {
        let mut columns = DefinitionsCollection::from_lengths([GridLength::pixel(10.0), GridLength::pixel(10.0)]);
        columns.reset_all_cell_lengths(1.0);
        columns.set_desired_length(0, 2, 100.0);
        assert_eq!(columns.total_desired_length(), 20.0);
    }

    #[test]
    fn last_fixed_definition_absorbs_overflow() {
        let mut columns = DefinitionsCollection::from_lengths([
            GridLength::pixel(60.0),
            GridLength::pixel(60.0),
            GridLength::star(1.0),
        ]);
        columns.reset_all_cell_lengths(1.0);
        columns.set_available_size(100.0);
        assert_eq!(columns.get_length(0, 1), 60.0);
        assert_eq!(columns.get_length(1, 1), 40.0);
        assert_eq!(columns.get_length(2, 1), 0.0);
    }

    #[test]
    fn available_size_can_be_applied_repeatedly() {
        let mut columns = DefinitionsCollection::from_lengths([GridLength::auto(), GridLength::star(1.0)]);
        columns.reset_all_cell_lengths(1.0);
        columns.set_desired_length(0, 1, 50.0);
        columns.set_available_size(30.0);
        assert_eq!(columns.get_length(0, 1), 30.0);
        columns.set_available_size(300.0);
        assert_eq!(columns.get_length(0, 1), 50.0);
        assert_eq!(columns.get_length(1, 1), 250.0);
    }

    #[test]
    fn offsets_and_lengths_are_consistent() {
        let mut rows = DefinitionsCollection::from_lengths([
            GridLength::pixel(15.0),
            GridLength::auto(),
            GridLength::star(2.0),
            GridLength::star(1.0),
        ]);
        rows.reset_all_cell_lengths(1.0);
        rows.set_desired_length(1, 1, 25.0);
        rows.set_available_size(340.0);
        for index in 0..rows.len() {
            for span in 1..=rows.len() - index {
                let end = rows.get_offset(index) + rows.get_length(index, span);
                assert!((end - rows.get_offset(index + span)).abs() < 1e-3);
            }
        }
        assert_eq!(rows.get_offset(rows.len()), 340.0);
    }

    #[test]
    fn clamp_span_keeps_indices_in_range() {
        let rows = DefinitionsCollection::from_lengths([GridLength::auto(), GridLength::auto()]);
        assert_eq!(rows.clamp_span(5, 3), (1, 1));
        assert_eq!(rows.clamp_span(-2, 0), (0, 1));
        assert_eq!(rows.clamp_span(0, 9), (0, 2));
    }
}
