use super::{
    LayoutStrategy, Orientation, Panel, arrange_child_horizontal, arrange_child_vertical,
    desired_or_zero,
};
use crate::geometry::{Point, Rect, Size};
use crate::view::base_component::{ElementTrait, LayoutContext};

pub type WrapPanel = Panel<WrapLayout>;

/// One line (Horizontal) or column (Vertical) of a wrap layout, as a half-open range of
/// visible-child indices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WrapLine {
    pub start: usize,
    pub end: usize,
    /// Summed extent along the wrap direction.
    pub primary: f32,
    /// Largest child extent across the wrap direction.
    pub thickness: f32,
}

impl WrapLine {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Greedy line breaking over `(primary, cross)` extents. A NaN `limit` never breaks.
fn break_lines(extents: &[(f32, f32)], limit: f32) -> Vec<WrapLine> {
    let mut lines = Vec::new();
    let mut current = WrapLine {
        start: 0,
        end: 0,
        primary: 0.0,
        thickness: 0.0,
    };
    for (index, (primary, cross)) in extents.iter().copied().enumerate() {
        if !current.is_empty() && current.primary + primary > limit {
            lines.push(current);
            current = WrapLine {
                start: index,
                end: index,
                primary: 0.0,
                thickness: 0.0,
            };
        }
        current.end = index + 1;
        current.primary += primary;
        current.thickness = current.thickness.max(cross);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[derive(Debug, Default)]
pub struct WrapLayout {
    orientation: Orientation,
    measured_lines: Vec<WrapLine>,
    measured_ids: Vec<u64>,
    arranged_lines: Vec<WrapLine>,
}

impl WrapLayout {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            ..Self::default()
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    pub fn measured_lines(&self) -> &[WrapLine] {
        &self.measured_lines
    }

    pub fn arranged_lines(&self) -> &[WrapLine] {
        &self.arranged_lines
    }

    fn extents(&self, children: &[&mut Box<dyn ElementTrait>]) -> Vec<(f32, f32)> {
        children
            .iter()
            .map(|child| {
                let desired = child.desired_size();
                (
                    desired_or_zero(self.orientation.along(desired)),
                    desired_or_zero(self.orientation.across(desired)),
                )
            })
            .collect()
    }
}

impl LayoutStrategy for WrapLayout {
    fn kind(&self) -> &'static str {
        "WrapPanel"
    }

    fn calculate_desired_size(
        &mut self,
        children: &mut [Box<dyn ElementTrait>],
        available: Size,
        ctx: &LayoutContext,
    ) -> Size {
        let mut visible: Vec<&mut Box<dyn ElementTrait>> =
            children.iter_mut().filter(|child| child.is_visible()).collect();
        for child in visible.iter_mut() {
            child.measure(available, ctx);
        }
        let extents = self.extents(&visible);
        let lines = break_lines(&extents, self.orientation.along(available));

        let along = lines.iter().fold(0.0_f32, |acc, line| acc.max(line.primary));
        let across: f32 = lines.iter().map(|line| line.thickness).sum();
        self.measured_ids = visible.iter().map(|child| child.id()).collect();
        self.measured_lines = lines;
        match self.orientation {
            Orientation::Horizontal => Size::new(along, across),
            Orientation::Vertical => Size::new(across, along),
        }
    }

    fn arrange_children(
        &mut self,
        children: &mut [Box<dyn ElementTrait>],
        inner: Rect,
        ctx: &LayoutContext,
    ) {
        let mut visible: Vec<&mut Box<dyn ElementTrait>> =
            children.iter_mut().filter(|child| child.is_visible()).collect();
        let extents = self.extents(&visible);
        let unchanged = visible.len() == self.measured_ids.len()
            && visible.iter().zip(&self.measured_ids).all(|(child, id)| child.id() == *id);
        let lines = if unchanged {
            self.measured_lines.clone()
        } else {
            tracing::debug!(
                measured = self.measured_ids.len(),
                visible = visible.len(),
                "wrap panel children changed since measure, re-deriving lines"
            );
            break_lines(&extents, self.orientation.along(inner.size()))
        };

        let mut line_offset = 0.0;
        for line in &lines {
            let mut offset = 0.0;
            for index in line.start..line.end {
                let (primary, _) = extents[index];
                let child: &mut Box<dyn ElementTrait> = &mut visible[index];
                match self.orientation {
                    Orientation::Horizontal => {
                        let mut location = Point::new(inner.x + offset, inner.y + line_offset);
                        let mut size = Size::new(primary, line.thickness);
                        let alignment = child.core().vertical_alignment();
                        arrange_child_vertical(child.as_ref(), alignment, &mut location, &mut size);
                        child.arrange(Rect::from_origin_size(location, size), ctx);
                    }
                    Orientation::Vertical => {
                        let mut location = Point::new(inner.x + line_offset, inner.y + offset);
                        let mut size = Size::new(line.thickness, primary);
                        let alignment = child.core().horizontal_alignment();
                        arrange_child_horizontal(child.as_ref(), alignment, &mut location, &mut size);
                        child.arrange(Rect::from_origin_size(location, size), ctx);
                    }
                }
                offset += primary;
            }
            line_offset += line.thickness;
        }
        self.arranged_lines = lines;
    }
}

#[cfg(test)]
mod tests {
    use super::{WrapLayout, WrapPanel, break_lines};
    use crate::geometry::{Rect, Size};
    use crate::view::base_component::{Element, ElementTrait, LayoutContext, Layoutable, update_frame};
    use crate::view::panels::Orientation;

    fn panel_with(orientation: Orientation, sizes: &[(f32, f32)]) -> (WrapPanel, Vec<u64>) {
        let mut panel = WrapPanel::new(WrapLayout::new(orientation));
        let ids = sizes
            .iter()
            .map(|(w, h)| {
                let child = Element::new(*w, *h);
                let id = child.id();
                panel.add_child(Box::new(child));
                id
            })
            .collect();
        (panel, ids)
    }

    #[test]
    fn break_lines_starts_new_line_on_overflow() {
        let lines = break_lines(&[(40.0, 10.0), (40.0, 20.0), (40.0, 5.0)], 100.0);
        assert_eq!(lines.len(), 2);
        assert_eq!((lines[0].start, lines[0].end, lines[0].thickness), (0, 2, 20.0));
        assert_eq!((lines[1].start, lines[1].end, lines[1].thickness), (2, 3, 5.0));
        assert_eq!(break_lines(&[(40.0, 10.0); 5], f32::NAN).len(), 1);
    }

    #[test]
    fn oversized_child_gets_its_own_line() {
        let lines = break_lines(&[(150.0, 10.0), (10.0, 10.0)], 100.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 1);
    }

    #[test]
    fn horizontal_wrap_measures_lines_and_places_children() {
        let (mut panel, ids) =
            panel_with(Orientation::Horizontal, &[(40.0, 10.0), (40.0, 20.0), (40.0, 5.0)]);
        let ctx = LayoutContext::default();
        let desired = panel.measure(Size::new(100.0, 200.0), &ctx);
        assert_eq!(desired, Size::new(80.0, 25.0));

        panel.arrange(Rect::new(0.0, 0.0, 100.0, 200.0), &ctx);
        let third = panel.child(ids[2]).map(|c| c.actual_bounds());
        assert_eq!(third, Some(Rect::new(0.0, 20.0, 40.0, 5.0)));
        let first = panel.child(ids[0]).map(|c| c.actual_bounds());
        assert_eq!(first, Some(Rect::new(0.0, 0.0, 40.0, 20.0)));
    }

    #[test]
    fn arrange_reuses_measured_lines() {
        let (mut panel, _) = panel_with(
            Orientation::Horizontal,
            &[(30.0, 10.0), (50.0, 12.0), (25.0, 8.0), (60.0, 4.0), (10.0, 9.0)],
        );
        update_frame(&mut panel, Rect::new(0.0, 0.0, 90.0, 300.0), &LayoutContext::default());
        let layout = panel.layout();
        assert_eq!(layout.measured_lines(), layout.arranged_lines());
        assert_eq!(layout.arranged_lines().len(), 3);
    }

    #[test]
    fn visibility_change_before_arrange_rederives_lines() {
        let (mut panel, ids) =
            panel_with(Orientation::Horizontal, &[(60.0, 10.0), (60.0, 10.0), (60.0, 10.0)]);
        let ctx = LayoutContext::default();
        panel.measure(Size::new(100.0, 100.0), &ctx);
        assert_eq!(panel.layout().measured_lines().len(), 3);

        if let Some(child) = panel.child_mut(ids[1]) {
            child.core_mut().set_visible(false);
        }
        panel.arrange(Rect::new(0.0, 0.0, 100.0, 100.0), &ctx);
        assert_eq!(panel.layout().arranged_lines().len(), 2);
        let last = panel.child(ids[2]).map(|c| c.actual_bounds());
        assert_eq!(last, Some(Rect::new(0.0, 10.0, 60.0, 10.0)));
    }

    #[test]
    fn vertical_wrap_fills_columns() {
        let (mut panel, ids) =
            panel_with(Orientation::Vertical, &[(10.0, 30.0), (15.0, 30.0), (5.0, 30.0)]);
        let ctx = LayoutContext::default();
        let desired = panel.measure(Size::new(100.0, 70.0), &ctx);
        assert_eq!(desired, Size::new(20.0, 60.0));
        panel.arrange(Rect::new(0.0, 0.0, 100.0, 70.0), &ctx);
        let third = panel.child(ids[2]).map(|c| c.actual_bounds());
        assert_eq!(third, Some(Rect::new(15.0, 0.0, 5.0, 30.0)));
    }
}
