//! Directional focus prediction used by panel navigation.

use crate::geometry::Rect;
use crate::view::base_component::ElementTrait;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FocusDirection {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FocusCandidate {
    pub id: u64,
    pub bounds: Rect,
}

pub trait FocusPredictor {
    /// Picks the candidate to move to from `current` in `direction`, if any.
    fn find_next(
        &self,
        candidates: &[FocusCandidate],
        current: Rect,
        direction: FocusDirection,
    ) -> Option<u64>;
}

/// Nearest candidate whose center lies strictly beyond the current center in the
/// requested direction; misalignment on the cross axis counts double.
#[derive(Clone, Copy, Debug, Default)]
pub struct NearestFocusPredictor;

impl FocusPredictor for NearestFocusPredictor {
    fn find_next(
        &self,
        candidates: &[FocusCandidate],
        current: Rect,
        direction: FocusDirection,
    ) -> Option<u64> {
        let (cx, cy) = center(current);
        candidates
            .iter()
            .filter_map(|candidate| {
                let (x, y) = center(candidate.bounds);
                let (primary, cross) = match direction {
                    FocusDirection::Up => (cy - y, x - cx),
                    FocusDirection::Down => (y - cy, x - cx),
                    FocusDirection::Left => (cx - x, y - cy),
                    FocusDirection::Right => (x - cx, y - cy),
                };
                (primary > 0.0).then_some((primary + cross.abs() * 2.0, candidate.id))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, id)| id)
    }
}

fn center(rect: Rect) -> (f32, f32) {
    (rect.x + rect.width / 2.0, rect.y + rect.height / 2.0)
}

/// Visible focusable elements of the subtree rooted at `node`, in tree order.
pub fn collect_focus_candidates(node: &dyn ElementTrait, out: &mut Vec<FocusCandidate>) {
    if !node.is_visible() {
        return;
    }
    if node.core().is_focusable() {
        out.push(FocusCandidate {
            id: node.id(),
            bounds: node.actual_bounds(),
        });
    }
    if let Some(children) = node.children() {
        for child in children {
            collect_focus_candidates(child.as_ref(), out);
        }
    }
}

/// Steps focus from `(current_id, current)` in `direction` for as long as `accept`
/// takes the next candidate's bounds. Returns the last accepted id.
pub fn walk_focus(
    candidates: &[FocusCandidate],
    current_id: u64,
    current: Rect,
    direction: FocusDirection,
    predictor: &dyn FocusPredictor,
    accept: impl Fn(Rect) -> bool,
) -> u64 {
    let (mut current_id, mut current) = (current_id, current);
    while let Some(next) = predictor.find_next(candidates, current, direction) {
        let Some(bounds) = candidates.iter().find(|c| c.id == next).map(|c| c.bounds) else {
            break;
        };
        if !accept(bounds) {
            break;
        }
        current = bounds;
        current_id = next;
    }
    current_id
}

#[cfg(test)]
mod tests {
    use super::{FocusCandidate, FocusDirection, FocusPredictor, NearestFocusPredictor, walk_focus};
    use crate::geometry::Rect;

    fn row(index: u64) -> FocusCandidate {
        FocusCandidate {
            id: index,
            bounds: Rect::new(0.0, index as f32 * 20.0, 100.0, 20.0),
        }
    }

    #[test]
    fn picks_adjacent_item_in_direction() {
        let candidates: Vec<_> = (0..5).map(row).collect();
        let current = row(2).bounds;
        let predictor = NearestFocusPredictor;
        assert_eq!(predictor.find_next(&candidates, current, FocusDirection::Down), Some(3));
        assert_eq!(predictor.find_next(&candidates, current, FocusDirection::Up), Some(1));
        assert_eq!(predictor.find_next(&candidates, current, FocusDirection::Left), None);
    }

    #[test]
    fn nothing_beyond_the_edge() {
        let candidates: Vec<_> = (0..3).map(row).collect();
        let predictor = NearestFocusPredictor;
        assert_eq!(predictor.find_next(&candidates, row(2).bounds, FocusDirection::Down), None);
    }

    #[test]
    fn walk_stops_at_first_rejected_candidate() {
        let candidates: Vec<_> = (0..6).map(row).collect();
        let predictor = NearestFocusPredictor;
        let last = walk_focus(&candidates, 0, row(0).bounds, FocusDirection::Down, &predictor, |b| {
            b.y + b.height <= 60.0
        });
        assert_eq!(last, 2);
        let unchanged = walk_focus(&candidates, 0, row(0).bounds, FocusDirection::Up, &predictor, |_| true);
        assert_eq!(unchanged, 0);
    }
}
