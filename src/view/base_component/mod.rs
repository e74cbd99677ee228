use crate::geometry::Rect;
use crate::style::LayoutStateTree;
use std::sync::atomic::{AtomicU64, Ordering};

mod core;
mod element;

pub use self::core::*;
pub use element::*;

fn next_ui_node_id() -> u64 {
    static NEXT_ID: AtomicU64 = AtomicU64::new(1);
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// One layout frame: drain invalidations, measure and arrange against `viewport`,
/// then run every element's per-frame update.
pub fn update_frame(root: &mut dyn ElementTrait, viewport: Rect, ctx: &LayoutContext) {
    let changes = root.propagate_invalidation();
    if !changes.is_empty() {
        tracing::debug!(root = root.id(), ?changes, "frame invalidated");
    }
    root.measure(viewport.size(), ctx);
    root.arrange(viewport, ctx);

    fn update_tree(node: &mut dyn ElementTrait) {
        node.update();
        if let Some(children) = node.children_mut() {
            for child in children.iter_mut() {
                update_tree(child.as_mut());
            }
        }
    }
    update_tree(root);
}

pub fn collect_layout_states(root: &dyn ElementTrait) -> LayoutStateTree {
    fn walk(node: &dyn ElementTrait, out: &mut LayoutStateTree) {
        out.insert(node.layout_state());
        if let Some(children) = node.children() {
            for child in children {
                walk(child.as_ref(), out);
            }
        }
    }

    let mut out = LayoutStateTree::new();
    walk(root, &mut out);
    out
}

pub fn hit_test(root: &dyn ElementTrait, x: f32, y: f32) -> Option<u64> {
    fn find(node: &dyn ElementTrait, x: f32, y: f32) -> Option<u64> {
        if !node.is_visible() || !node.actual_bounds().contains(x, y) {
            return None;
        }

        if let Some(children) = node.children() {
            for child_id in node.children_front_to_back() {
                if !node.is_child_rendered_at(child_id, x, y) {
                    continue;
                }
                let Some(child) = children.iter().find(|child| child.id() == child_id) else {
                    continue;
                };
                if let Some(id) = find(child.as_ref(), x, y) {
                    return Some(id);
                }
            }
        }

        Some(node.id())
    }

    find(root, x, y)
}

pub fn find_element(root: &dyn ElementTrait, id: u64) -> Option<&dyn ElementTrait> {
    if root.id() == id {
        return Some(root);
    }
    root.children()?
        .iter()
        .find_map(|child| find_element(child.as_ref(), id))
}

/// True when `id` is `root` itself or one of its descendants.
pub fn contains_element(root: &dyn ElementTrait, id: u64) -> bool {
    find_element(root, id).is_some()
}
