use crate::geometry::{Rect, Size};
use rustc_hash::FxHashMap;

/// Arrange output of one element as seen by the render layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutState {
    pub node_id: u64,
    pub parent_id: Option<u64>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub desired_width: f32,
    pub desired_height: f32,
    pub visible: bool,
}

impl LayoutState {
    pub fn new(node_id: u64, parent_id: Option<u64>, bounds: Rect, desired: Size, visible: bool) -> Self {
        Self {
            node_id,
            parent_id,
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            desired_width: desired.width,
            desired_height: desired.height,
            visible,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.visible && self.bounds().contains(x, y)
    }
}

#[derive(Debug, Default)]
pub struct LayoutStateTree {
    states: FxHashMap<u64, LayoutState>,
}

impl LayoutStateTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, state: LayoutState) {
        self.states.insert(state.node_id, state);
    }

    pub fn get(&self, node_id: u64) -> Option<&LayoutState> {
        self.states.get(&node_id)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&u64, &LayoutState)> {
        self.states.iter()
    }

    pub fn children_of(&self, parent_id: u64) -> impl Iterator<Item = &LayoutState> {
        self.states
            .values()
            .filter(move |state| state.parent_id == Some(parent_id))
    }
}
