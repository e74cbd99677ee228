//! Per-element side table for layout metadata a parent panel reads off its children.

use crate::view::panels::Dock;
use rustc_hash::FxHashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttachedPropertyId {
    CanvasLeft,
    CanvasTop,
    CanvasRight,
    CanvasBottom,
    Dock,
    GridRow,
    GridColumn,
    GridRowSpan,
    GridColumnSpan,
    ZIndex,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AttachedValue {
    Float(f32),
    Int(i32),
    Dock(Dock),
}

pub trait AttachedType: Copy {
    fn into_value(self) -> AttachedValue;
    fn from_value(value: AttachedValue) -> Option<Self>;
}

impl AttachedType for f32 {
    fn into_value(self) -> AttachedValue {
        AttachedValue::Float(self)
    }

    fn from_value(value: AttachedValue) -> Option<Self> {
        match value {
            AttachedValue::Float(v) => Some(v),
            _ => None,
        }
    }
}

impl AttachedType for i32 {
    fn into_value(self) -> AttachedValue {
        AttachedValue::Int(self)
    }

    fn from_value(value: AttachedValue) -> Option<Self> {
        match value {
            AttachedValue::Int(v) => Some(v),
            _ => None,
        }
    }
}

impl AttachedType for Dock {
    fn into_value(self) -> AttachedValue {
        AttachedValue::Dock(self)
    }

    fn from_value(value: AttachedValue) -> Option<Self> {
        match value {
            AttachedValue::Dock(v) => Some(v),
            _ => None,
        }
    }
}

/// Typed handle for one attached property.
///
/// `default` is what a read returns when nothing is stored; `seed` is what
/// `get_or_create` stores on first access.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttachedKey<T> {
    pub id: AttachedPropertyId,
    pub default: T,
    pub seed: T,
}

impl<T: Copy> AttachedKey<T> {
    pub const fn new(id: AttachedPropertyId, default: T) -> Self {
        Self {
            id,
            default,
            seed: default,
        }
    }

    pub const fn with_seed(id: AttachedPropertyId, default: T, seed: T) -> Self {
        Self { id, default, seed }
    }
}

pub const CANVAS_LEFT: AttachedKey<f32> = AttachedKey::new(AttachedPropertyId::CanvasLeft, 0.0);
pub const CANVAS_TOP: AttachedKey<f32> = AttachedKey::new(AttachedPropertyId::CanvasTop, 0.0);
pub const CANVAS_RIGHT: AttachedKey<f32> = AttachedKey::new(AttachedPropertyId::CanvasRight, 0.0);
pub const CANVAS_BOTTOM: AttachedKey<f32> =
    AttachedKey::new(AttachedPropertyId::CanvasBottom, 0.0);
pub const DOCK: AttachedKey<Dock> = AttachedKey::new(AttachedPropertyId::Dock, Dock::Center);
pub const GRID_ROW: AttachedKey<i32> = AttachedKey::new(AttachedPropertyId::GridRow, 0);
pub const GRID_COLUMN: AttachedKey<i32> = AttachedKey::new(AttachedPropertyId::GridColumn, 0);
pub const GRID_ROW_SPAN: AttachedKey<i32> = AttachedKey::new(AttachedPropertyId::GridRowSpan, 1);
pub const GRID_COLUMN_SPAN: AttachedKey<i32> =
    AttachedKey::new(AttachedPropertyId::GridColumnSpan, 1);
pub const Z_INDEX: AttachedKey<f32> =
    AttachedKey::with_seed(AttachedPropertyId::ZIndex, 0.0, -1.0);

#[derive(Debug, Default, Clone)]
pub struct AttachedPropertyStore {
    values: FxHashMap<AttachedPropertyId, AttachedValue>,
    changed: bool,
}

impl AttachedPropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<T: AttachedType>(&self, key: AttachedKey<T>) -> T {
        self.values
            .get(&key.id)
            .and_then(|value| T::from_value(*value))
            .unwrap_or(key.default)
    }

    pub fn set<T: AttachedType>(&mut self, key: AttachedKey<T>, value: T) {
        let value = value.into_value();
        if self.values.insert(key.id, value) != Some(value) {
            self.changed = true;
        }
    }

    pub fn get_or_create<T: AttachedType>(&mut self, key: AttachedKey<T>) -> T {
        if let Some(value) = self.values.get(&key.id).and_then(|v| T::from_value(*v)) {
            return value;
        }
        self.values.insert(key.id, key.seed.into_value());
        self.changed = true;
        key.seed
    }

    pub fn contains<T>(&self, key: AttachedKey<T>) -> bool {
        self.values.contains_key(&key.id)
    }

    pub fn remove<T>(&mut self, key: AttachedKey<T>) -> bool {
        let removed = self.values.remove(&key.id).is_some();
        self.changed |= removed;
        removed
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }
}

#[cfg(test)]
mod tests {
    use super::{AttachedPropertyStore, CANVAS_LEFT, DOCK, GRID_ROW_SPAN, Z_INDEX};
    use crate::view::panels::Dock;

    #[test]
    fn absent_properties_read_their_default() {
        let store = AttachedPropertyStore::new();
        assert_eq!(store.get(GRID_ROW_SPAN), 1);
        assert_eq!(store.get(Z_INDEX), 0.0);
        assert_eq!(store.get(DOCK), Dock::Center);
        assert!(store.is_empty());
    }

    #[test]
    fn get_or_create_seeds_z_index_with_minus_one() {
        let mut store = AttachedPropertyStore::new();
        assert_eq!(store.get_or_create(Z_INDEX), -1.0);
        assert!(store.contains(Z_INDEX));
        assert_eq!(store.get(Z_INDEX), -1.0);
    }

    #[test]
    fn set_reports_change_only_when_value_differs() {
        let mut store = AttachedPropertyStore::new();
        store.set(CANVAS_LEFT, 12.0);
        assert!(store.take_changed());
        store.set(CANVAS_LEFT, 12.0);
        assert!(!store.take_changed());
        assert_eq!(store.get(CANVAS_LEFT), 12.0);
    }
}
