//! Measure/arrange layout core: a family of panels (Canvas, DockPanel, Grid,
//! StackPanel, WrapPanel) that position a tree of elements in two passes and
//! publish render order and background geometry for a separate render thread.

pub mod config;
pub mod error;
pub mod geometry;
pub mod style;
pub mod transform;
pub mod ui;
pub mod view;

pub use config::LayoutConfig;
pub use error::{LayoutError, Result};
pub use geometry::{Point, Rect, Size, Thickness};
pub use style::*;
pub use transform::LayoutTransform;
pub use view::*;
