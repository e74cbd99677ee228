pub mod attached;
pub mod base_component;
pub mod focus;
pub mod panels;
pub mod render_pass;

pub use attached::*;
pub use base_component::*;
pub use focus::*;
pub use panels::*;
