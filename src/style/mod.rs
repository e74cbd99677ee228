mod background;
mod color;
mod layout_state;

pub use background::*;
pub use color::*;
pub use layout_state::*;
