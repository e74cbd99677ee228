mod background_pass;

pub use background_pass::{BackgroundGeometry, BackgroundVertex};
