use thiserror::Error;

/// Errors raised at the configuration and skin-value boundary.
///
/// Measure and arrange never produce these; malformed layout input is clamped instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("zoom factor must be finite and positive, got {0}")]
    InvalidZoom(f32),
    #[error("fit tolerance must be finite and non-negative, got {0}")]
    InvalidTolerance(f32),
    #[error("cannot parse {var}={value:?}")]
    InvalidEnv { var: &'static str, value: String },
    #[error("invalid color literal {0:?}")]
    InvalidColor(String),
}

pub type Result<T, E = LayoutError> = std::result::Result<T, E>;
