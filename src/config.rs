use crate::error::{LayoutError, Result};
use serde::{Deserialize, Serialize};

pub const ENV_ZOOM: &str = "MPF_LAYOUT_ZOOM";
pub const ENV_FIT_TOLERANCE: &str = "MPF_LAYOUT_FIT_TOLERANCE";
pub const ENV_TRACE: &str = "MPF_LAYOUT_TRACE";

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Skin-to-screen scale applied to pixel lengths, margins and canvas offsets.
    pub zoom_x: f32,
    pub zoom_y: f32,
    /// Overhang in pixels still counted as "inside" by scroll visibility checks.
    pub fit_tolerance: f32,
    /// Back-to-front occlusion scan in `Panel::is_child_visible_at`.
    pub occlusion_hit_test: bool,
    /// Emit per-element measure/arrange events at debug level.
    pub trace_layout: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            zoom_x: 1.0,
            zoom_y: 1.0,
            fit_tolerance: 0.5,
            occlusion_hit_test: false,
            trace_layout: false,
        }
    }
}

impl LayoutConfig {
    pub fn with_zoom(mut self, zoom_x: f32, zoom_y: f32) -> Self {
        self.zoom_x = zoom_x;
        self.zoom_y = zoom_y;
        self
    }

    pub fn with_occlusion_hit_test(mut self, enabled: bool) -> Self {
        self.occlusion_hit_test = enabled;
        self
    }

    pub fn validate(&self) -> Result<()> {
        for zoom in [self.zoom_x, self.zoom_y] {
            if !zoom.is_finite() || zoom <= 0.0 {
                return Err(LayoutError::InvalidZoom(zoom));
            }
        }
        if !self.fit_tolerance.is_finite() || self.fit_tolerance < 0.0 {
            return Err(LayoutError::InvalidTolerance(self.fit_tolerance));
        }
        Ok(())
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(raw) = lookup(ENV_ZOOM) {
            let (zoom_x, zoom_y) = parse_zoom(&raw).ok_or_else(|| LayoutError::InvalidEnv {
                var: ENV_ZOOM,
                value: raw.clone(),
            })?;
            config.zoom_x = zoom_x;
            config.zoom_y = zoom_y;
        }
        if let Some(raw) = lookup(ENV_FIT_TOLERANCE) {
            config.fit_tolerance = raw.trim().parse().map_err(|_| LayoutError::InvalidEnv {
                var: ENV_FIT_TOLERANCE,
                value: raw.clone(),
            })?;
        }
        if let Some(raw) = lookup(ENV_TRACE) {
            config.trace_layout = !matches!(raw.trim(), "" | "0" | "false");
        }
        config.validate()?;
        tracing::debug!(?config, "layout config loaded");
        Ok(config)
    }
}

fn parse_zoom(raw: &str) -> Option<(f32, f32)> {
    let raw = raw.trim();
    match raw.split_once(['x', 'X']) {
        Some((x, y)) => Some((x.trim().parse().ok()?, y.trim().parse().ok()?)),
        None => {
            let uniform = raw.parse().ok()?;
            Some((uniform, uniform))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ENV_TRACE, ENV_ZOOM, LayoutConfig};
    use crate::error::LayoutError;

    #[test]
    fn defaults_are_identity_zoom() {
        let config = LayoutConfig::default();
        assert_eq!(config.zoom_x, 1.0);
        assert_eq!(config.zoom_y, 1.0);
        assert_eq!(config.fit_tolerance, 0.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn env_zoom_accepts_uniform_and_per_axis() {
        let uniform = LayoutConfig::from_lookup(|var| (var == ENV_ZOOM).then(|| "1.5".to_string()))
            .expect("uniform zoom parses");
        assert_eq!((uniform.zoom_x, uniform.zoom_y), (1.5, 1.5));

        let per_axis =
            LayoutConfig::from_lookup(|var| (var == ENV_ZOOM).then(|| "2x1.25".to_string()))
                .expect("per-axis zoom parses");
        assert_eq!((per_axis.zoom_x, per_axis.zoom_y), (2.0, 1.25));
    }

    #[test]
    fn env_rejects_garbage_and_non_positive_zoom() {
        let garbage = LayoutConfig::from_lookup(|var| (var == ENV_ZOOM).then(|| "big".to_string()));
        assert!(matches!(garbage, Err(LayoutError::InvalidEnv { .. })));

        let zero = LayoutConfig::from_lookup(|var| (var == ENV_ZOOM).then(|| "0".to_string()));
        assert_eq!(zero, Err(LayoutError::InvalidZoom(0.0)));
    }

    #[test]
    fn env_trace_flag() {
        let config = LayoutConfig::from_lookup(|var| (var == ENV_TRACE).then(|| "1".to_string()))
            .expect("trace flag parses");
        assert!(config.trace_layout);
    }

    #[test]
    fn deserializes_partial_json_with_defaults() {
        let config: LayoutConfig =
            serde_json::from_str(r#"{ "zoom_x": 1.5, "occlusion_hit_test": true }"#)
                .expect("valid config json");
        assert_eq!(config.zoom_x, 1.5);
        assert_eq!(config.zoom_y, 1.0);
        assert!(config.occlusion_hit_test);
    }
}
