use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{CanvasError, CanvasResult};
use crate::generate::policy::RenderFitPolicy;

/// Tunable thresholds of the canvas engine.
///
/// Every field has a default, so a JSON file only needs to carry the values it overrides.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Viewport and zoom behavior.
    pub viewport: ViewportConfig,
    /// Selection drawing and resolution checks.
    pub selection: SelectionConfig,
    /// Generation orchestration.
    pub generation: GenerationConfig,
}

/// Viewport limits and input sensitivities.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Side length of the square world the initial view is centered on.
    pub world_size: f64,
    /// World width the initial zoom fits onto the screen width.
    pub initial_view_width: f64,
    /// Lower zoom clamp.
    pub min_zoom: f64,
    /// Upper zoom clamp.
    pub max_zoom: f64,
    /// `k` in `factor = exp(-delta_y * k)` for wheel zoom.
    pub wheel_sensitivity: f64,
    /// Wheel deltas with a smaller magnitude are ignored.
    pub wheel_dead_zone: f64,
    /// Padding around content for fit-to-content, in world units.
    pub fit_padding: f64,
    /// Zoom cap for fit-to-content.
    pub fit_max_zoom: f64,
    /// Pointer gestures are ignored at or below this zoom.
    pub gesture_min_zoom: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            world_size: 4000.0,
            initial_view_width: 2500.0,
            min_zoom: 0.05,
            max_zoom: 5.0,
            wheel_sensitivity: 0.001,
            wheel_dead_zone: 0.001,
            fit_padding: 100.0,
            fit_max_zoom: 1.5,
            gesture_min_zoom: 0.001,
        }
    }
}

/// Selection thresholds.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Drawn selections narrower or shorter than this are discarded on release.
    pub min_size: f64,
    /// World distance a selection drag must travel before its axis locks.
    pub axis_lock_threshold: f64,
    /// Ratio tolerance when matching a selection against the resolution table.
    pub ratio_tolerance: f64,
    /// Pixels a selection may exceed the native size before the quality warning.
    pub native_slack_px: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            min_size: 10.0,
            axis_lock_threshold: 5.0,
            ratio_tolerance: 0.02,
            native_slack_px: 2.0,
        }
    }
}

/// Generation orchestration settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Maximum number of reference images held at once.
    pub reference_limit: usize,
    /// Feather applied to layers produced by magic fill.
    pub magic_fill_feather: u8,
    /// Selection side above which the pro model is asked for the larger size.
    pub pro_size_upgrade_px: f64,
    /// Render-fit decision table for new layers.
    pub render_fit: RenderFitPolicy,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            reference_limit: 10,
            magic_fill_feather: 20,
            pro_size_upgrade_px: 2000.0,
            render_fit: RenderFitPolicy::default(),
        }
    }
}

impl CanvasConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> CanvasResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| CanvasError::serde(format!("canvas config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_json_path(path: impl AsRef<Path>) -> CanvasResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read canvas config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Reject values that would make the engine misbehave.
    pub fn validate(&self) -> CanvasResult<()> {
        let v = &self.viewport;
        if !(v.min_zoom > 0.0 && v.min_zoom <= v.max_zoom && v.max_zoom.is_finite()) {
            return Err(CanvasError::validation(
                "viewport zoom clamps must satisfy 0 < min_zoom <= max_zoom",
            ));
        }
        if !(v.gesture_min_zoom >= 0.0 && v.gesture_min_zoom < v.min_zoom) {
            return Err(CanvasError::validation(
                "viewport gesture_min_zoom must satisfy 0 <= gesture_min_zoom < min_zoom",
            ));
        }
        if v.world_size <= 0.0 || v.initial_view_width <= 0.0 {
            return Err(CanvasError::validation(
                "viewport world_size and initial_view_width must be > 0",
            ));
        }
        if v.fit_padding < 0.0 || v.fit_max_zoom <= 0.0 {
            return Err(CanvasError::validation(
                "viewport fit_padding must be >= 0 and fit_max_zoom > 0",
            ));
        }
        if v.wheel_sensitivity <= 0.0 {
            return Err(CanvasError::validation(
                "viewport wheel_sensitivity must be > 0",
            ));
        }

        let s = &self.selection;
        if s.min_size < 0.0 || s.axis_lock_threshold < 0.0 || s.native_slack_px < 0.0 {
            return Err(CanvasError::validation(
                "selection thresholds must be >= 0",
            ));
        }
        if s.ratio_tolerance <= 0.0 {
            return Err(CanvasError::validation(
                "selection ratio_tolerance must be > 0",
            ));
        }

        let g = &self.generation;
        if g.reference_limit == 0 {
            return Err(CanvasError::validation(
                "generation reference_limit must be > 0",
            ));
        }
        if g.magic_fill_feather > 100 {
            return Err(CanvasError::validation(
                "generation magic_fill_feather must be <= 100",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
