//! Editor tuning constants.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Thresholds and factors used by the editor.
///
/// Distances are in world units unless noted as screen units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Distance within which a connector endpoint binds to a shape corner.
    pub snap_distance: f64,
    /// Resize handle hit tolerance in screen units.
    pub handle_tolerance: f64,
    /// Resize handle drawn size in screen units.
    pub handle_size: f64,
    /// Padding of the hit box around lines and arrows.
    pub connector_hit_padding: f64,
    /// Hit radius around each freedraw point.
    pub freedraw_hit_radius: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Scale step of the zoom buttons.
    pub zoom_step: f64,
    /// Scale change per unit of wheel delta.
    pub wheel_zoom_factor: f64,
    /// Maximum number of history snapshots. Zero keeps everything.
    pub max_history: usize,
    /// Inner padding of shape labels.
    pub label_padding: f64,
    /// Line height as a multiple of font size.
    pub line_height: f64,
    /// Minimum width of the text edit overlay, in unscaled units.
    pub text_min_width: f64,
    /// Extra width added to measured text element lines.
    pub text_width_padding: f64,
    /// Padding of the dashed selection box.
    pub selection_padding: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl EditorConfig {
    /// The stock configuration.
    pub const DEFAULT: EditorConfig = EditorConfig {
        snap_distance: 20.0,
        handle_tolerance: 10.0,
        handle_size: 8.0,
        connector_hit_padding: 5.0,
        freedraw_hit_radius: 10.0,
        min_scale: 0.1,
        max_scale: 5.0,
        zoom_step: 0.1,
        wheel_zoom_factor: 0.001,
        max_history: 0,
        label_padding: 10.0,
        line_height: 1.2,
        text_min_width: 50.0,
        text_width_padding: 20.0,
        selection_padding: 4.0,
    };

    /// Parse a config from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_scale > 0.0 && self.min_scale <= self.max_scale) {
            return Err(ConfigError::InvalidValue {
                field: "minScale",
                reason: format!(
                    "must be positive and not above maxScale ({} > {})",
                    self.min_scale, self.max_scale
                ),
            });
        }
        let non_negative = [
            ("snapDistance", self.snap_distance),
            ("handleTolerance", self.handle_tolerance),
            ("handleSize", self.handle_size),
            ("connectorHitPadding", self.connector_hit_padding),
            ("freedrawHitRadius", self.freedraw_hit_radius),
            ("zoomStep", self.zoom_step),
            ("wheelZoomFactor", self.wheel_zoom_factor),
            ("labelPadding", self.label_padding),
            ("textMinWidth", self.text_min_width),
            ("textWidthPadding", self.text_width_padding),
            ("selectionPadding", self.selection_padding),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("must be a finite non-negative number, got {value}"),
                });
            }
        }
        if !(self.line_height.is_finite() && self.line_height > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "lineHeight",
                reason: format!("must be positive, got {}", self.line_height),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert!((config.snap_distance - 20.0).abs() < f64::EPSILON);
        assert!((config.max_scale - 5.0).abs() < f64::EPSILON);
        assert_eq!(config.max_history, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config = EditorConfig::from_json(r#"{"snapDistance": 30, "maxHistory": 10}"#).unwrap();
        assert!((config.snap_distance - 30.0).abs() < f64::EPSILON);
        assert_eq!(config.max_history, 10);
        assert!((config.handle_tolerance - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_inverted_scale_limits() {
        let err = EditorConfig::from_json(r#"{"minScale": 6}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "minScale", .. }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            EditorConfig::from_json("{"),
            Err(ConfigError::Json(_))
        ));
    }
}
