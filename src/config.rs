//! Editor configuration.
//!
//! Every field has a default, so the host may pass a partial object (or
//! nothing at all) to `mount_canvas_editor`.

use crate::constants::*;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Where a wheel zoom is anchored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomAnchor {
    /// Scale about the canvas origin; content drifts relative to the cursor.
    #[default]
    Origin,
    /// Keep the canvas point under the cursor stationary.
    Cursor,
}

/// Node ordering used by the instruction compiler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompileOrder {
    /// Graph insertion order.
    #[default]
    Insertion,
    /// Sources before targets; fails on cycles.
    Topological,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_in_factor: f64,
    pub zoom_out_factor: f64,
    pub zoom_anchor: ZoomAnchor,
    pub node_width: f64,
    pub node_height: f64,
    pub connector_radius: f64,
    pub connection_hit_width: f64,
    /// Screen pixels a node may travel between press and release and still
    /// count as a click (select) rather than a move.
    pub click_slop: f64,
    /// Complete a connection as soon as the pointer hovers an input
    /// connector instead of waiting for release.
    pub complete_on_hover: bool,
    pub compile_order: CompileOrder,
    pub api_base_url: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            zoom_in_factor: ZOOM_IN_FACTOR,
            zoom_out_factor: ZOOM_OUT_FACTOR,
            zoom_anchor: ZoomAnchor::Origin,
            node_width: DEFAULT_NODE_WIDTH,
            node_height: DEFAULT_NODE_HEIGHT,
            connector_radius: CONNECTOR_RADIUS,
            connection_hit_width: CONNECTION_HIT_WIDTH,
            click_slop: CLICK_SLOP_PX,
            complete_on_hover: false,
            compile_order: CompileOrder::Insertion,
            api_base_url: String::new(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_zoom.is_finite() && self.max_zoom.is_finite())
            || self.min_zoom <= 0.0
            || self.min_zoom > self.max_zoom
        {
            return Err(ConfigError::InvalidZoomLimits {
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }
        let positive = [
            ("zoomInFactor", self.zoom_in_factor),
            ("zoomOutFactor", self.zoom_out_factor),
            ("nodeWidth", self.node_width),
            ("nodeHeight", self.node_height),
            ("connectorRadius", self.connector_radius),
            ("connectionHitWidth", self.connection_hit_width),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive(name));
            }
        }
        if !(self.click_slop.is_finite() && self.click_slop >= 0.0) {
            return Err(ConfigError::NonPositive("clickSlop"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EditorConfig::default();
        assert_eq!(config.min_zoom, 0.5);
        assert_eq!(config.max_zoom, 2.0);
        assert_eq!(config.zoom_anchor, ZoomAnchor::Origin);
        assert_eq!(config.compile_order, CompileOrder::Insertion);
        assert!(!config.complete_on_hover);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config =
            EditorConfig::from_json(r#"{"zoomAnchor": "cursor", "compileOrder": "topological"}"#)
                .unwrap();
        assert_eq!(config.zoom_anchor, ZoomAnchor::Cursor);
        assert_eq!(config.compile_order, CompileOrder::Topological);
        assert_eq!(config.node_width, DEFAULT_NODE_WIDTH);
    }

    #[test]
    fn rejects_inverted_zoom_limits() {
        let err = EditorConfig::from_json(r#"{"minZoom": 3.0, "maxZoom": 2.0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidZoomLimits { .. }));

        let err = EditorConfig::from_json(r#"{"minZoom": 0.0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidZoomLimits { .. }));
    }

    #[test]
    fn rejects_non_positive_geometry() {
        let err = EditorConfig::from_json(r#"{"nodeWidth": -1.0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::NonPositive("nodeWidth")));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            EditorConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
