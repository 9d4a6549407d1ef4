//! Canvas configuration.

use crate::color::Color;
use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::tools::ToolSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Page-number label drawn in the bottom-right corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub enabled: bool,
    /// Font size in pixels.
    pub font_size: f32,
    /// Distance from the right and bottom edges.
    pub offset: f64,
    pub color: Color,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            font_size: 16.0,
            offset: 10.0,
            color: Color::BLACK.with_alpha(128),
        }
    }
}

/// Multi-page document export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Page width in points.
    pub page_width: f32,
    /// Page height in points.
    pub page_height: f32,
    pub file_name: String,
}

impl Default for PdfConfig {
    fn default() -> Self {
        // A4 portrait
        Self {
            page_width: 595.28,
            page_height: 841.89,
            file_name: "handwriting.pdf".to_string(),
        }
    }
}

/// Combined image export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombinedImageConfig {
    /// File name prefix; the unix timestamp in milliseconds is appended.
    pub file_prefix: String,
}

impl Default for CombinedImageConfig {
    fn default() -> Self {
        Self {
            file_prefix: "combined-canvas".to_string(),
        }
    }
}

/// Top-level configuration for a canvas session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub stroke_color: Color,
    pub stroke_width: u32,
    pub eraser_color: Color,
    /// Maximum undo depth; `null` keeps every snapshot.
    pub history_limit: Option<usize>,
    pub page_label: LabelConfig,
    pub pdf: PdfConfig,
    pub combined_image: CombinedImageConfig,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            stroke_color: Color::BLACK,
            stroke_width: 3,
            eraser_color: Color::WHITE,
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
            page_label: LabelConfig::default(),
            pdf: PdfConfig::default(),
            combined_image: CombinedImageConfig::default(),
        }
    }
}

impl CanvasConfig {
    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&content)?;
        log::debug!("Loaded config from {:?}", path.as_ref());
        Ok(config)
    }

    /// Initial tool settings.
    pub fn tool_settings(&self) -> ToolSettings {
        ToolSettings::new(self.stroke_color, self.stroke_width, self.eraser_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = CanvasConfig::default();
        assert_eq!(config.stroke_width, 3);
        assert_eq!(config.history_limit, Some(50));
        assert_eq!(config.pdf.file_name, "handwriting.pdf");
        assert_eq!(config.page_label.color, Color::rgba(0, 0, 0, 128));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = CanvasConfig::from_json(
            r##"{"stroke_color": "#ff0000", "history_limit": null, "pdf": {"file_name": "notes.pdf"}}"##,
        )
        .unwrap();
        assert_eq!(config.stroke_color, Color::rgb(255, 0, 0));
        assert_eq!(config.history_limit, None);
        assert_eq!(config.pdf.file_name, "notes.pdf");
        assert_eq!(config.pdf.page_width, 595.28);
        assert_eq!(config.stroke_width, 3);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = CanvasConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(CanvasConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"stroke_width": 100}}"#).unwrap();

        let config = CanvasConfig::load(file.path()).unwrap();
        assert_eq!(config.stroke_width, 100);
        // Clamped when turned into tool settings
        assert_eq!(config.tool_settings().stroke_width(), 40);
    }

    #[test]
    fn test_load_errors() {
        assert!(matches!(
            CanvasConfig::load("/nonexistent/pagepad.json"),
            Err(ConfigError::Io(_))
        ));
        assert!(matches!(
            CanvasConfig::from_json("{"),
            Err(ConfigError::Parse(_))
        ));
    }
}
