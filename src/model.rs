// tentcard-pdf: names, card styling and saved snapshots

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

// ============================================================================
// Constants
// ============================================================================

/// Per-entry manual scale bounds
pub const MIN_ENTRY_SCALE: f64 = 0.5;
pub const MAX_ENTRY_SCALE: f64 = 2.0;

/// Ranges offered by the style controls
pub const PLATE_WIDTH_RANGE_CM: (f64, f64) = (5.0, 28.0);
pub const PLATE_HEIGHT_RANGE_CM: (f64, f64) = (2.0, 14.0);
pub const FONT_SIZE_RANGE_PT: (f64, f64) = (10.0, 72.0);
pub const SECONDARY_SCALE_RANGE: (f64, f64) = (0.2, 1.0);

// ============================================================================
// Name Entries
// ============================================================================

/// One card's content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameEntry {
    pub id: String,
    /// Main name
    pub line1: String,
    /// Designation / company, empty when absent
    #[serde(default)]
    pub line2: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

impl NameEntry {
    pub fn new(id: impl Into<String>, line1: impl Into<String>, line2: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            line1: line1.into(),
            line2: line2.into(),
            scale: Some(1.0),
        }
    }

    /// Manual scale, defaulted and clamped to the allowed range.
    pub fn effective_scale(&self) -> f64 {
        match self.scale {
            Some(s) if s.is_finite() && s > 0.0 => s.clamp(MIN_ENTRY_SCALE, MAX_ENTRY_SCALE),
            _ => 1.0,
        }
    }

    pub fn has_secondary(&self) -> bool {
        !self.line2.is_empty()
    }

    /// Only entries with a non-blank main line produce a card.
    pub fn is_printable(&self) -> bool {
        !self.line1.trim().is_empty()
    }
}

// ============================================================================
// Configuration
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    #[default]
    A4,
    Letter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    #[default]
    Landscape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    None,
    #[default]
    Thin,
    Medium,
    Thick,
}

impl BorderStyle {
    /// Stroke width in screen pixels
    pub fn width_px(self) -> f64 {
        match self {
            BorderStyle::None => 0.0,
            BorderStyle::Thin => 1.0,
            BorderStyle::Medium => 2.0,
            BorderStyle::Thick => 4.0,
        }
    }
}

/// Global styling and layout configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub paper_size: PaperSize,
    pub orientation: Orientation,
    /// Width of one card
    pub plate_width_cm: f64,
    /// Height of ONE half of the folded card
    pub plate_height_cm: f64,
    pub font_family: String,
    /// Base point size in manual mode
    pub font_size: f64,
    pub text_color: String,
    pub is_bold: bool,
    pub is_italic: bool,
    pub border_style: BorderStyle,
    /// Secondary line size as a fraction of the main line (manual mode)
    pub secondary_scale: f64,
    pub show_cut_marks: bool,
    pub show_fold_line: bool,
    pub secondary_color: String,
    pub secondary_is_italic: bool,
    pub auto_fit: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            orientation: Orientation::Landscape,
            plate_width_cm: 20.0,
            plate_height_cm: 6.0,
            font_family: "Inter, system-ui, sans-serif".to_string(),
            font_size: 24.0,
            text_color: "#000000".to_string(),
            is_bold: true,
            is_italic: false,
            border_style: BorderStyle::Thin,
            secondary_scale: 0.5,
            show_cut_marks: true,
            show_fold_line: true,
            secondary_color: "#6b7280".to_string(),
            secondary_is_italic: true,
            auto_fit: true,
        }
    }
}

impl AppConfig {
    /// Full printed card height (both halves).
    pub fn plate_full_height_cm(&self) -> f64 {
        self.plate_height_cm * 2.0
    }

    /// Clamp the numeric fields to the ranges the style controls allow.
    /// Non-finite values fall back to the defaults.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let mut config = self.clone();
        config.plate_width_cm = clamp_field(
            "plateWidthCm",
            self.plate_width_cm,
            defaults.plate_width_cm,
            PLATE_WIDTH_RANGE_CM,
        );
        config.plate_height_cm = clamp_field(
            "plateHeightCm",
            self.plate_height_cm,
            defaults.plate_height_cm,
            PLATE_HEIGHT_RANGE_CM,
        );
        config.font_size = clamp_field("fontSize", self.font_size, defaults.font_size, FONT_SIZE_RANGE_PT);
        config.secondary_scale = clamp_field(
            "secondaryScale",
            self.secondary_scale,
            defaults.secondary_scale,
            SECONDARY_SCALE_RANGE,
        );
        config
    }
}

fn clamp_field(name: &str, value: f64, fallback: f64, (min, max): (f64, f64)) -> f64 {
    if !value.is_finite() {
        warn!(field = name, "non-finite value replaced with default {}", fallback);
        return fallback;
    }
    let clamped = value.clamp(min, max);
    if clamped != value {
        warn!(field = name, "{} clamped to {}", value, clamped);
    }
    clamped
}

// ============================================================================
// Saved Snapshots
// ============================================================================

/// A named snapshot of a configuration and its name list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedNameplate {
    pub id: String,
    pub name: String,
    pub config: AppConfig,
    pub names: Vec<NameEntry>,
    pub saved_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_scale_defaults_and_clamps() {
        let mut entry = NameEntry::new("1", "Ada", "");
        entry.scale = None;
        assert_eq!(entry.effective_scale(), 1.0);
        entry.scale = Some(3.0);
        assert_eq!(entry.effective_scale(), MAX_ENTRY_SCALE);
        entry.scale = Some(0.1);
        assert_eq!(entry.effective_scale(), MIN_ENTRY_SCALE);
        entry.scale = Some(f64::NAN);
        assert_eq!(entry.effective_scale(), 1.0);
        entry.scale = Some(1.3);
        assert_eq!(entry.effective_scale(), 1.3);
    }

    #[test]
    fn test_printable_requires_main_line() {
        assert!(NameEntry::new("1", "Ada", "").is_printable());
        assert!(!NameEntry::new("2", "   ", "CTO").is_printable());
    }

    #[test]
    fn test_config_reads_camel_case_json() {
        let json = r##"{
            "paperSize": "letter",
            "orientation": "portrait",
            "plateWidthCm": 18,
            "plateHeightCm": 4.5,
            "borderStyle": "thick",
            "autoFit": false
        }"##;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.paper_size, PaperSize::Letter);
        assert_eq!(config.orientation, Orientation::Portrait);
        assert_eq!(config.plate_width_cm, 18.0);
        assert_eq!(config.plate_height_cm, 4.5);
        assert_eq!(config.border_style, BorderStyle::Thick);
        assert!(!config.auto_fit);
        // Missing keys come from the defaults
        assert_eq!(config.font_size, 24.0);
        assert_eq!(config.secondary_color, "#6b7280");
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = AppConfig {
            paper_size: PaperSize::Letter,
            is_italic: true,
            ..AppConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"paperSize\":\"letter\""));
        let back: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_sanitized_clamps_ui_ranges() {
        let config = AppConfig {
            plate_width_cm: 40.0,
            plate_height_cm: 1.0,
            font_size: f64::INFINITY,
            secondary_scale: 0.05,
            ..AppConfig::default()
        };
        let clean = config.sanitized();
        assert_eq!(clean.plate_width_cm, 28.0);
        assert_eq!(clean.plate_height_cm, 2.0);
        assert_eq!(clean.font_size, 24.0);
        assert_eq!(clean.secondary_scale, 0.2);
    }

    #[test]
    fn test_border_widths() {
        assert_eq!(BorderStyle::None.width_px(), 0.0);
        assert_eq!(BorderStyle::Thick.width_px(), 4.0);
    }
}
