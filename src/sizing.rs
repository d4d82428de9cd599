// tentcard-pdf: per-card font sizes
//
// Auto-fit sizes the text for the card's height in closed form. Width is
// handled afterwards per line by `resolve_fit_scale`, since it depends on the
// glyphs of the actual text.

use serde::Serialize;
use tracing::debug;

use crate::metrics::{resolve_fit_scale, FontStyle, TextMetrics};
use crate::model::{AppConfig, NameEntry};
use crate::units::{cm_to_px, px_to_pt};

// ============================================================================
// Constants
// ============================================================================

/// Secondary line size relative to the main line in auto-fit mode. Replaces
/// the configured `secondary_scale` whenever auto-fit is on.
pub const AUTO_FIT_SECONDARY_SCALE: f64 = 0.4;

/// Padding on each side of a half card (top/bottom and left/right)
pub const HALF_CARD_PADDING_CM: f64 = 0.5;

/// Typographic line-height multiplier
pub const LINE_HEIGHT: f64 = 1.2;

/// Upper bound for auto-fit main line size
pub const MAX_AUTO_FIT_FONT_SIZE_PT: f64 = 150.0;

/// Floor for the text area when the plate is shorter than its padding
pub const MIN_AVAILABLE_HEIGHT_CM: f64 = 0.1;

/// Floor for every computed font size
pub const MIN_FONT_SIZE_PT: f64 = 1.0;

// ============================================================================
// Font Sizes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSizes {
    pub main_pt: f64,
    pub secondary_pt: f64,
}

/// Main and secondary font sizes for one card.
pub fn compute_font_sizes(config: &AppConfig, entry: &NameEntry) -> FontSizes {
    let defaults = AppConfig::default();
    let entry_scale = entry.effective_scale();

    let (main_pt, secondary_scale) = if config.auto_fit {
        let plate_height_cm = positive_or(config.plate_height_cm, defaults.plate_height_cm);
        let available_cm = (plate_height_cm - 2.0 * HALF_CARD_PADDING_CM).max(MIN_AVAILABLE_HEIGHT_CM);
        let available_px = cm_to_px(available_cm);

        let units = if entry.has_secondary() {
            1.0 + AUTO_FIT_SECONDARY_SCALE
        } else {
            1.0
        };
        let max_main_px = available_px / (units * LINE_HEIGHT);
        let main_pt = px_to_pt(max_main_px).min(MAX_AUTO_FIT_FONT_SIZE_PT) * entry_scale;

        debug!(
            id = %entry.id,
            available_cm,
            units,
            main_pt,
            "auto-fit size"
        );
        (main_pt, AUTO_FIT_SECONDARY_SCALE)
    } else {
        let base = positive_or(config.font_size, defaults.font_size);
        let secondary_scale = positive_or(config.secondary_scale, defaults.secondary_scale);
        (base * entry_scale, secondary_scale)
    };

    let main_pt = main_pt.max(MIN_FONT_SIZE_PT);
    FontSizes {
        main_pt,
        secondary_pt: (main_pt * secondary_scale).max(MIN_FONT_SIZE_PT),
    }
}

fn positive_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

// ============================================================================
// Card Layout
// ============================================================================

/// One text line of a card, ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct LineLayout {
    pub text: String,
    pub style: FontStyle,
    /// Uniform shrink applied at draw time, in (0, 1]
    pub fit_scale: f64,
}

/// Both lines of one half card; the other half is its 180° mirror
#[derive(Debug, Clone, PartialEq)]
pub struct CardLayout {
    pub sizes: FontSizes,
    pub main: LineLayout,
    pub secondary: Option<LineLayout>,
}

/// Usable text width inside one half card, in pixels.
pub fn text_box_width_px(config: &AppConfig) -> f64 {
    let width_cm = positive_or(config.plate_width_cm, AppConfig::default().plate_width_cm);
    cm_to_px((width_cm - 2.0 * HALF_CARD_PADDING_CM).max(MIN_AVAILABLE_HEIGHT_CM))
}

/// Font sizes plus the per-line fit scales for one card.
pub fn layout_card<M: TextMetrics + ?Sized>(config: &AppConfig, entry: &NameEntry, metrics: &M) -> CardLayout {
    let sizes = compute_font_sizes(config, entry);
    let box_width = text_box_width_px(config);

    let main_style = FontStyle {
        family: config.font_family.clone(),
        size_pt: sizes.main_pt,
        bold: config.is_bold,
        italic: config.is_italic,
    };
    let main = LineLayout {
        fit_scale: resolve_fit_scale(metrics, &entry.line1, &main_style, box_width, config.auto_fit),
        text: entry.line1.clone(),
        style: main_style,
    };

    let secondary = entry.has_secondary().then(|| {
        let style = FontStyle {
            family: config.font_family.clone(),
            size_pt: sizes.secondary_pt,
            bold: config.is_bold,
            italic: config.secondary_is_italic,
        };
        LineLayout {
            fit_scale: resolve_fit_scale(metrics, &entry.line2, &style, box_width, config.auto_fit),
            text: entry.line2.clone(),
            style,
        }
    });

    CardLayout { sizes, main, secondary }
}
