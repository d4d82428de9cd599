// tentcard-pdf: splitting cards into printed pages
//
// All positions are in centimetres from the top-left corner of the sheet.

use serde::Serialize;
use tracing::debug;

use crate::model::{AppConfig, NameEntry, Orientation, PaperSize};

// ============================================================================
// Constants
// ============================================================================

/// A4 dimensions in cm (portrait)
pub const A4_CM: (f64, f64) = (21.0, 29.7);

/// US Letter dimensions in cm (portrait)
pub const LETTER_CM: (f64, f64) = (21.59, 27.94);

/// Vertical space reserved on every sheet
pub const PAGE_MARGIN_RESERVE_CM: f64 = 1.0;

/// Cards are never stacked more than two high
pub const MAX_PLATES_PER_PAGE: usize = 2;

// ============================================================================
// Paper
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperDimensions {
    pub width_cm: f64,
    pub height_cm: f64,
}

impl PaperDimensions {
    pub fn resolve(size: PaperSize, orientation: Orientation) -> Self {
        let (width_cm, height_cm) = match size {
            PaperSize::A4 => A4_CM,
            PaperSize::Letter => LETTER_CM,
        };
        match orientation {
            Orientation::Portrait => Self { width_cm, height_cm },
            Orientation::Landscape => Self {
                width_cm: height_cm,
                height_cm: width_cm,
            },
        }
    }

    pub fn for_config(config: &AppConfig) -> Self {
        Self::resolve(config.paper_size, config.orientation)
    }
}

/// 2 when two full cards fit above each other inside the margin reserve,
/// otherwise 1.
pub fn plates_per_page(config: &AppConfig) -> usize {
    let paper = PaperDimensions::for_config(config);
    let available_height_cm = paper.height_cm - PAGE_MARGIN_RESERVE_CM;
    if config.plate_full_height_cm() * 2.0 <= available_height_cm {
        MAX_PLATES_PER_PAGE
    } else {
        1
    }
}

// ============================================================================
// Pages
// ============================================================================

/// One printed sheet: its cards and the bounding box of the card block
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub entries: Vec<NameEntry>,
    pub start_y: f64,
    pub end_y: f64,
    pub start_x: f64,
    pub end_x: f64,
}

impl Page {
    /// Top edge of the block followed by the bottom edge of every card.
    pub fn horizontal_lines(&self, plate_full_height_cm: f64) -> Vec<f64> {
        std::iter::once(self.start_y)
            .chain((1..=self.entries.len()).map(|i| self.start_y + plate_full_height_cm * i as f64))
            .collect()
    }

    pub fn vertical_lines(&self) -> [f64; 2] {
        [self.start_x, self.end_x]
    }
}

/// Split `entries` into pages, keeping their order. No entries, no pages.
pub fn paginate(config: &AppConfig, entries: &[NameEntry]) -> Vec<Page> {
    let paper = PaperDimensions::for_config(config);
    let per_page = plates_per_page(config);
    let plate_full_height_cm = config.plate_full_height_cm();

    let start_x = (paper.width_cm - config.plate_width_cm) / 2.0;
    let end_x = start_x + config.plate_width_cm;

    let pages: Vec<Page> = entries
        .chunks(per_page)
        .map(|chunk| {
            let total_content_height_cm = plate_full_height_cm * chunk.len() as f64;
            let start_y = (paper.height_cm - total_content_height_cm) / 2.0;
            Page {
                entries: chunk.to_vec(),
                start_y,
                end_y: start_y + total_content_height_cm,
                start_x,
                end_x,
            }
        })
        .collect();

    debug!(
        cards = entries.len(),
        per_page,
        pages = pages.len(),
        "paginated {:?} {:?}",
        config.paper_size,
        config.orientation
    );
    pages
}

// ============================================================================
// Rulers
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TickKind {
    Centimetre,
    HalfCentimetre,
    Millimetre,
}

/// One ruler mark along a sheet edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RulerTick {
    pub position_cm: f64,
    pub kind: TickKind,
    /// Inside the card block span
    pub active: bool,
}

/// Millimetre ruler along an edge of `length_cm`, highlighting the span
/// `start..=end`. Centimetre labels widen the span outward to whole
/// centimetres so the block edges are always covered.
pub fn ruler_ticks(length_cm: f64, start: f64, end: f64) -> Vec<RulerTick> {
    if !length_cm.is_finite() || length_cm <= 0.0 {
        return Vec::new();
    }
    // Tolerate binary rounding in lengths like 29.7
    let last_mm = (length_cm * 10.0 + 1e-9).floor() as usize;
    (0..=last_mm)
        .map(|mm| {
            let position_cm = mm as f64 / 10.0;
            if mm % 10 == 0 {
                let cm = (mm / 10) as f64;
                RulerTick {
                    position_cm,
                    kind: TickKind::Centimetre,
                    active: cm >= start.floor() && cm <= end.ceil(),
                }
            } else {
                RulerTick {
                    position_cm,
                    kind: if mm % 5 == 0 {
                        TickKind::HalfCentimetre
                    } else {
                        TickKind::Millimetre
                    },
                    active: position_cm >= start && position_cm <= end,
                }
            }
        })
        .collect()
}
