// tentcard-pdf: drawing laid-out pages into a printable PDF

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::*;
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::layout::{paginate, Page, PaperDimensions};
use crate::metrics::{BuiltinMetrics, FontFace};
use crate::model::{AppConfig, BorderStyle, NameEntry};
use crate::sizing::{layout_card, CardLayout, LineLayout, LINE_HEIGHT};
use crate::units::{cm_to_mm, px_to_pt};

// ============================================================================
// Constants
// ============================================================================

/// Baseline offset below the centre of a line box, in em
const BASELINE_DROP_EM: f64 = 0.26;

/// Space above the secondary line, in em of the secondary font
const SECONDARY_GAP_EM: f64 = 0.2;

/// Corner cut mark leg length
const CUT_MARK_CM: f64 = 0.4;

/// Guide colours (grey 400 / grey 300)
const CUT_MARK_GREY: (f32, f32, f32) = (0.612, 0.639, 0.686);
const FOLD_LINE_GREY: (f32, f32, f32) = (0.820, 0.835, 0.859);

/// Calibration bar printed on the first page
const CALIBRATION_LENGTH_CM: f64 = 5.0;
const CALIBRATION_INSET_CM: f64 = 0.5;
const CALIBRATION_FONT_SIZE: f32 = 7.0;

// ============================================================================
// Options
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Print the 5 cm calibration bar on the first page
    pub calibration_bar: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { calibration_bar: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    pub pages: usize,
    pub cards: usize,
}

// ============================================================================
// PDF Generation
// ============================================================================

/// Lay out the printable entries and write them to `output_path`.
pub fn write_pdf(
    config: &AppConfig,
    entries: &[NameEntry],
    options: RenderOptions,
    output_path: &Path,
) -> Result<RenderSummary> {
    let printable: Vec<NameEntry> = entries.iter().filter(|n| n.is_printable()).cloned().collect();
    let pages = paginate(config, &printable);
    if pages.is_empty() {
        return Err(AppError::NamesError("no names to print".to_string()));
    }

    let doc = build_document(config, &pages, options)?;

    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    doc.save(&mut writer)
        .map_err(|e| AppError::PdfError(e.to_string()))?;

    let summary = RenderSummary {
        pages: pages.len(),
        cards: printable.len(),
    };
    info!(
        path = %output_path.display(),
        pages = summary.pages,
        cards = summary.cards,
        "PDF written"
    );
    Ok(summary)
}

/// One PDF page per layout page.
pub fn build_document(config: &AppConfig, pages: &[Page], options: RenderOptions) -> Result<PdfDocumentReference> {
    let paper = PaperDimensions::for_config(config);
    let page_w = Mm(cm_to_mm(paper.width_cm) as f32);
    let page_h = Mm(cm_to_mm(paper.height_cm) as f32);

    let (doc, page1, layer1) = PdfDocument::new("Tent Cards", page_w, page_h, "Layer 1");
    let fonts = CardFonts::load(&doc, config)?;
    let sheet = Sheet {
        height_cm: paper.height_cm,
    };

    for (index, page) in pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(page1).get_layer(layer1)
        } else {
            let (new_page, new_layer) = doc.add_page(page_w, page_h, "Layer 1");
            doc.get_page(new_page).get_layer(new_layer)
        };

        for (slot, entry) in page.entries.iter().enumerate() {
            let top_cm = page.start_y + config.plate_full_height_cm() * slot as f64;
            let card = layout_card(config, entry, &BuiltinMetrics);
            draw_card(&layer, &fonts, config, &sheet, page.start_x, top_cm, &card);
        }

        if index == 0 && options.calibration_bar {
            draw_calibration_bar(&layer, &fonts.label, &sheet);
        }
    }

    Ok(doc)
}

// ============================================================================
// Fonts
// ============================================================================

struct CardFonts {
    main: IndirectFontRef,
    secondary: IndirectFontRef,
    label: IndirectFontRef,
}

impl CardFonts {
    fn load(doc: &PdfDocumentReference, config: &AppConfig) -> Result<Self> {
        let face = FontFace::from_family(&config.font_family);
        let add = |font: BuiltinFont| {
            doc.add_builtin_font(font)
                .map_err(|e| AppError::PdfError(e.to_string()))
        };

        let main = add(builtin_font(face, config.is_bold, config.is_italic))?;
        let secondary = if config.secondary_is_italic == config.is_italic {
            main.clone()
        } else {
            add(builtin_font(face, config.is_bold, config.secondary_is_italic))?
        };
        let label = add(BuiltinFont::Helvetica)?;
        Ok(Self { main, secondary, label })
    }
}

fn builtin_font(face: FontFace, bold: bool, italic: bool) -> BuiltinFont {
    match (face, bold, italic) {
        (FontFace::Sans, false, false) => BuiltinFont::Helvetica,
        (FontFace::Sans, true, false) => BuiltinFont::HelveticaBold,
        (FontFace::Sans, false, true) => BuiltinFont::HelveticaOblique,
        (FontFace::Sans, true, true) => BuiltinFont::HelveticaBoldOblique,
        (FontFace::Serif, false, false) => BuiltinFont::TimesRoman,
        (FontFace::Serif, true, false) => BuiltinFont::TimesBold,
        (FontFace::Serif, false, true) => BuiltinFont::TimesItalic,
        (FontFace::Serif, true, true) => BuiltinFont::TimesBoldItalic,
        (FontFace::Mono, false, false) => BuiltinFont::Courier,
        (FontFace::Mono, true, false) => BuiltinFont::CourierBold,
        (FontFace::Mono, false, true) => BuiltinFont::CourierOblique,
        (FontFace::Mono, true, true) => BuiltinFont::CourierBoldOblique,
    }
}

// ============================================================================
// Cards
// ============================================================================

/// Converts top-left based layout positions to PDF user space
struct Sheet {
    height_cm: f64,
}

impl Sheet {
    fn x(&self, x_cm: f64) -> f32 {
        cm_to_mm(x_cm) as f32
    }

    fn y(&self, y_from_top_cm: f64) -> f32 {
        cm_to_mm(self.height_cm - y_from_top_cm) as f32
    }

    fn pt(mm: f32) -> f32 {
        Pt::from(Mm(mm)).0
    }
}

fn draw_card(
    layer: &PdfLayerReference,
    fonts: &CardFonts,
    config: &AppConfig,
    sheet: &Sheet,
    left_cm: f64,
    top_cm: f64,
    card: &CardLayout,
) {
    let width_cm = config.plate_width_cm;
    let half_cm = config.plate_height_cm;
    let right_cm = left_cm + width_cm;
    let bottom_cm = top_cm + half_cm * 2.0;
    let text_color = parse_hex_color(&config.text_color);

    if config.border_style != BorderStyle::None {
        layer.set_outline_color(text_color.clone());
        layer.set_outline_thickness(px_to_pt(config.border_style.width_px()) as f32);
        draw_rect(layer, sheet, left_cm, top_cm, right_cm, bottom_cm);
    }

    if config.show_cut_marks {
        draw_cut_marks(layer, sheet, left_cm, top_cm, right_cm, bottom_cm);
    }

    if config.show_fold_line {
        let fold_cm = top_cm + half_cm;
        layer.set_outline_color(rgb(FOLD_LINE_GREY));
        layer.set_outline_thickness(0.75);
        layer.set_line_dash_pattern(LineDashPattern {
            dash_1: Some(3),
            gap_1: Some(3),
            ..Default::default()
        });
        draw_line(layer, sheet.x(left_cm), sheet.y(fold_cm), sheet.x(right_cm), sheet.y(fold_cm));
        layer.set_line_dash_pattern(LineDashPattern::default());
    }

    let centre_x_cm = left_cm + width_cm / 2.0;
    let secondary_color = parse_hex_color(&config.secondary_color);

    // Top half reads from the far side of the table
    for (centre_y_cm, rotated) in [(top_cm + half_cm / 2.0, true), (top_cm + half_cm * 1.5, false)] {
        let centre = (
            Sheet::pt(sheet.x(centre_x_cm)) as f64,
            Sheet::pt(sheet.y(centre_y_cm)) as f64,
        );
        draw_half_text(layer, fonts, card, centre, rotated, &text_color, &secondary_color);
    }
}

/// Both lines of a half card, centred as a block on `centre` (PDF points).
fn draw_half_text(
    layer: &PdfLayerReference,
    fonts: &CardFonts,
    card: &CardLayout,
    centre: (f64, f64),
    rotated: bool,
    main_color: &Color,
    secondary_color: &Color,
) {
    let main_box = card.main.style.size_pt * LINE_HEIGHT;
    let secondary_box = card
        .secondary
        .as_ref()
        .map(|l| l.style.size_pt * (LINE_HEIGHT + SECONDARY_GAP_EM))
        .unwrap_or(0.0);
    let block_top = (main_box + secondary_box) / 2.0;

    // Offsets above the block centre, in the upright frame
    let main_centre_dy = block_top - main_box / 2.0;
    draw_line_text(layer, &fonts.main, &card.main, centre, main_centre_dy, rotated, main_color);

    if let Some(secondary) = &card.secondary {
        let size = secondary.style.size_pt;
        let line_box = size * LINE_HEIGHT;
        let secondary_centre_dy = block_top - main_box - size * SECONDARY_GAP_EM - line_box / 2.0;
        draw_line_text(
            layer,
            &fonts.secondary,
            secondary,
            centre,
            secondary_centre_dy,
            rotated,
            secondary_color,
        );
    }
}

fn draw_line_text(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    line: &LineLayout,
    centre: (f64, f64),
    centre_dy: f64,
    rotated: bool,
    color: &Color,
) {
    let scale = line.fit_scale;
    let width = BuiltinMetrics.width_pt(&line.text, &line.style) * scale;

    // Baseline start relative to the half's centre, upright
    let dx = -width / 2.0;
    let dy = centre_dy - line.style.size_pt * BASELINE_DROP_EM * scale;

    let (sign, x, y) = if rotated {
        (-1.0, centre.0 - dx, centre.1 - dy)
    } else {
        (1.0, centre.0 + dx, centre.1 + dy)
    };
    // Same scale on both axes; a negative one turns the line 180°
    let m = (sign * scale) as f32;

    layer.set_fill_color(color.clone());
    layer.begin_text_section();
    layer.set_font(font, line.style.size_pt as f32);
    layer.set_text_matrix(TextMatrix::Raw([m, 0.0, 0.0, m, x as f32, y as f32]));
    layer.write_text(line.text.clone(), font);
    layer.end_text_section();
}

fn draw_cut_marks(layer: &PdfLayerReference, sheet: &Sheet, left: f64, top: f64, right: f64, bottom: f64) {
    layer.set_outline_color(rgb(CUT_MARK_GREY));
    layer.set_outline_thickness(0.75);

    for (x, y, dx, dy) in [
        (left, top, CUT_MARK_CM, CUT_MARK_CM),
        (right, top, -CUT_MARK_CM, CUT_MARK_CM),
        (left, bottom, CUT_MARK_CM, -CUT_MARK_CM),
        (right, bottom, -CUT_MARK_CM, -CUT_MARK_CM),
    ] {
        draw_line(layer, sheet.x(x), sheet.y(y), sheet.x(x + dx), sheet.y(y));
        draw_line(layer, sheet.x(x), sheet.y(y), sheet.x(x), sheet.y(y + dy));
    }
}

// ============================================================================
// Calibration Bar
// ============================================================================

/// A 5 cm bar in the bottom-left corner for checking printer scaling.
fn draw_calibration_bar(layer: &PdfLayerReference, font: &IndirectFontRef, sheet: &Sheet) {
    let x0 = CALIBRATION_INSET_CM;
    let x1 = x0 + CALIBRATION_LENGTH_CM;
    let y = sheet.height_cm - CALIBRATION_INSET_CM;

    layer.set_outline_color(rgb((0.0, 0.0, 0.0)));
    layer.set_outline_thickness(0.5);
    draw_line(layer, sheet.x(x0), sheet.y(y), sheet.x(x1), sheet.y(y));
    for cm in 0..=CALIBRATION_LENGTH_CM as u32 {
        let x = x0 + f64::from(cm);
        let tick = if cm == 0 || cm == CALIBRATION_LENGTH_CM as u32 { 0.2 } else { 0.1 };
        draw_line(layer, sheet.x(x), sheet.y(y), sheet.x(x), sheet.y(y - tick));
    }

    layer.set_fill_color(rgb((0.0, 0.0, 0.0)));
    layer.use_text(
        "5 cm - verify before cutting",
        CALIBRATION_FONT_SIZE,
        Mm(sheet.x(x1 + 0.2)),
        Mm(sheet.y(y)),
        font,
    );
}

// ============================================================================
// Drawing Utilities
// ============================================================================

fn rgb((r, g, b): (f32, f32, f32)) -> Color {
    Color::Rgb(Rgb::new(r, g, b, None))
}

/// `#rrggbb` or `#rgb`; anything else prints black.
pub fn parse_hex_color(value: &str) -> Color {
    match hex_components(value) {
        Some((r, g, b)) => rgb((f32::from(r) / 255.0, f32::from(g) / 255.0, f32::from(b) / 255.0)),
        None => {
            warn!(color = value, "unrecognised colour, using black");
            rgb((0.0, 0.0, 0.0))
        }
    }
}

fn hex_components(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        3 => {
            let expand = |i: usize| channel(&hex[i..=i].repeat(2));
            Some((expand(0)?, expand(1)?, expand(2)?))
        }
        _ => None,
    }
}

fn draw_rect(layer: &PdfLayerReference, sheet: &Sheet, left: f64, top: f64, right: f64, bottom: f64) {
    let points = vec![
        (Point::new(Mm(sheet.x(left)), Mm(sheet.y(top))), false),
        (Point::new(Mm(sheet.x(right)), Mm(sheet.y(top))), false),
        (Point::new(Mm(sheet.x(right)), Mm(sheet.y(bottom))), false),
        (Point::new(Mm(sheet.x(left)), Mm(sheet.y(bottom))), false),
    ];
    layer.add_line(Line {
        points,
        is_closed: true,
    });
}

fn draw_line(layer: &PdfLayerReference, x1: f32, y1: f32, x2: f32, y2: f32) {
    let points = vec![
        (Point::new(Mm(x1), Mm(y1)), false),
        (Point::new(Mm(x2), Mm(y2)), false),
    ];
    let line = Line {
        points,
        is_closed: false,
    };
    layer.add_line(line);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::parse_bulk_text;
    use tempfile::TempDir;

    #[test]
    fn test_hex_colours() {
        assert_eq!(hex_components("#000000"), Some((0, 0, 0)));
        assert_eq!(hex_components("#6b7280"), Some((107, 114, 128)));
        assert_eq!(hex_components("#fff"), Some((255, 255, 255)));
        assert_eq!(hex_components("red"), None);
        assert_eq!(hex_components("#12345"), None);
        assert_eq!(hex_components("#zzzzzz"), None);
    }

    #[test]
    fn test_font_selection() {
        assert!(matches!(builtin_font(FontFace::Sans, true, false), BuiltinFont::HelveticaBold));
        assert!(matches!(builtin_font(FontFace::Serif, false, true), BuiltinFont::TimesItalic));
        assert!(matches!(builtin_font(FontFace::Mono, true, true), BuiltinFont::CourierBoldOblique));
    }

    #[test]
    fn test_write_pdf_reports_pages() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cards.pdf");
        let config = AppConfig {
            plate_height_cm: 4.0,
            ..AppConfig::default()
        };
        let names = parse_bulk_text("John Doe, CEO\nJane Smith - Manager\nSolo Name");
        let summary = write_pdf(&config, &names, RenderOptions::default(), &path).unwrap();
        assert_eq!(summary, RenderSummary { pages: 2, cards: 3 });
        assert!(std::fs::metadata(&path).unwrap().len() > 1000);
    }

    #[test]
    fn test_write_pdf_without_names_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.pdf");
        let names = vec![NameEntry::new("1", "  ", "only a title")];
        let result = write_pdf(&AppConfig::default(), &names, RenderOptions::default(), &path);
        assert!(matches!(result, Err(AppError::NamesError(_))));
        assert!(!path.exists());
    }
}
