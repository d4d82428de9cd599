// tentcard-pdf: text measurement and width auto-fit
//
// Width measurement is a host capability. `BuiltinMetrics` measures with the
// advance widths of the PDF base-14 fonts, which is exactly what the PDF
// renderer draws with; other hosts can supply their own `TextMetrics`.

use crate::units::pt_to_px;

/// Smallest scale handed out when text cannot fit at all
pub const MIN_FIT_SCALE: f64 = 0.01;

// ============================================================================
// Font Descriptors
// ============================================================================

/// Broad font classes the built-in metrics and the PDF fonts understand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFace {
    Sans,
    Serif,
    Mono,
}

impl FontFace {
    /// Classify a CSS-style font stack ("Georgia, serif") by its first
    /// recognised family.
    pub fn from_family(family: &str) -> Self {
        for name in family.split(',') {
            let name = name.trim().trim_matches(|c| c == '"' || c == '\'').to_lowercase();
            match name.as_str() {
                "monospace" | "consolas" | "menlo" => return FontFace::Mono,
                n if n.starts_with("courier") => return FontFace::Mono,
                "serif" | "georgia" | "cambria" | "garamond" => return FontFace::Serif,
                n if n.starts_with("times") => return FontFace::Serif,
                "sans-serif" | "system-ui" | "arial" | "helvetica" | "inter" | "verdana" | "geneva" => {
                    return FontFace::Sans
                }
                _ => {}
            }
        }
        FontFace::Sans
    }
}

/// Everything that affects a line's rendered width
#[derive(Debug, Clone, PartialEq)]
pub struct FontStyle {
    pub family: String,
    pub size_pt: f64,
    pub bold: bool,
    pub italic: bool,
}

impl FontStyle {
    pub fn face(&self) -> FontFace {
        FontFace::from_family(&self.family)
    }
}

/// Host capability: natural width of a single line of text, in pixels
pub trait TextMetrics {
    fn measure(&self, text: &str, style: &FontStyle) -> f64;
}

// ============================================================================
// Auto-Fit Resolver
// ============================================================================

/// Scale factor that shrinks `text` to fit `container_width_px`.
///
/// Never greater than 1: the font size was already chosen for the height, so
/// growing the text would overflow vertically. Disabled or empty text is 1.
pub fn resolve_fit_scale<M: TextMetrics + ?Sized>(
    metrics: &M,
    text: &str,
    style: &FontStyle,
    container_width_px: f64,
    enabled: bool,
) -> f64 {
    if !enabled || text.is_empty() {
        return 1.0;
    }

    let natural = metrics.measure(text, style);
    if !natural.is_finite() || natural <= 0.0 {
        return 1.0;
    }
    if !container_width_px.is_finite() || container_width_px <= 0.0 {
        return MIN_FIT_SCALE;
    }

    if natural <= container_width_px {
        1.0
    } else {
        (container_width_px / natural).max(MIN_FIT_SCALE)
    }
}

// ============================================================================
// Built-in Metrics
// ============================================================================

/// Advance widths indexed by WinAnsi code minus 0x20
type WidthTable = [u16; 224];

/// Helvetica (and Helvetica-Oblique) WinAnsi widths for 0x20..=0xFF, in 1/1000 em
const HELVETICA_WIDTHS: WidthTable = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, 350,
    556, 350, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 350, 611, 350,
    350, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 350, 500, 667,
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

/// Helvetica-Bold (and Helvetica-BoldOblique) WinAnsi widths for 0x20..=0xFF, in 1/1000 em
const HELVETICA_BOLD_WIDTHS: WidthTable = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, 350,
    556, 350, 278, 556, 500, 1000, 556, 556, 333, 1000, 667, 333, 1000, 350, 611, 350,
    350, 278, 278, 500, 500, 350, 556, 1000, 333, 1000, 556, 333, 944, 350, 500, 667,
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];

/// Times-Roman WinAnsi widths for 0x20..=0xFF, in 1/1000 em
const TIMES_ROMAN_WIDTHS: WidthTable = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541, 350,
    500, 350, 333, 500, 444, 1000, 500, 500, 333, 1000, 556, 333, 889, 350, 611, 350,
    350, 333, 333, 444, 444, 350, 500, 1000, 333, 980, 389, 333, 722, 350, 444, 722,
    250, 333, 500, 500, 500, 500, 200, 500, 333, 760, 276, 500, 564, 333, 760, 333,
    400, 564, 300, 300, 333, 500, 453, 250, 333, 300, 310, 500, 750, 750, 750, 444,
    722, 722, 722, 722, 722, 722, 889, 667, 611, 611, 611, 611, 333, 333, 333, 333,
    722, 722, 722, 722, 722, 722, 722, 564, 722, 722, 722, 722, 722, 722, 556, 500,
    444, 444, 444, 444, 444, 444, 667, 444, 444, 444, 444, 444, 278, 278, 278, 278,
    500, 500, 500, 500, 500, 500, 500, 564, 500, 500, 500, 500, 500, 500, 500, 500,
];

/// Times-Bold WinAnsi widths for 0x20..=0xFF, in 1/1000 em
const TIMES_BOLD_WIDTHS: WidthTable = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520, 350,
    500, 350, 333, 500, 500, 1000, 500, 500, 333, 1000, 556, 333, 1000, 350, 667, 350,
    350, 333, 333, 500, 500, 350, 500, 1000, 333, 1000, 389, 333, 722, 350, 444, 722,
    250, 333, 500, 500, 500, 500, 220, 500, 333, 747, 300, 500, 570, 333, 747, 333,
    400, 570, 300, 300, 333, 556, 540, 250, 333, 300, 330, 500, 750, 750, 750, 500,
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 389, 389, 389, 389,
    722, 722, 778, 778, 778, 778, 778, 570, 778, 722, 722, 722, 722, 722, 611, 556,
    500, 500, 500, 500, 500, 500, 722, 444, 444, 444, 444, 444, 278, 278, 278, 278,
    500, 556, 500, 500, 500, 500, 500, 570, 500, 556, 556, 556, 556, 500, 556, 500,
];

/// Times-Italic WinAnsi widths for 0x20..=0xFF, in 1/1000 em
const TIMES_ITALIC_WIDTHS: WidthTable = [
    250, 333, 420, 500, 500, 833, 778, 214, 333, 333, 500, 675, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 675, 675, 675, 500,
    920, 611, 611, 667, 722, 611, 611, 722, 722, 333, 444, 667, 556, 833, 667, 722,
    611, 722, 611, 500, 556, 722, 611, 833, 611, 556, 556, 389, 278, 389, 422, 500,
    333, 500, 500, 444, 500, 444, 278, 500, 500, 278, 278, 444, 278, 722, 500, 500,
    500, 500, 389, 389, 278, 500, 444, 667, 444, 444, 389, 400, 275, 400, 541, 350,
    500, 350, 333, 500, 556, 889, 500, 500, 333, 1000, 500, 333, 944, 350, 556, 350,
    350, 333, 333, 556, 556, 350, 500, 889, 333, 980, 389, 333, 667, 350, 389, 556,
    250, 389, 500, 500, 500, 500, 275, 500, 333, 760, 276, 500, 675, 333, 760, 333,
    400, 675, 300, 300, 333, 500, 523, 250, 333, 300, 310, 500, 750, 750, 750, 500,
    611, 611, 611, 611, 611, 611, 889, 667, 611, 611, 611, 611, 333, 333, 333, 333,
    722, 667, 722, 722, 722, 722, 722, 675, 722, 722, 722, 722, 722, 556, 611, 500,
    500, 500, 500, 500, 500, 500, 667, 444, 444, 444, 444, 444, 278, 278, 278, 278,
    500, 500, 500, 500, 500, 500, 500, 675, 500, 500, 500, 500, 500, 444, 500, 444,
];

/// Times-BoldItalic WinAnsi widths for 0x20..=0xFF, in 1/1000 em
const TIMES_BOLD_ITALIC_WIDTHS: WidthTable = [
    250, 389, 555, 500, 500, 833, 778, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    832, 667, 667, 667, 722, 667, 667, 722, 778, 389, 500, 667, 611, 889, 722, 722,
    611, 722, 667, 556, 611, 722, 667, 889, 667, 611, 611, 333, 278, 333, 570, 500,
    333, 500, 500, 444, 500, 444, 333, 500, 556, 278, 278, 500, 278, 778, 556, 500,
    500, 500, 389, 389, 278, 556, 444, 667, 500, 444, 389, 348, 220, 348, 570, 350,
    500, 350, 333, 500, 500, 1000, 500, 500, 333, 1000, 556, 333, 944, 350, 611, 350,
    350, 333, 333, 500, 500, 350, 500, 1000, 333, 1000, 389, 333, 722, 350, 389, 611,
    250, 389, 500, 500, 500, 500, 220, 500, 333, 747, 266, 500, 606, 333, 747, 333,
    400, 570, 300, 300, 333, 576, 500, 250, 333, 300, 300, 500, 750, 750, 750, 500,
    667, 667, 667, 667, 667, 667, 944, 667, 667, 667, 667, 667, 389, 389, 389, 389,
    722, 722, 722, 722, 722, 722, 722, 570, 722, 722, 722, 722, 722, 611, 611, 500,
    500, 500, 500, 500, 500, 500, 722, 444, 444, 444, 444, 444, 278, 278, 278, 278,
    500, 556, 500, 500, 500, 500, 500, 570, 500, 556, 556, 556, 556, 444, 500, 444,
];
/// Courier is monospaced in every style
const COURIER_WIDTH: u16 = 600;

/// Advance used for characters WinAnsi cannot encode. No glyph in the
/// proportional tables is wider.
const FALLBACK_WIDTH: u16 = 1015;

/// WinAnsi code for `c`, if the base-14 fonts can draw it.
fn win_ansi_code(c: char) -> Option<u8> {
    let code = match c {
        ' '..='~' | '\u{a0}'..='\u{ff}' => c as u32 as u8,
        '\u{20ac}' => 0x80,
        '\u{201a}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201e}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02c6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8a,
        '\u{2039}' => 0x8b,
        '\u{0152}' => 0x8c,
        '\u{017d}' => 0x8e,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201c}' => 0x93,
        '\u{201d}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02dc}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9a,
        '\u{203a}' => 0x9b,
        '\u{0153}' => 0x9c,
        '\u{017e}' => 0x9e,
        '\u{0178}' => 0x9f,
        _ => return None,
    };
    Some(code)
}

/// Measures with the width tables of the base-14 font the PDF renderer picks
/// for the same face and style. Helvetica-Oblique shares its upright widths.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinMetrics;

impl BuiltinMetrics {
    fn table(face: FontFace, bold: bool, italic: bool) -> Option<&'static WidthTable> {
        match (face, bold, italic) {
            (FontFace::Mono, _, _) => None,
            (FontFace::Sans, false, _) => Some(&HELVETICA_WIDTHS),
            (FontFace::Sans, true, _) => Some(&HELVETICA_BOLD_WIDTHS),
            (FontFace::Serif, false, false) => Some(&TIMES_ROMAN_WIDTHS),
            (FontFace::Serif, true, false) => Some(&TIMES_BOLD_WIDTHS),
            (FontFace::Serif, false, true) => Some(&TIMES_ITALIC_WIDTHS),
            (FontFace::Serif, true, true) => Some(&TIMES_BOLD_ITALIC_WIDTHS),
        }
    }

    fn char_width(table: Option<&WidthTable>, c: char) -> u16 {
        let Some(table) = table else {
            return COURIER_WIDTH;
        };
        match win_ansi_code(c) {
            Some(code) => table[usize::from(code) - 0x20],
            None => FALLBACK_WIDTH,
        }
    }

    /// Width of `text` in points.
    pub fn width_pt(&self, text: &str, style: &FontStyle) -> f64 {
        let table = Self::table(style.face(), style.bold, style.italic);
        let units: u32 = text.chars().map(|c| u32::from(Self::char_width(table, c))).sum();
        f64::from(units) / 1000.0 * style.size_pt
    }
}

impl TextMetrics for BuiltinMetrics {
    fn measure(&self, text: &str, style: &FontStyle) -> f64 {
        pt_to_px(self.width_pt(text, style))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every character is 10px wide regardless of style
    struct FixedWidth;

    impl TextMetrics for FixedWidth {
        fn measure(&self, text: &str, _style: &FontStyle) -> f64 {
            text.chars().count() as f64 * 10.0
        }
    }

    fn style(size_pt: f64) -> FontStyle {
        FontStyle {
            family: "Helvetica, Arial, sans-serif".to_string(),
            size_pt,
            bold: false,
            italic: false,
        }
    }

    #[test]
    fn test_disabled_is_noop() {
        let scale = resolve_fit_scale(&FixedWidth, "a very long line indeed", &style(40.0), 10.0, false);
        assert_eq!(scale, 1.0);
    }

    #[test]
    fn test_fitting_text_is_not_upscaled() {
        let scale = resolve_fit_scale(&FixedWidth, "abc", &style(40.0), 500.0, true);
        assert_eq!(scale, 1.0);
    }

    #[test]
    fn test_overflowing_text_shrinks_to_container() {
        // 20 chars * 10px = 200px natural width
        let scale = resolve_fit_scale(&FixedWidth, "abcdefghijklmnopqrst", &style(40.0), 150.0, true);
        assert!((scale - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_empty_text_scale_is_one() {
        assert_eq!(resolve_fit_scale(&FixedWidth, "", &style(40.0), 0.0, true), 1.0);
    }

    #[test]
    fn test_zero_container_stays_positive() {
        let scale = resolve_fit_scale(&FixedWidth, "abc", &style(40.0), 0.0, true);
        assert_eq!(scale, MIN_FIT_SCALE);
    }

    #[test]
    fn test_never_upscales() {
        let texts = ["", "I", "Dr. Alice Brown", "Research Director, OpenAI", "WWWWWWWWWWWWWWWWWWWW"];
        for text in texts {
            for width in [0.0, 1.0, 50.0, 300.0, 10_000.0] {
                let scale = resolve_fit_scale(&BuiltinMetrics, text, &style(84.0), width, true);
                assert!(scale <= 1.0 && scale > 0.0, "{} at {} gave {}", text, width, scale);
            }
        }
    }

    #[test]
    fn test_builtin_widths_match_afm() {
        // "Hello": H722 e556 l222 l222 o556 = 2278 units
        let width = BuiltinMetrics.width_pt("Hello", &style(10.0));
        assert!((width - 22.78).abs() < 1e-9);

        let bold = FontStyle { bold: true, ..style(10.0) };
        // H722 e556 l278 l278 o611 = 2445 units
        assert!((BuiltinMetrics.width_pt("Hello", &bold) - 24.45).abs() < 1e-9);
    }

    #[test]
    fn test_courier_is_monospaced() {
        let mono = FontStyle {
            family: "\"Courier New\", Courier, monospace".to_string(),
            ..style(10.0)
        };
        assert_eq!(BuiltinMetrics.width_pt("iiii", &mono), BuiltinMetrics.width_pt("WWWW", &mono));
        assert!((BuiltinMetrics.width_pt("ab", &mono) - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_measure_returns_pixels() {
        let pt = BuiltinMetrics.width_pt("Jane Smith", &style(24.0));
        let px = BuiltinMetrics.measure("Jane Smith", &style(24.0));
        assert!((px - pt / 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_font_face_classification() {
        assert_eq!(FontFace::from_family("Inter, system-ui, sans-serif"), FontFace::Sans);
        assert_eq!(FontFace::from_family("\"Times New Roman\", Times, serif"), FontFace::Serif);
        assert_eq!(FontFace::from_family("Georgia, serif"), FontFace::Serif);
        assert_eq!(FontFace::from_family("\"Courier New\", Courier, monospace"), FontFace::Mono);
        assert_eq!(FontFace::from_family("Comic Sans MS"), FontFace::Sans);
    }

    fn serif(bold: bool, italic: bool) -> FontStyle {
        FontStyle {
            family: "Georgia, serif".to_string(),
            bold,
            italic,
            ..style(10.0)
        }
    }

    #[test]
    fn test_serif_uses_times_widths() {
        // Times-Bold: W1000 A722 V722 Y722 space250 M944 A722 X722, twice plus a space
        let width = BuiltinMetrics.width_pt("WAVY MAX WAVY MAX", &serif(true, false));
        assert!((width - 118.58).abs() < 1e-9, "got {}", width);

        // Times-Italic A611 v444 a500 against Times-Roman A722 v500 a444
        assert!((BuiltinMetrics.width_pt("Ava", &serif(false, true)) - 15.55).abs() < 1e-9);
        assert!((BuiltinMetrics.width_pt("Ava", &serif(false, false)) - 16.66).abs() < 1e-9);
        assert!(BuiltinMetrics.width_pt("Ava", &serif(true, true)) > 0.0);
    }

    #[test]
    fn test_accented_and_typographic_characters() {
        let bold = FontStyle { bold: true, ..style(10.0) };
        // Helvetica-Bold O-dieresis is 778
        assert!((BuiltinMetrics.width_pt("ÖÖÖÖÖÖÖÖ", &bold) - 62.24).abs() < 1e-9);
        // Helvetica E-acute 667 + a 556
        assert!((BuiltinMetrics.width_pt("Éa", &style(10.0)) - 12.23).abs() < 1e-9);
        // O778 quoteright222 B667 r333 i222 e556 n556
        assert!((BuiltinMetrics.width_pt("O\u{2019}Brien", &style(10.0)) - 33.34).abs() < 1e-9);
    }

    #[test]
    fn test_unencodable_characters_measure_wide() {
        let width = BuiltinMetrics.width_pt("李", &style(10.0));
        assert!((width - 10.15).abs() < 1e-9);
        assert!(width >= BuiltinMetrics.width_pt("W", &serif(true, false)));
    }
}
