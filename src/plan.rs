// tentcard-pdf: a serialisable summary of a full layout pass

use serde::Serialize;

use crate::layout::{paginate, plates_per_page, ruler_ticks, PaperDimensions, RulerTick};
use crate::metrics::TextMetrics;
use crate::model::{AppConfig, NameEntry};
use crate::sizing::{layout_card, FontSizes};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPlan {
    pub id: String,
    pub line1: String,
    pub line2: String,
    pub sizes: FontSizes,
    pub main_fit_scale: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_fit_scale: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePlan {
    pub number: usize,
    pub cards: Vec<CardPlan>,
    pub start_y: f64,
    pub end_y: f64,
    pub start_x: f64,
    pub end_x: f64,
    pub horizontal_lines: Vec<f64>,
    pub vertical_lines: [f64; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rulers: Option<PageRulers>,
}

/// Screen-only alignment rulers for one page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRulers {
    /// Along the left and right edges, top to bottom
    pub vertical: Vec<RulerTick>,
    /// Along the bottom edge, left to right
    pub horizontal: Vec<RulerTick>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPlan {
    pub paper: PaperDimensions,
    pub plates_per_page: usize,
    pub pages: Vec<PagePlan>,
}

/// Paginate the printable entries and size every card.
pub fn plan_layout<M: TextMetrics + ?Sized>(
    config: &AppConfig,
    entries: &[NameEntry],
    metrics: &M,
    with_rulers: bool,
) -> LayoutPlan {
    let paper = PaperDimensions::for_config(config);
    let printable: Vec<NameEntry> = entries.iter().filter(|n| n.is_printable()).cloned().collect();
    let full_height = config.plate_full_height_cm();

    let pages = paginate(config, &printable)
        .into_iter()
        .enumerate()
        .map(|(i, page)| PagePlan {
            number: i + 1,
            horizontal_lines: page.horizontal_lines(full_height),
            vertical_lines: page.vertical_lines(),
            rulers: with_rulers.then(|| PageRulers {
                vertical: ruler_ticks(paper.height_cm, page.start_y, page.end_y),
                horizontal: ruler_ticks(paper.width_cm, page.start_x, page.end_x),
            }),
            cards: page
                .entries
                .iter()
                .map(|entry| {
                    let card = layout_card(config, entry, metrics);
                    CardPlan {
                        id: entry.id.clone(),
                        line1: entry.line1.clone(),
                        line2: entry.line2.clone(),
                        sizes: card.sizes,
                        main_fit_scale: card.main.fit_scale,
                        secondary_fit_scale: card.secondary.map(|l| l.fit_scale),
                    }
                })
                .collect(),
            start_y: page.start_y,
            end_y: page.end_y,
            start_x: page.start_x,
            end_x: page.end_x,
        })
        .collect();

    LayoutPlan {
        paper,
        plates_per_page: plates_per_page(config),
        pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::BuiltinMetrics;
    use crate::names::parse_bulk_text;

    #[test]
    fn test_plan_skips_blank_main_lines() {
        let mut names = parse_bulk_text("Ada, Analyst\nGrace Hopper");
        names.push(NameEntry::new("blank", "  ", "nobody"));
        let plan = plan_layout(&AppConfig::default(), &names, &BuiltinMetrics, false);
        assert_eq!(plan.plates_per_page, 1);
        assert_eq!(plan.pages.len(), 2);
        assert_eq!(plan.pages[1].number, 2);
        assert_eq!(plan.pages[0].cards[0].line2, "Analyst");
        assert!(plan.pages[1].cards[0].secondary_fit_scale.is_none());
    }

    #[test]
    fn test_plan_serialises_camel_case() {
        let plan = plan_layout(&AppConfig::default(), &parse_bulk_text("Ada"), &BuiltinMetrics, false);
        let json = serde_json::to_value(&plan).unwrap();
        assert!(json["pages"][0].get("rulers").is_none());
        assert_eq!(json["platesPerPage"], 1);
        assert!(json["pages"][0]["horizontalLines"].is_array());
        assert!(json["pages"][0]["cards"][0]["sizes"]["mainPt"].is_number());
    }

    #[test]
    fn test_plan_rulers_follow_paper() {
        let plan = plan_layout(&AppConfig::default(), &parse_bulk_text("Ada"), &BuiltinMetrics, true);
        let rulers = plan.pages[0].rulers.as_ref().unwrap();
        // Landscape A4: 21.0cm tall, 29.7cm wide
        assert_eq!(rulers.vertical.len(), 211);
        assert_eq!(rulers.horizontal.len(), 298);
        assert!(rulers.horizontal.iter().any(|t| t.active));
    }
}
