// tentcard-pdf: bulk name parsing and name list editing

use tracing::debug;

use crate::model::{NameEntry, MAX_ENTRY_SCALE, MIN_ENTRY_SCALE};

/// Zoom step for the per-entry size controls
pub const SCALE_STEP: f64 = 0.1;

fn is_separator(c: char) -> bool {
    matches!(c, ',' | '-' | '\u{2013}' | '\u{2014}')
}

/// Split one line at its first run of separators. The rest of the line,
/// further separators included, becomes the second line. A separator run at
/// the very end only splits if it can leave one character behind.
fn split_line(line: &str) -> (&str, &str) {
    let Some(start) = line.find(is_separator) else {
        return (line, "");
    };

    let after_run = line[start..]
        .char_indices()
        .find(|(_, c)| !is_separator(*c))
        .map(|(i, _)| start + i)
        .unwrap_or(line.len());

    if after_run < line.len() {
        return (&line[..start], &line[after_run..]);
    }

    // Only separators remain: keep the last one as the second line
    match line[start..].char_indices().last() {
        Some((i, _)) if i > 0 => (&line[..start], &line[start + i..]),
        _ => (line, ""),
    }
}

/// Parse pasted text, one card per non-blank line, e.g. `"Jane Smith - CTO"`.
///
/// Ids are positional (`bulk-0`, `bulk-1`, ...) and scales reset to 1, so a
/// re-parse always replaces the whole list.
pub fn parse_bulk_text(text: &str) -> Vec<NameEntry> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(idx, line)| {
            let (line1, line2) = split_line(line);
            NameEntry::new(format!("bulk-{}", idx), line1.trim(), line2.trim())
        })
        .collect()
}

/// Inverse of `parse_bulk_text` for display in the bulk editor.
pub fn to_bulk_text(entries: &[NameEntry]) -> String {
    entries
        .iter()
        .map(|n| {
            if n.line2.is_empty() {
                n.line1.clone()
            } else {
                format!("{}, {}", n.line1, n.line2)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// Name List
// ============================================================================

/// The editable list of cards
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameList {
    entries: Vec<NameEntry>,
    next_manual_id: u64,
}

impl NameList {
    pub fn new(entries: Vec<NameEntry>) -> Self {
        Self {
            entries,
            next_manual_id: 0,
        }
    }

    pub fn entries(&self) -> &[NameEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<NameEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries that produce a card.
    pub fn printable(&self) -> Vec<NameEntry> {
        self.entries.iter().filter(|n| n.is_printable()).cloned().collect()
    }

    /// Append one entry. Blank main lines are rejected.
    pub fn add_manual(&mut self, line1: &str, line2: &str) -> Option<&NameEntry> {
        if line1.trim().is_empty() {
            return None;
        }

        let id = loop {
            self.next_manual_id += 1;
            let candidate = format!("manual-{}", self.next_manual_id);
            if !self.entries.iter().any(|n| n.id == candidate) {
                break candidate;
            }
        };
        self.entries.push(NameEntry::new(id, line1, line2));
        self.entries.last()
    }

    /// Remove the entry with `id`, returning it.
    pub fn remove(&mut self, id: &str) -> Option<NameEntry> {
        let index = self.entries.iter().position(|n| n.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Nudge one entry's manual scale, clamped to [0.5, 2.0]. Returns the
    /// new scale.
    pub fn adjust_scale(&mut self, id: &str, delta: f64) -> Option<f64> {
        let entry = self.entries.iter_mut().find(|n| n.id == id)?;
        let current = entry.scale.filter(|s| s.is_finite() && *s > 0.0).unwrap_or(1.0);
        let scale = (current + delta).clamp(MIN_ENTRY_SCALE, MAX_ENTRY_SCALE);
        entry.scale = Some(scale);
        Some(scale)
    }

    /// Replace everything with the parsed bulk text.
    pub fn replace_from_bulk(&mut self, text: &str) {
        self.entries = parse_bulk_text(text);
        debug!(count = self.entries.len(), "name list replaced from bulk text");
    }

    pub fn to_bulk_text(&self) -> String {
        to_bulk_text(&self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(entries: &[NameEntry]) -> Vec<(&str, &str)> {
        entries.iter().map(|n| (n.line1.as_str(), n.line2.as_str())).collect()
    }

    #[test]
    fn test_parse_mixed_separators() {
        let entries = parse_bulk_text("John Doe, CEO\nJane Smith - Manager\nSolo Name");
        assert_eq!(
            lines(&entries),
            vec![("John Doe", "CEO"), ("Jane Smith", "Manager"), ("Solo Name", "")]
        );
        assert_eq!(entries[0].id, "bulk-0");
        assert_eq!(entries[2].id, "bulk-2");
        assert!(entries.iter().all(|n| n.scale == Some(1.0)));
    }

    #[test]
    fn test_parse_skips_blank_lines_and_numbers_kept_lines() {
        let entries = parse_bulk_text("\n  \nAda Lovelace\n\t\nAlan Turing, Bletchley\r\n");
        assert_eq!(lines(&entries), vec![("Ada Lovelace", ""), ("Alan Turing", "Bletchley")]);
        assert_eq!(entries[1].id, "bulk-1");
    }

    #[test]
    fn test_parse_keeps_later_separators_in_second_line() {
        let entries = parse_bulk_text("Dr. Alice Brown, Research Director, OpenAI");
        assert_eq!(lines(&entries), vec![("Dr. Alice Brown", "Research Director, OpenAI")]);

        let entries = parse_bulk_text("Mary-Jane Watson, Daily Bugle");
        assert_eq!(lines(&entries), vec![("Mary", "Jane Watson, Daily Bugle")]);
    }

    #[test]
    fn test_parse_separator_runs_and_dashes() {
        assert_eq!(lines(&parse_bulk_text("Ann -- Chair")), vec![("Ann", "Chair")]);
        assert_eq!(lines(&parse_bulk_text("Ann \u{2014} Chair")), vec![("Ann", "Chair")]);
        assert_eq!(lines(&parse_bulk_text("Bob \u{2013} Treasurer")), vec![("Bob", "Treasurer")]);
    }

    #[test]
    fn test_parse_trailing_separator() {
        assert_eq!(lines(&parse_bulk_text("Ann,")), vec![("Ann,", "")]);
        assert_eq!(lines(&parse_bulk_text("Ann, ")), vec![("Ann", "")]);
        assert_eq!(lines(&parse_bulk_text("Ann--")), vec![("Ann", "-")]);
    }

    #[test]
    fn test_bulk_text_round_trip() {
        let text = "John Doe, CEO\nSolo Name";
        assert_eq!(to_bulk_text(&parse_bulk_text(text)), text);
    }

    #[test]
    fn test_add_manual_rejects_blank() {
        let mut list = NameList::default();
        assert!(list.add_manual("   ", "CTO").is_none());
        let added = list.add_manual("Jane", "CTO").cloned().unwrap();
        assert_eq!(added.id, "manual-1");
        assert_eq!(added.scale, Some(1.0));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_add_manual_ids_are_unique() {
        let mut list = NameList::new(vec![NameEntry::new("manual-1", "Existing", "")]);
        let id = list.add_manual("New", "").map(|n| n.id.clone()).unwrap();
        assert_eq!(id, "manual-2");
    }

    #[test]
    fn test_remove_by_id() {
        let mut list = NameList::new(parse_bulk_text("A\nB\nC"));
        let removed = list.remove("bulk-1").unwrap();
        assert_eq!(removed.line1, "B");
        assert_eq!(list.to_bulk_text(), "A\nC");
        assert!(list.remove("bulk-1").is_none());
    }

    #[test]
    fn test_adjust_scale_clamps() {
        let mut list = NameList::new(parse_bulk_text("A"));
        for _ in 0..30 {
            list.adjust_scale("bulk-0", SCALE_STEP);
        }
        assert_eq!(list.entries()[0].scale, Some(2.0));
        for _ in 0..30 {
            list.adjust_scale("bulk-0", -SCALE_STEP);
        }
        assert_eq!(list.entries()[0].scale, Some(0.5));
        assert!(list.adjust_scale("missing", SCALE_STEP).is_none());
    }

    #[test]
    fn test_bulk_replace_resets_manual_scales() {
        let mut list = NameList::new(parse_bulk_text("A\nB"));
        list.adjust_scale("bulk-0", 0.5);
        list.replace_from_bulk("A\nB\nC");
        assert_eq!(list.len(), 3);
        assert!(list.entries().iter().all(|n| n.scale == Some(1.0)));
    }

    #[test]
    fn test_into_entries_keeps_edits_in_order() {
        let mut list = NameList::new(parse_bulk_text("A\nB"));
        list.add_manual("C", "Chair");
        list.remove("bulk-0");
        list.adjust_scale("manual-1", SCALE_STEP);
        let entries = list.into_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "bulk-1");
        assert_eq!(entries[1].line2, "Chair");
        assert_eq!(entries[1].scale, Some(1.1));
    }

    #[test]
    fn test_printable_filters_blank_main_lines() {
        let list = NameList::new(vec![NameEntry::new("1", "Ann", ""), NameEntry::new("2", " ", "CTO")]);
        assert_eq!(list.printable().len(), 1);
        assert!(!list.is_empty());
    }
}
