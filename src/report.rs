//! File distribution report: one row per year, expandable into one row per
//! file type, with a grand-total footer.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::Write;

use crate::i18n::{translate, Language, TextKey};
use crate::model::{summarize, DataModel};
use crate::units::{group_thousands, to_gb, to_mb};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Year,
    FileType,
    Total,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub kind: RowKind,
    pub label: String,
    pub count: u64,
    pub size: u64,
    pub count_label: String,
    pub size_mb: String,
    pub size_gb: String,
    /// Only meaningful on year rows.
    pub expanded: bool,
}

impl ReportRow {
    fn new(kind: RowKind, label: String, count: u64, size: u64, expanded: bool) -> Self {
        Self {
            kind,
            label,
            count,
            size,
            count_label: group_thousands(count),
            size_mb: to_mb(size),
            size_gb: to_gb(size),
            expanded,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistributionReport {
    expanded: BTreeSet<i32>,
}

impl DistributionReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a year open/closed. Returns whether it is now expanded.
    pub fn toggle_year(&mut self, year: i32) -> bool {
        if self.expanded.remove(&year) {
            false
        } else {
            self.expanded.insert(year);
            true
        }
    }

    pub fn is_expanded(&self, year: i32) -> bool {
        self.expanded.contains(&year)
    }

    pub fn expanded_count(&self) -> usize {
        self.expanded.len()
    }

    /// Year rows in model order, each followed by its type rows when expanded.
    pub fn rows(&self, model: &DataModel) -> Vec<ReportRow> {
        let mut rows = Vec::new();
        for y in model.years() {
            let expanded = self.is_expanded(y.year);
            rows.push(ReportRow::new(
                RowKind::Year,
                y.year.to_string(),
                y.file_count,
                y.total_size,
                expanded,
            ));
            if expanded {
                rows.extend(y.file_type_distribution.iter().map(|t| {
                    ReportRow::new(RowKind::FileType, t.file_type.to_string(), t.count, t.size, false)
                }));
            }
        }
        rows
    }

    pub fn footer(&self, model: &DataModel, lang: Language) -> ReportRow {
        let s = summarize(model.years());
        ReportRow::new(
            RowKind::Total,
            translate(lang, TextKey::Total).to_string(),
            s.total_files,
            s.total_size,
            false,
        )
    }

    /// Plain-text table for terminals.
    pub fn render_table(&self, model: &DataModel, lang: Language) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", translate(lang, TextKey::FileDistributionReportTitle));
        let _ = writeln!(
            out,
            "{:<22} {:>14} {:>16} {:>14}",
            translate(lang, TextKey::ExerciseExtension),
            translate(lang, TextKey::QuantityFiles),
            translate(lang, TextKey::SizeMb),
            translate(lang, TextKey::SizeGb),
        );
        for row in self.rows(model) {
            let label = match row.kind {
                RowKind::Year if row.expanded => format!("v {}", row.label),
                RowKind::Year => format!("> {}", row.label),
                _ => format!("    {}", row.label),
            };
            let _ = writeln!(
                out,
                "{:<22} {:>14} {:>16} {:>14}",
                label, row.count_label, row.size_mb, row.size_gb
            );
        }
        let total = self.footer(model, lang);
        let _ = writeln!(
            out,
            "{:<22} {:>14} {:>16} {:>14}",
            total.label, total.count_label, total.size_mb, total.size_gb
        );
        out
    }
}
