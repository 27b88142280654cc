//! Drill-down controller: turns chart and list selections into state
//! transitions, fetches file batches from the generator, and exposes what the
//! presentation layer needs to draw.
//!
//! Every entry point runs to completion before returning. The caller sees
//! either the old state or the fully updated one (transition applied and file
//! list populated), never anything in between.

use serde::Serialize;
use std::sync::Arc;

use crate::generator::MockGenerator;
use crate::i18n::{self, Language};
use crate::logging;
use crate::model::{ArchiveFile, DataModel, GlobalSummary, MonthAggregate, YearAggregate};
use crate::navigation::{reduce, ChartKind, IgnoreReason, NavEvent, NavState, Transition, View};
use crate::units;

pub struct DrillDownController {
    model: Arc<DataModel>,
    generator: MockGenerator,
    nav: NavState,
    language: Language,
}

impl DrillDownController {
    pub fn new(model: Arc<DataModel>, generator: MockGenerator, language: Language) -> Self {
        Self {
            model,
            generator,
            nav: NavState::new(),
            language,
        }
    }

    pub fn model(&self) -> &DataModel {
        &self.model
    }

    pub fn state(&self) -> &NavState {
        &self.nav
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn toggle_language(&mut self) -> Language {
        self.language = self.language.toggle();
        self.language
    }

    // -------------------------------------------------------------------------
    // Entry points
    // -------------------------------------------------------------------------

    /// Year bar/point clicked on the overview chart.
    pub fn on_year_selected(&mut self, year: i32) -> Transition {
        if self.model.find_year(year).is_none() {
            return self.ignore("select_year", IgnoreReason::UnknownYear(year));
        }
        self.dispatch(NavEvent::SelectYear(year))
    }

    /// Month bar/point clicked on the year chart. Events for a year other
    /// than the one on screen are dropped.
    pub fn on_month_selected(&mut self, year: i32, month: u32) -> Transition {
        if let Err(reason) = self.nav.check_month(&self.model, year, month) {
            return self.ignore("select_month", reason);
        }
        let files = self.generator.generate_files_for_month(year, month);
        logging::log_files_generated(
            year,
            month,
            files.len(),
            files.first().map(|f| f.size).unwrap_or(0),
        );
        self.dispatch(NavEvent::SelectMonth { year, month, files })
    }

    /// Row clicked in the side panel.
    pub fn on_file_selected(&mut self, file: &ArchiveFile) -> Transition {
        self.dispatch(NavEvent::SelectFile { id: file.id.clone() })
    }

    pub fn back(&mut self) -> Transition {
        self.dispatch(NavEvent::Back)
    }

    pub fn close_panel(&mut self) -> Transition {
        self.dispatch(NavEvent::ClosePanel)
    }

    pub fn close_modal(&mut self) -> Transition {
        self.dispatch(NavEvent::CloseModal)
    }

    pub fn set_evolution_chart(&mut self, kind: ChartKind) -> Transition {
        self.dispatch(NavEvent::SetEvolutionChart(kind))
    }

    pub fn set_monthly_chart(&mut self, kind: ChartKind) -> Transition {
        self.dispatch(NavEvent::SetMonthlyChart(kind))
    }

    fn dispatch(&mut self, event: NavEvent) -> Transition {
        let name = event.name();
        let outcome = reduce(&mut self.nav, event, &self.model);
        match &outcome {
            Transition::Applied => logging::log_transition(
                name,
                view_name(&self.nav.view),
                self.nav.hash(),
                self.nav.seq,
            ),
            Transition::Ignored(reason) => logging::log_ignored(name, &reason.to_string()),
        }
        outcome
    }

    fn ignore(&self, event: &str, reason: IgnoreReason) -> Transition {
        logging::log_ignored(event, &reason.to_string());
        Transition::Ignored(reason)
    }

    // -------------------------------------------------------------------------
    // Data handed to the presentation layer
    // -------------------------------------------------------------------------

    pub fn year_series(&self) -> &[YearAggregate] {
        self.model.years()
    }

    pub fn summary(&self) -> GlobalSummary {
        self.model.summary()
    }

    /// The focused year's 12-month series, if a year is focused.
    pub fn month_series(&self) -> Option<&[MonthAggregate]> {
        let year = self.nav.active_year()?;
        self.model.find_year(year).map(|y| y.months.as_slice())
    }

    pub fn files(&self) -> &[ArchiveFile] {
        self.nav.files()
    }

    pub fn selected_file(&self) -> Option<&ArchiveFile> {
        self.nav.modal.as_ref()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        let view = match self.nav.view {
            View::YearDetail { year } => self.model.find_year(year).map(|y| ViewSnapshot::YearDetail {
                year: y.year,
                file_count: y.file_count,
                total_size: y.total_size,
                total_size_label: units::format_size(y.total_size),
                months: &y.months,
                month_labels: y
                    .months
                    .iter()
                    .map(|m| i18n::month_name(self.language, m.month).unwrap_or_default())
                    .collect(),
                chart: self.nav.monthly_chart,
            }),
            View::Overview => None,
        };
        let view = view.unwrap_or_else(|| {
            let summary = self.model.summary();
            ViewSnapshot::Overview {
                years: self.model.years(),
                summary,
                total_size_label: units::format_size(summary.total_size),
                year_span: self.model.year_span(),
                chart: self.nav.evolution_chart,
            }
        });

        let panel = self.nav.panel.as_ref().map(|p| PanelSnapshot {
            title: format!(
                "{} {}",
                i18n::month_name(self.language, p.month).unwrap_or_default(),
                p.year
            ),
            year: p.year,
            month: p.month,
            files: &p.files,
        });

        let modal = self.nav.modal.as_ref().map(|file| FileDetail {
            size_label: units::format_size(file.size),
            file,
        });

        Snapshot {
            language: self.language,
            seq: self.nav.seq,
            view,
            panel,
            modal,
        }
    }
}

fn view_name(view: &View) -> &'static str {
    match view {
        View::Overview => "overview",
        View::YearDetail { .. } => "year_detail",
    }
}

/// Everything the presentation layer renders after an event.
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub language: Language,
    pub seq: u64,
    pub view: ViewSnapshot<'a>,
    pub panel: Option<PanelSnapshot<'a>>,
    pub modal: Option<FileDetail<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "view", rename_all = "camelCase")]
pub enum ViewSnapshot<'a> {
    Overview {
        years: &'a [YearAggregate],
        summary: GlobalSummary,
        #[serde(rename = "totalSizeLabel")]
        total_size_label: String,
        #[serde(rename = "yearSpan")]
        year_span: Option<(i32, i32)>,
        chart: ChartKind,
    },
    YearDetail {
        year: i32,
        #[serde(rename = "fileCount")]
        file_count: u64,
        #[serde(rename = "totalSize")]
        total_size: u64,
        #[serde(rename = "totalSizeLabel")]
        total_size_label: String,
        months: &'a [MonthAggregate],
        #[serde(rename = "monthLabels")]
        month_labels: Vec<&'static str>,
        chart: ChartKind,
    },
}

#[derive(Debug, Serialize)]
pub struct PanelSnapshot<'a> {
    pub title: String,
    pub year: i32,
    pub month: u32,
    pub files: &'a [ArchiveFile],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDetail<'a> {
    #[serde(flatten)]
    pub file: &'a ArchiveFile,
    pub size_label: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GeneratorBounds;

    fn controller() -> DrillDownController {
        let mut g = MockGenerator::with_seed(11, GeneratorBounds::default());
        let model = Arc::new(g.generate_model(&[2021, 2022, 2023, 2024, 2025], Language::En));
        DrillDownController::new(model, g, Language::En)
    }

    #[test]
    fn test_unknown_year_untouched() {
        let mut c = controller();
        let before = c.state().clone();
        assert_eq!(
            c.on_year_selected(1990),
            Transition::Ignored(IgnoreReason::UnknownYear(1990))
        );
        assert_eq!(c.state(), &before);
    }

    #[test]
    fn test_month_series_follows_year() {
        let mut c = controller();
        assert!(c.month_series().is_none());
        c.on_year_selected(2024);
        let months = c.month_series().unwrap();
        assert_eq!(months, c.model().find_year(2024).unwrap().months.as_slice());
    }

    #[test]
    fn test_month_fetch_populates_panel() {
        let mut c = controller();
        c.on_year_selected(2023);
        assert!(c.on_month_selected(2023, 6).is_applied());
        assert!((10..=20).contains(&c.files().len()));
        assert_eq!(c.state().panel.as_ref().map(|p| p.month), Some(6));
    }

    #[test]
    fn test_stale_month_skips_generation() {
        let mut c = controller();
        c.on_year_selected(2023);
        let before = c.state().clone();
        let t = c.on_month_selected(2021, 6);
        assert!(!t.is_applied());
        assert_eq!(c.state(), &before);
        assert!(c.files().is_empty());
    }

    #[test]
    fn test_out_of_range_month_ignored_not_panicking() {
        let mut c = controller();
        c.on_year_selected(2023);
        assert_eq!(
            c.on_month_selected(2023, 0),
            Transition::Ignored(IgnoreReason::UnknownMonth(0))
        );
    }

    #[test]
    fn test_snapshot_overview() {
        let c = controller();
        let v = serde_json::to_value(c.snapshot()).unwrap();
        assert_eq!(v["view"]["view"], "overview");
        assert_eq!(v["view"]["years"].as_array().unwrap().len(), 5);
        assert_eq!(v["view"]["summary"]["yearsCount"], 5);
        assert_eq!(v["view"]["yearSpan"], serde_json::json!([2021, 2025]));
        assert_eq!(v["view"]["chart"], "bar");
        assert!(v["panel"].is_null());
        assert!(v["modal"].is_null());
    }

    #[test]
    fn test_snapshot_modal_fields() {
        let mut c = controller();
        c.on_year_selected(2023);
        c.on_month_selected(2023, 6);
        let file = c.files()[0].clone();
        c.on_file_selected(&file);

        let v = serde_json::to_value(c.snapshot()).unwrap();
        assert_eq!(v["view"]["view"], "yearDetail");
        assert_eq!(v["view"]["monthLabels"][5], "June");
        assert_eq!(v["panel"]["title"], "June 2023");
        assert_eq!(v["modal"]["id"], file.id.as_str());
        assert_eq!(v["modal"]["size"], file.size);
        assert_eq!(v["modal"]["type"], file.file_type.as_str());
        assert_eq!(v["modal"]["sourceTable"], file.source_table.as_str());
        assert_eq!(v["modal"]["sizeLabel"], units::format_size(file.size).as_str());
    }

    #[test]
    fn test_language_toggle_relabels_panel() {
        let mut c = controller();
        c.on_year_selected(2023);
        c.on_month_selected(2023, 6);
        assert_eq!(c.toggle_language(), Language::PtBr);
        assert_eq!(c.snapshot().panel.unwrap().title, "junho 2023");
    }
}
