//! Navigation state machine: which level of the hierarchy is focused and
//! which overlays are layered on top of it.
//!
//! ```text
//!   Overview ──SelectYear──► YearDetail(y) ──SelectMonth──► + SidePanel(m)
//!      ▲                         │                              │
//!      └───────────Back──────────┘◄──────────ClosePanel─────────┤
//!                                                    SelectFile ▼
//!                                                     + FileModal(f)
//! ```
//!
//! `reduce` is the only place state changes. An event that does not apply
//! (unknown year, stale month, file not in the list...) returns
//! `Transition::Ignored` and leaves the state exactly as it was.

use serde::Serialize;
use std::hash::{Hash, Hasher};

use crate::model::{ArchiveFile, DataModel, MonthAggregate};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Bar,
    Area,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "view", rename_all = "camelCase")]
pub enum View {
    Overview,
    YearDetail { year: i32 },
}

/// Side panel for one month. Owns the only copy of that month's file list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidePanel {
    pub year: i32,
    pub month: u32,
    pub files: Vec<ArchiveFile>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavState {
    pub view: View,
    pub panel: Option<SidePanel>,
    pub modal: Option<ArchiveFile>,
    /// Overview year chart.
    pub evolution_chart: ChartKind,
    /// Year-detail month chart.
    pub monthly_chart: ChartKind,
    /// Applied transitions so far.
    pub seq: u64,
}

impl Default for NavState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    SelectYear(i32),
    Back,
    SelectMonth {
        year: i32,
        month: u32,
        files: Vec<ArchiveFile>,
    },
    SelectFile { id: String },
    CloseModal,
    ClosePanel,
    SetEvolutionChart(ChartKind),
    SetMonthlyChart(ChartKind),
}

impl NavEvent {
    pub fn name(&self) -> &'static str {
        match self {
            NavEvent::SelectYear(_) => "select_year",
            NavEvent::Back => "back",
            NavEvent::SelectMonth { .. } => "select_month",
            NavEvent::SelectFile { .. } => "select_file",
            NavEvent::CloseModal => "close_modal",
            NavEvent::ClosePanel => "close_panel",
            NavEvent::SetEvolutionChart(_) => "set_evolution_chart",
            NavEvent::SetMonthlyChart(_) => "set_monthly_chart",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    UnknownYear(i32),
    NotInOverview,
    AlreadyOverview,
    NoYearSelected,
    StaleYear { active: i32, requested: i32 },
    UnknownMonth(u32),
    NoPanel,
    NoModal,
    FileNotListed(String),
    ChartUnchanged(ChartKind),
}

impl std::fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IgnoreReason::UnknownYear(y) => write!(f, "unknown year {}", y),
            IgnoreReason::NotInOverview => f.write_str("year selection outside overview"),
            IgnoreReason::AlreadyOverview => f.write_str("already at overview"),
            IgnoreReason::NoYearSelected => f.write_str("no year selected"),
            IgnoreReason::StaleYear { active, requested } => {
                write!(f, "stale year {} (active {})", requested, active)
            }
            IgnoreReason::UnknownMonth(m) => write!(f, "unknown month {}", m),
            IgnoreReason::NoPanel => f.write_str("side panel not open"),
            IgnoreReason::NoModal => f.write_str("file modal not open"),
            IgnoreReason::FileNotListed(id) => write!(f, "file {} not in panel list", id),
            IgnoreReason::ChartUnchanged(kind) => write!(f, "chart already {:?}", kind),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Applied,
    Ignored(IgnoreReason),
}

impl Transition {
    pub fn is_applied(&self) -> bool {
        matches!(self, Transition::Applied)
    }
}

impl NavState {
    pub fn new() -> Self {
        Self {
            view: View::Overview,
            panel: None,
            modal: None,
            evolution_chart: ChartKind::Bar,
            monthly_chart: ChartKind::Area,
            seq: 0,
        }
    }

    pub fn active_year(&self) -> Option<i32> {
        match self.view {
            View::YearDetail { year } => Some(year),
            View::Overview => None,
        }
    }

    pub fn is_overview(&self) -> bool {
        self.view == View::Overview
    }

    pub fn files(&self) -> &[ArchiveFile] {
        self.panel.as_ref().map(|p| p.files.as_slice()).unwrap_or(&[])
    }

    /// Guard for month selection: the year must be the active one and the
    /// month must exist within it.
    pub fn check_month<'m>(
        &self,
        model: &'m DataModel,
        year: i32,
        month: u32,
    ) -> Result<&'m MonthAggregate, IgnoreReason> {
        let active = self.active_year().ok_or(IgnoreReason::NoYearSelected)?;
        if active != year {
            return Err(IgnoreReason::StaleYear { active, requested: year });
        }
        model
            .find_year(active)
            .ok_or(IgnoreReason::UnknownYear(active))?
            .month(month)
            .ok_or(IgnoreReason::UnknownMonth(month))
    }

    /// Deterministic state hash for log correlation.
    pub fn hash(&self) -> u64 {
        use std::collections::hash_map::DefaultHasher;

        let mut h = DefaultHasher::new();
        self.view.hash(&mut h);
        self.evolution_chart.hash(&mut h);
        self.monthly_chart.hash(&mut h);
        self.seq.hash(&mut h);
        if let Some(panel) = &self.panel {
            panel.year.hash(&mut h);
            panel.month.hash(&mut h);
            for f in &panel.files {
                f.id.hash(&mut h);
                f.size.hash(&mut h);
            }
        }
        if let Some(file) = &self.modal {
            file.id.hash(&mut h);
        }
        h.finish()
    }
}

/// Apply one event. Ignored events never touch `state`.
pub fn reduce(state: &mut NavState, event: NavEvent, model: &DataModel) -> Transition {
    let outcome = match event {
        NavEvent::SelectYear(year) => select_year(state, year, model),
        NavEvent::Back => back(state),
        NavEvent::SelectMonth { year, month, files } => select_month(state, year, month, files, model),
        NavEvent::SelectFile { id } => select_file(state, id),
        NavEvent::CloseModal => close_modal(state),
        NavEvent::ClosePanel => close_panel(state),
        NavEvent::SetEvolutionChart(kind) => set_chart(&mut state.evolution_chart, kind),
        NavEvent::SetMonthlyChart(kind) => set_chart(&mut state.monthly_chart, kind),
    };

    match outcome {
        Ok(()) => {
            state.seq += 1;
            Transition::Applied
        }
        Err(reason) => Transition::Ignored(reason),
    }
}

fn select_year(state: &mut NavState, year: i32, model: &DataModel) -> Result<(), IgnoreReason> {
    if !state.is_overview() {
        return Err(IgnoreReason::NotInOverview);
    }
    if model.find_year(year).is_none() {
        return Err(IgnoreReason::UnknownYear(year));
    }
    state.view = View::YearDetail { year };
    Ok(())
}

fn set_chart(slot: &mut ChartKind, kind: ChartKind) -> Result<(), IgnoreReason> {
    if *slot == kind {
        return Err(IgnoreReason::ChartUnchanged(kind));
    }
    *slot = kind;
    Ok(())
}

fn back(state: &mut NavState) -> Result<(), IgnoreReason> {
    if state.is_overview() {
        return Err(IgnoreReason::AlreadyOverview);
    }
    state.view = View::Overview;
    state.panel = None;
    state.modal = None;
    Ok(())
}

fn select_month(
    state: &mut NavState,
    year: i32,
    month: u32,
    files: Vec<ArchiveFile>,
    model: &DataModel,
) -> Result<(), IgnoreReason> {
    state.check_month(model, year, month)?;
    // A new list invalidates whatever file the modal was showing.
    state.modal = None;
    state.panel = Some(SidePanel { year, month, files });
    Ok(())
}

fn select_file(state: &mut NavState, id: String) -> Result<(), IgnoreReason> {
    let panel = state.panel.as_ref().ok_or(IgnoreReason::NoPanel)?;
    let file = panel
        .files
        .iter()
        .find(|f| f.id == id)
        .cloned()
        .ok_or(IgnoreReason::FileNotListed(id))?;
    state.modal = Some(file);
    Ok(())
}

fn close_modal(state: &mut NavState) -> Result<(), IgnoreReason> {
    state.modal.take().map(|_| ()).ok_or(IgnoreReason::NoModal)
}

fn close_panel(state: &mut NavState) -> Result<(), IgnoreReason> {
    if state.panel.is_none() {
        return Err(IgnoreReason::NoPanel);
    }
    state.panel = None;
    state.modal = None;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{GeneratorBounds, MockGenerator};
    use crate::i18n::Language;

    fn setup() -> (DataModel, MockGenerator) {
        let mut g = MockGenerator::with_seed(7, GeneratorBounds::default());
        let model = g.generate_model(&[2022, 2023], Language::En);
        (model, g)
    }

    fn open_month(state: &mut NavState, model: &DataModel, g: &mut MockGenerator, month: u32) {
        let year = state.active_year().unwrap();
        let files = g.generate_files_for_month(year, month);
        assert!(reduce(state, NavEvent::SelectMonth { year, month, files }, model).is_applied());
    }

    #[test]
    fn test_initial_state_is_overview() {
        let s = NavState::new();
        assert!(s.is_overview());
        assert!(s.panel.is_none());
        assert!(s.modal.is_none());
        assert_eq!(s.evolution_chart, ChartKind::Bar);
        assert_eq!(s.monthly_chart, ChartKind::Area);
    }

    #[test]
    fn test_select_known_year() {
        let (model, _) = setup();
        let mut s = NavState::new();
        assert_eq!(reduce(&mut s, NavEvent::SelectYear(2023), &model), Transition::Applied);
        assert_eq!(s.view, View::YearDetail { year: 2023 });
        assert_eq!(s.seq, 1);
    }

    #[test]
    fn test_unknown_year_is_noop() {
        let (model, _) = setup();
        let mut s = NavState::new();
        let before = s.clone();
        let t = reduce(&mut s, NavEvent::SelectYear(1999), &model);
        assert_eq!(t, Transition::Ignored(IgnoreReason::UnknownYear(1999)));
        assert_eq!(s, before);
    }

    #[test]
    fn test_year_selection_only_from_overview() {
        let (model, _) = setup();
        let mut s = NavState::new();
        reduce(&mut s, NavEvent::SelectYear(2023), &model);
        let t = reduce(&mut s, NavEvent::SelectYear(2022), &model);
        assert_eq!(t, Transition::Ignored(IgnoreReason::NotInOverview));
        assert_eq!(s.active_year(), Some(2023));
    }

    #[test]
    fn test_month_requires_active_year() {
        let (model, _) = setup();
        let mut s = NavState::new();
        let t = reduce(
            &mut s,
            NavEvent::SelectMonth { year: 2023, month: 6, files: Vec::new() },
            &model,
        );
        assert_eq!(t, Transition::Ignored(IgnoreReason::NoYearSelected));
        assert!(s.panel.is_none());
    }

    #[test]
    fn test_stale_month_event_is_noop() {
        let (model, _) = setup();
        let mut s = NavState::new();
        reduce(&mut s, NavEvent::SelectYear(2023), &model);
        let before = s.clone();
        let t = reduce(
            &mut s,
            NavEvent::SelectMonth { year: 2022, month: 6, files: Vec::new() },
            &model,
        );
        assert_eq!(
            t,
            Transition::Ignored(IgnoreReason::StaleYear { active: 2023, requested: 2022 })
        );
        assert_eq!(s, before);
    }

    #[test]
    fn test_unknown_month_is_noop() {
        let (model, _) = setup();
        let mut s = NavState::new();
        reduce(&mut s, NavEvent::SelectYear(2023), &model);
        let before = s.clone();
        let t = reduce(
            &mut s,
            NavEvent::SelectMonth { year: 2023, month: 13, files: Vec::new() },
            &model,
        );
        assert_eq!(t, Transition::Ignored(IgnoreReason::UnknownMonth(13)));
        assert_eq!(s, before);
    }

    #[test]
    fn test_select_file_must_be_listed() {
        let (model, mut g) = setup();
        let mut s = NavState::new();
        reduce(&mut s, NavEvent::SelectYear(2023), &model);
        open_month(&mut s, &model, &mut g, 6);

        let t = reduce(&mut s, NavEvent::SelectFile { id: "nope".to_string() }, &model);
        assert_eq!(t, Transition::Ignored(IgnoreReason::FileNotListed("nope".to_string())));
        assert!(s.modal.is_none());

        let target = s.files()[0].clone();
        let t = reduce(&mut s, NavEvent::SelectFile { id: target.id.clone() }, &model);
        assert!(t.is_applied());
        assert_eq!(s.modal.as_ref(), Some(&target));
    }

    #[test]
    fn test_select_file_without_panel() {
        let (model, _) = setup();
        let mut s = NavState::new();
        let t = reduce(&mut s, NavEvent::SelectFile { id: "2023-6-0".to_string() }, &model);
        assert_eq!(t, Transition::Ignored(IgnoreReason::NoPanel));
    }

    #[test]
    fn test_close_modal_keeps_panel_files() {
        let (model, mut g) = setup();
        let mut s = NavState::new();
        reduce(&mut s, NavEvent::SelectYear(2023), &model);
        open_month(&mut s, &model, &mut g, 6);
        let files = s.files().to_vec();
        let id = files[1].id.clone();
        reduce(&mut s, NavEvent::SelectFile { id }, &model);

        assert!(reduce(&mut s, NavEvent::CloseModal, &model).is_applied());
        assert!(s.modal.is_none());
        assert_eq!(s.files(), files.as_slice());
        assert_eq!(
            reduce(&mut s, NavEvent::CloseModal, &model),
            Transition::Ignored(IgnoreReason::NoModal)
        );
    }

    #[test]
    fn test_close_panel_discards_files_and_modal() {
        let (model, mut g) = setup();
        let mut s = NavState::new();
        reduce(&mut s, NavEvent::SelectYear(2023), &model);
        open_month(&mut s, &model, &mut g, 2);
        let id = s.files()[0].id.clone();
        reduce(&mut s, NavEvent::SelectFile { id }, &model);

        assert!(reduce(&mut s, NavEvent::ClosePanel, &model).is_applied());
        assert!(s.panel.is_none());
        assert!(s.modal.is_none());
        assert!(s.files().is_empty());
        assert_eq!(s.view, View::YearDetail { year: 2023 });
    }

    #[test]
    fn test_back_cascades_from_modal() {
        let (model, mut g) = setup();
        let mut s = NavState::new();
        reduce(&mut s, NavEvent::SelectYear(2023), &model);
        open_month(&mut s, &model, &mut g, 6);
        let id = s.files()[0].id.clone();
        reduce(&mut s, NavEvent::SelectFile { id }, &model);

        assert!(reduce(&mut s, NavEvent::Back, &model).is_applied());
        assert!(s.is_overview());
        assert!(s.panel.is_none());
        assert!(s.modal.is_none());
        assert_eq!(
            reduce(&mut s, NavEvent::Back, &model),
            Transition::Ignored(IgnoreReason::AlreadyOverview)
        );
    }

    #[test]
    fn test_reselecting_month_replaces_list_and_closes_modal() {
        let (model, mut g) = setup();
        let mut s = NavState::new();
        reduce(&mut s, NavEvent::SelectYear(2023), &model);
        open_month(&mut s, &model, &mut g, 6);
        let first = s.files().to_vec();
        let id = first[0].id.clone();
        reduce(&mut s, NavEvent::SelectFile { id }, &model);

        open_month(&mut s, &model, &mut g, 6);
        assert_ne!(s.files(), first.as_slice());
        assert!(s.modal.is_none());
        assert_eq!(s.panel.as_ref().map(|p| p.month), Some(6));
    }

    #[test]
    fn test_chart_toggles_leave_overlays_alone() {
        let (model, mut g) = setup();
        let mut s = NavState::new();
        reduce(&mut s, NavEvent::SelectYear(2023), &model);
        open_month(&mut s, &model, &mut g, 4);
        let panel = s.panel.clone();

        reduce(&mut s, NavEvent::SetMonthlyChart(ChartKind::Bar), &model);
        reduce(&mut s, NavEvent::SetEvolutionChart(ChartKind::Area), &model);
        assert_eq!(s.monthly_chart, ChartKind::Bar);
        assert_eq!(s.evolution_chart, ChartKind::Area);
        assert_eq!(s.panel, panel);
    }

    #[test]
    fn test_setting_current_chart_kind_is_noop() {
        let (model, _) = setup();
        let mut s = NavState::new();
        let before = s.clone();
        assert_eq!(
            reduce(&mut s, NavEvent::SetEvolutionChart(ChartKind::Bar), &model),
            Transition::Ignored(IgnoreReason::ChartUnchanged(ChartKind::Bar))
        );
        assert_eq!(
            reduce(&mut s, NavEvent::SetMonthlyChart(ChartKind::Area), &model),
            Transition::Ignored(IgnoreReason::ChartUnchanged(ChartKind::Area))
        );
        assert_eq!(s, before);
        assert_eq!(s.seq, 0);

        assert!(reduce(&mut s, NavEvent::SetMonthlyChart(ChartKind::Bar), &model).is_applied());
        assert_eq!(s.seq, 1);
    }

    #[test]
    fn test_hash_tracks_state() {
        let (model, _) = setup();
        let mut a = NavState::new();
        let b = NavState::new();
        assert_eq!(a.hash(), b.hash());
        reduce(&mut a, NavEvent::SelectYear(2022), &model);
        assert_ne!(a.hash(), b.hash());
    }
}
