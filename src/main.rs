//! Drive a scripted drill-down session and print what the dashboard would
//! render after each step.
//!
//! ```text
//! archive-insight year:2023 month:6 file:0 back report:2023
//! ```

use std::sync::Arc;

use anyhow::{bail, Context, Result};

use archive_insight::config::Config;
use archive_insight::controller::DrillDownController;
use archive_insight::generator::MockGenerator;
use archive_insight::logging::{log_ignored, log_model_built, log_report_rendered, log_session_summary};
use archive_insight::model::check_month;
use archive_insight::navigation::{ChartKind, IgnoreReason, Transition, View};
use archive_insight::report::DistributionReport;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Year(i32),
    Month(u32),
    File(usize),
    CloseModal,
    ClosePanel,
    Back,
    Lang,
    Report(Option<i32>),
    EvolutionChart(ChartKind),
    MonthlyChart(ChartKind),
}

fn parse_chart(s: &str) -> Result<ChartKind> {
    match s {
        "bar" => Ok(ChartKind::Bar),
        "area" => Ok(ChartKind::Area),
        other => bail!("unknown chart kind: {}", other),
    }
}

fn parse_step(arg: &str) -> Result<Step> {
    let mut parts = arg.splitn(3, ':');
    let head = parts.next().unwrap_or_default();
    let value = parts.next();
    let step = match (head, value) {
        ("year", Some(v)) => Step::Year(v.parse().with_context(|| format!("bad year in {}", arg))?),
        ("month", Some(v)) => {
            let m: u32 = v.parse().with_context(|| format!("bad month in {}", arg))?;
            Step::Month(check_month(m)?)
        }
        ("file", Some(v)) => Step::File(v.parse().with_context(|| format!("bad file index in {}", arg))?),
        ("close-modal", None) => Step::CloseModal,
        ("close-panel", None) => Step::ClosePanel,
        ("back", None) => Step::Back,
        ("lang", None) => Step::Lang,
        ("report", None) => Step::Report(None),
        ("report", Some(v)) => Step::Report(Some(v.parse().with_context(|| format!("bad year in {}", arg))?)),
        ("chart", Some("evolution")) => Step::EvolutionChart(parse_chart(parts.next().unwrap_or_default())?),
        ("chart", Some("monthly")) => Step::MonthlyChart(parse_chart(parts.next().unwrap_or_default())?),
        _ => bail!("unknown step: {}", arg),
    };
    Ok(step)
}

/// Outcome counts for the session summary. Report steps are not counted.
#[derive(Debug, Default, PartialEq, Eq)]
struct Tally {
    applied: usize,
    ignored: usize,
}

impl Tally {
    fn record(&mut self, outcome: &Transition) {
        match outcome {
            Transition::Applied => self.applied += 1,
            Transition::Ignored(_) => self.ignored += 1,
        }
    }
}

/// Run one navigation step against the controller. `None` for report steps.
fn apply_step(ctl: &mut DrillDownController, step: &Step) -> Option<Transition> {
    let outcome = match *step {
        Step::Year(y) => ctl.on_year_selected(y),
        Step::Month(m) => match ctl.state().active_year() {
            Some(y) => ctl.on_month_selected(y, m),
            None => {
                log_ignored("select_month", "no year selected");
                Transition::Ignored(IgnoreReason::NoYearSelected)
            }
        },
        Step::File(idx) => match ctl.files().get(idx).cloned() {
            Some(file) => ctl.on_file_selected(&file),
            None => {
                let reason = if ctl.state().panel.is_none() {
                    IgnoreReason::NoPanel
                } else {
                    IgnoreReason::FileNotListed(format!("#{}", idx))
                };
                log_ignored("select_file", &reason.to_string());
                Transition::Ignored(reason)
            }
        },
        Step::CloseModal => ctl.close_modal(),
        Step::ClosePanel => ctl.close_panel(),
        Step::Back => ctl.back(),
        Step::Lang => {
            ctl.toggle_language();
            Transition::Applied
        }
        Step::EvolutionChart(kind) => ctl.set_evolution_chart(kind),
        Step::MonthlyChart(kind) => ctl.set_monthly_chart(kind),
        // Rendered by the caller; not a navigation step.
        Step::Report(_) => return None,
    };
    Some(outcome)
}

fn print_snapshot(ctl: &DrillDownController) -> Result<()> {
    println!("{}", serde_json::to_string(&ctl.snapshot())?);
    Ok(())
}

fn main() -> Result<()> {
    let cfg = Config::from_env().context("loading config")?;
    let steps = std::env::args()
        .skip(1)
        .map(|a| parse_step(&a))
        .collect::<Result<Vec<_>>>()?;

    let mut generator = match cfg.seed {
        Some(seed) => MockGenerator::with_seed(seed, cfg.bounds()),
        None => MockGenerator::from_entropy(cfg.bounds()),
    };
    let model = Arc::new(generator.generate_model(&cfg.years, cfg.language));
    let summary = model.summary();
    log_model_built(summary.years_count, summary.total_files, summary.total_size, cfg.seed.is_some());

    let mut ctl = DrillDownController::new(Arc::clone(&model), generator, cfg.language);
    let mut report = DistributionReport::new();
    let mut tally = Tally::default();

    print_snapshot(&ctl)?;
    for step in &steps {
        if let Step::Report(year) = *step {
            if let Some(y) = year {
                report.toggle_year(y);
            }
            let rows = report.rows(ctl.model());
            log_report_rendered(rows.len(), report.expanded_count());
            print!("{}", report.render_table(ctl.model(), ctl.language()));
            continue;
        }
        if let Some(outcome) = apply_step(&mut ctl, step) {
            tally.record(&outcome);
        }
        print_snapshot(&ctl)?;
    }

    let final_view = match ctl.state().view {
        View::Overview => "overview",
        View::YearDetail { .. } => "year_detail",
    };
    log_session_summary(steps.len(), tally.applied, tally.ignored, final_view);
    Ok(())
}
