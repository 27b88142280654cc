//! Drill-down analytics core for an archived-document dashboard.
//!
//! Years -> months -> files, with precomputed aggregates, a navigation state
//! machine, and a controller that maps selection events to transitions and
//! freshly generated file lists. Rendering is left to the caller.

pub mod config;
pub mod controller;
pub mod error;
pub mod generator;
pub mod i18n;
pub mod logging;
pub mod model;
pub mod navigation;
pub mod report;
pub mod units;

pub use controller::{DrillDownController, Snapshot};
pub use generator::{GeneratorBounds, MockGenerator};
pub use model::{summarize, ArchiveFile, DataModel, GlobalSummary, MonthAggregate, YearAggregate};
pub use navigation::{NavState, Transition};
