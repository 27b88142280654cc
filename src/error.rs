use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    #[error("month out of range: {0} (expected 1-12)")]
    InvalidMonth(u32),

    #[error("year out of range: {0}")]
    InvalidYear(i32),

    #[error("unknown language: {0}")]
    UnknownLanguage(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
