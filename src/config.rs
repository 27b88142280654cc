use std::collections::HashSet;

use crate::error::{DashboardError, Result};
use crate::generator::GeneratorBounds;
use crate::i18n::Language;
use crate::model::{check_year, MONTHS_PER_YEAR};

pub const DEFAULT_YEARS: [i32; 5] = [2021, 2022, 2023, 2024, 2025];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub years: Vec<i32>,
    /// Unset means an entropy-seeded generator.
    pub seed: Option<u64>,
    pub month_files_min: u64,
    pub month_files_max: u64,
    pub avg_file_bytes_min: u64,
    pub avg_file_bytes_max: u64,
    pub panel_files_min: usize,
    pub panel_files_max: usize,
    pub file_bytes_min: u64,
    pub file_bytes_max: u64,
    pub language: Language,
}

impl Default for Config {
    fn default() -> Self {
        let b = GeneratorBounds::default();
        Self {
            years: DEFAULT_YEARS.to_vec(),
            seed: None,
            month_files_min: *b.month_files.start(),
            month_files_max: *b.month_files.end(),
            avg_file_bytes_min: *b.avg_file_bytes.start(),
            avg_file_bytes_max: *b.avg_file_bytes.end(),
            panel_files_min: *b.panel_files.start(),
            panel_files_max: *b.panel_files.end(),
            file_bytes_min: *b.file_bytes.start(),
            file_bytes_max: *b.file_bytes.end(),
            language: Language::En,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

impl Config {
    /// Read overrides from the environment. Unparseable values fall back to
    /// defaults; `YEARS` and `LANG_UI` are strict since a typo there changes
    /// what the dashboard shows.
    pub fn from_env() -> Result<Self> {
        let d = Self::default();
        let years = match std::env::var("YEARS") {
            Ok(v) => parse_years(&v)?,
            Err(_) => d.years,
        };
        let language = match std::env::var("LANG_UI") {
            Ok(v) => v.parse()?,
            Err(_) => d.language,
        };
        let cfg = Self {
            years,
            seed: std::env::var("SEED").ok().and_then(|v| v.trim().parse().ok()),
            month_files_min: env_parse("MONTH_FILES_MIN", d.month_files_min),
            month_files_max: env_parse("MONTH_FILES_MAX", d.month_files_max),
            avg_file_bytes_min: env_parse("AVG_FILE_BYTES_MIN", d.avg_file_bytes_min),
            avg_file_bytes_max: env_parse("AVG_FILE_BYTES_MAX", d.avg_file_bytes_max),
            panel_files_min: env_parse("PANEL_FILES_MIN", d.panel_files_min),
            panel_files_max: env_parse("PANEL_FILES_MAX", d.panel_files_max),
            file_bytes_min: env_parse("FILE_BYTES_MIN", d.file_bytes_min),
            file_bytes_max: env_parse("FILE_BYTES_MAX", d.file_bytes_max),
            language,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.years.is_empty() {
            return Err(DashboardError::InvalidConfig("no years configured".into()));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.years.iter().find(|y| !seen.insert(**y)) {
            return Err(DashboardError::InvalidConfig(format!("duplicate year {}", dup)));
        }
        for &year in &self.years {
            check_year(year)?;
        }
        check_range("month files", self.month_files_min, self.month_files_max)?;
        check_range("average file bytes", self.avg_file_bytes_min, self.avg_file_bytes_max)?;
        check_range("panel files", self.panel_files_min as u64, self.panel_files_max as u64)?;
        check_range("file bytes", self.file_bytes_min, self.file_bytes_max)?;
        if self.panel_files_min == 0 {
            return Err(DashboardError::InvalidConfig("panel files minimum must be > 0".into()));
        }
        if self.file_bytes_min == 0 {
            return Err(DashboardError::InvalidConfig("file bytes minimum must be > 0".into()));
        }
        // Largest possible grand total must fit in u64.
        self.month_files_max
            .checked_mul(self.avg_file_bytes_max)
            .and_then(|v| v.checked_mul(MONTHS_PER_YEAR as u64))
            .and_then(|v| v.checked_mul(self.years.len() as u64))
            .ok_or_else(|| {
                DashboardError::InvalidConfig(format!(
                    "storage totals overflow: {} files x {} bytes x {} months x {} years",
                    self.month_files_max,
                    self.avg_file_bytes_max,
                    MONTHS_PER_YEAR,
                    self.years.len()
                ))
            })?;
        Ok(())
    }

    pub fn bounds(&self) -> GeneratorBounds {
        GeneratorBounds {
            month_files: self.month_files_min..=self.month_files_max,
            avg_file_bytes: self.avg_file_bytes_min..=self.avg_file_bytes_max,
            panel_files: self.panel_files_min..=self.panel_files_max,
            file_bytes: self.file_bytes_min..=self.file_bytes_max,
        }
    }
}

fn check_range(what: &str, min: u64, max: u64) -> Result<()> {
    if min > max {
        return Err(DashboardError::InvalidConfig(format!(
            "{} range inverted: {} > {}",
            what, min, max
        )));
    }
    Ok(())
}

/// `"2021, 2022,2023"` -> `[2021, 2022, 2023]`
pub fn parse_years(s: &str) -> Result<Vec<i32>> {
    s.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            p.parse::<i32>()
                .map_err(|_| DashboardError::InvalidConfig(format!("bad year: {}", p)))
        })
        .collect()
}
