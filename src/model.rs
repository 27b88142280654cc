//! Aggregate data model: the year -> month -> file hierarchy and the
//! summary statistics folded out of it.
//!
//! Years and months are built once per session and shared read-only.
//! File lists are ephemeral and belong to whichever side panel asked for them.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

pub const MONTHS_PER_YEAR: u32 = 12;

/// Validate a month number coming from outside the generator.
pub fn check_month(month: u32) -> Result<u32> {
    if (1..=MONTHS_PER_YEAR).contains(&month) {
        Ok(month)
    } else {
        Err(DashboardError::InvalidMonth(month))
    }
}

/// Every day of `year` must be representable as a calendar date.
pub fn check_year(year: i32) -> Result<i32> {
    let first = NaiveDate::from_ymd_opt(year, 1, 1);
    let last = NaiveDate::from_ymd_opt(year, 12, 31);
    if first.is_some() && last.is_some() {
        Ok(year)
    } else {
        Err(DashboardError::InvalidYear(year))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FileType {
    #[serde(rename = "PDF")]
    Pdf,
    #[serde(rename = "JPG")]
    Jpg,
    #[serde(rename = "XLSX")]
    Xlsx,
    #[serde(rename = "DOCX")]
    Docx,
}

impl FileType {
    /// Report order. PDF first since it dominates every archive.
    pub const ALL: [FileType; 4] = [FileType::Pdf, FileType::Jpg, FileType::Xlsx, FileType::Docx];

    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Pdf => "PDF",
            FileType::Jpg => "JPG",
            FileType::Xlsx => "XLSX",
            FileType::Docx => "DOCX",
        }
    }

    /// Relative draw weight; PDF is three times as likely as any other type.
    pub fn weight(&self) -> u32 {
        match self {
            FileType::Pdf => 3,
            _ => 1,
        }
    }

    pub fn total_weight() -> u32 {
        Self::ALL.iter().map(|t| t.weight()).sum()
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single archived document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveFile {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub file_type: FileType,
    pub size: u64,
    pub date: NaiveDateTime,
    /// Provenance: source-system table the document hangs off.
    pub source_table: String,
    /// Provenance: record id inside `source_table`.
    pub record_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthAggregate {
    pub month: u32,
    pub month_name: String,
    pub file_count: u64,
    pub total_size: u64,
}

/// Files of one type across a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeStat {
    #[serde(rename = "type")]
    pub file_type: FileType,
    pub count: u64,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearAggregate {
    pub year: i32,
    pub file_count: u64,
    pub total_size: u64,
    pub months: Vec<MonthAggregate>,
    pub file_type_distribution: Vec<TypeStat>,
}

impl YearAggregate {
    /// Build a year from its months. Totals are always folded from the
    /// months so the two levels cannot drift apart.
    pub fn from_months(year: i32, mut months: Vec<MonthAggregate>, distribution: Vec<TypeStat>) -> Self {
        months.sort_by_key(|m| m.month);
        let file_count = months.iter().map(|m| m.file_count).sum();
        let total_size = months.iter().map(|m| m.total_size).sum();
        Self {
            year,
            file_count,
            total_size,
            months,
            file_type_distribution: distribution,
        }
    }

    pub fn month(&self, month: u32) -> Option<&MonthAggregate> {
        self.months.iter().find(|m| m.month == month)
    }

    /// True when the year-level totals equal the sum of its months.
    pub fn is_reconciled(&self) -> bool {
        let files: u64 = self.months.iter().map(|m| m.file_count).sum();
        let size: u64 = self.months.iter().map(|m| m.total_size).sum();
        files == self.file_count && size == self.total_size
    }
}

/// Derived totals for the overview stat cards. Never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSummary {
    pub years_count: usize,
    pub total_files: u64,
    pub total_size: u64,
}

pub fn summarize(years: &[YearAggregate]) -> GlobalSummary {
    years.iter().fold(GlobalSummary::default(), |acc, y| GlobalSummary {
        years_count: acc.years_count + 1,
        total_files: acc.total_files + y.file_count,
        total_size: acc.total_size + y.total_size,
    })
}

/// The session's read-only reference data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DataModel {
    years: Vec<YearAggregate>,
}

impl DataModel {
    pub fn new(years: Vec<YearAggregate>) -> Self {
        Self { years }
    }

    pub fn years(&self) -> &[YearAggregate] {
        &self.years
    }

    pub fn find_year(&self, year: i32) -> Option<&YearAggregate> {
        self.years.iter().find(|y| y.year == year)
    }

    pub fn summary(&self) -> GlobalSummary {
        summarize(&self.years)
    }

    /// First and last year, for the "2021 - 2025" caption.
    pub fn year_span(&self) -> Option<(i32, i32)> {
        let min = self.years.iter().map(|y| y.year).min()?;
        let max = self.years.iter().map(|y| y.year).max()?;
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(m: u32, files: u64, size: u64) -> MonthAggregate {
        MonthAggregate {
            month: m,
            month_name: format!("M{}", m),
            file_count: files,
            total_size: size,
        }
    }

    fn year(y: i32, per_month: u64) -> YearAggregate {
        let months = (1..=12).map(|m| month(m, per_month, per_month * 1000)).collect();
        YearAggregate::from_months(y, months, Vec::new())
    }

    #[test]
    fn test_summarize_empty_is_zero() {
        assert_eq!(summarize(&[]), GlobalSummary::default());
    }

    #[test]
    fn test_summarize_folds_all_years() {
        let years = vec![year(2021, 10), year(2022, 20)];
        let s = summarize(&years);
        assert_eq!(s.years_count, 2);
        assert_eq!(s.total_files, 12 * 10 + 12 * 20);
        assert_eq!(s.total_size, (12 * 10 + 12 * 20) * 1000);
    }

    #[test]
    fn test_from_months_sorts_and_reconciles() {
        let months = vec![month(3, 1, 10), month(1, 2, 20), month(2, 3, 30)];
        let y = YearAggregate::from_months(2024, months, Vec::new());
        assert_eq!(y.months.iter().map(|m| m.month).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(y.file_count, 6);
        assert_eq!(y.total_size, 60);
        assert!(y.is_reconciled());
    }

    #[test]
    fn test_tampered_year_is_not_reconciled() {
        let mut y = year(2023, 5);
        y.total_size += 1;
        assert!(!y.is_reconciled());
    }

    #[test]
    fn test_month_lookup() {
        let y = year(2023, 5);
        assert_eq!(y.month(6).map(|m| m.month), Some(6));
        assert!(y.month(13).is_none());
    }

    #[test]
    fn test_check_month_bounds() {
        assert_eq!(check_month(1), Ok(1));
        assert_eq!(check_month(12), Ok(12));
        assert_eq!(check_month(0), Err(DashboardError::InvalidMonth(0)));
        assert_eq!(check_month(13), Err(DashboardError::InvalidMonth(13)));
    }

    #[test]
    fn test_check_year_bounds() {
        assert_eq!(check_year(2023), Ok(2023));
        assert_eq!(check_year(-44), Ok(-44));
        assert_eq!(check_year(300_000), Err(DashboardError::InvalidYear(300_000)));
        assert_eq!(check_year(i32::MIN), Err(DashboardError::InvalidYear(i32::MIN)));
    }

    #[test]
    fn test_data_model_lookup_and_span() {
        let model = DataModel::new(vec![year(2022, 1), year(2021, 1), year(2025, 1)]);
        assert!(model.find_year(2021).is_some());
        assert!(model.find_year(2030).is_none());
        assert_eq!(model.year_span(), Some((2021, 2025)));
        assert_eq!(DataModel::default().year_span(), None);
    }

    #[test]
    fn test_file_type_weights() {
        assert_eq!(FileType::total_weight(), 6);
        assert_eq!(FileType::Pdf.weight(), 3);
        assert_eq!(FileType::Docx.to_string(), "DOCX");
    }

    #[test]
    fn test_file_serializes_with_type_key() {
        let f = ArchiveFile {
            id: "2023-6-0".to_string(),
            name: "INV_202306_1234.PDF".to_string(),
            file_type: FileType::Pdf,
            size: 1024,
            date: chrono::NaiveDate::from_ymd_opt(2023, 6, 3)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            source_table: "BKPF".to_string(),
            record_id: "DOC-1234567".to_string(),
        };
        let v = serde_json::to_value(&f).unwrap();
        assert_eq!(v["type"], "PDF");
        assert_eq!(v["sourceTable"], "BKPF");
        assert_eq!(v["recordId"], "DOC-1234567");
    }
}
