//! Synthetic archive data so the dashboard has something to render.
//!
//! Shapes are fixed (12 months per year, bounded batch sizes, files sorted by
//! size); contents are random. Seed the generator to make contents repeatable.

use std::ops::RangeInclusive;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::i18n::{self, Language};
use crate::model::{
    check_year, ArchiveFile, DataModel, FileType, MonthAggregate, TypeStat, YearAggregate,
    MONTHS_PER_YEAR,
};

pub const SOURCE_TABLES: [&str; 5] = ["BKPF", "BSEG", "MARA", "KNA1", "LFA1"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorBounds {
    /// Files archived in one month.
    pub month_files: RangeInclusive<u64>,
    /// Average bytes per file within one month.
    pub avg_file_bytes: RangeInclusive<u64>,
    /// Files listed in the side panel for one month.
    pub panel_files: RangeInclusive<usize>,
    /// Bytes of a single listed file.
    pub file_bytes: RangeInclusive<u64>,
}

impl Default for GeneratorBounds {
    fn default() -> Self {
        Self {
            month_files: 100..=5_000,
            avg_file_bytes: 50_000..=5_000_000, // 50KB to 5MB
            panel_files: 10..=20,
            file_bytes: 100_000..=10_000_000,
        }
    }
}

pub struct MockGenerator {
    rng: StdRng,
    bounds: GeneratorBounds,
}

impl MockGenerator {
    pub fn from_entropy(bounds: GeneratorBounds) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            bounds,
        }
    }

    pub fn with_seed(seed: u64, bounds: GeneratorBounds) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            bounds,
        }
    }

    pub fn bounds(&self) -> &GeneratorBounds {
        &self.bounds
    }

    /// One aggregate per requested year, in the order given.
    pub fn generate_years(&mut self, years: &[i32], lang: Language) -> Vec<YearAggregate> {
        years.iter().map(|&y| self.generate_year(y, lang)).collect()
    }

    pub fn generate_model(&mut self, years: &[i32], lang: Language) -> DataModel {
        DataModel::new(self.generate_years(years, lang))
    }

    fn generate_year(&mut self, year: i32, lang: Language) -> YearAggregate {
        let months: Vec<MonthAggregate> = (1..=MONTHS_PER_YEAR)
            .map(|month| {
                let file_count = self.rng.gen_range(self.bounds.month_files.clone());
                let avg = self.rng.gen_range(self.bounds.avg_file_bytes.clone());
                MonthAggregate {
                    month,
                    month_name: i18n::month_name(lang, month).unwrap_or_default().to_string(),
                    file_count,
                    total_size: file_count * avg,
                }
            })
            .collect();

        let file_count: u64 = months.iter().map(|m| m.file_count).sum();
        let total_size: u64 = months.iter().map(|m| m.total_size).sum();
        let distribution = self.type_distribution(file_count, total_size);
        YearAggregate::from_months(year, months, distribution)
    }

    /// Split a year's totals across file types. Counts and sizes always sum
    /// back to the year totals.
    fn type_distribution(&mut self, file_count: u64, total_size: u64) -> Vec<TypeStat> {
        let count_weights: Vec<f64> = FileType::ALL
            .iter()
            .map(|t| t.weight() as f64 * self.rng.gen_range(0.8..1.2))
            .collect();
        let counts = apportion(file_count, &count_weights);

        let size_weights: Vec<f64> = counts
            .iter()
            .map(|&c| c as f64 * self.rng.gen_range(0.8..1.2))
            .collect();
        let sizes = apportion(total_size, &size_weights);

        FileType::ALL
            .iter()
            .zip(counts.into_iter().zip(sizes))
            .map(|(&file_type, (count, size))| TypeStat { file_type, count, size })
            .collect()
    }

    /// A fresh batch of files for one month, largest first.
    ///
    /// Never cached: two calls for the same month return different lists.
    ///
    /// # Panics
    /// If `month` is outside 1-12 or `year` has no calendar dates. Callers
    /// validate with `model::check_month` / `model::check_year`.
    pub fn generate_files_for_month(&mut self, year: i32, month: u32) -> Vec<ArchiveFile> {
        assert!(
            (1..=MONTHS_PER_YEAR).contains(&month),
            "month out of range: {}",
            month
        );
        assert!(check_year(year).is_ok(), "year out of range: {}", year);

        let count = self.rng.gen_range(self.bounds.panel_files.clone());
        let mut files: Vec<ArchiveFile> = (0..count).map(|seq| self.generate_file(year, month, seq)).collect();
        files.sort_by(|a, b| b.size.cmp(&a.size));
        files
    }

    fn generate_file(&mut self, year: i32, month: u32, seq: usize) -> ArchiveFile {
        let file_type = self.pick_type();
        let day = self.rng.gen_range(1..=28);
        let (h, m, s) = (
            self.rng.gen_range(0..24),
            self.rng.gen_range(0..60),
            self.rng.gen_range(0..60),
        );
        // Year and month are checked by the caller; day is at most 28.
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(h, m, s))
            .unwrap_or_else(|| panic!("no calendar date for {}-{:02}-{:02}", year, month, day));
        let source_table = SOURCE_TABLES
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(SOURCE_TABLES[0]);

        ArchiveFile {
            id: format!("{}-{}-{}", year, month, seq),
            name: format!(
                "INV_{}{:02}_{}.{}",
                year,
                month,
                self.rng.gen_range(1000..=9999),
                file_type.as_str()
            ),
            file_type,
            size: self.rng.gen_range(self.bounds.file_bytes.clone()),
            date,
            source_table: source_table.to_string(),
            record_id: format!("DOC-{}", self.rng.gen_range(1_000_000..=9_999_999)),
        }
    }

    fn pick_type(&mut self) -> FileType {
        let mut roll = self.rng.gen_range(0..FileType::total_weight());
        for t in FileType::ALL {
            if roll < t.weight() {
                return t;
            }
            roll -= t.weight();
        }
        FileType::Pdf
    }
}

/// Integer split of `total` proportional to `weights`; rounding slack lands
/// on the first slot.
fn apportion(total: u64, weights: &[f64]) -> Vec<u64> {
    let sum: f64 = weights.iter().sum();
    let mut parts: Vec<u64> = if sum > 0.0 {
        weights
            .iter()
            .map(|w| (total as f64 * w / sum).floor() as u64)
            .collect()
    } else {
        vec![0; weights.len()]
    };
    if parts.is_empty() {
        return parts;
    }
    let rest: u64 = parts[1..].iter().sum();
    if rest > total {
        parts.iter_mut().for_each(|p| *p = 0);
        parts[0] = total;
    } else {
        parts[0] = total - rest;
    }
    parts
}
