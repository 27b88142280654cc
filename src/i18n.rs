//! Display strings. The core only ever hands keys across; `translate` is the
//! pure lookup the presentation layer applies to them.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::DashboardError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "pt-BR")]
    PtBr,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::PtBr => "pt-BR",
        }
    }

    /// Header toggle: en <-> pt-BR.
    pub fn toggle(self) -> Self {
        match self {
            Language::En => Language::PtBr,
            Language::PtBr => Language::En,
        }
    }
}

impl FromStr for Language {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "en" | "EN" | "en-US" => Ok(Language::En),
            "pt-BR" | "pt" | "PT" | "pt_BR" => Ok(Language::PtBr),
            other => Err(DashboardError::UnknownLanguage(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextKey {
    AppTitle,
    ExecutiveDashboard,
    TotalYearsAnalyzed,
    TotalFilesFound,
    AcrossAllTables,
    TotalStorage,
    EstimatedConsumption,
    StorageEvolution,
    ClickYearDrillDown,
    QuickInsights,
    HighGrowth,
    HighGrowthDesc,
    ArchiveCandidates,
    ArchiveCandidatesDesc,
    BackToOverview,
    Analysis,
    FilesYear,
    StorageYear,
    MonthlyDistribution,
    ClickMonthDrillDown,
    NoFilesFound,
    LimitedToTop,
    FileMetadata,
    Size,
    Type,
    CreatedAt,
    SourceContext,
    SourceTable,
    Retention,
    Active,
    PreviewUnavailable,
    Close,
    Download,
    FileDistributionReportTitle,
    ExerciseExtension,
    QuantityFiles,
    SizeMb,
    SizeGb,
    Total,
}

pub fn translate(lang: Language, key: TextKey) -> &'static str {
    use TextKey::*;
    match lang {
        Language::En => match key {
            AppTitle => "Archive Insight",
            ExecutiveDashboard => "Executive Dashboard",
            TotalYearsAnalyzed => "Total Years Analyzed",
            TotalFilesFound => "Total Files Found",
            AcrossAllTables => "Across all source tables",
            TotalStorage => "Total Storage",
            EstimatedConsumption => "Estimated consumption",
            StorageEvolution => "Storage Evolution",
            ClickYearDrillDown => "Click a year to drill down",
            QuickInsights => "Quick Insights",
            HighGrowth => "High Growth",
            HighGrowthDesc => "Storage grew steadily year over year.",
            ArchiveCandidates => "Archive Candidates",
            ArchiveCandidatesDesc => "Older years are good candidates for archiving.",
            BackToOverview => "Back to overview",
            Analysis => "Analysis",
            FilesYear => "Files (year)",
            StorageYear => "Storage (year)",
            MonthlyDistribution => "Monthly Distribution",
            ClickMonthDrillDown => "Click a month to list its files",
            NoFilesFound => "No files found",
            LimitedToTop => "Showing a limited sample",
            FileMetadata => "File Metadata",
            Size => "Size",
            Type => "Type",
            CreatedAt => "Created at",
            SourceContext => "Source Context",
            SourceTable => "Source table",
            Retention => "Retention",
            Active => "Active",
            PreviewUnavailable => "Preview unavailable",
            Close => "Close",
            Download => "Download",
            FileDistributionReportTitle => "File Distribution Report",
            ExerciseExtension => "Year / Extension",
            QuantityFiles => "Files",
            SizeMb => "Size (MB)",
            SizeGb => "Size (GB)",
            Total => "Total",
        },
        Language::PtBr => match key {
            AppTitle => "Archive Insight",
            ExecutiveDashboard => "Painel Executivo",
            TotalYearsAnalyzed => "Total de Anos Analisados",
            TotalFilesFound => "Total de Arquivos",
            AcrossAllTables => "Em todas as tabelas de origem",
            TotalStorage => "Armazenamento Total",
            EstimatedConsumption => "Consumo estimado",
            StorageEvolution => "Evolução do Armazenamento",
            ClickYearDrillDown => "Clique em um ano para detalhar",
            QuickInsights => "Insights Rápidos",
            HighGrowth => "Alto Crescimento",
            HighGrowthDesc => "O armazenamento cresceu ano após ano.",
            ArchiveCandidates => "Candidatos a Arquivamento",
            ArchiveCandidatesDesc => "Anos mais antigos são bons candidatos a arquivamento.",
            BackToOverview => "Voltar à visão geral",
            Analysis => "Análise",
            FilesYear => "Arquivos (ano)",
            StorageYear => "Armazenamento (ano)",
            MonthlyDistribution => "Distribuição Mensal",
            ClickMonthDrillDown => "Clique em um mês para listar os arquivos",
            NoFilesFound => "Nenhum arquivo encontrado",
            LimitedToTop => "Exibindo uma amostra limitada",
            FileMetadata => "Metadados do Arquivo",
            Size => "Tamanho",
            Type => "Tipo",
            CreatedAt => "Criado em",
            SourceContext => "Contexto de Origem",
            SourceTable => "Tabela de origem",
            Retention => "Retenção",
            Active => "Ativo",
            PreviewUnavailable => "Pré-visualização indisponível",
            Close => "Fechar",
            Download => "Baixar",
            FileDistributionReportTitle => "Relatório de Distribuição de Arquivos",
            ExerciseExtension => "Exercício / Extensão",
            QuantityFiles => "Arquivos",
            SizeMb => "Tamanho (MB)",
            SizeGb => "Tamanho (GB)",
            Total => "Total",
        },
    }
}

const MONTHS_EN: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

const MONTHS_PT: [&str; 12] = [
    "janeiro", "fevereiro", "março", "abril", "maio", "junho",
    "julho", "agosto", "setembro", "outubro", "novembro", "dezembro",
];

/// Long month label. `None` outside 1-12.
pub fn month_name(lang: Language, month: u32) -> Option<&'static str> {
    let idx = month.checked_sub(1)? as usize;
    match lang {
        Language::En => MONTHS_EN.get(idx).copied(),
        Language::PtBr => MONTHS_PT.get(idx).copied(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_round_trips() {
        assert_eq!(Language::En.toggle(), Language::PtBr);
        assert_eq!(Language::En.toggle().toggle(), Language::En);
    }

    #[test]
    fn test_parse_language() {
        assert_eq!("pt-BR".parse::<Language>(), Ok(Language::PtBr));
        assert_eq!(" en ".parse::<Language>(), Ok(Language::En));
        assert!(matches!(
            "fr".parse::<Language>(),
            Err(DashboardError::UnknownLanguage(s)) if s == "fr"
        ));
    }

    #[test]
    fn test_translate_differs_per_language() {
        assert_eq!(translate(Language::En, TextKey::Close), "Close");
        assert_eq!(translate(Language::PtBr, TextKey::Close), "Fechar");
    }

    #[test]
    fn test_month_names() {
        assert_eq!(month_name(Language::En, 1), Some("January"));
        assert_eq!(month_name(Language::PtBr, 6), Some("junho"));
        assert_eq!(month_name(Language::En, 0), None);
        assert_eq!(month_name(Language::En, 13), None);
    }

    #[test]
    fn test_keys_serialize_camel_case() {
        let v = serde_json::to_value(TextKey::FileDistributionReportTitle).unwrap();
        assert_eq!(v, "fileDistributionReportTitle");
    }
}
