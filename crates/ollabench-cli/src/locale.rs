use std::str::FromStr;

use ollabench_core::ConfigError;

/// Language of every user-facing string. Passed explicitly to whatever prints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    En,
    Tr,
}

impl FromStr for Locale {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Locale::En),
            "tr" | "turkish" | "türkçe" => Ok(Locale::Tr),
            other => Err(ConfigError::InvalidLanguage(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Msg {
    MenuTitle,
    MenuQuick,
    MenuSettings,
    ChooseOption,
    ApiUrl,
    PromptFile,
    Trials,
    OutputFormat,
    TokensOnly,
    ModelSelection,
    AllModels,
    QuickStarting,
    LoadingModels,
    InvalidChoice,
    InvalidFormat,
    ModelRunning,
    ModelError,
    Cancelled,
    NoResults,
    BenchmarkComplete,
    ReportWritten,
    SummaryTitle,
    DetailsTitle,
    ComparisonTitle,
    HeaderModel,
    HeaderTime,
    HeaderTokens,
    HeaderTps,
    HeaderRank,
    FieldTrial,
    FieldPrompt,
    FieldTokens,
    FieldTime,
    FieldTps,
    Estimated,
}

impl Locale {
    pub fn t(self, msg: Msg) -> &'static str {
        match self {
            Locale::En => english(msg),
            Locale::Tr => turkish(msg),
        }
    }

    /// Accepts y/yes and the Turkish e/evet.
    pub fn is_yes(self, answer: &str) -> bool {
        matches!(
            answer.trim().to_lowercase().as_str(),
            "y" | "yes" | "e" | "evet"
        )
    }
}

fn english(msg: Msg) -> &'static str {
    match msg {
        Msg::MenuTitle => "=== Ollama Model Benchmark ===",
        Msg::MenuQuick => "1) Quick start (all models, 1 trial, txt report)",
        Msg::MenuSettings => "2) Custom settings",
        Msg::ChooseOption => "Choose an option:",
        Msg::ApiUrl => "API URL",
        Msg::PromptFile => "Prompt file",
        Msg::Trials => "Trials per prompt",
        Msg::OutputFormat => "Output format",
        Msg::TokensOnly => "Show token metrics only? (y/N):",
        Msg::ModelSelection => "Select a model",
        Msg::AllModels => "All models",
        Msg::QuickStarting => "Starting quick benchmark...",
        Msg::LoadingModels => "Loading models...",
        Msg::InvalidChoice => "Invalid choice.",
        Msg::InvalidFormat => "Invalid output format.",
        Msg::ModelRunning => "Benchmarking model",
        Msg::ModelError => "Model failed",
        Msg::Cancelled => "Benchmark cancelled; reporting completed models only.",
        Msg::NoResults => "No results to report.",
        Msg::BenchmarkComplete => "Benchmark complete.",
        Msg::ReportWritten => "Report written",
        Msg::SummaryTitle => "Benchmark Summary",
        Msg::DetailsTitle => "Trial Details",
        Msg::ComparisonTitle => "Model Comparison",
        Msg::HeaderModel => "Model",
        Msg::HeaderTime => "Avg Time (s)",
        Msg::HeaderTokens => "Tokens",
        Msg::HeaderTps => "Tokens/s",
        Msg::HeaderRank => "Rank",
        Msg::FieldTrial => "Trial",
        Msg::FieldPrompt => "Prompt",
        Msg::FieldTokens => "Tokens",
        Msg::FieldTime => "Time",
        Msg::FieldTps => "Tokens/s",
        Msg::Estimated => "estimated",
    }
}

fn turkish(msg: Msg) -> &'static str {
    match msg {
        Msg::MenuTitle => "=== Ollama Model Karşılaştırması ===",
        Msg::MenuQuick => "1) Hızlı başlat (tüm modeller, 1 deneme, txt rapor)",
        Msg::MenuSettings => "2) Özel ayarlar",
        Msg::ChooseOption => "Bir seçenek girin:",
        Msg::ApiUrl => "API adresi",
        Msg::PromptFile => "Prompt dosyası",
        Msg::Trials => "Prompt başına deneme sayısı",
        Msg::OutputFormat => "Çıktı biçimi",
        Msg::TokensOnly => "Sadece token metrikleri gösterilsin mi? (e/H):",
        Msg::ModelSelection => "Bir model seçin",
        Msg::AllModels => "Tüm modeller",
        Msg::QuickStarting => "Hızlı test başlatılıyor...",
        Msg::LoadingModels => "Modeller yükleniyor...",
        Msg::InvalidChoice => "Geçersiz seçim.",
        Msg::InvalidFormat => "Geçersiz çıktı biçimi.",
        Msg::ModelRunning => "Model test ediliyor",
        Msg::ModelError => "Model başarısız oldu",
        Msg::Cancelled => "Test iptal edildi; yalnızca tamamlanan modeller raporlanıyor.",
        Msg::NoResults => "Raporlanacak sonuç yok.",
        Msg::BenchmarkComplete => "Test tamamlandı.",
        Msg::ReportWritten => "Rapor yazıldı",
        Msg::SummaryTitle => "Test Özeti",
        Msg::DetailsTitle => "Deneme Ayrıntıları",
        Msg::ComparisonTitle => "Model Karşılaştırması",
        Msg::HeaderModel => "Model",
        Msg::HeaderTime => "Ort. Süre (sn)",
        Msg::HeaderTokens => "Token",
        Msg::HeaderTps => "Token/sn",
        Msg::HeaderRank => "Sıra",
        Msg::FieldTrial => "Deneme",
        Msg::FieldPrompt => "Prompt",
        Msg::FieldTokens => "Token",
        Msg::FieldTime => "Süre",
        Msg::FieldTps => "Token/sn",
        Msg::Estimated => "tahmini",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locale() {
        assert_eq!("EN".parse::<Locale>(), Ok(Locale::En));
        assert_eq!("tr".parse::<Locale>(), Ok(Locale::Tr));
        assert_eq!(
            "de".parse::<Locale>(),
            Err(ConfigError::InvalidLanguage("de".to_string()))
        );
    }

    #[test]
    fn test_locales_differ() {
        assert_eq!(Locale::En.t(Msg::NoResults), "No results to report.");
        assert_ne!(Locale::En.t(Msg::NoResults), Locale::Tr.t(Msg::NoResults));
    }

    #[test]
    fn test_is_yes() {
        assert!(Locale::En.is_yes("Y"));
        assert!(Locale::Tr.is_yes(" evet "));
        assert!(!Locale::En.is_yes(""));
        assert!(!Locale::En.is_yes("n"));
    }
}
