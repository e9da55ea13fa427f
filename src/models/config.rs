//! Application configuration structures.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::KeywordSet;
use crate::utils::BulletinCalendar;
use crate::utils::calendar::is_weekend;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP behavior settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Include and exclude keyword lists
    #[serde(default)]
    pub keywords: KeywordConfig,

    /// Digest delivery settings
    #[serde(default)]
    pub mail: MailConfig,

    /// Per-gazette endpoints and scan windows
    #[serde(default)]
    pub sources: SourcesConfig,

    /// PDF text extraction settings
    #[serde(default)]
    pub pdf: PdfConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.keywords.include.is_empty() {
            return Err(AppError::validation("No include keywords defined"));
        }
        if self.pdf.pdftotext.trim().is_empty() {
            return Err(AppError::validation("pdf.pdftotext is empty"));
        }

        url::Url::parse(&self.sources.boe.feed_url)?;
        url::Url::parse(&self.sources.boc.base_url)?;
        if is_weekend(self.sources.boc.anchor_date) {
            return Err(AppError::validation(format!(
                "sources.boc.anchor_date {} is not a weekday",
                self.sources.boc.anchor_date
            )));
        }
        for (name, source) in [
            ("bop_lp", &self.sources.bop_lp),
            ("bop_sctf", &self.sources.bop_sctf),
        ] {
            url::Url::parse(&source.base_url)?;
            if source.scan_days == 0 {
                return Err(AppError::validation(format!(
                    "sources.{name}.scan_days must be > 0"
                )));
            }
            if source.max_pages == 0 {
                return Err(AppError::validation(format!(
                    "sources.{name}.max_pages must be > 0"
                )));
            }
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Per-attempt timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Include and exclude keyword lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordConfig {
    /// A block must contain at least one of these
    #[serde(default = "defaults::include_keywords")]
    pub include: KeywordSet,

    /// A block containing any of these is dropped
    #[serde(default = "defaults::exclude_keywords")]
    pub exclude: KeywordSet,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            include: defaults::include_keywords(),
            exclude: defaults::exclude_keywords(),
        }
    }
}

/// Digest delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Sender address, also used as the SMTP login
    #[serde(default)]
    pub sender: String,

    /// SMTP relay host (implicit TLS)
    #[serde(default = "defaults::smtp_host")]
    pub smtp_host: String,

    /// Environment variable holding the SMTP app password
    #[serde(default = "defaults::password_env")]
    pub password_env: String,

    /// Digest recipients
    #[serde(default)]
    pub recipients: Vec<String>,
}

impl MailConfig {
    /// Check the settings needed to actually send a digest.
    pub fn validate(&self) -> Result<()> {
        if self.sender.trim().is_empty() {
            return Err(AppError::validation("mail.sender is empty"));
        }
        if self.smtp_host.trim().is_empty() {
            return Err(AppError::validation("mail.smtp_host is empty"));
        }
        if self.recipients.is_empty() {
            return Err(AppError::validation("No mail recipients defined"));
        }
        Ok(())
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            sender: String::new(),
            smtp_host: defaults::smtp_host(),
            password_env: defaults::password_env(),
            recipients: Vec::new(),
        }
    }
}

/// Endpoints and scan behaviour for every gazette.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default)]
    pub boe: FeedSourceConfig,

    #[serde(default)]
    pub boc: NumberedSourceConfig,

    #[serde(default = "defaults::bop_las_palmas")]
    pub bop_lp: SummarySourceConfig,

    #[serde(default = "defaults::bop_santa_cruz")]
    pub bop_sctf: SummarySourceConfig,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            boe: FeedSourceConfig::default(),
            boc: NumberedSourceConfig::default(),
            bop_lp: defaults::bop_las_palmas(),
            bop_sctf: defaults::bop_santa_cruz(),
        }
    }
}

/// Syndicated feed source (BOE).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedSourceConfig {
    #[serde(default = "defaults::boe_feed_url")]
    pub feed_url: String,
}

impl Default for FeedSourceConfig {
    fn default() -> Self {
        Self {
            feed_url: defaults::boe_feed_url(),
        }
    }
}

/// Source addressed by business-day bulletin number (BOC).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumberedSourceConfig {
    /// Directory URL the `boc-s-{year}-{number}.pdf` files live under
    #[serde(default = "defaults::boc_base_url")]
    pub base_url: String,

    /// Date of the anchor issue
    #[serde(default = "defaults::boc_anchor_date")]
    pub anchor_date: NaiveDate,

    /// Number of the anchor issue
    #[serde(default = "defaults::boc_anchor_number")]
    pub anchor_number: u32,
}

impl NumberedSourceConfig {
    pub fn calendar(&self) -> BulletinCalendar {
        BulletinCalendar::new(self.anchor_date, self.anchor_number)
    }
}

impl Default for NumberedSourceConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::boc_base_url(),
            anchor_date: defaults::boc_anchor_date(),
            anchor_number: defaults::boc_anchor_number(),
        }
    }
}

/// Forward-scanned provincial summary PDF (BOP).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarySourceConfig {
    /// Root of the `/{year}/{folder}/{folder}.pdf` tree
    pub base_url: String,

    /// Number of days to try, starting today
    pub scan_days: u32,

    /// Pages of each PDF to read
    pub max_pages: usize,

    /// Extra request headers
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

/// PDF text extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfConfig {
    /// Path or name of the `pdftotext` binary
    #[serde(default = "defaults::pdftotext")]
    pub pdftotext: String,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            pdftotext: defaults::pdftotext(),
        }
    }
}

mod defaults {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;

    use super::SummarySourceConfig;
    use crate::models::KeywordSet;

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; gazette-watch/0.1)".into()
    }
    pub fn timeout() -> u64 {
        10
    }

    // Keyword defaults
    pub fn include_keywords() -> KeywordSet {
        [
            "Fondos Next Generation",
            "Ayudas",
            "Subvención",
            "Subvenciones",
            "Extracto",
            "Energía",
            "Biodiversidad",
            "Economía circular",
            "Cambio climático",
            "Life",
            "FEDER",
            "IDAE",
            "Plan de Recuperación, Transformación y Resiliencia",
            "Instalación fotovoltaica",
            "sector náutico",
            "descarbonización",
            "eléctrico",
            "vehículo",
        ]
        .into_iter()
        .collect()
    }
    pub fn exclude_keywords() -> KeywordSet {
        ["empleo", "volcán"].into_iter().collect()
    }

    // Mail defaults
    pub fn smtp_host() -> String {
        "smtp.gmail.com".into()
    }
    pub fn password_env() -> String {
        "GAZETTE_SMTP_PASSWORD".into()
    }

    // Source defaults
    pub fn boe_feed_url() -> String {
        "https://www.boe.es/rss/boe.php".into()
    }
    pub fn boc_base_url() -> String {
        "https://sede.gobiernodecanarias.org/boc".into()
    }
    pub fn boc_anchor_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 2).unwrap_or_default()
    }
    pub fn boc_anchor_number() -> u32 {
        1
    }
    pub fn bop_las_palmas() -> SummarySourceConfig {
        SummarySourceConfig {
            base_url: "https://www.boplaspalmas.net/boletines".into(),
            scan_days: 5,
            max_pages: 3,
            headers: BTreeMap::new(),
        }
    }
    pub fn bop_santa_cruz() -> SummarySourceConfig {
        SummarySourceConfig {
            base_url: "https://www.bopsantacruzdetenerife.es/boletines".into(),
            scan_days: 8,
            max_pages: 4,
            headers: BTreeMap::from([
                ("User-Agent".to_string(), "Mozilla/5.0".to_string()),
                (
                    "Referer".to_string(),
                    "https://www.bopsantacruzdetenerife.es/".to_string(),
                ),
                ("Accept".to_string(), "application/pdf".to_string()),
            ]),
        }
    }

    // PDF defaults
    pub fn pdftotext() -> String {
        "pdftotext".into()
    }
}
