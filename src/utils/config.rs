use crate::model::EntityKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub languages: LanguageConfig,
    pub cache: CacheConfig,
    pub sheet: SheetConfig,
    pub report: ReportConfig,
    pub tabs: Vec<TabConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    pub codes: Vec<String>,
    pub target: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub max_entries: usize,
    pub log_parse_errors: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    pub header_rows: usize,
    pub doctor: TargetColumns,
    pub hospital: TargetColumns,
}

/// 0-based columns the writer fills for one entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetColumns {
    pub name: usize,
    pub content: usize,
    pub json: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub error_sample_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabConfig {
    pub kind: EntityKind,
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(default)]
    pub translations: Option<PathBuf>,
    #[serde(default)]
    pub requests: Option<PathBuf>,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            codes: vec!["en".to_string(), "ja".to_string(), "th".to_string()],
            target: "en".to_string(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 500,
            log_parse_errors: true,
        }
    }
}

impl Default for SheetConfig {
    fn default() -> Self {
        let llm_columns = TargetColumns {
            name: 9,
            content: 10,
            json: 11,
        };
        Self {
            header_rows: 1,
            doctor: llm_columns,
            hospital: llm_columns,
        }
    }
}

impl SheetConfig {
    pub fn target_columns(&self, kind: EntityKind) -> TargetColumns {
        match kind {
            EntityKind::Doctor => self.doctor,
            EntityKind::Hospital => self.hospital,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            error_sample_size: 10,
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &str) -> crate::utils::errors::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::utils::errors::SheetTranslatorError::ConfigError(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> crate::utils::errors::Result<Self> {
        toml::from_str(content)
            .map_err(|e| crate::utils::errors::SheetTranslatorError::ConfigError(e.to_string()))
    }

    pub fn load_or_default(path: Option<&str>) -> Self {
        if let Some(p) = path {
            match Self::load_from_file(p) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(path = p, error = %e, "Falling back to default configuration");
                    Self::default()
                }
            }
        } else {
            Self::default()
        }
    }
}
