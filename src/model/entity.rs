use crate::utils::SheetTranslatorError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Record type of a sheet tab. Selects the name of the content field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Doctor,
    Hospital,
}

impl EntityKind {
    /// Key used for the content field in multi-language JSON payloads.
    pub fn content_field(&self) -> &'static str {
        match self {
            EntityKind::Doctor => "history",
            EntityKind::Hospital => "description",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Doctor => "doctor",
            EntityKind::Hospital => "hospital",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = SheetTranslatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "doctor" | "doctors" => Ok(EntityKind::Doctor),
            "hospital" | "hospitals" => Ok(EntityKind::Hospital),
            other => Err(SheetTranslatorError::UnknownEntityKind(other.to_string())),
        }
    }
}
