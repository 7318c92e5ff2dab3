use crate::model::{EntityKind, RowModel};
use crate::utils::{Result, SheetTranslatorError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Freshly translated fields for one row. The content field is accepted
/// under either entity's key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedFields {
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "history", alias = "description")]
    pub content: String,
}

/// One answer from the external translator: either `translated` or `error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub id: String,
    #[serde(default, alias = "row_index")]
    pub row_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated: Option<TranslatedFields>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TranslationResult {
    pub fn success(id: impl Into<String>, row_index: usize, fields: TranslatedFields) -> Self {
        Self {
            id: id.into(),
            row_index,
            translated: Some(fields),
            error: None,
        }
    }

    pub fn failure(id: impl Into<String>, row_index: usize, error: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            row_index,
            translated: None,
            error: Some(error.into()),
        }
    }

    /// Usable translation, if the translator produced one without error.
    pub fn fields(&self) -> Option<&TranslatedFields> {
        match (&self.translated, &self.error) {
            (Some(fields), None) => Some(fields),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestSource {
    pub name: String,
    pub content: String,
}

/// Outbound work item for a row that needs translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRequest {
    pub id: String,
    pub row_index: usize,
    pub row_number: usize,
    pub kind: EntityKind,
    pub content_field: &'static str,
    pub target_language: String,
    pub source: RequestSource,
}

/// One request per row flagged `needs_translation`, in row order.
/// `row_index` is the position in `rows`.
pub fn collect_requests(rows: &[RowModel], language: &str) -> Vec<TranslationRequest> {
    rows.iter()
        .enumerate()
        .filter(|(_, row)| row.needs_translation())
        .map(|(row_index, row)| TranslationRequest {
            id: row.id.clone(),
            row_index,
            row_number: row.row_number,
            kind: row.kind,
            content_field: row.kind.content_field(),
            target_language: language.to_string(),
            source: RequestSource {
                name: row.kr_name.clone(),
                content: row.kr_content.clone(),
            },
        })
        .collect()
}

/// An entry of a results file that does not have the result shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedResult {
    /// 0-based position in the file's array.
    pub position: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedResults {
    pub results: Vec<TranslationResult>,
    pub malformed: Vec<MalformedResult>,
}

/// Reads a JSON array of results. Each entry is converted on its own, so a
/// bad entry is reported in `malformed` without dropping the others. Only an
/// unreadable file or a top level that is not an array is an error.
pub fn load_results(path: &Path) -> Result<LoadedResults> {
    if !path.exists() {
        return Err(SheetTranslatorError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    let entries: Vec<serde_json::Value> = serde_json::from_str(&content)?;

    let mut loaded = LoadedResults::default();
    for (position, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<TranslationResult>(entry) {
            Ok(result) => loaded.results.push(result),
            Err(e) => loaded.malformed.push(MalformedResult {
                position,
                reason: e.to_string(),
            }),
        }
    }
    Ok(loaded)
}

pub fn write_requests(path: &Path, requests: &[TranslationRequest]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(requests)?;
    std::fs::write(path, json)?;
    Ok(())
}
