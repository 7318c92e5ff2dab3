use super::cache::ParseCache;
use crate::model::EntityKind;
use crate::utils::AppConfig;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Language code -> `{id, name, history|description}`. Keys outside the
/// configured language set are carried through untouched.
pub type MultiLanguageObject = Map<String, Value>;

#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub languages: Vec<String>,
    /// 0 disables the parse cache.
    pub cache_max_entries: usize,
    pub log_parse_errors: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string(), "ja".to_string(), "th".to_string()],
            cache_max_entries: 500,
            log_parse_errors: false,
        }
    }
}

impl StoreOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            languages: config.languages.codes.clone(),
            cache_max_entries: if config.cache.enabled {
                config.cache.max_entries
            } else {
                0
            },
            log_parse_errors: config.cache.log_parse_errors,
        }
    }
}

#[derive(Error, Debug)]
enum JsonParseError {
    #[error("invalid JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("top-level value is {0}, expected an object")]
    NotAnObject(&'static str),
}

/// Payload written under one language key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePayload {
    pub id: String,
    pub name: String,
    pub content: String,
}

impl LanguagePayload {
    pub fn to_map(&self, kind: EntityKind) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("id".to_string(), Value::String(self.id.clone()));
        map.insert("name".to_string(), Value::String(self.name.clone()));
        map.insert(
            kind.content_field().to_string(),
            Value::String(self.content.clone()),
        );
        map
    }
}

/// Returns `base` with every key of `overlay` written over it.
pub fn shallow_merge(
    base: &Map<String, Value>,
    overlay: &Map<String, Value>,
) -> Map<String, Value> {
    let mut merged = base.clone();
    for (key, value) in overlay {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

#[derive(Debug)]
pub struct MultiLanguageStore {
    languages: Vec<String>,
    cache: Option<ParseCache>,
    log_parse_errors: bool,
}

impl MultiLanguageStore {
    pub fn new(options: StoreOptions) -> Self {
        let cache = if options.cache_max_entries > 0 {
            Some(ParseCache::new(options.cache_max_entries))
        } else {
            None
        };

        Self {
            languages: options.languages,
            cache,
            log_parse_errors: options.log_parse_errors,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(StoreOptions::from_config(config))
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn is_valid_language(&self, code: &str) -> bool {
        self.languages.iter().any(|l| l == code)
    }

    /// Parses `old_json` text. Never fails: blank, malformed and non-object
    /// input all come back as an empty object.
    pub fn parse(&self, text: &str) -> MultiLanguageObject {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return MultiLanguageObject::new();
        }

        if let Some(cached) = self.cache.as_ref().and_then(|c| c.get(trimmed)) {
            return cached;
        }

        match Self::try_parse(trimmed) {
            Ok(object) => {
                if let Some(cache) = &self.cache {
                    cache.insert(trimmed.to_string(), object.clone());
                }
                object
            }
            Err(e) => {
                if self.log_parse_errors {
                    warn!(
                        error = %e,
                        input_len = trimmed.len(),
                        "Ignoring unparseable multi-language JSON"
                    );
                }
                MultiLanguageObject::new()
            }
        }
    }

    pub fn parse_optional(&self, text: Option<&str>) -> MultiLanguageObject {
        text.map(|t| self.parse(t)).unwrap_or_default()
    }

    fn try_parse(text: &str) -> std::result::Result<MultiLanguageObject, JsonParseError> {
        match serde_json::from_str::<Value>(text)? {
            Value::Object(map) => Ok(map),
            Value::Null => Err(JsonParseError::NotAnObject("null")),
            Value::Array(_) => Err(JsonParseError::NotAnObject("an array")),
            Value::String(_) => Err(JsonParseError::NotAnObject("a string")),
            Value::Number(_) => Err(JsonParseError::NotAnObject("a number")),
            Value::Bool(_) => Err(JsonParseError::NotAnObject("a boolean")),
        }
    }

    /// Returns a copy of `existing` whose `language` entry is the shallow
    /// union of the previous entry and `payload`, payload keys winning.
    /// An unconfigured `language` leaves the copy unchanged.
    pub fn merge(
        &self,
        existing: &MultiLanguageObject,
        language: &str,
        payload: &Map<String, Value>,
    ) -> MultiLanguageObject {
        if !self.is_valid_language(language) {
            error!(
                language = language,
                configured = ?self.languages,
                "Refusing to merge payload for unconfigured language"
            );
            return existing.clone();
        }

        let previous = match existing.get(language) {
            Some(Value::Object(entry)) => entry.clone(),
            Some(other) => {
                debug!(language = language, value = %other, "Replacing non-object language entry");
                Map::new()
            }
            None => Map::new(),
        };

        let mut merged = existing.clone();
        merged.insert(
            language.to_string(),
            Value::Object(shallow_merge(&previous, payload)),
        );
        merged
    }

    pub fn extract_language<'a>(
        &self,
        object: &'a MultiLanguageObject,
        language: &str,
    ) -> Option<&'a Map<String, Value>> {
        if !self.is_valid_language(language) {
            return None;
        }
        object.get(language).and_then(Value::as_object)
    }

    pub fn available_languages(&self, object: &MultiLanguageObject) -> BTreeSet<String> {
        object
            .keys()
            .filter(|key| self.is_valid_language(key))
            .cloned()
            .collect()
    }

    /// Pretty-printed with two-space indentation. Keys come out sorted, so
    /// equal objects always produce identical text.
    pub fn stringify(&self, object: &MultiLanguageObject) -> String {
        match serde_json::to_string_pretty(object) {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, "Failed to serialize multi-language JSON");
                "{}".to_string()
            }
        }
    }

    pub fn cache_len(&self) -> usize {
        self.cache.as_ref().map(ParseCache::len).unwrap_or(0)
    }
}

impl Default for MultiLanguageStore {
    fn default() -> Self {
        Self::new(StoreOptions::default())
    }
}
