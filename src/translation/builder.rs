use crate::i18n::{MultiLanguageObject, MultiLanguageStore};
use crate::model::RowModel;
use crate::translation::resolver::{FinalValues, ValueResolver};
use crate::translation::result::{TranslatedFields, TranslationResult};
use crate::utils::{escape_html, SheetTranslatorError};
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq)]
pub struct BuiltJson {
    pub object: MultiLanguageObject,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuiltRow {
    pub values: FinalValues,
    pub json: BuiltJson,
}

#[derive(Debug)]
pub struct RowJson {
    pub row_index: usize,
    pub row_number: usize,
    pub id: String,
    pub outcome: std::result::Result<BuiltRow, SheetTranslatorError>,
}

impl RowJson {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

#[derive(Debug, Default)]
pub struct BatchJson {
    pub results: Vec<RowJson>,
    pub succeeded: usize,
    pub failed: usize,
    /// Built objects holding more than one configured language.
    pub multi_language: usize,
}

impl BatchJson {
    pub fn built(&self) -> impl Iterator<Item = (&RowJson, &BuiltRow)> {
        self.results
            .iter()
            .filter_map(|result| result.outcome.as_ref().ok().map(|built| (result, built)))
    }

    pub fn errors(&self) -> impl Iterator<Item = &SheetTranslatorError> {
        self.results
            .iter()
            .filter_map(|result| result.outcome.as_ref().err())
    }
}

/// Folds a row's resolved values into its previous multi-language JSON.
pub struct JsonMergeBuilder {
    store: Arc<MultiLanguageStore>,
}

impl JsonMergeBuilder {
    pub fn new(store: Arc<MultiLanguageStore>) -> Self {
        Self { store }
    }

    fn merge_row(&self, row: &RowModel, language: &str) -> (FinalValues, MultiLanguageObject) {
        let values = ValueResolver::final_values(row);
        let payload = values.payload().to_map(row.kind);
        let object = self.store.merge(&row.old_json_parsed, language, &payload);
        (values, object)
    }

    /// `old_json_parsed` with `language` replaced by the merged payload.
    pub fn build_updated_json(&self, row: &RowModel, language: &str) -> MultiLanguageObject {
        self.merge_row(row, language).1
    }

    pub fn build_json(&self, row: &RowModel, language: &str) -> BuiltJson {
        let object = self.build_updated_json(row, language);
        let text = self.store.stringify(&object);
        BuiltJson { object, text }
    }

    pub fn build_row(&self, row: &RowModel, language: &str) -> BuiltRow {
        let (values, object) = self.merge_row(row, language);
        let text = self.store.stringify(&object);
        BuiltRow {
            values,
            json: BuiltJson { object, text },
        }
    }

    /// Builds every row independently. A row that fails is reported in its
    /// own result and the rest of the batch carries on.
    pub fn build_batch_json(&self, rows: &[RowModel], language: &str) -> BatchJson {
        let mut batch = BatchJson::default();

        for (row_index, row) in rows.iter().enumerate() {
            let outcome = catch_unwind(AssertUnwindSafe(|| self.build_row(row, language)))
                .map_err(|panic| SheetTranslatorError::RowMerge {
                    row_index,
                    reason: panic_message(panic.as_ref()),
                });

            match &outcome {
                Ok(built) => {
                    batch.succeeded += 1;
                    if self.store.available_languages(&built.json.object).len() > 1 {
                        batch.multi_language += 1;
                    }
                }
                Err(e) => {
                    batch.failed += 1;
                    error!(
                        row_number = row.row_number,
                        id = %row.id,
                        error = %e,
                        "Row JSON build failed"
                    );
                }
            }

            batch.results.push(RowJson {
                row_index,
                row_number: row.row_number,
                id: row.id.clone(),
                outcome,
            });
        }

        info!(
            language = language,
            succeeded = batch.succeeded,
            failed = batch.failed,
            multi_language = batch.multi_language,
            "Built multi-language JSON"
        );

        batch
    }

    pub fn count_multi_language<'a>(
        &self,
        objects: impl IntoIterator<Item = &'a MultiLanguageObject>,
    ) -> usize {
        objects
            .into_iter()
            .filter(|object| self.store.available_languages(object).len() > 1)
            .count()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unexpected failure".to_string()
    }
}

/// Usable translations keyed by row id. A later result for the same id
/// replaces an earlier one.
pub fn index_translations(results: &[TranslationResult]) -> HashMap<&str, &TranslatedFields> {
    results
        .iter()
        .filter_map(|result| result.fields().map(|fields| (result.id.as_str(), fields)))
        .collect()
}

/// Returns `rows` with `mt_name`/`mt_content` replaced by the fresh
/// translation for their id. Rows without one are copied unchanged.
pub fn merge_translations(rows: &[RowModel], results: &[TranslationResult]) -> Vec<RowModel> {
    let by_id = index_translations(results);

    rows.iter()
        .map(|row| {
            let mut updated = row.clone();
            if let Some(fields) = by_id.get(row.id.as_str()) {
                updated.mt_name = escape_html(fields.name.trim());
                updated.mt_content = escape_html(fields.content.trim());
            }
            updated
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::StoreOptions;
    use crate::model::{EntityKind, RawRow};
    use serde_json::json;

    fn store() -> Arc<MultiLanguageStore> {
        Arc::new(MultiLanguageStore::default())
    }

    fn row(cells: &[&str], kind: EntityKind) -> RowModel {
        let raw: RawRow = cells.iter().copied().collect();
        RowModel::decode(&raw, 2, kind, "en", &MultiLanguageStore::default()).unwrap()
    }

    #[test]
    fn builds_payload_under_target_language() {
        let builder = JsonMergeBuilder::new(store());
        let row = row(
            &["d1", "홍길동", "이력", "en", "", "", "", "", "", "Hong", "Career"],
            EntityKind::Doctor,
        );

        let object = builder.build_updated_json(&row, "en");

        assert_eq!(
            serde_json::Value::Object(object),
            json!({"en": {"id": "d1", "name": "Hong", "history": "Career"}})
        );
    }

    #[test]
    fn keeps_existing_languages_in_old_json() {
        let builder = JsonMergeBuilder::new(store());
        let row = row(
            &[
                "h1",
                "서울병원",
                "",
                "en",
                "",
                "",
                r#"{"ja":{"id":"h1","name":"ソウル病院","description":"説明"}}"#,
                "Seoul Hospital",
                "About us",
            ],
            EntityKind::Hospital,
        );

        let object = builder.build_updated_json(&row, "en");

        assert_eq!(
            object["ja"],
            json!({"id": "h1", "name": "ソウル病院", "description": "説明"})
        );
        assert_eq!(
            object["en"],
            json!({"id": "h1", "name": "Seoul Hospital", "description": "About us"})
        );
    }

    #[test]
    fn repeated_builds_are_byte_identical() {
        let builder = JsonMergeBuilder::new(store());
        let row = row(
            &[
                "d1",
                "홍길동",
                "",
                "en",
                "",
                "",
                r#"{"th":{"name":"ฮง"},"ja":{"name":"ホン"}}"#,
                "",
                "",
                "Hong",
            ],
            EntityKind::Doctor,
        );

        let first = builder.build_json(&row, "en");
        let second = builder.build_json(&row, "en");

        assert_eq!(first.text, second.text);
        assert_eq!(first, second);
    }

    #[test]
    fn unconfigured_language_leaves_old_json_as_is() {
        let builder = JsonMergeBuilder::new(store());
        let row = row(
            &["d1", "홍길동", "", "", "", "", r#"{"en":{"name":"Hong"}}"#, "", "", "Hong"],
            EntityKind::Doctor,
        );

        let object = builder.build_updated_json(&row, "fr");

        assert_eq!(object, row.old_json_parsed);
    }

    #[test]
    fn batch_counts_multi_language_objects() {
        let builder = JsonMergeBuilder::new(store());
        let rows = vec![
            row(&["d1", "홍길동", "", "", "", "", "", "", "", "Hong"], EntityKind::Doctor),
            row(
                &["d2", "김철수", "", "", "", "", r#"{"ja":{"name":"キム"}}"#, "", "", "Kim"],
                EntityKind::Doctor,
            ),
        ];

        let batch = builder.build_batch_json(&rows, "en");

        assert_eq!(batch.succeeded, 2);
        assert_eq!(batch.failed, 0);
        assert_eq!(batch.multi_language, 1);
        assert!(batch.results.iter().all(RowJson::is_success));
        assert_eq!(batch.results[1].id, "d2");

        let objects: Vec<&MultiLanguageObject> =
            batch.built().map(|(_, built)| &built.json.object).collect();
        assert_eq!(builder.count_multi_language(objects), 1);
    }

    #[test]
    fn batch_works_without_parse_cache() {
        let uncached = Arc::new(MultiLanguageStore::new(StoreOptions {
            cache_max_entries: 0,
            ..StoreOptions::default()
        }));
        let rows = vec![row(&["d1", "홍길동", "", "", "", "", "", "M"], EntityKind::Doctor)];

        let cached = JsonMergeBuilder::new(store()).build_batch_json(&rows, "en");
        let plain = JsonMergeBuilder::new(uncached).build_batch_json(&rows, "en");

        let cached_text: Vec<_> = cached.built().map(|(_, b)| b.json.text.clone()).collect();
        let plain_text: Vec<_> = plain.built().map(|(_, b)| b.json.text.clone()).collect();
        assert_eq!(cached_text, plain_text);
    }

    #[test]
    fn merge_translations_overwrites_matching_rows_only() {
        let rows = vec![
            row(
                &["d1", "홍길동", "이력", "", "", "", "", "", "", "Old MT", "Old"],
                EntityKind::Doctor,
            ),
            row(&["d2", "김철수", "경력"], EntityKind::Doctor),
        ];
        let results = vec![
            TranslationResult::success(
                "d1",
                0,
                TranslatedFields {
                    name: "Gildong Hong".to_string(),
                    content: "Chief <surgeon>".to_string(),
                },
            ),
            TranslationResult::failure("d2", 1, "timeout"),
        ];

        let merged = merge_translations(&rows, &results);

        assert_eq!(merged[0].mt_name, "Gildong Hong");
        assert_eq!(merged[0].mt_content, "Chief &lt;surgeon&gt;");
        assert_eq!(merged[1], rows[1]);
        // Input rows are left as they were.
        assert_eq!(rows[0].mt_name, "Old MT");
    }

    #[test]
    fn fresh_translation_feeds_json_merge() {
        let builder = JsonMergeBuilder::new(store());
        let rows = vec![row(&["d1", "홍길동", "이력"], EntityKind::Doctor)];
        assert!(rows[0].needs_translation());

        let merged = merge_translations(
            &rows,
            &[TranslationResult::success(
                "d1",
                0,
                TranslatedFields {
                    name: "Hong".to_string(),
                    content: "Career".to_string(),
                },
            )],
        );

        assert!(!merged[0].needs_translation());
        let object = builder.build_updated_json(&merged[0], "en");
        assert_eq!(object["en"]["name"], json!("Hong"));
    }

    #[test]
    fn panic_message_handles_payload_types() {
        assert_eq!(panic_message(&"boom"), "boom");
        assert_eq!(panic_message(&"bang".to_string()), "bang");
        assert_eq!(panic_message(&42u8), "unexpected failure");
    }
}
