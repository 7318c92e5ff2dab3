use crate::i18n::{MultiLanguageObject, MultiLanguageStore};
use crate::model::EntityKind;
use crate::utils::{escape_html, strip_cell_guard, DecodeReason, RowDecodeError};
use serde::{Deserialize, Serialize};

/// Fixed column layout shared by every sheet tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Id,
    KrName,
    KrContent,
    Language,
    OldName,
    OldContent,
    OldJson,
    ManualName,
    ManualContent,
    MtName,
    MtContent,
    UpdatedJson,
}

impl Column {
    pub const COUNT: usize = 12;

    pub const ALL: [Column; Column::COUNT] = [
        Column::Id,
        Column::KrName,
        Column::KrContent,
        Column::Language,
        Column::OldName,
        Column::OldContent,
        Column::OldJson,
        Column::ManualName,
        Column::ManualContent,
        Column::MtName,
        Column::MtContent,
        Column::UpdatedJson,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// One sheet row as rendered cell strings. Rows may be shorter than the
/// layout; missing trailing cells read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    cells: Vec<String>,
}

impl RawRow {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    pub fn cell(&self, column: Column) -> &str {
        self.cells
            .get(column.index())
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

}

impl From<Vec<String>> for RawRow {
    fn from(cells: Vec<String>) -> Self {
        Self::new(cells)
    }
}

impl<S: Into<String>> FromIterator<S> for RawRow {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// `name` and content pulled from `old_json[expected_language]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OldJsonValues {
    pub name: Option<String>,
    pub content: Option<String>,
}

impl OldJsonValues {
    fn extract(
        store: &MultiLanguageStore,
        parsed: &MultiLanguageObject,
        language: &str,
        kind: EntityKind,
    ) -> Self {
        match store.extract_language(parsed, language) {
            Some(entry) => Self {
                name: entry.get("name").and_then(|v| v.as_str()).map(escape_html),
                content: entry
                    .get(kind.content_field())
                    .and_then(|v| v.as_str())
                    .map(escape_html),
            },
            None => Self::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowModel {
    /// 1-based sheet row number, header rows included.
    pub row_number: usize,
    pub kind: EntityKind,
    pub expected_language: String,

    pub id: String,
    pub kr_name: String,
    pub kr_content: String,
    pub language: String,
    pub old_name: String,
    pub old_content: String,
    pub old_json: String,
    pub manual_name: String,
    pub manual_content: String,
    pub mt_name: String,
    pub mt_content: String,
    pub updated_json: String,

    pub old_json_parsed: MultiLanguageObject,
    pub old_json_values: OldJsonValues,
}

/// Snapshot of a row's derived flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowFlags {
    pub language_mismatch: bool,
    pub has_manual_override: bool,
    pub has_mt_translation: bool,
    pub has_old_values: bool,
    pub has_valid_old_json: bool,
    pub content_changed: bool,
    pub needs_translation: bool,
}

/// Trimmed, with the writer's formula guard removed, then escaped.
fn text_cell(raw: &RawRow, column: Column) -> String {
    escape_html(strip_cell_guard(raw.cell(column).trim()))
}

fn plain_cell(raw: &RawRow, column: Column) -> String {
    raw.cell(column).trim().to_string()
}

impl RowModel {
    /// Decodes a raw row in the context of the run's target language.
    /// `old_json_values` is keyed by `expected_language`, not by the row's
    /// own language column.
    pub fn decode(
        raw: &RawRow,
        row_number: usize,
        kind: EntityKind,
        expected_language: &str,
        store: &MultiLanguageStore,
    ) -> std::result::Result<Self, RowDecodeError> {
        let id = text_cell(raw, Column::Id);
        let kr_name = text_cell(raw, Column::KrName);

        if let Some(reason) = DecodeReason::from_presence(!id.is_empty(), !kr_name.is_empty()) {
            return Err(RowDecodeError { row_number, reason });
        }

        let old_json = plain_cell(raw, Column::OldJson);
        let old_json_parsed = store.parse(&old_json);
        let old_json_values =
            OldJsonValues::extract(store, &old_json_parsed, expected_language, kind);

        Ok(Self {
            row_number,
            kind,
            expected_language: expected_language.to_string(),
            id,
            kr_name,
            kr_content: text_cell(raw, Column::KrContent),
            language: plain_cell(raw, Column::Language),
            old_name: text_cell(raw, Column::OldName),
            old_content: text_cell(raw, Column::OldContent),
            old_json,
            manual_name: text_cell(raw, Column::ManualName),
            manual_content: text_cell(raw, Column::ManualContent),
            mt_name: text_cell(raw, Column::MtName),
            mt_content: text_cell(raw, Column::MtContent),
            updated_json: plain_cell(raw, Column::UpdatedJson),
            old_json_parsed,
            old_json_values,
        })
    }

    pub fn language_mismatch(&self) -> bool {
        !self.language.is_empty() && !self.language.eq_ignore_ascii_case(&self.expected_language)
    }

    pub fn has_manual_override(&self) -> bool {
        !self.manual_name.is_empty() || !self.manual_content.is_empty()
    }

    pub fn has_mt_translation(&self) -> bool {
        !self.mt_name.is_empty() || !self.mt_content.is_empty()
    }

    pub fn has_old_values(&self) -> bool {
        !self.old_name.is_empty() || !self.old_content.is_empty()
    }

    pub fn has_valid_old_json(&self) -> bool {
        !self.old_json_parsed.is_empty()
    }

    /// Compares the Korean source fields against the stored target-language
    /// `old_*` fields as literal strings. Without old values the row always
    /// counts as changed.
    pub fn content_changed(&self) -> bool {
        if !self.has_old_values() {
            return true;
        }
        self.kr_name != self.old_name || self.kr_content != self.old_content
    }

    pub fn needs_translation(&self) -> bool {
        !self.has_mt_translation() || (self.has_old_values() && self.content_changed())
    }

    pub fn flags(&self) -> RowFlags {
        RowFlags {
            language_mismatch: self.language_mismatch(),
            has_manual_override: self.has_manual_override(),
            has_mt_translation: self.has_mt_translation(),
            has_old_values: self.has_old_values(),
            has_valid_old_json: self.has_valid_old_json(),
            content_changed: self.content_changed(),
            needs_translation: self.needs_translation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(cells: &[&str]) -> RawRow {
        cells.iter().copied().collect()
    }

    fn decode(cells: &[&str]) -> RowModel {
        RowModel::decode(
            &raw(cells),
            2,
            EntityKind::Doctor,
            "en",
            &MultiLanguageStore::default(),
        )
        .unwrap()
    }

    #[test]
    fn short_rows_pad_with_empty_cells() {
        let row = decode(&["d1", "홍길동"]);
        assert_eq!(row.kr_content, "");
        assert_eq!(row.updated_json, "");
        assert!(row.old_json_parsed.is_empty());
        assert_eq!(row.old_json_values, OldJsonValues::default());
    }

    #[test]
    fn rejects_missing_id_or_name() {
        let store = MultiLanguageStore::default();
        let err = RowModel::decode(&raw(&["", "  "]), 5, EntityKind::Doctor, "en", &store)
            .unwrap_err();
        assert_eq!(err.row_number, 5);
        assert_eq!(err.reason, DecodeReason::MissingIdAndKrName);

        let err = RowModel::decode(&raw(&["d1"]), 6, EntityKind::Hospital, "en", &store)
            .unwrap_err();
        assert_eq!(err.reason, DecodeReason::MissingKrName);
    }

    #[test]
    fn text_fields_and_old_json_values_are_escaped() {
        let row = decode(&[
            "d1",
            "<홍길동>",
            "A & B",
            "en",
            "",
            "",
            r#"{"en":{"name":"Tom & Jerry"}}"#,
        ]);
        assert_eq!(row.kr_name, "&lt;홍길동&gt;");
        assert_eq!(row.kr_content, "A &amp; B");
        assert_eq!(row.old_json, r#"{"en":{"name":"Tom & Jerry"}}"#);
        assert_eq!(row.old_json_values.name.as_deref(), Some("Tom &amp; Jerry"));
    }

    #[test]
    fn formula_guard_from_previous_output_is_removed() {
        let row = decode(&[
            "d1",
            "홍길동",
            "",
            "en",
            "",
            "",
            "",
            "",
            "",
            "'=Hong",
            "'- 2010 graduated SNU",
        ]);
        assert_eq!(row.mt_name, "=Hong");
        assert_eq!(row.mt_content, "- 2010 graduated SNU");

        let quoted = decode(&["d1", "'홍길동'"]);
        assert_eq!(quoted.kr_name, "&#39;홍길동&#39;");
    }

    #[test]
    fn old_json_values_use_expected_language() {
        let cells = [
            "h1",
            "서울병원",
            "설명",
            "ja",
            "",
            "",
            r#"{"en":{"name":"Seoul Hospital","description":"About"},"ja":{"name":"ソウル病院"}}"#,
        ];
        let row = RowModel::decode(
            &raw(&cells),
            2,
            EntityKind::Hospital,
            "en",
            &MultiLanguageStore::default(),
        )
        .unwrap();

        assert_eq!(row.old_json_values.name.as_deref(), Some("Seoul Hospital"));
        assert_eq!(row.old_json_values.content.as_deref(), Some("About"));
        assert!(row.language_mismatch());
    }

    #[test]
    fn language_mismatch_ignores_blank_language() {
        assert!(!decode(&["d1", "홍길동", "", ""]).language_mismatch());
        assert!(!decode(&["d1", "홍길동", "", "EN"]).language_mismatch());
        assert!(decode(&["d1", "홍길동", "", "th"]).language_mismatch());
    }

    #[test]
    fn row_without_mt_always_needs_translation() {
        let row = decode(&["d1", "홍길동", "이력", "en", "홍길동", "이력"]);
        assert!(!row.has_mt_translation());
        assert!(row.needs_translation());
    }

    #[test]
    fn unchanged_source_with_mt_skips_translation() {
        let cells = [
            "d1", "홍길동", "이력", "en", "홍길동", "이력", "", "", "", "Hong", "Career",
        ];
        let row = decode(&cells);
        assert!(row.has_old_values());
        assert!(!row.content_changed());
        assert!(!row.needs_translation());

        let mut edited = cells;
        edited[1] = "홍길등";
        let row = decode(&edited);
        assert!(row.content_changed());
        assert!(row.needs_translation());
    }

    #[test]
    fn mt_without_old_values_does_not_need_translation() {
        let row = decode(&["d1", "홍길동", "", "", "", "", "", "", "", "Hong", ""]);
        assert!(row.content_changed());
        assert!(!row.needs_translation());
    }

    // The Korean source is compared against the stored English
    // values, so a translated row always reads as changed.
    #[test]
    fn cross_language_comparison_always_reports_change() {
        let row = decode(&[
            "d1",
            "홍길동",
            "이력...",
            "en",
            "John Doe",
            "History...",
            "{}",
            "",
            "",
            "",
            "",
            "",
        ]);
        assert!(row.has_old_values());
        assert!(row.content_changed());
        assert!(row.needs_translation());
        assert!(!row.has_valid_old_json());
    }

    #[test]
    fn flags_snapshot_matches_methods() {
        let row = decode(&["d1", "홍길동", "", "en", "", "", "", "Manual", "", "", ""]);
        let flags = row.flags();
        assert!(flags.has_manual_override);
        assert!(!flags.has_old_values);
        assert_eq!(flags.needs_translation, row.needs_translation());
    }
}
