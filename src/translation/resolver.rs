use crate::i18n::LanguagePayload;
use crate::model::RowModel;
use serde::Serialize;

/// Where a resolved value came from, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSource {
    Manual,
    MachineTranslation,
    Old,
    OldJson,
}

impl ValueSource {
    /// Fixed: manual > machine translation > old value > old JSON.
    pub const PRIORITY: [ValueSource; 4] = [
        ValueSource::Manual,
        ValueSource::MachineTranslation,
        ValueSource::Old,
        ValueSource::OldJson,
    ];

    fn candidate(self, row: &RowModel, field: Field) -> Option<&str> {
        match (self, field) {
            (ValueSource::Manual, Field::Name) => Some(row.manual_name.as_str()),
            (ValueSource::Manual, Field::Content) => Some(row.manual_content.as_str()),
            (ValueSource::MachineTranslation, Field::Name) => Some(row.mt_name.as_str()),
            (ValueSource::MachineTranslation, Field::Content) => Some(row.mt_content.as_str()),
            (ValueSource::Old, Field::Name) => Some(row.old_name.as_str()),
            (ValueSource::Old, Field::Content) => Some(row.old_content.as_str()),
            (ValueSource::OldJson, Field::Name) => row.old_json_values.name.as_deref(),
            (ValueSource::OldJson, Field::Content) => row.old_json_values.content.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Content,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedValue {
    pub value: String,
    pub source: Option<ValueSource>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalValues {
    pub id: String,
    pub name: String,
    pub content: String,
    pub name_source: Option<ValueSource>,
    pub content_source: Option<ValueSource>,
}

impl FinalValues {
    pub fn payload(&self) -> LanguagePayload {
        LanguagePayload {
            id: self.id.clone(),
            name: self.name.clone(),
            content: self.content.clone(),
        }
    }
}

pub struct ValueResolver;

impl ValueResolver {
    /// First non-blank candidate in `ValueSource::PRIORITY`. Missing and
    /// blank candidates are treated the same; with none left the value is "".
    pub fn resolve(row: &RowModel, field: Field) -> ResolvedValue {
        ValueSource::PRIORITY
            .iter()
            .find_map(|&source| {
                source
                    .candidate(row, field)
                    .filter(|value| !value.trim().is_empty())
                    .map(|value| ResolvedValue {
                        value: value.to_string(),
                        source: Some(source),
                    })
            })
            .unwrap_or(ResolvedValue {
                value: String::new(),
                source: None,
            })
    }

    pub fn final_values(row: &RowModel) -> FinalValues {
        let name = Self::resolve(row, Field::Name);
        let content = Self::resolve(row, Field::Content);

        FinalValues {
            id: row.id.clone(),
            name: name.value,
            content: content.value,
            name_source: name.source,
            content_source: content.source,
        }
    }

    pub fn needs_translation(row: &RowModel) -> bool {
        row.needs_translation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::MultiLanguageStore;
    use crate::model::{EntityKind, RawRow};

    fn full_row() -> RowModel {
        let raw: RawRow = [
            "d1",
            "홍길동",
            "이력",
            "en",
            "Old Name",
            "Old History",
            r#"{"en":{"id":"d1","name":"Json Name","history":"Json History"}}"#,
            "Manual Name",
            "Manual History",
            "Mt Name",
            "Mt History",
            "",
        ]
        .into_iter()
        .collect();
        RowModel::decode(&raw, 2, EntityKind::Doctor, "en", &MultiLanguageStore::default())
            .unwrap()
    }

    #[test]
    fn priority_chain_falls_through_in_order() {
        let mut row = full_row();
        let values = ValueResolver::final_values(&row);
        assert_eq!(values.name, "Manual Name");
        assert_eq!(values.content, "Manual History");
        assert_eq!(values.name_source, Some(ValueSource::Manual));

        row.manual_name.clear();
        row.manual_content.clear();
        let values = ValueResolver::final_values(&row);
        assert_eq!(values.name, "Mt Name");
        assert_eq!(values.content, "Mt History");
        assert_eq!(values.content_source, Some(ValueSource::MachineTranslation));

        row.mt_name.clear();
        row.mt_content.clear();
        let values = ValueResolver::final_values(&row);
        assert_eq!(values.name, "Old Name");
        assert_eq!(values.content, "Old History");

        row.old_name.clear();
        row.old_content.clear();
        let values = ValueResolver::final_values(&row);
        assert_eq!(values.name, "Json Name");
        assert_eq!(values.content, "Json History");
        assert_eq!(values.name_source, Some(ValueSource::OldJson));

        row.old_json_values.name = None;
        row.old_json_values.content = Some(String::new());
        let values = ValueResolver::final_values(&row);
        assert_eq!(values.name, "");
        assert_eq!(values.content, "");
        assert_eq!(values.name_source, None);
        assert_eq!(values.content_source, None);
        assert_eq!(values.id, "d1");
    }

    #[test]
    fn fields_resolve_independently() {
        let mut row = full_row();
        row.manual_content.clear();
        row.mt_content.clear();

        let values = ValueResolver::final_values(&row);
        assert_eq!(values.name, "Manual Name");
        assert_eq!(values.content, "Old History");
    }

    #[test]
    fn whitespace_only_candidate_is_skipped() {
        let mut row = full_row();
        row.manual_name = "   ".to_string();
        assert_eq!(ValueResolver::resolve(&row, Field::Name).value, "Mt Name");
    }

    #[test]
    fn needs_translation_matches_row() {
        let row = full_row();
        assert_eq!(ValueResolver::needs_translation(&row), row.needs_translation());
    }
}
