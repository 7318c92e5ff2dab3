use crate::i18n::MultiLanguageStore;
use crate::model::{EntityKind, RawRow, RowModel};
use crate::utils::RowDecodeError;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecodeStatistics {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub needs_translation: usize,
    pub with_manual_override: usize,
    pub with_mt_translation: usize,
    pub with_old_values: usize,
    pub with_valid_old_json: usize,
    pub with_content_changes: usize,
    pub language_mismatches: usize,
}

impl DecodeStatistics {
    /// Tallies over the decoded rows. `total` counts rejected rows as well.
    pub fn tally(rows: &[RowModel], total: usize) -> Self {
        let mut stats = DecodeStatistics {
            total,
            valid: rows.len(),
            invalid: total.saturating_sub(rows.len()),
            ..Default::default()
        };

        for row in rows {
            let flags = row.flags();
            stats.needs_translation += usize::from(flags.needs_translation);
            stats.with_manual_override += usize::from(flags.has_manual_override);
            stats.with_mt_translation += usize::from(flags.has_mt_translation);
            stats.with_old_values += usize::from(flags.has_old_values);
            stats.with_valid_old_json += usize::from(flags.has_valid_old_json);
            stats.with_content_changes +=
                usize::from(flags.has_old_values && flags.content_changed);
            stats.language_mismatches += usize::from(flags.language_mismatch);
        }

        stats
    }
}

#[derive(Debug, Clone, Default)]
pub struct DecodeOutcome {
    pub rows: Vec<RowModel>,
    pub errors: Vec<RowDecodeError>,
    pub statistics: DecodeStatistics,
}

/// Decodes every data row of a tab. Rejected rows are collected in
/// `errors` and never stop the rest of the batch.
pub fn decode_all(
    raw_rows: &[RawRow],
    kind: EntityKind,
    expected_language: &str,
    header_rows: usize,
    store: &MultiLanguageStore,
) -> DecodeOutcome {
    let mut rows = Vec::with_capacity(raw_rows.len());
    let mut errors = Vec::new();

    for (index, raw) in raw_rows.iter().enumerate() {
        let row_number = header_rows + index + 1;
        match RowModel::decode(raw, row_number, kind, expected_language, store) {
            Ok(row) => rows.push(row),
            Err(e) => {
                debug!(row_number = row_number, reason = %e.reason, "Rejected row");
                errors.push(e);
            }
        }
    }

    let statistics = DecodeStatistics::tally(&rows, raw_rows.len());

    info!(
        kind = %kind,
        language = expected_language,
        total = statistics.total,
        valid = statistics.valid,
        invalid = statistics.invalid,
        needs_translation = statistics.needs_translation,
        "Decoded sheet rows"
    );

    DecodeOutcome {
        rows,
        errors,
        statistics,
    }
}
