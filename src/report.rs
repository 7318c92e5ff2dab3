use crate::model::EntityKind;
use crate::sheet::{DecodeOutcome, DecodeStatistics};
use crate::translation::{BatchJson, ValueSource};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    Completed,
    CompletedWithErrors,
    Failed,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Running => write!(f, "running"),
            RunStatus::Completed => write!(f, "completed"),
            RunStatus::CompletedWithErrors => write!(f, "completed_with_errors"),
            RunStatus::Failed => write!(f, "failed"),
        }
    }
}

/// How many rows took their value from each source.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct SourceTally {
    pub manual: usize,
    pub machine_translation: usize,
    pub old: usize,
    pub old_json: usize,
    pub empty: usize,
}

impl SourceTally {
    pub fn record(&mut self, source: Option<ValueSource>) {
        match source {
            Some(ValueSource::Manual) => self.manual += 1,
            Some(ValueSource::MachineTranslation) => self.machine_translation += 1,
            Some(ValueSource::Old) => self.old += 1,
            Some(ValueSource::OldJson) => self.old_json += 1,
            None => self.empty += 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub kind: EntityKind,
    pub language: String,
    pub input: String,
    pub status: RunStatus,
    pub statistics: DecodeStatistics,
    pub decode_error_count: usize,
    pub decode_error_sample: Vec<String>,
    pub requests_written: usize,
    pub translations_applied: usize,
    pub translations_failed: usize,
    pub still_needs_translation: usize,
    pub rows_built: usize,
    pub merge_error_count: usize,
    pub merge_error_sample: Vec<String>,
    pub multi_language_objects: usize,
    pub name_sources: SourceTally,
    pub content_sources: SourceTally,
    pub rows_written: usize,
    pub rows_patched: usize,
    pub elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl RunReport {
    pub fn new(run_id: String, kind: EntityKind, language: &str, input: String) -> Self {
        Self {
            run_id,
            kind,
            language: language.to_string(),
            input,
            status: RunStatus::Running,
            statistics: DecodeStatistics::default(),
            decode_error_count: 0,
            decode_error_sample: Vec::new(),
            requests_written: 0,
            translations_applied: 0,
            translations_failed: 0,
            still_needs_translation: 0,
            rows_built: 0,
            merge_error_count: 0,
            merge_error_sample: Vec::new(),
            multi_language_objects: 0,
            name_sources: SourceTally::default(),
            content_sources: SourceTally::default(),
            rows_written: 0,
            rows_patched: 0,
            elapsed_ms: 0,
            failure: None,
        }
    }

    pub fn record_decode(&mut self, outcome: &DecodeOutcome, sample_size: usize) {
        self.statistics = outcome.statistics.clone();
        self.decode_error_count = outcome.errors.len();
        self.decode_error_sample = outcome
            .errors
            .iter()
            .take(sample_size)
            .map(|e| e.to_string())
            .collect();
    }

    pub fn record_batch(&mut self, batch: &BatchJson, sample_size: usize) {
        self.rows_built = batch.succeeded;
        self.merge_error_count = batch.failed;
        self.multi_language_objects = batch.multi_language;
        self.merge_error_sample = batch
            .errors()
            .take(sample_size)
            .map(|e| e.to_string())
            .collect();

        for (_, built) in batch.built() {
            self.name_sources.record(built.values.name_source);
            self.content_sources.record(built.values.content_source);
        }
    }

    pub fn finish(&mut self, elapsed_ms: u64) {
        self.elapsed_ms = elapsed_ms;
        self.status = if self.decode_error_count > 0 || self.merge_error_count > 0 {
            RunStatus::CompletedWithErrors
        } else {
            RunStatus::Completed
        };
    }

    pub fn fail(&mut self, reason: impl Into<String>) {
        self.status = RunStatus::Failed;
        self.failure = Some(reason.into());
    }

    pub fn progress(&self) -> f32 {
        if self.statistics.total > 0 {
            self.rows_built as f32 / self.statistics.total as f32
        } else {
            0.0
        }
    }
}
