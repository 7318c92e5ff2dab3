use crate::i18n::MultiLanguageStore;
use crate::model::EntityKind;
use crate::report::RunReport;
use crate::sheet::{decode_all, DecodeStatistics, SheetTabReader, SheetTabWriter, WriteInstruction};
use crate::translation::{
    collect_requests, index_translations, load_results, merge_translations, write_requests,
    JsonMergeBuilder,
};
use crate::utils::{AppConfig, Result, SheetTranslatorError, TabConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

/// One sheet tab to process.
#[derive(Debug, Clone)]
pub struct TabJob {
    pub kind: EntityKind,
    pub input: PathBuf,
    pub output: PathBuf,
    pub translations: Option<PathBuf>,
    pub requests: Option<PathBuf>,
}

impl From<&TabConfig> for TabJob {
    fn from(tab: &TabConfig) -> Self {
        Self {
            kind: tab.kind,
            input: tab.input.clone(),
            output: tab.output.clone(),
            translations: tab.translations.clone(),
            requests: tab.requests.clone(),
        }
    }
}

/// Read, decode, merge fresh translations, build JSON and write one tab.
pub fn run_tab(
    job: &TabJob,
    language: &str,
    store: Arc<MultiLanguageStore>,
    config: &AppConfig,
) -> Result<RunReport> {
    let started = Instant::now();
    let run_id = Uuid::new_v4().to_string();
    let sample_size = config.report.error_sample_size;

    let span = tracing::info_span!("tab", run_id = %run_id, kind = %job.kind);
    let _entered = span.enter();

    if !store.is_valid_language(language) {
        return Err(SheetTranslatorError::InvalidLanguage(language.to_string()));
    }

    let mut report = RunReport::new(
        run_id,
        job.kind,
        language,
        job.input.display().to_string(),
    );

    let tab = SheetTabReader::new(&job.input)
        .with_header_rows(config.sheet.header_rows)
        .read()?;

    let decoded = decode_all(
        &tab.rows,
        job.kind,
        language,
        tab.header_rows.len(),
        &store,
    );
    report.record_decode(&decoded, sample_size);

    for e in decoded.errors.iter().take(sample_size) {
        warn!(row_number = e.row_number, reason = %e.reason, "Row excluded from working set");
    }

    if let Some(path) = &job.requests {
        let requests = collect_requests(&decoded.rows, language);
        write_requests(path, &requests)?;
        report.requests_written = requests.len();
        info!(path = %path.display(), requests = requests.len(), "Wrote translation requests");
    }

    let rows = match &job.translations {
        Some(path) => {
            let loaded = load_results(path)?;
            let results = loaded.results;
            let usable = index_translations(&results);

            report.translations_applied = decoded
                .rows
                .iter()
                .filter(|row| usable.contains_key(row.id.as_str()))
                .count();
            report.translations_failed = results.iter().filter(|r| r.fields().is_none()).count()
                + loaded.malformed.len();

            for malformed in &loaded.malformed {
                warn!(
                    path = %path.display(),
                    position = malformed.position,
                    reason = %malformed.reason,
                    "Skipping malformed translation result"
                );
            }

            for failed in results.iter().filter(|r| r.fields().is_none()) {
                warn!(
                    id = %failed.id,
                    row_index = failed.row_index,
                    error = failed.error.as_deref().unwrap_or("missing translation"),
                    "Translation result not applied"
                );
            }

            merge_translations(&decoded.rows, &results)
        }
        None => decoded.rows,
    };

    report.still_needs_translation =
        DecodeStatistics::tally(&rows, report.statistics.total).needs_translation;

    let builder = JsonMergeBuilder::new(Arc::clone(&store));
    let batch = builder.build_batch_json(&rows, language);
    report.record_batch(&batch, sample_size);

    let instructions: Vec<WriteInstruction> = batch
        .built()
        .map(|(result, built)| WriteInstruction {
            row_number: result.row_number,
            id: result.id.clone(),
            name: built.values.name.clone(),
            content: built.values.content.clone(),
            json: built.json.text.clone(),
        })
        .collect();

    let mut writer = SheetTabWriter::new(&job.output);
    report.rows_patched =
        writer.write_tab(&tab, &instructions, config.sheet.target_columns(job.kind))?;
    report.rows_written = writer.finish()?;

    report.finish(started.elapsed().as_millis() as u64);

    info!(
        status = %report.status,
        rows_written = report.rows_written,
        rows_patched = report.rows_patched,
        output = %job.output.display(),
        "Tab completed"
    );

    Ok(report)
}

/// Runs every tab on the blocking pool concurrently. Tabs share `store`;
/// a failing tab becomes a failed report and the others carry on.
pub async fn run_tabs(
    jobs: Vec<TabJob>,
    language: String,
    store: Arc<MultiLanguageStore>,
    config: Arc<AppConfig>,
) -> Vec<RunReport> {
    let handles: Vec<_> = jobs
        .into_iter()
        .map(|job| {
            let language = language.clone();
            let store = Arc::clone(&store);
            let config = Arc::clone(&config);
            let task_job = job.clone();
            let handle = tokio::task::spawn_blocking(move || {
                run_tab(&task_job, &language, store, &config)
            });
            (job, handle)
        })
        .collect();

    let mut reports = Vec::with_capacity(handles.len());

    for (job, handle) in handles {
        match handle.await {
            Ok(Ok(report)) => reports.push(report),
            Ok(Err(e)) => {
                error!(input = %job.input.display(), error = %e, "Tab failed");
                reports.push(failed_report(&job, &language, e.to_string()));
            }
            Err(e) => {
                error!(input = %job.input.display(), error = %e, "Tab task aborted");
                reports.push(failed_report(&job, &language, e.to_string()));
            }
        }
    }

    reports
}

fn failed_report(job: &TabJob, language: &str, reason: String) -> RunReport {
    let mut report = RunReport::new(
        Uuid::new_v4().to_string(),
        job.kind,
        language,
        job.input.display().to_string(),
    );
    report.fail(reason);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::RunStatus;

    #[test]
    fn rejects_unconfigured_language_before_reading() {
        let job = TabJob {
            kind: EntityKind::Doctor,
            input: PathBuf::from("/no/such/input.csv"),
            output: PathBuf::from("/no/such/output.csv"),
            translations: None,
            requests: None,
        };
        let err = run_tab(
            &job,
            "fr",
            Arc::new(MultiLanguageStore::default()),
            &AppConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SheetTranslatorError::InvalidLanguage(code) if code == "fr"));
    }

    #[test]
    fn failed_report_carries_reason() {
        let job = TabJob {
            kind: EntityKind::Hospital,
            input: PathBuf::from("hospitals.csv"),
            output: PathBuf::from("out.csv"),
            translations: None,
            requests: None,
        };
        let report = failed_report(&job, "th", "File not found: hospitals.csv".to_string());
        assert_eq!(report.status, RunStatus::Failed);
        assert_eq!(report.kind, EntityKind::Hospital);
        assert_eq!(report.failure.as_deref(), Some("File not found: hospitals.csv"));
    }
}
