use sheet_translator::{run_tabs, AppConfig, EntityKind, MultiLanguageStore, RunStatus, TabJob};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("sheet_translator=info".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = env::args().collect();

    let config_path = flag_value(&args, "--config").unwrap_or("config.toml");
    let config = AppConfig::load_or_default(Some(config_path));

    let language = flag_value(&args, "--lang")
        .map(str::to_string)
        .unwrap_or_else(|| config.languages.target.clone());

    let jobs = match single_tab_job(&args)? {
        Some(job) => vec![job],
        None => config.tabs.iter().map(TabJob::from).collect(),
    };

    if jobs.is_empty() {
        tracing::warn!("No tabs configured; nothing to do");
        return Ok(());
    }

    tracing::info!(tabs = jobs.len(), language = %language, "Starting sheet translation run");

    let store = Arc::new(MultiLanguageStore::from_config(&config));
    let reports = run_tabs(jobs, language, store, Arc::new(config)).await;

    println!("{}", serde_json::to_string_pretty(&reports)?);

    let failed = reports
        .iter()
        .filter(|r| r.status == RunStatus::Failed)
        .count();
    if failed > 0 {
        anyhow::bail!("{} of {} tabs failed", failed, reports.len());
    }

    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

/// `--kind <doctor|hospital> --input <csv> --output <csv>` runs one tab
/// instead of the configured list.
fn single_tab_job(args: &[String]) -> anyhow::Result<Option<TabJob>> {
    let Some(kind) = flag_value(args, "--kind") else {
        return Ok(None);
    };

    let kind: EntityKind = kind.parse()?;
    let input = flag_value(args, "--input")
        .ok_or_else(|| anyhow::anyhow!("--input is required with --kind"))?;
    let output = flag_value(args, "--output")
        .ok_or_else(|| anyhow::anyhow!("--output is required with --kind"))?;

    Ok(Some(TabJob {
        kind,
        input: PathBuf::from(input),
        output: PathBuf::from(output),
        translations: flag_value(args, "--translations").map(PathBuf::from),
        requests: flag_value(args, "--requests").map(PathBuf::from),
    }))
}
