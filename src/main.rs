use anyhow::{Context, Result};
use clap::Parser;
use translog::cli::{Cli, Commands};
use translog::{init_tracing, utils, HistoryKind, HistoryStore, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("Failed to load configuration from {:?}", path))?,
        None => Settings::new().context("Failed to load configuration")?,
    };
    init_tracing(&settings.logging.level);

    let store = HistoryStore::new(&settings.history);
    tracing::debug!("Using history root {:?}", settings.history.storage_path);

    match cli.command {
        Commands::Translate {
            source,
            result,
            from,
            to,
        } => handle_translate(&store, &source, &result, &from, &to).await,
        Commands::Explain {
            source,
            result,
            template,
        } => handle_explain(&store, &source, &result, &template).await,
        Commands::Show { kind, date, json } => handle_show(&store, kind, date, json).await,
        Commands::Dates { kind } => handle_dates(&store, kind).await,
    }
}

async fn handle_translate(
    store: &HistoryStore,
    source: &str,
    result: &str,
    from: &str,
    to: &str,
) -> Result<()> {
    if !store.is_enabled() {
        utils::print_warning("History is disabled; nothing was recorded");
        return Ok(());
    }
    if let Some(record) = store.try_record_translation(source, result, from, to).await? {
        utils::print_success(&format!("Saved translation {}", record.id));
    }
    Ok(())
}

async fn handle_explain(
    store: &HistoryStore,
    source: &str,
    result: &str,
    template: &str,
) -> Result<()> {
    if !store.is_enabled() {
        utils::print_warning("History is disabled; nothing was recorded");
        return Ok(());
    }
    if let Some(record) = store.try_record_explanation(source, result, template).await? {
        utils::print_success(&format!("Saved explanation {}", record.id));
    }
    Ok(())
}

async fn handle_show(
    store: &HistoryStore,
    kind: HistoryKind,
    date: Option<chrono::NaiveDate>,
    json: bool,
) -> Result<()> {
    let date = date.unwrap_or_else(|| store.today());
    let records = store
        .load_partition(kind, date)
        .await
        .with_context(|| format!("Failed to load {} history for {}", kind, date))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    utils::print_header(&format!("{} history for {}", kind, date));
    if records.is_empty() {
        utils::print_info("No records");
    } else {
        utils::print_records(&records);
        utils::print_info(&format!("\n{} record(s)", records.len()));
    }
    Ok(())
}

async fn handle_dates(store: &HistoryStore, kind: HistoryKind) -> Result<()> {
    let dates = store
        .list_dates(kind)
        .await
        .with_context(|| format!("Failed to list {} history", kind))?;

    if dates.is_empty() {
        utils::print_info(&format!("No {} history yet", kind));
    }
    for date in dates {
        println!("{}", date);
    }
    Ok(())
}
