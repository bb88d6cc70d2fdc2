use anyhow::Context;
use clap::Parser;
use doc_search_index::cli::Cli;
use doc_search_index::config::load_metadata_file;
use doc_search_index::{IndexAssembler, IndexConfiguration, Manifest, discover_pages};
use serde_json::Map;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    doc_search_index::tracing::init(cli.verbose);

    let mut metadata = match &cli.metadata {
        Some(path) => load_metadata_file(path)
            .with_context(|| format!("Failed to load metadata from {}", path.display()))?,
        None => Map::new(),
    };
    cli.apply_overrides(&mut metadata);
    let config = IndexConfiguration::from_metadata(&mut metadata)
        .context("Invalid search index configuration")?;

    let manifest_path = cli.manifest_path();
    let pages = if manifest_path.is_file() {
        Manifest::load(&manifest_path)
            .with_context(|| format!("Failed to read manifest {}", manifest_path.display()))?
            .html_pages()
    } else {
        tracing::debug!(path = %manifest_path.display(), "No manifest, walking output directory");
        discover_pages(&cli.output_dir)
    };

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping after the current pages");
            on_interrupt.cancel();
        }
    });

    let mut assembler = IndexAssembler::new(config).with_cancellation(cancel);
    if let Some(jobs) = cli.jobs {
        assembler = assembler.with_concurrency(jobs);
    }

    assembler
        .process(&cli.output_dir, &pages)
        .await
        .context("Failed to build search index")?;

    Ok(())
}
