use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use tabdedup::{
    Corpus, DedupConfig, DedupReport, EngineKind, deduplicate_exact, deduplicate_fuzzy,
    deduplicate_hash_join,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tabdedup")]
#[command(version, about = "Find exact and near-duplicate tables in a JSON corpus", long_about = None)]
struct Cli {
    /// Corpus file: {"tables": [{"id": 1, "rows": [["a", "b"]], "super_keys": ["01"]}]}
    corpus: PathBuf,

    /// YAML configuration file; defaults apply when omitted
    config: Option<PathBuf>,

    /// Override the engine selected by the configuration
    #[arg(short, long)]
    engine: Option<EngineKind>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DedupConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DedupConfig::default(),
    };
    if let Some(engine) = cli.engine {
        config.engine = engine;
    }

    let corpus = Corpus::from_file(&cli.corpus)
        .with_context(|| format!("loading corpus {}", cli.corpus.display()))?;
    info!(tables = corpus.len(), engine = %config.engine, "corpus_loaded");

    let report = run(&config, &corpus)?;
    let output = json!({
        "engine": config.engine,
        "groups": report.groups,
        "true_positives": report.stats.true_positives,
        "false_positives": report.stats.false_positives,
        "compared_pairs": report.stats.compared_pairs,
        "precision": report.stats.precision(),
        "rejected_pairs": report.rejected_pairs,
    });
    let text = if cli.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{text}");
    Ok(())
}

fn run(config: &DedupConfig, corpus: &Corpus) -> Result<DedupReport> {
    let report = match config.engine {
        EngineKind::Exact => deduplicate_exact(&corpus.raw_tables(), &config.exact)?,
        EngineKind::HashJoin => {
            let tables = corpus
                .keyed_tables()
                .context("hash-join engine needs super_keys on every table")?;
            deduplicate_hash_join(&tables, &config.hash_join)?
        }
        EngineKind::Fuzzy => deduplicate_fuzzy(&corpus.raw_tables(), &config.fuzzy)?,
    };
    Ok(report)
}
