use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use askrepo_core::answer::AnswerEngine;
use askrepo_core::config::{Config, ProviderKind};
use askrepo_index::indexer::{Indexer, IndexerConfig};
use askrepo_index::retriever::{RetrievalConfig, Retriever};
use askrepo_llm::any::AnyProvider;
use askrepo_llm::gemini::GeminiProvider;
use askrepo_llm::ollama::OllamaProvider;
use askrepo_store::{MemoryVectorStore, VectorStore};

#[derive(Parser)]
#[command(name = "askrepo", version, about = "Ask questions about a code repository")]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, default_value = "askrepo.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Index a local repository directory and write the snapshot.
    Index { path: PathBuf },
    /// Answer a question; starts an interactive loop when omitted.
    Ask { question: Option<String> },
    /// Show the top matching chunks without calling the LLM.
    Search { query: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    config.validate()?;

    let provider = Arc::new(create_provider(&config));
    health_check(&provider).await;

    match cli.command {
        Command::Index { path } => run_index(&config, provider, &path).await,
        Command::Ask { question } => run_ask(&config, &provider, question).await,
        Command::Search { query } => run_search(&config, &provider, &query).await,
    }
}

fn create_provider(config: &Config) -> AnyProvider {
    match config.llm.provider {
        ProviderKind::Ollama => {
            let base_url = config
                .llm
                .base_url
                .as_deref()
                .unwrap_or("http://localhost:11434");
            AnyProvider::Ollama(OllamaProvider::new(
                base_url,
                config.llm.model.clone(),
                config.llm.embedding_model.clone(),
            ))
        }
        ProviderKind::Gemini => {
            let base_url = config
                .llm
                .base_url
                .clone()
                .unwrap_or_else(|| askrepo_llm::gemini::DEFAULT_BASE_URL.to_string());
            AnyProvider::Gemini(GeminiProvider::new(
                config.llm.api_key.clone().unwrap_or_default(),
                base_url,
                config.llm.model.clone(),
                Some(config.llm.embedding_model.clone()),
            ))
        }
    }
}

async fn health_check(provider: &AnyProvider) {
    if let AnyProvider::Ollama(ollama) = provider
        && let Err(e) = ollama.health_check().await
    {
        tracing::warn!("{e}");
    }
}

async fn run_index(
    config: &Config,
    provider: Arc<AnyProvider>,
    path: &Path,
) -> anyhow::Result<()> {
    anyhow::ensure!(path.is_dir(), "not a directory: {}", path.display());

    let store = Arc::new(MemoryVectorStore::new());
    let store_dyn: Arc<dyn VectorStore> = store.clone();
    let indexer = Indexer::new(
        store_dyn,
        provider,
        IndexerConfig {
            max_file_bytes: config.index.max_file_bytes,
        },
    );

    let report = indexer.index_repository(path).await?;

    let snapshot_path = Path::new(&config.store.snapshot_path);
    store
        .save(snapshot_path)
        .with_context(|| format!("failed to write snapshot to {}", snapshot_path.display()))?;

    println!(
        "Indexed {} of {} files: {} chunks in {} ms",
        report.files_indexed, report.files_scanned, report.chunks_stored, report.duration_ms
    );
    for error in &report.errors {
        println!("  error: {error}");
    }
    println!("Snapshot written to {}", snapshot_path.display());
    Ok(())
}

fn load_store(config: &Config) -> anyhow::Result<Arc<dyn VectorStore>> {
    let path = Path::new(&config.store.snapshot_path);
    let store = MemoryVectorStore::load(path).with_context(|| {
        format!(
            "no index snapshot at {}; run `askrepo index <path>` first",
            path.display()
        )
    })?;
    Ok(Arc::new(store))
}

fn build_retriever(
    config: &Config,
    provider: &Arc<AnyProvider>,
) -> anyhow::Result<Retriever<AnyProvider>> {
    let store = load_store(config)?;
    Ok(Retriever::new(
        store,
        Arc::clone(provider),
        RetrievalConfig {
            top_k: config.retrieval.top_k,
            score_threshold: config.retrieval.score_threshold,
        },
    ))
}

async fn run_ask(
    config: &Config,
    provider: &Arc<AnyProvider>,
    question: Option<String>,
) -> anyhow::Result<()> {
    let retriever = build_retriever(config, provider)?;
    let engine = AnswerEngine::new(retriever, Arc::clone(provider));

    if let Some(question) = question {
        let answer = engine.answer(&question).await?;
        println!("\n{answer}");
        return Ok(());
    }

    loop {
        let input: String = dialoguer::Input::new()
            .with_prompt("Ask a question (or type 'exit')")
            .interact_text()?;
        if input.trim().eq_ignore_ascii_case("exit") {
            break;
        }
        match engine.answer(&input).await {
            Ok(answer) => println!("\n{answer}\n"),
            Err(e) => tracing::error!("{e:#}"),
        }
    }
    Ok(())
}

async fn run_search(
    config: &Config,
    provider: &Arc<AnyProvider>,
    query: &str,
) -> anyhow::Result<()> {
    let retriever = build_retriever(config, provider)?;
    let chunks = retriever.retrieve(query).await?;

    if chunks.is_empty() {
        println!("No matching chunks.");
        return Ok(());
    }

    for (i, chunk) in chunks.iter().enumerate() {
        println!(
            "{}. {} (chunk {}) score {:.3}",
            i + 1,
            chunk.file,
            chunk.chunk_number,
            chunk.score
        );
        println!("{}\n", chunk.text);
    }
    Ok(())
}
