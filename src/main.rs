//! # askpdf CLI
//!
//! The `askpdf` binary runs the question-answering service and provides
//! terminal equivalents of its two pipelines.
//!
//! ## Usage
//!
//! ```bash
//! askpdf --config ./config/askpdf.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `askpdf serve` | Start the HTTP server |
//! | `askpdf ingest <file.pdf>` | Index a PDF from disk |
//! | `askpdf ask "<question>"` | Answer a question over the indexed document |
//! | `askpdf status` | Show the current index generation and point count |
//!
//! Secrets come from the environment (`OPENAI_API_KEY`, optionally
//! `QDRANT_API_KEY`); a `.env` file in the working directory is honored.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use askpdf::answer;
use askpdf::chat::ChatClient;
use askpdf::config::{self, Config};
use askpdf::embedding::EmbeddingClient;
use askpdf::ingest;
use askpdf::models::Answer;
use askpdf::server;
use askpdf::store::VectorStore;

/// askpdf — a PDF question-answering service backed by Qdrant and an LLM.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/askpdf.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "askpdf",
    about = "askpdf — upload a PDF, index it in Qdrant, ask questions answered by an LLM",
    version,
    long_about = "askpdf chunks and embeds uploaded PDFs, stores the vectors in a Qdrant \
    collection behind a stable alias, and answers natural-language questions by retrieving \
    the most similar chunks and forwarding them with the question to a chat-completion model."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/askpdf.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server.
    ///
    /// Binds to the address configured in `[server].bind` and serves
    /// `POST /upload-pdf/`, `POST /ask-question/`, and `GET /`.
    Serve,

    /// Index a PDF from disk.
    ///
    /// Extracts the text, chunks and embeds it, and publishes a new index
    /// generation. Replaces whatever was indexed before.
    Ingest {
        /// Path to the PDF file.
        file: PathBuf,
    },

    /// Answer a question over the indexed document.
    Ask {
        /// The question to answer.
        question: String,
    },

    /// Show the current index generation and its point count.
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Ingest { file } => {
            run_ingest(&cfg, &file).await?;
        }
        Commands::Ask { question } => {
            run_ask(&cfg, &question).await?;
        }
        Commands::Status => {
            run_status(&cfg).await?;
        }
    }

    Ok(())
}

async fn run_ingest(config: &Config, file: &Path) -> Result<()> {
    let embedder = EmbeddingClient::new(&config.openai, &config.embedding)?;
    let store = VectorStore::connect(&config.qdrant, embedder.dims())?;

    let report = ingest::ingest_pdf_file(config, &embedder, &store, file).await?;

    println!("ingest {}", file.display());
    println!("  characters extracted: {}", report.chars);
    println!("  chunks embedded: {}", report.chunks);
    println!("  collection: {}", report.collection);
    println!("ok");

    Ok(())
}

async fn run_ask(config: &Config, question: &str) -> Result<()> {
    let embedder = EmbeddingClient::new(&config.openai, &config.embedding)?;
    let chat = ChatClient::new(&config.openai, &config.chat)?;
    let store = VectorStore::connect(&config.qdrant, embedder.dims())?;

    match answer::answer_question(config, &embedder, &chat, &store, question).await? {
        Answer::Generated(text) => println!("{}", text),
        Answer::NotIndexed => println!("{}", answer::NOT_INDEXED_ANSWER),
    }

    Ok(())
}

async fn run_status(config: &Config) -> Result<()> {
    let store = VectorStore::connect(&config.qdrant, config.embedding.dims)?;

    match store.generation().await? {
        Some(generation) => {
            let points = store.point_count().await?;
            println!("status");
            println!("  alias: {} -> {}", config.qdrant.collection, generation);
            println!("  points: {}", points);
        }
        None => {
            println!("no index generation published yet");
        }
    }

    Ok(())
}
