//! # RAG chatbot CLI (`rag`)
//!
//! The `rag` binary drives the Acme document chatbot. It ingests the
//! document corpus into the vector index, answers one-shot questions, and
//! serves the HTTP chat API.
//!
//! ## Usage
//!
//! ```bash
//! rag --config ./rag.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `rag ingest` | Chunk, embed, and upsert the data directory into the index |
//! | `rag ask "<question>"` | Answer a single question and print it |
//! | `rag serve` | Start the HTTP chat API |
//!
//! ## Examples
//!
//! ```bash
//! # Ingest ./data/*.txt into the configured Pinecone index
//! rag ingest
//!
//! # One-shot question from the terminal
//! rag ask "What is the vacation policy?"
//!
//! # Serve the chat API on the configured bind address
//! rag serve
//! ```
//!
//! `OPENAI_API_KEY` and `PINECONE_API_KEY` must be set in the environment
//! for every command.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use acme_rag::config::{load_config, Secrets};
use acme_rag::embedding::OpenAiEmbeddings;
use acme_rag::ingest::run_ingest;
use acme_rag::pipeline::RagPipeline;
use acme_rag::server::run_server;
use acme_rag::store::pinecone::PineconeIndex;

/// RAG chatbot over company documents.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file; a missing file falls back to defaults.
#[derive(Parser)]
#[command(
    name = "rag",
    about = "RAG chatbot over company documents",
    version,
    long_about = "Answers questions about a company document corpus by embedding the \
    query, retrieving the most relevant chunks from a Pinecone index, and generating \
    a grounded answer with an OpenAI chat model. Includes an ingestion command to \
    build the index and an HTTP server exposing the chat endpoint."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./rag.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Ingest the data directory into the vector index.
    ///
    /// Scans the configured data directory for `.txt` files, splits each
    /// into word chunks, embeds them, and upserts the vectors into the
    /// Pinecone index (creating the index on first run). Re-running over
    /// the same corpus overwrites records in place.
    Ingest,

    /// Answer a single question and print the result.
    Ask {
        /// The question to answer.
        question: String,
    },

    /// Start the HTTP chat API.
    ///
    /// Binds to the address configured in `[server].bind` and serves
    /// `POST /api/chat` plus a liveness root.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = load_config(&cli.config)?;
    let secrets = Secrets::from_env()?;

    match cli.command {
        Commands::Ingest => {
            let embedder = OpenAiEmbeddings::new(&cfg.openai, &secrets.openai_api_key)?;
            let index = PineconeIndex::new(&cfg.pinecone, &secrets.pinecone_api_key)?;
            run_ingest(&cfg, &embedder, &index).await?;
        }
        Commands::Ask { question } => {
            let pipeline = RagPipeline::from_config(&cfg, &secrets)?;
            let answer = pipeline.get_answer(&question).await?;
            println!("{}", answer);
        }
        Commands::Serve => {
            let pipeline = RagPipeline::from_config(&cfg, &secrets)?;
            run_server(&cfg, Arc::new(pipeline)).await?;
        }
    }

    Ok(())
}
