//! # Acme RAG
//!
//! Retrieval-augmented question answering over Acme's internal documents.
//!
//! Acme RAG ingests plain-text company documents, indexes them as vector
//! embeddings in Pinecone, and answers employee questions by retrieving
//! relevant passages and generating a grounded response with an OpenAI
//! chat model. Broad queries ("hr", "products") are intercepted before
//! retrieval and answered from fixed guidance text.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────────┐   ┌───────────┐
//! │ data/*.txt│──▶│ Chunk + Embed │──▶│ Pinecone  │
//! └──────────┘   └───────────────┘   └─────┬─────┘
//!                                          │
//!   query ──▶ rules ──▶ normalize ──▶ embed ┴▶ retrieve ──▶ generate
//!               │                                              │
//!               └────────────── answer ◀──────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! export OPENAI_API_KEY=sk-...
//! export PINECONE_API_KEY=pc-...
//! rag ingest                    # index data/*.txt
//! rag ask "What is the vacation policy?"
//! rag serve                     # POST /api/chat on 0.0.0.0:8000
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML settings and environment secrets |
//! | [`models`] | Core data types |
//! | [`normalize`] | Query canonicalization (typos, shortcuts) |
//! | [`rules`] | Fixed answers for broad queries |
//! | [`chunk`] | Word-bounded text chunking |
//! | [`embedding`] | Embedding provider abstraction |
//! | [`generate`] | Grounded prompt construction and chat completion |
//! | [`store`] | Vector index abstraction (in-memory, Pinecone) |
//! | [`retrieve`] | Top-K retrieval with relevance filtering |
//! | [`pipeline`] | The question-answering orchestrator |
//! | [`ingest`] | Document ingestion into the vector index |
//! | [`server`] | HTTP API |

pub mod chunk;
pub mod config;
pub mod embedding;
pub mod generate;
pub mod ingest;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod retrieve;
pub mod rules;
pub mod server;
pub mod store;
