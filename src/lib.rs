//! # askpdf
//!
//! A PDF question-answering service: upload a PDF, index it in Qdrant, ask
//! questions answered by an LLM over retrieved context.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────────┐   ┌──────────┐
//! │ PDF file │──▶│   Pipeline    │──▶│  Qdrant  │
//! │ (upload) │   │ Extract+Chunk │   │ alias →  │
//! └──────────┘   │   +Embed      │   │ versioned│
//!                └───────────────┘   │collection│
//!                                    └────┬─────┘
//!                     ┌───────────────────┤
//!                     ▼                   ▼
//!                ┌──────────┐       ┌──────────┐
//!                │   CLI    │       │   HTTP   │
//!                │ (askpdf) │       │  (axum)  │
//!                └──────────┘       └──────────┘
//! ```
//!
//! Questions are embedded, the nearest chunks are retrieved from the
//! current index generation, and a chat-completion model generates the
//! answer from that context.
//!
//! ## Quick Start
//!
//! ```bash
//! export OPENAI_API_KEY=sk-...
//! askpdf ingest ./handbook.pdf      # index a document
//! askpdf ask "what is the refund policy?"
//! askpdf serve                      # start the HTTP API
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`models`] | Core data types |
//! | [`extract`] | PDF text extraction |
//! | [`chunk`] | Overlapping text chunking |
//! | [`embedding`] | Remote embeddings client |
//! | [`chat`] | Chat-completions client |
//! | [`store`] | Qdrant vector store (versioned generations behind an alias) |
//! | [`ingest`] | Upload pipeline: extract → chunk → embed → publish |
//! | [`answer`] | Question pipeline: embed → retrieve → generate |
//! | [`server`] | HTTP API |

pub mod answer;
pub mod chat;
pub mod chunk;
pub mod config;
pub mod embedding;
pub mod extract;
pub mod ingest;
pub mod models;
pub mod server;
pub mod store;
