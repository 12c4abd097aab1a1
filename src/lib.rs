//! Study Bot is a small HTTP backend that answers study questions with a hosted
//! LLM and keeps a history of every exchange.
//!
//! | Endpoint | Purpose |
//! |----------|---------|
//! | `GET /` | Liveness check, no downstream calls |
//! | `POST /ask` | Validate a question, ask the model, store the exchange |
//! | `GET /history?limit=N` | Most recent exchanges, newest first (`1..=100`) |
//! | `DELETE /clear-history` | Remove every stored exchange |
//! | `GET /stats` | Number of stored exchanges |
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files, `.env` and environment variables
//! - [`db`]: SQLite connection bootstrap and schema
//! - [`chat`]: Chat records and the [`chat::ChatStore`] persistence gateway
//! - [`llm`]: The [`llm::LlmClient`] seam and the Groq chat-completions client
//! - [`api`]: axum router, handlers and error mapping
//! - [`server`]: Process wiring and the HTTP server loop
//! - [`cli`]: Terminal commands over the same store

pub mod api;
pub mod chat;
pub mod cli;
pub mod config;
pub mod db;
pub mod llm;
pub mod server;
