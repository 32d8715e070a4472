//! # casebook-llm — schema-constrained LLM calls
//!
//! Everything casebook needs from the remote completion service:
//!
//! - **Envelope** — request with model, instructions, prompt and output schema
//! - **Transport** — one POST, raw body back ([`HttpTransport`])
//! - **Retry** — bounded exponential backoff as a decorator ([`RetryingTransport`])
//! - **Response** — tolerant extraction of the answer text from either
//!   envelope shape
//!
//! ```text
//! PromptSet ──► ResponsesRequest ──► RetryingTransport<HttpTransport> ──► raw body
//!                                                                          │
//!                               answer text ◄── extract_output_text ◄──────┘
//! ```
//!
//! This crate knows nothing about crash cases; schemas arrive as plain
//! [`serde_json::Value`].

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod prompt;
pub mod response;
pub mod retry;
pub mod transport;

pub use client::HttpTransport;
pub use config::{LlmConfig, RetryConfig, RetryScope};
pub use envelope::ResponsesRequest;
pub use error::LlmError;
pub use prompt::PromptSet;
pub use response::extract_output_text;
pub use retry::{RetryPolicy, RetryingTransport};
pub use transport::{ScriptedTransport, Transport};
