//! # casebook-core
//!
//! Data model and flat-file store for the casebook crash knowledge base.
//!
//! A **case** links a crash signature to the pull request that fixed it and a
//! narrative explanation. Each case is stored twice:
//!
//! - **Full case** ([`CaseOutput`]) — exactly what the model extracted.
//! - **Minimal case** ([`MinimalCase`]) — a compact projection used as the
//!   comparison corpus when matching a new crash.
//!
//! ```text
//! crash.txt + pr.txt ──► CaseOutput ──► projection ──► MinimalCase
//!                            │                             │
//!                            ▼                             ▼
//!                  cases/case-<id>.json        cases_min/case-<id>.json
//! ```
//!
//! This crate never touches the network. The output-contract schemas handed to
//! the model live in [`schema`].

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod projection;
pub mod schema;
pub mod store;
pub mod types;

pub use config::StoreConfig;
pub use error::CaseError;
pub use store::CaseStore;
pub use types::*;
