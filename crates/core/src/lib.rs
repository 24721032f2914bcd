//! explainer-core
//!
//! Core library for explaining reverse-engineered Objective-C binaries.
//!
//! It parses host symbol labels into class/method records, filters and groups them
//! by class, renders decompiled pseudo-code or per-block assembly listings as text,
//! sends that text to an explanation backend, and reflows the replies into comments
//! written back to the host.
//!
//! The host environment and the explanation service sit behind traits (`host`,
//! `services::explanation`) so every step is testable without either.

pub mod analysis;
pub mod config;
pub mod host;
pub mod model;
pub mod render;
pub mod services;

pub use config::ExplainerConfig;
pub use services::explainer::{Explainer, Mode, RunSummary};

/// Returns the library version as encoded at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
