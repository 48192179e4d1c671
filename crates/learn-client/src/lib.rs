//! # learn-client
//!
//! Thin HTTP client for the LMS REST API and the
//! [`ProgressStore`](learn_module::ProgressStore) implementations built on
//! it. The engine in `learn-module` stays transport-agnostic; everything
//! wire-shaped lives here.

mod api;
mod config;
mod store;

pub use api::{ApiEnvelope, ClientError, LmsClient};
pub use config::ClientConfig;
pub use store::{HttpProgressStore, MemoryStore};
