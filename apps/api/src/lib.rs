//! Resume / job-description relevance evaluation engine.
//!
//! Raw text → `extraction` → `scoring` → `models::evaluation::Evaluation`,
//! orchestrated by `evaluation::EvaluationEngine`. The binary in `main.rs`
//! hosts the engine behind a stateless HTTP surface.

pub mod config;
pub mod embedding_client;
pub mod errors;
pub mod evaluation;
pub mod extraction;
pub mod models;
pub mod policy;
pub mod routes;
pub mod scoring;
pub mod state;
