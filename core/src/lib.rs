//! FraudNets dashboard engine.
//!
//! Ingests transaction batches and classifier verdicts, and keeps the
//! derived state a dashboard renders: a bounded transaction history, a
//! graph of accounts, a monotonic blacklist, running stats, pattern
//! counts, and a capped alert log. One `DashboardEngine` per session.

pub mod alerts;
pub mod blacklist;
pub mod category;
pub mod classifier;
pub mod client;
pub mod config;
pub mod cycle;
pub mod engine;
pub mod error;
pub mod event;
pub mod export;
pub mod graph;
pub mod history;
pub mod name_generator;
pub mod patterns;
pub mod rng;
pub mod sample;
pub mod session;
pub mod snapshot;
pub mod stats;
pub mod store;
pub mod transaction;
pub mod types;
