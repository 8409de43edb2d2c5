//! Shortlink registry - short link entries with generated or custom codes
//!
//! This library keeps a registry of short link entries, each mapping a short
//! URL to an original URL, and sweeps entries that have not been modified
//! for a configurable time.
//!
//! # Architecture
//! - `utils`: Short code encoding, clocks
//! - `storage`: Entry store trait, SeaORM and in-memory backends, id allocation
//! - `services`: Entry lifecycle and retention sweeping
//! - `config`: Configuration management
//! - `interfaces`: Command-line interface
//! - `system`: Logging and process lifetime

pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
