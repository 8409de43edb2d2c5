//! User interfaces
//!
//! - `cli`: command-line interface operating directly on the database

pub mod cli;
