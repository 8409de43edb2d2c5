//! System-level modules
//!
//! - Logging initialization
//! - Lifecycle management (shutdown signal handling)

pub mod lifetime;
pub mod logging;
