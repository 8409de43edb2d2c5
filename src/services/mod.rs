//! Service layer: entry lifecycle and retention sweeping

mod entry_service;
mod retention;

pub use entry_service::EntryService;
pub use retention::RetentionSweeper;
