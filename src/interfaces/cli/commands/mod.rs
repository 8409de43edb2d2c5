mod config_gen;
mod entries;
mod retention;

pub use config_gen::generate_config;
pub use entries::{add_entry, list_entries, resolve_entry, update_entry};
pub use retention::{purge, sweep};
