//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// Short link entry registry
#[derive(Parser)]
#[command(name = "shortlink-registry")]
#[command(version)]
#[command(about = "Manage short link entries and sweep stale ones", long_about = None)]
pub struct Cli {
    /// Configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Add an entry
    ///
    /// Without SHORT_URL a code is generated from the entry id.
    Add {
        /// Original URL the entry points to
        original_url: String,

        /// Custom short URL
        short_url: Option<String>,
    },

    /// Update an entry
    Update {
        /// Entry id
        id: i64,

        /// New original URL
        original_url: String,

        /// New short URL (custom entries only; default: keep current)
        #[arg(long)]
        short_url: Option<String>,

        /// Deactivate the entry instead of keeping it active
        #[arg(long)]
        inactive: bool,
    },

    /// Look up an entry by short URL
    Resolve {
        short_url: String,

        /// Search custom entries instead of generated ones
        #[arg(long)]
        custom: bool,
    },

    /// List entries page by page
    List {
        /// List custom entries instead of generated ones
        #[arg(long)]
        custom: bool,

        #[arg(long, default_value_t = 0)]
        offset: u64,

        #[arg(long, default_value_t = 20)]
        limit: u64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete entries not modified for a number of days, once
    Purge {
        /// Age threshold in days (default: retention.max_age_days)
        #[arg(long)]
        older_than_days: Option<u64>,
    },

    /// Run the retention sweeper until Ctrl+C
    Sweep,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add_without_short_url() {
        let cli = Cli::parse_from(["shortlink-registry", "add", "https://example.com"]);
        match cli.command {
            Commands::Add {
                original_url,
                short_url,
            } => {
                assert_eq!(original_url, "https://example.com");
                assert!(short_url.is_none());
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_parse_update_with_flags() {
        let cli = Cli::parse_from([
            "shortlink-registry",
            "-c",
            "custom.toml",
            "update",
            "7",
            "https://example.org",
            "--short-url",
            "docs",
            "--inactive",
        ]);
        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
        match cli.command {
            Commands::Update {
                id,
                short_url,
                inactive,
                ..
            } => {
                assert_eq!(id, 7);
                assert_eq!(short_url.as_deref(), Some("docs"));
                assert!(inactive);
            }
            _ => panic!("expected update"),
        }
    }
}
