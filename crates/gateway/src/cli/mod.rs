pub mod ask;
pub mod config;

use clap::{Parser, Subcommand};

/// assist-relay: a backend relay for a remote AI assistant service.
#[derive(Debug, Parser)]
#[command(name = "assist-relay", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP relay (default when no subcommand is given).
    Serve,
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Send a single user message through the assistant and print the reply.
    Ask {
        /// The message to send.
        message: String,
        /// Print `{"reply": ...}` instead of plain text.
        #[arg(long)]
        json: bool,
    },
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

// ── Config loading helper ─────────────────────────────────────────────

/// Load the configuration from the path specified by `AR_CONFIG` (or
/// `config.toml` by default), then apply environment overrides.
/// Returns the parsed [`Config`](ar_domain::config::Config) and the path
/// that was used.
pub fn load_config() -> anyhow::Result<(ar_domain::config::Config, String)> {
    let config_path =
        std::env::var("AR_CONFIG").unwrap_or_else(|_| "config.toml".into());

    let mut config = if std::path::Path::new(&config_path).exists() {
        let raw = std::fs::read_to_string(&config_path)
            .map_err(|e| anyhow::anyhow!("reading {config_path}: {e}"))?;
        toml::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("parsing {config_path}: {e}"))?
    } else {
        ar_domain::config::Config::default()
    };
    config.apply_env_overrides();

    Ok((config, config_path))
}
