pub mod settings;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_non_empty_string, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "pref-origin")]
#[command(about = "Show the effective value of a preference and which layer defines it")]
pub struct CliConfig {
    /// Preference domain, e.g. com.apple.dock
    pub domain: String,

    /// Preference key, e.g. autohide
    pub key: String,

    /// Pass `value` to print only the value
    pub mode: Option<String>,

    #[arg(long, help = "Print the report as JSON")]
    pub json: bool,

    #[arg(long, env = "PREF_ORIGIN_CONFIG", help = "Path to a config file")]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        env = "PREF_ORIGIN_SNAPSHOT",
        help = "Read preferences from a TOML snapshot instead of the system"
    )]
    pub snapshot: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("domain", &self.domain)?;
        validate_non_empty_string("key", &self.key)
    }
}
