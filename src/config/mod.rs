pub mod toml_config;

#[cfg(feature = "cli")]
use crate::adapters::viacep::DEFAULT_BASE_URL;
#[cfg(feature = "cli")]
use crate::domain::model::SequencePolicy;
#[cfg(feature = "cli")]
use crate::domain::ports::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "cep-autofill")]
#[command(about = "CEP input mask and ViaCEP address auto-fill")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Lookup service base URL (overrides the config file)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// How overlapping lookups are reconciled (overrides the config file)
    #[arg(long, value_enum, global = true)]
    pub sequence_policy: Option<SequencePolicy>,

    #[arg(long, global = true)]
    pub user_agent: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Apply the CEP input mask to a raw value
    Format { raw: String },

    /// Look up the address registered for a CEP
    Lookup {
        cep: String,
        /// Print the address as JSON
        #[arg(long)]
        json: bool,
    },

    /// Type into an in-memory form, blur the CEP field and print the form
    Fill {
        keystrokes: String,
        /// Pre-existing complement text
        #[arg(long)]
        complement: Option<String>,
    },
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Resolves the effective settings: config file (if any), then flag overrides.
    pub fn load_settings(&self) -> Result<TomlConfig> {
        let mut settings = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };

        settings.apply_overrides(self.base_url.as_deref(), self.sequence_policy);
        if let Some(user_agent) = &self.user_agent {
            settings.lookup.user_agent = Some(user_agent.clone());
        }

        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn lookup_base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    fn sequence_policy(&self) -> SequencePolicy {
        self.sequence_policy.unwrap_or_default()
    }

    fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }
}
