pub mod toml_config;

pub use toml_config::{
    DelegateConfig, DelegateKind, LaunchConfig, LogFormat, LoggingConfig, MonitoringConfig,
};

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "kernel-boot")]
#[command(about = "Configure logging and hand the process over to the application kernel")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log process CPU and memory around the run")]
    pub monitor: bool,

    /// Marker written at the start of every log line
    #[arg(long)]
    pub prefix: Option<String>,

    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Program (and arguments) to run as the application delegate
    #[arg(last = true)]
    pub command: Vec<String>,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the config file, if any, and applies command line overrides on top.
    pub fn resolve(&self) -> Result<LaunchConfig> {
        let mut config = match &self.config {
            Some(path) => LaunchConfig::from_file(path)?,
            None => LaunchConfig::default(),
        };

        if self.verbose {
            config.logging.level = toml_config::VERBOSE_LEVEL.to_string();
        }
        if self.monitor {
            config.monitoring.enabled = true;
        }
        if let Some(prefix) = &self.prefix {
            config.logging.prefix = prefix.clone();
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
        if let Some((program, args)) = self.command.split_first() {
            config.delegate.kind = DelegateKind::Command;
            config.delegate.program = Some(program.clone());
            config.delegate.args = args.to_vec();
        }

        Ok(config)
    }
}
