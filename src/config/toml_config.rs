use crate::utils::error::{LaunchError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_required_field, validate_single_line,
    Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_PREFIX: &str = "DEBUG:";
pub const DEFAULT_LEVEL: &str = "info";
pub const VERBOSE_LEVEL: &str = "kernel_boot=debug,info";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LaunchConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub delegate: DelegateConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Literal marker written at the start of every line.
    pub prefix: String,
    /// `EnvFilter` directives, e.g. `info` or `kernel_boot=debug,info`.
    pub level: String,
    pub format: LogFormat,
    /// Let a valid `RUST_LOG` take precedence over `level`.
    pub respect_rust_log: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            level: DEFAULT_LEVEL.to_string(),
            format: LogFormat::default(),
            respect_rust_log: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Prefixed,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DelegateConfig {
    pub kind: DelegateKind,
    pub program: Option<String>,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub env: HashMap<String, String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DelegateKind {
    #[default]
    Noop,
    Command,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl LaunchConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LaunchError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| LaunchError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${KERNEL_HOME})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| LaunchError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.enabled
    }
}

impl Validate for LaunchConfig {
    fn validate(&self) -> Result<()> {
        validate_single_line("logging.prefix", &self.logging.prefix)?;
        validate_non_empty_string("logging.level", &self.logging.level)?;

        if self.delegate.kind == DelegateKind::Command {
            let program = validate_required_field("delegate.program", &self.delegate.program)?;
            validate_non_empty_string("delegate.program", program)?;
        }

        if let Some(dir) = &self.delegate.working_dir {
            validate_path("delegate.working_dir", &dir.to_string_lossy())?;
        }

        Ok(())
    }
}
