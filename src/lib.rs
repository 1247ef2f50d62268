pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::{LaunchConfig, LogFormat, LoggingConfig};
pub use crate::core::delegates::{build_delegate, BlockOn, FnDelegate, NoopDelegate};
pub use crate::core::launcher::Launcher;
pub use crate::core::process::ProcessDelegate;
pub use crate::core::{AsyncRunnable, LaunchReport, Runnable};
pub use crate::utils::error::{LaunchError, Result};
pub use crate::utils::logger::{LogBuffer, LogContext};
