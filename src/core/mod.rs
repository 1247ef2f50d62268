pub mod delegates;
pub mod launcher;
pub mod process;

pub use crate::domain::model::LaunchReport;
pub use crate::domain::ports::{AsyncRunnable, Runnable};
pub use crate::utils::error::Result;
