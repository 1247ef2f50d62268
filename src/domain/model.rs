use chrono::{DateTime, Local};
use serde::Serialize;
use std::time::Duration;

/// What happened during one launch.
#[derive(Debug, Clone, Serialize)]
pub struct LaunchReport {
    pub delegate: String,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub elapsed: Duration,
}
