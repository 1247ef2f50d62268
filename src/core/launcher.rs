use crate::domain::model::LaunchReport;
use crate::domain::ports::Runnable;
use crate::utils::logger::{LogContext, LIFECYCLE_TARGET};
use crate::utils::monitor::SystemMonitor;
use chrono::Local;
use std::time::Instant;

pub const INIT_MESSAGE: &str = "App Init";
pub const EXIT_MESSAGE: &str = "App Exit";

/// Brackets one delegate run with the init and exit log lines.
///
/// The logging context is built before the launcher exists, so nothing can
/// be logged through it ahead of `App Init`. Both markers use the lifecycle
/// target, which no filter configuration can silence.
pub struct Launcher<R: Runnable> {
    delegate: R,
    log: LogContext,
    monitor: SystemMonitor,
}

impl<R: Runnable> Launcher<R> {
    pub fn new(delegate: R, log: LogContext) -> Self {
        Self::new_with_monitoring(delegate, log, false)
    }

    pub fn new_with_monitoring(delegate: R, log: LogContext, monitor_enabled: bool) -> Self {
        Self {
            delegate,
            log,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Runs the delegate to completion. `App Exit` is only written once
    /// `Runnable::run` has returned; a panic inside it skips the line.
    pub fn run(self) -> LaunchReport {
        let Launcher {
            mut delegate,
            log,
            monitor,
        } = self;

        log.in_scope(|| {
            tracing::info!(target: LIFECYCLE_TARGET, "{}", INIT_MESSAGE);
            monitor.log_stats("Before run");

            let started_at = Local::now();
            let clock = Instant::now();
            tracing::debug!(delegate = delegate.name(), "Handing over to delegate");
            delegate.run(&log);
            let elapsed = clock.elapsed();
            let finished_at = Local::now();
            tracing::debug!(delegate = delegate.name(), ?elapsed, "Delegate returned");

            monitor.log_final_stats();
            tracing::info!(target: LIFECYCLE_TARGET, "{}", EXIT_MESSAGE);

            LaunchReport {
                delegate: delegate.name().to_string(),
                started_at,
                finished_at,
                elapsed,
            }
        })
    }
}
