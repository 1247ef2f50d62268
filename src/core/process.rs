use crate::domain::ports::AsyncRunnable;
use crate::utils::logger::LogContext;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitStatus;
use tokio::process::Command;

/// Hosts the application as a child process and waits for it to exit.
///
/// Spawn failures and unsuccessful exits are logged and absorbed here, so
/// `run` always returns to the launcher. On Ctrl-C the child is left to shut
/// down on its own; a second Ctrl-C kills it.
#[derive(Debug, Clone)]
pub struct ProcessDelegate {
    program: String,
    args: Vec<String>,
    envs: HashMap<String, String>,
    current_dir: Option<PathBuf>,
    exit_status: Option<ExitStatus>,
}

impl ProcessDelegate {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: HashMap::new(),
            current_dir: None,
            exit_status: None,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn envs(mut self, envs: HashMap<String, String>) -> Self {
        self.envs.extend(envs);
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Exit status of the last run, if the child was started and reaped.
    pub fn exit_status(&self) -> Option<ExitStatus> {
        self.exit_status
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).envs(&self.envs).kill_on_drop(true);
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }
        command
    }
}

#[async_trait]
impl AsyncRunnable for ProcessDelegate {
    async fn run(&mut self, _log: &LogContext) {
        self.exit_status = None;

        let mut child = match self.command().spawn() {
            Ok(child) => child,
            Err(e) => {
                tracing::error!(program = %self.program, "❌ Failed to start application: {}", e);
                return;
            }
        };
        tracing::info!(
            program = %self.program,
            pid = child.id().unwrap_or_default(),
            "Application process started"
        );

        // The terminal delivers Ctrl-C to the whole process group, so the
        // application already has it. Give it time to shut down; a second
        // interrupt kills it.
        let mut interrupted = false;
        let status = loop {
            tokio::select! {
                status = child.wait() => break status,
                signal = tokio::signal::ctrl_c() => match signal {
                    Ok(()) if !interrupted => {
                        interrupted = true;
                        tracing::info!(program = %self.program, "Interrupt received, waiting for application to shut down");
                    }
                    Ok(()) => {
                        tracing::warn!(program = %self.program, "Second interrupt, killing application");
                        if let Err(e) = child.start_kill() {
                            tracing::warn!("Failed to kill application process: {}", e);
                        }
                        break child.wait().await;
                    }
                    Err(e) => {
                        tracing::warn!("Interrupt handler unavailable, waiting for application: {}", e);
                        break child.wait().await;
                    }
                },
            }
        };

        match status {
            Ok(status) => {
                if status.success() {
                    tracing::info!(program = %self.program, "Application process exited");
                } else {
                    tracing::warn!(program = %self.program, %status, "Application process exited with failure");
                }
                self.exit_status = Some(status);
            }
            Err(e) => {
                tracing::error!(program = %self.program, "❌ Failed to wait for application: {}", e);
            }
        }
    }

    fn name(&self) -> &str {
        &self.program
    }
}
