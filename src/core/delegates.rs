use crate::config::{DelegateConfig, DelegateKind};
use crate::core::process::ProcessDelegate;
use crate::domain::ports::{AsyncRunnable, Runnable};
use crate::utils::error::{LaunchError, Result};
use crate::utils::logger::LogContext;
use crate::utils::validation::validate_required_field;
use tokio::runtime::{Builder, Runtime};
use tracing::instrument::WithSubscriber;

/// Returns immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDelegate;

impl Runnable for NoopDelegate {
    fn run(&mut self, _log: &LogContext) {}

    fn name(&self) -> &str {
        "noop"
    }
}

/// A delegate backed by a closure.
pub struct FnDelegate<F> {
    name: String,
    f: F,
}

impl<F> FnDelegate<F>
where
    F: FnMut(&LogContext),
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> Runnable for FnDelegate<F>
where
    F: FnMut(&LogContext),
{
    fn run(&mut self, log: &LogContext) {
        (self.f)(log)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Drives an [`AsyncRunnable`] to completion on its own current-thread runtime.
pub struct BlockOn<A> {
    inner: A,
    runtime: Runtime,
}

impl<A: AsyncRunnable> BlockOn<A> {
    pub fn new(inner: A) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LaunchError::RuntimeError {
                message: e.to_string(),
            })?;

        Ok(Self { inner, runtime })
    }

    pub fn into_inner(self) -> A {
        self.inner
    }
}

impl<A: AsyncRunnable> Runnable for BlockOn<A> {
    fn run(&mut self, log: &LogContext) {
        let dispatch = log.dispatch().clone();
        self.runtime
            .block_on(self.inner.run(log).with_subscriber(dispatch));
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Builds the delegate selected by `[delegate]`.
pub fn build_delegate(config: &DelegateConfig) -> Result<Box<dyn Runnable>> {
    match config.kind {
        DelegateKind::Noop => Ok(Box::new(NoopDelegate)),
        DelegateKind::Command => {
            let program = validate_required_field("delegate.program", &config.program)?;
            let process = ProcessDelegate::new(program.clone())
                .args(config.args.clone())
                .envs(config.env.clone());
            let process = match &config.working_dir {
                Some(dir) => process.current_dir(dir.clone()),
                None => process,
            };
            Ok(Box::new(BlockOn::new(process)?))
        }
    }
}
