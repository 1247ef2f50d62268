use crate::utils::logger::LogContext;
use async_trait::async_trait;

/// The application the bootstrap hands the process over to.
///
/// `run` blocks until the whole lifecycle (startup, steady state, shutdown)
/// has finished. It has no error channel: whatever can go wrong inside the
/// application is handled, logged or recovered by the implementation itself.
pub trait Runnable {
    fn run(&mut self, log: &LogContext);

    fn name(&self) -> &str {
        "delegate"
    }
}

impl<R: Runnable + ?Sized> Runnable for Box<R> {
    fn run(&mut self, log: &LogContext) {
        (**self).run(log)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Async flavour of [`Runnable`]; wrap it in `BlockOn` to launch it.
#[async_trait]
pub trait AsyncRunnable: Send {
    async fn run(&mut self, log: &LogContext);

    fn name(&self) -> &str {
        "async delegate"
    }
}
