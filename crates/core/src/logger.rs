//! Progress reporting hooks.
//!
//! The parser reports what it does through a [`Logger`]. The default
//! [`NoopLogger`] discards everything; with the `tracing` feature enabled,
//! [`TracingLogger`] forwards each message as an `info` event.

use std::fmt;

/// Sink for parser progress messages.
pub trait Logger: Send + Sync {
    fn log(&self, args: fmt::Arguments<'_>);
}

impl<F> Logger for F
where
    F: Fn(fmt::Arguments<'_>) + Send + Sync,
{
    fn log(&self, args: fmt::Arguments<'_>) {
        self(args)
    }
}

/// Discards all messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn log(&self, _args: fmt::Arguments<'_>) {}
}

/// Forwards messages to `tracing` under the `wxr_core` target.
#[cfg(feature = "tracing")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

#[cfg(feature = "tracing")]
impl Logger for TracingLogger {
    fn log(&self, args: fmt::Arguments<'_>) {
        tracing::info!(target: "wxr_core", "{}", args);
    }
}
