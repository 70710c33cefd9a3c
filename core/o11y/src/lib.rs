//! Logging setup shared by the ArbOS pricing binaries.
//!
//! Library crates only emit `tracing` events with an explicit target
//! (`l2pricing`, `store`, `simulator`); binaries install a subscriber with
//! [`default_subscriber`].
pub use {tracing, tracing_appender, tracing_subscriber};

pub use crate::env_filter::{BuildEnvFilterError, EnvFilterBuilder, DEFAULT_RUST_LOG};
pub use crate::log_config::LogConfig;

use tracing::subscriber::SetGlobalDefaultError;

pub mod env_filter;
pub mod log_config;

/// The resource representing a registered subscriber.
///
/// Once dropped, the subscriber is unregistered, and the output is flushed. Any messages output
/// after this value is dropped will be delivered to a previously active subscriber, if any.
pub struct DefaultSubscriberGuard<S> {
    // Field order matters: the local guard must be dropped before the writer guard flushes the
    // queued messages, or events emitted while flushing would be lost.
    subscriber: Option<S>,
    local_subscriber_guard: Option<tracing::subscriber::DefaultGuard>,
    #[allow(dead_code)] // Only held for its Drop.
    writer_guard: tracing_appender::non_blocking::WorkerGuard,
}

impl<S: tracing::Subscriber + Send + Sync> DefaultSubscriberGuard<S> {
    /// Registers the subscriber for all threads. Mutually exclusive with [`Self::local`].
    pub fn global(mut self) -> Result<Self, SetGlobalDefaultError> {
        if let Some(subscriber) = self.subscriber.take() {
            tracing::subscriber::set_global_default(subscriber)?;
        }
        Ok(self)
    }

    /// Registers the subscriber for the current thread only.
    pub fn local(mut self) -> Self {
        if let Some(subscriber) = self.subscriber.take() {
            self.local_subscriber_guard = Some(tracing::subscriber::set_default(subscriber));
        }
        self
    }
}

/// Whether to use colored log format.
///
/// `Auto` enables colors only when stderr is a terminal.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorOutput {
    Always,
    Never,
    #[default]
    Auto,
}

impl ColorOutput {
    pub fn use_ansi(self) -> bool {
        match self {
            ColorOutput::Always => true,
            ColorOutput::Never => false,
            ColorOutput::Auto => is_terminal(),
        }
    }
}

fn is_terminal() -> bool {
    atty::is(atty::Stream::Stderr)
}

/// Builds a subscriber writing to stderr through a non-blocking writer.
///
/// The subscriber is inactive until [`DefaultSubscriberGuard::global`] or
/// [`DefaultSubscriberGuard::local`] is called.
///
/// # Example
///
/// ```rust
/// let filter = arbos_o11y::EnvFilterBuilder::from_env().finish().unwrap();
/// let _subscriber =
///     arbos_o11y::default_subscriber(filter, arbos_o11y::ColorOutput::Never).local();
/// arbos_o11y::tracing::info!(target: "simulator", "logging is set up");
/// ```
pub fn default_subscriber(
    log_filter: tracing_subscriber::EnvFilter,
    color_output: ColorOutput,
) -> DefaultSubscriberGuard<impl tracing::Subscriber + Send + Sync> {
    // Do not lock stderr so that `dbg!()` keeps working.
    let lined_stderr = std::io::LineWriter::new(std::io::stderr());
    let (writer, writer_guard) = tracing_appender::non_blocking(lined_stderr);

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_ansi(color_output.use_ansi())
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .with_writer(writer)
        .with_env_filter(log_filter)
        .finish();

    DefaultSubscriberGuard { subscriber: Some(subscriber), local_subscriber_guard: None, writer_guard }
}

/// Asserts that the condition is true, logging an error otherwise.
///
/// Panics in debug builds like `debug_assert!`. In release builds a failed
/// condition only emits a `tracing::error!`. Use it for invariants whose
/// violation signals a bug but must not halt block processing.
#[macro_export]
macro_rules! log_assert {
    ($cond:expr) => {
        $crate::log_assert!($cond, "assertion failed: {}", stringify!($cond))
    };

    ($cond:expr, $fmt:literal $($arg:tt)*) => {
        if cfg!(debug_assertions) {
            assert!($cond, $fmt $($arg)*);
        } else {
            if !$cond {
                $crate::tracing::error!($fmt $($arg)*);
            }
        }
    };
}
