//! Tracing setup for processes that print reports to the console.
//!
//! Call [`setup_tracing`] once at startup, then hand events to
//! [`Reporter::emit`](crate::reporter::Reporter::emit):
//!
//! ```rust,ignore
//! sync_reporter::logging::setup_tracing();
//!
//! let reporter = Reporter::new();
//! reporter.emit(&Event::Listen, &server)?;
//! ```
//!
//! `RUST_LOG` filters the output as usual and defaults to `info`. Reports are
//! written exactly as the reporter rendered them; everything else is printed
//! as `LEVEL target: message [spans]`.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

mod report;

pub use report::ReportLogFormat;

/// Initializes the tracing subscriber with the console layer.
///
/// # Panics
///
/// Panics if called more than once (tracing subscriber can only be set once).
pub fn setup_tracing() {
    Registry::default().with(setup_console_layer()).init();
    tracing::debug!("Tracing initialized successfully [reporting to console only]");
}

fn setup_console_layer() -> Box<dyn Layer<Registry> + Send + Sync + 'static> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt::layer()
        .with_ansi(cfg!(feature = "pretty_logs"))
        .event_format(ReportLogFormat)
        .with_filter(filter)
        .boxed()
}
