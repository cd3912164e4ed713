//! # Sync Reporter
//!
//! Human-readable reports for the lifecycle and error events of a real-time
//! sync server. The reporter does not write anything itself: it turns an
//! [`Event`](reporter::Event) plus the [`ServerContext`](server::ServerContext)
//! into a newline-terminated block of text that the caller sends wherever it
//! keeps its logs.
//!
//! ```rust,ignore
//! use sync_reporter::reporter::{Event, Reporter};
//!
//! let reporter = Reporter::new();
//! print!("{}", reporter.format(&Event::Connect { remote_address: "127.0.0.1" }, &server)?);
//! ```
//!
//! ## Modules
//!
//! - [`reporter`] - Event types and the formatter
//! - [`clock`] - Time source, injectable for deterministic output
//! - [`server`], [`client`], [`error`] - Read-only views of what gets reported
//! - [`config`] - Server options from JSON or `SYNC_*` environment variables
//! - [`logging`] - Tracing setup that prints reports verbatim
//!
//! ## Feature Flags
//!
//! - `pretty_logs` - ANSI colors in reports created with `Reporter::with_colors(true)`

pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod reporter;
pub mod server;
