//! Console formatting that leaves rendered reports untouched.

use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, FormattedFields};
use tracing_subscriber::registry::LookupSpan;

use crate::reporter::REPORT_TARGET;

/// Writes reports verbatim and everything else with level, target and span context:
/// ```text
/// [info] Client was connected at 2017-03-05 12:01:42
///         IP address: 127.0.0.1
/// DEBUG sync_reporter::reporter: Formatting report for event connect [session{id=7}]
/// ```
pub struct ReportLogFormat;

impl<S, N> FormatEvent<S, N> for ReportLogFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();

        // Reports already carry label and timestamp
        if metadata.target() == REPORT_TARGET {
            ctx.field_format().format_fields(writer.by_ref(), event)?;
            return writeln!(writer);
        }

        write!(writer, "{:<5} {}: ", metadata.level(), metadata.target())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;

        if let Some(scope) = ctx.event_scope() {
            let spans: Vec<_> = scope.collect();

            if !spans.is_empty() {
                write!(writer, " ")?;

                // Outermost span first
                for span in spans.into_iter().rev() {
                    write!(writer, "[{}", span.name())?;

                    let ext = span.extensions();
                    if let Some(fields) = ext.get::<FormattedFields<N>>()
                        && !fields.is_empty()
                    {
                        write!(writer, "{{{}}}", fields)?;
                    }

                    write!(writer, "]")?;
                }
            }
        }

        writeln!(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::ServerOptions;
    use crate::reporter::{Event as ReportEvent, Reporter};
    use crate::server::{Environment, ServerContext};
    use chrono::{DateTime, Utc};
    use pretty_assertions::assert_eq;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Buffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn writes_reports_verbatim_and_other_events_with_target() {
        let buffer = Buffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .event_format(ReportLogFormat)
            .with_writer(move || writer.clone())
            .finish();
        let server = ServerContext::new(
            ServerOptions {
                env: Environment::Development,
                pid: 1,
                node_id: "server:1".to_string(),
                subprotocol: "1.0.0".to_string(),
                supports: "1.x".to_string(),
            },
            DateTime::<Utc>::UNIX_EPOCH,
        );

        tracing::subscriber::with_default(subscriber, || {
            Reporter::with_clock(FixedClock::epoch())
                .emit(
                    &ReportEvent::Connect {
                        remote_address: "127.0.0.1",
                    },
                    &server,
                )
                .unwrap();
            tracing::warn!(target: "sync_server", "Slow client");
        });

        assert_eq!(
            buffer.contents(),
            "[info] Client was connected at 1970-01-01 00:00:00\n\
             \x20       IP address: 127.0.0.1\n\
             WARN  sync_server: Slow client\n"
        );
    }
}
