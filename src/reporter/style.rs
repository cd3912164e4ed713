//! Building blocks of a report: labelled headlines and aligned parameter lists.
//!
//! Output looks like this:
//! ```text
//! [info] Client was connected at 2017-03-05 12:01:42
//!         IP address: 127.0.0.1
//! ```

use chrono::{DateTime, TimeDelta, Utc};
use std::fmt::Write;

/// Indentation of everything below a headline, including stack traces.
pub const INDENT: &str = "        ";

/// Severity tag at the start of every headline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Info,
    Warn,
    Error,
}

impl Label {
    fn tag(self) -> &'static str {
        match self {
            Label::Info => "[info]",
            Label::Warn => "[warn]",
            Label::Error => "[error]",
        }
    }
}

#[derive(Debug, Clone, Copy)]
#[cfg_attr(not(feature = "pretty_logs"), allow(dead_code))]
enum Tone {
    Label(Label),
    Bold,
    Dimmed,
}

#[cfg(feature = "pretty_logs")]
fn paint(colors: bool, tone: Tone, text: &str) -> String {
    use nu_ansi_term::{Color, Style};

    if !colors {
        return text.to_string();
    }

    let style = match tone {
        Tone::Label(Label::Info) => Style::new().bold().fg(Color::Green),
        Tone::Label(Label::Warn) => Style::new().bold().fg(Color::Yellow),
        Tone::Label(Label::Error) => Style::new().bold().fg(Color::Red),
        Tone::Bold => Style::new().bold(),
        Tone::Dimmed => Style::new().dimmed(),
    };

    style.paint(text).to_string()
}

#[cfg(not(feature = "pretty_logs"))]
fn paint(_colors: bool, _tone: Tone, text: &str) -> String {
    text.to_string()
}

/// Accumulates the lines of a single report.
pub struct ReportWriter {
    colors: bool,
    out: String,
}

impl ReportWriter {
    pub fn new(colors: bool) -> Self {
        ReportWriter {
            colors,
            out: String::new(),
        }
    }

    /// `[label] title at YYYY-MM-DD HH:MM:SS`
    pub fn headline(&mut self, label: Label, title: &str, time: DateTime<Utc>) -> &mut Self {
        let tag = paint(self.colors, Tone::Label(label), label.tag());
        let title = paint(self.colors, Tone::Bold, title);
        let time = paint(
            self.colors,
            Tone::Dimmed,
            &format!("at {}", time.format("%Y-%m-%d %H:%M:%S")),
        );
        let _ = writeln!(self.out, "{tag} {title} {time}");

        self
    }

    /// A headline without timestamp, used for notes following a main headline.
    pub fn note(&mut self, label: Label, title: &str) -> &mut Self {
        let tag = paint(self.colors, Tone::Label(label), label.tag());
        let title = paint(self.colors, Tone::Bold, title);
        let _ = writeln!(self.out, "{tag} {title}");

        self
    }

    /// An indented free-text line.
    pub fn line(&mut self, text: &str) -> &mut Self {
        let _ = writeln!(self.out, "{INDENT}{text}");

        self
    }

    /// Writes `name: value` pairs with values aligned to the longest name.
    pub fn params(&mut self, params: &[(&str, String)]) -> &mut Self {
        let width = params.iter().map(|(name, _)| name.len() + 1).max().unwrap_or(0);

        for (name, value) in params {
            let value = paint(self.colors, Tone::Bold, value);
            let _ = writeln!(
                self.out,
                "{INDENT}{:<width$} {value}",
                format!("{name}:"),
            );
        }

        self
    }

    /// Copies every line of `stack` as-is, only prefixed with [`INDENT`].
    pub fn stack(&mut self, stack: &str) -> &mut Self {
        for line in stack.lines() {
            let _ = writeln!(self.out, "{INDENT}{line}");
        }

        self
    }

    pub fn finish(&mut self) -> String {
        std::mem::take(&mut self.out)
    }
}

/// Renders a duration like `1d 2h 3m 4s`, skipping leading zero units.
pub fn humanize(duration: TimeDelta) -> String {
    let total = duration.num_seconds().max(0);
    let units = [
        (total / 86_400, "d"),
        (total % 86_400 / 3_600, "h"),
        (total % 3_600 / 60, "m"),
        (total % 60, "s"),
    ];

    let parts: Vec<String> = units
        .iter()
        .skip_while(|(value, unit)| *value == 0 && *unit != "s")
        .map(|(value, unit)| format!("{value}{unit}"))
        .collect();

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn aligns_parameter_values() {
        let out = ReportWriter::new(false)
            .params(&[("PID", "1".to_string()), ("Node ID", "a".to_string())])
            .finish();

        assert_eq!(out, "        PID:     1\n        Node ID: a\n");
    }

    #[test]
    fn keeps_stack_lines_verbatim() {
        let out = ReportWriter::new(false)
            .stack("    at a (x.js:1:1)\n\tat b")
            .finish();

        assert_eq!(out, "            at a (x.js:1:1)\n        \tat b\n");
    }

    #[cfg(feature = "pretty_logs")]
    #[test]
    fn paints_values_without_breaking_alignment() {
        let out = ReportWriter::new(true)
            .params(&[("PID", "1".to_string()), ("Node ID", "a".to_string())])
            .finish();

        assert_eq!(
            out,
            "        PID:     \u{1b}[1m1\u{1b}[0m\n        Node ID: \u{1b}[1ma\u{1b}[0m\n"
        );
    }

    #[cfg(feature = "pretty_logs")]
    #[test]
    fn paints_labels_per_severity() {
        let out = ReportWriter::new(true)
            .note(Label::Warn, "w")
            .note(Label::Error, "e")
            .finish();

        assert_eq!(
            out,
            "\u{1b}[1;33m[warn]\u{1b}[0m \u{1b}[1mw\u{1b}[0m\n\
             \u{1b}[1;31m[error]\u{1b}[0m \u{1b}[1me\u{1b}[0m\n"
        );
    }

    #[test]
    fn stays_plain_without_colors() {
        let out = ReportWriter::new(false).note(Label::Info, "plain").finish();

        assert_eq!(out, "[info] plain\n");
    }

    #[test]
    fn humanizes_durations() {
        assert_eq!(humanize(TimeDelta::zero()), "0s");
        assert_eq!(humanize(TimeDelta::seconds(59)), "59s");
        assert_eq!(humanize(TimeDelta::seconds(3_723)), "1h 2m 3s");
        assert_eq!(humanize(TimeDelta::seconds(90_000)), "1d 1h 0m 0s");
        assert_eq!(humanize(TimeDelta::seconds(-5)), "0s");
    }
}
