//! Single-line record rendering.
//!
//! Every diagnostic record is one line:
//!
//! ```text
//! <timestamp> <severity> [<category>] <file>:<line> - <message>
//! ```
//!
//! Events emitted through a [`Logger`](crate::Logger) carry explicit
//! `category` and `origin` fields; events from third-party crates fall back
//! to their tracing metadata so the sink stays uniform.

use chrono::Local;
use std::fmt;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

pub(crate) const CATEGORY_FIELD: &str = "category";
pub(crate) const ORIGIN_FIELD: &str = "origin";

/// Renders events into the single-line record layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordFormat;

impl<S, N> FormatEvent<S, N> for RecordFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut fields = RecordFields::default();
        event.record(&mut fields);

        let meta = event.metadata();
        let category = fields.category.unwrap_or_else(|| meta.target().to_owned());
        let origin = fields.origin.unwrap_or_else(|| match (meta.file(), meta.line()) {
            (Some(file), Some(line)) => format!("{}:{line}", short_file(file)),
            _ => meta.target().to_owned(),
        });

        let record =
            format_record(&timestamp(), *meta.level(), &category, &origin, &fields.message);
        writeln!(writer, "{record}")
    }
}

/// Assembles one record line. Split from the clock so tests can pin the
/// timestamp.
#[must_use]
pub fn format_record(
    timestamp: &str,
    level: Level,
    category: &str,
    origin: &str,
    message: &str,
) -> String {
    format!("{timestamp} {:<5} [{category}] {origin} - {message}", severity_marker(level))
}

/// Fixed-width severity marker for scannable columns.
#[must_use]
pub fn severity_marker(level: Level) -> &'static str {
    match level {
        Level::TRACE => "TRACE",
        Level::DEBUG => "DEBUG",
        Level::INFO => "INFO",
        Level::WARN => "WARN",
        _ => "ERROR",
    }
}

/// Strips directories from a source path; records carry `file.rs:42`, not
/// the whole workspace-relative path.
pub(crate) fn short_file(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn timestamp() -> String {
    Local::now().format("%H:%M:%S%.3f").to_string()
}

#[derive(Default)]
struct RecordFields {
    message: String,
    category: Option<String>,
    origin: Option<String>,
}

impl tracing::field::Visit for RecordFields {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        match field.name() {
            CATEGORY_FIELD => self.category = Some(value.to_owned()),
            ORIGIN_FIELD => self.origin = Some(value.to_owned()),
            "message" => self.message = value.to_owned(),
            _ => {},
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            CATEGORY_FIELD => self.category = Some(format!("{value:?}")),
            ORIGIN_FIELD => self.origin = Some(format!("{value:?}")),
            _ => {},
        }
    }
}
