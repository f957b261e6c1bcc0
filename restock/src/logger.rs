/// Logger module for the restock reporting layer
///
/// Installs the tracing subscriber every rendered line goes through. Lines
/// look like `[3:04:05 PM] info :: <message>`, followed by the event's other
/// fields as pretty-printed JSON when there are any.
use anyhow::{Context, Result};
use chrono::Local;
use colored::Colorize;
use serde_json::{Map, Value};
use std::fmt;
use tracing::{
    Event, Level, Subscriber,
    field::{Field, Visit},
};
use tracing_subscriber::{
    EnvFilter,
    fmt::{FmtContext, FormatEvent, FormatFields, format::Writer},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

const TIME_FORMAT: &str = "%-I:%M:%S %p";

/// Initializes logging at `level` (an `EnvFilter` directive such as `info`
/// or `restock=debug`).
///
/// The returned guard must be held until exit so buffered lines are flushed.
pub fn init(level: &str) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let filter =
        EnvFilter::try_new(level).with_context(|| format!("Invalid log level: {}", level))?;

    let (non_blocking_writer, guard) = tracing_appender::non_blocking(std::io::stdout());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(LineFormat)
                .with_writer(non_blocking_writer),
        )
        .with(filter)
        .try_init()
        .with_context(|| "Failed to install log subscriber")?;

    Ok(guard)
}

/// Event formatter producing `[<local time>] <level> :: <message> [metadata]`.
pub struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
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
        let mut fields = FieldCollector::default();
        event.record(&mut fields);

        let time = Local::now().format(TIME_FORMAT).to_string();
        let line = render_line(
            &time,
            event.metadata().level(),
            &fields.message,
            &fields.metadata,
            writer.has_ansi_escapes(),
        );
        writeln!(writer, "{}", line)
    }
}

/// Splits an event into its message and the remaining fields.
#[derive(Default)]
struct FieldCollector {
    message: String,
    metadata: Map<String, Value>,
}

impl FieldCollector {
    fn insert(&mut self, field: &Field, value: Value) {
        if field.name() == "message" {
            self.message = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
        } else {
            self.metadata.insert(field.name().to_string(), value);
        }
    }
}

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, Value::from(format!("{:?}", value)));
    }
}

fn render_line(
    time: &str,
    level: &Level,
    message: &str,
    metadata: &Map<String, Value>,
    ansi: bool,
) -> String {
    let level_name = level.as_str().to_lowercase();

    let mut out = if ansi {
        let level_name = match *level {
            Level::ERROR => level_name.red(),
            Level::WARN => level_name.yellow(),
            Level::INFO => level_name.green(),
            Level::DEBUG => level_name.blue(),
            _ => level_name.magenta(),
        };
        format!(
            "{} {} {} {}",
            format!("[{}]", time).bright_black(),
            level_name,
            "::".bright_black(),
            message
        )
    } else {
        format!("[{}] {} :: {}", time, level_name, message)
    };

    if !metadata.is_empty() {
        let pretty = serde_json::to_string_pretty(metadata).unwrap_or_default();
        if ansi {
            out = format!("{} {}", out, pretty.magenta());
        } else {
            out = format!("{} {}", out, pretty);
        }
    }

    out
}
