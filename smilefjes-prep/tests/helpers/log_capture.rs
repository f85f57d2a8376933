//! Log Capture Utilities for Testing
//!
//! Captures tracing events (message plus structured fields) emitted on the
//! current thread while the returned guard is alive.

use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

/// Captured log record
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: Level,
    pub message: String,
    /// `name=value` pairs of the event's non-message fields
    pub fields: Vec<String>,
}

impl LogRecord {
    fn text(&self) -> String {
        format!("{} {}", self.message, self.fields.join(" "))
    }
}

/// Log capture layer for testing
#[derive(Clone, Default)]
pub struct LogCapture {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl LogCapture {
    /// Install a thread-local subscriber feeding a new capture
    ///
    /// Works with `#[tokio::test]`, whose runtime runs on the test thread.
    pub fn install() -> (Self, tracing::subscriber::DefaultGuard) {
        let capture = Self::default();
        let subscriber = tracing_subscriber::registry().with(capture.clone());
        let guard = tracing::subscriber::set_default(subscriber);
        (capture, guard)
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Records at `level` whose message or fields contain `pattern`
    pub fn matching(&self, level: Level, pattern: &str) -> Vec<LogRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.level == level && r.text().contains(pattern))
            .collect()
    }

    /// Assert at least one record at `level` contains `pattern`
    pub fn assert_contains(&self, level: Level, pattern: &str) {
        assert!(
            !self.matching(level, pattern).is_empty(),
            "Expected {} log matching '{}', but none found. All logs:\n{}",
            level,
            pattern,
            self.records()
                .iter()
                .map(|r| format!("{} {}", r.level, r.text()))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }
}

impl<S> tracing_subscriber::Layer<S> for LogCapture
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        use tracing::field::Visit;

        #[derive(Default)]
        struct FieldVisitor {
            message: String,
            fields: Vec<String>,
        }

        impl Visit for FieldVisitor {
            fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
                if field.name() == "message" {
                    self.message = format!("{:?}", value);
                } else {
                    self.fields.push(format!("{}={:?}", field.name(), value));
                }
            }

            fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
                if field.name() == "message" {
                    self.message = value.to_string();
                } else {
                    self.fields.push(format!("{}={}", field.name(), value));
                }
            }
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        self.records.lock().unwrap().push(LogRecord {
            level: *event.metadata().level(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}
