//! Tracing capability injected into the pricing engine.
//!
//! The calculator logs through a [`Tracer`] instead of calling the global
//! `tracing` dispatcher, so it runs without any subscriber in tests and the
//! host can route events wherever it likes.

use dashmap::DashMap;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Severity of a logged event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Opaque span handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpanId(pub u64);

pub trait Tracer: Send + Sync {
    fn log(&self, level: LogLevel, event: &str, data: Value);
    fn start_span(&self, name: &str, tags: Value) -> SpanId;
    fn end_span(&self, id: SpanId);
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    fn log(&self, _level: LogLevel, _event: &str, _data: Value) {}

    fn start_span(&self, _name: &str, _tags: Value) -> SpanId {
        SpanId(0)
    }

    fn end_span(&self, _id: SpanId) {}
}

struct OpenSpan {
    name: String,
    tags: Value,
    started: Instant,
}

/// Forwards events to the `tracing` crate.
///
/// Spans are tracked here rather than as `tracing` spans because they are
/// opened and closed through ids that may cross function boundaries.
#[derive(Default)]
pub struct TracingTracer {
    next_id: AtomicU64,
    open: DashMap<SpanId, OpenSpan>,
}

impl TracingTracer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spans started but not yet ended
    pub fn open_spans(&self) -> usize {
        self.open.len()
    }
}

impl Tracer for TracingTracer {
    fn log(&self, level: LogLevel, event: &str, data: Value) {
        match level {
            LogLevel::Debug => tracing::debug!(event, data = %data),
            LogLevel::Info => tracing::info!(event, data = %data),
            LogLevel::Warn => tracing::warn!(event, data = %data),
            LogLevel::Error => tracing::error!(event, data = %data),
        }
    }

    fn start_span(&self, name: &str, tags: Value) -> SpanId {
        let id = SpanId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        tracing::trace!(span = name, span_id = id.0, tags = %tags, "span started");
        self.open.insert(
            id,
            OpenSpan {
                name: name.to_string(),
                tags,
                started: Instant::now(),
            },
        );
        id
    }

    fn end_span(&self, id: SpanId) {
        match self.open.remove(&id) {
            Some((_, span)) => {
                let elapsed_ms = span.started.elapsed().as_secs_f64() * 1000.0;
                tracing::debug!(
                    span = %span.name,
                    span_id = id.0,
                    tags = %span.tags,
                    elapsed_ms,
                    "span finished"
                );
            }
            None => tracing::warn!(span_id = id.0, "end_span called for unknown span"),
        }
    }
}
