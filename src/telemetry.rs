use actix_web::http::StatusCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[cfg(test)]
use mockall::automock;

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins over `level` when set.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // A second init (tests, embedding) is not an error worth surfacing
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .try_init();
}

/// A failure the error boundary turned into an error envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEvent {
    pub method: String,
    pub path: String,
    pub status: StatusCode,
    pub message: String,
    /// Full error text, which may include detail hidden from the client.
    pub detail: String,
}

/// Sink for application error events emitted by the error boundary.
#[cfg_attr(test, automock)]
pub trait ErrorReporter: Send + Sync {
    fn report(&self, event: &ErrorEvent);
}

/// Default reporter: one `tracing` line per event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, event: &ErrorEvent) {
        if event.status.is_server_error() {
            tracing::error!(
                method = %event.method,
                path = %event.path,
                status = event.status.as_u16(),
                detail = %event.detail,
                "request failed"
            );
        } else {
            tracing::warn!(
                method = %event.method,
                path = %event.path,
                status = event.status.as_u16(),
                message = %event.message,
                "request rejected"
            );
        }
    }
}

pub fn default_reporter() -> Arc<dyn ErrorReporter> {
    Arc::new(TracingReporter)
}
