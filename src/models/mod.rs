/// # Health Status Response
///
/// Body of `GET /api/health`: a fixed status, a fixed message and the
/// ISO 8601 time at which the check was answered.
pub mod health;

/// Body of `GET /api/hello`.
pub mod hello;

/// # Error Envelope
///
/// Shared JSON shape of every error response produced on the API side:
///
/// ```json
/// { "error": { "message": "Not Found", "status": 404 } }
/// ```
pub mod error;

pub use error::{ErrorDetail, ErrorEnvelope};
pub use health::HealthStatus;
pub use hello::HelloMessage;
