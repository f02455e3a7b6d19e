use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const HEALTH_STATUS_OK: &str = "ok";
pub const HEALTH_MESSAGE: &str = "Hyperflow Works API is running";

/// # Health Status Response
///
/// Computed fresh for every request and never stored.
///
/// ## Example JSON
/// ```json
/// {
///   "status": "ok",
///   "message": "Hyperflow Works API is running",
///   "timestamp": "2024-03-10T15:30:45.123Z"
/// }
/// ```
#[derive(Serialize, Debug, PartialEq, Deserialize, ToSchema)]
pub struct HealthStatus {
    #[schema(example = "ok")]
    pub status: String,
    #[schema(example = "Hyperflow Works API is running")]
    pub message: String,
    #[schema(example = "2024-03-10T15:30:45.123Z")]
    pub timestamp: String,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self {
            status: HEALTH_STATUS_OK.to_string(),
            message: HEALTH_MESSAGE.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}
