use crate::config::API_PREFIX;
use crate::error::ApiError;
use actix_web::http::Method;
use actix_web::{HttpResponse, web};

/// # Health Check Endpoint
///
/// ```text
/// GET /api/health -> { "status": "ok", "message": "...", "timestamp": "..." }
/// ```
pub mod health;

/// # Hello Endpoint
///
/// ```text
/// GET /api/hello -> { "message": "Hello from Hyperflow Works Backend!" }
/// ```
pub mod hello;


/// # API Route Configuration
///
/// Mounts every JSON endpoint under `/api`. Paths under the prefix that match
/// nothing answer with a 404 error envelope.
///
/// ## Mounted Services
/// - Health check endpoints (see [`health::configure_routes`])
/// - Hello endpoints (see [`hello::configure_routes`])
///
/// ```text
/// GET /api/health - Service health status
/// GET /api/hello  - Greeting
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(API_PREFIX)
            .configure(health::configure_routes)
            .configure(hello::configure_routes)
            .default_service(web::to(not_found)),
    );
}

async fn not_found() -> Result<HttpResponse, ApiError> {
    Err(ApiError::not_found())
}

/// Fallback for read-only resources hit with any other method.
pub(crate) async fn read_only() -> Result<HttpResponse, ApiError> {
    Err(ApiError::method_not_allowed(&[Method::GET, Method::HEAD]))
}
