use super::read_only;
use crate::models::HealthStatus;
use actix_web::{HttpResponse, Responder, web};

/// # Health Check Endpoint
///
/// Returns a fixed status and message along with the time of the check.
///
/// ## Response
///
/// - **200 OK**: Service is running
///   - Body: JSON object with `status` ("ok"), `message` and `timestamp` in ISO 8601 format
///
/// ## Example Response
///
/// ```json
/// {
///   "status": "ok",
///   "message": "Hyperflow Works API is running",
///   "timestamp": "2023-10-05T12:34:56.789Z"
/// }
/// ```
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is running", body = HealthStatus)
    ),
    tag = "Health Check"
)]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthStatus::ok())
}

/// # Route Configuration
///
/// - `GET /health`, `HEAD /health`: Health check endpoint
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/health")
            .route(web::get().to(health))
            .route(web::head().to(health))
            .default_service(web::to(read_only)),
    );
}
