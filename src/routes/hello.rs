use super::read_only;
use crate::models::HelloMessage;
use actix_web::{HttpResponse, Responder, web};

/// # Hello Endpoint
///
/// Fixed greeting used by the web client to check connectivity.
///
/// ## Example Response
///
/// ```json
/// { "message": "Hello from Hyperflow Works Backend!" }
/// ```
#[utoipa::path(
    get,
    path = "/api/hello",
    responses(
        (status = 200, description = "Greeting", body = HelloMessage)
    ),
    tag = "Hello"
)]
pub async fn hello() -> impl Responder {
    HttpResponse::Ok().json(HelloMessage::greeting())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/hello")
            .route(web::get().to(hello))
            .route(web::head().to(hello))
            .default_service(web::to(read_only)),
    );
}
