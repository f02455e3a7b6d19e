use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::middleware::Next;
use actix_web::{Error, HttpMessage};
use std::time::Instant;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Per-request id, available to handlers through request extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(pub Uuid);

/// Logs method, path and elapsed milliseconds for every request, including
/// the ones that fail. Also tags the request and response with an id.
pub async fn access_log(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let start = Instant::now();
    let method = req.method().clone();
    let url = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.path().to_string());

    let request_id = RequestId(Uuid::new_v4());
    req.extensions_mut().insert(request_id);

    let result = next.call(req).await;
    let ms = start.elapsed().as_millis();

    match result {
        Ok(mut res) => {
            tracing::info!(
                request_id = %request_id.0,
                status = res.status().as_u16(),
                "{method} {url} - {ms}ms"
            );
            if let Ok(value) = HeaderValue::from_str(&request_id.0.to_string()) {
                res.headers_mut().insert(REQUEST_ID_HEADER, value);
            }
            Ok(res)
        }
        Err(err) => {
            tracing::info!(
                request_id = %request_id.0,
                status = err.as_response_error().status_code().as_u16(),
                "{method} {url} - {ms}ms"
            );
            Err(err)
        }
    }
}
