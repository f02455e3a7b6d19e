use crate::config::Config;
use crate::error::ApiError;
use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{self, ServiceRequest, ServiceResponse};
use actix_web::middleware::Next;
use actix_web::web::{Bytes, BytesMut};
use actix_web::{Error, HttpMessage, web};
use futures::StreamExt;

/// Parsed JSON request body, stored in request extensions.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedBody(pub serde_json::Value);

/// Buffers and validates JSON request bodies.
///
/// Requests without a JSON content type pass through untouched. The raw
/// payload is put back after parsing so `web::Json` and friends still work.
/// Rejections are answered here, as responses carrying the `ApiError`.
pub async fn body_parser(
    mut req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<EitherBody<impl MessageBody>>, Error> {
    if is_json(&req) {
        if let Err(e) = buffer_json(&mut req).await {
            return Ok(req.error_response(e).map_into_right_body());
        }
    }

    next.call(req).await.map(ServiceResponse::map_into_left_body)
}

async fn buffer_json(req: &mut ServiceRequest) -> Result<(), ApiError> {
    let limit = req
        .app_data::<web::Data<Config>>()
        .map(|config| config.body_limit)
        .unwrap_or_else(|| Config::default().body_limit);

    let mut payload = req.take_payload();
    let mut buf = BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| ApiError::bad_request(e.to_string()))?;
        if buf.len() + chunk.len() > limit {
            return Err(ApiError::payload_too_large(limit));
        }
        buf.extend_from_slice(&chunk);
    }
    let body = buf.freeze();

    if !body.iter().all(u8::is_ascii_whitespace) {
        let value: serde_json::Value = serde_json::from_slice(&body)
            .map_err(|e| ApiError::bad_request(format!("invalid JSON: {e}")))?;
        req.extensions_mut().insert(ParsedBody(value));
    }

    req.set_payload(into_payload(body));
    Ok(())
}

fn is_json(req: &ServiceRequest) -> bool {
    match req.mime_type() {
        Ok(Some(mime)) => {
            mime.subtype() == "json" || mime.suffix().is_some_and(|s| s == "json")
        }
        _ => false,
    }
}

fn into_payload(body: Bytes) -> dev::Payload {
    let (_, mut payload) = actix_http::h1::Payload::create(true);
    payload.unread_data(body);
    dev::Payload::from(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ErrorEnvelope;
    use actix_web::http::StatusCode;
    use actix_web::http::header::ContentType;
    use actix_web::middleware::from_fn;
    use actix_web::{App, HttpRequest, HttpResponse, test};

    async fn echo(req: HttpRequest, raw: Bytes) -> HttpResponse {
        let parsed = req.extensions().get::<ParsedBody>().cloned();
        HttpResponse::Ok().json(serde_json::json!({
            "parsed": parsed.map(|p| p.0),
            "raw_len": raw.len(),
        }))
    }

    fn app_config(limit: usize) -> web::Data<Config> {
        web::Data::new(Config {
            body_limit: limit,
            ..Config::default()
        })
    }

    #[actix_web::test]
    async fn test_json_body_is_parsed_and_restored() {
        let app = test::init_service(
            App::new()
                .app_data(app_config(1024))
                .wrap(from_fn(body_parser))
                .route("/echo", web::post().to(echo)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/echo")
            .insert_header(ContentType::json())
            .set_payload(r#"{"name":"flow"}"#)
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["parsed"]["name"], "flow");
        assert_eq!(body["raw_len"], 15);
    }

    #[actix_web::test]
    async fn test_non_json_body_is_left_alone() {
        let app = test::init_service(
            App::new()
                .app_data(app_config(4))
                .wrap(from_fn(body_parser))
                .route("/echo", web::post().to(echo)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/echo")
            .insert_header(ContentType::plaintext())
            .set_payload("not json at all")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert!(body["parsed"].is_null());
        assert_eq!(body["raw_len"], 15);
    }

    #[actix_web::test]
    async fn test_malformed_json_is_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(app_config(1024))
                .wrap(from_fn(body_parser))
                .route("/echo", web::post().to(echo)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/echo")
            .insert_header(ContentType::json())
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let err = resp.response().error().expect("rejection should carry its error");
        let api = err.as_error::<ApiError>().expect("should be an ApiError");
        assert!(api.public_message().starts_with("invalid JSON"));
    }

    #[actix_web::test]
    async fn test_oversized_body_is_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(app_config(8))
                .wrap(from_fn(body_parser))
                .route("/echo", web::post().to(echo)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/echo")
            .insert_header(ContentType::json())
            .set_payload(r#"{"much":"too long"}"#)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let err = resp.response().error().expect("rejection should carry its error");
        let api = err.as_error::<ApiError>().expect("should be an ApiError");
        assert_eq!(api.envelope(), ErrorEnvelope::new(413, "Payload Too Large"));
    }
}
