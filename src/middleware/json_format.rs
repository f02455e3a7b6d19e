use crate::config::Config;
use crate::error::ApiError;
use actix_web::body::{self, BoxBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::CONTENT_TYPE;
use actix_web::middleware::Next;
use actix_web::{Error, HttpResponse, web};

const PRETTY_PARAM: &str = "pretty";

/// Pretty-prints JSON response bodies with two-space indentation.
///
/// Always on when `json_pretty` is configured; otherwise only for requests
/// carrying a `pretty` query parameter. Bodies that fail to parse are sent
/// as they are.
pub async fn json_format(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let pretty = req
        .app_data::<web::Data<Config>>()
        .map(|config| config.json_pretty)
        .unwrap_or(true)
        || has_pretty_param(req.query_string());

    let res = next.call(req).await?;
    if !pretty || !is_json(&res) {
        return Ok(res.map_into_boxed_body());
    }

    let (req, res) = res.into_parts();
    let (res, body) = res.into_parts();
    let bytes = match body::to_bytes(body).await {
        Ok(bytes) => bytes,
        Err(e) => {
            let e: Box<dyn std::error::Error> = e.into();
            let err = ApiError::internal(format!("reading response body: {e}"));
            return Ok(ServiceResponse::new(req, HttpResponse::from_error(err)));
        }
    };

    let formatted = match serde_json::from_slice::<serde_json::Value>(&bytes) {
        Ok(value) => serde_json::to_vec_pretty(&value).unwrap_or_else(|_| bytes.to_vec()),
        Err(_) => bytes.to_vec(),
    };

    Ok(ServiceResponse::new(req, res.set_body(BoxBody::new(formatted))))
}

fn is_json<B>(res: &ServiceResponse<B>) -> bool {
    res.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| {
            let essence = ct.split(';').next().unwrap_or_default().trim();
            essence == "application/json" || essence.ends_with("+json")
        })
}

fn has_pretty_param(query: &str) -> bool {
    query
        .split('&')
        .any(|pair| pair.split('=').next() == Some(PRETTY_PARAM))
}
