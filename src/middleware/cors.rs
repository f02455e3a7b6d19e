use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::{self, HeaderMap, HeaderValue};
use actix_web::http::Method;
use actix_web::middleware::Next;
use actix_web::{Error, HttpResponse};

pub const ALLOWED_METHODS: &str = "GET,HEAD,PUT,POST,DELETE,PATCH";

/// Permissive cross-origin stage.
///
/// Preflight requests are answered here with 204 and never reach the routes.
/// Every other response, failed ones included, gets
/// `Access-Control-Allow-Origin`, reflecting the caller's `Origin` when present.
pub async fn cors(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<EitherBody<impl MessageBody>>, Error> {
    let origin = req.headers().get(header::ORIGIN).cloned();

    if is_preflight(&req) {
        let requested_headers = req
            .headers()
            .get(header::ACCESS_CONTROL_REQUEST_HEADERS)
            .cloned();

        let mut res = HttpResponse::NoContent();
        res.insert_header((
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        ));
        if let Some(requested) = requested_headers {
            res.insert_header((header::ACCESS_CONTROL_ALLOW_HEADERS, requested));
        }
        let mut res = res.finish();
        apply_origin(res.headers_mut(), origin);
        return Ok(req.into_response(res).map_into_right_body());
    }

    // Inner stages render their own failures, so error responses arrive here
    // as `Ok` and get the headers too
    let mut res = next.call(req).await?;
    apply_origin(res.headers_mut(), origin);
    Ok(res.map_into_left_body())
}

fn is_preflight(req: &ServiceRequest) -> bool {
    req.method() == Method::OPTIONS
        && req
            .headers()
            .contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
}

fn apply_origin(headers: &mut HeaderMap, origin: Option<HeaderValue>) {
    let allow = origin.unwrap_or_else(|| HeaderValue::from_static("*"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, allow);
    headers.append(header::VARY, HeaderValue::from_static("Origin"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::middleware::from_fn;
    use actix_web::{App, test, web};

    async fn ok() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    async fn rejected() -> Result<HttpResponse, crate::error::ApiError> {
        Err(crate::error::ApiError::bad_request("nope"))
    }

    #[actix_web::test]
    async fn test_reflects_request_origin() {
        let app = test::init_service(App::new().wrap(from_fn(cors)).route("/", web::get().to(ok))).await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((header::ORIGIN, "https://hyperflow.works"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://hyperflow.works"
        );
        assert_eq!(resp.headers().get(header::VARY).unwrap(), "Origin");
    }

    #[actix_web::test]
    async fn test_wildcard_without_origin() {
        let app = test::init_service(App::new().wrap(from_fn(cors)).route("/", web::get().to(ok))).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }

    #[actix_web::test]
    async fn test_preflight_is_answered_directly() {
        let app = test::init_service(App::new().wrap(from_fn(cors)).route("/", web::get().to(ok))).await;

        let req = test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/anything")
            .insert_header((header::ORIGIN, "https://hyperflow.works"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
            ALLOWED_METHODS
        );
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_HEADERS).unwrap(),
            "content-type"
        );
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://hyperflow.works"
        );
    }

    #[actix_web::test]
    async fn test_failed_responses_get_the_origin_header() {
        let app = test::init_service(
            App::new()
                .wrap(from_fn(cors))
                .route("/rejected", web::get().to(rejected)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/rejected")
            .insert_header((header::ORIGIN, "https://hyperflow.works"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(resp.response().error().is_some());
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://hyperflow.works"
        );
    }
}
