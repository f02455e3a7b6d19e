use crate::error::{INTERNAL_SERVER_ERROR, envelope_for};
use crate::models::ErrorEnvelope;
use crate::telemetry::{ErrorEvent, ErrorReporter, TracingReporter};
use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::http::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderMap};
use actix_web::middleware::Next;
use actix_web::{Error, HttpResponse, web};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;

/// Outermost stage. Turns every failure from the inner stages or handlers
/// into the shared error envelope, then reports one error event.
///
/// Inner stages and handlers hand failures back as responses carrying an
/// attached error; those are rewritten in place. A panic, or an `Err` that
/// slipped through, has no request left to answer with, so the envelope is
/// returned as an error whose response is already rendered.
///
/// No `HttpRequest` handle is kept across the inner call: the router needs
/// exclusive access to it.
pub async fn error_boundary(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let failure = Failure {
        method: req.method().to_string(),
        path: req.path().to_string(),
        reporter: req.app_data::<web::Data<dyn ErrorReporter>>().cloned(),
    };

    match AssertUnwindSafe(next.call(req)).catch_unwind().await {
        Ok(Ok(res)) => {
            let Some(err) = res.response().error() else {
                return Ok(res.map_into_boxed_body());
            };
            let envelope = envelope_for(err);
            let status = err.as_response_error().status_code();
            let rendered = render(status, &envelope, Some(res.response().headers()));
            failure.report(status, &envelope, err.to_string());

            let (req, _) = res.into_parts();
            Ok(ServiceResponse::new(req, rendered))
        }
        Ok(Err(err)) => {
            let envelope = envelope_for(&err);
            let status = err.as_response_error().status_code();
            let rendered = render(status, &envelope, None);
            failure.report(status, &envelope, err.to_string());
            Err(InternalError::from_response(err.to_string(), rendered).into())
        }
        Err(panic) => {
            let status = StatusCode::INTERNAL_SERVER_ERROR;
            let envelope = ErrorEnvelope::new(status.as_u16(), INTERNAL_SERVER_ERROR);
            let detail = format!("handler panicked: {}", panic_message(panic.as_ref()));
            let rendered = render(status, &envelope, None);
            failure.report(status, &envelope, detail.clone());
            Err(InternalError::from_response(detail, rendered).into())
        }
    }
}

/// What the boundary keeps of the request for the error event.
struct Failure {
    method: String,
    path: String,
    reporter: Option<web::Data<dyn ErrorReporter>>,
}

impl Failure {
    fn report(self, status: StatusCode, envelope: &ErrorEnvelope, detail: String) {
        let event = ErrorEvent {
            method: self.method,
            path: self.path,
            status,
            message: envelope.error.message.clone(),
            detail,
        };
        match self.reporter {
            Some(reporter) => reporter.report(&event),
            None => TracingReporter.report(&event),
        }
    }
}

fn render(
    status: StatusCode,
    envelope: &ErrorEnvelope,
    original_headers: Option<&HeaderMap>,
) -> HttpResponse {
    let mut res = HttpResponse::build(status);
    // Headers set by the failing layer (Allow, CORS, request id) survive the rewrite
    if let Some(headers) = original_headers {
        for (name, value) in headers {
            if name != CONTENT_TYPE && name != CONTENT_LENGTH {
                res.append_header((name.clone(), value.clone()));
            }
        }
    }
    res.json(envelope)
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic payload"
    }
}
