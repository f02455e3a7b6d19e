/// # Request Pipeline
///
/// Each stage is an async function `(ServiceRequest, Next) -> ServiceResponse`
/// mounted with [`actix_web::middleware::from_fn`]. [`PIPELINE`] declares the
/// order, outermost first; [`crate::app::build_app`] applies it.
///
/// ```text
/// error boundary -> access log -> cors -> body parser -> json format -> routes
/// ```
///
/// Stages answer their own rejections with `req.error_response(..)` rather
/// than returning `Err`, so the outer stages still see a response.
pub mod access_log;
pub mod body_parser;
pub mod cors;
pub mod error_boundary;
pub mod json_format;

pub use access_log::{REQUEST_ID_HEADER, RequestId, access_log};
pub use body_parser::{ParsedBody, body_parser};
pub use cors::cors;
pub use error_boundary::error_boundary;
pub use json_format::json_format;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ErrorBoundary,
    AccessLog,
    Cors,
    BodyParser,
    JsonFormat,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Self::ErrorBoundary => "error-boundary",
            Self::AccessLog => "access-log",
            Self::Cors => "cors",
            Self::BodyParser => "body-parser",
            Self::JsonFormat => "json-format",
        }
    }
}

/// Request-processing stages, outermost first.
pub const PIPELINE: [Stage; 5] = [
    Stage::ErrorBoundary,
    Stage::AccessLog,
    Stage::Cors,
    Stage::BodyParser,
    Stage::JsonFormat,
];
