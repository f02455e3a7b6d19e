use utoipa::OpenApi;

/// OpenAPI Specification Documentation
///
/// Generated at compile time from the `utoipa` annotations on the route
/// handlers and schemas. Served at `/api-docs/openapi.json`, browsable at
/// `/swagger-ui/`.
///
/// # Endpoints
/// - Health Check: `GET /api/health`
/// - Hello: `GET /api/hello`
///
/// # Schemas
/// - `HealthStatus`: Service status payload
/// - `HelloMessage`: Greeting payload
/// - `ErrorEnvelope`: Shared error body
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health,
        crate::routes::hello::hello,
    ),
    components(
        schemas(
            crate::models::health::HealthStatus,
            crate::models::hello::HelloMessage,
            crate::models::error::ErrorEnvelope,
            crate::models::error::ErrorDetail
        )
    ),
    tags(
        (name = "Health Check", description = "Service health monitoring endpoints"),
        (name = "Hello", description = "Connectivity check used by the web client")
    ),
    info(
        description = "Backend API for the Hyperflow Works web application",
        title = "Hyperflow Works API",
        version = "0.1.0",
    )
)]
pub struct ApiDoc;
