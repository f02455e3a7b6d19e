use crate::config::Config;
use crate::middleware;
use crate::openapi::ApiDoc;
use crate::routes;
use crate::static_files::{self, StaticAssets};
use crate::telemetry::{self, ErrorReporter};
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::from_fn;
use actix_web::{App, Error, web};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Shared, read-only state handed to every worker.
#[derive(Clone)]
pub struct AppState {
    pub config: web::Data<Config>,
    pub assets: Option<web::Data<StaticAssets>>,
    pub reporter: web::Data<dyn ErrorReporter>,
}

impl AppState {
    /// Resolves static hosting once; call before the server spawns workers.
    pub fn new(config: Config) -> Self {
        let assets = StaticAssets::discover(&config).map(web::Data::new);
        Self {
            config: web::Data::new(config),
            assets,
            reporter: web::Data::from(telemetry::default_reporter()),
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = web::Data::from(reporter);
        self
    }

    pub fn with_assets(mut self, assets: Option<StaticAssets>) -> Self {
        self.assets = assets.map(web::Data::new);
        self
    }
}

/// Builds the application: pipeline stages, API routes, API docs, and the
/// static host when one is configured.
///
/// Stages are wrapped innermost first since actix runs the last `wrap`
/// first; keep this in step with [`middleware::PIPELINE`].
pub fn build_app(
    state: AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(state.config.clone())
        .app_data(state.reporter.clone())
        .wrap(from_fn(middleware::json_format))
        .wrap(from_fn(middleware::body_parser))
        .wrap(from_fn(middleware::cors))
        .wrap(from_fn(middleware::access_log))
        .wrap(from_fn(middleware::error_boundary))
        .configure(routes::configure)
        .service(
            SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );

    match state.assets {
        Some(assets) => app
            .app_data(assets)
            .default_service(web::to(static_files::serve)),
        None => app.default_service(web::to(static_files::not_found)),
    }
}
