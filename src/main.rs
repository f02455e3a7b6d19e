use actix_web::HttpServer;
use hyperflow_works_api::app::{AppState, build_app};
use hyperflow_works_api::config::Config;
use hyperflow_works_api::middleware::PIPELINE;
use hyperflow_works_api::telemetry::init_logging;
use std::io;

/// Hyperflow Works API Entry Point
///
/// Configures and launches the Actix-web HTTP server with:
/// - JSON endpoints under `/api` (health, hello)
/// - Swagger UI for API documentation
/// - The built web client with SPA fallback, in production mode
/// - Environment configuration via `.env` file
///
/// # Endpoints
/// - Health: `GET /api/health`
/// - Hello: `GET /api/hello`
/// - Swagger UI: `/swagger-ui/`
/// - OpenAPI spec: `/api-docs/openapi.json`
///
/// # Configuration
/// - Server binds to `0.0.0.0:3000` by default (`HOST`, `PORT`)
/// - `APP_ENV=production` serves `FRONTEND_DIST` as a single-page app
#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_logging("info");
            tracing::error!(error = %e, "invalid configuration");
            return Err(io::Error::new(io::ErrorKind::InvalidInput, e));
        }
    };
    init_logging(&config.log_level);

    let state = AppState::new(config.clone());
    tracing::debug!(stages = ?PIPELINE.map(|s| s.name()), "request pipeline");
    if let Some(assets) = &state.assets {
        tracing::info!("serving frontend from {}", assets.root().display());
    }

    let server = HttpServer::new(move || build_app(state.clone()))
        .bind((config.host, config.port))?;
    tracing::info!(
        "server is running on http://{}:{} ({:?})",
        config.host,
        config.port,
        config.mode
    );
    server.run().await
}
