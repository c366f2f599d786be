//! # Postboard API Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use postboard_core::ports::{RateLimiter, TokenService};
use postboard_infra::JwtTokenService;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use middleware::rate_limit::RateLimitMiddleware;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Postboard API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).await;
    let token_service: Arc<dyn TokenService> = Arc::new(JwtTokenService::from_env());
    let rate_limiter = rate_limiter()?;

    HttpServer::new(move || {
        let rate_limit = match &rate_limiter {
            Some(limiter) => RateLimitMiddleware::new(limiter.clone()),
            None => RateLimitMiddleware::disabled(),
        };

        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(token_service.clone()))
            .configure(|cfg| handlers::configure_routes(cfg, rate_limit))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

#[cfg(feature = "rate-limit")]
fn rate_limiter() -> std::io::Result<Option<Arc<dyn RateLimiter>>> {
    use postboard_infra::{InMemoryRateLimiter, RateLimitConfig};

    let limiter = InMemoryRateLimiter::new(RateLimitConfig::from_env())
        .map_err(std::io::Error::other)?;
    Ok(Some(Arc::new(limiter)))
}

#[cfg(not(feature = "rate-limit"))]
fn rate_limiter() -> std::io::Result<Option<Arc<dyn RateLimiter>>> {
    tracing::info!("Rate limiting disabled");
    Ok(None)
}
