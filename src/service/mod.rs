// src/service/mod.rs
//! HTTP front end: one POST route that turns a JSON request into a GIF.

mod handler;

use crate::animator::WmsAnimator;
use crate::config::ServiceConfig;
use crate::error::AppError;
use axum::http::{HeaderValue, Method};
use axum::routing::post;
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::RequestBodyTimeoutLayer;

/// Extra time granted to in-flight requests after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Shared by every request; the animator itself is stateless.
#[derive(Clone)]
pub struct AppState {
    pub animator: WmsAnimator,
    pub request_timeout: Duration,
}

/// Builds the service router with CORS, compression and body-read timeout.
pub fn router(animator: WmsAnimator, config: &ServiceConfig) -> Result<Router, AppError> {
    let state = Arc::new(AppState {
        animator,
        request_timeout: config.write_timeout,
    });

    let route = config.animation_route();
    log::debug!("Registering POST {}", route);

    Ok(Router::new()
        .route(&route, post(handler::animate))
        .with_state(state)
        .layer(RequestBodyTimeoutLayer::new(config.read_timeout))
        .layer(CompressionLayer::new())
        .layer(cors_layer(&config.cors_origins)?))
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer, AppError> {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let values = origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|_| {
                    AppError::Configuration(format!("invalid CORS origin: {}", origin))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(values)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers(Any))
}

/// Binds the configured address and serves until Ctrl-C.
pub async fn run(animator: WmsAnimator, config: &ServiceConfig) -> Result<(), AppError> {
    let app = router(animator, config)?;
    let listener = TcpListener::bind(config.bind_address()).await?;

    log::info!(
        "====  Service: {} ({})  Address: {}  Route: POST {} ====",
        config.title,
        config.description,
        listener.local_addr()?,
        config.animation_route()
    );

    let grace = config.write_timeout + SHUTDOWN_GRACE;
    serve_until(listener, app, shutdown_signal(), grace).await?;

    log::info!("Service stopped.");
    Ok(())
}

/// Serves `app` on `listener` until `signal` resolves, then drains in-flight
/// requests for at most `grace` before giving up on them.
pub async fn serve_until<F>(
    listener: TcpListener,
    app: Router,
    signal: F,
    grace: Duration,
) -> Result<(), AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let stop = CancellationToken::new();
    let graceful = stop.clone().cancelled_owned();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(graceful)
            .await
    });

    tokio::select! {
        finished = &mut server => {
            finished??;
            return Ok(());
        }
        _ = signal => {}
    }

    log::info!("Shutting down...");
    stop.cancel();

    match tokio::time::timeout(grace, &mut server).await {
        Ok(finished) => {
            finished??;
            Ok(())
        }
        Err(_) => {
            server.abort();
            Err(AppError::InternalError {
                message: "Timeout on shutdown - aborting".to_string(),
                source: None,
            })
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Cannot listen for the shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
