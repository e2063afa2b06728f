use axum::{routing::get, Extension, Router};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::validate_request::ValidateRequestHeaderLayer;
use touchdown_config::Secret;
use touchdown_twitch::Writer;

pub mod config;

mod handlers;
mod landing;
pub use landing::{InvalidLanding, Landing, MAX_NAME_LEN};

/// Health checks on every path, plus the landing announcement
pub fn router(writer: Writer, bearer: Option<&Secret>) -> Router {
    let mut landing = Router::new().route(
        "/landing/:name/:guess/:actual",
        get(handlers::landing).fallback(handlers::not_implemented),
    );

    if let Some(bearer) = bearer {
        log::debug!("the landing route requires a bearer token");
        landing = landing.route_layer(ValidateRequestHeaderLayer::bearer(bearer));
    }

    Router::new()
        .merge(landing)
        .fallback(handlers::fallback)
        .layer(Extension(writer))
}

pub async fn bind(config: &config::Status) -> anyhow::Result<TcpListener> {
    use anyhow::Context as _;
    TcpListener::bind(&config.address)
        .await
        .with_context(|| format!("cannot bind the status listener to {}", config.address))
}

/// Serves until `shutdown` fires, then waits for in-flight requests to finish
pub async fn serve(
    listener: TcpListener,
    router: Router,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    log::info!("status listening on: {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    log::info!("status listener stopped");
    Ok(())
}
