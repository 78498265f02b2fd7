mod admin;
mod auth;
mod catalog;
mod config;
mod context;
mod cookies;
mod csrf;
mod db;
mod error;
mod flash;
mod forms;
mod models;
mod pages;
mod raw_sql;
mod schema;
mod state;
mod telemetry;
mod uploads;
mod views;
mod workouts;

use anyhow::Context as _;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use nfg_core::image::MAX_FILE_SIZE;
use std::net::SocketAddr;
use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::{Config, STATIC_MOUNT};
use crate::state::AppState;

fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut router = Router::new()
        .merge(pages::router(state.clone()))
        .nest("/admin", admin::router(state.clone()))
        .nest_service(
            &format!("/{STATIC_MOUNT}"),
            ServeDir::new(&config.static_dir),
        );

    if config.uploads_need_own_mount() {
        router = router.nest_service(
            &config.upload_url_prefix(),
            ServeDir::new(&config.upload_dir),
        );
    }

    router
        .fallback(pages::not_found)
        .layer(DefaultBodyLimit::max(MAX_FILE_SIZE))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(telemetry::make_span)
                .on_response(telemetry::on_response)
                .on_failure(telemetry::on_failure),
        )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_telemetry();

    let config = Config::load()?;
    info!(database = %config.database_host(), "connecting to database");

    let pool = db::create_pool(&config.database_url)?;
    {
        let mut conn = pool.get().context("checking out a connection for startup")?;
        match auth::purge_expired(&mut conn) {
            Ok(0) => {}
            Ok(purged) => info!(purged, "removed expired admin sessions"),
            Err(e) => tracing::warn!("Could not purge expired sessions: {e}"),
        }
    }
    catalog::ensure_style_seed(&pool);

    let bind_addr = config.bind_addr;
    let state = AppState::new(pool, config);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    info!("Server listening on {}", listener.local_addr()?);

    axum::serve(
        listener,
        app(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}
