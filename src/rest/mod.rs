use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};

use crate::{models::Banner, repository::Repository};

mod handlers;
mod models;
mod views;

pub use views::Views;

use handlers::{
    banners_page, create_banner, delete_banner, get_banner, health, list_banners, not_found,
    update_banner,
};

pub type SharedRepository = Arc<dyn Repository<Banner>>;

#[derive(Clone)]
pub struct AppState {
    pub repository: SharedRepository,
    pub views: Views,
    pub started_at: std::time::SystemTime,
}

/// Fails only when the embedded templates do not parse.
pub fn router(repository: SharedRepository) -> Result<Router, tera::Error> {
    let state = AppState {
        repository,
        views: Views::new()?,
        started_at: std::time::SystemTime::now(),
    };

    Ok(Router::new()
        .route("/", get(banners_page))
        .route("/health", get(health))
        .route("/banners", get(list_banners).post(create_banner))
        .route(
            "/banners/:id",
            get(get_banner).put(update_banner).delete(delete_banner),
        )
        .fallback(not_found)
        .with_state(state))
}

pub async fn serve(
    addr: SocketAddr,
    repository: SharedRepository,
    shutdown: tokio_util::sync::CancellationToken,
) -> anyhow::Result<()> {
    log::info!("🌐 HTTP service on http://{}", addr);

    let app = router(repository)?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            log::info!("🛑 HTTP shutdown requested");
        })
        .await?;
    log::info!("👋 HTTP server exited");
    Ok(())
}
