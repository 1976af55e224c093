mod cards;
mod config;
mod db;
mod entities;
mod error;
mod imdb;
mod models;
mod routes;
mod store;
mod templates;

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{config::Config, imdb::ImdbClient, store::Store};

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub imdb: Arc<ImdbClient>,
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/search", get(routes::search_form).post(routes::search))
        .route("/detail/{id}", get(routes::detail))
        .route("/review/{id}", get(routes::review).post(routes::submit_review))
        .route("/update/{id}", post(routes::update_review))
        .route("/delete/{id}", post(routes::delete_review))
        .route("/find", get(routes::find))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,filmreview=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    let http = reqwest::Client::builder()
        .user_agent("filmreview/0.1")
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()?;

    let db = db::connect_and_migrate(&config).await?;
    let store = Store::new(db);
    let imdb = ImdbClient::new(http, config.imdb_base_url.clone());

    let state = Arc::new(AppState { store, imdb: Arc::new(imdb) });

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app(state)).await?;

    Ok(())
}
