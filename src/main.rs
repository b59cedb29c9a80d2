mod auth;
mod boxoffice;
mod config;
mod db;
mod enrichment;
mod entities;
mod error;
mod models;
mod ratings;
mod routes;
mod store;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{boxoffice::BoxOfficeClient, config::Config, store::Store};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Store,
    pub boxoffice: Arc<BoxOfficeClient>,
}

pub fn router(state: Arc<AppState>) -> Router {
    let movies = post(routes::create_movie)
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer))
        .get(routes::list_movies);

    Router::new()
        .route("/healthz", get(routes::healthz))
        .route("/movies", movies.clone())
        .route("/movies/", movies)
        .route("/movies/{id}", get(routes::get_movie))
        .route("/movies/title/{title}/ratings", post(routes::submit_rating))
        .route("/movies/title/{title}/rating", get(routes::rating_aggregate))
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,marquee=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);

    let http = reqwest::Client::builder().user_agent("marquee/0.1").build()?;

    let db = db::connect_and_migrate(&config.database_url).await?;

    let boxoffice = BoxOfficeClient::new(
        http,
        config.boxoffice_url.clone(),
        config.boxoffice_api_key.clone(),
        config.boxoffice_timeout,
    );

    if config.auth_token.is_none() {
        tracing::warn!("AUTH_TOKEN not set; movie creation will be refused");
    }

    let state = Arc::new(AppState {
        config: config.clone(),
        store: Store::new(db),
        boxoffice: Arc::new(boxoffice),
    });

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, router(state)).await?;

    Ok(())
}
