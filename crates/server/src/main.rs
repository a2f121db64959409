use crate::{
    auth::AppClaims,
    config::AppConfig,
    routes::{api_router, public_router},
    state::AppState,
    utils::shutdown::shutdown_signal,
};
use database::db::create_connection;
use log::info;
use models::clock::SystemClock;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_oauth2_resource_server::server::OAuth2ResourceServer;

mod auth;
mod config;
mod doc;
mod dtos;
mod error;
mod routes;
mod state;
mod utils;

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    let db = create_connection(&config.database_url)
        .await
        .expect("Failed to connect to database");

    let oauth2_resource_server = <OAuth2ResourceServer<AppClaims>>::builder()
        .issuer_url(config.oidc_issuer_url.as_str())
        .build()
        .await
        .expect("Failed to build OAuth2ResourceServer");

    let state = AppState::new(
        db,
        Arc::new(SystemClock),
        config.media_root.clone(),
        &config.admin_role,
    );

    let app = api_router(state.clone())
        .layer(ServiceBuilder::new().layer(oauth2_resource_server.into_layer()))
        .merge(public_router(state))
        .layer(CompressionLayer::new());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .unwrap();
    info!("Running axum on http://{}", config.bind_addr);
    info!("Serving media from {}", config.media_root.display());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();
}
