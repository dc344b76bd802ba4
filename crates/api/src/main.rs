use std::net::SocketAddr;
use std::sync::Arc;

use user_order_api::app::{self, AppServices};
use user_order_infra::{connect_pool, Config, PgOrderRepository, PgUserRepository};
use user_order_users::TokenConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    user_order_observability::init(&config.log_level, config.app_env != "debug");

    let pool = connect_pool(&config.db).await?;
    let user_repo = Arc::new(PgUserRepository::new(pool.clone()));
    let order_repo = Arc::new(PgOrderRepository::new(pool));

    let services = Arc::new(AppServices::new(
        user_repo,
        order_repo,
        TokenConfig {
            secret: config.jwt_secret.clone(),
            ttl_seconds: config.jwt_expiration_secs,
        },
    ));

    let app = app::build_app(services);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!("failed to install ctrl-c handler");
        return;
    }
    tracing::info!("shutdown signal received, draining connections");
}
