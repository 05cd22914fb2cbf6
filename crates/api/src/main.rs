use std::sync::Arc;

use dashbore_api::app::{build_app, services::AppServices};
use dashbore_api::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dashbore_observability::init();

    let config = AppConfig::from_env();
    let services = Arc::new(AppServices::connect(&config).await?);

    // Bootstrap and seed failures are logged, not fatal: a node that cannot
    // refresh permissions still serves with whatever storage already holds.
    if let Err(err) = dashbore_infra::bootstrap(services.store.as_ref(), &services.registry).await {
        tracing::error!(error = %err, "permission bootstrap failed");
    }
    if let Err(err) = dashbore_infra::seed(services.store.as_ref(), config.production).await {
        tracing::error!(error = %err, "seed failed");
    }

    let app = build_app(services, &config.cors_origin);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
