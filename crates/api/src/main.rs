use anyhow::Context;

use eventdesk_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    eventdesk_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let services = eventdesk_api::app::services::build_services(&config)
        .await
        .context("failed to build services")?;
    let app = eventdesk_api::app::build_app(services);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
