use anyhow::Result;
use cloud_recording_service::{
    config::config_loader,
    infrastructure::{
        axum_http::http_serve, provider::cloud_recording_client::CloudRecordingClient,
        token::app_token_issuer::AppTokenIssuer,
    },
    observability,
};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        error!("Cloud recording service exited with error: {:#}", error);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    observability::init_observability("cloud-recording-service")?;

    let dotenvy_env = config_loader::load()?;
    info!(config = ?dotenvy_env, "ENV has been loaded");

    let gateway = CloudRecordingClient::new(
        &dotenvy_env.provider,
        &dotenvy_env.app,
        &dotenvy_env.customer,
    )?;
    info!(base_url = %dotenvy_env.provider.base_url, "Provider client has been built");

    let token_issuer = AppTokenIssuer::new(&dotenvy_env.app);

    http_serve::start(
        Arc::new(dotenvy_env),
        Arc::new(gateway),
        Arc::new(token_issuer),
    )
    .await?;

    Ok(())
}
