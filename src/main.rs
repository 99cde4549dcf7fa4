//! Service entry point: loads configuration, builds the store and serves HTTP.
use anyhow::Context;
use std::future::Future;
use std::time::Duration;
use survey_backend::app::{build_router, build_state, cors_layer};
use survey_backend::config::AppConfig;
use survey_backend::observability;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real deployments set the environment directly.
    dotenvy::dotenv().ok();
    observability::init_tracing();

    let config = AppConfig::from_env().context("load configuration")?;
    run_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run_with_shutdown<F>(config: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = build_state(&config).await?;
    let app = build_router(state).layer(cors_layer(&config.cors_origins)?);

    let handle = axum_server::Handle::new();
    let shutdown_handle = handle.clone();
    tokio::spawn(async move {
        shutdown.await;
        tracing::info!("shutdown requested");
        shutdown_handle.graceful_shutdown(Some(Duration::from_secs(10)));
    });

    let addr = config.bind_addr;
    tracing::info!(%addr, "survey service listening");
    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .with_context(|| format!("serve on {addr}"))?;
    Ok(())
}
