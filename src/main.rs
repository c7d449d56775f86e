use hearth::config::Config;
use hearth::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let path = std::env::var("HEARTH_CONFIG").unwrap_or_else(|_| "hearth.yaml".to_string());
    let config = Config::load(&path)?;

    tokio::select! {
        res = server::run(config) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }

    Ok(())
}
