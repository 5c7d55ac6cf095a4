use backgammon_server::{BackgammonError, BackgammonServerBuilder, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), BackgammonError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config = ServerConfig::from_env()?;
    let server = BackgammonServerBuilder::from_config(config).build().await?;
    tracing::info!(addr = %server.local_addr()?, "listening");

    server.run().await
}
