//! The playground server.
//!
//! Run with:
//!   RUST_LOG=info cargo run
//!
//! Try:
//!   curl http://localhost:8080/api/v1/hello/Maria
//!   curl -X POST http://localhost:8080/api/v1/users \
//!        -H 'content-type: application/json' \
//!        -d '{"name":"Ana","email":"ana@exemplo.com","age":28}'
//!   curl -H 'Authorization: Bearer valid-token' http://localhost:8080/api/v1/protected/profile
//!   curl -N http://localhost:8080/api/v1/stream

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tsu_playground::handlers::general::FEATURES;
use tsu_playground::{Config, Server, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env().context("invalid configuration")?;

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("creating upload directory {}", config.upload_dir.display()))?;

    if config.uses_demo_secret() {
        warn!("JWT_SECRET is not set, signing login tokens with the demo key");
    }

    let app = routes::app(&config);

    info!(port = config.port, upload_dir = %config.upload_dir.display(), "starting tsu playground");
    for feature in FEATURES {
        info!("  - {feature}");
    }

    Server::bind(config.listen_addr()).serve(app).await?;
    Ok(())
}
