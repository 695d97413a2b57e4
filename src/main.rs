//! Room server (default binary).
//!
//! Serves room channels until interrupted. Configure with
//! `TETRIS_VERSUS_HOST`, `TETRIS_VERSUS_PORT`, `TETRIS_VERSUS_MAX_PENDING`
//! and `RUST_LOG`.

use anyhow::Result;
use log::info;

use tetris_versus::adapter::{run_server, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env();
    info!(
        "starting room server on {}:{} (queue {})",
        config.host, config.port, config.max_pending_events
    );

    tokio::select! {
        result = run_server(config, None) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down");
            Ok(())
        }
    }
}
