//! Relay runner (default binary).
//!
//! Starts the authoritative relay with configuration from the environment
//! (`TETRIS_RELAY_HOST`, `TETRIS_RELAY_PORT`, `TETRIS_RELAY_RESET_MS`).

use anyhow::Result;

use shared_tetris::relay::{run_relay, RelayConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let config = RelayConfig::from_env();
    run_relay(config, None).await
}
