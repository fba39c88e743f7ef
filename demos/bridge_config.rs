//! Bridge configuration fetch example
//!
//! Demonstrates the preset request client with retries, business-error
//! translation and a logger configured for the current environment.
//!
//! Run with: cargo run --example bridge_config -- bridge.example.com

use bridge_resilience::prelude::*;
use bridge_resilience::{info, warn};
use std::sync::Arc;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let host = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "bridge.example.com".to_string());

    let logger = Logger::global();
    info!(logger, LogCategory::General, "Environment: {}", logger.environment());

    let api = BridgeApi::with_logger(Arc::clone(&logger))?;
    println!("Fetching bridge config for {} from {}", host, api.client().base_url());

    match api.get_bridge_config(&host).await {
        Ok(config) => {
            logger.info(LogCategory::Bridge, "Bridge config loaded", config.data);
        }
        Err(err) => {
            let code = ErrorCode::from_error(&err);
            warn!(logger, LogCategory::Bridge, "Using local config: {}", code.user_message());
        }
    }

    let metrics = logger.metrics();
    println!(
        "Logged {} entries, {} filtered, {} delivered",
        metrics.total_logged(),
        metrics.filtered_count(),
        metrics.entries_delivered()
    );

    logger.destroy();
    Ok(())
}
