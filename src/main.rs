use anyhow::Context;
use minichef_index::chain::StaticChainClient;
use minichef_index::{
    init_db, sort_events_chain_order, ChainClient, ChainEvent, Config, Indexer, LoggingMarketSink,
    MarketSink, Repository,
};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = replay(config).await {
        eprintln!("Replay failed: {:#}", e);
        std::process::exit(1);
    }
}

/// Replay an NDJSON event file against the entity store, in chain order.
async fn replay(config: Config) -> anyhow::Result<()> {
    let pool = init_db(&config.database_path)
        .await
        .context("initialize entity store")?;
    let repo = Arc::new(Repository::new(pool));
    let chain: Arc<dyn ChainClient> =
        Arc::new(StaticChainClient::new(config.primary_reward_token));
    let sink: Arc<dyn MarketSink> = Arc::new(LoggingMarketSink);
    let indexer = Indexer::new(repo, chain, sink);

    let raw = std::fs::read_to_string(&config.events_path)
        .with_context(|| format!("read events from {}", config.events_path))?;

    let mut events: Vec<ChainEvent> = Vec::new();
    for (lineno, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let event = serde_json::from_str(line)
            .with_context(|| format!("parse event at line {}", lineno + 1))?;
        events.push(event);
    }
    sort_events_chain_order(&mut events);

    let mut applied = 0usize;
    let mut skipped = 0usize;
    for event in &events {
        match indexer.apply(event).await {
            Ok(()) => applied += 1,
            Err(e) if config.halt_on_error => {
                return Err(e).with_context(|| {
                    format!(
                        "event at block {} tx {} log {} failed",
                        event.meta.block_number, event.meta.tx_index, event.meta.log_index
                    )
                });
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    block = event.meta.block_number,
                    tx = %format!("{:#x}", event.meta.tx_hash),
                    log_index = event.meta.log_index,
                    "skipping failed event"
                );
                skipped += 1;
            }
        }
    }

    tracing::info!(applied, skipped, "replay complete");
    Ok(())
}
