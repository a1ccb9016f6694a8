//! Opportunity engine binary: loads config, brings up per-chain RPC
//! transport and pool registries, then runs the scan/size/admit/publish
//! loop until interrupted.
//!
//! Exit codes (spec §6): `0` clean shutdown, `1` config failed to load
//! or validate, `2` no configured chain has a healthy RPC endpoint at
//! startup, `3` an unexpected internal error.

use engine::round;
use engine::scan;
use orchestrator::AdmissionTable;
use publisher::Publisher;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use search::SearchConfig;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How often each chain's scan loop runs a round.
const SCAN_INTERVAL_MS: u64 = 2_000;
/// Soft per-round deadline (spec §5): a round that overruns this is
/// logged and skipped rather than left to pile up against the next one.
const ROUND_DEADLINE: std::time::Duration = std::time::Duration::from_secs(5);

fn main() {
    let code = match run() {
        Ok(()) => 0,
        Err(EngineError::ConfigInvalid(msg)) => {
            error!(error = %msg, "config failed to load or validate");
            1
        }
        Err(EngineError::NoHealthyRpc) => {
            error!("no configured chain has a healthy RPC endpoint");
            2
        }
        Err(EngineError::Internal(msg)) => {
            error!(error = %msg, "internal error");
            3
        }
    };
    std::process::exit(code);
}

enum EngineError {
    ConfigInvalid(String),
    NoHealthyRpc,
    Internal(String),
}

fn run() -> Result<(), EngineError> {
    init_tracing();

    let runtime = tokio::runtime::Runtime::new().map_err(|e| EngineError::Internal(e.to_string()))?;
    runtime.block_on(run_async())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(
        "engine=info"
            .parse()
            .expect("static log directive always parses"),
    );
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn run_async() -> Result<(), EngineError> {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.toml".to_string());
    info!(path = %config_path, "loading config");

    let snapshot = config::load_from_file(&config_path).map_err(|e| EngineError::ConfigInvalid(e.to_string()))?;
    let plane = config::ConfigPlane::new(types::ConfigSnapshot::empty("boot"));
    let applied = plane.apply(snapshot).map_err(|e| EngineError::ConfigInvalid(format!("{e:?}")))?;
    info!(version = %applied.version, chains = applied.summary.chains, pools = applied.summary.pools, "config applied");

    let config = plane.current();
    let (transport, runtimes) = engine::build_runtime(&config);

    if !engine::has_healthy_rpc(&transport, &config).await {
        return Err(EngineError::NoHealthyRpc);
    }

    let table = Arc::new(AdmissionTable::new());
    let publisher = Arc::new(Publisher::default());

    let log_task = {
        let publisher = publisher.clone();
        tokio::spawn(async move {
            loop {
                let event = publisher.recv().await;
                info!(?event, "published event");
            }
        })
    };

    let mut scan_tasks = Vec::with_capacity(runtimes.len());
    for chain_config in &config.chains {
        let Some(chain_runtime) = runtimes.get(&chain_config.descriptor.chain_id) else {
            continue;
        };
        let registry = chain_runtime.registry.clone();
        let chain = chain_config.descriptor.clone();
        let pool_descriptors = chain_config.pools.clone();
        let config = plane.current();
        let table = table.clone();
        let publisher = publisher.clone();

        scan_tasks.push(tokio::spawn(async move {
            scan_loop(registry, chain, pool_descriptors, config, table, publisher).await;
        }));
    }

    tokio::signal::ctrl_c().await.map_err(|e| EngineError::Internal(e.to_string()))?;
    info!("shutdown signal received, stopping scan loops");
    log_task.abort();
    for task in scan_tasks {
        task.abort();
    }

    Ok(())
}

async fn scan_loop(
    registry: Arc<registry::PoolRegistry>,
    chain: types::chain::ChainDescriptor,
    pool_descriptors: Vec<types::pool::PoolDescriptor>,
    config: Arc<types::ConfigSnapshot>,
    table: Arc<AdmissionTable>,
    publisher: Arc<Publisher>,
) {
    let search_config = SearchConfig::default();
    let native_price_usd: Decimal = dec!(1.0); // no native-token price oracle at this layer; see engine::round docs

    loop {
        let now_ms = now_ms();
        let round_future = scan::scan_chain_round(
            &registry,
            &chain,
            &pool_descriptors,
            &config.policies,
            &config.quote_set,
            native_price_usd,
            now_ms,
            &search_config,
        );

        match tokio::time::timeout(ROUND_DEADLINE, round_future).await {
            Ok(round_result) => {
                round::admit_and_publish(chain.chain_id, round_result, &config, &table, &publisher, now_ms);
            }
            Err(_) => {
                warn!(chain_id = chain.chain_id, "scan round exceeded soft deadline, skipping");
            }
        }

        tokio::time::sleep(std::time::Duration::from_millis(SCAN_INTERVAL_MS)).await;
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
