//! Arena entry point: runs a scripted fight on the combat timer until it ends.
mod scenario;

use std::path::PathBuf;

use anyhow::Result;
use combat_runtime::{CombatEngine, RuntimeConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Hard stop for runs that never resolve.
const MAX_TICKS: u64 = 500;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _guard = setup_logging()?;
    let config = RuntimeConfig::from_env();
    tracing::info!(
        tick_ms = config.tick_interval.as_millis() as u64,
        seed = ?config.seed,
        pvp_range = config.pvp_range,
        "arena starting"
    );

    let scenario = scenario::party_vs_goblins()?;
    let mut engine = CombatEngine::builder()
        .runtime_config(&config)
        .population(scenario.population)
        .groups(scenario.groups)
        .build()?;

    for (attacker, target) in scenario.engagements {
        engine.engage(attacker, target).await?;
    }

    let cancel = engine.cancellation();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, stopping after the current round");
            cancel.cancel();
        }
    });

    let mut interval = tokio::time::interval(config.tick_interval);
    while engine.has_fights() {
        interval.tick().await;
        let report = match engine.tick().await {
            Ok(report) => report,
            Err(combat_runtime::CombatError::Cancelled) => break,
            Err(e) => return Err(e.into()),
        };

        for death in &report.deaths {
            tracing::info!(
                killer = %death.killer,
                victim = %death.victim_name,
                coins = death.corpse.coins,
                "death"
            );
        }
        tracing::debug!(report = %serde_json::to_string(&report)?, "tick report");

        if report.tick.0 >= MAX_TICKS {
            tracing::warn!(tick = %report.tick, "arena hit the tick limit");
            break;
        }
    }

    for combatant_id in engine.population().ids() {
        if let Some(c) = engine.population().get(combatant_id) {
            tracing::info!(
                name = %c.name,
                level = c.level,
                health = c.vitals.health.current(),
                experience = c.experience,
                "survivor"
            );
        }
    }
    Ok(())
}

/// Logs to stderr, and to `arena.log` under `ARENA_LOG_DIR` when it is set.
fn setup_logging() -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let Some(log_dir) = std::env::var_os("ARENA_LOG_DIR").map(PathBuf::from) else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
        return Ok(None);
    };

    std::fs::create_dir_all(&log_dir)?;
    let file_appender = tracing_appender::rolling::never(&log_dir, "arena.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    tracing::info!("Log file: {}/arena.log", log_dir.display());
    Ok(Some(guard))
}
