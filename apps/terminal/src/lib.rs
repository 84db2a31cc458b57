pub mod cli;
pub mod config;
pub mod render;
pub mod session;
pub mod sink;

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use drill_core::{DirectorySource, PairSet, PairSource, SessionReporter, StageEngine, StatsPeriod};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::session::SessionEnd;
use crate::sink::JsonlSink;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Command::Drill { list_id } => drill(&config, &list_id).await,
        Command::Stats { period, user } => stats(&config, period.into(), user.as_deref()).await,
    }
}

async fn drill(config: &Config, list_id: &str) -> anyhow::Result<()> {
    tracing::info!(list_id, dir = %config.list_dir.display(), "loading word list");
    let pairs = DirectorySource::new(&config.list_dir)
        .load_pairs(list_id)
        .with_context(|| format!("cannot load word list '{list_id}'"))?;
    let pairs =
        PairSet::new(pairs).with_context(|| format!("word list '{list_id}' cannot be drilled"))?;

    let reporter = SessionReporter::new(
        config.user_id.clone(),
        Arc::new(JsonlSink::new(&config.completions_path)),
    );
    let mut engine = StageEngine::start(pairs, StdRng::from_os_rng())
        .with_timing(config.timing)
        .with_reporter(reporter);

    let input = BufReader::new(tokio::io::stdin());
    let mut out = std::io::stdout();
    let end = session::drive(&mut engine, input, &mut out).await?;

    match end {
        SessionEnd::Completed => {
            if let Some(handle) = engine.take_report_handle() {
                if let Err(e) = handle.await {
                    tracing::warn!(error = %e, "completion report task failed");
                }
            }
        }
        SessionEnd::Abandoned => {
            let state = engine.state();
            tracing::info!(stage = state.active_stage.number(), "session abandoned");
        }
    }

    Ok(())
}

async fn stats(config: &Config, period: StatsPeriod, user: Option<&str>) -> anyhow::Result<()> {
    let sink = JsonlSink::new(&config.completions_path);
    let mut events = sink
        .read_all()
        .await
        .with_context(|| format!("cannot read {}", sink.path().display()))?;
    if let Some(user) = user {
        events.retain(|e| e.user_id == user);
    }

    let buckets = drill_core::stats::totals(&events, period, Utc::now());
    print!("{}", render::stats(&buckets, period));
    Ok(())
}
