//! Batch scoring CLI.
//!
//! Builds the transaction graph, replays precomputed credit and sentiment
//! signals (optionally scoring credit live from financial ratios), fuses
//! everything per entity and writes the profiles as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use sentinel_risk::application::services::{
    BatchAnalyzer, CreditRiskEngine, RiskFusionEngine, RiskSignalProducer, SystemicRiskEngine,
};
use sentinel_risk::domain::value_objects::EntityId;
use sentinel_risk::infrastructure::config::SentinelConfig;
use sentinel_risk::infrastructure::logging::init_logging;
use sentinel_risk::infrastructure::persistence::{JsonFileCreditFeatureSource, PrecomputedSignals};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "sentinel-batch")]
#[command(about = "Fuse credit, systemic and sentiment risk into one profile per entity")]
struct Args {
    /// Configuration file (TOML, YAML or JSON).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Transaction dataset (JSON array).
    #[arg(long, default_value = "data/transactions.json")]
    transactions: PathBuf,

    /// Precomputed signals (JSON array).
    #[arg(long)]
    signals: PathBuf,

    /// Financial ratios for live credit scoring (needs `credit.model_path`).
    #[arg(long)]
    credit_features: Option<PathBuf>,

    /// Output file; stdout when absent.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Entity to score; repeatable. Defaults to every entity in the signals file.
    #[arg(long = "entity")]
    entities: Vec<String>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = SentinelConfig::load(args.config.as_deref()).context("loading configuration")?;
    init_logging(&config.logging)?;
    let scorer = config.scorer()?;

    let mut systemic = SystemicRiskEngine::new(config.systemic_config())?;
    systemic
        .ingest_path(&args.transactions)
        .with_context(|| format!("ingesting {}", args.transactions.display()))?;

    let signals = PrecomputedSignals::load(&args.signals)
        .with_context(|| format!("loading {}", args.signals.display()))?;
    let entities: Vec<EntityId> = if args.entities.is_empty() {
        signals.entities()
    } else {
        args.entities
            .iter()
            .map(|e| EntityId::new(e.as_str()))
            .collect::<Result<_, _>>()?
    };

    let fusion = Arc::new(RiskFusionEngine::from_config(config.fusion_config(), scorer.clone())?);
    let mut analyzer = BatchAnalyzer::new(fusion).with_producer(Arc::new(systemic));
    for producer in signals.into_producers() {
        analyzer = analyzer.with_producer(Arc::new(producer));
    }
    if let Some(path) = &args.credit_features {
        let features = JsonFileCreditFeatureSource::new(path).load()?;
        let credit = CreditRiskEngine::from_config(&config.credit_config(), scorer)
            .context("loading credit model")?
            .with_features(features);
        analyzer = analyzer.with_producer(Arc::new(credit));
    }
    info!(
        producers = ?analyzer.producers().iter().map(|p| p.risk_type()).collect::<Vec<_>>(),
        entities = entities.len(),
        "pipeline ready"
    );

    let report = analyzer.run(&entities);
    if !report.is_complete() {
        warn!(failed = report.failures.len(), "some entities could not be scored");
    }

    let json = serde_json::to_string_pretty(&report.to_json()?)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), profiles = report.profiles.len(), "profiles written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
