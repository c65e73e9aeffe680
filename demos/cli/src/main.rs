use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use outbreak_core::{
    ClusterRegistry, EngineConfig, GeoPoint, OutbreakEngine, OutbreakReport, SeededRandom,
};
use outbreak_directory::{load_population_str, load_registry_str};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "outbreak_core=info,outbreak_directory=info";

#[derive(Parser, Debug)]
#[command(
    name = "outbreak-cli",
    about = "Classify a patient population into symptom clusters and flag possible outbreaks."
)]
struct Args {
    /// Path to the patient directory JSON export.
    #[arg(short, long)]
    input: PathBuf,

    /// Free-text symptom query; leave empty to only process the population.
    #[arg(short, long, default_value = "")]
    query: String,

    /// Cluster registry JSON; the built-in table is used otherwise.
    #[arg(short, long)]
    registry: Option<PathBuf>,

    /// Reference latitude (requires --lng).
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Reference longitude (requires --lat).
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lng: Option<f64>,

    /// Seed for the random draws, for reproducible output.
    #[arg(long)]
    seed: Option<u64>,

    /// Expected share of the population per cluster.
    #[arg(long)]
    baseline_fraction: Option<f64>,

    /// Deviation (percent) above which a cluster is reported.
    #[arg(long)]
    threshold: Option<f64>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Summary)]
    format: OutputFormat,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Summary,
    Json,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let data = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Could not read file {:?}", args.input))?;
    let population = load_population_str(&data)?;

    let registry = match &args.registry {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Could not read registry {path:?}"))?;
            load_registry_str(&json)?
        }
        None => ClusterRegistry::default_clusters(),
    };

    let mut config = EngineConfig::default();
    if let Some(fraction) = args.baseline_fraction {
        config.baseline_fraction = fraction;
    }
    if let Some(threshold) = args.threshold {
        config.deviation_threshold_percent = threshold;
    }

    let reference = match (args.lat, args.lng) {
        (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)),
        _ => None,
    };

    let engine = OutbreakEngine::new(registry, config)?;
    let mut rng = match args.seed {
        Some(seed) => SeededRandom::from_seed(seed),
        None => SeededRandom::from_entropy(),
    };
    let report = engine.analyze(&population, reference, &args.query, &mut rng);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Summary => print_summary(&report, engine.registry()),
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_summary(report: &OutbreakReport, registry: &ClusterRegistry) {
    println!(
        "Generated at: {}\nRegistry: {}\nPatients: {}",
        report.generated_at,
        report.registry_version,
        report.processed_patients.len()
    );

    for entry in report.cluster_distribution(registry) {
        println!("  {:<18} {}", entry.name, entry.count);
    }

    println!("Detected clusters: {}", report.detected_clusters.len());
    for cluster in &report.detected_clusters {
        println!(
            "  {:<18} matches {} confidence {:.1}%",
            cluster.name, cluster.match_count, cluster.confidence
        );
    }

    println!("Anomalies: {}", report.anomalies.len());
    for anomaly in &report.anomalies {
        println!("  [{}] {}", anomaly.severity.as_str(), anomaly.message);
    }
}
