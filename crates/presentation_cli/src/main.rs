//! PackPilot CLI
//!
//! Interactive travel-packing assistant. Takes a free-form trip
//! description, runs the three-stage planning pipeline, and prints the
//! packing report.

#![allow(clippy::print_stdout)]

use std::io::Write;
use std::sync::Arc;

use application::PackingPlannerService;
use application::ports::{InferencePort, WeatherPort};
use clap::{Parser, Subcommand};
use domain::TripRequest;
use infrastructure::{AppConfig, FoundryInferenceAdapter, OpenMeteoWeatherAdapter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Request used when the operator submits a blank description
const DEFAULT_REQUEST: &str = "I'm planning a 5-day vacation to Paris";

/// PackPilot CLI
#[derive(Parser)]
#[command(name = "packpilot-cli")]
#[command(author, version, about = "AI-powered travel packing assistant", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a packing report for a trip description
    Plan {
        /// Trip description; prompted interactively when omitted
        request: Option<String>,
    },

    /// Validate configuration and probe the external services
    Check,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Substitute the default request for blank input
fn normalize_input(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        DEFAULT_REQUEST.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Read the trip description interactively
fn prompt_for_request() -> anyhow::Result<String> {
    print!("\u{2708}\u{fe0f}  Describe your travel plans: ");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input)
}

/// Load and validate configuration, printing setup guidance on failure
fn load_config() -> anyhow::Result<AppConfig> {
    let config = AppConfig::load()?;
    if let Err(e) = config.validate() {
        println!("\u{274c} {e}");
        println!("{}", AppConfig::setup_instructions());
        std::process::exit(1);
    }
    Ok(config)
}

async fn run_plan(request: Option<String>) -> anyhow::Result<()> {
    println!("\u{1f9e0} AI-Powered Travel Packing Assistant");
    println!("{}", "=".repeat(60));

    let input = match request {
        Some(arg) => normalize_input(&arg),
        None => normalize_input(&prompt_for_request()?),
    };

    let config = load_config()?;

    let inference: Arc<dyn InferencePort> =
        Arc::new(FoundryInferenceAdapter::new(config.inference)?);
    let weather: Arc<dyn WeatherPort> =
        Arc::new(OpenMeteoWeatherAdapter::with_config(config.weather));
    let planner = PackingPlannerService::new(inference, weather);

    println!("\u{1f680} Starting packing pipeline...");

    let report = planner.run(TripRequest::new(input)?).await?;

    println!("\n{}", "=".repeat(60));
    println!("{report}");
    Ok(())
}

async fn run_check() -> anyhow::Result<()> {
    let config = load_config()?;
    println!("\u{2705} Configuration valid");
    println!("   Deployment: {}", config.inference.deployment);

    let inference = FoundryInferenceAdapter::new(config.inference)?;
    if inference.is_healthy().await {
        println!("\u{2705} Inference deployment reachable");
    } else {
        println!("\u{274c} Inference deployment unreachable");
    }

    let weather = OpenMeteoWeatherAdapter::with_config(config.weather);
    if weather.is_available().await {
        println!("\u{2705} Weather service available");
    } else {
        println!("\u{274c} Weather service unavailable");
    }
    weather.close().await;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = log_filter_from_verbosity(cli.verbose);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Some(Commands::Check) => run_check().await,
        Some(Commands::Plan { request }) => run_plan(request).await,
        None => run_plan(None).await,
    }
}
