use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use landing_simulation::estimation_system::estimator::control_vector;
use landing_simulation::*;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "landing-sim")]
#[command(about = "Phase-segmented landing trajectory simulator with state extrapolation")]
#[command(version)]
struct Args {
    /// Landing profile as JSON; the reference profile is used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seconds per tick
    #[arg(long, default_value_t = DEFAULT_SAMPLE_INTERVAL)]
    sample_interval: f64,

    /// Longest landing the telemetry buffer is provisioned for, in seconds
    #[arg(long, default_value_t = MAX_LANDING_DURATION)]
    max_duration: f64,

    /// Explicit telemetry capacity in samples, overrides --max-duration
    #[arg(long)]
    capacity: Option<usize>,

    /// Keep sampling this many seconds after touchdown
    #[arg(long, default_value_t = 0.0)]
    hold: f64,

    /// Output directory
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Skip state extrapolation
    #[arg(long)]
    no_estimator: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let profile = match &args.config {
        Some(path) => LandingProfile::from_json_file(path)
            .with_context(|| format!("loading landing profile from {}", path.display()))?,
        None => LandingProfile::default(),
    };
    let clock = match args.capacity {
        Some(capacity) => SimulationClock::new(args.sample_interval, capacity)?,
        None => SimulationClock::sized_for(args.sample_interval, args.max_duration)?,
    };

    let simulator = Simulator::new(profile, clock).context("invalid landing configuration")?;
    let telemetry = simulator
        .run_until(simulator.landing_duration() + args.hold.max(0.0))
        .context("landing simulation failed")?;
    telemetry.log_summary();

    std::fs::create_dir_all(&args.output_dir)?;
    let telemetry_path = args.output_dir.join("telemetry.csv");
    telemetry
        .write_csv(File::create(&telemetry_path)?)
        .with_context(|| format!("writing {}", telemetry_path.display()))?;
    info!(path = %telemetry_path.display(), "telemetry written");

    if args.no_estimator {
        return Ok(());
    }

    let model = EstimatorModel::kinematic(clock.sample_interval())?;
    let predicted = predict_telemetry(&model, &telemetry, clock.sample_interval(), |sample| {
        control_vector(simulator.commanded_acceleration(sample.time))
    })
    .context("state extrapolation failed")?;

    match predicted.max_position_residual(&telemetry) {
        Some(residual) if residual > 1.0 => {
            warn!(residual, "predictions diverge from simulated telemetry")
        }
        Some(residual) => info!(residual, "max position residual"),
        None => warn!("no telemetry to compare predictions against"),
    }

    let predicted_path = args.output_dir.join("predicted.csv");
    predicted
        .write_csv(File::create(&predicted_path)?)
        .with_context(|| format!("writing {}", predicted_path.display()))?;
    info!(path = %predicted_path.display(), "predictions written");

    Ok(())
}
