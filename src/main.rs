use anyhow::{Context, Result};
use ode_seed_gen::{cli::Cli, writer::generate};
use std::time::Instant;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let cli = Cli::parse_args();
    let start = Instant::now();

    let report = generate(&cli.seed_folder, &cli.config(), cli.output.as_deref())
        .with_context(|| format!("Failed to generate seed script from {:?}", cli.seed_folder))?;

    let elapsed = start.elapsed();
    println!(
        "\nCreated {:?} ({} rows, {} annotation tasks) in {:.1}s",
        report.output,
        report.rows,
        report.tasks,
        elapsed.as_secs_f64()
    );

    Ok(())
}
