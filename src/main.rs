//! @ai:module:intent CLI for perfplot
//! @ai:module:layer presentation

use anyhow::Result;
use clap::{CommandFactory, Parser};
use perfplot::{
    config::{PlotConfig, DEFAULT_CONFIG_FILE},
    corpus::{DataFileCollector, LayoutResolver},
    metrics::{MetricsAggregator, MetricsAggregatorTrait, PlotType, Profile},
    pipeline::TableBuilder,
    report::{show_figures, ConsoleReporter, ReportGenerator},
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "perfplot")]
#[command(about = "Compare browser performance runs across websites and variants")]
#[command(version)]
struct Cli {
    /// Root directory of <website>/<variant>/<file>.json results
    directory_path: PathBuf,

    /// Plot type: box, scatter or violin (must be supported by the profile)
    plot_type: Option<String>,

    /// Metric profile: browsertime, dns or trr
    #[arg(short, long)]
    profile: Option<Profile>,

    /// Variant every other variant is compared against
    #[arg(short, long)]
    baseline: Option<String>,

    /// Output directory for figures and summaries
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Open each written figure in an image viewer
    #[arg(long)]
    show: bool,
}

const DEFAULT_LOG_DIRECTIVE: &str = "perfplot=info";

fn main() -> Result<ExitCode> {
    log_subscriber(std::env::var("RUST_LOG").ok().as_deref()).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            e.print()?;
            return Ok(if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            });
        }
    };

    let mut config = load_or_default_config(cli.config.as_deref())?;
    apply_overrides(&mut config, &cli);

    let plot_type = match resolve_plot_type(&config, cli.plot_type.as_deref()) {
        Ok(plot_type) => plot_type,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!();
            eprintln!("{}", Cli::command().render_usage());
            return Ok(ExitCode::FAILURE);
        }
    };

    run(&cli.directory_path, &config, plot_type)?;
    Ok(ExitCode::SUCCESS)
}

/// @ai:intent Collect, aggregate, print and chart one results directory
/// @ai:effects fs:read, fs:write, io, log
fn run(root: &Path, config: &PlotConfig, plot_type: PlotType) -> Result<()> {
    let profile = config.analysis.profile;
    let resolver = LayoutResolver::from_rules(&config.layout.rules)?;
    let collector = DataFileCollector::new(resolver, config.analysis.data_extension.clone());

    tracing::info!("Analyzing {} with profile {} ({} plots)", root.display(), profile, plot_type);

    let table = TableBuilder::new(collector, profile).build(root)?;
    if table.is_empty() {
        tracing::warn!("No metric values found under {}", root.display());
    }

    let aggregator = MetricsAggregator::new(config.analysis.baseline.clone());
    let report = aggregator.aggregate(&table, profile, plot_type);

    ConsoleReporter::new().print(&report);

    let generator = ReportGenerator::new(plot_type, &config.output);
    let figures = generator.generate_all(&report, &table, &config.output.dir)?;

    if config.display.enabled {
        show_figures(&figures, &config.display);
    }

    println!();
    println!("Plots saved in {}", config.output.dir.display());
    Ok(())
}

/// @ai:intent Command-line flags take precedence over configuration values
/// @ai:effects pure
fn apply_overrides(config: &mut PlotConfig, cli: &Cli) {
    if let Some(profile) = cli.profile {
        config.analysis.profile = profile;
    }
    if let Some(baseline) = &cli.baseline {
        config.analysis.baseline = Some(baseline.clone());
    }
    if let Some(output) = &cli.output {
        config.output.dir = output.clone();
    }
    if cli.show {
        config.display.enabled = true;
    }
}

/// @ai:intent Positional plot type, else configured one, checked against the profile
/// @ai:effects pure
fn resolve_plot_type(config: &PlotConfig, requested: Option<&str>) -> perfplot::Result<PlotType> {
    let plot_type = match requested {
        Some(name) => name.parse::<PlotType>()?,
        None => config.effective_plot_type(),
    };

    config.analysis.profile.check_plot_type(plot_type)
}

/// @ai:intent RUST_LOG directives when set and valid, else the default level
/// @ai:effects pure
fn env_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|value| !value.trim().is_empty())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_DIRECTIVE))
}

/// @ai:intent Log formatter on stderr so statistics on stdout stay clean
/// @ai:effects pure
fn log_subscriber(rust_log: Option<&str>) -> impl tracing::Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(rust_log))
        .with_writer(std::io::stderr)
        .finish()
}

/// @ai:intent Load configuration or use defaults
/// @ai:effects fs:read
fn load_or_default_config(path: Option<&Path>) -> Result<PlotConfig> {
    match path {
        Some(p) => Ok(PlotConfig::load(p)?),
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);

            if default_path.exists() {
                Ok(PlotConfig::load(&default_path)?)
            } else {
                Ok(PlotConfig::default())
            }
        }
    }
}
