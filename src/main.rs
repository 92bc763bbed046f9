//! CLI entry point for the occupancy heatmap tool.
//!
//! Provides subcommands for aggregating a facility's occupancy log into
//! weekly and cross-week statistics, printing a heatmap grid, and listing
//! the configured facilities.

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use occupancy_heatmap::aggregation::AggregatedOccupancy;
use occupancy_heatmap::config::{FacilityCatalog, FacilityConfig, PoolType};
use occupancy_heatmap::dates::WEEKDAYS;
use occupancy_heatmap::fetch::{BasicClient, load_source};
use occupancy_heatmap::heatmap::{Clock, HeatmapCells, PlainTranslator, SystemClock};
use occupancy_heatmap::output::{
    print_pretty, render_grid, render_legend, to_json, write_hourly_csv,
};
use occupancy_heatmap::process_occupancy_csv;
use std::ffi::OsStr;
use std::ops::RangeInclusive;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const DEFAULT_DATA_BASE_URL: &str =
    "https://raw.githubusercontent.com/VitekHub/pool-occupancy-tracker/main/data";

#[derive(Parser)]
#[command(name = "occupancy_heatmap")]
#[command(about = "Aggregate facility occupancy logs into heatmap statistics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Path or URL of the occupancy CSV (defaults to the facility's configured file)
    #[arg(short, long, value_name = "FILE_OR_URL")]
    source: Option<String>,

    /// Facility config file
    #[arg(long, env = "FACILITIES_CONFIG", default_value = "config/facilities.json")]
    config: String,

    /// Facility name (defaults to the first configured facility)
    #[arg(short, long)]
    facility: Option<String>,

    /// Which pool of the facility the data belongs to
    #[arg(short, long, value_enum, default_value_t = PoolType::Outside)]
    pool_type: PoolType,

    /// Override the configured maximum capacity
    #[arg(long)]
    capacity: Option<u32>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
}

#[derive(Clone, Copy, ValueEnum)]
enum Metric {
    Average,
    WeightedAverage,
    Median,
    WeeklyPercentage,
    WeeklyMinMax,
    WeeklyAverage,
}

impl Metric {
    fn tooltip_key(self) -> &'static str {
        match self {
            Metric::Average => "heatmap.overall.average.tooltip",
            Metric::WeightedAverage => "heatmap.overall.weightedAverage.tooltip",
            Metric::Median => "heatmap.overall.median.tooltip",
            Metric::WeeklyPercentage => "heatmap.weekly.percentage.tooltip",
            Metric::WeeklyMinMax => "heatmap.weekly.minMax.tooltip",
            Metric::WeeklyAverage => "heatmap.weekly.average.tooltip",
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate an occupancy log and print the weekly and overall maps
    Aggregate {
        #[command(flatten)]
        source: SourceArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Print a heatmap grid of one metric
    Heatmap {
        #[command(flatten)]
        source: SourceArgs,

        /// Metric to display
        #[arg(short, long, value_enum, default_value_t = Metric::WeeklyPercentage)]
        metric: Metric,

        /// Week to display for weekly metrics (Monday as YYYY-MM-DD, defaults to the latest week)
        #[arg(short, long)]
        week: Option<String>,

        /// Utilization rate drawn as fully loaded
        #[arg(long, env = "HEATMAP_HIGH_THRESHOLD", default_value_t = 60.0)]
        high_threshold: f64,
    },
    /// List configured facilities
    Facilities {
        /// Facility config file
        #[arg(long, env = "FACILITIES_CONFIG", default_value = "config/facilities.json")]
        config: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/occupancy_heatmap.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("occupancy_heatmap.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Aggregate { source, format } => {
            let (result, _) = run(&source).await?;
            print_pretty(&result);

            match format {
                OutputFormat::Json => println!("{}", to_json(&result)?),
                OutputFormat::Csv => {
                    write_hourly_csv(std::io::stdout().lock(), &result.weekly_occupancy_map)?
                }
            }
        }
        Commands::Heatmap {
            source,
            metric,
            week,
            high_threshold,
        } => {
            let (result, facility) = run(&source).await?;
            let hours = facility
                .as_ref()
                .and_then(|f| f.pool(source.pool_type))
                .map(|pool| {
                    span(
                        pool.opening_hours(WEEKDAYS[0]),
                        pool.opening_hours(WEEKDAYS[6]),
                    )
                })
                .unwrap_or(0..=23);

            let clock = facility
                .as_ref()
                .map_or_else(SystemClock::default, |f| SystemClock::new(f.time_zone));

            print_heatmap(&result, metric, week, high_threshold, hours, clock);
        }
        Commands::Facilities { config } => {
            let catalog = FacilityCatalog::load(&config)?;
            info!(total = catalog.facilities().len(), "Facility list loaded");

            for facility in catalog.facilities() {
                for pool_type in [PoolType::Inside, PoolType::Outside] {
                    let Some(pool) = facility.pool(pool_type) else {
                        continue;
                    };
                    println!(
                        "{:<30} {:<8} capacity={:<6} csv={}{}",
                        pool.custom_name.as_deref().unwrap_or(&facility.name),
                        format!("{pool_type:?}").to_lowercase(),
                        pool.maximum_capacity,
                        pool.csv_file,
                        pool.temporarily_closed
                            .as_deref()
                            .map(|reason| format!(" (closed: {reason})"))
                            .unwrap_or_default(),
                    );
                }
            }
        }
    }

    Ok(())
}

/// Resolves the data source and capacity, then runs the aggregation.
#[tracing::instrument(skip_all, fields(facility = ?args.facility, pool_type = ?args.pool_type))]
async fn run(args: &SourceArgs) -> Result<(AggregatedOccupancy, Option<FacilityConfig>)> {
    let facility = if args.source.is_none() || args.capacity.is_none() {
        let catalog = FacilityCatalog::load(&args.config)?;
        Some(catalog.find(args.facility.as_deref())?.clone())
    } else {
        None
    };

    let capacity = match (args.capacity, &facility) {
        (Some(capacity), _) => capacity,
        (None, Some(facility)) => facility.maximum_capacity(args.pool_type),
        (None, None) => 0,
    };

    let source = match (&args.source, &facility) {
        (Some(source), _) => source.clone(),
        (None, Some(facility)) => {
            let Some(pool) = facility.pool(args.pool_type) else {
                bail!(
                    "facility '{}' has no {:?} pool configured",
                    facility.name,
                    args.pool_type
                );
            };
            if let Some(reason) = &pool.temporarily_closed {
                warn!(reason = %reason, "Pool is temporarily closed");
            }
            let base = std::env::var("DATA_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATA_BASE_URL.to_string());
            format!("{}/{}", base.trim_end_matches('/'), pool.csv_file)
        }
        (None, None) => bail!("no data source given"),
    };

    let client = BasicClient::new()?;
    let text = load_source(&client, &source).await?;
    let result = process_occupancy_csv(&text, capacity)
        .with_context(|| format!("cannot aggregate {source}; set maximumCapacity or pass --capacity"))?;

    info!(
        source = %source,
        capacity,
        weeks = result.weekly_occupancy_map.weeks.len(),
        "Occupancy aggregated"
    );
    Ok((result, facility))
}

fn span(a: RangeInclusive<u32>, b: RangeInclusive<u32>) -> RangeInclusive<u32> {
    (*a.start()).min(*b.start())..=(*a.end()).max(*b.end())
}

fn print_heatmap(
    result: &AggregatedOccupancy,
    metric: Metric,
    week: Option<String>,
    high_threshold: f64,
    hours: RangeInclusive<u32>,
    clock: SystemClock,
) {
    let week_id = week
        .or_else(|| {
            let current = clock.current_week_id();
            result
                .weekly_occupancy_map
                .week(&current)
                .map(|_| current)
        })
        .or_else(|| result.weekly_occupancy_map.weeks.keys().next_back().cloned())
        .unwrap_or_default();

    let cells = HeatmapCells::new(
        &result.weekly_occupancy_map,
        &result.overall_occupancy_map,
        high_threshold,
        metric.tooltip_key(),
        PlainTranslator,
        clock,
    );

    let grid = render_grid(&WEEKDAYS, hours, |day, hour| match metric {
        Metric::Average => cells.overall_average_cell(day, hour),
        Metric::WeightedAverage => cells.overall_weighted_average_cell(day, hour),
        Metric::Median => cells.overall_median_cell(day, hour),
        Metric::WeeklyPercentage => cells.weekly_percentage_cell(&week_id, day, hour),
        Metric::WeeklyMinMax => cells.weekly_min_max_cell(&week_id, day, hour),
        Metric::WeeklyAverage => cells.weekly_average_cell(&week_id, day, hour),
    });

    if matches!(
        metric,
        Metric::WeeklyPercentage | Metric::WeeklyMinMax | Metric::WeeklyAverage
    ) {
        println!("Week of {week_id}");
    }
    print!("{grid}");
    println!("{}", render_legend(&cells.legend_items()));
}
