//! digisim CLI
//!
//! Run a digital-transformation scenario over a horizon of years, print the
//! final-year summary and optionally export the full run as JSON.

use clap::Parser;
use digisim_core::BuiltinScenario;
use digisim_sim::{HistoricalData, LoadError, RunReport, ScenarioRunner, SimConfig, SimExport};
use tracing::{debug, error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// digisim scenario simulator
#[derive(Parser, Debug)]
#[command(name = "digisim")]
#[command(about = "Simulate a national digital transformation year by year", long_about = None)]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Scenario to run (baseline, pro_investment, pro_regulation or a custom one)
    #[arg(short = 'S', long)]
    scenario: Option<String>,

    /// First simulated year
    #[arg(long)]
    start_year: Option<i32>,

    /// Last simulated year (inclusive)
    #[arg(long)]
    end_year: Option<i32>,

    /// Number of simulated years
    #[arg(short = 'y', long)]
    years: Option<u32>,

    /// Master seed for stochastic shocks
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON file with historical series (module -> parameter -> [{year, value}])
    #[arg(long)]
    history: Option<String>,

    /// Also run this scenario and compare final years
    #[arg(long)]
    compare: Option<String>,

    /// Export the run to a JSON file for the report generator
    #[arg(long)]
    export: Option<String>,

    /// JSON output instead of the text summary
    #[arg(long)]
    json: bool,

    /// List built-in scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn read_file(path: &str) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))
}

/// Builds the configuration from the optional file and the flag overrides.
fn load_config(args: &Args) -> Result<SimConfig, LoadError> {
    let mut config = match &args.config {
        Some(path) => SimConfig::from_json_str(&read_file(path)?)?,
        None => SimConfig::default(),
    };

    if let Some(path) = &args.history {
        let history: HistoricalData = serde_json::from_str(&read_file(path)?)?;
        for (module, series) in history {
            config.historical.entry(module).or_default().extend(series);
        }
    }

    if let Some(scenario) = &args.scenario {
        config.scenario = scenario.clone();
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(start) = args.start_year {
        config.start_year = start;
    }
    match (args.end_year, args.years) {
        (Some(end), None) => {
            config.end_year = Some(end);
            config.duration_years = None;
        }
        (None, Some(years)) => {
            config.end_year = None;
            config.duration_years = Some(years);
        }
        (Some(end), Some(years)) => {
            config.end_year = Some(end);
            config.duration_years = Some(years);
        }
        (None, None) => {}
    }

    Ok(config)
}

fn print_summary(report: &RunReport) {
    println!(
        "Scenario '{}' {} (seed={})",
        report.label, report.horizon, report.seed
    );
    for (key, value) in report.summary(true) {
        println!("  {:<40} {}", key, value);
    }
    if let Some(composite) = report.final_composite() {
        println!("  {:<40} {:.4}", digisim_sim::COMPOSITE_KEY, composite);
    }
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    if args.list_scenarios {
        for scenario in BuiltinScenario::all() {
            println!("{:<16} {}", scenario.name(), scenario.description());
        }
        return;
    }

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    debug!("Configuration: {:?}", config);

    let runner = ScenarioRunner::new(config);

    let (report, comparison) = match &args.compare {
        Some(alternative) => runner
            .compare(alternative)
            .map(|(base, _, comparison)| (base, Some(comparison))),
        None => runner.run().map(|report| (report, None)),
    }
    .unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let mut export = SimExport::from_report(&report);
    if let Some(comparison) = comparison {
        export = export.with_comparison(comparison);
    }

    if let Some(path) = &args.export {
        let written = export
            .to_json()
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(path, json).map_err(|e| e.to_string()));
        match written {
            Ok(()) => info!("Exported {} years to {}", report.history.len(), path),
            Err(e) => {
                error!("Failed to write export: {}", e);
                std::process::exit(1);
            }
        }
    }

    if args.json {
        match export.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    print_summary(&report);

    if let Some(comparison) = &export.comparison {
        println!();
        println!(
            "Comparison '{}' vs '{}' (largest changes)",
            comparison.alternative, comparison.baseline
        );
        for row in comparison.largest_changes(10) {
            println!("  {:<40} {:+.4}", row.key, row.delta.unwrap_or(0.0));
        }
        if let Some(delta) = comparison.composite_delta() {
            println!("  {:<40} {:+.4}", digisim_sim::COMPOSITE_KEY, delta);
        }
    }

    let warnings = report.warning_count();
    if warnings > 0 {
        info!("{} warnings recorded (see --json or --export for details)", warnings);
    }
}
