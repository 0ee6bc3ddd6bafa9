//! Dispatch simulator entry point — CLI wiring around the engine pipeline.

use std::path::{Path, PathBuf};
use std::process;

use grid_dispatch::config::ScenarioConfig;
use grid_dispatch::io::export::export_csv;
use grid_dispatch::io::report::{RunReport, export_json};
use grid_dispatch::sim::{DispatchEngine, KpiReport, stress};
use grid_dispatch::whatif::{self, PenaltyWeights, RecommendationResult};

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<PathBuf>,
    preset: Option<String>,
    ledger_out: Option<PathBuf>,
    report_out: Option<PathBuf>,
    print_ledgers: bool,
    skip_recommendations: bool,
}

fn print_help() {
    eprintln!("grid-dispatch — multi-region electricity dispatch simulator");
    eprintln!();
    eprintln!("Usage: grid-dispatch [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>       Load scenario from TOML config file");
    eprintln!("  --preset <name>         Use a built-in preset (demo, evening_crunch)");
    eprintln!("  --ledger-out <path>     Export the hourly ledgers to CSV");
    eprintln!("  --report-out <path>     Export KPIs/stress/recommendations to JSON");
    eprintln!("  --print-ledgers         Print every hourly ledger row");
    eprintln!("  --no-recommend          Skip the counterfactual batch");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the demo preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        ledger_out: None,
        report_out: None,
        print_ledgers: false,
        skip_recommendations: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --scenario requires a path argument");
                    process::exit(1);
                }
                cli.scenario_path = Some(PathBuf::from(&args[i]));
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--ledger-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --ledger-out requires a path argument");
                    process::exit(1);
                }
                cli.ledger_out = Some(PathBuf::from(&args[i]));
            }
            "--report-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --report-out requires a path argument");
                    process::exit(1);
                }
                cli.report_out = Some(PathBuf::from(&args[i]));
            }
            "--print-ledgers" => cli.print_ledgers = true,
            "--no-recommend" => cli.skip_recommendations = true,
            other => {
                eprintln!("error: unknown argument: {other}");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    if cli.scenario_path.is_some() && cli.preset.is_some() {
        eprintln!("error: --scenario and --preset are mutually exclusive");
        process::exit(1);
    }

    cli
}

fn load_scenario(cli: &CliArgs) -> ScenarioConfig {
    let loaded = if let Some(path) = &cli.scenario_path {
        ScenarioConfig::from_toml_file(Path::new(path))
    } else {
        let name = cli.preset.as_deref().unwrap_or("demo");
        ScenarioConfig::from_preset(name)
    };

    match loaded {
        Ok(scenario) => scenario,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

fn main() {
    let cli = parse_args();
    let scenario = load_scenario(&cli);

    let grid = match scenario.build() {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    println!(
        "Dispatching {} regions over {} hours...",
        grid.regions().len(),
        grid.horizon()
    );

    let run = DispatchEngine::new(&grid).run();
    if cli.print_ledgers {
        for ledger in &run.ledgers {
            println!("{ledger}");
        }
    }

    let kpis = KpiReport::from_run(&run, &grid);
    println!("\n{kpis}");

    let stress_events = stress::scan(&run, &grid);
    let critical = stress_events
        .iter()
        .filter(|e| e.severity == grid_dispatch::sim::Severity::Critical)
        .count();
    println!(
        "\nStress events: {} ({} critical, {} warning)",
        stress_events.len(),
        critical,
        stress_events.len() - critical
    );
    for event in stress_events.iter().take(10) {
        println!("  {event}");
    }
    if stress_events.len() > 10 {
        println!("  ... {} more", stress_events.len() - 10);
    }

    let recommendations = if cli.skip_recommendations {
        Vec::new()
    } else {
        let candidates = whatif::default_candidates(&grid);
        println!("\nEvaluating {} counterfactual candidates...", candidates.len());
        let ranked = whatif::evaluate(&grid, &kpis, &candidates, &PenaltyWeights::default());
        for rec in &ranked {
            match &rec.result {
                RecommendationResult::Scored { deltas } => println!(
                    "  #{:<2} {:<44} score {:+14.1} (unserved {:+12.1} MWh)",
                    rec.rank, rec.description, deltas.score, deltas.unserved_mwh
                ),
                RecommendationResult::Failed { error } => {
                    println!("  #{:<2} {:<44} failed: {error}", rec.rank, rec.description)
                }
            }
        }
        ranked
    };

    if let Some(path) = &cli.ledger_out {
        if let Err(e) = export_csv(&run, path) {
            eprintln!("error: cannot write ledger CSV to {}: {e}", path.display());
            process::exit(1);
        }
        println!("\nLedgers written to {}", path.display());
    }

    if let Some(path) = &cli.report_out {
        let report = RunReport {
            kpis: &kpis,
            stress_events: &stress_events,
            recommendations: &recommendations,
        };
        if let Err(e) = export_json(&report, path) {
            eprintln!("error: cannot write report JSON to {}: {e}", path.display());
            process::exit(1);
        }
        println!("Report written to {}", path.display());
    }
}
