// ABOUTME: Entry point for the prompt-cache cost simulator
// Parses arguments, runs the simulations or the schedule optimizer, and plots the results

use anyhow::{Context, Result};
use cache_sim::{
    app::config::{parse_pi_values, ExportFormat, SimConfig},
    data::{
        driver::{plot_cost_ratios, PlotterChain},
        export::FileExporter,
        optimizer::{find_optimal_n, uncached_reference_cost},
    },
    ui::terminal::TerminalPlotter,
};
use clap::{Arg, ArgMatches, Command};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;

fn main() -> Result<()> {
    let matches = cli().get_matches();
    let config = build_config(&matches)?;

    // Initialize logging if debug mode
    if config.debug {
        tracing_subscriber::fmt()
            .with_env_filter("cache_sim=debug")
            .with_writer(io::stderr)
            .init();
    }

    match matches.subcommand() {
        Some(("optimize", _)) => run_optimize(&config),
        _ => run_simulation(&config, matches.get_flag("no-chart")),
    }
}

fn cli() -> Command {
    Command::new("cache-sim")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Cache-Sim Team")
        .about("Compare naive and cache-aware LLM inference billing")
        .arg(
            Arg::new("iterations")
                .short('n')
                .long("iterations")
                .value_name("COUNT")
                .help("Requests simulated per threshold"),
        )
        .arg(
            Arg::new("pi")
                .short('p')
                .long("pi")
                .value_name("THRESHOLD")
                .help("Refresh threshold to simulate; repeat or comma separate for several")
                .action(clap::ArgAction::Append),
        )
        .arg(
            Arg::new("seed")
                .short('s')
                .long("seed")
                .value_name("SEED")
                .help("Seed for the workload generator"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Path to configuration file"),
        )
        .arg(
            Arg::new("export")
                .short('e')
                .long("export")
                .value_name("FILE")
                .help("Write the runs to FILE"),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .help("Export format: json, csv or markdown"),
        )
        .arg(
            Arg::new("no-chart")
                .long("no-chart")
                .help("Skip the interactive chart")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .help("Enable debug logging")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("optimize")
                .about("Search for the cheapest fixed cache refresh schedule")
                .arg(
                    Arg::new("context-length")
                        .short('l')
                        .long("context-length")
                        .value_name("TOKENS")
                        .help("Context length in single-token steps"),
                )
                .arg(
                    Arg::new("max-splits")
                        .short('m')
                        .long("max-splits")
                        .value_name("COUNT")
                        .help("Largest number of refreshes to consider"),
                ),
        )
}

fn parse_arg<T>(matches: &ArgMatches, name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match matches.get_one::<String>(name) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("invalid --{} '{}': {}", name, raw, e)),
        None => Ok(None),
    }
}

fn build_config(matches: &ArgMatches) -> Result<SimConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => {
            let mut config = SimConfig::load_from(Path::new(path))
                .with_context(|| format!("failed to load config from {}", path))?;
            config.apply_env();
            config
        }
        None => SimConfig::load(),
    };

    if let Some(iterations) = parse_arg(matches, "iterations")? {
        config.iterations = iterations;
    }

    if let Some(values) = matches.get_many::<String>("pi") {
        let mut pi_values = Vec::new();
        for raw in values {
            pi_values.extend(parse_pi_values(raw)?);
        }
        config.pi_values = pi_values;
    }

    if let Some(seed) = parse_arg(matches, "seed")? {
        config.seed = Some(seed);
    }

    if let Some(format) = parse_arg::<ExportFormat>(matches, "format")? {
        config.export_format = format;
    }

    if let Some(path) = matches.get_one::<String>("export") {
        config.export_path = Some(path.into());
    }

    if let Some(("optimize", sub)) = matches.subcommand() {
        if let Some(length) = parse_arg(sub, "context-length")? {
            config.context_length = length;
        }
        if let Some(max_splits) = parse_arg(sub, "max-splits")? {
            config.max_splits = max_splits;
        }
    }

    config.debug = matches.get_flag("debug");
    config.validate()?;

    Ok(config)
}

fn run_simulation(config: &SimConfig, no_chart: bool) -> Result<()> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut plotters = PlotterChain::new();
    if let Some(path) = &config.export_path {
        plotters.push(Box::new(FileExporter::new(path, config.export_format.clone())));
    }

    // Only draw the chart on an interactive terminal
    if !no_chart && atty::is(atty::Stream::Stdout) {
        plotters.push(Box::new(TerminalPlotter::new()));
    }

    let mut out = io::stdout();
    plot_cost_ratios(
        &config.pi_values,
        config.iterations,
        &mut rng,
        &mut out,
        &mut plotters,
    )?;
    out.flush()?;

    Ok(())
}

fn run_optimize(config: &SimConfig) -> Result<()> {
    let length = config.context_length;
    let start = Instant::now();

    let optimal = find_optimal_n(config.max_splits, length, |n, plan| {
        println!("N = {}, Cost: {}, Splits: {}", n, plan.cost, join_splits(&plan.splits));
    })?;

    let elapsed = start.elapsed();
    println!(
        "Optimal N: {}, Cost: {}, Splits: {}",
        optimal.refreshes,
        optimal.plan.cost,
        join_splits(&optimal.plan.splits)
    );
    println!("Execution time: {}", humantime::format_duration(elapsed));
    println!("Cost per input: {}USD", uncached_reference_cost(length));

    Ok(())
}

fn join_splits(splits: &[usize]) -> String {
    splits
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
