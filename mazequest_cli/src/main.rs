// CLI entry point for the MazeQuest generator.
//
// Generates one maze (or a batch) and writes it to stdout, as JSON by
// default or as ASCII art with `--ascii`. With `--solve` the chosen solver
// runs between the selected start and end and its path is attached to the
// output. The seed is always echoed to stderr so any run can be repeated.
//
// Usage:
//   mazequest [OPTIONS]
//     --rows <N>              Maze height (default: config default_rows)
//     --cols <N>              Maze width (default: config default_cols)
//     --seed <N>              RNG seed (default: derived from the clock)
//     --config <PATH>         JSON generator config
//     --density <X>           Fix the style; missing scalars default to 0.5
//     --connectivity <X>
//     --complexity <X>
//     --solve <ALGO>          bfs, dfs, dijkstra or astar
//     --ascii                 Print ASCII art instead of JSON
//     --count <N>             Generate N mazes in parallel, one per line
//     --verbose, -v           Debug logging (otherwise RUST_LOG, default warn)

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use mazequest_gen::MazeResult;
use mazequest_gen::config::GeneratorConfig;
use mazequest_gen::pipeline::{BatchRequest, generate_batch, generate_seeded};
use mazequest_gen::render::render_ascii;
use mazequest_gen::solve::{Algorithm, SolveResult, solve};
use mazequest_gen::style::StyleParameters;
use serde::Serialize;

/// Upper bound on `--count`.
const MAX_BATCH: usize = 10_000;

/// Parsed command line. `None` fields fall back to config or clock.
#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    rows: Option<usize>,
    cols: Option<usize>,
    seed: Option<u64>,
    config: Option<PathBuf>,
    density: Option<f64>,
    connectivity: Option<f64>,
    complexity: Option<f64>,
    solve: Option<Algorithm>,
    ascii: bool,
    count: Option<usize>,
    verbose: bool,
    help: bool,
}

impl CliArgs {
    /// A fixed style if any scalar was given on the command line.
    fn style(&self) -> Option<StyleParameters> {
        if self.density.is_none() && self.connectivity.is_none() && self.complexity.is_none() {
            return None;
        }
        let neutral = StyleParameters::NEUTRAL;
        Some(StyleParameters::new(
            self.density.unwrap_or(neutral.density),
            self.connectivity.unwrap_or(neutral.connectivity),
            self.complexity.unwrap_or(neutral.complexity),
        ))
    }
}

/// One maze as written to stdout.
#[derive(Serialize)]
struct Output<'a> {
    #[serde(flatten)]
    result: &'a MazeResult,
    /// Present only with `--solve`; `null` when no path exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    solution: Option<Option<SolveResult>>,
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(msg) => {
            eprintln!("{msg}");
            print_usage();
            std::process::exit(1);
        }
    };
    if cli.help {
        print_usage();
        return;
    }

    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

/// Generate, optionally solve, and print. Errors come back as display
/// strings for `main` to report.
fn run(cli: &CliArgs) -> Result<(), String> {
    let config = match &cli.config {
        Some(path) => GeneratorConfig::load(path).map_err(|e| e.to_string())?,
        None => GeneratorConfig::default(),
    };
    let rows = cli.rows.unwrap_or(config.default_rows);
    let cols = cli.cols.unwrap_or(config.default_cols);
    let seed = cli.seed.unwrap_or_else(clock_seed);
    eprintln!("seed: {seed}");
    log::debug!("config: {config:?}");

    let results = match cli.count {
        Some(count) => {
            let request = BatchRequest {
                rows,
                cols,
                style: cli.style(),
            };
            generate_batch(&vec![request; count], &config, seed)
                .into_iter()
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| e.to_string())?
        }
        None => vec![
            generate_seeded(rows, cols, &config, cli.style(), seed).map_err(|e| e.to_string())?,
        ],
    };

    let batch = cli.count.is_some();
    for result in &results {
        let solution = match cli.solve {
            Some(algorithm) => Some(
                solve(&result.maze, result.start, result.end, algorithm)
                    .map_err(|e| e.to_string())?,
            ),
            None => None,
        };
        if cli.ascii {
            let path = solution
                .as_ref()
                .and_then(|s| s.as_ref())
                .map_or(&[][..], |s| &s.path[..]);
            print!("{}", render_ascii(&result.maze, result.start, result.end, path));
            if let Some(solution) = &solution {
                print_solution_summary(solution.as_ref());
            }
            if batch {
                println!();
            }
        } else {
            let output = Output { result, solution };
            let json = if batch {
                serde_json::to_string(&output)
            } else {
                serde_json::to_string_pretty(&output)
            }
            .map_err(|e| format!("serializing output: {e}"))?;
            println!("{json}");
        }
    }
    Ok(())
}

fn print_solution_summary(solution: Option<&SolveResult>) {
    match solution {
        Some(s) => println!(
            "{}: {} steps, {} of {} open cells visited ({:.1}%)",
            s.algorithm,
            s.steps(),
            s.nodes_visited,
            s.open_cells,
            s.efficiency() * 100.0
        ),
        None => println!("no path between start and end"),
    }
}

/// Nanoseconds since the epoch, folded to 64 bits.
fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos() as u64)
}

/// Parse command-line arguments (program name already stripped). Uses
/// simple matching, no clap dependency.
fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut cli = CliArgs::default();
    let mut i = 0;

    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--rows" => cli.rows = Some(value(args, &mut i, flag)?),
            "--cols" => cli.cols = Some(value(args, &mut i, flag)?),
            "--seed" => cli.seed = Some(value(args, &mut i, flag)?),
            "--config" => cli.config = Some(value(args, &mut i, flag)?),
            "--density" => cli.density = Some(value(args, &mut i, flag)?),
            "--connectivity" => cli.connectivity = Some(value(args, &mut i, flag)?),
            "--complexity" => cli.complexity = Some(value(args, &mut i, flag)?),
            "--solve" => {
                let name: String = value(args, &mut i, flag)?;
                cli.solve = Some(name.parse::<Algorithm>().map_err(|e| e.to_string())?);
            }
            "--count" => {
                let count: usize = value(args, &mut i, flag)?;
                if !(1..=MAX_BATCH).contains(&count) {
                    return Err(format!("--count must be between 1 and {MAX_BATCH}"));
                }
                cli.count = Some(count);
            }
            "--ascii" => cli.ascii = true,
            "--verbose" | "-v" => cli.verbose = true,
            "--help" | "-h" => cli.help = true,
            other => return Err(format!("Unknown argument: {other}")),
        }
        i += 1;
    }

    Ok(cli)
}

/// Consume and parse the value following `flag`.
fn value<T: std::str::FromStr>(args: &[String], i: &mut usize, flag: &str) -> Result<T, String> {
    *i += 1;
    args.get(*i)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| format!("{flag} requires a valid value"))
}

fn print_usage() {
    println!("Usage: mazequest [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --rows <N>              Maze height (default: config default_rows, 20)");
    println!("  --cols <N>              Maze width (default: config default_cols, 20)");
    println!("  --seed <N>              RNG seed (default: from the clock)");
    println!("  --config <PATH>         JSON generator config");
    println!("  --density <X>           Style density in [0, 1]");
    println!("  --connectivity <X>      Style connectivity in [0, 1]");
    println!("  --complexity <X>        Style complexity in [0, 1]");
    println!("  --solve <ALGO>          Solve with bfs, dfs, dijkstra or astar");
    println!("  --ascii                 Print ASCII art instead of JSON");
    println!("  --count <N>             Generate N mazes (at most {MAX_BATCH}), one per line");
    println!("  --verbose, -v           Debug logging");
    println!("  --help, -h              Show this help");
}
