use clap::Parser;
use std::time::Instant;
use tilering::puzzle::{Board, Tile};
use tilering::search::{run_parallel_search, ParallelConfig, ParallelResult, SearchConfig};
use tilering::SolverError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// The 4x4 puzzle solved when no grid is given.
const SAMPLE: [Tile; 16] = [2, 12, 14, 7, 5, 1, 6, 3, 10, 13, 4, 9, 15, 8, 0, 11];

// --- Command Line Arguments ---

#[derive(Parser)]
#[command(name = "tilering")]
#[command(about = "tilering - distributed IDA* sliding-tile solver")]
#[command(version)]
struct Args {
    /// Tiles in row-major order, 0 for the blank (comma or space separated)
    #[arg(value_delimiter = ',', num_args = 0..)]
    grid: Vec<Tile>,
    /// Number of rows
    #[arg(long, default_value = "4")]
    rows: usize,
    /// Number of columns
    #[arg(long, default_value = "4")]
    cols: usize,
    /// Number of peers (defaults to the number of CPUs)
    #[arg(long, short = 'j')]
    peers: Option<usize>,
    /// Random seed for reproducible work sharing
    #[arg(long)]
    seed: Option<u64>,
    /// Frontier size above which work requests are answered
    #[arg(long, default_value = "10")]
    share_threshold: usize,
    /// Log progress to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "info" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn solve(args: &Args) -> Result<ParallelResult, SolverError> {
    let board = Board::new(args.rows, args.cols)?;
    let grid: &[Tile] = if args.grid.is_empty() {
        &SAMPLE
    } else {
        &args.grid
    };

    let search_config = SearchConfig::default()
        .with_share_threshold(args.share_threshold)
        .with_seed_option(args.seed);
    let parallel_config = ParallelConfig::default()
        .with_peers_option(args.peers)
        .with_seed_option(args.seed);

    run_parallel_search(board, grid, &search_config, &parallel_config)
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let start = Instant::now();
    match solve(&args) {
        Ok(result) => {
            println!("Elapsed time: {:.3?}", start.elapsed());
            print!("{}", result.solution);
            if args.verbose {
                eprint!("{}", result.total_statistics.format_summary());
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
