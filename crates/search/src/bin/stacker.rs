use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use clap::{ArgAction, Parser};
use stacker_core::Input;
use stacker_engine::{BoardState, LockOutcome};
use stacker_eval::{Evaluator, LinearEvaluator, Network};
use stacker_search::{InputQueue, Plan, SearchConfig, SearchEngine, SearchWorker};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "stacker", about = "Self-play driver for the placement search")]
struct Cli {
    #[arg(long, default_value_t = 1, help = "Seed for the 7-bag")]
    seed: u64,

    #[arg(short = 'n', long, default_value_t = 100, help = "Number of pieces to play")]
    pieces: usize,

    #[arg(long, default_value_t = 5, help = "Visible preview pieces")]
    previews: usize,

    #[arg(long, help = "Search budget per piece in milliseconds")]
    budget_ms: Option<u64>,

    #[arg(long, help = "Path to a search config JSON file")]
    config: Option<PathBuf>,

    #[arg(long, conflicts_with = "network", help = "Path to linear evaluator weights JSON")]
    weights: Option<PathBuf>,

    #[arg(long, help = "Path to value network JSON")]
    network: Option<PathBuf>,

    #[arg(long, default_value_t = 0, help = "Delay between replayed inputs in milliseconds")]
    delay_ms: u64,

    #[arg(long, help = "Print the board after every piece")]
    show: bool,

    #[arg(short = 'v', long, action = ArgAction::Count, help = "Increase verbosity (-v = INFO, -vv = DEBUG, -vvv = TRACE)")]
    verbose: u8,
}

#[derive(Debug, Default)]
struct Summary {
    pieces: usize,
    lines: u32,
    garbage: u32,
    max_height: u8,
    skipped: usize,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<SearchConfig, Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => SearchConfig::from_json(&fs::read_to_string(path)?)?,
        None => SearchConfig::default(),
    };
    if let Some(ms) = cli.budget_ms {
        config.time_budget_ms = ms;
    }
    Ok(config)
}

fn load_evaluator(cli: &Cli) -> Result<Box<dyn Evaluator + Send>, Box<dyn Error>> {
    if let Some(path) = &cli.network {
        let network = Network::from_json(&fs::read_to_string(path)?)?;
        info!(layers = network.layers().len(), "loaded value network");
        return Ok(Box::new(network));
    }
    let linear = match &cli.weights {
        Some(path) => LinearEvaluator::from_json(&fs::read_to_string(path)?)?,
        None => LinearEvaluator::default(),
    };
    Ok(Box::new(linear))
}

/// Play queued inputs until one of them locks the piece
fn play_out(queue: &mut InputQueue, state: &mut BoardState) -> LockOutcome {
    loop {
        if let Some(outcome) = queue.play_due(state, Instant::now()) {
            queue.clear();
            return outcome;
        }
        if queue.is_empty() {
            // the move list never dropped the piece
            return state.apply_input(Input::HardDrop).unwrap_or_default();
        }
        thread::sleep(queue.delay());
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;
    let evaluator = load_evaluator(&cli)?;
    info!(
        seed = cli.seed,
        pieces = cli.pieces,
        budget_ms = config.time_budget_ms,
        "starting self-play"
    );

    let mut worker = SearchWorker::spawn(SearchEngine::new(evaluator, config))?;
    let mut state = BoardState::with_seed(cli.seed, cli.previews);
    let mut queue = InputQueue::new(Duration::from_millis(cli.delay_ms));
    let mut summary = Summary::default();

    while summary.pieces < cli.pieces && state.current().is_some() {
        worker.request(&state);
        let plan = loop {
            if let Some(plan) = worker.try_take() {
                break plan;
            }
            if !worker.is_pending() {
                return Err("search thread stopped".into());
            }
            thread::sleep(Duration::from_micros(200));
        };

        match &plan {
            Plan::Search(decision) => {
                let p = decision.placement;
                println!(
                    "{:>4}  {:?} {:?} x={} y={} {:?}{}  depth={} value={:.3} nodes={}",
                    summary.pieces + 1,
                    p.piece.kind,
                    p.piece.rotation,
                    p.x,
                    p.y,
                    p.spin,
                    if p.hold_used { " (hold)" } else { "" },
                    decision.depth,
                    decision.value,
                    decision.stats.nodes,
                );
                queue.load(&decision.inputs);
            }
            Plan::Solver(inputs) => {
                println!("{:>4}  solver: {inputs:?}", summary.pieces + 1);
                queue.load(inputs);
            }
            Plan::Skip => {
                warn!("no decision in time, dropping in place");
                summary.skipped += 1;
                queue.load(&[Input::HardDrop]);
            }
        }

        let outcome = play_out(&mut queue, &mut state);
        summary.pieces += 1;
        summary.lines += outcome.lines as u32;
        summary.garbage += outcome.garbage;
        summary.max_height = summary.max_height.max(state.height());

        if cli.show {
            println!("{state}");
        }
        if outcome.game_over {
            println!("topped out after {} pieces", summary.pieces);
            break;
        }
    }

    println!(
        "pieces={} lines={} garbage={} max_height={} skipped={}",
        summary.pieces, summary.lines, summary.garbage, summary.max_height, summary.skipped
    );
    Ok(())
}
