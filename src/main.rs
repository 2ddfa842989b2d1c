use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::mpsc;
use std::{env, fs, thread};

use anyhow::{Context, Result, bail};
use rookery_core::{Move, Position, STARTING_FEN, Tables, divide, perft_stats};
use rookery_engine::{EngineConfig, SearchControl, SearchLimits, Searcher, think_and_choose_move};
use tracing::info;

const USAGE: &str = "usage: rookery <search <depth> | perft <depth> | think <ms>> [fen]";

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (Some(mode), Some(amount)) = (args.first(), args.get(1)) else {
        bail!(USAGE);
    };
    let fen = if args.len() > 2 { args[2..].join(" ") } else { STARTING_FEN.to_string() };
    let mut pos: Position = fen.parse().with_context(|| format!("invalid FEN `{fen}`"))?;

    let config = load_config()?;
    let tables = config.tables().context("loading magic tables")?;
    info!(magics = ?config.magics_dir, "attack tables ready");

    match mode.as_str() {
        "search" => {
            let depth: u8 = amount.parse().with_context(|| format!("bad depth `{amount}`"))?;
            search(&mut pos, &tables, &config, depth)
        }
        "perft" => {
            let depth: usize = amount.parse().with_context(|| format!("bad depth `{amount}`"))?;
            run_perft(&mut pos, &tables, depth);
            Ok(())
        }
        "think" => {
            let budget_ms: u64 = amount.parse().with_context(|| format!("bad budget `{amount}`"))?;
            think(&mut pos, &tables, &config, budget_ms)
        }
        _ => bail!(USAGE),
    }
}

/// Configuration from the file named by `ROOKERY_CONFIG`, or the defaults.
fn load_config() -> Result<EngineConfig> {
    let Ok(path) = env::var("ROOKERY_CONFIG") else {
        return Ok(EngineConfig::default());
    };
    let json = fs::read_to_string(&path).with_context(|| format!("reading config {path}"))?;
    let config = EngineConfig::from_json(&json).with_context(|| format!("parsing config {path}"))?;
    info!(path, "config loaded");
    Ok(config)
}

fn line_string(line: &[Move]) -> String {
    line.iter().map(|m| m.to_uci()).collect::<Vec<_>>().join(" ")
}

fn search(pos: &mut Position, tables: &Tables, config: &EngineConfig, depth: u8) -> Result<()> {
    let mut searcher = Searcher::new(config);
    let control = SearchControl::new(Arc::new(AtomicBool::new(false)));
    let result = searcher.iterate(pos, tables, &SearchLimits::depth(depth), &control, |r, stats| {
        println!(
            "depth {} seldepth {} score {} nodes {} line {}",
            r.depth,
            stats.seldepth,
            r.score,
            stats.nodes,
            line_string(&r.line)
        );
    })?;
    println!("bestmove {} ({:?}, score {})", result.best_move, result.flags, result.score);
    Ok(())
}

fn run_perft(pos: &mut Position, tables: &Tables, depth: usize) {
    for (mv, nodes) in divide(pos, tables, depth) {
        println!("{mv}: {nodes}");
    }
    let stats = perft_stats(pos, tables, depth);
    println!(
        "nodes {} captures {} en passant {} castles {} promotions {} checks {}",
        stats.nodes, stats.captures, stats.en_passants, stats.castles, stats.promotions, stats.checks
    );
}

fn think(pos: &mut Position, tables: &Tables, config: &EngineConfig, budget_ms: u64) -> Result<()> {
    let (result_tx, result_rx) = mpsc::channel();
    let (thinking_tx, thinking_rx) = mpsc::channel();
    let stop = Arc::new(AtomicBool::new(false));

    let outcome = thread::scope(|scope| {
        let worker = scope.spawn(move || {
            think_and_choose_move(pos, tables, budget_ms, config, stop, result_tx, thinking_tx)
        });
        for t in thinking_rx {
            println!(
                "depth {} score {} nodes {} time {}ms line {}",
                t.depth,
                t.score,
                t.nodes,
                t.elapsed_ms,
                line_string(&t.line)
            );
        }
        worker.join()
    });
    let outcome = outcome.map_err(|_| anyhow::anyhow!("search thread panicked"))?;
    outcome?;

    let result = result_rx.recv().context("no result from the search thread")?;
    println!("bestmove {} ({:?}, score {})", result.best_move, result.flags, result.score);
    Ok(())
}
