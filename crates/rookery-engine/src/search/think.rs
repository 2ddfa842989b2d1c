//! Timed search that reports its progress over channels.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::mpsc::Sender;
use std::time::Duration;

use rookery_core::{Move, Position, Tables};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::search::control::{SearchControl, SearchLimits};
use crate::search::{SearchError, SearchResult, Searcher};

/// Progress report sent after every completed iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thinking {
    pub depth: u8,
    pub score: i32,
    pub nodes: u64,
    pub elapsed_ms: u64,
    pub line: Vec<Move>,
}

impl Searcher {
    /// Search for at most `budget_ms` milliseconds. No iteration starts after
    /// half the budget, and the running one is abandoned when the budget is
    /// spent. Each iteration is reported on `thinking_tx` and the final
    /// result is sent on `result_tx` as well as returned.
    #[allow(clippy::too_many_arguments)]
    pub fn think(
        &mut self,
        pos: &mut Position,
        tables: &Tables,
        budget_ms: u64,
        stop: Arc<AtomicBool>,
        result_tx: &Sender<SearchResult>,
        thinking_tx: &Sender<Thinking>,
    ) -> Result<SearchResult, SearchError> {
        let hard = Duration::from_millis(budget_ms);
        let control = SearchControl::new(stop).with_time(hard / 2, hard);
        let limits = SearchLimits::default();

        let result = self.iterate(pos, tables, &limits, &control, |result, stats| {
            let thinking = Thinking {
                depth: result.depth,
                score: result.score,
                nodes: stats.nodes,
                elapsed_ms: control.elapsed().as_millis() as u64,
                line: result.line.clone(),
            };
            // A dropped receiver only means nobody is watching.
            let _ = thinking_tx.send(thinking);
        })?;

        info!(
            best = %result.best_move,
            score = result.score,
            depth = result.depth,
            elapsed_ms = control.elapsed().as_millis() as u64,
            "move chosen"
        );
        if result_tx.send(result.clone()).is_err() {
            debug!("result receiver dropped");
        }
        Ok(result)
    }
}

/// One-shot [`Searcher::think`] with fresh tables built from `config`.
#[allow(clippy::too_many_arguments)]
pub fn think_and_choose_move(
    pos: &mut Position,
    tables: &Tables,
    budget_ms: u64,
    config: &EngineConfig,
    stop: Arc<AtomicBool>,
    result_tx: Sender<SearchResult>,
    thinking_tx: Sender<Thinking>,
) -> Result<SearchResult, SearchError> {
    Searcher::new(config).think(pos, tables, budget_ms, stop, &result_tx, &thinking_tx)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::Ordering;
    use std::sync::mpsc;
    use std::thread;

    use rookery_core::STARTING_FEN;

    #[test]
    fn reports_iterations_then_the_result() {
        let mut pos: Position = STARTING_FEN.parse().unwrap();
        let (result_tx, result_rx) = mpsc::channel();
        let (thinking_tx, thinking_rx) = mpsc::channel();
        let config = EngineConfig { hash_mb: 1, ..EngineConfig::default() };
        let stop = Arc::new(AtomicBool::new(false));

        let returned = think_and_choose_move(
            &mut pos,
            Tables::shared(),
            200,
            &config,
            stop,
            result_tx,
            thinking_tx,
        )
        .unwrap();

        let sent = result_rx.recv().unwrap();
        assert_eq!(sent.best_move, returned.best_move);
        let updates: Vec<Thinking> = thinking_rx.try_iter().collect();
        assert!(!updates.is_empty());
        assert!(updates.windows(2).all(|w| w[0].depth < w[1].depth));
        assert_eq!(updates.last().map(|t| t.depth), Some(returned.depth));
        assert!(updates.iter().all(|t| t.line.first().is_some_and(|m| !m.is_null())));
    }

    #[test]
    fn stop_flag_ends_a_search_on_another_thread() {
        let (result_tx, result_rx) = mpsc::channel();
        let (thinking_tx, thinking_rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);

        let handle = thread::spawn(move || {
            let mut pos: Position = STARTING_FEN.parse().unwrap();
            let config = EngineConfig { hash_mb: 1, ..EngineConfig::default() };
            think_and_choose_move(&mut pos, Tables::shared(), 60_000, &config, flag, result_tx, thinking_tx)
        });

        // Wait for the first iteration before stopping.
        let first = thinking_rx.recv().unwrap();
        assert_eq!(first.depth, 1);
        stop.store(true, Ordering::Release);

        let result = handle.join().unwrap().unwrap();
        assert!(result.aborted);
        assert!(!result.best_move.is_null());
        assert_eq!(result_rx.recv().unwrap().best_move, result.best_move);
    }
}
