//! Search control: the shared abort flag plus time and node limits.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// What the caller asks of one search. Unset fields mean no limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    pub depth: Option<u8>,
    pub movetime: Option<Duration>,
    pub nodes: Option<u64>,
}

impl SearchLimits {
    pub fn depth(depth: u8) -> Self {
        Self { depth: Some(depth), ..Self::default() }
    }

    pub fn movetime(movetime: Duration) -> Self {
        Self { movetime: Some(movetime), ..Self::default() }
    }
}

/// Decides when a running search must stop.
///
/// The abort flag may be set from another thread at any time. The search
/// polls [`should_stop`](Self::should_stop) at every node and looks at the
/// clock every 2048 nodes. Once a limit fires the flag is set, so later polls
/// return at once.
#[derive(Debug)]
pub struct SearchControl {
    stopped: Arc<AtomicBool>,
    start: Instant,
    /// No new iteration starts after this.
    soft_limit: Option<Duration>,
    /// The search aborts after this.
    hard_limit: Option<Duration>,
    node_limit: Option<u64>,
}

impl SearchControl {
    /// No limits; only the flag stops the search.
    pub fn new(stopped: Arc<AtomicBool>) -> Self {
        Self {
            stopped,
            start: Instant::now(),
            soft_limit: None,
            hard_limit: None,
            node_limit: None,
        }
    }

    /// Control for `limits`, with the clock starting now.
    pub fn from_limits(stopped: Arc<AtomicBool>, limits: &SearchLimits) -> Self {
        let mut control = Self::new(stopped);
        control.hard_limit = limits.movetime;
        control.node_limit = limits.nodes;
        control
    }

    /// Stop starting iterations after `soft`, abort after `hard`.
    pub fn with_time(mut self, soft: Duration, hard: Duration) -> Self {
        self.soft_limit = Some(soft.min(hard));
        self.hard_limit = Some(hard);
        self
    }

    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.node_limit = Some(nodes);
        self
    }

    /// Polled at every node with the running node count.
    pub fn should_stop(&self, nodes: u64) -> bool {
        if self.stopped.load(Ordering::Relaxed) {
            return true;
        }
        if self.node_limit.is_some_and(|limit| nodes >= limit) {
            self.stop();
            return true;
        }
        if nodes & 2047 != 0 {
            return false;
        }
        if self.hard_limit.is_some_and(|hard| self.elapsed() >= hard) {
            self.stop();
            return true;
        }
        false
    }

    /// Checked between iterations of iterative deepening.
    pub fn should_stop_iterating(&self) -> bool {
        if self.is_stopped() {
            return true;
        }
        let limit = self.soft_limit.or(self.hard_limit);
        limit.is_some_and(|limit| self.elapsed() >= limit)
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn stop_flag(&self) -> &Arc<AtomicBool> {
        &self.stopped
    }
}
