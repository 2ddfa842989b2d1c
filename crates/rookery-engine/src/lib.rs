//! Evaluation and search for rookery.

pub mod config;
pub mod eval;
pub mod search;

pub use config::{ConfigError, EngineConfig};
pub use eval::{Evaluator, evaluate, white_relative};
pub use search::control::{SearchControl, SearchLimits};
pub use search::think::{Thinking, think_and_choose_move};
pub use search::{
    INF, MATE, MATE_THRESHOLD, MAX_PLY, SearchError, SearchFlag, SearchResult, SearchStats, Searcher,
};
