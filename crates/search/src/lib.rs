//! stacker-search - time-boxed placement search and the plumbing around it.

pub mod cache;
pub mod config;
pub mod deadline;
pub mod engine;
pub mod replay;
pub mod worker;

pub use cache::SearchCache;
pub use config::{ConfigError, SearchConfig};
pub use deadline::Deadline;
pub use engine::{Decision, SearchEngine, SearchStats, DEAD_END};
pub use replay::InputQueue;
pub use worker::{AltSolver, Plan, SearchWorker};
