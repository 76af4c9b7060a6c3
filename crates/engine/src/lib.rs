//! stacker-engine - game rules and simulation.
//!
//! Piece geometry and SRS kicks, the mutable board state with exact
//! place/unplace, garbage scoring, landing enumeration and input path finding.

pub mod attack;
pub mod bag;
pub mod config;
pub mod geometry;
pub mod kicks;
pub mod move_list;
pub mod movegen;
pub mod perft;
pub mod spin;
pub mod state;
pub mod translate;
pub mod zobrist;

pub use attack::ScoreState;
pub use bag::SevenBag;
pub use config::{AttackConfig, ComboTable};
pub use geometry::{PieceGeometry, PieceTable, Rotated};
pub use kicks::get_kicks;
pub use move_list::PlacementList;
pub use movegen::{count_landings, generate_landings, generate_placements};
pub use perft::{perft, perft_parallel};
pub use spin::detect_tspin;
pub use state::{Active, BoardState, Clears, LockOutcome};
pub use translate::{find_path, InputPath};
