pub mod action;
pub mod batch;
pub mod config;
pub mod error;
pub mod explore;
pub mod model;
pub mod prowess;
pub mod roster;

pub use action::{swap_players, Action, ActionError, Lineup, Position, Seat};
pub use batch::{balance_game, balance_many};
pub use config::{BalanceConfig, ConfigError};
pub use error::BalanceError;
pub use explore::{Explorer, Outcome, Params};
pub use model::condition::{Condition, Score, Weights};
pub use model::entity::{preferences, AssignedPlayer, PlayerRecord, Role, Side};
pub use model::team::{GameAssignment, Team};
pub use prowess::ProwessTable;
pub use roster::{bench_surplus, Bench, Rank, RosterEntry, RosterError};
