use thiserror::Error;

use crate::model::entity::Id;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum BalanceError {
    #[error("roster has {count} players, expected a positive multiple of 10")]
    InvalidPlayerCount { count: usize },
    #[error("player {id} has incomplete data: {reason}")]
    IncompletePlayerData { id: Id, reason: String },
    #[error("player {id} appears more than once in the roster")]
    DuplicatePlayer { id: Id },
}
