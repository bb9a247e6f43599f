use std::collections::HashSet;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::action::Lineup;
use crate::config::BalanceConfig;
use crate::error::BalanceError;
use crate::explore::Explorer;
use crate::model::entity::PlayerRecord;
use crate::model::team::{GameAssignment, GAME_SIZE};
use crate::prowess::ProwessTable;


fn check_unique(players: &[PlayerRecord]) -> Result<(), BalanceError> {
    let mut seen = HashSet::new();
    match players.iter().find(|player| !seen.insert(player.id.as_str())) {
        Some(player) => Err(BalanceError::DuplicatePlayer { id: player.id.clone() }),
        None => Ok(()),
    }
}

/// Splits exactly ten players into two balanced teams.
///
/// The first five players seed blue and the last five seed red, each in role
/// order; the search only ever improves on that seed.
pub fn balance_game(players: &[PlayerRecord], config: &BalanceConfig) -> Result<GameAssignment, BalanceError> {
    if players.len() != GAME_SIZE {
        return Err(BalanceError::InvalidPlayerCount { count: players.len() });
    }
    check_unique(players)?;
    let table = ProwessTable::build(players, &config.condition())?;
    let outcome = Explorer::new(&table, config.params()).run(Lineup::seed());
    debug!(
        seed = outcome.seed_fitness,
        best = outcome.fitness,
        iterations = outcome.iterations,
        explored = outcome.explored,
        "balanced game"
    );
    Ok(outcome.into_assignment(players))
}

/// Balances a whole roster, one game per ten players.
///
/// Players are stably sorted by tier, strongest first, and cut into
/// consecutive groups of ten so each game gathers comparable players. Games
/// come back in group order whether or not they were searched in parallel.
pub fn balance_many(players: &[PlayerRecord], config: &BalanceConfig) -> Result<Vec<GameAssignment>, BalanceError> {
    if players.is_empty() || players.len() % GAME_SIZE != 0 {
        return Err(BalanceError::InvalidPlayerCount { count: players.len() });
    }
    check_unique(players)?;

    let mut sorted = players.to_vec();
    sorted.sort_by_key(|player| player.skill_tier);

    let games = if config.parallel {
        sorted
            .par_chunks(GAME_SIZE)
            .map(|chunk| balance_game(chunk, config))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        sorted
            .chunks(GAME_SIZE)
            .map(|chunk| balance_game(chunk, config))
            .collect::<Result<Vec<_>, _>>()?
    };
    info!(players = players.len(), games = games.len(), "balanced roster");
    Ok(games)
}
