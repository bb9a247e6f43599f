use std::collections::HashSet;

use tracing::trace;

use crate::action::{Action, Lineup, Slot};
use crate::model::condition::Score;
use crate::model::entity::PlayerRecord;
use crate::model::team::{GameAssignment, GAME_SIZE};
use crate::prowess::ProwessTable;


pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Params {
    pub max_iterations: usize,
}

impl Default for Params {
    fn default() -> Self {
        Params { max_iterations: DEFAULT_MAX_ITERATIONS }
    }
}

/// Best lineup found by one search, with bookkeeping about the run.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub lineup: Lineup,
    pub fitness: Score,
    pub seed_fitness: Score,
    /// Lineups popped from the frontier.
    pub iterations: usize,
    /// Distinct lineups scored, the seed included.
    pub explored: usize,
}

impl Outcome {
    pub fn into_assignment(self, players: &[PlayerRecord]) -> GameAssignment {
        let seat = |slot: &Slot| players[usize::from(*slot)].clone();
        GameAssignment {
            blue: self.lineup.blue.map(seat),
            red: self.lineup.red.map(seat),
            fitness: self.fitness,
        }
    }
}

struct State {
    frontier: Vec<Lineup>,
    visited: HashSet<[Slot; GAME_SIZE]>,
    best: Lineup,
    best_fitness: Score,
    n_iterations: usize,
}

/// Depth-first local search over role reassignments and cross-team trades.
///
/// Every unseen neighbour is scored once and pushed on the frontier; the
/// frontier is a stack so exploration runs depth first. The search stops when
/// the frontier is empty or `max_iterations` lineups have been popped, and
/// never returns anything worse than the seed.
pub struct Explorer<'a> {
    table: &'a ProwessTable,
    params: Params,
    moves: Vec<Action>,
}

impl<'a> Explorer<'a> {
    pub fn new(table: &'a ProwessTable, params: Params) -> Explorer<'a> {
        Explorer { table, params, moves: Action::neighborhood() }
    }

    pub fn run(&self, seed: Lineup) -> Outcome {
        let seed_fitness = self.table.fitness(&seed);
        let mut state = State {
            frontier: vec![seed.clone()],
            visited: HashSet::from([seed.key()]),
            best: seed,
            best_fitness: seed_fitness,
            n_iterations: 0,
        };

        while state.n_iterations < self.params.max_iterations {
            let Some(current) = state.frontier.pop() else {
                break;
            };
            for action in &self.moves {
                let next = current.acted(action);
                debug_assert!(next.conserves_players());
                if !state.visited.insert(next.key()) {
                    continue;
                }
                let fitness = self.table.fitness(&next);
                if fitness < state.best_fitness {
                    trace!(iteration = state.n_iterations, from = state.best_fitness, to = fitness, "improved lineup");
                    state.best = next.clone();
                    state.best_fitness = fitness;
                }
                state.frontier.push(next);
            }
            state.n_iterations += 1;
        }

        Outcome {
            lineup: state.best,
            fitness: state.best_fitness,
            seed_fitness,
            iterations: state.n_iterations,
            explored: state.visited.len(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::condition::Condition;
    use crate::model::entity::preferences;

    fn identical_players() -> Vec<PlayerRecord> {
        (0..10)
            .map(|i| PlayerRecord::new(format!("p{i}"), 3, preferences([1, 2, 3, 4, 5]), 0.5))
            .collect()
    }

    #[test]
    fn test_never_worse_than_seed() {
        let players: Vec<_> = [2, 7, 1, 4, 4, 3, 6, 5, 1, 2]
            .into_iter()
            .enumerate()
            .map(|(i, tier)| PlayerRecord::new(format!("p{i}"), tier, preferences([3, 1, 5, 2, 4]), 0.1 * i as f64))
            .collect();
        let table = ProwessTable::build(&players, &Condition::default()).unwrap();
        let outcome = Explorer::new(&table, Params::default()).run(Lineup::seed());
        assert!(outcome.fitness <= outcome.seed_fitness);
        assert_eq!(outcome.fitness, table.fitness(&outcome.lineup));
        assert!(outcome.lineup.conserves_players());
    }

    #[test]
    fn test_iteration_cap() {
        let table = ProwessTable::build(&identical_players(), &Condition::default()).unwrap();
        for cap in [0, 1, 3, 50] {
            let outcome = Explorer::new(&table, Params { max_iterations: cap }).run(Lineup::seed());
            assert_eq!(outcome.iterations, cap);
            assert!(outcome.explored <= 1 + 45 * cap);
        }
    }

    #[test]
    fn test_zero_iterations_returns_seed() {
        let table = ProwessTable::build(&identical_players(), &Condition::default()).unwrap();
        let outcome = Explorer::new(&table, Params { max_iterations: 0 }).run(Lineup::seed());
        assert_eq!(outcome.lineup, Lineup::seed());
        assert_eq!(outcome.explored, 1);
    }

    #[test]
    fn test_first_pop_scores_whole_neighborhood() {
        let table = ProwessTable::build(&identical_players(), &Condition::default()).unwrap();
        let outcome = Explorer::new(&table, Params { max_iterations: 1 }).run(Lineup::seed());
        assert_eq!(outcome.explored, 46);
    }

    #[test]
    fn test_ties_keep_seed() {
        // identical players and preferences: the seed is already optimal
        let table = ProwessTable::build(&identical_players(), &Condition::default()).unwrap();
        let outcome = Explorer::new(&table, Params::default()).run(Lineup::seed());
        assert_eq!(outcome.lineup, Lineup::seed());
        assert_eq!(outcome.fitness, 30.0);
    }

    #[test]
    fn test_fixes_swapped_roles() {
        // player i wants role i % 5; blue starts with Top and Jungle swapped
        let order = [1, 0, 2, 3, 4, 5, 6, 7, 8, 9];
        let players: Vec<_> = order
            .into_iter()
            .map(|i: usize| {
                let mut ranks = [5; 5];
                ranks[i % 5] = 1;
                PlayerRecord::new(format!("p{i}"), 3, preferences(ranks), 0.5)
            })
            .collect();
        let table = ProwessTable::build(&players, &Condition::default()).unwrap();
        let outcome = Explorer::new(&table, Params::default()).run(Lineup::seed());
        assert_eq!(outcome.fitness, 10.0);
        for (role, slot) in outcome.lineup.blue.iter().chain(outcome.lineup.red.iter()) {
            assert_eq!(table.rank(*slot, role), 1, "{role} has an unhappy player");
        }
    }
}
