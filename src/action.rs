use std::mem;

use itertools::{iproduct, Itertools};
use thiserror::Error;

use crate::error::BalanceError;
use crate::model::condition::{Condition, Score};
use crate::model::entity::{Id, Role, Side};
use crate::model::team::{GameAssignment, Team, GAME_SIZE, TEAM_SIZE};

pub type Index = usize;
/// Index of a player inside the ten-player chunk being balanced.
pub type Slot = u8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Seat {
    pub side: Side,
    pub role: Role,
}

impl Seat {
    pub fn new(side: Side, role: Role) -> Seat {
        Seat { side, role }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Two members of one team exchange roles.
    Reassign { side: Side, first: Role, second: Role },
    /// The blue and red players at the given roles change teams, each taking
    /// over the other's role.
    Trade { blue: Role, red: Role },
}

impl Action {
    /// Every move the search tries from a lineup: role swaps inside blue,
    /// role swaps inside red, then every blue/red trade.
    pub fn neighborhood() -> Vec<Action> {
        let reassign = |side| {
            Role::ALL
                .into_iter()
                .tuple_combinations()
                .map(move |(first, second)| Action::Reassign { side, first, second })
        };
        reassign(Side::Blue)
            .chain(reassign(Side::Red))
            .chain(iproduct!(Role::ALL, Role::ALL).map(|(blue, red)| Action::Trade { blue, red }))
            .collect()
    }

    fn seats(&self) -> (Seat, Seat) {
        match *self {
            Action::Reassign { side, first, second } => (Seat::new(side, first), Seat::new(side, second)),
            Action::Trade { blue, red } => (Seat::new(Side::Blue, blue), Seat::new(Side::Red, red)),
        }
    }
}

fn swap_seats<T>(blue: &mut Team<T>, red: &mut Team<T>, first: Seat, second: Seat) {
    match (first.side, second.side) {
        (Side::Blue, Side::Blue) => blue.swap(first.role, second.role),
        (Side::Red, Side::Red) => red.swap(first.role, second.role),
        (Side::Blue, Side::Red) => mem::swap(blue.get_mut(first.role), red.get_mut(second.role)),
        (Side::Red, Side::Blue) => mem::swap(red.get_mut(first.role), blue.get_mut(second.role)),
    }
}

/// Two teams of chunk slots; the position of a slot is its role.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Lineup {
    pub blue: Team<Slot>,
    pub red: Team<Slot>,
}

impl Lineup {
    /// First five players on blue, next five on red, roles in input order.
    pub fn seed() -> Lineup {
        Lineup {
            blue: Team::new(std::array::from_fn(|index| index as Slot)),
            red: Team::new(std::array::from_fn(|index| (index + TEAM_SIZE) as Slot)),
        }
    }

    /// Order-sensitive identity of the lineup, blue slots then red slots.
    pub fn key(&self) -> [Slot; GAME_SIZE] {
        let mut key = [0; GAME_SIZE];
        key[..TEAM_SIZE].copy_from_slice(self.blue.slots());
        key[TEAM_SIZE..].copy_from_slice(self.red.slots());
        key
    }

    pub fn act(&mut self, action: &Action) {
        let (first, second) = action.seats();
        swap_seats(&mut self.blue, &mut self.red, first, second);
    }

    pub fn acted(&self, action: &Action) -> Lineup {
        let mut next = self.clone();
        next.act(action);
        next
    }

    /// True when every chunk slot appears exactly once.
    pub fn conserves_players(&self) -> bool {
        let mut key = self.key();
        key.sort_unstable();
        key.iter().enumerate().all(|(index, slot)| usize::from(*slot) == index)
    }
}


#[derive(Debug, Clone, Error, PartialEq)]
pub enum ActionError {
    #[error("Invalid position")]
    InvalidPosition,
    #[error("Player {0} is not in this game")]
    PlayerNotFound(Id),
    #[error(transparent)]
    Balance(#[from] BalanceError),
}

/// A seat in one of several published games.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub game_index: Index,
    pub seat: Seat,
}

impl Position {
    pub fn new(game_index: Index, side: Side, member_index: Index) -> Result<Position, ActionError> {
        let role = Role::from_index(member_index).ok_or(ActionError::InvalidPosition)?;
        Ok(Position { game_index, seat: Seat::new(side, role) })
    }
}

impl GameAssignment {
    pub fn rescore(&mut self, condition: &Condition) -> Result<Score, BalanceError> {
        self.fitness = condition.fitness(&self.blue, &self.red)?;
        Ok(self.fitness)
    }

    /// Swaps two players of this game by id and rescores it.
    pub fn swap_by_id(&mut self, first: &str, second: &str, condition: &Condition) -> Result<Score, ActionError> {
        let locate = |id: &str| {
            self.locate(id)
                .map(|(side, role)| Seat::new(side, role))
                .ok_or_else(|| ActionError::PlayerNotFound(id.to_string()))
        };
        let (first, second) = (locate(first)?, locate(second)?);
        Ok(self.swap_and_rescore(first, second, condition)?)
    }

    /// Leaves the game untouched when the swapped teams cannot be scored.
    fn swap_and_rescore(&mut self, first: Seat, second: Seat, condition: &Condition) -> Result<Score, BalanceError> {
        let (mut blue, mut red) = (self.blue.clone(), self.red.clone());
        swap_seats(&mut blue, &mut red, first, second);
        self.fitness = condition.fitness(&blue, &red)?;
        self.blue = blue;
        self.red = red;
        Ok(self.fitness)
    }
}

/// Exchanges the players at two positions, possibly in different games, and
/// rescores every game touched. On error no game is changed.
pub fn swap_players(
    games: &mut [GameAssignment],
    first: &Position,
    second: &Position,
    condition: &Condition,
) -> Result<(), ActionError> {
    if first.game_index >= games.len() || second.game_index >= games.len() {
        return Err(ActionError::InvalidPosition);
    }
    if first == second {
        return Ok(());
    }
    if first.game_index == second.game_index {
        games[first.game_index].swap_and_rescore(first.seat, second.seat, condition)?;
        return Ok(());
    }

    let (low, high) = if first.game_index < second.game_index { (first, second) } else { (second, first) };
    let (head, tail) = games.split_at_mut(high.game_index);
    let low_game = &mut head[low.game_index];
    let high_game = &mut tail[0];
    let exchange = |low_game: &mut GameAssignment, high_game: &mut GameAssignment| {
        mem::swap(
            low_game.team_mut(low.seat.side).get_mut(low.seat.role),
            high_game.team_mut(high.seat.side).get_mut(high.seat.role),
        )
    };
    exchange(low_game, high_game);
    let scored = condition
        .fitness(&low_game.blue, &low_game.red)
        .and_then(|low_fitness| Ok((low_fitness, condition.fitness(&high_game.blue, &high_game.red)?)));
    match scored {
        Ok((low_fitness, high_fitness)) => {
            low_game.fitness = low_fitness;
            high_game.fitness = high_fitness;
            Ok(())
        }
        Err(err) => {
            exchange(low_game, high_game);
            Err(err.into())
        }
    }
}
