use crate::action::{Lineup, Slot};
use crate::error::BalanceError;
use crate::model::condition::{Condition, Score, Weights, MAX_TIER, ROLE_FIT_NUMERATOR};
use crate::model::entity::{AssignedPlayer, PlayerRecord, PreferenceRank, Role};
use crate::model::team::Team;


fn round_cents(value: Score) -> Score {
    (value * 100.0).round() / 100.0
}

impl Weights {
    /// Desirability of a player in the role they are assigned, higher is
    /// better, rounded to cents so equal players compare exactly equal.
    pub fn prowess(&self, player: &AssignedPlayer) -> Result<Score, BalanceError> {
        let rank = player.assigned_preference()?;
        let record = player.player;
        if !record.win_rate.is_finite() {
            return Err(BalanceError::IncompletePlayerData {
                id: record.id.clone(),
                reason: format!("win rate {} is not a finite number", record.win_rate),
            });
        }
        let tier = (MAX_TIER - f64::from(record.skill_tier)) * self.tier;
        let win_rate = record.win_rate * self.win_rate;
        let role_fit = ROLE_FIT_NUMERATOR / f64::from(rank) * self.role;
        Ok(round_cents(tier + win_rate + role_fit))
    }

    fn seat(&self, player: &PlayerRecord, role: Role) -> Result<(Score, PreferenceRank), BalanceError> {
        let assigned = player.assigned(role);
        Ok((self.prowess(&assigned)?, assigned.assigned_preference()?))
    }
}

impl Condition {
    fn combine(&self, seats: impl IntoIterator<Item = [(Score, PreferenceRank); 2]>) -> Score {
        let mut diff = 0.0;
        let mut penalty = 0.0;
        for [(blue_prowess, blue_rank), (red_prowess, red_rank)] in seats {
            diff += (blue_prowess - red_prowess).abs();
            penalty += f64::from(blue_rank) + f64::from(red_rank);
        }
        if self.role_priority {
            diff + penalty
        } else {
            diff
        }
    }

    /// Imbalance of two teams, lower is better.
    pub fn fitness(&self, blue: &Team<PlayerRecord>, red: &Team<PlayerRecord>) -> Result<Score, BalanceError> {
        let seats = Role::ALL
            .into_iter()
            .map(|role| {
                Ok([
                    self.weights.seat(blue.get(role), role)?,
                    self.weights.seat(red.get(role), role)?,
                ])
            })
            .collect::<Result<Vec<_>, BalanceError>>()?;
        Ok(self.combine(seats))
    }

    /// Sum of the preference ranks of the roles all ten players hold.
    pub fn role_penalty(&self, blue: &Team<PlayerRecord>, red: &Team<PlayerRecord>) -> Result<Score, BalanceError> {
        blue.iter()
            .chain(red.iter())
            .map(|(role, player)| player.assigned(role).assigned_preference().map(f64::from))
            .sum()
    }
}


struct CachedPlayer {
    prowess: [Score; Role::COUNT],
    ranks: [PreferenceRank; Role::COUNT],
}

impl CachedPlayer {
    fn create(player: &PlayerRecord, weights: &Weights) -> Result<CachedPlayer, BalanceError> {
        let mut prowess = [0.0; Role::COUNT];
        let mut ranks = [0; Role::COUNT];
        for role in Role::ALL {
            let (score, rank) = weights.seat(player, role)?;
            prowess[role.index()] = score;
            ranks[role.index()] = rank;
        }
        Ok(CachedPlayer { prowess, ranks })
    }
}

/// Prowess of every player of one game in every role, computed once so the
/// search never rescores a player in a role it has already seen.
pub struct ProwessTable {
    condition: Condition,
    players: Vec<CachedPlayer>,
}

impl ProwessTable {
    pub fn build(players: &[PlayerRecord], condition: &Condition) -> Result<ProwessTable, BalanceError> {
        let players = players
            .iter()
            .map(|player| CachedPlayer::create(player, &condition.weights))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ProwessTable { condition: *condition, players })
    }

    pub fn prowess(&self, slot: Slot, role: Role) -> Score {
        self.players[usize::from(slot)].prowess[role.index()]
    }

    pub fn rank(&self, slot: Slot, role: Role) -> PreferenceRank {
        self.players[usize::from(slot)].ranks[role.index()]
    }

    fn seat(&self, slot: Slot, role: Role) -> (Score, PreferenceRank) {
        (self.prowess(slot, role), self.rank(slot, role))
    }

    pub fn fitness(&self, lineup: &Lineup) -> Score {
        self.condition.combine(
            Role::ALL
                .into_iter()
                .map(|role| [self.seat(*lineup.blue.get(role), role), self.seat(*lineup.red.get(role), role)]),
        )
    }

    pub fn role_penalty(&self, lineup: &Lineup) -> Score {
        lineup
            .blue
            .iter()
            .chain(lineup.red.iter())
            .map(|(role, slot)| f64::from(self.rank(*slot, role)))
            .sum()
    }
}
