pub mod entity {
    use std::collections::BTreeMap;
    use std::fmt;

    use serde::{Deserialize, Serialize};

    use crate::error::BalanceError;

    pub type Id = String;
    pub type Tier = u8;
    /// 1 is the most wanted role, 5 the least wanted.
    pub type PreferenceRank = u8;
    pub type RolePreference = BTreeMap<Role, PreferenceRank>;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    pub enum Role {
        Top,
        Jungle,
        Mid,
        Bot,
        Support,
    }

    impl Role {
        pub const COUNT: usize = 5;
        pub const ALL: [Role; Role::COUNT] = [Role::Top, Role::Jungle, Role::Mid, Role::Bot, Role::Support];

        pub fn index(self) -> usize {
            self as usize
        }

        pub fn from_index(index: usize) -> Option<Role> {
            Role::ALL.get(index).copied()
        }
    }

    impl fmt::Display for Role {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let label = match self {
                Role::Top => "Top",
                Role::Jungle => "Jungle",
                Role::Mid => "Mid",
                Role::Bot => "Bot",
                Role::Support => "Supp",
            };
            f.pad(label)
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Side {
        Blue,
        Red,
    }

    impl fmt::Display for Side {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Side::Blue => f.write_str("Blue"),
                Side::Red => f.write_str("Red"),
            }
        }
    }

    /// Builds a preference map from ranks listed in role order (Top first).
    pub fn preferences(ranks: [PreferenceRank; Role::COUNT]) -> RolePreference {
        Role::ALL.into_iter().zip(ranks).collect()
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct PlayerRecord {
        pub id: Id,
        #[serde(default)]
        pub username: String,
        pub skill_tier: Tier,
        pub role_preference: RolePreference,
        #[serde(default)]
        pub win_rate: f64,
    }

    impl PlayerRecord {
        pub fn new(id: impl Into<Id>, skill_tier: Tier, role_preference: RolePreference, win_rate: f64) -> PlayerRecord {
            PlayerRecord {
                id: id.into(),
                username: String::new(),
                skill_tier,
                role_preference,
                win_rate,
            }
        }

        pub fn with_username(mut self, username: impl Into<String>) -> PlayerRecord {
            self.username = username.into();
            self
        }

        pub fn preference_for(&self, role: Role) -> Option<PreferenceRank> {
            self.role_preference.get(&role).copied()
        }

        pub fn assigned(&self, role: Role) -> AssignedPlayer<'_> {
            AssignedPlayer { player: self, assigned_role: Some(role) }
        }

        pub fn unassigned(&self) -> AssignedPlayer<'_> {
            AssignedPlayer { player: self, assigned_role: None }
        }
    }

    /// A player viewed through the role the balancer currently gives them.
    #[derive(Debug, Clone, Copy)]
    pub struct AssignedPlayer<'a> {
        pub player: &'a PlayerRecord,
        pub assigned_role: Option<Role>,
    }

    impl<'a> AssignedPlayer<'a> {
        pub fn role(&self) -> Result<Role, BalanceError> {
            self.assigned_role.ok_or_else(|| BalanceError::IncompletePlayerData {
                id: self.player.id.clone(),
                reason: "no role assigned".to_string(),
            })
        }

        pub fn assigned_preference(&self) -> Result<PreferenceRank, BalanceError> {
            let role = self.role()?;
            match self.player.preference_for(role) {
                Some(rank) if (1..=Role::COUNT as PreferenceRank).contains(&rank) => Ok(rank),
                Some(rank) => Err(BalanceError::IncompletePlayerData {
                    id: self.player.id.clone(),
                    reason: format!("preference rank {rank} for {role} is outside 1..=5"),
                }),
                None => Err(BalanceError::IncompletePlayerData {
                    id: self.player.id.clone(),
                    reason: format!("no preference rank for {role}"),
                }),
            }
        }
    }
}


pub mod team {
    use std::fmt;

    use serde::Serialize;

    use super::condition::{Score, Weights};
    use super::entity::{Id, PlayerRecord, Role, Side};

    pub const TEAM_SIZE: usize = Role::COUNT;
    pub const GAME_SIZE: usize = 2 * TEAM_SIZE;

    /// Five slots where slot `i` always plays `Role::ALL[i]`.
    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
    #[serde(transparent)]
    pub struct Team<T> {
        slots: [T; TEAM_SIZE],
    }

    impl<T> Team<T> {
        pub fn new(slots: [T; TEAM_SIZE]) -> Team<T> {
            Team { slots }
        }

        pub fn get(&self, role: Role) -> &T {
            &self.slots[role.index()]
        }

        pub(crate) fn get_mut(&mut self, role: Role) -> &mut T {
            &mut self.slots[role.index()]
        }

        pub fn slots(&self) -> &[T; TEAM_SIZE] {
            &self.slots
        }

        /// Exchanges the roles of two members of this team.
        pub fn swap(&mut self, first: Role, second: Role) {
            self.slots.swap(first.index(), second.index());
        }

        pub fn iter(&self) -> impl Iterator<Item = (Role, &T)> {
            Role::ALL.into_iter().zip(self.slots.iter())
        }

        pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Team<U> {
            Team { slots: std::array::from_fn(|index| f(&self.slots[index])) }
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct GameAssignment {
        pub blue: Team<PlayerRecord>,
        pub red: Team<PlayerRecord>,
        pub fitness: Score,
    }

    impl GameAssignment {
        pub fn team(&self, side: Side) -> &Team<PlayerRecord> {
            match side {
                Side::Blue => &self.blue,
                Side::Red => &self.red,
            }
        }

        pub(crate) fn team_mut(&mut self, side: Side) -> &mut Team<PlayerRecord> {
            match side {
                Side::Blue => &mut self.blue,
                Side::Red => &mut self.red,
            }
        }

        pub fn ids(&self) -> impl Iterator<Item = &Id> {
            self.blue.slots.iter().chain(self.red.slots.iter()).map(|player| &player.id)
        }

        pub fn locate(&self, id: &str) -> Option<(Side, Role)> {
            [Side::Blue, Side::Red].into_iter().find_map(|side| {
                self.team(side)
                    .iter()
                    .find(|(_, player)| player.id == id)
                    .map(|(role, _)| (side, role))
            })
        }

        pub fn display<'a>(&'a self, weights: &'a Weights) -> GameDisplay<'a> {
            GameDisplay { game: self, weights }
        }
    }

    pub struct GameDisplay<'a> {
        game: &'a GameAssignment,
        weights: &'a Weights,
    }

    impl fmt::Display for GameDisplay<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            for side in [Side::Blue, Side::Red] {
                writeln!(f, "{side} Team:")?;
                for (role, player) in self.game.team(side).iter() {
                    let assigned = player.assigned(role);
                    let pref = assigned
                        .assigned_preference()
                        .map_or_else(|_| "?".to_string(), |rank| rank.to_string());
                    let prowess = self
                        .weights
                        .prowess(&assigned)
                        .map_or_else(|_| "n/a".to_string(), |score| format!("{score:.2}"));
                    writeln!(
                        f,
                        "  {role:<7}{} ({}), Tier: {}, Pref: {pref}, Prowess: {prowess}",
                        player.id, player.username, player.skill_tier
                    )?;
                }
            }
            write!(f, "Imbalance: {:.2}", self.game.fitness)
        }
    }
}


pub mod condition {
    use serde::{Deserialize, Serialize};

    pub type Score = f64;

    /// Tier at which the tier term of prowess turns negative.
    pub const MAX_TIER: f64 = 5.0;
    /// Numerator of the reciprocal role-fit term.
    pub const ROLE_FIT_NUMERATOR: f64 = 5.0;

    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct Weights {
        pub tier: f64,
        pub win_rate: f64,
        pub role: f64,
    }

    impl Default for Weights {
        fn default() -> Self {
            Weights { tier: 5.0, win_rate: 0.1, role: 0.6 }
        }
    }

    /// Everything the objective needs besides the players themselves.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Condition {
        pub weights: Weights,
        pub role_priority: bool,
    }

    impl Default for Condition {
        fn default() -> Self {
            Condition { weights: Weights::default(), role_priority: true }
        }
    }
}
