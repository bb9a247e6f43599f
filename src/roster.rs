//! Turning checked-in player rows into balancer input.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::model::entity::{Id, PlayerRecord, RolePreference, Role, Tier};
use crate::model::team::GAME_SIZE;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("player {id} has an invalid role preference {value:?}, expected five digits 1-5")]
    InvalidRolePreference { id: Id, value: String },
    #[error("need at least 10 players, only {count} checked in")]
    NotEnoughPlayers { count: usize },
    #[error("invalid roster: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Solo-queue rank as reported by the ranked API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    Unranked,
    Iron,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Emerald,
    Diamond,
    Master,
    Grandmaster,
    Challenger,
}

impl Rank {
    pub fn tier(self) -> Tier {
        match self {
            Rank::Challenger | Rank::Grandmaster => 1,
            Rank::Master => 2,
            Rank::Diamond | Rank::Emerald => 3,
            Rank::Platinum => 4,
            Rank::Gold => 5,
            Rank::Silver | Rank::Bronze => 6,
            Rank::Iron | Rank::Unranked => 7,
        }
    }
}

impl From<&str> for Rank {
    /// Unknown labels count as unranked.
    fn from(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "IRON" => Rank::Iron,
            "BRONZE" => Rank::Bronze,
            "SILVER" => Rank::Silver,
            "GOLD" => Rank::Gold,
            "PLATINUM" | "PLAT" => Rank::Platinum,
            "EMERALD" => Rank::Emerald,
            "DIAMOND" => Rank::Diamond,
            "MASTER" => Rank::Master,
            "GRANDMASTER" => Rank::Grandmaster,
            "CHALLENGER" => Rank::Challenger,
            _ => Rank::Unranked,
        }
    }
}

/// Parses the stored five-digit form, digit `i` ranking `Role::ALL[i]`,
/// so "15432" means Top first and Jungle last.
pub fn parse_role_preference(id: &str, value: &str) -> Result<RolePreference, RosterError> {
    let invalid = || RosterError::InvalidRolePreference { id: id.to_string(), value: value.to_string() };
    let digits = value
        .trim()
        .chars()
        .map(|c| c.to_digit(10).filter(|d| (1..=5).contains(d)).map(|d| d as u8))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(invalid)?;
    if digits.len() != Role::COUNT {
        return Err(invalid());
    }
    Ok(Role::ALL.into_iter().zip(digits).collect())
}

/// One checked-in player as the stats store keeps them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: Id,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub rank: Option<String>,
    /// Overrides the tier derived from `rank`.
    #[serde(default)]
    pub tier: Option<Tier>,
    pub role_preference: String,
    #[serde(default)]
    pub win_rate: Option<f64>,
    /// Offered to sit out if the count is not a multiple of ten.
    #[serde(default)]
    pub volunteer: bool,
}

impl RosterEntry {
    pub fn tier(&self) -> Tier {
        self.tier
            .unwrap_or_else(|| Rank::from(self.rank.as_deref().unwrap_or_default()).tier())
    }

    pub fn to_player(&self) -> Result<PlayerRecord, RosterError> {
        let role_preference = parse_role_preference(&self.id, &self.role_preference)?;
        Ok(PlayerRecord::new(self.id.clone(), self.tier(), role_preference, self.win_rate.unwrap_or(0.0))
            .with_username(self.username.clone()))
    }
}

pub fn parse_roster(text: &str) -> Result<Vec<RosterEntry>, RosterError> {
    Ok(serde_json::from_str(text)?)
}

pub fn to_players(entries: &[RosterEntry]) -> Result<Vec<PlayerRecord>, RosterError> {
    entries.iter().map(RosterEntry::to_player).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bench {
    pub playing: Vec<RosterEntry>,
    pub sitting_out: Vec<RosterEntry>,
}

/// Sits players out until the rest fill whole games: volunteers first, in
/// roster order, then players drawn at random.
pub fn bench_surplus<R: Rng>(entries: Vec<RosterEntry>, rng: &mut R) -> Result<Bench, RosterError> {
    if entries.len() < GAME_SIZE {
        return Err(RosterError::NotEnoughPlayers { count: entries.len() });
    }
    let mut playing = entries;
    let mut sitting_out = Vec::new();
    while playing.len() % GAME_SIZE != 0 {
        let index = match playing.iter().position(|entry| entry.volunteer) {
            Some(index) => index,
            None => rng.gen_range(0..playing.len()),
        };
        sitting_out.push(playing.remove(index));
    }
    if !sitting_out.is_empty() {
        warn!(count = sitting_out.len(), playing = playing.len(), "players sitting out");
    }
    Ok(Bench { playing, sitting_out })
}


#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;

    fn entry(id: usize, volunteer: bool) -> RosterEntry {
        RosterEntry {
            id: id.to_string(),
            username: format!("user{id}"),
            rank: Some("gold".to_string()),
            tier: None,
            role_preference: "12345".to_string(),
            win_rate: None,
            volunteer,
        }
    }

    #[test]
    fn test_rank_tiers() {
        assert_eq!(Rank::from("CHALLENGER").tier(), 1);
        assert_eq!(Rank::from("master").tier(), 2);
        assert_eq!(Rank::from("Emerald").tier(), 3);
        assert_eq!(Rank::from("plat").tier(), 4);
        assert_eq!(Rank::from("GOLD").tier(), 5);
        assert_eq!(Rank::from("bronze").tier(), 6);
        assert_eq!(Rank::from("IRON").tier(), 7);
        assert_eq!(Rank::from("UNRANKED").tier(), 7);
        assert_eq!(Rank::from("wood"), Rank::Unranked);
    }

    #[test]
    fn test_parse_role_preference() {
        let pref = parse_role_preference("a", "15432").unwrap();
        assert_eq!(pref[&Role::Top], 1);
        assert_eq!(pref[&Role::Jungle], 5);
        assert_eq!(pref[&Role::Support], 2);
    }

    #[test]
    fn test_parse_role_preference_rejects() {
        for bad in ["", "1543", "154321", "15a32", "16432", "05432"] {
            assert!(
                matches!(parse_role_preference("a", bad), Err(RosterError::InvalidRolePreference { .. })),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_entry_to_player() {
        let mut e = entry(4, false);
        let player = e.to_player().unwrap();
        assert_eq!(player.skill_tier, 5);
        assert_eq!(player.win_rate, 0.0);
        assert_eq!(player.username, "user4");

        e.tier = Some(2);
        e.win_rate = Some(0.61);
        let player = e.to_player().unwrap();
        assert_eq!(player.skill_tier, 2);
        assert_eq!(player.win_rate, 0.61);

        e.rank = None;
        e.tier = None;
        assert_eq!(e.tier(), 7);
    }

    #[test]
    fn test_parse_roster() {
        let text = r#"[
            {"id": "1", "rank": "DIAMOND", "role_preference": "21345", "win_rate": 0.5},
            {"id": "2", "tier": 4, "role_preference": "54321", "volunteer": true}
        ]"#;
        let entries = parse_roster(text).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[1].volunteer);
        let players = to_players(&entries).unwrap();
        assert_eq!(players[0].skill_tier, 3);
        assert_eq!(players[1].skill_tier, 4);
    }

    #[test]
    fn test_bench_needs_ten() {
        let entries: Vec<_> = (0..9).map(|i| entry(i, false)).collect();
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(matches!(
            bench_surplus(entries, &mut rng),
            Err(RosterError::NotEnoughPlayers { count: 9 })
        ));
    }

    #[test]
    fn test_bench_keeps_full_games() {
        let entries: Vec<_> = (0..20).map(|i| entry(i, i == 3)).collect();
        let mut rng = SmallRng::seed_from_u64(1);
        let bench = bench_surplus(entries.clone(), &mut rng).unwrap();
        assert_eq!(bench.playing, entries);
        assert!(bench.sitting_out.is_empty());
    }

    #[test]
    fn test_bench_volunteers_first() {
        let entries: Vec<_> = (0..23).map(|i| entry(i, i == 5 || i == 17)).collect();
        let mut rng = SmallRng::seed_from_u64(7);
        let bench = bench_surplus(entries, &mut rng).unwrap();
        assert_eq!(bench.playing.len(), 20);
        assert_eq!(bench.sitting_out.len(), 3);
        assert_eq!(bench.sitting_out[0].id, "5");
        assert_eq!(bench.sitting_out[1].id, "17");
        assert!(bench.playing.iter().all(|e| !e.volunteer));
    }

    #[test]
    fn test_bench_random_is_reproducible() {
        let entries: Vec<_> = (0..34).map(|i| entry(i, false)).collect();
        let first = bench_surplus(entries.clone(), &mut SmallRng::seed_from_u64(42)).unwrap();
        let second = bench_surplus(entries, &mut SmallRng::seed_from_u64(42)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.sitting_out.len(), 4);
    }
}
