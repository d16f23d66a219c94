use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

/// Aggregate match entity persisted by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchEntity {
    /// Identifier of this match instance.
    pub id: Uuid,
    /// Side batting in the first innings.
    pub team_a: TeamEntity,
    /// Side chasing in the second innings.
    pub team_b: TeamEntity,
    /// Which side holds the bat right now.
    pub current_batting_team: BattingSideEntity,
    /// Progress through the current over.
    pub current_over: OverEntity,
    /// Innings number (1 or 2).
    pub innings: u8,
    /// Whether the match has been decided.
    pub is_over: bool,
    /// Ball-by-ball commentary in delivery order.
    #[serde(default)]
    pub commentary: Vec<CommentaryEntity>,
    /// Decided result, once the match is over.
    #[serde(default)]
    pub result: Option<MatchResultEntity>,
    /// Creation timestamp for auditing/debugging.
    pub created_at: SystemTime,
    /// Last time the match entity was updated.
    pub updated_at: SystemTime,
}

/// Discriminator of the batting side.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BattingSideEntity {
    #[serde(rename = "teamA")]
    TeamA,
    #[serde(rename = "teamB")]
    TeamB,
}

/// Score card of one team.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamEntity {
    pub name: String,
    pub total_runs: u32,
    pub extras: ExtrasEntity,
    pub wickets_lost: u8,
    pub overs: u32,
    /// Missing in malformed records; rejected when loaded.
    #[serde(default)]
    pub batters: Option<BattersEntity>,
    /// Missing in malformed records; rejected when loaded.
    #[serde(default)]
    pub bowlers: Option<BowlersEntity>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtrasEntity {
    pub wide: u32,
    pub no_ball: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BattersEntity {
    pub striker: BatterEntity,
    pub non_striker: BatterEntity,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatterEntity {
    pub name: String,
    pub runs: u32,
    pub balls_faced: u32,
    pub fours: u32,
    pub sixes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BowlersEntity {
    pub bowler: BowlerEntity,
    pub non_bowler: BowlerEntity,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BowlerEntity {
    pub name: String,
    pub balls_bowled: u8,
    pub overs_bowled: u32,
    pub runs_conceded: u32,
    pub wickets_taken: u32,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OverEntity {
    pub balls_bowled: u8,
    pub over_number: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommentaryEntity {
    /// Scoreboard label of the ball (`over.ball`).
    pub ball: String,
    pub run: u32,
    pub text: String,
}

/// Decided outcome stored alongside a finished match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchResultEntity {
    Won { winner: String, margin: MarginEntity },
    Tied,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MarginEntity {
    Wickets(u8),
    Runs(u32),
}

/// Registered scorer account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserEntity {
    /// Stable identifier, carried as the token subject.
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Unique, trimmed and lowercased login name.
    pub username: String,
    /// Argon2 PHC string; the plaintext password is never stored.
    pub password_hash: String,
    pub created_at: SystemTime,
}
