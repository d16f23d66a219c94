//! Scoreboard projection pushed to viewers and returned by the score routes.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::format_system_time,
    state::cricket::{Batter, Bowler, CommentaryEntry, Match, Side, Team},
};

/// Full public view of the live match.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchSnapshot {
    pub id: Uuid,
    pub team_a: TeamSnapshot,
    pub team_b: TeamSnapshot,
    pub current_batting_team: BattingSide,
    pub current_over: OverSnapshot,
    pub innings: u8,
    pub is_over: bool,
    pub commentary: Vec<CommentarySnapshot>,
    /// Result message once the match is decided.
    pub result: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub enum BattingSide {
    #[serde(rename = "teamA")]
    TeamA,
    #[serde(rename = "teamB")]
    TeamB,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamSnapshot {
    pub name: String,
    pub total_runs: u32,
    pub extras: ExtrasSnapshot,
    pub wickets_lost: u8,
    pub overs: u32,
    pub batters: BattersSnapshot,
    pub bowlers: BowlersSnapshot,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtrasSnapshot {
    pub wide: u32,
    pub no_ball: u32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BattersSnapshot {
    pub striker: BatterSnapshot,
    pub non_striker: BatterSnapshot,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatterSnapshot {
    pub name: String,
    pub runs: u32,
    pub balls_faced: u32,
    pub fours: u32,
    pub sixes: u32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BowlersSnapshot {
    pub bowler: BowlerSnapshot,
    pub non_bowler: BowlerSnapshot,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BowlerSnapshot {
    pub name: String,
    pub balls_bowled: u8,
    pub overs_bowled: u32,
    pub runs_conceded: u32,
    pub wickets_taken: u32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverSnapshot {
    pub balls_bowled: u8,
    pub over_number: u32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CommentarySnapshot {
    /// Over label such as `4.3`.
    pub ball: String,
    pub run: u32,
    pub text: String,
}

impl From<&Batter> for BatterSnapshot {
    fn from(value: &Batter) -> Self {
        Self {
            name: value.name.clone(),
            runs: value.runs,
            balls_faced: value.balls_faced,
            fours: value.fours,
            sixes: value.sixes,
        }
    }
}

impl From<&Bowler> for BowlerSnapshot {
    fn from(value: &Bowler) -> Self {
        Self {
            name: value.name.clone(),
            balls_bowled: value.balls_bowled,
            overs_bowled: value.overs_bowled,
            runs_conceded: value.runs_conceded,
            wickets_taken: value.wickets_taken,
        }
    }
}

impl From<&Team> for TeamSnapshot {
    fn from(value: &Team) -> Self {
        Self {
            name: value.name.clone(),
            total_runs: value.total_runs,
            extras: ExtrasSnapshot {
                wide: value.extras.wide,
                no_ball: value.extras.no_ball,
            },
            wickets_lost: value.wickets_lost,
            overs: value.overs,
            batters: BattersSnapshot {
                striker: (&value.batters.striker).into(),
                non_striker: (&value.batters.non_striker).into(),
            },
            bowlers: BowlersSnapshot {
                bowler: (&value.bowlers.bowler).into(),
                non_bowler: (&value.bowlers.non_bowler).into(),
            },
        }
    }
}

impl From<&CommentaryEntry> for CommentarySnapshot {
    fn from(value: &CommentaryEntry) -> Self {
        Self {
            ball: value.ball.clone(),
            run: value.run,
            text: value.text.clone(),
        }
    }
}

impl From<&Match> for MatchSnapshot {
    fn from(value: &Match) -> Self {
        Self {
            id: value.id,
            team_a: (&value.team_a).into(),
            team_b: (&value.team_b).into(),
            current_batting_team: match value.current_batting_team {
                Side::TeamA => BattingSide::TeamA,
                Side::TeamB => BattingSide::TeamB,
            },
            current_over: OverSnapshot {
                balls_bowled: value.current_over.balls_bowled,
                over_number: value.current_over.over_number,
            },
            innings: value.innings.number(),
            is_over: value.is_over,
            commentary: value.commentary.iter().map(Into::into).collect(),
            result: value.result.as_ref().map(ToString::to_string),
            created_at: format_system_time(value.created_at),
            updated_at: format_system_time(value.updated_at),
        }
    }
}
