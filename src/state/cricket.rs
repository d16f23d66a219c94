use std::{fmt, time::SystemTime};

use thiserror::Error;
use uuid::Uuid;

use crate::dao::models::{
    BatterEntity, BattersEntity, BattingSideEntity, BowlerEntity, BowlersEntity, CommentaryEntity,
    ExtrasEntity, MarginEntity, MatchEntity, MatchResultEntity, OverEntity, TeamEntity,
};

/// Number of legal deliveries in one over.
pub const BALLS_PER_OVER: u8 = 6;
/// Wickets that end an innings (all out).
pub const MAX_WICKETS: u8 = 10;

/// Reasons a match or team cannot take part in a scoring transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    /// The team has no striker/non-striker pair.
    #[error("team `{team}` has no batters at the crease")]
    MissingBatters { team: String },
    /// The team has no bowler/non-bowler pair.
    #[error("team `{team}` has no bowlers assigned")]
    MissingBowlers { team: String },
    /// A roster entry was empty once trimmed.
    #[error("roster field `{field}` must not be blank")]
    BlankRosterField { field: &'static str },
    /// Persisted innings counter outside of `1..=2`.
    #[error("innings must be 1 or 2 (got {0})")]
    InvalidInnings(u8),
    /// Persisted ball counter outside of the current over.
    #[error("balls bowled in the current over must be below {BALLS_PER_OVER} (got {0})")]
    InvalidBallCount(u8),
    /// Persisted wicket counter above the all-out limit.
    #[error("team `{team}` cannot lose more than {MAX_WICKETS} wickets (got {wickets})")]
    InvalidWickets { team: String, wickets: u8 },
    /// Team A bats the first innings and team B the second; any other pairing is corrupt.
    #[error("innings {innings} cannot be batted by {team}")]
    InningsOutOfOrder { innings: u8, team: &'static str },
    /// A side has batted more overs than the format allows.
    #[error("team `{team}` has batted {overs} overs, the limit is {limit}")]
    OversExceeded { team: String, overs: u32, limit: u32 },
    /// The transition was requested against a finished match.
    #[error("match is already over")]
    MatchFinished,
}

/// Which of the two teams is currently batting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    TeamA,
    TeamB,
}

/// Innings of the single limited-overs match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Innings {
    First,
    Second,
}

impl Innings {
    /// Innings number as shown on the scoreboard (1 or 2).
    pub fn number(self) -> u8 {
        match self {
            Innings::First => 1,
            Innings::Second => 2,
        }
    }
}

impl TryFrom<u8> for Innings {
    type Error = SetupError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Innings::First),
            2 => Ok(Innings::Second),
            other => Err(SetupError::InvalidInnings(other)),
        }
    }
}

/// Batting statistics of a player at the crease.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batter {
    pub name: String,
    pub runs: u32,
    pub balls_faced: u32,
    pub fours: u32,
    pub sixes: u32,
}

impl Batter {
    /// A batter who has not faced a ball yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            runs: 0,
            balls_faced: 0,
            fours: 0,
            sixes: 0,
        }
    }

    /// Zero the statistics while keeping the slot (and name) in place.
    pub fn reset_stats(&mut self) {
        self.runs = 0;
        self.balls_faced = 0;
        self.fours = 0;
        self.sixes = 0;
    }
}

/// Bowling statistics of a player of the fielding side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bowler {
    pub name: String,
    /// Legal balls delivered in the current over (0..=5).
    pub balls_bowled: u8,
    pub overs_bowled: u32,
    pub runs_conceded: u32,
    pub wickets_taken: u32,
}

impl Bowler {
    /// A bowler who has not delivered a ball yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            balls_bowled: 0,
            overs_bowled: 0,
            runs_conceded: 0,
            wickets_taken: 0,
        }
    }

    /// Close the current over for this bowler.
    pub fn complete_over(&mut self) {
        self.balls_bowled = 0;
        self.overs_bowled += 1;
    }
}

/// The two batters currently at the crease.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batters {
    pub striker: Batter,
    pub non_striker: Batter,
}

impl Batters {
    /// Swap striker and non-striker.
    pub fn rotate_strike(&mut self) {
        std::mem::swap(&mut self.striker, &mut self.non_striker);
    }
}

/// The active bowler and the one waiting for the next over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bowlers {
    pub bowler: Bowler,
    pub non_bowler: Bowler,
}

impl Bowlers {
    /// Hand the ball to the other bowler.
    pub fn change_bowler(&mut self) {
        std::mem::swap(&mut self.bowler, &mut self.non_bowler);
    }
}

/// Extra runs conceded by the opposition while this team batted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Extras {
    pub wide: u32,
    pub no_ball: u32,
}

/// Score card of one team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub name: String,
    pub total_runs: u32,
    pub extras: Extras,
    pub wickets_lost: u8,
    /// Completed overs while batting.
    pub overs: u32,
    pub batters: Batters,
    pub bowlers: Bowlers,
}

/// Names required to put a team on the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRoster {
    pub name: String,
    pub striker: String,
    pub non_striker: String,
    pub bowler: String,
    pub non_bowler: String,
}

impl Team {
    /// Build a team with zeroed statistics from its roster.
    pub fn from_roster(roster: &TeamRoster) -> Result<Self, SetupError> {
        let name = non_blank(&roster.name, "name")?;
        let striker = non_blank(&roster.striker, "striker")?;
        let non_striker = non_blank(&roster.non_striker, "non_striker")?;
        let bowler = non_blank(&roster.bowler, "bowler")?;
        let non_bowler = non_blank(&roster.non_bowler, "non_bowler")?;

        Ok(Self {
            name,
            total_runs: 0,
            extras: Extras::default(),
            wickets_lost: 0,
            overs: 0,
            batters: Batters {
                striker: Batter::new(striker),
                non_striker: Batter::new(non_striker),
            },
            bowlers: Bowlers {
                bowler: Bowler::new(bowler),
                non_bowler: Bowler::new(non_bowler),
            },
        })
    }

    /// Whether the team has lost every wicket.
    pub fn is_all_out(&self) -> bool {
        self.wickets_lost >= MAX_WICKETS
    }
}

fn non_blank(value: &str, field: &'static str) -> Result<String, SetupError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SetupError::BlankRosterField { field });
    }
    Ok(trimmed.to_owned())
}

/// Position inside the current innings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Over {
    /// Legal balls of the over delivered so far (0..=5).
    pub balls_bowled: u8,
    /// Completed overs in the current innings.
    pub over_number: u32,
}

impl Over {
    /// Scoreboard label such as `3.2`.
    pub fn label(&self) -> String {
        format!("{}.{}", self.over_number, self.balls_bowled)
    }
}

/// One line of ball-by-ball commentary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentaryEntry {
    pub ball: String,
    pub run: u32,
    pub text: String,
}

/// How a decided match was won.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Margin {
    /// Chasing side reached the higher total with wickets in hand.
    Wickets(u8),
    /// Defending side kept the chase below its total.
    Runs(u32),
}

/// Outcome of a finished match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    Won { winner: String, margin: Margin },
    Tied,
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchResult::Won {
                winner,
                margin: Margin::Wickets(count),
            } => write!(f, "{winner} won by {count} {}", plural(*count as u32, "wicket")),
            MatchResult::Won {
                winner,
                margin: Margin::Runs(count),
            } => write!(f, "{winner} won by {count} {}", plural(*count, "run")),
            MatchResult::Tied => f.write_str("Match tied"),
        }
    }
}

fn plural(count: u32, unit: &str) -> String {
    if count == 1 {
        unit.to_owned()
    } else {
        format!("{unit}s")
    }
}

/// Authoritative state of the single live match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub id: Uuid,
    pub team_a: Team,
    pub team_b: Team,
    pub current_batting_team: Side,
    pub current_over: Over,
    pub innings: Innings,
    pub is_over: bool,
    pub commentary: Vec<CommentaryEntry>,
    /// Decided result, present once `is_over` is set.
    pub result: Option<MatchResult>,
    pub created_at: SystemTime,
    pub updated_at: SystemTime,
}

impl Match {
    /// Start a fresh match: first innings, team A batting.
    pub fn new(team_a: Team, team_b: Team) -> Self {
        let now = SystemTime::now();
        Self {
            id: Uuid::new_v4(),
            team_a,
            team_b,
            current_batting_team: Side::TeamA,
            current_over: Over::default(),
            innings: Innings::First,
            is_over: false,
            commentary: Vec::new(),
            result: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Build both teams from their rosters and start a match between them.
    pub fn bootstrap(rosters: &[TeamRoster; 2]) -> Result<Self, SetupError> {
        let team_a = Team::from_roster(&rosters[0])?;
        let team_b = Team::from_roster(&rosters[1])?;
        Ok(Self::new(team_a, team_b))
    }

    /// Team currently batting.
    pub fn batting_team(&self) -> &Team {
        match self.current_batting_team {
            Side::TeamA => &self.team_a,
            Side::TeamB => &self.team_b,
        }
    }

    /// Team currently bowling.
    pub fn bowling_team(&self) -> &Team {
        match self.current_batting_team {
            Side::TeamA => &self.team_b,
            Side::TeamB => &self.team_a,
        }
    }

    /// Mutable access to the (batting, bowling) pair.
    pub fn sides_mut(&mut self) -> (&mut Team, &mut Team) {
        match self.current_batting_team {
            Side::TeamA => (&mut self.team_a, &mut self.team_b),
            Side::TeamB => (&mut self.team_b, &mut self.team_a),
        }
    }

    fn with_consistent_innings(self) -> Result<Self, SetupError> {
        match (self.innings, self.current_batting_team) {
            (Innings::First, Side::TeamA) | (Innings::Second, Side::TeamB) => Ok(self),
            (innings, side) => Err(SetupError::InningsOutOfOrder {
                innings: innings.number(),
                team: match side {
                    Side::TeamA => "team A",
                    Side::TeamB => "team B",
                },
            }),
        }
    }

    /// Refresh the modification timestamp.
    pub fn touch(&mut self) {
        self.updated_at = SystemTime::now();
    }
}

impl From<&BatterEntity> for Batter {
    fn from(value: &BatterEntity) -> Self {
        Self {
            name: value.name.clone(),
            runs: value.runs,
            balls_faced: value.balls_faced,
            fours: value.fours,
            sixes: value.sixes,
        }
    }
}

impl From<&Batter> for BatterEntity {
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

impl From<&BowlerEntity> for Bowler {
    fn from(value: &BowlerEntity) -> Self {
        Self {
            name: value.name.clone(),
            balls_bowled: value.balls_bowled,
            overs_bowled: value.overs_bowled,
            runs_conceded: value.runs_conceded,
            wickets_taken: value.wickets_taken,
        }
    }
}

impl From<&Bowler> for BowlerEntity {
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

impl TryFrom<TeamEntity> for Team {
    type Error = SetupError;

    fn try_from(value: TeamEntity) -> Result<Self, Self::Error> {
        let batters = value
            .batters
            .as_ref()
            .map(|entity| Batters {
                striker: (&entity.striker).into(),
                non_striker: (&entity.non_striker).into(),
            })
            .ok_or_else(|| SetupError::MissingBatters {
                team: value.name.clone(),
            })?;
        let bowlers = value
            .bowlers
            .as_ref()
            .map(|entity| Bowlers {
                bowler: (&entity.bowler).into(),
                non_bowler: (&entity.non_bowler).into(),
            })
            .ok_or_else(|| SetupError::MissingBowlers {
                team: value.name.clone(),
            })?;

        if value.wickets_lost > MAX_WICKETS {
            return Err(SetupError::InvalidWickets {
                team: value.name,
                wickets: value.wickets_lost,
            });
        }

        Ok(Self {
            name: value.name,
            total_runs: value.total_runs,
            extras: Extras {
                wide: value.extras.wide,
                no_ball: value.extras.no_ball,
            },
            wickets_lost: value.wickets_lost,
            overs: value.overs,
            batters,
            bowlers,
        })
    }
}

impl From<&Team> for TeamEntity {
    fn from(value: &Team) -> Self {
        Self {
            name: value.name.clone(),
            total_runs: value.total_runs,
            extras: ExtrasEntity {
                wide: value.extras.wide,
                no_ball: value.extras.no_ball,
            },
            wickets_lost: value.wickets_lost,
            overs: value.overs,
            batters: Some(BattersEntity {
                striker: (&value.batters.striker).into(),
                non_striker: (&value.batters.non_striker).into(),
            }),
            bowlers: Some(BowlersEntity {
                bowler: (&value.bowlers.bowler).into(),
                non_bowler: (&value.bowlers.non_bowler).into(),
            }),
        }
    }
}

impl From<BattingSideEntity> for Side {
    fn from(value: BattingSideEntity) -> Self {
        match value {
            BattingSideEntity::TeamA => Side::TeamA,
            BattingSideEntity::TeamB => Side::TeamB,
        }
    }
}

impl From<Side> for BattingSideEntity {
    fn from(value: Side) -> Self {
        match value {
            Side::TeamA => BattingSideEntity::TeamA,
            Side::TeamB => BattingSideEntity::TeamB,
        }
    }
}

impl From<MatchResultEntity> for MatchResult {
    fn from(value: MatchResultEntity) -> Self {
        match value {
            MatchResultEntity::Won { winner, margin } => MatchResult::Won {
                winner,
                margin: match margin {
                    MarginEntity::Wickets(count) => Margin::Wickets(count),
                    MarginEntity::Runs(count) => Margin::Runs(count),
                },
            },
            MatchResultEntity::Tied => MatchResult::Tied,
        }
    }
}

impl From<&MatchResult> for MatchResultEntity {
    fn from(value: &MatchResult) -> Self {
        match value {
            MatchResult::Won { winner, margin } => MatchResultEntity::Won {
                winner: winner.clone(),
                margin: match margin {
                    Margin::Wickets(count) => MarginEntity::Wickets(*count),
                    Margin::Runs(count) => MarginEntity::Runs(*count),
                },
            },
            MatchResult::Tied => MatchResultEntity::Tied,
        }
    }
}

impl TryFrom<MatchEntity> for Match {
    type Error = SetupError;

    fn try_from(value: MatchEntity) -> Result<Self, Self::Error> {
        if value.current_over.balls_bowled >= BALLS_PER_OVER {
            return Err(SetupError::InvalidBallCount(value.current_over.balls_bowled));
        }

        Self {
            id: value.id,
            team_a: value.team_a.try_into()?,
            team_b: value.team_b.try_into()?,
            current_batting_team: value.current_batting_team.into(),
            current_over: Over {
                balls_bowled: value.current_over.balls_bowled,
                over_number: value.current_over.over_number,
            },
            innings: value.innings.try_into()?,
            is_over: value.is_over,
            commentary: value
                .commentary
                .into_iter()
                .map(|entry| CommentaryEntry {
                    ball: entry.ball,
                    run: entry.run,
                    text: entry.text,
                })
                .collect(),
            result: value.result.map(Into::into),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
        .with_consistent_innings()
    }
}

impl From<&Match> for MatchEntity {
    fn from(value: &Match) -> Self {
        Self {
            id: value.id,
            team_a: (&value.team_a).into(),
            team_b: (&value.team_b).into(),
            current_batting_team: value.current_batting_team.into(),
            current_over: OverEntity {
                balls_bowled: value.current_over.balls_bowled,
                over_number: value.current_over.over_number,
            },
            innings: value.innings.number(),
            is_over: value.is_over,
            commentary: value
                .commentary
                .iter()
                .map(|entry| CommentaryEntity {
                    ball: entry.ball.clone(),
                    run: entry.run,
                    text: entry.text.clone(),
                })
                .collect(),
            result: value.result.as_ref().map(Into::into),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
