use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dto::scoreboard::MatchSnapshot,
    state::scoring::{BallEvent, Extra},
};

/// Extra attached to a submitted ball.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub enum ExtraInput {
    #[default]
    #[serde(rename = "")]
    None,
    #[serde(rename = "wide")]
    Wide,
    #[serde(rename = "noBall")]
    NoBall,
    /// Publishes the current match without scoring anything.
    #[serde(rename = "start")]
    Start,
}

impl From<ExtraInput> for Extra {
    fn from(value: ExtraInput) -> Self {
        match value {
            ExtraInput::None => Extra::None,
            ExtraInput::Wide => Extra::Wide,
            ExtraInput::NoBall => Extra::NoBall,
            ExtraInput::Start => Extra::Start,
        }
    }
}

/// Score update submitted by an authenticated scorer.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BallRequest {
    #[validate(range(max = 7))]
    pub run: u32,
    #[serde(default)]
    pub extras: ExtraInput,
    #[serde(default)]
    pub is_wicket: bool,
}

impl From<&BallRequest> for BallEvent {
    fn from(value: &BallRequest) -> Self {
        Self {
            run: value.run,
            extras: value.extras.into(),
            is_wicket: value.is_wicket,
        }
    }
}

/// Answer to a score update.
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum BallResponse {
    /// Ball recorded; the match goes on.
    Recorded {
        success: bool,
        #[serde(rename = "match")]
        game: Box<MatchSnapshot>,
    },
    /// This ball decided the match.
    Finished {
        #[serde(rename = "matchOver")]
        match_over: String,
    },
}
