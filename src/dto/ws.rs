use serde::Serialize;
use utoipa::ToSchema;

use crate::dto::scoreboard::MatchSnapshot;

#[derive(Debug, Serialize, ToSchema)]
/// Messages pushed to viewer WebSocket clients.
#[serde(tag = "type")]
pub enum ViewerOutboundMessage {
    /// Latest state of the live match.
    #[serde(rename = "scoreUpdate")]
    ScoreUpdate {
        #[serde(rename = "match")]
        game: Box<MatchSnapshot>,
    },
}
