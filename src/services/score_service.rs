use tracing::info;

use crate::{
    dao::models::MatchEntity,
    dto::{
        ball::{BallRequest, BallResponse},
        scoreboard::MatchSnapshot,
    },
    error::ServiceError,
    services::broadcast::broadcast_score_update,
    state::{
        SharedState,
        cricket::Match,
        scoring::{BallEvent, BallOutcome, apply_ball},
    },
};

/// Record one ball against the live match, persist the result and notify viewers.
///
/// A new match is bootstrapped from the configured rosters when none is stored or the
/// stored one is finished.
pub async fn submit_ball(
    state: &SharedState,
    request: &BallRequest,
) -> Result<BallResponse, ServiceError> {
    let ball = BallEvent::from(request);
    let rules = state.match_rules();
    let config = state.config();

    state
        .run_transition(|| async move {
            let store = state.require_match_store().await?;

            let current = match store.load_current_match().await? {
                Some(entity) if !entity.is_over => Match::try_from(entity)?,
                _ => {
                    let game = Match::bootstrap(config.rosters())?;
                    info!(
                        match_id = %game.id,
                        team_a = %game.team_a.name,
                        team_b = %game.team_b.name,
                        "bootstrapped new match"
                    );
                    game
                }
            };

            let BallOutcome { mut game, result } = apply_ball(&current, &ball, &rules)?;
            game.touch();
            store.save_current_match(MatchEntity::from(&game)).await?;

            if game.innings != current.innings {
                info!(
                    match_id = %game.id,
                    target = game.team_a.total_runs + 1,
                    "first innings closed"
                );
            }

            broadcast_score_update(state, &game);

            Ok(match result {
                Some(result) => {
                    info!(match_id = %game.id, result = %result, "match finished");
                    BallResponse::Finished {
                        match_over: result.to_string(),
                    }
                }
                None => BallResponse::Recorded {
                    success: true,
                    game: Box::new(MatchSnapshot::from(&game)),
                },
            })
        })
        .await
}

/// Snapshot of the stored match, finished or not.
pub async fn current_match(state: &SharedState) -> Result<MatchSnapshot, ServiceError> {
    let store = state.require_match_store().await?;
    let entity = store
        .load_current_match()
        .await?
        .ok_or_else(|| ServiceError::NotFound("no match has been started".into()))?;
    let game = Match::try_from(entity)?;
    Ok(MatchSnapshot::from(&game))
}
