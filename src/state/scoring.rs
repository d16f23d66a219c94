//! Ball-by-ball transition rules of the live match.
//!
//! [`apply_ball`] is a pure function: it never touches the match it is given and
//! returns the next state instead, so a failed transition leaves nothing half-applied.

use crate::state::{
    commentary,
    cricket::{
        BALLS_PER_OVER, CommentaryEntry, Innings, MAX_WICKETS, Margin, Match, MatchResult,
        SetupError, Side, Team,
    },
};

/// Kind of extra attached to a delivery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Extra {
    /// Legal delivery.
    #[default]
    None,
    Wide,
    NoBall,
    /// Display-only sentinel: bootstraps and republishes the match without recording a ball.
    Start,
}

/// One scoring event submitted by the scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BallEvent {
    /// Runs off the bat (or run between the wickets).
    pub run: u32,
    pub extras: Extra,
    pub is_wicket: bool,
}

impl BallEvent {
    /// Runs added to the batting total: wides and no-balls carry one extra run.
    pub fn total_runs(&self) -> u32 {
        match self.extras {
            Extra::Wide | Extra::NoBall => self.run + 1,
            Extra::None | Extra::Start => self.run,
        }
    }

    /// Whether the ball consumes one of the six deliveries of the over.
    pub fn is_legal_delivery(&self) -> bool {
        self.extras == Extra::None && !self.is_wicket
    }
}

/// Format rules applied to every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRules {
    /// Overs available to each side per innings.
    pub over_limit: u32,
}

/// Next match state, plus the result when this ball decided the match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BallOutcome {
    pub game: Match,
    pub result: Option<MatchResult>,
}

/// Apply a single ball to `current` and return the resulting state.
pub fn apply_ball(
    current: &Match,
    ball: &BallEvent,
    rules: &MatchRules,
) -> Result<BallOutcome, SetupError> {
    if current.is_over {
        return Err(SetupError::MatchFinished);
    }
    check_over_limit(current, rules)?;

    let mut next = current.clone();
    if ball.extras == Extra::Start {
        return Ok(BallOutcome {
            game: next,
            result: None,
        });
    }

    credit_ball(&mut next, ball);

    if ball.is_legal_delivery() {
        next.current_over.balls_bowled += 1;
        let (_, bowling) = next.sides_mut();
        bowling.bowlers.bowler.balls_bowled += 1;
    }

    if next.current_over.balls_bowled >= BALLS_PER_OVER {
        complete_over(&mut next);
    }

    let result = close_innings_if_done(&mut next, rules);

    next.commentary.push(CommentaryEntry {
        ball: next.current_over.label(),
        run: ball.run,
        text: commentary::describe(ball),
    });

    Ok(BallOutcome { game: next, result })
}

/// In an open match the batting side is still short of the limit, and the side that
/// already batted never went past it.
fn check_over_limit(game: &Match, rules: &MatchRules) -> Result<(), SetupError> {
    let batting = game.batting_team();
    let bowling = game.bowling_team();
    let offender = if batting.overs >= rules.over_limit {
        batting
    } else if bowling.overs > rules.over_limit {
        bowling
    } else {
        return Ok(());
    };
    Err(SetupError::OversExceeded {
        team: offender.name.clone(),
        overs: offender.overs,
        limit: rules.over_limit,
    })
}

fn credit_ball(game: &mut Match, ball: &BallEvent) {
    let (batting, bowling) = game.sides_mut();

    if ball.is_wicket {
        batting.wickets_lost = (batting.wickets_lost + 1).min(MAX_WICKETS);
        // The dismissed striker's slot is reused by the incoming batter.
        batting.batters.striker.reset_stats();
        bowling.bowlers.bowler.wickets_taken += 1;
        return;
    }

    let total_runs = ball.total_runs();
    batting.total_runs += total_runs;

    let striker = &mut batting.batters.striker;
    striker.runs += ball.run;
    match ball.extras {
        Extra::Wide => batting.extras.wide += 1,
        Extra::NoBall => batting.extras.no_ball += 1,
        Extra::None => striker.balls_faced += 1,
        Extra::Start => {}
    }
    match ball.run {
        4 => striker.fours += 1,
        6 => striker.sixes += 1,
        _ => {}
    }

    if ball.run % 2 == 1 {
        batting.batters.rotate_strike();
    }

    bowling.bowlers.bowler.runs_conceded += total_runs;
}

fn complete_over(game: &mut Match) {
    game.current_over.balls_bowled = 0;
    game.current_over.over_number += 1;

    let (batting, bowling) = game.sides_mut();
    batting.overs += 1;
    bowling.bowlers.bowler.complete_over();
    batting.batters.rotate_strike();
    bowling.bowlers.change_bowler();
}

fn close_innings_if_done(game: &mut Match, rules: &MatchRules) -> Option<MatchResult> {
    let batting = game.batting_team();
    if !batting.is_all_out() && batting.overs < rules.over_limit {
        return None;
    }

    match (game.innings, game.current_batting_team) {
        (Innings::Second, _) => {
            let result = decide(&game.team_a, &game.team_b);
            game.is_over = true;
            game.result = Some(result.clone());
            Some(result)
        }
        (Innings::First, _) => {
            game.current_batting_team = Side::TeamB;
            game.innings = Innings::Second;
            game.current_over = Default::default();
            None
        }
    }
}

/// Compare the first-innings total of `defending` with the chase of `chasing`.
fn decide(defending: &Team, chasing: &Team) -> MatchResult {
    if chasing.total_runs > defending.total_runs {
        MatchResult::Won {
            winner: chasing.name.clone(),
            margin: Margin::Wickets(MAX_WICKETS - chasing.wickets_lost),
        }
    } else if defending.total_runs > chasing.total_runs {
        MatchResult::Won {
            winner: defending.name.clone(),
            margin: Margin::Runs(defending.total_runs - chasing.total_runs),
        }
    } else {
        MatchResult::Tied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::cricket::{Over, TeamRoster};

    const RULES: MatchRules = MatchRules { over_limit: 20 };

    fn roster(name: &str) -> TeamRoster {
        TeamRoster {
            name: name.into(),
            striker: format!("{name}-1"),
            non_striker: format!("{name}-2"),
            bowler: format!("{name}-bowler"),
            non_bowler: format!("{name}-change"),
        }
    }

    fn fresh() -> Match {
        Match::bootstrap(&[roster("Lions"), roster("Tigers")]).unwrap()
    }

    fn legal(run: u32) -> BallEvent {
        BallEvent {
            run,
            extras: Extra::None,
            is_wicket: false,
        }
    }

    fn extra(run: u32, extras: Extra) -> BallEvent {
        BallEvent {
            run,
            extras,
            is_wicket: false,
        }
    }

    fn wicket() -> BallEvent {
        BallEvent {
            run: 0,
            extras: Extra::None,
            is_wicket: true,
        }
    }

    fn play(game: Match, balls: &[BallEvent], rules: &MatchRules) -> BallOutcome {
        let mut outcome = BallOutcome {
            game,
            result: None,
        };
        for ball in balls {
            outcome = apply_ball(&outcome.game, ball, rules).unwrap();
        }
        outcome
    }

    #[test]
    fn boundary_four_credits_striker_without_rotation() {
        let game = fresh();
        let next = apply_ball(&game, &legal(4), &RULES).unwrap().game;

        let striker = &next.team_a.batters.striker;
        assert_eq!(striker.name, "Lions-1");
        assert_eq!(striker.runs, 4);
        assert_eq!(striker.fours, 1);
        assert_eq!(striker.balls_faced, 1);
        assert_eq!(next.team_a.total_runs, 4);
        assert_eq!(next.current_over.balls_bowled, 1);
        assert_eq!(next.team_b.bowlers.bowler.balls_bowled, 1);
        assert_eq!(next.team_b.bowlers.bowler.runs_conceded, 4);

        let entry = next.commentary.last().unwrap();
        assert_eq!(entry.ball, "0.1");
        assert_eq!(entry.run, 4);
        assert_eq!(entry.text, "4 runs to striker");
    }

    #[test]
    fn six_counts_as_a_six() {
        let next = apply_ball(&fresh(), &legal(6), &RULES).unwrap().game;
        assert_eq!(next.team_a.batters.striker.sixes, 1);
        assert_eq!(next.team_a.batters.striker.fours, 0);
    }

    #[test]
    fn odd_runs_swap_strike_exactly_once() {
        for run in [1, 3, 5] {
            let next = apply_ball(&fresh(), &legal(run), &RULES).unwrap().game;
            let batters = &next.team_a.batters;
            assert_eq!(batters.striker.name, "Lions-2", "run {run}");
            assert_eq!(batters.non_striker.name, "Lions-1", "run {run}");
            assert_eq!(batters.non_striker.runs, run);
        }
    }

    #[test]
    fn wide_adds_one_extra_without_consuming_a_ball() {
        let game = fresh();
        let next = apply_ball(&game, &extra(0, Extra::Wide), &RULES).unwrap().game;

        assert_eq!(next.team_a.total_runs, 1);
        assert_eq!(next.team_a.extras.wide, 1);
        assert_eq!(next.team_a.batters.striker.balls_faced, 0);
        assert_eq!(next.current_over, Over::default());
        assert_eq!(next.team_b.bowlers.bowler.balls_bowled, 0);
        assert_eq!(next.team_b.bowlers.bowler.runs_conceded, 1);
        assert_eq!(next.commentary.last().unwrap().text, "1 wide ball");
    }

    #[test]
    fn no_ball_with_odd_runs_rotates_strike_but_not_the_over() {
        let next = apply_ball(&fresh(), &extra(1, Extra::NoBall), &RULES)
            .unwrap()
            .game;

        assert_eq!(next.team_a.total_runs, 2);
        assert_eq!(next.team_a.extras.no_ball, 1);
        assert_eq!(next.team_a.batters.striker.name, "Lions-2");
        assert_eq!(next.current_over.balls_bowled, 0);
        assert_eq!(next.team_b.bowlers.bowler.balls_bowled, 0);
        assert_eq!(next.commentary.last().unwrap().text, "No ball, 1 runs");
    }

    #[test]
    fn total_runs_include_the_extra_only_for_wides_and_no_balls() {
        assert_eq!(legal(3).total_runs(), 3);
        assert_eq!(extra(3, Extra::Wide).total_runs(), 4);
        assert_eq!(extra(3, Extra::NoBall).total_runs(), 4);
    }

    #[test]
    fn wicket_zeroes_striker_and_credits_bowler_without_counting_the_ball() {
        let game = play(fresh(), &[legal(4), legal(2)], &RULES).game;
        let next = apply_ball(
            &game,
            &BallEvent {
                run: 0,
                extras: Extra::NoBall,
                is_wicket: true,
            },
            &RULES,
        )
        .unwrap()
        .game;

        let team = &next.team_a;
        assert_eq!(team.wickets_lost, 1);
        assert_eq!(team.batters.striker.name, "Lions-1");
        assert_eq!(team.batters.striker.runs, 0);
        assert_eq!(team.batters.striker.balls_faced, 0);
        assert_eq!(team.batters.striker.fours, 0);
        assert_eq!(team.total_runs, 6);
        assert_eq!(team.extras.no_ball, 0);
        assert_eq!(next.team_b.bowlers.bowler.wickets_taken, 1);
        assert_eq!(next.current_over.balls_bowled, 2);
        assert_eq!(next.commentary.last().unwrap().text, "Wicket fallen!");
    }

    #[test]
    fn six_legal_balls_complete_the_over() {
        let outcome = play(fresh(), &[legal(0); 6], &RULES);
        let next = outcome.game;

        assert_eq!(next.current_over, Over {
            balls_bowled: 0,
            over_number: 1
        });
        assert_eq!(next.team_a.overs, 1);
        assert_eq!(next.team_a.batters.striker.name, "Lions-2");
        assert_eq!(next.team_a.batters.non_striker.name, "Lions-1");
        assert_eq!(next.team_b.bowlers.bowler.name, "Tigers-change");
        let finished_bowler = &next.team_b.bowlers.non_bowler;
        assert_eq!(finished_bowler.name, "Tigers-bowler");
        assert_eq!(finished_bowler.balls_bowled, 0);
        assert_eq!(finished_bowler.overs_bowled, 1);
        assert_eq!(next.commentary.last().unwrap().ball, "1.0");
    }

    #[test]
    fn single_off_the_last_ball_keeps_the_striker_on_strike() {
        let mut balls = vec![legal(0); 5];
        balls.push(legal(1));
        let next = play(fresh(), &balls, &RULES).game;

        // Odd-run swap composed with the end-of-over swap is the identity.
        let batters = &next.team_a.batters;
        assert_eq!(batters.striker.name, "Lions-1");
        assert_eq!(batters.striker.runs, 1);
        assert_eq!(batters.non_striker.name, "Lions-2");
        assert_eq!(next.current_over.over_number, 1);
        assert_eq!(next.current_over.balls_bowled, 0);
    }

    #[test]
    fn extras_do_not_complete_an_over() {
        let mut balls = vec![legal(0); 5];
        balls.extend([extra(0, Extra::Wide), extra(0, Extra::NoBall)]);
        let next = play(fresh(), &balls, &RULES).game;

        assert_eq!(next.current_over.balls_bowled, 5);
        assert_eq!(next.current_over.over_number, 0);
    }

    #[test]
    fn reaching_the_over_limit_hands_the_bat_to_team_b() {
        let rules = MatchRules { over_limit: 1 };
        let outcome = play(fresh(), &[legal(2); 6], &rules);
        let next = outcome.game;

        assert!(outcome.result.is_none());
        assert!(!next.is_over);
        assert_eq!(next.innings, Innings::Second);
        assert_eq!(next.current_batting_team, Side::TeamB);
        assert_eq!(next.current_over, Over::default());
        assert_eq!(next.team_a.total_runs, 12);
        assert_eq!(next.batting_team().name, "Tigers");
        assert_eq!(next.commentary.last().unwrap().ball, "0.0");
    }

    #[test]
    fn ten_wickets_end_the_first_innings_but_not_the_match() {
        let outcome = play(fresh(), &[wicket(); 10], &RULES);

        assert!(outcome.result.is_none());
        assert!(!outcome.game.is_over);
        assert_eq!(outcome.game.team_a.wickets_lost, 10);
        assert_eq!(outcome.game.innings, Innings::Second);
        assert_eq!(outcome.game.current_batting_team, Side::TeamB);
    }

    #[test]
    fn innings_changes_only_once() {
        let rules = MatchRules { over_limit: 1 };
        let first = play(fresh(), &[legal(0); 6], &rules).game;
        let next = apply_ball(&first, &legal(1), &rules).unwrap().game;

        assert_eq!(next.innings, Innings::Second);
        assert_eq!(next.current_batting_team, Side::TeamB);
        assert_eq!(next.team_b.total_runs, 1);
        assert_eq!(next.current_over.balls_bowled, 1);
    }

    #[test]
    fn chasing_side_wins_by_wickets_in_hand() {
        let rules = MatchRules { over_limit: 1 };
        let mut chase = vec![wicket(), wicket()];
        chase.extend([legal(1); 6]);
        let first = play(fresh(), &[legal(0); 6], &rules).game;
        let outcome = play(first, &chase, &rules);

        let result = outcome.result.clone().unwrap();
        assert_eq!(
            result,
            MatchResult::Won {
                winner: "Tigers".into(),
                margin: Margin::Wickets(8)
            }
        );
        assert_eq!(result.to_string(), "Tigers won by 8 wickets");
        assert!(outcome.game.is_over);
        assert_eq!(outcome.game.result, Some(result));
    }

    #[test]
    fn defending_side_wins_by_runs() {
        let rules = MatchRules { over_limit: 1 };
        let first = play(fresh(), &[legal(4); 6], &rules).game;
        let outcome = play(first, &[legal(2); 6], &rules);

        assert_eq!(
            outcome.result.unwrap().to_string(),
            "Lions won by 12 runs"
        );
    }

    #[test]
    fn level_totals_are_a_tie() {
        let rules = MatchRules { over_limit: 1 };
        let first = play(fresh(), &[legal(2); 6], &rules).game;
        let outcome = play(first, &[legal(2); 6], &rules);

        assert_eq!(outcome.result, Some(MatchResult::Tied));
    }

    #[test]
    fn all_out_chase_ends_the_match() {
        let first = play(fresh(), &[legal(1), wicket(), wicket()], &RULES).game;
        let first = play(first, &[wicket(); 8], &RULES).game;
        assert_eq!(first.innings, Innings::Second);

        let outcome = play(first, &[wicket(); 10], &RULES);
        assert_eq!(outcome.result.unwrap().to_string(), "Lions won by 1 run");
        assert!(outcome.game.is_over);
    }

    #[test]
    fn finished_match_rejects_further_balls() {
        let rules = MatchRules { over_limit: 1 };
        let first = play(fresh(), &[legal(0); 6], &rules).game;
        let finished = play(first, &[legal(0); 6], &rules).game;

        assert_eq!(
            apply_ball(&finished, &legal(1), &rules),
            Err(SetupError::MatchFinished)
        );
    }

    #[test]
    fn start_sentinel_records_nothing() {
        let game = fresh();
        let outcome = apply_ball(&game, &extra(0, Extra::Start), &RULES).unwrap();

        assert_eq!(outcome.game, game);
        assert!(outcome.game.commentary.is_empty());
    }

    #[test]
    fn input_state_is_left_untouched() {
        let game = fresh();
        let before = game.clone();
        let _ = apply_ball(&game, &legal(3), &RULES).unwrap();

        assert_eq!(game, before);
    }

    #[test]
    fn batting_side_past_the_over_limit_is_rejected() {
        let mut game = fresh();
        game.team_a.overs = 5;

        assert_eq!(
            apply_ball(&game, &legal(1), &MatchRules { over_limit: 5 }),
            Err(SetupError::OversExceeded {
                team: "Lions".into(),
                overs: 5,
                limit: 5,
            })
        );
    }

    #[test]
    fn first_innings_may_end_exactly_on_the_limit() {
        let rules = MatchRules { over_limit: 1 };
        let chase = play(fresh(), &[legal(0); 6], &rules).game;
        assert_eq!(chase.team_a.overs, 1);
        assert!(apply_ball(&chase, &legal(1), &rules).is_ok());

        let mut corrupt = chase;
        corrupt.team_a.overs = 2;
        assert!(matches!(
            apply_ball(&corrupt, &legal(1), &rules),
            Err(SetupError::OversExceeded { overs: 2, .. })
        ));
    }
}
