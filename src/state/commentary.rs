use crate::state::scoring::{BallEvent, Extra};

/// Human-readable description of a ball.
pub fn describe(ball: &BallEvent) -> String {
    if ball.is_wicket {
        return "Wicket fallen!".to_owned();
    }

    match ball.extras {
        Extra::Wide => "1 wide ball".to_owned(),
        Extra::NoBall => format!("No ball, {} runs", ball.run),
        Extra::None | Extra::Start => {
            let unit = if ball.run == 1 { "run" } else { "runs" };
            format!("{} {unit} to striker", ball.run)
        }
    }
}
