use crate::ipc::error::{err, ok};
use crate::ipc::helpers::student_json;
use crate::ipc::types::{AppState, Request};
use crate::roulette::{RouletteError, RouletteStatus, TickOutcome};
use serde_json::json;

struct HandlerErr {
    code: &'static str,
    message: String,
}

impl HandlerErr {
    fn response(self, id: &str) -> serde_json::Value {
        err(id, self.code, self.message, None)
    }
}

fn map_err(e: RouletteError) -> HandlerErr {
    match e {
        RouletteError::EmptyPool => HandlerErr {
            code: "no_candidates",
            message: "no students are seated".to_string(),
        },
        RouletteError::AlreadySpinning => HandlerErr {
            code: "spin_in_progress",
            message: "a spin is already running".to_string(),
        },
        RouletteError::NotSpinning => HandlerErr {
            code: "not_spinning",
            message: "no spin is running".to_string(),
        },
    }
}

fn roulette_start(state: &mut AppState) -> Result<serde_json::Value, HandlerErr> {
    let pool = state.board.occupied();
    let candidates = pool.len();
    state.roulette.start(pool).map_err(map_err)?;
    Ok(json!({
        "state": "spinning",
        "candidates": candidates,
    }))
}

fn roulette_tick(state: &mut AppState) -> Result<serde_json::Value, HandlerErr> {
    let mut rng = rand::rng();
    match state.roulette.tick(&mut rng).map_err(map_err)? {
        TickOutcome::Flicker { display, delay_ms } => Ok(json!({
            "state": "spinning",
            "display": display,
            "delayMs": delay_ms,
        })),
        TickOutcome::Settled { winner } => Ok(json!({
            "state": "settled",
            "winner": student_json(&winner),
        })),
    }
}

fn roulette_state(state: &AppState) -> serde_json::Value {
    match state.roulette.status() {
        RouletteStatus::Idle => json!({ "state": "idle" }),
        RouletteStatus::Spinning { tick, display } => json!({
            "state": "spinning",
            "tick": tick,
            "display": display,
        }),
        RouletteStatus::Settled { winner } => json!({
            "state": "settled",
            "winner": student_json(winner),
        }),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let resp = match req.method.as_str() {
        "roulette.start" => match roulette_start(state) {
            Ok(result) => ok(&req.id, result),
            Err(e) => e.response(&req.id),
        },
        "roulette.tick" => match roulette_tick(state) {
            Ok(result) => ok(&req.id, result),
            Err(e) => e.response(&req.id),
        },
        "roulette.state" => ok(&req.id, roulette_state(state)),
        _ => return None,
    };
    Some(resp)
}
