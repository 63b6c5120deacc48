use crate::board::SEAT_COUNT;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::board_json;
use crate::ipc::types::{AppState, Request};
use serde_json::json;

struct HandlerErr {
    code: &'static str,
    message: String,
    details: Option<serde_json::Value>,
}

impl HandlerErr {
    fn response(self, id: &str) -> serde_json::Value {
        err(id, self.code, self.message, self.details)
    }
}

/// Board mutations are rejected while a spin is running; otherwise an edit
/// could invalidate the pool snapshot mid-reveal.
fn require_not_spinning(state: &AppState) -> Result<(), HandlerErr> {
    if state.roulette.is_spinning() {
        return Err(HandlerErr {
            code: "spin_in_progress",
            message: "board is locked until the current spin settles".to_string(),
            details: None,
        });
    }
    Ok(())
}

fn get_seat_index(params: &serde_json::Value) -> Result<usize, HandlerErr> {
    let raw = params.get("index").and_then(|v| v.as_i64()).ok_or_else(|| HandlerErr {
        code: "bad_params",
        message: "missing params.index".to_string(),
        details: None,
    })?;
    if !(0..SEAT_COUNT as i64).contains(&raw) {
        return Err(HandlerErr {
            code: "bad_params",
            message: format!("index must be in 0..{}", SEAT_COUNT),
            details: Some(json!({ "index": raw })),
        });
    }
    Ok(raw as usize)
}

fn handle_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, board_json(&state.board))
}

fn seat_set(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    require_not_spinning(state)?;
    let index = get_seat_index(params)?;
    let name = params
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| HandlerErr {
            code: "bad_params",
            message: "missing params.name".to_string(),
            details: None,
        })?;
    let number = params.get("number").and_then(|v| v.as_str()).unwrap_or("");

    state.board.set_seat(index, number, name);
    Ok(board_json(&state.board))
}

fn board_shuffle(state: &mut AppState) -> Result<serde_json::Value, HandlerErr> {
    require_not_spinning(state)?;
    let mut rng = rand::rng();
    state.board.shuffle(&mut rng);
    Ok(board_json(&state.board))
}

fn board_reset(state: &mut AppState) -> Result<serde_json::Value, HandlerErr> {
    require_not_spinning(state)?;
    state.board.reset();
    Ok(board_json(&state.board))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let resp = match req.method.as_str() {
        "board.get" => handle_get(state, req),
        "seat.set" => match seat_set(state, &req.params) {
            Ok(result) => ok(&req.id, result),
            Err(e) => e.response(&req.id),
        },
        "board.shuffle" => match board_shuffle(state) {
            Ok(result) => ok(&req.id, result),
            Err(e) => e.response(&req.id),
        },
        "board.reset" => match board_reset(state) {
            Ok(result) => ok(&req.id, result),
            Err(e) => e.response(&req.id),
        },
        _ => return None,
    };
    Some(resp)
}
