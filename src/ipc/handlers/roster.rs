use std::path::PathBuf;

use crate::ipc::error::{err, ok};
use crate::ipc::helpers::board_json;
use crate::ipc::types::{AppState, Request};
use crate::sheet;
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

fn get_path(params: &serde_json::Value) -> Result<PathBuf, HandlerErr> {
    params
        .get("path")
        .and_then(|v| v.as_str())
        .map(PathBuf::from)
        .ok_or_else(|| HandlerErr {
            code: "bad_params",
            message: "missing params.path".to_string(),
            details: None,
        })
}

/// Replace the whole board from a roster CSV file. Row order maps
/// positionally onto seat indices; anything past 32 rows is ignored.
fn roster_import(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    if state.roulette.is_spinning() {
        return Err(HandlerErr {
            code: "spin_in_progress",
            message: "board is locked until the current spin settles".to_string(),
            details: None,
        });
    }
    let path = get_path(params)?;
    let text = std::fs::read_to_string(&path).map_err(|e| HandlerErr {
        code: "file_read_failed",
        message: e.to_string(),
        details: Some(json!({ "path": path.to_string_lossy() })),
    })?;
    let rows = sheet::parse_roster(&text).map_err(|e| HandlerErr {
        code: "bad_roster",
        message: e.to_string(),
        details: None,
    })?;

    let (loaded, skipped) = state.board.bulk_load(&rows);
    let mut result = board_json(&state.board);
    result["loaded"] = json!(loaded);
    result["skipped"] = json!(skipped);
    result["discarded"] = json!(rows.len().saturating_sub(crate::board::SEAT_COUNT));
    Ok(result)
}

/// Write the fill-in roster template so an instructor can complete it and
/// import it back.
fn roster_template(params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let path = get_path(params)?;
    let text = sheet::template_csv();
    std::fs::write(&path, &text).map_err(|e| HandlerErr {
        code: "file_write_failed",
        message: e.to_string(),
        details: Some(json!({ "path": path.to_string_lossy() })),
    })?;
    Ok(json!({
        "path": path.to_string_lossy(),
        "rows": text.lines().count() - 1,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let resp = match req.method.as_str() {
        "roster.import" => match roster_import(state, &req.params) {
            Ok(result) => ok(&req.id, result),
            Err(e) => e.response(&req.id),
        },
        "roster.template" => match roster_template(&req.params) {
            Ok(result) => ok(&req.id, result),
            Err(e) => e.response(&req.id),
        },
        _ => return None,
    };
    Some(resp)
}
