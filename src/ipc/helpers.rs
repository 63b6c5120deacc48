use serde_json::json;

use crate::board::{SeatBoard, Student};

pub fn student_json(student: &Student) -> serde_json::Value {
    json!({
        "id": student.id,
        "number": student.number,
        "name": student.name,
    })
}

/// Full board payload: one entry per seat, in index order, with `null` for
/// empty seats. Every board-mutating method returns this so the frontend
/// never has to diff.
pub fn board_json(board: &SeatBoard) -> serde_json::Value {
    let seats: Vec<serde_json::Value> = board
        .seats()
        .iter()
        .map(|seat| match seat {
            Some(s) => student_json(s),
            None => serde_json::Value::Null,
        })
        .collect();
    json!({
        "seats": seats,
        "occupiedCount": board.occupied_count(),
    })
}
