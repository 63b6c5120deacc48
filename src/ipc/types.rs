use serde::Deserialize;

use crate::board::SeatBoard;
use crate::roulette::Roulette;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub board: SeatBoard,
    pub roulette: Roulette,
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            board: SeatBoard::new(),
            roulette: Roulette::new(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
