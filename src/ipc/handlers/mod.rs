pub mod board;
pub mod core;
pub mod roster;
pub mod roulette;
