use wasm_bindgen::prelude::*;

pub mod api;
mod console;
pub mod game;
pub mod grid;
pub mod input;
pub mod storage;
pub mod types;

pub use api::Game2048;
pub use game::{GameInstance, apply_move, new_game};
pub use grid::Grid;
pub use types::{Direction, GameState, GameView, MoveOutcome};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
