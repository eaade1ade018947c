use std::str::FromStr;

use wasm_bindgen::prelude::*;
use web_time::{SystemTime, UNIX_EPOCH};

use crate::game::GameInstance;
use crate::input::{direction_from_key, direction_from_swipe};
use crate::storage::default_store;
use crate::types::Direction;

/// JS-facing game session. Every state-returning method yields a `GameView` object.
#[wasm_bindgen]
pub struct Game2048 {
    inner: GameInstance,
}

#[wasm_bindgen]
impl Game2048 {
    /// Starts a game seeded from the wall clock.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::with_seed(clock_seed())
    }

    #[wasm_bindgen(js_name = withSeed)]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            inner: GameInstance::new(seed, default_store()),
        }
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.to_view()).map_err(JsValue::from)
    }

    /// Accepts `"up" | "down" | "left" | "right"`.
    #[wasm_bindgen(js_name = "move")]
    pub fn move_tiles(&mut self, direction: &str) -> Result<JsValue, JsValue> {
        let direction = Direction::from_str(direction).map_err(|err| JsValue::from_str(&err))?;
        self.inner.play(direction);
        self.state()
    }

    /// Returns `true` when `key` is an arrow key and was applied.
    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(&mut self, key: &str) -> bool {
        self.play_optional(direction_from_key(key))
    }

    /// Returns `true` when the swipe was long enough to count as a move.
    #[wasm_bindgen(js_name = handleSwipe)]
    pub fn handle_swipe(&mut self, dx: f64, dy: f64) -> bool {
        self.play_optional(direction_from_swipe(dx, dy))
    }

    #[wasm_bindgen(js_name = newGame)]
    pub fn new_game(&mut self) -> Result<JsValue, JsValue> {
        self.inner.reset();
        self.state()
    }

    #[wasm_bindgen(js_name = setKeepPlaying)]
    pub fn set_keep_playing(&mut self, keep_playing: bool) {
        self.inner.keep_playing = keep_playing;
    }

    #[wasm_bindgen(js_name = highScore)]
    pub fn high_score(&self) -> u32 {
        self.inner.high_score()
    }

    fn play_optional(&mut self, direction: Option<Direction>) -> bool {
        match direction {
            Some(direction) => {
                self.inner.play(direction);
                true
            }
            None => false,
        }
    }
}

impl Default for Game2048 {
    fn default() -> Self {
        Self::new()
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(0)
}
