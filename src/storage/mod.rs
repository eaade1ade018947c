use std::cell::RefCell;
use std::rc::Rc;

use crate::console;

pub mod record;

/// localStorage key of the high score slot.
pub const HIGH_SCORE_KEY: &str = "2048-high-score";

/// A single persisted string slot.
pub trait ScoreStore {
    fn load(&self) -> Option<String>;
    fn save(&mut self, record: &str);
}

/// In-process slot. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: &str) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(record.to_string()))),
        }
    }

    pub fn record(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Option<String> {
        self.record()
    }

    fn save(&mut self, record: &str) {
        *self.slot.borrow_mut() = Some(record.to_string());
    }
}

/// Browser `localStorage` slot under `HIGH_SCORE_KEY`.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
mod local {
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen]
    extern "C" {
        #[wasm_bindgen(catch, js_namespace = localStorage, js_name = getItem)]
        pub(super) fn get_item(key: &str) -> Result<Option<String>, JsValue>;

        #[wasm_bindgen(catch, js_namespace = localStorage, js_name = setItem)]
        pub(super) fn set_item(key: &str, value: &str) -> Result<(), JsValue>;
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStorage {
    fn load(&self) -> Option<String> {
        match local::get_item(HIGH_SCORE_KEY) {
            Ok(value) => value,
            Err(err) => {
                console::warn(&format!("localStorage read failed: {err:?}"));
                None
            }
        }
    }

    fn save(&mut self, record: &str) {
        if let Err(err) = local::set_item(HIGH_SCORE_KEY, record) {
            console::warn(&format!("localStorage write failed: {err:?}"));
        }
    }
}

/// Store used by the JS-facing API: `localStorage` in the browser, memory elsewhere.
pub fn default_store() -> Box<dyn ScoreStore> {
    #[cfg(target_arch = "wasm32")]
    {
        Box::new(LocalStorage)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Box::new(MemoryStore::new())
    }
}

/// Best score seen across games, backed by a `ScoreStore`.
pub struct HighScore {
    best: u32,
    store: Box<dyn ScoreStore>,
}

impl HighScore {
    /// Reads the stored value. Missing or unreadable records count as 0.
    pub fn load(store: Box<dyn ScoreStore>) -> Self {
        let best = match store.load() {
            None => 0,
            Some(stored) => record::decode(&stored).unwrap_or_else(|err| {
                console::warn(&format!("ignoring stored high score: {err}"));
                0
            }),
        };

        Self { best, store }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Records `score` if it beats the best. Returns `true` when the store was written.
    pub fn observe(&mut self, score: u32) -> bool {
        if score <= self.best {
            return false;
        }

        self.best = score;
        self.store.save(&record::encode(score));
        true
    }
}
