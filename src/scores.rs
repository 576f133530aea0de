//! Best-score persistence
//!
//! A single integer, persisted to LocalStorage and updated monotonically:
//! it never decreases, and it is written back on every increase. Nothing
//! else about a session survives a reload.

use serde::{Deserialize, Serialize};

/// The persisted best score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct BestScore {
    pub score: u32,
}

impl BestScore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "portal_snake_best_score";

    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a session score in. Returns true when the best increased and
    /// should be written back.
    pub fn record(&mut self, score: u32) -> bool {
        if score > self.score {
            self.score = score;
            true
        } else {
            false
        }
    }

    /// Load the best score from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage
            && let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY)
            && let Ok(best) = serde_json::from_str::<BestScore>(&json)
        {
            log::info!("Loaded best score: {}", best.score);
            return best;
        }

        log::info!("No best score found, starting fresh");
        Self::new()
    }

    /// Save the best score to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage
            && let Ok(json) = serde_json::to_string(self)
        {
            let _ = storage.set_item(Self::STORAGE_KEY, &json);
            log::info!("Best score saved ({})", self.score);
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
