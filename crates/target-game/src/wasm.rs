//! Browser bindings for the dartboard game.
//!
//! Everything crosses the boundary as JSON strings so the page script only
//! needs `JSON.parse`.

use wasm_bindgen::prelude::*;

use crate::action::{ActionArgs, Dispatcher};
use crate::board::{BoardConfig, ConfigError};
use crate::state::GameState;

#[cfg(feature = "console_error_panic_hook")]
pub use console_error_panic_hook::set_once as set_panic_hook;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();
}

#[wasm_bindgen]
pub struct TargetGame {
    state: GameState,
    dispatcher: Dispatcher,
}

impl TargetGame {
    pub fn from_json(config_json: &str, tally_capacity: usize, seed: u64) -> Result<Self, ConfigError> {
        let config = BoardConfig::from_json(config_json)?;
        Ok(Self {
            state: GameState::new(&config, tally_capacity, seed)?,
            dispatcher: Dispatcher::new(),
        })
    }
}

#[wasm_bindgen]
impl TargetGame {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, tally_capacity: usize, seed: u32) -> Result<TargetGame, JsValue> {
        Self::from_json(config_json, tally_capacity, u64::from(seed))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Apply an action by its `data-action` name.
    ///
    /// args_json: `{"x": .., "y": .., "segment": .., "editing": ..}`, all optional
    ///
    /// Returns JSON `{"event": {...}, "snapshot": {...}}` or `{"error": "..."}`.
    pub fn dispatch(&mut self, action: &str, args_json: &str) -> String {
        let args: ActionArgs = if args_json.trim().is_empty() {
            ActionArgs::default()
        } else {
            match serde_json::from_str(args_json) {
                Ok(args) => args,
                Err(e) => {
                    return serde_json::json!({
                        "error": format!("Failed to parse action arguments: {}", e)
                    })
                    .to_string();
                }
            }
        };

        match self.dispatcher.dispatch_named(&mut self.state, action, &args) {
            Ok(event) => serde_json::json!({
                "event": event,
                "snapshot": self.state.snapshot(),
            })
            .to_string(),
            Err(e) => serde_json::json!({ "error": e.to_string() }).to_string(),
        }
    }

    pub fn snapshot(&self) -> String {
        match serde_json::to_string(&self.state.snapshot()) {
            Ok(json) => json,
            Err(e) => serde_json::json!({
                "error": format!("Failed to serialize snapshot: {}", e)
            })
            .to_string(),
        }
    }

    /// Segment under a board point, ignoring enabled state (edit-mode hover).
    pub fn resolve(&self, x: f64, y: f64) -> Option<String> {
        self.state.hover(x, y).map(str::to_string)
    }

    #[wasm_bindgen(getter)]
    pub fn current_word(&self) -> Option<String> {
        self.state.current_word().map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOARD: &str = r#"{
        "ring_radii": [0.5],
        "cells": [["left"], ["right"]],
        "segments": [
            {"name": "left", "words": ["лево"]},
            {"name": "right", "words": ["право"]}
        ]
    }"#;

    #[test]
    fn test_dispatch_returns_event_and_snapshot() {
        let mut game = TargetGame::from_json(BOARD, 5, 11).unwrap();
        let json: serde_json::Value = serde_json::from_str(&game.dispatch("skip", "")).unwrap();
        assert_eq!(json["event"]["type"], "skipped");
        assert_eq!(json["snapshot"]["capacity"], 5);
        assert_eq!(json["snapshot"]["segments"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_dispatch_reports_errors_as_json() {
        let mut game = TargetGame::from_json(BOARD, 5, 11).unwrap();

        let json: serde_json::Value = serde_json::from_str(&game.dispatch("fly", "{}")).unwrap();
        assert_eq!(json["error"], "Unknown action \"fly\"");

        let json: serde_json::Value = serde_json::from_str(&game.dispatch("drop", "not json")).unwrap();
        assert!(json["error"].as_str().unwrap().starts_with("Failed to parse"));
    }

    #[test]
    fn test_bad_config_is_rejected() {
        assert!(matches!(
            TargetGame::from_json("{}", 5, 1),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_resolve_and_word() {
        let game = TargetGame::from_json(BOARD, 5, 11).unwrap();
        assert_eq!(game.resolve(0.1, 0.1), Some("left".to_string()));
        assert_eq!(game.resolve(0.1, -0.1), Some("right".to_string()));
        assert!(game.current_word().is_some());
    }
}
