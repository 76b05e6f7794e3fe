use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::board::in_range;
use crate::game::GameEngine;
use crate::types::{GameState, Position};

/// Client-side mirror of a room's engine, used to highlight legal squares
/// and pre-check clicks before they are sent to the server.
#[wasm_bindgen]
pub struct WasmGame {
    engine: GameEngine,
}

#[wasm_bindgen]
impl WasmGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            engine: GameEngine::new(),
        }
    }

    /// Loads a `game_updated` payload pushed by the server.
    #[wasm_bindgen(js_name = fromState)]
    pub fn from_state(state: JsValue) -> Result<WasmGame, JsValue> {
        let state: GameState = serde_wasm_bindgen::from_value(state).map_err(to_js_error)?;
        let engine = GameEngine::from_snapshot(&state)
            .ok_or_else(|| JsValue::from_str("board must be 8x8"))?;
        Ok(Self { engine })
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(&self.engine.snapshot())
    }

    /// Legal squares for the side to move; empty once the game is over.
    #[wasm_bindgen(js_name = legalMoves)]
    pub fn legal_moves(&self) -> Result<JsValue, JsValue> {
        if self.engine.is_over() {
            return to_js(&Vec::<Position>::new());
        }
        to_js(&self.engine.legal_moves(self.engine.current_turn()))
    }

    #[wasm_bindgen(js_name = isLegalMove)]
    pub fn is_legal_move(&self, row: u8, col: u8) -> bool {
        !self.engine.is_over()
            && in_range(row, col)
            && self
                .engine
                .is_legal_move(row, col, self.engine.current_turn())
    }

    /// Plays for the side to move and returns the new state.
    pub fn place(&mut self, row: u8, col: u8) -> Result<JsValue, JsValue> {
        if !in_range(row, col) {
            return Err(JsValue::from_str("row/col out of range"));
        }
        let color = self.engine.current_turn();
        self.engine
            .apply_move(row, col, color)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.state()
    }

    pub fn reset(&mut self) {
        self.engine.reset();
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        Self::new()
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(to_js_error)
}

fn to_js_error(e: serde_wasm_bindgen::Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}
