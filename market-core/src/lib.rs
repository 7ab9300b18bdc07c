use wasm_bindgen::prelude::*;

pub mod agents;
pub mod config;
pub mod cost;
pub mod error;
pub mod init;
pub mod market;
pub mod moves;
pub mod optimizer;
pub mod simulation;
pub mod state;
pub mod types;

#[cfg(feature = "instrument")]
pub use instrument;

pub use agents::*;
pub use config::*;
pub use cost::{closest_offer, customer_cost};
pub use error::{MarketError, Result};
pub use init::{initialize, initialize_sellers};
pub use market::Market;
pub use moves::{Move, MoveSet};
pub use optimizer::*;
pub use simulation::Simulation;
pub use state::*;
pub use types::*;

// ============================================================================
// WASM API - Renderer-facing handle
// ============================================================================

#[wasm_bindgen]
pub struct SimulationHandle {
    sim: Simulation,
}

#[wasm_bindgen]
impl SimulationHandle {
    /// Build a run from a JS config object (missing fields take defaults).
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue, seed: u64) -> std::result::Result<SimulationHandle, JsError> {
        // Better panic messages in browser console
        console_error_panic_hook::set_once();

        let config: SimConfig = if config.is_undefined() || config.is_null() {
            SimConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        let sim = Simulation::new(config, seed)?;
        Ok(Self { sim })
    }

    /// The reference run: two sellers on a 50x50 grid.
    #[wasm_bindgen]
    pub fn with_defaults(seed: u64) -> std::result::Result<SimulationHandle, JsError> {
        console_error_panic_hook::set_once();
        let sim = Simulation::new(SimConfig::default(), seed)?;
        Ok(Self { sim })
    }

    /// Advance the simulation by one tick, returning how many sellers moved.
    #[wasm_bindgen]
    pub fn advance_tick(&mut self) -> u32 {
        self.sim.advance_tick().moved() as u32
    }

    #[wasm_bindgen]
    pub fn run_ticks(&mut self, ticks: u32) {
        self.sim.run(ticks as u64);
    }

    #[wasm_bindgen]
    pub fn get_tick(&self) -> u64 {
        self.sim.tick
    }

    /// Get a snapshot of the current state for rendering
    #[wasm_bindgen]
    pub fn get_snapshot(&self) -> MarketSnapshot {
        self.sim.snapshot()
    }

    #[wasm_bindgen]
    pub fn assign_cell(&self, x: i32, y: i32) -> std::result::Result<u32, JsError> {
        Ok(self.sim.assign_cell(x, y)?.0)
    }

    /// Revenue per seller in id order, for the revenue bar chart.
    #[wasm_bindgen]
    pub fn daily_revenues(&self) -> js_sys::Float64Array {
        js_sys::Float64Array::from(self.sim.daily_revenues().as_slice())
    }

    /// Winning seller id for every cell, row-major.
    #[wasm_bindgen]
    pub fn assignment_grid(&self) -> js_sys::Uint32Array {
        let ids: Vec<u32> = self
            .sim
            .market()
            .assignment_grid()
            .into_iter()
            .map(|id| id.0)
            .collect();
        js_sys::Uint32Array::from(ids.as_slice())
    }

    #[wasm_bindgen]
    pub fn run_label(&self) -> String {
        self.sim.run_label()
    }
}
