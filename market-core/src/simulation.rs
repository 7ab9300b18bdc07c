//! The run driver: a market, its optimizer, a seeded RNG and a tick counter.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::SimConfig;
use crate::error::{MarketError, Result};
use crate::init::initialize;
use crate::market::Market;
use crate::optimizer::{Optimizer, TickReport};
use crate::state::MarketSnapshot;
use crate::types::{Revenue, SellerId};

/// Complete state of a run. Ticks are atomic: a snapshot never sees a
/// half-updated seller list.
#[derive(Debug, Clone)]
pub struct Simulation {
    pub tick: u64,
    config: SimConfig,
    market: Market,
    optimizer: Optimizer,
    rng: StdRng,
}

impl Simulation {
    /// Place sellers per `config` using a RNG seeded with `seed`.
    pub fn new(config: SimConfig, seed: u64) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        let market = initialize(&config, &mut rng)?;
        Ok(Self {
            tick: 0,
            optimizer: Optimizer::from_config(&config),
            config,
            market,
            rng,
        })
    }

    /// Start from an explicit market. The market's grid settings replace the config's.
    pub fn from_market(mut config: SimConfig, market: Market, seed: u64) -> Result<Self> {
        config.aggressiveness.validate()?;
        config.market = market.config().clone();
        config.num_sellers = market.len();
        Ok(Self {
            tick: 0,
            optimizer: Optimizer::from_config(&config),
            config,
            market,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    // === Stepping ===

    pub fn advance_tick(&mut self) -> TickReport {
        self.tick += 1;
        self.optimizer
            .tick(&mut self.market, &mut self.rng, self.tick)
    }

    /// Run `ticks` ticks, returning the last report.
    pub fn run(&mut self, ticks: u64) -> Option<TickReport> {
        let mut last = None;
        for _ in 0..ticks {
            last = Some(self.advance_tick());
        }
        last
    }

    /// Tick until a full tick passes with no seller moving, or `max_ticks` elapse.
    /// Returns the number of ticks run.
    pub fn run_until_stable(&mut self, max_ticks: u64) -> u64 {
        for n in 1..=max_ticks {
            if self.advance_tick().is_stable() {
                return n;
            }
        }
        max_ticks
    }

    // === Queries ===

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn market(&self) -> &Market {
        &self.market
    }

    pub fn assign_cell(&self, x: i32, y: i32) -> Result<SellerId> {
        self.market.assign_cell(x, y)
    }

    /// Revenue per seller, indexed by seller id. Recomputed on every call.
    pub fn daily_revenues(&self) -> Vec<Revenue> {
        self.market.revenue_vector()
    }

    pub fn snapshot(&self) -> MarketSnapshot {
        MarketSnapshot::capture(&self.market, self.tick)
    }

    pub fn run_label(&self) -> String {
        self.config.run_label(self.tick)
    }

    /// Serialized snapshot, for drivers that log or export state as JSON.
    pub fn snapshot_json(&self) -> Result<String> {
        serde_json::to_string(&self.snapshot()).map_err(MarketError::from)
    }
}
