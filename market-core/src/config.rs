//! Run configuration.
//!
//! Defaults reproduce the reference run: a 50x50 grid, two sellers starting
//! at price 20 with a cap of 20, unit transport and price weights, and the
//! cardinal-plus-price move set.

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::error::{MarketError, Result};
use crate::moves::MoveSet;
use crate::types::Price;

pub const DEFAULT_WIDTH: u32 = 50;
pub const DEFAULT_HEIGHT: u32 = 50;
pub const DEFAULT_TRANSPORT_COST: f64 = 1.0;
pub const DEFAULT_PRICE_SENSITIVITY: f64 = 1.0;
pub const DEFAULT_MAX_PRICE: Price = 20;
pub const DEFAULT_START_PRICE: Price = 20;
pub const DEFAULT_NUM_SELLERS: usize = 2;
pub const DEFAULT_INACTIVE_BELOW: f64 = 0.05;

// === COST MODEL ===

/// How a seller's price enters the customer's cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub enum PriceTerm {
    #[default]
    Raw,
    /// Only differs from `Raw` if a price can go negative.
    Absolute,
}

impl PriceTerm {
    pub fn apply(self, price: Price) -> f64 {
        match self {
            PriceTerm::Raw => price as f64,
            PriceTerm::Absolute => price.abs() as f64,
        }
    }
}

/// What a seller earns for each cell it wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub enum RevenueModel {
    #[default]
    PriceWeighted,
    /// One point per cell, ignoring price.
    PointCount,
}

impl RevenueModel {
    pub fn unit_value(self, price: Price) -> f64 {
        match self {
            RevenueModel::PriceWeighted => price as f64,
            RevenueModel::PointCount => 1.0,
        }
    }
}

// === MARKET ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(default)]
pub struct MarketConfig {
    pub width: u32,
    pub height: u32,
    pub transport_cost: f64,
    pub price_sensitivity: f64,
    /// Inclusive upper bound on price. `None` only requires non-negative prices.
    pub max_price: Option<Price>,
    pub price_term: PriceTerm,
    pub revenue_model: RevenueModel,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            transport_cost: DEFAULT_TRANSPORT_COST,
            price_sensitivity: DEFAULT_PRICE_SENSITIVITY,
            max_price: Some(DEFAULT_MAX_PRICE),
            price_term: PriceTerm::Raw,
            revenue_model: RevenueModel::PriceWeighted,
        }
    }
}

impl MarketConfig {
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn price_in_range(&self, price: Price) -> bool {
        price >= 0 && self.max_price.is_none_or(|max| price <= max)
    }

    pub fn validate(&self) -> Result<()> {
        let fits = |d: u32| d > 0 && i32::try_from(d).is_ok();
        let cells = (self.width as usize).checked_mul(self.height as usize);
        if !fits(self.width) || !fits(self.height) || cells.is_none() {
            return Err(MarketError::InvalidGrid {
                width: self.width,
                height: self.height,
            });
        }
        for (name, value) in [
            ("transport_cost", self.transport_cost),
            ("price_sensitivity", self.price_sensitivity),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(MarketError::InvalidWeight { name, value });
            }
        }
        if let Some(max) = self.max_price {
            if max < 0 {
                return Err(MarketError::InvalidPriceCap(max));
            }
        }
        Ok(())
    }
}

// === MOVEMENT AGGRESSIVENESS ===

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub enum InitialAggressiveness {
    Fixed(f64),
    Uniform { min: f64, max: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(default)]
pub struct AggressivenessConfig {
    pub initial: InitialAggressiveness,
    /// Multiplied into a seller's aggressiveness after each attempted move.
    pub decay: f64,
    /// Below this a seller goes permanently inactive.
    pub inactive_below: f64,
}

impl Default for AggressivenessConfig {
    fn default() -> Self {
        Self {
            initial: InitialAggressiveness::Fixed(1.0),
            decay: 1.0,
            inactive_below: DEFAULT_INACTIVE_BELOW,
        }
    }
}

impl AggressivenessConfig {
    pub fn validate(&self) -> Result<()> {
        let unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        match self.initial {
            InitialAggressiveness::Fixed(v) if !unit(v) => {
                return Err(MarketError::InvalidAggressivenessConfig(format!(
                    "fixed aggressiveness {v} outside [0, 1]"
                )));
            }
            InitialAggressiveness::Uniform { min, max }
                if !unit(min) || !unit(max) || min > max =>
            {
                return Err(MarketError::InvalidAggressivenessConfig(format!(
                    "uniform range [{min}, {max}] is not a sub-range of [0, 1]"
                )));
            }
            _ => {}
        }
        if !unit(self.decay) {
            return Err(MarketError::InvalidAggressivenessConfig(format!(
                "decay {} outside [0, 1]",
                self.decay
            )));
        }
        if !unit(self.inactive_below) {
            return Err(MarketError::InvalidAggressivenessConfig(format!(
                "inactivity threshold {} outside [0, 1]",
                self.inactive_below
            )));
        }
        Ok(())
    }
}

// === FULL RUN ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(default)]
pub struct SimConfig {
    pub market: MarketConfig,
    pub num_sellers: usize,
    /// Starting price for every seller; `None` draws uniformly in `[0, max_price]`.
    pub initial_price: Option<Price>,
    pub aggressiveness: AggressivenessConfig,
    #[tsify(type = "Move[]")]
    pub move_set: MoveSet,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            market: MarketConfig::default(),
            num_sellers: DEFAULT_NUM_SELLERS,
            initial_price: Some(DEFAULT_START_PRICE),
            aggressiveness: AggressivenessConfig::default(),
            move_set: MoveSet::cardinal_with_price(),
        }
    }
}

impl SimConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.market.validate()?;
        self.aggressiveness.validate()?;
        if self.num_sellers == 0 {
            return Err(MarketError::NoSellers);
        }
        if self.num_sellers > self.market.cell_count() {
            return Err(MarketError::TooManySellers {
                sellers: self.num_sellers,
                cells: self.market.cell_count(),
            });
        }
        match self.initial_price {
            Some(price) if !self.market.price_in_range(price) => {
                Err(MarketError::InvalidInitialPrice(price))
            }
            None if self.market.max_price.is_none() => Err(MarketError::UnboundedRandomPrice),
            _ => Ok(()),
        }
    }

    /// Run label in the reference export naming scheme.
    pub fn run_label(&self, tick: u64) -> String {
        format!(
            "Turn_{}_NS{}_TC_{}_PS_{}_MP_{}_SP_{}",
            tick,
            self.num_sellers,
            self.market.transport_cost,
            self.market.price_sensitivity,
            self.market
                .max_price
                .map_or_else(|| "none".to_string(), |p| p.to_string()),
            self.initial_price
                .map_or_else(|| "random".to_string(), |p| p.to_string()),
        )
    }
}
