//! Seller placement at the start of a run.

use rand::Rng;
use rand::seq::index;

use crate::agents::Seller;
use crate::config::{InitialAggressiveness, SimConfig};
use crate::error::{MarketError, Result};
use crate::market::Market;
use crate::types::{Cell, Price, SellerId};

/// Draw `num_sellers` sellers on distinct uniformly chosen cells.
///
/// Every seller gets the configured starting price (or a uniform draw up to the
/// cap) and a starting aggressiveness.
pub fn initialize_sellers<R: Rng>(config: &SimConfig, rng: &mut R) -> Result<Vec<Seller>> {
    config.validate()?;
    let market = &config.market;
    let width = market.width as usize;

    let cells = index::sample(rng, market.cell_count(), config.num_sellers);
    let mut sellers = Vec::with_capacity(config.num_sellers);
    for (idx, cell_idx) in cells.into_iter().enumerate() {
        let position = Cell::new((cell_idx % width) as i32, (cell_idx / width) as i32);
        let price = starting_price(config, rng)?;
        let aggressiveness = match config.aggressiveness.initial {
            InitialAggressiveness::Fixed(v) => v,
            InitialAggressiveness::Uniform { min, max } => rng.random_range(min..=max),
        };
        sellers.push(
            Seller::new(SellerId::new(idx as u32), position, price)
                .with_aggressiveness(aggressiveness),
        );
    }
    Ok(sellers)
}

/// Build a market of freshly placed sellers.
pub fn initialize<R: Rng>(config: &SimConfig, rng: &mut R) -> Result<Market> {
    let sellers = initialize_sellers(config, rng)?;
    Market::new(config.market.clone(), sellers)
}

fn starting_price<R: Rng>(config: &SimConfig, rng: &mut R) -> Result<Price> {
    match (config.initial_price, config.market.max_price) {
        (Some(price), _) => Ok(price),
        (None, Some(max)) => Ok(rng.random_range(0..=max)),
        (None, None) => Err(MarketError::UnboundedRandomPrice),
    }
}
