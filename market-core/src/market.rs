//! The market: grid bounds, cost parameters and the ordered seller list.
//!
//! Every customer cell buys from exactly one seller, the one with the lowest
//! customer cost (lowest index on ties). A day simulation walks every cell
//! and credits the winner with the configured unit value.

use std::collections::{HashMap, HashSet};

use crate::agents::{Offer, Seller};
use crate::config::MarketConfig;
use crate::cost::closest_offer;
use crate::error::{MarketError, Result};
use crate::types::{Cell, Revenue, SellerId};

#[derive(Debug, Clone, PartialEq)]
pub struct Market {
    config: MarketConfig,
    sellers: Vec<Seller>,
}

impl Market {
    /// Build a market, rejecting anything that would break assignment or legality.
    ///
    /// Seller ids are reassigned to match collection order, which is also the
    /// tie-break priority. Revenue is computed before returning.
    pub fn new(config: MarketConfig, mut sellers: Vec<Seller>) -> Result<Self> {
        config.validate()?;
        if sellers.is_empty() {
            return Err(MarketError::NoSellers);
        }
        if sellers.len() > config.cell_count() {
            return Err(MarketError::TooManySellers {
                sellers: sellers.len(),
                cells: config.cell_count(),
            });
        }

        let mut occupied: HashMap<Cell, SellerId> = HashMap::with_capacity(sellers.len());
        for (idx, seller) in sellers.iter_mut().enumerate() {
            seller.id = SellerId::new(idx as u32);
            if !in_bounds(&config, seller.position) {
                return Err(MarketError::SellerOutOfBounds {
                    seller: seller.id,
                    cell: seller.position,
                });
            }
            if !config.price_in_range(seller.price) {
                return Err(MarketError::PriceOutOfRange(seller.id, seller.price));
            }
            let a = seller.movement_aggressiveness;
            if !a.is_finite() || !(0.0..=1.0).contains(&a) {
                return Err(MarketError::InvalidAggressiveness(seller.id, a));
            }
            if let Some(&first) = occupied.get(&seller.position) {
                return Err(MarketError::CellOccupied {
                    first,
                    second: seller.id,
                    cell: seller.position,
                });
            }
            occupied.insert(seller.position, seller.id);
        }

        let mut market = Self { config, sellers };
        market.refresh_revenues();
        Ok(market)
    }

    // === Accessors ===

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    pub fn width(&self) -> u32 {
        self.config.width
    }

    pub fn height(&self) -> u32 {
        self.config.height
    }

    pub fn sellers(&self) -> &[Seller] {
        &self.sellers
    }

    pub fn seller(&self, id: SellerId) -> Option<&Seller> {
        self.sellers.get(id.index())
    }

    pub(crate) fn sellers_mut(&mut self) -> &mut [Seller] {
        &mut self.sellers
    }

    pub fn len(&self) -> usize {
        self.sellers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sellers.is_empty()
    }

    pub fn offers(&self) -> Vec<Offer> {
        self.sellers.iter().map(Seller::offer).collect()
    }

    // === Grid ===

    pub fn in_bounds(&self, cell: Cell) -> bool {
        in_bounds(&self.config, cell)
    }

    /// All customer cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + use<> {
        let (w, h) = (self.config.width as i32, self.config.height as i32);
        (0..h).flat_map(move |y| (0..w).map(move |x| Cell::new(x, y)))
    }

    /// Cells held by every seller except `id`. A seller's own cell is always free to it.
    pub fn occupied_by_others(&self, id: SellerId) -> HashSet<Cell> {
        self.sellers
            .iter()
            .filter(|s| s.id != id)
            .map(|s| s.position)
            .collect()
    }

    // === Assignment ===

    /// Seller a customer at `cell` buys from. Read-only.
    pub fn assign_cell(&self, x: i32, y: i32) -> Result<SellerId> {
        let cell = Cell::new(x, y);
        if !self.in_bounds(cell) {
            return Err(MarketError::CellOutOfBounds {
                x,
                y,
                width: self.config.width,
                height: self.config.height,
            });
        }
        Ok(self.closest_seller(cell))
    }

    /// Winner for any cell, on or off the grid.
    pub fn closest_seller(&self, cell: Cell) -> SellerId {
        let offers = self.offers();
        // Construction guarantees at least one seller.
        let idx = closest_offer(&self.config, cell, &offers).unwrap_or(0);
        SellerId::new(idx as u32)
    }

    /// Winning seller per cell, row-major. For colouring the grid.
    pub fn assignment_grid(&self) -> Vec<SellerId> {
        let offers = self.offers();
        self.cells()
            .map(|cell| {
                let idx = closest_offer(&self.config, cell, &offers).unwrap_or(0);
                SellerId::new(idx as u32)
            })
            .collect()
    }

    /// Number of cells each seller wins, indexed by seller.
    pub fn cell_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.sellers.len()];
        for id in self.assignment_grid() {
            counts[id.index()] += 1;
        }
        counts
    }

    // === Day simulation ===

    /// Credit each cell's winner with its unit value. Accumulates: callers reset first.
    pub fn simulate_day(&mut self) {
        let mut revenues: Vec<Revenue> = self.sellers.iter().map(|s| s.revenue).collect();
        accumulate_day(&self.config, &self.offers(), &mut revenues);
        for (seller, revenue) in self.sellers.iter_mut().zip(revenues) {
            seller.revenue = revenue;
        }
    }

    pub fn reset_revenues(&mut self) {
        for seller in &mut self.sellers {
            seller.revenue = 0.0;
        }
    }

    /// Reset and recompute every seller's authoritative revenue.
    pub fn refresh_revenues(&mut self) {
        self.reset_revenues();
        self.simulate_day();
    }

    /// Fresh revenues for the current state, indexed by seller. Seller state is untouched.
    pub fn revenue_vector(&self) -> Vec<Revenue> {
        let mut revenues = vec![0.0; self.sellers.len()];
        accumulate_day(&self.config, &self.offers(), &mut revenues);
        revenues
    }

    /// Transient per-seller revenue for reporting.
    pub fn daily_revenues(&self) -> HashMap<SellerId, Revenue> {
        self.revenue_vector()
            .into_iter()
            .enumerate()
            .map(|(idx, revenue)| (SellerId::new(idx as u32), revenue))
            .collect()
    }

    /// Revenues for the whole market if seller `id` made `offer` instead.
    ///
    /// Everyone else is held at their current state. The market is not modified.
    pub fn revenues_with(&self, id: SellerId, offer: Offer) -> Vec<Revenue> {
        let mut offers = self.offers();
        if let Some(slot) = offers.get_mut(id.index()) {
            *slot = offer;
        }
        let mut revenues = vec![0.0; offers.len()];
        accumulate_day(&self.config, &offers, &mut revenues);
        revenues
    }

    /// Sum of all revenues for the current state.
    pub fn total_revenue(&self) -> Revenue {
        self.revenue_vector().iter().sum()
    }
}

fn in_bounds(config: &MarketConfig, cell: Cell) -> bool {
    cell.x >= 0 && cell.y >= 0 && (cell.x as u32) < config.width && (cell.y as u32) < config.height
}

/// Walk the grid row-major and add each cell's unit value to its winner.
fn accumulate_day(config: &MarketConfig, offers: &[Offer], revenues: &mut [Revenue]) {
    let (w, h) = (config.width as i32, config.height as i32);
    for y in 0..h {
        for x in 0..w {
            if let Some(idx) = closest_offer(config, Cell::new(x, y), offers) {
                revenues[idx] += config.revenue_model.unit_value(offers[idx].price);
            }
        }
    }
}
