use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::market::Market;
use crate::types::{Price, Revenue};

// ============================================================================
// Serializable State Snapshot for JS
// ============================================================================

/// Frozen view of the market between ticks, for renderers and reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
pub struct MarketSnapshot {
    pub tick: u64,
    pub width: u32,
    pub height: u32,
    pub sellers: Vec<SellerSnapshot>,
    pub min_price: Price,
    pub max_price: Price,
    pub total_revenue: Revenue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
pub struct SellerSnapshot {
    pub id: u32,
    pub tag: u32,
    pub x: i32,
    pub y: i32,
    pub price: Price,
    pub revenue: Revenue,
    pub movement_aggressiveness: f64,
    /// Number of customer cells this seller wins.
    pub cells: u32,
}

impl MarketSnapshot {
    pub fn capture(market: &Market, tick: u64) -> Self {
        let counts = market.cell_counts();
        let revenues = market.revenue_vector();
        let sellers: Vec<SellerSnapshot> = market
            .sellers()
            .iter()
            .zip(counts.iter().zip(revenues.iter()))
            .map(|(s, (&cells, &revenue))| SellerSnapshot {
                id: s.id.0,
                tag: s.tag,
                x: s.position.x,
                y: s.position.y,
                price: s.price,
                revenue,
                movement_aggressiveness: s.movement_aggressiveness,
                cells: cells as u32,
            })
            .collect();

        let min_price = sellers.iter().map(|s| s.price).min().unwrap_or(0);
        let max_price = sellers.iter().map(|s| s.price).max().unwrap_or(0);
        let total_revenue = revenues.iter().sum();

        Self {
            tick,
            width: market.width(),
            height: market.height(),
            sellers,
            min_price,
            max_price,
            total_revenue,
        }
    }
}
