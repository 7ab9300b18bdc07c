//! Error types for market construction and queries.

use thiserror::Error;

use crate::types::{Cell, Price, SellerId};

/// Invalid parameters refuse to construct; nothing in a running tick fails.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketError {
    #[error("market needs at least one seller")]
    NoSellers,

    #[error("grid {width}x{height} must be non-empty and fit i32 coordinates")]
    InvalidGrid { width: u32, height: u32 },

    #[error("{name} weight must be finite and non-negative, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error("{sellers} sellers cannot fit on {cells} cells")]
    TooManySellers { sellers: usize, cells: usize },

    #[error("seller {seller:?} at {cell:?} is outside the grid")]
    SellerOutOfBounds { seller: SellerId, cell: Cell },

    #[error("sellers {first:?} and {second:?} share cell {cell:?}")]
    CellOccupied {
        first: SellerId,
        second: SellerId,
        cell: Cell,
    },

    #[error("seller {0:?} price {1} is outside the allowed range")]
    PriceOutOfRange(SellerId, Price),

    #[error("price cap {0} is negative")]
    InvalidPriceCap(Price),

    #[error("initial price {0} is outside the allowed range")]
    InvalidInitialPrice(Price),

    #[error("seller {0:?} movement aggressiveness {1} is outside [0, 1]")]
    InvalidAggressiveness(SellerId, f64),

    #[error("aggressiveness config invalid: {0}")]
    InvalidAggressivenessConfig(String),

    #[error("a random initial price needs a price cap")]
    UnboundedRandomPrice,

    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    CellOutOfBounds { x: i32, y: i32, width: u32, height: u32 },

    #[error("config parse error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MarketError>;

impl From<serde_json::Error> for MarketError {
    fn from(e: serde_json::Error) -> Self {
        MarketError::Config(e.to_string())
    }
}
