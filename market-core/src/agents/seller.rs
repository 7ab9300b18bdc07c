use serde::{Deserialize, Serialize};

use crate::types::{Cell, Price, Revenue, SellerId};

// === OFFER ===

/// The part of a seller the search changes: where it stands and what it charges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub position: Cell,
    pub price: Price,
}

impl Offer {
    pub fn new(position: Cell, price: Price) -> Self {
        Self { position, price }
    }
}

// === SELLER ===

/// A competitor on the grid. Sellers live for the whole run; ticks mutate them in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seller {
    pub id: SellerId,
    pub position: Cell,
    pub price: Price,
    /// Revenue from the last authoritative day simulation.
    pub revenue: Revenue,
    /// Probability of attempting a move each tick.
    pub movement_aggressiveness: f64,
    /// Opaque identity for renderers (they map it to a color).
    pub tag: u32,
}

impl Seller {
    pub fn new(id: SellerId, position: Cell, price: Price) -> Self {
        Self {
            id,
            position,
            price,
            revenue: 0.0,
            movement_aggressiveness: 1.0,
            tag: id.0,
        }
    }

    pub fn with_aggressiveness(mut self, aggressiveness: f64) -> Self {
        self.movement_aggressiveness = aggressiveness;
        self
    }

    pub fn with_tag(mut self, tag: u32) -> Self {
        self.tag = tag;
        self
    }

    pub fn offer(&self) -> Offer {
        Offer::new(self.position, self.price)
    }

    pub fn commit(&mut self, offer: Offer) {
        self.position = offer.position;
        self.price = offer.price;
    }

    /// A seller whose aggressiveness has hit zero never moves again.
    pub fn is_active(&self) -> bool {
        self.movement_aggressiveness > 0.0
    }

    /// Zero out aggressiveness once it falls below `threshold`.
    pub fn retire_if_below(&mut self, threshold: f64) {
        if self.movement_aggressiveness < threshold {
            self.movement_aggressiveness = 0.0;
        }
    }

    pub fn decay_aggressiveness(&mut self, factor: f64) {
        self.movement_aggressiveness *= factor;
    }
}
