//! Per-seller local search over the configured move set.
//!
//! Sellers are processed one at a time in collection order. Each search sees
//! the already-committed moves of earlier sellers in the same tick, so a
//! tick is a sequence of best responses, not a simultaneous update.
//!
//! Candidates are scored against a read-only view of the market; the seller
//! itself only changes when the winning candidate is committed.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::agents::Offer;
use crate::config::{AggressivenessConfig, SimConfig};
use crate::market::Market;
use crate::moves::{Move, MoveSet};
use crate::types::{Revenue, SellerId};

// === SEARCH ===

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredOffer {
    pub movement: Move,
    pub offer: Offer,
    pub score: Revenue,
}

/// Everything one seller's search found, before anything is committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub seller: SellerId,
    pub original: Offer,
    /// First candidate with the highest score, if any candidate was legal.
    pub best: Option<ScoredOffer>,
    /// Score of the zero move, when the move set contains it.
    pub stay_score: Option<Revenue>,
    pub evaluated: usize,
    pub rejected: usize,
}

impl SearchResult {
    /// Offer the seller ends up with: the best candidate, or where it started.
    pub fn chosen(&self) -> Offer {
        self.best.map_or(self.original, |b| b.offer)
    }
}

/// Score every legal move for `seller`, holding all other sellers fixed.
///
/// A move is illegal if it lands on another seller's cell, leaves the grid,
/// or takes the price out of range. Each legal move is scored by a full day
/// simulation with the candidate substituted in. Returns `None` for an
/// unknown seller.
pub fn search_best_offer(
    market: &Market,
    seller: SellerId,
    moves: &MoveSet,
) -> Option<SearchResult> {
    let original = market.seller(seller)?.offer();
    let occupied = market.occupied_by_others(seller);
    let config = market.config();

    let mut result = SearchResult {
        seller,
        original,
        best: None,
        stay_score: None,
        evaluated: 0,
        rejected: 0,
    };

    for &movement in moves.moves() {
        let Some((position, price)) = movement.apply(original.position, original.price) else {
            result.rejected += 1;
            continue;
        };
        if occupied.contains(&position)
            || !market.in_bounds(position)
            || !config.price_in_range(price)
        {
            result.rejected += 1;
            continue;
        }

        let offer = Offer::new(position, price);
        let score = market.revenues_with(seller, offer)[seller.index()];
        result.evaluated += 1;

        if movement.is_stay() {
            result.stay_score = Some(score);
        }
        if result.best.is_none_or(|b| score > b.score) {
            result.best = Some(ScoredOffer {
                movement,
                offer,
                score,
            });
        }
    }

    Some(result)
}

// === TICK ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SellerOutcome {
    /// Aggressiveness is zero; the seller never moves again.
    Inactive,
    /// Lost the movement roll this tick.
    Skipped,
    /// Searched and kept its position and price.
    Stayed,
    /// Searched and committed a different position or price.
    Moved,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerReport {
    pub seller: SellerId,
    pub outcome: SellerOutcome,
    pub from: Offer,
    pub to: Offer,
    /// Search score of the committed offer.
    pub score: Option<Revenue>,
    pub evaluated: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    pub sellers: Vec<SellerReport>,
}

impl TickReport {
    pub fn moved(&self) -> usize {
        self.count(SellerOutcome::Moved)
    }

    pub fn count(&self, outcome: SellerOutcome) -> usize {
        self.sellers.iter().filter(|r| r.outcome == outcome).count()
    }

    /// True if no seller changed position or price.
    pub fn is_stable(&self) -> bool {
        self.moved() == 0
    }
}

/// Move set plus the aggressiveness rules that gate each seller's search.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Optimizer {
    pub move_set: MoveSet,
    pub aggressiveness: AggressivenessConfig,
}

impl Optimizer {
    pub fn new(move_set: MoveSet, aggressiveness: AggressivenessConfig) -> Self {
        Self {
            move_set,
            aggressiveness,
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.move_set.clone(), config.aggressiveness)
    }

    pub fn search(&self, market: &Market, seller: SellerId) -> Option<SearchResult> {
        search_best_offer(market, seller, &self.move_set)
    }

    /// Advance the market by one tick.
    ///
    /// One uniform roll is drawn per seller whether or not it can move, so the
    /// random stream does not depend on who retired. Revenues are recomputed
    /// once all sellers have moved.
    pub fn tick<R: Rng>(&self, market: &mut Market, rng: &mut R, tick: u64) -> TickReport {
        let mut reports = Vec::with_capacity(market.len());

        for idx in 0..market.len() {
            let id = SellerId::new(idx as u32);
            let seller = &mut market.sellers_mut()[idx];
            seller.retire_if_below(self.aggressiveness.inactive_below);
            let active = seller.is_active();
            let aggressiveness = seller.movement_aggressiveness;
            let from = seller.offer();

            let roll: f64 = rng.random();
            if !active || roll > aggressiveness {
                let outcome = if active {
                    SellerOutcome::Skipped
                } else {
                    SellerOutcome::Inactive
                };
                reports.push(SellerReport {
                    seller: id,
                    outcome,
                    from,
                    to: from,
                    score: None,
                    evaluated: 0,
                    rejected: 0,
                });
                continue;
            }

            let Some(result) = self.search(market, id) else {
                continue;
            };
            let to = result.chosen();
            let seller = &mut market.sellers_mut()[idx];
            seller.commit(to);
            seller.decay_aggressiveness(self.aggressiveness.decay);

            let outcome = if to == from {
                SellerOutcome::Stayed
            } else {
                SellerOutcome::Moved
            };

            #[cfg(feature = "instrument")]
            tracing::info!(
                target: "seller_move",
                tick = tick,
                seller_id = id.0,
                moved = outcome == SellerOutcome::Moved,
                from_x = from.position.x,
                from_y = from.position.y,
                from_price = from.price,
                to_x = to.position.x,
                to_y = to.position.y,
                to_price = to.price,
                score = result.best.map(|b| b.score),
                evaluated = result.evaluated as u64,
                rejected = result.rejected as u64,
            );

            reports.push(SellerReport {
                seller: id,
                outcome,
                from,
                to,
                score: result.best.map(|b| b.score),
                evaluated: result.evaluated,
                rejected: result.rejected,
            });
        }

        market.refresh_revenues();

        #[cfg(feature = "instrument")]
        for seller in market.sellers() {
            tracing::info!(
                target: "tick_summary",
                tick = tick,
                seller_id = seller.id.0,
                x = seller.position.x,
                y = seller.position.y,
                price = seller.price,
                revenue = seller.revenue,
                aggressiveness = seller.movement_aggressiveness,
            );
        }

        TickReport {
            tick,
            sellers: reports,
        }
    }
}
