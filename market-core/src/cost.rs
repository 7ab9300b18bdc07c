//! Customer cost and closest-seller assignment.

use crate::agents::Offer;
use crate::config::MarketConfig;
use crate::types::Cell;

/// Cost to a customer at `customer` of buying from a seller making `offer`.
///
/// `transport_cost * euclidean_distance + price_sensitivity * f(price)`, where
/// `f` is the configured price term.
pub fn customer_cost(config: &MarketConfig, customer: Cell, offer: &Offer) -> f64 {
    let transport = config.transport_cost * customer.distance_to(offer.position);
    let price = config.price_sensitivity * config.price_term.apply(offer.price);
    transport + price
}

/// Index of the cheapest offer for `customer`.
///
/// Strict comparison: on an exact tie the earliest offer wins, including when
/// every cost overflows to infinity. Returns `None` only for an empty iterator.
pub fn closest_offer<'a, I>(config: &MarketConfig, customer: Cell, offers: I) -> Option<usize>
where
    I: IntoIterator<Item = &'a Offer>,
{
    let mut closest = None;
    let mut min_cost = f64::INFINITY;
    for (idx, offer) in offers.into_iter().enumerate() {
        let cost = customer_cost(config, customer, offer);
        if closest.is_none() || cost < min_cost {
            min_cost = cost;
            closest = Some(idx);
        }
    }
    closest
}
