//! Search properties: best responses never do worse than staying put.

use market_core::{
    AggressivenessConfig, Cell, Market, MarketConfig, Move, MoveSet, Optimizer, SearchResult,
    Seller, SellerId, SellerOutcome, SimConfig, Simulation, search_best_offer,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn config(num_sellers: usize, move_set: MoveSet) -> SimConfig {
    SimConfig {
        market: MarketConfig {
            width: 12,
            height: 10,
            ..MarketConfig::default()
        },
        num_sellers,
        move_set,
        initial_price: None,
        ..SimConfig::default()
    }
}

fn search_all(market: &Market, moves: &MoveSet) -> Vec<SearchResult> {
    market
        .sellers()
        .iter()
        .map(|s| search_best_offer(market, s.id, moves).unwrap())
        .collect()
}

#[test]
fn property_best_is_at_least_stay() {
    for move_set in [
        MoveSet::cardinal_with_price(),
        MoveSet::cardinal_price_grid(),
        MoveSet::moore_with_stay(),
    ] {
        let mut sim = Simulation::new(config(5, move_set.clone()), 8).unwrap();
        for _ in 0..8 {
            for result in search_all(sim.market(), &move_set) {
                let stay = result
                    .stay_score
                    .expect("stay is always legal when the move set has it");
                let best = result.best.unwrap().score;
                assert!(
                    best >= stay,
                    "seller {:?}: best {best} < stay {stay}",
                    result.seller
                );
            }
            sim.advance_tick();
        }
    }
}

#[test]
fn property_stay_score_equals_current_revenue() {
    let sim = Simulation::new(config(4, MoveSet::cardinal_with_price()), 21).unwrap();
    let market = sim.market();
    let revenues = market.revenue_vector();
    for result in search_all(market, &MoveSet::cardinal_with_price()) {
        assert_eq!(result.stay_score, Some(revenues[result.seller.index()]));
    }
}

#[test]
fn property_committed_move_recomputes_to_search_score() {
    // With one mover per tick the committed score is exactly the post-tick revenue.
    let market_config = MarketConfig {
        width: 9,
        height: 9,
        ..MarketConfig::default()
    };
    let sellers = vec![
        Seller::new(SellerId::new(0), Cell::new(1, 1), 12),
        Seller::new(SellerId::new(1), Cell::new(7, 7), 12).with_aggressiveness(0.0),
    ];
    let mut market = Market::new(market_config, sellers).unwrap();
    let optimizer = Optimizer::new(MoveSet::cardinal_price_grid(), AggressivenessConfig::default());
    let mut rng = StdRng::seed_from_u64(0);

    for tick in 1..=10 {
        let report = optimizer.tick(&mut market, &mut rng, tick);
        let mover = &report.sellers[0];
        assert_ne!(mover.outcome, SellerOutcome::Skipped);
        assert_eq!(mover.score, Some(market.sellers()[0].revenue));
        assert_eq!(report.sellers[1].outcome, SellerOutcome::Inactive);
    }
}

#[test]
fn property_zero_aggressiveness_freezes_run() {
    let mut sim = Simulation::new(
        SimConfig {
            aggressiveness: AggressivenessConfig {
                initial: market_core::InitialAggressiveness::Fixed(0.0),
                ..Default::default()
            },
            ..config(6, MoveSet::cardinal_with_price())
        },
        4,
    )
    .unwrap();
    let before = sim.market().clone();
    let report = sim.run(10).unwrap();
    assert_eq!(report.count(SellerOutcome::Inactive), 6);
    assert_eq!(sim.market(), &before);
}

#[test]
fn property_without_stay_sellers_always_move() {
    // Moore neighbours only: every seller with a free neighbour must move.
    let mut sim = Simulation::new(config(3, MoveSet::moore()), 13).unwrap();
    for _ in 0..5 {
        let before: Vec<Cell> = sim.market().sellers().iter().map(|s| s.position).collect();
        let report = sim.advance_tick();
        for (r, from) in report.sellers.iter().zip(before) {
            if r.evaluated > 0 {
                assert_eq!(r.outcome, SellerOutcome::Moved);
                assert_ne!(r.to.position, from);
            }
        }
    }
}

#[test]
fn property_custom_move_set_order_breaks_ties() {
    // A lone seller earns the same everywhere at a fixed price; the first
    // listed legal move is always the one taken.
    let market_config = MarketConfig {
        width: 5,
        height: 5,
        ..MarketConfig::default()
    };
    let market = Market::new(
        market_config,
        vec![Seller::new(SellerId::new(0), Cell::new(2, 2), 5)],
    )
    .unwrap();

    let down_first = MoveSet::new(vec![Move::new(0, 1, 0), Move::new(1, 0, 0), Move::STAY]);
    let right_first = MoveSet::new(vec![Move::new(1, 0, 0), Move::new(0, 1, 0), Move::STAY]);

    let a = search_best_offer(&market, SellerId::new(0), &down_first).unwrap();
    let b = search_best_offer(&market, SellerId::new(0), &right_first).unwrap();
    assert_eq!(a.chosen().position, Cell::new(2, 3));
    assert_eq!(b.chosen().position, Cell::new(3, 2));
}
