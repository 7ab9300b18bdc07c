//! Small hand-checked markets with known outcomes.

use market_core::{
    Cell, Market, MarketConfig, Move, MoveSet, RevenueModel, Seller, SellerId, SimConfig,
    Simulation,
};

fn seller(idx: u32, x: i32, y: i32, price: i64) -> Seller {
    Seller::new(SellerId::new(idx), Cell::new(x, y), price)
}

fn simulation(market: Market, move_set: MoveSet) -> Simulation {
    let config = SimConfig {
        move_set,
        ..SimConfig::default()
    };
    Simulation::from_market(config, market, 0).unwrap()
}

#[test]
fn scenario_two_cells_two_sellers() {
    let config = MarketConfig {
        width: 2,
        height: 1,
        transport_cost: 1.0,
        price_sensitivity: 0.0,
        ..MarketConfig::default()
    };
    let market = Market::new(config, vec![seller(0, 0, 0, 10), seller(1, 1, 0, 10)]).unwrap();

    assert_eq!(market.assign_cell(0, 0).unwrap(), SellerId::new(0));
    assert_eq!(market.assign_cell(1, 0).unwrap(), SellerId::new(1));

    let revenues = market.daily_revenues();
    assert_eq!(revenues.len(), 2);
    assert_eq!(revenues[&SellerId::new(0)], 10.0);
    assert_eq!(revenues[&SellerId::new(1)], 10.0);
}

#[test]
fn scenario_single_seller_takes_every_cell() {
    for (price, x, y) in [(0, 0, 0), (7, 3, 2), (20, 4, 0)] {
        let config = MarketConfig {
            width: 5,
            height: 3,
            ..MarketConfig::default()
        };
        let market = Market::new(config, vec![seller(0, x, y, price)]).unwrap();
        assert!(market.assignment_grid().iter().all(|&id| id == SellerId::new(0)));
        assert_eq!(market.sellers()[0].revenue, 15.0 * price as f64);
    }
}

#[test]
fn scenario_lone_seller_climbs_to_cap_then_drifts() {
    let config = MarketConfig {
        width: 4,
        height: 1,
        ..MarketConfig::default()
    };
    let market = Market::new(config, vec![seller(0, 0, 0, 10)]).unwrap();
    let mut sim = simulation(market, MoveSet::cardinal_with_price());

    sim.run(10);
    let s = &sim.market().sellers()[0];
    assert_eq!((s.position, s.price), (Cell::new(0, 0), 20));
    assert_eq!(s.revenue, 80.0);

    // At the cap, stepping right ties with staying and is listed first.
    sim.advance_tick();
    let s = &sim.market().sellers()[0];
    assert_eq!((s.position, s.price), (Cell::new(1, 0), 20));
}

#[test]
fn scenario_hotelling_line_converges_to_centre() {
    let config = MarketConfig {
        width: 11,
        height: 1,
        price_sensitivity: 0.0,
        revenue_model: RevenueModel::PointCount,
        ..MarketConfig::default()
    };
    let market = Market::new(config, vec![seller(0, 0, 0, 10), seller(1, 10, 0, 10)]).unwrap();
    let moves = MoveSet::new(vec![Move::STAY, Move::new(-1, 0, 0), Move::new(1, 0, 0)]);
    let mut sim = simulation(market, moves);

    let ticks = sim.run_until_stable(50);
    assert_eq!(ticks, 6);

    let positions: Vec<_> = sim.market().sellers().iter().map(|s| s.position.x).collect();
    assert_eq!(positions, vec![4, 5]);
    assert_eq!(sim.daily_revenues(), vec![5.0, 6.0]);
}

#[test]
fn scenario_move_order_changes_the_outcome() {
    // Same line, but moving left is tried before staying: the tie at the
    // centre pushes the pair back to the left edge.
    let config = MarketConfig {
        width: 11,
        height: 1,
        price_sensitivity: 0.0,
        revenue_model: RevenueModel::PointCount,
        ..MarketConfig::default()
    };
    let market = Market::new(config, vec![seller(0, 0, 0, 10), seller(1, 10, 0, 10)]).unwrap();
    let moves = MoveSet::new(vec![Move::new(-1, 0, 0), Move::new(1, 0, 0), Move::STAY]);
    let mut sim = simulation(market, moves);

    sim.run(12);
    let positions: Vec<_> = sim.market().sellers().iter().map(|s| s.position.x).collect();
    assert_eq!(positions, vec![0, 1]);
}

#[test]
fn scenario_price_war_undercuts_to_floor() {
    let config = MarketConfig {
        width: 10,
        height: 10,
        ..MarketConfig::default()
    };
    let market = Market::new(config, vec![seller(0, 2, 5, 20), seller(1, 7, 5, 20)]).unwrap();
    let mut sim = simulation(market, MoveSet::cardinal_with_price());

    let mut last_max = 20;
    for _ in 0..20 {
        sim.advance_tick();
        let max = sim.market().sellers().iter().map(|s| s.price).max().unwrap();
        assert!(max <= last_max, "prices rose from {last_max} to {max}");
        last_max = max;
    }

    let sellers = sim.market().sellers();
    assert_eq!(sellers[0].offer().position, Cell::new(4, 5));
    assert_eq!(sellers[1].offer().position, Cell::new(5, 5));
    assert_eq!((sellers[0].price, sellers[1].price), (2, 2));
    assert_eq!(sim.daily_revenues(), vec![100.0, 100.0]);
}
