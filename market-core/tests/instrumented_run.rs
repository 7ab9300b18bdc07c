#![cfg(feature = "instrument")]

use market_core::instrument::{self, SELLER_MOVE, TICK_SUMMARY};
use market_core::{
    Cell, Market, MarketConfig, Move, MoveSet, Seller, SellerId, SimConfig, Simulation,
};
use polars::prelude::*;

fn config() -> SimConfig {
    SimConfig {
        market: MarketConfig {
            width: 10,
            height: 10,
            ..MarketConfig::default()
        },
        num_sellers: 3,
        ..SimConfig::default()
    }
}

#[test]
fn instrumented_run_records_every_search_and_summary() {
    instrument::install_subscriber();
    instrument::clear();

    let mut sim = Simulation::new(config(), 12).unwrap();
    sim.run(5);

    let recorder = instrument::drain();
    let moves = recorder.table(SELLER_MOVE).expect("seller_move table");
    let summary = recorder.table(TICK_SUMMARY).expect("tick_summary table");

    // Full aggressiveness: every seller searches every tick.
    assert_eq!(moves.row_count, 15);
    assert_eq!(summary.row_count, 15);

    let ticks = summary.u64_column("tick").unwrap();
    assert_eq!(ticks.first(), Some(&1));
    assert_eq!(ticks.last(), Some(&5));

    // The last tick's summary revenues match the market's stored revenue.
    let revenues = summary.f64_column("revenue").unwrap();
    let stored: Vec<f64> = sim.market().sellers().iter().map(|s| s.revenue).collect();
    assert_eq!(&revenues[12..], stored.as_slice());

    // Every committed search evaluated at least one candidate on a roomy grid.
    let evaluated = moves.u64_column("evaluated").unwrap();
    assert!(evaluated.iter().all(|&n| n > 0));
}

#[test]
fn instrumented_run_converts_to_dataframes() {
    instrument::install_subscriber();
    instrument::clear();

    let mut sim = Simulation::new(config(), 3).unwrap();
    sim.run(4);

    let dfs = instrument::drain().to_dataframes();
    let summary = &dfs[TICK_SUMMARY];
    assert_eq!(summary.height(), 12);

    let prices: Vec<i64> = summary
        .column("price")
        .unwrap()
        .i64()
        .unwrap()
        .into_no_null_iter()
        .collect();
    assert!(prices.iter().all(|p| (0..=20).contains(p)));
}

#[test]
fn instrumented_run_leaves_score_empty_without_candidates() {
    instrument::install_subscriber();
    instrument::clear();

    // 1x1 grid: the only move leaves the grid, so nothing is evaluated.
    let market_config = MarketConfig {
        width: 1,
        height: 1,
        ..MarketConfig::default()
    };
    let market = Market::new(
        market_config,
        vec![Seller::new(SellerId::new(0), Cell::new(0, 0), 20)],
    )
    .unwrap();
    let config = SimConfig {
        move_set: MoveSet::new(vec![Move::new(1, 0, 0)]),
        ..SimConfig::default()
    };
    let mut sim = Simulation::from_market(config, market, 0).unwrap();
    sim.run(2);

    let recorder = instrument::drain();
    let moves = recorder.table(SELLER_MOVE).expect("seller_move table");
    assert_eq!(moves.row_count, 2);
    assert_eq!(moves.u64_column("evaluated").unwrap(), &[0, 0]);
    assert_eq!(moves.u64_column("rejected").unwrap(), &[1, 1]);
    assert!(moves.f64_column("score").is_none());
}
