#![cfg(target_arch = "wasm32")]

use market_core::SimulationHandle;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

#[wasm_bindgen_test]
fn handle_ticks_and_reports() {
    let mut handle = SimulationHandle::new(JsValue::UNDEFINED, 7)
        .map_err(JsValue::from)
        .unwrap();
    assert_eq!(handle.get_tick(), 0);

    handle.advance_tick();
    handle.run_ticks(4);
    assert_eq!(handle.get_tick(), 5);

    let revenues = handle.daily_revenues();
    assert_eq!(revenues.length(), 2);

    let grid = handle.assignment_grid();
    assert_eq!(grid.length(), 50 * 50);

    let owner = handle.assign_cell(0, 0).map_err(JsValue::from).unwrap();
    assert_eq!(owner, grid.get_index(0));
    assert!(handle.assign_cell(50, 0).is_err());
}

#[wasm_bindgen_test]
fn handle_accepts_partial_config() {
    let config = js_sys::JSON::parse(r#"{"num_sellers": 4, "market": {"width": 8, "height": 6}}"#)
        .unwrap();
    let handle = SimulationHandle::new(config, 1)
        .map_err(JsValue::from)
        .unwrap();
    assert_eq!(handle.assignment_grid().length(), 48);
    assert!(handle.run_label().starts_with("Turn_0_NS4_"));
}
