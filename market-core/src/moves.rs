//! Candidate move sets for the seller search.
//!
//! The move set is a parameter of the run, not something derived from the
//! market. Order matters: on equal scores the earlier move wins.

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::types::{Cell, Price};

/// A step in position and price relative to the seller's current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct Move {
    pub dx: i32,
    pub dy: i32,
    #[serde(default)]
    pub dprice: Price,
}

impl Move {
    pub const STAY: Move = Move::new(0, 0, 0);

    pub const fn new(dx: i32, dy: i32, dprice: Price) -> Self {
        Self { dx, dy, dprice }
    }

    pub fn is_stay(&self) -> bool {
        *self == Self::STAY
    }

    /// Destination cell and price, or `None` if the step overflows.
    pub fn apply(&self, cell: Cell, price: Price) -> Option<(Cell, Price)> {
        let x = cell.x.checked_add(self.dx)?;
        let y = cell.y.checked_add(self.dy)?;
        Some((Cell::new(x, y), price.checked_add(self.dprice)?))
    }
}

const CARDINAL: [(i32, i32); 4] = [(0, 1), (1, 0), (-1, 0), (0, -1)];

const MOORE: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Ordered list of candidate moves, evaluated first to last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoveSet {
    moves: Vec<Move>,
}

impl MoveSet {
    pub fn new(moves: Vec<Move>) -> Self {
        Self { moves }
    }

    /// Four steps at fixed price, then a price cut, stay, and a price rise.
    pub fn cardinal_with_price() -> Self {
        let mut moves: Vec<Move> = CARDINAL
            .iter()
            .map(|&(dx, dy)| Move::new(dx, dy, 0))
            .collect();
        moves.extend([Move::new(0, 0, -1), Move::STAY, Move::new(0, 0, 1)]);
        Self { moves }
    }

    /// Every cardinal step and stay, each crossed with price steps -1, 0, +1.
    pub fn cardinal_price_grid() -> Self {
        let moves = CARDINAL
            .iter()
            .chain(std::iter::once(&(0, 0)))
            .flat_map(|&(dx, dy)| (-1..=1).map(move |dp| Move::new(dx, dy, dp)))
            .collect();
        Self { moves }
    }

    /// The eight Moore neighbours, no price change and no stay.
    pub fn moore() -> Self {
        Self {
            moves: MOORE.iter().map(|&(dx, dy)| Move::new(dx, dy, 0)).collect(),
        }
    }

    pub fn moore_with_stay() -> Self {
        let mut set = Self::moore();
        set.moves.push(Move::STAY);
        set
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn includes_stay(&self) -> bool {
        self.moves.iter().any(Move::is_stay)
    }
}

impl Default for MoveSet {
    fn default() -> Self {
        Self::cardinal_with_price()
    }
}
