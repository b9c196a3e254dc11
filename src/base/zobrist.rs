/*
  Tafl, a move-selection engine for the board game Tablut.
  Copyright (C) 2022 The Tafl Authors.

  Tafl is free software: you can redistribute it and/or modify
  it under the terms of the GNU General Public License as published by
  the Free Software Foundation, either version 3 of the License, or
  (at your option) any later version.

  Tafl is distributed in the hope that it will be useful,
  but WITHOUT ANY WARRANTY; without even the implied warranty of
  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
  GNU General Public License for more details.

  You should have received a copy of the GNU General Public License
  along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/

//! Zobrist hashing keys.
//!
//! Keys are generated once, lazily, from a fixed seed, so that two runs of
//! the engine (or two engines on two machines) agree on the same hash for
//! the same position -- useful for reproducing a bug report from its
//! reported hash.

use once_cell::sync::Lazy;

use crate::base::square::Square;

/// The three kinds of occupant a square can have, used to index the key
/// table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum PieceKind {
    BlackAttacker = 0,
    WhiteDefender = 1,
    King = 2,
}

struct ZobristTables {
    squares: [[u64; 3]; 81],
    side_to_move: u64,
}

/// Fixed seed so that key generation is reproducible across runs.
const ZOBRIST_SEED: u64 = 0x5442_4C54_5A4F_4252;

static TABLES: Lazy<ZobristTables> = Lazy::new(|| {
    let rng = fastrand::Rng::with_seed(ZOBRIST_SEED);
    let mut squares = [[0u64; 3]; 81];
    for sq in &mut squares {
        for key in sq.iter_mut() {
            *key = rng.u64(..);
        }
    }
    let side_to_move = rng.u64(..);
    ZobristTables {
        squares,
        side_to_move,
    }
});

/// The key associated with `kind` occupying `sq`.
#[must_use]
pub fn piece_key(kind: PieceKind, sq: Square) -> u64 {
    TABLES.squares[sq.index() as usize][kind as usize]
}

/// The key toggled whenever the side to move changes.
#[must_use]
pub fn side_key() -> u64 {
    TABLES.side_to_move
}
