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

//! Per-ply killer move tables: a small FIFO ring of quiet moves that caused
//! a beta cutoff at that ply in some earlier branch, tried early the next
//! time the search reaches the same ply.

use crate::base::moves::Move;

/// The maximum number of killer slots at any ply.
const MAX_K: usize = 24;
const BASE_K: f64 = 6.0;
const GROWTH_RATE: f64 = 0.265;

/// The deepest ply the table is prepared to track. Iterative deepening
/// never exceeds [`crate::base::state::MAX_MOVES`] plies of principal
/// search plus a bounded quiescence extension, so this leaves headroom.
const MAX_PLY: usize = 128;

fn capacity_for_ply(ply: usize) -> usize {
    let grown = BASE_K + ((GROWTH_RATE * ply as f64).exp() - 1.0);
    (grown.floor() as usize).clamp(1, MAX_K)
}

/// A killer table: one FIFO ring of untagged moves per ply.
pub struct KillerTable {
    rings: Vec<Vec<Move>>,
}

impl KillerTable {
    #[must_use]
    pub fn new() -> KillerTable {
        KillerTable {
            rings: vec![Vec::new(); MAX_PLY],
        }
    }

    /// Records `mv` as a killer at `ply`. Ignored if already present.
    /// Evicts the oldest entry (FIFO) once the ply's capacity is reached.
    pub fn add(&mut self, ply: u16, mv: Move) {
        let ply = (ply as usize).min(MAX_PLY - 1);
        let cap = capacity_for_ply(ply);
        let mv = mv.untagged();
        let ring = &mut self.rings[ply];
        if ring.contains(&mv) {
            return;
        }
        if ring.len() >= cap {
            ring.remove(0);
        }
        ring.push(mv);
    }

    /// Whether `mv` is a recorded killer at `ply`.
    #[must_use]
    pub fn contains(&self, ply: u16, mv: Move) -> bool {
        let ply = (ply as usize).min(MAX_PLY - 1);
        self.rings[ply].contains(&mv.untagged())
    }

    /// Clears every ply's ring, done once per move chosen by the engine so
    /// that killers from an unrelated position don't leak into the next
    /// search.
    pub fn clear(&mut self) {
        for ring in &mut self.rings {
            ring.clear();
        }
    }
}

impl Default for KillerTable {
    fn default() -> KillerTable {
        KillerTable::new()
    }
}
