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

//! Move ordering: split a classified move list into moves worth searching
//! first (anything carrying a classification tag) and the rest, the same
//! phased-ordering idea as the teacher's own move picker, simplified down
//! to the two phases this search actually needs.

use crate::base::moves::Move;

/// Splits `moves` into `(critical, regular)`. `critical` holds every move
/// with at least one classification bit set (a capture, a king-mobility
/// change, a killer, or an IID hint), sorted descending by its full tagged
/// integer so the most promising move is tried first. `regular` keeps
/// generation order.
#[must_use]
pub fn order_moves(moves: Vec<Move>) -> (Vec<Move>, Vec<Move>) {
    let (mut critical, regular): (Vec<Move>, Vec<Move>) =
        moves.into_iter().partition(|m| m.is_critical());
    critical.sort_unstable_by(|a, b| b.raw().cmp(&a.raw()));
    (critical, regular)
}
