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

//! Board representation: bitboards, squares, moves, Zobrist hashing, and the
//! state engine built on top of them.

pub mod adapter;
pub mod bitboard;
pub mod constants;
pub mod moves;
pub mod square;
pub mod state;
pub mod zobrist;

pub use bitboard::Bitboard;
pub use square::Square;
