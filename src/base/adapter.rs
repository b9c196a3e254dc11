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

//! The boundary between the host's board representation and this crate's
//! own `State`. Hosts never see a `Bitboard` or a packed `Move`; they
//! implement `BoardAdapter` over whatever representation they already have,
//! and read emitted moves back out in `(col, row)` form.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

use crate::base::state::Side;

/// The occupant of a single board cell, as seen from the host's side of the
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Black,
    White,
    King,
}

/// A read-only view onto a host's board, indexed by `(col, row)` rather than
/// this crate's own `Square`, so that a host never needs to learn this
/// crate's square-numbering convention.
pub trait BoardAdapter {
    /// The occupant of the cell at `(col, row)`, both in `0..9`.
    fn piece_at(&self, col: u8, row: u8) -> Cell;

    /// The number of half-moves (turns) played so far in this game.
    fn turn_number(&self) -> u32;

    /// The side to move.
    fn turn_player(&self) -> Side;
}

/// A sink that a search hands a chosen move to, expressed purely in the
/// host's own `(col, row)` coordinates.
pub trait MoveSink {
    fn emit(&mut self, from_col: u8, from_row: u8, to_col: u8, to_row: u8, player: Side);
}

/// Reasons a host's board was rejected when building a `State` from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterError {
    /// More than 16 black attackers were present.
    TooManyBlack(usize),
    /// More than 8 white defenders were present.
    TooManyWhite(usize),
    /// No king was found anywhere on the board.
    MissingKing,
    /// More than one king was found.
    DuplicateKing,
}

impl Display for AdapterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AdapterError::TooManyBlack(n) => {
                write!(f, "too many black attackers on board: {n} (max 16)")
            }
            AdapterError::TooManyWhite(n) => {
                write!(f, "too many white defenders on board: {n} (max 8)")
            }
            AdapterError::MissingKing => write!(f, "no king found on board"),
            AdapterError::DuplicateKing => write!(f, "more than one king found on board"),
        }
    }
}

impl Error for AdapterError {}
