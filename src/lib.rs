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

//! A turn-time-bounded move-selection engine for the board game Tablut.
//!
//! The host owns the board, the rules UI, and the clock; this crate owns one
//! thing: given a position and a deadline, pick the best move it can find
//! before the deadline passes. See [`engine::Engine::choose_move`] for the
//! entry point.

pub mod base;
pub mod engine;

pub use base::adapter::{AdapterError, BoardAdapter, Cell, MoveSink};
pub use base::moves::Move;
pub use base::square::Square;
pub use base::state::{Outcome, Side, State};
pub use engine::config::{EngineConfig, SearchConfig};
pub use engine::driver::{ChosenMove, Engine};
pub use engine::evaluate::Eval;
pub use engine::search::{SearchError, SearchInfo};
