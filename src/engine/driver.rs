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

//! The player-facing entry point: holds the long-lived transposition table
//! across a whole game and drives iterative deepening for a single move,
//! the way the teacher's `MainSearch::evaluate` drives its own iterative
//! loop -- minus the helper threads, since this search is single-threaded
//! by spec.

use std::time::{Duration, Instant};

use crate::base::adapter::{AdapterError, BoardAdapter, MoveSink};
use crate::base::moves::Move;
use crate::base::state::{Side, State};
use crate::engine::config::EngineConfig;
use crate::engine::evaluate::Eval;
use crate::engine::killer::KillerTable;
use crate::engine::search::{SearchError, SearchInfo, SearchStats, Searcher};
use crate::engine::transposition::TranspositionTable;

/// The move this engine has settled on, together with the telemetry that
/// produced it, expressed purely in the host's own `(col, row)` coordinates
/// so a host never has to learn this crate's square numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChosenMove {
    pub from_col: u8,
    pub from_row: u8,
    pub to_col: u8,
    pub to_row: u8,
    pub player: Side,
    /// The evaluation, depth, and node-count bookkeeping that produced this
    /// move, in the manner of the teacher's own `SearchInfo` report.
    pub info: SearchInfo,
}

/// A move-selection engine: a transposition table that persists for the
/// player's whole game, plus a killer table that is cleared at the start of
/// every turn.
pub struct Engine {
    config: EngineConfig,
    tt: TranspositionTable,
    killers: KillerTable,
}

impl Engine {
    #[must_use]
    pub fn new(config: EngineConfig) -> Engine {
        Engine {
            tt: TranspositionTable::with_size_mb(config.tt_size_mb),
            killers: KillerTable::new(),
            config,
        }
    }

    /// Empties the transposition table, e.g. between unrelated games played
    /// by the same long-lived `Engine`.
    pub fn reset(&mut self) {
        self.tt.clear();
        self.killers.clear();
    }

    /// Reads the host's board, then searches for the best move within this
    /// turn's time budget: a larger allowance on the opening move, the
    /// ordinary per-turn allowance afterward.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError`] if the host's board fails the validity
    /// checks documented on [`State::from_adapter`].
    pub fn choose_move(&mut self, board: &impl BoardAdapter) -> Result<ChosenMove, AdapterError> {
        let mut state = State::from_adapter(board)?;
        self.killers.clear();

        let budget_ns = if state.turn_number() == 0 {
            self.config.start_turn_budget_ns
        } else {
            self.config.turn_budget_ns
        };
        let deadline = Instant::now() + Duration::from_nanos(budget_ns);
        let age = (state.turn_number() % 128) as u8;
        let side = state.side_to_move();

        let mut fallback_moves = Vec::new();
        state.legal_moves(&mut fallback_moves);

        let mut best_move = fallback_moves.first().copied().unwrap_or(Move::NONE);
        let mut best_eval = Eval::ZERO;
        let mut best_depth: u8 = 0;
        let mut stats = SearchStats::default();

        let max_depth = state
            .remaining_moves()
            .clamp(1, u16::from(self.config.search.iteration_cap)) as i8;

        for depth in 1..=max_depth {
            if Instant::now() >= deadline {
                break;
            }

            let mut searcher = Searcher {
                tt: &mut self.tt,
                killers: &mut self.killers,
                deadline,
                age,
                config: self.config.search,
                stats: &mut stats,
            };

            match searcher.pvs(&mut state, 0, depth, Eval::NEG_INFINITY, Eval::INFINITY, true) {
                Ok((score, mv)) if mv != Move::NONE => {
                    best_move = mv;
                    best_eval = score;
                    best_depth = depth as u8;
                    if score.is_win() || score.is_loss() {
                        // A forced result has been found; deepening further
                        // can only confirm it, never change which move to
                        // play.
                        break;
                    }
                }
                // A completed iteration with no move (an empty move set, a
                // sentinel from a deadline miss, or a draw score with no
                // improving line) does not update the chosen move.
                Ok(_) | Err(SearchError::Timeout) => break,
            }
        }

        let info = SearchInfo {
            best_move,
            eval: best_eval,
            depth: best_depth,
            selective_depth: stats.seldepth,
            nodes_searched: stats.nodes,
            tt_hits: stats.tt_hits,
        };

        Ok(ChosenMove {
            from_col: best_move.from_square().col(),
            from_row: best_move.from_square().row(),
            to_col: best_move.to_square().col(),
            to_row: best_move.to_square().row(),
            player: side,
            info,
        })
    }

    /// As [`Engine::choose_move`], but hands the chosen move to `sink`
    /// instead of returning it, for hosts that already have a `MoveSink`
    /// wired into their own turn loop.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError`] under the same conditions as
    /// [`Engine::choose_move`].
    pub fn choose_move_emit(
        &mut self,
        board: &impl BoardAdapter,
        sink: &mut impl MoveSink,
    ) -> Result<ChosenMove, AdapterError> {
        let chosen = self.choose_move(board)?;
        sink.emit(
            chosen.from_col,
            chosen.from_row,
            chosen.to_col,
            chosen.to_row,
            chosen.player,
        );
        Ok(chosen)
    }
}

impl Default for Engine {
    fn default() -> Engine {
        Engine::new(EngineConfig::default())
    }
}
