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

//! Principal variation search with alpha-beta pruning and a quiescence
//! extension, the same structure as the teacher's own `PVSearch`, trimmed
//! down to one cooperating thread: no helper threads, no lock poisoning, no
//! thread-join failures, just a deadline the search checks on every loop
//! iteration and unwinds through on expiry.

use std::time::Instant;

use crate::base::moves::Move;
use crate::base::state::{Side, State};
use crate::engine::config::SearchConfig;
use crate::engine::evaluate::{self, Eval};
use crate::engine::killer::KillerTable;
use crate::engine::pick;
use crate::engine::transposition::{NodeType, TranspositionTable};

/// A report on one completed iterative-deepening iteration: the move and
/// score it settled on, plus the bookkeeping a host can log if it wants to,
/// in the manner of the teacher's own `SearchInfo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchInfo {
    pub best_move: Move,
    pub eval: Eval,
    /// The depth this iteration was run at.
    pub depth: u8,
    /// The deepest ply actually visited, including the quiescence extension.
    pub selective_depth: u8,
    /// The number of `pvs`/`quiescence` calls made while producing this
    /// result.
    pub nodes_searched: u64,
    /// The number of times a transposition table lookup found a usable
    /// entry.
    pub tt_hits: u64,
}

/// Running counters for one `choose_move` call, threaded by `&mut` through
/// every depth's [`Searcher`] so the driver can report totals across the
/// whole iterative-deepening loop rather than just the last depth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub tt_hits: u64,
    pub seldepth: u8,
}

impl SearchStats {
    fn note_node(&mut self, ply: u16) {
        self.nodes += 1;
        self.seldepth = self.seldepth.max(ply.min(u16::from(u8::MAX)) as u8);
    }
}

/// A reason a search call returned without a usable result.
///
/// Unlike the teacher's `SearchError`, there is no `Poison` or `Join`
/// variant: a single-threaded, non-blocking search has nothing to poison
/// and no helper thread to fail joining.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchError {
    /// The deadline passed before this call could produce a result.
    Timeout,
}

/// The data shared across one call tree of `pvs`/`quiescence`: the
/// transposition table, the killer table, and the deadline clock. Built
/// fresh by [`crate::engine::driver::Engine::choose_move`] for each
/// iterative-deepening depth.
pub(crate) struct Searcher<'a> {
    pub tt: &'a mut TranspositionTable,
    pub killers: &'a mut KillerTable,
    pub deadline: Instant,
    /// The turn number this search is running on, stored into every
    /// transposition entry written this call so the table's age-based
    /// replacement policy can later tell a stale entry from a fresh one.
    pub age: u8,
    pub config: SearchConfig,
    /// Shared with the driver so it can report a [`SearchInfo`] once this
    /// depth's iteration completes; `&mut` rather than owned so the driver
    /// keeps running totals across depths.
    pub stats: &'a mut SearchStats,
}

impl<'a> Searcher<'a> {
    fn check_deadline(&self) -> Result<(), SearchError> {
        if Instant::now() >= self.deadline {
            Err(SearchError::Timeout)
        } else {
            Ok(())
        }
    }

    /// Makes `m`, searches the resulting position from the opponent's
    /// perspective, then unmakes `m` regardless of whether the child search
    /// succeeded -- the history stack must be left exactly as it was found
    /// even when a deadline aborts the recursion.
    fn child_score(
        &mut self,
        state: &mut State,
        ply: u16,
        depth: i8,
        alpha: Eval,
        beta: Eval,
        is_pv: bool,
        m: Move,
    ) -> Result<Eval, SearchError> {
        state.make_move(m);
        let result = self.pvs(state, ply, depth, -beta, -alpha, is_pv);
        state.unmake_move();
        result.map(|(score, _)| -score)
    }

    /// Principal variation search, per spec.md section 4.6.
    ///
    /// Returns the score of `state` from the perspective of its side to
    /// move, together with the move that produced it (`Move::NONE` at a
    /// quiescence leaf, where no move is chosen).
    pub(crate) fn pvs(
        &mut self,
        state: &mut State,
        ply: u16,
        depth: i8,
        mut alpha: Eval,
        mut beta: Eval,
        is_pv: bool,
    ) -> Result<(Eval, Move), SearchError> {
        self.stats.note_node(ply);

        if depth <= 0 || state.is_terminal() {
            let score = self.quiescence(state, ply, self.config.quiescence_depth, alpha, beta)?;
            return Ok((score, Move::NONE));
        }

        self.check_deadline()?;

        let a_orig = alpha;
        let hash = state.hash();

        let mut table_move = Move::NONE;
        if let Some(entry) = self.tt.get(hash) {
            self.stats.tt_hits += 1;
            table_move = entry.mv;
            if entry.depth as i8 >= depth {
                match entry.node_type {
                    NodeType::Pv => return Ok((entry.score, entry.mv)),
                    NodeType::Cut => alpha = alpha.max(entry.score),
                    NodeType::All => beta = beta.min(entry.score),
                }
                if alpha >= beta {
                    return Ok((entry.score, entry.mv));
                }
            }
        }

        let mut moves = Vec::new();
        state.legal_moves(&mut moves);

        if moves.is_empty() {
            // The side to move has no legal destination at all: spec.md
            // section 7 treats this the same as a captured king for black
            // or a failed escape for white, i.e. a loss for the mover.
            return Ok((Eval::loss_in(state.remaining_moves()), Move::NONE));
        }

        // `table_move` only matters here if it is actually legal in this
        // position; a transposition hit is keyed on hash alone, and a
        // collision could hand back a move from an unrelated position.
        let table_move_index = moves.iter().position(|m| m.same_move(table_move));

        let mut best_score = Eval::NEG_INFINITY;
        let mut best_move = Move::NONE;

        if let Some(idx) = table_move_index {
            let mv = moves.swap_remove(idx);
            let score = self.child_score(state, ply + 1, depth - 1, alpha, beta, true, mv)?;
            best_score = score;
            best_move = mv;
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                self.store(hash, NodeType::Cut, depth, score, mv);
                self.note_cutoff(ply, mv);
                return Ok((score, mv));
            }
        }

        self.check_deadline()?;

        let mut tagged: Vec<Move> = moves
            .into_iter()
            .map(|m| {
                let classified = state.classify_move(m);
                if self.killers.contains(ply, classified) {
                    classified.with_killer(true)
                } else {
                    classified
                }
            })
            .collect();

        // Internal iterative deepening: at a PV node with no table hint and
        // enough depth left to make it worthwhile, a shallow search over
        // the same move set picks a move to try first.
        if is_pv && table_move_index.is_none() && depth > self.config.iid_min_depth {
            if let Ok((_, iid_move)) = self.pvs(state, ply, depth - 2, alpha, beta, true) {
                if iid_move != Move::NONE {
                    if let Some(t) = tagged.iter_mut().find(|t| t.same_move(iid_move)) {
                        *t = t.with_iid(true);
                    }
                }
            }
        }

        let (critical, regular) = pick::order_moves(tagged);

        for m in critical {
            self.check_deadline()?;
            let score = self.child_score(state, ply + 1, depth - 1, alpha, beta, false, m)?;
            if score > best_score {
                best_score = score;
                best_move = m;
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                self.store(hash, NodeType::Cut, depth, score, m);
                self.note_cutoff(ply, m);
                return Ok((score, m));
            }
        }

        for m in regular {
            self.check_deadline()?;
            let reduced_depth = (depth - 2).max(1);
            let mut score = self.child_score(
                state,
                ply + 1,
                reduced_depth,
                alpha,
                alpha + 1,
                false,
                m,
            )?;
            if alpha < score && score < beta && depth > 1 {
                score = self.child_score(state, ply + 1, depth - 1, alpha, beta, false, m)?;
            }
            if score > best_score {
                best_score = score;
                best_move = m;
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                self.store(hash, NodeType::Cut, depth, score, m);
                self.note_cutoff(ply, m);
                return Ok((score, m));
            }
        }

        let node_type = if best_score <= a_orig {
            NodeType::All
        } else {
            NodeType::Pv
        };
        self.store(hash, node_type, depth, best_score, best_move);

        Ok((best_score, best_move))
    }

    /// Records `m` as a killer at `ply` if it caused this cutoff without
    /// capturing anything -- a capture already ranks itself via
    /// classification, so killer slots are reserved for quiet moves.
    fn note_cutoff(&mut self, ply: u16, m: Move) {
        if m.capture_count() == 0 {
            self.killers.add(ply, m);
        }
    }

    fn store(&mut self, hash: u64, node_type: NodeType, depth: i8, score: Eval, mv: Move) {
        let stored_depth = depth.clamp(0, self.config.max_transposition_depth) as u8;
        self.tt.put(hash, node_type, stored_depth, score, mv, self.age);
    }

    /// Quiescence search: extends past the nominal leaf through captures
    /// and king-mobility swings only, so a static evaluation never fires on
    /// a position where the side to move is about to lose material.
    pub(crate) fn quiescence(
        &mut self,
        state: &mut State,
        ply: u16,
        depth: i8,
        mut alpha: Eval,
        beta: Eval,
    ) -> Result<Eval, SearchError> {
        self.stats.note_node(ply);
        self.check_deadline()?;

        let stand_pat = evaluate::evaluate(state);
        if stand_pat >= beta || depth <= 0 || state.is_terminal() {
            return Ok(stand_pat);
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let mut moves = Vec::new();
        state.legal_moves(&mut moves);

        let mut loud: Vec<Move> = moves
            .into_iter()
            .map(|m| state.classify_move(m))
            .filter(|m| m.capture_count() > 0 || m.blocks_king_exit() || m.king_sees_corner())
            .collect();

        if loud.is_empty() {
            return Ok(stand_pat);
        }

        loud.sort_unstable_by(|a, b| b.raw().cmp(&a.raw()));

        let mut best = stand_pat;
        for m in loud {
            self.check_deadline()?;
            state.make_move(m);
            let score = -self.quiescence(state, ply + 1, depth - 1, -beta, -alpha)?;
            state.unmake_move();

            if score > best {
                best = score;
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                break;
            }
        }

        Ok(best)
    }
}

/// Whether `side`'s forced result (a captured king, say) is a win for
/// `perspective`.
#[cfg(test)]
fn outcome_is_win_for(side: Side, perspective: Side) -> bool {
    side == perspective
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::adapter::{BoardAdapter, Cell};
    use crate::base::bitboard::Bitboard;
    use crate::base::constants::CENTER;
    use crate::base::square::Square;
    use crate::engine::killer::KillerTable;
    use crate::engine::transposition::TranspositionTable;
    use std::time::{Duration, Instant};

    fn searcher<'a>(
        tt: &'a mut TranspositionTable,
        killers: &'a mut KillerTable,
        stats: &'a mut SearchStats,
    ) -> Searcher<'a> {
        Searcher {
            tt,
            killers,
            deadline: Instant::now() + Duration::from_secs(5),
            age: 0,
            config: SearchConfig::default(),
            stats,
        }
    }

    struct Adapter {
        black: Bitboard,
        white: Bitboard,
        king: Square,
        turn: u32,
        side: Side,
    }

    impl BoardAdapter for Adapter {
        fn piece_at(&self, col: u8, row: u8) -> Cell {
            let sq = Square::new(row, col);
            if sq == self.king {
                Cell::King
            } else if self.black.get(sq) {
                Cell::Black
            } else if self.white.get(sq) {
                Cell::White
            } else {
                Cell::Empty
            }
        }
        fn turn_number(&self) -> u32 {
            self.turn
        }
        fn turn_player(&self) -> Side {
            self.side
        }
    }

    #[test]
    fn finds_immediate_king_capture_for_black() {
        // The king stands alone at (2,2) away from the throne, flanked on
        // three sides by black attackers; sliding the fourth attacker in to
        // close the last open side wins on the spot.
        let mut black = Bitboard::EMPTY;
        for (row, col) in [(1, 2), (2, 1), (2, 8)] {
            black.set(Square::new(row, col));
        }
        let mut state = State::from_adapter(&Adapter {
            black,
            white: Bitboard::EMPTY,
            king: Square::new(2, 2),
            turn: 10,
            side: Side::Black,
        })
        .unwrap();

        let mut tt = TranspositionTable::with_size_mb(1);
        let mut killers = KillerTable::new();
        let mut stats = SearchStats::default();
        let mut s = searcher(&mut tt, &mut killers, &mut stats);
        let (score, mv) = s.pvs(&mut state, 0, 3, Eval::NEG_INFINITY, Eval::INFINITY, true).unwrap();

        assert_eq!(mv.from_square(), Square::new(2, 8));
        assert_eq!(mv.to_square(), Square::new(2, 3));
        assert!(score.is_win());
    }

    #[test]
    fn finds_white_escape_to_corner() {
        let mut black = Bitboard::EMPTY;
        black.set(Square::new(8, 8));
        let state_adapter = Adapter {
            black,
            white: Bitboard::EMPTY,
            king: Square::new(0, 1),
            turn: 40,
            side: Side::White,
        };
        let mut state = State::from_adapter(&state_adapter).unwrap();

        let mut tt = TranspositionTable::with_size_mb(1);
        let mut killers = KillerTable::new();
        let mut stats = SearchStats::default();
        let mut s = searcher(&mut tt, &mut killers, &mut stats);
        let (score, mv) = s.pvs(&mut state, 0, 2, Eval::NEG_INFINITY, Eval::INFINITY, true).unwrap();

        assert_eq!(mv.from_square(), Square::new(0, 1));
        assert_eq!(mv.to_square(), Square::new(0, 0));
        assert!(score.is_win());
    }

    #[test]
    fn immediate_timeout_surfaces_as_error() {
        let mut black = Bitboard::EMPTY;
        black.set(Square::new(0, 0));
        let mut state = State::from_adapter(&Adapter {
            black,
            white: Bitboard::EMPTY,
            king: CENTER,
            turn: 1,
            side: Side::Black,
        })
        .unwrap();

        let mut tt = TranspositionTable::with_size_mb(1);
        let mut killers = KillerTable::new();
        let mut stats = SearchStats::default();
        let mut s = Searcher {
            tt: &mut tt,
            killers: &mut killers,
            deadline: Instant::now() - Duration::from_secs(1),
            age: 0,
            config: SearchConfig::default(),
            stats: &mut stats,
        };
        let result = s.pvs(&mut state, 0, 4, Eval::NEG_INFINITY, Eval::INFINITY, true);
        assert_eq!(result, Err(SearchError::Timeout));
    }

    #[test]
    fn quiescence_returns_stand_pat_when_no_loud_moves() {
        let mut black = Bitboard::EMPTY;
        black.set(Square::new(0, 0));
        let mut state = State::from_adapter(&Adapter {
            black,
            white: Bitboard::EMPTY,
            king: CENTER,
            turn: 1,
            side: Side::Black,
        })
        .unwrap();

        let mut tt = TranspositionTable::with_size_mb(1);
        let mut killers = KillerTable::new();
        let mut stats = SearchStats::default();
        let mut s = searcher(&mut tt, &mut killers, &mut stats);
        let stand_pat = evaluate::evaluate(&state);
        let score = s
            .quiescence(&mut state, 0, 10, Eval::NEG_INFINITY, Eval::INFINITY)
            .unwrap();
        assert_eq!(score, stand_pat);
    }

    #[test]
    fn assert_win_helper_matches_same_side() {
        assert!(outcome_is_win_for(Side::Black, Side::Black));
        assert!(!outcome_is_win_for(Side::Black, Side::White));
    }
}
