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

//! A clamped centipawn-style score, plus the hand-tuned static evaluator
//! that produces one from a [`State`].
//!
//! Unlike the teacher's own `Eval`, this one carries no mate-distance
//! stepping machinery: a Tablut game has a hard move limit, so a terminal
//! score is expressed directly in "moves remaining" rather than requiring
//! adjustment as it is passed up the search tree.

use std::ops::{Add, Neg, Sub};

use once_cell::sync::Lazy;

use crate::base::constants::CORNERS;
use crate::base::square::Square;
use crate::base::state::{Outcome, Side, State};

/// A score, in centipawn-like units, clamped to `[-WIN_VALUE, WIN_VALUE]`
/// for ongoing positions. A terminal position's score lies just outside
/// that range: `sign * (WIN_VALUE + remaining_moves)`, so that a win found
/// in fewer remaining moves (a faster win) always outranks one found with
/// more remaining moves left on the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Eval(i16);

impl Eval {
    /// The boundary between an ordinary positional score and a score that
    /// reports a forced win.
    pub const WIN_VALUE: i16 = 20_000;

    pub const ZERO: Eval = Eval(0);

    /// A bound guaranteed to exceed any real score, used as the root
    /// alpha/beta window. Chosen with enough headroom above `WIN_VALUE`
    /// that negation and `+1` nudges during search never overflow `i16`.
    pub const INFINITY: Eval = Eval(21_000);
    pub const NEG_INFINITY: Eval = Eval(-21_000);

    #[must_use]
    pub const fn new(raw: i16) -> Eval {
        Eval(raw)
    }

    #[must_use]
    pub const fn raw(self) -> i16 {
        self.0
    }

    /// Clamps an arbitrary accumulator down into the ordinary score range.
    #[must_use]
    pub fn clamped(raw: i32) -> Eval {
        Eval(raw.clamp(-(Self::WIN_VALUE as i32), Self::WIN_VALUE as i32) as i16)
    }

    /// The score for a win found with `remaining_moves` left before the
    /// draw cutoff: the fewer moves remaining, the higher (faster) the win.
    #[must_use]
    pub const fn win_in(remaining_moves: u16) -> Eval {
        Eval(Self::WIN_VALUE + remaining_moves as i16)
    }

    #[must_use]
    pub const fn loss_in(remaining_moves: u16) -> Eval {
        Eval(-(Self::WIN_VALUE + remaining_moves as i16))
    }

    #[must_use]
    pub const fn is_win(self) -> bool {
        self.0 > Self::WIN_VALUE
    }

    #[must_use]
    pub const fn is_loss(self) -> bool {
        self.0 < -Self::WIN_VALUE
    }

    /// `self`, from the perspective of `side`: negated if `side` is not the
    /// perspective the score was already computed in.
    #[must_use]
    pub const fn in_perspective(self, side: Side, computed_for: Side) -> Eval {
        match (side as u8) == (computed_for as u8) {
            true => self,
            false => Eval(-self.0),
        }
    }
}

impl Neg for Eval {
    type Output = Eval;
    fn neg(self) -> Eval {
        Eval(-self.0)
    }
}

impl Add<i16> for Eval {
    type Output = Eval;
    fn add(self, rhs: i16) -> Eval {
        Eval(self.0.saturating_add(rhs))
    }
}

impl Sub<i16> for Eval {
    type Output = Eval;
    fn sub(self, rhs: i16) -> Eval {
        Eval(self.0.saturating_sub(rhs))
    }
}

impl std::fmt::Display for Eval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_win() {
            write!(f, "win in {}", self.0 - Self::WIN_VALUE)
        } else if self.is_loss() {
            write!(f, "loss in {}", -self.0 - Self::WIN_VALUE)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

// --- Hand-tuned evaluation weights -----------------------------------

const BLACK_PIECE_VALUE: i32 = 40;
const WHITE_PIECE_VALUE: i32 = 90;
const MOBILITY_WEIGHT: i32 = 2;
const KING_DISTANCE_WEIGHT: i32 = 3;
const KING_CORNER_MOVE_BONUS: i32 = 60;
const THREAT_WEIGHT: i32 = 50;

/// `SQUARE_VALUE[kind][sq]` is a small per-square positional bonus, built
/// once from each square's geometric relationship to the corners and the
/// throne, the same way the teacher builds its piece-square tables: loop
/// over every square once at startup, cache the result.
struct RegionTables {
    black: [i16; 81],
    white: [i16; 81],
    king: [i16; 81],
}

static REGIONS: Lazy<RegionTables> = Lazy::new(|| {
    let mut black = [0i16; 81];
    let mut white = [0i16; 81];
    let mut king = [0i16; 81];
    let corners = [
        Square::new(0, 0),
        Square::new(0, 8),
        Square::new(8, 0),
        Square::new(8, 8),
    ];
    let center = Square::new(4, 4);
    for idx in 0..81u8 {
        let sq = Square::from_index(idx);
        let corner_dist = corners
            .iter()
            .map(|c| sq.chebyshev_distance(*c))
            .min()
            .unwrap_or(8) as i16;
        let center_dist = sq.chebyshev_distance(center) as i16;
        // Black wants to choke off the approaches to the corners.
        black[idx as usize] = 8 - corner_dist;
        // White defenders value squares near the throne, where they shield
        // the king's escape lanes.
        white[idx as usize] = 6 - center_dist;
        // The king is rewarded for edging toward any corner.
        king[idx as usize] = 10 - corner_dist;
    }
    RegionTables { black, white, king }
});

/// The static positional evaluation of `state`, from the perspective of its
/// side to move, clamped to the ordinary score range. Terminal states are
/// scored directly from [`State::outcome`] rather than by this formula.
#[must_use]
pub fn evaluate(state: &State) -> Eval {
    match state.outcome() {
        Outcome::Win(winner) => {
            return if winner == state.side_to_move() {
                Eval::win_in(state.remaining_moves())
            } else {
                Eval::loss_in(state.remaining_moves())
            };
        }
        Outcome::Draw => return Eval::ZERO,
        Outcome::Ongoing => {}
    }

    let black = state.black();
    let white = state.white();

    let mut black_score: i32 = 0;
    black_score += black.cardinality() as i32 * BLACK_PIECE_VALUE;
    black_score -= white.cardinality() as i32 * WHITE_PIECE_VALUE;

    for sq in black.squares() {
        black_score += REGIONS.black[sq.index() as usize] as i32;
    }
    for sq in white.squares() {
        black_score -= REGIONS.white[sq.index() as usize] as i32;
    }

    let black_mobility = state.mobility(Side::Black);
    let white_mobility = state.mobility(Side::White);
    black_score += (black_mobility as i32 - white_mobility as i32) * MOBILITY_WEIGHT;

    if let Some(king_sq) = state.king_square() {
        black_score += REGIONS.king[king_sq.index() as usize] as i32;
        let mut distance_sum = 0i32;
        for sq in black.squares() {
            distance_sum += sq.chebyshev_distance(king_sq) as i32;
        }
        black_score -= distance_sum * KING_DISTANCE_WEIGHT;
    }

    let king_escape_bonus = king_corner_reach_count(state) as i32 * KING_CORNER_MOVE_BONUS;
    black_score -= king_escape_bonus;

    let mut side_relative = match state.side_to_move() {
        Side::Black => black_score,
        Side::White => -black_score,
    };

    side_relative += threat_term(state) * THREAT_WEIGHT;

    Eval::clamped(side_relative)
}

fn king_corner_reach_count(state: &State) -> u32 {
    let Some(king_sq) = state.king_square() else {
        return 0;
    };
    let occ = state.black() | state.white() | crate::base::bitboard::Bitboard::from_square(king_sq);
    let row_occ = occ.row_bits(king_sq.row());
    let col_occ = occ.col_bits(king_sq.col());
    let horizontal = &crate::base::constants::LINE_MOVES[king_sq.col() as usize][row_occ as usize];
    let vertical = &crate::base::constants::LINE_MOVES[king_sq.row() as usize][col_occ as usize];
    let mut count = 0u32;
    for c in 0..9u8 {
        if horizontal.mask & (1 << c) != 0 {
            let sq = Square::new(king_sq.row(), c);
            if CORNERS.get(sq) {
                count += 1;
            }
        }
    }
    for r in 0..9u8 {
        if vertical.mask & (1 << r) != 0 {
            let sq = Square::new(r, king_sq.col());
            if CORNERS.get(sq) {
                count += 1;
            }
        }
    }
    count
}

/// The number of opponent pieces that the side to move could capture with
/// some legal move this turn, reusing the same capture simulation that
/// tags moves for ordering.
fn threat_term(state: &State) -> i32 {
    let mut moves = Vec::new();
    state.legal_moves(&mut moves);
    moves
        .iter()
        .map(|&m| state.classify_move(m).capture_count() as i32)
        .sum()
}
