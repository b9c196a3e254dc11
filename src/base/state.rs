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

//! The Tablut game state: bitboards, side to move, Zobrist hash, and the
//! make/unmake history stack a search walks up and down.

use std::fmt::{self, Display, Formatter};

use crate::base::adapter::{AdapterError, BoardAdapter, Cell};
use crate::base::bitboard::Bitboard;
use crate::base::constants::{CENTER, CORNERS, KING_ONLY, KING_SURROUND, ONE_CROSS, TWO_CROSS};
use crate::base::moves::Move;
use crate::base::square::Square;
use crate::base::zobrist::{self, PieceKind};

/// The maximum number of half-moves (turns) a game may run before it is
/// declared a draw.
pub const MAX_MOVES: u16 = 100;

/// The maximum number of legal moves reachable from any one position: 8
/// pieces (7 black attackers plus the king can never all move, but the
/// bound is computed per-side) times up to 8 destinations along a row plus
/// 8 along a column, rounded up generously. A caller may rely on a buffer
/// of this size never overflowing.
pub const MAX_MOVES_BUFFER: usize = 192;

/// One of the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Black,
    White,
}

impl Side {
    #[must_use]
    pub const fn opposite(self) -> Side {
        match self {
            Side::Black => Side::White,
            Side::White => Side::Black,
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Side::Black => write!(f, "black"),
            Side::White => write!(f, "white"),
        }
    }
}

/// The result of a finished game, or `Ongoing` if it has not ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ongoing,
    Win(Side),
    Draw,
}

impl Outcome {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Outcome::Ongoing)
    }
}

/// The full state of the board at one point in time: every field here is
/// `Copy`, so a scratch copy (for classifying a candidate move, say) costs
/// nothing but a memcpy and needs no explicit undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Position {
    black: Bitboard,
    white: Bitboard,
    king_square: Option<Square>,
    side_to_move: Side,
    turn_number: u16,
    hash: u64,
    last_move: Move,
}

impl Position {
    fn occupancy(&self) -> Bitboard {
        let king = match self.king_square {
            Some(sq) => Bitboard::from_square(sq),
            None => Bitboard::EMPTY,
        };
        self.black | self.white | king
    }

    /// The pieces belonging to `side`: for white this includes the king.
    fn side_pieces(&self, side: Side) -> Bitboard {
        match side {
            Side::Black => self.black,
            Side::White => {
                let king = match self.king_square {
                    Some(sq) => Bitboard::from_square(sq),
                    None => Bitboard::EMPTY,
                };
                self.white | king
            }
        }
    }
}

/// The squares a single piece standing on `sq` can slide to, given the full
/// board occupancy `occ`, sliding along its row and its column.
fn slide_destinations(occ: Bitboard, sq: Square) -> Bitboard {
    use crate::base::constants::LINE_MOVES;

    let row = sq.row();
    let col = sq.col();
    let mut out = Bitboard::EMPTY;

    let row_occ = occ.row_bits(row);
    let horizontal = &LINE_MOVES[col as usize][row_occ as usize];
    for c in 0..9u8 {
        if horizontal.mask & (1 << c) != 0 {
            out.set(Square::new(row, c));
        }
    }

    let col_occ = occ.col_bits(col);
    let vertical = &LINE_MOVES[row as usize][col_occ as usize];
    for r in 0..9u8 {
        if vertical.mask & (1 << r) != 0 {
            out.set(Square::new(r, col));
        }
    }

    out
}

/// Whether the king (wherever it currently stands in `pos`) has a single
/// legal slide onto a corner.
fn king_can_reach_corner(pos: &Position) -> bool {
    match pos.king_square {
        Some(sq) => !(slide_destinations(pos.occupancy(), sq) & *CORNERS).is_empty(),
        None => false,
    }
}

/// Applies `m` to `pos` in place: moves the piece, resolves captures, flips
/// the side to move, and updates the hash. Returns the number of pieces
/// captured (including the king, if this move captures it).
///
/// This is the single core mutator shared by `State::make_move` (which also
/// pushes an undo snapshot) and `State::classify_move` (which runs it on a
/// disposable scratch copy and discards the result).
fn apply_move(pos: &mut Position, m: Move) -> u32 {
    let from = m.from_square();
    let to = m.to_square();
    let mover = pos.side_to_move;

    let moving_king = mover == Side::White && pos.king_square == Some(from);
    if moving_king {
        pos.king_square = Some(to);
        pos.hash ^= zobrist::piece_key(PieceKind::King, from);
        pos.hash ^= zobrist::piece_key(PieceKind::King, to);
    } else {
        let (board, kind) = match mover {
            Side::Black => (&mut pos.black, PieceKind::BlackAttacker),
            Side::White => (&mut pos.white, PieceKind::WhiteDefender),
        };
        board.clear(from);
        board.set(to);
        pos.hash ^= zobrist::piece_key(kind, from);
        pos.hash ^= zobrist::piece_key(kind, to);
    }

    let assisting = (pos.side_pieces(mover) | *KING_ONLY) & TWO_CROSS[to.index() as usize];
    let opponent = pos.side_pieces(mover.opposite());
    let mut captured = assisting.to_neighbors() & opponent & ONE_CROSS[to.index() as usize];

    if mover == Side::Black {
        if let Some(king_sq) = pos.king_square {
            if captured.get(king_sq) {
                let king_neighbors = ONE_CROSS[king_sq.index() as usize];
                let mut n = (king_neighbors & pos.black).cardinality();
                if king_neighbors.get(CENTER) {
                    n += 1;
                }
                if KING_SURROUND.get(king_sq) && n < 4 {
                    captured.clear(king_sq);
                }
            }
        }
    }

    let mut count = 0u32;
    for sq in captured.squares() {
        count += 1;
        if mover == Side::Black && pos.king_square == Some(sq) {
            pos.hash ^= zobrist::piece_key(PieceKind::King, sq);
            pos.king_square = None;
        } else {
            match mover {
                Side::Black => {
                    pos.white.clear(sq);
                    pos.hash ^= zobrist::piece_key(PieceKind::WhiteDefender, sq);
                }
                Side::White => {
                    pos.black.clear(sq);
                    pos.hash ^= zobrist::piece_key(PieceKind::BlackAttacker, sq);
                }
            }
        }
    }

    pos.last_move = m.untagged();
    pos.side_to_move = mover.opposite();
    pos.turn_number += 1;
    pos.hash ^= zobrist::side_key();

    count
}

/// The Tablut game state.
#[derive(Debug, Clone)]
pub struct State {
    pos: Position,
    history: Vec<Position>,
}

impl State {
    /// Builds a `State` from a host's board, validating piece counts and
    /// the presence of exactly one king.
    pub fn from_adapter(board: &impl BoardAdapter) -> Result<State, AdapterError> {
        let mut black = Bitboard::EMPTY;
        let mut white = Bitboard::EMPTY;
        let mut king_square = None;

        for row in 0..9u8 {
            for col in 0..9u8 {
                let sq = Square::new(row, col);
                match board.piece_at(col, row) {
                    Cell::Empty => {}
                    Cell::Black => black.set(sq),
                    Cell::White => white.set(sq),
                    Cell::King => {
                        if king_square.is_some() {
                            return Err(AdapterError::DuplicateKing);
                        }
                        king_square = Some(sq);
                    }
                }
            }
        }

        let black_count = black.cardinality() as usize;
        let white_count = white.cardinality() as usize;
        if black_count > 16 {
            return Err(AdapterError::TooManyBlack(black_count));
        }
        if white_count > 8 {
            return Err(AdapterError::TooManyWhite(white_count));
        }
        let king_square = king_square.ok_or(AdapterError::MissingKing)?;

        let side_to_move = board.turn_player();
        let turn_number = u16::try_from(board.turn_number()).unwrap_or(u16::MAX);

        let mut hash = 0u64;
        for sq in black.squares() {
            hash ^= zobrist::piece_key(PieceKind::BlackAttacker, sq);
        }
        for sq in white.squares() {
            hash ^= zobrist::piece_key(PieceKind::WhiteDefender, sq);
        }
        hash ^= zobrist::piece_key(PieceKind::King, king_square);
        if side_to_move == Side::Black {
            hash ^= zobrist::side_key();
        }

        Ok(State {
            pos: Position {
                black,
                white,
                king_square: Some(king_square),
                side_to_move,
                turn_number,
                hash,
                last_move: Move::NONE,
            },
            history: Vec::new(),
        })
    }

    #[must_use]
    pub fn side_to_move(&self) -> Side {
        self.pos.side_to_move
    }

    #[must_use]
    pub fn hash(&self) -> u64 {
        self.pos.hash
    }

    #[must_use]
    pub fn turn_number(&self) -> u16 {
        self.pos.turn_number
    }

    #[must_use]
    pub fn remaining_moves(&self) -> u16 {
        MAX_MOVES.saturating_sub(self.pos.turn_number)
    }

    #[must_use]
    pub fn king_square(&self) -> Option<Square> {
        self.pos.king_square
    }

    #[must_use]
    pub fn last_move(&self) -> Move {
        self.pos.last_move
    }

    #[must_use]
    pub fn black(&self) -> Bitboard {
        self.pos.black
    }

    #[must_use]
    pub fn white(&self) -> Bitboard {
        self.pos.white
    }

    /// The outcome of the game in its current state, derived from the
    /// position rather than tracked incrementally: the king being off the
    /// board means black captured it, the king standing on a corner means
    /// white walked it home, and the move counter running out means a draw.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        match self.pos.king_square {
            None => Outcome::Win(Side::Black),
            Some(sq) if CORNERS.get(sq) => Outcome::Win(Side::White),
            _ if self.pos.turn_number >= MAX_MOVES => Outcome::Draw,
            _ => Outcome::Ongoing,
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.outcome().is_terminal()
    }

    fn occupancy(&self) -> Bitboard {
        self.pos.occupancy()
    }

    /// Appends every legal move for the side to move to `out`, returning the
    /// number appended.
    pub fn legal_moves(&self, out: &mut Vec<Move>) -> usize {
        self.moves_for(self.pos.side_to_move, out)
    }

    /// The number of legal moves `side` has in the current position,
    /// regardless of whose turn it actually is. Used by the evaluator to
    /// compare both sides' mobility without needing to flip the side to
    /// move.
    #[must_use]
    pub fn mobility(&self, side: Side) -> u32 {
        let mut scratch = Vec::new();
        self.moves_for(side, &mut scratch) as u32
    }

    fn moves_for(&self, side: Side, out: &mut Vec<Move>) -> usize {
        let start = out.len();
        let occ = self.occupancy();
        let not_king_only = KING_ONLY.complement();

        match side {
            Side::Black => {
                for from in self.pos.black.squares() {
                    let dests = slide_destinations(occ, from) & not_king_only;
                    for to in dests.squares() {
                        out.push(Move::new(from, to));
                    }
                }
            }
            Side::White => {
                for from in self.pos.white.squares() {
                    let dests = slide_destinations(occ, from) & not_king_only;
                    for to in dests.squares() {
                        out.push(Move::new(from, to));
                    }
                }
                if let Some(king_sq) = self.pos.king_square {
                    let dests = slide_destinations(occ, king_sq);
                    for to in dests.squares() {
                        out.push(Move::new(king_sq, to));
                    }
                }
            }
        }

        debug_assert!(out.len() - start <= MAX_MOVES_BUFFER);
        out.len() - start
    }

    /// Applies `m`, pushing an undo snapshot onto the history stack.
    pub fn make_move(&mut self, m: Move) {
        self.history.push(self.pos);
        apply_move(&mut self.pos, m);
    }

    /// Undoes the most recent `make_move`. Panics if there is nothing to
    /// undo, the same contract as the teacher's own history stack.
    pub fn unmake_move(&mut self) {
        self.pos = self
            .history
            .pop()
            .expect("unmake_move called with no prior make_move");
    }

    /// Tags `m` with its classification bits (capture count and king
    /// mobility effect) by running it on a disposable scratch position.
    /// Never committed to the main history stack.
    #[must_use]
    pub fn classify_move(&self, m: Move) -> Move {
        let mover = self.pos.side_to_move;
        let before_escape = king_can_reach_corner(&self.pos);

        let mut scratch = self.pos;
        let captured = apply_move(&mut scratch, m);

        let after_escape = king_can_reach_corner(&scratch);

        let mut tagged = m.untagged().with_capture_count(captured.min(3) as u8);
        if mover == Side::Black && before_escape && !after_escape {
            tagged = tagged.with_blocks_king_exit(true);
        }
        if mover == Side::White && !before_escape && after_escape {
            tagged = tagged.with_king_sees_corner(true);
        }
        tagged
    }

    /// A compact, human-legible encoding used only by tests: 81 characters
    /// (row-major, `B`/`W`/`K`/`.`), a space, then `b` or `w` for the side to
    /// move.
    #[cfg(any(test, feature = "test-util"))]
    #[must_use]
    pub fn to_compact_string(&self) -> String {
        let mut s = String::with_capacity(83);
        for row in 0..9u8 {
            for col in 0..9u8 {
                let sq = Square::new(row, col);
                let ch = if self.pos.king_square == Some(sq) {
                    'K'
                } else if self.pos.black.get(sq) {
                    'B'
                } else if self.pos.white.get(sq) {
                    'W'
                } else {
                    '.'
                };
                s.push(ch);
            }
        }
        s.push(' ');
        s.push(match self.pos.side_to_move {
            Side::Black => 'b',
            Side::White => 'w',
        });
        s
    }

    /// Parses the format written by [`State::to_compact_string`].
    #[cfg(any(test, feature = "test-util"))]
    #[must_use]
    pub fn from_compact_string(s: &str) -> State {
        let mut chars = s.chars();
        let mut black = Bitboard::EMPTY;
        let mut white = Bitboard::EMPTY;
        let mut king_square = None;

        for row in 0..9u8 {
            for col in 0..9u8 {
                let sq = Square::new(row, col);
                match chars.next().expect("compact string too short") {
                    'B' => black.set(sq),
                    'W' => white.set(sq),
                    'K' => king_square = Some(sq),
                    '.' => {}
                    other => panic!("unexpected cell char '{other}' in compact string"),
                }
            }
        }
        assert_eq!(chars.next(), Some(' '), "missing separator in compact string");
        let side_to_move = match chars.next().expect("missing side-to-move char") {
            'b' => Side::Black,
            'w' => Side::White,
            other => panic!("unexpected side-to-move char '{other}'"),
        };

        let mut hash = 0u64;
        for sq in black.squares() {
            hash ^= zobrist::piece_key(PieceKind::BlackAttacker, sq);
        }
        for sq in white.squares() {
            hash ^= zobrist::piece_key(PieceKind::WhiteDefender, sq);
        }
        if let Some(sq) = king_square {
            hash ^= zobrist::piece_key(PieceKind::King, sq);
        }
        if side_to_move == Side::Black {
            hash ^= zobrist::side_key();
        }

        State {
            pos: Position {
                black,
                white,
                king_square,
                side_to_move,
                turn_number: 0,
                hash,
                last_move: Move::NONE,
            },
            history: Vec::new(),
        }
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in 0..9u8 {
            for col in 0..9u8 {
                let sq = Square::new(row, col);
                let ch = if self.pos.king_square == Some(sq) {
                    'K'
                } else if self.pos.black.get(sq) {
                    'B'
                } else if self.pos.white.get(sq) {
                    'W'
                } else {
                    '.'
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        write!(f, "{} to move", self.pos.side_to_move)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn starting_position() -> State {
        // The standard Tablut opening: king on the throne, 8 white
        // defenders on its cross, 16 black attackers at the board edges.
        let mut black = Bitboard::EMPTY;
        let mut white = Bitboard::EMPTY;
        for (row, col) in [
            (0, 3), (0, 4), (0, 5),
            (1, 4),
            (3, 0), (4, 0), (5, 0),
            (4, 1),
            (3, 8), (4, 8), (5, 8),
            (4, 7),
            (8, 3), (8, 4), (8, 5),
            (7, 4),
        ] {
            black.set(Square::new(row, col));
        }
        for (row, col) in [
            (2, 4), (3, 4), (5, 4), (6, 4),
            (4, 2), (4, 3), (4, 5), (4, 6),
        ] {
            white.set(Square::new(row, col));
        }
        struct StartAdapter {
            black: Bitboard,
            white: Bitboard,
        }
        impl BoardAdapter for StartAdapter {
            fn piece_at(&self, col: u8, row: u8) -> Cell {
                let sq = Square::new(row, col);
                if sq == CENTER {
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
                0
            }
            fn turn_player(&self) -> Side {
                Side::Black
            }
        }
        State::from_adapter(&StartAdapter { black, white }).unwrap()
    }

    #[test]
    fn from_adapter_builds_expected_piece_counts() {
        let state = starting_position();
        assert_eq!(state.black().cardinality(), 16);
        assert_eq!(state.white().cardinality(), 8);
        assert_eq!(state.king_square(), Some(CENTER));
        assert_eq!(state.side_to_move(), Side::Black);
        assert_eq!(state.outcome(), Outcome::Ongoing);
    }

    #[test]
    fn missing_king_is_rejected() {
        struct EmptyAdapter;
        impl BoardAdapter for EmptyAdapter {
            fn piece_at(&self, _col: u8, _row: u8) -> Cell {
                Cell::Empty
            }
            fn turn_number(&self) -> u32 {
                0
            }
            fn turn_player(&self) -> Side {
                Side::Black
            }
        }
        assert_eq!(
            State::from_adapter(&EmptyAdapter).unwrap_err(),
            AdapterError::MissingKing
        );
    }

    #[test]
    fn make_then_unmake_restores_state() {
        let mut state = starting_position();
        let before = state.to_compact_string();
        let mut moves = Vec::new();
        state.legal_moves(&mut moves);
        assert!(!moves.is_empty());
        state.make_move(moves[0]);
        assert_ne!(state.to_compact_string(), before);
        state.unmake_move();
        assert_eq!(state.to_compact_string(), before);
    }

    #[test]
    fn compact_string_round_trips() {
        let state = starting_position();
        let s = state.to_compact_string();
        let parsed = State::from_compact_string(&s);
        assert_eq!(parsed.black(), state.black());
        assert_eq!(parsed.white(), state.white());
        assert_eq!(parsed.king_square(), state.king_square());
    }

    #[test]
    fn king_captured_on_open_board_yields_black_win() {
        // King alone in open field, one black attacker already adjacent and
        // a second sliding in from afar to close the sandwich.
        struct Adapter(Bitboard, Square);
        impl BoardAdapter for Adapter {
            fn piece_at(&self, col: u8, row: u8) -> Cell {
                let sq = Square::new(row, col);
                if sq == self.1 {
                    Cell::King
                } else if self.0.get(sq) {
                    Cell::Black
                } else {
                    Cell::Empty
                }
            }
            fn turn_number(&self) -> u32 {
                10
            }
            fn turn_player(&self) -> Side {
                Side::Black
            }
        }
        let mut one_flank = Bitboard::EMPTY;
        one_flank.set(Square::new(2, 1));
        one_flank.set(Square::new(2, 8));
        let mut state = State::from_adapter(&Adapter(one_flank, Square::new(2, 2))).unwrap();
        let closing = Move::new(Square::new(2, 8), Square::new(2, 3));
        state.make_move(closing);
        assert_eq!(state.king_square(), None);
        assert_eq!(state.outcome(), Outcome::Win(Side::Black));
    }

    #[test]
    fn king_on_corner_yields_white_win() {
        let mut black = Bitboard::EMPTY;
        black.set(Square::new(8, 8));
        struct Adapter(Bitboard, Square);
        impl BoardAdapter for Adapter {
            fn piece_at(&self, col: u8, row: u8) -> Cell {
                let sq = Square::new(row, col);
                if sq == self.1 {
                    Cell::King
                } else if self.0.get(sq) {
                    Cell::Black
                } else {
                    Cell::Empty
                }
            }
            fn turn_number(&self) -> u32 {
                50
            }
            fn turn_player(&self) -> Side {
                Side::White
            }
        }
        let state = State::from_adapter(&Adapter(black, Square::new(0, 0))).unwrap();
        assert_eq!(state.outcome(), Outcome::Win(Side::White));
    }

    #[test]
    fn move_count_exhausted_is_a_draw() {
        let mut black = Bitboard::EMPTY;
        black.set(Square::new(0, 0));
        struct Adapter(Bitboard, Square);
        impl BoardAdapter for Adapter {
            fn piece_at(&self, col: u8, row: u8) -> Cell {
                let sq = Square::new(row, col);
                if sq == self.1 {
                    Cell::King
                } else if self.0.get(sq) {
                    Cell::Black
                } else {
                    Cell::Empty
                }
            }
            fn turn_number(&self) -> u32 {
                MAX_MOVES as u32
            }
            fn turn_player(&self) -> Side {
                Side::White
            }
        }
        let state = State::from_adapter(&Adapter(black, Square::new(4, 1))).unwrap();
        assert_eq!(state.outcome(), Outcome::Draw);
    }

    #[test]
    fn king_on_throne_needs_four_attackers() {
        // King on the throne with attackers on three of its four cross
        // neighbors: not enough to capture.
        let mut black = Bitboard::EMPTY;
        black.set(Square::new(3, 4));
        black.set(Square::new(5, 4));
        black.set(Square::new(4, 3));
        struct Adapter(Bitboard);
        impl BoardAdapter for Adapter {
            fn piece_at(&self, col: u8, row: u8) -> Cell {
                let sq = Square::new(row, col);
                if sq == CENTER {
                    Cell::King
                } else if self.0.get(sq) {
                    Cell::Black
                } else {
                    Cell::Empty
                }
            }
            fn turn_number(&self) -> u32 {
                20
            }
            fn turn_player(&self) -> Side {
                Side::Black
            }
        }
        // Bring a fourth attacker in to close the ring from (4,5).
        let mut approach = black;
        approach.set(Square::new(0, 5));
        let mut state = State::from_adapter(&Adapter(approach)).unwrap();
        let closing = Move::new(Square::new(0, 5), Square::new(4, 5));
        state.make_move(closing);
        assert_eq!(state.king_square(), None);
        assert_eq!(state.outcome(), Outcome::Win(Side::Black));
    }

    #[test]
    fn king_on_throne_with_only_three_attackers_is_safe() {
        let mut black = Bitboard::EMPTY;
        black.set(Square::new(3, 4));
        black.set(Square::new(5, 4));
        black.set(Square::new(0, 3));
        struct Adapter(Bitboard);
        impl BoardAdapter for Adapter {
            fn piece_at(&self, col: u8, row: u8) -> Cell {
                let sq = Square::new(row, col);
                if sq == CENTER {
                    Cell::King
                } else if self.0.get(sq) {
                    Cell::Black
                } else {
                    Cell::Empty
                }
            }
            fn turn_number(&self) -> u32 {
                20
            }
            fn turn_player(&self) -> Side {
                Side::Black
            }
        }
        let mut state = State::from_adapter(&Adapter(black)).unwrap();
        let approach = Move::new(Square::new(0, 3), Square::new(4, 3));
        state.make_move(approach);
        assert_eq!(state.king_square(), Some(CENTER));
        assert_eq!(state.outcome(), Outcome::Ongoing);
    }

    #[test]
    fn legal_moves_of_starting_position_are_nonempty_and_within_buffer() {
        let state = starting_position();
        let mut moves = Vec::new();
        let n = state.legal_moves(&mut moves);
        assert!(n > 0);
        assert!(n <= MAX_MOVES_BUFFER);
        for m in &moves {
            assert!(state.black().get(m.from_square()));
        }
    }

    #[test]
    fn classify_move_reports_captures() {
        // King well away from the throne, so only the ordinary two-flank
        // sandwich rule applies: one attacker already adjacent, a second
        // sliding in from afar to close the trap.
        let mut black = Bitboard::EMPTY;
        black.set(Square::new(2, 1));
        black.set(Square::new(2, 8));
        struct Adapter(Bitboard, Square);
        impl BoardAdapter for Adapter {
            fn piece_at(&self, col: u8, row: u8) -> Cell {
                let sq = Square::new(row, col);
                if sq == self.1 {
                    Cell::King
                } else if self.0.get(sq) {
                    Cell::Black
                } else {
                    Cell::Empty
                }
            }
            fn turn_number(&self) -> u32 {
                10
            }
            fn turn_player(&self) -> Side {
                Side::Black
            }
        }
        let state = State::from_adapter(&Adapter(black, Square::new(2, 2))).unwrap();
        let closing = Move::new(Square::new(2, 8), Square::new(2, 3));
        let tagged = state.classify_move(closing);
        assert_eq!(tagged.capture_count(), 1);
    }
}
