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

//! Packed move representation.
//!
//! A move is a single `u32`: the low 14 bits are the (from, to) square pair,
//! and the remaining bits carry classification tags used only for move
//! ordering. Two moves with the same (from, to) but different tags are the
//! "same" move as far as the host or the transposition table is concerned,
//! which is why every tag bit has an `untagged` escape hatch.

use std::fmt::{self, Display, Formatter};

use crate::base::square::Square;

const FROM_SHIFT: u32 = 0;
const TO_SHIFT: u32 = 7;
const SQUARE_MASK: u32 = 0x7F;

const KILLER_BIT: u32 = 22;
const BLOCKS_KING_EXIT_BIT: u32 = 23;
const KING_SEES_CORNER_BIT: u32 = 24;
const CAPTURE_SHIFT: u32 = 25;
const CAPTURE_MASK: u32 = 0x3;
const IID_BIT: u32 = 28;

/// A packed (from, to) move, with classification bits in the high bits used
/// only for search-time move ordering.
///
/// # Examples
///
/// ```
/// use tafl_engine::base::moves::Move;
/// use tafl_engine::Square;
///
/// let m = Move::new(Square::new(0, 0), Square::new(0, 3));
/// assert_eq!(m.from_square(), Square::new(0, 0));
/// assert_eq!(m.to_square(), Square::new(0, 3));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move(u32);

impl Move {
    /// A sentinel for "no move", used where the search has not yet chosen
    /// one (e.g. an unfilled transposition slot, a sentinel returned when a
    /// search iteration is aborted by the deadline).
    pub const NONE: Move = Move(0);

    /// Constructs a move with no classification tags.
    #[must_use]
    pub const fn new(from: Square, to: Square) -> Move {
        Move(((from.index() as u32) << FROM_SHIFT) | ((to.index() as u32) << TO_SHIFT))
    }

    /// Constructs a move directly from its packed bits.
    #[must_use]
    pub const fn from_raw(bits: u32) -> Move {
        Move(bits)
    }

    /// This move's raw packed bits, used when the full tagged integer must
    /// be compared for ordering.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn from_square(self) -> Square {
        Square::from_index(((self.0 >> FROM_SHIFT) & SQUARE_MASK) as u8)
    }

    #[must_use]
    pub const fn to_square(self) -> Square {
        Square::from_index(((self.0 >> TO_SHIFT) & SQUARE_MASK) as u8)
    }

    /// This move with every classification tag cleared, leaving only the
    /// (from, to) pair. Used as the key for table lookups and equality
    /// comparisons that must ignore ordering metadata.
    #[must_use]
    pub const fn untagged(self) -> Move {
        Move(self.0 & ((SQUARE_MASK << FROM_SHIFT) | (SQUARE_MASK << TO_SHIFT)))
    }

    /// Whether `self` and `other` address the same (from, to) pair,
    /// ignoring classification tags.
    #[must_use]
    pub const fn same_move(self, other: Move) -> bool {
        self.untagged().0 == other.untagged().0
    }

    #[must_use]
    pub const fn with_killer(self, flag: bool) -> Move {
        Move(set_bit(self.0, KILLER_BIT, flag))
    }

    #[must_use]
    pub const fn is_killer(self) -> bool {
        get_bit(self.0, KILLER_BIT)
    }

    #[must_use]
    pub const fn with_blocks_king_exit(self, flag: bool) -> Move {
        Move(set_bit(self.0, BLOCKS_KING_EXIT_BIT, flag))
    }

    #[must_use]
    pub const fn blocks_king_exit(self) -> bool {
        get_bit(self.0, BLOCKS_KING_EXIT_BIT)
    }

    #[must_use]
    pub const fn with_king_sees_corner(self, flag: bool) -> Move {
        Move(set_bit(self.0, KING_SEES_CORNER_BIT, flag))
    }

    #[must_use]
    pub const fn king_sees_corner(self) -> bool {
        get_bit(self.0, KING_SEES_CORNER_BIT)
    }

    #[must_use]
    pub const fn with_capture_count(self, count: u8) -> Move {
        let clamped = if count as u32 > CAPTURE_MASK {
            CAPTURE_MASK
        } else {
            count as u32
        };
        Move((self.0 & !(CAPTURE_MASK << CAPTURE_SHIFT)) | (clamped << CAPTURE_SHIFT))
    }

    #[must_use]
    pub const fn capture_count(self) -> u8 {
        ((self.0 >> CAPTURE_SHIFT) & CAPTURE_MASK) as u8
    }

    #[must_use]
    pub const fn with_iid(self, flag: bool) -> Move {
        Move(set_bit(self.0, IID_BIT, flag))
    }

    #[must_use]
    pub const fn is_iid(self) -> bool {
        get_bit(self.0, IID_BIT)
    }

    /// Whether any classification bit (capture count, king-mobility tags,
    /// killer, or IID) is set. Used to split a move list into "critical"
    /// moves (searched first, in tag order) and "regular" moves.
    #[must_use]
    pub const fn is_critical(self) -> bool {
        (self.0 >> 14) != 0
    }
}

const fn set_bit(bits: u32, index: u32, flag: bool) -> u32 {
    if flag {
        bits | (1 << index)
    } else {
        bits & !(1 << index)
    }
}

const fn get_bit(bits: u32, index: u32) -> bool {
    (bits >> index) & 1 != 0
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from_square(), self.to_square())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Move({} -> {}, captures={}, tags={:#x})",
            self.from_square(),
            self.to_square(),
            self.capture_count(),
            self.0 >> 14
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_to_round_trip() {
        let m = Move::new(Square::new(8, 8), Square::new(0, 0));
        assert_eq!(m.from_square(), Square::new(8, 8));
        assert_eq!(m.to_square(), Square::new(0, 0));
    }

    #[test]
    fn untagged_clears_classification_bits() {
        let m = Move::new(Square::new(1, 1), Square::new(1, 5))
            .with_capture_count(2)
            .with_killer(true)
            .with_iid(true);
        let bare = Move::new(Square::new(1, 1), Square::new(1, 5));
        assert_eq!(m.untagged(), bare);
        assert!(m.same_move(bare));
    }

    #[test]
    fn capture_count_saturates_at_three() {
        let m = Move::NONE.with_capture_count(9);
        assert_eq!(m.capture_count(), 3);
    }

    #[test]
    fn is_critical_detects_any_tag() {
        let plain = Move::new(Square::new(0, 1), Square::new(0, 2));
        assert!(!plain.is_critical());
        assert!(plain.with_capture_count(1).is_critical());
        assert!(plain.with_killer(true).is_critical());
        assert!(plain.with_blocks_king_exit(true).is_critical());
    }

    #[test]
    fn ordering_uses_full_raw_value() {
        let low = Move::new(Square::new(0, 0), Square::new(0, 1));
        let high = low.with_capture_count(3);
        assert!(high.raw() > low.raw());
    }
}
