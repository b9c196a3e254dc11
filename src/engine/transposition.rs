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

//! The transposition table: a flat array of packed entries, replaced by
//! depth and age rather than the teacher's unsafe concurrent bucket array.
//! A single-threaded search has no need for the teacher's atomics or
//! pointer games, so storage here is a plain `Vec` of `Vec`s, split into 64
//! chunks purely to mirror the teacher's bucket-indexing scheme.

use crate::base::moves::Move;
use crate::engine::evaluate::Eval;

/// How an entry's score should be interpreted relative to the window it was
/// searched with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// An exact score: every move was searched inside the window.
    Pv,
    /// A lower bound: a beta cutoff occurred, so the true score is at least
    /// this good.
    Cut,
    /// An upper bound: no move raised alpha, so the true score is at most
    /// this good.
    All,
}

impl NodeType {
    const fn to_bits(self) -> u64 {
        match self {
            NodeType::Pv => 1,
            NodeType::Cut => 3,
            NodeType::All => 2,
        }
    }

    const fn from_bits(bits: u64) -> NodeType {
        match bits & 0x3 {
            1 => NodeType::Pv,
            3 => NodeType::Cut,
            _ => NodeType::All,
        }
    }
}

/// The decoded contents of one transposition table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtData {
    pub node_type: NodeType,
    pub mv: Move,
    pub score: Eval,
    pub depth: u8,
    pub age: u8,
}

impl TtData {
    fn pack(self) -> u64 {
        let mut bits = 0u64;
        bits |= self.node_type.to_bits();
        bits |= (self.mv.untagged().raw() as u64 & 0x3FFF) << 2;
        bits |= ((self.score.raw() as u16) as u64) << 16;
        bits |= (self.depth as u64 & 0x1F) << 32;
        bits |= (self.age as u64 & 0x7F) << 37;
        bits
    }

    fn unpack(bits: u64) -> TtData {
        let node_type = NodeType::from_bits(bits);
        let mv = Move::from_raw(((bits >> 2) & 0x3FFF) as u32);
        let score = Eval::new((((bits >> 16) & 0xFFFF) as u16) as i16);
        let depth = ((bits >> 32) & 0x1F) as u8;
        let age = ((bits >> 37) & 0x7F) as u8;
        TtData {
            node_type,
            mv,
            score,
            depth,
            age,
        }
    }
}

#[derive(Clone, Copy)]
struct Slot {
    hash: u64,
    data: u64,
}

const EMPTY_SLOT: Slot = Slot { hash: 0, data: 0 };

/// How many turns older an incumbent entry must be before it is replaced
/// regardless of depth.
const REPLACEMENT_AGE: u8 = 12;

const CHUNK_COUNT: usize = 64;

/// A fixed-size transposition table, indexed by Zobrist hash.
pub struct TranspositionTable {
    chunks: Vec<Vec<Slot>>,
    capacity: usize,
}

impl TranspositionTable {
    /// Builds a table sized to use approximately `size_mb` megabytes (each
    /// entry is 16 bytes: an 8-byte hash plus an 8-byte packed data word).
    #[must_use]
    pub fn with_size_mb(size_mb: usize) -> TranspositionTable {
        let requested = (size_mb * (1 << 20)) / 16;
        let chunk_len = (requested / CHUNK_COUNT).max(1);
        let chunks = (0..CHUNK_COUNT)
            .map(|_| vec![EMPTY_SLOT; chunk_len])
            .collect();
        TranspositionTable {
            chunks,
            capacity: chunk_len * CHUNK_COUNT,
        }
    }

    fn locate(&self, hash: u64) -> (usize, usize) {
        let index = (hash as usize) % self.capacity;
        (index % CHUNK_COUNT, index / CHUNK_COUNT)
    }

    /// The stored entry for `hash`, if the slot at its index is actually
    /// occupied by `hash` (not a collision with some other key).
    #[must_use]
    pub fn get(&self, hash: u64) -> Option<TtData> {
        let (chunk, slot) = self.locate(hash);
        let entry = &self.chunks[chunk][slot];
        if entry.hash == hash && entry.hash != 0 {
            Some(TtData::unpack(entry.data))
        } else {
            None
        }
    }

    /// Stores `data` for `hash`, unless the incumbent entry is both deeper
    /// and not stale enough to evict.
    pub fn put(
        &mut self,
        hash: u64,
        node_type: NodeType,
        depth: u8,
        score: Eval,
        mv: Move,
        age: u8,
    ) {
        let (chunk, slot) = self.locate(hash);
        let entry = &mut self.chunks[chunk][slot];

        let replace = if entry.hash == 0 {
            true
        } else {
            let incumbent = TtData::unpack(entry.data);
            incumbent.depth < depth || age.saturating_sub(incumbent.age) >= REPLACEMENT_AGE
        };

        if replace {
            entry.hash = hash;
            entry.data = TtData {
                node_type,
                mv: mv.untagged(),
                score,
                depth,
                age,
            }
            .pack();
        }
    }

    /// Empties every slot.
    pub fn clear(&mut self) {
        for chunk in &mut self.chunks {
            chunk.fill(EMPTY_SLOT);
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
