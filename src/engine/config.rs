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

//! Engine-wide tunables, fixed once at construction.

/// The time budget granted to the very first move of a game, in
/// nanoseconds. The opening position has the largest branching factor and
/// an empty transposition table, so it gets the most generous allowance.
pub const START_TURN_BUDGET_NS: u64 = 9_950_000_000;

/// The time budget granted to every subsequent move, in nanoseconds.
pub const TURN_BUDGET_NS: u64 = 1_950_000_000;

/// The default transposition table size, in megabytes.
pub const TT_SIZE_MB: usize = 340;

/// The default maximum number of half-moves before a game is drawn.
pub const MAX_MOVES: u16 = 100;

/// Configuration for an [`Engine`](crate::engine::driver::Engine): how much
/// time it is given per move and how large its transposition table is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Time budget for the first move of a game, in nanoseconds.
    pub start_turn_budget_ns: u64,
    /// Time budget for every move after the first, in nanoseconds.
    pub turn_budget_ns: u64,
    /// Transposition table size, in megabytes.
    pub tt_size_mb: usize,
    /// Maximum half-moves before the game is a draw.
    pub max_moves: u16,
    /// Tuning knobs for the search itself, as opposed to the clock and the
    /// transposition table's size.
    pub search: SearchConfig,
}

impl EngineConfig {
    #[must_use]
    pub const fn new(
        start_turn_budget_ns: u64,
        turn_budget_ns: u64,
        tt_size_mb: usize,
        max_moves: u16,
    ) -> EngineConfig {
        EngineConfig {
            start_turn_budget_ns,
            turn_budget_ns,
            tt_size_mb,
            max_moves,
            search: SearchConfig::new(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> EngineConfig {
        EngineConfig {
            start_turn_budget_ns: START_TURN_BUDGET_NS,
            turn_budget_ns: TURN_BUDGET_NS,
            tt_size_mb: TT_SIZE_MB,
            max_moves: MAX_MOVES,
            search: SearchConfig::new(),
        }
    }
}

/// Tuning knobs for one call to [`crate::engine::search::Searcher::pvs`],
/// grouped the way the teacher groups its own `SearchConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// How far past the nominal leaf depth the quiescence search may chase
    /// captures and king-mobility swings.
    pub quiescence_depth: i8,
    /// The shallowest depth at which internal iterative deepening is worth
    /// running (spec.md section 4.6, step 5a).
    pub iid_min_depth: i8,
    /// The largest remaining depth a transposition entry can record; depths
    /// beyond this are clamped down before storage (spec.md's 5-bit depth
    /// field tops out at 31).
    pub max_transposition_depth: i8,
    /// The deepest iterative-deepening depth the driver's loop will attempt,
    /// independent of `remaining_moves` or the deadline.
    pub iteration_cap: u8,
}

impl SearchConfig {
    #[must_use]
    pub const fn new() -> SearchConfig {
        SearchConfig {
            quiescence_depth: 10,
            iid_min_depth: 3,
            max_transposition_depth: 31,
            iteration_cap: 64,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> SearchConfig {
        SearchConfig::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.start_turn_budget_ns, START_TURN_BUDGET_NS);
        assert_eq!(config.turn_budget_ns, TURN_BUDGET_NS);
        assert_eq!(config.tt_size_mb, TT_SIZE_MB);
        assert_eq!(config.max_moves, MAX_MOVES);
        assert_eq!(config.search, SearchConfig::default());
    }

    #[test]
    fn new_and_default_search_config_agree() {
        assert_eq!(SearchConfig::new(), SearchConfig::default());
    }
}
