mod permutations;
mod search;

use crate::board::RegionGrid;
pub use permutations::PermutationCache;
pub use search::count_placements;
use thiserror::Error;

pub const DEFAULT_THRESHOLD: usize = 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SolveError {
    /// A threshold of zero would make every board look over-budget before a
    /// single solution is counted; callers must ask for at least one.
    #[error("solution threshold must be at least 1")]
    InvalidThreshold,
}

/// The verdict for one evaluated board.
///
/// `solution_count` is exact while it is at most the requested threshold; any
/// value above the threshold is a lower bound only, because the search stops
/// as soon as the threshold is exceeded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    pub name: String,
    pub solvable: bool,
    pub solution_count: usize,
    /// Total candidate placements considered, when the permutation-list
    /// engine produced the outcome. The depth-first engine prunes before
    /// materializing candidates and reports `None`.
    pub candidates_considered: Option<usize>,
}

/// Counts valid full placements on `grid` with the depth-first bitmask
/// engine, stopping once the count exceeds `threshold`.
///
/// A placement is valid when every row and column holds exactly one marker,
/// markers in adjacent rows sit in columns more than one apart, and no two
/// markers share a region label.
pub fn solve(name: &str, grid: &RegionGrid, threshold: usize) -> Result<SearchOutcome, SolveError> {
    if threshold == 0 {
        return Err(SolveError::InvalidThreshold);
    }

    let solution_count = search::count_placements(grid, threshold);

    Ok(SearchOutcome {
        name: name.to_owned(),
        solvable: solution_count > 0,
        solution_count,
        candidates_considered: None,
    })
}

/// Same contract as [`solve`], but filters the cached per-size permutation
/// set instead of searching. The permutation set ignores region labels, so it
/// is shared across every board of the same size; the label constraint is
/// applied per board on top.
pub fn solve_with_cache(
    name: &str,
    grid: &RegionGrid,
    threshold: usize,
    cache: &PermutationCache,
) -> Result<SearchOutcome, SolveError> {
    if threshold == 0 {
        return Err(SolveError::InvalidThreshold);
    }

    let positions = cache.positions(grid.size());
    let solution_count = permutations::count_label_compatible(&positions, grid, threshold);

    Ok(SearchOutcome {
        name: name.to_owned(),
        solvable: solution_count > 0,
        solution_count,
        candidates_considered: Some(positions.len()),
    })
}
