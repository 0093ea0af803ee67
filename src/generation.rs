mod placer;
mod regions;

use crate::board::{Placement, RegionGrid};
pub use placer::place_markers;
use rand::Rng;
pub use regions::partition_regions;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    /// The backtracking placer exhausted every column of the first row. Only
    /// possible for degenerate sizes (2 and 3 admit no non-attacking
    /// placement); distinct from a search that found zero solutions.
    #[error("no non-attacking placement exists for board size {size}")]
    NoPlacement { size: usize },
}

/// A freshly generated board before it has been evaluated by the solver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub placement: Placement,
    pub regions: RegionGrid,
}

/// Runs the seed placer and the region partitioner for one candidate board.
pub fn generate_candidate<G: Rng>(size: usize, rng: &mut G) -> Result<Candidate, GenerateError> {
    let placement = place_markers(size, rng)?;
    let regions = partition_regions(size, &placement, rng);

    Ok(Candidate { placement, regions })
}
