mod grid;
mod placement;

pub use grid::RegionGrid;
pub use placement::{MarkerBoard, Placement, BLANK_SYMBOL, MARKER_SYMBOL};
