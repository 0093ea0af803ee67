//! Generation and verification of "queens" puzzle boards: one marker per
//! row, column and region, with no two markers touching diagonally.

pub mod board;
pub mod collection;
pub mod generation;
pub mod solver;
