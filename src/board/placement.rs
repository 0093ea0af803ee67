use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

pub const MARKER_SYMBOL: char = 'Q';
pub const BLANK_SYMBOL: char = '.';

/// A non-attacking marker placement: index is the row, value is the column.
///
/// Invariant: all columns are distinct and no two rows share a diagonal.
/// Constructed only by the seed placer, immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement(Vec<u8>);

impl Placement {
    pub(crate) fn new(columns: Vec<u8>) -> Placement {
        Placement(columns)
    }

    pub fn size(&self) -> usize {
        self.0.len()
    }

    pub fn column(&self, row: usize) -> usize {
        self.0[row] as usize
    }

    pub fn columns(&self) -> &[u8] {
        &self.0
    }

    /// Renders the placement as a character board with one marker per row.
    pub fn marker_board(&self) -> MarkerBoard {
        let size = self.size();

        let rows = (0..size)
            .map(|row| {
                let mut cells = vec![BLANK_SYMBOL; size];
                cells[self.column(row)] = MARKER_SYMBOL;
                cells
            })
            .collect();

        MarkerBoard(rows)
    }
}

/// A human-readable board: `Q` where a marker sits, `.` everywhere else.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerBoard(Vec<Vec<char>>);

impl MarkerBoard {
    pub fn size(&self) -> usize {
        self.0.len()
    }

    pub fn rows(&self) -> &[Vec<char>] {
        &self.0
    }
}

impl Display for MarkerBoard {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for row in &self.0 {
            for &cell in row {
                f.write_fmt(format_args!("{}", cell))?;
            }
            f.write_str("\n")?;
        }

        Ok(())
    }
}
