use crate::board::RegionGrid;
use std::collections::HashMap;

/// Depth-first counter for valid full placements, one row per recursion
/// level. Used columns and used region labels are tracked in bitmasks; the
/// previous row's column enforces the adjacency rule.
struct Searcher<'a> {
    size: usize,
    labels: &'a [u8],
    threshold: usize,
    count: usize,
}

/// Counts placements satisfying the column, adjacency and region constraints,
/// returning early once the count exceeds `threshold`. The result is capped
/// at `threshold + 1`; callers must treat any value above the threshold as a
/// lower bound.
pub fn count_placements(grid: &RegionGrid, threshold: usize) -> usize {
    let labels = dense_labels(grid);

    let mut searcher = Searcher {
        size: grid.size(),
        labels: &labels,
        threshold,
        count: 0,
    };

    searcher.descend(0, 0, None, 0);

    searcher.count
}

impl<'a> Searcher<'a> {
    fn descend(
        &mut self,
        row: usize,
        used_columns: u32,
        previous_column: Option<usize>,
        used_labels: u64,
    ) {
        if row == self.size {
            self.count += 1;
            return;
        }

        for column in 0..self.size {
            if self.count > self.threshold {
                return;
            }

            if used_columns & (1 << column) != 0 {
                continue;
            }

            if let Some(previous) = previous_column {
                let distance = if column > previous {
                    column - previous
                } else {
                    previous - column
                };

                if distance <= 1 {
                    continue;
                }
            }

            let label = self.labels[row * self.size + column];

            if used_labels & (1 << label) != 0 {
                continue;
            }

            self.descend(
                row + 1,
                used_columns | 1 << column,
                Some(column),
                used_labels | 1 << label,
            );
        }
    }
}

/// Remaps the grid's labels onto a dense 0-based range so they fit a 64-bit
/// mask even when the stored label values are not contiguous.
fn dense_labels(grid: &RegionGrid) -> Vec<u8> {
    let size = grid.size();
    let mut indices: HashMap<u8, u8> = HashMap::new();
    let mut labels = Vec::with_capacity(size * size);

    for row in 0..size {
        for column in 0..size {
            let next = indices.len() as u8;
            let index = *indices.entry(grid.label(row, column)).or_insert(next);
            labels.push(index);
        }
    }

    assert!(indices.len() <= 64, "too many distinct region labels");

    labels
}
