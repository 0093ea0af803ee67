use crate::board::RegionGrid;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Per-size cache of every column permutation respecting the row/column and
/// adjacent-column constraints, ignoring region labels. The set only depends
/// on the board size, so one enumeration serves every board of that size.
///
/// Population happens at most once per size under the write lock; later
/// lookups share the computed set through the read path.
pub struct PermutationCache {
    positions: RwLock<HashMap<usize, Arc<Vec<Vec<u8>>>>>,
}

impl PermutationCache {
    pub fn new() -> PermutationCache {
        PermutationCache {
            positions: RwLock::new(HashMap::new()),
        }
    }

    pub fn positions(&self, size: usize) -> Arc<Vec<Vec<u8>>> {
        if let Some(positions) = self.positions.read().unwrap().get(&size) {
            return positions.clone();
        }

        let mut map = self.positions.write().unwrap();

        map.entry(size)
            .or_insert_with(|| Arc::new(enumerate_positions(size)))
            .clone()
    }
}

impl Default for PermutationCache {
    fn default() -> PermutationCache {
        PermutationCache::new()
    }
}

/// Enumerates all permutations of `0..size` where consecutive entries differ
/// by more than one, by depth-first backtracking in ascending column order.
fn enumerate_positions(size: usize) -> Vec<Vec<u8>> {
    let mut positions = Vec::new();
    let mut current: Vec<u8> = Vec::with_capacity(size);
    let mut used = vec![false; size];

    descend(size, &mut current, &mut used, &mut positions);

    positions
}

fn descend(size: usize, current: &mut Vec<u8>, used: &mut Vec<bool>, positions: &mut Vec<Vec<u8>>) {
    if current.len() == size {
        positions.push(current.clone());
        return;
    }

    for column in 0..size as u8 {
        if used[column as usize] {
            continue;
        }

        if let Some(&previous) = current.last() {
            let distance = if column > previous {
                column - previous
            } else {
                previous - column
            };

            if distance <= 1 {
                continue;
            }
        }

        used[column as usize] = true;
        current.push(column);

        descend(size, current, used, positions);

        current.pop();
        used[column as usize] = false;
    }
}

/// Counts the cached permutations whose marker cells all land in distinct
/// regions of `grid`, stopping once the count exceeds `threshold`.
pub(super) fn count_label_compatible(
    positions: &[Vec<u8>],
    grid: &RegionGrid,
    threshold: usize,
) -> usize {
    let mut count = 0;

    for position in positions {
        if is_label_compatible(position, grid) {
            count += 1;

            if count > threshold {
                break;
            }
        }
    }

    count
}

fn is_label_compatible(position: &[u8], grid: &RegionGrid) -> bool {
    let mut seen = [false; 256];

    for (row, &column) in position.iter().enumerate() {
        let label = grid.label(row, column as usize) as usize;

        if seen[label] {
            return false;
        }

        seen[label] = true;
    }

    true
}
