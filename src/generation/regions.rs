use crate::board::{Placement, RegionGrid};
use rand::prelude::*;
use std::collections::VecDeque;

const ORTHOGONAL_OFFSETS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Expansion probability range for ordinary regions. The special region
/// always expands with probability 1 so that its full-cross anchor grows
/// into a solid block.
const EXPANSION_FLOOR: f64 = 0.3;
const EXPANSION_RANGE: f64 = 0.2;

/// Partitions the board into `size` labeled regions around a placement.
///
/// The partition is built in four steps:
/// 1. a random row becomes the "special" region, claiming its whole row and
///    its marker's whole column;
/// 2. every other row seeds a fresh label at its marker cell;
/// 3. a multi-source breadth-first expansion grows each region from its
///    seeds, claiming unlabeled orthogonal neighbours with a per-region
///    probability;
/// 4. cells the expansion never reached take a random neighbouring label, or
///    a fully random one if no neighbour is labeled yet.
///
/// Step 4 makes total coverage a hard invariant. The output is randomized;
/// reproducibility requires seeding `rng` externally.
pub fn partition_regions<G: Rng>(size: usize, placement: &Placement, rng: &mut G) -> RegionGrid {
    assert_eq!(placement.size(), size);

    let mut cells: Vec<Option<u8>> = vec![None; size * size];

    let mut label_pool: Vec<u8> = (0..size as u8).collect();
    label_pool.shuffle(rng);

    // Step 1: the special region spans a full row/column cross.
    let special_row = rng.gen_range(0, size);
    let special_column = placement.column(special_row);
    let special_label = label_pool[0];

    for column in 0..size {
        cells[special_row * size + column] = Some(special_label);
    }
    for row in 0..size {
        cells[row * size + special_column] = Some(special_label);
    }

    // Step 2: every other row seeds a not-yet-used label at its marker cell,
    // drawn from the shuffled pool and replenished if it runs dry.
    let mut seeds = vec![(special_row, special_column, special_label)];
    let mut available: Vec<u8> = label_pool[1..].to_vec();

    for row in 0..size {
        if row == special_row {
            continue;
        }

        if available.is_empty() {
            available = label_pool
                .iter()
                .copied()
                .filter(|&label| label != special_label)
                .collect();
        }

        let label = available.swap_remove(rng.gen_range(0, available.len()));
        let column = placement.column(row);

        cells[row * size + column] = Some(label);
        seeds.push((row, column, label));
    }

    // Step 3: multi-source FIFO expansion. A failed probabilistic claim is
    // never retried; the neighbour may be claimed later by another region or
    // left for step 4.
    let mut expansion_probability = vec![0.0; size];

    for &(_, _, label) in &seeds {
        expansion_probability[label as usize] = if label == special_label {
            1.0
        } else {
            EXPANSION_FLOOR + EXPANSION_RANGE * rng.gen::<f64>()
        };
    }

    let mut queue: VecDeque<(usize, usize, u8)> = seeds.into_iter().collect();

    while let Some((row, column, label)) = queue.pop_front() {
        for (neighbour_row, neighbour_column) in orthogonal_neighbours(row, column, size) {
            let cell = &mut cells[neighbour_row * size + neighbour_column];

            if cell.is_none() && rng.gen::<f64>() < expansion_probability[label as usize] {
                *cell = Some(label);
                queue.push_back((neighbour_row, neighbour_column, label));
            }
        }
    }

    // Step 4: sweep up anything the expansion missed, preferring labels
    // already present among the orthogonal neighbours.
    for row in 0..size {
        for column in 0..size {
            if cells[row * size + column].is_some() {
                continue;
            }

            let mut neighbour_labels: Vec<u8> = Vec::with_capacity(4);

            for (neighbour_row, neighbour_column) in orthogonal_neighbours(row, column, size) {
                if let Some(label) = cells[neighbour_row * size + neighbour_column] {
                    if !neighbour_labels.contains(&label) {
                        neighbour_labels.push(label);
                    }
                }
            }

            let label = match neighbour_labels.choose(rng) {
                Some(&label) => label,
                None => *label_pool.choose(rng).unwrap(),
            };

            cells[row * size + column] = Some(label);
        }
    }

    let cells = cells
        .into_iter()
        .map(|cell| cell.expect("every cell is labeled after the cleanup sweep"))
        .collect();

    RegionGrid::from_cells(size, cells)
}

fn orthogonal_neighbours(
    row: usize,
    column: usize,
    size: usize,
) -> impl Iterator<Item = (usize, usize)> {
    ORTHOGONAL_OFFSETS.iter().filter_map(move |&(dr, dc)| {
        let neighbour_row = row as isize + dr;
        let neighbour_column = column as isize + dc;

        if neighbour_row >= 0
            && neighbour_row < size as isize
            && neighbour_column >= 0
            && neighbour_column < size as isize
        {
            Some((neighbour_row as usize, neighbour_column as usize))
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::place_markers;
    use quickcheck_macros::quickcheck;

    #[quickcheck]
    fn every_cell_is_labeled_and_all_labels_appear(seed: u64, size_selector: u8) -> bool {
        let size = 4 + (size_selector % 7) as usize;
        let mut rng = StdRng::seed_from_u64(seed);

        let placement = place_markers(size, &mut rng).unwrap();
        let grid = partition_regions(size, &placement, &mut rng);

        grid.size() == size && grid.distinct_label_count() == size
    }

    #[test]
    fn one_region_spans_a_full_row_and_column_cross() {
        let mut rng = StdRng::seed_from_u64(3);

        let placement = place_markers(7, &mut rng).unwrap();
        let grid = partition_regions(7, &placement, &mut rng);

        let cross = (0..7).find(|&row| {
            let label = grid.label(row, 0);
            (0..7).all(|column| grid.label(row, column) == label)
                && (0..7).all(|other| grid.label(other, placement.column(row)) == label)
        });

        assert!(cross.is_some(), "no full-cross region in\n{}", grid);
    }

    #[test]
    fn marker_cells_stay_in_distinct_regions() {
        let mut rng = StdRng::seed_from_u64(5);

        let placement = place_markers(8, &mut rng).unwrap();
        let grid = partition_regions(8, &placement, &mut rng);

        let mut labels: Vec<u8> = (0..8)
            .map(|row| grid.label(row, placement.column(row)))
            .collect();
        labels.sort();
        labels.dedup();

        assert_eq!(labels.len(), 8);
    }

    #[test]
    fn orthogonal_neighbours_clip_at_the_edges() {
        let corner: Vec<(usize, usize)> = orthogonal_neighbours(0, 0, 4).collect();
        let interior: Vec<(usize, usize)> = orthogonal_neighbours(2, 1, 4).collect();

        assert_eq!(corner, vec![(1, 0), (0, 1)]);
        assert_eq!(interior, vec![(1, 1), (3, 1), (2, 0), (2, 2)]);
    }
}
