use super::GenerateError;
use crate::board::Placement;
use rand::prelude::*;

/// Mutable scratch state threaded through the backtracking search. Column and
/// diagonal occupancy is tracked in bitmasks; the main diagonal index
/// `row - column` is offset by `size - 1` to stay non-negative.
struct SearchFrame {
    columns: Vec<u8>,
    used_columns: u32,
    main_diagonals: u64,
    anti_diagonals: u64,
}

/// Finds one non-attacking placement of `size` markers on a `size`×`size`
/// board by randomized row-by-row backtracking.
///
/// The randomization only diversifies which placement is returned; it never
/// affects whether one is found. Sizes 2 and 3 have no solution and report
/// [`GenerateError::NoPlacement`].
pub fn place_markers<G: Rng>(size: usize, rng: &mut G) -> Result<Placement, GenerateError> {
    assert!(size <= 32, "board size {} exceeds bitmask capacity", size);

    let mut frame = SearchFrame {
        columns: Vec::with_capacity(size),
        used_columns: 0,
        main_diagonals: 0,
        anti_diagonals: 0,
    };

    if descend(size, 0, &mut frame, rng) {
        Ok(Placement::new(frame.columns))
    } else {
        Err(GenerateError::NoPlacement { size })
    }
}

fn descend<G: Rng>(size: usize, row: usize, frame: &mut SearchFrame, rng: &mut G) -> bool {
    if row == size {
        return true;
    }

    let mut candidates: Vec<usize> = (0..size).collect();
    candidates.shuffle(rng);

    for column in candidates {
        let column_bit = 1u32 << column;
        let main_bit = 1u64 << (row + size - 1 - column);
        let anti_bit = 1u64 << (row + column);

        if frame.used_columns & column_bit != 0
            || frame.main_diagonals & main_bit != 0
            || frame.anti_diagonals & anti_bit != 0
        {
            continue;
        }

        frame.columns.push(column as u8);
        frame.used_columns |= column_bit;
        frame.main_diagonals |= main_bit;
        frame.anti_diagonals |= anti_bit;

        if descend(size, row + 1, frame, rng) {
            return true;
        }

        frame.columns.pop();
        frame.used_columns &= !column_bit;
        frame.main_diagonals &= !main_bit;
        frame.anti_diagonals &= !anti_bit;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;
    use std::collections::HashSet;

    fn is_non_attacking(placement: &Placement) -> bool {
        let size = placement.size();

        let columns: HashSet<usize> = (0..size).map(|row| placement.column(row)).collect();
        if columns.len() != size {
            return false;
        }

        for a in 0..size {
            for b in a + 1..size {
                let (column_a, column_b) = (placement.column(a), placement.column(b));

                if a + column_b == b + column_a || a + column_a == b + column_b {
                    return false;
                }
            }
        }

        true
    }

    #[quickcheck]
    fn placements_are_non_attacking(seed: u64, size_selector: u8) -> bool {
        let size = 4 + (size_selector % 7) as usize;
        let mut rng = StdRng::seed_from_u64(seed);

        let placement = place_markers(size, &mut rng).unwrap();

        placement.size() == size && is_non_attacking(&placement)
    }

    #[test]
    fn trivial_board_places_the_only_marker() {
        let mut rng = StdRng::seed_from_u64(0);

        let placement = place_markers(1, &mut rng).unwrap();

        assert_eq!(placement.columns(), &[0]);
    }

    #[test]
    fn sizes_without_a_solution_are_reported() {
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(
            place_markers(2, &mut rng),
            Err(GenerateError::NoPlacement { size: 2 })
        );
        assert_eq!(
            place_markers(3, &mut rng),
            Err(GenerateError::NoPlacement { size: 3 })
        );
    }

    #[test]
    fn large_boards_always_find_a_placement() {
        let mut rng = StdRng::seed_from_u64(17);

        for size in 4..=17 {
            assert!(place_markers(size, &mut rng).is_ok(), "size {}", size);
        }
    }
}
