use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::{Display, Formatter};

/// An n×n matrix of region labels.
///
/// Every cell carries exactly one label. After partitioning exactly n distinct
/// labels are present, but nothing is guaranteed about how evenly they cover
/// the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionGrid {
    size: usize,
    cells: Vec<u8>,
}

impl RegionGrid {
    pub(crate) fn from_cells(size: usize, cells: Vec<u8>) -> RegionGrid {
        assert_eq!(cells.len(), size * size);

        RegionGrid { size, cells }
    }

    /// Builds a grid from row-major rows, or `None` if the rows are not square.
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Option<RegionGrid> {
        let size = rows.len();

        if rows.iter().any(|row| row.len() != size) {
            return None;
        }

        Some(RegionGrid {
            size,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn label(&self, row: usize, column: usize) -> u8 {
        self.cells[row * self.size + column]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks(self.size.max(1))
    }

    pub fn distinct_label_count(&self) -> usize {
        let mut seen = [false; 256];
        let mut count = 0;

        for &label in &self.cells {
            if !seen[label as usize] {
                seen[label as usize] = true;
                count += 1;
            }
        }

        count
    }

    /// Groups cell coordinates by the label assigned to them. Row-major
    /// traversal keeps every coordinate list sorted.
    fn region_cells(&self) -> BTreeMap<u8, Vec<(usize, usize)>> {
        let mut regions: BTreeMap<u8, Vec<(usize, usize)>> = BTreeMap::new();

        for row in 0..self.size {
            for column in 0..self.size {
                regions
                    .entry(self.label(row, column))
                    .or_default()
                    .push((row, column));
            }
        }

        regions
    }

    /// Structural equality over label→cell-set maps, keyed by the literal
    /// label values. Two identical partitions that use swapped label
    /// identifiers are not considered the same.
    pub fn same_partition(&self, other: &RegionGrid) -> bool {
        if self.size != other.size {
            return false;
        }

        self.region_cells() == other.region_cells()
    }
}

impl Display for RegionGrid {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for row in self.rows() {
            let labels: Vec<String> = row.iter().map(|label| label.to_string()).collect();
            f.write_str(&labels.join(" "))?;
            f.write_str("\n")?;
        }

        Ok(())
    }
}

impl Serialize for RegionGrid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.rows())
    }
}

impl<'de> Deserialize<'de> for RegionGrid {
    fn deserialize<D>(deserializer: D) -> Result<RegionGrid, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rows: Vec<Vec<u8>> = Vec::deserialize(deserializer)?;

        RegionGrid::from_rows(rows)
            .ok_or_else(|| de::Error::custom("region grid rows must form a square matrix"))
    }
}
