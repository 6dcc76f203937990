//! Fixed chart template and grid placement.
//!
//! The chart has one column per DOF value `0..=6`. Column `dof` holds `COLUMN_COUNTS[dof]`
//! rows, numbered from 1. Rows at or below `PARALLEL_PYRAMID_LIMITS[dof]` belong to the
//! parallel pyramid. The 22-row DOF 3 column spills into two side "ears" of six rows each.
use serde::{Deserialize, Serialize};

/// Number of rows in each DOF column.
pub const COLUMN_COUNTS: [u32; 7] = [1, 3, 10, 22, 10, 3, 1];

/// Highest row number inside the parallel pyramid for each DOF column.
pub const PARALLEL_PYRAMID_LIMITS: [u32; 7] = [1, 3, 9, 9, 3, 1, 0];

/// Visual height of the pyramid in grid rows.
pub const PYRAMID_HEIGHT: u32 = 10;

/// Total number of slots in the chart.
pub const SLOT_COUNT: usize = 50;

const LEFT_EAR_ROWS: std::ops::RangeInclusive<u32> = 11..=16;
const RIGHT_EAR_ROWS: std::ops::RangeInclusive<u32> = 17..=22;

/// Where a slot is placed on the grid.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    #[default]
    Default,
    LeftEar,
    RightEar,
}

impl Region {
    pub fn classify(dof: u32, row: u32) -> Self {
        if dof != 3 {
            Region::Default
        } else if LEFT_EAR_ROWS.contains(&row) {
            Region::LeftEar
        } else if RIGHT_EAR_ROWS.contains(&row) {
            Region::RightEar
        } else {
            Region::Default
        }
    }
}

/// One-based grid coordinates of a cell. Left-ear cells share row 0.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCell {
    pub column: u32,
    pub row: u32,
}

/// One addressable position of the chart.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChartSlot {
    pub id: String,
    pub dof: u32,
    pub row: u32,
    pub is_parallel_pyramid: bool,
    pub region: Region,
}

impl ChartSlot {
    pub fn new(dof: u32, row: u32) -> Self {
        let limit = PARALLEL_PYRAMID_LIMITS
            .get(dof as usize)
            .copied()
            .unwrap_or(0);
        Self {
            id: slot_id(dof, row),
            dof,
            row,
            is_parallel_pyramid: row <= limit,
            region: Region::classify(dof, row),
        }
    }

    pub fn grid_cell(&self) -> GridCell {
        match self.region {
            Region::Default => GridCell {
                column: self.dof + 2,
                row: (PYRAMID_HEIGHT + 1).saturating_sub(self.row),
            },
            Region::LeftEar => GridCell { column: 2, row: 0 },
            Region::RightEar => GridCell {
                column: 8,
                row: self.row - 16,
            },
        }
    }
}

/// The id a chart entry must carry to occupy slot `(dof, row)`.
pub fn slot_id(dof: u32, row: u32) -> String {
    format!("{dof}-DOF-{row}")
}

/// All chart slots, in column-major order (dof ascending, then row ascending).
pub fn generate_chart_template() -> Vec<ChartSlot> {
    let mut slots = Vec::with_capacity(SLOT_COUNT);
    for (dof, &count) in COLUMN_COUNTS.iter().enumerate() {
        for row in 1..=count {
            slots.push(ChartSlot::new(dof as u32, row));
        }
    }
    slots
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn fifty_unique_slots() {
        let slots = generate_chart_template();
        assert_eq!(slots.len(), SLOT_COUNT);
        let ids: HashSet<&str> = slots.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), SLOT_COUNT);
    }

    #[test]
    fn column_counts_match() {
        let slots = generate_chart_template();
        for (dof, &count) in COLUMN_COUNTS.iter().enumerate() {
            let rows: Vec<u32> = slots
                .iter()
                .filter(|s| s.dof == dof as u32)
                .map(|s| s.row)
                .collect();
            assert_eq!(rows.len() as u32, count);
            assert_eq!(rows, (1..=count).collect::<Vec<_>>());
        }
    }

    #[test]
    fn parallel_flag_follows_limits() {
        for slot in generate_chart_template() {
            let limit = PARALLEL_PYRAMID_LIMITS[slot.dof as usize];
            assert_eq!(slot.is_parallel_pyramid, slot.row <= limit, "{}", slot.id);
        }
        let last = ChartSlot::new(6, 1);
        assert!(!last.is_parallel_pyramid);
    }

    #[test]
    fn ears_only_in_dof_three() {
        for slot in generate_chart_template() {
            let expected = match (slot.dof, slot.row) {
                (3, 11..=16) => Region::LeftEar,
                (3, 17..=22) => Region::RightEar,
                _ => Region::Default,
            };
            assert_eq!(slot.region, expected, "{}", slot.id);
        }
    }

    #[test]
    fn default_region_placement_is_injective() {
        let slots = generate_chart_template();
        let cells: Vec<GridCell> = slots
            .iter()
            .filter(|s| s.region == Region::Default)
            .map(ChartSlot::grid_cell)
            .collect();
        let unique: HashSet<GridCell> = cells.iter().copied().collect();
        assert_eq!(unique.len(), cells.len());
    }

    #[test]
    fn grid_rules() {
        assert_eq!(ChartSlot::new(0, 1).grid_cell(), GridCell { column: 2, row: 10 });
        assert_eq!(ChartSlot::new(3, 10).grid_cell(), GridCell { column: 5, row: 1 });
        assert_eq!(ChartSlot::new(3, 12).grid_cell(), GridCell { column: 2, row: 0 });
        assert_eq!(ChartSlot::new(3, 17).grid_cell(), GridCell { column: 8, row: 1 });
        assert_eq!(ChartSlot::new(3, 22).grid_cell(), GridCell { column: 8, row: 6 });
    }

    #[test]
    fn template_is_reproducible() {
        assert_eq!(generate_chart_template(), generate_chart_template());
    }

    #[test]
    fn slot_serializes_with_kebab_region() {
        let json = serde_json::to_string(&ChartSlot::new(3, 20)).unwrap();
        assert!(json.contains("\"region\":\"right-ear\""));
        assert!(json.contains("\"isParallelPyramid\":false"));
    }
}
