//! Chart template, entry data and cell assembly.
pub mod cells;
pub mod data;
pub mod layout;

pub use cells::{build_chart_cells, CellContent, ChartCell};
pub use data::{ChartData, ChartEntry, DroppedElement, Element, Rejection, Space};
pub use layout::{
    generate_chart_template, slot_id, ChartSlot, GridCell, Region, COLUMN_COUNTS,
    PARALLEL_PYRAMID_LIMITS, PYRAMID_HEIGHT,
};
