//! Joins the chart template with loaded data and rendered thumbnails.
use serde::Serialize;

use crate::chart::data::ChartData;
use crate::chart::layout::{ChartSlot, GridCell};
use crate::render::thumbnail::ThumbnailCache;

/// What a chart cell shows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CellContent {
    /// The slot has an entry. `thumbnail` is a PNG data URL when one was rendered.
    #[serde(rename_all = "camelCase")]
    Populated {
        entry_id: String,
        thumbnail: Option<String>,
    },
    /// The slot has no entry and shows its id as text.
    Placeholder { label: String },
}

/// One laid-out cell of the chart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartCell {
    pub slot_id: String,
    pub grid: GridCell,
    pub is_parallel: bool,
    pub content: CellContent,
}

impl ChartCell {
    pub fn is_populated(&self) -> bool {
        matches!(self.content, CellContent::Populated { .. })
    }
}

/// One cell per slot, in slot order. Slots without data become placeholders.
pub fn build_chart_cells(
    slots: &[ChartSlot],
    data: &ChartData,
    thumbnails: &ThumbnailCache,
) -> Vec<ChartCell> {
    slots
        .iter()
        .map(|slot| {
            let content = match data.get(&slot.id) {
                Some(entry) => CellContent::Populated {
                    entry_id: entry.id.clone(),
                    thumbnail: thumbnails.get(&entry.id).map(|t| t.data_url()),
                },
                None => CellContent::Placeholder {
                    label: slot.id.clone(),
                },
            };
            ChartCell {
                slot_id: slot.id.clone(),
                grid: slot.grid_cell(),
                is_parallel: slot.is_parallel_pyramid,
                content,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::data::{ChartEntry, Space};
    use crate::chart::layout::generate_chart_template;

    #[test]
    fn missing_entries_become_placeholders() {
        let slots = generate_chart_template();
        let data = ChartData::from_entries([
            ChartEntry::new(0, 1, Space::default(), Space::default()),
            ChartEntry::new(3, 20, Space::default(), Space::default()),
        ]);
        let cells = build_chart_cells(&slots, &data, &ThumbnailCache::new());
        assert_eq!(cells.len(), slots.len());
        assert_eq!(cells.iter().filter(|c| c.is_populated()).count(), 2);

        let ear = cells.iter().find(|c| c.slot_id == "3-DOF-20").unwrap();
        assert_eq!(ear.grid, GridCell { column: 8, row: 4 });
        assert_eq!(
            ear.content,
            CellContent::Populated {
                entry_id: "3-DOF-20".into(),
                thumbnail: None
            }
        );

        let empty = cells.iter().find(|c| c.slot_id == "1-DOF-2").unwrap();
        assert_eq!(
            empty.content,
            CellContent::Placeholder {
                label: "1-DOF-2".into()
            }
        );
        assert!(empty.is_parallel);
    }
}
