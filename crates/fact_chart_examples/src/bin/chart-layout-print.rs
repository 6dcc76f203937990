use fact_chart::prelude::*;
use fact_chart_examples::{init_tracing, load_chart_data};

fn main() -> anyhow::Result<()> {
    init_tracing();
    let slots = generate_chart_template();
    let data = load_chart_data()?;

    for rejection in data.rejected() {
        println!(
            "rejected #{} ({}): {}",
            rejection.index,
            rejection.id.as_deref().unwrap_or("<no id>"),
            rejection.reason
        );
    }
    for element in data.dropped_elements() {
        println!(
            "dropped {} {} element {:?}: {}",
            element.entry_id, element.space, element.index, element.reason
        );
    }

    // Empty cache: populated cells carry no thumbnail here.
    let cells = build_chart_cells(&slots, &data, &ThumbnailCache::new());
    let populated = cells.iter().filter(|c| c.is_populated()).count();
    println!(
        "{} slots, {populated} populated, {} placeholders",
        cells.len(),
        cells.len() - populated
    );

    for (slot, cell) in slots.iter().zip(&cells) {
        println!(
            "{:>9}  col {} row {:>2}  {:<10} {}{}",
            slot.id,
            cell.grid.column,
            cell.grid.row,
            format!("{:?}", slot.region),
            if cell.is_parallel { "parallel " } else { "" },
            if cell.is_populated() { "*" } else { "" },
        );
    }

    println!("{}", serde_json::to_string_pretty(&cells)?);
    Ok(())
}
