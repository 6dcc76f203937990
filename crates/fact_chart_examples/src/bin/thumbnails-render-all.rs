use fact_chart::prelude::*;
use fact_chart_examples::{
    compose_chart_sheet, init_tracing, load_chart_data, write_png, SheetStyle,
};
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    init_tracing();
    let data = load_chart_data()?;

    let config = ThumbnailConfig::new(128, 128).with_yield_every(4);
    let mut compositor = ThumbnailCompositor::new(config, SceneAssembler::default())?;

    let mut sink = FnSink::new(|event: ChartEvent| match event {
        ChartEvent::ElementSkipped {
            index,
            shape_type,
            reason,
        } => warn!(index, %shape_type, "skipped element: {reason}"),
        ChartEvent::Warning { context, message } => warn!(%context, "{message}"),
        ChartEvent::BatchYielded { processed } => info!(processed, "batch yielded"),
        ChartEvent::BatchFinished { rendered, failed } => {
            info!(rendered, failed, "thumbnails finished")
        }
        _ => {}
    });
    data.report(&mut sink);
    let cache = compositor.generate(data.entries(), &mut sink);

    std::fs::create_dir_all("thumbnails")?;
    for (id, thumbnail) in cache.iter() {
        std::fs::write(format!("thumbnails/{id}.png"), &thumbnail.png)?;
    }

    let cells = build_chart_cells(&generate_chart_template(), &data, &cache);
    let sheet = compose_chart_sheet(&cells, &cache, (128, 64), &SheetStyle::default());
    write_png(&sheet, "thumbnails-render-all.png")?;
    Ok(())
}
