use fact_chart::prelude::*;
use fact_chart_examples::{compose_grid, init_tracing, load_chart_data, write_png};

fn main() -> anyhow::Result<()> {
    init_tracing();
    let data = load_chart_data()?;
    let Some(entry) = data.get("2-DOF-5").or_else(|| data.entries().first()) else {
        anyhow::bail!("chart data has no entries");
    };

    let mut viewer = ModalViewer::init(ViewerConfig::new(256, 256), SceneAssembler::default())?;
    let (handle, _) = viewer.show(entry, &mut ());

    // Half a turn queued once; damping spreads it over the frames.
    viewer.controls_mut().rotate(std::f32::consts::PI, 0.2);

    let mut tiles = Vec::new();
    for i in 0..48 {
        let Some(frame) = viewer.frame()? else {
            break;
        };
        debug_assert_eq!(frame.handle, handle);
        if i % 8 == 0 {
            tiles.push(frame.freedom.clone());
            tiles.push(frame.constraint.clone());
        }
    }
    viewer.hide();
    assert!(viewer.frame()?.is_none());

    let sheet = compose_grid(&tiles, 2, 4, [40, 40, 40]);
    write_png(&sheet, "viewer-orbit-frames.png")?;
    Ok(())
}
