use fact_chart::prelude::*;
use fact_chart_examples::{compose_grid, init_tracing, write_png};
use glam::Vec3;
use serde_json::Map;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let registry = ShapeRegistry::with_builtins();
    let camera = PerspectiveCamera::default()
        .with_position(Vec3::new(2.5, 2.0, 4.0))
        .look_at(Vec3::ZERO);
    let mut renderer = Renderer::new(256, 256)?;
    renderer.set_clear_color(Color::WHITE, 1.0);

    let mut tiles = Vec::new();
    for kind in ShapeKind::ALL {
        let node = registry.create(kind.name(), &Map::new())?;
        let mut scene = Scene::new(None);
        scene.add(node);
        renderer.render(&scene, &camera)?;
        tiles.push(renderer.image().clone());
        println!("{:<22} {:>5} primitives", kind.name(), scene.nodes()[0].primitive_count());
    }

    let sheet = compose_grid(&tiles, 4, 6, [255, 255, 255]);
    write_png(&sheet, "shapes-gallery.png")?;
    Ok(())
}
