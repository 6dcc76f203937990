//! Turns element lists into populated scenes.
use glam::Vec3;
use tracing::{debug, warn};

use crate::chart::data::Element;
use crate::error::Result;
use crate::events::{ChartEvent, EventSink};
use crate::geometry::euler_xyz;
use crate::scene::Scene;
use crate::shapes::{ShapeNode, ShapeRegistry};

/// Outcome of one [`SceneAssembler::populate`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PopulateSummary {
    /// Elements that produced a node.
    pub added: usize,
    /// Elements left out (unknown shape type).
    pub skipped: usize,
}

/// Builds scene contents from [`Element`]s through a [`ShapeRegistry`].
#[derive(Clone, Debug, Default)]
pub struct SceneAssembler {
    registry: ShapeRegistry,
}

impl SceneAssembler {
    pub fn new(registry: ShapeRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ShapeRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ShapeRegistry {
        &mut self.registry
    }

    /// Clears `target`, restores the standard lights, then adds one node per buildable element.
    ///
    /// Unknown shape types are skipped with a warning; the remaining elements still populate.
    pub fn populate(
        &self,
        target: &mut Scene,
        elements: &[Element],
        sink: &mut dyn EventSink,
    ) -> PopulateSummary {
        target.clear();
        target.reset_lights();

        let mut summary = PopulateSummary::default();
        for (index, element) in elements.iter().enumerate() {
            match self.build_element(element) {
                Ok(node) => {
                    target.add(node);
                    summary.added += 1;
                }
                Err(err) => {
                    warn!(index, shape_type = %element.shape_type, "skipping element: {err}");
                    sink.send(ChartEvent::ElementSkipped {
                        index,
                        shape_type: element.shape_type.clone(),
                        reason: err.to_string(),
                    });
                    summary.skipped += 1;
                }
            }
        }
        debug!(added = summary.added, skipped = summary.skipped, "populated scene");
        summary
    }

    /// Builds one element's node, with its position/rotation override applied.
    pub fn build_element(&self, element: &Element) -> Result<ShapeNode> {
        let node = self
            .registry
            .create(&element.shape_type, &element.options)?;
        Ok(apply_override(node, element.position, element.rotation))
    }
}

/// Replaces the node's translation and/or rotation with the element's override.
fn apply_override(mut node: ShapeNode, position: Option<Vec3>, rotation: Option<Vec3>) -> ShapeNode {
    if let Some(p) = position.filter(|p| p.is_finite()) {
        node.transform.translation = p;
    }
    if let Some(r) = rotation.filter(|r| r.is_finite()) {
        node.transform.rotation = euler_xyz(r);
    }
    node
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use serde_json::json;

    use super::*;
    use crate::events::VecSink;
    use crate::scene::Light;
    use crate::shapes::{FnFactory, ShapeOptions};

    fn line() -> Element {
        Element::new("line")
            .with_option("start", json!([0, 0, 0]))
            .with_option("end", json!([1, 0, 0]))
    }

    #[test]
    fn single_line_yields_one_node_and_two_lights() {
        let assembler = SceneAssembler::default();
        let mut scene = Scene::new(None);
        let summary = assembler.populate(&mut scene, &[line()], &mut ());
        assert_eq!(summary, PopulateSummary { added: 1, skipped: 0 });
        assert_eq!(scene.node_count(), 1);
        assert_eq!(scene.lights().len(), 2);
        assert!(matches!(scene.lights()[0], Light::Ambient { .. }));
        assert!(matches!(scene.lights()[1], Light::Directional { .. }));
    }

    #[test]
    fn unknown_type_is_skipped_with_warning() {
        let assembler = SceneAssembler::default();
        let mut scene = Scene::new(None);
        let mut sink = VecSink::new();
        let elements = [line(), Element::new("doesNotExist"), line()];
        let summary = assembler.populate(&mut scene, &elements, &mut sink);
        assert_eq!(summary, PopulateSummary { added: 2, skipped: 1 });
        assert_eq!(scene.node_count(), 2);
        assert!(matches!(
            sink.as_slice(),
            [ChartEvent::ElementSkipped { index: 1, shape_type, .. }] if shape_type == "doesNotExist"
        ));
    }

    #[test]
    fn repopulating_replaces_previous_contents() {
        let assembler = SceneAssembler::default();
        let mut scene = Scene::new(None);
        assembler.populate(&mut scene, &[line(), line(), line()], &mut ());
        assembler.populate(&mut scene, &[line()], &mut ());
        assert_eq!(scene.node_count(), 1);
        assert_eq!(scene.lights().len(), 2);

        assembler.populate(&mut scene, &[], &mut ());
        assert_eq!(scene.object_count(), 2);
    }

    #[test]
    fn overrides_replace_the_node_transform() {
        let assembler = SceneAssembler::default();
        let element = line()
            .with_position(Vec3::new(1.0, 2.0, 3.0))
            .with_rotation(Vec3::new(0.0, 0.0, FRAC_PI_2));
        let node = assembler.build_element(&element).unwrap();
        assert_eq!(node.transform.translation, Vec3::new(1.0, 2.0, 3.0));
        let (a, b) = node.world_segments()[0];
        assert!(a.abs_diff_eq(Vec3::new(1.0, 2.0, 3.0), 1e-5));
        assert!(b.abs_diff_eq(Vec3::new(1.0, 3.0, 3.0), 1e-5));
    }

    #[test]
    fn vector_options_are_converted_before_the_factory() {
        let mut assembler = SceneAssembler::default();
        assembler.registry_mut().register(
            "probe",
            FnFactory::new(|options: &ShapeOptions| {
                let name = options
                    .get("axis")
                    .map_or("missing", |v| v.type_name());
                ShapeNode::new(name)
            }),
        );
        let mut scene = Scene::new(None);
        let element = Element::new("probe").with_option("axis", json!([0.0, 1.0, 0.0]));
        assembler.populate(&mut scene, &[element], &mut ());
        assert_eq!(scene.nodes()[0].name, "vector");
    }
}
