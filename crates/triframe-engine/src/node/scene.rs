use crate::backend::{Backend, ColorLoad};
use crate::color::Color;
use crate::error::RenderError;
use crate::math::Matrix4;

use super::RenderNode;

/// Flat list of nodes rendered under one world matrix.
pub struct Scene<B: Backend> {
    pub world: Matrix4,
    nodes: Vec<RenderNode<B>>,
}

impl<B: Backend> Scene<B> {
    pub fn new(world: Matrix4) -> Self {
        Self {
            world,
            nodes: Vec::new(),
        }
    }

    /// Appends `node`; returns its index.
    pub fn push(&mut self, node: RenderNode<B>) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn update(&mut self, dt: f32) {
        for node in &mut self.nodes {
            node.update(dt);
        }
    }

    /// Renders every node in insertion order with the world matrix as parent.
    ///
    /// The first node clears the target with `clear`; later nodes draw on top.
    /// Stops at the first error.
    pub fn render(
        &mut self,
        backend: &B,
        pipeline: &B::Pipeline,
        target: &B::Target,
        projection: &Matrix4,
        clear: Option<Color>,
    ) -> Result<(), RenderError> {
        let mut load = ColorLoad::clear_or_default(clear);
        for node in &mut self.nodes {
            node.render(backend, pipeline, target, &self.world, projection, load)?;
            load = ColorLoad::Load;
        }
        Ok(())
    }

    #[inline]
    pub fn nodes(&self) -> &[RenderNode<B>] {
        &self.nodes
    }

    #[inline]
    pub fn node_mut(&mut self, index: usize) -> Option<&mut RenderNode<B>> {
        self.nodes.get_mut(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{RecordedMaterial, RecordedPipeline, RecordingBackend};
    use crate::config::NodeConfig;
    use crate::mesh::{VertexFormat, cube};

    fn pipeline() -> RecordedPipeline {
        RecordedPipeline::new("textured", VertexFormat::Textured)
    }

    fn scene_with(backend: &RecordingBackend, n: usize) -> Scene<RecordingBackend> {
        let mut world = Matrix4::identity();
        world.translate(0.0, 0.0, -4.0);
        let mut scene = Scene::new(world);
        for i in 0..n {
            let material = RecordedMaterial("atlas".into());
            let node =
                RenderNode::new(backend, &format!("cube{i}"), &cube(0.3), Some(material), &NodeConfig::default())
                    .unwrap();
            scene.push(node);
        }
        scene
    }

    #[test]
    fn first_node_clears_later_nodes_load() {
        let backend = RecordingBackend::new();
        let mut scene = scene_with(&backend, 3);
        scene
            .render(&backend, &pipeline(), "frame", &Matrix4::IDENTITY, Some(Color::BLACK))
            .unwrap();

        let loads: Vec<_> = backend.draws().iter().map(|d| d.load).collect();
        assert_eq!(
            loads,
            vec![ColorLoad::Clear(Color::BLACK), ColorLoad::Load, ColorLoad::Load]
        );
    }

    #[test]
    fn world_matrix_is_every_node_parent() {
        let backend = RecordingBackend::new();
        let mut scene = scene_with(&backend, 2);
        scene.node_mut(1).unwrap().transform_mut().position = [1.0, 0.0, 0.0];

        scene
            .render(&backend, &pipeline(), "frame", &Matrix4::IDENTITY, None)
            .unwrap();

        let draws = backend.draws();
        assert_eq!(draws[0].model_view(), scene.world);
        assert_eq!(draws[1].model_view().transform_point([0.0; 3]), [1.0, 0.0, -4.0]);
    }

    #[test]
    fn update_reaches_every_node() {
        let backend = RecordingBackend::new();
        let mut scene = scene_with(&backend, 2);
        scene.update(0.5);
        assert!(scene.nodes().iter().all(|n| (n.time() - 0.5).abs() < 1e-9));
    }
}
