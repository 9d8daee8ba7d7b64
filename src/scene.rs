//! The scene: an ordered volume list and its per-frame flat buffers.
//!
//! Volumes draw in insertion order. Each frame the scene recomputes every
//! volume's matrices, then [`Scene::assemble`] concatenates all geometry
//! into one position stream, one color stream, and one index buffer, with
//! a [`DrawSpan`] telling the render pass which slice of the index buffer
//! belongs to which volume.

use glam::Mat4;

use crate::camera::Camera;
use crate::volume::Volume;

/// One volume's slice of the concatenated index buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawSpan {
    /// Offset of the first index, in elements.
    pub first_index: u32,
    /// Number of indices.
    pub index_count: u32,
}

/// Flat per-frame draw data produced by [`Scene::assemble`].
///
/// Positions and colors are raw float triples ready for GPU upload;
/// `spans` and `mvps` line up with the scene's volumes, in order. The data
/// lives for one frame and is rebuilt from scratch on the next.
#[derive(Clone, Debug, Default)]
pub struct SceneBuffers {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    pub spans: Vec<DrawSpan>,
    pub mvps: Vec<Mat4>,
}

/// Insertion-ordered collection of volumes.
#[derive(Default)]
pub struct Scene {
    volumes: Vec<Volume>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a volume. Scene order is draw order.
    pub fn push(&mut self, volume: Volume) {
        self.volumes.push(volume);
    }

    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    pub fn volumes(&self) -> &[Volume] {
        &self.volumes
    }

    pub fn volumes_mut(&mut self) -> &mut [Volume] {
        &mut self.volumes
    }

    /// Recomputes every volume's matrices for this frame.
    ///
    /// Each volume gets a fresh model matrix from its transform, the shared
    /// projection–view product, and the combined matrix the shader consumes.
    pub fn update_matrices(&mut self, camera: &Camera, projection: Mat4) {
        let view_projection = projection * camera.view_matrix();
        for volume in &mut self.volumes {
            volume.calculate_model_matrix();
            volume.view_projection = view_projection;
            volume.mvp = view_projection * volume.model_matrix;
        }
    }

    /// Concatenates every volume's geometry into flat buffers.
    ///
    /// Positions and colors are appended verbatim in scene order. Indices
    /// are shifted by the number of vertices appended before them so they
    /// stay valid against the combined vertex stream. Every volume gets one
    /// span covering exactly its own indices; an empty scene produces empty
    /// buffers and no spans.
    pub fn assemble(&self) -> SceneBuffers {
        let mut buffers = SceneBuffers::default();
        let mut base_vertex = 0u32;
        let mut first_index = 0u32;

        for volume in &self.volumes {
            buffers
                .positions
                .extend(volume.vertices().into_iter().map(|v| v.to_array()));
            buffers
                .colors
                .extend(volume.colors().into_iter().map(|c| c.to_array()));
            buffers
                .indices
                .extend(volume.indices().into_iter().map(|i| base_vertex + i));

            let index_count = volume.index_count() as u32;
            buffers.spans.push(DrawSpan {
                first_index,
                index_count,
            });
            buffers.mvps.push(volume.mvp);

            base_vertex += volume.vertex_count() as u32;
            first_index += index_count;
        }

        buffers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Shape;
    use glam::Vec3;

    #[test]
    fn empty_scene_assembles_to_nothing() {
        let buffers = Scene::new().assemble();
        assert!(buffers.positions.is_empty());
        assert!(buffers.colors.is_empty());
        assert!(buffers.indices.is_empty());
        assert!(buffers.spans.is_empty());
        assert!(buffers.mvps.is_empty());
    }

    #[test]
    fn concatenation_keeps_vertex_data_verbatim_in_scene_order() {
        let mut scene = Scene::new();
        scene.push(Volume::new(Shape::Triangle));
        scene.push(Volume::new(Shape::ColorCube(Vec3::new(0.0, 1.0, 0.0))));

        let buffers = scene.assemble();
        assert_eq!(buffers.positions.len(), 11);
        assert_eq!(buffers.colors.len(), 11);

        let triangle_verts = Shape::Triangle.vertices();
        for (k, v) in triangle_verts.iter().enumerate() {
            assert_eq!(buffers.positions[k], v.to_array());
        }
        let cube_verts = Shape::Cube.vertices();
        for (k, v) in cube_verts.iter().enumerate() {
            assert_eq!(buffers.positions[3 + k], v.to_array());
        }
        for color in &buffers.colors[3..] {
            assert_eq!(*color, [0.0, 1.0, 0.0]);
        }
    }

    #[test]
    fn concatenation_offsets_the_second_volumes_indices() {
        let mut scene = Scene::new();
        scene.push(Volume::new(Shape::Cube));
        scene.push(Volume::new(Shape::Cube));

        let buffers = scene.assemble();
        assert_eq!(buffers.indices.len(), 72);

        // The second cube's first raw index is 0; concatenated it must read 8.
        assert_eq!(buffers.indices[36], 8);

        let raw = Shape::Cube.indices();
        for (k, &value) in buffers.indices[36..].iter().enumerate() {
            assert_eq!(value, raw[k] + 8);
        }
        assert!(buffers.indices.iter().all(|&i| i < 16));
    }

    #[test]
    fn spans_are_contiguous_and_cover_the_whole_index_buffer() {
        let mut scene = Scene::new();
        scene.push(Volume::new(Shape::Triangle));
        scene.push(Volume::new(Shape::Cube));
        scene.push(Volume::new(Shape::ColorCube(Vec3::ONE)));

        let buffers = scene.assemble();
        assert_eq!(buffers.spans.len(), 3);
        assert_eq!(
            buffers.spans[0],
            DrawSpan {
                first_index: 0,
                index_count: 3
            }
        );
        assert_eq!(
            buffers.spans[1],
            DrawSpan {
                first_index: 3,
                index_count: 36
            }
        );
        assert_eq!(
            buffers.spans[2],
            DrawSpan {
                first_index: 39,
                index_count: 36
            }
        );

        let total: u32 = buffers.spans.iter().map(|s| s.index_count).sum();
        assert_eq!(total as usize, buffers.indices.len());
    }

    #[test]
    fn update_matrices_combines_projection_view_and_model() {
        let mut scene = Scene::new();
        scene.push(Volume::new(Shape::Cube).at([0.0, 0.0, -3.0]));

        let camera = Camera::new().at(0.0, 0.0, -1.0);
        scene.update_matrices(&camera, Mat4::IDENTITY);

        let volume = &scene.volumes()[0];
        // View alone carries the eye to the origin, so the cube's center
        // lands one unit closer than its world position.
        let center = volume.mvp.transform_point3(Vec3::ZERO);
        assert!((center - Vec3::new(0.0, 0.0, -2.0)).length() < 1e-5, "{center}");
    }

    #[test]
    fn assemble_carries_each_volumes_mvp() {
        let mut scene = Scene::new();
        scene.push(Volume::new(Shape::Cube).at([1.0, 0.0, 0.0]));
        scene.push(Volume::new(Shape::Cube).at([0.0, 2.0, 0.0]));

        scene.update_matrices(&Camera::new(), Mat4::IDENTITY);
        let buffers = scene.assemble();

        assert_eq!(buffers.mvps.len(), 2);
        assert_eq!(
            buffers.mvps[0].transform_point3(Vec3::ZERO),
            Vec3::new(1.0, 0.0, 0.0)
        );
        assert_eq!(
            buffers.mvps[1].transform_point3(Vec3::ZERO),
            Vec3::new(0.0, 2.0, 0.0)
        );
    }
}
