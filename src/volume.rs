//! A placeable scene object: one geometry variant plus its transform.
//!
//! A [`Volume`] pairs a [`Shape`] with position, rotation, and scale, and
//! carries the matrices derived from them. The matrices are one-frame
//! caches: the scene recomputes them every frame before assembling draw
//! data, and nothing persists them across frames.
//!
//! # Example
//!
//! ```
//! use phalanx::{Shape, Volume};
//!
//! let mut cube = Volume::new(Shape::Cube)
//!     .at([0.0, 0.0, -3.0])
//!     .scaled([0.5, 0.5, 0.5]);
//!
//! cube.calculate_model_matrix();
//! ```

use glam::{Mat4, Vec3};

use crate::shape::Shape;

/// A renderable object in the scene.
///
/// Rotation is Euler angles in radians. When the model matrix is built,
/// scale applies first, then rotation about Y, then X, then Z, then the
/// translation — so a volume spins in place and is then moved into the
/// world.
#[derive(Clone, Debug)]
pub struct Volume {
    /// Geometry variant providing vertices, colors, and indices.
    pub shape: Shape,
    /// World-space position.
    pub position: Vec3,
    /// Euler rotation in radians, applied Y then X then Z.
    pub rotation: Vec3,
    /// Per-axis scale.
    pub scale: Vec3,
    /// Model matrix from the most recent
    /// [`calculate_model_matrix`](Self::calculate_model_matrix).
    pub model_matrix: Mat4,
    /// Combined projection–view matrix for the current frame.
    pub view_projection: Mat4,
    /// Combined projection–view–model matrix for the current frame.
    pub mvp: Mat4,
}

impl Volume {
    /// Creates a volume at the origin with no rotation and unit scale.
    ///
    /// # Panics
    ///
    /// Panics if the shape's produced geometry disagrees with its declared
    /// counts. The built-in variants always pass; this guards edits to the
    /// shape tables.
    pub fn new(shape: Shape) -> Self {
        if let Err(e) = shape.verify() {
            panic!("invalid {:?} geometry: {}", shape, e);
        }

        Self {
            shape,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            model_matrix: Mat4::IDENTITY,
            view_projection: Mat4::IDENTITY,
            mvp: Mat4::IDENTITY,
        }
    }

    /// Sets the world-space position.
    pub fn at(mut self, position: impl Into<Vec3>) -> Self {
        self.position = position.into();
        self
    }

    /// Sets the Euler rotation in radians.
    pub fn rotated(mut self, rotation: impl Into<Vec3>) -> Self {
        self.rotation = rotation.into();
        self
    }

    /// Sets the per-axis scale.
    pub fn scaled(mut self, scale: impl Into<Vec3>) -> Self {
        self.scale = scale.into();
        self
    }

    /// Recomputes the model matrix from the current position, rotation, and
    /// scale.
    ///
    /// Pure function of the current fields: calling it again without
    /// mutating them yields the same matrix.
    pub fn calculate_model_matrix(&mut self) {
        self.model_matrix = Mat4::from_translation(self.position)
            * Mat4::from_rotation_z(self.rotation.z)
            * Mat4::from_rotation_x(self.rotation.x)
            * Mat4::from_rotation_y(self.rotation.y)
            * Mat4::from_scale(self.scale);
    }

    /// Local-space vertex positions of the shape.
    pub fn vertices(&self) -> Vec<Vec3> {
        self.shape.vertices()
    }

    /// Per-vertex colors of the shape.
    pub fn colors(&self) -> Vec<Vec3> {
        self.shape.colors()
    }

    /// Triangle indices of the shape, local to its own vertex array.
    pub fn indices(&self) -> Vec<u32> {
        self.shape.indices()
    }

    /// Number of vertices the shape produces.
    pub fn vertex_count(&self) -> usize {
        self.shape.vertex_count()
    }

    /// Number of indices the shape produces.
    pub fn index_count(&self) -> usize {
        self.shape.index_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn model_matrix_is_identity_at_rest() {
        let mut volume = Volume::new(Shape::Cube);
        volume.calculate_model_matrix();
        assert_eq!(volume.model_matrix, Mat4::IDENTITY);
    }

    #[test]
    fn model_matrix_is_a_pure_function_of_the_transform() {
        let mut volume = Volume::new(Shape::Cube)
            .at([1.0, -2.0, 3.0])
            .rotated([0.3, 0.7, 0.1])
            .scaled([0.5, 2.0, 1.5]);

        volume.calculate_model_matrix();
        let first = volume.model_matrix;
        volume.calculate_model_matrix();
        assert_eq!(volume.model_matrix, first);
    }

    #[test]
    fn scale_applies_before_rotation_before_translation() {
        let mut volume = Volume::new(Shape::Cube)
            .at([5.0, 0.0, 0.0])
            .rotated([0.0, FRAC_PI_2, 0.0])
            .scaled([2.0, 2.0, 2.0]);
        volume.calculate_model_matrix();

        // Local +X: scaled to (2,0,0), swung by the yaw to (0,0,-2), then
        // carried to x = 5.
        let p = volume.model_matrix.transform_point3(Vec3::X);
        assert!((p - Vec3::new(5.0, 0.0, -2.0)).length() < 1e-5, "{p}");
    }

    #[test]
    fn rotation_applies_y_before_x() {
        let mut volume = Volume::new(Shape::Cube).rotated([FRAC_PI_2, FRAC_PI_2, 0.0]);
        volume.calculate_model_matrix();

        // +X lands on -Z after the yaw, then climbs to +Y under the pitch.
        // The opposite order would leave it on -Z.
        let p = volume.model_matrix.transform_point3(Vec3::X);
        assert!((p - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-5, "{p}");
    }

    #[test]
    fn builders_set_the_transform_fields() {
        let volume = Volume::new(Shape::Triangle)
            .at([1.0, 2.0, 3.0])
            .rotated([0.1, 0.2, 0.3])
            .scaled([4.0, 5.0, 6.0]);

        assert_eq!(volume.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(volume.rotation, Vec3::new(0.1, 0.2, 0.3));
        assert_eq!(volume.scale, Vec3::new(4.0, 5.0, 6.0));
    }
}
