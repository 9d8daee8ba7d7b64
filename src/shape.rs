//! Built-in geometry variants and their consistency checks.
//!
//! Every renderable object carries one [`Shape`], a closed set of geometry
//! variants. A shape produces three parallel sequences: local-space vertex
//! positions, per-vertex colors, and triangle indices into the vertex array.
//! The declared counts ([`Shape::vertex_count`], [`Shape::index_count`]) are
//! constants of the variant; the draw path trusts them when it slices the
//! concatenated frame buffers, so [`verify_geometry`] exists to catch a
//! disagreement loudly instead of rendering garbage.
//!
//! # Example
//!
//! ```
//! use phalanx::{Shape, Vec3};
//!
//! let cube = Shape::Cube;
//! assert_eq!(cube.vertex_count(), 8);
//! assert_eq!(cube.index_count(), 36);
//!
//! // A cube tinted a single uniform color.
//! let tinted = Shape::ColorCube(Vec3::new(1.0, 0.0, 0.0));
//! assert!(tinted.colors().iter().all(|c| *c == Vec3::new(1.0, 0.0, 0.0)));
//! ```

use glam::Vec3;

/// Errors raised when geometry data disagrees with its declared shape.
#[derive(Debug)]
pub enum GeometryError {
    /// Position or color sequence length differs from the declared vertex count.
    VertexCountMismatch {
        declared: usize,
        positions: usize,
        colors: usize,
    },
    /// Index sequence length differs from the declared index count.
    IndexCountMismatch { declared: usize, indices: usize },
    /// Index sequence length is not a whole number of triangles.
    PartialTriangle { indices: usize },
    /// An index refers past the end of the vertex array.
    IndexOutOfRange {
        value: u32,
        offset: usize,
        vertex_count: usize,
    },
}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryError::VertexCountMismatch {
                declared,
                positions,
                colors,
            } => write!(
                f,
                "declared {} vertices but produced {} positions and {} colors",
                declared, positions, colors
            ),
            GeometryError::IndexCountMismatch { declared, indices } => {
                write!(f, "declared {} indices but produced {}", declared, indices)
            }
            GeometryError::PartialTriangle { indices } => {
                write!(f, "index count {} is not a multiple of 3", indices)
            }
            GeometryError::IndexOutOfRange {
                value,
                offset,
                vertex_count,
            } => write!(
                f,
                "index {} at offset {} is out of range for {} vertices",
                value, offset, vertex_count
            ),
        }
    }
}

impl std::error::Error for GeometryError {}

#[rustfmt::skip]
const TRIANGLE_POSITIONS: [[f32; 3]; 3] = [
    [-0.8, -0.8, 0.0],
    [ 0.8, -0.8, 0.0],
    [ 0.0,  0.8, 0.0],
];

#[rustfmt::skip]
const TRIANGLE_COLORS: [[f32; 3]; 3] = [
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
];

const TRIANGLE_INDICES: [u32; 3] = [0, 1, 2];

// Unit cube corners, back face first, counter-clockwise from the
// bottom-left corner of each face.
#[rustfmt::skip]
const CUBE_POSITIONS: [[f32; 3]; 8] = [
    [-0.5, -0.5, -0.5],
    [ 0.5, -0.5, -0.5],
    [ 0.5,  0.5, -0.5],
    [-0.5,  0.5, -0.5],
    [-0.5, -0.5,  0.5],
    [ 0.5, -0.5,  0.5],
    [ 0.5,  0.5,  0.5],
    [-0.5,  0.5,  0.5],
];

// Corner colors cycle red, blue, green around the cube.
#[rustfmt::skip]
const CUBE_COLORS: [[f32; 3]; 8] = [
    [1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.0, 1.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.0, 1.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0],
];

#[rustfmt::skip]
const CUBE_INDICES: [u32; 36] = [
    // back
    0, 2, 1,
    0, 3, 2,
    // right
    1, 2, 6,
    6, 5, 1,
    // front
    4, 5, 6,
    6, 7, 4,
    // top
    2, 3, 6,
    6, 3, 7,
    // left
    0, 7, 3,
    0, 4, 7,
    // bottom
    0, 1, 5,
    0, 5, 4,
];

/// The fixed set of geometry variants a volume can carry.
///
/// Adding a shape means adding a variant here along with its vertex, color,
/// and index tables. There is no open extension point; the renderer only
/// ever sees the data these methods produce.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// A single triangle with red, green, and blue corners.
    Triangle,
    /// A unit cube (corners at ±0.5) with colors cycling around the corners.
    Cube,
    /// A unit cube tinted with one uniform color.
    ColorCube(Vec3),
}

impl Shape {
    /// Local-space vertex positions.
    pub fn vertices(&self) -> Vec<Vec3> {
        match self {
            Shape::Triangle => TRIANGLE_POSITIONS.iter().copied().map(Vec3::from).collect(),
            Shape::Cube | Shape::ColorCube(_) => {
                CUBE_POSITIONS.iter().copied().map(Vec3::from).collect()
            }
        }
    }

    /// Per-vertex colors, same length as [`vertices`](Self::vertices).
    pub fn colors(&self) -> Vec<Vec3> {
        match self {
            Shape::Triangle => TRIANGLE_COLORS.iter().copied().map(Vec3::from).collect(),
            Shape::Cube => CUBE_COLORS.iter().copied().map(Vec3::from).collect(),
            Shape::ColorCube(color) => vec![*color; CUBE_POSITIONS.len()],
        }
    }

    /// Triangle indices into the local vertex array.
    pub fn indices(&self) -> Vec<u32> {
        match self {
            Shape::Triangle => TRIANGLE_INDICES.to_vec(),
            Shape::Cube | Shape::ColorCube(_) => CUBE_INDICES.to_vec(),
        }
    }

    /// Number of vertices this shape produces.
    pub fn vertex_count(&self) -> usize {
        match self {
            Shape::Triangle => TRIANGLE_POSITIONS.len(),
            Shape::Cube | Shape::ColorCube(_) => CUBE_POSITIONS.len(),
        }
    }

    /// Number of indices this shape produces.
    pub fn index_count(&self) -> usize {
        match self {
            Shape::Triangle => TRIANGLE_INDICES.len(),
            Shape::Cube | Shape::ColorCube(_) => CUBE_INDICES.len(),
        }
    }

    /// Checks this shape's produced data against its declared counts.
    pub fn verify(&self) -> Result<(), GeometryError> {
        verify_geometry(
            &self.vertices(),
            &self.colors(),
            &self.indices(),
            self.vertex_count(),
            self.index_count(),
        )
    }
}

/// Checks that geometry data agrees with its declared counts and that every
/// index lands inside the vertex array.
///
/// Returns the first violation found. The built-in variants always pass;
/// the check guards edits to the shape tables and any future variant.
pub fn verify_geometry(
    positions: &[Vec3],
    colors: &[Vec3],
    indices: &[u32],
    vertex_count: usize,
    index_count: usize,
) -> Result<(), GeometryError> {
    if positions.len() != vertex_count || colors.len() != vertex_count {
        return Err(GeometryError::VertexCountMismatch {
            declared: vertex_count,
            positions: positions.len(),
            colors: colors.len(),
        });
    }

    if indices.len() != index_count {
        return Err(GeometryError::IndexCountMismatch {
            declared: index_count,
            indices: indices.len(),
        });
    }

    if indices.len() % 3 != 0 {
        return Err(GeometryError::PartialTriangle {
            indices: indices.len(),
        });
    }

    for (offset, &value) in indices.iter().enumerate() {
        if value as usize >= vertex_count {
            return Err(GeometryError::IndexOutOfRange {
                value,
                offset,
                vertex_count,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_matches_the_fixed_corner_set() {
        let verts = Shape::Cube.vertices();
        assert_eq!(verts.len(), 8);
        for v in &verts {
            assert_eq!(v.x.abs(), 0.5);
            assert_eq!(v.y.abs(), 0.5);
            assert_eq!(v.z.abs(), 0.5);
        }
        assert_eq!(verts[0], Vec3::new(-0.5, -0.5, -0.5));
        assert_eq!(verts[6], Vec3::new(0.5, 0.5, 0.5));

        let indices = Shape::Cube.indices();
        assert_eq!(indices.len(), 36);
        assert!(indices.iter().all(|&i| i < 8));
    }

    #[test]
    fn color_cube_repeats_its_tint() {
        let red = Vec3::new(1.0, 0.0, 0.0);
        let colors = Shape::ColorCube(red).colors();
        assert_eq!(colors.len(), 8);
        assert!(colors.iter().all(|c| *c == red));
    }

    #[test]
    fn color_cube_shares_the_cube_topology() {
        assert_eq!(Shape::ColorCube(Vec3::ONE).vertices(), Shape::Cube.vertices());
        assert_eq!(Shape::ColorCube(Vec3::ONE).indices(), Shape::Cube.indices());
    }

    #[test]
    fn triangle_counts() {
        let triangle = Shape::Triangle;
        assert_eq!(triangle.vertices().len(), 3);
        assert_eq!(triangle.colors().len(), 3);
        assert_eq!(triangle.indices(), vec![0, 1, 2]);
        assert_eq!(triangle.vertex_count(), 3);
        assert_eq!(triangle.index_count(), 3);
    }

    #[test]
    fn every_variant_passes_verification() {
        assert!(Shape::Triangle.verify().is_ok());
        assert!(Shape::Cube.verify().is_ok());
        assert!(Shape::ColorCube(Vec3::new(0.2, 0.4, 0.6)).verify().is_ok());
    }

    #[test]
    fn verification_rejects_count_mismatches() {
        let positions = vec![Vec3::ZERO; 3];
        let colors = vec![Vec3::ONE; 2];
        let indices = vec![0, 1, 2];

        let err = verify_geometry(&positions, &colors, &indices, 3, 3).unwrap_err();
        assert!(matches!(err, GeometryError::VertexCountMismatch { colors: 2, .. }));

        let colors = vec![Vec3::ONE; 3];
        let err = verify_geometry(&positions, &colors, &indices, 3, 6).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::IndexCountMismatch { declared: 6, indices: 3 }
        ));
    }

    #[test]
    fn verification_rejects_partial_triangles() {
        let positions = vec![Vec3::ZERO; 3];
        let colors = vec![Vec3::ONE; 3];
        let indices = vec![0, 1];

        let err = verify_geometry(&positions, &colors, &indices, 3, 2).unwrap_err();
        assert!(matches!(err, GeometryError::PartialTriangle { indices: 2 }));
    }

    #[test]
    fn verification_rejects_out_of_range_indices() {
        let positions = vec![Vec3::ZERO; 3];
        let colors = vec![Vec3::ONE; 3];
        let indices = vec![0, 1, 3];

        let err = verify_geometry(&positions, &colors, &indices, 3, 3).unwrap_err();
        match err {
            GeometryError::IndexOutOfRange {
                value,
                offset,
                vertex_count,
            } => {
                assert_eq!(value, 3);
                assert_eq!(offset, 2);
                assert_eq!(vertex_count, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn error_messages_name_the_offending_quantity() {
        let err = GeometryError::IndexOutOfRange {
            value: 9,
            offset: 4,
            vertex_count: 8,
        };
        let msg = err.to_string();
        assert!(msg.contains('9'));
        assert!(msg.contains("8 vertices"));
    }
}
