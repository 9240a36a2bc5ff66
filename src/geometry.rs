//! Procedural geometry for the heart shape: two circle fans and a triangle,
//! stored as flat, tightly-packed vertex buffers.
//!
//! All builder functions are pure and write-only into caller-supplied
//! storage, so they can be tested without a GL context.

use bytemuck::{Pod, Zeroable};

/// Number of segments used to approximate each circle.
///
/// A fan has `SEGMENTS + 1` boundary points; the first and last coincide
/// (i = 0 and i = SEGMENTS both land on angle 0 mod 2π), closing the fan.
pub const SEGMENTS: usize = 100;

/// Number of vertices in one closed circle fan.
pub const FAN_POINTS: usize = SEGMENTS + 1;

/// Radius shared by both circles.
pub const CIRCLE_RADIUS: f32 = 0.25;

/// Center of the left circle, in clip space.
pub const LEFT_CENTER: [f32; 2] = [-0.25, 0.25];

/// Center of the right circle, in clip space.
pub const RIGHT_CENTER: [f32; 2] = [0.25, 0.25];

/// A vertex position, ready for the GPU.
#[derive(Copy, Clone, Pod, Zeroable)]
#[repr(C)]
pub struct Position {
    /// Clip-space (x, y, z) coordinates.
    pub position: [f32; 3],
}

/// A texture coordinate, index-aligned with [`Position`] in a parallel buffer.
#[derive(Copy, Clone, Pod, Zeroable)]
#[repr(C)]
pub struct TexCoord {
    /// (u, v) coordinates.
    pub uv: [f32; 2],
}

/// A contiguous vertex range for a single draw call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DrawRange {
    /// Index of the first vertex.
    pub first: i32,
    /// Number of vertices to draw.
    pub count: i32,
}

/// Write the `FAN_POINTS` boundary points of a circle into `positions`,
/// starting at `offset`.
///
/// Point `i` lies at angle `θ = 2π·i / SEGMENTS` on the circle of the given
/// radius around `(center_x, center_y)`, with z = 0.
///
/// # Panics
///
/// Panics if `positions.len() < offset + FAN_POINTS`.
pub fn write_circle(
    positions: &mut [Position],
    offset: usize,
    radius: f32,
    center_x: f32,
    center_y: f32,
) {
    for i in 0..=SEGMENTS {
        let (sin, cos) = circle_angle(i).sin_cos();
        positions[offset + i] = Position {
            position: [center_x + radius * cos, center_y + radius * sin, 0.0],
        };
    }
}

/// Write the three fixed triangle vertices (left, right, bottom apex) into
/// `positions`, starting at `offset`.
///
/// # Panics
///
/// Panics if `positions.len() < offset + 3`.
pub fn write_triangle(positions: &mut [Position], offset: usize) {
    positions[offset] = Position {
        position: [-0.5, 0.1, 0.0],
    };
    positions[offset + 1] = Position {
        position: [0.5, 0.1, 0.0],
    };
    positions[offset + 2] = Position {
        position: [0.0, -0.6, 0.0],
    };
}

/// Write texture coordinates for one circle fan into `uvs`, starting at
/// `offset`.
///
/// Uses the same angular parameterization as [`write_circle`], offset by the
/// given center, so the sampled texture appears centered on the circle.
///
/// # Panics
///
/// Panics if `uvs.len() < offset + FAN_POINTS`.
pub fn write_circle_tex_coords(uvs: &mut [TexCoord], offset: usize, center_x: f32, center_y: f32) {
    for i in 0..=SEGMENTS {
        let (sin, cos) = circle_angle(i).sin_cos();
        uvs[offset + i] = TexCoord {
            uv: [center_x + 0.5 * cos, center_y + 0.5 * sin],
        };
    }
}

/// Write the three fixed triangle texture coordinates into `uvs`, starting
/// at `offset`.
///
/// The values exceed [0, 1] so the REPEAT wrap mode tiles the texture over
/// the triangle.
///
/// # Panics
///
/// Panics if `uvs.len() < offset + 3`.
pub fn write_triangle_tex_coords(uvs: &mut [TexCoord], offset: usize) {
    uvs[offset] = TexCoord { uv: [0.0, 2.0] };
    uvs[offset + 1] = TexCoord { uv: [2.0, 2.0] };
    uvs[offset + 2] = TexCoord { uv: [1.0, 0.0] };
}

/// Angle of boundary point `i` on a `SEGMENTS`-segment circle.
fn circle_angle(i: usize) -> f32 {
    // Indices are at most SEGMENTS, far below f32's exact integer range.
    #[expect(clippy::cast_precision_loss)]
    {
        std::f32::consts::TAU * i as f32 / SEGMENTS as f32
    }
}

/// The complete heart mesh: position and texture-coordinate buffers laid out
/// as `[left fan][right fan][triangle]`, plus the draw ranges covering them.
///
/// Both buffers are fixed at build time and immutable after upload.
pub struct HeartMesh {
    /// Vertex positions, `VERTEX_COUNT` entries.
    pub positions: Vec<Position>,
    /// Texture coordinates, index-aligned with `positions`.
    pub tex_coords: Vec<TexCoord>,
}

impl HeartMesh {
    /// Total vertex count: two closed fans plus the triangle.
    pub const VERTEX_COUNT: usize = 2 * FAN_POINTS + 3;

    /// Build the fixed shape catalog.
    #[must_use]
    pub fn build() -> Self {
        let mut positions = vec![Position::zeroed(); Self::VERTEX_COUNT];
        write_circle(
            &mut positions,
            0,
            CIRCLE_RADIUS,
            LEFT_CENTER[0],
            LEFT_CENTER[1],
        );
        write_circle(
            &mut positions,
            FAN_POINTS,
            CIRCLE_RADIUS,
            RIGHT_CENTER[0],
            RIGHT_CENTER[1],
        );
        write_triangle(&mut positions, 2 * FAN_POINTS);

        let mut tex_coords = vec![TexCoord::zeroed(); Self::VERTEX_COUNT];
        write_circle_tex_coords(&mut tex_coords, 0, LEFT_CENTER[0], LEFT_CENTER[1]);
        write_circle_tex_coords(&mut tex_coords, FAN_POINTS, RIGHT_CENTER[0], RIGHT_CENTER[1]);
        write_triangle_tex_coords(&mut tex_coords, 2 * FAN_POINTS);

        Self {
            positions,
            tex_coords,
        }
    }

    /// Vertex range of the left circle fan.
    // Vertex counts are far below i32::MAX, so these casts never wrap.
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    #[must_use]
    pub const fn left_fan() -> DrawRange {
        DrawRange {
            first: 0,
            count: FAN_POINTS as i32,
        }
    }

    /// Vertex range of the right circle fan.
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    #[must_use]
    pub const fn right_fan() -> DrawRange {
        DrawRange {
            first: FAN_POINTS as i32,
            count: FAN_POINTS as i32,
        }
    }

    /// Vertex range of the triangle.
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    #[must_use]
    pub const fn triangle() -> DrawRange {
        DrawRange {
            first: (2 * FAN_POINTS) as i32,
            count: 3,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TOLERANCE: f32 = 1e-6;

    /// Distance from a vertex to a 2D point.
    fn distance(vertex: Position, center: [f32; 2]) -> f32 {
        let dx = vertex.position[0] - center[0];
        let dy = vertex.position[1] - center[1];
        dx.hypot(dy)
    }

    #[test]
    fn circle_points_lie_on_the_circle() {
        let mut positions = vec![Position::zeroed(); FAN_POINTS];
        write_circle(&mut positions, 0, 0.25, -0.25, 0.25);

        for (i, vertex) in positions.iter().enumerate() {
            let d = distance(*vertex, [-0.25, 0.25]);
            assert!(
                (d - 0.25).abs() < TOLERANCE,
                "point {i} at distance {d}, expected 0.25",
            );
            assert!(vertex.position[2].abs() < TOLERANCE, "point {i} not planar");
        }
    }

    #[test]
    fn circle_fan_is_closed() {
        let mut positions = vec![Position::zeroed(); FAN_POINTS];
        write_circle(&mut positions, 0, 0.25, 0.25, 0.25);

        let first = positions[0].position;
        let last = positions[SEGMENTS].position;
        for axis in 0..3 {
            assert!(
                (first[axis] - last[axis]).abs() < TOLERANCE,
                "fan not closed on axis {axis}: {first:?} vs {last:?}",
            );
        }
    }

    #[test]
    fn circle_respects_offset() {
        let mut positions = vec![Position::zeroed(); FAN_POINTS + 7];
        write_circle(&mut positions, 7, 0.5, 0.0, 0.0);

        // Everything before the offset is untouched.
        for vertex in &positions[..7] {
            assert_eq!(vertex.position, [0.0; 3]);
        }
        // Point 0 of the fan is at angle 0: (radius, 0).
        assert!((positions[7].position[0] - 0.5).abs() < TOLERANCE);
        assert!(positions[7].position[1].abs() < TOLERANCE);
    }

    #[test]
    fn triangle_emits_fixed_literals_at_any_offset() {
        for offset in [0, 5] {
            let mut positions = vec![Position::zeroed(); offset + 3];
            write_triangle(&mut positions, offset);

            assert_eq!(positions[offset].position, [-0.5, 0.1, 0.0]);
            assert_eq!(positions[offset + 1].position, [0.5, 0.1, 0.0]);
            assert_eq!(positions[offset + 2].position, [0.0, -0.6, 0.0]);
        }
    }

    #[test]
    fn triangle_tex_coords_are_fixed_literals() {
        let mut uvs = vec![TexCoord::zeroed(); 3];
        write_triangle_tex_coords(&mut uvs, 0);

        assert_eq!(uvs[0].uv, [0.0, 2.0]);
        assert_eq!(uvs[1].uv, [2.0, 2.0]);
        assert_eq!(uvs[2].uv, [1.0, 0.0]);
    }

    #[test]
    fn circle_tex_coords_follow_the_same_parameterization() {
        let mut uvs = vec![TexCoord::zeroed(); FAN_POINTS];
        write_circle_tex_coords(&mut uvs, 0, -0.25, 0.25);

        for (i, coord) in uvs.iter().enumerate() {
            let du = coord.uv[0] - -0.25;
            let dv = coord.uv[1] - 0.25;
            let d = du.hypot(dv);
            assert!(
                (d - 0.5).abs() < TOLERANCE,
                "UV {i} at distance {d} from the center, expected 0.5",
            );
        }
        for axis in 0..2 {
            assert!((uvs[0].uv[axis] - uvs[SEGMENTS].uv[axis]).abs() < TOLERANCE);
        }
    }

    #[test]
    fn mesh_buffer_lengths_match_the_layout() {
        let mesh = HeartMesh::build();

        assert_eq!(mesh.positions.len(), 2 * (SEGMENTS + 1) + 3);
        assert_eq!(mesh.tex_coords.len(), mesh.positions.len());
        assert_eq!(HeartMesh::VERTEX_COUNT, mesh.positions.len());
    }

    #[test]
    fn draw_ranges_tile_the_buffer_exactly() {
        let left = HeartMesh::left_fan();
        let right = HeartMesh::right_fan();
        let triangle = HeartMesh::triangle();

        assert_eq!(left.first, 0);
        assert_eq!(left.first + left.count, right.first);
        assert_eq!(right.first + right.count, triangle.first);
        assert_eq!(
            usize::try_from(triangle.first + triangle.count).unwrap(),
            HeartMesh::VERTEX_COUNT,
        );
    }

    #[test]
    fn built_fans_sit_at_the_design_centers() {
        let mesh = HeartMesh::build();

        for (range, center) in [
            (HeartMesh::left_fan(), LEFT_CENTER),
            (HeartMesh::right_fan(), RIGHT_CENTER),
        ] {
            let first = usize::try_from(range.first).unwrap();
            let count = usize::try_from(range.count).unwrap();
            assert_eq!(count, 101);
            for vertex in &mesh.positions[first..first + count] {
                let d = distance(*vertex, center);
                assert!((d - CIRCLE_RADIUS).abs() < TOLERANCE);
            }
        }

        // The bounding circles touch only where the design places them: the
        // centers are 0.5 apart, equal to the sum of the radii.
        let dx = RIGHT_CENTER[0] - LEFT_CENTER[0];
        let dy = RIGHT_CENTER[1] - LEFT_CENTER[1];
        assert!((dx.hypot(dy) - 2.0 * CIRCLE_RADIUS).abs() < TOLERANCE);
    }
}
