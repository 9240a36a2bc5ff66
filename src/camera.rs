//! Free-fly camera: yaw/pitch orientation, WASD-style translation, and a
//! scroll-driven field-of-view zoom.
//!
//! All camera state lives in this struct; input handlers mutate it through
//! its methods and the renderer reads matrices from it. Angles are stored in
//! degrees and converted when the basis vectors are rebuilt.

use glam::{Mat4, Vec3};

/// Yaw pointing down the negative Z axis.
const DEFAULT_YAW: f32 = -90.0;
/// Level pitch.
const DEFAULT_PITCH: f32 = 0.0;
/// Movement speed in world units per second.
const DEFAULT_SPEED: f32 = 2.5;
/// Mouse-look sensitivity in degrees per cursor pixel.
const DEFAULT_SENSITIVITY: f32 = 0.1;
/// Default vertical field of view, in degrees.
const DEFAULT_ZOOM: f32 = 45.0;

/// Pitch is kept strictly inside ±90° so the view direction never becomes
/// collinear with the world up vector.
const PITCH_LIMIT: f32 = 89.0;
/// Narrowest allowed field of view, in degrees.
const ZOOM_MIN: f32 = 1.0;
/// Widest allowed field of view, in degrees.
const ZOOM_MAX: f32 = 45.0;

/// A translation direction relative to the camera's current orientation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Along the view direction.
    Forward,
    /// Against the view direction.
    Backward,
    /// Along the negative right vector.
    Left,
    /// Along the right vector.
    Right,
}

/// A free-fly camera.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    world_up: Vec3,
    yaw: f32,
    pitch: f32,
    speed: f32,
    sensitivity: f32,
    zoom: f32,
}

impl Camera {
    /// Create a camera at `position`, facing down the negative Z axis.
    #[must_use]
    pub fn new(position: Vec3) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up: Vec3::Y,
            yaw: DEFAULT_YAW,
            pitch: DEFAULT_PITCH,
            speed: DEFAULT_SPEED,
            sensitivity: DEFAULT_SENSITIVITY,
            zoom: DEFAULT_ZOOM,
        };
        camera.update_vectors();
        camera
    }

    /// Move the camera in `direction`, scaled by the elapsed time `dt` in
    /// seconds.
    pub fn advance(&mut self, direction: Direction, dt: f32) {
        let velocity = self.speed * dt;
        match direction {
            Direction::Forward => self.position += self.front * velocity,
            Direction::Backward => self.position -= self.front * velocity,
            Direction::Left => self.position -= self.right * velocity,
            Direction::Right => self.position += self.right * velocity,
        }
    }

    /// Apply a cursor delta, in pixels, to the camera orientation.
    ///
    /// `dy` is positive when the cursor moves up. Pitch is clamped to
    /// ±[`PITCH_LIMIT`] degrees.
    pub fn look(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch + dy * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    /// Apply a scroll delta to the field of view, clamped to
    /// [[`ZOOM_MIN`], [`ZOOM_MAX`]] degrees. Scrolling up narrows the view.
    pub fn zoom_by(&mut self, scroll_y: f32) {
        self.zoom = (self.zoom - scroll_y).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    /// The view matrix looking from the camera position along its front
    /// vector.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Current camera position.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Current view direction (unit length).
    #[must_use]
    pub fn front(&self) -> Vec3 {
        self.front
    }

    /// Current vertical field of view, in degrees.
    #[must_use]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Rebuild the orthonormal basis from yaw and pitch.
    fn update_vectors(&mut self) {
        let (yaw_sin, yaw_cos) = self.yaw.to_radians().sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.to_radians().sin_cos();

        self.front = Vec3::new(yaw_cos * pitch_cos, pitch_sin, yaw_sin * pitch_cos).normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    const TOLERANCE: f32 = 1e-5;

    fn assert_vec3_eq(actual: Vec3, expected: Vec3) {
        assert!(
            (actual - expected).length() < TOLERANCE,
            "expected {expected:?}, got {actual:?}",
        );
    }

    #[test]
    fn default_orientation_faces_negative_z() {
        let camera = Camera::new(Vec3::new(0.0, 1.0, 3.0));

        assert_vec3_eq(camera.front(), Vec3::NEG_Z);
        assert_vec3_eq(camera.right, Vec3::X);
        assert_vec3_eq(camera.up, Vec3::Y);
    }

    #[test]
    fn forward_motion_covers_speed_times_dt() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.advance(Direction::Forward, 0.4);

        assert_vec3_eq(camera.position(), Vec3::new(0.0, 0.0, -DEFAULT_SPEED * 0.4));
    }

    #[test]
    fn strafing_is_perpendicular_to_the_view() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.advance(Direction::Left, 1.0);

        assert!(camera.position().dot(camera.front()).abs() < TOLERANCE);
        assert_vec3_eq(camera.position(), Vec3::new(-DEFAULT_SPEED, 0.0, 0.0));
    }

    #[test]
    fn pitch_clamps_before_reaching_the_poles() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.look(0.0, 10_000.0);

        // front.y = sin(89°), just short of straight up.
        assert!((camera.front().y - 89.0_f32.to_radians().sin()).abs() < TOLERANCE);

        camera.look(0.0, -100_000.0);
        assert!((camera.front().y + 89.0_f32.to_radians().sin()).abs() < TOLERANCE);
    }

    #[test]
    fn zoom_clamps_to_its_range() {
        let mut camera = Camera::new(Vec3::ZERO);

        camera.zoom_by(100.0);
        assert!((camera.zoom() - ZOOM_MIN).abs() < TOLERANCE);

        camera.zoom_by(-100.0);
        assert!((camera.zoom() - ZOOM_MAX).abs() < TOLERANCE);

        camera.zoom_by(5.0);
        assert!((camera.zoom() - 40.0).abs() < TOLERANCE);
    }

    #[test]
    fn view_matrix_maps_the_camera_position_to_the_origin() {
        let mut camera = Camera::new(Vec3::new(1.5, -2.0, 7.0));
        camera.look(123.0, -45.0);

        let eye = camera.view_matrix() * Vec4::new(1.5, -2.0, 7.0, 1.0);
        assert!(eye.truncate().length() < TOLERANCE, "got {eye:?}");
    }

    #[test]
    fn basis_stays_orthonormal_after_arbitrary_look_input() {
        let mut camera = Camera::new(Vec3::ZERO);
        for (dx, dy) in [(37.0, 11.0), (-250.0, 90.0), (1000.0, -400.0)] {
            camera.look(dx, dy);

            assert!(camera.front.dot(camera.right).abs() < TOLERANCE);
            assert!(camera.front.dot(camera.up).abs() < TOLERANCE);
            assert!(camera.right.dot(camera.up).abs() < TOLERANCE);
            assert!((camera.front.length() - 1.0).abs() < TOLERANCE);
            assert!((camera.right.length() - 1.0).abs() < TOLERANCE);
            assert!((camera.up.length() - 1.0).abs() < TOLERANCE);
        }
    }

    #[test]
    fn yaw_wraps_without_tilting_the_camera() {
        let mut camera = Camera::new(Vec3::ZERO);
        // 36000 pixels at 0.1°/pixel: ten full turns.
        camera.look(36_000.0, 0.0);

        // Pure yaw keeps the camera level.
        assert!(camera.front().y.abs() < TOLERANCE);
        assert!(camera.up.y > 0.0);
    }
}
