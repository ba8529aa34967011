//! First-person camera for the grid world.
//!
//! # Coordinate System
//!
//! World units are grid cells. `x` grows to the east (increasing column) and
//! `y` grows to the south (increasing row), matching how map literals read.
//!
//! # Basis
//!
//! The camera is a position plus two vectors:
//!
//! - **direction**: where the center column looks. Its length is the distance
//!   to the projection plane.
//! - **plane**: spans the projection plane from the center column to the right
//!   screen edge. `|plane| / |direction|` is `tan(fov / 2)`.
//!
//! A screen column at `camera_x` in `[-1, 1]` looks along
//! `direction + plane * camera_x`. The same 2x2 basis, inverted, maps world
//! points back into camera space for sprite projection.

use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// Horizontal FOV of the classic `plane = 0.66` setup, in radians.
pub const DEFAULT_FOV: f64 = 1.166_746_013_987_712;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec2,
    pub direction: Vec2,
    pub plane: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec2::ZERO, Vec2::EAST, Vec2::new(0.0, 0.66))
    }
}

impl Camera {
    pub fn new(position: Vec2, direction: Vec2, plane: Vec2) -> Self {
        Self {
            position,
            direction,
            plane,
        }
    }

    /// Creates a camera at `position` facing `angle` radians (0 = east,
    /// `PI / 2` = south) with a horizontal field of view of `fov` radians.
    pub fn from_angle(position: Vec2, angle: f64, fov: f64) -> Self {
        let direction = Vec2::new(angle.cos(), angle.sin());
        // Screen right is a quarter turn clockwise from forward in y-down space.
        let right = Vec2::new(-direction.y, direction.x);
        Self::new(position, direction, right * (fov / 2.0).tan())
    }

    /// Direction of the ray through `camera_x`, where -1 is the left screen
    /// edge, 0 the center and 1 the right edge.
    #[inline]
    pub fn ray_direction(&self, camera_x: f64) -> Vec2 {
        self.direction + self.plane * camera_x
    }

    /// Determinant of the camera basis `[[plane.x, dir.x], [plane.y, dir.y]]`.
    #[inline]
    pub fn determinant(&self) -> f64 {
        self.plane.x * self.direction.y - self.direction.x * self.plane.y
    }

    /// `1 / determinant`, or `None` when the basis is degenerate (plane
    /// parallel to direction, zero vectors, or non-finite components).
    #[inline]
    pub fn inverse_determinant(&self) -> Option<f64> {
        let inv_det = 1.0 / self.determinant();
        inv_det.is_finite().then_some(inv_det)
    }

    /// Transforms a world point into camera space.
    ///
    /// Returns `(x, y)` where `x` is the lateral offset in plane units and
    /// `y` is the depth along the view axis, in the same units as the
    /// perpendicular wall distance. `None` if the basis is degenerate.
    pub fn to_camera_space(&self, point: Vec2) -> Option<Vec2> {
        let inv_det = self.inverse_determinant()?;
        let d = point - self.position;
        let transformed = Vec2::new(
            inv_det * (self.direction.y * d.x - self.direction.x * d.y),
            inv_det * (-self.plane.y * d.x + self.plane.x * d.y),
        );
        transformed.is_finite().then_some(transformed)
    }

    /// Returns this camera turned by `angle` radians (positive turns right,
    /// toward `+plane`).
    pub fn rotated(&self, angle: f64) -> Self {
        Self {
            position: self.position,
            direction: self.direction.rotate(angle),
            plane: self.plane.rotate(angle),
        }
    }

    /// Returns this camera moved to `position`, orientation unchanged.
    pub fn moved_to(&self, position: Vec2) -> Self {
        Self { position, ..*self }
    }

    /// Horizontal field of view in radians.
    pub fn fov(&self) -> f64 {
        2.0 * (self.plane.length() / self.direction.length()).atan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_fov_matches_classic_plane() {
        let camera = Camera::default();
        assert_relative_eq!(camera.fov(), DEFAULT_FOV, epsilon = 1e-12);
    }

    #[test]
    fn from_angle_faces_east_with_right_toward_south() {
        let camera = Camera::from_angle(Vec2::ZERO, 0.0, DEFAULT_FOV);
        assert_relative_eq!(camera.direction.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(camera.direction.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(camera.plane.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(camera.plane.y, 0.66, epsilon = 1e-9);
    }

    #[test]
    fn point_ahead_has_zero_lateral_offset() {
        let camera = Camera::new(Vec2::new(1.5, 1.5), Vec2::EAST, Vec2::new(0.0, 0.66));
        let p = camera.to_camera_space(Vec2::new(4.5, 1.5)).unwrap();
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn point_behind_has_negative_depth() {
        let camera = Camera::new(Vec2::new(1.5, 1.5), Vec2::EAST, Vec2::new(0.0, 0.66));
        let p = camera.to_camera_space(Vec2::new(0.5, 1.5)).unwrap();
        assert!(p.y < 0.0);
    }

    #[test]
    fn point_on_right_edge_maps_to_plus_one() {
        let camera = Camera::new(Vec2::ZERO, Vec2::EAST, Vec2::new(0.0, 0.66));
        // The ray through camera_x = 1 passes (2, 1.32) at depth 2.
        let p = camera.to_camera_space(camera.ray_direction(1.0) * 2.0).unwrap();
        assert_relative_eq!(p.x / p.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn parallel_plane_is_degenerate() {
        let camera = Camera::new(Vec2::ZERO, Vec2::EAST, Vec2::new(0.5, 0.0));
        assert_eq!(camera.inverse_determinant(), None);
        assert_eq!(camera.to_camera_space(Vec2::ONE), None);
    }

    #[test]
    fn rotation_keeps_basis_perpendicular() {
        let camera = Camera::default().rotated(0.7);
        assert_relative_eq!(camera.direction.dot(camera.plane), 0.0, epsilon = 1e-12);
        assert_relative_eq!(camera.fov(), DEFAULT_FOV, epsilon = 1e-12);
    }
}
