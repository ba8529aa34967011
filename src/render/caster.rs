//! Per-column wall casting with grid DDA.
//!
//! Every screen column fires one ray into the [`WorldGrid`] and reports the
//! nearest wall it meets as a [`WallHit`].
//!
//! # Algorithm Overview
//!
//! Digital Differential Analysis walks the ray through the grid one cell
//! boundary at a time instead of marching in fixed increments:
//!
//! 1. **Delta distances**: `|1 / ray.x|` and `|1 / ray.y|` are the ray lengths
//!    between two consecutive vertical (resp. horizontal) grid lines.
//! 2. **Side distances**: the ray length from the camera to the *first*
//!    vertical and horizontal grid line, from the camera's fractional position
//!    inside its starting cell.
//! 3. **Walk**: always advance across whichever grid line is nearer, add that
//!    axis's delta distance, and stop on the first non-empty cell.
//!
//! ```text
//!     +-----+-----+-----+
//!     |     |     |#####|
//!     |   __|__---+#####|   side_dist.x hits first -> step x
//!     | c/  |     |#####|   the wall face crossed is vertical (NS side)
//!     +-----+-----+-----+
//! ```
//!
//! # Perpendicular Distance
//!
//! The reported distance is measured along the camera's view axis, not along
//! the ray. After the last step, `side_dist - delta_dist` on the stepped axis
//! is exactly that projection. Using the Euclidean ray length instead bends
//! flat walls into a curve (the fisheye effect).
//!
//! # Termination
//!
//! Each step moves one cell along one axis, never backwards. A ray starting
//! inside a `W x H` grid leaves it after at most `W + H` steps, and any
//! lookup outside the grid reads as solid, so the walk always ends. An
//! explicit step cap guards non-finite camera input.

use crate::camera::Camera;
use crate::math::Vec2;
use crate::world::{WorldGrid, EMPTY_CELL};

/// Delta distance used for an axis the ray never crosses (component exactly 0).
pub const DELTA_DIST_SENTINEL: f64 = 1e30;

/// Which kind of grid line the ray crossed to reach the wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Stepped along x: the face hit is a vertical line of the grid (it faces
    /// east or west and runs north-south).
    NorthSouth,
    /// Stepped along y: the face hit is a horizontal line of the grid.
    EastWest,
}

/// The nearest wall along one column's ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallHit {
    /// Distance along the view axis, free of fisheye distortion.
    pub perp_distance: f64,
    pub side: Side,
    /// Cell code of the wall, used as its texture id.
    pub texture_id: u32,
    /// Horizontal texture coordinate in `[0, 1)`, oriented so textures read
    /// left to right from whichever side the wall is seen.
    pub u: f64,
    /// Grid cell that stopped the ray.
    pub cell: (i64, i64),
    /// DDA steps taken.
    pub steps: u32,
}

/// Maps a screen column to `camera_x` in `[-1, 1)`.
#[inline]
pub fn column_to_camera_x(column: usize, width: usize) -> f64 {
    2.0 * column as f64 / width as f64 - 1.0
}

/// Upper bound on DDA steps for `grid`. Never reached by a finite camera.
#[inline]
pub fn max_steps(grid: &WorldGrid) -> u32 {
    (grid.width() + grid.height() + 2) as u32
}

#[inline]
fn delta_distance(component: f64) -> f64 {
    if component == 0.0 {
        DELTA_DIST_SENTINEL
    } else {
        (1.0 / component).abs()
    }
}

/// Fractional part clamped to `[0, 1)`; non-finite input maps to 0.
#[inline]
fn unit_fract(v: f64) -> f64 {
    let f = v - v.floor();
    if f.is_finite() {
        f.clamp(0.0, 1.0 - f64::EPSILON)
    } else {
        0.0
    }
}

/// Mirrors a texture coordinate, keeping it in `[0, 1)`.
#[inline]
fn mirror(u: f64) -> f64 {
    (1.0 - u).min(1.0 - f64::EPSILON)
}

/// Casts the ray for `camera_x` (-1 = left screen edge, 1 = right) and
/// returns the first wall it meets.
pub fn cast_column(camera_x: f64, camera: &Camera, grid: &WorldGrid) -> WallHit {
    let ray = camera.ray_direction(camera_x);
    let pos = camera.position;

    // Which cell of the map we're in
    let mut map_x = pos.x.floor() as i64;
    let mut map_y = pos.y.floor() as i64;

    let delta = Vec2::new(delta_distance(ray.x), delta_distance(ray.y));

    let (step_x, mut side_dist_x) = if ray.x < 0.0 {
        (-1, (pos.x - map_x as f64) * delta.x)
    } else {
        (1, (map_x as f64 + 1.0 - pos.x) * delta.x)
    };
    let (step_y, mut side_dist_y) = if ray.y < 0.0 {
        (-1, (pos.y - map_y as f64) * delta.y)
    } else {
        (1, (map_y as f64 + 1.0 - pos.y) * delta.y)
    };

    let limit = max_steps(grid);
    let mut steps = 0;
    let mut side;
    let mut cell;
    loop {
        if side_dist_x < side_dist_y {
            side_dist_x += delta.x;
            map_x += step_x;
            side = Side::NorthSouth;
        } else {
            side_dist_y += delta.y;
            map_y += step_y;
            side = Side::EastWest;
        }
        steps += 1;

        cell = grid.get(map_x, map_y);
        if cell != EMPTY_CELL || steps >= limit {
            break;
        }
    }

    let perp_distance = match side {
        Side::NorthSouth => side_dist_x - delta.x,
        Side::EastWest => side_dist_y - delta.y,
    };

    // Where along the face the ray landed, on the axis that was not stepped
    let wall_pos = match side {
        Side::NorthSouth => pos.y + perp_distance * ray.y,
        Side::EastWest => pos.x + perp_distance * ray.x,
    };
    let u = unit_fract(wall_pos);

    // Screen right is +y when looking east and -x when looking south, so
    // faces seen looking west or south run backwards.
    let flipped = match side {
        Side::NorthSouth => ray.x < 0.0,
        Side::EastWest => ray.y > 0.0,
    };

    WallHit {
        perp_distance,
        side,
        texture_id: cell as u32,
        u: if flipped { mirror(u) } else { u },
        cell: (map_x, map_y),
        steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::OUT_OF_BOUNDS_CELL;
    use approx::assert_relative_eq;

    fn single_cell_room() -> WorldGrid {
        WorldGrid::from_rows(&[[1u8, 1, 1], [1, 0, 1], [1, 1, 1]]).unwrap()
    }

    fn open_room(width: usize, height: usize) -> WorldGrid {
        let mut grid = WorldGrid::new(width, height).unwrap();
        grid.enclose(1);
        grid
    }

    #[test]
    fn center_column_in_single_cell_room() {
        let camera = Camera::new(Vec2::new(1.5, 1.5), Vec2::EAST, Vec2::new(0.0, 0.66));
        let hit = cast_column(0.0, &camera, &single_cell_room());

        assert_eq!(hit.side, Side::NorthSouth);
        assert_eq!(hit.cell, (2, 1));
        assert_eq!(hit.texture_id, 1);
        assert_eq!(hit.steps, 1);
        // The east border cell's face is at x = 2.
        assert_relative_eq!(hit.perp_distance, 0.5, epsilon = 1e-12);
        assert_relative_eq!(hit.u, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn axis_aligned_ray_does_not_divide_by_zero() {
        let camera = Camera::new(Vec2::new(2.5, 2.5), Vec2::SOUTH, Vec2::new(-0.66, 0.0));
        let hit = cast_column(0.0, &camera, &open_room(5, 5));

        assert!(hit.perp_distance.is_finite());
        assert!(hit.u.is_finite());
        assert_eq!(hit.side, Side::EastWest);
        assert_eq!(hit.cell, (2, 4));
        assert_relative_eq!(hit.perp_distance, 1.5, epsilon = 1e-12);
    }

    #[test]
    fn flat_wall_has_uniform_perpendicular_distance() {
        // Tall room so every column of an east-facing camera hits the east wall.
        let grid = open_room(10, 40);
        let camera = Camera::new(Vec2::new(1.5, 20.5), Vec2::EAST, Vec2::new(0.0, 0.66));

        let mut euclidean = Vec::new();
        for column in 0..64 {
            let camera_x = column_to_camera_x(column, 64);
            let hit = cast_column(camera_x, &camera, &grid);
            assert_eq!(hit.cell.0, 9);
            assert_relative_eq!(hit.perp_distance, 7.5, epsilon = 1e-9);
            euclidean.push(hit.perp_distance * camera.ray_direction(camera_x).length());
        }
        // The raw ray length would bow the wall.
        assert!(euclidean[0] > euclidean[32] + 1.0);
    }

    #[test]
    fn terminates_within_width_plus_height() {
        let mut grid = open_room(13, 9);
        // A few interior pillars so rays stop at different depths.
        for (x, y) in [(3, 3), (7, 5), (10, 2), (5, 6)] {
            grid.set(x, y, 2);
        }
        let bound = (grid.width() + grid.height()) as u32;

        for i in 0..360 {
            let angle = (i as f64).to_radians();
            for &(px, py) in &[(1.5, 1.5), (6.2, 4.7), (11.9, 7.1), (1.01, 7.99)] {
                let camera = Camera::from_angle(Vec2::new(px, py), angle, 1.0);
                for camera_x in [-1.0, -0.3, 0.0, 0.7, 1.0] {
                    let hit = cast_column(camera_x, &camera, &grid);
                    assert!(hit.steps <= bound, "{} steps at angle {}", hit.steps, i);
                    assert!(hit.perp_distance >= 0.0);
                    assert!((0.0..1.0).contains(&hit.u));
                }
            }
        }
    }

    #[test]
    fn camera_outside_grid_hits_implicit_wall() {
        let grid = WorldGrid::new(4, 4).unwrap();
        let camera = Camera::new(Vec2::new(-3.5, 1.5), Vec2::EAST, Vec2::new(0.0, 0.66));
        let hit = cast_column(0.0, &camera, &grid);

        assert_eq!(hit.texture_id, OUT_OF_BOUNDS_CELL as u32);
        assert_eq!(hit.steps, 1);
    }

    #[test]
    fn unenclosed_grid_still_terminates() {
        let grid = WorldGrid::new(6, 6).unwrap();
        let camera = Camera::new(Vec2::new(2.5, 2.5), Vec2::WEST, Vec2::new(0.0, -0.66));
        let hit = cast_column(0.2, &camera, &grid);

        assert_eq!(hit.texture_id, OUT_OF_BOUNDS_CELL as u32);
        assert!(hit.steps <= max_steps(&grid));
    }

    #[test]
    fn non_finite_camera_terminates() {
        let camera = Camera::new(Vec2::new(f64::NAN, 1.5), Vec2::EAST, Vec2::new(0.0, 0.66));
        let hit = cast_column(0.0, &camera, &single_cell_room());
        assert!(hit.steps <= max_steps(&single_cell_room()));
    }

    #[test]
    fn texture_reads_left_to_right_from_every_direction() {
        let grid = open_room(11, 11);
        for quarter in 0..4 {
            let angle = quarter as f64 * std::f64::consts::FRAC_PI_2;
            let camera = Camera::from_angle(Vec2::new(5.5, 5.5), angle, 1.0);
            let center = cast_column(0.0, &camera, &grid);
            let right = cast_column(0.05, &camera, &grid);

            assert_eq!(center.cell, right.cell, "facing {angle}");
            assert!(right.u > center.u, "facing {angle}: {} <= {}", right.u, center.u);
        }
    }
}
