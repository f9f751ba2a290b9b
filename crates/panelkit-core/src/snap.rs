//! Grid snapping for pointer coordinates.

use kurbo::{Point, Vec2};

/// Default grid spacing in pixels.
pub const DEFAULT_GRID_SIZE: u32 = 10;

/// Snap a point down to the grid: `floor(p / grid) * grid`.
///
/// A grid size of 0 or 1 turns snapping off.
pub fn snap_to_grid(point: Point, grid_size: u32) -> Point {
    if grid_size <= 1 {
        return point;
    }
    let grid = f64::from(grid_size);
    Point::new(
        (point.x / grid).floor() * grid,
        (point.y / grid).floor() * grid,
    )
}

/// Delta between two pointer positions after snapping both.
pub fn snapped_delta(from: Point, to: Point, grid_size: u32) -> Vec2 {
    snap_to_grid(to, grid_size) - snap_to_grid(from, grid_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_floors() {
        assert_eq!(snap_to_grid(Point::new(103.0, 107.0), 10), Point::new(100.0, 100.0));
        assert_eq!(snap_to_grid(Point::new(118.0, 122.0), 10), Point::new(110.0, 120.0));
        assert_eq!(snap_to_grid(Point::new(-3.0, 9.99), 10), Point::new(-10.0, 0.0));
    }

    #[test]
    fn test_grid_one_is_identity() {
        let p = Point::new(12.345, -6.7);
        assert_eq!(snap_to_grid(p, 1), p);
        assert_eq!(snap_to_grid(p, 0), p);
    }

    #[test]
    fn test_snap_is_idempotent() {
        for grid in 1..=25u32 {
            for i in -40..40 {
                let p = Point::new(i as f64 * 3.7, i as f64 * -1.3 + 0.5);
                let once = snap_to_grid(p, grid);
                assert_eq!(snap_to_grid(once, grid), once, "grid {} point {:?}", grid, p);
            }
        }
    }

    #[test]
    fn test_snapped_delta() {
        let delta = snapped_delta(Point::new(103.0, 107.0), Point::new(118.0, 122.0), 10);
        assert_eq!(delta, Vec2::new(10.0, 20.0));
    }
}
