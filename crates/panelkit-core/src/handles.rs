//! Resize handles around a selected view.

use kurbo::{Point, Rect};

/// Side length of a resize handle in pixels.
pub const HANDLE_SIZE: f64 = 5.0;

/// One of the eight resize zones of a view's frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeZone {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl ResizeZone {
    pub const ALL: [ResizeZone; 8] = [
        ResizeZone::TopLeft,
        ResizeZone::Top,
        ResizeZone::TopRight,
        ResizeZone::Right,
        ResizeZone::BottomRight,
        ResizeZone::Bottom,
        ResizeZone::BottomLeft,
        ResizeZone::Left,
    ];

    /// Corners first, in hit-test priority order.
    const HIT_ORDER: [ResizeZone; 8] = [
        ResizeZone::BottomRight,
        ResizeZone::TopLeft,
        ResizeZone::TopRight,
        ResizeZone::BottomLeft,
        ResizeZone::Top,
        ResizeZone::Bottom,
        ResizeZone::Left,
        ResizeZone::Right,
    ];

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            ResizeZone::TopLeft | ResizeZone::TopRight | ResizeZone::BottomLeft | ResizeZone::BottomRight
        )
    }

    pub fn adjusts_left(self) -> bool {
        matches!(self, ResizeZone::TopLeft | ResizeZone::Left | ResizeZone::BottomLeft)
    }

    pub fn adjusts_top(self) -> bool {
        matches!(self, ResizeZone::TopLeft | ResizeZone::Top | ResizeZone::TopRight)
    }

    pub fn adjusts_right(self) -> bool {
        matches!(self, ResizeZone::TopRight | ResizeZone::Right | ResizeZone::BottomRight)
    }

    pub fn adjusts_bottom(self) -> bool {
        matches!(self, ResizeZone::BottomLeft | ResizeZone::Bottom | ResizeZone::BottomRight)
    }

    /// Zones still available on the root view, which stays anchored at its origin.
    pub fn allowed_on_root(self) -> bool {
        matches!(self, ResizeZone::Right | ResizeZone::Bottom | ResizeZone::BottomRight)
    }

    /// Move the edges this zone controls to `point`. An edge dragged past its
    /// opposite edge stops there, so the result never has negative size.
    pub fn resize(self, rect: Rect, point: Point) -> Rect {
        let mut r = rect;
        if self.adjusts_left() {
            r.x0 = point.x.min(r.x1);
        }
        if self.adjusts_right() {
            r.x1 = point.x.max(r.x0);
        }
        if self.adjusts_top() {
            r.y0 = point.y.min(r.y1);
        }
        if self.adjusts_bottom() {
            r.y1 = point.y.max(r.y0);
        }
        r
    }

    /// The point of `rect` this zone drags.
    pub fn anchor(self, rect: Rect) -> Point {
        let cx = (rect.x0 + rect.x1) / 2.0;
        let cy = (rect.y0 + rect.y1) / 2.0;
        match self {
            ResizeZone::TopLeft => Point::new(rect.x0, rect.y0),
            ResizeZone::Top => Point::new(cx, rect.y0),
            ResizeZone::TopRight => Point::new(rect.x1, rect.y0),
            ResizeZone::Right => Point::new(rect.x1, cy),
            ResizeZone::BottomRight => Point::new(rect.x1, rect.y1),
            ResizeZone::Bottom => Point::new(cx, rect.y1),
            ResizeZone::BottomLeft => Point::new(rect.x0, rect.y1),
            ResizeZone::Left => Point::new(rect.x0, cy),
        }
    }
}

/// The hit area of `zone` inside `rect`. Corners are squares, edges are strips.
pub fn zone_rect(rect: Rect, zone: ResizeZone, size: f64) -> Rect {
    match zone {
        ResizeZone::TopLeft => Rect::new(rect.x0, rect.y0, rect.x0 + size, rect.y0 + size),
        ResizeZone::TopRight => Rect::new(rect.x1 - size, rect.y0, rect.x1, rect.y0 + size),
        ResizeZone::BottomLeft => Rect::new(rect.x0, rect.y1 - size, rect.x0 + size, rect.y1),
        ResizeZone::BottomRight => Rect::new(rect.x1 - size, rect.y1 - size, rect.x1, rect.y1),
        ResizeZone::Top => Rect::new(rect.x0, rect.y0, rect.x1, rect.y0 + size),
        ResizeZone::Bottom => Rect::new(rect.x0, rect.y1 - size, rect.x1, rect.y1),
        ResizeZone::Left => Rect::new(rect.x0, rect.y0, rect.x0 + size, rect.y1),
        ResizeZone::Right => Rect::new(rect.x1 - size, rect.y0, rect.x1, rect.y1),
    }
}

/// Find the resize zone under `point`.
///
/// Corner zones win over edge zones. Edge zones only exist when both sides of
/// `rect` exceed `min_edge_extent`. `is_root` limits the result to the zones
/// that keep the origin fixed.
pub fn hit_zone(
    rect: Rect,
    point: Point,
    size: f64,
    min_edge_extent: f64,
    is_root: bool,
) -> Option<ResizeZone> {
    if !rect.contains(point) {
        return None;
    }
    let edges_enabled = rect.width() > min_edge_extent && rect.height() > min_edge_extent;
    ResizeZone::HIT_ORDER
        .into_iter()
        .filter(|z| z.is_corner() || edges_enabled)
        .filter(|z| !is_root || z.allowed_on_root())
        .find(|&z| zone_rect(rect, z, size).contains(point))
}

/// Handle squares to draw for a selected frame.
pub fn handle_rects(rect: Rect, size: f64) -> Vec<(ResizeZone, Rect)> {
    ResizeZone::ALL
        .into_iter()
        .map(|z| {
            let c = z.anchor(rect);
            let half = size / 2.0;
            (z, Rect::new(c.x - half, c.y - half, c.x + half, c.y + half))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Rect = Rect::new(100.0, 100.0, 200.0, 160.0);

    #[test]
    fn test_corners_before_edges() {
        let hit = |x, y| hit_zone(FRAME, Point::new(x, y), HANDLE_SIZE, 15.0, false);
        assert_eq!(hit(101.0, 101.0), Some(ResizeZone::TopLeft));
        assert_eq!(hit(199.0, 159.0), Some(ResizeZone::BottomRight));
        assert_eq!(hit(199.0, 101.0), Some(ResizeZone::TopRight));
        assert_eq!(hit(101.0, 159.0), Some(ResizeZone::BottomLeft));
        assert_eq!(hit(150.0, 101.0), Some(ResizeZone::Top));
        assert_eq!(hit(150.0, 159.0), Some(ResizeZone::Bottom));
        assert_eq!(hit(101.0, 130.0), Some(ResizeZone::Left));
        assert_eq!(hit(199.0, 130.0), Some(ResizeZone::Right));
        assert_eq!(hit(150.0, 130.0), None);
        assert_eq!(hit(50.0, 50.0), None);
    }

    #[test]
    fn test_small_views_have_no_edge_zones() {
        let small = Rect::new(0.0, 0.0, 40.0, 12.0);
        assert_eq!(hit_zone(small, Point::new(20.0, 1.0), HANDLE_SIZE, 15.0, false), None);
        assert_eq!(
            hit_zone(small, Point::new(1.0, 1.0), HANDLE_SIZE, 15.0, false),
            Some(ResizeZone::TopLeft)
        );
    }

    #[test]
    fn test_root_zones_restricted() {
        let hit = |x, y| hit_zone(FRAME, Point::new(x, y), HANDLE_SIZE, 15.0, true);
        assert_eq!(hit(101.0, 101.0), None);
        assert_eq!(hit(150.0, 101.0), None);
        assert_eq!(hit(199.0, 130.0), Some(ResizeZone::Right));
        assert_eq!(hit(199.0, 159.0), Some(ResizeZone::BottomRight));
    }

    #[test]
    fn test_resize_clamps_inverted_edges() {
        let r = ResizeZone::TopLeft.resize(FRAME, Point::new(250.0, 90.0));
        assert_eq!(r, Rect::new(200.0, 90.0, 200.0, 160.0));
        let r = ResizeZone::Bottom.resize(FRAME, Point::new(0.0, 20.0));
        assert_eq!(r, Rect::new(100.0, 100.0, 200.0, 100.0));
        let r = ResizeZone::Right.resize(FRAME, Point::new(230.0, 0.0));
        assert_eq!(r, Rect::new(100.0, 100.0, 230.0, 160.0));
    }

    #[test]
    fn test_handle_rects_centered_on_anchors() {
        let rects = handle_rects(FRAME, 6.0);
        assert_eq!(rects.len(), 8);
        let (_, tl) = rects[0];
        assert_eq!(tl, Rect::new(97.0, 97.0, 103.0, 103.0));
    }
}
