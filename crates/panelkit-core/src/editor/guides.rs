use kurbo::{Point, Rect};

/// How guide lines are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideStyle {
    /// Lines along all four edges of a rectangle.
    Selection,
    /// A horizontal and a vertical line through a point.
    Point,
}

/// Transient alignment lines shown while moving, resizing or dropping views.
///
/// Lines run across the whole edit area; `rect` only fixes where they are.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideLines {
    pub style: GuideStyle,
    pub rect: Rect,
}

impl GuideLines {
    pub fn selection(rect: Rect) -> Self {
        Self {
            style: GuideStyle::Selection,
            rect,
        }
    }

    pub fn point(point: Point) -> Self {
        Self {
            style: GuideStyle::Point,
            rect: Rect::from_points(point, point),
        }
    }

    /// Line segments clipped to `area`, as `(start, end)` pairs.
    pub fn segments(&self, area: Rect) -> Vec<(Point, Point)> {
        let xs: &[f64] = match self.style {
            GuideStyle::Selection => &[self.rect.x0, self.rect.x1],
            GuideStyle::Point => &[self.rect.x0],
        };
        let ys: &[f64] = match self.style {
            GuideStyle::Selection => &[self.rect.y0, self.rect.y1],
            GuideStyle::Point => &[self.rect.y0],
        };
        let vertical = xs
            .iter()
            .map(|&x| (Point::new(x, area.y0), Point::new(x, area.y1)));
        let horizontal = ys
            .iter()
            .map(|&y| (Point::new(area.x0, y), Point::new(area.x1, y)));
        vertical.chain(horizontal).collect()
    }
}
