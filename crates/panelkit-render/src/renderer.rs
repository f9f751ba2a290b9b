//! Surface abstraction and the edit overlay renderer.

use kurbo::{Point, Rect};
use panelkit_core::EditController;
use panelkit_core::handles::handle_rects;
use peniko::Color;

/// Drawing backend the overlay is painted onto.
///
/// Coordinates are in root-view space. Hosts map them to device pixels.
pub trait Surface {
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, width: f64);
}

/// Colors and stroke widths of the overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    /// Frame around each selected view.
    pub selection_color: Color,
    /// Fill of resize handles.
    pub handle_color: Color,
    /// Guide line color.
    pub guide_color: Color,
    /// Frame of the container a drop would land in.
    pub drop_color: Color,
    pub line_width: f64,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            selection_color: Color::from_rgba8(59, 130, 246, 255), // Blue
            handle_color: Color::from_rgba8(59, 130, 246, 255),
            guide_color: Color::from_rgba8(236, 72, 153, 200), // Pink
            drop_color: Color::from_rgba8(34, 197, 94, 255), // Green
            line_width: 1.0,
        }
    }
}

impl OverlayStyle {
    pub fn with_selection_color(mut self, color: Color) -> Self {
        self.selection_color = color;
        self
    }

    pub fn with_guide_color(mut self, color: Color) -> Self {
        self.guide_color = color;
        self
    }

    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }
}

/// Paints selection frames, resize handles, guide lines and the drop target.
#[derive(Debug, Clone, Default)]
pub struct OverlayRenderer {
    style: OverlayStyle,
}

impl OverlayRenderer {
    pub fn new(style: OverlayStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    /// Draw the overlay for the editor's current state. Nothing is drawn
    /// outside edit mode.
    pub fn draw(&self, surface: &mut dyn Surface, editor: &EditController) {
        if !editor.is_editing() {
            return;
        }
        let tree = editor.tree();
        let width = self.style.line_width;

        if let Some(target) = editor.drop_highlight() {
            surface.stroke_rect(target, self.style.drop_color, width * 2.0);
            for preview in editor.drop_preview() {
                surface.stroke_rect(preview, self.style.drop_color, width);
            }
        }

        for id in editor.selection().iter() {
            if let Some(frame) = tree.global_frame(id) {
                surface.stroke_rect(frame, self.style.selection_color, width);
            }
        }

        // Handles for a single selection only.
        if let Some(id) = editor.selection().single() {
            if let Some(frame) = tree.global_frame(id) {
                let is_root = id == tree.root();
                for (zone, rect) in handle_rects(frame, editor.config().handle_size) {
                    if is_root && !zone.allowed_on_root() {
                        continue;
                    }
                    surface.fill_rect(rect, self.style.handle_color);
                }
            }
        }

        if let Some(guides) = editor.guides() {
            let Some(area) = tree.global_frame(tree.root()) else {
                return;
            };
            for (from, to) in guides.segments(area) {
                surface.stroke_line(from, to, self.style.guide_color, width);
            }
        }
    }
}
