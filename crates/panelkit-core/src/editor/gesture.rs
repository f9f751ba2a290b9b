//! Pointer gestures: click selection, move, resize and drag-out.

use super::{EditController, GuideLines};
use crate::actions::GeometryCapture;
use crate::handles::{ResizeZone, hit_zone};
use crate::input::{Instant, Modifiers};
use crate::selection::Selection;
use crate::transfer;
use crate::tree::ViewId;
use kurbo::Point;

/// What the host should do after a pointer event.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerResult {
    /// The editor consumed the event.
    Handled,
    /// The event was not for the editor.
    NotHandled,
    /// Start a platform drag carrying these transfer bytes.
    DragOut(Vec<u8>),
}

/// Observable gesture phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    PendingDrag,
    Moving,
    Resizing(ResizeZone),
}

#[derive(Debug, Default)]
pub(super) enum Gesture {
    #[default]
    Idle,
    /// Button down on a view body; nothing has moved yet.
    PendingDrag {
        hit: ViewId,
        /// Last grid-snapped pointer position.
        last: Point,
        began: Instant,
        /// Collapse a multi-selection to `hit` if the button comes up unmoved.
        collapse: bool,
    },
    Moving {
        last: Point,
        began: Instant,
        capture: GeometryCapture,
    },
    Resizing {
        id: ViewId,
        zone: ResizeZone,
        capture: GeometryCapture,
    },
}

impl EditController {
    pub fn gesture_state(&self) -> GestureState {
        match &self.gesture {
            Gesture::Idle => GestureState::Idle,
            Gesture::PendingDrag { .. } => GestureState::PendingDrag,
            Gesture::Moving { .. } => GestureState::Moving,
            Gesture::Resizing { zone, .. } => GestureState::Resizing(*zone),
        }
    }

    /// Guide lines to draw, if any.
    pub fn guides(&self) -> Option<GuideLines> {
        self.guides
    }

    /// The resize zone under `point`, for cursor feedback.
    pub fn hover_zone(&self, point: Point) -> Option<ResizeZone> {
        if !self.editing {
            return None;
        }
        let id = self.selection.single()?;
        let rect = self.tree.global_frame(id)?;
        hit_zone(
            rect,
            point,
            self.config.handle_size,
            self.config.min_edge_handle_extent,
            id == self.tree.root(),
        )
    }

    pub fn pointer_down(&mut self, pos: Point, modifiers: Modifiers, now: Instant) -> PointerResult {
        if !self.editing {
            return PointerResult::NotHandled;
        }
        if self.attribute_edit.is_some() {
            self.commit_attribute_edit();
        }
        if !matches!(self.gesture, Gesture::Idle) {
            return PointerResult::Handled;
        }

        if let Some(zone) = self.hover_zone(pos) {
            if let Some(id) = self.selection.single() {
                self.gesture = Gesture::Resizing {
                    id,
                    zone,
                    capture: GeometryCapture::capture(&self.tree, [id]),
                };
                self.update_resize_guides(id);
                return PointerResult::Handled;
            }
        }

        let root = self.tree.root();
        let hit = match self.tree.view_at(pos) {
            Some(id) if id != root => id,
            Some(_) => {
                if modifiers.is_empty() {
                    self.selection.clear();
                }
                return PointerResult::Handled;
            }
            None => {
                if modifiers.is_empty() {
                    self.selection.clear();
                }
                return PointerResult::NotHandled;
            }
        };
        let was_selected = self.selection.contains(hit);

        if modifiers.alt {
            if !was_selected {
                self.selection.set_exclusive(hit);
            }
            return self.drag_out(pos);
        }
        if modifiers.command() && was_selected {
            self.selection.remove(hit);
            return PointerResult::Handled;
        }
        if modifiers.command() || modifiers.shift {
            self.selection.add(hit);
        } else if !was_selected {
            self.selection.set_exclusive(hit);
        }

        let last = self.snap(pos);
        if let Some(bounds) = self.selection.bounds(&self.tree) {
            self.selection.set_drag_offset(Some(pos - bounds.origin()));
        }
        self.gesture = Gesture::PendingDrag {
            hit,
            last,
            began: now,
            collapse: was_selected && modifiers.is_empty(),
        };
        PointerResult::Handled
    }

    pub fn pointer_move(&mut self, pos: Point, _modifiers: Modifiers, now: Instant) -> PointerResult {
        if !self.editing {
            return PointerResult::NotHandled;
        }
        let snapped = self.snap(pos);
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => PointerResult::NotHandled,
            Gesture::PendingDrag {
                hit,
                last,
                began,
                collapse,
            } => {
                if snapped == last {
                    self.gesture = Gesture::PendingDrag {
                        hit,
                        last,
                        began,
                        collapse,
                    };
                    return PointerResult::Handled;
                }
                let capture = GeometryCapture::capture(&self.tree, self.movable());
                self.move_captured(&capture, snapped - last);
                self.gesture = Gesture::Moving {
                    last: snapped,
                    began,
                    capture,
                };
                self.refresh_move_guides(now);
                PointerResult::Handled
            }
            Gesture::Moving {
                last,
                began,
                capture,
            } => {
                if snapped != last {
                    self.move_captured(&capture, snapped - last);
                }
                self.gesture = Gesture::Moving {
                    last: snapped,
                    began,
                    capture,
                };
                self.refresh_move_guides(now);
                PointerResult::Handled
            }
            Gesture::Resizing { id, zone, capture } => {
                self.resize_to(id, zone, snapped);
                self.gesture = Gesture::Resizing { id, zone, capture };
                self.update_resize_guides(id);
                PointerResult::Handled
            }
        }
    }

    pub fn pointer_up(&mut self, pos: Point, modifiers: Modifiers, now: Instant) -> PointerResult {
        if !self.editing {
            return PointerResult::NotHandled;
        }
        if matches!(self.gesture, Gesture::Moving { .. } | Gesture::Resizing { .. }) {
            self.pointer_move(pos, modifiers, now);
        }
        self.guides = None;
        self.selection.set_drag_offset(None);
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => PointerResult::NotHandled,
            Gesture::PendingDrag { hit, collapse, .. } => {
                if collapse {
                    self.selection.set_exclusive(hit);
                }
                PointerResult::Handled
            }
            Gesture::Moving { capture, .. } | Gesture::Resizing { capture, .. } => {
                if let Some(action) = capture.finish(&self.tree) {
                    self.perform_action(Box::new(action));
                }
                PointerResult::Handled
            }
        }
    }

    /// Drive timers. Returns `true` when something needs redrawing.
    pub fn poll(&mut self, now: Instant) -> bool {
        if matches!(self.gesture, Gesture::Moving { .. }) {
            let before = self.guides;
            self.refresh_move_guides(now);
            return before != self.guides;
        }
        false
    }

    /// Abandon the current gesture, putting moved or resized views back.
    pub fn cancel_gesture(&mut self) -> bool {
        let cancelled = match std::mem::take(&mut self.gesture) {
            Gesture::Idle => false,
            Gesture::PendingDrag { .. } => true,
            Gesture::Moving { capture, .. } | Gesture::Resizing { capture, .. } => {
                capture.restore(&mut self.tree);
                true
            }
        };
        if cancelled {
            self.guides = None;
            self.selection.set_drag_offset(None);
        }
        cancelled
    }

    fn drag_out(&mut self, pos: Point) -> PointerResult {
        let ids = self.movable();
        if ids.is_empty() {
            return PointerResult::Handled;
        }
        let mut dragged = Selection::default();
        dragged.set_all(ids);
        let bytes = transfer::serialize(&self.tree, &dragged, &self.registry, &self.catalog, pos);
        log::debug!("drag out of {} views", dragged.len());
        PointerResult::DragOut(bytes)
    }

    fn move_captured(&mut self, capture: &GeometryCapture, delta: kurbo::Vec2) {
        for id in capture.ids() {
            if let Some(node) = self.tree.get_mut(id) {
                node.offset(delta);
            }
        }
    }

    /// Move `id`'s edges named by `zone` to root-space `point`.
    fn resize_to(&mut self, id: ViewId, zone: ResizeZone, point: Point) {
        let local = match self.tree.parent(id) {
            Some(parent) => self.tree.to_local(parent, point),
            None => point,
        };
        if let Some(node) = self.tree.get_mut(id) {
            node.frame = zone.resize(node.frame, local);
        }
    }

    fn refresh_move_guides(&mut self, now: Instant) {
        let Gesture::Moving { began, capture, .. } = &self.gesture else {
            return;
        };
        if now.saturating_duration_since(*began) < self.config.guide_delay() {
            return;
        }
        let ids: Vec<ViewId> = capture.ids().collect();
        self.guides = self.bounds_of(&ids).map(GuideLines::selection);
    }

    fn update_resize_guides(&mut self, id: ViewId) {
        self.guides = self.tree.global_frame(id).map(GuideLines::selection);
    }
}
