//! Drops of transfer payloads coming from outside the edited tree.

use super::{EditController, GuideLines};
use crate::actions::plural;
use crate::transfer::{self, TransferPayload};
use crate::tree::ViewId;
use kurbo::{Point, Rect};

/// A payload hovering over the editor.
#[derive(Debug)]
pub(super) struct DragIn {
    payload: TransferPayload,
    target: Option<ViewId>,
    top_left: Point,
}

impl EditController {
    /// A payload entered the edit area. Returns `false` if it cannot be dropped here.
    pub fn drag_enter(&mut self, bytes: &[u8], pos: Point) -> bool {
        if !self.editing {
            return false;
        }
        let payload = match transfer::deserialize(bytes, &self.registry, &self.catalog) {
            Ok(payload) if !payload.views.is_empty() => payload,
            Ok(_) => return false,
            Err(e) => {
                log::debug!("rejecting drag payload: {}", e);
                return false;
            }
        };
        self.drag_in = Some(DragIn {
            payload,
            target: None,
            top_left: pos,
        });
        self.drag_move(pos)
    }

    /// Track the hovering payload; updates the drop highlight and insertion guide.
    pub fn drag_move(&mut self, pos: Point) -> bool {
        let target = self.tree.container_at(pos, &self.registry);
        let snapped = self.snap(pos);
        let Some(drag) = self.drag_in.as_mut() else {
            return false;
        };
        drag.target = target;
        drag.top_left = snapped - drag.payload.grab_offset;
        self.guides = Some(GuideLines::point(drag.top_left));
        target.is_some()
    }

    /// The payload left without dropping.
    pub fn drag_leave(&mut self) {
        if self.drag_in.take().is_some() {
            self.guides = None;
        }
    }

    /// Insert the hovering payload into the container under `pos`.
    pub fn drop(&mut self, pos: Point) -> Vec<ViewId> {
        if !self.drag_move(pos) {
            self.drag_leave();
            return Vec::new();
        }
        self.guides = None;
        let Some(DragIn {
            payload,
            target: Some(target),
            top_left,
        }) = self.drag_in.take()
        else {
            return Vec::new();
        };
        let name = plural("Drop", payload.views.len());
        self.place_payload(name, payload, target, top_left)
    }

    pub fn is_drag_over(&self) -> bool {
        self.drag_in.is_some()
    }

    /// Root-space frame of the container a drop would land in.
    pub fn drop_highlight(&self) -> Option<Rect> {
        let target = self.drag_in.as_ref()?.target?;
        self.tree.global_frame(target)
    }

    /// Root-space frames the dropped views would take.
    pub fn drop_preview(&self) -> Vec<Rect> {
        let Some(drag) = self.drag_in.as_ref() else {
            return Vec::new();
        };
        drag.payload
            .views
            .iter()
            .map(|v| v.root_node().frame + drag.top_left.to_vec2())
            .collect()
    }
}
