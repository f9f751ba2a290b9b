use super::plural;
use crate::catalog::ResourceCatalog;
use crate::registry::ViewRegistry;
use crate::tree::{ViewId, ViewTree};
use crate::undo::{Action, EditContext};
use kurbo::Rect;

/// Moves and resizes: a set of frames with their before and after values.
///
/// A move is a resize that keeps the size, so one action covers both.
#[derive(Debug, Clone)]
pub struct GeometryAction {
    name: String,
    frames: Vec<(ViewId, Rect, Rect)>,
}

impl GeometryAction {
    /// Build from `(id, before, after)` triples. Unchanged frames are dropped;
    /// `None` if nothing changed.
    pub fn new(name: impl Into<String>, frames: Vec<(ViewId, Rect, Rect)>) -> Option<Self> {
        let frames: Vec<_> = frames.into_iter().filter(|(_, b, a)| b != a).collect();
        if frames.is_empty() {
            return None;
        }
        Some(Self {
            name: name.into(),
            frames,
        })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl Action for GeometryAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn perform(&mut self, cx: &mut EditContext<'_>) {
        for (id, _, after) in &self.frames {
            cx.tree.set_frame(*id, *after);
        }
    }

    fn undo(&mut self, cx: &mut EditContext<'_>) {
        for (id, before, _) in &self.frames {
            cx.tree.set_frame(*id, *before);
        }
    }
}

/// Frames recorded at the start of a gesture.
#[derive(Debug, Clone, Default)]
pub struct GeometryCapture {
    frames: Vec<(ViewId, Rect)>,
}

impl GeometryCapture {
    pub fn capture(tree: &ViewTree, ids: impl IntoIterator<Item = ViewId>) -> Self {
        Self {
            frames: ids
                .into_iter()
                .filter_map(|id| tree.get(id).map(|n| (id, n.frame)))
                .collect(),
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = ViewId> + '_ {
        self.frames.iter().map(|(id, _)| *id)
    }

    pub fn original(&self, id: ViewId) -> Option<Rect> {
        self.frames.iter().find(|(i, _)| *i == id).map(|(_, r)| *r)
    }

    /// Put every captured frame back.
    pub fn restore(&self, tree: &mut ViewTree) {
        for (id, frame) in &self.frames {
            tree.set_frame(*id, *frame);
        }
    }

    /// Compare with the live frames. `None` if nothing moved.
    pub fn finish(&self, tree: &ViewTree) -> Option<GeometryAction> {
        let mut resized = false;
        let frames: Vec<_> = self
            .frames
            .iter()
            .filter_map(|(id, before)| {
                let after = tree.get(*id)?.frame;
                if after.size() != before.size() {
                    resized = true;
                }
                Some((*id, *before, after))
            })
            .filter(|(_, b, a)| b != a)
            .collect();
        let name = plural(if resized { "Resize" } else { "Move" }, frames.len());
        GeometryAction::new(name, frames)
    }
}

/// Resize views to their class's natural size, keeping their origins.
#[derive(Debug, Clone)]
pub struct SizeToFitAction(GeometryAction);

impl SizeToFitAction {
    /// `None` when no view has a natural size different from its current one.
    pub fn new(
        tree: &ViewTree,
        registry: &ViewRegistry,
        catalog: &ResourceCatalog,
        ids: impl IntoIterator<Item = ViewId>,
    ) -> Option<Self> {
        let frames = ids
            .into_iter()
            .filter_map(|id| {
                let node = tree.get(id)?;
                let size = registry.preferred_size(node, catalog)?;
                Some((id, node.frame, Rect::from_origin_size(node.frame.origin(), size)))
            })
            .collect();
        GeometryAction::new("Size To Fit", frames).map(Self)
    }
}

impl Action for SizeToFitAction {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn perform(&mut self, cx: &mut EditContext<'_>) {
        self.0.perform(cx);
    }

    fn undo(&mut self, cx: &mut EditContext<'_>) {
        self.0.undo(cx);
    }
}
