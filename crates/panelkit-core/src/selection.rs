//! The set of views targeted by interactive editing.

use crate::tree::{ViewId, ViewTree};
use kurbo::{Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Whether more than one view may be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionMode {
    Single,
    #[default]
    Multi,
}

/// An ordered set of selected views.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    members: Vec<ViewId>,
    mode: SelectionMode,
    /// Offset from the pointer to the selection origin while dragging.
    drag_offset: Option<Vec2>,
}

impl Selection {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            members: Vec::new(),
            mode,
            drag_offset: None,
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Switch modes. Going to single mode keeps only the first member.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
        if mode == SelectionMode::Single {
            self.members.truncate(1);
        }
    }

    /// Add `id`. In single mode the selection is emptied first.
    pub fn add(&mut self, id: ViewId) {
        if self.mode == SelectionMode::Single {
            self.members.clear();
        }
        if !self.members.contains(&id) {
            self.members.push(id);
        }
    }

    pub fn remove(&mut self, id: ViewId) -> bool {
        let before = self.members.len();
        self.members.retain(|&m| m != id);
        self.members.len() != before
    }

    /// Add `id` if absent, remove it otherwise.
    pub fn toggle(&mut self, id: ViewId) {
        if !self.remove(id) {
            self.add(id);
        }
    }

    /// Make `id` the only member.
    pub fn set_exclusive(&mut self, id: ViewId) {
        self.members.clear();
        self.members.push(id);
    }

    /// Replace the members wholesale.
    pub fn set_all(&mut self, ids: impl IntoIterator<Item = ViewId>) {
        self.members.clear();
        for id in ids {
            self.add(id);
        }
    }

    pub fn clear(&mut self) {
        self.members.clear();
        self.drag_offset = None;
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.members.contains(&id)
    }

    /// True if a strict ancestor of `id` is selected.
    pub fn contains_ancestor_of(&self, tree: &ViewTree, id: ViewId) -> bool {
        let mut current = tree.parent(id);
        while let Some(p) = current {
            if self.contains(p) {
                return true;
            }
            current = tree.parent(p);
        }
        false
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn first(&self) -> Option<ViewId> {
        self.members.first().copied()
    }

    /// The sole member, if exactly one view is selected.
    pub fn single(&self) -> Option<ViewId> {
        match self.members.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = ViewId> + '_ {
        self.members.iter().copied()
    }

    pub fn members(&self) -> &[ViewId] {
        &self.members
    }

    /// Members with no selected ancestor, in selection order.
    pub fn top_level(&self, tree: &ViewTree) -> Vec<ViewId> {
        self.members
            .iter()
            .copied()
            .filter(|&id| !self.contains_ancestor_of(tree, id))
            .collect()
    }

    /// Union of the members' frames in root coordinates.
    pub fn bounds(&self, tree: &ViewTree) -> Option<Rect> {
        self.members
            .iter()
            .filter_map(|&id| tree.global_frame(id))
            .reduce(|acc, r| acc.union(r))
    }

    /// Translate every top-level member by `delta`.
    pub fn move_by(&self, tree: &mut ViewTree, delta: Vec2) {
        for id in self.top_level(tree) {
            if let Some(node) = tree.get_mut(id) {
                node.offset(delta);
            }
        }
    }

    /// Drop members no longer present in `tree`.
    pub fn retain_existing(&mut self, tree: &ViewTree) {
        self.members.retain(|&id| tree.contains(id));
    }

    pub fn drag_offset(&self) -> Option<Vec2> {
        self.drag_offset
    }

    pub fn set_drag_offset(&mut self, offset: Option<Vec2>) {
        self.drag_offset = offset;
    }
}
