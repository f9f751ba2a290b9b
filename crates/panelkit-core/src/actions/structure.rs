//! Actions that change the shape of the tree.

use super::{document_order, plural};
use crate::attributes::UiAttributes;
use crate::catalog::ResourceCatalog;
use crate::registry::ViewRegistry;
use crate::tree::{DetachedSubtree, ViewId, ViewTree};
use crate::undo::{Action, EditContext};
use kurbo::{Rect, Vec2};

/// Attach `subtree`, logging instead of losing track of a failure.
fn attach_or_keep(
    tree: &mut ViewTree,
    parent: ViewId,
    subtree: DetachedSubtree,
    index: Option<usize>,
) -> Option<DetachedSubtree> {
    match tree.attach_at(parent, subtree, index) {
        Ok(_) => None,
        Err(subtree) => {
            log::error!("could not attach {} under {}", subtree.root(), parent);
            Some(subtree)
        }
    }
}

/// Members of `ids` other than the root with no ancestor among them.
fn top_level(tree: &ViewTree, ids: &[ViewId]) -> Vec<ViewId> {
    let candidates: Vec<ViewId> = ids
        .iter()
        .copied()
        .filter(|&id| id != tree.root() && tree.contains(id))
        .collect();
    candidates
        .iter()
        .copied()
        .filter(|&id| !candidates.iter().any(|&other| tree.is_ancestor_of(other, id)))
        .collect()
}

/// Insert a single new view.
#[derive(Debug)]
pub struct InsertAction {
    parent: ViewId,
    index: Option<usize>,
    id: ViewId,
    subtree: Option<DetachedSubtree>,
    previous_selection: Vec<ViewId>,
}

impl InsertAction {
    pub fn new(parent: ViewId, subtree: DetachedSubtree, index: Option<usize>) -> Self {
        Self {
            parent,
            index,
            id: subtree.root(),
            subtree: Some(subtree),
            previous_selection: Vec::new(),
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }
}

impl Action for InsertAction {
    fn name(&self) -> &str {
        "Create View"
    }

    fn perform(&mut self, cx: &mut EditContext<'_>) {
        let Some(subtree) = self.subtree.take() else {
            return;
        };
        self.previous_selection = cx.selection.members().to_vec();
        self.subtree = attach_or_keep(cx.tree, self.parent, subtree, self.index);
        if self.subtree.is_none() {
            cx.selection.set_exclusive(self.id);
        }
    }

    fn undo(&mut self, cx: &mut EditContext<'_>) {
        if let Some(subtree) = cx.tree.detach(self.id) {
            self.subtree = Some(subtree);
        }
        cx.selection.set_all(self.previous_selection.iter().copied());
    }
}

/// Insert copies of views (paste, duplicate, drop, template instantiation).
#[derive(Debug)]
pub struct ViewCopyAction {
    name: String,
    parent: ViewId,
    ids: Vec<ViewId>,
    pending: Vec<DetachedSubtree>,
    previous_selection: Vec<ViewId>,
}

impl ViewCopyAction {
    /// `subtrees` are appended to `parent` in order; their frames must already
    /// be in `parent`'s coordinate space.
    pub fn new(name: impl Into<String>, parent: ViewId, subtrees: Vec<DetachedSubtree>) -> Self {
        Self {
            name: name.into(),
            parent,
            ids: subtrees.iter().map(DetachedSubtree::root).collect(),
            pending: subtrees,
            previous_selection: Vec::new(),
        }
    }

    pub fn ids(&self) -> &[ViewId] {
        &self.ids
    }
}

impl Action for ViewCopyAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn perform(&mut self, cx: &mut EditContext<'_>) {
        self.previous_selection = cx.selection.members().to_vec();
        let pending = std::mem::take(&mut self.pending);
        for subtree in pending {
            if let Some(failed) = attach_or_keep(cx.tree, self.parent, subtree, None) {
                self.pending.push(failed);
            }
        }
        let attached: Vec<ViewId> = self
            .ids
            .iter()
            .copied()
            .filter(|&id| cx.tree.contains(id))
            .collect();
        cx.selection.set_all(attached);
    }

    fn undo(&mut self, cx: &mut EditContext<'_>) {
        let mut detached: Vec<_> = self
            .ids
            .iter()
            .rev()
            .filter_map(|&id| cx.tree.detach(id))
            .collect();
        detached.reverse();
        self.pending = detached;
        cx.selection.set_all(self.previous_selection.iter().copied());
    }
}

/// Replace the selection. Undo restores the previous one.
#[derive(Debug)]
pub struct SelectAction {
    ids: Vec<ViewId>,
    previous_selection: Vec<ViewId>,
}

impl SelectAction {
    pub fn new(ids: Vec<ViewId>) -> Self {
        Self {
            ids,
            previous_selection: Vec::new(),
        }
    }
}

impl Action for SelectAction {
    fn name(&self) -> &str {
        "Select Views"
    }

    fn perform(&mut self, cx: &mut EditContext<'_>) {
        self.previous_selection = cx.selection.members().to_vec();
        let tree = &*cx.tree;
        cx.selection
            .set_all(self.ids.iter().copied().filter(|&id| tree.contains(id)));
    }

    fn undo(&mut self, cx: &mut EditContext<'_>) {
        cx.selection.set_all(self.previous_selection.iter().copied());
    }
}

#[derive(Debug)]
struct DeleteEntry {
    id: ViewId,
    parent: ViewId,
    /// First following sibling that survives the delete.
    before: Option<ViewId>,
    subtree: Option<DetachedSubtree>,
}

/// Remove views. Undo puts each back in front of the sibling that followed it.
#[derive(Debug)]
pub struct DeleteAction {
    name: String,
    entries: Vec<DeleteEntry>,
}

impl DeleteAction {
    /// Delete the top-level members of `ids`. The root is never deleted.
    /// `None` if nothing is deletable.
    pub fn new(tree: &ViewTree, ids: &[ViewId]) -> Option<Self> {
        let deletable = top_level(tree, ids);
        let entries: Vec<DeleteEntry> = document_order(tree, &deletable)
            .into_iter()
            .filter_map(|id| {
                let parent = tree.parent(id)?;
                let siblings = tree.children(parent);
                let index = siblings.iter().position(|&c| c == id)?;
                let before = siblings[index + 1..]
                    .iter()
                    .copied()
                    .find(|s| !deletable.contains(s));
                Some(DeleteEntry {
                    id,
                    parent,
                    before,
                    subtree: None,
                })
            })
            .collect();
        if entries.is_empty() {
            return None;
        }
        Some(Self {
            name: plural("Delete", entries.len()),
            entries,
        })
    }
}

impl Action for DeleteAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn perform(&mut self, cx: &mut EditContext<'_>) {
        for entry in &mut self.entries {
            entry.subtree = cx.tree.detach(entry.id);
            cx.selection.remove(entry.id);
        }
        cx.selection.retain_existing(cx.tree);
    }

    fn undo(&mut self, cx: &mut EditContext<'_>) {
        cx.selection.clear();
        for entry in &mut self.entries {
            let Some(subtree) = entry.subtree.take() else {
                continue;
            };
            match cx.tree.attach(entry.parent, subtree, entry.before) {
                Ok(id) => cx.selection.add(id),
                Err(subtree) => {
                    log::error!("could not restore deleted view {}", entry.id);
                    entry.subtree = Some(subtree);
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct EmbeddedMember {
    id: ViewId,
    index: usize,
    frame: Rect,
}

/// Wrap views sharing a parent in a new container.
#[derive(Debug)]
pub struct EmbedAction {
    name: String,
    parent: ViewId,
    container_id: ViewId,
    container: Option<DetachedSubtree>,
    container_index: usize,
    members: Vec<EmbeddedMember>,
}

impl EmbedAction {
    /// The container's frame is the members' bounds grown by `margin`.
    ///
    /// Only members sharing the parent of the first top-level id take part.
    /// `None` if `class` is not a container class or no member qualifies.
    pub fn new(
        tree: &ViewTree,
        registry: &ViewRegistry,
        catalog: &ResourceCatalog,
        ids: &[ViewId],
        class: &str,
        margin: f64,
    ) -> Option<Self> {
        if !registry.is_container(class) {
            log::debug!("cannot embed into non-container class '{}'", class);
            return None;
        }
        let top = top_level(tree, ids);
        let parent = tree.parent(*top.first()?)?;
        let mut members: Vec<EmbeddedMember> = top
            .iter()
            .filter(|&&id| tree.parent(id) == Some(parent))
            .filter_map(|&id| {
                Some(EmbeddedMember {
                    id,
                    index: tree.index_in_parent(id)?,
                    frame: tree.get(id)?.frame,
                })
            })
            .collect();
        members.sort_by_key(|m| m.index);
        let bounds = members
            .iter()
            .map(|m| m.frame)
            .reduce(|a, b| a.union(b))?
            .inflate(margin, margin);

        let container = registry
            .create(class, &UiAttributes::new(), catalog)?
            .with_frame(bounds);
        let container_index = members.first()?.index;
        Some(Self {
            name: format!("Embed Into {}", registry.display_name(class).unwrap_or(class)),
            parent,
            container_id: container.id(),
            container: Some(DetachedSubtree::new(container)),
            container_index,
            members,
        })
    }

    pub fn container_id(&self) -> ViewId {
        self.container_id
    }
}

impl Action for EmbedAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn perform(&mut self, cx: &mut EditContext<'_>) {
        let Some(container) = self.container.take() else {
            return;
        };
        let origin = container.root_node().frame.origin().to_vec2();
        self.container = attach_or_keep(cx.tree, self.parent, container, Some(self.container_index));
        if self.container.is_some() {
            return;
        }
        for member in &self.members {
            if cx.tree.reparent(member.id, self.container_id, None) {
                cx.tree.set_frame(member.id, member.frame - origin);
            }
        }
        cx.selection.set_exclusive(self.container_id);
    }

    fn undo(&mut self, cx: &mut EditContext<'_>) {
        for member in &self.members {
            if cx.tree.reparent(member.id, self.parent, None) {
                cx.tree.set_frame(member.id, member.frame);
            }
        }
        self.container = cx.tree.detach(self.container_id);
        for member in &self.members {
            cx.tree.set_child_index(member.id, member.index);
        }
        cx.selection.set_all(self.members.iter().map(|m| m.id));
    }
}

/// Dissolve a container, moving its children into its parent.
#[derive(Debug)]
pub struct UnembedAction {
    parent: ViewId,
    container_id: ViewId,
    container: Option<DetachedSubtree>,
    container_index: usize,
    offset: Vec2,
    children: Vec<(ViewId, Rect)>,
}

impl UnembedAction {
    /// `None` for the root or a view without children.
    pub fn new(tree: &ViewTree, container: ViewId) -> Option<Self> {
        let parent = tree.parent(container)?;
        let node = tree.get(container)?;
        if node.children().is_empty() {
            return None;
        }
        let children = node
            .children()
            .iter()
            .filter_map(|&c| tree.get(c).map(|n| (c, n.frame)))
            .collect();
        Some(Self {
            parent,
            container_id: container,
            container: None,
            container_index: tree.index_in_parent(container)?,
            offset: node.frame.origin().to_vec2(),
            children,
        })
    }
}

impl Action for UnembedAction {
    fn name(&self) -> &str {
        "Unembed Views"
    }

    fn perform(&mut self, cx: &mut EditContext<'_>) {
        for (i, (id, frame)) in self.children.iter().enumerate() {
            if cx.tree.reparent(*id, self.parent, Some(self.container_index + i)) {
                cx.tree.set_frame(*id, *frame + self.offset);
            }
        }
        self.container = cx.tree.detach(self.container_id);
        cx.selection.set_all(self.children.iter().map(|(id, _)| *id));
    }

    fn undo(&mut self, cx: &mut EditContext<'_>) {
        let Some(container) = self.container.take() else {
            return;
        };
        self.container = attach_or_keep(cx.tree, self.parent, container, Some(self.container_index));
        if self.container.is_some() {
            return;
        }
        for (id, frame) in &self.children {
            if cx.tree.reparent(*id, self.container_id, None) {
                cx.tree.set_frame(*id, *frame);
            }
        }
        cx.selection.set_exclusive(self.container_id);
    }
}

/// Replace a view with one of another class at the same place in the tree.
///
/// Attributes both classes understand are carried over; children move along
/// when both classes are containers.
#[derive(Debug)]
pub struct TransformViewTypeAction {
    name: String,
    parent: ViewId,
    index: usize,
    old_id: ViewId,
    new_id: ViewId,
    /// Whichever of the two views is currently out of the tree.
    spare: Option<DetachedSubtree>,
    move_children: bool,
}

impl TransformViewTypeAction {
    /// `None` for the root, an unknown class, or a view that already has `class`.
    pub fn new(
        tree: &ViewTree,
        registry: &ViewRegistry,
        catalog: &ResourceCatalog,
        id: ViewId,
        class: &str,
    ) -> Option<Self> {
        let parent = tree.parent(id)?;
        let old = tree.get(id)?;
        if old.class() == class {
            return None;
        }
        let attrs = registry.attributes_for(old, catalog);
        let replacement = registry.create(class, &attrs, catalog)?.with_frame(old.frame);
        let move_children = registry.is_container(old.class()) && registry.is_container(class);
        Some(Self {
            name: format!("Transform To {}", registry.display_name(class).unwrap_or(class)),
            parent,
            index: tree.index_in_parent(id)?,
            old_id: id,
            new_id: replacement.id(),
            spare: Some(DetachedSubtree::new(replacement)),
            move_children,
        })
    }

    pub fn new_id(&self) -> ViewId {
        self.new_id
    }

    fn swap(&mut self, cx: &mut EditContext<'_>, from: ViewId, to: ViewId) {
        let Some(incoming) = self.spare.take() else {
            return;
        };
        self.spare = attach_or_keep(cx.tree, self.parent, incoming, Some(self.index));
        if self.spare.is_some() {
            return;
        }
        if self.move_children {
            let children = cx.tree.children(from).to_vec();
            for child in children {
                cx.tree.reparent(child, to, None);
            }
        }
        self.spare = cx.tree.detach(from);
        if cx.selection.remove(from) {
            cx.selection.add(to);
        }
    }
}

impl Action for TransformViewTypeAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn perform(&mut self, cx: &mut EditContext<'_>) {
        let (from, to) = (self.old_id, self.new_id);
        self.swap(cx, from, to);
    }

    fn undo(&mut self, cx: &mut EditContext<'_>) {
        let (from, to) = (self.new_id, self.old_id);
        self.swap(cx, from, to);
    }
}

/// Move a view one step forward or backward among its siblings.
#[derive(Debug, Clone)]
pub struct ZOrderAction {
    name: &'static str,
    id: ViewId,
    from: usize,
    to: usize,
}

impl ZOrderAction {
    /// Later siblings draw in front. `None` when the view is already at the end.
    pub fn new(tree: &ViewTree, id: ViewId, forward: bool) -> Option<Self> {
        let parent = tree.parent(id)?;
        let from = tree.index_in_parent(id)?;
        let count = tree.children(parent).len();
        let to = if forward {
            (from + 1 < count).then_some(from + 1)?
        } else {
            from.checked_sub(1)?
        };
        Some(Self {
            name: if forward { "Bring Forward" } else { "Send Backward" },
            id,
            from,
            to,
        })
    }
}

impl Action for ZOrderAction {
    fn name(&self) -> &str {
        self.name
    }

    fn perform(&mut self, cx: &mut EditContext<'_>) {
        cx.tree.set_child_index(self.id, self.to);
    }

    fn undo(&mut self, cx: &mut EditContext<'_>) {
        cx.tree.set_child_index(self.id, self.from);
    }
}
