//! The live widget tree.
//!
//! Nodes live in an arena keyed by [`ViewId`]. A parent owns its children
//! exclusively: detaching a node takes its whole subtree out of the arena,
//! and the same ids come back when the subtree is attached again.

use crate::attributes::AttrValue;
use crate::registry::ViewRegistry;
use kurbo::{Point, Rect, Vec2};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Unique identifier for a view node.
pub type ViewId = Uuid;

/// Frame given to freshly constructed views.
pub const DEFAULT_FRAME: Rect = Rect::new(0.0, 0.0, 50.0, 50.0);

/// A node in the widget tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewNode {
    id: ViewId,
    class: String,
    /// Frame in the parent's coordinate space.
    pub frame: Rect,
    values: BTreeMap<String, AttrValue>,
    parent: Option<ViewId>,
    children: Vec<ViewId>,
}

impl ViewNode {
    /// Create a detached node with a fresh id.
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            class: class.into(),
            frame: DEFAULT_FRAME,
            values: BTreeMap::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_frame(mut self, frame: Rect) -> Self {
        self.frame = frame;
        self
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn parent(&self) -> Option<ViewId> {
        self.parent
    }

    pub fn children(&self) -> &[ViewId] {
        &self.children
    }

    pub fn value(&self, name: &str) -> Option<&AttrValue> {
        self.values.get(name)
    }

    pub fn set_value(&mut self, name: impl Into<String>, value: AttrValue) {
        self.values.insert(name.into(), value);
    }

    pub fn remove_value(&mut self, name: &str) -> Option<AttrValue> {
        self.values.remove(name)
    }

    /// All attribute values in name order.
    pub fn values(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = (&str, &mut AttrValue)> {
        self.values.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    pub fn bool_value(&self, name: &str) -> Option<bool> {
        self.value(name).and_then(AttrValue::as_bool)
    }

    pub fn f64_value(&self, name: &str) -> Option<f64> {
        self.value(name).and_then(AttrValue::as_f64)
    }

    pub fn string_value(&self, name: &str) -> Option<&str> {
        self.value(name).and_then(AttrValue::as_str)
    }

    /// Translate the frame by `delta`.
    pub fn offset(&mut self, delta: Vec2) {
        self.frame = self.frame + delta;
    }
}

/// A subtree taken out of (or not yet placed into) a [`ViewTree`].
#[derive(Debug, Clone)]
pub struct DetachedSubtree {
    root: ViewId,
    nodes: HashMap<ViewId, ViewNode>,
}

impl DetachedSubtree {
    /// Wrap a single childless node.
    pub fn new(mut node: ViewNode) -> Self {
        node.parent = None;
        node.children.clear();
        let root = node.id;
        let mut nodes = HashMap::new();
        nodes.insert(root, node);
        Self { root, nodes }
    }

    pub fn root(&self) -> ViewId {
        self.root
    }

    pub fn root_node(&self) -> &ViewNode {
        &self.nodes[&self.root]
    }

    pub fn root_node_mut(&mut self) -> &mut ViewNode {
        self.nodes
            .get_mut(&self.root)
            .unwrap_or_else(|| unreachable!("subtree root is always present"))
    }

    pub fn get(&self, id: ViewId) -> Option<&ViewNode> {
        self.nodes.get(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append `child` as the last child of `parent` (which must belong to this subtree).
    pub fn push_child(&mut self, parent: ViewId, mut child: DetachedSubtree) -> bool {
        let Some(parent_node) = self.nodes.get_mut(&parent) else {
            return false;
        };
        parent_node.children.push(child.root);
        if let Some(root) = child.nodes.get_mut(&child.root) {
            root.parent = Some(parent);
        }
        self.nodes.extend(child.nodes);
        true
    }

    /// Ids in depth-first pre-order.
    pub fn ids(&self) -> Vec<ViewId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(node) = self.nodes.get(&id) {
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }
}

/// The widget tree being edited.
#[derive(Debug, Clone)]
pub struct ViewTree {
    root: ViewId,
    nodes: HashMap<ViewId, ViewNode>,
}

impl ViewTree {
    /// Create a tree from a root subtree.
    pub fn new(root: DetachedSubtree) -> Self {
        Self {
            root: root.root,
            nodes: root.nodes,
        }
    }

    pub fn root(&self) -> ViewId {
        self.root
    }

    pub fn get(&self, id: ViewId) -> Option<&ViewNode> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: ViewId) -> Option<&mut ViewNode> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent(&self, id: ViewId) -> Option<ViewId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: ViewId) -> &[ViewId] {
        self.nodes.get(&id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ViewNode> {
        self.nodes.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut ViewNode> {
        self.nodes.values_mut()
    }

    /// Position of `id` among its siblings.
    pub fn index_in_parent(&self, id: ViewId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// The sibling following `id`, if any.
    pub fn next_sibling(&self, id: ViewId) -> Option<ViewId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let index = siblings.iter().position(|&c| c == id)?;
        siblings.get(index + 1).copied()
    }

    /// True if `ancestor` is a strict ancestor of `id`.
    pub fn is_ancestor_of(&self, ancestor: ViewId, id: ViewId) -> bool {
        let mut current = self.parent(id);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent(p);
        }
        false
    }

    /// `id` and all of its descendants, depth-first pre-order.
    pub fn descendants(&self, id: ViewId) -> Vec<ViewId> {
        let mut out = Vec::new();
        if !self.contains(id) {
            return out;
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        out
    }

    /// Offset of `id`'s coordinate space (the space its children live in) from the root space.
    pub fn content_origin(&self, id: ViewId) -> Point {
        let mut origin = Point::ZERO;
        let mut current = Some(id);
        while let Some(c) = current {
            let Some(node) = self.nodes.get(&c) else { break };
            origin += node.frame.origin().to_vec2();
            current = node.parent;
        }
        origin
    }

    /// Frame of `id` in the root coordinate space.
    pub fn global_frame(&self, id: ViewId) -> Option<Rect> {
        let node = self.nodes.get(&id)?;
        let offset = match node.parent {
            Some(parent) => self.content_origin(parent).to_vec2(),
            None => Vec2::ZERO,
        };
        Some(node.frame + offset)
    }

    /// Convert a root-space point into the content space of `id`.
    pub fn to_local(&self, id: ViewId, point: Point) -> Point {
        point - self.content_origin(id).to_vec2()
    }

    /// The deepest node under `point` satisfying `filter`, front-most first.
    pub fn deepest_at(&self, point: Point, filter: impl Fn(&ViewNode) -> bool) -> Option<ViewId> {
        let root = self.nodes.get(&self.root)?;
        if !root.frame.contains(point) {
            return None;
        }
        let mut found = filter(root).then_some(self.root);
        let mut current = self.root;
        'descend: loop {
            let local = self.to_local(current, point);
            for &child in self.children(current).iter().rev() {
                let Some(node) = self.nodes.get(&child) else { continue };
                if node.frame.contains(local) {
                    if filter(node) {
                        found = Some(child);
                    }
                    current = child;
                    continue 'descend;
                }
            }
            break;
        }
        found
    }

    /// The deepest node under `point`.
    pub fn view_at(&self, point: Point) -> Option<ViewId> {
        self.deepest_at(point, |_| true)
    }

    /// The deepest container under `point`; the root when nothing deeper qualifies.
    pub fn container_at(&self, point: Point, registry: &ViewRegistry) -> Option<ViewId> {
        self.deepest_at(point, |node| registry.is_container(node.class()))
    }

    /// Set the frame of `id` in parent coordinates.
    pub fn set_frame(&mut self, id: ViewId, frame: Rect) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.frame = frame;
                true
            }
            None => false,
        }
    }

    /// Take `id` and its descendants out of the tree. The root cannot be detached.
    pub fn detach(&mut self, id: ViewId) -> Option<DetachedSubtree> {
        if id == self.root || !self.contains(id) {
            return None;
        }
        let ids = self.descendants(id);
        if let Some(parent) = self.parent(id) {
            if let Some(p) = self.nodes.get_mut(&parent) {
                p.children.retain(|&c| c != id);
            }
        }
        let mut nodes = HashMap::with_capacity(ids.len());
        for c in ids {
            if let Some(node) = self.nodes.remove(&c) {
                nodes.insert(c, node);
            }
        }
        if let Some(root) = nodes.get_mut(&id) {
            root.parent = None;
        }
        Some(DetachedSubtree { root: id, nodes })
    }

    /// Attach a subtree under `parent`, before `before` (or last when `None` or not a child).
    pub fn attach(
        &mut self,
        parent: ViewId,
        subtree: DetachedSubtree,
        before: Option<ViewId>,
    ) -> Result<ViewId, DetachedSubtree> {
        let index = before.and_then(|b| self.children(parent).iter().position(|&c| c == b));
        self.attach_at(parent, subtree, index)
    }

    /// Attach a subtree under `parent` at `index` (clamped; `None` appends).
    pub fn attach_at(
        &mut self,
        parent: ViewId,
        mut subtree: DetachedSubtree,
        index: Option<usize>,
    ) -> Result<ViewId, DetachedSubtree> {
        if !self.contains(parent) || subtree.nodes.keys().any(|id| self.nodes.contains_key(id)) {
            return Err(subtree);
        }
        let root = subtree.root;
        if let Some(node) = subtree.nodes.get_mut(&root) {
            node.parent = Some(parent);
        }
        self.nodes.extend(subtree.nodes);
        if let Some(p) = self.nodes.get_mut(&parent) {
            let at = index.unwrap_or(p.children.len()).min(p.children.len());
            p.children.insert(at, root);
        }
        Ok(root)
    }

    /// Move `id` (with its subtree) under `new_parent` at `index`.
    pub fn reparent(&mut self, id: ViewId, new_parent: ViewId, index: Option<usize>) -> bool {
        if id == new_parent || !self.contains(new_parent) || self.is_ancestor_of(id, new_parent) {
            return false;
        }
        match self.detach(id) {
            Some(subtree) => match self.attach_at(new_parent, subtree, index) {
                Ok(_) => true,
                Err(subtree) => {
                    log::error!("reparent of {} failed, subtree dropped", subtree.root());
                    false
                }
            },
            None => false,
        }
    }

    /// Move `id` to `index` among its siblings.
    pub fn set_child_index(&mut self, id: ViewId, index: usize) -> bool {
        let Some(parent) = self.parent(id) else {
            return false;
        };
        let Some(p) = self.nodes.get_mut(&parent) else {
            return false;
        };
        let Some(current) = p.children.iter().position(|&c| c == id) else {
            return false;
        };
        p.children.remove(current);
        let at = index.min(p.children.len());
        p.children.insert(at, id);
        true
    }
}
