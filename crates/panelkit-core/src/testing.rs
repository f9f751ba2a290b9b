//! Shared fixtures for unit tests.

use crate::attributes::UiAttributes;
use crate::catalog::ResourceCatalog;
use crate::registry::{CONTAINER_CLASS, ViewRegistry};
use crate::selection::Selection;
use crate::tree::{DetachedSubtree, ViewId, ViewTree};
use crate::undo::EditContext;
use kurbo::Rect;

pub struct Fixture {
    pub tree: ViewTree,
    pub selection: Selection,
    pub catalog: ResourceCatalog,
    pub registry: ViewRegistry,
}

impl Fixture {
    /// A 400x300 container root with no children.
    pub fn new() -> Self {
        let registry = ViewRegistry::with_builtins();
        let catalog = ResourceCatalog::new();
        let root = registry
            .create(CONTAINER_CLASS, &UiAttributes::new().with("size", "400, 300"), &catalog)
            .unwrap();
        Self {
            tree: ViewTree::new(DetachedSubtree::new(root)),
            selection: Selection::default(),
            catalog,
            registry,
        }
    }

    pub fn root(&self) -> ViewId {
        self.tree.root()
    }

    /// Create a `class` view with `frame` as the last child of `parent`.
    pub fn add(&mut self, parent: ViewId, class: &str, frame: Rect) -> ViewId {
        let node = self
            .registry
            .create(class, &UiAttributes::new(), &self.catalog)
            .unwrap()
            .with_frame(frame);
        self.tree.attach(parent, DetachedSubtree::new(node), None).unwrap()
    }

    pub fn frame(&self, id: ViewId) -> Rect {
        self.tree.get(id).unwrap().frame
    }

    pub fn read(&self, id: ViewId, name: &str) -> Option<String> {
        self.registry.read(self.tree.get(id).unwrap(), name, &self.catalog)
    }

    pub fn cx(&mut self) -> EditContext<'_> {
        EditContext {
            tree: &mut self.tree,
            selection: &mut self.selection,
            catalog: &mut self.catalog,
            registry: &self.registry,
        }
    }
}
