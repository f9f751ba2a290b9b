//! Persisted form of an edited panel: the resource catalog plus the view tree
//! with every attribute stored as its string form.

use crate::attributes::UiAttributes;
use crate::catalog::ResourceCatalog;
use crate::registry::ViewRegistry;
use crate::tree::{DetachedSubtree, ViewId, ViewTree};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while loading a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Root view class '{0}' is not registered")]
    UnknownRootClass(String),
    #[error("Document has no root view")]
    MissingRoot,
}

/// One view and its children in document form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedView {
    pub class: String,
    #[serde(default)]
    pub attributes: UiAttributes,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SerializedView>,
}

impl SerializedView {
    pub fn new(class: impl Into<String>, attributes: UiAttributes) -> Self {
        Self {
            class: class.into(),
            attributes,
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: SerializedView) -> Self {
        self.children.push(child);
        self
    }

    /// Capture `id` and its subtree from a live tree.
    pub fn capture(
        tree: &ViewTree,
        id: ViewId,
        registry: &ViewRegistry,
        catalog: &ResourceCatalog,
    ) -> Option<Self> {
        let node = tree.get(id)?;
        Some(Self {
            class: node.class().to_string(),
            attributes: registry.attributes_for(node, catalog),
            children: node
                .children()
                .iter()
                .filter_map(|&child| Self::capture(tree, child, registry, catalog))
                .collect(),
        })
    }

    /// Number of views in this subtree.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(SerializedView::count).sum::<usize>()
    }

    fn build(&self, registry: &ViewRegistry, catalog: &ResourceCatalog) -> Option<DetachedSubtree> {
        let Some(node) = registry.create(&self.class, &self.attributes, catalog) else {
            log::warn!("skipping '{}' view: class is not registered", self.class);
            return None;
        };
        let mut subtree = DetachedSubtree::new(node);
        let parent = subtree.root();
        for child in &self.children {
            if let Some(child) = child.build(registry, catalog) {
                subtree.push_child(parent, child);
            }
        }
        Some(subtree)
    }
}

/// A saved panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document identifier.
    pub id: String,
    /// Document name.
    pub name: String,
    #[serde(default)]
    pub catalog: ResourceCatalog,
    #[serde(default)]
    pub root: Option<SerializedView>,
}

impl Document {
    /// An empty document with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            catalog: ResourceCatalog::new(),
            root: None,
        }
    }

    /// Capture a live tree and its catalog.
    pub fn from_tree(
        name: impl Into<String>,
        tree: &ViewTree,
        catalog: &ResourceCatalog,
        registry: &ViewRegistry,
    ) -> Self {
        Self {
            root: SerializedView::capture(tree, tree.root(), registry, catalog),
            catalog: catalog.clone(),
            ..Self::new(name)
        }
    }

    /// Rebuild the catalog and the live tree.
    ///
    /// Views naming unknown classes are skipped along with their subtrees;
    /// only an unusable root fails the load.
    pub fn build(&self, registry: &ViewRegistry) -> Result<(ResourceCatalog, ViewTree), DocumentError> {
        let root = self.root.as_ref().ok_or(DocumentError::MissingRoot)?;
        let mut catalog = self.catalog.clone();
        catalog.rebuild_indices();
        if !registry.contains(&root.class) {
            return Err(DocumentError::UnknownRootClass(root.class.clone()));
        }
        let subtree = root
            .build(registry, &catalog)
            .ok_or_else(|| DocumentError::UnknownRootClass(root.class.clone()))?;
        log::debug!("loaded document '{}' with {} views", self.name, subtree.len());
        Ok((catalog, ViewTree::new(subtree)))
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut document: Self = serde_json::from_str(json)?;
        document.catalog.rebuild_indices();
        Ok(document)
    }
}
