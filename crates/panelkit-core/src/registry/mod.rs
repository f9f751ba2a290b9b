//! The attribute registry: maps a class name to construction, configuration
//! and inspection behavior.
//!
//! Every class except the root names a base class. Creating or configuring a
//! view walks the chain from the root class down to the view's own class, so a
//! subclass refines its bases' attributes but never bypasses them.

mod builtin;
mod descriptor;
mod view;

pub use builtin::{
    BUILTIN_CLASSES, CHECK_BOX_CLASS, CONTAINER_CLASS, CONTROL_CLASS, KNOB_CLASS,
    PARAM_DISPLAY_CLASS, TEXT_BUTTON_CLASS, TEXT_LABEL_CLASS,
};
pub use descriptor::{
    AttrSpec, ClassDescriptor, PreferredSizeFn, ViewCreator, apply_specs, defaults_of,
    find_spec, format_value, parse_value, read_spec,
};
pub use view::{AUTOSIZE_WORDS, VIEW_CLASS, ViewClass, parse_autosize};

use crate::attributes::{AttrType, UiAttributes};
use crate::catalog::ResourceCatalog;
use crate::tree::ViewNode;
use kurbo::Size;
use std::collections::{BTreeMap, HashMap};

/// Registry of view classes.
pub struct ViewRegistry {
    creators: HashMap<&'static str, Box<dyn ViewCreator>>,
}

impl std::fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewRegistry")
            .field("classes", &self.class_names())
            .finish()
    }
}

impl Default for ViewRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl ViewRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            creators: HashMap::new(),
        }
    }

    /// A registry holding `View` and the built-in classes.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(ViewClass));
        for class in BUILTIN_CLASSES {
            registry.register(Box::new(*class));
        }
        registry
    }

    /// Add a class. Fails (and logs) if the name is taken or the base class is unknown.
    pub fn register(&mut self, creator: Box<dyn ViewCreator>) -> bool {
        let name = creator.class_name();
        if self.creators.contains_key(name) {
            log::warn!("view class '{}' is already registered", name);
            return false;
        }
        if let Some(base) = creator.base_class() {
            if !self.creators.contains_key(base) {
                log::warn!("view class '{}' extends unknown class '{}'", name, base);
                return false;
            }
        }
        log::debug!("registered view class '{}'", name);
        self.creators.insert(name, creator);
        true
    }

    /// Remove a class that no other class extends.
    pub fn unregister(&mut self, class: &str) -> bool {
        if self.creators.values().any(|c| c.base_class() == Some(class)) {
            log::warn!("cannot unregister '{}': other classes extend it", class);
            return false;
        }
        self.creators.remove(class).is_some()
    }

    pub fn contains(&self, class: &str) -> bool {
        self.creators.contains_key(class)
    }

    pub fn creator(&self, class: &str) -> Option<&dyn ViewCreator> {
        self.creators.get(class).map(|c| c.as_ref())
    }

    /// The descriptor that owns `node`.
    pub fn class_of(&self, node: &ViewNode) -> Option<&dyn ViewCreator> {
        self.creator(node.class())
    }

    /// Registered class names, sorted.
    pub fn class_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.creators.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn display_name(&self, class: &str) -> Option<&'static str> {
        self.creator(class).map(|c| c.display_name())
    }

    pub fn base_class(&self, class: &str) -> Option<&'static str> {
        self.creator(class).and_then(|c| c.base_class())
    }

    /// Descriptors of `class` and its bases, root first. Empty for unknown classes.
    pub fn chain(&self, class: &str) -> Vec<&dyn ViewCreator> {
        let mut chain = Vec::new();
        let mut current = self.creator(class);
        while let Some(creator) = current {
            chain.push(creator);
            current = creator.base_class().and_then(|b| self.creator(b));
        }
        chain.reverse();
        chain
    }

    /// True if `class` is `base` or extends it.
    pub fn inherits_from(&self, class: &str, base: &str) -> bool {
        self.chain(class).iter().any(|c| c.class_name() == base)
    }

    /// True if views of `class` may hold children.
    pub fn is_container(&self, class: &str) -> bool {
        self.chain(class).iter().any(|c| c.is_container())
    }

    /// Construct a view of `class` configured from `attrs`.
    ///
    /// Defaults are written first, then each descriptor from the root class to
    /// the leaf applies `attrs`. Returns `None` for an unknown class.
    pub fn create(
        &self,
        class: &str,
        attrs: &UiAttributes,
        catalog: &ResourceCatalog,
    ) -> Option<ViewNode> {
        let chain = self.chain(class);
        let Some(leaf) = chain.last() else {
            log::debug!("unknown view class '{}'", class);
            return None;
        };
        let mut node = leaf.create();
        for creator in &chain {
            creator.apply(&mut node, &defaults_of(creator.attributes()), catalog);
        }
        for creator in &chain {
            creator.apply(&mut node, attrs, catalog);
        }
        Some(node)
    }

    /// Apply `attrs` to an existing view. Returns `false` only if the view's class is unknown.
    pub fn apply(&self, node: &mut ViewNode, attrs: &UiAttributes, catalog: &ResourceCatalog) -> bool {
        let chain = self.chain(node.class());
        if chain.is_empty() {
            log::debug!("cannot apply attributes to unknown class '{}'", node.class());
            return false;
        }
        for creator in chain {
            creator.apply(node, attrs, catalog);
        }
        true
    }

    /// Attribute names and types understood by `node`'s class.
    pub fn inspect(&self, node: &ViewNode) -> BTreeMap<&'static str, AttrType> {
        self.attribute_specs(node.class())
            .into_iter()
            .map(|s| (s.name, s.ty))
            .collect()
    }

    /// Every attribute spec of `class`, root class first.
    pub fn attribute_specs(&self, class: &str) -> Vec<&'static AttrSpec> {
        self.chain(class)
            .into_iter()
            .flat_map(|c| c.attributes().iter())
            .collect()
    }

    /// The spec for `name`, searching from the leaf class towards the root.
    pub fn attribute_spec(&self, class: &str, name: &str) -> Option<&'static AttrSpec> {
        self.chain(class)
            .into_iter()
            .rev()
            .find_map(|c| find_spec(c.attributes(), name))
    }

    pub fn attribute_type(&self, class: &str, name: &str) -> Option<AttrType> {
        self.attribute_spec(class, name).map(|s| s.ty)
    }

    /// Render the live value of `name` in the grammar `apply` accepts.
    pub fn read(&self, node: &ViewNode, name: &str, catalog: &ResourceCatalog) -> Option<String> {
        self.chain(node.class())
            .into_iter()
            .rev()
            .filter(|c| find_spec(c.attributes(), name).is_some())
            .find_map(|c| c.read(node, name, catalog))
    }

    /// Every readable attribute of `node` as strings.
    pub fn attributes_for(&self, node: &ViewNode, catalog: &ResourceCatalog) -> UiAttributes {
        let mut attrs = UiAttributes::new();
        for spec in self.attribute_specs(node.class()) {
            if let Some(value) = self.read(node, spec.name, catalog) {
                attrs.set(spec.name, value);
            }
        }
        attrs
    }

    pub fn possible_values(
        &self,
        node: &ViewNode,
        name: &str,
        catalog: &ResourceCatalog,
    ) -> Option<Vec<String>> {
        self.chain(node.class())
            .into_iter()
            .rev()
            .find(|c| find_spec(c.attributes(), name).is_some())
            .and_then(|c| c.possible_values(name, catalog))
    }

    pub fn value_range(&self, class: &str, name: &str) -> Option<(f64, f64)> {
        self.attribute_spec(class, name).and_then(|s| s.range)
    }

    /// The most derived natural size available for `node`.
    pub fn preferred_size(&self, node: &ViewNode, catalog: &ResourceCatalog) -> Option<Size> {
        self.chain(node.class())
            .into_iter()
            .rev()
            .find_map(|c| c.preferred_size(node, catalog))
    }
}
