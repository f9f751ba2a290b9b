use crate::attributes::{AttrType, AttrValue, UiAttributes};
use crate::catalog::ResourceCatalog;
use crate::registry::ViewRegistry;
use crate::tree::{ViewId, ViewTree};
use crate::undo::{Action, EditContext};
use kurbo::Rect;

/// Prior state of one view touched by an attribute change.
#[derive(Debug, Clone)]
struct PriorValue {
    id: ViewId,
    value: Option<AttrValue>,
    frame: Rect,
}

/// Set one attribute to the same string on several views.
#[derive(Debug)]
pub struct AttributeChangeAction {
    name: String,
    attribute: String,
    value: String,
    prior: Vec<PriorValue>,
}

impl AttributeChangeAction {
    pub fn new(
        tree: &ViewTree,
        ids: impl IntoIterator<Item = ViewId>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let attribute = attribute.into();
        let prior = ids
            .into_iter()
            .filter_map(|id| {
                let node = tree.get(id)?;
                Some(PriorValue {
                    id,
                    value: node.value(&attribute).cloned(),
                    frame: node.frame,
                })
            })
            .collect();
        Self {
            name: format!("Change '{}'", attribute),
            attribute,
            value: value.into(),
            prior,
        }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }
}

impl Action for AttributeChangeAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn perform(&mut self, cx: &mut EditContext<'_>) {
        let attrs = UiAttributes::new().with(self.attribute.as_str(), self.value.as_str());
        for prior in &self.prior {
            if let Some(node) = cx.tree.get_mut(prior.id) {
                cx.registry.apply(node, &attrs, cx.catalog);
            }
        }
    }

    fn undo(&mut self, cx: &mut EditContext<'_>) {
        for prior in &self.prior {
            let Some(node) = cx.tree.get_mut(prior.id) else {
                continue;
            };
            node.frame = prior.frame;
            match &prior.value {
                Some(value) => node.set_value(self.attribute.as_str(), value.clone()),
                None => {
                    node.remove_value(&self.attribute);
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
struct Rewrite {
    id: ViewId,
    attribute: &'static str,
    before: Option<AttrValue>,
}

/// Replace every attribute of one type whose string value equals `from`
/// throughout a subtree.
#[derive(Debug)]
pub struct MultipleAttributeChangeAction {
    name: String,
    to: String,
    rewrites: Vec<Rewrite>,
}

impl MultipleAttributeChangeAction {
    /// Returns `None` when nothing in the subtree matches.
    pub fn new(
        tree: &ViewTree,
        registry: &ViewRegistry,
        catalog: &ResourceCatalog,
        root: ViewId,
        ty: AttrType,
        from: &str,
        to: impl Into<String>,
    ) -> Option<Self> {
        let mut rewrites = Vec::new();
        for id in tree.descendants(root) {
            let Some(node) = tree.get(id) else { continue };
            for spec in registry.attribute_specs(node.class()) {
                if spec.ty != ty {
                    continue;
                }
                if registry.read(node, spec.name, catalog).as_deref() == Some(from) {
                    rewrites.push(Rewrite {
                        id,
                        attribute: spec.name,
                        before: node.value(spec.name).cloned(),
                    });
                }
            }
        }
        if rewrites.is_empty() {
            return None;
        }
        Some(Self {
            name: format!("Change {} '{}'", ty, from),
            to: to.into(),
            rewrites,
        })
    }

    pub fn len(&self) -> usize {
        self.rewrites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewrites.is_empty()
    }
}

impl Action for MultipleAttributeChangeAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn perform(&mut self, cx: &mut EditContext<'_>) {
        for rewrite in &self.rewrites {
            if let Some(node) = cx.tree.get_mut(rewrite.id) {
                let attrs = UiAttributes::new().with(rewrite.attribute, self.to.as_str());
                cx.registry.apply(node, &attrs, cx.catalog);
            }
        }
    }

    fn undo(&mut self, cx: &mut EditContext<'_>) {
        for rewrite in self.rewrites.iter().rev() {
            let Some(node) = cx.tree.get_mut(rewrite.id) else {
                continue;
            };
            match &rewrite.before {
                Some(value) => node.set_value(rewrite.attribute, value.clone()),
                None => {
                    node.remove_value(rewrite.attribute);
                }
            }
        }
    }
}
