use crate::attributes::Rgba;
use crate::catalog::{ResourceCatalog, ResourceKind, ResourceValue};
use crate::undo::{Action, EditContext};

/// Define, replace or remove a catalog resource.
#[derive(Debug, Clone)]
pub struct ResourceChangeAction {
    name: String,
    kind: ResourceKind,
    resource: String,
    value: Option<ResourceValue>,
    previous: Option<ResourceValue>,
}

impl ResourceChangeAction {
    /// `value` of `None` removes the resource. The kind comes from the value,
    /// or from `kind` for removals.
    pub fn new(
        catalog: &ResourceCatalog,
        kind: ResourceKind,
        resource: impl Into<String>,
        value: Option<ResourceValue>,
    ) -> Self {
        let resource = resource.into();
        let kind = value.as_ref().map(ResourceValue::kind).unwrap_or(kind);
        let previous = catalog.resource(kind, &resource);
        let verb = match (&previous, &value) {
            (_, None) => "Delete",
            (None, Some(_)) => "Add",
            (Some(_), Some(_)) => "Change",
        };
        Self {
            name: format!("{} {:?} '{}'", verb, kind, resource),
            kind,
            resource,
            value,
            previous,
        }
    }

    /// Convenience for color edits.
    pub fn color(catalog: &ResourceCatalog, resource: impl Into<String>, color: Option<Rgba>) -> Self {
        Self::new(catalog, ResourceKind::Color, resource, color.map(ResourceValue::Color))
    }
}

impl Action for ResourceChangeAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn perform(&mut self, cx: &mut EditContext<'_>) {
        cx.catalog.set_resource(self.kind, &self.resource, self.value.clone());
    }

    fn undo(&mut self, cx: &mut EditContext<'_>) {
        cx.catalog.set_resource(self.kind, &self.resource, self.previous.clone());
    }
}

/// Rename a resource and every view attribute referring to it.
#[derive(Debug, Clone)]
pub struct ResourceRenameAction {
    name: String,
    kind: ResourceKind,
    old: String,
    new: String,
}

impl ResourceRenameAction {
    /// `None` when `old` is missing or `new` is already taken.
    pub fn new(
        catalog: &ResourceCatalog,
        kind: ResourceKind,
        old: impl Into<String>,
        new: impl Into<String>,
    ) -> Option<Self> {
        let (old, new) = (old.into(), new.into());
        if old == new || !catalog.contains(kind, &old) || catalog.contains(kind, &new) {
            return None;
        }
        Some(Self {
            name: format!("Rename {:?} '{}'", kind, old),
            kind,
            old,
            new,
        })
    }
}

impl Action for ResourceRenameAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn perform(&mut self, cx: &mut EditContext<'_>) {
        cx.catalog.rename(self.kind, &self.old, &self.new, cx.tree);
    }

    fn undo(&mut self, cx: &mut EditContext<'_>) {
        cx.catalog.rename(self.kind, &self.new, &self.old, cx.tree);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::AttributeChangeAction;
    use crate::registry::TEXT_LABEL_CLASS;
    use crate::testing::Fixture;
    use kurbo::Rect;

    #[test]
    fn test_color_change_restores_previous() {
        let mut f = Fixture::new();
        f.catalog.define_color("accent", Rgba::BLACK);
        let mut action = ResourceChangeAction::color(&f.catalog, "accent", Some(Rgba::WHITE));
        assert_eq!(action.name(), "Change Color 'accent'");
        action.perform(&mut f.cx());
        assert_eq!(f.catalog.lookup_color("accent"), Some(Rgba::WHITE));
        action.undo(&mut f.cx());
        assert_eq!(f.catalog.lookup_color("accent"), Some(Rgba::BLACK));
    }

    #[test]
    fn test_removal_undo_redefines() {
        let mut f = Fixture::new();
        f.catalog.define_tag("gain", 3);
        let mut action = ResourceChangeAction::new(&f.catalog, ResourceKind::Tag, "gain", None);
        action.perform(&mut f.cx());
        assert!(f.catalog.lookup_tag("gain").is_none());
        action.undo(&mut f.cx());
        assert_eq!(f.catalog.lookup_tag("gain"), Some(3));
    }

    #[test]
    fn test_rename_cascades_and_undoes() {
        let mut f = Fixture::new();
        f.catalog.define_color("accent", Rgba::new(9, 9, 9, 255));
        let root = f.root();
        let label = f.add(root, TEXT_LABEL_CLASS, Rect::new(0.0, 0.0, 10.0, 10.0));
        AttributeChangeAction::new(&f.tree, [label], "font-color", "accent").perform(&mut f.cx());

        let mut action =
            ResourceRenameAction::new(&f.catalog, ResourceKind::Color, "accent", "highlight").unwrap();
        action.perform(&mut f.cx());
        assert_eq!(f.read(label, "font-color").as_deref(), Some("highlight"));
        action.undo(&mut f.cx());
        assert_eq!(f.read(label, "font-color").as_deref(), Some("accent"));
        assert!(ResourceRenameAction::new(&f.catalog, ResourceKind::Color, "missing", "x").is_none());
    }
}
