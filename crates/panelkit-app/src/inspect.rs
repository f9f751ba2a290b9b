//! Plain-text reports over documents and the class registry.

use panelkit_core::{EditController, ResourceCatalog, ViewId, ViewRegistry, ViewTree};
use std::fmt::Write;

/// Outline of the edited tree, one view per line followed by its attributes.
pub fn tree_report(editor: &EditController) -> String {
    let mut out = String::new();
    write_view(
        &mut out,
        editor.tree(),
        editor.registry(),
        editor.catalog(),
        editor.root(),
        0,
    );
    out
}

fn write_view(
    out: &mut String,
    tree: &ViewTree,
    registry: &ViewRegistry,
    catalog: &ResourceCatalog,
    id: ViewId,
    depth: usize,
) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let indent = "  ".repeat(depth);
    let _ = writeln!(out, "{}{}", indent, node.class());
    for (name, value) in registry.attributes_for(node, catalog).iter() {
        let _ = writeln!(out, "{}  {} = {:?}", indent, name, value);
    }
    for &child in node.children() {
        write_view(out, tree, registry, catalog, child, depth + 1);
    }
}

/// Named resources of a catalog grouped by kind.
pub fn catalog_report(catalog: &ResourceCatalog) -> String {
    let mut out = String::new();
    let sections: [(&str, Vec<&str>); 5] = [
        ("Colors", catalog.color_names().collect()),
        ("Fonts", catalog.font_names().collect()),
        ("Bitmaps", catalog.bitmap_names().collect()),
        ("Tags", catalog.tag_names().collect()),
        ("Templates", catalog.template_names().collect()),
    ];
    for (title, names) in sections {
        if names.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{}: {}", title, names.join(", "));
    }
    out
}

/// Every registered class with its base class and, optionally, attributes.
pub fn class_report(registry: &ViewRegistry, with_attributes: bool) -> String {
    let mut out = String::new();
    for class in registry.class_names() {
        let display = registry.display_name(class).unwrap_or(class);
        match registry.base_class(class) {
            Some(base) => {
                let _ = writeln!(out, "{} ({}) : {}", class, display, base);
            }
            None => {
                let _ = writeln!(out, "{} ({})", class, display);
            }
        }
        if with_attributes {
            for spec in registry.attribute_specs(class) {
                let _ = writeln!(out, "    {:28} {}", spec.name, spec.ty);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Size};
    use panelkit_core::registry::{CONTAINER_CLASS, TEXT_LABEL_CLASS};
    use panelkit_core::EditorConfig;
    use std::sync::Arc;

    #[test]
    fn test_tree_report_nests_children() {
        let mut editor = EditController::with_root(
            Arc::new(ViewRegistry::with_builtins()),
            CONTAINER_CLASS,
            Size::new(200.0, 100.0),
            EditorConfig::default(),
        )
        .unwrap();
        editor.create_new_view(TEXT_LABEL_CLASS, Point::new(10.0, 10.0)).unwrap();
        editor.change_attribute("title", "Gain");

        let report = tree_report(&editor);
        assert!(report.starts_with("ViewContainer\n"));
        assert!(report.contains("\n  TextLabel\n"));
        assert!(report.contains("    title = \"Gain\""));
        assert!(report.contains("  size = \"200, 100\""));
    }

    #[test]
    fn test_class_report_lists_bases() {
        let registry = ViewRegistry::with_builtins();
        let report = class_report(&registry, false);
        assert!(report.contains("TextLabel (Text Label) : ParamDisplay"));
        assert!(report.lines().any(|l| l.starts_with("View (View)")));
        assert!(class_report(&registry, true).contains("title"));
    }
}
