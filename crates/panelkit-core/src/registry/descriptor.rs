//! Attribute tables and the table-driven class descriptor.

use crate::attributes::{
    AttrType, AttrValue, UiAttributes, format_bool, format_number, format_point, format_rect,
    parse_bool, parse_float, parse_int, parse_point, parse_rect,
};
use crate::catalog::ResourceCatalog;
use crate::tree::ViewNode;
use kurbo::Size;

/// One attribute a view class understands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttrSpec {
    pub name: &'static str,
    pub ty: AttrType,
    /// Value written into freshly created views.
    pub default: Option<&'static str>,
    /// Allowed values for [`AttrType::List`] attributes.
    pub values: &'static [&'static str],
    /// Inclusive range for numeric attributes; out-of-range values are clamped.
    pub range: Option<(f64, f64)>,
}

impl AttrSpec {
    pub const fn new(name: &'static str, ty: AttrType) -> Self {
        Self {
            name,
            ty,
            default: None,
            values: &[],
            range: None,
        }
    }

    /// A list attribute choosing among `values`.
    pub const fn list(name: &'static str, values: &'static [&'static str]) -> Self {
        Self {
            name,
            ty: AttrType::List,
            default: None,
            values,
            range: None,
        }
    }

    pub const fn with_default(self, default: &'static str) -> Self {
        Self {
            name: self.name,
            ty: self.ty,
            default: Some(default),
            values: self.values,
            range: self.range,
        }
    }

    pub const fn with_range(self, min: f64, max: f64) -> Self {
        Self {
            name: self.name,
            ty: self.ty,
            default: self.default,
            values: self.values,
            range: Some((min, max)),
        }
    }
}

/// Find the spec named `name` in a table.
pub fn find_spec<'a>(specs: &'a [AttrSpec], name: &str) -> Option<&'a AttrSpec> {
    specs.iter().find(|s| s.name == name)
}

/// The default values of a table as string attributes.
pub fn defaults_of(specs: &[AttrSpec]) -> UiAttributes {
    specs
        .iter()
        .filter_map(|s| s.default.map(|d| (s.name, d)))
        .collect()
}

/// Parse `text` according to `spec`. `None` when the text does not fit the
/// attribute's grammar or names a resource the catalog does not know.
pub fn parse_value(spec: &AttrSpec, text: &str, catalog: &ResourceCatalog) -> Option<AttrValue> {
    let clamp = |v: f64| match spec.range {
        Some((min, max)) => v.clamp(min, max),
        None => v,
    };
    match spec.ty {
        AttrType::Boolean => parse_bool(text).map(AttrValue::Bool),
        AttrType::Integer => parse_int(text).map(|v| {
            let v = match spec.range {
                Some((min, max)) => v.clamp(min as i64, max as i64),
                None => v,
            };
            AttrValue::Integer(v)
        }),
        AttrType::Float => parse_float(text).map(|v| AttrValue::Float(clamp(v))),
        AttrType::String => Some(AttrValue::String(text.to_string())),
        AttrType::Color => catalog.resolve_color(text).map(AttrValue::Color),
        AttrType::Font => catalog.resolve_font(text).map(AttrValue::Font),
        AttrType::Bitmap => Some(AttrValue::Bitmap(catalog.resolve_bitmap(text))),
        AttrType::Point => parse_point(text).map(AttrValue::Point),
        AttrType::Rect => parse_rect(text).map(AttrValue::Rect),
        AttrType::Tag => catalog.resolve_tag(text).map(AttrValue::Tag),
        AttrType::List => spec
            .values
            .contains(&text)
            .then(|| AttrValue::String(text.to_string())),
    }
}

/// Render a value back into the grammar [`parse_value`] accepts.
pub fn format_value(value: &AttrValue, catalog: &ResourceCatalog) -> String {
    match value {
        AttrValue::Bool(b) => format_bool(*b),
        AttrValue::Integer(i) => i.to_string(),
        AttrValue::Float(f) => format_number(*f),
        AttrValue::String(s) => s.clone(),
        AttrValue::Color(c) => catalog.color_string(c),
        AttrValue::Font(f) => catalog.font_string(f),
        AttrValue::Bitmap(b) => catalog.bitmap_string(b),
        AttrValue::Point(p) => format_point(*p),
        AttrValue::Rect(r) => format_rect(*r),
        AttrValue::Tag(t) => catalog.tag_string(t),
    }
}

/// Apply every attribute of `attrs` that appears in `specs`. Values that fail
/// to parse leave the node untouched.
pub fn apply_specs(
    specs: &[AttrSpec],
    node: &mut ViewNode,
    attrs: &UiAttributes,
    catalog: &ResourceCatalog,
) {
    for spec in specs {
        let Some(text) = attrs.get(spec.name) else {
            continue;
        };
        match parse_value(spec, text, catalog) {
            Some(value) => node.set_value(spec.name, value),
            None => log::trace!(
                "skipping {} attribute '{}' = {:?} on {}",
                spec.ty,
                spec.name,
                text,
                node.class()
            ),
        }
    }
}

/// Read an attribute from `specs`, falling back to its default when unset.
pub fn read_spec(
    specs: &[AttrSpec],
    node: &ViewNode,
    name: &str,
    catalog: &ResourceCatalog,
) -> Option<String> {
    let spec = find_spec(specs, name)?;
    match node.value(name) {
        Some(value) => Some(format_value(value, catalog)),
        None => spec.default.map(str::to_string),
    }
}

/// Candidate values for an attribute: list members, or catalog names for
/// resource-typed attributes.
pub fn possible_values_of(spec: &AttrSpec, catalog: &ResourceCatalog) -> Option<Vec<String>> {
    let names: Vec<String> = match spec.ty {
        AttrType::List => spec.values.iter().map(|v| v.to_string()).collect(),
        AttrType::Color => catalog.color_names().map(str::to_string).collect(),
        AttrType::Font => catalog.font_names().map(str::to_string).collect(),
        AttrType::Bitmap => catalog.bitmap_names().map(str::to_string).collect(),
        AttrType::Tag => catalog.tag_names().map(str::to_string).collect(),
        _ => return None,
    };
    Some(names)
}

/// Per-class behavior bundle: construction, attribute application, inspection
/// and read-back.
///
/// The registry walks a class's descriptor chain from the root class to the
/// leaf, so each descriptor only handles its own attributes.
pub trait ViewCreator: Send + Sync {
    fn class_name(&self) -> &'static str;

    /// Class this one extends. Only the root class returns `None`.
    fn base_class(&self) -> Option<&'static str>;

    fn display_name(&self) -> &'static str {
        self.class_name()
    }

    /// Whether views of this class may hold children. Inherited by subclasses.
    fn is_container(&self) -> bool {
        false
    }

    /// Attributes introduced by this class (not its bases).
    fn attributes(&self) -> &'static [AttrSpec];

    /// Construct an unconfigured node of this class.
    fn create(&self) -> ViewNode {
        ViewNode::new(self.class_name())
    }

    fn apply(&self, node: &mut ViewNode, attrs: &UiAttributes, catalog: &ResourceCatalog) {
        apply_specs(self.attributes(), node, attrs, catalog);
    }

    fn read(&self, node: &ViewNode, name: &str, catalog: &ResourceCatalog) -> Option<String> {
        read_spec(self.attributes(), node, name, catalog)
    }

    fn possible_values(&self, name: &str, catalog: &ResourceCatalog) -> Option<Vec<String>> {
        possible_values_of(find_spec(self.attributes(), name)?, catalog)
    }

    /// Natural size of `node` for size-to-fit, if the class has one.
    fn preferred_size(&self, _node: &ViewNode, _catalog: &ResourceCatalog) -> Option<Size> {
        None
    }
}

/// Computes a natural size for a node.
pub type PreferredSizeFn = fn(&ViewNode, &ResourceCatalog) -> Option<Size>;

/// A descriptor defined entirely by its attribute table.
#[derive(Debug, Clone, Copy)]
pub struct ClassDescriptor {
    pub name: &'static str,
    pub base: Option<&'static str>,
    pub display_name: &'static str,
    pub container: bool,
    pub attributes: &'static [AttrSpec],
    pub preferred_size: Option<PreferredSizeFn>,
}

impl ClassDescriptor {
    pub const fn new(name: &'static str, base: Option<&'static str>, attributes: &'static [AttrSpec]) -> Self {
        Self {
            name,
            base,
            display_name: name,
            container: false,
            attributes,
            preferred_size: None,
        }
    }
}

impl ViewCreator for ClassDescriptor {
    fn class_name(&self) -> &'static str {
        self.name
    }

    fn base_class(&self) -> Option<&'static str> {
        self.base
    }

    fn display_name(&self) -> &'static str {
        self.display_name
    }

    fn is_container(&self) -> bool {
        self.container
    }

    fn attributes(&self) -> &'static [AttrSpec] {
        self.attributes
    }

    fn preferred_size(&self, node: &ViewNode, catalog: &ResourceCatalog) -> Option<Size> {
        self.preferred_size.and_then(|f| f(node, catalog))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{ColorRef, Rgba};

    const SPECS: &[AttrSpec] = &[
        AttrSpec::new("opacity", AttrType::Float).with_default("1").with_range(0.0, 1.0),
        AttrSpec::new("color", AttrType::Color),
        AttrSpec::list("align", &["left", "center", "right"]).with_default("center"),
    ];

    #[test]
    fn test_parse_failures_are_skipped() {
        let catalog = ResourceCatalog::new();
        let mut node = ViewNode::new("View");
        apply_specs(SPECS, &mut node, &UiAttributes::new().with("color", "#ff0000ff"), &catalog);
        apply_specs(SPECS, &mut node, &UiAttributes::new().with("color", "nonexistent"), &catalog);
        assert_eq!(
            node.value("color"),
            Some(&AttrValue::Color(ColorRef::Literal(Rgba::new(255, 0, 0, 255))))
        );
    }

    #[test]
    fn test_range_clamps() {
        let catalog = ResourceCatalog::new();
        let mut node = ViewNode::new("View");
        apply_specs(SPECS, &mut node, &UiAttributes::new().with("opacity", "3"), &catalog);
        assert_eq!(read_spec(SPECS, &node, "opacity", &catalog).as_deref(), Some("1"));
    }

    #[test]
    fn test_list_rejects_unknown_members() {
        let catalog = ResourceCatalog::new();
        let mut node = ViewNode::new("View");
        apply_specs(SPECS, &mut node, &UiAttributes::new().with("align", "justify"), &catalog);
        assert_eq!(read_spec(SPECS, &node, "align", &catalog).as_deref(), Some("center"));
        assert_eq!(
            possible_values_of(&SPECS[2], &catalog),
            Some(vec!["left".to_string(), "center".to_string(), "right".to_string()])
        );
    }

    #[test]
    fn test_defaults_of() {
        let defaults = defaults_of(SPECS);
        assert_eq!(defaults.get("opacity"), Some("1"));
        assert!(!defaults.contains("color"));
    }
}
