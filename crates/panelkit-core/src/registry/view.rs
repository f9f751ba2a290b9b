//! The root `View` class. Its `origin` and `size` attributes live in the
//! node frame rather than the attribute map.

use super::descriptor::{AttrSpec, ViewCreator, apply_specs, read_spec};
use crate::attributes::{AttrType, AttrValue, UiAttributes, format_point, parse_point};
use crate::catalog::ResourceCatalog;
use crate::tree::ViewNode;
use kurbo::{Point, Rect};

pub const VIEW_CLASS: &str = "View";

/// Words accepted by the `autosize` attribute, in canonical order.
pub const AUTOSIZE_WORDS: &[&str] = &["left", "top", "right", "bottom", "row", "column"];

const ATTRIBUTES: &[AttrSpec] = &[
    AttrSpec::new("origin", AttrType::Point).with_default("0, 0"),
    AttrSpec::new("size", AttrType::Point).with_default("50, 50"),
    AttrSpec::new("opacity", AttrType::Float)
        .with_default("1")
        .with_range(0.0, 1.0),
    AttrSpec::new("transparent", AttrType::Boolean).with_default("false"),
    AttrSpec::new("mouse-enabled", AttrType::Boolean).with_default("true"),
    AttrSpec::new("wants-focus", AttrType::Boolean).with_default("false"),
    AttrSpec::new("bitmap", AttrType::Bitmap).with_default(""),
    AttrSpec::new("disabled-bitmap", AttrType::Bitmap).with_default(""),
    AttrSpec::new("autosize", AttrType::String).with_default(""),
    AttrSpec::new("tooltip", AttrType::String).with_default(""),
    AttrSpec::new("custom-view-name", AttrType::String).with_default(""),
    AttrSpec::new("sub-controller", AttrType::String).with_default(""),
];

/// Normalize an autosize flag list. `None` if any word is unknown.
pub fn parse_autosize(value: &str) -> Option<String> {
    let mut present = [false; 6];
    for word in value.split(|c: char| c.is_whitespace() || c == ',').filter(|w| !w.is_empty()) {
        let index = AUTOSIZE_WORDS.iter().position(|w| *w == word)?;
        present[index] = true;
    }
    let words: Vec<&str> = AUTOSIZE_WORDS
        .iter()
        .zip(present)
        .filter_map(|(w, on)| on.then_some(*w))
        .collect();
    Some(words.join(" "))
}

#[derive(Debug, Default)]
pub struct ViewClass;

impl ViewCreator for ViewClass {
    fn class_name(&self) -> &'static str {
        VIEW_CLASS
    }

    fn base_class(&self) -> Option<&'static str> {
        None
    }

    fn attributes(&self) -> &'static [AttrSpec] {
        ATTRIBUTES
    }

    fn apply(&self, node: &mut ViewNode, attrs: &UiAttributes, catalog: &ResourceCatalog) {
        if let Some(origin) = attrs.get("origin").and_then(parse_point) {
            node.frame = Rect::from_origin_size(origin, node.frame.size());
        }
        if let Some(size) = attrs.get("size").and_then(parse_point) {
            if size.x >= 0.0 && size.y >= 0.0 {
                node.frame = Rect::from_origin_size(node.frame.origin(), (size.x, size.y));
            }
        }
        if let Some(flags) = attrs.get("autosize").and_then(parse_autosize) {
            node.set_value("autosize", AttrValue::String(flags));
        }
        let rest: Vec<AttrSpec> = ATTRIBUTES
            .iter()
            .filter(|s| !matches!(s.name, "origin" | "size" | "autosize"))
            .copied()
            .collect();
        apply_specs(&rest, node, attrs, catalog);
    }

    fn read(&self, node: &ViewNode, name: &str, catalog: &ResourceCatalog) -> Option<String> {
        match name {
            "origin" => Some(format_point(node.frame.origin())),
            "size" => Some(format_point(Point::new(
                node.frame.width(),
                node.frame.height(),
            ))),
            _ => read_spec(ATTRIBUTES, node, name, catalog),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_and_size_drive_the_frame() {
        let catalog = ResourceCatalog::new();
        let mut node = ViewNode::new(VIEW_CLASS);
        let attrs = UiAttributes::new().with("origin", "10, 20").with("size", "30, 40");
        ViewClass.apply(&mut node, &attrs, &catalog);
        assert_eq!(node.frame, Rect::new(10.0, 20.0, 40.0, 60.0));
        assert_eq!(ViewClass.read(&node, "origin", &catalog).as_deref(), Some("10, 20"));
        assert_eq!(ViewClass.read(&node, "size", &catalog).as_deref(), Some("30, 40"));
    }

    #[test]
    fn test_negative_size_is_skipped() {
        let catalog = ResourceCatalog::new();
        let mut node = ViewNode::new(VIEW_CLASS);
        ViewClass.apply(&mut node, &UiAttributes::new().with("size", "-5, 10"), &catalog);
        assert_eq!(node.frame.width(), 50.0);
    }

    #[test]
    fn test_autosize_normalized() {
        assert_eq!(parse_autosize("bottom left").as_deref(), Some("left bottom"));
        assert_eq!(parse_autosize("right, top").as_deref(), Some("top right"));
        assert_eq!(parse_autosize("").as_deref(), Some(""));
        assert_eq!(parse_autosize("sideways"), None);
    }
}
