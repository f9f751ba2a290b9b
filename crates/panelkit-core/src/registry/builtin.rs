//! Built-in view classes beyond `View`.

use super::descriptor::{AttrSpec, ClassDescriptor};
use super::view::VIEW_CLASS;
use crate::attributes::{AttrType, AttrValue, BitmapRef, FontDesc};
use crate::catalog::ResourceCatalog;
use crate::tree::ViewNode;
use kurbo::Size;

pub const CONTAINER_CLASS: &str = "ViewContainer";
pub const CONTROL_CLASS: &str = "Control";
pub const PARAM_DISPLAY_CLASS: &str = "ParamDisplay";
pub const TEXT_LABEL_CLASS: &str = "TextLabel";
pub const TEXT_BUTTON_CLASS: &str = "TextButton";
pub const CHECK_BOX_CLASS: &str = "CheckBox";
pub const KNOB_CLASS: &str = "Knob";

const DEFAULT_FONT: &str = "Arial, 12";

const CONTAINER_ATTRIBUTES: &[AttrSpec] = &[
    AttrSpec::new("background-color", AttrType::Color).with_default("#00000000"),
    AttrSpec::list(
        "background-color-draw-style",
        &["stroked", "filled", "filled and stroked"],
    )
    .with_default("filled and stroked"),
];

const CONTROL_ATTRIBUTES: &[AttrSpec] = &[
    AttrSpec::new("control-tag", AttrType::Tag),
    AttrSpec::new("default-value", AttrType::Float).with_default("0.5"),
    AttrSpec::new("min-value", AttrType::Float).with_default("0"),
    AttrSpec::new("max-value", AttrType::Float).with_default("1"),
    AttrSpec::new("wheel-inc-value", AttrType::Float).with_default("0.1"),
];

const PARAM_DISPLAY_ATTRIBUTES: &[AttrSpec] = &[
    AttrSpec::new("font", AttrType::Font).with_default(DEFAULT_FONT),
    AttrSpec::new("font-color", AttrType::Color).with_default("#ffffffff"),
    AttrSpec::new("back-color", AttrType::Color).with_default("#000000ff"),
    AttrSpec::new("frame-color", AttrType::Color).with_default("#000000ff"),
    AttrSpec::list("text-alignment", &["left", "center", "right"]).with_default("center"),
    AttrSpec::new("round-rect-radius", AttrType::Float)
        .with_default("6")
        .with_range(0.0, 1000.0),
];

const TEXT_LABEL_ATTRIBUTES: &[AttrSpec] =
    &[AttrSpec::new("title", AttrType::String).with_default("")];

const TEXT_BUTTON_ATTRIBUTES: &[AttrSpec] = &[
    AttrSpec::new("title", AttrType::String).with_default(""),
    AttrSpec::new("font", AttrType::Font).with_default(DEFAULT_FONT),
    AttrSpec::new("text-color", AttrType::Color).with_default("#000000ff"),
    AttrSpec::new("frame-color", AttrType::Color).with_default("#000000ff"),
    AttrSpec::new("gradient-pressed-color", AttrType::Color).with_default("#c8c8c8ff"),
    AttrSpec::list("kind", &["push", "on-off"]).with_default("push"),
    AttrSpec::new("round-radius", AttrType::Float)
        .with_default("6")
        .with_range(0.0, 1000.0),
    AttrSpec::new("frame-width", AttrType::Float)
        .with_default("1")
        .with_range(0.0, 100.0),
];

const CHECK_BOX_ATTRIBUTES: &[AttrSpec] = &[
    AttrSpec::new("title", AttrType::String).with_default(""),
    AttrSpec::new("font", AttrType::Font).with_default(DEFAULT_FONT),
    AttrSpec::new("font-color", AttrType::Color).with_default("#ffffffff"),
    AttrSpec::new("boxframe-color", AttrType::Color).with_default("#000000ff"),
    AttrSpec::new("boxfill-color", AttrType::Color).with_default("#ffffffff"),
    AttrSpec::new("checkmark-color", AttrType::Color).with_default("#000000ff"),
    AttrSpec::new("draw-crossbox", AttrType::Boolean).with_default("false"),
];

const KNOB_ATTRIBUTES: &[AttrSpec] = &[
    AttrSpec::new("handle-color", AttrType::Color).with_default("#ffffffff"),
    AttrSpec::new("shadow-handle-color", AttrType::Color).with_default("#000000ff"),
    AttrSpec::new("handle-line-width", AttrType::Float)
        .with_default("1")
        .with_range(0.0, 100.0),
    AttrSpec::new("angle-start", AttrType::Float).with_default("135"),
    AttrSpec::new("angle-range", AttrType::Float).with_default("270"),
    AttrSpec::new("zoom-factor", AttrType::Float).with_default("1.5"),
    AttrSpec::new("handle-bitmap", AttrType::Bitmap).with_default(""),
];

/// Horizontal padding added around a text run.
const TEXT_PADDING: f64 = 8.0;
/// Side length of a check box's box, in units of the font size.
const CHECK_BOX_SCALE: f64 = 1.2;

fn node_font(node: &ViewNode, catalog: &ResourceCatalog) -> FontDesc {
    match node.value("font") {
        Some(AttrValue::Font(font)) => catalog.font_of(font).unwrap_or_default(),
        _ => FontDesc::default(),
    }
}

/// Rough text extent; real metrics belong to the drawing backend.
fn text_extent(text: &str, font: &FontDesc) -> Size {
    let advance = font.size * if font.bold { 0.65 } else { 0.6 };
    Size::new(text.chars().count() as f64 * advance, font.size * 1.25)
}

fn titled_size(node: &ViewNode, catalog: &ResourceCatalog) -> Option<Size> {
    let title = node.string_value("title")?;
    let extent = text_extent(title, &node_font(node, catalog));
    Some(Size::new(
        (extent.width + 2.0 * TEXT_PADDING).ceil(),
        (extent.height + TEXT_PADDING).ceil(),
    ))
}

fn check_box_size(node: &ViewNode, catalog: &ResourceCatalog) -> Option<Size> {
    let font = node_font(node, catalog);
    let title = node.string_value("title").unwrap_or_default();
    let extent = text_extent(title, &font);
    let box_side = font.size * CHECK_BOX_SCALE;
    Some(Size::new(
        (box_side + TEXT_PADDING + extent.width).ceil(),
        box_side.max(extent.height).ceil(),
    ))
}

fn knob_size(node: &ViewNode, catalog: &ResourceCatalog) -> Option<Size> {
    let Some(AttrValue::Bitmap(BitmapRef::Named(name))) = node.value("handle-bitmap") else {
        return None;
    };
    let desc = catalog.lookup_bitmap(name)?;
    desc.nine_part.map(|r| r.size())
}

pub const CONTAINER: ClassDescriptor = ClassDescriptor {
    name: CONTAINER_CLASS,
    base: Some(VIEW_CLASS),
    display_name: "View Container",
    container: true,
    attributes: CONTAINER_ATTRIBUTES,
    preferred_size: None,
};

pub const CONTROL: ClassDescriptor = ClassDescriptor {
    display_name: "Control",
    ..ClassDescriptor::new(CONTROL_CLASS, Some(VIEW_CLASS), CONTROL_ATTRIBUTES)
};

pub const PARAM_DISPLAY: ClassDescriptor = ClassDescriptor {
    display_name: "Parameter Display",
    ..ClassDescriptor::new(PARAM_DISPLAY_CLASS, Some(CONTROL_CLASS), PARAM_DISPLAY_ATTRIBUTES)
};

pub const TEXT_LABEL: ClassDescriptor = ClassDescriptor {
    display_name: "Text Label",
    preferred_size: Some(titled_size),
    ..ClassDescriptor::new(TEXT_LABEL_CLASS, Some(PARAM_DISPLAY_CLASS), TEXT_LABEL_ATTRIBUTES)
};

pub const TEXT_BUTTON: ClassDescriptor = ClassDescriptor {
    display_name: "Text Button",
    preferred_size: Some(titled_size),
    ..ClassDescriptor::new(TEXT_BUTTON_CLASS, Some(CONTROL_CLASS), TEXT_BUTTON_ATTRIBUTES)
};

pub const CHECK_BOX: ClassDescriptor = ClassDescriptor {
    display_name: "Check Box",
    preferred_size: Some(check_box_size),
    ..ClassDescriptor::new(CHECK_BOX_CLASS, Some(CONTROL_CLASS), CHECK_BOX_ATTRIBUTES)
};

pub const KNOB: ClassDescriptor = ClassDescriptor {
    display_name: "Knob",
    preferred_size: Some(knob_size),
    ..ClassDescriptor::new(KNOB_CLASS, Some(CONTROL_CLASS), KNOB_ATTRIBUTES)
};

/// All table-driven built-ins, bases before subclasses.
pub const BUILTIN_CLASSES: &[ClassDescriptor] = &[
    CONTAINER,
    CONTROL,
    PARAM_DISPLAY,
    TEXT_LABEL,
    TEXT_BUTTON,
    CHECK_BOX,
    KNOB,
];
