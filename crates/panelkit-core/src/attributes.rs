//! Attribute values and the string grammar shared by the registry, the
//! resource catalog and the transfer codec.

use kurbo::{Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Name of the attribute carrying a view's class in documents.
pub const ATTR_CLASS: &str = "class";

/// The type of a registered attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttrType {
    Boolean,
    Integer,
    Float,
    String,
    Color,
    Font,
    Bitmap,
    Point,
    Rect,
    Tag,
    /// One of an enumerated set of strings.
    List,
}

impl AttrType {
    /// Lower-case type name as shown in inspectors.
    pub fn name(self) -> &'static str {
        match self {
            AttrType::Boolean => "boolean",
            AttrType::Integer => "integer",
            AttrType::Float => "float",
            AttrType::String => "string",
            AttrType::Color => "color",
            AttrType::Font => "font",
            AttrType::Bitmap => "bitmap",
            AttrType::Point => "point",
            AttrType::Rect => "rect",
            AttrType::Tag => "tag",
            AttrType::List => "list",
        }
    }
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An 8-bit RGBA color as it appears in `#rrggbbaa` literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` or `#rrggbbaa`. Six-digit literals are opaque.
    pub fn parse_hex(value: &str) -> Option<Self> {
        let hex = value.trim().strip_prefix('#')?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            6 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, 255)),
            8 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// Format as `#rrggbbaa`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

impl From<Color> for Rgba {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<Rgba> for Color {
    fn from(color: Rgba) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// A font description registered in the catalog or written literally as
/// `"<family>, <size>[, bold][, italic]"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontDesc {
    pub family: String,
    pub size: f64,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}

impl Default for FontDesc {
    fn default() -> Self {
        Self {
            family: "Arial".to_string(),
            size: 12.0,
            bold: false,
            italic: false,
        }
    }
}

impl FontDesc {
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
            bold: false,
            italic: false,
        }
    }

    /// Parse the literal font grammar.
    pub fn parse(value: &str) -> Option<Self> {
        let mut parts = value.split(',').map(str::trim);
        let family = parts.next().filter(|f| !f.is_empty())?;
        let size = parse_float(parts.next()?)?;
        if size <= 0.0 {
            return None;
        }
        let mut font = Self::new(family, size);
        for flag in parts {
            match flag {
                "bold" => font.bold = true,
                "italic" => font.italic = true,
                _ => return None,
            }
        }
        Some(font)
    }

    /// Render in the literal font grammar.
    pub fn to_literal(&self) -> String {
        let mut out = format!("{}, {}", self.family, format_number(self.size));
        if self.bold {
            out.push_str(", bold");
        }
        if self.italic {
            out.push_str(", italic");
        }
        out
    }
}

/// A bitmap resource: an image path plus optional nine-part tiling offsets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BitmapDesc {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nine_part: Option<Rect>,
}

impl BitmapDesc {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            nine_part: None,
        }
    }
}

/// A color attribute value: either a catalog name or a literal.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorRef {
    Named(String),
    Literal(Rgba),
}

/// A font attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum FontRef {
    Named(String),
    Literal(FontDesc),
}

/// A bitmap attribute value. Unregistered names fall back to a file path.
#[derive(Debug, Clone, PartialEq)]
pub enum BitmapRef {
    None,
    Named(String),
    Path(String),
}

/// A control-tag attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum TagRef {
    Named(String),
    Literal(i32),
}

/// The semantic value of an attribute held by a view node.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Color(ColorRef),
    Font(FontRef),
    Bitmap(BitmapRef),
    Point(Point),
    Rect(Rect),
    Tag(TagRef),
}

impl AttrValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Float(v) => Some(*v),
            AttrValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Named string attributes, as read from a document or a transfer stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UiAttributes(BTreeMap<String, String>);

impl UiAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn set_point(&mut self, name: impl Into<String>, point: Point) {
        self.set(name, format_point(point));
    }

    pub fn get_point(&self, name: &str) -> Option<Point> {
        self.get(name).and_then(parse_point)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(parse_bool)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for UiAttributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

pub fn format_bool(value: bool) -> String {
    if value { "true" } else { "false" }.to_string()
}

pub fn parse_int(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

pub fn parse_float(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Format a number without a trailing `.0` for whole values.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Parse `"<x>, <y>"`.
pub fn parse_point(value: &str) -> Option<Point> {
    let (x, y) = value.split_once(',')?;
    Some(Point::new(parse_float(x)?, parse_float(y)?))
}

pub fn format_point(point: Point) -> String {
    format!("{}, {}", format_number(point.x), format_number(point.y))
}

/// Parse `"<left>, <top>, <right>, <bottom>"`.
pub fn parse_rect(value: &str) -> Option<Rect> {
    let parts: Vec<f64> = value
        .split(',')
        .map(parse_float)
        .collect::<Option<Vec<_>>>()?;
    match parts.as_slice() {
        [l, t, r, b] => Some(Rect::new(*l, *t, *r, *b)),
        _ => None,
    }
}

pub fn format_rect(rect: Rect) -> String {
    format!(
        "{}, {}, {}, {}",
        format_number(rect.x0),
        format_number(rect.y0),
        format_number(rect.x1),
        format_number(rect.y1)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_grammar() {
        assert_eq!(parse_point("10, 20"), Some(Point::new(10.0, 20.0)));
        assert_eq!(parse_point(" -3 ,4.5"), Some(Point::new(-3.0, 4.5)));
        assert_eq!(parse_point("10"), None);
        assert_eq!(parse_point("a, b"), None);
        assert_eq!(format_point(Point::new(10.0, 20.0)), "10, 20");
        assert_eq!(format_point(Point::new(0.5, -0.0)), "0.5, 0");
    }

    #[test]
    fn test_rect_grammar() {
        let r = parse_rect("1, 2, 30, 40").unwrap();
        assert_eq!(r, Rect::new(1.0, 2.0, 30.0, 40.0));
        assert_eq!(format_rect(r), "1, 2, 30, 40");
        assert!(parse_rect("1, 2, 3").is_none());
    }

    #[test]
    fn test_color_hex() {
        assert_eq!(Rgba::parse_hex("#ff0000ff"), Some(Rgba::new(255, 0, 0, 255)));
        assert_eq!(Rgba::parse_hex("#00ff00"), Some(Rgba::new(0, 255, 0, 255)));
        assert_eq!(Rgba::parse_hex("ff0000ff"), None);
        assert_eq!(Rgba::parse_hex("#ff00"), None);
        assert_eq!(Rgba::parse_hex("#gg0000ff"), None);
        assert_eq!(Rgba::parse_hex("#+f0000ff"), None);
        assert_eq!(Rgba::parse_hex("#ff+f00"), None);
        assert_eq!(Rgba::new(1, 2, 3, 4).to_hex(), "#01020304");
    }

    #[test]
    fn test_font_literal() {
        let font = FontDesc::parse("Helvetica, 14, bold").unwrap();
        assert_eq!(font.family, "Helvetica");
        assert_eq!(font.size, 14.0);
        assert!(font.bold);
        assert!(!font.italic);
        assert_eq!(font.to_literal(), "Helvetica, 14, bold");
        assert!(FontDesc::parse("Helvetica").is_none());
        assert!(FontDesc::parse("Helvetica, 12, wide").is_none());
    }

    #[test]
    fn test_bool_grammar() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool("yes"), None);
        assert_eq!(format_bool(true), "true");
    }

    #[test]
    fn test_ui_attributes() {
        let mut attrs = UiAttributes::new().with("title", "OK");
        attrs.set_point("origin", Point::new(5.0, 5.0));
        assert_eq!(attrs.get("origin"), Some("5, 5"));
        assert_eq!(attrs.get_point("origin"), Some(Point::new(5.0, 5.0)));
        assert_eq!(attrs.len(), 2);
        let names: Vec<_> = attrs.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["origin", "title"]);
    }
}
