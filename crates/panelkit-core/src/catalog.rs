//! Named resources shared across a view tree: colors, fonts, bitmaps,
//! control tags and reusable view templates.
//!
//! Views hold resource *names*; the catalog owns the values. Reverse lookup
//! (value to name) is used when rendering a literal value back to a string.

use crate::attributes::{BitmapDesc, BitmapRef, ColorRef, FontDesc, FontRef, Rgba, TagRef, AttrValue};
use crate::registry::ViewRegistry;
use crate::transfer::{self, TransferPayload};
use crate::tree::ViewTree;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Resource kinds that views can reference by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Color,
    Font,
    Bitmap,
    Tag,
}

/// A resource value of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceValue {
    Color(Rgba),
    Font(FontDesc),
    Bitmap(BitmapDesc),
    Tag(i32),
}

impl ResourceValue {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceValue::Color(_) => ResourceKind::Color,
            ResourceValue::Font(_) => ResourceKind::Font,
            ResourceValue::Bitmap(_) => ResourceKind::Bitmap,
            ResourceValue::Tag(_) => ResourceKind::Tag,
        }
    }
}

/// Catalog of named resources.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceCatalog {
    #[serde(default)]
    colors: BTreeMap<String, Rgba>,
    #[serde(default)]
    fonts: BTreeMap<String, FontDesc>,
    #[serde(default)]
    bitmaps: BTreeMap<String, BitmapDesc>,
    #[serde(default)]
    tags: BTreeMap<String, i32>,
    #[serde(default, with = "template_bytes")]
    templates: BTreeMap<String, Vec<u8>>,
    #[serde(skip)]
    color_index: HashMap<Rgba, String>,
    #[serde(skip)]
    tag_index: HashMap<i32, String>,
}

impl ResourceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the reverse indices. The alphabetically first name wins for shared values.
    pub fn rebuild_indices(&mut self) {
        self.color_index.clear();
        for (name, color) in &self.colors {
            self.color_index.entry(*color).or_insert_with(|| name.clone());
        }
        self.tag_index.clear();
        for (name, tag) in &self.tags {
            self.tag_index.entry(*tag).or_insert_with(|| name.clone());
        }
    }

    // --- colors ---

    /// Define or replace a color. Returns the previous value.
    pub fn define_color(&mut self, name: impl Into<String>, color: Rgba) -> Option<Rgba> {
        let previous = self.colors.insert(name.into(), color);
        self.rebuild_indices();
        previous
    }

    pub fn remove_color(&mut self, name: &str) -> Option<Rgba> {
        let removed = self.colors.remove(name);
        if removed.is_some() {
            self.rebuild_indices();
        }
        removed
    }

    pub fn lookup_color(&self, name: &str) -> Option<Rgba> {
        self.colors.get(name).copied()
    }

    pub fn name_of_color(&self, color: Rgba) -> Option<&str> {
        self.color_index.get(&color).map(String::as_str)
    }

    pub fn color_names(&self) -> impl Iterator<Item = &str> {
        self.colors.keys().map(String::as_str)
    }

    // --- fonts ---

    pub fn define_font(&mut self, name: impl Into<String>, font: FontDesc) -> Option<FontDesc> {
        self.fonts.insert(name.into(), font)
    }

    pub fn remove_font(&mut self, name: &str) -> Option<FontDesc> {
        self.fonts.remove(name)
    }

    pub fn lookup_font(&self, name: &str) -> Option<&FontDesc> {
        self.fonts.get(name)
    }

    pub fn name_of_font(&self, font: &FontDesc) -> Option<&str> {
        self.fonts
            .iter()
            .find(|(_, f)| *f == font)
            .map(|(name, _)| name.as_str())
    }

    pub fn font_names(&self) -> impl Iterator<Item = &str> {
        self.fonts.keys().map(String::as_str)
    }

    // --- bitmaps ---

    pub fn define_bitmap(&mut self, name: impl Into<String>, bitmap: BitmapDesc) -> Option<BitmapDesc> {
        self.bitmaps.insert(name.into(), bitmap)
    }

    pub fn remove_bitmap(&mut self, name: &str) -> Option<BitmapDesc> {
        self.bitmaps.remove(name)
    }

    pub fn lookup_bitmap(&self, name: &str) -> Option<&BitmapDesc> {
        self.bitmaps.get(name)
    }

    /// Name of the bitmap registered for `path`.
    pub fn name_of_bitmap(&self, path: &str) -> Option<&str> {
        self.bitmaps
            .iter()
            .find(|(_, b)| b.path == path)
            .map(|(name, _)| name.as_str())
    }

    pub fn bitmap_names(&self) -> impl Iterator<Item = &str> {
        self.bitmaps.keys().map(String::as_str)
    }

    // --- control tags ---

    pub fn define_tag(&mut self, name: impl Into<String>, tag: i32) -> Option<i32> {
        let previous = self.tags.insert(name.into(), tag);
        self.rebuild_indices();
        previous
    }

    pub fn remove_tag(&mut self, name: &str) -> Option<i32> {
        let removed = self.tags.remove(name);
        if removed.is_some() {
            self.rebuild_indices();
        }
        removed
    }

    pub fn lookup_tag(&self, name: &str) -> Option<i32> {
        self.tags.get(name).copied()
    }

    pub fn name_of_tag(&self, tag: i32) -> Option<&str> {
        self.tag_index.get(&tag).map(String::as_str)
    }

    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }

    // --- generic access ---

    pub fn contains(&self, kind: ResourceKind, name: &str) -> bool {
        match kind {
            ResourceKind::Color => self.colors.contains_key(name),
            ResourceKind::Font => self.fonts.contains_key(name),
            ResourceKind::Bitmap => self.bitmaps.contains_key(name),
            ResourceKind::Tag => self.tags.contains_key(name),
        }
    }

    pub fn resource(&self, kind: ResourceKind, name: &str) -> Option<ResourceValue> {
        match kind {
            ResourceKind::Color => self.lookup_color(name).map(ResourceValue::Color),
            ResourceKind::Font => self.lookup_font(name).cloned().map(ResourceValue::Font),
            ResourceKind::Bitmap => self.lookup_bitmap(name).cloned().map(ResourceValue::Bitmap),
            ResourceKind::Tag => self.lookup_tag(name).map(ResourceValue::Tag),
        }
    }

    /// Define (`Some`) or remove (`None`) a resource. Returns the previous value.
    pub fn set_resource(
        &mut self,
        kind: ResourceKind,
        name: &str,
        value: Option<ResourceValue>,
    ) -> Option<ResourceValue> {
        let previous = self.resource(kind, name);
        match value {
            Some(ResourceValue::Color(c)) => {
                self.define_color(name, c);
            }
            Some(ResourceValue::Font(f)) => {
                self.define_font(name, f);
            }
            Some(ResourceValue::Bitmap(b)) => {
                self.define_bitmap(name, b);
            }
            Some(ResourceValue::Tag(t)) => {
                self.define_tag(name, t);
            }
            None => match kind {
                ResourceKind::Color => {
                    self.remove_color(name);
                }
                ResourceKind::Font => {
                    self.remove_font(name);
                }
                ResourceKind::Bitmap => {
                    self.remove_bitmap(name);
                }
                ResourceKind::Tag => {
                    self.remove_tag(name);
                }
            },
        }
        previous
    }

    /// Rename a resource and rewrite every view attribute naming it.
    ///
    /// Returns the number of attributes rewritten, or `None` when `old` does
    /// not exist or `new` is already taken.
    pub fn rename(
        &mut self,
        kind: ResourceKind,
        old: &str,
        new: &str,
        tree: &mut ViewTree,
    ) -> Option<usize> {
        if old == new || !self.contains(kind, old) || self.contains(kind, new) {
            return None;
        }
        match kind {
            ResourceKind::Color => move_entry(&mut self.colors, old, new),
            ResourceKind::Font => move_entry(&mut self.fonts, old, new),
            ResourceKind::Bitmap => move_entry(&mut self.bitmaps, old, new),
            ResourceKind::Tag => move_entry(&mut self.tags, old, new),
        }
        self.rebuild_indices();
        let rewritten = rewrite_references(tree, kind, old, new);
        log::debug!("renamed {:?} '{}' to '{}' ({} references)", kind, old, new, rewritten);
        Some(rewritten)
    }

    pub fn rename_color(&mut self, old: &str, new: &str, tree: &mut ViewTree) -> Option<usize> {
        self.rename(ResourceKind::Color, old, new, tree)
    }

    pub fn rename_font(&mut self, old: &str, new: &str, tree: &mut ViewTree) -> Option<usize> {
        self.rename(ResourceKind::Font, old, new, tree)
    }

    pub fn rename_bitmap(&mut self, old: &str, new: &str, tree: &mut ViewTree) -> Option<usize> {
        self.rename(ResourceKind::Bitmap, old, new, tree)
    }

    pub fn rename_tag(&mut self, old: &str, new: &str, tree: &mut ViewTree) -> Option<usize> {
        self.rename(ResourceKind::Tag, old, new, tree)
    }

    // --- templates ---

    /// Store a serialized subtree (a transfer stream) under `name`.
    pub fn define_template(&mut self, name: impl Into<String>, bytes: Vec<u8>) -> Option<Vec<u8>> {
        self.templates.insert(name.into(), bytes)
    }

    pub fn remove_template(&mut self, name: &str) -> Option<Vec<u8>> {
        self.templates.remove(name)
    }

    pub fn template(&self, name: &str) -> Option<&[u8]> {
        self.templates.get(name).map(Vec::as_slice)
    }

    pub fn template_names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Build fresh views from a stored template.
    pub fn instantiate_template(&self, name: &str, registry: &ViewRegistry) -> Option<TransferPayload> {
        let bytes = self.template(name)?;
        match transfer::deserialize(bytes, registry, self) {
            Ok(payload) if !payload.views.is_empty() => Some(payload),
            Ok(_) => None,
            Err(e) => {
                log::warn!("template '{}' is corrupt: {}", name, e);
                None
            }
        }
    }

    // --- attribute string resolution ---

    /// Resolve a color attribute string: `""` is transparent, then names, then hex literals.
    pub fn resolve_color(&self, value: &str) -> Option<ColorRef> {
        if value.is_empty() {
            return Some(ColorRef::Literal(Rgba::TRANSPARENT));
        }
        if self.colors.contains_key(value) {
            return Some(ColorRef::Named(value.to_string()));
        }
        Rgba::parse_hex(value).map(ColorRef::Literal)
    }

    pub fn color_of(&self, color: &ColorRef) -> Option<Rgba> {
        match color {
            ColorRef::Named(name) => self.lookup_color(name),
            ColorRef::Literal(c) => Some(*c),
        }
    }

    pub fn color_string(&self, color: &ColorRef) -> String {
        match color {
            ColorRef::Named(name) => name.clone(),
            ColorRef::Literal(c) => self
                .name_of_color(*c)
                .map(str::to_string)
                .unwrap_or_else(|| c.to_hex()),
        }
    }

    pub fn resolve_font(&self, value: &str) -> Option<FontRef> {
        if self.fonts.contains_key(value) {
            return Some(FontRef::Named(value.to_string()));
        }
        FontDesc::parse(value).map(FontRef::Literal)
    }

    pub fn font_of(&self, font: &FontRef) -> Option<FontDesc> {
        match font {
            FontRef::Named(name) => self.lookup_font(name).cloned(),
            FontRef::Literal(f) => Some(f.clone()),
        }
    }

    pub fn font_string(&self, font: &FontRef) -> String {
        match font {
            FontRef::Named(name) => name.clone(),
            FontRef::Literal(f) => self
                .name_of_font(f)
                .map(str::to_string)
                .unwrap_or_else(|| f.to_literal()),
        }
    }

    /// Resolve a bitmap attribute string. Unknown names are kept as file paths.
    pub fn resolve_bitmap(&self, value: &str) -> BitmapRef {
        if value.is_empty() {
            BitmapRef::None
        } else if self.bitmaps.contains_key(value) {
            BitmapRef::Named(value.to_string())
        } else {
            BitmapRef::Path(value.to_string())
        }
    }

    pub fn bitmap_string(&self, bitmap: &BitmapRef) -> String {
        match bitmap {
            BitmapRef::None => String::new(),
            BitmapRef::Named(name) => name.clone(),
            BitmapRef::Path(path) => self
                .name_of_bitmap(path)
                .map(str::to_string)
                .unwrap_or_else(|| path.clone()),
        }
    }

    pub fn resolve_tag(&self, value: &str) -> Option<TagRef> {
        if self.tags.contains_key(value) {
            return Some(TagRef::Named(value.to_string()));
        }
        value.trim().parse::<i32>().ok().map(TagRef::Literal)
    }

    pub fn tag_of(&self, tag: &TagRef) -> Option<i32> {
        match tag {
            TagRef::Named(name) => self.lookup_tag(name),
            TagRef::Literal(t) => Some(*t),
        }
    }

    pub fn tag_string(&self, tag: &TagRef) -> String {
        match tag {
            TagRef::Named(name) => name.clone(),
            TagRef::Literal(t) => self
                .name_of_tag(*t)
                .map(str::to_string)
                .unwrap_or_else(|| t.to_string()),
        }
    }
}

fn move_entry<V>(map: &mut BTreeMap<String, V>, old: &str, new: &str) {
    if let Some(value) = map.remove(old) {
        map.insert(new.to_string(), value);
    }
}

fn rewrite_references(tree: &mut ViewTree, kind: ResourceKind, old: &str, new: &str) -> usize {
    let mut count = 0;
    for node in tree.iter_mut() {
        for (_, value) in node.values_mut() {
            // A path literal equal to the old name was applied before the name existed.
            if let (ResourceKind::Bitmap, AttrValue::Bitmap(bitmap)) = (kind, &mut *value) {
                if matches!(&*bitmap, BitmapRef::Path(path) if path == old) {
                    *bitmap = BitmapRef::Named(new.to_string());
                    count += 1;
                    continue;
                }
            }
            let name = match (kind, value) {
                (ResourceKind::Color, AttrValue::Color(ColorRef::Named(n)))
                | (ResourceKind::Font, AttrValue::Font(FontRef::Named(n)))
                | (ResourceKind::Bitmap, AttrValue::Bitmap(BitmapRef::Named(n)))
                | (ResourceKind::Tag, AttrValue::Tag(TagRef::Named(n))) => n,
                _ => continue,
            };
            if name == old {
                *name = new.to_string();
                count += 1;
            }
        }
    }
    count
}

mod template_bytes {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(map: &BTreeMap<String, Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
        let encoded: BTreeMap<&str, String> = map
            .iter()
            .map(|(k, v)| (k.as_str(), STANDARD.encode(v)))
            .collect();
        encoded.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeMap<String, Vec<u8>>, D::Error> {
        let encoded = BTreeMap::<String, String>::deserialize(d)?;
        encoded
            .into_iter()
            .map(|(k, v)| {
                STANDARD
                    .decode(v)
                    .map(|bytes| (k, bytes))
                    .map_err(serde::de::Error::custom)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{DetachedSubtree, ViewNode};

    fn tree_with_color(name: &str) -> ViewTree {
        let mut root = ViewNode::new("ViewContainer");
        root.set_value("background-color", AttrValue::Color(ColorRef::Named(name.to_string())));
        let mut tree = ViewTree::new(DetachedSubtree::new(root));
        let mut child = ViewNode::new("View");
        child.set_value("font-color", AttrValue::Color(ColorRef::Named(name.to_string())));
        child.set_value("back-color", AttrValue::Color(ColorRef::Named("other".to_string())));
        tree.attach(tree.root(), DetachedSubtree::new(child), None).unwrap();
        tree
    }

    #[test]
    fn test_reverse_lookup() {
        let mut catalog = ResourceCatalog::new();
        catalog.define_color("red", Rgba::new(255, 0, 0, 255));
        catalog.define_tag("gain", 7);
        assert_eq!(catalog.name_of_color(Rgba::new(255, 0, 0, 255)), Some("red"));
        assert_eq!(catalog.name_of_color(Rgba::WHITE), None);
        assert_eq!(catalog.name_of_tag(7), Some("gain"));
        catalog.remove_tag("gain");
        assert_eq!(catalog.name_of_tag(7), None);
    }

    #[test]
    fn test_color_string_falls_back_to_hex() {
        let catalog = ResourceCatalog::new();
        let color = catalog.resolve_color("#102030ff").unwrap();
        assert_eq!(catalog.color_string(&color), "#102030ff");
        assert!(catalog.resolve_color("nonexistent").is_none());
        assert_eq!(catalog.resolve_color(""), Some(ColorRef::Literal(Rgba::TRANSPARENT)));
    }

    #[test]
    fn test_rename_cascades_through_tree() {
        let mut catalog = ResourceCatalog::new();
        catalog.define_color("accent", Rgba::new(1, 2, 3, 255));
        let mut tree = tree_with_color("accent");

        assert_eq!(catalog.rename_color("accent", "highlight", &mut tree), Some(2));
        assert!(catalog.lookup_color("accent").is_none());
        assert_eq!(catalog.lookup_color("highlight"), Some(Rgba::new(1, 2, 3, 255)));

        let root = tree.get(tree.root()).unwrap();
        assert_eq!(
            root.value("background-color"),
            Some(&AttrValue::Color(ColorRef::Named("highlight".to_string())))
        );
    }

    #[test]
    fn test_rename_bitmap_rewrites_path_references() {
        let mut catalog = ResourceCatalog::new();
        let mut root = ViewNode::new("ViewContainer");
        root.set_value("background", AttrValue::Bitmap(BitmapRef::Path("knob".to_string())));
        let mut tree = ViewTree::new(DetachedSubtree::new(root));
        let mut child = ViewNode::new("View");
        child.set_value("background", AttrValue::Bitmap(BitmapRef::Path("other".to_string())));
        tree.attach(tree.root(), DetachedSubtree::new(child), None).unwrap();

        catalog.define_bitmap(
            "knob",
            BitmapDesc {
                path: "knob.png".to_string(),
                nine_part: None,
            },
        );
        assert_eq!(catalog.rename_bitmap("knob", "dial", &mut tree), Some(1));

        let root = tree.get(tree.root()).unwrap();
        assert_eq!(
            root.value("background"),
            Some(&AttrValue::Bitmap(BitmapRef::Named("dial".to_string())))
        );
        let child = tree.get(root.children()[0]).unwrap();
        assert_eq!(
            child.value("background"),
            Some(&AttrValue::Bitmap(BitmapRef::Path("other".to_string())))
        );
    }

    #[test]
    fn test_rename_rejects_existing_target() {
        let mut catalog = ResourceCatalog::new();
        catalog.define_color("a", Rgba::BLACK);
        catalog.define_color("b", Rgba::WHITE);
        let mut tree = tree_with_color("a");
        assert_eq!(catalog.rename_color("a", "b", &mut tree), None);
        assert_eq!(catalog.rename_color("missing", "c", &mut tree), None);
    }

    #[test]
    fn test_tag_resolution() {
        let mut catalog = ResourceCatalog::new();
        catalog.define_tag("volume", 3);
        assert_eq!(catalog.resolve_tag("volume"), Some(TagRef::Named("volume".into())));
        assert_eq!(catalog.resolve_tag("42"), Some(TagRef::Literal(42)));
        assert_eq!(catalog.resolve_tag("nope"), None);
        assert_eq!(catalog.tag_string(&TagRef::Literal(3)), "volume");
    }

    #[test]
    fn test_serde_round_trip_keeps_templates() {
        let mut catalog = ResourceCatalog::new();
        catalog.define_color("red", Rgba::new(255, 0, 0, 255));
        catalog.define_template("strip", vec![1, 2, 3, 250]);
        let json = serde_json::to_string(&catalog).unwrap();
        let mut loaded: ResourceCatalog = serde_json::from_str(&json).unwrap();
        loaded.rebuild_indices();
        assert_eq!(loaded.template("strip"), Some(&[1u8, 2, 3, 250][..]));
        assert_eq!(loaded.name_of_color(Rgba::new(255, 0, 0, 255)), Some("red"));
    }
}
