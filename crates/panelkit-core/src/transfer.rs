//! Byte-stream transfer of view subtrees for copy/paste and drag-and-drop.
//!
//! Stream layout (little-endian, strings are a u32 byte length followed by UTF-8):
//!
//! ```text
//! "PKVS" u32 version u32 count
//! node*count  where node = "NODE" str class u32 n (str name, str value)*n u32 m node*m "ENDN"
//! "FOOT" f64 grab_x f64 grab_y
//! ```
//!
//! Top-level node origins are stored relative to the top-left of the
//! selection bounds, so a payload can be placed anywhere.

use crate::attributes::{UiAttributes, format_point};
use crate::catalog::ResourceCatalog;
use crate::registry::ViewRegistry;
use crate::selection::Selection;
use crate::tree::{DetachedSubtree, ViewId, ViewTree};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use kurbo::{Point, Rect, Vec2};
use thiserror::Error;

/// Current stream version.
pub const TRANSFER_VERSION: u32 = 1;

const MAGIC: [u8; 4] = *b"PKVS";
const NODE: [u8; 4] = *b"NODE";
const END_NODE: [u8; 4] = *b"ENDN";
const FOOTER: [u8; 4] = *b"FOOT";

/// Deepest node nesting a stream may carry.
pub const MAX_DEPTH: usize = 256;

/// Structural corruption of a transfer stream.
#[derive(Debug, Error, PartialEq)]
pub enum TransferError {
    #[error("unexpected end of stream")]
    UnexpectedEof,
    #[error("expected tag {expected:?}, found {found:?}")]
    BadTag { expected: String, found: String },
    #[error("unsupported stream version {0}")]
    UnsupportedVersion(u32),
    #[error("string is not valid UTF-8")]
    InvalidUtf8,
    #[error("{0} trailing bytes after footer")]
    TrailingData(usize),
    #[error("invalid base64: {0}")]
    Base64(String),
    #[error("nodes nest deeper than {0} levels")]
    TooDeep(usize),
}

/// Views rebuilt from a stream, ready to be attached.
#[derive(Debug)]
pub struct TransferPayload {
    /// Top-level subtrees with origins relative to the payload's top-left.
    pub views: Vec<DetachedSubtree>,
    /// Pointer position relative to the payload's top-left when it was taken.
    pub grab_offset: Vec2,
}

impl TransferPayload {
    /// Union of the top-level frames.
    pub fn bounds(&self) -> Option<Rect> {
        self.views
            .iter()
            .map(|v| v.root_node().frame)
            .reduce(|a, b| a.union(b))
    }

    /// Shift every top-level view by `delta`.
    pub fn offset(&mut self, delta: Vec2) {
        for view in &mut self.views {
            view.root_node_mut().offset(delta);
        }
    }
}

/// Serialize the top-level members of `selection`.
///
/// `grab` is the pointer position in root coordinates; it is stored relative
/// to the selection bounds.
pub fn serialize(
    tree: &ViewTree,
    selection: &Selection,
    registry: &ViewRegistry,
    catalog: &ResourceCatalog,
    grab: Point,
) -> Vec<u8> {
    let top = selection.top_level(tree);
    let origin = top
        .iter()
        .filter_map(|&id| tree.global_frame(id))
        .reduce(|a, b| a.union(b))
        .map(|r| r.origin())
        .unwrap_or(Point::ZERO);

    let mut writer = Writer::default();
    writer.tag(MAGIC);
    writer.u32(TRANSFER_VERSION);
    let count_at = writer.buf.len();
    writer.u32(0);
    let mut written = 0u32;
    for id in top {
        let Some(global) = tree.global_frame(id) else {
            continue;
        };
        let position = global.origin() - origin.to_vec2();
        write_node(&mut writer, tree, registry, catalog, id, Some(position));
        written += 1;
    }
    writer.buf[count_at..count_at + 4].copy_from_slice(&written.to_le_bytes());
    writer.tag(FOOTER);
    let grab = grab - origin.to_vec2();
    writer.f64(grab.x);
    writer.f64(grab.y);
    writer.buf
}

fn write_node(
    writer: &mut Writer,
    tree: &ViewTree,
    registry: &ViewRegistry,
    catalog: &ResourceCatalog,
    id: ViewId,
    origin: Option<Point>,
) {
    let Some(node) = tree.get(id) else { return };
    let mut attrs = registry.attributes_for(node, catalog);
    if let Some(origin) = origin {
        attrs.set("origin", format_point(origin));
    }
    writer.tag(NODE);
    writer.str(node.class());
    writer.u32(attrs.len() as u32);
    for (name, value) in attrs.iter() {
        writer.str(name);
        writer.str(value);
    }
    let children = node.children();
    writer.u32(children.len() as u32);
    for &child in children {
        write_node(writer, tree, registry, catalog, child, None);
    }
    writer.tag(END_NODE);
}

/// Rebuild views from a stream.
///
/// A node naming an unregistered class is dropped together with its subtree;
/// its siblings are still built. Only structural damage is an error.
pub fn deserialize(
    bytes: &[u8],
    registry: &ViewRegistry,
    catalog: &ResourceCatalog,
) -> Result<TransferPayload, TransferError> {
    let (records, grab_offset) = parse(bytes)?;
    let views = records
        .into_iter()
        .filter_map(|record| build(record, registry, catalog))
        .collect();
    Ok(TransferPayload { views, grab_offset })
}

/// Number of top-level views in a stream without building them.
pub fn peek_count(bytes: &[u8]) -> Result<u32, TransferError> {
    let mut reader = Reader::new(bytes);
    reader.expect(MAGIC)?;
    let version = reader.u32()?;
    if version != TRANSFER_VERSION {
        return Err(TransferError::UnsupportedVersion(version));
    }
    reader.u32()
}

/// Encode a stream for text-only clipboards.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn decode_base64(text: &str) -> Result<Vec<u8>, TransferError> {
    STANDARD
        .decode(text.trim())
        .map_err(|e| TransferError::Base64(e.to_string()))
}

#[derive(Debug)]
struct NodeRecord {
    class: String,
    attrs: UiAttributes,
    children: Vec<NodeRecord>,
}

fn parse(bytes: &[u8]) -> Result<(Vec<NodeRecord>, Vec2), TransferError> {
    let count = peek_count(bytes)?;
    let mut reader = Reader::new(bytes);
    reader.skip(12)?;
    let mut records = Vec::new();
    for _ in 0..count {
        records.push(read_node(&mut reader, 1)?);
    }
    reader.expect(FOOTER)?;
    let grab = Vec2::new(reader.f64()?, reader.f64()?);
    let remaining = reader.remaining();
    if remaining != 0 {
        return Err(TransferError::TrailingData(remaining));
    }
    Ok((records, grab))
}

fn read_node(reader: &mut Reader<'_>, depth: usize) -> Result<NodeRecord, TransferError> {
    if depth > MAX_DEPTH {
        return Err(TransferError::TooDeep(MAX_DEPTH));
    }
    reader.expect(NODE)?;
    let class = reader.str()?;
    let attr_count = reader.u32()?;
    let mut attrs = UiAttributes::new();
    for _ in 0..attr_count {
        let name = reader.str()?;
        let value = reader.str()?;
        attrs.set(name, value);
    }
    let child_count = reader.u32()?;
    let mut children = Vec::new();
    for _ in 0..child_count {
        children.push(read_node(reader, depth + 1)?);
    }
    reader.expect(END_NODE)?;
    Ok(NodeRecord {
        class,
        attrs,
        children,
    })
}

fn build(record: NodeRecord, registry: &ViewRegistry, catalog: &ResourceCatalog) -> Option<DetachedSubtree> {
    let Some(node) = registry.create(&record.class, &record.attrs, catalog) else {
        log::warn!("dropping transferred '{}' view: class is not registered", record.class);
        return None;
    };
    let mut subtree = DetachedSubtree::new(node);
    let parent = subtree.root();
    let container = registry.is_container(&record.class);
    for child in record.children {
        if !container {
            log::warn!("dropping child of non-container '{}'", record.class);
            break;
        }
        if let Some(child) = build(child, registry, catalog) {
            subtree.push_child(parent, child);
        }
    }
    Some(subtree)
}

#[derive(Default)]
struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    fn tag(&mut self, tag: [u8; 4]) {
        self.buf.extend_from_slice(&tag);
    }

    fn u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn str(&mut self, s: &str) {
        self.u32(s.len() as u32);
        self.buf.extend_from_slice(s.as_bytes());
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], TransferError> {
        let end = self.pos.checked_add(n).ok_or(TransferError::UnexpectedEof)?;
        let slice = self.bytes.get(self.pos..end).ok_or(TransferError::UnexpectedEof)?;
        self.pos = end;
        Ok(slice)
    }

    fn skip(&mut self, n: usize) -> Result<(), TransferError> {
        self.take(n).map(|_| ())
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn expect(&mut self, tag: [u8; 4]) -> Result<(), TransferError> {
        let found = self.take(4)?;
        if found != tag {
            return Err(TransferError::BadTag {
                expected: String::from_utf8_lossy(&tag).into_owned(),
                found: String::from_utf8_lossy(found).into_owned(),
            });
        }
        Ok(())
    }

    fn u32(&mut self) -> Result<u32, TransferError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn f64(&mut self) -> Result<f64, TransferError> {
        let b = self.take(8)?;
        let mut arr = [0u8; 8];
        arr.copy_from_slice(b);
        Ok(f64::from_le_bytes(arr))
    }

    fn str(&mut self) -> Result<String, TransferError> {
        let len = self.u32()? as usize;
        let b = self.take(len)?;
        String::from_utf8(b.to_vec()).map_err(|_| TransferError::InvalidUtf8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::UiAttributes;
    use crate::registry::{CONTAINER_CLASS, TEXT_LABEL_CLASS, VIEW_CLASS};
    use crate::testing::Fixture;

    fn fixture() -> (Fixture, ViewId, ViewId, ViewId) {
        let mut f = Fixture::new();
        let root = f.root();
        let group = f.add(root, CONTAINER_CLASS, Rect::new(100.0, 100.0, 200.0, 200.0));
        let label = f.add(group, TEXT_LABEL_CLASS, Rect::new(10.0, 20.0, 60.0, 40.0));
        let loose = f.add(root, VIEW_CLASS, Rect::new(300.0, 50.0, 320.0, 70.0));
        (f, group, label, loose)
    }

    #[test]
    fn test_container_and_child_serialized_once() {
        let (mut f, group, label, _) = fixture();
        f.selection.add(group);
        f.selection.add(label);
        let bytes = serialize(&f.tree, &f.selection, &f.registry, &f.catalog, Point::new(110.0, 110.0));
        assert_eq!(peek_count(&bytes), Ok(1));

        let payload = deserialize(&bytes, &f.registry, &f.catalog).unwrap();
        assert_eq!(payload.views.len(), 1);
        let copy = &payload.views[0];
        assert_eq!(copy.len(), 2);
        assert_eq!(copy.root_node().class(), CONTAINER_CLASS);
        assert_eq!(copy.root_node().frame, Rect::new(0.0, 0.0, 100.0, 100.0));
        let child = copy.get(copy.root_node().children()[0]).unwrap();
        assert_eq!(child.frame, Rect::new(10.0, 20.0, 60.0, 40.0));
        assert_eq!(payload.grab_offset, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_origins_relative_to_selection_bounds() {
        let (mut f, group, _, loose) = fixture();
        f.selection.add(loose);
        f.selection.add(group);
        let bytes = serialize(&f.tree, &f.selection, &f.registry, &f.catalog, Point::ZERO);
        let payload = deserialize(&bytes, &f.registry, &f.catalog).unwrap();
        let frames: Vec<Rect> = payload.views.iter().map(|v| v.root_node().frame).collect();
        assert_eq!(frames[0], Rect::new(200.0, 0.0, 220.0, 20.0));
        assert_eq!(frames[1], Rect::new(0.0, 50.0, 100.0, 150.0));
        assert_eq!(payload.bounds(), Some(Rect::new(0.0, 0.0, 220.0, 150.0)));
    }

    #[test]
    fn test_copies_get_fresh_ids_and_same_attributes() {
        let (mut f, _, label, _) = fixture();
        let node = f.tree.get_mut(label).unwrap();
        assert!(f.registry.apply(node, &UiAttributes::new().with("title", "Gain"), &f.catalog));
        f.selection.add(label);
        let bytes = serialize(&f.tree, &f.selection, &f.registry, &f.catalog, Point::ZERO);
        let payload = deserialize(&bytes, &f.registry, &f.catalog).unwrap();
        let copy = payload.views[0].root_node();
        assert_ne!(copy.id(), label);
        assert_eq!(f.registry.read(copy, "title", &f.catalog).as_deref(), Some("Gain"));
    }

    #[test]
    fn test_unknown_class_branch_dropped() {
        let (mut f, group, _, loose) = fixture();
        f.selection.add(group);
        f.selection.add(loose);
        let bytes = serialize(&f.tree, &f.selection, &f.registry, &f.catalog, Point::ZERO);

        let mut limited = crate::registry::ViewRegistry::new();
        limited.register(Box::new(crate::registry::ViewClass));
        let payload = deserialize(&bytes, &limited, &f.catalog).unwrap();
        assert_eq!(payload.views.len(), 1);
        assert_eq!(payload.views[0].root_node().class(), VIEW_CLASS);
    }

    #[test]
    fn test_structural_errors() {
        let (mut f, group, _, _) = fixture();
        f.selection.add(group);
        let bytes = serialize(&f.tree, &f.selection, &f.registry, &f.catalog, Point::ZERO);

        let truncated = &bytes[..bytes.len() - 3];
        assert_eq!(
            deserialize(truncated, &f.registry, &f.catalog).unwrap_err(),
            TransferError::UnexpectedEof
        );

        let mut trailing = bytes.clone();
        trailing.push(0);
        assert_eq!(
            deserialize(&trailing, &f.registry, &f.catalog).unwrap_err(),
            TransferError::TrailingData(1)
        );

        let mut bad = bytes.clone();
        bad[0] = b'X';
        assert!(matches!(
            deserialize(&bad, &f.registry, &f.catalog),
            Err(TransferError::BadTag { .. })
        ));
    }

    fn stream_head(count: u32) -> Writer {
        let mut w = Writer::default();
        w.tag(MAGIC);
        w.u32(TRANSFER_VERSION);
        w.u32(count);
        w
    }

    #[test]
    fn test_deserialize_rejects_excessive_depth() {
        let f = Fixture::new();
        let mut w = stream_head(1);
        for _ in 0..MAX_DEPTH + 10 {
            w.tag(NODE);
            w.str("");
            w.u32(0);
            w.u32(1);
        }
        assert_eq!(
            deserialize(&w.buf, &f.registry, &f.catalog).unwrap_err(),
            TransferError::TooDeep(MAX_DEPTH)
        );
    }

    #[test]
    fn test_deserialize_huge_child_count_is_eof() {
        let f = Fixture::new();

        let mut children = stream_head(1);
        children.tag(NODE);
        children.str(VIEW_CLASS);
        children.u32(0);
        children.u32(u32::MAX);
        assert_eq!(
            deserialize(&children.buf, &f.registry, &f.catalog).unwrap_err(),
            TransferError::UnexpectedEof
        );

        let mut attrs = stream_head(1);
        attrs.tag(NODE);
        attrs.str(VIEW_CLASS);
        attrs.u32(u32::MAX);
        assert_eq!(
            deserialize(&attrs.buf, &f.registry, &f.catalog).unwrap_err(),
            TransferError::UnexpectedEof
        );

        let top = stream_head(u32::MAX);
        assert_eq!(
            deserialize(&top.buf, &f.registry, &f.catalog).unwrap_err(),
            TransferError::UnexpectedEof
        );
    }

    #[test]
    fn test_base64_round_trip() {
        let (mut f, group, _, _) = fixture();
        f.selection.add(group);
        let bytes = serialize(&f.tree, &f.selection, &f.registry, &f.catalog, Point::ZERO);
        let text = encode_base64(&bytes);
        assert_eq!(decode_base64(&text).unwrap(), bytes);
        assert!(decode_base64("not base64!").is_err());
    }
}
