//! The interactive editing session.
//!
//! [`EditController`] owns the live tree, its catalog, the selection and the
//! undo log. It is the only producer of actions: pointer gestures, keyboard
//! commands and the host's menu commands all end up as entries in the log.

mod drag;
mod gesture;
mod guides;
mod keyboard;

pub use gesture::{GestureState, PointerResult};
pub use guides::{GuideLines, GuideStyle};

use crate::actions::{
    AttributeChangeAction, DeleteAction, EmbedAction, GeometryCapture, InsertAction,
    MultipleAttributeChangeAction, ResourceChangeAction, ResourceRenameAction, SelectAction,
    SizeToFitAction, TransformViewTypeAction, UnembedAction, ViewCopyAction, ZOrderAction, plural,
};
use crate::attributes::{AttrType, UiAttributes};
use crate::catalog::{ResourceCatalog, ResourceKind, ResourceValue};
use crate::config::EditorConfig;
use crate::document::{Document, DocumentError};
use crate::registry::ViewRegistry;
use crate::selection::Selection;
use crate::snap::snap_to_grid;
use crate::transfer::{self, TransferPayload};
use crate::tree::{DetachedSubtree, ViewId, ViewTree};
use crate::undo::{Action, EditContext, UndoLog};
use drag::DragIn;
use gesture::Gesture;
use keyboard::AttributeEdit;
use kurbo::{Point, Rect, Size, Vec2};
use std::collections::HashMap;
use std::sync::Arc;

/// Copied views waiting to be pasted.
#[derive(Debug, Clone)]
struct Clipboard {
    bytes: Vec<u8>,
    /// Root-space top-left of the views when they were copied.
    origin: Point,
    pastes: u32,
}

/// An editing session over one view tree.
#[derive(Debug)]
pub struct EditController {
    registry: Arc<ViewRegistry>,
    catalog: ResourceCatalog,
    tree: ViewTree,
    selection: Selection,
    undo: UndoLog,
    config: EditorConfig,
    editing: bool,
    gesture: Gesture,
    guides: Option<GuideLines>,
    drag_in: Option<DragIn>,
    attribute_edit: Option<AttributeEdit>,
    clipboard: Option<Clipboard>,
}

impl EditController {
    /// Start a session in edit mode.
    pub fn new(
        registry: Arc<ViewRegistry>,
        catalog: ResourceCatalog,
        tree: ViewTree,
        config: EditorConfig,
    ) -> Self {
        Self {
            registry,
            catalog,
            tree,
            selection: Selection::new(config.selection_mode),
            undo: UndoLog::with_max_history(config.max_history),
            config,
            editing: true,
            gesture: Gesture::Idle,
            guides: None,
            drag_in: None,
            attribute_edit: None,
            clipboard: None,
        }
    }

    /// A session over an empty root view of `class`.
    pub fn with_root(
        registry: Arc<ViewRegistry>,
        class: &str,
        size: Size,
        config: EditorConfig,
    ) -> Option<Self> {
        let catalog = ResourceCatalog::new();
        let root = registry
            .create(class, &UiAttributes::new(), &catalog)?
            .with_frame(Rect::from_origin_size(Point::ZERO, size));
        let tree = ViewTree::new(DetachedSubtree::new(root));
        Some(Self::new(registry, catalog, tree, config))
    }

    pub fn from_document(
        registry: Arc<ViewRegistry>,
        document: &Document,
        config: EditorConfig,
    ) -> Result<Self, DocumentError> {
        let (catalog, tree) = document.build(&registry)?;
        Ok(Self::new(registry, catalog, tree, config))
    }

    /// Capture the session as a document.
    pub fn to_document(&self, name: impl Into<String>) -> Document {
        Document::from_tree(name, &self.tree, &self.catalog, &self.registry)
    }

    /// Swap in a new root and catalog. Selection, history and transient state are reset.
    pub fn replace_document(&mut self, catalog: ResourceCatalog, tree: ViewTree) {
        self.reset_transient();
        self.catalog = catalog;
        self.tree = tree;
        self.selection.clear();
        self.undo.clear();
        log::info!("editing new document with {} views", self.tree.len());
    }

    pub fn load_document(&mut self, document: &Document) -> Result<(), DocumentError> {
        let (catalog, tree) = document.build(&self.registry)?;
        self.replace_document(catalog, tree);
        Ok(())
    }

    pub fn tree(&self) -> &ViewTree {
        &self.tree
    }

    pub fn catalog(&self) -> &ResourceCatalog {
        &self.catalog
    }

    pub fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    /// A shared handle to the registry, for opening further sessions.
    pub fn registry_handle(&self) -> Arc<ViewRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn root(&self) -> ViewId {
        self.tree.root()
    }

    // --- modes ---

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Leaving edit mode empties the selection and drops any gesture in progress.
    pub fn set_edit_mode(&mut self, on: bool) {
        if self.editing == on {
            return;
        }
        if !on {
            self.reset_transient();
            self.selection.clear();
        }
        self.editing = on;
        log::debug!("edit mode {}", if on { "on" } else { "off" });
    }

    /// Set the snapping grid; 0 and 1 both turn snapping off.
    pub fn set_grid_size(&mut self, grid_size: u32) {
        self.config.grid_size = grid_size.max(1);
    }

    pub fn grid_size(&self) -> u32 {
        self.config.grid_size
    }

    fn snap(&self, point: Point) -> Point {
        snap_to_grid(point, self.config.grid_size)
    }

    fn reset_transient(&mut self) {
        self.cancel_gesture();
        self.drag_leave();
        self.attribute_edit = None;
        self.guides = None;
    }

    // --- history ---

    /// Perform `action` and record it in the undo log.
    pub fn perform_action(&mut self, action: Box<dyn Action>) {
        let mut cx = EditContext {
            tree: &mut self.tree,
            selection: &mut self.selection,
            catalog: &mut self.catalog,
            registry: &self.registry,
        };
        self.undo.perform(action, &mut cx);
    }

    pub fn undo(&mut self) -> bool {
        self.cancel_gesture();
        let mut cx = EditContext {
            tree: &mut self.tree,
            selection: &mut self.selection,
            catalog: &mut self.catalog,
            registry: &self.registry,
        };
        let done = self.undo.undo(&mut cx);
        self.selection.retain_existing(&self.tree);
        done
    }

    pub fn redo(&mut self) -> bool {
        self.cancel_gesture();
        let mut cx = EditContext {
            tree: &mut self.tree,
            selection: &mut self.selection,
            catalog: &mut self.catalog,
            registry: &self.registry,
        };
        let done = self.undo.redo(&mut cx);
        self.selection.retain_existing(&self.tree);
        done
    }

    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo.can_redo()
    }

    pub fn undo_name(&self) -> Option<&str> {
        self.undo.undo_name()
    }

    pub fn redo_name(&self) -> Option<&str> {
        self.undo.redo_name()
    }

    pub fn history(&self) -> &UndoLog {
        &self.undo
    }

    /// Record the current history position as saved.
    pub fn mark_saved(&mut self) {
        self.undo.mark_saved();
    }

    pub fn is_dirty(&self) -> bool {
        self.undo.is_dirty()
    }

    // --- selection ---

    /// Select `id` alone. The root may be selected this way.
    pub fn select_view(&mut self, id: ViewId) -> bool {
        if !self.tree.contains(id) {
            return false;
        }
        self.selection.set_exclusive(id);
        true
    }

    /// Select every direct child of the root.
    pub fn select_all(&mut self) {
        let children = self.tree.children(self.tree.root()).to_vec();
        self.selection.set_all(children);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Top-level selected views other than the root.
    fn movable(&self) -> Vec<ViewId> {
        let root = self.tree.root();
        self.selection
            .top_level(&self.tree)
            .into_iter()
            .filter(|&id| id != root)
            .collect()
    }

    /// Root-space union of the given views' frames.
    fn bounds_of(&self, ids: &[ViewId]) -> Option<Rect> {
        ids.iter()
            .filter_map(|&id| self.tree.global_frame(id))
            .reduce(|a, b| a.union(b))
    }

    // --- structure commands ---

    /// Delete the selected views. The root is never deleted.
    pub fn delete_selection(&mut self) -> bool {
        let ids = self.selection.members().to_vec();
        match DeleteAction::new(&self.tree, &ids) {
            Some(action) => {
                self.perform_action(Box::new(action));
                true
            }
            None => false,
        }
    }

    /// Wrap the selected views in a new container of `class`.
    pub fn embed_selection_into(&mut self, class: &str) -> bool {
        let ids = self.selection.members().to_vec();
        let action = EmbedAction::new(
            &self.tree,
            &self.registry,
            &self.catalog,
            &ids,
            class,
            self.config.embed_margin,
        );
        match action {
            Some(action) => {
                self.perform_action(Box::new(action));
                true
            }
            None => false,
        }
    }

    /// Dissolve the single selected container into its parent.
    pub fn unembed(&mut self) -> bool {
        let Some(id) = self.selection.single() else {
            return false;
        };
        match UnembedAction::new(&self.tree, id) {
            Some(action) => {
                self.perform_action(Box::new(action));
                true
            }
            None => false,
        }
    }

    /// Create a `class` view with its top-left at `at` inside the container under it.
    pub fn create_new_view(&mut self, class: &str, at: Point) -> Option<ViewId> {
        let parent = self.tree.container_at(at, &self.registry)?;
        let node = self.registry.create(class, &UiAttributes::new(), &self.catalog)?;
        let origin = self.tree.to_local(parent, self.snap(at));
        let frame = Rect::from_origin_size(origin, node.frame.size());
        let action = InsertAction::new(parent, DetachedSubtree::new(node.with_frame(frame)), None);
        let id = action.id();
        self.perform_action(Box::new(action));
        self.tree.contains(id).then_some(id)
    }

    /// Instantiate a catalog template with its top-left at `at`.
    pub fn insert_template(&mut self, name: &str, at: Point) -> Vec<ViewId> {
        let Some(payload) = self.catalog.instantiate_template(name, &self.registry) else {
            log::debug!("no usable template named '{}'", name);
            return Vec::new();
        };
        let Some(parent) = self.tree.container_at(at, &self.registry) else {
            return Vec::new();
        };
        let top_left = self.snap(at);
        self.place_payload(format!("Insert Template '{}'", name), payload, parent, top_left)
    }

    /// Attach `payload` under `parent` with its top-left at root-space `top_left`.
    fn place_payload(
        &mut self,
        name: String,
        mut payload: TransferPayload,
        parent: ViewId,
        top_left: Point,
    ) -> Vec<ViewId> {
        if payload.views.is_empty() {
            return Vec::new();
        }
        let local = self.tree.to_local(parent, top_left);
        payload.offset(local.to_vec2());
        let action = ViewCopyAction::new(name, parent, payload.views);
        let ids = action.ids().to_vec();
        self.perform_action(Box::new(action));
        ids
    }

    /// Replace the single selected view with one of `class`.
    pub fn transform_view_type(&mut self, class: &str) -> bool {
        let Some(id) = self.selection.single() else {
            return false;
        };
        match TransformViewTypeAction::new(&self.tree, &self.registry, &self.catalog, id, class) {
            Some(action) => {
                self.perform_action(Box::new(action));
                true
            }
            None => false,
        }
    }

    /// Resize the selected views to their natural size.
    pub fn size_to_fit(&mut self) -> bool {
        let ids = self.movable();
        match SizeToFitAction::new(&self.tree, &self.registry, &self.catalog, ids) {
            Some(action) => {
                self.perform_action(Box::new(action));
                true
            }
            None => false,
        }
    }

    pub fn bring_forward(&mut self) -> bool {
        self.reorder(true)
    }

    pub fn send_backward(&mut self) -> bool {
        self.reorder(false)
    }

    fn reorder(&mut self, forward: bool) -> bool {
        let Some(id) = self.selection.single() else {
            return false;
        };
        match ZOrderAction::new(&self.tree, id, forward) {
            Some(action) => {
                self.perform_action(Box::new(action));
                true
            }
            None => false,
        }
    }

    /// Move the selected views by `delta` as one undoable step.
    pub fn nudge(&mut self, delta: Vec2) -> bool {
        let ids = self.movable();
        if ids.is_empty() {
            return false;
        }
        let capture = GeometryCapture::capture(&self.tree, ids.iter().copied());
        for &id in &ids {
            if let Some(node) = self.tree.get_mut(id) {
                node.offset(delta);
            }
        }
        match capture.finish(&self.tree) {
            Some(action) => {
                self.perform_action(Box::new(action));
                true
            }
            None => false,
        }
    }

    // --- attributes and resources ---

    /// Set `name` on every selected view whose class understands it.
    pub fn change_attribute(&mut self, name: &str, value: &str) -> bool {
        let targets = self.attribute_targets(name);
        if targets.is_empty() {
            return false;
        }
        self.perform_action(Box::new(AttributeChangeAction::new(&self.tree, targets, name, value)));
        true
    }

    fn attribute_targets(&self, name: &str) -> Vec<ViewId> {
        self.selection
            .iter()
            .filter(|&id| {
                self.tree
                    .get(id)
                    .is_some_and(|n| self.registry.attribute_spec(n.class(), name).is_some())
            })
            .collect()
    }

    /// Rewrite every `ty` attribute reading `from` to `to` across the tree.
    pub fn replace_attribute_values(&mut self, ty: AttrType, from: &str, to: &str) -> usize {
        let action = MultipleAttributeChangeAction::new(
            &self.tree,
            &self.registry,
            &self.catalog,
            self.tree.root(),
            ty,
            from,
            to,
        );
        match action {
            Some(action) => {
                let count = action.len();
                self.perform_action(Box::new(action));
                count
            }
            None => 0,
        }
    }

    /// Define, replace or (with `None`) remove a catalog resource.
    pub fn set_resource(&mut self, kind: ResourceKind, name: &str, value: Option<ResourceValue>) {
        let action = ResourceChangeAction::new(&self.catalog, kind, name, value);
        self.perform_action(Box::new(action));
    }

    /// Rename a resource and every attribute that refers to it.
    pub fn rename_resource(&mut self, kind: ResourceKind, old: &str, new: &str) -> bool {
        match ResourceRenameAction::new(&self.catalog, kind, old, new) {
            Some(action) => {
                self.perform_action(Box::new(action));
                true
            }
            None => false,
        }
    }

    /// Store the single selected view as a template. Not recorded in the undo log.
    pub fn save_template(&mut self, name: &str) -> bool {
        let Some(id) = self.selection.single() else {
            return false;
        };
        let mut one = Selection::default();
        one.add(id);
        let bytes = transfer::serialize(&self.tree, &one, &self.registry, &self.catalog, Point::ZERO);
        self.catalog.define_template(name, bytes);
        true
    }

    // --- clipboard ---

    /// Copy the selection into the internal clipboard and return the transfer bytes.
    pub fn copy(&mut self) -> Option<Vec<u8>> {
        let ids = self.movable();
        let origin = self.bounds_of(&ids)?.origin();
        let mut copied = Selection::default();
        copied.set_all(ids);
        let bytes = transfer::serialize(&self.tree, &copied, &self.registry, &self.catalog, origin);
        self.clipboard = Some(Clipboard {
            bytes: bytes.clone(),
            origin,
            pastes: 0,
        });
        Some(bytes)
    }

    pub fn cut(&mut self) -> Option<Vec<u8>> {
        let bytes = self.copy()?;
        self.delete_selection();
        Some(bytes)
    }

    /// Put externally copied transfer bytes on the internal clipboard.
    pub fn set_clipboard(&mut self, bytes: Vec<u8>) {
        self.clipboard = Some(Clipboard {
            bytes,
            origin: Point::ZERO,
            pastes: 0,
        });
    }

    pub fn has_clipboard(&self) -> bool {
        self.clipboard.is_some()
    }

    /// Paste the clipboard into the selected container (or the root).
    ///
    /// With `at` the views land with their top-left there; otherwise each
    /// paste lands a further `paste_offset` away from where they were copied.
    pub fn paste(&mut self, at: Option<Point>) -> Vec<ViewId> {
        let Some(clipboard) = self.clipboard.as_mut() else {
            return Vec::new();
        };
        clipboard.pastes += 1;
        let bytes = clipboard.bytes.clone();
        let top_left = match at {
            Some(p) => snap_to_grid(p, self.config.grid_size),
            None => {
                let step = self.config.paste_offset * f64::from(clipboard.pastes);
                clipboard.origin + Vec2::new(step, step)
            }
        };
        let payload = match transfer::deserialize(&bytes, &self.registry, &self.catalog) {
            Ok(payload) => payload,
            Err(e) => {
                log::warn!("clipboard contents are corrupt: {}", e);
                return Vec::new();
            }
        };
        let parent = self
            .selection
            .single()
            .filter(|&id| {
                self.tree
                    .get(id)
                    .is_some_and(|n| self.registry.is_container(n.class()))
            })
            .unwrap_or(self.tree.root());
        let name = plural("Paste", payload.views.len());
        self.place_payload(name, payload, parent, top_left)
    }

    /// Copy the selected views next to themselves, each within its own parent.
    pub fn duplicate(&mut self) -> Vec<ViewId> {
        let ids = self.movable();
        let mut by_parent: Vec<(ViewId, Vec<ViewId>)> = Vec::new();
        let mut slots: HashMap<ViewId, usize> = HashMap::new();
        for id in ids {
            let Some(parent) = self.tree.parent(id) else { continue };
            let slot = *slots.entry(parent).or_insert_with(|| {
                by_parent.push((parent, Vec::new()));
                by_parent.len() - 1
            });
            by_parent[slot].1.push(id);
        }
        if by_parent.is_empty() {
            return Vec::new();
        }

        let offset = Vec2::new(self.config.paste_offset, self.config.paste_offset);
        let mut created = Vec::new();
        self.undo.begin_group("Duplicate");
        for (parent, members) in by_parent {
            let Some(bounds) = self.bounds_of(&members) else { continue };
            let mut group = Selection::default();
            group.set_all(members);
            let bytes = transfer::serialize(
                &self.tree,
                &group,
                &self.registry,
                &self.catalog,
                bounds.origin(),
            );
            match transfer::deserialize(&bytes, &self.registry, &self.catalog) {
                Ok(payload) => created.extend(self.place_payload(
                    plural("Duplicate", payload.views.len()),
                    payload,
                    parent,
                    bounds.origin() + offset,
                )),
                Err(e) => log::error!("duplicate produced an unreadable stream: {}", e),
            }
        }
        if !created.is_empty() {
            self.perform_action(Box::new(SelectAction::new(created.clone())));
        }
        self.undo.end_group();
        created
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{CONTAINER_CLASS, TEXT_LABEL_CLASS, VIEW_CLASS};

    pub(super) fn editor() -> EditController {
        EditController::with_root(
            Arc::new(ViewRegistry::with_builtins()),
            CONTAINER_CLASS,
            Size::new(400.0, 300.0),
            EditorConfig::default(),
        )
        .unwrap()
    }

    pub(super) fn frame(editor: &EditController, id: ViewId) -> Rect {
        editor.tree().get(id).unwrap().frame
    }

    #[test]
    fn test_create_new_view_snaps_into_container() {
        let mut ed = editor();
        let group = ed.create_new_view(CONTAINER_CLASS, Point::new(100.0, 100.0)).unwrap();
        ed.perform_action(Box::new(crate::actions::GeometryAction::new(
            "Resize View",
            vec![(group, frame(&ed, group), Rect::new(100.0, 100.0, 200.0, 200.0))],
        )
        .unwrap()));

        let label = ed.create_new_view(TEXT_LABEL_CLASS, Point::new(123.0, 137.0)).unwrap();
        assert_eq!(ed.tree().parent(label), Some(group));
        assert_eq!(frame(&ed, label).origin(), Point::new(20.0, 30.0));
        assert_eq!(ed.selection().members(), &[label]);
        assert!(ed.undo());
        assert!(!ed.tree().contains(label));
    }

    #[test]
    fn test_delete_embed_and_unembed() {
        let mut ed = editor();
        let a = ed.create_new_view(VIEW_CLASS, Point::new(20.0, 20.0)).unwrap();
        let b = ed.create_new_view(VIEW_CLASS, Point::new(100.0, 40.0)).unwrap();
        ed.select_all();
        assert!(ed.embed_selection_into(CONTAINER_CLASS));
        let container = ed.selection().single().unwrap();
        assert_eq!(frame(&ed, container), Rect::new(10.0, 10.0, 160.0, 100.0));
        assert_eq!(ed.tree().parent(a), Some(container));
        assert_eq!(ed.undo_name(), Some("Embed Into View Container"));

        assert!(ed.unembed());
        assert_eq!(ed.tree().parent(b), Some(ed.root()));
        assert_eq!(frame(&ed, b).origin(), Point::new(100.0, 40.0));

        ed.select_view(ed.root());
        assert!(!ed.delete_selection());
        ed.select_all();
        assert!(ed.delete_selection());
        assert!(ed.tree().children(ed.root()).is_empty());
        assert!(ed.undo());
        assert_eq!(ed.tree().children(ed.root()), &[a, b]);
    }

    #[test]
    fn test_copy_paste_cascades() {
        let mut ed = editor();
        let a = ed.create_new_view(VIEW_CLASS, Point::new(20.0, 20.0)).unwrap();
        ed.select_view(a);
        assert!(ed.copy().is_some());

        let first = ed.paste(None);
        let second = ed.paste(None);
        assert_eq!(frame(&ed, first[0]).origin(), Point::new(30.0, 30.0));
        assert_eq!(frame(&ed, second[0]).origin(), Point::new(40.0, 40.0));
        assert_eq!(ed.selection().members(), second.as_slice());

        let placed = ed.paste(Some(Point::new(207.0, 153.0)));
        assert_eq!(frame(&ed, placed[0]).origin(), Point::new(200.0, 150.0));
        assert_eq!(ed.undo_name(), Some("Paste View"));
    }

    #[test]
    fn test_duplicate_is_one_undo_step() {
        let mut ed = editor();
        ed.create_new_view(VIEW_CLASS, Point::new(20.0, 20.0)).unwrap();
        ed.create_new_view(VIEW_CLASS, Point::new(80.0, 20.0)).unwrap();
        ed.select_all();
        let copies = ed.duplicate();
        assert_eq!(copies.len(), 2);
        assert_eq!(ed.tree().children(ed.root()).len(), 4);
        assert_eq!(frame(&ed, copies[1]).origin(), Point::new(90.0, 30.0));
        assert_eq!(ed.undo_name(), Some("Duplicate"));
        assert!(ed.undo());
        assert_eq!(ed.tree().children(ed.root()).len(), 2);
    }

    #[test]
    fn test_redo_duplicate_across_parents_selects_every_copy() {
        let mut ed = editor();
        let group = ed.create_new_view(CONTAINER_CLASS, Point::new(100.0, 100.0)).unwrap();
        ed.perform_action(Box::new(crate::actions::GeometryAction::new(
            "Resize View",
            vec![(group, frame(&ed, group), Rect::new(100.0, 100.0, 200.0, 200.0))],
        )
        .unwrap()));
        let inner = ed.create_new_view(VIEW_CLASS, Point::new(120.0, 120.0)).unwrap();
        let loose = ed.create_new_view(VIEW_CLASS, Point::new(300.0, 20.0)).unwrap();
        assert_eq!(ed.tree().parent(inner), Some(group));
        assert_eq!(ed.tree().parent(loose), Some(ed.root()));

        ed.selection.set_all([inner, loose]);
        let copies = ed.duplicate();
        assert_eq!(copies.len(), 2);
        assert_eq!(ed.selection().len(), 2);

        assert!(ed.undo());
        assert!(ed.selection().contains(inner));
        assert!(ed.selection().contains(loose));

        assert!(ed.redo());
        assert_eq!(ed.selection().len(), 2);
        for id in &copies {
            assert!(ed.selection().contains(*id));
        }
    }

    #[test]
    fn test_templates_insert_at_point() {
        let mut ed = editor();
        let label = ed.create_new_view(TEXT_LABEL_CLASS, Point::new(20.0, 20.0)).unwrap();
        assert!(ed.change_attribute("title", "Gain"));
        assert!(ed.save_template("gain-label"));

        let ids = ed.insert_template("gain-label", Point::new(305.0, 205.0));
        assert_eq!(ids.len(), 1);
        assert_ne!(ids[0], label);
        assert_eq!(frame(&ed, ids[0]).origin(), Point::new(300.0, 200.0));
        let node = ed.tree().get(ids[0]).unwrap();
        assert_eq!(ed.registry().read(node, "title", ed.catalog()).as_deref(), Some("Gain"));
        assert!(ed.insert_template("missing", Point::ZERO).is_empty());
    }

    #[test]
    fn test_leaving_edit_mode_clears_selection() {
        let mut ed = editor();
        let a = ed.create_new_view(VIEW_CLASS, Point::new(20.0, 20.0)).unwrap();
        ed.select_view(a);
        ed.set_edit_mode(false);
        assert!(ed.selection().is_empty());
        assert!(!ed.is_editing());
    }

    #[test]
    fn test_resource_rename_through_editor() {
        let mut ed = editor();
        ed.set_resource(
            ResourceKind::Color,
            "accent",
            Some(ResourceValue::Color(crate::attributes::Rgba::new(1, 2, 3, 255))),
        );
        ed.create_new_view(TEXT_LABEL_CLASS, Point::new(20.0, 20.0)).unwrap();
        assert!(ed.change_attribute("font-color", "accent"));
        assert!(ed.rename_resource(ResourceKind::Color, "accent", "primary"));
        assert_eq!(
            ed.replace_attribute_values(AttrType::Color, "primary", "#ff0000ff"),
            1
        );
        assert!(ed.undo());
        assert!(ed.undo());
        assert!(ed.catalog().lookup_color("accent").is_some());
    }
}
