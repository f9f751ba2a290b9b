//! Concrete editing actions.

mod attribute;
mod geometry;
mod group;
mod resource;
mod structure;

pub use attribute::{AttributeChangeAction, MultipleAttributeChangeAction};
pub use geometry::{GeometryAction, GeometryCapture, SizeToFitAction};
pub use group::ActionGroup;
pub use resource::{ResourceChangeAction, ResourceRenameAction};
pub use structure::{
    DeleteAction, EmbedAction, InsertAction, SelectAction, TransformViewTypeAction,
    UnembedAction, ViewCopyAction, ZOrderAction,
};

use crate::tree::{ViewId, ViewTree};

/// Order `ids` by their position in a depth-first walk of `tree`.
pub(crate) fn document_order(tree: &ViewTree, ids: &[ViewId]) -> Vec<ViewId> {
    tree.descendants(tree.root())
        .into_iter()
        .filter(|id| ids.contains(id))
        .collect()
}

/// "View" or "Views" depending on `count`.
pub(crate) fn plural(verb: &str, count: usize) -> String {
    if count == 1 {
        format!("{} View", verb)
    } else {
        format!("{} Views", verb)
    }
}
