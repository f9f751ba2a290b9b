//! PanelKit Core Library
//!
//! Platform-agnostic view description, registry and live editing for PanelKit
//! control panels.

pub mod actions;
pub mod attributes;
pub mod catalog;
pub mod config;
pub mod document;
pub mod editor;
pub mod handles;
pub mod input;
pub mod registry;
pub mod selection;
pub mod snap;
pub mod storage;
pub mod transfer;
pub mod tree;
pub mod undo;

#[cfg(test)]
mod testing;

pub use attributes::{AttrType, AttrValue, Rgba, UiAttributes};
pub use catalog::{ResourceCatalog, ResourceKind, ResourceValue};
pub use config::EditorConfig;
pub use document::{Document, DocumentError, SerializedView};
pub use editor::{EditController, GestureState, GuideLines, GuideStyle, PointerResult};
pub use handles::ResizeZone;
pub use input::{Key, Modifiers};
pub use registry::{ViewCreator, ViewRegistry};
pub use selection::{Selection, SelectionMode};
pub use snap::{DEFAULT_GRID_SIZE, snap_to_grid};
pub use transfer::{TransferError, TransferPayload};
pub use tree::{DetachedSubtree, ViewId, ViewNode, ViewTree};
pub use undo::{Action, EditContext, UndoLog};
