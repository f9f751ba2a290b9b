//! PanelKit Application
//!
//! Headless host pieces shared by the `panelkit` binary: text reports over
//! documents and the class registry, and the keyboard shortcut table.

mod inspect;
mod shortcuts;

pub use inspect::{catalog_report, class_report, tree_report};
pub use shortcuts::{Shortcut, ShortcutRegistry};
