//! Undo/redo history of reversible editing actions.

use crate::actions::ActionGroup;
use crate::catalog::ResourceCatalog;
use crate::registry::ViewRegistry;
use crate::selection::Selection;
use crate::tree::ViewTree;
use std::fmt;

/// Everything an action may read or mutate.
pub struct EditContext<'a> {
    pub tree: &'a mut ViewTree,
    pub selection: &'a mut Selection,
    pub catalog: &'a mut ResourceCatalog,
    pub registry: &'a ViewRegistry,
}

/// A reversible unit of editing history.
///
/// Actions capture the state they need to undo when they are constructed, so
/// `perform` and `undo` only replay snapshots.
pub trait Action: fmt::Debug {
    /// Human readable name shown in undo/redo menus.
    fn name(&self) -> &str;

    fn perform(&mut self, cx: &mut EditContext<'_>);

    fn undo(&mut self, cx: &mut EditContext<'_>);
}

/// Cursor-addressed action history.
///
/// Entries before the cursor are done, entries at or after it are redoable.
#[derive(Debug, Default)]
pub struct UndoLog {
    entries: Vec<Box<dyn Action>>,
    cursor: usize,
    /// Maximum number of entries kept; 0 keeps everything.
    max_history: usize,
    /// Cursor position when the document was last saved.
    saved_at: Option<usize>,
    group: Option<ActionGroup>,
}

impl UndoLog {
    pub fn new() -> Self {
        Self {
            saved_at: Some(0),
            ..Self::default()
        }
    }

    pub fn with_max_history(max_history: usize) -> Self {
        Self {
            max_history,
            ..Self::new()
        }
    }

    pub fn set_max_history(&mut self, max_history: usize) {
        self.max_history = max_history;
        self.enforce_limit();
    }

    /// Perform `action` and record it, discarding any redoable entries.
    ///
    /// While a group is open the action is performed and collected into it.
    pub fn perform(&mut self, mut action: Box<dyn Action>, cx: &mut EditContext<'_>) {
        log::debug!("perform '{}'", action.name());
        if let Some(group) = self.group.as_mut() {
            action.perform(cx);
            group.push(action);
            return;
        }
        self.truncate_redo();
        action.perform(cx);
        self.entries.push(action);
        self.cursor += 1;
        self.enforce_limit();
    }

    /// Undo the entry before the cursor. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self, cx: &mut EditContext<'_>) -> bool {
        if self.group.is_some() || self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let action = &mut self.entries[self.cursor];
        log::debug!("undo '{}'", action.name());
        action.undo(cx);
        true
    }

    /// Redo the entry at the cursor. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self, cx: &mut EditContext<'_>) -> bool {
        if self.group.is_some() || self.cursor >= self.entries.len() {
            return false;
        }
        let action = &mut self.entries[self.cursor];
        log::debug!("redo '{}'", action.name());
        action.perform(cx);
        self.cursor += 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.group.is_none() && self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.group.is_none() && self.cursor < self.entries.len()
    }

    pub fn undo_name(&self) -> Option<&str> {
        self.cursor
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .map(|a| a.name())
    }

    pub fn redo_name(&self) -> Option<&str> {
        self.entries.get(self.cursor).map(|a| a.name())
    }

    /// Start collecting performed actions into one entry named `name`.
    pub fn begin_group(&mut self, name: impl Into<String>) -> bool {
        if self.group.is_some() {
            log::warn!("action group already open");
            return false;
        }
        self.group = Some(ActionGroup::new(name));
        true
    }

    /// Close the open group and record it. Empty groups are dropped.
    pub fn end_group(&mut self) -> bool {
        let Some(group) = self.group.take() else {
            return false;
        };
        if group.is_empty() {
            return false;
        }
        self.truncate_redo();
        self.entries.push(Box::new(group));
        self.cursor += 1;
        self.enforce_limit();
        true
    }

    pub fn is_grouping(&self) -> bool {
        self.group.is_some()
    }

    /// Forget all history, e.g. after loading a document.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
        self.saved_at = Some(0);
        self.group = None;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Remember the current position as the saved state.
    pub fn mark_saved(&mut self) {
        self.saved_at = Some(self.cursor);
    }

    /// True if the history moved away from the saved state.
    pub fn is_dirty(&self) -> bool {
        self.group.is_some() || self.saved_at != Some(self.cursor)
    }

    fn truncate_redo(&mut self) {
        if self.cursor < self.entries.len() {
            self.entries.truncate(self.cursor);
            if self.saved_at.is_some_and(|s| s > self.cursor) {
                self.saved_at = None;
            }
        }
    }

    fn enforce_limit(&mut self) {
        if self.max_history == 0 {
            return;
        }
        while self.entries.len() > self.max_history {
            self.entries.remove(0);
            self.cursor = self.cursor.saturating_sub(1);
            self.saved_at = match self.saved_at {
                Some(0) | None => None,
                Some(s) => Some(s - 1),
            };
        }
    }
}
