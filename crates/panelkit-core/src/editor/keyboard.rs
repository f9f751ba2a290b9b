//! Keyboard commands and in-place attribute editing.

use super::EditController;
use crate::actions::AttributeChangeAction;
use crate::input::{Key, Modifiers};
use crate::tree::ViewId;
use kurbo::Vec2;

/// Text being typed for one attribute of the selected views.
#[derive(Debug)]
pub(super) struct AttributeEdit {
    name: String,
    targets: Vec<ViewId>,
    original: Option<String>,
    text: String,
}

impl EditController {
    /// Start editing `name` on the selected views that understand it.
    ///
    /// The edit text starts as the first target's current value.
    pub fn begin_attribute_edit(&mut self, name: &str) -> bool {
        if !self.editing {
            return false;
        }
        if self.attribute_edit.is_some() {
            self.commit_attribute_edit();
        }
        let targets = self.attribute_targets(name);
        let Some(&first) = targets.first() else {
            return false;
        };
        let original = self
            .tree
            .get(first)
            .and_then(|node| self.registry.read(node, name, &self.catalog));
        self.attribute_edit = Some(AttributeEdit {
            name: name.to_string(),
            targets,
            text: original.clone().unwrap_or_default(),
            original,
        });
        true
    }

    /// Name and current text of the edit in progress.
    pub fn attribute_edit(&self) -> Option<(&str, &str)> {
        self.attribute_edit
            .as_ref()
            .map(|edit| (edit.name.as_str(), edit.text.as_str()))
    }

    pub fn set_edit_text(&mut self, text: impl Into<String>) -> bool {
        match self.attribute_edit.as_mut() {
            Some(edit) => {
                edit.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Apply the edited text as one undoable change. Unchanged text records nothing.
    pub fn commit_attribute_edit(&mut self) -> bool {
        let Some(edit) = self.attribute_edit.take() else {
            return false;
        };
        if edit.original.as_deref().unwrap_or_default() == edit.text {
            return false;
        }
        let targets: Vec<ViewId> = edit
            .targets
            .into_iter()
            .filter(|&id| self.tree.contains(id))
            .collect();
        if targets.is_empty() {
            return false;
        }
        log::debug!("committing '{}' = '{}' on {} views", edit.name, edit.text, targets.len());
        self.perform_action(Box::new(AttributeChangeAction::new(
            &self.tree, targets, edit.name, edit.text,
        )));
        true
    }

    pub fn cancel_attribute_edit(&mut self) -> bool {
        self.attribute_edit.take().is_some()
    }

    /// Handle a key press. Returns `true` if the editor consumed it.
    pub fn key_down(&mut self, key: Key, modifiers: Modifiers) -> bool {
        if !self.editing {
            return false;
        }
        if self.attribute_edit.is_some() {
            return match key {
                Key::Escape => self.cancel_attribute_edit(),
                Key::Enter => {
                    self.commit_attribute_edit();
                    true
                }
                _ => false,
            };
        }

        let step = if modifiers.shift {
            f64::from(self.config.grid_size.max(1))
        } else {
            self.config.nudge_step
        };

        match key {
            Key::Escape => {
                if self.cancel_gesture() {
                    return true;
                }
                if self.drag_in.is_some() {
                    self.drag_leave();
                    return true;
                }
                false
            }
            Key::Delete | Key::Backspace => self.delete_selection(),
            Key::ArrowLeft => self.nudge(Vec2::new(-step, 0.0)),
            Key::ArrowRight => self.nudge(Vec2::new(step, 0.0)),
            Key::ArrowUp => self.nudge(Vec2::new(0.0, -step)),
            Key::ArrowDown => self.nudge(Vec2::new(0.0, step)),
            Key::Enter => false,
            Key::Char(c) if modifiers.command() => self.command_key(c, modifiers.shift),
            Key::Char(_) => false,
        }
    }

    fn command_key(&mut self, c: char, shift: bool) -> bool {
        match c {
            'z' if shift => self.redo(),
            'z' => self.undo(),
            'y' => self.redo(),
            'd' => !self.duplicate().is_empty(),
            'c' => self.copy().is_some(),
            'x' => self.cut().is_some(),
            'v' => !self.paste(None).is_empty(),
            'a' => {
                self.select_all();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{editor, frame};
    use super::*;
    use crate::registry::{TEXT_LABEL_CLASS, VIEW_CLASS};
    use kurbo::Point;

    #[test]
    fn test_attribute_edit_commits_once() {
        let mut ed = editor();
        let a = ed.create_new_view(TEXT_LABEL_CLASS, Point::new(10.0, 10.0)).unwrap();
        let b = ed.create_new_view(TEXT_LABEL_CLASS, Point::new(100.0, 10.0)).unwrap();
        ed.select_all();
        assert!(ed.begin_attribute_edit("title"));
        assert!(ed.set_edit_text("Gain"));
        assert_eq!(ed.attribute_edit(), Some(("title", "Gain")));
        assert!(ed.key_down(Key::Enter, Modifiers::NONE));
        assert!(ed.attribute_edit().is_none());

        let read = |ed: &EditController, id| {
            let node = ed.tree().get(id).unwrap();
            ed.registry().read(node, "title", ed.catalog())
        };
        assert_eq!(read(&ed, a).as_deref(), Some("Gain"));
        assert_eq!(read(&ed, b).as_deref(), Some("Gain"));
        assert_eq!(ed.undo_name(), Some("Change 'title'"));
        assert!(ed.undo());
        assert_ne!(read(&ed, a).as_deref(), Some("Gain"));
    }

    #[test]
    fn test_unchanged_or_cancelled_edit_records_nothing() {
        let mut ed = editor();
        ed.create_new_view(TEXT_LABEL_CLASS, Point::new(10.0, 10.0)).unwrap();
        let before = ed.history().len();

        assert!(ed.begin_attribute_edit("title"));
        assert!(!ed.commit_attribute_edit());

        assert!(ed.begin_attribute_edit("title"));
        ed.set_edit_text("Drive");
        assert!(ed.key_down(Key::Escape, Modifiers::NONE));
        assert_eq!(ed.history().len(), before);

        assert!(!ed.begin_attribute_edit("no-such-attribute"));
    }

    #[test]
    fn test_arrows_nudge() {
        let mut ed = editor();
        let v = ed.create_new_view(VIEW_CLASS, Point::new(20.0, 20.0)).unwrap();
        assert!(ed.key_down(Key::ArrowRight, Modifiers::NONE));
        assert!(ed.key_down(Key::ArrowDown, Modifiers::SHIFT));
        assert_eq!(frame(&ed, v).origin(), Point::new(21.0, 30.0));

        assert!(ed.key_down(Key::Char('z'), Modifiers::CTRL));
        assert_eq!(frame(&ed, v).origin(), Point::new(21.0, 20.0));
        let redo = Modifiers { shift: true, ..Modifiers::CTRL };
        assert!(ed.key_down(Key::Char('z'), redo));
        assert_eq!(frame(&ed, v).origin(), Point::new(21.0, 30.0));
    }

    #[test]
    fn test_command_keys() {
        let mut ed = editor();
        ed.create_new_view(VIEW_CLASS, Point::new(20.0, 20.0)).unwrap();
        assert!(ed.key_down(Key::Char('d'), Modifiers::CTRL));
        assert_eq!(ed.tree().len(), 3);

        assert!(ed.key_down(Key::Char('a'), Modifiers::CTRL));
        assert_eq!(ed.selection().len(), 2);
        assert!(ed.key_down(Key::Char('x'), Modifiers::CTRL));
        assert_eq!(ed.tree().len(), 1);
        assert!(ed.key_down(Key::Char('v'), Modifiers::CTRL));
        assert_eq!(ed.tree().len(), 3);

        assert!(ed.key_down(Key::Delete, Modifiers::NONE));
        assert_eq!(ed.tree().len(), 1);
        assert!(!ed.key_down(Key::Char('q'), Modifiers::CTRL));
        assert!(!ed.key_down(Key::Char('a'), Modifiers::NONE));
    }
}
