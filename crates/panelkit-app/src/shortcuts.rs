//! Keyboard shortcut registry and documentation.

use panelkit_core::{Key, Modifiers};

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+D").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    /// The key event an editor receives for this shortcut.
    pub fn key_event(&self) -> Option<(Key, Modifiers)> {
        let key = Key::from_name(self.key)?;
        let modifiers = Modifiers {
            ctrl: self.ctrl,
            shift: self.shift,
            ..Modifiers::NONE
        };
        Some((key, modifiers))
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("A", true, false, "Select all views"),
            Shortcut::new("Z", true, false, "Undo"),
            Shortcut::new("Z", true, true, "Redo"),
            Shortcut::new("Y", true, false, "Redo"),
            Shortcut::new("D", true, false, "Duplicate selected views"),
            Shortcut::new("C", true, false, "Copy views"),
            Shortcut::new("X", true, false, "Cut views"),
            Shortcut::new("V", true, false, "Paste views"),
            Shortcut::new("Delete", false, false, "Delete selected views"),
            Shortcut::new("Backspace", false, false, "Delete selected views"),
            Shortcut::new("ArrowLeft", false, false, "Nudge left"),
            Shortcut::new("ArrowRight", false, false, "Nudge right"),
            Shortcut::new("ArrowUp", false, false, "Nudge up"),
            Shortcut::new("ArrowDown", false, false, "Nudge down"),
            Shortcut::new("ArrowLeft", false, true, "Nudge left by one grid step"),
            Shortcut::new("ArrowRight", false, true, "Nudge right by one grid step"),
            Shortcut::new("ArrowUp", false, true, "Nudge up by one grid step"),
            Shortcut::new("ArrowDown", false, true, "Nudge down by one grid step"),
            Shortcut::new("Enter", false, false, "Commit attribute edit"),
            Shortcut::new("Escape", false, false, "Cancel current edit, gesture or drop"),
        ]
    }

    /// The shortcut matching a key event, if any.
    pub fn find(key: Key, modifiers: Modifiers) -> Option<Shortcut> {
        Self::all().into_iter().find(|s| {
            s.key_event()
                .is_some_and(|(k, m)| k == key && m.command() == modifiers.command() && m.shift == modifiers.shift)
        })
    }

    /// Print all shortcuts to console.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:20} {}", shortcut.format(), shortcut.description);
        }
        println!();
    }
}
