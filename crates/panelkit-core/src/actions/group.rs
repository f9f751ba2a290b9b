use crate::undo::{Action, EditContext};

/// Several actions recorded as one history entry.
#[derive(Debug, Default)]
pub struct ActionGroup {
    name: String,
    actions: Vec<Box<dyn Action>>,
}

impl ActionGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            actions: Vec::new(),
        }
    }

    /// Add an action that has already been performed.
    pub fn push(&mut self, action: Box<dyn Action>) {
        self.actions.push(action);
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl Action for ActionGroup {
    fn name(&self) -> &str {
        &self.name
    }

    fn perform(&mut self, cx: &mut EditContext<'_>) {
        for action in &mut self.actions {
            action.perform(cx);
        }
    }

    fn undo(&mut self, cx: &mut EditContext<'_>) {
        for action in self.actions.iter_mut().rev() {
            action.undo(cx);
        }
    }
}
