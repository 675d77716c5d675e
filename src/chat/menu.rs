use crate::config::MenuConfig;
use crate::update::CommandDescriptor;

/// Side menu of bot commands. The list only ever grows.
#[derive(Debug, Clone, Default)]
pub struct CommandMenu {
    commands: Vec<CommandDescriptor>,
    visible: bool,
    labels: MenuConfig,
}

impl CommandMenu {
    pub fn new(labels: MenuConfig) -> Self {
        Self {
            commands: Vec::new(),
            visible: false,
            labels,
        }
    }

    /// Append commands in arrival order. Duplicates are kept.
    pub fn extend(&mut self, commands: impl IntoIterator<Item = CommandDescriptor>) -> usize {
        let before = self.commands.len();
        self.commands.extend(commands);
        self.commands.len() - before
    }

    pub fn commands(&self) -> &[CommandDescriptor] {
        &self.commands
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Flip visibility and return the new state.
    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Label of the toggle button for the current state.
    pub fn toggle_label(&self) -> &str {
        if self.visible {
            &self.labels.shown_label
        } else {
            &self.labels.hidden_label
        }
    }

    /// Pick the command at `index`: hides the menu and returns the text to
    /// send on the user's behalf.
    pub fn select(&mut self, index: usize) -> Option<String> {
        let text = self
            .commands
            .get(index)
            .map(|c| format!("/{}", c.command))?;
        self.hide();
        Some(text)
    }
}
