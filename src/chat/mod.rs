pub mod composer;
pub mod menu;
pub mod reconcile;

use uuid::Uuid;

use crate::transcript::{EntryId, Transcript};
use menu::CommandMenu;

/// Observable effect of one state transition, handed to the rendering adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    EntryCreated(EntryId),
    EntryReplaced(EntryId),
    EntryEdited(EntryId),
    EntryRemoved(EntryId),
    EntryConfirmed { provisional: Uuid, id: EntryId },
    CommandsExtended { added: usize },
    MenuToggled { visible: bool },
}

/// Application context: the transcript and the command menu it feeds.
#[derive(Debug, Default)]
pub struct Chat {
    pub transcript: Transcript,
    pub menu: CommandMenu,
}

impl Chat {
    pub fn new(menu: CommandMenu) -> Self {
        Self {
            transcript: Transcript::new(),
            menu,
        }
    }

    pub fn toggle_menu(&mut self) -> Change {
        Change::MenuToggled {
            visible: self.menu.toggle(),
        }
    }
}
