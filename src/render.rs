use std::io::{self, Write};

use tracing::warn;

use crate::chat::{Change, Chat};
use crate::content::keyboard::{Corners, InlineGrid};
use crate::content::poll::{PollView, Selection};
use crate::identity::BotProfile;
use crate::transcript::{Content, EntryId, Origin, TranscriptEntry};

/// Rendering adapter. Receives every state change after it was applied,
/// together with read access to the resulting state.
pub trait Renderer {
    fn render(&mut self, change: &Change, chat: &Chat);

    /// A message for the user that is not part of the transcript.
    fn notice(&mut self, message: &str);

    fn header(&mut self, _profile: &BotProfile) {}
}

/// Line-oriented renderer for a terminal.
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_change(&mut self, change: &Change, chat: &Chat) -> io::Result<()> {
        match change {
            Change::EntryCreated(id) | Change::EntryReplaced(id) | Change::EntryEdited(id) => {
                if let Some(entry) = chat.transcript.get(id) {
                    self.write_entry(entry)?;
                }
            }
            Change::EntryConfirmed { id, .. } => {
                writeln!(self.out, "  ✓ delivered as #{}", id)?;
            }
            Change::EntryRemoved(id) => {
                writeln!(self.out, "[#{} deleted]", id)?;
            }
            Change::CommandsExtended { added } => {
                writeln!(
                    self.out,
                    "({} new command(s), {} to browse)",
                    added,
                    chat.menu.toggle_label()
                )?;
            }
            Change::MenuToggled { visible } => {
                if *visible {
                    for (i, command) in chat.menu.commands().iter().enumerate() {
                        writeln!(
                            self.out,
                            "  #{} /{} - {}",
                            i + 1,
                            command.command,
                            command.description
                        )?;
                    }
                }
                writeln!(self.out, "[{}]", chat.menu.toggle_label())?;
            }
        }
        self.out.flush()
    }

    fn write_entry(&mut self, entry: &TranscriptEntry) -> io::Result<()> {
        let who = match entry.origin {
            Origin::Bot => "bot",
            Origin::User => "you",
        };
        let id = match entry.id {
            EntryId::Confirmed(id) => format!("#{}", id),
            EntryId::Provisional(_) => "sending".to_string(),
        };
        let edited = if entry.edited { " (edited)" } else { "" };
        let time = entry.received_at.format("%H:%M:%S");

        match &entry.content {
            Content::Text(text) => {
                writeln!(self.out, "{} [{} {}] {}{}", time, who, id, text, edited)?;
            }
            Content::Photo { image, caption } => {
                writeln!(
                    self.out,
                    "{} [{} {}] [photo {}, {} bytes]",
                    time,
                    who,
                    id,
                    image.mime(),
                    image.len()
                )?;
                if let Some(caption) = caption {
                    writeln!(self.out, "    {}{}", caption, edited)?;
                } else if entry.edited {
                    writeln!(self.out, "   {}", edited)?;
                }
            }
            Content::Poll(poll) => {
                writeln!(self.out, "{} [{} {}] {}{}", time, who, id, poll.question, edited)?;
                self.write_poll(poll)?;
            }
        }

        if let Some(grid) = &entry.inline_grid {
            self.write_grid(grid)?;
        }
        Ok(())
    }

    fn write_poll(&mut self, poll: &PollView) -> io::Result<()> {
        for control in &poll.controls {
            let picked = poll.is_selected(control.option_id);
            let mark = match (poll.selection, picked) {
                (Selection::Exclusive, true) => "(•)",
                (Selection::Exclusive, false) => "( )",
                (Selection::Independent, true) => "[x]",
                (Selection::Independent, false) => "[ ]",
            };
            writeln!(self.out, "    {} {}", mark, control.label)?;
        }
        Ok(())
    }

    fn write_grid(&mut self, grid: &InlineGrid) -> io::Result<()> {
        for row in grid.rows() {
            let cells: Vec<String> = row
                .iter()
                .map(|button| {
                    let (left, right) = edges(button.corners);
                    format!("{} {} {}", left, button.text, right)
                })
                .collect();
            writeln!(self.out, "    {}", cells.join(" "))?;
        }
        Ok(())
    }
}

/// Bracket glyphs approximating the rounded corners of a button.
fn edges(corners: Corners) -> (char, char) {
    let left = match (corners.top_left, corners.bottom_left) {
        (true, true) => '(',
        (true, false) => '╭',
        (false, true) => '╰',
        (false, false) => '[',
    };
    let right = match (corners.top_right, corners.bottom_right) {
        (true, true) => ')',
        (true, false) => '╮',
        (false, true) => '╯',
        (false, false) => ']',
    };
    (left, right)
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, change: &Change, chat: &Chat) {
        if let Err(e) = self.write_change(change, chat) {
            warn!("Failed to render {:?}: {}", change, e);
        }
    }

    fn notice(&mut self, message: &str) {
        if let Err(e) = writeln!(self.out, "! {}", message).and_then(|_| self.out.flush()) {
            warn!("Failed to print notice: {}", e);
        }
    }

    fn header(&mut self, profile: &BotProfile) {
        let result = writeln!(
            self.out,
            "{} ({})\n{}\n",
            profile.name,
            profile.handle(),
            profile.description
        );
        if let Err(e) = result {
            warn!("Failed to print header: {}", e);
        }
    }
}
