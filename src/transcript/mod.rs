pub mod entry;

use tracing::{debug, warn};
use uuid::Uuid;

pub use entry::{Content, EntryId, EntryKind, Origin, TranscriptEntry};

/// Result of inserting an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    Created,
    /// An entry with the same id was live and was replaced in place.
    Replaced,
}

/// Result of binding a server id to a provisional entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// No provisional entry with that id is live.
    Unknown,
    Bound,
    /// A stale entry already holding the server id was removed first.
    Displaced(EntryId),
}

/// Ordered store of live entries. At most one entry per id.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, id: &EntryId) -> Option<usize> {
        self.entries.iter().position(|e| &e.id == id)
    }

    /// Append an entry, or replace the live entry with the same id in place.
    pub fn insert(&mut self, entry: TranscriptEntry) -> Insertion {
        match self.position(&entry.id) {
            Some(pos) => {
                debug!("Replacing live entry {}", entry.id);
                self.entries[pos] = entry;
                Insertion::Replaced
            }
            None => {
                self.entries.push(entry);
                Insertion::Created
            }
        }
    }

    pub fn remove(&mut self, id: &EntryId) -> Option<TranscriptEntry> {
        let pos = self.position(id)?;
        Some(self.entries.remove(pos))
    }

    /// Apply an edit to the entry with this id. Returns false if it is not live.
    pub fn edit_text(&mut self, id: &EntryId, text: impl Into<String>) -> bool {
        match self.get_mut(id) {
            Some(entry) => {
                entry.apply_edit(text);
                true
            }
            None => false,
        }
    }

    /// Bind the server-assigned id to a provisional entry. A stale entry
    /// already holding that id is dropped first and reported back.
    pub fn confirm(&mut self, provisional: Uuid, message_id: i64) -> Confirmation {
        let local = EntryId::Provisional(provisional);
        let confirmed = EntryId::Confirmed(message_id);

        if !self.contains(&local) {
            return Confirmation::Unknown;
        }
        let outcome = match self.remove(&confirmed) {
            Some(_) => {
                warn!(
                    "Entry {} was already live; replacing it with the local echo",
                    message_id
                );
                Confirmation::Displaced(confirmed)
            }
            None => Confirmation::Bound,
        };

        match self.get_mut(&local) {
            Some(entry) => {
                entry.id = confirmed;
                outcome
            }
            None => Confirmation::Unknown,
        }
    }

    pub fn get(&self, id: &EntryId) -> Option<&TranscriptEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    pub fn get_mut(&mut self, id: &EntryId) -> Option<&mut TranscriptEntry> {
        self.entries.iter_mut().find(|e| &e.id == id)
    }

    pub fn contains(&self, id: &EntryId) -> bool {
        self.position(id).is_some()
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &TranscriptEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_transcript(ids: &[i64]) -> Transcript {
        let mut transcript = Transcript::new();
        for id in ids {
            transcript.insert(TranscriptEntry::bot_text(*id, format!("msg {}", id)));
        }
        transcript
    }

    #[test]
    fn test_insert_keeps_order() {
        let transcript = make_transcript(&[3, 1, 2]);
        let ids: Vec<_> = transcript.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![EntryId::Confirmed(3), EntryId::Confirmed(1), EntryId::Confirmed(2)]);
    }

    #[test]
    fn test_insert_same_id_replaces_in_place() {
        let mut transcript = make_transcript(&[1, 2, 3]);
        let outcome = transcript.insert(TranscriptEntry::bot_text(2, "again"));
        assert_eq!(outcome, Insertion::Replaced);
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript.entries()[1].text(), Some("again"));
    }

    #[test]
    fn test_remove_twice() {
        let mut transcript = make_transcript(&[1, 2]);
        assert!(transcript.remove(&EntryId::Confirmed(1)).is_some());
        assert!(transcript.remove(&EntryId::Confirmed(1)).is_none());
        assert_eq!(transcript.len(), 1);
    }

    #[test]
    fn test_edit_missing_entry() {
        let mut transcript = make_transcript(&[1]);
        assert!(!transcript.edit_text(&EntryId::Confirmed(9), "nope"));
        assert!(!transcript.entries()[0].edited);
    }

    #[test]
    fn test_confirm_binds_server_id() {
        let mut transcript = Transcript::new();
        let uuid = Uuid::new_v4();
        transcript.insert(TranscriptEntry::user_text(uuid, "hello"));

        assert_eq!(transcript.confirm(uuid, 15), Confirmation::Bound);
        assert!(transcript.contains(&EntryId::Confirmed(15)));
        assert!(!transcript.contains(&EntryId::Provisional(uuid)));
        assert_eq!(transcript.confirm(uuid, 16), Confirmation::Unknown);
    }

    #[test]
    fn test_confirm_drops_stale_duplicate() {
        let mut transcript = make_transcript(&[15]);
        let uuid = Uuid::new_v4();
        transcript.insert(TranscriptEntry::user_text(uuid, "mine"));

        assert_eq!(
            transcript.confirm(uuid, 15),
            Confirmation::Displaced(EntryId::Confirmed(15))
        );
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.entries()[0].text(), Some("mine"));
    }
}
