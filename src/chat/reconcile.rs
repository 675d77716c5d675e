use tracing::debug;

use super::{Change, Chat};
use crate::content::keyboard::InlineGrid;
use crate::content::poll::PollView;
use crate::transcript::{EntryId, Insertion, TranscriptEntry};
use crate::update::Update;

impl Chat {
    /// Apply one update. Returns `None` when the update changed nothing
    /// (unknown tag, delete/edit of an entry that is not live).
    pub fn apply(&mut self, update: Update) -> Option<Change> {
        match update {
            Update::Message(message) => {
                // parse_mode is deliberately not interpreted: text stays verbatim.
                let entry = TranscriptEntry::bot_text(message.message_id, message.text)
                    .with_grid(InlineGrid::build(message.inline));
                Some(self.create(entry))
            }
            Update::SetCommands(commands) => {
                let added = self.menu.extend(commands);
                Some(Change::CommandsExtended { added })
            }
            Update::Photo(photo) => {
                let entry = TranscriptEntry::bot_photo(photo.message_id, photo.image, photo.caption)
                    .with_grid(InlineGrid::build(photo.inline));
                Some(self.create(entry))
            }
            Update::DeleteMessage { message_id } => {
                let id = EntryId::Confirmed(message_id);
                match self.transcript.remove(&id) {
                    Some(_) => Some(Change::EntryRemoved(id)),
                    None => {
                        debug!("delete_message for {} ignored: not live", message_id);
                        None
                    }
                }
            }
            Update::EditMessageText { message_id, text } => {
                let id = EntryId::Confirmed(message_id);
                if self.transcript.edit_text(&id, text) {
                    Some(Change::EntryEdited(id))
                } else {
                    debug!("edit_message_text for {} ignored: not live", message_id);
                    None
                }
            }
            Update::Poll(poll) => {
                let view = PollView::build(
                    poll.message_id,
                    poll.question,
                    poll.options,
                    poll.allows_multiple_answers,
                );
                let entry = TranscriptEntry::bot_poll(view).with_grid(InlineGrid::build(poll.inline));
                Some(self.create(entry))
            }
            Update::Unknown => None,
        }
    }

    /// Apply a batch strictly in order, collecting the resulting changes.
    pub fn apply_all(&mut self, updates: impl IntoIterator<Item = Update>) -> Vec<Change> {
        updates
            .into_iter()
            .filter_map(|update| {
                let tag = update.tag();
                let change = self.apply(update);
                debug!("Applied {} update: {:?}", tag, change);
                change
            })
            .collect()
    }

    fn create(&mut self, entry: TranscriptEntry) -> Change {
        let id = entry.id;
        match self.transcript.insert(entry) {
            Insertion::Created => Change::EntryCreated(id),
            Insertion::Replaced => Change::EntryReplaced(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::keyboard::Corners;
    use crate::content::poll::Selection;
    use crate::transcript::{EntryKind, Origin};
    use crate::update::UpdateBatch;
    use serde_json::{json, Value};

    fn decode(value: Value) -> Update {
        Update::decode(value)
    }

    fn apply_json(chat: &mut Chat, value: Value) -> Option<Change> {
        chat.apply(decode(value))
    }

    fn photo_update(id: i64, caption: Option<&str>) -> Value {
        json!({"photo": {"message_id": id, "photo": "aGVsbG8=", "caption": caption}})
    }

    #[test]
    fn test_message_creates_bot_text_entry() {
        let mut chat = Chat::default();
        let change = apply_json(
            &mut chat,
            json!({"message": {"message_id": 7, "text": "*bold*", "parse_mode": "markdown", "inline": []}}),
        );
        assert_eq!(change, Some(Change::EntryCreated(EntryId::Confirmed(7))));

        let entry = chat.transcript.get(&EntryId::Confirmed(7)).unwrap();
        assert_eq!(entry.origin, Origin::Bot);
        assert_eq!(entry.kind(), EntryKind::Text);
        assert_eq!(entry.text(), Some("*bold*"));
        assert!(entry.inline_grid.is_none());
        assert!(!entry.edited);
    }

    #[test]
    fn test_message_grid_attached_with_entry() {
        let mut chat = Chat::default();
        apply_json(
            &mut chat,
            json!({"message": {"message_id": 1, "text": "pick", "inline": [[{"text": "A"}], [{"text": "B"}]]}}),
        );
        let grid = chat.transcript.entries()[0].inline_grid.as_ref().unwrap();
        assert_eq!(grid.labels(), vec![vec!["A"], vec!["B"]]);
        assert_eq!(grid.button(0, 0).unwrap().corners, Corners::TOP);
        assert_eq!(grid.button(1, 0).unwrap().corners, Corners::BOTTOM);
    }

    #[test]
    fn test_photo_with_own_inline_grid() {
        let mut chat = Chat::default();
        apply_json(
            &mut chat,
            json!({"photo": {"message_id": 3, "photo": "aGVsbG8=", "inline": [[{"text": "Like"}]]}}),
        );
        let entry = &chat.transcript.entries()[0];
        assert_eq!(entry.kind(), EntryKind::Photo);
        assert_eq!(entry.caption(), None);
        let grid = entry.inline_grid.as_ref().unwrap();
        assert_eq!(grid.button(0, 0).unwrap().corners, Corners::ALL);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut chat = Chat::default();
        apply_json(&mut chat, json!({"message": {"message_id": 1, "text": "a"}}));
        apply_json(&mut chat, json!({"message": {"message_id": 2, "text": "b"}}));

        let delete = json!({"delete_message": {"message_id": 1}});
        assert_eq!(
            apply_json(&mut chat, delete.clone()),
            Some(Change::EntryRemoved(EntryId::Confirmed(1)))
        );
        let once: Vec<_> = chat.transcript.iter().map(|e| e.id).collect();
        assert_eq!(apply_json(&mut chat, delete), None);
        let twice: Vec<_> = chat.transcript.iter().map(|e| e.id).collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_edit_photo_caption() {
        let mut chat = Chat::default();
        apply_json(&mut chat, photo_update(42, Some("A")));
        let change = apply_json(
            &mut chat,
            json!({"edit_message_text": {"message_id": 42, "text": "B"}}),
        );
        assert_eq!(change, Some(Change::EntryEdited(EntryId::Confirmed(42))));

        let entry = chat.transcript.get(&EntryId::Confirmed(42)).unwrap();
        assert_eq!(entry.caption(), Some("B"));
        assert_eq!(entry.text(), None);
        assert!(entry.edited);
    }

    #[test]
    fn test_edit_text_and_missing_target() {
        let mut chat = Chat::default();
        apply_json(&mut chat, json!({"message": {"message_id": 5, "text": "before"}}));
        apply_json(&mut chat, json!({"edit_message_text": {"message_id": 5, "text": "after"}}));
        assert_eq!(chat.transcript.entries()[0].text(), Some("after"));

        let change = apply_json(&mut chat, json!({"edit_message_text": {"message_id": 99, "text": "x"}}));
        assert_eq!(change, None);
        assert_eq!(chat.transcript.len(), 1);
    }

    #[test]
    fn test_edited_marker_never_cleared() {
        let mut chat = Chat::default();
        apply_json(&mut chat, json!({"message": {"message_id": 5, "text": "v1"}}));
        apply_json(&mut chat, json!({"edit_message_text": {"message_id": 5, "text": "v2"}}));
        apply_json(&mut chat, json!({"edit_message_text": {"message_id": 5, "text": "v3"}}));
        let entry = &chat.transcript.entries()[0];
        assert!(entry.edited);
        assert_eq!(entry.text(), Some("v3"));
    }

    #[test]
    fn test_set_commands_accumulate_in_order() {
        let mut chat = Chat::default();
        apply_json(&mut chat, json!({"set_commands": [{"command": "start", "description": "Start"}]}));
        let change = apply_json(&mut chat, json!({"set_commands": [{"command": "help", "description": "Help"}]}));
        assert_eq!(change, Some(Change::CommandsExtended { added: 1 }));

        let names: Vec<_> = chat.menu.commands().iter().map(|c| c.command.as_str()).collect();
        assert_eq!(names, vec!["start", "help"]);
        assert!(chat.transcript.is_empty());
    }

    #[test]
    fn test_poll_exclusive_and_multiple() {
        let mut chat = Chat::default();
        apply_json(
            &mut chat,
            json!({"poll": {"message_id": 20, "question": "Q", "options": [{"text": "Yes"}, {"text": "No"}], "allows_multiple_answers": false}}),
        );
        apply_json(
            &mut chat,
            json!({"poll": {"message_id": 21, "question": "Q", "options": [{"text": "Yes"}, {"text": "No"}], "allows_multiple_answers": true, "inline": [[{"text": "Vote"}, {"text": "Skip"}]]}}),
        );

        let single = match &chat.transcript.entries()[0].content {
            crate::transcript::Content::Poll(poll) => poll.clone(),
            other => panic!("unexpected content: {:?}", other),
        };
        assert_eq!(single.selection, Selection::Exclusive);
        assert_eq!(single.controls[0].group, single.controls[1].group);

        let multi_entry = &chat.transcript.entries()[1];
        let multi = match &multi_entry.content {
            crate::transcript::Content::Poll(poll) => poll,
            other => panic!("unexpected content: {:?}", other),
        };
        assert_eq!(multi.selection, Selection::Independent);
        assert_ne!(multi.controls[0].group, multi.controls[1].group);
        assert_eq!(multi_entry.inline_grid.as_ref().unwrap().labels(), vec![vec!["Vote", "Skip"]]);
    }

    #[test]
    fn test_unknown_tag_changes_nothing() {
        let mut chat = Chat::default();
        apply_json(&mut chat, json!({"message": {"message_id": 1, "text": "a"}}));
        apply_json(&mut chat, json!({"set_commands": [{"command": "start", "description": ""}]}));

        assert_eq!(apply_json(&mut chat, json!({"sticker": {"message_id": 2}})), None);
        assert_eq!(apply_json(&mut chat, json!({})), None);
        assert_eq!(chat.transcript.len(), 1);
        assert_eq!(chat.menu.commands().len(), 1);
    }

    #[test]
    fn test_duplicate_creation_keeps_single_entry() {
        let mut chat = Chat::default();
        let message = json!({"message": {"message_id": 8, "text": "once"}});
        apply_json(&mut chat, message.clone());
        assert_eq!(
            apply_json(&mut chat, message),
            Some(Change::EntryReplaced(EntryId::Confirmed(8)))
        );
        apply_json(&mut chat, photo_update(8, None));

        let live = chat
            .transcript
            .iter()
            .filter(|e| e.id == EntryId::Confirmed(8))
            .count();
        assert_eq!(live, 1);
        assert_eq!(chat.transcript.entries()[0].kind(), EntryKind::Photo);
    }

    #[test]
    fn test_end_to_end_batches() {
        let mut chat = Chat::default();
        let first: UpdateBatch = serde_json::from_value(json!({
            "updates": [{"message": {"message_id": 7, "text": "Hi", "inline": []}}]
        }))
        .unwrap();
        chat.apply_all(first.into_updates());
        assert_eq!(chat.transcript.len(), 1);
        let entry = &chat.transcript.entries()[0];
        assert_eq!(entry.id, EntryId::Confirmed(7));
        assert_eq!(entry.origin, Origin::Bot);
        assert!(entry.inline_grid.is_none());

        let second: UpdateBatch = serde_json::from_value(json!({
            "updates": [{"delete_message": {"message_id": 7}}]
        }))
        .unwrap();
        let changes = chat.apply_all(second.into_updates());
        assert_eq!(changes, vec![Change::EntryRemoved(EntryId::Confirmed(7))]);
        assert!(chat.transcript.is_empty());
    }

    #[test]
    fn test_batch_applies_in_array_order() {
        let mut chat = Chat::default();
        let batch = UpdateBatch::from_values(vec![
            json!({"message": {"message_id": 1, "text": "a"}}),
            json!({"edit_message_text": {"message_id": 1, "text": "b"}}),
            json!({"delete_message": {"message_id": 1}}),
            json!({"message": {"message_id": 1, "text": "c"}}),
        ]);
        let changes = chat.apply_all(batch.into_updates());
        assert_eq!(
            changes,
            vec![
                Change::EntryCreated(EntryId::Confirmed(1)),
                Change::EntryEdited(EntryId::Confirmed(1)),
                Change::EntryRemoved(EntryId::Confirmed(1)),
                Change::EntryCreated(EntryId::Confirmed(1)),
            ]
        );
        let entry = &chat.transcript.entries()[0];
        assert_eq!(entry.text(), Some("c"));
        assert!(!entry.edited);
    }
}
