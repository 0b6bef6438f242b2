//! Object key conventions.
//!
//! Pure string functions with no AWS SDK dependency. These define the canonical
//! layout of Parley objects in the backing bucket.

use uuid::Uuid;

pub fn project(id: Uuid) -> String {
    format!("projects/{id}.json")
}

pub fn project_instructions(id: Uuid) -> String {
    format!("projects/{id}/instructions.json")
}

pub fn project_chats_prefix(project_id: Uuid) -> String {
    format!("projects/{project_id}/chats/")
}

/// Chats live under their project, so a lookup by (chat, project) can only
/// ever find a chat that belongs to that project.
pub fn project_chat(project_id: Uuid, chat_id: Uuid) -> String {
    format!("projects/{project_id}/chats/{chat_id}.json")
}

pub fn chat_messages_prefix(chat_id: Uuid) -> String {
    format!("chats/{chat_id}/messages/")
}

/// Message keys sort lexicographically by creation time.
pub fn chat_message(chat_id: Uuid, created_at: jiff::Timestamp, message_id: Uuid) -> String {
    format!(
        "chats/{chat_id}/messages/{:020}-{message_id}.json",
        created_at.as_nanosecond().max(0)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_keys_sort_by_creation_time() {
        let chat = Uuid::new_v4();
        let early = jiff::Timestamp::from_second(1_700_000_000).unwrap();
        let late = jiff::Timestamp::from_second(1_800_000_000).unwrap();

        // Timestamp prefix dominates the id suffix.
        let a = chat_message(chat, early, Uuid::max());
        let b = chat_message(chat, late, Uuid::nil());
        assert!(a < b);
        assert!(a.starts_with(&chat_messages_prefix(chat)));
    }

    #[test]
    fn chat_key_is_scoped_to_project() {
        let project_id = Uuid::new_v4();
        let chat_id = Uuid::new_v4();
        assert!(project_chat(project_id, chat_id).starts_with(&project_chats_prefix(project_id)));
    }
}
