//! In-process [`ProjectStore`].
//!
//! Used when no bucket is configured and as the store in tests. Same
//! visibility rules as the S3 store: soft-deleted and foreign rows are
//! invisible to lookups.

use std::collections::HashMap;

use jiff::Timestamp;
use tokio::sync::RwLock;
use uuid::Uuid;

use parley_core::keys;
use parley_core::models::chat::ProjectChat;
use parley_core::models::message::ProjectMessage;
use parley_core::models::project::{Project, ProjectInstructions};

use crate::error::StorageError;
use crate::store::{BoxFuture, ProjectStore};

#[derive(Default)]
struct Tables {
    projects: HashMap<Uuid, Project>,
    chats: HashMap<Uuid, ProjectChat>,
    instructions: HashMap<Uuid, ProjectInstructions>,
    messages: HashMap<Uuid, Vec<ProjectMessage>>,
}

#[derive(Default)]
pub struct MemoryProjectStore {
    tables: RwLock<Tables>,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProjectStore for MemoryProjectStore {
    fn find_project(
        &self,
        project_id: Uuid,
        owner_id: Uuid,
    ) -> BoxFuture<'_, Result<Option<Project>, StorageError>> {
        Box::pin(async move {
            let tables = self.tables.read().await;
            Ok(tables
                .projects
                .get(&project_id)
                .filter(|p| p.is_visible_to(owner_id))
                .cloned())
        })
    }

    fn put_project(&self, project: Project) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            self.tables.write().await.projects.insert(project.id, project);
            Ok(())
        })
    }

    fn find_chat(
        &self,
        chat_id: Uuid,
        project_id: Uuid,
    ) -> BoxFuture<'_, Result<Option<ProjectChat>, StorageError>> {
        Box::pin(async move {
            let tables = self.tables.read().await;
            Ok(tables
                .chats
                .get(&chat_id)
                .filter(|c| c.project_id == project_id && !c.is_deleted())
                .cloned())
        })
    }

    fn put_chat(&self, chat: ProjectChat) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            self.tables.write().await.chats.insert(chat.id, chat);
            Ok(())
        })
    }

    fn list_chats(
        &self,
        project_id: Uuid,
    ) -> BoxFuture<'_, Result<Vec<ProjectChat>, StorageError>> {
        Box::pin(async move {
            let tables = self.tables.read().await;
            let mut chats: Vec<ProjectChat> = tables
                .chats
                .values()
                .filter(|c| c.project_id == project_id && !c.is_deleted())
                .cloned()
                .collect();
            chats.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
            Ok(chats)
        })
    }

    fn touch_chat(
        &self,
        project_id: Uuid,
        chat_id: Uuid,
        at: Timestamp,
    ) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            let mut tables = self.tables.write().await;
            match tables.chats.get_mut(&chat_id) {
                Some(chat) if chat.project_id == project_id => {
                    chat.updated_at = at;
                    Ok(())
                }
                _ => Err(StorageError::NotFound {
                    key: keys::project_chat(project_id, chat_id),
                }),
            }
        })
    }

    fn get_instructions(
        &self,
        project_id: Uuid,
    ) -> BoxFuture<'_, Result<Option<ProjectInstructions>, StorageError>> {
        Box::pin(async move {
            Ok(self
                .tables
                .read()
                .await
                .instructions
                .get(&project_id)
                .cloned())
        })
    }

    fn put_instructions(
        &self,
        instructions: ProjectInstructions,
    ) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            self.tables
                .write()
                .await
                .instructions
                .insert(instructions.project_id, instructions);
            Ok(())
        })
    }

    fn append_message(&self, message: ProjectMessage) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            self.tables
                .write()
                .await
                .messages
                .entry(message.chat_id)
                .or_default()
                .push(message);
            Ok(())
        })
    }

    fn list_messages(
        &self,
        chat_id: Uuid,
    ) -> BoxFuture<'_, Result<Vec<ProjectMessage>, StorageError>> {
        Box::pin(async move {
            let mut messages = self
                .tables
                .read()
                .await
                .messages
                .get(&chat_id)
                .cloned()
                .unwrap_or_default();
            messages.sort_by(|a, b| a.created_at.cmp(&b.created_at));
            Ok(messages)
        })
    }
}
