use jiff::Timestamp;
use tracing::debug;
use uuid::Uuid;

use parley_core::keys;
use parley_core::models::chat::ProjectChat;
use parley_core::models::message::ProjectMessage;
use parley_core::models::project::{Project, ProjectInstructions};

use crate::error::StorageError;
use crate::objects::S3Objects;
use crate::store::{BoxFuture, ProjectStore};

/// [`ProjectStore`] over JSON documents in S3, laid out per [`keys`].
#[derive(Clone)]
pub struct S3ProjectStore {
    objects: S3Objects,
}

impl S3ProjectStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            objects: S3Objects::new(client, bucket),
        }
    }

    async fn load_all<T: serde::de::DeserializeOwned>(
        &self,
        prefix: &str,
    ) -> Result<Vec<T>, StorageError> {
        let keys = self.objects.list_keys(prefix).await?;

        let mut items = Vec::with_capacity(keys.len());
        for key in &keys {
            // A key listed a moment ago may be gone by now; skip it.
            if let Some(item) = self.objects.get_json(key).await? {
                items.push(item);
            }
        }
        Ok(items)
    }
}

impl ProjectStore for S3ProjectStore {
    fn find_project(
        &self,
        project_id: Uuid,
        owner_id: Uuid,
    ) -> BoxFuture<'_, Result<Option<Project>, StorageError>> {
        Box::pin(async move {
            let project: Option<Project> = self.objects.get_json(&keys::project(project_id)).await?;
            Ok(project.filter(|p| p.is_visible_to(owner_id)))
        })
    }

    fn put_project(&self, project: Project) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            self.objects
                .put_json(&keys::project(project.id), &project)
                .await
        })
    }

    fn find_chat(
        &self,
        chat_id: Uuid,
        project_id: Uuid,
    ) -> BoxFuture<'_, Result<Option<ProjectChat>, StorageError>> {
        Box::pin(async move {
            let chat: Option<ProjectChat> = self
                .objects
                .get_json(&keys::project_chat(project_id, chat_id))
                .await?;
            Ok(chat.filter(|c| c.project_id == project_id && !c.is_deleted()))
        })
    }

    fn put_chat(&self, chat: ProjectChat) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            self.objects
                .put_json(&keys::project_chat(chat.project_id, chat.id), &chat)
                .await
        })
    }

    fn list_chats(
        &self,
        project_id: Uuid,
    ) -> BoxFuture<'_, Result<Vec<ProjectChat>, StorageError>> {
        Box::pin(async move {
            let mut chats: Vec<ProjectChat> = self
                .load_all(&keys::project_chats_prefix(project_id))
                .await?;
            chats.retain(|c| !c.is_deleted());
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
            let key = keys::project_chat(project_id, chat_id);
            let mut chat: ProjectChat = self
                .objects
                .get_json(&key)
                .await?
                .ok_or_else(|| StorageError::NotFound { key: key.clone() })?;
            chat.updated_at = at;
            self.objects.put_json(&key, &chat).await?;
            debug!(chat_id = %chat_id, "chat activity bumped");
            Ok(())
        })
    }

    fn get_instructions(
        &self,
        project_id: Uuid,
    ) -> BoxFuture<'_, Result<Option<ProjectInstructions>, StorageError>> {
        Box::pin(async move {
            self.objects
                .get_json(&keys::project_instructions(project_id))
                .await
        })
    }

    fn put_instructions(
        &self,
        instructions: ProjectInstructions,
    ) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            self.objects
                .put_json(
                    &keys::project_instructions(instructions.project_id),
                    &instructions,
                )
                .await
        })
    }

    fn append_message(&self, message: ProjectMessage) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            let key = keys::chat_message(message.chat_id, message.created_at, message.id);
            self.objects.put_json(&key, &message).await
        })
    }

    fn list_messages(
        &self,
        chat_id: Uuid,
    ) -> BoxFuture<'_, Result<Vec<ProjectMessage>, StorageError>> {
        Box::pin(async move {
            let mut messages: Vec<ProjectMessage> =
                self.load_all(&keys::chat_messages_prefix(chat_id)).await?;
            messages.sort_by(|a, b| a.created_at.cmp(&b.created_at));
            Ok(messages)
        })
    }
}
