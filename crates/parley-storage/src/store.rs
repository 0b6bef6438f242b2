use std::future::Future;
use std::pin::Pin;

use jiff::Timestamp;
use uuid::Uuid;

use parley_core::models::chat::ProjectChat;
use parley_core::models::message::ProjectMessage;
use parley_core::models::project::{Project, ProjectInstructions};

use crate::error::StorageError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Project, chat, and message persistence.
///
/// Lookups never return soft-deleted rows. Messages are append-only; the
/// only in-place update is the chat's last-activity timestamp, which is
/// last-write-wins.
///
/// Methods return boxed futures for dyn compatibility.
pub trait ProjectStore: Send + Sync {
    /// A project owned by `owner_id`. `None` if missing, foreign, or deleted.
    fn find_project(
        &self,
        project_id: Uuid,
        owner_id: Uuid,
    ) -> BoxFuture<'_, Result<Option<Project>, StorageError>>;

    fn put_project(&self, project: Project) -> BoxFuture<'_, Result<(), StorageError>>;

    /// A chat under `project_id`. `None` if missing, elsewhere, or deleted.
    fn find_chat(
        &self,
        chat_id: Uuid,
        project_id: Uuid,
    ) -> BoxFuture<'_, Result<Option<ProjectChat>, StorageError>>;

    fn put_chat(&self, chat: ProjectChat) -> BoxFuture<'_, Result<(), StorageError>>;

    /// Live chats of a project, most recent activity first.
    fn list_chats(&self, project_id: Uuid)
    -> BoxFuture<'_, Result<Vec<ProjectChat>, StorageError>>;

    /// Bump a chat's `updated_at`.
    fn touch_chat(
        &self,
        project_id: Uuid,
        chat_id: Uuid,
        at: Timestamp,
    ) -> BoxFuture<'_, Result<(), StorageError>>;

    fn get_instructions(
        &self,
        project_id: Uuid,
    ) -> BoxFuture<'_, Result<Option<ProjectInstructions>, StorageError>>;

    /// Insert or replace the project's instructions record.
    fn put_instructions(
        &self,
        instructions: ProjectInstructions,
    ) -> BoxFuture<'_, Result<(), StorageError>>;

    fn append_message(&self, message: ProjectMessage) -> BoxFuture<'_, Result<(), StorageError>>;

    /// Messages of a chat, oldest first.
    fn list_messages(
        &self,
        chat_id: Uuid,
    ) -> BoxFuture<'_, Result<Vec<ProjectMessage>, StorageError>>;
}
