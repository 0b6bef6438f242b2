//! Fakes and fixtures shared by the turn tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use jiff::Timestamp;
use serde_json::{Value, json};
use uuid::Uuid;

use parley_chat::turn::ChatDeps;
use parley_core::keys;
use parley_core::models::chat::ProjectChat;
use parley_core::models::message::ProjectMessage;
use parley_core::models::project::{Project, ProjectInstructions};
use parley_openai::BoxFuture;
use parley_openai::completion::{CompletionApi, CompletionRequest, RawModelOutput};
use parley_openai::error::OpenAiError;
use parley_openai::image::{FetchedImage, GeneratedImage, ImageApi, ImageFetcher, ImageRequest};
use parley_storage::error::StorageError;
use parley_storage::memory::MemoryProjectStore;
use parley_storage::store::{self, ProjectStore};

pub struct FakeCompletion {
    reply: Option<RawModelOutput>,
    pub calls: AtomicUsize,
    pub last_request: Mutex<Option<CompletionRequest>>,
}

impl FakeCompletion {
    pub fn replying(reply: RawModelOutput) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    pub fn text(text: &str) -> Arc<Self> {
        Self::replying(RawModelOutput {
            text: text.to_string(),
            ..Default::default()
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> CompletionRequest {
        self.last_request.lock().unwrap().clone().unwrap()
    }
}

impl CompletionApi for FakeCompletion {
    fn complete(
        &self,
        request: CompletionRequest,
    ) -> BoxFuture<'_, Result<RawModelOutput, OpenAiError>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request);
            self.reply.clone().ok_or_else(|| OpenAiError::Status {
                status: 500,
                body: "model unavailable".to_string(),
            })
        })
    }
}

pub struct FakeImages {
    result: Option<GeneratedImage>,
    pub calls: AtomicUsize,
    pub last_request: Mutex<Option<ImageRequest>>,
}

impl FakeImages {
    pub fn returning(result: GeneratedImage) -> Arc<Self> {
        Arc::new(Self {
            result: Some(result),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            result: None,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> ImageRequest {
        self.last_request.lock().unwrap().clone().unwrap()
    }
}

impl ImageApi for FakeImages {
    fn generate(
        &self,
        request: ImageRequest,
    ) -> BoxFuture<'_, Result<GeneratedImage, OpenAiError>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request);
            self.result
                .clone()
                .ok_or_else(|| OpenAiError::Transport("connection reset".to_string()))
        })
    }
}

pub struct FakeFetcher {
    result: Option<FetchedImage>,
    pub calls: AtomicUsize,
}

impl FakeFetcher {
    pub fn returning(content_type: &str, bytes: &[u8]) -> Arc<Self> {
        Arc::new(Self {
            result: Some(FetchedImage {
                content_type: content_type.to_string(),
                bytes: bytes.to_vec(),
            }),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            result: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ImageFetcher for FakeFetcher {
    fn fetch(&self, url: String) -> BoxFuture<'_, Result<FetchedImage, OpenAiError>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone().ok_or_else(|| OpenAiError::Status {
                status: 403,
                body: format!("image download failed for {url}"),
            })
        })
    }
}

/// Memory store whose writes can be switched off.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryProjectStore,
    writes_rejected: AtomicBool,
    touch_rejected: AtomicBool,
}

impl FlakyStore {
    /// Fail every message append and chat touch.
    pub fn reject_writes(&self) {
        self.writes_rejected.store(true, Ordering::SeqCst);
    }

    /// Fail only the chat touch; message appends still land.
    pub fn reject_touch(&self) {
        self.touch_rejected.store(true, Ordering::SeqCst);
    }

    fn check(&self, key: String, rejected: bool) -> Result<(), StorageError> {
        if rejected || self.writes_rejected.load(Ordering::SeqCst) {
            Err(StorageError::Write {
                key,
                message: "store is read-only".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

impl ProjectStore for FlakyStore {
    fn find_project(
        &self,
        project_id: Uuid,
        owner_id: Uuid,
    ) -> store::BoxFuture<'_, Result<Option<Project>, StorageError>> {
        self.inner.find_project(project_id, owner_id)
    }

    fn put_project(&self, project: Project) -> store::BoxFuture<'_, Result<(), StorageError>> {
        self.inner.put_project(project)
    }

    fn find_chat(
        &self,
        chat_id: Uuid,
        project_id: Uuid,
    ) -> store::BoxFuture<'_, Result<Option<ProjectChat>, StorageError>> {
        self.inner.find_chat(chat_id, project_id)
    }

    fn put_chat(&self, chat: ProjectChat) -> store::BoxFuture<'_, Result<(), StorageError>> {
        self.inner.put_chat(chat)
    }

    fn list_chats(
        &self,
        project_id: Uuid,
    ) -> store::BoxFuture<'_, Result<Vec<ProjectChat>, StorageError>> {
        self.inner.list_chats(project_id)
    }

    fn touch_chat(
        &self,
        project_id: Uuid,
        chat_id: Uuid,
        at: Timestamp,
    ) -> store::BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            let rejected = self.touch_rejected.load(Ordering::SeqCst);
            self.check(keys::project_chat(project_id, chat_id), rejected)?;
            self.inner.touch_chat(project_id, chat_id, at).await
        })
    }

    fn get_instructions(
        &self,
        project_id: Uuid,
    ) -> store::BoxFuture<'_, Result<Option<ProjectInstructions>, StorageError>> {
        self.inner.get_instructions(project_id)
    }

    fn put_instructions(
        &self,
        instructions: ProjectInstructions,
    ) -> store::BoxFuture<'_, Result<(), StorageError>> {
        self.inner.put_instructions(instructions)
    }

    fn append_message(
        &self,
        message: ProjectMessage,
    ) -> store::BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            let key = keys::chat_message(message.chat_id, message.created_at, message.id);
            self.check(key, false)?;
            self.inner.append_message(message).await
        })
    }

    fn list_messages(
        &self,
        chat_id: Uuid,
    ) -> store::BoxFuture<'_, Result<Vec<ProjectMessage>, StorageError>> {
        self.inner.list_messages(chat_id)
    }
}

/// A project owned by `owner` with one chat, plus ids for building requests.
pub struct Fixture {
    pub store: Arc<FlakyStore>,
    pub owner: Uuid,
    pub project: Project,
    pub chat: ProjectChat,
}

impl Fixture {
    pub async fn new() -> Self {
        Self::with_index(None).await
    }

    pub async fn with_index(vector_store_id: Option<&str>) -> Self {
        let store = Arc::new(FlakyStore::default());
        let owner = Uuid::new_v4();
        let now = Timestamp::now();

        let project = Project {
            id: Uuid::new_v4(),
            owner_id: owner,
            name: "Atlas".to_string(),
            description: None,
            vector_store_id: vector_store_id.map(str::to_string),
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        store.put_project(project.clone()).await.unwrap();

        let mut chat = ProjectChat::new(project.id, "Launch plan", owner);
        chat.updated_at = now - jiff::SignedDuration::from_secs(3600);
        store.put_chat(chat.clone()).await.unwrap();

        Self {
            store,
            owner,
            project,
            chat,
        }
    }

    pub async fn set_instructions(&self, text: &str) {
        self.store
            .put_instructions(ProjectInstructions {
                project_id: self.project.id,
                instructions: Some(text.to_string()),
                updated_at: Timestamp::now(),
                updated_by: Some(self.owner),
            })
            .await
            .unwrap();
    }

    pub fn deps(
        &self,
        completion: Arc<FakeCompletion>,
        images: Arc<FakeImages>,
        fetcher: Arc<FakeFetcher>,
    ) -> ChatDeps {
        ChatDeps {
            store: self.store.clone(),
            completion,
            images,
            fetcher,
        }
    }

    /// A request with history `[user "hi", assistant "hello", user <current>]`.
    pub fn request(&self, current: &str, web_search: bool) -> Value {
        json!({
            "projectId": self.project.id.to_string(),
            "chatId": self.chat.id.to_string(),
            "callerId": self.owner.to_string(),
            "messages": [
                { "role": "user", "content": "hi" },
                { "role": "assistant", "content": "hello" },
                { "role": "user", "content": current }
            ],
            "webSearch": web_search
        })
    }

    pub async fn stored_messages(&self) -> Vec<ProjectMessage> {
        self.store.list_messages(self.chat.id).await.unwrap()
    }

    pub async fn chat_updated_at(&self) -> Timestamp {
        self.store
            .find_chat(self.chat.id, self.project.id)
            .await
            .unwrap()
            .unwrap()
            .updated_at
    }
}
