use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

#[cfg(feature = "rig")]
use rig::completion::Message;

/// Who authored a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageRole {
    User,
    Assistant,
}

/// A chat turn that can live inside a [`Context`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializableMessage {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl SerializableMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// Context for sharing data between tasks in a graph execution.
///
/// Besides the key/value store, a context owns the conversation transcript of
/// the run. Clones share both, so every task of one session sees the turns the
/// previous tasks appended.
#[derive(Clone, Debug)]
pub struct Context {
    data: Arc<DashMap<String, Value>>,
    chat_history: Arc<RwLock<Vec<SerializableMessage>>>,
}

impl Context {
    pub fn new() -> Self {
        Self {
            data: Arc::new(DashMap::new()),
            chat_history: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn set(&self, key: impl Into<String>, value: impl serde::Serialize) {
        let value = serde_json::to_value(value).expect("Failed to serialize value");
        self.data.insert(key.into(), value);
    }

    pub async fn get<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get_sync(key)
    }

    /// Non-async variant of [`Context::get`], handy inside edge conditions
    pub fn get_sync<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.data
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub async fn add_user_message(&self, content: impl Into<String>) {
        self.push_message(SerializableMessage::user(content)).await;
    }

    pub async fn add_assistant_message(&self, content: impl Into<String>) {
        self.push_message(SerializableMessage::assistant(content)).await;
    }

    async fn push_message(&self, message: SerializableMessage) {
        self.chat_history.write().await.push(message);
    }

    pub async fn get_all_messages(&self) -> Vec<SerializableMessage> {
        self.chat_history.read().await.clone()
    }

    pub async fn chat_history_len(&self) -> usize {
        self.chat_history.read().await.len()
    }

    /// Full transcript in the message format `rig` agents accept
    #[cfg(feature = "rig")]
    pub async fn get_rig_messages(&self) -> Vec<Message> {
        self.chat_history
            .read()
            .await
            .iter()
            .map(to_rig_message)
            .collect()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "rig")]
fn to_rig_message(msg: &SerializableMessage) -> Message {
    match msg.role {
        MessageRole::User => Message::user(msg.content.clone()),
        MessageRole::Assistant => Message::assistant(msg.content.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn values_round_trip_through_context() {
        let context = Context::new();
        context.set("count", 3u32).await;

        assert_eq!(context.get::<u32>("count").await, Some(3));
        assert_eq!(context.get::<String>("count").await, None);
        assert_eq!(context.get_sync::<u32>("count"), Some(3));
        assert_eq!(context.get_sync::<u32>("missing"), None);
    }

    #[tokio::test]
    async fn clones_share_the_transcript() {
        let context = Context::new();
        let clone = context.clone();

        context.add_user_message("first question").await;
        clone.add_assistant_message("first answer").await;

        let messages = context.get_all_messages().await;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[1].content, "first answer");
        assert_eq!(clone.chat_history_len().await, 2);
    }
}
