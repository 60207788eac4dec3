use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::SessionData;

/// Backing storage for session records. Implementations hand out deep copies;
/// mutations only land through `save`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, id: &str) -> Option<SessionData>;
    async fn save(&self, id: &str, data: SessionData);
    async fn delete(&self, id: &str);
}

/// Process-local session table. Nothing evicts entries; a restart clears it.
#[derive(Default)]
pub struct MemorySessionStore {
    inner: Mutex<HashMap<String, SessionData>>,
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: &str) -> Option<SessionData> {
        self.inner.lock().await.get(id).cloned()
    }

    async fn save(&self, id: &str, data: SessionData) {
        self.inner.lock().await.insert(id.to_string(), data);
    }

    async fn delete(&self, id: &str) {
        self.inner.lock().await.remove(id);
    }
}
