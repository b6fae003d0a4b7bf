//! Session Store
//!
//! Opaque bearer tokens mapped to authenticated users. The store is an
//! injected abstraction with explicit expiry; the order workflow and the
//! HTTP layer only see the [`SessionStore`] trait, never the map behind it.

use async_trait::async_trait;
use dashmap::DashMap;
use shared::models::Role;

/// 当前用户上下文
///
/// 由认证中间件（或提取器）从会话创建，注入到请求处理函数
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

/// A logged-in session. `expires_at` is a UTC millisecond deadline.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    pub expires_at: i64,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= shared::util::now_millis()
    }
}

impl From<&Session> for CurrentUser {
    fn from(session: &Session) -> Self {
        Self {
            id: session.user_id,
            username: session.username.clone(),
            role: session.role,
        }
    }
}

/// Outcome of a token lookup. Expired is reported separately from missing so
/// the HTTP layer can answer "session expired" instead of a generic 401.
#[derive(Debug)]
pub enum SessionLookup {
    Found(Session),
    Expired,
    Missing,
}

/// Generate an opaque session token: 32 random bytes, hex-encoded.
pub fn new_token() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Session storage abstraction (get/set/delete with explicit expiry).
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, token: String, session: Session);
    async fn get(&self, token: &str) -> SessionLookup;
    async fn remove(&self, token: &str);
    /// Drop every expired entry. Called opportunistically; `get` already
    /// evicts the entry it touches.
    async fn purge_expired(&self);
}

/// In-memory implementation backed by a concurrent map.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: DashMap<String, Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn insert(&self, token: String, session: Session) {
        self.entries.insert(token, session);
    }

    async fn get(&self, token: &str) -> SessionLookup {
        // The guard must be dropped before removing the key.
        let expired = match self.entries.get(token) {
            Some(session) if !session.is_expired() => return SessionLookup::Found(session.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove(token);
            return SessionLookup::Expired;
        }
        SessionLookup::Missing
    }

    async fn remove(&self, token: &str) {
        self.entries.remove(token);
    }

    async fn purge_expired(&self) {
        self.entries.retain(|_, session| !session.is_expired());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(expires_at: i64) -> Session {
        Session {
            user_id: 1,
            username: "alice".into(),
            role: Role::Customer,
            expires_at,
        }
    }

    #[tokio::test]
    async fn live_session_is_found() {
        let store = MemorySessionStore::new();
        let token = new_token();
        store
            .insert(token.clone(), session(shared::util::now_millis() + 60_000))
            .await;
        assert!(matches!(store.get(&token).await, SessionLookup::Found(_)));
    }

    #[tokio::test]
    async fn expired_session_is_reported_and_evicted() {
        let store = MemorySessionStore::new();
        let token = new_token();
        store
            .insert(token.clone(), session(shared::util::now_millis() - 1))
            .await;
        assert!(matches!(store.get(&token).await, SessionLookup::Expired));
        // second lookup no longer sees the entry at all
        assert!(matches!(store.get(&token).await, SessionLookup::Missing));
    }

    #[tokio::test]
    async fn remove_revokes() {
        let store = MemorySessionStore::new();
        let token = new_token();
        store
            .insert(token.clone(), session(shared::util::now_millis() + 60_000))
            .await;
        store.remove(&token).await;
        assert!(matches!(store.get(&token).await, SessionLookup::Missing));
    }

    #[tokio::test]
    async fn purge_drops_only_expired() {
        let store = MemorySessionStore::new();
        store
            .insert("dead".into(), session(shared::util::now_millis() - 1))
            .await;
        store
            .insert("live".into(), session(shared::util::now_millis() + 60_000))
            .await;
        store.purge_expired().await;
        assert!(matches!(store.get("dead").await, SessionLookup::Missing));
        assert!(matches!(store.get("live").await, SessionLookup::Found(_)));
    }

    #[test]
    fn tokens_are_unique_hex() {
        let a = new_token();
        let b = new_token();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
