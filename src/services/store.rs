use std::sync::Arc;

use async_trait::async_trait;
use redis::AsyncCommands;
use thiserror::Error;

use crate::models::{TaskRecord, UserAccount, UserSummary};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("username already taken")]
    DuplicateUsername,

    #[error("redis error: {0}")]
    Backend(#[from] redis::RedisError),

    #[error("corrupt user document: {0}")]
    Corrupt(#[from] serde_json::Error),
}

// The two field-update shapes the system performs on a user document:
// session changes at login/logout and whole-array task replacement.
#[derive(Debug, Clone)]
pub enum UserUpdate {
    Session {
        token: Option<String>,
        logged_in: bool,
    },
    Tasks(Vec<TaskRecord>),
}

impl UserUpdate {
    fn apply(self, user: &mut UserAccount) {
        match self {
            UserUpdate::Session { token, logged_in } => {
                user.session_token = token;
                user.logged_in = logged_in;
            }
            UserUpdate::Tasks(tasks) => user.tasks = tasks,
        }
    }
}

/// Document store holding one record per user. The only by-field lookup
/// the system needs is username, which the store keeps unique.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: &UserAccount) -> Result<(), StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<UserAccount>, StoreError>;

    /// Resolve a username to the owning account id.
    async fn find_by_username(&self, username: &str) -> Result<Option<String>, StoreError>;

    /// Returns false when no document exists under `id`.
    async fn update_by_id(&self, id: &str, update: UserUpdate) -> Result<bool, StoreError>;

    /// Account deletion. Exposed by the store contract; no HTTP route
    /// currently calls it.
    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError>;

    async fn list_all(&self) -> Result<Vec<UserSummary>, StoreError>;
}

const USERS_SET: &str = "users";

fn user_key(id: &str) -> String {
    format!("user:{}", id)
}

fn username_key(username: &str) -> String {
    format!("username:{}", username)
}

// Redis-backed store: JSON documents under `user:{id}`, with a
// `username:{name}` -> id index enforcing the uniqueness constraint and
// a membership set for listing. One shared client for all requests.
pub struct RedisStore {
    client: Arc<redis::Client>,
}

impl RedisStore {
    pub fn new(client: Arc<redis::Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UserStore for RedisStore {
    async fn insert(&self, user: &UserAccount) -> Result<(), StoreError> {
        let mut conn = self.client.get_async_connection().await?;

        // SET NX on the username index is the uniqueness check
        let claimed: bool = conn
            .set_nx(username_key(&user.username), &user.id)
            .await?;
        if !claimed {
            return Err(StoreError::DuplicateUsername);
        }

        let document = serde_json::to_string(user)?;
        let _: () = conn.set(user_key(&user.id), document).await?;
        let _: () = conn.sadd(USERS_SET, &user.id).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserAccount>, StoreError> {
        let mut conn = self.client.get_async_connection().await?;
        let document: Option<String> = conn.get(user_key(id)).await?;
        match document {
            Some(data) => Ok(Some(serde_json::from_str(&data)?)),
            None => Ok(None),
        }
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.client.get_async_connection().await?;
        let id: Option<String> = conn.get(username_key(username)).await?;
        Ok(id)
    }

    async fn update_by_id(&self, id: &str, update: UserUpdate) -> Result<bool, StoreError> {
        let mut conn = self.client.get_async_connection().await?;
        let document: Option<String> = conn.get(user_key(id)).await?;
        let Some(data) = document else {
            return Ok(false);
        };

        // Read-modify-write of the whole document; concurrent writers to
        // the same account race and the last write wins.
        let mut user: UserAccount = serde_json::from_str(&data)?;
        update.apply(&mut user);
        let _: () = conn.set(user_key(id), serde_json::to_string(&user)?).await?;
        Ok(true)
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        let mut conn = self.client.get_async_connection().await?;
        let document: Option<String> = conn.get(user_key(id)).await?;
        let Some(data) = document else {
            return Ok(false);
        };

        let user: UserAccount = serde_json::from_str(&data)?;
        let _: () = conn.del(user_key(id)).await?;
        let _: () = conn.del(username_key(&user.username)).await?;
        let _: () = conn.srem(USERS_SET, id).await?;
        Ok(true)
    }

    async fn list_all(&self) -> Result<Vec<UserSummary>, StoreError> {
        let mut conn = self.client.get_async_connection().await?;
        let ids: Vec<String> = conn.smembers(USERS_SET).await?;

        let mut summaries = Vec::with_capacity(ids.len());
        for id in ids {
            let document: Option<String> = conn.get(user_key(&id)).await?;
            // A member whose document was deleted concurrently is skipped
            if let Some(data) = document {
                let user: UserAccount = serde_json::from_str(&data)?;
                summaries.push(user.summary());
            }
        }
        Ok(summaries)
    }
}

impl Clone for RedisStore {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
        }
    }
}

// In-memory store with the same contract, backing the unit tests.
#[cfg(test)]
pub struct MemoryStore {
    users: std::sync::Mutex<std::collections::HashMap<String, UserAccount>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self {
            users: std::sync::Mutex::new(std::collections::HashMap::new()),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, user: &UserAccount) -> Result<(), StoreError> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.username == user.username) {
            return Err(StoreError::DuplicateUsername);
        }
        users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserAccount>, StoreError> {
        Ok(self.users.lock().unwrap().get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<String>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .values()
            .find(|u| u.username == username)
            .map(|u| u.id.clone()))
    }

    async fn update_by_id(&self, id: &str, update: UserUpdate) -> Result<bool, StoreError> {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(id) {
            Some(user) => {
                update.apply(user);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.users.lock().unwrap().remove(id).is_some())
    }

    async fn list_all(&self) -> Result<Vec<UserSummary>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users.values().map(|u| u.summary()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserAccount;

    fn account(id: &str, username: &str) -> UserAccount {
        UserAccount {
            id: id.to_string(),
            username: username.to_string(),
            password_hash: "irrelevant".to_string(),
            session_token: None,
            logged_in: false,
            tasks: Vec::new(),
        }
    }

    #[tokio::test]
    async fn insert_enforces_unique_usernames() {
        let store = MemoryStore::new();
        store.insert(&account("id-1", "bob")).await.unwrap();

        let err = store.insert(&account("id-2", "bob")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateUsername));
    }

    #[tokio::test]
    async fn update_on_missing_id_reports_not_found() {
        let store = MemoryStore::new();
        let updated = store
            .update_by_id("nope", UserUpdate::Tasks(Vec::new()))
            .await
            .unwrap();
        assert!(!updated);
    }

    #[tokio::test]
    async fn delete_frees_the_username() {
        let store = MemoryStore::new();
        store.insert(&account("id-1", "bob")).await.unwrap();

        assert!(store.delete_by_id("id-1").await.unwrap());
        assert!(store.find_by_username("bob").await.unwrap().is_none());
        store.insert(&account("id-2", "bob")).await.unwrap();
    }

    #[tokio::test]
    async fn list_all_projects_summaries() {
        let store = MemoryStore::new();
        store.insert(&account("id-1", "bob")).await.unwrap();
        store.insert(&account("id-2", "eve")).await.unwrap();

        let mut summaries = store.list_all().await.unwrap();
        summaries.sort_by(|a, b| a.username.cmp(&b.username));
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].username, "bob");
        assert!(!summaries[0].logged_in);
    }
}
