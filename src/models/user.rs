use serde::{Deserialize, Serialize};
use super::task::TaskRecord;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserAccount {
    pub id: String,
    pub username: String,
    pub password_hash: String,  // MD5 chain digest, never the plaintext
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
    pub logged_in: bool,
    // Embedded task list; absent in older documents, so default to empty
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
}

// Projection returned by the user listing, never includes the hash
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub logged_in: bool,
}

impl UserAccount {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            username: self.username.clone(),
            logged_in: self.logged_in,
        }
    }
}
