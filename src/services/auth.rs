use std::sync::Arc;

use md5::{Digest, Md5};
use uuid::Uuid;

use crate::errors::AppResult;
use crate::models::UserAccount;
use super::store::{StoreError, UserStore, UserUpdate};

/// Outcome of a credential or session operation. These are values, not
/// errors: every domain failure maps 1:1 to a caller-visible variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    Success,
    WrongPassword,
    UserDoesNotExist,
    UserAlreadyExists,
    NotLoggedIn,
    InvalidToken,
    // Reserved in the taxonomy; no code path produces it today
    UserAlreadyLoggedIn,
}

#[derive(Debug)]
pub enum LoginResult {
    Granted { user_id: String, token: String },
    Denied(AuthOutcome),
}

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn create_account(&self, username: &str, password: &str) -> AppResult<AuthOutcome> {
        if self.store.find_by_username(username).await?.is_some() {
            return Ok(AuthOutcome::UserAlreadyExists);
        }

        let id = Uuid::new_v4().to_string();
        let user = UserAccount {
            password_hash: encrypt_password(&id, password),
            id,
            username: username.to_string(),
            session_token: None,
            logged_in: false,
            tasks: Vec::new(),
        };

        match self.store.insert(&user).await {
            Ok(()) => Ok(AuthOutcome::Success),
            // lost the uniqueness race between lookup and insert
            Err(StoreError::DuplicateUsername) => Ok(AuthOutcome::UserAlreadyExists),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> AppResult<LoginResult> {
        let Some(user_id) = self.store.find_by_username(username).await? else {
            return Ok(LoginResult::Denied(AuthOutcome::UserDoesNotExist));
        };
        let Some(user) = self.store.find_by_id(&user_id).await? else {
            return Ok(LoginResult::Denied(AuthOutcome::UserDoesNotExist));
        };

        if !verify_password(&user_id, password, &user.password_hash) {
            tracing::debug!("password mismatch for user: {}", username);
            return Ok(LoginResult::Denied(AuthOutcome::WrongPassword));
        }

        // Fresh opaque token per login; a concurrent login for the same
        // account races on last-write-wins.
        let token = Uuid::new_v4().to_string();
        self.store
            .update_by_id(
                &user_id,
                UserUpdate::Session {
                    token: Some(token.clone()),
                    logged_in: true,
                },
            )
            .await?;

        Ok(LoginResult::Granted { user_id, token })
    }

    pub async fn logout(&self, user_id: &str) -> AppResult<AuthOutcome> {
        let Some(user) = self.store.find_by_id(user_id).await? else {
            return Ok(AuthOutcome::UserDoesNotExist);
        };
        if !user.logged_in {
            return Ok(AuthOutcome::NotLoggedIn);
        }

        self.store
            .update_by_id(
                user_id,
                UserUpdate::Session {
                    token: None,
                    logged_in: false,
                },
            )
            .await?;
        Ok(AuthOutcome::Success)
    }

    /// The sole authorization gate; callers run this before every task
    /// mutation.
    pub async fn is_logged_in(&self, user_id: &str, token: &str) -> AppResult<AuthOutcome> {
        let Some(user) = self.store.find_by_id(user_id).await? else {
            return Ok(AuthOutcome::UserDoesNotExist);
        };
        if !user.logged_in {
            return Ok(AuthOutcome::NotLoggedIn);
        }

        match user.session_token.as_deref() {
            Some(stored) if stored == token => Ok(AuthOutcome::Success),
            _ => Ok(AuthOutcome::InvalidToken),
        }
    }
}

fn hash_hex(input: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

// passwordHash = md5hex(md5hex(id) + md5hex(password)). The id acts as
// the salt. Kept exactly as-is so hashes already in the store stay valid.
fn encrypt_password(id: &str, password: &str) -> String {
    let salt = hash_hex(id);
    let pwd = hash_hex(password);
    hash_hex(&format!("{}{}", salt, pwd))
}

fn verify_password(id: &str, password: &str, stored_hash: &str) -> bool {
    encrypt_password(id, password).eq_ignore_ascii_case(stored_hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::store::MemoryStore;

    fn setup() -> AuthService {
        AuthService::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn md5_hex_digest_matches_known_vectors() {
        assert_eq!(hash_hex(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(hash_hex("abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn password_hash_is_deterministic() {
        assert_eq!(
            encrypt_password("some-id", "secret"),
            encrypt_password("some-id", "secret")
        );
        assert_ne!(
            encrypt_password("some-id", "secret"),
            encrypt_password("other-id", "secret")
        );
    }

    #[test]
    fn hash_comparison_ignores_hex_casing() {
        let stored = encrypt_password("some-id", "secret").to_uppercase();
        assert!(verify_password("some-id", "secret", &stored));
        assert!(!verify_password("some-id", "other", &stored));
    }

    #[tokio::test]
    async fn second_registration_with_same_username_is_rejected() {
        let auth = setup();
        assert_eq!(
            auth.create_account("alice", "pw1").await.unwrap(),
            AuthOutcome::Success
        );
        assert_eq!(
            auth.create_account("alice", "pw2").await.unwrap(),
            AuthOutcome::UserAlreadyExists
        );
    }

    #[tokio::test]
    async fn login_issues_token_and_validates_it() {
        let auth = setup();
        auth.create_account("alice", "pw1").await.unwrap();

        let login = auth.login("alice", "pw1").await.unwrap();
        let LoginResult::Granted { user_id, token } = login else {
            panic!("expected a granted login");
        };
        assert!(!token.is_empty());

        assert_eq!(
            auth.is_logged_in(&user_id, &token).await.unwrap(),
            AuthOutcome::Success
        );
        assert_eq!(
            auth.is_logged_in(&user_id, "wrong-token").await.unwrap(),
            AuthOutcome::InvalidToken
        );
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_denied() {
        let auth = setup();
        auth.create_account("alice", "pw1").await.unwrap();

        let login = auth.login("alice", "nope").await.unwrap();
        assert!(matches!(
            login,
            LoginResult::Denied(AuthOutcome::WrongPassword)
        ));
    }

    #[tokio::test]
    async fn login_for_unknown_user_is_denied() {
        let auth = setup();
        let login = auth.login("nobody", "pw").await.unwrap();
        assert!(matches!(
            login,
            LoginResult::Denied(AuthOutcome::UserDoesNotExist)
        ));
    }

    #[tokio::test]
    async fn logout_invalidates_the_session() {
        let auth = setup();
        auth.create_account("alice", "pw1").await.unwrap();
        let LoginResult::Granted { user_id, token } = auth.login("alice", "pw1").await.unwrap()
        else {
            panic!("expected a granted login");
        };

        assert_eq!(auth.logout(&user_id).await.unwrap(), AuthOutcome::Success);
        assert_eq!(
            auth.is_logged_in(&user_id, &token).await.unwrap(),
            AuthOutcome::NotLoggedIn
        );
        // logging out twice fails the second time
        assert_eq!(
            auth.logout(&user_id).await.unwrap(),
            AuthOutcome::NotLoggedIn
        );
    }

    #[tokio::test]
    async fn session_checks_for_unknown_ids_are_denied() {
        let auth = setup();
        assert_eq!(
            auth.logout("missing").await.unwrap(),
            AuthOutcome::UserDoesNotExist
        );
        assert_eq!(
            auth.is_logged_in("missing", "token").await.unwrap(),
            AuthOutcome::UserDoesNotExist
        );
    }
}
