mod auth;
mod store;
mod tasks;

pub use auth::{AuthOutcome, AuthService, LoginResult};
pub use store::{RedisStore, StoreError, UserStore, UserUpdate};
pub use tasks::{TaskDraft, TaskService};
