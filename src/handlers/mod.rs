mod auth;
mod task;
mod users;

pub use auth::{create_account, login, logout};
pub use task::{create_task, delete_task, get_task, list_tasks, update_task};
pub use users::{get_user, list_users, user_task, user_tasks};
