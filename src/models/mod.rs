mod user;
mod forms;
mod task;

pub use user::{UserAccount, UserSummary};
pub use forms::{Credentials, SessionQuery, TaskForm};
pub use task::TaskRecord;
