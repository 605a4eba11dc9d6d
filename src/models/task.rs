use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

// A single entry in a user's task list. `id` is the task's current
// position in the list: ids always form a dense 0..n-1 sequence and are
// re-assigned when an earlier task is deleted, so they must not be held
// across deletes.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TaskRecord {
    pub id: usize,
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}
