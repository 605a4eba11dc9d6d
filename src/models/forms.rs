use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

// Every authorized task route carries the user id and session token as
// explicit query parameters; there is no cookie session.
#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    pub id: String,
    pub token: String,
}

// Task payload as it travels over the wire: epoch seconds for the dates
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskForm {
    #[serde(default)]
    pub id: usize,
    pub title: String,
    pub description: String,
    pub start_date: i64,
    pub end_date: i64,
}
