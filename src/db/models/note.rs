use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i32,
    pub client_id: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Note {
    pub fn from_new(id: i32, new: NewNote, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            client_id: new.client_id,
            content: new.content,
            created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNote {
    pub client_id: i32,
    pub content: String,
}
