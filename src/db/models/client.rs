//! Client models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::double_option;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub lead_score: i32,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Client {
    pub fn from_new(id: i32, new: NewClient, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            email: new.email,
            company: new.company,
            lead_score: new.lead_score.unwrap_or(0),
            tags: new.tags.unwrap_or_default(),
            created_at,
        }
    }

    /// Shallow merge; id and created_at are never touched
    pub fn apply(&mut self, update: ClientUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(company) = update.company {
            self.company = company;
        }
        if let Some(score) = update.lead_score {
            self.lead_score = score;
        }
        if let Some(tags) = update.tags {
            self.tags = tags;
        }
    }
}

/// Body of POST /api/clients. Unknown keys such as `id` or `createdAt` are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub lead_score: Option<i32>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Body of PATCH /api/clients/:id
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub company: Option<Option<String>>,
    pub lead_score: Option<i32>,
    pub tags: Option<Vec<String>>,
}
