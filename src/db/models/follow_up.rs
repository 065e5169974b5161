//! Follow-up models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FollowUpChannel {
    Email,
    Sms,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FollowUp {
    pub id: i32,
    pub client_id: i32,
    #[serde(rename = "type")]
    pub channel: FollowUpChannel,
    pub message: String,
    pub scheduled_date: DateTime<Utc>,
    pub completed: bool,
    pub reminder: bool,
    pub created_at: DateTime<Utc>,
}

impl FollowUp {
    pub fn from_new(id: i32, new: NewFollowUp, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            client_id: new.client_id,
            channel: new.channel,
            message: new.message,
            scheduled_date: new.scheduled_date,
            completed: new.completed.unwrap_or(false),
            reminder: new.reminder.unwrap_or(true),
            created_at,
        }
    }

    pub fn apply(&mut self, update: FollowUpUpdate) {
        if let Some(client_id) = update.client_id {
            self.client_id = client_id;
        }
        if let Some(channel) = update.channel {
            self.channel = channel;
        }
        if let Some(message) = update.message {
            self.message = message;
        }
        if let Some(scheduled_date) = update.scheduled_date {
            self.scheduled_date = scheduled_date;
        }
        if let Some(completed) = update.completed {
            self.completed = completed;
        }
        if let Some(reminder) = update.reminder {
            self.reminder = reminder;
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFollowUp {
    pub client_id: i32,
    #[serde(rename = "type")]
    pub channel: FollowUpChannel,
    pub message: String,
    pub scheduled_date: DateTime<Utc>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub reminder: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpUpdate {
    pub client_id: Option<i32>,
    #[serde(rename = "type")]
    pub channel: Option<FollowUpChannel>,
    pub message: Option<String>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub completed: Option<bool>,
    pub reminder: Option<bool>,
}
