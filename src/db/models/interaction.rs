//! Interaction models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum InteractionType {
    Email,
    Phone,
    Meeting,
    Sms,
}

impl InteractionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionType::Email => "email",
            InteractionType::Phone => "phone",
            InteractionType::Meeting => "meeting",
            InteractionType::Sms => "sms",
        }
    }
}

impl std::str::FromStr for InteractionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "email" => Ok(InteractionType::Email),
            "phone" => Ok(InteractionType::Phone),
            "meeting" => Ok(InteractionType::Meeting),
            "sms" => Ok(InteractionType::Sms),
            other => Err(format!("Unknown interaction type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub id: i32,
    pub client_id: i32,
    #[serde(rename = "type")]
    pub interaction_type: InteractionType,
    pub title: String,
    pub description: Option<String>,
    /// Free text such as "25 mins"
    pub duration: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Interaction {
    pub fn from_new(id: i32, new: NewInteraction, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            client_id: new.client_id,
            interaction_type: new.interaction_type,
            title: new.title,
            description: new.description,
            duration: new.duration,
            created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInteraction {
    pub client_id: i32,
    #[serde(rename = "type")]
    pub interaction_type: InteractionType,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
}
