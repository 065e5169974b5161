//! Input validation for API requests.
//!
//! Field validators return `Result<(), String>` with a human-readable reason;
//! [`Payload`] implementations run them over a whole request body and collect
//! the failures with a `ValidationErrorBuilder`.

use lazy_static::lazy_static;
use regex::Regex;

use super::error::ValidationErrorBuilder;
use crate::db::{ClientUpdate, FollowUpUpdate, NewClient, NewFollowUp, NewInteraction, NewNote};

lazy_static! {
    /// Pragmatic email shape check: local@domain.tld, no whitespace
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[^\s@]+@[^\s@]+\.[^\s@]+$"
    ).unwrap();
}

const MAX_NAME_LEN: usize = 200;
const MAX_TEXT_LEN: usize = 10_000;
const MAX_TAGS: usize = 20;
const MAX_TAG_LEN: usize = 50;

/// A request body with a generic rejection message and field checks.
pub trait Payload {
    /// Message returned to the caller when parsing or validation fails
    const INVALID_MESSAGE: &'static str;

    fn validate(&self, errors: &mut ValidationErrorBuilder);
}

/// Validate a required, bounded single-line value such as a name or title
pub fn validate_required(label: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", label));
    }
    if value.len() > MAX_NAME_LEN {
        return Err(format!("{} is too long (max {} characters)", label, MAX_NAME_LEN));
    }
    Ok(())
}

/// Validate free text such as a note or message body
pub fn validate_text(label: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", label));
    }
    if value.len() > MAX_TEXT_LEN {
        return Err(format!("{} is too long (max {} characters)", label, MAX_TEXT_LEN));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }
    if email.len() > 254 {
        return Err("Email is too long (max 254 characters)".to_string());
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

pub fn validate_lead_score(score: i32) -> Result<(), String> {
    if !(0..=100).contains(&score) {
        return Err("Lead score must be between 0 and 100".to_string());
    }
    Ok(())
}

pub fn validate_tags(tags: &[String]) -> Result<(), String> {
    if tags.len() > MAX_TAGS {
        return Err(format!("At most {} tags are allowed", MAX_TAGS));
    }
    for tag in tags {
        if tag.trim().is_empty() {
            return Err("Tags must not be empty".to_string());
        }
        if tag.len() > MAX_TAG_LEN {
            return Err(format!("Tag '{}' is too long (max {} characters)", tag, MAX_TAG_LEN));
        }
    }
    Ok(())
}

pub fn validate_client_id(client_id: i32) -> Result<(), String> {
    if client_id < 1 {
        return Err("Client ID must be a positive integer".to_string());
    }
    Ok(())
}

/// Parse an integer path id. Anything else matches no record.
pub fn parse_id(raw: &str) -> Option<i32> {
    raw.trim().parse::<i32>().ok()
}

impl Payload for NewClient {
    const INVALID_MESSAGE: &'static str = "Invalid client data";

    fn validate(&self, errors: &mut ValidationErrorBuilder) {
        errors.check("name", validate_required("Name", &self.name));
        errors.check("email", validate_email(&self.email));
        if let Some(score) = self.lead_score {
            errors.check("leadScore", validate_lead_score(score));
        }
        if let Some(tags) = &self.tags {
            errors.check("tags", validate_tags(tags));
        }
    }
}

impl Payload for ClientUpdate {
    const INVALID_MESSAGE: &'static str = "Invalid client data";

    fn validate(&self, errors: &mut ValidationErrorBuilder) {
        if let Some(name) = &self.name {
            errors.check("name", validate_required("Name", name));
        }
        if let Some(email) = &self.email {
            errors.check("email", validate_email(email));
        }
        if let Some(score) = self.lead_score {
            errors.check("leadScore", validate_lead_score(score));
        }
        if let Some(tags) = &self.tags {
            errors.check("tags", validate_tags(tags));
        }
    }
}

impl Payload for NewInteraction {
    const INVALID_MESSAGE: &'static str = "Invalid interaction data";

    fn validate(&self, errors: &mut ValidationErrorBuilder) {
        errors.check("clientId", validate_client_id(self.client_id));
        errors.check("title", validate_required("Title", &self.title));
    }
}

impl Payload for NewFollowUp {
    const INVALID_MESSAGE: &'static str = "Invalid follow-up data";

    fn validate(&self, errors: &mut ValidationErrorBuilder) {
        errors.check("clientId", validate_client_id(self.client_id));
        errors.check("message", validate_text("Message", &self.message));
    }
}

impl Payload for FollowUpUpdate {
    const INVALID_MESSAGE: &'static str = "Invalid follow-up data";

    fn validate(&self, errors: &mut ValidationErrorBuilder) {
        if let Some(client_id) = self.client_id {
            errors.check("clientId", validate_client_id(client_id));
        }
        if let Some(message) = &self.message {
            errors.check("message", validate_text("Message", message));
        }
    }
}

impl Payload for NewNote {
    const INVALID_MESSAGE: &'static str = "Invalid note data";

    fn validate(&self, errors: &mut ValidationErrorBuilder) {
        errors.check("clientId", validate_client_id(self.client_id));
        errors.check("content", validate_text("Content", &self.content));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("sarah@luxebeauty.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign.com").is_err());
        assert!(validate_email("a b@x.com").is_err());
        assert!(validate_email("a@localhost").is_err());
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("1"), Some(1));
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id("1.5"), None);
        assert_eq!(parse_id(""), None);
    }

    #[test]
    fn test_validate_required() {
        assert!(validate_required("Name", "A").is_ok());
        assert!(validate_required("Name", "   ").is_err());
        assert!(validate_required("Name", &"x".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_lead_score() {
        assert!(validate_lead_score(0).is_ok());
        assert!(validate_lead_score(100).is_ok());
        assert!(validate_lead_score(-1).is_err());
        assert!(validate_lead_score(101).is_err());
    }

    #[test]
    fn test_validate_tags() {
        assert!(validate_tags(&[]).is_ok());
        assert!(validate_tags(&["VIP".to_string()]).is_ok());
        assert!(validate_tags(&["".to_string()]).is_err());
        assert!(validate_tags(&vec!["t".to_string(); 21]).is_err());
    }

    #[test]
    fn test_new_client_payload_collects_all_failures() {
        let client = NewClient {
            name: "".to_string(),
            email: "bad".to_string(),
            company: None,
            lead_score: Some(150),
            tags: None,
        };
        let mut errors = ValidationErrorBuilder::new();
        client.validate(&mut errors);

        let fields: Vec<&str> = errors.errors().keys().map(String::as_str).collect();
        assert_eq!(fields, vec!["email", "leadScore", "name"]);
    }

    #[test]
    fn test_empty_update_is_valid() {
        let mut errors = ValidationErrorBuilder::new();
        ClientUpdate::default().validate(&mut errors);
        FollowUpUpdate::default().validate(&mut errors);
        assert!(errors.is_empty());
    }
}
