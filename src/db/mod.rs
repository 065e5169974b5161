//! In-memory engagement store: users, clients, interactions, follow-ups and notes.
//!
//! Each entity type lives in its own [`Table`] with a monotonic integer id
//! counter. Ids are never reused. Nothing is ever deleted from this store.

mod models;
mod seeders;

pub use models::*;
pub use seeders::seed_fixtures;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("username '{0}' is already taken")]
    UsernameTaken(String),
    #[error("failed to hash password: {0}")]
    PasswordHash(String),
}

/// Rows of one entity type keyed by id, plus the next id to hand out.
#[derive(Debug, Clone)]
pub struct Table<T> {
    rows: BTreeMap<i32, T>,
    next_id: i32,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T: Clone> Table<T> {
    /// Allocate the next id, build the row with it and store it.
    pub fn insert_with(&mut self, build: impl FnOnce(i32) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }

    pub fn get(&self, id: i32) -> Option<&T> {
        self.rows.get(&id)
    }

    pub fn get_mut(&mut self, id: i32) -> Option<&mut T> {
        self.rows.get_mut(&id)
    }

    /// All rows in id order
    pub fn all(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }

    pub fn filter(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows.values().filter(|row| pred(row)).cloned().collect()
    }

    pub fn find(&self, pred: impl Fn(&T) -> bool) -> Option<&T> {
        self.rows.values().find(|row| pred(row))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemStorage {
    users: Table<User>,
    clients: Table<Client>,
    interactions: Table<Interaction>,
    follow_ups: Table<FollowUp>,
    notes: Table<Note>,
}

impl MemStorage {
    /// An empty store; ids start at 1 for every entity type.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with the sample clients and their history.
    pub fn with_fixtures() -> Self {
        let mut storage = Self::new();
        seed_fixtures(&mut storage);
        storage
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    pub fn get_user(&self, id: i32) -> Option<User> {
        self.users.get(id).cloned()
    }

    pub fn get_user_by_username(&self, username: &str) -> Option<User> {
        self.users.find(|u| u.username == username).cloned()
    }

    /// Create a user, storing an Argon2 hash of the password.
    pub fn create_user(&mut self, new: NewUser) -> Result<User, StorageError> {
        if self.get_user_by_username(&new.username).is_some() {
            return Err(StorageError::UsernameTaken(new.username));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(new.password.as_bytes(), &salt)
            .map_err(|e| StorageError::PasswordHash(e.to_string()))?
            .to_string();

        let user = self.users.insert_with(|id| User {
            id,
            username: new.username,
            password_hash,
        });
        info!(user_id = user.id, username = %user.username, "Created user");
        Ok(user)
    }

    /// Check a username/password pair against the stored hash.
    pub fn verify_user_password(&self, username: &str, password: &str) -> bool {
        let Some(user) = self.users.find(|u| u.username == username) else {
            return false;
        };
        let parsed = match PasswordHash::new(&user.password_hash) {
            Ok(h) => h,
            Err(_) => return false,
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    // ------------------------------------------------------------------
    // Clients
    // ------------------------------------------------------------------

    pub fn get_all_clients(&self) -> Vec<Client> {
        self.clients.all()
    }

    pub fn get_client(&self, id: i32) -> Option<Client> {
        self.clients.get(id).cloned()
    }

    pub fn create_client(&mut self, new: NewClient) -> Client {
        let client = self
            .clients
            .insert_with(|id| Client::from_new(id, new, Utc::now()));
        debug!(client_id = client.id, "Created client");
        client
    }

    pub fn update_client(&mut self, id: i32, update: ClientUpdate) -> Option<Client> {
        let client = self.clients.get_mut(id)?;
        client.apply(update);
        Some(client.clone())
    }

    // ------------------------------------------------------------------
    // Interactions
    // ------------------------------------------------------------------

    pub fn get_all_interactions(&self) -> Vec<Interaction> {
        self.interactions.all()
    }

    pub fn get_interactions_by_client(&self, client_id: i32) -> Vec<Interaction> {
        self.interactions.filter(|i| i.client_id == client_id)
    }

    pub fn create_interaction(&mut self, new: NewInteraction) -> Interaction {
        let interaction = self
            .interactions
            .insert_with(|id| Interaction::from_new(id, new, Utc::now()));
        debug!(interaction_id = interaction.id, client_id = interaction.client_id, "Created interaction");
        interaction
    }

    // ------------------------------------------------------------------
    // Follow-ups
    // ------------------------------------------------------------------

    pub fn get_all_follow_ups(&self) -> Vec<FollowUp> {
        self.follow_ups.all()
    }

    pub fn get_follow_ups_by_client(&self, client_id: i32) -> Vec<FollowUp> {
        self.follow_ups.filter(|f| f.client_id == client_id)
    }

    pub fn create_follow_up(&mut self, new: NewFollowUp) -> FollowUp {
        let follow_up = self
            .follow_ups
            .insert_with(|id| FollowUp::from_new(id, new, Utc::now()));
        debug!(follow_up_id = follow_up.id, client_id = follow_up.client_id, "Created follow-up");
        follow_up
    }

    pub fn update_follow_up(&mut self, id: i32, update: FollowUpUpdate) -> Option<FollowUp> {
        let follow_up = self.follow_ups.get_mut(id)?;
        follow_up.apply(update);
        Some(follow_up.clone())
    }

    // ------------------------------------------------------------------
    // Notes
    // ------------------------------------------------------------------

    pub fn get_notes_by_client(&self, client_id: i32) -> Vec<Note> {
        self.notes.filter(|n| n.client_id == client_id)
    }

    pub fn create_note(&mut self, new: NewNote) -> Note {
        let note = self
            .notes
            .insert_with(|id| Note::from_new(id, new, Utc::now()));
        debug!(note_id = note.id, client_id = note.client_id, "Created note");
        note
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_client(name: &str, email: &str) -> NewClient {
        NewClient {
            name: name.to_string(),
            email: email.to_string(),
            company: None,
            lead_score: None,
            tags: None,
        }
    }

    fn new_follow_up(client_id: i32) -> NewFollowUp {
        NewFollowUp {
            client_id,
            channel: FollowUpChannel::Email,
            message: "Check in".to_string(),
            scheduled_date: Utc::now() + Duration::days(2),
            completed: None,
            reminder: None,
        }
    }

    #[test]
    fn test_create_client_assigns_id_and_defaults() {
        let mut storage = MemStorage::new();
        let client = storage.create_client(new_client("A", "a@x.com"));

        assert_eq!(client.id, 1);
        assert_eq!(client.lead_score, 0);
        assert!(client.tags.is_empty());
        assert_eq!(client.company, None);
        assert_eq!(storage.get_client(1), Some(client));
    }

    #[test]
    fn test_ids_are_monotonic_per_entity_type() {
        let mut storage = MemStorage::new();
        let c1 = storage.create_client(new_client("A", "a@x.com"));
        let c2 = storage.create_client(new_client("B", "b@x.com"));
        let note = storage.create_note(NewNote {
            client_id: c2.id,
            content: "hello".to_string(),
        });

        assert_eq!((c1.id, c2.id), (1, 2));
        assert_eq!(note.id, 1);
    }

    #[test]
    fn test_update_client_merges_and_preserves_identity() {
        let mut storage = MemStorage::new();
        let created = storage.create_client(NewClient {
            company: Some("Acme".to_string()),
            tags: Some(vec!["VIP".to_string()]),
            ..new_client("A", "a@x.com")
        });

        let updated = storage
            .update_client(
                created.id,
                ClientUpdate {
                    lead_score: Some(80),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.lead_score, 80);
        assert_eq!(
            updated,
            Client {
                lead_score: 80,
                ..created.clone()
            }
        );

        let cleared = storage
            .update_client(
                created.id,
                ClientUpdate {
                    company: Some(None),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(cleared.company, None);
        assert_eq!(cleared.created_at, created.created_at);
    }

    #[test]
    fn test_update_missing_client_returns_none() {
        let mut storage = MemStorage::new();
        assert!(storage.update_client(999, ClientUpdate::default()).is_none());
        assert!(storage.get_client(999).is_none());
    }

    #[test]
    fn test_lookups_by_client() {
        let mut storage = MemStorage::new();
        storage.create_follow_up(new_follow_up(1));
        storage.create_follow_up(new_follow_up(2));
        storage.create_follow_up(new_follow_up(1));

        let ids: Vec<i32> = storage.get_follow_ups_by_client(1).iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(storage.get_follow_ups_by_client(7).is_empty());
        assert!(storage.get_interactions_by_client(1).is_empty());
    }

    #[test]
    fn test_follow_up_defaults_and_completion() {
        let mut storage = MemStorage::new();
        let created = storage.create_follow_up(new_follow_up(1));
        assert!(!created.completed);
        assert!(created.reminder);

        let done = storage
            .update_follow_up(
                created.id,
                FollowUpUpdate {
                    completed: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(done.completed);
        assert_eq!(done.message, created.message);
        assert!(storage.update_follow_up(42, FollowUpUpdate::default()).is_none());
    }

    #[test]
    fn test_user_password_is_hashed_and_verifiable() {
        let mut storage = MemStorage::new();
        let user = storage
            .create_user(NewUser {
                username: "sam".to_string(),
                password: "correct horse battery".to_string(),
            })
            .unwrap();

        assert_eq!(user.id, 1);
        assert_ne!(user.password_hash, "correct horse battery");
        assert!(storage.verify_user_password("sam", "correct horse battery"));
        assert!(!storage.verify_user_password("sam", "wrong"));
        assert!(!storage.verify_user_password("nobody", "correct horse battery"));
        assert_eq!(storage.get_user_by_username("sam").map(|u| u.id), Some(1));
        assert_eq!(storage.get_user(1).map(|u| u.username), Some("sam".to_string()));
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let mut storage = MemStorage::new();
        let new = || NewUser {
            username: "sam".to_string(),
            password: "pw".to_string(),
        };
        storage.create_user(new()).unwrap();

        let err = storage.create_user(new()).unwrap_err();
        assert!(matches!(err, StorageError::UsernameTaken(name) if name == "sam"));
    }

    #[test]
    fn test_user_serialization_omits_hash() {
        let mut storage = MemStorage::new();
        let user = storage
            .create_user(NewUser {
                username: "sam".to_string(),
                password: "pw".to_string(),
            })
            .unwrap();

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "sam");
    }
}
