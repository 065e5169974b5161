//! The `Record` trait ties each workspace entity to its collection,
//! its storage key, the foreign keys it carries and the fields it is
//! searched by.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

use super::models::{Activity, Contact, Deal, Lead};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Contact,
    Lead,
    Deal,
    Activity,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Contact,
        EntityKind::Lead,
        EntityKind::Deal,
        EntityKind::Activity,
    ];

    /// Key the collection is persisted under
    pub fn storage_key(&self) -> &'static str {
        match self {
            EntityKind::Contact => "crm-contacts",
            EntityKind::Lead => "crm-leads",
            EntityKind::Deal => "crm-deals",
            EntityKind::Activity => "crm-activities",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityKind::Contact => "contact",
            EntityKind::Lead => "lead",
            EntityKind::Deal => "deal",
            EntityKind::Activity => "activity",
        };
        write!(f, "{}", s)
    }
}

/// Reference fields a record may hold to another record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignKey {
    ContactId,
    DealId,
}

/// The four in-memory collections of a workspace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collections {
    pub contacts: Vec<Contact>,
    pub leads: Vec<Lead>,
    pub deals: Vec<Deal>,
    pub activities: Vec<Activity>,
}

impl Collections {
    /// Remove every record of `kind` whose `fk` equals `id`; returns how many went.
    pub fn remove_referencing(&mut self, kind: EntityKind, fk: ForeignKey, id: &str) -> usize {
        match kind {
            EntityKind::Contact => remove_where(&mut self.contacts, fk, id),
            EntityKind::Lead => remove_where(&mut self.leads, fk, id),
            EntityKind::Deal => remove_where(&mut self.deals, fk, id),
            EntityKind::Activity => remove_where(&mut self.activities, fk, id),
        }
    }

    /// Remove the record of `kind` with primary id `id`.
    pub fn remove_by_id(&mut self, kind: EntityKind, id: &str) -> bool {
        match kind {
            EntityKind::Contact => remove_id(&mut self.contacts, id),
            EntityKind::Lead => remove_id(&mut self.leads, id),
            EntityKind::Deal => remove_id(&mut self.deals, id),
            EntityKind::Activity => remove_id(&mut self.activities, id),
        }
    }

    pub fn len_of(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Contact => self.contacts.len(),
            EntityKind::Lead => self.leads.len(),
            EntityKind::Deal => self.deals.len(),
            EntityKind::Activity => self.activities.len(),
        }
    }
}

fn remove_where<T: Record>(items: &mut Vec<T>, fk: ForeignKey, id: &str) -> usize {
    let before = items.len();
    items.retain(|item| item.reference(fk) != Some(id));
    before - items.len()
}

fn remove_id<T: Record>(items: &mut Vec<T>, id: &str) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    before != items.len()
}

pub trait Record: Clone + Serialize + DeserializeOwned {
    const KIND: EntityKind;

    fn id(&self) -> &str;

    fn created_at(&self) -> &str;

    /// Value of a reference field, if this record type has it and it is set
    fn reference(&self, _fk: ForeignKey) -> Option<&str> {
        None
    }

    /// Fields consulted by the search filter
    fn search_fields(&self) -> Vec<&str>;

    fn collection(collections: &Collections) -> &Vec<Self>;

    fn collection_mut(collections: &mut Collections) -> &mut Vec<Self>;

    /// Case-insensitive substring match against the search fields.
    /// `needle` must already be lowercased.
    fn matches(&self, needle: &str) -> bool {
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

impl Record for Contact {
    const KIND: EntityKind = EntityKind::Contact;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> &str {
        &self.created_at
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.company.as_str(), self.email.as_str()]
    }

    fn collection(collections: &Collections) -> &Vec<Self> {
        &collections.contacts
    }

    fn collection_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.contacts
    }
}

impl Record for Lead {
    const KIND: EntityKind = EntityKind::Lead;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> &str {
        &self.created_at
    }

    fn reference(&self, fk: ForeignKey) -> Option<&str> {
        match fk {
            ForeignKey::ContactId => self.contact_id.as_deref(),
            ForeignKey::DealId => None,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.company.as_str()]
    }

    fn collection(collections: &Collections) -> &Vec<Self> {
        &collections.leads
    }

    fn collection_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.leads
    }
}

impl Record for Deal {
    const KIND: EntityKind = EntityKind::Deal;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> &str {
        &self.created_at
    }

    fn reference(&self, fk: ForeignKey) -> Option<&str> {
        match fk {
            ForeignKey::ContactId => self.contact_id.as_deref(),
            ForeignKey::DealId => None,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.company.as_str()]
    }

    fn collection(collections: &Collections) -> &Vec<Self> {
        &collections.deals
    }

    fn collection_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.deals
    }
}

impl Record for Activity {
    const KIND: EntityKind = EntityKind::Activity;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> &str {
        &self.created_at
    }

    fn reference(&self, fk: ForeignKey) -> Option<&str> {
        match fk {
            ForeignKey::ContactId => self.contact_id.as_deref(),
            ForeignKey::DealId => self.deal_id.as_deref(),
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.notes.as_str(), self.activity_type.as_str()]
    }

    fn collection(collections: &Collections) -> &Vec<Self> {
        &collections.activities
    }

    fn collection_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.activities
    }
}
