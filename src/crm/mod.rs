//! Relational workspace store.
//!
//! Holds contacts, leads, deals and activities in memory, applies the cascade
//! policy on delete, keeps one search filter per entity kind and writes every
//! changed collection through a [`KeyValueStore`].

pub mod cascade;
pub mod fixtures;
pub mod models;
pub mod persistence;
pub mod record;

pub use cascade::{DeleteReport, CASCADE_RULES};
pub use models::*;
pub use persistence::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, PersistError};
pub use record::{Collections, EntityKind, ForeignKey, Record};

use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error("stored value for '{key}' is not a valid collection: {source}")]
    Corrupt {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize '{key}': {source}")]
    Serialize {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// When a changed collection is written back to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PersistPolicy {
    /// Write every changed collection, including an emptied one as `[]`.
    #[default]
    Always,
    /// Skip writes of empty collections. The stored snapshot then keeps the
    /// last non-empty contents and deleted records reappear on the next load.
    SkipEmpty,
}

impl PersistPolicy {
    pub fn from_persist_empty(persist_empty: bool) -> Self {
        if persist_empty {
            PersistPolicy::Always
        } else {
            PersistPolicy::SkipEmpty
        }
    }
}

/// Headline numbers for the workspace dashboard
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSummary {
    pub total_contacts: usize,
    pub open_deals: usize,
    pub open_deal_value: f64,
    pub activities_last_7_days: usize,
}

pub struct CrmStore {
    collections: Collections,
    filters: HashMap<EntityKind, String>,
    port: Box<dyn KeyValueStore>,
    policy: PersistPolicy,
}

impl CrmStore {
    /// Load every collection from `port`, seeding fixtures for keys that were never written.
    pub fn load(port: Box<dyn KeyValueStore>, policy: PersistPolicy) -> Result<Self, StoreError> {
        let collections = Collections {
            contacts: load_collection(port.as_ref(), fixtures::contacts)?,
            leads: load_collection(port.as_ref(), fixtures::leads)?,
            deals: load_collection(port.as_ref(), fixtures::deals)?,
            activities: load_collection(port.as_ref(), fixtures::activities)?,
        };

        info!(
            contacts = collections.contacts.len(),
            leads = collections.leads.len(),
            deals = collections.deals.len(),
            activities = collections.activities.len(),
            "Workspace loaded"
        );

        Ok(Self {
            collections,
            filters: HashMap::new(),
            port,
            policy,
        })
    }

    pub fn collections(&self) -> &Collections {
        &self.collections
    }

    pub fn port(&self) -> &dyn KeyValueStore {
        self.port.as_ref()
    }

    /// Give back the persistence port, e.g. to reload from it
    pub fn into_port(self) -> Box<dyn KeyValueStore> {
        self.port
    }

    pub fn all<T: Record>(&self) -> &[T] {
        T::collection(&self.collections)
    }

    pub fn get<T: Record>(&self, id: &str) -> Option<&T> {
        self.all::<T>().iter().find(|item| item.id() == id)
    }

    pub fn contacts(&self) -> &[Contact] {
        self.all()
    }

    pub fn leads(&self) -> &[Lead] {
        self.all()
    }

    pub fn deals(&self) -> &[Deal] {
        self.all()
    }

    pub fn activities(&self) -> &[Activity] {
        self.all()
    }

    pub fn add<T: Record>(&mut self, record: T) -> Result<(), StoreError> {
        debug!(kind = %T::KIND, id = record.id(), "Adding record");
        T::collection_mut(&mut self.collections).push(record);
        self.persist(T::KIND)
    }

    /// Replace the record with the same id. Returns false, changing nothing,
    /// when no such record exists.
    pub fn update<T: Record>(&mut self, record: T) -> Result<bool, StoreError> {
        let items = T::collection_mut(&mut self.collections);
        let Some(slot) = items.iter_mut().find(|item| item.id() == record.id()) else {
            debug!(kind = %T::KIND, id = record.id(), "Update target not found");
            return Ok(false);
        };
        *slot = record;
        self.persist(T::KIND)?;
        Ok(true)
    }

    /// Delete a record and everything the cascade policy says depends on it.
    pub fn delete(&mut self, kind: EntityKind, id: &str) -> Result<DeleteReport, StoreError> {
        let report = cascade::delete_with_cascade(&mut self.collections, kind, id);
        info!(
            %kind,
            id,
            deleted = report.deleted,
            cascaded = report.cascaded_total(),
            "Deleted record"
        );
        for touched in report.touched(kind) {
            self.persist(touched)?;
        }
        Ok(report)
    }

    pub fn set_filter(&mut self, kind: EntityKind, query: impl Into<String>) {
        self.filters.insert(kind, query.into());
    }

    pub fn filter(&self, kind: EntityKind) -> &str {
        self.filters.get(&kind).map(String::as_str).unwrap_or("")
    }

    /// Records matching the active filter for `T`.
    ///
    /// `None` means no filter is active; `Some` holds the matches, which may
    /// be empty.
    pub fn filtered<T: Record>(&self) -> Option<Vec<&T>> {
        let query = self.filter(T::KIND);
        if query.is_empty() {
            return None;
        }
        let needle = query.to_lowercase();
        Some(self.all::<T>().iter().filter(|item| item.matches(&needle)).collect())
    }

    /// What a list view shows: the matches when filtering, otherwise everything.
    pub fn visible<T: Record>(&self) -> Vec<&T> {
        self.filtered::<T>()
            .unwrap_or_else(|| self.all::<T>().iter().collect())
    }

    /// Move a deal to another pipeline stage. Returns false if the deal is
    /// missing or already in that stage.
    pub fn move_deal(&mut self, id: &str, stage: DealStage) -> Result<bool, StoreError> {
        let Some(deal) = self.get::<Deal>(id) else {
            return Ok(false);
        };
        if deal.stage == stage {
            return Ok(false);
        }
        let moved = Deal {
            stage,
            ..deal.clone()
        };
        self.update(moved)
    }

    /// Visible deals grouped into pipeline columns; every stage is present.
    pub fn deals_by_stage(&self) -> Vec<(DealStage, Vec<&Deal>)> {
        let visible = self.visible::<Deal>();
        DealStage::ALL
            .into_iter()
            .map(|stage| {
                let column = visible.iter().copied().filter(|d| d.stage == stage).collect();
                (stage, column)
            })
            .collect()
    }

    /// Sum of deal values per stage across the whole pipeline
    pub fn pipeline_totals(&self) -> Vec<(DealStage, f64)> {
        DealStage::ALL
            .into_iter()
            .map(|stage| {
                let total = self
                    .deals()
                    .iter()
                    .filter(|d| d.stage == stage)
                    .map(Deal::amount)
                    .sum();
                (stage, total)
            })
            .collect()
    }

    /// The `limit` most recent activities, newest first
    pub fn recent_activities(&self, limit: usize) -> Vec<&Activity> {
        let mut activities: Vec<&Activity> = self.activities().iter().collect();
        activities.sort_by(|a, b| parse_timestamp(&b.created_at).cmp(&parse_timestamp(&a.created_at)));
        activities.truncate(limit);
        activities
    }

    pub fn summary(&self, now: DateTime<Utc>) -> WorkspaceSummary {
        let open: Vec<&Deal> = self
            .deals()
            .iter()
            .filter(|d| !matches!(d.stage, DealStage::Won | DealStage::Lost))
            .collect();
        let week_ago = now - Duration::days(7);
        let recent = self
            .activities()
            .iter()
            .filter_map(|a| parse_timestamp(&a.created_at))
            .filter(|at| *at >= week_ago && *at <= now)
            .count();

        WorkspaceSummary {
            total_contacts: self.contacts().len(),
            open_deals: open.len(),
            open_deal_value: open.iter().map(|d| d.amount()).sum(),
            activities_last_7_days: recent,
        }
    }

    fn persist(&self, kind: EntityKind) -> Result<(), StoreError> {
        match kind {
            EntityKind::Contact => self.persist_collection(&self.collections.contacts),
            EntityKind::Lead => self.persist_collection(&self.collections.leads),
            EntityKind::Deal => self.persist_collection(&self.collections.deals),
            EntityKind::Activity => self.persist_collection(&self.collections.activities),
        }
    }

    fn persist_collection<T: Record>(&self, items: &[T]) -> Result<(), StoreError> {
        let key = T::KIND.storage_key();
        if items.is_empty() && self.policy == PersistPolicy::SkipEmpty {
            debug!(key, "Skipping write of empty collection");
            return Ok(());
        }
        let json = serde_json::to_string(items)
            .map_err(|source| StoreError::Serialize { key, source })?;
        self.port.set(key, &json)?;
        Ok(())
    }
}

fn load_collection<T: Record>(
    port: &dyn KeyValueStore,
    seed: fn() -> Vec<T>,
) -> Result<Vec<T>, StoreError> {
    let key = T::KIND.storage_key();
    match port.get(key)? {
        Some(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt { key, source }),
        None => {
            debug!(key, "No stored collection, seeding fixtures");
            Ok(seed())
        }
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::<FixedOffset>::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_store() -> CrmStore {
        let port = MemoryKeyValueStore::new()
            .with_entry("crm-contacts", "[]")
            .with_entry("crm-leads", "[]")
            .with_entry("crm-deals", "[]")
            .with_entry("crm-activities", "[]");
        CrmStore::load(Box::new(port), PersistPolicy::Always).unwrap()
    }

    fn contact(id: &str, name: &str, company: &str, email: &str) -> Contact {
        Contact {
            id: id.to_string(),
            name: name.to_string(),
            company: company.to_string(),
            email: email.to_string(),
            phone: "555-0100".to_string(),
            notes: None,
            created_at: now_timestamp(),
        }
    }

    fn activity(id: &str, at: &str) -> Activity {
        Activity {
            id: id.to_string(),
            activity_type: ActivityType::Note,
            notes: format!("note {}", id),
            contact_id: None,
            deal_id: None,
            created_at: at.to_string(),
        }
    }

    fn deal(id: &str, value: &str, stage: DealStage) -> Deal {
        Deal {
            id: id.to_string(),
            name: format!("Deal {}", id),
            company: "Acme".to_string(),
            value: value.to_string(),
            stage,
            contact_id: None,
            notes: None,
            created_at: now_timestamp(),
        }
    }

    #[test]
    fn test_load_seeds_fixtures_when_storage_is_empty() {
        let store = CrmStore::load(Box::new(MemoryKeyValueStore::new()), PersistPolicy::Always).unwrap();
        assert_eq!(store.contacts(), fixtures::contacts().as_slice());
        assert_eq!(store.deals().len(), fixtures::deals().len());
    }

    #[test]
    fn test_load_prefers_stored_collection() {
        let port = MemoryKeyValueStore::new().with_entry("crm-contacts", "[]");
        let store = CrmStore::load(Box::new(port), PersistPolicy::Always).unwrap();
        assert!(store.contacts().is_empty());
        assert_eq!(store.leads().len(), fixtures::leads().len());
    }

    #[test]
    fn test_load_rejects_corrupt_snapshot() {
        let port = MemoryKeyValueStore::new().with_entry("crm-deals", "{not json");
        let err = CrmStore::load(Box::new(port), PersistPolicy::Always).err().unwrap();
        assert!(matches!(err, StoreError::Corrupt { key: "crm-deals", .. }));
    }

    #[test]
    fn test_add_then_get_returns_same_record() {
        let mut store = empty_store();
        let c = contact("c1", "Ada Lovelace", "Engines Ltd", "ada@engines.test");
        store.add(c.clone()).unwrap();

        assert_eq!(store.get::<Contact>("c1"), Some(&c));
        let stored = store.port().get("crm-contacts").unwrap().unwrap();
        let parsed: Vec<Contact> = serde_json::from_str(&stored).unwrap();
        assert_eq!(parsed, vec![c]);
    }

    #[test]
    fn test_update_replaces_matching_record() {
        let mut store = empty_store();
        store.add(contact("c1", "Ada", "Engines", "ada@x.test")).unwrap();

        let mut changed = contact("c1", "Ada King", "Engines", "ada@x.test");
        changed.notes = Some("Prefers email".to_string());
        assert!(store.update(changed.clone()).unwrap());
        assert_eq!(store.contacts(), &[changed]);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut store = empty_store();
        store.add(contact("c1", "Ada", "Engines", "ada@x.test")).unwrap();
        let before = store.collections().clone();

        let updated = store.update(contact("zzz", "Ghost", "None", "g@x.test")).unwrap();
        assert!(!updated);
        assert_eq!(store.collections(), &before);
    }

    #[test]
    fn test_delete_contact_cascades_and_persists() {
        let mut store = empty_store();
        store.add(contact("c1", "Ada", "Engines", "ada@x.test")).unwrap();
        store.add(contact("c2", "Bob", "Builders", "bob@x.test")).unwrap();
        let mut d1 = deal("d1", "100", DealStage::New);
        d1.contact_id = Some("c1".to_string());
        let mut d2 = deal("d2", "200", DealStage::New);
        d2.contact_id = Some("c2".to_string());
        store.add(d1).unwrap();
        store.add(d2).unwrap();

        let report = store.delete(EntityKind::Contact, "c1").unwrap();
        assert!(report.deleted);
        assert_eq!(store.contacts().len(), 1);
        assert_eq!(store.deals().len(), 1);
        assert_eq!(store.deals()[0].id, "d2");

        let stored: Vec<Deal> =
            serde_json::from_str(&store.port().get("crm-deals").unwrap().unwrap()).unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[test]
    fn test_emptied_collection_persists_under_always() {
        let mut store = empty_store();
        store.add(contact("c1", "Ada", "Engines", "ada@x.test")).unwrap();
        store.delete(EntityKind::Contact, "c1").unwrap();

        assert_eq!(store.port().get("crm-contacts").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_emptied_collection_skipped_under_skip_empty() {
        let port = MemoryKeyValueStore::new().with_entry("crm-contacts", "[]");
        let mut store = CrmStore::load(Box::new(port), PersistPolicy::SkipEmpty).unwrap();
        store.add(contact("c1", "Ada", "Engines", "ada@x.test")).unwrap();
        store.delete(EntityKind::Contact, "c1").unwrap();

        // The last non-empty snapshot survives, so the contact comes back on reload
        let reloaded = CrmStore::load(store.into_port(), PersistPolicy::SkipEmpty).unwrap();
        assert_eq!(reloaded.contacts().len(), 1);
    }

    #[test]
    fn test_reload_yields_same_collections() {
        let mut store = CrmStore::load(Box::new(MemoryKeyValueStore::new()), PersistPolicy::Always).unwrap();
        store.delete(EntityKind::Deal, "1").unwrap();
        store.add(contact("c9", "Nina", "Nordic", "nina@x.test")).unwrap();
        let snapshot = store.collections().clone();

        let reloaded = CrmStore::load(store.into_port(), PersistPolicy::Always).unwrap();
        assert_eq!(reloaded.collections(), &snapshot);
    }

    #[test]
    fn test_filter_matches_single_contact_by_name() {
        let mut store = empty_store();
        store.add(contact("c1", "Ada Lovelace", "Engines", "ada@x.test")).unwrap();
        store.add(contact("c2", "Bob Stone", "Builders", "bob@x.test")).unwrap();

        store.set_filter(EntityKind::Contact, "LOVE");
        let matches = store.filtered::<Contact>().unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "c1");
    }

    #[test]
    fn test_filter_checks_company_and_email() {
        let mut store = empty_store();
        store.add(contact("c1", "Ada", "Engines", "ada@x.test")).unwrap();
        store.add(contact("c2", "Bob", "Builders", "bob@y.test")).unwrap();

        store.set_filter(EntityKind::Contact, "builders");
        assert_eq!(store.filtered::<Contact>().unwrap()[0].id, "c2");

        store.set_filter(EntityKind::Contact, "@x.");
        assert_eq!(store.filtered::<Contact>().unwrap()[0].id, "c1");
    }

    #[test]
    fn test_empty_filter_is_distinct_from_no_matches() {
        let mut store = empty_store();
        store.add(contact("c1", "Ada", "Engines", "ada@x.test")).unwrap();

        store.set_filter(EntityKind::Contact, "");
        assert!(store.filtered::<Contact>().is_none());
        assert_eq!(store.visible::<Contact>().len(), 1);

        store.set_filter(EntityKind::Contact, "nobody");
        assert_eq!(store.filtered::<Contact>(), Some(vec![]));
        assert!(store.visible::<Contact>().is_empty());
    }

    #[test]
    fn test_activity_filter_matches_type() {
        let mut store = empty_store();
        store.add(activity("a1", "2024-01-01T00:00:00Z")).unwrap();
        let mut call = activity("a2", "2024-01-02T00:00:00Z");
        call.activity_type = ActivityType::Call;
        store.add(call).unwrap();

        store.set_filter(EntityKind::Activity, "Call");
        let matches = store.filtered::<Activity>().unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "a2");
    }

    #[test]
    fn test_filters_are_per_kind() {
        let mut store = empty_store();
        store.set_filter(EntityKind::Lead, "cloud");
        assert_eq!(store.filter(EntityKind::Lead), "cloud");
        assert_eq!(store.filter(EntityKind::Deal), "");
    }

    #[test]
    fn test_recent_activities_newest_first() {
        let mut store = empty_store();
        store.add(activity("old", "2024-01-01T00:00:00Z")).unwrap();
        store.add(activity("new", "2024-03-01T00:00:00+02:00")).unwrap();
        store.add(activity("mid", "2024-02-01T00:00:00.000Z")).unwrap();

        let ids: Vec<_> = store.recent_activities(2).iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid"]);
    }

    #[test]
    fn test_move_deal_changes_stage_once() {
        let mut store = empty_store();
        store.add(deal("d1", "500", DealStage::New)).unwrap();

        assert!(store.move_deal("d1", DealStage::Won).unwrap());
        assert_eq!(store.get::<Deal>("d1").unwrap().stage, DealStage::Won);
        assert!(!store.move_deal("d1", DealStage::Won).unwrap());
        assert!(!store.move_deal("missing", DealStage::Lost).unwrap());
    }

    #[test]
    fn test_pipeline_columns_and_totals() {
        let mut store = empty_store();
        store.add(deal("d1", "1000", DealStage::New)).unwrap();
        store.add(deal("d2", "2500.50", DealStage::New)).unwrap();
        store.add(deal("d3", "n/a", DealStage::Won)).unwrap();

        let columns = store.deals_by_stage();
        assert_eq!(columns.len(), DealStage::ALL.len());
        assert_eq!(columns[0].0, DealStage::New);
        assert_eq!(columns[0].1.len(), 2);

        let totals = store.pipeline_totals();
        assert_eq!(totals[0], (DealStage::New, 3500.5));
        assert_eq!(totals[4], (DealStage::Won, 0.0));
    }

    #[test]
    fn test_summary_counts_open_deals_and_recent_activities() {
        let mut store = empty_store();
        store.add(deal("d1", "1000", DealStage::Proposal)).unwrap();
        store.add(deal("d2", "4000", DealStage::Won)).unwrap();
        store.add(activity("a1", "2024-06-10T00:00:00Z")).unwrap();
        store.add(activity("a2", "2024-05-01T00:00:00Z")).unwrap();

        let now = DateTime::parse_from_rfc3339("2024-06-12T00:00:00Z").unwrap().with_timezone(&Utc);
        let summary = store.summary(now);
        assert_eq!(summary.open_deals, 1);
        assert_eq!(summary.open_deal_value, 1000.0);
        assert_eq!(summary.activities_last_7_days, 1);
    }
}
