//! Referential-integrity policy for workspace deletes.
//!
//! Each rule says: when a record of `parent` kind is deleted, every record of
//! `dependent` kind whose `foreign_key` equals the deleted id goes with it.
//! Rules apply one level deep.

use super::record::{Collections, EntityKind, ForeignKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeRule {
    pub parent: EntityKind,
    pub dependent: EntityKind,
    pub foreign_key: ForeignKey,
}

pub const CASCADE_RULES: &[CascadeRule] = &[
    CascadeRule {
        parent: EntityKind::Contact,
        dependent: EntityKind::Lead,
        foreign_key: ForeignKey::ContactId,
    },
    CascadeRule {
        parent: EntityKind::Contact,
        dependent: EntityKind::Deal,
        foreign_key: ForeignKey::ContactId,
    },
    CascadeRule {
        parent: EntityKind::Contact,
        dependent: EntityKind::Activity,
        foreign_key: ForeignKey::ContactId,
    },
    CascadeRule {
        parent: EntityKind::Deal,
        dependent: EntityKind::Activity,
        foreign_key: ForeignKey::DealId,
    },
];

/// What a delete removed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteReport {
    /// Whether the target record itself existed
    pub deleted: bool,
    /// Dependent records removed, per rule that fired
    pub cascaded: Vec<(EntityKind, usize)>,
}

impl DeleteReport {
    pub fn cascaded_total(&self) -> usize {
        self.cascaded.iter().map(|(_, n)| n).sum()
    }

    /// Kinds whose collections changed and need persisting
    pub fn touched(&self, kind: EntityKind) -> Vec<EntityKind> {
        let mut kinds = Vec::new();
        if self.deleted {
            kinds.push(kind);
        }
        for (dependent, removed) in &self.cascaded {
            if *removed > 0 && !kinds.contains(dependent) {
                kinds.push(*dependent);
            }
        }
        kinds
    }
}

pub fn rules_for(parent: EntityKind) -> impl Iterator<Item = &'static CascadeRule> {
    CASCADE_RULES.iter().filter(move |rule| rule.parent == parent)
}

/// Delete `id` from the `kind` collection and apply every cascade rule for it.
///
/// Dependents are removed even when the parent itself was absent, so dangling
/// references to an already-deleted record are cleaned up as well.
pub fn delete_with_cascade(collections: &mut Collections, kind: EntityKind, id: &str) -> DeleteReport {
    let deleted = collections.remove_by_id(kind, id);
    let cascaded = rules_for(kind)
        .map(|rule| {
            let removed = collections.remove_referencing(rule.dependent, rule.foreign_key, id);
            (rule.dependent, removed)
        })
        .collect();

    DeleteReport { deleted, cascaded }
}
