//! Glossary term aggregate root

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::modules::dictionary::domain::value_objects::{Category, Definition, Reference, TermId};
use crate::shared::domain::ValueObject;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::Validator;

/// A glossary entry with its "see also" links.
///
/// `id` is `None` until the repository persists the term. Symmetry of the
/// links is not the entity's concern; `TermService` keeps both sides in step.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    id: Option<TermId>,
    term: String,
    definition: Definition,
    category: Category,
    reference: Option<Reference>,
    related_term_ids: BTreeSet<TermId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Term {
    /// Create an unsaved term
    pub fn new(
        term: impl Into<String>,
        definition: Definition,
        category: Category,
        reference: Option<Reference>,
    ) -> AppResult<Self> {
        let term = term.into();
        Validator::validate_term_text(&term)?;

        let now = Utc::now();
        Ok(Self {
            id: None,
            term,
            definition,
            category,
            reference,
            related_term_ids: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild a persisted term (when reading from storage)
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: TermId,
        term: impl Into<String>,
        definition: Definition,
        category: Category,
        reference: Option<Reference>,
        related_term_ids: impl IntoIterator<Item = TermId>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        let term = term.into();
        Validator::validate_term_text(&term)?;

        let related_term_ids: BTreeSet<TermId> = related_term_ids.into_iter().collect();
        if related_term_ids.contains(&id) {
            return Err(AppError::ValidationError(format!(
                "Term {} cannot be related to itself",
                id
            )));
        }

        Ok(Self {
            id: Some(id),
            term,
            definition,
            category,
            reference,
            related_term_ids,
            created_at,
            updated_at,
        })
    }

    // ============================================================================================
    // COMMANDS
    // ============================================================================================

    pub fn update_definition(&mut self, definition: Definition) {
        self.definition = definition;
        self.touch();
    }

    pub fn update_category(&mut self, category: Category) {
        self.category = category;
        self.touch();
    }

    pub fn update_reference(&mut self, reference: Option<Reference>) {
        self.reference = reference;
        self.touch();
    }

    /// Returns `false` when the link already existed
    pub fn add_related_term(&mut self, related_id: TermId) -> AppResult<bool> {
        if self.id == Some(related_id) {
            return Err(AppError::ValidationError(format!(
                "Term {} cannot be related to itself",
                related_id
            )));
        }

        if !self.related_term_ids.insert(related_id) {
            return Ok(false);
        }
        self.touch();
        Ok(true)
    }

    /// Returns `false` (and leaves `updated_at` alone) when there was no link
    pub fn remove_related_term(&mut self, related_id: TermId) -> bool {
        if !self.related_term_ids.remove(&related_id) {
            return false;
        }
        self.touch();
        true
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Called by repositories once storage has assigned an identity
    pub(crate) fn assign_id(&mut self, id: TermId) {
        self.related_term_ids.remove(&id);
        self.id = Some(id);
    }

    /// Replace the link set with what storage holds
    pub(crate) fn with_related_term_ids(mut self, ids: impl IntoIterator<Item = TermId>) -> Self {
        self.related_term_ids = ids.into_iter().filter(|id| Some(*id) != self.id).collect();
        self
    }

    // ============================================================================================
    // QUERIES
    // ============================================================================================

    pub fn id(&self) -> Option<TermId> {
        self.id
    }

    /// Id of a persisted term; errors for drafts
    pub fn persisted_id(&self) -> AppResult<TermId> {
        self.id.ok_or_else(|| {
            AppError::InternalError(format!("Term '{}' has not been saved yet", self.term))
        })
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn definition(&self) -> &Definition {
        &self.definition
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn reference(&self) -> Option<&Reference> {
        self.reference.as_ref()
    }

    pub fn related_term_ids(&self) -> &BTreeSet<TermId> {
        &self.related_term_ids
    }

    pub fn is_related_to(&self, other: TermId) -> bool {
        self.related_term_ids.contains(&other)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // ============================================================================================
    // SERIALIZATION
    // ============================================================================================

    pub fn snapshot(&self) -> TermSnapshot {
        TermSnapshot::from(self)
    }

    pub fn to_json(&self) -> AppResult<serde_json::Value> {
        Ok(serde_json::to_value(self.snapshot())?)
    }
}

/// Plain structure of a term for transport and storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermSnapshot {
    pub id: Option<i32>,
    pub term: String,
    pub definition: String,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reference: Option<ReferenceSnapshot>,
    pub related_term_ids: Vec<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceSnapshot {
    pub source: String,
    pub url: Option<String>,
}

impl From<&Term> for TermSnapshot {
    fn from(term: &Term) -> Self {
        Self {
            id: term.id.map(TermId::get),
            term: term.term.clone(),
            definition: term.definition.value().to_string(),
            category: term.category,
            reference: term.reference.as_ref().map(|r| ReferenceSnapshot {
                source: r.source().to_string(),
                url: r.url().map(str::to_string),
            }),
            related_term_ids: term.related_term_ids.iter().map(|id| id.get()).collect(),
            created_at: term.created_at,
            updated_at: term.updated_at,
        }
    }
}
