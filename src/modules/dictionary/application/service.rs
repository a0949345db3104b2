use std::sync::Arc;

use super::dto::TermChanges;
use crate::modules::dictionary::domain::{
    entities::{Term, TermRelationship},
    repositories::TermRepository,
    value_objects::{Category, Definition, Reference, RelationshipType, TermId},
};
use crate::shared::application::pagination::{PaginatedResult, PaginationParams};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::{LogContext, Validator};
use crate::{log_debug, log_info};

/// Entry point for presentation-layer handlers.
///
/// Holds no state of its own; every call is a short sequence of repository
/// operations. Errors are returned as-is, never retried.
pub struct TermService {
    repository: Arc<dyn TermRepository>,
}

impl TermService {
    pub fn new(repository: Arc<dyn TermRepository>) -> Self {
        Self { repository }
    }

    /// Rejects text already stored under any category with `DuplicateTerm`.
    ///
    /// The check is a read followed by a separate `save`, and the schema has no
    /// unique index on `term`, so two concurrent creates of the same text can
    /// both succeed. Callers that need strict uniqueness serialize creates.
    #[tracing::instrument(skip(self, definition), level = "debug")]
    pub async fn create_term(
        &self,
        term: &str,
        definition: &str,
        category: Category,
        reference: Option<&str>,
        url: Option<&str>,
    ) -> AppResult<Term> {
        // Text must be unique across every category
        let existing = self.repository.find_by_exact_term(term).await?;
        if let Some(conflict) = existing.first() {
            return Err(AppError::DuplicateTerm {
                term: term.to_string(),
                category: conflict.category(),
            });
        }

        let definition = Definition::new(definition)?;
        let reference = Self::build_reference(reference, url)?;
        let draft = Term::new(term, definition, category, reference)?;

        let saved = self.repository.save(&draft).await?;
        log_info!(
            "Created term '{}' ({}) with id {:?}",
            saved.term(),
            saved.category(),
            saved.id()
        );

        Ok(saved)
    }

    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn update_term(&self, id: TermId, changes: TermChanges) -> AppResult<Term> {
        let mut term = self.require_term(id).await?;

        if changes.is_empty() {
            log_debug!("No changes supplied for term {}", id);
            return Ok(term);
        }

        // Validate everything before touching the entity
        let definition = changes.definition.map(Definition::new).transpose()?;
        let reference = changes.reference.resolve()?;

        if let Some(definition) = definition {
            term.update_definition(definition);
        }
        if let Some(category) = changes.category {
            term.update_category(category);
        }
        if let Some(reference) = reference {
            term.update_reference(reference);
        }

        // Field write only: edges linked or unlinked since the read are kept
        let saved = self.repository.update(&term).await?;
        log_info!("Updated term {} ('{}')", id, saved.term());

        Ok(saved)
    }

    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn delete_term(&self, id: TermId) -> AppResult<bool> {
        let deleted = self.repository.delete(id).await?;
        if deleted {
            log_info!("Deleted term {}", id);
        } else {
            log_debug!("Delete requested for unknown term {}", id);
        }
        Ok(deleted)
    }

    /// Symmetric "see also" link
    pub async fn add_related_term(&self, term_id: TermId, related_term_id: TermId) -> AppResult<()> {
        self.relate_terms(term_id, related_term_id, RelationshipType::SeeAlso)
            .await
    }

    /// Link two existing terms; the reverse edge gets `relationship_type.inverse()`
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn relate_terms(
        &self,
        term_id: TermId,
        related_term_id: TermId,
        relationship_type: RelationshipType,
    ) -> AppResult<()> {
        if term_id == related_term_id {
            return Err(AppError::ValidationError(format!(
                "Term {} cannot be related to itself",
                term_id
            )));
        }

        let (term, related) = futures::try_join!(
            self.repository.find_by_id(term_id),
            self.repository.find_by_id(related_term_id)
        )?;
        if term.is_none() {
            return Err(Self::not_found(term_id));
        }
        if related.is_none() {
            return Err(Self::not_found(related_term_id));
        }

        self.repository
            .link(term_id, related_term_id, relationship_type)
            .await?;
        log_info!(
            "Linked terms {} <-> {} as {}",
            term_id,
            related_term_id,
            relationship_type
        );

        Ok(())
    }

    /// Best-effort: no existence check on either id
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn remove_related_term(
        &self,
        term_id: TermId,
        related_term_id: TermId,
    ) -> AppResult<()> {
        self.repository.unlink(term_id, related_term_id).await?;
        log_info!("Unlinked terms {} <-> {}", term_id, related_term_id);
        Ok(())
    }

    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn search_terms(&self, text: &str, category: Option<Category>) -> AppResult<Vec<Term>> {
        let mut terms = self.repository.search_by_term(text).await?;
        if let Some(category) = category {
            terms.retain(|term| term.category() == category);
        }

        LogContext::term_search(text, category.map(|c| c.as_str()), terms.len());
        Ok(terms)
    }

    pub async fn get_terms_by_category(&self, category: Category) -> AppResult<Vec<Term>> {
        self.repository.find_by_category(category).await
    }

    pub async fn get_related_terms(&self, term_id: TermId) -> AppResult<Vec<Term>> {
        self.repository.find_related_terms(term_id).await
    }

    pub async fn get_term_relationships(&self, term_id: TermId) -> AppResult<Vec<TermRelationship>> {
        self.repository.find_relationships(term_id).await
    }

    pub async fn get_term(&self, id: TermId) -> AppResult<Option<Term>> {
        self.repository.find_by_id(id).await
    }

    pub async fn list_terms(&self, pagination: PaginationParams) -> AppResult<PaginatedResult<Term>> {
        Validator::validate_pagination(pagination.page, pagination.page_size)?;
        self.repository.find_all(pagination).await
    }

    // --- helpers ---

    async fn require_term(&self, id: TermId) -> AppResult<Term> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    fn not_found(id: TermId) -> AppError {
        AppError::NotFound(format!("Term with ID {} not found", id))
    }

    /// Blank source means no reference; a URL alone is dropped
    fn build_reference(source: Option<&str>, url: Option<&str>) -> AppResult<Option<Reference>> {
        match source.filter(|s| !s.trim().is_empty()) {
            Some(source) => Ok(Some(Reference::new(source, url.map(str::to_string))?)),
            None => Ok(None),
        }
    }
}
