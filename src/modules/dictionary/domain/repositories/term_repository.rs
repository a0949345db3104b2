use async_trait::async_trait;

use crate::modules::dictionary::domain::{
    entities::{Term, TermRelationship},
    value_objects::{Category, RelationshipType, TermId},
};
use crate::shared::application::pagination::{PaginatedResult, PaginationParams};
use crate::shared::errors::AppResult;

/// Port (interface) for term persistence following Hexagonal Architecture.
///
/// List results are ordered by term text, then id. Relationship rows are
/// directed; keeping both directions in step is the caller's job, and `link` /
/// `unlink` exist to do it in one atomic step.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TermRepository: Send + Sync {
    async fn find_by_id(&self, id: TermId) -> AppResult<Option<Term>>;

    /// Case-sensitive exact match. Several categories may share one text.
    async fn find_by_exact_term(&self, term: &str) -> AppResult<Vec<Term>>;

    /// Case-insensitive substring match
    async fn search_by_term(&self, partial: &str) -> AppResult<Vec<Term>>;

    async fn find_by_category(&self, category: Category) -> AppResult<Vec<Term>>;

    /// Full entities for every outgoing edge of `id`
    async fn find_related_terms(&self, id: TermId) -> AppResult<Vec<Term>>;

    /// Outgoing edge rows of `id`
    async fn find_relationships(&self, id: TermId) -> AppResult<Vec<TermRelationship>>;

    async fn find_all(&self, pagination: PaginationParams) -> AppResult<PaginatedResult<Term>>;

    /// Upsert by id. Drafts and unknown ids are inserted; the outgoing edge set
    /// is replaced by `term.related_term_ids()`, keeping types of edges that stay.
    /// Related ids must name stored terms, otherwise `NotFound`.
    async fn save(&self, term: &Term) -> AppResult<Term>;

    /// Writes the row fields of a stored term and never touches its edges.
    /// Returns the term with the edges as currently stored; `NotFound` when the
    /// id is unknown. Drafts are rejected.
    async fn update(&self, term: &Term) -> AppResult<Term>;

    /// Removes the term and every edge referencing it in either direction
    async fn delete(&self, id: TermId) -> AppResult<bool>;

    /// Idempotent insert of one directed edge
    async fn add_relationship(
        &self,
        term_id: TermId,
        related_term_id: TermId,
        relationship_type: Option<RelationshipType>,
    ) -> AppResult<()>;

    /// Deletes one directed edge
    async fn remove_relationship(&self, term_id: TermId, related_term_id: TermId)
        -> AppResult<()>;

    /// Writes `a -> b` with `relationship_type` and `b -> a` with its inverse, atomically
    async fn link(
        &self,
        a: TermId,
        b: TermId,
        relationship_type: RelationshipType,
    ) -> AppResult<()>;

    /// Deletes both directed edges between `a` and `b`, atomically
    async fn unlink(&self, a: TermId, b: TermId) -> AppResult<()>;
}
