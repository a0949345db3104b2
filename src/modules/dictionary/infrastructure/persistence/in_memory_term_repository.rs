use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::RwLock;

use crate::log_debug;
use crate::modules::dictionary::domain::{
    entities::{Term, TermRelationship},
    repositories::TermRepository,
    value_objects::{Category, RelationshipType, TermId},
};
use crate::shared::application::pagination::{PaginatedResult, PaginationParams};
use crate::shared::errors::{AppError, AppResult};

type EdgeMap = BTreeMap<(TermId, TermId), TermRelationship>;

/// Process-local term store for tests and storage-less deployments.
///
/// Term rows live in a `DashMap`; edges live behind one `RwLock`. Writers take
/// the edge lock before touching the term map, which makes `save`, `delete`,
/// `link` and `unlink` atomic with respect to each other. Foreign-key rules of
/// the relational schema are mirrored: edges must point at stored terms.
#[derive(Debug)]
pub struct InMemoryTermRepository {
    terms: DashMap<TermId, Term>,
    edges: RwLock<EdgeMap>,
    next_id: AtomicI32,
}

impl Default for InMemoryTermRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTermRepository {
    pub fn new() -> Self {
        Self {
            terms: DashMap::new(),
            edges: RwLock::new(BTreeMap::new()),
            next_id: AtomicI32::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of directed edges currently stored
    pub async fn edge_count(&self) -> usize {
        self.edges.read().await.len()
    }

    fn allocate_id(&self) -> AppResult<TermId> {
        let raw = self.next_id.fetch_add(1, Ordering::SeqCst);
        TermId::new(raw)
    }

    fn reserve_id(&self, id: TermId) {
        self.next_id
            .fetch_max(id.get().saturating_add(1), Ordering::SeqCst);
    }

    fn require_stored(&self, id: TermId) -> AppResult<()> {
        if self.terms.contains_key(&id) {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Term with ID {} not found", id)))
        }
    }

    fn outgoing(edges: &EdgeMap, id: TermId) -> Vec<TermId> {
        edges
            .keys()
            .filter(|(from, _)| *from == id)
            .map(|(_, to)| *to)
            .collect()
    }

    /// Attach stored edges, order by text then id
    fn hydrate(edges: &EdgeMap, mut terms: Vec<Term>) -> Vec<Term> {
        terms.sort_by(|a, b| a.term().cmp(b.term()).then_with(|| a.id().cmp(&b.id())));
        terms
            .into_iter()
            .map(|term| {
                let related = match term.id() {
                    Some(id) => Self::outgoing(edges, id),
                    None => Vec::new(),
                };
                term.with_related_term_ids(related)
            })
            .collect()
    }

    fn collect_where<F>(&self, predicate: F) -> Vec<Term>
    where
        F: Fn(&Term) -> bool,
    {
        self.terms
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Insert `edge`, or retype the stored edge keeping its `created_at`
    fn upsert_edge(edges: &mut EdgeMap, edge: TermRelationship) {
        edges
            .entry((edge.term_id, edge.related_term_id))
            .and_modify(|stored| {
                stored.relationship_type = edge.relationship_type;
                stored.updated_at = Utc::now();
            })
            .or_insert(edge);
    }
}

#[async_trait]
impl TermRepository for InMemoryTermRepository {
    async fn find_by_id(&self, id: TermId) -> AppResult<Option<Term>> {
        let edges = self.edges.read().await;
        let term = self.terms.get(&id).map(|entry| entry.value().clone());
        Ok(term.map(|t| t.with_related_term_ids(Self::outgoing(&edges, id))))
    }

    async fn find_by_exact_term(&self, term: &str) -> AppResult<Vec<Term>> {
        let edges = self.edges.read().await;
        let matches = self.collect_where(|t| t.term() == term);
        Ok(Self::hydrate(&edges, matches))
    }

    async fn search_by_term(&self, partial: &str) -> AppResult<Vec<Term>> {
        let needle = partial.to_lowercase();
        let edges = self.edges.read().await;
        let matches = self.collect_where(|t| t.term().to_lowercase().contains(&needle));
        Ok(Self::hydrate(&edges, matches))
    }

    async fn find_by_category(&self, category: Category) -> AppResult<Vec<Term>> {
        let edges = self.edges.read().await;
        let matches = self.collect_where(|t| t.category() == category);
        Ok(Self::hydrate(&edges, matches))
    }

    async fn find_related_terms(&self, id: TermId) -> AppResult<Vec<Term>> {
        let edges = self.edges.read().await;
        let related: Vec<Term> = Self::outgoing(&edges, id)
            .into_iter()
            .filter_map(|related_id| self.terms.get(&related_id).map(|e| e.value().clone()))
            .collect();
        Ok(Self::hydrate(&edges, related))
    }

    async fn find_relationships(&self, id: TermId) -> AppResult<Vec<TermRelationship>> {
        let edges = self.edges.read().await;
        Ok(edges
            .iter()
            .filter(|((from, _), _)| *from == id)
            .map(|(_, edge)| edge.clone())
            .collect())
    }

    async fn find_all(&self, pagination: PaginationParams) -> AppResult<PaginatedResult<Term>> {
        let edges = self.edges.read().await;
        let all = Self::hydrate(&edges, self.collect_where(|_| true));
        let total = all.len() as u64;

        let items = all
            .into_iter()
            .skip(pagination.offset().max(0) as usize)
            .take(pagination.limit().max(0) as usize)
            .collect();

        Ok(PaginatedResult::new(items, total, &pagination))
    }

    async fn save(&self, term: &Term) -> AppResult<Term> {
        let mut edges = self.edges.write().await;

        let id = match term.id() {
            Some(id) => {
                self.reserve_id(id);
                id
            }
            None => self.allocate_id()?,
        };

        let mut stored = term.clone();
        stored.assign_id(id);

        let desired: BTreeSet<TermId> = stored.related_term_ids().clone();
        for related_id in &desired {
            self.require_stored(*related_id)?;
        }

        edges.retain(|(from, to), _| *from != id || desired.contains(to));
        for related_id in &desired {
            edges
                .entry((id, *related_id))
                .or_insert_with(|| TermRelationship::new(id, *related_id, Some(RelationshipType::SeeAlso)));
        }

        self.terms
            .insert(id, stored.clone().with_related_term_ids(Vec::new()));
        log_debug!("Stored term {} in memory", id);

        Ok(stored)
    }

    async fn update(&self, term: &Term) -> AppResult<Term> {
        let id = term.persisted_id()?;
        // Held only to order this write against link/unlink/save; edges are not modified
        let edges = self.edges.write().await;

        let stored = term.clone().with_related_term_ids(Vec::new());
        match self.terms.get_mut(&id) {
            Some(mut entry) => *entry = stored.clone(),
            None => return Err(AppError::NotFound(format!("Term with ID {} not found", id))),
        }
        log_debug!("Updated term {} in memory", id);

        Ok(stored.with_related_term_ids(Self::outgoing(&edges, id)))
    }

    async fn delete(&self, id: TermId) -> AppResult<bool> {
        let mut edges = self.edges.write().await;
        edges.retain(|(from, to), _| *from != id && *to != id);
        Ok(self.terms.remove(&id).is_some())
    }

    async fn add_relationship(
        &self,
        term_id: TermId,
        related_term_id: TermId,
        relationship_type: Option<RelationshipType>,
    ) -> AppResult<()> {
        if term_id == related_term_id {
            return Err(AppError::ValidationError(format!(
                "Term {} cannot be related to itself",
                term_id
            )));
        }

        let mut edges = self.edges.write().await;
        self.require_stored(term_id)?;
        self.require_stored(related_term_id)?;

        edges
            .entry((term_id, related_term_id))
            .or_insert_with(|| TermRelationship::new(term_id, related_term_id, relationship_type));
        Ok(())
    }

    async fn remove_relationship(
        &self,
        term_id: TermId,
        related_term_id: TermId,
    ) -> AppResult<()> {
        self.edges
            .write()
            .await
            .remove(&(term_id, related_term_id));
        Ok(())
    }

    async fn link(
        &self,
        a: TermId,
        b: TermId,
        relationship_type: RelationshipType,
    ) -> AppResult<()> {
        if a == b {
            return Err(AppError::ValidationError(format!(
                "Term {} cannot be related to itself",
                a
            )));
        }

        let mut edges = self.edges.write().await;
        self.require_stored(a)?;
        self.require_stored(b)?;

        let forward = TermRelationship::new(a, b, Some(relationship_type));
        let reverse = forward.reversed();
        Self::upsert_edge(&mut edges, forward);
        Self::upsert_edge(&mut edges, reverse);
        Ok(())
    }

    async fn unlink(&self, a: TermId, b: TermId) -> AppResult<()> {
        let mut edges = self.edges.write().await;
        edges.remove(&(a, b));
        edges.remove(&(b, a));
        Ok(())
    }
}
