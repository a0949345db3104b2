/// Tests for bidirectional term relationships
///
/// This test suite verifies:
/// 1. Linking two terms creates edges in both directions
/// 2. Unlinking removes both edges, from either side
/// 3. Deleting a term cascades to every edge that references it
/// 4. Typed relationships store the inverse type on the reverse edge
/// 5. Invalid links are rejected without partial writes
/// 6. Field updates racing with link changes never leave a one-way edge
mod utils;

use async_trait::async_trait;
use herbarium_lib::modules::dictionary::{
    Category, InMemoryTermRepository, RelationshipType, Term, TermChanges, TermId,
    TermRelationship, TermRepository,
};
use herbarium_lib::shared::application::pagination::{PaginatedResult, PaginationParams};
use herbarium_lib::shared::{AppError, AppResult};
use herbarium_lib::AppServices;
use std::sync::{Arc, Mutex};
use tokio_test::assert_err;
use utils::{factories::TermFactory, helpers};

// ============================================================================
// SYMMETRY
// ============================================================================

#[tokio::test]
async fn add_related_term_is_visible_from_both_sides() {
    let services = helpers::build_test_services();
    let basil = TermFactory::botanical("Basil").create(&services.term_service).await;
    let pesto = TermFactory::general("Pesto").create(&services.term_service).await;
    let (basil_id, pesto_id) = (helpers::id_of(&basil), helpers::id_of(&pesto));

    services
        .term_service
        .add_related_term(basil_id, pesto_id)
        .await
        .expect("Linking should succeed");

    let from_basil = services.term_service.get_related_terms(basil_id).await.unwrap();
    let from_pesto = services.term_service.get_related_terms(pesto_id).await.unwrap();
    assert_eq!(helpers::texts(&from_basil), vec!["Pesto"]);
    assert_eq!(helpers::texts(&from_pesto), vec!["Basil"]);

    let stored = services.term_service.get_term(basil_id).await.unwrap().unwrap();
    assert!(stored.is_related_to(pesto_id));

    let edges = services
        .term_service
        .get_term_relationships(pesto_id)
        .await
        .unwrap();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].related_term_id, basil_id);
    assert_eq!(edges[0].effective_type(), RelationshipType::SeeAlso);
}

#[tokio::test]
async fn linking_twice_keeps_a_single_edge_pair() {
    let services = helpers::build_test_services();
    let a = helpers::id_of(&TermFactory::new("Calyx").create(&services.term_service).await);
    let b = helpers::id_of(&TermFactory::new("Sepal").create(&services.term_service).await);

    services.term_service.add_related_term(a, b).await.unwrap();
    services.term_service.add_related_term(b, a).await.unwrap();

    assert_eq!(services.term_service.get_term_relationships(a).await.unwrap().len(), 1);
    assert_eq!(services.term_service.get_term_relationships(b).await.unwrap().len(), 1);
}

#[tokio::test]
async fn remove_related_term_clears_both_directions() {
    let services = helpers::build_test_services();
    let a = helpers::id_of(&TermFactory::new("Tepal").create(&services.term_service).await);
    let b = helpers::id_of(&TermFactory::new("Petal").create(&services.term_service).await);
    let c = helpers::id_of(&TermFactory::new("Corolla").create(&services.term_service).await);

    services.term_service.add_related_term(a, b).await.unwrap();
    services.term_service.add_related_term(a, c).await.unwrap();

    // Removing from the reverse side must clear the forward edge too
    services.term_service.remove_related_term(b, a).await.unwrap();

    let from_a = services.term_service.get_related_terms(a).await.unwrap();
    let from_b = services.term_service.get_related_terms(b).await.unwrap();
    assert_eq!(helpers::texts(&from_a), vec!["Corolla"]);
    assert!(from_b.is_empty());
}

#[tokio::test]
async fn remove_related_term_ignores_unknown_ids() {
    let services = helpers::build_test_services();
    let a = helpers::id_of(&TermFactory::new("Awn").create(&services.term_service).await);

    services
        .term_service
        .remove_related_term(a, TermId::new(999).unwrap())
        .await
        .expect("Unlinking is best-effort");
}

// ============================================================================
// CASCADE
// ============================================================================

#[tokio::test]
async fn delete_term_leaves_no_residual_edges() {
    let repository = Arc::new(InMemoryTermRepository::new());
    let services = AppServices::with_repository(repository.clone());

    let hub = helpers::id_of(&TermFactory::new("Inflorescence").create(&services.term_service).await);
    let spoke_a = helpers::id_of(&TermFactory::new("Raceme").create(&services.term_service).await);
    let spoke_b = helpers::id_of(&TermFactory::new("Spike").create(&services.term_service).await);

    services.term_service.add_related_term(hub, spoke_a).await.unwrap();
    services.term_service.add_related_term(spoke_b, hub).await.unwrap();
    services.term_service.add_related_term(spoke_a, spoke_b).await.unwrap();
    assert_eq!(repository.edge_count().await, 6);

    assert!(services.term_service.delete_term(hub).await.unwrap());

    assert_eq!(repository.edge_count().await, 2);
    for spoke in [spoke_a, spoke_b] {
        let related = services.term_service.get_related_terms(spoke).await.unwrap();
        assert!(related.iter().all(|t| t.id() != Some(hub)));
        assert_eq!(related.len(), 1);
    }
    assert!(services.term_service.get_related_terms(hub).await.unwrap().is_empty());
}

// ============================================================================
// TYPED RELATIONSHIPS
// ============================================================================

#[tokio::test]
async fn broader_link_stores_narrower_on_reverse_edge() {
    let services = helpers::build_test_services();
    let herb = helpers::id_of(&TermFactory::new("Herb").create(&services.term_service).await);
    let basil = helpers::id_of(&TermFactory::botanical("Basil").create(&services.term_service).await);

    services
        .term_service
        .relate_terms(basil, herb, RelationshipType::Broader)
        .await
        .unwrap();

    let forward = services.term_service.get_term_relationships(basil).await.unwrap();
    let reverse = services.term_service.get_term_relationships(herb).await.unwrap();
    assert_eq!(forward[0].effective_type(), RelationshipType::Broader);
    assert_eq!(reverse[0].effective_type(), RelationshipType::Narrower);
}

#[tokio::test]
async fn symmetric_types_are_mirrored() {
    let services = helpers::build_test_services();
    let a = helpers::id_of(&TermFactory::new("Astringent").create(&services.term_service).await);
    let b = helpers::id_of(&TermFactory::new("Emollient").create(&services.term_service).await);

    services
        .term_service
        .relate_terms(a, b, RelationshipType::Antonym)
        .await
        .unwrap();

    let reverse = services.term_service.get_term_relationships(b).await.unwrap();
    assert_eq!(reverse[0].effective_type(), RelationshipType::Antonym);
}

// ============================================================================
// REJECTED LINKS
// ============================================================================

#[tokio::test]
async fn self_relation_is_rejected() {
    let services = helpers::build_test_services();
    let a = helpers::id_of(&TermFactory::new("Node").create(&services.term_service).await);

    let err = assert_err!(services.term_service.add_related_term(a, a).await);
    assert!(matches!(err, AppError::ValidationError(_)));
    assert!(services.term_service.get_related_terms(a).await.unwrap().is_empty());
}

#[tokio::test]
async fn linking_unknown_term_is_not_found_and_writes_nothing() {
    let repository = Arc::new(InMemoryTermRepository::new());
    let services = AppServices::with_repository(repository.clone());
    let a = helpers::id_of(&TermFactory::new("Stipule").create(&services.term_service).await);
    let missing = TermId::new(404).unwrap();

    let err = assert_err!(services.term_service.add_related_term(a, missing).await);
    assert!(matches!(err, AppError::NotFound(_)));

    let err = assert_err!(services.term_service.add_related_term(missing, a).await);
    assert!(matches!(err, AppError::NotFound(_)));

    assert_eq!(repository.edge_count().await, 0);
}

#[tokio::test]
async fn concurrent_links_stay_symmetric() {
    let repository = Arc::new(InMemoryTermRepository::new());
    let services = AppServices::with_repository(repository.clone());

    let mut ids = Vec::new();
    for text in ["Alpha", "Beta", "Gamma", "Delta"] {
        ids.push(helpers::id_of(&TermFactory::new(text).create(&services.term_service).await));
    }

    let mut handles = Vec::new();
    for (i, &a) in ids.iter().enumerate() {
        for &b in &ids[i + 1..] {
            let service = services.term_service.clone();
            handles.push(tokio::spawn(async move { service.add_related_term(a, b).await }));
        }
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // Four terms, fully connected: six pairs, twelve directed edges
    assert_eq!(repository.edge_count().await, 12);
    for &id in &ids {
        let edges = repository.find_relationships(id).await.unwrap();
        assert_eq!(edges.len(), 3);
        for edge in edges {
            let back = repository.find_relationships(edge.related_term_id).await.unwrap();
            assert!(back.iter().any(|e| e.related_term_id == id));
        }
    }
}

// ============================================================================
// FIELD UPDATES VS LINK CHANGES
// ============================================================================

async fn assert_symmetric(repository: &dyn TermRepository, ids: &[TermId]) {
    for &id in ids {
        for edge in repository.find_relationships(id).await.unwrap() {
            let back = repository
                .find_relationships(edge.related_term_id)
                .await
                .unwrap();
            assert!(
                back.iter().any(|e| e.related_term_id == id),
                "edge {} -> {} has no reverse",
                id,
                edge.related_term_id
            );
        }
    }
}

/// In-memory store that commits a queued link just before a field update lands,
/// as a concurrent request would between `update_term`'s read and its write
struct LinkBeforeUpdate {
    inner: InMemoryTermRepository,
    queued: Mutex<Option<(TermId, TermId)>>,
}

#[async_trait]
impl TermRepository for LinkBeforeUpdate {
    async fn find_by_id(&self, id: TermId) -> AppResult<Option<Term>> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_exact_term(&self, term: &str) -> AppResult<Vec<Term>> {
        self.inner.find_by_exact_term(term).await
    }

    async fn search_by_term(&self, partial: &str) -> AppResult<Vec<Term>> {
        self.inner.search_by_term(partial).await
    }

    async fn find_by_category(&self, category: Category) -> AppResult<Vec<Term>> {
        self.inner.find_by_category(category).await
    }

    async fn find_related_terms(&self, id: TermId) -> AppResult<Vec<Term>> {
        self.inner.find_related_terms(id).await
    }

    async fn find_relationships(&self, id: TermId) -> AppResult<Vec<TermRelationship>> {
        self.inner.find_relationships(id).await
    }

    async fn find_all(&self, pagination: PaginationParams) -> AppResult<PaginatedResult<Term>> {
        self.inner.find_all(pagination).await
    }

    async fn save(&self, term: &Term) -> AppResult<Term> {
        self.inner.save(term).await
    }

    async fn update(&self, term: &Term) -> AppResult<Term> {
        let queued = self.queued.lock().unwrap().take();
        if let Some((a, b)) = queued {
            self.inner.link(a, b, RelationshipType::SeeAlso).await?;
        }
        self.inner.update(term).await
    }

    async fn delete(&self, id: TermId) -> AppResult<bool> {
        self.inner.delete(id).await
    }

    async fn add_relationship(
        &self,
        term_id: TermId,
        related_term_id: TermId,
        relationship_type: Option<RelationshipType>,
    ) -> AppResult<()> {
        self.inner
            .add_relationship(term_id, related_term_id, relationship_type)
            .await
    }

    async fn remove_relationship(&self, term_id: TermId, related_term_id: TermId) -> AppResult<()> {
        self.inner.remove_relationship(term_id, related_term_id).await
    }

    async fn link(&self, a: TermId, b: TermId, relationship_type: RelationshipType) -> AppResult<()> {
        self.inner.link(a, b, relationship_type).await
    }

    async fn unlink(&self, a: TermId, b: TermId) -> AppResult<()> {
        self.inner.unlink(a, b).await
    }
}

#[tokio::test]
async fn update_term_keeps_link_made_after_its_read() {
    let repository = Arc::new(LinkBeforeUpdate {
        inner: InMemoryTermRepository::new(),
        queued: Mutex::new(None),
    });
    let services = AppServices::with_repository(repository.clone());

    let basil = helpers::id_of(&TermFactory::botanical("Basil").create(&services.term_service).await);
    let pesto = helpers::id_of(&TermFactory::new("Pesto").create(&services.term_service).await);
    *repository.queued.lock().unwrap() = Some((basil, pesto));

    let updated = services
        .term_service
        .update_term(basil, TermChanges::new().definition("Sweet culinary herb"))
        .await
        .unwrap();

    assert_eq!(updated.definition().as_str(), "Sweet culinary herb");
    assert!(updated.is_related_to(pesto));

    let from_basil = services.term_service.get_related_terms(basil).await.unwrap();
    let from_pesto = services.term_service.get_related_terms(pesto).await.unwrap();
    assert_eq!(helpers::texts(&from_basil), vec!["Pesto"]);
    assert_eq!(helpers::texts(&from_pesto), vec!["Basil"]);
    assert_eq!(repository.inner.edge_count().await, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn updates_racing_with_link_changes_stay_symmetric() {
    let repository = Arc::new(InMemoryTermRepository::new());
    let services = AppServices::with_repository(repository.clone());

    let mut ids = Vec::new();
    for text in ["Leaf", "Stem", "Root", "Flower", "Seed"] {
        ids.push(helpers::id_of(&TermFactory::botanical(text).create(&services.term_service).await));
    }

    let mut handles = Vec::new();
    for round in 0..20usize {
        for (i, &a) in ids.iter().enumerate() {
            let b = ids[(i + round + 1) % ids.len()];
            if a == b {
                continue;
            }

            let service = services.term_service.clone();
            handles.push(tokio::spawn(async move {
                if round % 3 == 2 {
                    service.remove_related_term(a, b).await
                } else {
                    service.add_related_term(a, b).await
                }
            }));

            let service = services.term_service.clone();
            handles.push(tokio::spawn(async move {
                service
                    .update_term(a, TermChanges::new().definition(format!("Revision {}", round)))
                    .await
                    .map(|_| ())
            }));
        }
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_symmetric(repository.as_ref(), &ids).await;
    assert_eq!(repository.edge_count().await % 2, 0);
}
