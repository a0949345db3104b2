/// Test helper functions and service builders
use herbarium_lib::modules::dictionary::{
    InMemoryTermRepository, Term, TermId, TermRepository, TermRepositoryImpl, TermService,
};
use herbarium_lib::AppServices;
use std::sync::Arc;

pub struct TestServices {
    pub term_service: Arc<TermService>,
    pub term_repository: Arc<dyn TermRepository>,
}

impl From<AppServices> for TestServices {
    fn from(services: AppServices) -> Self {
        Self {
            term_service: services.term_service,
            term_repository: services.term_repository,
        }
    }
}

/// Services over a fresh in-memory store
pub fn build_test_services() -> TestServices {
    let repository: Arc<dyn TermRepository> = Arc::new(InMemoryTermRepository::new());
    AppServices::with_repository(repository).into()
}

/// Services over a freshly migrated PostgreSQL schema
pub fn build_postgres_services(url: &str) -> TestServices {
    let db = super::db::fresh_database(url);
    let repository: Arc<dyn TermRepository> = Arc::new(TermRepositoryImpl::new(db));
    AppServices::with_repository(repository).into()
}

pub fn id_of(term: &Term) -> TermId {
    term.id().expect("saved term has an id")
}

pub fn texts(terms: &[Term]) -> Vec<&str> {
    terms.iter().map(Term::term).collect()
}
