/// Term repository implementations
///
/// 1. **TermRepositoryImpl** - PostgreSQL via diesel + r2d2
///    - Terms and directed relationship rows in two tables
///    - Transactional save/delete/link/unlink
///
/// 2. **InMemoryTermRepository** - process-local store
///    - Same contract, used by tests and storage-less setups
pub mod in_memory_term_repository;
pub mod mapper;
pub mod term_repository_impl;

pub use in_memory_term_repository::InMemoryTermRepository;
pub use mapper::TermMapper;
pub use term_repository_impl::TermRepositoryImpl;
