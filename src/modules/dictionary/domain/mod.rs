pub mod entities;
pub mod repositories;
pub mod value_objects;

// Re-exports for easy access
pub use entities::{Term, TermRelationship, TermSnapshot};
pub use repositories::term_repository::TermRepository;
