pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-exports for easy external access
pub use application::{ReferenceUpdate, TermChanges, TermService};
pub use domain::value_objects::{Category, Definition, Reference, RelationshipType, TermId};
pub use domain::{Term, TermRelationship, TermRepository, TermSnapshot};
pub use infrastructure::persistence::{InMemoryTermRepository, TermRepositoryImpl};
