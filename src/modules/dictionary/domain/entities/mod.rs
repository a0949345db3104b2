pub mod term;
pub mod term_relationship;

pub use term::{ReferenceSnapshot, Term, TermSnapshot};
pub use term_relationship::TermRelationship;
