//! Dictionary value objects

pub mod category;
pub mod definition;
pub mod reference;
pub mod relationship_type;
pub mod term_id;

pub use category::Category;
pub use definition::Definition;
pub use reference::Reference;
pub use relationship_type::RelationshipType;
pub use term_id::TermId;
