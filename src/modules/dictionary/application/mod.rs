pub mod dto;
pub mod service;

pub use dto::{ReferenceUpdate, TermChanges};
pub use service::TermService;
