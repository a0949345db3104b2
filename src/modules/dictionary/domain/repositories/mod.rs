pub mod term_repository;

pub use term_repository::TermRepository;
#[cfg(test)]
pub use term_repository::MockTermRepository;
