/// Shared domain concepts
///
/// Building blocks reused by every bounded context.
pub mod value_object;

pub use value_object::ValueObject;
