//! Common contract for value objects

use std::fmt;

/// A validated, immutable wrapper around one primitive.
///
/// Equality is by wrapped value. Any "update" builds a new instance.
pub trait ValueObject: Clone + PartialEq + fmt::Display {
    type Value: ?Sized;

    /// The wrapped primitive
    fn value(&self) -> &Self::Value;

    /// Compare by wrapped value
    fn same_value_as(&self, other: &Self) -> bool {
        self == other
    }
}
