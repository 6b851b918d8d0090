//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined entirely
//! by their attribute values. Two value objects with the same values are considered equal.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one.
///
/// - **Value Object**: `Money` (a price of 12.50 equals any other price of 12.50)
/// - **Entity**: `Product` (two products with the same id are the same product,
///   even after a rename)
///
/// ```ignore
/// let a = Money::from_major_units(12.5)?;
/// let b = Money::from_cents(1250);
/// assert_eq!(a, b);
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
