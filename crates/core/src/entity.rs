//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Durable records (items, borrowers, loans, returns) implement this so the
/// store can key them uniformly by a strongly-typed identifier.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}
