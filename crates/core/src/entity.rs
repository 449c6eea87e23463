//! Entity trait: identity that survives re-scoring.

/// Entity marker + minimal interface.
///
/// Stored books keep their identifier while demand and action are rewritten
/// by each scoring pass.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
