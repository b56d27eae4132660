//! Reservation requests for constructing a vector with pre-allocated capacity.

/// A request to construct an empty vector with room for `capacity` elements.
///
/// The type exists so that "reserve `n` slots" never reads like "create `n` default
/// elements": it can only be obtained through [`reserve`], and there is no implicit
/// conversion from `usize`.
///
/// ```
/// use simplevec::{SimpleVector, reserve};
///
/// let v = SimpleVector::<u32>::from(reserve(16));
/// assert!(v.is_empty());
/// assert_eq!(v.capacity(), 16);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReserveRequest {
    capacity: usize,
}

impl ReserveRequest {
    /// The requested capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Builds a [`ReserveRequest`] for `capacity` elements.
pub fn reserve(capacity: usize) -> ReserveRequest {
    ReserveRequest { capacity }
}
