//! A growable contiguous array with explicit capacity management.
//!
//! [`SimpleVector`] keeps a logical size over an exclusively owned
//! [`SlotBuffer`](simplevec_buffer::SlotBuffer) and grows it geometrically, giving
//! amortized O(1) appends. Insertion and removal at arbitrary positions shift the tail
//! in place.
//!
//! ```
//! use simplevec::{SimpleVector, reserve};
//!
//! let mut v = SimpleVector::from(reserve(4));
//! for i in 0..4 {
//!     v.push_back(i);
//! }
//! assert_eq!(v.capacity(), 4);
//!
//! v.push_back(4);
//! assert_eq!(v.capacity(), 8);
//! assert_eq!(v, [0, 1, 2, 3, 4]);
//! ```
//!
//! # Access
//!
//! - [`SimpleVector::at`] is bounds-checked and returns an out-of-range error.
//! - Indexing (`v[i]`, through the slice view) panics on a bad index.
//! - [`SimpleVector::at_unchecked`] is `unsafe` and only checked by debug assertions.
//!
//! References into the vector cannot outlive a call that may reallocate, shift or
//! swap its contents; the borrow checker enforces what would otherwise be iterator
//! invalidation rules.

pub mod iter;
pub mod reserve;
pub mod vector;

pub use iter::IntoIter;
pub use reserve::{ReserveRequest, reserve};
pub use simplevec_common::{
    Result,
    error::{Error, ErrorKind},
};
pub use vector::SimpleVector;
