//! Owned, fixed-size blocks of element slots backing the simplevec containers.
//!
//! A [`SlotBuffer`] holds raw, possibly uninitialized storage for a number of
//! elements and nothing more: it never constructs or drops the values placed in
//! its slots. Tracking which slots are live is the job of the container built on
//! top of it.

pub mod buffer;

pub use buffer::SlotBuffer;
