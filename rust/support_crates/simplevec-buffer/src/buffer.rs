use std::mem::MaybeUninit;

use simplevec_common::{Result, error::Error};

/// An exclusively owned, contiguous block of `len` element slots.
///
/// The buffer is move-only: it deliberately does not implement `Clone`, since copying
/// the slots bitwise would alias whatever values the owner placed in them. Element
/// level copies are defined by the container that owns the buffer.
///
/// Slots are handed out as `MaybeUninit<T>`. Dropping the buffer releases the memory
/// block exactly once, without running any element destructors.
///
/// # Examples
///
/// ```
/// use simplevec_buffer::SlotBuffer;
///
/// let mut a = SlotBuffer::<u32>::allocate(4).unwrap();
/// let mut b = SlotBuffer::<u32>::new();
/// assert_eq!(a.len(), 4);
/// assert!(b.is_empty());
///
/// a.swap(&mut b);
/// assert!(a.is_empty());
/// assert_eq!(b.len(), 4);
/// ```
pub struct SlotBuffer<T> {
    /// Backing storage. `slots.len()` is the block length; the `Vec` capacity may
    /// exceed it and is never exposed.
    slots: Vec<MaybeUninit<T>>,
}

impl<T> SlotBuffer<T> {
    /// Creates an empty buffer without allocating.
    pub const fn new() -> SlotBuffer<T> {
        SlotBuffer { slots: Vec::new() }
    }

    /// Allocates a block of exactly `len` uninitialized slots.
    ///
    /// A zero `len` yields the empty buffer and never touches the allocator.
    ///
    /// # Errors
    ///
    /// Returns an allocation error if the block size overflows or the allocator
    /// refuses the request.
    pub fn allocate(len: usize) -> Result<SlotBuffer<T>> {
        if len == 0 {
            return Ok(SlotBuffer::new());
        }

        let mut slots = Vec::new();
        if let Err(e) = slots.try_reserve_exact(len) {
            log::debug!(
                "slot buffer allocation of {len} x {} bytes failed: {e}",
                std::mem::size_of::<T>()
            );
            return Err(Error::alloc(len, e));
        }
        // `MaybeUninit` slots need no initialization and the capacity covers `len`.
        unsafe {
            slots.set_len(len);
        }
        Ok(SlotBuffer { slots })
    }

    /// Returns the number of slots in the block.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the buffer owns no slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns a raw pointer to the first slot.
    ///
    /// For an empty buffer the pointer is dangling but non-null and well aligned.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.slots.as_ptr().cast()
    }

    /// Returns a mutable raw pointer to the first slot.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.slots.as_mut_ptr().cast()
    }

    /// Returns the slots as a slice of possibly uninitialized values.
    #[inline]
    pub fn slots(&self) -> &[MaybeUninit<T>] {
        &self.slots
    }

    /// Returns the slots as a mutable slice of possibly uninitialized values.
    #[inline]
    pub fn slots_mut(&mut self) -> &mut [MaybeUninit<T>] {
        &mut self.slots
    }

    /// Exchanges the blocks owned by `self` and `other`. O(1), no element copies.
    #[inline]
    pub fn swap(&mut self, other: &mut SlotBuffer<T>) {
        std::mem::swap(&mut self.slots, &mut other.slots);
    }

    /// Moves the block out, leaving `self` empty.
    #[inline]
    pub fn take(&mut self) -> SlotBuffer<T> {
        std::mem::take(self)
    }

    /// Frees the block now and leaves `self` empty.
    ///
    /// Values still living in the slots are not dropped.
    pub fn release(&mut self) {
        drop(self.take());
    }
}

impl<T> Default for SlotBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for SlotBuffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotBuffer")
            .field("len", &self.len())
            .field("ptr", &self.as_ptr())
            .finish()
    }
}
