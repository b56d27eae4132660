use std::{
    borrow::{Borrow, BorrowMut},
    cmp::Ordering,
    hash::{Hash, Hasher},
    ops::{Deref, DerefMut},
    ptr,
};

use simplevec_buffer::SlotBuffer;
use simplevec_common::{Result, error::Error, verify_index};

use crate::reserve::ReserveRequest;

/// A contiguous growable array with explicit size and capacity.
///
/// Elements live in a [`SlotBuffer`] owned exclusively by the vector. Positions
/// `[0, len)` hold live values, `[len, capacity)` are allocated but empty. When an
/// operation needs more room than the buffer has, a larger buffer is allocated, the
/// live elements are moved over and the buffers are swapped.
///
/// # Growth
///
/// Growing past the current capacity selects `max(capacity * GROWTH_FACTOR, required)`
/// as the new capacity, so a vector that started empty gets exactly the first size it
/// asks for and then doubles. `reserve` is the exception and allocates exactly the
/// requested capacity.
///
/// # Failure guarantees
///
/// Every allocating operation has a `try_` form returning an allocation error, and an
/// infallible form that panics with the same message.
///
/// - Strong (no effect on failure): `try_push_back`, `try_reserve`, `clone_from`.
/// - Basic (valid, possibly modified): `insert`, `erase`, `remove`, and the default
///   fill phase of `resize`.
///
/// # Examples
///
/// ```
/// use simplevec::SimpleVector;
///
/// let mut v = SimpleVector::from([2, 3]);
/// v.insert(0, 1);
/// v.push_back(4);
/// assert_eq!(v, [1, 2, 3, 4]);
/// assert_eq!(v.erase(1), Some(&mut 3));
/// assert!(v.at(3).is_err());
/// ```
pub struct SimpleVector<T> {
    buf: SlotBuffer<T>,
    len: usize,
}

impl<T> SimpleVector<T> {
    /// Multiplier applied to the capacity when the vector must grow.
    pub const GROWTH_FACTOR: usize = 2;

    /// Creates an empty vector. Does not allocate.
    pub const fn new() -> SimpleVector<T> {
        SimpleVector {
            buf: SlotBuffer::new(),
            len: 0,
        }
    }

    /// Creates an empty vector with room for exactly `capacity` elements.
    pub fn try_with_capacity(capacity: usize) -> Result<SimpleVector<T>> {
        Ok(SimpleVector {
            buf: SlotBuffer::allocate(capacity)?,
            len: 0,
        })
    }

    /// Creates an empty vector with room for exactly `capacity` elements.
    ///
    /// # Panics
    ///
    /// Panics if the allocation fails.
    pub fn with_capacity(capacity: usize) -> SimpleVector<T> {
        Self::try_with_capacity(capacity).unwrap_or_else(|e| alloc_failed(e))
    }

    /// Creates a vector of `size` default values, with capacity equal to `size`.
    pub fn with_size(size: usize) -> SimpleVector<T>
    where
        T: Default,
    {
        let mut v = Self::with_capacity(size);
        v.fill_reserved(size, T::default);
        v
    }

    /// Creates a vector of `size` clones of `value`, with capacity equal to `size`.
    pub fn from_elem(size: usize, value: T) -> SimpleVector<T>
    where
        T: Clone,
    {
        let mut v = Self::with_capacity(size);
        if size > 0 {
            v.fill_reserved(size - 1, || value.clone());
            // SAFETY: capacity is `size` and `size - 1` slots are filled.
            unsafe { v.push_reserved(value) };
        }
        v
    }

    /// Creates a vector holding clones of `items`, with capacity equal to their count.
    pub fn from_slice(items: &[T]) -> SimpleVector<T>
    where
        T: Clone,
    {
        let mut v = Self::with_capacity(items.len());
        for item in items {
            // SAFETY: capacity equals `items.len()`.
            unsafe { v.push_reserved(item.clone()) };
        }
        v
    }

    /// Returns the number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns the number of allocated slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if the vector holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a raw pointer to the first slot.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.buf.as_ptr()
    }

    /// Returns a mutable raw pointer to the first slot.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.as_mut_ptr()
    }

    /// Returns the live elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        unsafe { std::slice::from_raw_parts(self.as_ptr(), self.len) }
    }

    /// Returns the live elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { std::slice::from_raw_parts_mut(self.as_mut_ptr(), self.len) }
    }

    /// Returns a reference to the element at `index`, or an out-of-range error if
    /// `index >= len`.
    pub fn at(&self, index: usize) -> Result<&T> {
        verify_index!(index, self.len);
        Ok(unsafe { self.at_unchecked(index) })
    }

    /// Returns a mutable reference to the element at `index`, or an out-of-range
    /// error if `index >= len`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        verify_index!(index, self.len);
        Ok(unsafe { self.at_unchecked_mut(index) })
    }

    /// Returns a reference to the element at `index` without bounds checking.
    ///
    /// # Safety
    ///
    /// `index` must be less than `len()`. Only debug builds verify this.
    #[inline]
    pub unsafe fn at_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len, "index {index} >= len {}", self.len);
        unsafe { &*self.as_ptr().add(index) }
    }

    /// Returns a mutable reference to the element at `index` without bounds checking.
    ///
    /// # Safety
    ///
    /// `index` must be less than `len()`. Only debug builds verify this.
    #[inline]
    pub unsafe fn at_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len, "index {index} >= len {}", self.len);
        unsafe { &mut *self.as_mut_ptr().add(index) }
    }

    /// Ensures the capacity is at least `new_capacity`, allocating exactly that many
    /// slots when it grows. Elements and their order are unchanged.
    ///
    /// Strong guarantee: on failure the vector is untouched.
    pub fn try_reserve(&mut self, new_capacity: usize) -> Result<()> {
        if new_capacity > self.capacity() {
            self.reallocate(new_capacity)?;
        }
        Ok(())
    }

    /// See [`SimpleVector::try_reserve`].
    ///
    /// # Panics
    ///
    /// Panics if the allocation fails.
    pub fn reserve(&mut self, new_capacity: usize) {
        if let Err(e) = self.try_reserve(new_capacity) {
            alloc_failed(e);
        }
    }

    /// Appends `item`, growing the buffer if it is full.
    ///
    /// Strong guarantee: if growing fails the vector is untouched and `item` is
    /// dropped.
    pub fn try_push_back(&mut self, item: T) -> Result<()> {
        self.ensure_capacity(self.required_len(1))?;
        // SAFETY: room for one more element was just ensured.
        unsafe { self.push_reserved(item) };
        Ok(())
    }

    /// See [`SimpleVector::try_push_back`].
    ///
    /// # Panics
    ///
    /// Panics if the allocation fails.
    pub fn push_back(&mut self, item: T) {
        if let Err(e) = self.try_push_back(item) {
            alloc_failed(e);
        }
    }

    /// Removes and returns the last element, or `None` if the vector is empty.
    /// Capacity is kept.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        Some(unsafe { self.as_ptr().add(self.len).read() })
    }

    /// Inserts `value` at `index`, shifting `[index, len)` one slot toward the tail.
    /// Returns a reference to the inserted element.
    ///
    /// Grows the buffer first if it is full. Basic guarantee.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`. This is a caller bug, not a recoverable error.
    pub fn try_insert(&mut self, index: usize, value: T) -> Result<&mut T> {
        assert!(
            index <= self.len,
            "insertion index (is {index}) should be <= len (is {})",
            self.len
        );
        self.ensure_capacity(self.required_len(1))?;
        unsafe {
            let p = self.as_mut_ptr().add(index);
            ptr::copy(p, p.add(1), self.len - index);
            p.write(value);
        }
        self.len += 1;
        Ok(&mut self.as_mut_slice()[index])
    }

    /// See [`SimpleVector::try_insert`].
    ///
    /// # Panics
    ///
    /// Panics if `index > len` or if the allocation fails.
    pub fn insert(&mut self, index: usize, value: T) -> &mut T {
        self.try_insert(index, value).unwrap_or_else(|e| alloc_failed(e))
    }

    /// Removes and returns the element at `index`, shifting `[index + 1, len)` one
    /// slot toward the head.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> T {
        assert!(
            index < self.len,
            "removal index (is {index}) should be < len (is {})",
            self.len
        );
        unsafe {
            let p = self.as_mut_ptr().add(index);
            let value = p.read();
            ptr::copy(p.add(1), p, self.len - index - 1);
            self.len -= 1;
            value
        }
    }

    /// Drops the element at `index` and shifts the tail toward the head.
    ///
    /// Returns the element that now occupies `index`, or `None` if the erased
    /// element was the last one. Basic guarantee: the element is dropped only after
    /// the vector is consistent again.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn erase(&mut self, index: usize) -> Option<&mut T> {
        drop(self.remove(index));
        self.as_mut_slice().get_mut(index)
    }

    /// Drops the elements past `new_len`. No-op if `new_len >= len`. Capacity is kept.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }
        let tail = ptr::slice_from_raw_parts_mut(
            unsafe { self.as_mut_ptr().add(new_len) },
            self.len - new_len,
        );
        // Shrink first so a panicking destructor cannot expose dropped slots.
        self.len = new_len;
        unsafe { ptr::drop_in_place(tail) };
    }

    /// Drops all elements. Capacity is kept.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Resizes to `new_len`, filling new slots with values produced by `f`.
    ///
    /// Shrinking truncates. Growing within capacity fills in place; growing past it
    /// reallocates per the growth policy before filling. The reallocation has the
    /// strong guarantee, the fill the basic one.
    pub fn try_resize_with<F>(&mut self, new_len: usize, f: F) -> Result<()>
    where
        F: FnMut() -> T,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return Ok(());
        }
        self.ensure_capacity(new_len)?;
        self.fill_reserved(new_len, f);
        Ok(())
    }

    /// See [`SimpleVector::try_resize_with`].
    ///
    /// # Panics
    ///
    /// Panics if the allocation fails.
    pub fn resize_with<F>(&mut self, new_len: usize, f: F)
    where
        F: FnMut() -> T,
    {
        if let Err(e) = self.try_resize_with(new_len, f) {
            alloc_failed(e);
        }
    }

    /// Resizes to `new_len`, filling new slots with `T::default()`.
    pub fn try_resize(&mut self, new_len: usize) -> Result<()>
    where
        T: Default,
    {
        self.try_resize_with(new_len, T::default)
    }

    /// See [`SimpleVector::try_resize`].
    ///
    /// # Panics
    ///
    /// Panics if the allocation fails.
    pub fn resize(&mut self, new_len: usize)
    where
        T: Default,
    {
        self.resize_with(new_len, T::default);
    }

    /// Appends clones of `items`, growing per the growth policy.
    pub fn extend_from_slice(&mut self, items: &[T])
    where
        T: Clone,
    {
        if let Err(e) = self.ensure_capacity(self.required_len(items.len())) {
            alloc_failed(e);
        }
        for item in items {
            // SAFETY: room for all of `items` was just ensured.
            unsafe { self.push_reserved(item.clone()) };
        }
    }

    /// Exchanges the full state (buffer, size and capacity) with `other`. O(1).
    pub fn swap_with(&mut self, other: &mut SimpleVector<T>) {
        self.buf.swap(&mut other.buf);
        std::mem::swap(&mut self.len, &mut other.len);
    }

    /// Moves the contents out, leaving `self` empty with zero capacity.
    pub fn take(&mut self) -> SimpleVector<T> {
        std::mem::take(self)
    }

    /// Converts into a standard `Vec`, preserving order.
    pub fn into_vec(self) -> Vec<T> {
        self.into_iter().collect()
    }

    /// Splits the vector into its buffer and live length without dropping anything.
    pub(crate) fn into_raw_parts(self) -> (SlotBuffer<T>, usize) {
        let mut this = std::mem::ManuallyDrop::new(self);
        (this.buf.take(), this.len)
    }
}

impl<T> SimpleVector<T> {
    /// Capacity to allocate when `required` slots do not fit.
    fn grown_capacity(&self, required: usize) -> usize {
        let capacity = self.capacity();
        if capacity == 0 {
            required
        } else {
            capacity.saturating_mul(Self::GROWTH_FACTOR).max(required)
        }
    }

    /// Length after appending `additional` elements, saturating so an oversized
    /// request surfaces as an allocation failure.
    #[inline]
    fn required_len(&self, additional: usize) -> usize {
        self.len.saturating_add(additional)
    }

    fn ensure_capacity(&mut self, required: usize) -> Result<()> {
        if required > self.capacity() {
            self.reallocate(self.grown_capacity(required))?;
        }
        Ok(())
    }

    /// Moves the live elements into a fresh buffer of `new_capacity` slots.
    #[cold]
    fn reallocate(&mut self, new_capacity: usize) -> Result<()> {
        debug_assert!(new_capacity >= self.len);
        let mut fresh = SlotBuffer::allocate(new_capacity)?;
        unsafe {
            ptr::copy_nonoverlapping(self.as_ptr(), fresh.as_mut_ptr(), self.len);
        }
        log::trace!(
            "SimpleVector reallocated: capacity {} -> {new_capacity}, len {}",
            self.capacity(),
            self.len
        );
        // The old block now only holds bitwise copies; dropping it frees the memory
        // without touching the elements.
        self.buf.swap(&mut fresh);
        Ok(())
    }

    /// Writes `value` into the first free slot.
    ///
    /// # Safety
    ///
    /// `len` must be less than `capacity`.
    #[inline]
    unsafe fn push_reserved(&mut self, value: T) {
        debug_assert!(self.len < self.capacity());
        unsafe { self.as_mut_ptr().add(self.len).write(value) };
        self.len += 1;
    }

    /// Fills slots up to `new_len` with values from `f`. `new_len` must not exceed
    /// the capacity.
    fn fill_reserved<F>(&mut self, new_len: usize, mut f: F)
    where
        F: FnMut() -> T,
    {
        assert!(new_len <= self.capacity());
        while self.len < new_len {
            // SAFETY: `len < new_len <= capacity`.
            unsafe { self.push_reserved(f()) };
        }
    }
}

#[cold]
#[track_caller]
fn alloc_failed(e: Error) -> ! {
    panic!("{e}")
}

impl<T> Drop for SimpleVector<T> {
    fn drop(&mut self) {
        unsafe { ptr::drop_in_place(self.as_mut_slice()) };
    }
}

impl<T> Default for SimpleVector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for SimpleVector<T> {
    fn clone(&self) -> SimpleVector<T> {
        SimpleVector::from_slice(self.as_slice())
    }

    /// Copy assignment with the strong guarantee: the copy is built on the side and
    /// only swapped in once complete.
    fn clone_from(&mut self, source: &Self) {
        let mut copy = source.clone();
        self.swap_with(&mut copy);
    }
}

impl<T> Deref for SimpleVector<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for SimpleVector<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> AsRef<[T]> for SimpleVector<T> {
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T> AsMut<[T]> for SimpleVector<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T> Borrow<[T]> for SimpleVector<T> {
    fn borrow(&self) -> &[T] {
        self
    }
}

impl<T> BorrowMut<[T]> for SimpleVector<T> {
    fn borrow_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for SimpleVector<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, U> PartialEq<SimpleVector<U>> for SimpleVector<T>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &SimpleVector<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for SimpleVector<T> {}

impl<T, U, const N: usize> PartialEq<[U; N]> for SimpleVector<T>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, U> PartialEq<&[U]> for SimpleVector<T>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T, U> PartialEq<Vec<U>> for SimpleVector<T>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &Vec<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialOrd> PartialOrd for SimpleVector<T> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord> Ord for SimpleVector<T> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T: Hash> Hash for SimpleVector<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T> From<ReserveRequest> for SimpleVector<T> {
    fn from(request: ReserveRequest) -> Self {
        SimpleVector::with_capacity(request.capacity())
    }
}

impl<T, const N: usize> From<[T; N]> for SimpleVector<T> {
    fn from(items: [T; N]) -> Self {
        let mut v = SimpleVector::with_capacity(N);
        for item in items {
            // SAFETY: capacity is `N`.
            unsafe { v.push_reserved(item) };
        }
        v
    }
}

impl<T: Clone> From<&[T]> for SimpleVector<T> {
    fn from(items: &[T]) -> Self {
        SimpleVector::from_slice(items)
    }
}

impl<T> From<Vec<T>> for SimpleVector<T> {
    fn from(items: Vec<T>) -> Self {
        let mut v = SimpleVector::with_capacity(items.len());
        for item in items {
            // SAFETY: capacity equals the source length.
            unsafe { v.push_reserved(item) };
        }
        v
    }
}

impl<T> From<SimpleVector<T>> for Vec<T> {
    fn from(v: SimpleVector<T>) -> Self {
        v.into_vec()
    }
}

impl<T> FromIterator<T> for SimpleVector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut v = SimpleVector::new();
        v.extend(iter);
        v
    }
}

impl<T> Extend<T> for SimpleVector<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        if let Err(e) = self.ensure_capacity(self.required_len(lower)) {
            alloc_failed(e);
        }
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<'a, T> IntoIterator for &'a SimpleVector<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut SimpleVector<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
