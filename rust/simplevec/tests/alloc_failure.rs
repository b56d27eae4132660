use std::{
    alloc::{GlobalAlloc, Layout, System},
    cell::Cell,
    ptr,
};

use simplevec::SimpleVector;

/// Requests of at least this many bytes are refused while refusal is switched on.
const LARGE_ALLOCATION: usize = 1024;

thread_local! {
    static REFUSE_LARGE: Cell<bool> = const { Cell::new(false) };
}

/// System allocator that can refuse large requests made from the current thread.
struct RefusingAllocator;

unsafe impl GlobalAlloc for RefusingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let refuse = layout.size() >= LARGE_ALLOCATION
            && REFUSE_LARGE.try_with(Cell::get).unwrap_or(false);
        if refuse {
            return ptr::null_mut();
        }
        unsafe { System.alloc(layout) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) }
    }
}

#[global_allocator]
static GLOBAL: RefusingAllocator = RefusingAllocator;

/// Turns refusal on for the current thread until dropped.
struct RefusalGuard;

impl RefusalGuard {
    fn new() -> RefusalGuard {
        REFUSE_LARGE.with(|r| r.set(true));
        RefusalGuard
    }
}

impl Drop for RefusalGuard {
    fn drop(&mut self) {
        REFUSE_LARGE.with(|r| r.set(false));
    }
}

/// 512 bytes: a buffer of three or more is a large request, the error box is not.
type Block = [u64; 64];

fn block(tag: u64) -> Block {
    [tag; 64]
}

fn full_vector() -> SimpleVector<Block> {
    let v = SimpleVector::from([block(1), block(2), block(3)]);
    assert_eq!(v.capacity(), 3);
    v
}

#[test]
fn try_push_back_at_capacity_keeps_vector_on_allocation_failure() {
    let mut v = full_vector();
    let p = v.as_ptr();

    let result = {
        let _refuse = RefusalGuard::new();
        v.try_push_back(block(4))
    };
    assert!(result.unwrap_err().is_alloc());
    assert_eq!(v, [block(1), block(2), block(3)]);
    assert_eq!(v.capacity(), 3);
    assert_eq!(v.as_ptr(), p);

    v.try_push_back(block(4)).unwrap();
    assert_eq!(v, [block(1), block(2), block(3), block(4)]);
    assert_eq!(v.capacity(), 6);
}

#[test]
fn try_insert_at_capacity_keeps_vector_on_allocation_failure() {
    let mut v = full_vector();
    let p = v.as_ptr();

    for index in [0, 1, 3] {
        let failed = {
            let _refuse = RefusalGuard::new();
            v.try_insert(index, block(9)).is_err_and(|e| e.is_alloc())
        };
        assert!(failed, "insert at {index} should fail to grow");
        assert_eq!(v, [block(1), block(2), block(3)]);
        assert_eq!(v.capacity(), 3);
        assert_eq!(v.as_ptr(), p);
    }

    assert_eq!(*v.try_insert(1, block(9)).unwrap(), block(9));
    assert_eq!(v, [block(1), block(9), block(2), block(3)]);
}

#[test]
fn push_back_with_slack_needs_no_allocation() {
    let mut v = SimpleVector::<Block>::with_capacity(4);
    v.extend_from_slice(&[block(1), block(2), block(3)]);

    let result = {
        let _refuse = RefusalGuard::new();
        v.try_push_back(block(4))
    };
    assert!(result.is_ok());
    assert_eq!(v.len(), 4);
    assert_eq!(v.capacity(), 4);
}

#[test]
fn try_with_capacity_reports_refused_allocation() {
    let _refuse = RefusalGuard::new();
    let err = SimpleVector::<Block>::try_with_capacity(8).unwrap_err();
    assert!(err.is_alloc());
}

#[test]
#[should_panic(expected = "failed to allocate 6 slots")]
fn push_back_at_capacity_panics_on_allocation_failure() {
    let mut v = full_vector();
    let _refuse = RefusalGuard::new();
    v.push_back(block(4));
}
