use std::{
    cell::Cell,
    panic::{AssertUnwindSafe, catch_unwind},
    rc::Rc,
};

use simplevec::SimpleVector;

/// Element whose clone panics once the shared budget is spent, and which counts
/// its drops.
#[derive(Debug)]
struct Tracked {
    value: i32,
    clone_budget: Rc<Cell<usize>>,
    drops: Rc<Cell<usize>>,
}

impl Tracked {
    fn new(value: i32, clone_budget: &Rc<Cell<usize>>, drops: &Rc<Cell<usize>>) -> Tracked {
        Tracked {
            value,
            clone_budget: clone_budget.clone(),
            drops: drops.clone(),
        }
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        let budget = self.clone_budget.get();
        if budget == 0 {
            panic!("clone budget exhausted");
        }
        self.clone_budget.set(budget - 1);
        Tracked {
            value: self.value,
            clone_budget: self.clone_budget.clone(),
            drops: self.drops.clone(),
        }
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

fn failing_element() -> i32 {
    panic!("element construction failed")
}

fn values(v: &SimpleVector<Tracked>) -> Vec<i32> {
    v.iter().map(|t| t.value).collect()
}

#[test]
fn panicking_push_back_argument_leaves_vector_unchanged() {
    let mut v = SimpleVector::from([1, 2, 3]);
    assert_eq!(v.capacity(), 3);

    let result = catch_unwind(AssertUnwindSafe(|| v.push_back(failing_element())));
    assert!(result.is_err());
    assert_eq!(v, [1, 2, 3]);
    assert_eq!(v.capacity(), 3);

    v.push_back(4);
    assert_eq!(v, [1, 2, 3, 4]);
    assert!(v.capacity() >= 4);
}

#[test]
fn failed_allocation_leaves_vector_unchanged() {
    let mut v = SimpleVector::from([1u64, 2, 3]);
    let p = v.as_ptr();

    assert!(v.try_reserve(usize::MAX).unwrap_err().is_alloc());
    assert_eq!(v, [1, 2, 3]);
    assert_eq!(v.capacity(), 3);
    assert_eq!(v.as_ptr(), p);

    assert!(v.try_resize(usize::MAX).is_err());
    assert_eq!(v, [1, 2, 3]);

    assert!(SimpleVector::<u64>::try_with_capacity(usize::MAX).is_err());
}

#[test]
#[should_panic(expected = "failed to allocate")]
fn infallible_reserve_panics_on_allocation_failure() {
    let mut v = SimpleVector::<u64>::new();
    v.reserve(usize::MAX);
}

#[test]
fn clone_from_is_all_or_nothing() {
    let budget = Rc::new(Cell::new(usize::MAX));
    let drops = Rc::new(Cell::new(0));

    let source = SimpleVector::from([
        Tracked::new(10, &budget, &drops),
        Tracked::new(20, &budget, &drops),
        Tracked::new(30, &budget, &drops),
    ]);
    let mut target = SimpleVector::from([Tracked::new(1, &budget, &drops)]);

    budget.set(2);
    let result = catch_unwind(AssertUnwindSafe(|| target.clone_from(&source)));
    assert!(result.is_err());

    assert_eq!(values(&target), [1]);
    assert_eq!(values(&source), [10, 20, 30]);
    // The two clones made before the panic were dropped with the partial copy.
    assert_eq!(drops.get(), 2);

    budget.set(usize::MAX);
    target.clone_from(&source);
    assert_eq!(values(&target), [10, 20, 30]);
    // The old single element went away with the swapped-out buffer.
    assert_eq!(drops.get(), 3);
}

#[test]
fn clone_panic_does_not_leak_or_double_drop() {
    let budget = Rc::new(Cell::new(usize::MAX));
    let drops = Rc::new(Cell::new(0));
    let source = SimpleVector::from_elem(4, Tracked::new(7, &budget, &drops));
    assert_eq!(drops.get(), 0);

    budget.set(1);
    assert!(catch_unwind(AssertUnwindSafe(|| source.clone())).is_err());
    assert_eq!(drops.get(), 1);

    drop(source);
    assert_eq!(drops.get(), 5);
}

#[test]
fn every_element_is_dropped_exactly_once() {
    let budget = Rc::new(Cell::new(usize::MAX));
    let drops = Rc::new(Cell::new(0));

    let mut v = SimpleVector::new();
    for i in 0..10 {
        v.push_back(Tracked::new(i, &budget, &drops));
    }
    v.insert(5, Tracked::new(100, &budget, &drops));
    assert_eq!(drops.get(), 0);

    v.erase(0);
    assert_eq!(drops.get(), 1);
    drop(v.pop_back());
    assert_eq!(drops.get(), 2);
    v.truncate(6);
    assert_eq!(drops.get(), 5);
    assert_eq!(values(&v), [1, 2, 3, 4, 100, 5]);

    v.clear();
    assert_eq!(drops.get(), 11);
    assert!(v.capacity() >= 11);

    v.push_back(Tracked::new(1, &budget, &drops));
    drop(v);
    assert_eq!(drops.get(), 12);
}

#[test]
fn resize_fill_panic_keeps_vector_valid() {
    let calls = Cell::new(0);
    let mut v = SimpleVector::from([String::from("a")]);

    let result = catch_unwind(AssertUnwindSafe(|| {
        v.resize_with(5, || {
            calls.set(calls.get() + 1);
            if calls.get() == 3 {
                panic!("fill failed");
            }
            String::from("z")
        })
    }));
    assert!(result.is_err());

    // Basic guarantee: the elements produced before the panic stay live.
    assert_eq!(v, ["a", "z", "z"]);
    assert!(v.capacity() >= 5);
    v.push_back(String::from("b"));
    assert_eq!(v.len(), 4);
}
