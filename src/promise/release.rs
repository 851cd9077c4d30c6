//! Iterative release of pending continuation registries.
//!
//! A pending chain is a linked list: each promise's registry owns the
//! resolver of the next promise, which owns that promise's registry. Letting
//! `Drop` follow the links would recurse once per link. Instead, a registry
//! being dropped parks its continuations here, and the outermost release on
//! the thread drops them one at a time, so nested registries only ever add
//! to the worklist.

use std::any::Any;
use std::cell::RefCell;
use std::mem;

/// A continuation stored in a pending promise's registry.
pub(super) trait Continuation<A> {
    /// Runs the continuation with its argument.
    fn call(self: Box<Self>, arg: A);

    /// Erases the argument type so the continuation can wait in the worklist.
    fn park(self: Box<Self>) -> Box<dyn Any>;
}

impl<A, F> Continuation<A> for F
where
    F: FnOnce(A) + 'static,
{
    fn call(self: Box<Self>, arg: A) {
        (*self)(arg);
    }

    fn park(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

#[derive(Default)]
struct Worklist {
    parked: Vec<Box<dyn Any>>,
    draining: bool,
}

thread_local! {
    /// Continuations waiting to be dropped on this thread.
    static WORKLIST: RefCell<Worklist> = RefCell::new(Worklist::default());
}

/// Drops `batch`, flattening any registries it releases in turn.
///
/// Only the outermost call loops; nested calls park and return.
pub(super) fn release(batch: Vec<Box<dyn Any>>) {
    let owner = WORKLIST.try_with(|list| {
        let mut list = list.borrow_mut();
        list.parked.extend(batch);
        !mem::replace(&mut list.draining, true)
    });
    // Thread-local storage already torn down: nothing left to flatten into.
    let Ok(true) = owner else {
        return;
    };

    loop {
        let next = WORKLIST.with(|list| list.borrow_mut().parked.pop());
        match next {
            // Dropped outside the borrow; it may call `release` again.
            Some(item) => drop(item),
            None => break,
        }
    }
    WORKLIST.with(|list| list.borrow_mut().draining = false);
}
