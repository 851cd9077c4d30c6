//! Combinators over collections of promises.
//!
//! - [`all`]: every input fulfills, or the first rejection
//! - [`all_settled`]: one outcome record per input, never rejects
//! - [`race`]: the first input to settle either way
//! - [`any`]: the first input to fulfill, or every reason
//!
//! Each combinator takes the queue its output promise schedules on, so an
//! empty input still has somewhere to settle. Results are collected in input
//! order no matter which input settles first.

pub mod all;
pub mod all_settled;
pub mod any;
pub mod race;

pub use all::all;
pub use all_settled::all_settled;
pub use any::{any, AggregateError};
pub use race::race;

/// Per-input result slots plus a count of inputs still outstanding.
pub(crate) struct Tally<V> {
    slots: Vec<Option<V>>,
    remaining: usize,
}

impl<V> Tally<V> {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            slots: std::iter::repeat_with(|| None).take(len).collect(),
            remaining: len,
        }
    }

    /// Stores `value` at `index`; once every slot is filled, returns them
    /// all in input order.
    pub(crate) fn record(&mut self, index: usize, value: V) -> Option<Vec<V>> {
        if let Some(slot) = self.slots.get_mut(index) {
            if slot.replace(value).is_none() {
                self.remaining -= 1;
            }
        }
        if self.remaining == 0 {
            Some(self.slots.drain(..).flatten().collect())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_completes_in_input_order() {
        let mut tally = Tally::new(3);
        assert_eq!(tally.record(2, "c"), None);
        assert_eq!(tally.record(0, "a"), None);
        assert_eq!(tally.record(1, "b"), Some(vec!["a", "b", "c"]));
    }

    #[test]
    fn tally_ignores_out_of_range() {
        let mut tally = Tally::new(1);
        assert_eq!(tally.record(5, 0), None);
        assert_eq!(tally.record(0, 1), Some(vec![1]));
    }
}
