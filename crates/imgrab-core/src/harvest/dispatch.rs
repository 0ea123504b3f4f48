//! Feeds candidates from the source into the bounded worker queue.

use crossbeam::channel::Sender;

use super::report::Counters;
use super::slots::SlotAllocator;
use crate::source::{CandidateSource, PageCursor, SourceError};

/// Why the dispatcher stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum DispatchEnd {
    BudgetExhausted,
    SourceExhausted,
    /// Every worker has hung up on the queue.
    WorkersGone,
}

/// Pulls batches from `source` and pushes each candidate onto `queue`, checking the budget
/// before every candidate. Blocks while the queue is full.
///
/// Takes the sender by value: returning (on any path) closes the queue.
pub(super) fn dispatch<S>(
    source: &mut S,
    slots: &SlotAllocator,
    queue: Sender<String>,
    counters: &Counters,
) -> Result<DispatchEnd, SourceError>
where
    S: CandidateSource + ?Sized,
{
    let mut cursor = PageCursor::default();
    loop {
        if slots.is_exhausted() {
            return Ok(DispatchEnd::BudgetExhausted);
        }
        cursor.wanted = slots.remaining();
        let batch = match source.next_batch(&cursor)? {
            Some(batch) if !batch.is_empty() => batch,
            _ => return Ok(DispatchEnd::SourceExhausted),
        };
        for candidate in batch {
            if slots.is_exhausted() {
                return Ok(DispatchEnd::BudgetExhausted);
            }
            if queue.send(candidate).is_err() {
                return Ok(DispatchEnd::WorkersGone);
            }
            cursor.offset += 1;
            counters.dispatched();
        }
    }
}
