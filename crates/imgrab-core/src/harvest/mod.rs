//! Concurrent download and rank assignment.
//!
//! One dispatcher (the calling thread) pulls candidates from a [`CandidateSource`] into a
//! bounded queue; a fixed pool of workers fetches each one into the temp area, then claims a
//! rank from the shared [`SlotAllocator`] and promotes the file into the output directory.
//! The run ends when the budget is spent or the source runs dry; workers are joined before the
//! temp area is removed.
//!
//! [`CandidateSource`]: crate::source::CandidateSource

mod dispatch;
mod report;
mod run;
mod slots;
mod worker;

pub use report::HarvestReport;
pub use run::{harvest, HarvestOptions};
pub use slots::{Rank, SlotAllocator};
