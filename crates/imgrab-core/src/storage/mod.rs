//! Disk layout and file lifecycle.
//!
//! Downloads land in a process-scoped [`TempArea`] under their URL-hash name and are
//! promoted into the output directory as `<rank:05>-<name>` once a slot is claimed.

mod promote;
mod temp;

pub use promote::{final_file_name, final_path, promote, PromoteError};
pub use temp::TempArea;

/// Width of the zero-padded rank prefix in final file names.
pub const RANK_WIDTH: usize = 5;

/// Parses the rank prefix of a final file name (`00042-abc.jpg` → 42).
pub fn rank_of(file_name: &str) -> Option<u32> {
    let (prefix, _) = file_name.split_once('-')?;
    if prefix.len() != RANK_WIDTH || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    prefix.parse().ok()
}
