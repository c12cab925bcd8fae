//! Ordered child listing.

use crate::core::NamespaceError;
use crate::service::Coordinator;

/// Width of the counter the service appends to sequential node names.
pub const SEQUENCE_DIGITS: usize = 10;

/// List the children of `path` sorted by name.
///
/// Names compare byte-wise, so zero-padded sequence suffixes order the same
/// way as the numbers they encode. Lock queues and leader election rely on
/// this to find the lowest candidate.
pub fn sorted_children<C>(client: &C, path: &str) -> Result<Vec<String>, NamespaceError>
where
    C: Coordinator + ?Sized,
{
    let mut children = client.get_children(path)?;
    children.sort_unstable();
    Ok(children)
}

/// Parse the sequence counter at the end of a sequential node name.
///
/// Returns `None` if the name is shorter than the counter or its last
/// [`SEQUENCE_DIGITS`] characters are not all ASCII digits.
pub fn sequence_number(name: &str) -> Option<u64> {
    let start = name.len().checked_sub(SEQUENCE_DIGITS)?;
    let digits = name.get(start..)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
