use crate::model::{Completion, ProgressRecord};

/// Mean completion across all records, rounded half up. Empty input is zero.
///
/// Runs over the raw list: records the activity join drops still count.
#[must_use]
pub fn average_completion(progress: &[ProgressRecord]) -> Completion {
    if progress.is_empty() {
        return Completion::ZERO;
    }

    let sum: u64 = progress
        .iter()
        .map(|record| u64::from(record.completion().value()))
        .sum();
    let count = progress.len() as u64;
    // round(sum / count) with halves going up, in integers.
    let rounded = (2 * sum + count) / (2 * count);

    Completion::new(u32::try_from(rounded).unwrap_or(u32::MAX)).unwrap_or(Completion::FULL)
}
