use std::cmp::Reverse;
use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::model::{ActivityEntry, Course, CourseId, ProgressRecord};

/// Pairs each progress record with its course and orders the result newest first.
///
/// Only records with a well-formed embedded course (non-blank id and title)
/// take part; bare ids and missing references are dropped with a warning. The
/// catalog copy of a course wins over the embedded one when ids match,
/// otherwise the embedded fields are completed through the default table.
/// Ties on `updated_at` keep input order; records without a timestamp go last.
#[must_use]
pub fn join_activity(
    catalog: &[Course],
    progress: &[ProgressRecord],
    now: DateTime<Utc>,
) -> Vec<ActivityEntry> {
    let by_id: HashMap<&CourseId, &Course> =
        catalog.iter().map(|course| (course.id(), course)).collect();

    let mut entries: Vec<ActivityEntry> = progress
        .iter()
        .filter_map(|record| pair_record(&by_id, record, now))
        .collect();

    entries.sort_by_key(|entry| Reverse(entry.last_activity()));
    entries
}

fn pair_record(
    by_id: &HashMap<&CourseId, &Course>,
    record: &ProgressRecord,
    now: DateTime<Utc>,
) -> Option<ActivityEntry> {
    let Some(embedded) = record.course().embedded() else {
        tracing::warn!(
            progress_id = %record.id(),
            course_ref = ?record.course(),
            "progress record has no usable course reference; skipping"
        );
        return None;
    };

    let course = match embedded.id.as_ref().and_then(|id| by_id.get(id)) {
        Some(course) => (*course).clone(),
        None => {
            let draft = embedded.to_draft()?;
            match draft.fill_defaults(now) {
                Ok(course) => course,
                Err(err) => {
                    tracing::warn!(progress_id = %record.id(), %err, "cannot build course; skipping");
                    return None;
                }
            }
        }
    };

    let entry = ActivityEntry::new(course, record.clone());
    if entry.is_none() {
        tracing::warn!(progress_id = %record.id(), "course failed display validation; skipping");
    }
    entry
}
