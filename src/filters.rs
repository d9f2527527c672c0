use std::cmp::Ordering;

use crate::models::{ApplicationRecord, FilterCriteria, SortDirection, SortField};

/// Reduce `records` to the subset matching `criteria`. Order-preserving:
/// the result is a stable subsequence of the input, cloned. Active
/// criteria combine with AND; no criteria returns a copy of the input.
pub fn filter(records: &[ApplicationRecord], criteria: &FilterCriteria) -> Vec<ApplicationRecord> {
    let mut filtered: Vec<ApplicationRecord> = records.to_vec();

    if !criteria.status.is_empty() {
        filtered.retain(|r| criteria.status.contains(&r.status));
    }

    if !criteria.priority.is_empty() {
        filtered.retain(|r| criteria.priority.contains(&r.priority));
    }

    // A record with no job type never matches a non-empty job-type filter.
    if !criteria.job_type.is_empty() {
        filtered.retain(|r| r.job_type.is_some_and(|jt| criteria.job_type.contains(&jt)));
    }

    if let Some(query) = criteria.search.as_deref().filter(|q| !q.is_empty()) {
        let query = query.to_lowercase();
        filtered.retain(|r| {
            contains_ci(&r.company, &query)
                || contains_ci(&r.position, &query)
                || r.location.as_deref().is_some_and(|v| contains_ci(v, &query))
                || r.description.as_deref().is_some_and(|v| contains_ci(v, &query))
                || r.notes.as_deref().is_some_and(|v| contains_ci(v, &query))
        });
    }

    if let Some(range) = &criteria.date_range {
        // ISO date strings compare lexicographically; bounds are inclusive.
        // Records without an applied date drop out once either bound is set.
        if let Some(start) = &range.start {
            filtered.retain(|r| r.applied_date.as_deref().is_some_and(|d| d >= start.as_str()));
        }
        if let Some(end) = &range.end {
            filtered.retain(|r| r.applied_date.as_deref().is_some_and(|d| d <= end.as_str()));
        }
    }

    filtered
}

/// Total order over `records` by one field. Stable, not in place. Records
/// missing the field sort after all present values in either direction;
/// descending inverts only the present-present comparison.
pub fn sort(
    records: &[ApplicationRecord],
    field: SortField,
    direction: SortDirection,
) -> Vec<ApplicationRecord> {
    let mut sorted: Vec<ApplicationRecord> = records.to_vec();

    sorted.sort_by(|a, b| {
        match (field_value(a, field), field_value(b, field)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => {
                let cmp = collate(a, b);
                match direction {
                    SortDirection::Asc => cmp,
                    SortDirection::Desc => cmp.reverse(),
                }
            }
        }
    });

    sorted
}

fn field_value(record: &ApplicationRecord, field: SortField) -> Option<&str> {
    match field {
        SortField::Company => Some(&record.company),
        SortField::Position => Some(&record.position),
        SortField::Status => Some(record.status.as_str()),
        SortField::Priority => Some(record.priority.as_str()),
        SortField::AppliedDate => record.applied_date.as_deref(),
        SortField::Location => record.location.as_deref(),
        SortField::Salary => record.salary.as_deref(),
        SortField::JobType => record.job_type.map(|jt| jt.as_str()),
        SortField::CreatedAt => Some(&record.created_at),
        SortField::UpdatedAt => Some(&record.updated_at),
        SortField::NextFollowUp => record.next_follow_up.as_deref(),
    }
}

/// Case-insensitive primary comparison with a case-sensitive tiebreak, so
/// "apple" and "Banana" order by letter rather than by byte value.
fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn contains_ci(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}
