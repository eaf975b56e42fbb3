use crate::model::{DaySpan, RecordId, VacationRecord, VacationStatus};

/// One existing vacation clashing with a candidate span.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapHit {
    pub record_id: RecordId,
    pub status: VacationStatus,
    /// The full span of the existing record.
    pub span: DaySpan,
    /// The shared sub-span.
    pub overlap: DaySpan,
    pub overlap_days: i64,
}

/// Scan already-fetched vacations for clashes with `candidate`.
///
/// Skips the record under update (`exclude`) and inert rows
/// (rejected/cancelled). Pure; the caller is responsible for fetching a
/// window that covers `candidate`.
pub fn find_overlaps(
    candidate: &DaySpan,
    existing: &[VacationRecord],
    exclude: Option<RecordId>,
) -> Vec<OverlapHit> {
    existing
        .iter()
        .filter(|r| Some(r.id) != exclude && r.status.is_countable())
        .filter_map(|r| {
            let overlap = candidate.intersection(&r.span)?;
            Some(OverlapHit {
                record_id: r.id,
                status: r.status,
                span: r.span,
                overlap,
                overlap_days: overlap.days(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VacationType;
    use chrono::NaiveDate;
    use ulid::Ulid;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn span(a: (i32, u32, u32), b: (i32, u32, u32)) -> DaySpan {
        DaySpan::new(d(a.0, a.1, a.2), d(b.0, b.1, b.2)).unwrap()
    }

    fn vacation(from: (i32, u32, u32), to: (i32, u32, u32), status: VacationStatus) -> VacationRecord {
        VacationRecord::new(
            Ulid::new(),
            Ulid::new(),
            span(from, to),
            VacationType::Annual,
            status,
        )
    }

    #[test]
    fn disjoint_ranges_rejected() {
        let candidate = span((2024, 6, 1), (2024, 6, 4));
        let existing = vec![vacation((2024, 6, 5), (2024, 6, 10), VacationStatus::Approved)];
        assert!(find_overlaps(&candidate, &existing, None).is_empty());
    }

    #[test]
    fn touching_boundary_counts_one_day() {
        let candidate = span((2024, 6, 1), (2024, 6, 5));
        let existing = vec![vacation((2024, 6, 5), (2024, 6, 10), VacationStatus::Approved)];
        let hits = find_overlaps(&candidate, &existing, None);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].overlap_days, 1);
        assert_eq!(hits[0].overlap, DaySpan::single(d(2024, 6, 5)));
    }

    #[test]
    fn inert_statuses_are_skipped() {
        let candidate = span((2024, 6, 1), (2024, 6, 10));
        let existing = vec![
            vacation((2024, 6, 2), (2024, 6, 3), VacationStatus::Cancelled),
            vacation((2024, 6, 4), (2024, 6, 5), VacationStatus::Rejected),
            vacation((2024, 6, 6), (2024, 6, 7), VacationStatus::Pending),
        ];
        let hits = find_overlaps(&candidate, &existing, None);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].status, VacationStatus::Pending);
    }

    #[test]
    fn own_record_excluded_on_update() {
        let candidate = span((2024, 6, 1), (2024, 6, 10));
        let own = vacation((2024, 6, 1), (2024, 6, 10), VacationStatus::Approved);
        let own_id = own.id;
        let hits = find_overlaps(&candidate, &[own], Some(own_id));
        assert!(hits.is_empty());
    }

    #[test]
    fn overlap_magnitude_reported() {
        // Jul 1..10 vs Jul 8..15 share Jul 8, 9, 10
        let candidate = span((2024, 7, 8), (2024, 7, 15));
        let existing = vec![vacation((2024, 7, 1), (2024, 7, 10), VacationStatus::Approved)];
        let hits = find_overlaps(&candidate, &existing, None);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].overlap_days, 3);
        assert_eq!(hits[0].overlap, span((2024, 7, 8), (2024, 7, 10)));
    }

    #[test]
    fn contained_span_overlaps_fully() {
        let candidate = span((2024, 6, 3), (2024, 6, 5));
        let existing = vec![vacation((2024, 6, 1), (2024, 6, 30), VacationStatus::Approved)];
        let hits = find_overlaps(&candidate, &existing, None);
        assert_eq!(hits[0].overlap_days, 3);
    }
}
