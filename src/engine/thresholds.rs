use chrono::NaiveDate;

use crate::limits::ValidationLimits;
use crate::model::{DaySpan, EmployeeId, Hours, RecordId, TeamId};
use crate::store::ScheduleStore;
use crate::verdict::{Finding, FindingCode};

use super::ValidationError;

/// Compare the day's booked hours plus `additional` against the daily caps.
/// One aggregation query.
pub(super) async fn check_daily_hours(
    store: &dyn ScheduleStore,
    limits: &ValidationLimits,
    employee: EmployeeId,
    date: NaiveDate,
    additional: Hours,
    exclude: Option<RecordId>,
) -> Result<Option<Finding>, ValidationError> {
    let booked = store.sum_workload_hours(employee, date, exclude).await?;
    let total = booked.saturating_add(additional);
    if total > limits.daily_hard_cap {
        return Ok(Some(Finding::new(
            FindingCode::DailyHardCap,
            format!(
                "{total} on {date} exceeds the daily limit of {}",
                limits.daily_hard_cap
            ),
        )));
    }
    if total > limits.daily_soft_cap {
        return Ok(Some(Finding::new(
            FindingCode::DailySoftCap,
            format!(
                "{total} on {date} exceeds the recommended {} per day",
                limits.daily_soft_cap
            ),
        )));
    }
    Ok(None)
}

/// Compare the ISO week's booked hours plus `additional` against the weekly
/// caps. One aggregation query over the Monday-start week containing `date`.
pub(super) async fn check_weekly_hours(
    store: &dyn ScheduleStore,
    limits: &ValidationLimits,
    employee: EmployeeId,
    date: NaiveDate,
    additional: Hours,
    exclude: Option<RecordId>,
) -> Result<Option<Finding>, ValidationError> {
    let week = DaySpan::iso_week_of(date);
    let booked = store.sum_workload_hours_in(employee, week, exclude).await?;
    let total = booked.saturating_add(additional);
    if total > limits.weekly_hard_cap {
        return Ok(Some(Finding::new(
            FindingCode::WeeklyHardCap,
            format!(
                "{total} in week {week} exceeds the weekly limit of {}",
                limits.weekly_hard_cap
            ),
        )));
    }
    if total > limits.weekly_soft_cap {
        return Ok(Some(Finding::new(
            FindingCode::WeeklySoftCap,
            format!(
                "{total} in week {week} exceeds the recommended {} per week",
                limits.weekly_soft_cap
            ),
        )));
    }
    Ok(None)
}

/// Check that adding `additional` active members keeps the team within its
/// configured size. One aggregation query.
pub(super) async fn check_team_capacity(
    store: &dyn ScheduleStore,
    limits: &ValidationLimits,
    team: TeamId,
    additional: usize,
    exclude: Option<RecordId>,
) -> Result<Option<Finding>, ValidationError> {
    let active = store.count_active_members(team, exclude).await?;
    if active + additional > limits.max_team_size {
        return Ok(Some(Finding::new(
            FindingCode::TeamCapacityExceeded,
            format!(
                "team has {active} active members; adding {additional} exceeds the cap of {}",
                limits.max_team_size
            ),
        )));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WorkloadRecord;
    use crate::store::MemoryStore;
    use crate::verdict::Severity;
    use ulid::Ulid;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn seed_hours(store: &MemoryStore, employee: EmployeeId, date: NaiveDate, centi: i64) {
        store
            .commit_workload(
                WorkloadRecord::new(
                    Ulid::new(),
                    employee,
                    Ulid::new(),
                    date,
                    Hours::from_centi(centi),
                )
                .unwrap(),
            )
            .unwrap();
    }

    #[tokio::test]
    async fn nine_hours_warns_but_does_not_block() {
        let store = MemoryStore::new();
        let limits = ValidationLimits::default();
        let emp = Ulid::new();
        seed_hours(&store, emp, d(2024, 6, 10), 6_00);

        let finding =
            check_daily_hours(&store, &limits, emp, d(2024, 6, 10), Hours::from_centi(3_00), None)
                .await
                .unwrap()
                .unwrap();
        assert_eq!(finding.code, FindingCode::DailySoftCap);
        assert_eq!(finding.severity, Severity::Warning);
    }

    #[tokio::test]
    async fn thirteen_hours_is_an_error() {
        let store = MemoryStore::new();
        let limits = ValidationLimits::default();
        let emp = Ulid::new();
        seed_hours(&store, emp, d(2024, 6, 10), 6_00);

        let finding =
            check_daily_hours(&store, &limits, emp, d(2024, 6, 10), Hours::from_centi(7_00), None)
                .await
                .unwrap()
                .unwrap();
        assert_eq!(finding.code, FindingCode::DailyHardCap);
        assert_eq!(finding.severity, Severity::Error);
    }

    #[tokio::test]
    async fn under_soft_cap_is_silent() {
        let store = MemoryStore::new();
        let limits = ValidationLimits::default();
        let emp = Ulid::new();
        seed_hours(&store, emp, d(2024, 6, 10), 4_00);

        let finding =
            check_daily_hours(&store, &limits, emp, d(2024, 6, 10), Hours::from_centi(4_00), None)
                .await
                .unwrap();
        // 8h exactly is at the cap, not over it
        assert!(finding.is_none());
    }

    #[tokio::test]
    async fn exclusion_frees_the_updated_rows_hours() {
        let store = MemoryStore::new();
        let limits = ValidationLimits::default();
        let emp = Ulid::new();
        let row = WorkloadRecord::new(
            Ulid::new(),
            emp,
            Ulid::new(),
            d(2024, 6, 10),
            Hours::from_centi(8_00),
        )
        .unwrap();
        let row_id = row.id;
        store.commit_workload(row).unwrap();

        // Re-validating the same row at 8h must not double-count it
        let finding = check_daily_hours(
            &store,
            &limits,
            emp,
            d(2024, 6, 10),
            Hours::from_centi(8_00),
            Some(row_id),
        )
        .await
        .unwrap();
        assert!(finding.is_none());
    }

    #[tokio::test]
    async fn weekly_hard_cap_fires_across_days() {
        let store = MemoryStore::new();
        let limits = ValidationLimits::default();
        let emp = Ulid::new();
        // Mon 2024-06-10 .. Fri 2024-06-14, 9h each = 45h
        for day in 10..15 {
            seed_hours(&store, emp, d(2024, 6, day), 9_00);
        }

        let finding =
            check_weekly_hours(&store, &limits, emp, d(2024, 6, 15), Hours::from_centi(6_00), None)
                .await
                .unwrap()
                .unwrap();
        assert_eq!(finding.code, FindingCode::WeeklyHardCap);
    }

    #[tokio::test]
    async fn weekly_soft_cap_warns() {
        let store = MemoryStore::new();
        let limits = ValidationLimits::default();
        let emp = Ulid::new();
        // Mon..Thu, 9h each = 36h
        for day in 10..14 {
            seed_hours(&store, emp, d(2024, 6, day), 9_00);
        }

        let finding =
            check_weekly_hours(&store, &limits, emp, d(2024, 6, 14), Hours::from_centi(6_00), None)
                .await
                .unwrap()
                .unwrap();
        assert_eq!(finding.code, FindingCode::WeeklySoftCap);
    }

    #[tokio::test]
    async fn adjacent_week_does_not_count() {
        let store = MemoryStore::new();
        let limits = ValidationLimits::default();
        let emp = Ulid::new();
        // Sunday 2024-06-09 belongs to the previous ISO week
        seed_hours(&store, emp, d(2024, 6, 9), 9_00);

        let finding =
            check_weekly_hours(&store, &limits, emp, d(2024, 6, 10), Hours::from_centi(8_00), None)
                .await
                .unwrap();
        assert!(finding.is_none());
    }

    #[tokio::test]
    async fn team_capacity_counts_proposed_member() {
        let store = MemoryStore::new();
        let limits = ValidationLimits {
            max_team_size: 2,
            ..ValidationLimits::default()
        };
        let team = Ulid::new();
        for _ in 0..2 {
            store
                .commit_membership(
                    crate::model::MembershipRecord::new(
                        Ulid::new(),
                        team,
                        Ulid::new(),
                        "engineer",
                        false,
                        true,
                        d(2024, 1, 1),
                        None,
                    )
                    .unwrap(),
                )
                .unwrap();
        }

        let finding = check_team_capacity(&store, &limits, team, 1, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(finding.code, FindingCode::TeamCapacityExceeded);
        assert_eq!(finding.severity, Severity::Error);
    }
}
