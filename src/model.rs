use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ulid::Ulid;

/// Identifier carried by every persisted row.
pub type RecordId = Ulid;
pub type EmployeeId = Ulid;
pub type TeamId = Ulid;
pub type ProjectId = Ulid;

/// Violations of record-level invariants, caught at construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("span end {end} is before start {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    #[error("hours must be greater than zero, got {0}")]
    NonPositiveHours(f64),
    #[error("hours {0} exceed a single day")]
    HoursExceedDay(f64),
    #[error("hours {0} carry more than two decimal places")]
    HoursPrecision(f64),
    #[error("hours value {0} is not a finite number")]
    HoursNotFinite(f64),
    #[error("hours must not be negative, got {0}")]
    NegativeHours(f64),
}

// ── DaySpan ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct DaySpanRepr {
    start: NaiveDate,
    end: NaiveDate,
}

/// Inclusive day interval `[start, end]`.
///
/// Touching endpoints count as overlapping: a span ending Jun 5 and a span
/// starting Jun 5 share that day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "DaySpanRepr", into = "DaySpanRepr")]
pub struct DaySpan {
    start: NaiveDate,
    end: NaiveDate,
}

impl DaySpan {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ModelError> {
        if end < start {
            return Err(ModelError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    /// A span covering exactly one day.
    pub fn single(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }

    /// The span reaching `days` before and after `day`, saturating at the
    /// calendar bounds.
    pub fn around(day: NaiveDate, days: u64) -> Self {
        let start = day
            .checked_sub_days(chrono::Days::new(days))
            .unwrap_or(NaiveDate::MIN);
        let end = day
            .checked_add_days(chrono::Days::new(days))
            .unwrap_or(NaiveDate::MAX);
        Self { start, end }
    }

    /// The Monday-start ISO week containing `day`.
    pub fn iso_week_of(day: NaiveDate) -> Self {
        let week = day.week(Weekday::Mon);
        Self {
            start: week.first_day(),
            end: week.last_day(),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days covered, counting both endpoints.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains_day(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    pub fn overlaps(&self, other: &DaySpan) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// The shared sub-span, if any.
    pub fn intersection(&self, other: &DaySpan) -> Option<DaySpan> {
        if !self.overlaps(other) {
            return None;
        }
        Some(DaySpan {
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        })
    }
}

impl std::fmt::Display for DaySpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl TryFrom<DaySpanRepr> for DaySpan {
    type Error = ModelError;

    fn try_from(repr: DaySpanRepr) -> Result<Self, ModelError> {
        DaySpan::new(repr.start, repr.end)
    }
}

impl From<DaySpan> for DaySpanRepr {
    fn from(span: DaySpan) -> Self {
        DaySpanRepr {
            start: span.start,
            end: span.end,
        }
    }
}

// ── Hours ────────────────────────────────────────────────────────

/// A quantity of work hours, stored as integer hundredths so aggregate sums
/// compare exactly against caps. Serialized as a plain number of hours.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "f64", into = "f64")]
pub struct Hours(i64);

impl Hours {
    pub const ZERO: Hours = Hours(0);
    /// 24 hours, the most a single workload row may book.
    pub const DAY: Hours = Hours(24_00);

    pub const fn from_centi(centi: i64) -> Self {
        Hours(centi)
    }

    pub const fn centi(self) -> i64 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn saturating_add(self, other: Hours) -> Hours {
        Hours(self.0.saturating_add(other.0))
    }
}

impl TryFrom<f64> for Hours {
    type Error = ModelError;

    fn try_from(value: f64) -> Result<Self, ModelError> {
        if !value.is_finite() {
            return Err(ModelError::HoursNotFinite(value));
        }
        if value < 0.0 {
            return Err(ModelError::NegativeHours(value));
        }
        let centi = (value * 100.0).round();
        if (value * 100.0 - centi).abs() > 1e-6 {
            return Err(ModelError::HoursPrecision(value));
        }
        Ok(Hours(centi as i64))
    }
}

impl From<Hours> for f64 {
    fn from(hours: Hours) -> f64 {
        hours.as_f64()
    }
}

impl std::ops::Add for Hours {
    type Output = Hours;

    fn add(self, rhs: Hours) -> Hours {
        Hours(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for Hours {
    fn add_assign(&mut self, rhs: Hours) {
        self.0 += rhs.0;
    }
}

impl std::iter::Sum for Hours {
    fn sum<I: Iterator<Item = Hours>>(iter: I) -> Hours {
        iter.fold(Hours::ZERO, |acc, h| acc + h)
    }
}

impl std::fmt::Display for Hours {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}h", self.as_f64())
    }
}

// ── Records ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VacationType {
    Annual,
    Sick,
    Unpaid,
    Special,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VacationStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl VacationStatus {
    /// Rejected and cancelled requests are inert: they no longer occupy days
    /// and never participate in overlap or threshold checks.
    pub fn is_countable(self) -> bool {
        matches!(self, VacationStatus::Pending | VacationStatus::Approved)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VacationRecord {
    pub id: RecordId,
    pub employee_id: EmployeeId,
    pub span: DaySpan,
    pub vacation_type: VacationType,
    pub status: VacationStatus,
    pub days_requested: i64,
}

impl VacationRecord {
    pub fn new(
        id: RecordId,
        employee_id: EmployeeId,
        span: DaySpan,
        vacation_type: VacationType,
        status: VacationStatus,
    ) -> Self {
        Self {
            id,
            employee_id,
            span,
            vacation_type,
            status,
            days_requested: span.days(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadRecord {
    pub id: RecordId,
    pub employee_id: EmployeeId,
    pub project_id: ProjectId,
    pub work_date: NaiveDate,
    pub hours: Hours,
}

impl WorkloadRecord {
    pub fn new(
        id: RecordId,
        employee_id: EmployeeId,
        project_id: ProjectId,
        work_date: NaiveDate,
        hours: Hours,
    ) -> Result<Self, ModelError> {
        if hours <= Hours::ZERO {
            return Err(ModelError::NonPositiveHours(hours.as_f64()));
        }
        if hours > Hours::DAY {
            return Err(ModelError::HoursExceedDay(hours.as_f64()));
        }
        Ok(Self {
            id,
            employee_id,
            project_id,
            work_date,
            hours,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipRecord {
    pub id: RecordId,
    pub team_id: TeamId,
    pub employee_id: EmployeeId,
    pub role: String,
    pub is_leader: bool,
    pub is_active: bool,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl MembershipRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: RecordId,
        team_id: TeamId,
        employee_id: EmployeeId,
        role: impl Into<String>,
        is_leader: bool,
        is_active: bool,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> Result<Self, ModelError> {
        if let Some(end) = end_date
            && end < start_date
        {
            return Err(ModelError::EndBeforeStart {
                start: start_date,
                end,
            });
        }
        Ok(Self {
            id,
            team_id,
            employee_id,
            role: role.into(),
            is_leader,
            is_active,
            start_date,
            end_date,
        })
    }
}

// ── Change requests ──────────────────────────────────────────────

/// A proposed schedule-affecting write, presented to the engine before the
/// owning write path commits it. Update variants carry the id of the row
/// being replaced so re-validation excludes it from conflict queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChangeRequest {
    VacationCreate {
        employee_id: EmployeeId,
        span: DaySpan,
        vacation_type: VacationType,
        status: VacationStatus,
    },
    VacationUpdate {
        id: RecordId,
        employee_id: EmployeeId,
        span: DaySpan,
        vacation_type: VacationType,
        status: VacationStatus,
    },
    WorkloadCreate {
        employee_id: EmployeeId,
        project_id: ProjectId,
        work_date: NaiveDate,
        hours: Hours,
    },
    WorkloadUpdate {
        id: RecordId,
        employee_id: EmployeeId,
        project_id: ProjectId,
        work_date: NaiveDate,
        hours: Hours,
    },
    /// New memberships start out active.
    MembershipCreate {
        team_id: TeamId,
        employee_id: EmployeeId,
        role: String,
        is_leader: bool,
        start_date: NaiveDate,
    },
    MembershipUpdate {
        id: RecordId,
        team_id: TeamId,
        employee_id: EmployeeId,
        role: String,
        is_leader: bool,
        is_active: bool,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    },
}

impl ChangeRequest {
    /// The id of the row being replaced, for update variants.
    pub fn exclude_id(&self) -> Option<RecordId> {
        match self {
            ChangeRequest::VacationUpdate { id, .. }
            | ChangeRequest::WorkloadUpdate { id, .. }
            | ChangeRequest::MembershipUpdate { id, .. } => Some(*id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn span_days_counts_both_endpoints() {
        let s = DaySpan::new(d(2024, 6, 1), d(2024, 6, 5)).unwrap();
        assert_eq!(s.days(), 5);
        assert_eq!(DaySpan::single(d(2024, 6, 1)).days(), 1);
    }

    #[test]
    fn span_end_before_start_rejected() {
        let err = DaySpan::new(d(2024, 6, 5), d(2024, 6, 1)).unwrap_err();
        assert!(matches!(err, ModelError::EndBeforeStart { .. }));
    }

    #[test]
    fn span_overlap_symmetric_and_reflexive() {
        let a = DaySpan::new(d(2024, 6, 1), d(2024, 6, 10)).unwrap();
        let b = DaySpan::new(d(2024, 6, 8), d(2024, 6, 20)).unwrap();
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(a.overlaps(&a));
    }

    #[test]
    fn span_touching_endpoints_overlap() {
        // Inclusive days: a span ending Jun 5 shares that day with one starting Jun 5
        let a = DaySpan::new(d(2024, 6, 1), d(2024, 6, 5)).unwrap();
        let b = DaySpan::new(d(2024, 6, 5), d(2024, 6, 10)).unwrap();
        assert!(a.overlaps(&b));
        assert_eq!(a.intersection(&b).unwrap().days(), 1);
    }

    #[test]
    fn span_disjoint_not_overlapping() {
        let a = DaySpan::new(d(2024, 6, 1), d(2024, 6, 4)).unwrap();
        let b = DaySpan::new(d(2024, 6, 5), d(2024, 6, 10)).unwrap();
        assert!(!a.overlaps(&b));
        assert!(a.intersection(&b).is_none());
    }

    #[test]
    fn span_iso_week_is_monday_start() {
        // 2024-06-12 is a Wednesday
        let week = DaySpan::iso_week_of(d(2024, 6, 12));
        assert_eq!(week.start(), d(2024, 6, 10));
        assert_eq!(week.end(), d(2024, 6, 16));
        assert_eq!(week.days(), 7);
    }

    #[test]
    fn hours_accepts_two_decimal_places() {
        assert_eq!(Hours::try_from(8.25).unwrap().centi(), 825);
        assert_eq!(Hours::try_from(0.0).unwrap(), Hours::ZERO);
    }

    #[test]
    fn hours_rejects_excess_precision() {
        let err = Hours::try_from(1.333).unwrap_err();
        assert!(matches!(err, ModelError::HoursPrecision(_)));
    }

    #[test]
    fn hours_rejects_negative_and_non_finite() {
        assert!(matches!(
            Hours::try_from(-1.0),
            Err(ModelError::NegativeHours(_))
        ));
        assert!(matches!(
            Hours::try_from(f64::NAN),
            Err(ModelError::HoursNotFinite(_))
        ));
    }

    #[test]
    fn hours_sum_is_exact() {
        let total: Hours = [0.1, 0.2, 0.3]
            .iter()
            .map(|&h| Hours::try_from(h).unwrap())
            .sum();
        assert_eq!(total.centi(), 60);
    }

    #[test]
    fn workload_hours_bounds_enforced() {
        let id = Ulid::new();
        let emp = Ulid::new();
        let proj = Ulid::new();
        let date = d(2024, 6, 10);
        assert!(matches!(
            WorkloadRecord::new(id, emp, proj, date, Hours::ZERO),
            Err(ModelError::NonPositiveHours(_))
        ));
        assert!(matches!(
            WorkloadRecord::new(id, emp, proj, date, Hours::from_centi(24_50)),
            Err(ModelError::HoursExceedDay(_))
        ));
        assert!(WorkloadRecord::new(id, emp, proj, date, Hours::from_centi(24_00)).is_ok());
    }

    #[test]
    fn membership_end_before_start_rejected() {
        let err = MembershipRecord::new(
            Ulid::new(),
            Ulid::new(),
            Ulid::new(),
            "engineer",
            false,
            true,
            d(2024, 6, 10),
            Some(d(2024, 6, 1)),
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::EndBeforeStart { .. }));
    }

    #[test]
    fn vacation_days_requested_derived_from_span() {
        let v = VacationRecord::new(
            Ulid::new(),
            Ulid::new(),
            DaySpan::new(d(2024, 7, 1), d(2024, 7, 10)).unwrap(),
            VacationType::Annual,
            VacationStatus::Pending,
        );
        assert_eq!(v.days_requested, 10);
    }

    #[test]
    fn change_request_serialization_roundtrip() {
        let change = ChangeRequest::VacationCreate {
            employee_id: Ulid::new(),
            span: DaySpan::new(d(2024, 7, 1), d(2024, 7, 10)).unwrap(),
            vacation_type: VacationType::Annual,
            status: VacationStatus::Pending,
        };
        let json = serde_json::to_string(&change).unwrap();
        let decoded: ChangeRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(change, decoded);
    }

    #[test]
    fn day_span_deserialization_validates() {
        let bad = r#"{"start":"2024-06-05","end":"2024-06-01"}"#;
        assert!(serde_json::from_str::<DaySpan>(bad).is_err());
    }
}
