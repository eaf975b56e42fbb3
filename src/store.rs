use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use thiserror::Error;

use crate::model::{
    DaySpan, EmployeeId, Hours, MembershipRecord, ProjectId, RecordId, TeamId, VacationRecord,
    WorkloadRecord,
};

/// Infrastructure failures of the storage port. Callers must treat any of
/// these as "cannot determine validity", never as "valid".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage query timed out")]
    Timeout,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The Storage Query Port. The engine only ever reads through this trait;
/// every method is a single bounded query, and the aggregate methods must be
/// answered by one aggregation on the storage side, not a row-by-row fetch.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Countable and inert vacations of `employee` intersecting `window`.
    async fn vacations_for_employee(
        &self,
        employee: EmployeeId,
        window: DaySpan,
    ) -> StoreResult<Vec<VacationRecord>>;

    /// Sum of booked hours for `employee` on `date`, excluding `exclude`.
    async fn sum_workload_hours(
        &self,
        employee: EmployeeId,
        date: NaiveDate,
        exclude: Option<RecordId>,
    ) -> StoreResult<Hours>;

    /// Sum of booked hours for `employee` across `window`, excluding `exclude`.
    async fn sum_workload_hours_in(
        &self,
        employee: EmployeeId,
        window: DaySpan,
        exclude: Option<RecordId>,
    ) -> StoreResult<Hours>;

    async fn workloads_for_employee(
        &self,
        employee: EmployeeId,
        window: DaySpan,
        exclude: Option<RecordId>,
    ) -> StoreResult<Vec<WorkloadRecord>>;

    async fn workloads_for_project(
        &self,
        project: ProjectId,
        window: DaySpan,
        exclude: Option<RecordId>,
    ) -> StoreResult<Vec<WorkloadRecord>>;

    /// The row holding the uniqueness key `(employee, project, date)`, if any.
    async fn find_workload(
        &self,
        employee: EmployeeId,
        project: ProjectId,
        date: NaiveDate,
    ) -> StoreResult<Option<WorkloadRecord>>;

    async fn count_active_members(
        &self,
        team: TeamId,
        exclude: Option<RecordId>,
    ) -> StoreResult<usize>;

    async fn active_leader(&self, team: TeamId) -> StoreResult<Option<MembershipRecord>>;

    async fn active_membership(
        &self,
        team: TeamId,
        employee: EmployeeId,
    ) -> StoreResult<Option<MembershipRecord>>;
}

// ── In-memory store ──────────────────────────────────────────────

/// Rejections from the in-memory commit path. These are the storage-level
/// backstop for the validate-then-commit race: a verdict is a pre-check, the
/// commit constraint is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitError {
    #[error("workload key already taken by record {0}")]
    DuplicateWorkload(RecordId),
    #[error("team already has active leader membership {0}")]
    LeaderAlreadyAssigned(RecordId),
    #[error("employee already holds active membership {0} in this team")]
    DuplicateMembership(RecordId),
    #[error("vacation overlaps existing vacation {0}")]
    OverlappingVacation(RecordId),
}

/// Reference implementation of the port, keyed so that each commit runs under
/// the owning shard entry lock: two concurrent commits against the same
/// employee or team serialize, and the loser observes the winner's row.
#[derive(Default)]
pub struct MemoryStore {
    vacations: DashMap<EmployeeId, Vec<VacationRecord>>,
    workloads: DashMap<EmployeeId, Vec<WorkloadRecord>>,
    memberships: DashMap<TeamId, Vec<MembershipRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Write path (outside the engine) ──────────────────────

    /// Insert or replace a vacation. Countable rows are re-checked for
    /// overlap against other countable rows of the same employee under the
    /// entry lock.
    pub fn commit_vacation(&self, vacation: VacationRecord) -> Result<(), CommitError> {
        let mut rows = self.vacations.entry(vacation.employee_id).or_default();
        if vacation.status.is_countable()
            && let Some(existing) = rows.iter().find(|r| {
                r.id != vacation.id && r.status.is_countable() && r.span.overlaps(&vacation.span)
            })
        {
            return Err(CommitError::OverlappingVacation(existing.id));
        }
        rows.retain(|r| r.id != vacation.id);
        rows.push(vacation);
        Ok(())
    }

    /// Insert or replace a workload row, enforcing the
    /// `(employee, project, date)` uniqueness key.
    pub fn commit_workload(&self, workload: WorkloadRecord) -> Result<(), CommitError> {
        let mut rows = self.workloads.entry(workload.employee_id).or_default();
        if let Some(existing) = rows.iter().find(|r| {
            r.id != workload.id
                && r.project_id == workload.project_id
                && r.work_date == workload.work_date
        }) {
            return Err(CommitError::DuplicateWorkload(existing.id));
        }
        rows.retain(|r| r.id != workload.id);
        rows.push(workload);
        Ok(())
    }

    /// Insert or replace a membership, enforcing one active row per
    /// (team, employee) and one active leader per team.
    pub fn commit_membership(&self, membership: MembershipRecord) -> Result<(), CommitError> {
        let mut rows = self.memberships.entry(membership.team_id).or_default();
        if membership.is_active {
            if let Some(existing) = rows.iter().find(|r| {
                r.id != membership.id && r.is_active && r.employee_id == membership.employee_id
            }) {
                return Err(CommitError::DuplicateMembership(existing.id));
            }
            if membership.is_leader
                && let Some(existing) = rows
                    .iter()
                    .find(|r| r.id != membership.id && r.is_active && r.is_leader)
            {
                return Err(CommitError::LeaderAlreadyAssigned(existing.id));
            }
        }
        rows.retain(|r| r.id != membership.id);
        rows.push(membership);
        Ok(())
    }
}

#[async_trait]
impl ScheduleStore for MemoryStore {
    async fn vacations_for_employee(
        &self,
        employee: EmployeeId,
        window: DaySpan,
    ) -> StoreResult<Vec<VacationRecord>> {
        Ok(self
            .vacations
            .get(&employee)
            .map(|rows| {
                rows.iter()
                    .filter(|r| r.span.overlaps(&window))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn sum_workload_hours(
        &self,
        employee: EmployeeId,
        date: NaiveDate,
        exclude: Option<RecordId>,
    ) -> StoreResult<Hours> {
        Ok(self
            .workloads
            .get(&employee)
            .map(|rows| {
                rows.iter()
                    .filter(|r| r.work_date == date && Some(r.id) != exclude)
                    .map(|r| r.hours)
                    .sum()
            })
            .unwrap_or(Hours::ZERO))
    }

    async fn sum_workload_hours_in(
        &self,
        employee: EmployeeId,
        window: DaySpan,
        exclude: Option<RecordId>,
    ) -> StoreResult<Hours> {
        Ok(self
            .workloads
            .get(&employee)
            .map(|rows| {
                rows.iter()
                    .filter(|r| window.contains_day(r.work_date) && Some(r.id) != exclude)
                    .map(|r| r.hours)
                    .sum()
            })
            .unwrap_or(Hours::ZERO))
    }

    async fn workloads_for_employee(
        &self,
        employee: EmployeeId,
        window: DaySpan,
        exclude: Option<RecordId>,
    ) -> StoreResult<Vec<WorkloadRecord>> {
        Ok(self
            .workloads
            .get(&employee)
            .map(|rows| {
                rows.iter()
                    .filter(|r| window.contains_day(r.work_date) && Some(r.id) != exclude)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn workloads_for_project(
        &self,
        project: ProjectId,
        window: DaySpan,
        exclude: Option<RecordId>,
    ) -> StoreResult<Vec<WorkloadRecord>> {
        let mut out = Vec::new();
        for entry in self.workloads.iter() {
            for r in entry.value() {
                if r.project_id == project
                    && window.contains_day(r.work_date)
                    && Some(r.id) != exclude
                {
                    out.push(r.clone());
                }
            }
        }
        Ok(out)
    }

    async fn find_workload(
        &self,
        employee: EmployeeId,
        project: ProjectId,
        date: NaiveDate,
    ) -> StoreResult<Option<WorkloadRecord>> {
        Ok(self.workloads.get(&employee).and_then(|rows| {
            rows.iter()
                .find(|r| r.project_id == project && r.work_date == date)
                .cloned()
        }))
    }

    async fn count_active_members(
        &self,
        team: TeamId,
        exclude: Option<RecordId>,
    ) -> StoreResult<usize> {
        Ok(self
            .memberships
            .get(&team)
            .map(|rows| {
                rows.iter()
                    .filter(|r| r.is_active && Some(r.id) != exclude)
                    .count()
            })
            .unwrap_or(0))
    }

    async fn active_leader(&self, team: TeamId) -> StoreResult<Option<MembershipRecord>> {
        Ok(self
            .memberships
            .get(&team)
            .and_then(|rows| rows.iter().find(|r| r.is_active && r.is_leader).cloned()))
    }

    async fn active_membership(
        &self,
        team: TeamId,
        employee: EmployeeId,
    ) -> StoreResult<Option<MembershipRecord>> {
        Ok(self.memberships.get(&team).and_then(|rows| {
            rows.iter()
                .find(|r| r.is_active && r.employee_id == employee)
                .cloned()
        }))
    }
}
