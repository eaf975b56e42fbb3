use chrono::NaiveDate;

use crate::model::{EmployeeId, ProjectId, RecordId, TeamId};
use crate::store::ScheduleStore;
use crate::verdict::{Finding, FindingCode};

use super::ValidationError;

/// Surface the existing active leader, if any. The engine never decides
/// between rejecting the change and superseding the incumbent; it reports
/// the conflicting membership id and leaves that to the write path.
pub(super) async fn check_unique_active_leader(
    store: &dyn ScheduleStore,
    team: TeamId,
    exclude: Option<RecordId>,
) -> Result<Option<Finding>, ValidationError> {
    let Some(incumbent) = store.active_leader(team).await? else {
        return Ok(None);
    };
    if Some(incumbent.id) == exclude {
        return Ok(None);
    }
    Ok(Some(
        Finding::new(
            FindingCode::LeaderAlreadyAssigned,
            format!(
                "team already has an active leader (membership {})",
                incumbent.id
            ),
        )
        .with_related([incumbent.id]),
    ))
}

/// At most one row may hold the `(employee, project, date)` key.
pub(super) async fn check_duplicate_workload(
    store: &dyn ScheduleStore,
    employee: EmployeeId,
    project: ProjectId,
    date: NaiveDate,
    exclude: Option<RecordId>,
) -> Result<Option<Finding>, ValidationError> {
    let Some(existing) = store.find_workload(employee, project, date).await? else {
        return Ok(None);
    };
    if Some(existing.id) == exclude {
        return Ok(None);
    }
    Ok(Some(
        Finding::new(
            FindingCode::DuplicateWorkload,
            format!(
                "workload for this employee, project and {date} already exists (record {})",
                existing.id
            ),
        )
        .with_related([existing.id]),
    ))
}

/// At most one active membership per `(team, employee)`.
pub(super) async fn check_duplicate_membership(
    store: &dyn ScheduleStore,
    team: TeamId,
    employee: EmployeeId,
    exclude: Option<RecordId>,
) -> Result<Option<Finding>, ValidationError> {
    let Some(existing) = store.active_membership(team, employee).await? else {
        return Ok(None);
    };
    if Some(existing.id) == exclude {
        return Ok(None);
    }
    Ok(Some(
        Finding::new(
            FindingCode::DuplicateMembership,
            format!(
                "employee already holds an active membership in this team (record {})",
                existing.id
            ),
        )
        .with_related([existing.id]),
    ))
}
