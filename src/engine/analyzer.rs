use std::collections::HashSet;

use futures::future::{try_join, try_join3};

use crate::limits::ValidationLimits;
use crate::model::{ChangeRequest, DaySpan, RecordId, VacationStatus};
use crate::store::ScheduleStore;
use crate::verdict::{Finding, FindingCode};

use super::overlap::find_overlaps;
use super::{ValidationError, thresholds, uniqueness};

/// Interval checks: vacation overlap for vacation changes, vacation
/// collision plus the related-workload graph for workload changes.
pub(super) async fn overlap_findings(
    store: &dyn ScheduleStore,
    limits: &ValidationLimits,
    change: &ChangeRequest,
) -> Result<Vec<Finding>, ValidationError> {
    match change {
        ChangeRequest::VacationCreate {
            employee_id,
            span,
            status,
            ..
        }
        | ChangeRequest::VacationUpdate {
            employee_id,
            span,
            status,
            ..
        } => {
            // An inert proposal (cancelling or rejecting) occupies no days
            if !status.is_countable() {
                return Ok(Vec::new());
            }
            let existing = store.vacations_for_employee(*employee_id, *span).await?;
            let mut findings = Vec::new();
            for hit in find_overlaps(span, &existing, change.exclude_id()) {
                let (code, label) = match hit.status {
                    VacationStatus::Approved => (FindingCode::VacationOverlap, "approved"),
                    _ => (FindingCode::PendingVacationOverlap, "pending"),
                };
                findings.push(
                    Finding::new(
                        code,
                        format!(
                            "requested days overlap {label} vacation {} on {} ({} day(s))",
                            hit.record_id, hit.overlap, hit.overlap_days
                        ),
                    )
                    .with_related([hit.record_id])
                    .with_overlap(hit.overlap),
                );
            }
            Ok(findings)
        }

        ChangeRequest::WorkloadCreate {
            employee_id,
            project_id,
            work_date,
            ..
        }
        | ChangeRequest::WorkloadUpdate {
            employee_id,
            project_id,
            work_date,
            ..
        } => {
            let exclude = change.exclude_id();
            let day = DaySpan::single(*work_date);
            let employee_window = DaySpan::around(*work_date, limits.related_window_days);
            let project_window = DaySpan::around(*work_date, limits.related_window_days * 2);

            let (vacations, near_own, near_project) = try_join3(
                store.vacations_for_employee(*employee_id, day),
                store.workloads_for_employee(*employee_id, employee_window, exclude),
                store.workloads_for_project(*project_id, project_window, exclude),
            )
            .await?;

            let mut findings = Vec::new();
            for vacation in vacations.iter().filter(|v| v.status.is_countable()) {
                findings.push(
                    Finding::new(
                        FindingCode::WorkloadDuringVacation,
                        format!(
                            "{work_date} falls inside vacation {} ({})",
                            vacation.id, vacation.span
                        ),
                    )
                    .with_related([vacation.id]),
                );
            }

            let own_ids: HashSet<RecordId> = near_own.iter().map(|r| r.id).collect();
            if !near_own.is_empty() {
                let mut ids: Vec<RecordId> = own_ids.iter().copied().collect();
                ids.sort();
                findings.push(
                    Finding::new(
                        FindingCode::RelatedWorkload,
                        format!(
                            "{} workload(s) for the same employee within {} day(s) of {work_date}",
                            ids.len(),
                            limits.related_window_days
                        ),
                    )
                    .with_related(ids),
                );
            }

            let mut project_ids: Vec<RecordId> = near_project
                .iter()
                .filter(|r| !own_ids.contains(&r.id))
                .map(|r| r.id)
                .collect();
            if !project_ids.is_empty() {
                project_ids.sort();
                findings.push(
                    Finding::new(
                        FindingCode::RelatedWorkload,
                        format!(
                            "{} workload(s) on the same project within {} day(s) of {work_date}",
                            project_ids.len(),
                            limits.related_window_days * 2
                        ),
                    )
                    .with_related(project_ids),
                );
            }
            Ok(findings)
        }

        ChangeRequest::MembershipCreate { .. } | ChangeRequest::MembershipUpdate { .. } => {
            Ok(Vec::new())
        }
    }
}

/// Aggregate-limit checks: daily and weekly hour caps for workload changes,
/// team capacity for membership changes.
pub(super) async fn threshold_findings(
    store: &dyn ScheduleStore,
    limits: &ValidationLimits,
    change: &ChangeRequest,
) -> Result<Vec<Finding>, ValidationError> {
    match change {
        ChangeRequest::WorkloadCreate {
            employee_id,
            work_date,
            hours,
            ..
        }
        | ChangeRequest::WorkloadUpdate {
            employee_id,
            work_date,
            hours,
            ..
        } => {
            let exclude = change.exclude_id();
            let (daily, weekly) = try_join(
                thresholds::check_daily_hours(
                    store, limits, *employee_id, *work_date, *hours, exclude,
                ),
                thresholds::check_weekly_hours(
                    store, limits, *employee_id, *work_date, *hours, exclude,
                ),
            )
            .await?;
            Ok(daily.into_iter().chain(weekly).collect())
        }

        ChangeRequest::MembershipCreate { team_id, .. } => {
            let finding =
                thresholds::check_team_capacity(store, limits, *team_id, 1, None).await?;
            Ok(finding.into_iter().collect())
        }

        ChangeRequest::MembershipUpdate {
            id,
            team_id,
            is_active,
            ..
        } => {
            if !*is_active {
                return Ok(Vec::new());
            }
            let finding =
                thresholds::check_team_capacity(store, limits, *team_id, 1, Some(*id)).await?;
            Ok(finding.into_iter().collect())
        }

        ChangeRequest::VacationCreate { .. } | ChangeRequest::VacationUpdate { .. } => {
            Ok(Vec::new())
        }
    }
}

/// Structural uniqueness checks: workload key, active membership, active
/// leader.
pub(super) async fn uniqueness_findings(
    store: &dyn ScheduleStore,
    change: &ChangeRequest,
) -> Result<Vec<Finding>, ValidationError> {
    match change {
        ChangeRequest::WorkloadCreate {
            employee_id,
            project_id,
            work_date,
            ..
        }
        | ChangeRequest::WorkloadUpdate {
            employee_id,
            project_id,
            work_date,
            ..
        } => {
            let finding = uniqueness::check_duplicate_workload(
                store,
                *employee_id,
                *project_id,
                *work_date,
                change.exclude_id(),
            )
            .await?;
            Ok(finding.into_iter().collect())
        }

        ChangeRequest::MembershipCreate {
            team_id,
            employee_id,
            is_leader,
            ..
        } => membership_uniqueness(store, *team_id, *employee_id, *is_leader, None).await,

        ChangeRequest::MembershipUpdate {
            id,
            team_id,
            employee_id,
            is_leader,
            is_active,
            ..
        } => {
            // Deactivating a row cannot violate active-uniqueness
            if !*is_active {
                return Ok(Vec::new());
            }
            membership_uniqueness(store, *team_id, *employee_id, *is_leader, Some(*id)).await
        }

        ChangeRequest::VacationCreate { .. } | ChangeRequest::VacationUpdate { .. } => {
            Ok(Vec::new())
        }
    }
}

async fn membership_uniqueness(
    store: &dyn ScheduleStore,
    team: crate::model::TeamId,
    employee: crate::model::EmployeeId,
    is_leader: bool,
    exclude: Option<RecordId>,
) -> Result<Vec<Finding>, ValidationError> {
    let (duplicate, leader) = try_join(
        uniqueness::check_duplicate_membership(store, team, employee, exclude),
        async {
            if is_leader {
                uniqueness::check_unique_active_leader(store, team, exclude).await
            } else {
                Ok(None)
            }
        },
    )
    .await?;
    Ok(duplicate.into_iter().chain(leader).collect())
}
