use crate::model::ChangeRequest;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: total validation calls. Labels: kind, outcome.
pub const VALIDATIONS_TOTAL: &str = "crewgate_validations_total";

/// Histogram: validation latency in seconds. Labels: kind.
pub const VALIDATION_DURATION_SECONDS: &str = "crewgate_validation_duration_seconds";

/// Counter: findings emitted. Labels: code, severity.
pub const FINDINGS_TOTAL: &str = "crewgate_findings_total";

/// Map a ChangeRequest variant to a short label for metrics.
pub fn change_label(change: &ChangeRequest) -> &'static str {
    match change {
        ChangeRequest::VacationCreate { .. } => "vacation_create",
        ChangeRequest::VacationUpdate { .. } => "vacation_update",
        ChangeRequest::WorkloadCreate { .. } => "workload_create",
        ChangeRequest::WorkloadUpdate { .. } => "workload_update",
        ChangeRequest::MembershipCreate { .. } => "membership_create",
        ChangeRequest::MembershipUpdate { .. } => "membership_update",
    }
}
