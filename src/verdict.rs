use serde::{Deserialize, Serialize};

use crate::model::{DaySpan, RecordId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

/// Machine-readable finding codes. Severity is a fixed property of the code,
/// not a caller choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCode {
    VacationOverlap,
    PendingVacationOverlap,
    DailyHardCap,
    DailySoftCap,
    WeeklyHardCap,
    WeeklySoftCap,
    TeamCapacityExceeded,
    DuplicateWorkload,
    DuplicateMembership,
    LeaderAlreadyAssigned,
    WorkloadDuringVacation,
    RelatedWorkload,
}

impl FindingCode {
    pub fn severity(self) -> Severity {
        match self {
            FindingCode::VacationOverlap
            | FindingCode::DailyHardCap
            | FindingCode::WeeklyHardCap
            | FindingCode::TeamCapacityExceeded
            | FindingCode::DuplicateWorkload
            | FindingCode::DuplicateMembership
            | FindingCode::LeaderAlreadyAssigned => Severity::Error,
            FindingCode::PendingVacationOverlap
            | FindingCode::DailySoftCap
            | FindingCode::WeeklySoftCap
            | FindingCode::WorkloadDuringVacation
            | FindingCode::RelatedWorkload => Severity::Warning,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FindingCode::VacationOverlap => "vacation_overlap",
            FindingCode::PendingVacationOverlap => "pending_vacation_overlap",
            FindingCode::DailyHardCap => "daily_hard_cap",
            FindingCode::DailySoftCap => "daily_soft_cap",
            FindingCode::WeeklyHardCap => "weekly_hard_cap",
            FindingCode::WeeklySoftCap => "weekly_soft_cap",
            FindingCode::TeamCapacityExceeded => "team_capacity_exceeded",
            FindingCode::DuplicateWorkload => "duplicate_workload",
            FindingCode::DuplicateMembership => "duplicate_membership",
            FindingCode::LeaderAlreadyAssigned => "leader_already_assigned",
            FindingCode::WorkloadDuringVacation => "workload_during_vacation",
            FindingCode::RelatedWorkload => "related_workload",
        }
    }
}

/// One reported issue. `overlap`/`overlap_days` are set for interval
/// conflicts so a caller can render every clash with its exact extent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub code: FindingCode,
    pub severity: Severity,
    pub message: String,
    pub related_ids: Vec<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlap: Option<DaySpan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlap_days: Option<i64>,
}

impl Finding {
    pub fn new(code: FindingCode, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: code.severity(),
            message: message.into(),
            related_ids: Vec::new(),
            overlap: None,
            overlap_days: None,
        }
    }

    pub fn with_related(mut self, ids: impl IntoIterator<Item = RecordId>) -> Self {
        self.related_ids.extend(ids);
        self
    }

    pub fn with_overlap(mut self, span: DaySpan) -> Self {
        self.overlap_days = Some(span.days());
        self.overlap = Some(span);
        self
    }
}

/// The complete result of one validation call. Warnings never block; a
/// change is committable iff `errors` is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
}

impl ValidationVerdict {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn push(&mut self, finding: Finding) {
        match finding.severity {
            Severity::Error => self.errors.push(finding),
            Severity::Warning => self.warnings.push(finding),
        }
    }

    pub fn extend(&mut self, findings: impl IntoIterator<Item = Finding>) {
        for f in findings {
            self.push(f);
        }
    }

    /// Sort both lists into a canonical order so verdicts produced from
    /// concurrently-gathered findings compare equal regardless of arrival
    /// order.
    pub fn normalize(&mut self) {
        let key = |f: &Finding| (f.code.as_str(), f.related_ids.clone(), f.message.clone());
        self.errors.sort_by_key(key);
        self.warnings.sort_by_key(key);
    }
}
