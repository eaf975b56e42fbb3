mod analyzer;
mod error;
mod overlap;
mod thresholds;
mod uniqueness;

pub use error::ValidationError;
pub use overlap::{OverlapHit, find_overlaps};

use std::sync::Arc;
use std::time::Instant;

use chrono::{Datelike, NaiveDate};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::limits::{MAX_VACATION_SPAN_DAYS, MAX_VALID_YEAR, MIN_VALID_YEAR, ValidationLimits};
use crate::model::{ChangeRequest, Hours};
use crate::observability;
use crate::store::ScheduleStore;
use crate::verdict::ValidationVerdict;

/// The validation façade every write path calls before committing.
///
/// Stateless across calls and read-only against storage: it holds an `Arc`
/// to the query port and the injected limits, nothing else, so one instance
/// can serve any number of concurrent validations. The verdict is a
/// pre-check: the write path must still enforce the uniqueness and
/// threshold invariants inside its own commit (storage constraint or row
/// lock), because another writer can slip between validate and commit.
pub struct Validator {
    store: Arc<dyn ScheduleStore>,
    limits: ValidationLimits,
}

impl Validator {
    pub fn new(store: Arc<dyn ScheduleStore>, limits: ValidationLimits) -> Self {
        Self { store, limits }
    }

    pub fn limits(&self) -> &ValidationLimits {
        &self.limits
    }

    /// Validate a proposed change against persisted state.
    ///
    /// Check order is fixed: structural validation, then overlap, threshold
    /// and uniqueness checks. Only a structural failure short-circuits;
    /// business findings accumulate across all phases so the caller gets the
    /// complete report in one round trip. A fired cancellation token yields
    /// `Err(Cancelled)`, never a false "valid".
    pub async fn validate(
        &self,
        change: &ChangeRequest,
        cancel: &CancellationToken,
    ) -> Result<ValidationVerdict, ValidationError> {
        let started = Instant::now();
        let kind = observability::change_label(change);
        debug!(kind, "change received");

        validate_structure(change)?;
        debug!(kind, "structurally validated");

        if cancel.is_cancelled() {
            return Err(ValidationError::Cancelled);
        }

        let verdict = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ValidationError::Cancelled),
            res = self.run_checks(kind, change) => res?,
        };

        let outcome = if verdict.is_valid() { "valid" } else { "rejected" };
        metrics::counter!(
            observability::VALIDATIONS_TOTAL,
            "kind" => kind,
            "outcome" => outcome
        )
        .increment(1);
        metrics::histogram!(observability::VALIDATION_DURATION_SECONDS, "kind" => kind)
            .record(started.elapsed().as_secs_f64());
        for finding in verdict.errors.iter().chain(verdict.warnings.iter()) {
            metrics::counter!(
                observability::FINDINGS_TOTAL,
                "code" => finding.code.as_str(),
                "severity" => finding.severity.as_str()
            )
            .increment(1);
        }

        debug!(
            kind,
            errors = verdict.errors.len(),
            warnings = verdict.warnings.len(),
            valid = verdict.is_valid(),
            "validation done"
        );
        Ok(verdict)
    }

    async fn run_checks(
        &self,
        kind: &'static str,
        change: &ChangeRequest,
    ) -> Result<ValidationVerdict, ValidationError> {
        let store = self.store.as_ref();
        let mut verdict = ValidationVerdict::default();

        let findings = analyzer::overlap_findings(store, &self.limits, change).await?;
        debug!(kind, findings = findings.len(), "overlap checked");
        verdict.extend(findings);

        let findings = analyzer::threshold_findings(store, &self.limits, change).await?;
        debug!(kind, findings = findings.len(), "thresholds checked");
        verdict.extend(findings);

        let findings = analyzer::uniqueness_findings(store, change).await?;
        debug!(kind, findings = findings.len(), "uniqueness checked");
        verdict.extend(findings);

        verdict.normalize();
        Ok(verdict)
    }
}

/// Caller-error screen. Runs before any storage query; the record
/// constructors already enforce per-field invariants, this catches what
/// survives the type system.
fn validate_structure(change: &ChangeRequest) -> Result<(), ValidationError> {
    match change {
        ChangeRequest::VacationCreate { span, .. } | ChangeRequest::VacationUpdate { span, .. } => {
            check_date(span.start())?;
            check_date(span.end())?;
            if span.days() > MAX_VACATION_SPAN_DAYS {
                return Err(ValidationError::InvalidRequest("vacation span too wide"));
            }
        }
        ChangeRequest::WorkloadCreate {
            work_date, hours, ..
        }
        | ChangeRequest::WorkloadUpdate {
            work_date, hours, ..
        } => {
            check_date(*work_date)?;
            if *hours <= Hours::ZERO {
                return Err(ValidationError::InvalidRequest(
                    "hours must be greater than zero",
                ));
            }
            if *hours > Hours::DAY {
                return Err(ValidationError::InvalidRequest("hours exceed a single day"));
            }
        }
        ChangeRequest::MembershipCreate {
            role, start_date, ..
        } => {
            check_date(*start_date)?;
            if role.trim().is_empty() {
                return Err(ValidationError::InvalidRequest("role must not be empty"));
            }
        }
        ChangeRequest::MembershipUpdate {
            role,
            start_date,
            end_date,
            ..
        } => {
            check_date(*start_date)?;
            if role.trim().is_empty() {
                return Err(ValidationError::InvalidRequest("role must not be empty"));
            }
            if let Some(end) = end_date {
                check_date(*end)?;
                if end < start_date {
                    return Err(ValidationError::InvalidRequest(
                        "membership end date precedes start date",
                    ));
                }
            }
        }
    }
    Ok(())
}

fn check_date(date: NaiveDate) -> Result<(), ValidationError> {
    if date.year() < MIN_VALID_YEAR || date.year() > MAX_VALID_YEAR {
        return Err(ValidationError::InvalidRequest(
            "date outside the supported range",
        ));
    }
    Ok(())
}
