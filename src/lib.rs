//! Pre-commit consistency and conflict validation for employee scheduling
//! data: vacation overlap, daily/weekly hour caps, team capacity, and
//! uniqueness invariants, checked against a pluggable storage port.
//!
//! The engine is read-only and stateless: callers hand a [`ChangeRequest`]
//! to a [`Validator`] and receive a [`ValidationVerdict`] listing every
//! error and warning in one round trip. Committing remains the caller's
//! job, guarded by the storage layer's own constraints.

pub mod engine;
pub mod limits;
pub mod model;
pub mod observability;
pub mod store;
pub mod verdict;

pub use engine::{OverlapHit, ValidationError, Validator, find_overlaps};
pub use limits::ValidationLimits;
pub use model::{
    ChangeRequest, DaySpan, EmployeeId, Hours, MembershipRecord, ModelError, ProjectId, RecordId,
    TeamId, VacationRecord, VacationStatus, VacationType, WorkloadRecord,
};
pub use store::{CommitError, MemoryStore, ScheduleStore, StoreError, StoreResult};
pub use verdict::{Finding, FindingCode, Severity, ValidationVerdict};
