use serde::Deserialize;

use crate::model::Hours;

// ── Structural bounds ────────────────────────────────────────────

/// Earliest year a proposed change may reference.
pub const MIN_VALID_YEAR: i32 = 2000;

/// Latest year a proposed change may reference.
pub const MAX_VALID_YEAR: i32 = 2100;

/// Widest vacation span accepted as structurally sane.
pub const MAX_VACATION_SPAN_DAYS: i64 = 366;

// ── Default policy thresholds ────────────────────────────────────

/// Daily hours above which a warning is reported (8h).
pub const DEFAULT_DAILY_SOFT_CAP: Hours = Hours::from_centi(8_00);

/// Daily hours above which the change is an error (12h).
pub const DEFAULT_DAILY_HARD_CAP: Hours = Hours::from_centi(12_00);

/// Weekly hours above which a warning is reported (40h).
pub const DEFAULT_WEEKLY_SOFT_CAP: Hours = Hours::from_centi(40_00);

/// Weekly hours above which the change is an error (50h).
pub const DEFAULT_WEEKLY_HARD_CAP: Hours = Hours::from_centi(50_00);

/// Active members a team may hold.
pub const DEFAULT_MAX_TEAM_SIZE: usize = 25;

/// Half-width in days of the related-workload window for the same employee;
/// the same-project window is twice as wide.
pub const DEFAULT_RELATED_WINDOW_DAYS: u64 = 7;

/// Injected policy thresholds. There is no ambient global configuration: a
/// caller with per-department policies constructs one validator per policy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValidationLimits {
    pub daily_soft_cap: Hours,
    pub daily_hard_cap: Hours,
    pub weekly_soft_cap: Hours,
    pub weekly_hard_cap: Hours,
    pub max_team_size: usize,
    pub related_window_days: u64,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            daily_soft_cap: DEFAULT_DAILY_SOFT_CAP,
            daily_hard_cap: DEFAULT_DAILY_HARD_CAP,
            weekly_soft_cap: DEFAULT_WEEKLY_SOFT_CAP,
            weekly_hard_cap: DEFAULT_WEEKLY_HARD_CAP,
            max_team_size: DEFAULT_MAX_TEAM_SIZE,
            related_window_days: DEFAULT_RELATED_WINDOW_DAYS,
        }
    }
}
