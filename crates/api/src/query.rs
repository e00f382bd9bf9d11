//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Query parameters for list endpoints that support an `include_inactive` flag.
#[derive(Debug, Deserialize)]
pub struct IncludeInactiveParams {
    #[serde(default)]
    pub include_inactive: bool,
}

/// Query parameters for reporting endpoints (`?tz_offset_minutes=`).
///
/// The offset is minutes east of UTC, so UTC+7 is `420`. Months in the
/// trend series are bucketed in this offset.
#[derive(Debug, Default, Deserialize)]
pub struct ReportParams {
    pub tz_offset_minutes: Option<i32>,
}
