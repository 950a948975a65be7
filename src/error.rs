use thiserror::Error;

/// Domain errors raised by the data model and the chart dispatch.
///
/// File-level failures (I/O, malformed CSV, missing columns) are reported
/// through `anyhow` by the loader; these variants cover the values that make
/// it past parsing but are not valid for the dashboard.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    #[error("unknown state: {0:?}")]
    UnknownState(String),

    #[error("unknown summary view: {0:?} (expected \"Avg\" or \"Gvp\")")]
    UnknownView(String),

    #[error("duplicate district {district:?} in {state}")]
    DuplicateDistrict { state: String, district: String },

    #[error("{field} of {district:?} must be a non-negative number, got {value}")]
    InvalidValue {
        district: String,
        field: &'static str,
        value: f64,
    },
}
