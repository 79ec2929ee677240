//! Long-running operation polling helpers.
//!
//! ARM acknowledges slow writes with `201`/`202` and points at a
//! status resource through `Azure-AsyncOperation` or `Location`.
//! These helpers decide where to poll, how long to wait, and
//! whether a reported status is terminal.

use std::time::Duration;

pub const ASYNC_OPERATION_HEADER: &str = "azure-asyncoperation";
pub const LOCATION_HEADER: &str = "location";
pub const RETRY_AFTER_HEADER: &str = "retry-after";

/// Where to poll for completion of an accepted operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollTarget {
    /// Status resource returning `{"status": ...}`.
    AsyncOperation(String),
    /// Answers `202` while running, then the final result.
    Location(String),
}

impl PollTarget {
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::AsyncOperation(url) | Self::Location(url) => url,
        }
    }
}

/// Pick the poll target for an accepted response. The async
/// operation header wins when both are present.
#[must_use]
pub fn poll_target(
    status: u16,
    async_operation: Option<&str>,
    location: Option<&str>,
) -> Option<PollTarget> {
    if status != 201 && status != 202 {
        return None;
    }
    let non_empty = |v: Option<&str>| v.map(str::trim).filter(|s| !s.is_empty()).map(String::from);
    non_empty(async_operation)
        .map(PollTarget::AsyncOperation)
        .or_else(|| non_empty(location).map(PollTarget::Location))
}

/// Status reported by an async operation resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationStatus {
    InProgress,
    Succeeded,
    Failed,
    Canceled,
    Other(String),
}

impl OperationStatus {
    /// Status names are matched case-insensitively.
    #[must_use]
    pub fn parse(status: &str) -> Self {
        match status.to_ascii_lowercase().as_str() {
            "inprogress" | "running" | "accepted" | "creating" | "updating" | "deleting" => {
                Self::InProgress
            }
            "succeeded" => Self::Succeeded,
            "failed" => Self::Failed,
            "canceled" | "cancelled" => Self::Canceled,
            _ => Self::Other(status.to_string()),
        }
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::InProgress => "InProgress",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
            Self::Canceled => "Canceled",
            Self::Other(s) => s,
        }
    }
}

/// Delay before the next poll: `Retry-After` seconds when the
/// header holds a non-negative integer, `default` otherwise.
#[must_use]
pub fn retry_after(header: Option<&str>, default: Duration) -> Duration {
    header
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map_or(default, Duration::from_secs)
}
