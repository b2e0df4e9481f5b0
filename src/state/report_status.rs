/// Report status definitions for tracking analysis progress
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Represents the current state of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// Report created, analysis not started yet
    Pending,

    /// Page is being fetched and scored
    Processing,

    /// Analysis finished and all metric fields are populated
    Completed,

    /// Analysis aborted; the report carries an error message
    Failed,
}

impl ReportStatus {
    /// Returns true if no further automatic transition happens from this state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns true if moving from `self` to `next` is allowed
    ///
    /// Transitions only go forward. `pending` may fail directly (for example
    /// when the report cannot be marked as processing).
    pub fn can_transition_to(&self, next: ReportStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing)
                | (Self::Pending, Self::Failed)
                | (Self::Processing, Self::Completed)
                | (Self::Processing, Self::Failed)
        )
    }

    /// Converts the status to its database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Parses a status from its database string representation
    ///
    /// Returns None if the string doesn't match any known status.
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Returns all possible statuses
    pub fn all_statuses() -> [Self; 4] {
        [
            Self::Pending,
            Self::Processing,
            Self::Completed,
            Self::Failed,
        ]
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

impl FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_string(&s.trim().to_ascii_lowercase())
            .ok_or_else(|| format!("unknown report status: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_terminal() {
        assert!(!ReportStatus::Pending.is_terminal());
        assert!(!ReportStatus::Processing.is_terminal());
        assert!(ReportStatus::Completed.is_terminal());
        assert!(ReportStatus::Failed.is_terminal());
    }

    #[test]
    fn test_forward_transitions() {
        assert!(ReportStatus::Pending.can_transition_to(ReportStatus::Processing));
        assert!(ReportStatus::Processing.can_transition_to(ReportStatus::Completed));
        assert!(ReportStatus::Processing.can_transition_to(ReportStatus::Failed));
        assert!(ReportStatus::Pending.can_transition_to(ReportStatus::Failed));
    }

    #[test]
    fn test_terminal_states_do_not_transition() {
        for next in ReportStatus::all_statuses() {
            assert!(!ReportStatus::Completed.can_transition_to(next));
            assert!(!ReportStatus::Failed.can_transition_to(next));
        }
    }

    #[test]
    fn test_no_backward_or_skipping_transitions() {
        assert!(!ReportStatus::Processing.can_transition_to(ReportStatus::Pending));
        assert!(!ReportStatus::Pending.can_transition_to(ReportStatus::Completed));
        assert!(!ReportStatus::Pending.can_transition_to(ReportStatus::Pending));
    }

    #[test]
    fn test_roundtrip_db_string() {
        for status in ReportStatus::all_statuses() {
            let parsed = ReportStatus::from_db_string(status.to_db_string());
            assert_eq!(Some(status), parsed, "Failed roundtrip for {:?}", status);
        }
        assert_eq!(ReportStatus::from_db_string("done"), None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Completed".parse::<ReportStatus>(), Ok(ReportStatus::Completed));
        assert!("done".parse::<ReportStatus>().is_err());
    }

    #[test]
    fn test_display_and_serde_agree() {
        for status in ReportStatus::all_statuses() {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status));
        }
    }
}
