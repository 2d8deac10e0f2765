//! Structural validation of composition snapshots.
//!
//! Validation collects every fault instead of stopping at the first so the
//! caller gets one aggregated report per snapshot. Missing or unfinished
//! media is not a structural fault.

use std::fmt;

/// One structural fault in a composition snapshot.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationIssue {
    #[error("track id `{track_id}` appears more than once")]
    DuplicateTrack { track_id: String },

    #[error("keyframes filed under unknown track `{track_id}`")]
    UnknownTrack { track_id: String },

    #[error("keyframe `{keyframe_id}` is filed under track `{listed_under}` but declares track `{declared}`")]
    TrackMismatch {
        keyframe_id: String,
        listed_under: String,
        declared: String,
    },

    #[error("keyframe `{keyframe_id}` has invalid timestamp {value}")]
    InvalidTimestamp { keyframe_id: String, value: f64 },

    #[error("keyframe `{keyframe_id}` has invalid duration {value}")]
    InvalidDuration { keyframe_id: String, value: f64 },

    #[error("keyframes `{first}` and `{second}` overlap on track `{track_id}`")]
    Overlap {
        track_id: String,
        first: String,
        second: String,
    },

    #[error("keyframe `{keyframe_id}` references media `{media_id}` missing from the snapshot")]
    DanglingMedia {
        keyframe_id: String,
        media_id: String,
    },
}

/// Aggregated validation result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    pub fn extend(&mut self, other: ValidationReport) {
        self.issues.extend(other.issues);
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// `Ok` when no issues were collected.
    pub fn into_result(self) -> Result<(), ValidationReport> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Human-readable issue lines.
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} structural issue(s)", self.issues.len())?;
        for issue in &self.issues {
            write!(f, "\n  - {issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationReport {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_is_ok() {
        assert!(ValidationReport::new().into_result().is_ok());
    }

    #[test]
    fn test_report_display_lists_every_issue() {
        let mut report = ValidationReport::new();
        report.push(ValidationIssue::UnknownTrack {
            track_id: "ghost".into(),
        });
        report.push(ValidationIssue::InvalidDuration {
            keyframe_id: "k1".into(),
            value: -5.0,
        });

        let text = report.to_string();
        assert!(text.starts_with("2 structural issue(s)"));
        assert!(text.contains("unknown track `ghost`"));
        assert!(text.contains("invalid duration -5"));
        assert_eq!(report.messages().len(), 2);
        assert!(report.into_result().is_err());
    }
}
