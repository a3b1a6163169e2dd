//! # Validation Report
//!
//! Machine-readable result of a validation pass, plus the multi-section text
//! rendering printed by reporting tools.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::issue::{IssueKind, Severity, ValidationIssue};

/// Issue counts by severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeveritySummary {
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
}

/// Result of validating one geometry collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// True iff there are no error-severity issues.
    pub is_valid: bool,
    /// Features in the input.
    pub total_units: usize,
    /// Units in the catalog.
    pub expected_units: usize,
    pub issues: Vec<ValidationIssue>,
    pub summary: SeveritySummary,
}

impl ValidationReport {
    /// Assemble a report; validity and the tally are derived from `issues`.
    pub fn new(total_units: usize, expected_units: usize, issues: Vec<ValidationIssue>) -> Self {
        let mut summary = SeveritySummary::default();
        for issue in &issues {
            match issue.severity {
                Severity::Error => summary.errors += 1,
                Severity::Warning => summary.warnings += 1,
                Severity::Info => summary.info += 1,
            }
        }
        Self {
            is_valid: summary.errors == 0,
            total_units,
            expected_units,
            issues,
            summary,
        }
    }

    /// Issues of one severity, in report order.
    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.severity == severity)
    }

    /// Issues of one kind, in report order.
    pub fn of_kind(&self, kind: IssueKind) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.kind == kind)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.is_valid { "VALID" } else { "INVALID" };
        writeln!(
            f,
            "Integrity report: {status} ({}/{} units; {} errors, {} warnings, {} info)",
            self.total_units,
            self.expected_units,
            self.summary.errors,
            self.summary.warnings,
            self.summary.info
        )?;

        for (severity, title, count) in [
            (Severity::Error, "Errors", self.summary.errors),
            (Severity::Warning, "Warnings", self.summary.warnings),
            (Severity::Info, "Info", self.summary.info),
        ] {
            writeln!(f)?;
            writeln!(f, "{title} ({count})")?;
            if count == 0 {
                writeln!(f, "  none")?;
                continue;
            }
            for issue in self.with_severity(severity) {
                writeln!(f, "  {issue}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_do_not_invalidate() {
        let report = ValidationReport::new(
            46,
            46,
            vec![ValidationIssue::new(IssueKind::NameMismatch, Severity::Warning, "spelling")],
        );
        assert!(report.is_valid);
        assert_eq!(report.summary, SeveritySummary { errors: 0, warnings: 1, info: 0 });
    }

    #[test]
    fn test_single_error_invalidates() {
        let report = ValidationReport::new(
            1,
            46,
            vec![
                ValidationIssue::new(IssueKind::UnitNotFound, Severity::Error, "unknown"),
                ValidationIssue::new(IssueKind::CountMismatch, Severity::Info, "count"),
            ],
        );
        assert!(!report.is_valid);
        assert_eq!(report.with_severity(Severity::Info).count(), 1);
        assert_eq!(report.of_kind(IssueKind::UnitNotFound).count(), 1);
    }

    #[test]
    fn test_text_rendering_sections() {
        let report = ValidationReport::new(
            2,
            46,
            vec![ValidationIssue::new(IssueKind::EmptyGeometry, Severity::Error, "no coordinates").at(1)],
        );
        let text = report.to_string();
        assert!(text.starts_with("Integrity report: INVALID (2/46 units; 1 errors, 0 warnings, 0 info)"));
        assert!(text.contains("Errors (1)\n  [empty_geometry] feature #1: no coordinates"));
        assert!(text.contains("Warnings (0)\n  none"));
        assert!(text.contains("Info (0)\n  none"));
    }

    #[test]
    fn test_json_shape() {
        let report = ValidationReport::new(46, 46, Vec::new());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["isValid"], true);
        assert_eq!(json["expectedUnits"], 46);
        assert_eq!(json["summary"]["errors"], 0);
    }
}
