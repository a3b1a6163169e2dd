//! # Validation Issues

use std::fmt;

use serde::{Deserialize, Serialize};

/// How serious an issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        })
    }
}

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// `stateCode`, `compactCode` or `rawName` absent.
    MissingFields,
    /// `stateCode` is not the deployment's state.
    StateMismatch,
    /// Code resolves, name does not match it.
    NameMismatch,
    /// Name resolves to a unit whose code differs from the feature's.
    CodeMismatch,
    /// Neither code nor name resolves.
    UnitNotFound,
    /// Geometry absent or without a single position.
    EmptyGeometry,
    /// Two features resolve to the same unit by code.
    DuplicateUnit,
    /// A catalog unit never appeared by code or by name.
    MissingUnit,
    /// The number of features differs from the catalog size.
    CountMismatch,
}

impl IssueKind {
    /// snake_case identifier, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingFields => "missing_fields",
            Self::StateMismatch => "state_mismatch",
            Self::NameMismatch => "name_mismatch",
            Self::CodeMismatch => "code_mismatch",
            Self::UnitNotFound => "unit_not_found",
            Self::EmptyGeometry => "empty_geometry",
            Self::DuplicateUnit => "duplicate_unit",
            Self::MissingUnit => "missing_unit",
            Self::CountMismatch => "count_mismatch",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finding of the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub kind: IssueKind,
    pub severity: Severity,
    /// Position of the offending feature in the input, when there is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    /// Issue with only kind, severity and message set.
    pub fn new(kind: IssueKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            feature_index: None,
            unit_name: None,
            expected: None,
            actual: None,
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn at(mut self, index: usize) -> Self {
        self.feature_index = Some(index);
        self
    }

    pub fn unit(mut self, name: impl Into<String>) -> Self {
        self.unit_name = Some(name.into());
        self
    }

    pub fn expected(mut self, value: impl ToString) -> Self {
        self.expected = Some(value.to_string());
        self
    }

    pub fn actual(mut self, value: impl ToString) -> Self {
        self.actual = Some(value.to_string());
        self
    }

    pub fn suggest(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.kind)?;
        if let Some(index) = self.feature_index {
            write!(f, " feature #{index}")?;
        }
        if let Some(unit) = &self.unit_name {
            write!(f, " {unit}")?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(expected) = &self.expected {
            write!(f, "\n      expected:   {expected}")?;
        }
        if let Some(actual) = &self.actual {
            write!(f, "\n      actual:     {actual}")?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n      suggestion: {suggestion}")?;
        }
        Ok(())
    }
}
