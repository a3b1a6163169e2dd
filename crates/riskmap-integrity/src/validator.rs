//! # Integrity Validator
//!
//! Cross-checks every feature's codes and name against the catalog. Code
//! and name are resolved independently so that a renumbered feature and a
//! misspelled feature produce different, actionable issues.

use std::collections::{HashMap, HashSet};

use riskmap_core::{Catalog, CompactCode, DataCode, FeatureCollection, GeometryFeature};

use crate::correct::{self, CorrectionOutcome};
use crate::issue::{IssueKind, Severity, ValidationIssue};
use crate::report::ValidationReport;

/// Validates geometry collections against one catalog.
#[derive(Debug, Clone, Copy)]
pub struct IntegrityValidator<'a> {
    catalog: &'a Catalog,
}

/// Units seen during the per-feature pass.
#[derive(Default)]
struct Observed {
    by_code: HashMap<CompactCode, usize>,
    by_name: HashSet<CompactCode>,
}

impl<'a> IntegrityValidator<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Validator over the embedded Guanajuato catalog.
    pub fn guanajuato() -> IntegrityValidator<'static> {
        IntegrityValidator::new(Catalog::guanajuato())
    }

    /// The catalog this validator checks against.
    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Validate every feature, then look for catalog units that never
    /// appeared.
    pub fn validate(&self, collection: &FeatureCollection) -> ValidationReport {
        let mut issues = Vec::new();
        let mut observed = Observed::default();

        for (index, feature) in collection.features.iter().enumerate() {
            self.check_feature(index, feature, &mut observed, &mut issues);
        }

        for unit in self.catalog.units() {
            let seen = observed.by_code.contains_key(&unit.compact_code)
                || observed.by_name.contains(&unit.compact_code);
            if !seen {
                issues.push(
                    ValidationIssue::new(
                        IssueKind::MissingUnit,
                        Severity::Warning,
                        "unit from the catalog is absent from the geometry",
                    )
                    .unit(&unit.official_name)
                    .expected(format!("compactCode {} ({})", unit.compact_code, unit.data_code)),
                );
            }
        }

        if collection.len() != self.catalog.len() {
            issues.push(
                ValidationIssue::new(
                    IssueKind::CountMismatch,
                    Severity::Info,
                    "feature count differs from the number of catalog units",
                )
                .expected(self.catalog.len())
                .actual(collection.len()),
            );
        }

        let report = ValidationReport::new(collection.len(), self.catalog.len(), issues);
        tracing::debug!(
            features = report.total_units,
            errors = report.summary.errors,
            warnings = report.summary.warnings,
            valid = report.is_valid,
            "integrity validation complete"
        );
        report
    }

    /// Copy of `collection` with renumbered features restored to their
    /// catalog codes. See [`correct`](crate::correct).
    pub fn correct(&self, collection: &FeatureCollection) -> CorrectionOutcome {
        correct::correct_collection(collection, self.catalog)
    }

    fn check_feature(
        &self,
        index: usize,
        feature: &GeometryFeature,
        observed: &mut Observed,
        issues: &mut Vec<ValidationIssue>,
    ) {
        let props = &feature.properties;
        let (Some(state), Some(compact), Some(name)) =
            (props.state_code, props.compact_code, props.raw_name.as_deref())
        else {
            let missing: Vec<&str> = [
                ("stateCode", props.state_code.is_none()),
                ("compactCode", props.compact_code.is_none()),
                ("rawName", props.raw_name.is_none()),
            ]
            .into_iter()
            .filter_map(|(field, absent)| absent.then_some(field))
            .collect();
            let mut issue = ValidationIssue::new(
                IssueKind::MissingFields,
                Severity::Error,
                format!("missing required properties: {}", missing.join(", ")),
            )
            .at(index);
            if let Some(name) = &props.raw_name {
                issue = issue.unit(name);
            }
            issues.push(issue);
            return;
        };

        let code = DataCode::compose(state, compact);
        let expected_state = self.catalog.state_code();
        if state != expected_state {
            issues.push(
                ValidationIssue::new(IssueKind::StateMismatch, Severity::Error, "state code is not the deployment's state")
                    .at(index)
                    .unit(name)
                    .expected(expected_state)
                    .actual(state),
            );
        }

        let by_code = self.catalog.unit_by_data_code(code.as_str());
        let by_name = self.catalog.unit_by_name(name);

        if let Some(unit) = by_code {
            let count = observed.by_code.entry(unit.compact_code).or_insert(0);
            *count += 1;
            if *count == 2 {
                issues.push(
                    ValidationIssue::new(
                        IssueKind::DuplicateUnit,
                        Severity::Warning,
                        "more than one feature carries this unit's code",
                    )
                    .at(index)
                    .unit(&unit.official_name)
                    .actual(&code),
                );
            }
        }
        if let Some(unit) = by_name {
            observed.by_name.insert(unit.compact_code);
        }

        match (by_code, by_name) {
            (Some(a), Some(b)) if a.compact_code == b.compact_code => {}
            // Right unit under the wrong state prefix; already reported.
            (None, Some(b)) if b.compact_code.get() == compact => {}
            (Some(a), None) => issues.push(
                ValidationIssue::new(
                    IssueKind::NameMismatch,
                    Severity::Warning,
                    "name does not match the catalog name for this code",
                )
                .at(index)
                .unit(&a.official_name)
                .expected(&a.official_name)
                .actual(name)
                .suggest(format!("rename to \"{}\"", a.official_name)),
            ),
            (_, Some(b)) => issues.push(
                ValidationIssue::new(
                    IssueKind::CodeMismatch,
                    Severity::Error,
                    "code does not match the catalog code for this name",
                )
                .at(index)
                .unit(&b.official_name)
                .expected(b.compact_code)
                .actual(compact)
                .suggest(format!("set compactCode to {}", b.compact_code)),
            ),
            (None, None) => issues.push(
                ValidationIssue::new(
                    IssueKind::UnitNotFound,
                    Severity::Error,
                    "unit not found in canonical catalog",
                )
                .at(index)
                .unit(name)
                .actual(format!("{name} ({code})")),
            ),
        }

        let has_geometry = feature
            .geometry
            .as_ref()
            .is_some_and(|g| g.is_structurally_present());
        if !has_geometry {
            issues.push(
                ValidationIssue::new(IssueKind::EmptyGeometry, Severity::Error, "geometry has no coordinates")
                    .at(index)
                    .unit(name),
            );
        }
    }
}
