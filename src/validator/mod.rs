//! Static validation of generated component source.
//!
//! [`Validator::validate`] inspects source text for security and correctness
//! violations in one traversal and returns a [`ValidationReport`]. It never
//! panics and never returns an error: an unparsable source yields a report
//! with a single fatal parse finding. Errors block acceptance; warnings are
//! informational only.

use serde::Deserialize;

use crate::source::{SourceModule, TopLevel};

pub mod a11y;
pub mod rules;

use rules::SecurityRule;

// ---------------------------------------------------------------------------
// Findings
// ---------------------------------------------------------------------------

/// Whether a finding blocks acceptance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Blocks acceptance.
    Error,
    /// Informational only.
    Warning,
}

/// What kind of check produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindingCategory {
    /// Source could not be parsed at all.
    Parse,
    /// Import not allowed by policy.
    ImportPolicy,
    /// Dynamic code evaluation primitive.
    DynamicEvaluation,
    /// Dynamic module loading primitive.
    DynamicModuleLoad,
    /// Direct network-request primitive.
    NetworkPrimitive,
    /// Process/global-environment or cookie access.
    PrivilegedAccess,
    /// Raw markup written into a live document node.
    MarkupInjection,
    /// Browser storage API usage.
    StorageAccess,
    /// Accessibility heuristic.
    Accessibility,
}

/// One validator-reported issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Whether the finding blocks acceptance.
    pub severity: Severity,
    /// The check that produced it.
    pub category: FindingCategory,
    /// Human-readable description naming the offending construct.
    pub message: String,
}

/// The result of one validation pass.
///
/// Validity is derived, never stored: the report is valid iff it holds no
/// error-severity findings.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    findings: Vec<Finding>,
}

impl ValidationReport {
    /// All findings in check order.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Messages of error-severity findings.
    pub fn errors(&self) -> Vec<String> {
        self.messages_with(Severity::Error)
    }

    /// Messages of warning-severity findings.
    pub fn warnings(&self) -> Vec<String> {
        self.messages_with(Severity::Warning)
    }

    /// True iff the report holds no errors.
    pub fn is_valid(&self) -> bool {
        !self
            .findings
            .iter()
            .any(|f| f.severity == Severity::Error)
    }

    fn messages_with(&self, severity: Severity) -> Vec<String> {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .map(|f| f.message.clone())
            .collect()
    }

    fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }
}

// ---------------------------------------------------------------------------
// Import policy
// ---------------------------------------------------------------------------

/// Which module paths generated code may import.
///
/// A path is allowed when it is relative/project-local, matches a configured
/// alias prefix, or matches an allow-list entry. Allow-list entries may end
/// in `*`, matching any path sharing the prefix.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImportPolicy {
    /// Alias prefixes treated as project-local (e.g. `@/`).
    pub alias_prefixes: Vec<String>,
    /// Explicitly allowed module paths, `*` suffix for prefix wildcards.
    pub allowed_modules: Vec<String>,
}

impl Default for ImportPolicy {
    fn default() -> Self {
        Self {
            alias_prefixes: vec!["@/".to_owned()],
            allowed_modules: vec![
                "react".to_owned(),
                "react/*".to_owned(),
                "react-dom".to_owned(),
                "react-dom/*".to_owned(),
            ],
        }
    }
}

impl ImportPolicy {
    /// Whether the policy allows importing the given module path.
    pub fn allows(&self, module: &str) -> bool {
        if module.starts_with("./") || module.starts_with("../") || module.starts_with('/') {
            return true;
        }
        if self.alias_prefixes.iter().any(|p| module.starts_with(p.as_str())) {
            return true;
        }
        self.allowed_modules.iter().any(|entry| {
            match entry.strip_suffix('*') {
                Some(prefix) => module.starts_with(prefix),
                None => module == entry,
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Validator
// ---------------------------------------------------------------------------

/// Static validator over generated component source.
///
/// Construction compiles the security rule table once; [`validate`] is then
/// a pure function of the source text — identical input always yields an
/// identical report, and all checks run before the report is finalized.
///
/// [`validate`]: Validator::validate
pub struct Validator {
    policy: ImportPolicy,
    rules: Vec<SecurityRule>,
}

impl Validator {
    /// Create a validator for the given import policy.
    pub fn new(policy: ImportPolicy) -> Self {
        Self {
            policy,
            rules: rules::default_rules(),
        }
    }

    /// Validate source text. Never panics; never short-circuits.
    pub fn validate(&self, source: &str) -> ValidationReport {
        let mut report = ValidationReport::default();

        let module = match SourceModule::parse(source) {
            Ok(module) => module,
            Err(e) => {
                // ParseError's Display already carries the "could not be
                // parsed" prefix.
                report.push(Finding {
                    severity: Severity::Error,
                    category: FindingCategory::Parse,
                    message: e.to_string(),
                });
                return report;
            }
        };

        // Import policy over declared imports.
        for item in &module.items {
            if let TopLevel::Import { module: path, raw } = item {
                match path {
                    Some(path) if self.policy.allows(path) => {}
                    Some(path) => report.push(Finding {
                        severity: Severity::Error,
                        category: FindingCategory::ImportPolicy,
                        message: format!("import of '{path}' is not allowed by policy"),
                    }),
                    None => report.push(Finding {
                        severity: Severity::Error,
                        category: FindingCategory::ImportPolicy,
                        message: format!("import statement has no resolvable module path: {raw}"),
                    }),
                }
            }
        }

        // Security rules over the code body (preamble excluded).
        let body = module.body();
        for rule in &self.rules {
            if let Some(finding) = rule.check(&body) {
                report.push(finding);
            }
        }

        // Accessibility heuristics; warnings only.
        for finding in a11y::check(&body) {
            report.push(finding);
        }

        report
    }
}
