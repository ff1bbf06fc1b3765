//! Security rule descriptors.
//!
//! Each rule is a tagged pattern with a fixed severity and message, so the
//! rule set stays auditable and testable as a table rather than a pile of
//! ad hoc branches. All rules are evaluated on every pass; nothing
//! short-circuits.

use regex::Regex;
use tracing::warn;

use super::{Finding, FindingCategory, Severity};

/// One static security rule.
pub struct SecurityRule {
    /// Rule category, carried into findings.
    pub category: FindingCategory,
    /// Severity of a match.
    pub severity: Severity,
    /// Message emitted on a match; names the forbidden construct.
    pub message: &'static str,
    pattern: Regex,
}

impl SecurityRule {
    /// Evaluate the rule against a code body.
    pub fn check(&self, code: &str) -> Option<Finding> {
        if self.pattern.is_match(code) {
            Some(Finding {
                severity: self.severity,
                category: self.category,
                message: self.message.to_owned(),
            })
        } else {
            None
        }
    }
}

/// Pattern table: (category, severity, regex, message).
const RULE_TABLE: &[(FindingCategory, Severity, &str, &str)] = &[
    (
        FindingCategory::DynamicEvaluation,
        Severity::Error,
        r"\beval\s*\(",
        "forbidden call to eval(): dynamic code evaluation is not allowed",
    ),
    (
        FindingCategory::DynamicEvaluation,
        Severity::Error,
        r"\bnew\s+Function\s*\(",
        "forbidden use of new Function(): dynamic code evaluation is not allowed",
    ),
    (
        FindingCategory::DynamicModuleLoad,
        Severity::Error,
        r"\bimport\s*\(",
        "forbidden dynamic import(): modules must be imported statically",
    ),
    (
        FindingCategory::DynamicModuleLoad,
        Severity::Error,
        r"\brequire\s*\(",
        "forbidden call to require(): modules must be imported statically",
    ),
    (
        FindingCategory::NetworkPrimitive,
        Severity::Error,
        r"\bfetch\s*\(",
        "forbidden call to fetch(): use the vetted data-access capabilities instead",
    ),
    (
        FindingCategory::NetworkPrimitive,
        Severity::Error,
        r"\bXMLHttpRequest\b",
        "forbidden use of XMLHttpRequest: use the vetted data-access capabilities instead",
    ),
    (
        FindingCategory::NetworkPrimitive,
        Severity::Error,
        r"\bnew\s+WebSocket\s*\(",
        "forbidden use of WebSocket: use the vetted data-access capabilities instead",
    ),
    (
        FindingCategory::PrivilegedAccess,
        Severity::Error,
        r"\bprocess\s*\.",
        "forbidden reference to the process object",
    ),
    (
        FindingCategory::PrivilegedAccess,
        Severity::Error,
        r"\bglobalThis\b",
        "forbidden reference to globalThis",
    ),
    (
        FindingCategory::PrivilegedAccess,
        Severity::Error,
        r"document\s*\.\s*cookie\s*=",
        "forbidden direct write to document.cookie",
    ),
    (
        FindingCategory::MarkupInjection,
        Severity::Error,
        r"\.\s*(?:innerHTML|outerHTML)\s*=[^=]",
        "forbidden assignment of raw markup to innerHTML/outerHTML",
    ),
    (
        FindingCategory::MarkupInjection,
        Severity::Error,
        r"document\s*\.\s*write(?:ln)?\s*\(",
        "forbidden call to document.write()",
    ),
    (
        FindingCategory::MarkupInjection,
        Severity::Error,
        r"\bdangerouslySetInnerHTML\b",
        "forbidden use of dangerouslySetInnerHTML",
    ),
    (
        FindingCategory::StorageAccess,
        Severity::Warning,
        r"\b(?:localStorage|sessionStorage)\b",
        "browser storage access flagged for review",
    ),
];

/// Compile the default rule table. Patterns that fail to compile are skipped
/// with a warning rather than aborting validation.
pub fn default_rules() -> Vec<SecurityRule> {
    RULE_TABLE
        .iter()
        .filter_map(|(category, severity, pattern, message)| match Regex::new(pattern) {
            Ok(regex) => Some(SecurityRule {
                category: *category,
                severity: *severity,
                message,
                pattern: regex,
            }),
            Err(e) => {
                warn!(pattern, error = %e, "skipping unparsable security rule");
                None
            }
        })
        .collect()
}
