//! Accessibility heuristics over full component sources.

use tessier::validator::{FindingCategory, ImportPolicy, Severity, Validator};

fn validator() -> Validator {
    Validator::new(ImportPolicy::default())
}

#[test]
fn accessible_form_produces_no_findings() {
    let src = "\
import React from 'react';

export const LoginForm = ({ onSubmit }) => {
  return (
    <form onSubmit={onSubmit}>
      <input id=\"email\" type=\"email\" value=\"\" />
      <input id=\"password\" type=\"password\" value=\"\" />
      <input type=\"hidden\" name=\"csrf\" value=\"token\" />
      <button type=\"submit\">Sign in</button>
    </form>
  );
};
";
    let report = validator().validate(src);
    assert!(report.is_valid());
    assert!(report.warnings().is_empty(), "warnings: {:?}", report.warnings());
}

#[test]
fn problems_across_a_component_are_all_collected() {
    let src = "\
import React from 'react';

export const Gallery = ({ photos, onOpen }) => {
  return (
    <div>
      <img src=\"hero.png\" />
      <span onClick={onOpen}>open</span>
      <input value=\"\" />
    </div>
  );
};
";
    let report = validator().validate(src);
    assert!(report.is_valid(), "a11y findings must not block");
    let warnings = report.warnings();
    assert_eq!(warnings.len(), 3, "warnings: {warnings:?}");
    assert!(warnings.iter().any(|w| w.contains("alternative text")));
    assert!(warnings.iter().any(|w| w.contains("keyboard")));
    assert!(warnings.iter().any(|w| w.contains("label")));
}

#[test]
fn accessibility_findings_are_warning_severity() {
    let src = "import React from 'react';\nexport const X = () => <img src=\"a.png\" />;";
    let report = validator().validate(src);
    for finding in report.findings() {
        if finding.category == FindingCategory::Accessibility {
            assert_eq!(finding.severity, Severity::Warning);
        }
    }
    assert!(report
        .findings()
        .iter()
        .any(|f| f.category == FindingCategory::Accessibility));
}

#[test]
fn role_and_keyboard_handler_satisfy_the_clickable_container_check() {
    let src = "\
import React from 'react';

export const Chip = ({ onSelect }) => (
  <span role=\"button\" tabIndex={0} onClick={onSelect} onKeyDown={onSelect}>
    tag
  </span>
);
";
    let report = validator().validate(src);
    assert!(report.warnings().is_empty(), "warnings: {:?}", report.warnings());
}
