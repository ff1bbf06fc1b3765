//! Import policy enforcement tests.

use tessier::validator::{FindingCategory, ImportPolicy, Severity, Validator};

#[test]
fn default_policy_allows_the_react_family() {
    let src = "\
import React, { useState } from 'react';
import { createPortal } from 'react-dom';
import { createRoot } from 'react-dom/client';

export const App = () => <div role=\"main\">app</div>;
";
    let report = Validator::new(ImportPolicy::default()).validate(src);
    assert!(report.is_valid(), "errors: {:?}", report.errors());
}

#[test]
fn relative_and_alias_imports_are_always_allowed() {
    let src = "\
import React from 'react';
import { Button } from '@/ui/button';
import { format } from './format';
import { shared } from '../shared/util';

export const X = () => <Button label={format(shared)} />;
";
    let report = Validator::new(ImportPolicy::default()).validate(src);
    assert!(report.is_valid(), "errors: {:?}", report.errors());
}

#[test]
fn disallowed_package_produces_an_import_policy_error() {
    let src = "import React from 'react';\nimport axios from 'axios';\nexport const X = () => <div role=\"note\" />;";
    let report = Validator::new(ImportPolicy::default()).validate(src);
    assert!(!report.is_valid());
    let finding = report
        .findings()
        .iter()
        .find(|f| f.severity == Severity::Error)
        .expect("one error");
    assert_eq!(finding.category, FindingCategory::ImportPolicy);
    assert!(finding.message.contains("axios"));
}

#[test]
fn every_bad_import_is_reported_separately() {
    let src = "import axios from 'axios';\nimport _ from 'lodash';\nexport const X = () => <div role=\"note\" />;";
    let report = Validator::new(ImportPolicy::default()).validate(src);
    assert_eq!(report.errors().len(), 2);
}

#[test]
fn custom_policy_replaces_the_default_allow_list() {
    let policy = ImportPolicy {
        alias_prefixes: vec!["~/".to_owned()],
        allowed_modules: vec!["preact".to_owned(), "@acme/ui/*".to_owned()],
    };
    let validator = Validator::new(policy);

    let ok = "import { h } from 'preact';\nimport { Button } from '@acme/ui/button';\nimport x from '~/lib/x';\nexport const X = () => <Button />;";
    assert!(validator.validate(ok).is_valid());

    let bad = "import React from 'react';\nexport const X = () => <div role=\"note\" />;";
    assert!(!validator.validate(bad).is_valid());
}

#[test]
fn wildcard_matches_prefix_not_substring() {
    let policy = ImportPolicy {
        alias_prefixes: vec![],
        allowed_modules: vec!["@acme/ui/*".to_owned()],
    };
    assert!(policy.allows("@acme/ui/button"));
    assert!(policy.allows("@acme/ui/form/input"));
    assert!(!policy.allows("@acme/uikit"));
    assert!(!policy.allows("evil/@acme/ui/button"));
}

#[test]
fn side_effect_import_without_path_is_rejected() {
    // An import statement the parser cannot pull a module path from.
    let src = "import './styles.css';\nexport const X = () => <div role=\"note\" />;";
    let report = Validator::new(ImportPolicy::default()).validate(src);
    // Side-effect imports of relative paths are resolvable and allowed.
    assert!(report.is_valid(), "errors: {:?}", report.errors());
}
