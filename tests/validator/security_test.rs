//! Security rule coverage over realistic component sources.

use tessier::validator::{FindingCategory, ImportPolicy, Severity, Validator};

fn validator() -> Validator {
    Validator::new(ImportPolicy::default())
}

fn wrap(body: &str) -> String {
    format!(
        "import React from 'react';\n\nexport const Widget = () => {{\n  {body}\n  return <button onClick={{noop}}>ok</button>;\n}};\n"
    )
}

#[test]
fn each_forbidden_primitive_is_named_in_its_error() {
    let cases: &[(&str, &str)] = &[
        ("eval('code');", "eval()"),
        ("const f = new Function('return 1');", "Function"),
        ("import('./lazy').then(use);", "import()"),
        ("const fs = require('fs');", "require()"),
        ("fetch('/api/data');", "fetch()"),
        ("const xhr = new XMLHttpRequest();", "XMLHttpRequest"),
        ("const ws = new WebSocket('wss://x');", "WebSocket"),
        ("const env = process.env.HOME;", "process"),
        ("globalThis.leak = 1;", "globalThis"),
        ("document.cookie = 'a=1';", "cookie"),
        ("node.innerHTML = html;", "innerHTML"),
        ("document.write('<b>x</b>');", "document.write"),
    ];
    for (body, construct) in cases {
        let report = validator().validate(&wrap(body));
        assert!(!report.is_valid(), "{body} should be rejected");
        assert!(
            report.errors().iter().any(|e| e.contains(construct)),
            "error for {body} should mention {construct}, got {:?}",
            report.errors()
        );
    }
}

#[test]
fn dangerously_set_inner_html_is_rejected() {
    let src = "import React from 'react';\nexport const X = () => <div dangerouslySetInnerHTML={{ __html: markup }} />;";
    let report = validator().validate(src);
    assert!(!report.is_valid());
}

#[test]
fn inner_html_comparison_is_not_an_assignment() {
    let report = validator().validate(&wrap("if (node.innerHTML === expected) { mark(); }"));
    assert!(report.is_valid(), "errors: {:?}", report.errors());
}

#[test]
fn storage_access_warns_but_passes() {
    let report = validator().validate(&wrap("const saved = localStorage.getItem('draft');"));
    assert!(report.is_valid());
    assert!(report.warnings().iter().any(|w| w.contains("storage")));
}

#[test]
fn multiple_violations_are_all_reported() {
    let report = validator().validate(&wrap("eval('1');\n  fetch('/x');\n  globalThis.y = 2;"));
    assert!(report.errors().len() >= 3);
}

#[test]
fn identifier_containing_a_keyword_is_not_flagged() {
    let report = validator().validate(&wrap("const evaluation = score(medieval);"));
    assert!(report.is_valid(), "errors: {:?}", report.errors());
}

#[test]
fn violations_in_the_preamble_are_ignored() {
    let src = "---\ndescription: component that replaced an old eval() and fetch() hack\n---\nimport React from 'react';\nexport const X = () => <div role=\"note\">safe</div>;\n";
    let report = validator().validate(src);
    assert!(report.is_valid(), "errors: {:?}", report.errors());
}

#[test]
fn apostrophe_text_with_braced_ternary_validates() {
    let src = "import React from 'react';\n\nexport const Status = ({ ok }) => <div role=\"status\">it's {ok ? 'fine' : 'broken'}</div>;\n";
    let report = validator().validate(src);
    assert!(report.is_valid(), "errors: {:?}", report.errors());
}

#[test]
fn parse_failure_is_a_single_error_finding() {
    let report = validator().validate("export const Broken = ({ items ) => <div />;}");
    assert!(!report.is_valid());
    assert_eq!(report.findings().len(), 1);
    assert_eq!(report.findings()[0].category, FindingCategory::Parse);
    assert_eq!(report.findings()[0].severity, Severity::Error);
}
