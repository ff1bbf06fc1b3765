//! Declaration hoisting and handler/import repair on full sources.

use tessier::fixer::autofix;
use tessier::validator::{ImportPolicy, Validator};

#[test]
fn hoisted_source_passes_validation() {
    let src = "\
import React from 'react';

const LIMIT = 10;
let counter = 0;

export const Counter = () => {
  counter = Math.min(counter, LIMIT);
  return <button onClick={bump}>count</button>;
};
";
    let result = autofix(src);
    assert_eq!(
        result
            .fixes
            .iter()
            .filter(|f| f.to_string().contains("hoisted"))
            .count(),
        2
    );
    assert!(result.code.contains("const LIMIT = 10;"));
    assert!(result.code.contains("let counter = 0;"));

    let report = Validator::new(ImportPolicy::default()).validate(&result.code);
    assert!(report.is_valid(), "errors: {:?}", report.errors());
}

#[test]
fn function_declaration_export_is_a_hoist_target() {
    let src = "\
const palette = ['red', 'blue'];

export default function Swatch({ index }) {
  return <div role=\"img\" aria-label={palette[index]} />;
}
";
    let result = autofix(src);
    assert!(result.fixes.iter().any(|f| f.to_string().contains("'palette'")));
    assert!(result.code.contains("function Swatch({ index }) {\n  const palette"));
}

#[test]
fn source_with_nothing_to_fix_is_returned_verbatim() {
    let src = "\
import React from 'react';

export const Empty = () => {
  return <div role=\"presentation\" />;
};
";
    let result = autofix(src);
    assert!(result.fixes.is_empty());
    assert_eq!(result.code, src);
}

#[test]
fn lowercase_handlers_are_normalized_across_the_whole_tree() {
    let src = "\
import React from 'react';

export const Form = ({ save }) => {
  return (
    <form onsubmit={save}>
      <input id=\"name\" onchange={save} onblur={save} />
      <button onclick={save}>save</button>
    </form>
  );
};
";
    let result = autofix(src);
    assert!(result.code.contains("onSubmit={save}"));
    assert!(result.code.contains("onChange={save}"));
    assert!(result.code.contains("onBlur={save}"));
    assert!(result.code.contains("onClick={save}"));
}

#[test]
fn missing_base_import_is_added_before_the_component() {
    let src = "export const Hello = () => {\n  return <p>hello</p>;\n};";
    let result = autofix(src);
    assert!(result.code.starts_with("import React from 'react';"));
    let import_at = result.code.find("import React").expect("import");
    let component_at = result.code.find("export const Hello").expect("component");
    assert!(import_at < component_at);
}

#[test]
fn helper_only_module_needs_no_base_import() {
    let src = "export const sum = (xs) => {\n  return xs.reduce((a, b) => a + b, 0);\n};";
    let result = autofix(src);
    assert!(!result.code.contains("react"));
}
