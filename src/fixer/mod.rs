//! Deterministic auto-fixer for generated component source.
//!
//! [`autofix`] mechanically repairs a known class of structural defects in a
//! fixed order: top-level declaration hoisting, synthetic list keys,
//! event-handler name normalization, and a missing base rendering-library
//! import. It never panics; unparsable input is returned unchanged. The
//! transformation is idempotent — a second application yields no fixes.

use std::fmt;

use crate::source::tags::scan_opening_tags;
use crate::source::{SourceModule, TopLevel};

mod keys;

/// Lowercase DOM handler names and their component-runtime spellings.
const HANDLER_RENAMES: &[(&str, &str)] = &[
    ("onclick", "onClick"),
    ("onchange", "onChange"),
    ("onsubmit", "onSubmit"),
    ("oninput", "onInput"),
    ("onblur", "onBlur"),
    ("onfocus", "onFocus"),
    ("onkeydown", "onKeyDown"),
    ("onkeyup", "onKeyUp"),
    ("onkeypress", "onKeyPress"),
    ("onmouseenter", "onMouseEnter"),
    ("onmouseleave", "onMouseLeave"),
    ("onmouseover", "onMouseOver"),
    ("onmouseout", "onMouseOut"),
    ("ondoubleclick", "onDoubleClick"),
    ("onscroll", "onScroll"),
];

/// The import prepended when markup is present without the base library.
const BASE_IMPORT: &str = "import React from 'react';";

/// Description of one mechanical transformation applied by the fixer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixRecord {
    description: String,
}

impl FixRecord {
    fn new(description: String) -> Self {
        Self { description }
    }
}

impl fmt::Display for FixRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

/// Output of one auto-fix pass.
#[derive(Debug, Clone)]
pub struct AutoFixResult {
    /// Repaired source text (identical to the input when nothing applied).
    pub code: String,
    /// Fixes applied, in application order.
    pub fixes: Vec<FixRecord>,
}

/// Mechanically repair structural defects in source text.
///
/// Never panics. On parse failure the input is returned unchanged with an
/// empty fix list. The metadata preamble, if present, is reattached
/// byte-for-byte.
pub fn autofix(source: &str) -> AutoFixResult {
    let Ok(mut module) = SourceModule::parse(source) else {
        return AutoFixResult {
            code: source.to_owned(),
            fixes: Vec::new(),
        };
    };

    let mut fixes = Vec::new();
    hoist_declarations(&mut module, &mut fixes);
    apply_synthetic_keys(&mut module, &mut fixes);
    normalize_handlers(&mut module, &mut fixes);
    ensure_base_import(&mut module, &mut fixes);

    AutoFixResult {
        code: module.print(),
        fixes,
    }
}

// ---------------------------------------------------------------------------
// 1. Declaration hoisting
// ---------------------------------------------------------------------------

/// The dialect forbids bare top-level statements other than imports and
/// exports, so top-level declarations are moved to the top of the first
/// function-like exported definition's body.
fn hoist_declarations(module: &mut SourceModule, fixes: &mut Vec<FixRecord>) {
    if !module.items.iter().any(|item| {
        matches!(item, TopLevel::Export { raw } if find_body_open(raw).is_some())
    }) {
        return;
    }

    let mut hoisted: Vec<(String, Option<String>)> = Vec::new();
    module.items.retain(|item| {
        if let TopLevel::Declaration { raw, name } = item {
            hoisted.push((raw.clone(), name.clone()));
            false
        } else {
            true
        }
    });
    if hoisted.is_empty() {
        return;
    }

    // Positions shifted after removal; find the target export again.
    let Some(export_idx) = module
        .items
        .iter()
        .position(|item| matches!(item, TopLevel::Export { raw } if find_body_open(raw).is_some()))
    else {
        return;
    };

    if let TopLevel::Export { raw } = &mut module.items[export_idx] {
        if let Some(open) = find_body_open(raw) {
            let inserted = hoisted
                .iter()
                .map(|(decl, _)| format!("  {decl}"))
                .collect::<Vec<_>>()
                .join("\n");
            let head = &raw[..=open];
            let tail = &raw[open.saturating_add(1)..];
            *raw = format!("{head}\n{inserted}{tail}");
        }
    }

    for (_, name) in &hoisted {
        let target = name.as_deref().unwrap_or("declaration");
        fixes.push(FixRecord::new(format!(
            "hoisted top-level declaration '{target}' into the exported component body"
        )));
    }
}

/// Byte offset of the `{` opening a function-like export's body, if any.
///
/// Handles arrow definitions with braced bodies and `function` declarations.
/// Exports without a body (e.g. exported object literals, expression-bodied
/// arrows) are not hoist targets.
fn find_body_open(raw: &str) -> Option<usize> {
    if let Some(arrow) = raw.find("=>") {
        let after = arrow.saturating_add(2);
        let ws = raw[after..]
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(0);
        let at = after.saturating_add(ws);
        if raw[at..].starts_with('{') {
            return Some(at);
        }
        return None;
    }
    if let Some(func) = raw.find("function") {
        let params_close = raw[func..].find(')').map(|o| func.saturating_add(o))?;
        return raw[params_close..]
            .find('{')
            .map(|o| params_close.saturating_add(o));
    }
    None
}

// ---------------------------------------------------------------------------
// 2. Synthetic keys
// ---------------------------------------------------------------------------

fn apply_synthetic_keys(module: &mut SourceModule, fixes: &mut Vec<FixRecord>) {
    for item in &mut module.items {
        let (updated, item_fixes) = keys::synthesize_keys(item.raw());
        if !item_fixes.is_empty() {
            item.set_raw(updated);
            fixes.extend(item_fixes);
        }
    }
}

// ---------------------------------------------------------------------------
// 3. Event-handler name normalization
// ---------------------------------------------------------------------------

/// Rewrite all-lowercase handler attributes to their camel-cased runtime
/// names, touching only attribute regions of opening tags.
fn normalize_handlers(module: &mut SourceModule, fixes: &mut Vec<FixRecord>) {
    for item in &mut module.items {
        let text = item.raw();
        let mut replacements: Vec<(usize, usize, &str, &str)> = Vec::new();

        for tag in scan_opening_tags(text) {
            let attrs_start = tag.name_end;
            let region = &text[attrs_start..tag.end];
            for (lower, camel) in HANDLER_RENAMES {
                for at in attr_name_positions(region, lower) {
                    let abs = attrs_start.saturating_add(at);
                    replacements.push((abs, abs.saturating_add(lower.len()), lower, camel));
                }
            }
        }
        if replacements.is_empty() {
            continue;
        }

        replacements.sort_by(|a, b| b.0.cmp(&a.0));
        let mut updated = text.to_owned();
        for (start, end, lower, camel) in &replacements {
            updated.replace_range(*start..*end, camel);
            fixes.push(FixRecord::new(format!(
                "normalized event handler attribute '{lower}' to '{camel}'"
            )));
        }
        item.set_raw(updated);
    }
}

/// Positions of an attribute name within a tag's attribute region, requiring
/// identifier boundaries, a following `=`, and a position outside quoted
/// values and braced expressions.
fn attr_name_positions(region: &str, name: &str) -> Vec<usize> {
    let bytes = region.as_bytes();
    let mut positions = Vec::new();
    let mut from = 0;
    while let Some(found) = region[from..].find(name) {
        let at = from.saturating_add(found);
        from = at.saturating_add(1);
        let before_ok = at == 0
            || bytes
                .get(at.saturating_sub(1))
                .is_some_and(|b| b.is_ascii_whitespace());
        let after = at.saturating_add(name.len());
        let after_ok = bytes.get(after) == Some(&b'=');
        if before_ok && after_ok && at_attribute_position(region, at) {
            positions.push(at);
        }
    }
    positions
}

/// Whether the byte offset sits at attribute-name position: outside quoted
/// values and outside braced expression values.
fn at_attribute_position(region: &str, offset: usize) -> bool {
    let mut quote: Option<char> = None;
    let mut brace_depth: usize = 0;
    for (pos, c) in region.char_indices() {
        if pos == offset {
            return quote.is_none() && brace_depth == 0;
        }
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '\'' | '"' => quote = Some(c),
                '{' => brace_depth = brace_depth.saturating_add(1),
                '}' => brace_depth = brace_depth.saturating_sub(1),
                _ => {}
            },
        }
    }
    false
}

// ---------------------------------------------------------------------------
// 4. Missing base import
// ---------------------------------------------------------------------------

fn ensure_base_import(module: &mut SourceModule, fixes: &mut Vec<FixRecord>) {
    if module.imports_module("react") {
        return;
    }
    let has_markup = module
        .items
        .iter()
        .any(|item| !scan_opening_tags(item.raw()).is_empty());
    if !has_markup {
        return;
    }
    module.items.insert(
        0,
        TopLevel::Import {
            raw: BASE_IMPORT.to_owned(),
            module: Some("react".to_owned()),
        },
    );
    fixes.push(FixRecord::new(
        "added missing base rendering-library import".to_owned(),
    ));
}
