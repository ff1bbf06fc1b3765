//! Accessibility heuristics.
//!
//! Heuristic checks over markup opening tags. Everything here is a warning;
//! accessibility findings never block acceptance.

use crate::source::tags::{scan_opening_tags, OpeningTag};

use super::{Finding, FindingCategory, Severity};

const CLICK_HANDLERS: &[&str] = &["onClick", "onclick"];
const KEYBOARD_HANDLERS: &[&str] = &[
    "onKeyDown",
    "onKeyUp",
    "onKeyPress",
    "onkeydown",
    "onkeyup",
    "onkeypress",
];
const FORM_CONTROLS: &[&str] = &["input", "select", "textarea"];

/// Run all accessibility heuristics over a code body.
pub fn check(code: &str) -> Vec<Finding> {
    let mut findings = Vec::new();
    for tag in scan_opening_tags(code) {
        if let Some(finding) = check_tag(&tag) {
            findings.push(finding);
        }
    }
    findings
}

fn check_tag(tag: &OpeningTag) -> Option<Finding> {
    match tag.name.as_str() {
        "div" | "span" => check_clickable_container(tag),
        "img" => check_image(tag),
        "video" | "audio" => check_media(tag),
        name if FORM_CONTROLS.contains(&name) => check_form_control(tag),
        _ => None,
    }
}

/// A generic container with a click handler needs a keyboard path and a role
/// to be reachable without a pointer.
fn check_clickable_container(tag: &OpeningTag) -> Option<Finding> {
    let clickable = CLICK_HANDLERS.iter().any(|h| tag.has_attr(h));
    if !clickable {
        return None;
    }
    let keyboard = KEYBOARD_HANDLERS.iter().any(|h| tag.has_attr(h));
    if keyboard || tag.has_attr("role") {
        return None;
    }
    Some(warning(format!(
        "<{}> has a click handler but no keyboard handler or role",
        tag.name
    )))
}

fn check_image(tag: &OpeningTag) -> Option<Finding> {
    if tag.has_attr("alt") {
        return None;
    }
    Some(warning("<img> element is missing alternative text".to_owned()))
}

fn check_media(tag: &OpeningTag) -> Option<Finding> {
    if tag.has_attr("aria-label") || tag.has_attr("title") {
        return None;
    }
    Some(warning(format!(
        "<{}> element has no accessible description",
        tag.name
    )))
}

/// Form controls need an accessible name: an aria label, or an id a `<label
/// htmlFor>` can point at. Hidden inputs are exempt.
fn check_form_control(tag: &OpeningTag) -> Option<Finding> {
    if tag.attr_equals("type", "hidden") {
        return None;
    }
    if tag.has_attr("aria-label") || tag.has_attr("aria-labelledby") || tag.has_attr("id") {
        return None;
    }
    Some(warning(format!(
        "form control <{}> has no associated label or accessible name",
        tag.name
    )))
}

fn warning(message: String) -> Finding {
    Finding {
        severity: Severity::Warning,
        category: FindingCategory::Accessibility,
        message,
    }
}
