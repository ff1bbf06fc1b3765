//! Synthetic keys for repeated markup.
//!
//! For every list-iteration callback that returns exactly one markup element
//! without a `key` attribute, synthesize one from a literal prefix plus the
//! iteration index parameter. Uniqueness holds within a single render of
//! that list only; repeated renders over the same index range can collide.
//! That limitation is deliberate: stable per-item identifiers are not
//! guaranteed to exist in the data.

use crate::source::tags::{parse_opening_tag_at, OpeningTag};

use super::FixRecord;

/// One pending text edit: replace `start..end` with `text`.
struct Edit {
    start: usize,
    end: usize,
    text: String,
}

/// Result of analyzing one `.map(` occurrence.
struct MapSite {
    /// Edit that introduces an index parameter, when the callback has none.
    param_edit: Option<Edit>,
    /// Name of the index parameter to reference.
    index_name: String,
    /// The element returned by the callback.
    tag: OpeningTag,
}

/// Add synthetic `key` attributes to keyless single-element map callbacks.
pub(super) fn synthesize_keys(text: &str) -> (String, Vec<FixRecord>) {
    let mut edits: Vec<Edit> = Vec::new();
    let mut fixes: Vec<FixRecord> = Vec::new();
    let mut from: usize = 0;

    while let Some(found) = text[from..].find(".map(") {
        let map_at = from.saturating_add(found);
        from = map_at.saturating_add(".map(".len());

        let Some(site) = analyze_map_site(text, from) else {
            continue;
        };
        if site.tag.has_attr("key") {
            continue;
        }

        let prefix = site
            .tag
            .name
            .rsplit('.')
            .next()
            .unwrap_or(site.tag.name.as_str())
            .to_ascii_lowercase();
        let index = &site.index_name;
        edits.push(Edit {
            start: site.tag.name_end,
            end: site.tag.name_end,
            text: format!(" key={{`{prefix}-${{{index}}}`}}"),
        });
        if let Some(edit) = site.param_edit {
            edits.push(edit);
        }
        fixes.push(FixRecord::new(format!(
            "added synthetic key to <{}> elements rendered by a list iteration",
            site.tag.name
        )));
    }

    (apply_edits(text, edits), fixes)
}

/// Inspect the callback that starts right after `.map(`.
///
/// Accepts only expression-bodied arrows whose expression is a markup
/// element, optionally parenthesized — the "returns exactly one element"
/// shape. Anything else is left untouched.
fn analyze_map_site(text: &str, after_paren: usize) -> Option<MapSite> {
    let bytes = text.as_bytes();
    let mut i = skip_ws(text, after_paren);

    // Callback parameters.
    let params_start = i;
    let (first_param, second_param, params_end, parenthesized) = if bytes.get(i) == Some(&b'(') {
        let close = find_matching_paren(text, i)?;
        let inner = &text[i.saturating_add(1)..close];
        let mut parts = split_top_level_commas(inner);
        let first = parts.next().unwrap_or_default().trim().to_owned();
        let second = parts
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);
        (first, second, close.saturating_add(1), true)
    } else {
        let end = ident_end(text, i);
        if end == i {
            return None;
        }
        (text[i..end].to_owned(), None, end, false)
    };
    if first_param.is_empty() {
        return None;
    }

    // Arrow and body.
    i = skip_ws(text, params_end);
    if !text[i..].starts_with("=>") {
        return None;
    }
    i = skip_ws(text, i.saturating_add(2));
    if bytes.get(i) == Some(&b'(') {
        i = skip_ws(text, i.saturating_add(1));
    }
    if bytes.get(i) != Some(&b'<') {
        return None;
    }
    let tag = parse_opening_tag_at(text, i)?;

    // Index parameter: reuse the second parameter, or introduce one.
    let (index_name, param_edit) = match second_param {
        Some(name) if is_identifier(&name) => (name, None),
        Some(_) => return None,
        None => {
            let name = if first_param == "index" { "i" } else { "index" };
            let edit = if parenthesized {
                // `(item)` -> `(item, index)`
                Edit {
                    start: params_end.saturating_sub(1),
                    end: params_end.saturating_sub(1),
                    text: format!(", {name}"),
                }
            } else {
                // `item` -> `(item, index)`
                Edit {
                    start: params_start,
                    end: params_end,
                    text: format!("({first_param}, {name})"),
                }
            };
            (name.to_owned(), Some(edit))
        }
    };

    Some(MapSite {
        param_edit,
        index_name,
        tag,
    })
}

fn apply_edits(text: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by(|a, b| b.start.cmp(&a.start));
    let mut out = text.to_owned();
    for edit in edits {
        out.replace_range(edit.start..edit.end, &edit.text);
    }
    out
}

fn skip_ws(text: &str, mut i: usize) -> usize {
    while text[i..].starts_with([' ', '\t', '\n', '\r']) {
        i = i.saturating_add(1);
    }
    i
}

fn ident_end(text: &str, i: usize) -> usize {
    let tail = &text[i..];
    let len = tail
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '$'))
        .unwrap_or(tail.len());
    i.saturating_add(len)
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        && !s.starts_with(|c: char| c.is_ascii_digit())
}

fn find_matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth: usize = 0;
    for (offset, c) in text[open..].char_indices() {
        match c {
            '(' => depth = depth.saturating_add(1),
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(open.saturating_add(offset));
                }
            }
            _ => {}
        }
    }
    None
}

/// Split on commas outside of nesting (for parameter lists).
fn split_top_level_commas(s: &str) -> impl Iterator<Item = &str> {
    let mut depth: usize = 0;
    let mut start: usize = 0;
    let mut parts: Vec<&str> = Vec::new();
    for (i, c) in s.char_indices() {
        match c {
            '(' | '[' | '{' => depth = depth.saturating_add(1),
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i.saturating_add(1);
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts.into_iter()
}
