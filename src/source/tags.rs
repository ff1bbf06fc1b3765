//! Opening-tag scanner for markup embedded in component source.
//!
//! Finds element opening tags (`<div className="x">`, `<Row item={r} />`)
//! well enough for attribute-level checks. Closing tags and comparison
//! operators are skipped; attribute values may be quoted strings or braced
//! expressions.

/// One markup opening tag found in source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpeningTag {
    /// Element name as written (`div`, `Row`, `Card.Header`).
    pub name: String,
    /// Raw attribute text between the name and the closing `>`.
    pub attrs: String,
    /// Byte offset of the leading `<`.
    pub start: usize,
    /// Byte offset just past the closing `>`.
    pub end: usize,
    /// Byte offset just past the element name (where an attribute could be
    /// inserted).
    pub name_end: usize,
    /// Whether the tag is self-closing (`/>`).
    pub self_closing: bool,
}

impl OpeningTag {
    /// Whether the tag carries the given attribute, either bare
    /// (`disabled`) or with a value (`alt="…"`). Matching is exact on the
    /// attribute name.
    pub fn has_attr(&self, attr: &str) -> bool {
        let bytes = self.attrs.as_bytes();
        let mut from = 0;
        while let Some(found) = self.attrs[from..].find(attr) {
            let at = from.saturating_add(found);
            let before_ok = at == 0
                || bytes
                    .get(at.saturating_sub(1))
                    .is_some_and(|b| b.is_ascii_whitespace());
            let after = at.saturating_add(attr.len());
            let after_ok = match bytes.get(after) {
                None => true,
                Some(b'=') => true,
                Some(b) => b.is_ascii_whitespace() || *b == b'/',
            };
            if before_ok && after_ok {
                return true;
            }
            from = at.saturating_add(1);
        }
        false
    }

    /// Whether the tag has an attribute whose value is exactly the given
    /// string, written quoted (`type="hidden"`) or as a braced string
    /// expression (`type={'hidden'}`). Whitespace around `=` is allowed.
    pub fn attr_equals(&self, attr: &str, value: &str) -> bool {
        let bytes = self.attrs.as_bytes();
        let mut from = 0;
        while let Some(found) = self.attrs[from..].find(attr) {
            let at = from.saturating_add(found);
            from = at.saturating_add(1);
            let before_ok = at == 0
                || bytes
                    .get(at.saturating_sub(1))
                    .is_some_and(|b| b.is_ascii_whitespace());
            if !before_ok {
                continue;
            }
            let mut i = skip_spaces(bytes, at.saturating_add(attr.len()));
            if bytes.get(i) != Some(&b'=') {
                continue;
            }
            i = skip_spaces(bytes, i.saturating_add(1));
            if bytes.get(i) == Some(&b'{') {
                i = skip_spaces(bytes, i.saturating_add(1));
            }
            let quote = match bytes.get(i) {
                Some(q @ (b'\'' | b'"')) => *q,
                _ => continue,
            };
            let value_start = i.saturating_add(1);
            let value_end = value_start.saturating_add(value.len());
            if self.attrs.get(value_start..value_end) == Some(value)
                && bytes.get(value_end) == Some(&quote)
            {
                return true;
            }
        }
        false
    }
}

/// Scan source text for markup opening tags.
pub fn scan_opening_tags(text: &str) -> Vec<OpeningTag> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut tags = Vec::new();
    let mut i: usize = 0;

    while i < chars.len() {
        let (pos, c) = chars[i];
        if c == '<' && looks_like_tag_start(&chars, i) {
            if let Some(tag) = parse_opening_tag(text, &chars, i, pos) {
                i = index_at_or_after(&chars, tag.end);
                tags.push(tag);
                continue;
            }
        }
        i = i.saturating_add(1);
    }
    tags
}

/// Parse the opening tag starting at the given byte offset, if one is there.
pub fn parse_opening_tag_at(text: &str, offset: usize) -> Option<OpeningTag> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let i = chars.iter().position(|(pos, _)| *pos == offset)?;
    let (pos, c) = chars[i];
    if c != '<' || !looks_like_tag_start(&chars, i) {
        return None;
    }
    parse_opening_tag(text, &chars, i, pos)
}

/// Heuristic filter: `<` starts a tag when followed by a letter and not
/// preceded by an identifier character (which would be a comparison such as
/// `i<n`).
fn looks_like_tag_start(chars: &[(usize, char)], i: usize) -> bool {
    let next_alpha = chars
        .get(i.saturating_add(1))
        .is_some_and(|(_, c)| c.is_ascii_alphabetic());
    if !next_alpha {
        return false;
    }
    if i == 0 {
        return true;
    }
    !chars
        .get(i.saturating_sub(1))
        .is_some_and(|(_, c)| c.is_ascii_alphanumeric() || *c == '_' || *c == '$')
}

fn parse_opening_tag(
    text: &str,
    chars: &[(usize, char)],
    open_idx: usize,
    open_pos: usize,
) -> Option<OpeningTag> {
    // Element name: letters, digits, dots (member components).
    let mut i = open_idx.saturating_add(1);
    while chars
        .get(i)
        .is_some_and(|(_, c)| c.is_ascii_alphanumeric() || *c == '.' || *c == '_')
    {
        i = i.saturating_add(1);
    }
    let name_end = byte_at(chars, i, text);
    let name = text[open_pos.saturating_add(1)..name_end].to_owned();
    if name.is_empty() {
        return None;
    }

    // Attribute region: scan to the closing `>` honoring quotes and braces.
    let attrs_start = name_end;
    let mut brace_depth: usize = 0;
    while let Some((pos, c)) = chars.get(i) {
        match *c {
            '{' => brace_depth = brace_depth.saturating_add(1),
            '}' => brace_depth = brace_depth.saturating_sub(1),
            '\'' | '"' => {
                i = skip_quoted(chars, i, *c)?;
                continue;
            }
            '>' if brace_depth == 0 => {
                let self_closing = chars
                    .get(i.saturating_sub(1))
                    .is_some_and(|(_, prev)| *prev == '/');
                let attrs_end = if self_closing {
                    pos.saturating_sub(1)
                } else {
                    *pos
                };
                return Some(OpeningTag {
                    name,
                    attrs: text[attrs_start..attrs_end].trim().to_owned(),
                    start: open_pos,
                    end: pos.saturating_add(1),
                    name_end,
                    self_closing,
                });
            }
            _ => {}
        }
        i = i.saturating_add(1);
    }
    None
}

fn skip_spaces(bytes: &[u8], mut i: usize) -> usize {
    while bytes.get(i).is_some_and(|b| b.is_ascii_whitespace()) {
        i = i.saturating_add(1);
    }
    i
}

fn skip_quoted(chars: &[(usize, char)], mut i: usize, quote: char) -> Option<usize> {
    i = i.saturating_add(1);
    while let Some((_, c)) = chars.get(i) {
        if *c == quote {
            return Some(i.saturating_add(1));
        }
        i = i.saturating_add(1);
    }
    None
}

fn byte_at(chars: &[(usize, char)], i: usize, text: &str) -> usize {
    chars.get(i).map(|(pos, _)| *pos).unwrap_or(text.len())
}

fn index_at_or_after(chars: &[(usize, char)], byte: usize) -> usize {
    chars
        .iter()
        .position(|(pos, _)| *pos >= byte)
        .unwrap_or(chars.len())
}
