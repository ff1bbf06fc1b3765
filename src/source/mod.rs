//! Structural model of one generated component artifact.
//!
//! An artifact is an optional metadata preamble followed by top-level items:
//! imports, declarations, exported definitions, and trailing statements
//! (typically a render expression). The preamble is never parsed as code —
//! it is sliced off before scanning and reattached byte-for-byte when the
//! source is printed back out.

use thiserror::Error;

pub mod scanner;
pub mod tags;

use scanner::ScanError;

/// Delimiter line that opens and closes the metadata preamble.
pub const PREAMBLE_DELIMITER: &str = "---";

/// Errors from building the module tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The source body could not be scanned into statements.
    #[error("source could not be parsed: {0}")]
    Scan(#[from] ScanError),
}

/// One top-level item of an artifact body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopLevel {
    /// An import statement.
    Import {
        /// Full statement text.
        raw: String,
        /// Imported module path, when one could be extracted.
        module: Option<String>,
    },
    /// A bare top-level `const`/`let`/`var` declaration.
    Declaration {
        /// Full statement text.
        raw: String,
        /// Declared binding name, when a simple identifier.
        name: Option<String>,
    },
    /// An exported definition.
    Export {
        /// Full statement text.
        raw: String,
    },
    /// Any other top-level statement (e.g. the trailing render expression).
    Statement {
        /// Full statement text.
        raw: String,
    },
}

impl TopLevel {
    /// The raw statement text.
    pub fn raw(&self) -> &str {
        match self {
            Self::Import { raw, .. }
            | Self::Declaration { raw, .. }
            | Self::Export { raw }
            | Self::Statement { raw } => raw,
        }
    }

    /// Replace the raw statement text, preserving the item kind.
    ///
    /// Import/declaration metadata is re-derived from the new text.
    pub fn set_raw(&mut self, new_raw: String) {
        *self = match self {
            Self::Import { .. } => classify(new_raw),
            Self::Declaration { .. } => classify(new_raw),
            Self::Export { .. } => Self::Export { raw: new_raw },
            Self::Statement { .. } => Self::Statement { raw: new_raw },
        };
    }
}

/// Parsed artifact: opaque preamble plus top-level items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceModule {
    /// Verbatim preamble text including both delimiter lines, if present.
    pub preamble: Option<String>,
    /// Top-level items in source order.
    pub items: Vec<TopLevel>,
}

impl SourceModule {
    /// Parse a full artifact into a module tree.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] when the body (after preamble removal) cannot
    /// be scanned into statements.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let (preamble, body) = split_preamble(source);
        let statements = scanner::split_statements(body)?;
        let items = statements.into_iter().map(classify).collect();
        Ok(Self {
            preamble: preamble.map(str::to_owned),
            items,
        })
    }

    /// Print the module back to source text, reattaching the preamble
    /// verbatim.
    pub fn print(&self) -> String {
        let body = self
            .items
            .iter()
            .map(TopLevel::raw)
            .collect::<Vec<_>>()
            .join("\n\n");
        match &self.preamble {
            Some(preamble) => format!("{preamble}{body}\n"),
            None => format!("{body}\n"),
        }
    }

    /// The code body with the preamble excluded, as one string.
    pub fn body(&self) -> String {
        self.items
            .iter()
            .map(TopLevel::raw)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether any import of the given module path is present.
    pub fn imports_module(&self, module: &str) -> bool {
        self.items.iter().any(|item| {
            matches!(item, TopLevel::Import { module: Some(m), .. } if m == module)
        })
    }
}

/// Split an artifact into its optional preamble and its code body.
///
/// The preamble is a `---` fenced block at the very start of the text. The
/// returned preamble slice includes both delimiter lines and the trailing
/// newline, so reattachment is byte-exact.
pub fn split_preamble(source: &str) -> (Option<&str>, &str) {
    let rest = match source.strip_prefix(PREAMBLE_DELIMITER) {
        Some(rest) if rest.starts_with('\n') || rest.starts_with("\r\n") => rest,
        _ => return (None, source),
    };

    let mut offset = PREAMBLE_DELIMITER.len();
    for line in rest.split_inclusive('\n') {
        offset = offset.saturating_add(line.len());
        if line.trim_end_matches(['\r', '\n']) == PREAMBLE_DELIMITER {
            return (Some(&source[..offset]), &source[offset..]);
        }
    }
    // No closing delimiter: treat the whole text as code.
    (None, source)
}

/// Classify one top-level statement.
fn classify(raw: String) -> TopLevel {
    if starts_with_keyword(&raw, "import") && !is_dynamic_import(&raw) {
        let module = import_module(&raw);
        return TopLevel::Import { raw, module };
    }
    if starts_with_keyword(&raw, "export") {
        return TopLevel::Export { raw };
    }
    for kw in ["const", "let", "var"] {
        if starts_with_keyword(&raw, kw) {
            let name = declaration_name(&raw, kw);
            return TopLevel::Declaration { raw, name };
        }
    }
    TopLevel::Statement { raw }
}

/// Whether the statement starts with the keyword followed by a non-identifier
/// character.
fn starts_with_keyword(raw: &str, keyword: &str) -> bool {
    match raw.strip_prefix(keyword) {
        Some(rest) => rest
            .chars()
            .next()
            .is_none_or(|c| !(c.is_ascii_alphanumeric() || c == '_' || c == '$')),
        None => false,
    }
}

/// `import(` is an expression, not an import statement.
fn is_dynamic_import(raw: &str) -> bool {
    raw.strip_prefix("import")
        .map(str::trim_start)
        .is_some_and(|rest| rest.starts_with('('))
}

/// Extract the module path from an import statement (first quoted string).
fn import_module(raw: &str) -> Option<String> {
    let quote_at = raw.find(['\'', '"'])?;
    let quote = raw[quote_at..].chars().next()?;
    let after = &raw[quote_at.saturating_add(1)..];
    let close = after.find(quote)?;
    Some(after[..close].to_owned())
}

/// Extract a simple identifier binding name from a declaration.
fn declaration_name(raw: &str, keyword: &str) -> Option<String> {
    let rest = raw.strip_prefix(keyword)?.trim_start();
    let name: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '$')
        .collect();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
