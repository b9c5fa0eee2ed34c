use once_cell::sync::Lazy;
use regex::Regex;

#[allow(clippy::expect_used)]
static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex should be valid"));

/// Identifier for a rule or endpoint stub: the name with all whitespace removed.
///
/// `"Create Order"` becomes `"CreateOrder"`.
pub fn strip_whitespace(name: &str) -> String {
    WHITESPACE.replace_all(name, "").into_owned()
}

/// Like [`strip_whitespace`], falling back to `fallback` when nothing is left.
pub fn identifier_or(name: &str, fallback: &str) -> String {
    let ident = strip_whitespace(name);
    if ident.is_empty() {
        fallback.to_string()
    } else {
        ident
    }
}

/// Uppercase the first character, leaving the rest untouched.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Lowercase the first character, leaving the rest untouched.
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// One path segment built from free text: `/` and `\` become `_`, and a
/// dots-only name is replaced so it cannot refer to a parent directory.
pub fn path_segment(name: &str) -> String {
    let segment: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    if !segment.is_empty() && segment.chars().all(|c| c == '.') {
        "_".repeat(segment.len())
    } else {
        segment
    }
}

/// File stem for a node label; generated file names are the lowercased label
/// plus a per-artifact suffix.
pub fn file_stem(label: &str) -> String {
    path_segment(&label.to_lowercase())
}

/// Package/module slug: lowercase ASCII alphanumerics joined by `-`.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// `PascalCase` from any slug-ish name (`arachnet-api` → `ArachnetApi`).
pub fn to_pascal_case(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(capitalize_first)
        .collect()
}

/// Double-quoted string literal, valid in every emitted language.
pub fn string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Collapse free text onto one line so it can sit behind a line comment.
pub fn comment_text(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Indentation-aware line accumulator shared by the dialects.
#[derive(Debug)]
pub struct SourceBuilder {
    buf: String,
    indent: &'static str,
}

impl SourceBuilder {
    pub fn new(indent: &'static str) -> Self {
        SourceBuilder {
            buf: String::new(),
            indent,
        }
    }

    /// Append one line at `depth` levels of indentation.
    pub fn line(&mut self, depth: usize, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..depth {
                self.buf.push_str(self.indent);
            }
            self.buf.push_str(text);
        }
        self.buf.push('\n');
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    pub fn finish(self) -> String {
        self.buf
    }
}
