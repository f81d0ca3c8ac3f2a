//! Ordered output line stream.
//!
//! Generation appends lines in exactly the order they must appear; callers
//! consume the finished stream. Nested regions (exception guards, branch
//! bodies, scoped temporaries) are built as their own [`CodeLines`] and
//! spliced in with one more level of indentation.

/// An ordered sequence of generated lines.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeLines {
    lines: Vec<String>,
}

impl CodeLines {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Push `line` if present (registry statements may be absent).
    #[inline]
    pub fn push_opt(&mut self, line: Option<String>) {
        if let Some(line) = line {
            self.lines.push(line);
        }
    }

    #[inline]
    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    /// Append `other`, prefixing each non-empty line with `indent`.
    pub fn extend_indented(&mut self, other: CodeLines, indent: &str) {
        self.lines.extend(other.lines.into_iter().map(|line| {
            if line.is_empty() {
                line
            } else {
                format!("{indent}{line}")
            }
        }));
    }

    pub fn extend(&mut self, other: CodeLines) {
        self.lines.extend(other.lines);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.lines.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.lines
    }

    pub fn into_vec(self) -> Vec<String> {
        self.lines
    }

    /// The lines joined with newlines (no trailing newline).
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }
}

impl IntoIterator for CodeLines {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.into_iter()
    }
}

impl<'a> IntoIterator for &'a CodeLines {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn nested_regions_are_indented() {
        let mut inner = CodeLines::new();
        inner.push("a = b;");
        inner.blank();
        inner.push("goto block1;");

        let mut out = CodeLines::new();
        out.push("if (x) {");
        out.extend_indented(inner, "\t");
        out.push("}");

        assert_eq!(
            out.into_vec(),
            vec!["if (x) {", "\ta = b;", "", "\tgoto block1;", "}"]
        );
    }

    #[test]
    fn push_opt_skips_absent_lines() {
        let mut out = CodeLines::new();
        out.push_opt(None);
        out.push_opt(Some("Py_INCREF(x);".to_owned()));
        assert_eq!(out.len(), 1);
        assert_eq!(out.to_text(), "Py_INCREF(x);");
    }
}
