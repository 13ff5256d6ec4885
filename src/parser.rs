use std::iter::Enumerate;
use std::str::Split;

use crate::error::{Error, Result};

/// One classified input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Line<'a> {
    Blank,
    Comment,
    /// `[name]`; the name is taken verbatim and may be empty.
    Header(&'a str),
    /// A line containing `=`, to be split by the section it belongs to.
    KeyValue(&'a str),
}

/// Splits text on `'\n'` and yields each line with its 0-based index, trailing whitespace removed.
#[derive(Debug, Clone)]
pub(crate) struct Lines<'a> {
    inner: Enumerate<Split<'a, char>>,
}

impl<'a> Lines<'a> {
    #[must_use]
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            inner: text.split('\n').enumerate(),
        }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(n, line)| (n, line.trim_end()))
    }
}

pub(crate) fn classify(n: usize, line: &str) -> Result<Line<'_>> {
    if line.is_empty() {
        return Ok(Line::Blank);
    }

    if line.starts_with(['#', ';']) {
        return Ok(Line::Comment);
    }

    // Indentation is reserved for future syntax.
    if line.starts_with(' ') {
        return Err(Error::parse(n, line));
    }

    if let Some(name) = line.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        return Ok(Line::Header(name));
    }

    if line.contains('=') {
        Ok(Line::KeyValue(line))
    } else {
        Err(Error::parse(n, line))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn lines_are_numbered_from_zero_and_right_trimmed() {
        let lines = Lines::new("[a]\r\n  x = 1  \n\n").collect::<Vec<_>>();

        assert_eq!(lines, vec![(0, "[a]"), (1, "  x = 1"), (2, ""), (3, "")]);
    }

    #[rstest]
    #[case("", Line::Blank)]
    #[case("# note", Line::Comment)]
    #[case("; note", Line::Comment)]
    #[case(";no = value", Line::Comment)]
    #[case("[server]", Line::Header("server"))]
    #[case("[]", Line::Header(""))]
    #[case("[a = b]", Line::Header("a = b"))]
    #[case("key = value", Line::KeyValue("key = value"))]
    #[case("\tkey = 1", Line::KeyValue("\tkey = 1"))]
    fn classifies(#[case] line: &str, #[case] expected: Line<'_>) {
        assert_eq!(classify(0, line).expect("line should be accepted"), expected);
    }

    #[rstest]
    #[case("  subkey = 13")]
    #[case(" [section]")]
    #[case("k: 0")]
    #[case("[unterminated")]
    fn rejects(#[case] line: &str) {
        let result = classify(7, line);

        assert!(
            matches!(result, Err(Error::Parse { line: 7, ref text }) if text == line),
            "{result:?}"
        );
    }
}
