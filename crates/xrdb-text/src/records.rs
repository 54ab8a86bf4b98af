//! Resource file record parser.
//!
//! Input is split on `\n`. Each logical line is one of:
//!
//! ```text
//! ! comment                       dropped
//! <blank>                         dropped
//! specifier : value               one record
//! anything else                   dropped silently
//! ```
//!
//! A physical line ending in an unescaped backslash is joined with the
//! following line before it is parsed. Escapes in the value are decoded
//! after the line has been split into specifier and value.

use std::borrow::Cow;
use std::str::Split;
use std::sync::OnceLock;

use regex_lite::{Captures, Regex};

/// One `specifier: value` entry from resource text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub specifier: String,
    pub value: String,
}

fn resource_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*([-_a-zA-Z0-9?.*]+)\s*:(.*)$").expect("resource line regex")
    })
}

fn value_escape_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\\([ \tn\\]|[0-7]{3})").expect("value escape regex"))
}

/// Parse resource text into a lazy sequence of records, in source order.
///
/// The returned iterator borrows `text`. Cloning it gives an independent
/// iterator that restarts from the same position.
pub fn parse_records(text: &str) -> Records<'_> {
    Records {
        lines: text.split('\n'),
    }
}

/// Iterator over the records of a resource text. See [`parse_records`].
#[derive(Debug, Clone)]
pub struct Records<'a> {
    lines: Split<'a, char>,
}

impl<'a> Records<'a> {
    /// Join continued lines starting at `first`.
    ///
    /// Returns the logical line and the length of its first physical
    /// segment (without the continuation backslash).
    fn assemble(&mut self, first: &'a str) -> (Cow<'a, str>, usize) {
        if !is_continued(first) {
            return (Cow::Borrowed(first), first.len());
        }

        let mut line = first[..first.len() - 1].to_string();
        let first_len = line.len();

        while let Some(next) = self.lines.next() {
            line.push_str(next);
            if is_continued(&line) {
                line.pop();
            } else {
                break;
            }
        }

        (Cow::Owned(line), first_len)
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        loop {
            let first = self.lines.next()?;

            if first.is_empty() || is_comment(first) {
                continue;
            }

            let (line, first_len) = self.assemble(first);
            match parse_line(&line, first_len) {
                Some(record) => return Some(record),
                None => {
                    tracing::trace!(line = %line, "dropping malformed resource line");
                }
            }
        }
    }
}

fn is_comment(line: &str) -> bool {
    line.trim_start_matches(is_blank).starts_with('!')
}

/// Whitespace as the record grammar sees it. Only ASCII blanks are
/// trimmed around values; other Unicode spaces are value text.
fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}

/// A line continues when it ends in an odd run of backslashes; an even
/// run is a sequence of escaped backslashes.
fn is_continued(line: &str) -> bool {
    let run = line.bytes().rev().take_while(|&b| b == b'\\').count();
    run % 2 == 1
}

fn parse_line(line: &str, first_len: usize) -> Option<Record> {
    let caps = resource_line_re().captures(line)?;
    let specifier = caps.get(1)?.as_str();
    let raw = caps.get(2)?;

    // Whitespace after the colon is skipped only on the first physical line
    let mut start = raw.start();
    while start < first_len {
        match line[start..].chars().next() {
            Some(c) if is_blank(c) => start += 1,
            _ => break,
        }
    }

    let value = line[start..raw.end()].trim_end_matches(is_blank);

    Some(Record {
        specifier: specifier.to_string(),
        value: decode_value(value),
    })
}

/// Decode the escape sequences of a resource value.
///
/// `\n` becomes a newline, `\ooo` (three octal digits) the character with
/// that code, and `\<space>`, `\<tab>`, `\\` the character after the
/// backslash. Any other backslash is kept as is.
pub fn decode_value(value: &str) -> String {
    if !value.contains('\\') {
        return value.to_string();
    }

    value_escape_re()
        .replace_all(value, |caps: &Captures<'_>| {
            let escape = &caps[1];
            if escape == "n" {
                return "\n".to_string();
            }
            if escape.len() == 3 {
                return u32::from_str_radix(escape, 8)
                    .ok()
                    .and_then(char::from_u32)
                    .map(String::from)
                    .unwrap_or_else(|| caps[0].to_string());
            }
            escape.to_string()
        })
        .into_owned()
}

/// Escape a value so that writing `specifier: <encoded>` and parsing it
/// back yields the original value.
pub fn encode_value(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let leading = chars.iter().take_while(|&&c| is_blank(c)).count();
    let trailing = chars.iter().rev().take_while(|&&c| is_blank(c)).count();
    let trailing_from = chars.len() - trailing.min(chars.len() - leading);

    let mut out = String::with_capacity(value.len());
    for (i, &c) in chars.iter().enumerate() {
        let at_edge = i < leading || i >= trailing_from;
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c if at_edge && is_blank(c) => {
                out.push_str(&format!("\\{:03o}", c as u32));
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(text: &str) -> Vec<(String, String)> {
        parse_records(text)
            .map(|r| (r.specifier, r.value))
            .collect()
    }

    fn pair(spec: &str, value: &str) -> (String, String) {
        (spec.to_string(), value.to_string())
    }

    #[test]
    fn test_simple_records() {
        let parsed = records("foo.bar*gazonk: yep\nxterm*background:   black  \n");
        assert_eq!(
            parsed,
            vec![pair("foo.bar*gazonk", "yep"), pair("xterm*background", "black")]
        );
    }

    #[test]
    fn test_comments_and_blank_lines_dropped() {
        let parsed = records("! comment\n   ! indented comment\n\nfoo: 1\n");
        assert_eq!(parsed, vec![pair("foo", "1")]);
    }

    #[test]
    fn test_comment_ending_in_backslash_does_not_continue() {
        assert_eq!(records("! note \\\nfoo: 1"), vec![pair("foo", "1")]);
        assert_eq!(
            records("a: x\n! trailing \\\nb: y\n"),
            vec![pair("a", "x"), pair("b", "y")]
        );
    }

    #[test]
    fn test_unicode_space_is_value_text() {
        let parsed = records("a: \u{3000}wide\u{3000}\nb:\u{a0}nbsp");
        assert_eq!(parsed, vec![pair("a", "\u{3000}wide\u{3000}"), pair("b", "\u{a0}nbsp")]);
    }

    #[test]
    fn test_malformed_lines_dropped() {
        let parsed = records("no colon here\nbad/spec: x\n   \nok: y");
        assert_eq!(parsed, vec![pair("ok", "y")]);
    }

    #[test]
    fn test_whitespace_around_specifier_and_colon() {
        let parsed = records("  app.title   :   Hello World\t");
        assert_eq!(parsed, vec![pair("app.title", "Hello World")]);
    }

    #[test]
    fn test_empty_value() {
        assert_eq!(records("app.title:"), vec![pair("app.title", "")]);
    }

    #[test]
    fn test_continuation_joins_without_separator() {
        assert_eq!(records("foo: line1\\\nline2"), vec![pair("foo", "line1line2")]);
    }

    #[test]
    fn test_continuation_preserves_leading_whitespace() {
        let parsed = records("app*background:\\\n    blue");
        assert_eq!(parsed, vec![pair("app*background", "    blue")]);
    }

    #[test]
    fn test_multiple_continuations() {
        let parsed = records("a: 1\\\n2\\\n3\nb: 4");
        assert_eq!(parsed, vec![pair("a", "123"), pair("b", "4")]);
    }

    #[test]
    fn test_continuation_at_end_of_input() {
        assert_eq!(records("a: x\\"), vec![pair("a", "x")]);
    }

    #[test]
    fn test_escaped_backslash_does_not_continue() {
        let parsed = records("a: x\\\\\nb: y");
        assert_eq!(parsed, vec![pair("a", "x\\"), pair("b", "y")]);
    }

    #[test]
    fn test_octal_escape() {
        assert_eq!(records("foo: a\\040b"), vec![pair("foo", "a b")]);
    }

    #[test]
    fn test_decode_escapes() {
        assert_eq!(decode_value("a\\nb"), "a\nb");
        assert_eq!(decode_value("a\\\\b"), "a\\b");
        assert_eq!(decode_value("\\ lead"), " lead");
        assert_eq!(decode_value("tab\\\there"), "tab\there");
        assert_eq!(decode_value("\\101\\102"), "AB");
        // Unknown escapes and short octal runs are left alone
        assert_eq!(decode_value("\\x\\12"), "\\x\\12");
    }

    #[test]
    fn test_records_in_source_order() {
        let parsed = records("a: 1\nb: 2\na: 3");
        assert_eq!(parsed, vec![pair("a", "1"), pair("b", "2"), pair("a", "3")]);
    }

    #[test]
    fn test_records_restartable() {
        let mut iter = parse_records("a: 1\nb: 2\nc: 3");
        assert_eq!(iter.next().unwrap().specifier, "a");

        let restarted: Vec<String> = iter.clone().map(|r| r.specifier).collect();
        let rest: Vec<String> = iter.map(|r| r.specifier).collect();
        assert_eq!(restarted, vec!["b", "c"]);
        assert_eq!(rest, restarted);
    }

    #[test]
    fn test_encode_round_trip() {
        let values = [
            "plain",
            "  leading",
            "trailing \t",
            "multi\nline",
            "back\\slash",
            " ",
            "",
            "\u{3000}ideographic",
            "no-break\u{a0}",
            "cr\r",
        ];
        for value in values {
            let text = format!("key: {}", encode_value(value));
            let parsed = records(&text);
            assert_eq!(parsed, vec![pair("key", value)], "encoded as {:?}", text);
        }
    }
}
