//! Typed tokens over raw layout text.
//!
//! The parser never matches patterns itself: it asks this module for the
//! dates, title references, row starts and note blocks in a piece of text
//! and branches on how many it got back.

use regex::Regex;
use std::sync::LazyLock;

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2}\.\d{2}\.\d{4}").expect("valid regex"));

static TITLE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]+\d+").expect("valid regex"));

static ROW_START_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\n)\d+\s+(\d{2}\.\d{2}\.\d{4})").expect("valid regex")
});

// A NOTE: line plus the line after it.
static NOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"NOTE:.*\n?.*").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `dd.dd.dddd`
    Date,
    /// Uppercase letters followed by digits, e.g. `EGL557357`.
    TitleId,
    /// Row number, whitespace and the row's registration date.
    RowStart,
    /// `NOTE:` line and its following line.
    NoteMarker,
}

impl TokenKind {
    fn regex(self) -> &'static Regex {
        match self {
            TokenKind::Date => &*DATE_RE,
            TokenKind::TitleId => &*TITLE_ID_RE,
            TokenKind::RowStart => &*ROW_START_RE,
            TokenKind::NoteMarker => &*NOTE_RE,
        }
    }
}

/// A pattern match with its byte span in the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
    pub text: &'a str,
}

impl Token<'_> {
    /// Character column of the token within `line`, which must be the text
    /// the token was scanned from.
    pub fn column(&self, line: &str) -> usize {
        line[..self.start].chars().count()
    }
}

/// The beginning of a new table row. `token` spans the whole boundary
/// (leading newline, row number, whitespace and date); `date` is the
/// captured registration date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowStart<'a> {
    pub token: Token<'a>,
    pub date: Token<'a>,
}

/// Every non-overlapping match of `kind` in `text`, in order.
pub fn scan(text: &str, kind: TokenKind) -> Vec<Token<'_>> {
    kind.regex()
        .find_iter(text)
        .map(|m| Token {
            kind,
            start: m.start(),
            end: m.end(),
            text: m.as_str(),
        })
        .collect()
}

/// Row-start boundaries in a table body, in order.
pub fn row_starts(body: &str) -> Vec<RowStart<'_>> {
    ROW_START_RE
        .captures_iter(body)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let date = caps.get(1)?;
            Some(RowStart {
                token: Token {
                    kind: TokenKind::RowStart,
                    start: whole.start(),
                    end: whole.end(),
                    text: whole.as_str(),
                },
                date: Token {
                    kind: TokenKind::Date,
                    start: date.start(),
                    end: date.end(),
                    text: date.as_str(),
                },
            })
        })
        .collect()
}

/// Remove every note block from `text`, returning the remaining text and the
/// notes in the order found.
pub fn strip_notes(text: &str) -> (String, Vec<String>) {
    let notes: Vec<String> = scan(text, TokenKind::NoteMarker)
        .iter()
        .map(|t| t.text.trim_end().to_string())
        .collect();
    if notes.is_empty() {
        return (text.to_string(), notes);
    }
    let body = NOTE_RE.replace_all(text, "").into_owned();
    (body, notes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_dates() {
        let line = "     28.01.2009      Endeavour House, 47         06.06.2008        EGL557357";
        let dates = scan(line, TokenKind::Date);
        assert_eq!(dates.len(), 2);
        assert_eq!(dates[0].text, "28.01.2009");
        assert_eq!(dates[0].column(line), 5);
        assert_eq!(dates[1].text, "06.06.2008");
    }

    #[test]
    fn test_scan_title_ids() {
        let ids = scan("28.01.2009  Flat 2, Quay House  01.01.2009  TGL24029", TokenKind::TitleId);
        assert_eq!(ids.len(), 1);
        assert_eq!(ids[0].text, "TGL24029");

        let ids = scan("Unit B12 and Unit C14", TokenKind::TitleId);
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_short_dates_are_not_dates() {
        assert!(scan("125 years from 1.1.2009", TokenKind::Date).is_empty());
    }

    #[test]
    fn test_row_starts() {
        let body = "\n1    28.01.2009   Flat 1\n     more\n12   02.02.1991   Flat 2";
        let starts = row_starts(body);
        assert_eq!(starts.len(), 2);
        assert_eq!(starts[0].token.start, 0);
        assert_eq!(starts[0].date.text, "28.01.2009");
        assert_eq!(starts[1].date.text, "02.02.1991");
        assert!(starts[1].token.text.starts_with("\n12"));
    }

    #[test]
    fn test_row_start_at_beginning_of_text() {
        let starts = row_starts("01 01.01.1990 Some Land");
        assert_eq!(starts.len(), 1);
        assert_eq!(starts[0].date.start, 3);
    }

    #[test]
    fn test_indented_dates_are_not_row_starts() {
        assert!(row_starts("\n     28.01.2009 continued").is_empty());
    }

    #[test]
    fn test_strip_notes() {
        let text = "28.01.2009  Flat 1\n     more\nNOTE: restrictive covenant applies\nsee attached plan";
        let (body, notes) = strip_notes(text);
        assert_eq!(
            notes,
            vec!["NOTE: restrictive covenant applies\nsee attached plan"]
        );
        assert_eq!(body, "28.01.2009  Flat 1\n     more\n");
    }

    #[test]
    fn test_strip_notes_without_notes() {
        let (body, notes) = strip_notes("28.01.2009  Flat 1");
        assert_eq!(body, "28.01.2009  Flat 1");
        assert!(notes.is_empty());
    }

    #[test]
    fn test_strip_multiple_notes() {
        let text = "row\nNOTE: first\nline one\nNOTE: second\nline two";
        let (body, notes) = strip_notes(text);
        assert_eq!(notes, vec!["NOTE: first\nline one", "NOTE: second\nline two"]);
        assert_eq!(body, "row\n\n");
    }
}
