//! Column reconstruction for a single logical record.
//!
//! The header row anchors columns 1, 3 and 4 on their dates and title
//! reference. Column 2 has no anchor and takes its offset from the
//! reconciliation cache when one is locked.

use crate::error::LeaseError;
use crate::model::{ColumnOffsets, LeaseRecord, LogicalRecord};
use crate::parsing::lexer::{scan, strip_notes, TokenKind};
use crate::parsing::reconcile::ReconciliationCache;

/// A column's start offset and the text fragments gathered for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Column {
    pub offset: usize,
    pub fragments: Vec<String>,
}

impl Column {
    fn new(offset: usize, header_text: &str) -> Self {
        let mut column = Column {
            offset,
            fragments: Vec::new(),
        };
        column.push(header_text);
        column
    }

    fn push(&mut self, fragment: &str) {
        let fragment = fragment.trim();
        if !fragment.is_empty() {
            self.fragments.push(fragment.to_string());
        }
    }

    /// Fragments joined with single spaces.
    pub fn text(&self) -> String {
        self.fragments.join(" ")
    }
}

/// The four schedule columns of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSet {
    pub registration: Column,
    pub description: Column,
    pub date_with_term: Column,
    pub title: Column,
}

/// Where a record's description offset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetSource {
    /// The cache was already locked and its offset fit this record.
    Locked,
    /// Located from the record's own header-row text.
    Guessed,
}

/// Columns calibrated from a header row, before continuation rows are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calibration {
    pub columns: ColumnSet,
    pub offsets: ColumnOffsets,
    pub source: OffsetSource,
    /// Set when the cache was locked but its offset could not be applied.
    pub rejected_lock: Option<ColumnOffsets>,
}

/// A reconstructed record and how its columns were placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconstructed {
    pub lease: LeaseRecord,
    pub offsets: ColumnOffsets,
    pub source: OffsetSource,
    pub rejected_lock: Option<ColumnOffsets>,
}

/// Calibrate column offsets and header-row text from a record's first line.
pub fn calibrate(
    header_row: &str,
    record: usize,
    cache: &ReconciliationCache,
) -> Result<Calibration, LeaseError> {
    let mismatch = |reason: String| LeaseError::ColumnPatternMismatch { record, reason };

    let dates = scan(header_row, TokenKind::Date);
    let [registration_date, lease_date] = dates.as_slice() else {
        return Err(mismatch(format!(
            "expected 2 dates in header row, found {}",
            dates.len()
        )));
    };

    let titles = scan(header_row, TokenKind::TitleId);
    let [title] = titles.as_slice() else {
        return Err(mismatch(format!(
            "expected 1 title reference in header row, found {}",
            titles.len()
        )));
    };

    let c1 = registration_date.column(header_row);
    let c3 = lease_date.column(header_row);
    let c4 = title.column(header_row);
    let c1_end = c1 + registration_date.text.chars().count();

    let description_text = char_slice(header_row, c1_end, c3.saturating_sub(1)).trim();
    let guessed = guess_description_offset(header_row, c1_end, description_text);

    let own = ColumnOffsets::new(c1, guessed, c3, c4).ok_or_else(|| {
        mismatch(format!(
            "column offsets ({c1}, {guessed}, {c3}, {c4}) are not strictly increasing"
        ))
    })?;

    let (offsets, source, rejected_lock) = match cache.locked() {
        Some(locked) => match own.with_description(locked.description) {
            Some(offsets) => (offsets, OffsetSource::Locked, None),
            None => (own, OffsetSource::Guessed, Some(locked)),
        },
        None => (own, OffsetSource::Guessed, None),
    };

    let columns = ColumnSet {
        registration: Column::new(c1, registration_date.text),
        description: Column::new(offsets.description, description_text),
        date_with_term: Column::new(c3, lease_date.text),
        title: Column::new(c4, title.text),
    };

    Ok(Calibration {
        columns,
        offsets,
        source,
        rejected_lock,
    })
}

/// Best-effort description offset: where the header row's description text
/// starts, searching from the end of the registration date.
fn guess_description_offset(header_row: &str, from: usize, description_text: &str) -> usize {
    if description_text.is_empty() {
        return from;
    }
    let from_byte = byte_index(header_row, from);
    match header_row[from_byte..].find(description_text) {
        Some(found) => from + header_row[from_byte..from_byte + found].chars().count(),
        None => from,
    }
}

/// Slice a continuation row into its first three columns. The title column
/// never continues past the header row.
pub fn slice_row<'a>(row: &'a str, offsets: &ColumnOffsets) -> [&'a str; 3] {
    [
        char_slice(row, offsets.registration, offsets.description).trim(),
        char_slice(row, offsets.description, offsets.date_with_term).trim(),
        char_slice(row, offsets.date_with_term, offsets.title).trim(),
    ]
}

/// Reconstruct one logical record, updating the cache in passing.
pub fn reconstruct_record(
    record: &LogicalRecord,
    cache: &mut ReconciliationCache,
) -> Result<Reconstructed, LeaseError> {
    let (body, notes) = strip_notes(&record.text);
    let mut rows = body.lines();
    let header_row = rows.next().unwrap_or_default();

    let Calibration {
        mut columns,
        offsets,
        source,
        rejected_lock,
    } = calibrate(header_row, record.number, cache)?;

    // Locking only happens on an exact repeat, so `offsets` already equals
    // the locked vector when this call locks.
    cache.observe(offsets, record.number);

    for row in rows {
        let [registration, description, date_with_term] = slice_row(row, &offsets);
        columns.registration.push(registration);
        columns.description.push(description);
        columns.date_with_term.push(date_with_term);
    }

    let lease = LeaseRecord {
        number: record.number,
        title: Some(columns.title.text()),
        registration_date_with_plan_ref: Some(columns.registration.text()),
        property_description: Some(columns.description.text()),
        date_with_term: Some(columns.date_with_term.text()),
        notes,
    };

    Ok(Reconstructed {
        lease,
        offsets,
        source,
        rejected_lock,
    })
}

fn byte_index(s: &str, char_pos: usize) -> usize {
    s.char_indices().nth(char_pos).map_or(s.len(), |(i, _)| i)
}

/// Substring by character positions `[start, end)`, clamped to the string.
fn char_slice(s: &str, start: usize, end: usize) -> &str {
    if start >= end {
        return "";
    }
    let start = byte_index(s, start);
    let end = byte_index(s, end);
    &s[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    // Widths: row number 5, registration 16, description 28, date 18.
    fn layout(cells: [&str; 5]) -> String {
        format!(
            "{:<5}{:<16}{:<28}{:<18}{}",
            cells[0], cells[1], cells[2], cells[3], cells[4]
        )
        .trim_end()
        .to_string()
    }

    fn record(number: usize, rows: &[[&str; 5]]) -> LogicalRecord {
        let text: Vec<String> = rows.iter().map(|r| layout(*r)).collect();
        LogicalRecord {
            number,
            page_index: 1,
            text: text.join("\n"),
        }
    }

    #[test]
    fn test_char_slice() {
        assert_eq!(char_slice("abcdef", 1, 3), "bc");
        assert_eq!(char_slice("abc", 2, 10), "c");
        assert_eq!(char_slice("abc", 5, 10), "");
        assert_eq!(char_slice("abc", 2, 1), "");
        assert_eq!(char_slice("£12 Flat", 1, 3), "12");
    }

    #[test]
    fn test_calibrate_header_row() {
        let header = layout(["", "28.01.2009", "Endeavour House, 47", "06.06.2008", "EGL557357"]);
        let calibration = calibrate(&header, 1, &ReconciliationCache::new()).unwrap();

        assert_eq!(calibration.offsets, ColumnOffsets::new(5, 21, 49, 67).unwrap());
        assert_eq!(calibration.source, OffsetSource::Guessed);
        assert_eq!(calibration.columns.registration.text(), "28.01.2009");
        assert_eq!(calibration.columns.description.text(), "Endeavour House, 47");
        assert_eq!(calibration.columns.date_with_term.text(), "06.06.2008");
        assert_eq!(calibration.columns.title.text(), "EGL557357");
    }

    #[test]
    fn test_calibrate_uses_locked_offset() {
        let mut cache = ReconciliationCache::new();
        let locked = ColumnOffsets::new(5, 21, 49, 67).unwrap();
        cache.observe(locked, 1);
        cache.observe(locked, 2);

        let header = layout(["", "28.01.2009", "", "06.06.2008", "EGL557357"]);
        let calibration = calibrate(&header, 3, &cache).unwrap();
        assert_eq!(calibration.offsets.description, 21);
        assert_eq!(calibration.source, OffsetSource::Locked);
    }

    #[test]
    fn test_locked_offset_outside_record_is_rejected() {
        let mut cache = ReconciliationCache::new();
        let locked = ColumnOffsets::new(5, 21, 49, 67).unwrap();
        cache.observe(locked, 1);
        cache.observe(locked, 2);

        // Narrower layout: the date of lease starts at the locked offset.
        let header = format!(
            "{:<5}{:<11}{:<5}{:<11}{}",
            "", "28.01.2009", "Flat", "06.06.2008", "EGL1"
        );
        let calibration = calibrate(&header, 3, &cache).unwrap();
        assert_eq!(calibration.source, OffsetSource::Guessed);
        assert_eq!(calibration.rejected_lock, Some(locked));
        assert_eq!(calibration.offsets, ColumnOffsets::new(5, 16, 21, 32).unwrap());
    }

    #[test]
    fn test_empty_description_guesses_date_end() {
        let header = layout(["", "28.01.2009", "", "06.06.2008", "EGL557357"]);
        let calibration = calibrate(&header, 1, &ReconciliationCache::new()).unwrap();
        assert_eq!(calibration.offsets.description, 15);
        assert!(calibration.columns.description.fragments.is_empty());
    }

    #[test]
    fn test_zero_dates_is_mismatch() {
        let err = calibrate("     Endeavour House     EGL557357", 7, &ReconciliationCache::new())
            .unwrap_err();
        assert!(matches!(
            err,
            LeaseError::ColumnPatternMismatch { record: 7, ref reason } if reason.contains("found 0")
        ));
    }

    #[test]
    fn test_three_dates_is_mismatch() {
        let header = layout(["", "28.01.2009", "Flat 01.02.2003", "06.06.2008", "EGL557357"]);
        assert!(matches!(
            calibrate(&header, 2, &ReconciliationCache::new()),
            Err(LeaseError::ColumnPatternMismatch { record: 2, .. })
        ));
    }

    #[test]
    fn test_title_count_is_checked() {
        let none = layout(["", "28.01.2009", "Endeavour House", "06.06.2008", ""]);
        assert!(matches!(
            calibrate(&none, 1, &ReconciliationCache::new()),
            Err(LeaseError::ColumnPatternMismatch { ref reason, .. }) if reason.contains("found 0")
        ));

        let two = layout(["", "28.01.2009", "Unit B12", "06.06.2008", "EGL557357"]);
        assert!(matches!(
            calibrate(&two, 1, &ReconciliationCache::new()),
            Err(LeaseError::ColumnPatternMismatch { ref reason, .. }) if reason.contains("found 2")
        ));
    }

    #[test]
    fn test_title_before_lease_date_is_mismatch() {
        let header = "     28.01.2009   EGL557357   Flat 1   06.06.2008";
        assert!(matches!(
            calibrate(header, 1, &ReconciliationCache::new()),
            Err(LeaseError::ColumnPatternMismatch { ref reason, .. }) if reason.contains("strictly increasing")
        ));
    }

    #[test]
    fn test_slice_row() {
        let offsets = ColumnOffsets::new(5, 21, 49, 67).unwrap();
        let row = layout(["", "Edged and", "Cuba Street, London", "125 years from", ""]);
        assert_eq!(
            slice_row(&row, &offsets),
            ["Edged and", "Cuba Street, London", "125 years from"]
        );

        let short = layout(["", "blue", "", "", ""]);
        assert_eq!(slice_row(&short, &offsets), ["blue", "", ""]);
    }

    #[test]
    fn test_reconstruct_record() {
        let logical = record(
            1,
            &[
                ["", "28.01.2009", "Endeavour House, 47", "06.06.2008", "EGL557357"],
                ["", "Edged and", "Cuba Street, London", "125 years from", ""],
                ["", "numbered 2 in", "", "1.1.2009", ""],
                ["", "blue (part of)", "", "", ""],
            ],
        );
        let mut cache = ReconciliationCache::new();
        let out = reconstruct_record(&logical, &mut cache).unwrap();

        assert_eq!(out.lease.number, 1);
        assert_eq!(out.lease.title.as_deref(), Some("EGL557357"));
        assert_eq!(
            out.lease.registration_date_with_plan_ref.as_deref(),
            Some("28.01.2009 Edged and numbered 2 in blue (part of)")
        );
        assert_eq!(
            out.lease.property_description.as_deref(),
            Some("Endeavour House, 47 Cuba Street, London")
        );
        assert_eq!(
            out.lease.date_with_term.as_deref(),
            Some("06.06.2008 125 years from 1.1.2009")
        );
        assert!(out.lease.notes.is_empty());
        assert!(!cache.is_reconciled());
    }

    #[test]
    fn test_header_row_term_text_is_not_kept() {
        let logical = record(
            5,
            &[
                ["", "28.01.2009", "Flat 1", "06.06.2008 99 years", "EGL1"],
                ["", "", "", "from 2008", ""],
            ],
        );
        let out = reconstruct_record(&logical, &mut ReconciliationCache::new()).unwrap();
        assert_eq!(out.lease.date_with_term.as_deref(), Some("06.06.2008 from 2008"));
        assert_eq!(out.lease.title.as_deref(), Some("EGL1"));
    }

    #[test]
    fn test_notes_are_kept_out_of_columns() {
        let mut logical = record(
            4,
            &[
                ["", "28.01.2009", "Endeavour House, 47", "06.06.2008", "EGL557357"],
                ["", "Edged and", "Cuba Street, London", "125 years from", ""],
            ],
        );
        logical
            .text
            .push_str("\nNOTE: restrictive covenant applies\nsee attached plan");

        let out = reconstruct_record(&logical, &mut ReconciliationCache::new()).unwrap();
        assert_eq!(
            out.lease.notes,
            vec!["NOTE: restrictive covenant applies\nsee attached plan"]
        );
        for field in [
            &out.lease.registration_date_with_plan_ref,
            &out.lease.property_description,
            &out.lease.date_with_term,
        ] {
            let field = field.as_deref().unwrap();
            assert!(!field.contains("NOTE"));
            assert!(!field.contains("attached plan"));
        }
    }
}
