use crate::config::Template;
use crate::error::LeaseError;
use crate::extraction::PageText;
use crate::model::{LogicalRecord, ParseWarning};
use crate::parsing::lexer::row_starts;

/// A piece of a table body after splitting at row starts.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Fragment<'a> {
    /// A row's registration date, with the character column it occupied in
    /// its source line.
    Opening { date: &'a str, column: usize },
    /// Text between row starts.
    Text(&'a str),
}

/// Cut the table body out of a schedule page: everything after the start
/// marker and before the page footer.
///
/// Returns `Ok(None)` for pages that do not carry the schedule.
pub fn table_body<'a>(
    page: &'a PageText,
    template: &Template,
) -> Result<Option<&'a str>, LeaseError> {
    let text = page.text.as_str();
    if !text.contains(&template.table_header) {
        return Ok(None);
    }

    let start = text
        .find(&template.start_marker)
        .ok_or_else(|| LeaseError::MalformedTableLayout {
            page: page.page_index,
            reason: format!("start marker '{}' not found", template.start_marker),
        })?;
    let table_and_footer = &text[start + template.start_marker.len()..];

    let footer = template
        .footer
        .find(table_and_footer)
        .ok_or_else(|| LeaseError::MalformedTableLayout {
            page: page.page_index,
            reason: "page footer not found".into(),
        })?;

    Ok(Some(&table_and_footer[..footer.start()]))
}

/// Split a table body at every row start, keeping each row's date as its
/// own fragment.
fn split_fragments(body: &str) -> Vec<Fragment<'_>> {
    let mut fragments = Vec::new();
    let mut last = 0;

    for row in row_starts(body) {
        fragments.push(Fragment::Text(&body[last..row.token.start]));

        let line_start = body[..row.date.start].rfind('\n').map_or(0, |i| i + 1);
        fragments.push(Fragment::Opening {
            date: row.date.text,
            column: body[line_start..row.date.start].chars().count(),
        });
        last = row.token.end;
    }
    fragments.push(Fragment::Text(&body[last..]));

    fragments
}

/// Turn schedule pages into logical records.
///
/// Wrapped text that lands ahead of the first row on a page is appended to
/// the last record of the previous page, and everything from the
/// end-of-register marker onward is cut from the final record.
pub fn segment_records(
    pages: &[PageText],
    template: &Template,
    warnings: &mut Vec<ParseWarning>,
) -> Result<Vec<LogicalRecord>, LeaseError> {
    let mut records: Vec<LogicalRecord> = Vec::new();
    let mut pending: Option<(String, usize)> = None;
    let mut first_table_page = None;

    for page in pages {
        let Some(body) = table_body(page, template)? else {
            continue;
        };
        log::debug!("Page {} carries the lease schedule", page.page_index);
        if first_table_page.is_none() {
            first_table_page = Some(page.page_index);
        }

        for fragment in split_fragments(body) {
            match fragment {
                // Every opening is followed by a text fragment, so a pending
                // opening never survives to the next one.
                Fragment::Opening { date, column } => {
                    pending = Some((format!("{}{}", " ".repeat(column), date), page.page_index));
                }
                Fragment::Text(text) => {
                    if let Some((opening, page_index)) = pending.take() {
                        records.push(LogicalRecord {
                            number: records.len() + 1,
                            page_index,
                            text: opening + text,
                        });
                    } else if text.starts_with('\n') {
                        match records.last_mut() {
                            Some(last) => last.text.push_str(text),
                            None if text.trim().is_empty() => {}
                            None => warn(
                                warnings,
                                page.page_index,
                                "text ahead of the first row was dropped".into(),
                            ),
                        }
                    } else if !text.trim().is_empty() {
                        log::debug!(
                            "page {}: dropped text outside any row: {:?}",
                            page.page_index,
                            text.trim()
                        );
                    }
                }
            }
        }
    }

    let Some(first_table_page) = first_table_page else {
        return Err(LeaseError::EmptyDocument);
    };
    if records.is_empty() {
        return Err(LeaseError::MalformedTableLayout {
            page: first_table_page,
            reason: "no record-start boundary found".into(),
        });
    }

    if let Some(last) = records.last_mut() {
        if let Some(idx) = last.text.find(&template.end_of_register) {
            let kept = last.text[..idx].trim_end_matches(['\n', '\r']).len();
            last.text.truncate(kept);
        }
    }

    log::debug!("Segmented {} logical record(s)", records.len());
    Ok(records)
}

fn warn(warnings: &mut Vec<ParseWarning>, page: usize, reason: String) {
    log::debug!("page {page}: {reason}");
    warnings.push(ParseWarning {
        page: Some(page),
        record: None,
        reason,
    });
}
