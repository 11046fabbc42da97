use serde::{Deserialize, Serialize};
use std::fmt;

/// One lease entry's raw text, merged from its table-body fragments.
///
/// The first line is the header row; all following lines are continuation
/// rows. `number` is the 1-based position in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalRecord {
    pub number: usize,
    /// Page on which the record opened.
    pub page_index: usize,
    pub text: String,
}

/// Character offsets where columns 1-4 start within a record's header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnOffsets {
    /// Registration date and plan reference.
    pub registration: usize,
    /// Property description.
    pub description: usize,
    /// Date of lease and term.
    pub date_with_term: usize,
    /// Lessee's title reference.
    pub title: usize,
}

impl ColumnOffsets {
    /// Build an offset vector, returning `None` unless the columns are
    /// strictly increasing.
    pub fn new(
        registration: usize,
        description: usize,
        date_with_term: usize,
        title: usize,
    ) -> Option<ColumnOffsets> {
        if registration < description && description < date_with_term && date_with_term < title
        {
            Some(ColumnOffsets {
                registration,
                description,
                date_with_term,
                title,
            })
        } else {
            None
        }
    }

    /// Same vector with the description column moved, if the result is still
    /// strictly increasing.
    pub fn with_description(&self, description: usize) -> Option<ColumnOffsets> {
        ColumnOffsets::new(
            self.registration,
            description,
            self.date_with_term,
            self.title,
        )
    }
}

impl fmt::Display for ColumnOffsets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.registration, self.description, self.date_with_term, self.title
        )
    }
}

/// A structured entry from the schedule of notices of leases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseRecord {
    pub number: usize,
    pub title: Option<String>,
    pub registration_date_with_plan_ref: Option<String>,
    pub property_description: Option<String>,
    pub date_with_term: Option<String>,
    #[serde(default)]
    pub notes: Vec<String>,
}

/// How the description-column offset was settled for a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    pub reconciled: bool,
    /// The locked offset vector, once two records agreed on one.
    pub offsets: Option<ColumnOffsets>,
    /// Record number at which reconciliation happened.
    pub reconciled_at: Option<usize>,
    /// Records whose description boundary rests on their own content-based
    /// guess rather than the locked offset.
    pub best_effort_records: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseWarning {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<usize>,
    pub reason: String,
}

/// Everything a parsing run produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSchedule {
    pub records: Vec<LeaseRecord>,
    pub reconciliation: ReconciliationSummary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ParseWarning>,
}
