pub mod columns;
pub mod lexer;
pub mod reconcile;
pub mod segment;

use crate::config::Template;
use crate::error::LeaseError;
use crate::extraction::PageText;
use crate::model::{LogicalRecord, ParseWarning, ParsedSchedule, ReconciliationSummary};
use columns::{reconstruct_record, OffsetSource, Reconstructed};
use reconcile::ReconciliationCache;

/// Parse schedule pages into lease records.
///
/// Segmentation runs over all pages first; reconstruction then walks the
/// records in document order with one reconciliation cache for the whole
/// run. Any failure aborts the document.
pub fn parse_schedule(
    pages: &[PageText],
    template: &Template,
) -> Result<ParsedSchedule, LeaseError> {
    let mut warnings = Vec::new();
    let records = segment::segment_records(pages, template, &mut warnings)?;
    let (reconstructed, cache) = reconstruct_records(&records)?;

    let reconciliation = summarize(&reconstructed, &cache);
    for r in &reconstructed {
        if let Some(locked) = r.rejected_lock {
            warnings.push(record_warning(
                r.lease.number,
                format!(
                    "locked column offsets {locked} do not fit this record; used {} instead",
                    r.offsets
                ),
            ));
        }
    }

    if !reconciliation.reconciled {
        if template.require_reconciliation {
            return Err(LeaseError::Unreconciled {
                records: reconstructed.len(),
            });
        }
        let reason = format!(
            "column offsets never reconciled; property descriptions of {} record(s) are best-effort",
            reconciliation.best_effort_records.len()
        );
        log::debug!("{reason}");
        warnings.push(ParseWarning {
            page: None,
            record: None,
            reason,
        });
    }

    Ok(ParsedSchedule {
        records: reconstructed.into_iter().map(|r| r.lease).collect(),
        reconciliation,
        warnings,
    })
}

/// Reconstruct records strictly in order; the cache carries state from each
/// record to the next.
fn reconstruct_records(
    records: &[LogicalRecord],
) -> Result<(Vec<Reconstructed>, ReconciliationCache), LeaseError> {
    let mut cache = ReconciliationCache::new();
    let mut out = Vec::with_capacity(records.len());

    for record in records {
        log::debug!("Reconstructing lease record {}", record.number);
        out.push(reconstruct_record(record, &mut cache)?);
    }

    Ok((out, cache))
}

fn summarize(
    reconstructed: &[Reconstructed],
    cache: &ReconciliationCache,
) -> ReconciliationSummary {
    let locked = cache.locked();
    let best_effort_records = reconstructed
        .iter()
        .filter(|r| r.source == OffsetSource::Guessed && Some(r.offsets) != locked)
        .map(|r| r.lease.number)
        .collect();

    ReconciliationSummary {
        reconciled: cache.is_reconciled(),
        offsets: locked,
        reconciled_at: cache.reconciled_at(),
        best_effort_records,
    }
}

fn record_warning(record: usize, reason: String) -> ParseWarning {
    log::debug!("record {record}: {reason}");
    ParseWarning {
        page: None,
        record: Some(record),
        reason,
    }
}
