use crate::model::ColumnOffsets;

/// Agreement cache for the description-column offset.
///
/// The description column has no pattern of its own, so its offset is
/// guessed per record until two records produce the same offset vector.
/// That vector is then locked for the rest of the run. Records must be fed
/// in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationCache {
    Unreconciled { candidates: Vec<ColumnOffsets> },
    Reconciled { offsets: ColumnOffsets, at_record: usize },
}

impl Default for ReconciliationCache {
    fn default() -> Self {
        ReconciliationCache::Unreconciled {
            candidates: Vec::new(),
        }
    }
}

impl ReconciliationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_reconciled(&self) -> bool {
        matches!(self, ReconciliationCache::Reconciled { .. })
    }

    /// The locked offset vector, once reconciled.
    pub fn locked(&self) -> Option<ColumnOffsets> {
        match self {
            ReconciliationCache::Reconciled { offsets, .. } => Some(*offsets),
            ReconciliationCache::Unreconciled { .. } => None,
        }
    }

    /// Record number that triggered reconciliation.
    pub fn reconciled_at(&self) -> Option<usize> {
        match self {
            ReconciliationCache::Reconciled { at_record, .. } => Some(*at_record),
            ReconciliationCache::Unreconciled { .. } => None,
        }
    }

    /// Offer a record's offset vector. Returns `true` if this call locked the
    /// cache. Once reconciled, further vectors are ignored.
    pub fn observe(&mut self, offsets: ColumnOffsets, record: usize) -> bool {
        let ReconciliationCache::Unreconciled { candidates } = self else {
            return false;
        };

        if candidates.contains(&offsets) {
            log::info!("Column offsets reconciled at record {record}: {offsets}");
            *self = ReconciliationCache::Reconciled {
                offsets,
                at_record: record,
            };
            return true;
        }

        candidates.push(offsets);
        false
    }
}
