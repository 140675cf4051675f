//! Filter, sort and limit stages applied to a fetched server list
//!
//! The stages always run in the same order: filter, then sort, then limit.

use crate::types::{FilterSpec, OrderSpec, ServerRecord, DEFAULT_LIMIT};

/// Keep only the records matching `spec`, preserving their order.
pub fn filter(records: Vec<ServerRecord>, spec: &FilterSpec) -> Vec<ServerRecord> {
    records.into_iter().filter(|r| spec.matches(r)).collect()
}

/// Stable sort by `spec.field`. Records with equal keys keep their
/// original relative order in both directions.
pub fn sort(mut records: Vec<ServerRecord>, spec: &OrderSpec) -> Vec<ServerRecord> {
    records.sort_by(|a, b| spec.compare(a, b));
    records
}

/// Keep the first `n` records.
pub fn limit(mut records: Vec<ServerRecord>, n: usize) -> Vec<ServerRecord> {
    records.truncate(n);
    records
}

/// A configured filter → sort → limit run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    pub filter: Option<FilterSpec>,
    pub order: Option<OrderSpec>,
    pub limit: usize,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            filter: None,
            order: None,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pipeline {
    pub fn new(filter: Option<FilterSpec>, order: Option<OrderSpec>, limit: usize) -> Self {
        Self {
            filter,
            order,
            limit,
        }
    }

    pub fn apply(&self, records: Vec<ServerRecord>) -> Vec<ServerRecord> {
        let records = match &self.filter {
            Some(spec) => filter(records, spec),
            None => records,
        };
        let records = match &self.order {
            Some(spec) => sort(records, spec),
            None => records,
        };
        limit(records, self.limit)
    }
}

/// The highest-scoring record, first one wins on ties.
pub fn best_by_score(records: &[ServerRecord]) -> Option<&ServerRecord> {
    records.iter().fold(None, |best: Option<&ServerRecord>, r| match best {
        Some(b) if b.score >= r.score => Some(b),
        _ => Some(r),
    })
}
