//! Deduplicated batch emission for newly-qualifying candidates.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::network::FollowerNetwork;

/// Packages newly-qualifying candidate ids into fixed-size batches, exactly
/// once each.
///
/// The ledger remembers every id ever placed into a batch; it is updated in
/// the same mutex section that decides a batch's contents, so concurrent
/// polls can never emit the same id twice. Ids never leave the ledger.
///
/// Incremental polls deliberately hold back partial batches — full batches
/// are preferred over latency, and whatever is left when the aggregation
/// stage drains gets picked up by the terminal flush.
pub struct CandidateBatcher {
    network: Arc<FollowerNetwork>,
    batch_sz: usize,
    ledger: Mutex<HashSet<String>>,
}

impl CandidateBatcher {
    pub fn new(network: Arc<FollowerNetwork>, batch_sz: usize) -> Self {
        Self {
            network,
            batch_sz: batch_sz.max(1),
            ledger: Mutex::new(HashSet::new()),
        }
    }

    /// Compute qualifying-minus-ledger and emit batches.
    ///
    /// Incremental mode (`fetch_all == false`): one full batch when more than
    /// `batch_sz` new candidates are waiting, nothing otherwise.
    ///
    /// Terminal flush (`fetch_all == true`): everything that is waiting,
    /// chunked into `batch_sz`-sized batches plus an undersized remainder.
    /// Safe to call even if no incremental poll ever ran.
    ///
    /// Batch contents are sorted so runs over the same data are reproducible.
    pub fn poll(&self, fetch_all: bool) -> Vec<Vec<String>> {
        let qualifying = self.network.mutual_followings();

        let mut ledger = self.ledger.lock().unwrap_or_else(|e| e.into_inner());
        let mut fresh: Vec<String> = qualifying
            .into_keys()
            .filter(|id| !ledger.contains(id))
            .collect();
        fresh.sort_unstable();

        if fetch_all {
            ledger.extend(fresh.iter().cloned());
            fresh
                .chunks(self.batch_sz)
                .map(<[String]>::to_vec)
                .collect()
        } else if fresh.len() > self.batch_sz {
            fresh.truncate(self.batch_sz);
            ledger.extend(fresh.iter().cloned());
            vec![fresh]
        } else {
            Vec::new()
        }
    }

    /// Number of ids emitted so far.
    pub fn emitted(&self) -> usize {
        self.ledger.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}
