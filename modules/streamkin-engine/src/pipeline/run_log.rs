//! Milestone log for the shutdown protocol.

use std::sync::Mutex;
use std::time::Instant;

use tracing::debug;

/// Records the coordinator's drain/flush/cancel milestones with timestamps.
///
/// The protocol's correctness is an ordering claim (stage k drains and
/// flushes before stage k+1 is joined); logging each step makes that
/// ordering observable to tests and to anyone reading debug output.
#[derive(Debug)]
pub struct RunLog {
    started: Instant,
    entries: Mutex<Vec<Milestone>>,
}

#[derive(Debug, Clone)]
pub struct Milestone {
    pub label: &'static str,
    pub at: Instant,
}

impl RunLog {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn mark(&self, label: &'static str) {
        let at = Instant::now();
        debug!(
            milestone = label,
            elapsed_ms = at.duration_since(self.started).as_millis() as u64,
            "Pipeline milestone"
        );
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Milestone { label, at });
    }

    pub fn milestones(&self) -> Vec<Milestone> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Position of a label in the log, if it was recorded.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.milestones().iter().position(|m| m.label == label)
    }

    /// True when `earlier` was recorded before `later`. Both must exist.
    pub fn happened_before(&self, earlier: &str, later: &str) -> bool {
        match (self.position(earlier), self.position(later)) {
            (Some(a), Some(b)) => a < b,
            _ => false,
        }
    }
}

impl Default for RunLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_queries_work() {
        let log = RunLog::new();
        log.mark("first");
        log.mark("second");
        assert!(log.happened_before("first", "second"));
        assert!(!log.happened_before("second", "first"));
        assert!(!log.happened_before("first", "missing"));
        assert_eq!(log.milestones().len(), 2);
    }
}
