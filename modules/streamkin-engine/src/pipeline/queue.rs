//! Inter-stage work queue with drain accounting.

use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{mpsc, Mutex, Notify};

/// Ordered item transport between pipeline stages.
///
/// There is no close signal: workers block on [`get`](Self::get) forever and
/// are cancelled externally by the coordinator once [`join`](Self::join)
/// reports that every item ever put has been marked done. Capacity is
/// advisory — `put` never blocks, producers may outrun consumers.
///
/// Invariant: one `mark_done` per item taken via `get`, called after the
/// item's work finishes, success or not. `join` accounting is only correct
/// if consumers hold to that.
pub struct WorkQueue<T> {
    tx: mpsc::UnboundedSender<T>,
    rx: Mutex<mpsc::UnboundedReceiver<T>>,
    unfinished: AtomicUsize,
    drained: Notify,
}

impl<T: Send> WorkQueue<T> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Mutex::new(rx),
            unfinished: AtomicUsize::new(0),
            drained: Notify::new(),
        }
    }

    /// Enqueue without blocking.
    pub fn put(&self, item: T) {
        self.unfinished.fetch_add(1, Ordering::AcqRel);
        // the receiver half lives inside self, so the channel cannot close
        let _ = self.tx.send(item);
    }

    /// Take the next item, suspending until one is available. Concurrent
    /// workers race for items; delivery order matches insertion order.
    pub async fn get(&self) -> T {
        let mut rx = self.rx.lock().await;
        match rx.recv().await {
            Some(item) => item,
            // unreachable while self holds a sender; park rather than panic
            None => std::future::pending().await,
        }
    }

    /// Report one taken item as finished.
    pub fn mark_done(&self) {
        if self.unfinished.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.drained.notify_waiters();
        }
    }

    /// Suspend until every item ever put has been matched by a `mark_done`.
    /// Returns immediately when nothing is outstanding. This is the only
    /// liveness signal the queue offers.
    pub async fn join(&self) {
        loop {
            let drained = self.drained.notified();
            if self.unfinished.load(Ordering::Acquire) == 0 {
                return;
            }
            drained.await;
        }
    }

    /// Items put but not yet marked done (queued or in flight).
    pub fn outstanding(&self) -> usize {
        self.unfinished.load(Ordering::Acquire)
    }
}

impl<T: Send> Default for WorkQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn items_come_out_in_insertion_order() {
        let q = WorkQueue::new();
        q.put(1);
        q.put(2);
        q.put(3);
        assert_eq!(q.get().await, 1);
        assert_eq!(q.get().await, 2);
        assert_eq!(q.get().await, 3);
    }

    #[tokio::test]
    async fn join_returns_immediately_when_empty() {
        let q: WorkQueue<u32> = WorkQueue::new();
        q.join().await; // must not hang
    }

    #[tokio::test]
    async fn join_waits_for_every_mark_done() {
        let q = Arc::new(WorkQueue::new());
        q.put(1);
        q.put(2);

        let consumer = {
            let q = q.clone();
            tokio::spawn(async move {
                for _ in 0..2 {
                    let _ = q.get().await;
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    q.mark_done();
                }
            })
        };

        q.join().await;
        assert_eq!(q.outstanding(), 0);
        consumer.await.unwrap();
    }

    #[tokio::test]
    async fn join_does_not_resolve_while_an_item_is_in_flight() {
        let q = Arc::new(WorkQueue::new());
        q.put(());
        let _item = q.get().await; // taken but not marked done

        let joined =
            tokio::time::timeout(Duration::from_millis(20), q.join()).await;
        assert!(joined.is_err(), "join resolved with an unfinished item");

        q.mark_done();
        q.join().await;
    }

    #[tokio::test]
    async fn worker_blocked_on_get_survives_abort() {
        let q: Arc<WorkQueue<u32>> = Arc::new(WorkQueue::new());
        let worker = {
            let q = q.clone();
            tokio::spawn(async move {
                let _ = q.get().await;
            })
        };
        tokio::task::yield_now().await;
        worker.abort();
        assert!(worker.await.unwrap_err().is_cancelled());
        // queue still usable afterwards
        q.put(7);
        assert_eq!(q.get().await, 7);
    }
}
