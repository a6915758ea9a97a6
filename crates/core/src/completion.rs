use serde::{Deserialize, Serialize};
use std::future::Future;
use tokio::sync::mpsc;

/// How a controller applies responses when several requests overlap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseOrdering {
    /// Every response is applied as it arrives; the last one to arrive wins.
    #[default]
    LastArrival,
    /// A response older than one already applied is dropped.
    LatestIssued,
}

pub(crate) struct Completion<T> {
    pub seq: u64,
    pub outcome: T,
}

/// Spawns a controller's requests and hands their outcomes back, one at a time,
/// to whoever owns the controller.
pub(crate) struct Completions<T> {
    tx: mpsc::UnboundedSender<Completion<T>>,
    rx: mpsc::UnboundedReceiver<Completion<T>>,
    next_seq: u64,
    newest_applied: Option<u64>,
    in_flight: usize,
    ordering: ResponseOrdering,
}

impl<T: Send + 'static> Completions<T> {
    pub fn new(ordering: ResponseOrdering) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            next_seq: 0,
            newest_applied: None,
            in_flight: 0,
            ordering,
        }
    }

    pub fn set_ordering(&mut self, ordering: ResponseOrdering) {
        self.ordering = ordering;
    }

    /// Must be called from within a tokio runtime.
    pub fn spawn<F>(&mut self, future: F) -> u64
    where
        F: Future<Output = T> + Send + 'static,
    {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.in_flight += 1;

        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = future.await;
            let _ = tx.send(Completion { seq, outcome });
        });
        seq
    }

    pub fn try_next(&mut self) -> Option<Completion<T>> {
        let completion = self.rx.try_recv().ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(completion)
    }

    /// Waits for the next outcome. Returns `None` straight away when nothing is in flight.
    pub async fn next(&mut self) -> Option<Completion<T>> {
        if self.in_flight == 0 {
            return None;
        }
        let completion = self.rx.recv().await?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(completion)
    }

    /// Whether the completion numbered `seq` may be applied. Admitted completions
    /// are remembered so later stale ones can be recognised.
    pub fn admit(&mut self, seq: u64) -> bool {
        if self.ordering == ResponseOrdering::LatestIssued
            && self.newest_applied.is_some_and(|newest| seq < newest)
        {
            return false;
        }
        self.newest_applied = Some(self.newest_applied.map_or(seq, |newest| newest.max(seq)));
        true
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_arrival_admits_everything() {
        let mut completions = Completions::<()>::new(ResponseOrdering::LastArrival);
        assert!(completions.admit(3));
        assert!(completions.admit(1));
        assert!(completions.admit(2));
    }

    #[test]
    fn latest_issued_drops_older_responses() {
        let mut completions = Completions::<()>::new(ResponseOrdering::LatestIssued);
        assert!(completions.admit(1));
        assert!(completions.admit(3));
        assert!(!completions.admit(2));
        assert!(completions.admit(4));
    }

    #[tokio::test]
    async fn delivers_outcomes_and_tracks_in_flight() {
        let mut completions = Completions::new(ResponseOrdering::LastArrival);
        assert!(completions.next().await.is_none());

        let first = completions.spawn(async { "a" });
        let second = completions.spawn(async { "b" });
        assert_eq!((first, second), (0, 1));
        assert_eq!(completions.in_flight(), 2);

        let mut seen = Vec::new();
        while let Some(done) = completions.next().await {
            seen.push((done.seq, done.outcome));
        }
        seen.sort();
        assert_eq!(seen, vec![(0, "a"), (1, "b")]);
        assert_eq!(completions.in_flight(), 0);
    }

    #[tokio::test]
    async fn try_next_is_empty_while_pending() {
        let mut completions = Completions::<()>::new(ResponseOrdering::LastArrival);
        completions.spawn(std::future::pending());
        tokio::task::yield_now().await;
        assert!(completions.try_next().is_none());
        assert_eq!(completions.in_flight(), 1);
    }
}
