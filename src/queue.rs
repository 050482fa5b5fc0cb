//! Priority queue over pending evacuations.

use std::{cmp::Ordering, collections::BinaryHeap};

use tracing::debug;

use crate::domain::{Evacuation, EvacuationStatus};

/// Priority score at or above which an evacuation counts as critical.
pub const CRITICAL_SCORE: u32 = 5;

/// A queued evacuation together with the score it had when it entered the
/// heap. Scores are not kept fresh automatically: entries are re-scored only
/// by [`EvacuationQueue::reprioritize`] and [`EvacuationQueue::refresh`].
#[derive(Debug, Clone)]
struct Entry {
    score: u32,
    evacuation: Evacuation,
}

impl Entry {
    fn new(evacuation: Evacuation) -> Self {
        Self {
            score: evacuation.priority_score(),
            evacuation,
        }
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Higher score wins; among equal scores, earlier creation wins.
        self.score.cmp(&other.score).then_with(|| {
            other
                .evacuation
                .started_at()
                .cmp(&self.evacuation.started_at())
        })
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

/// A max-priority queue of pending evacuations.
///
/// Ordering follows [`Evacuation::priority_score`], highest first, with ties
/// resolved in favour of the earlier creation timestamp. Scores are computed
/// when an evacuation is pushed and are **not** recomputed as the underlying
/// entities mutate; callers that change anything affecting a score must call
/// [`EvacuationQueue::reprioritize`] for the head of the queue to reflect
/// it. That is a documented consistency contract, not an automatism.
#[derive(Debug, Default)]
pub struct EvacuationQueue {
    heap: BinaryHeap<Entry>,
    history: Vec<Evacuation>,
}

impl EvacuationQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pending evacuations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether the queue holds no pending evacuations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Enqueues an evacuation, scoring it now.
    pub fn push(&mut self, evacuation: Evacuation) {
        let entry = Entry::new(evacuation);
        debug!(
            evacuation = entry.evacuation.id(),
            score = entry.score,
            "queueing evacuation"
        );
        self.heap.push(entry);
    }

    /// Removes and returns the highest-priority evacuation, appending a copy
    /// to the processed-history log.
    pub fn pop(&mut self) -> Option<Evacuation> {
        let evacuation = self.heap.pop()?.evacuation;
        self.history.push(evacuation.clone());
        Some(evacuation)
    }

    /// The highest-priority evacuation, without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&Evacuation> {
        self.heap.peek().map(|entry| &entry.evacuation)
    }

    /// Re-scores every pending evacuation and rebuilds the heap.
    ///
    /// Required after any mutation that affects a score (urgency change,
    /// population update behind a bonus threshold); O(n log n).
    pub fn reprioritize(&mut self) {
        let entries = std::mem::take(&mut self.heap);
        self.heap = entries
            .into_iter()
            .map(|entry| Entry::new(entry.evacuation))
            .collect();
    }

    /// Applies a mutation to every pending evacuation, then re-scores and
    /// rebuilds the heap in one pass.
    ///
    /// This is how callers feed fresh entity state (route risk, populations)
    /// into the scores before re-sorting.
    pub fn refresh<F>(&mut self, mut refresh: F)
    where
        F: FnMut(&mut Evacuation),
    {
        let entries = std::mem::take(&mut self.heap);
        self.heap = entries
            .into_iter()
            .map(|entry| {
                let mut evacuation = entry.evacuation;
                refresh(&mut evacuation);
                Entry::new(evacuation)
            })
            .collect();
    }

    /// Applies a mutation to the pending evacuation with the given id.
    ///
    /// Returns `false` if no such evacuation is pending. The queue order is
    /// deliberately left stale; call [`EvacuationQueue::reprioritize`]
    /// afterwards.
    pub fn update<F>(&mut self, id: &str, mutate: F) -> bool
    where
        F: FnOnce(&mut Evacuation),
    {
        let mut entries = std::mem::take(&mut self.heap).into_vec();
        let found = match entries.iter_mut().find(|e| e.evacuation.id() == id) {
            Some(entry) => {
                mutate(&mut entry.evacuation);
                true
            }
            None => false,
        };
        self.heap = entries.into_iter().collect();
        found
    }

    /// Drops every pending evacuation in a terminal state (completed or
    /// cancelled).
    pub fn purge_terminal(&mut self) {
        let entries = std::mem::take(&mut self.heap);
        self.heap = entries
            .into_iter()
            .filter(|entry| !entry.evacuation.status().is_terminal())
            .collect();
    }

    /// Pending evacuations in the given state.
    #[must_use]
    pub fn by_status(&self, status: EvacuationStatus) -> Vec<Evacuation> {
        self.heap
            .iter()
            .filter(|entry| entry.evacuation.status() == status)
            .map(|entry| entry.evacuation.clone())
            .collect()
    }

    /// Pending evacuations whose current score is critical.
    #[must_use]
    pub fn critical(&self) -> Vec<Evacuation> {
        self.heap
            .iter()
            .filter(|entry| entry.evacuation.priority_score() >= CRITICAL_SCORE)
            .map(|entry| entry.evacuation.clone())
            .collect()
    }

    /// Snapshot of all pending evacuations, in no particular order.
    #[must_use]
    pub fn pending(&self) -> Vec<Evacuation> {
        self.heap
            .iter()
            .map(|entry| entry.evacuation.clone())
            .collect()
    }

    /// Whether an evacuation with the given id is pending.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.heap.iter().any(|entry| entry.evacuation.id() == id)
    }

    /// Evacuations popped from this queue, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Evacuation] {
        &self.history
    }

    /// Mean wall-clock hours from creation to finish over the processed
    /// history; zero when nothing finished yet.
    #[must_use]
    pub fn mean_processing_hours(&self) -> f64 {
        if self.history.is_empty() {
            return 0.0;
        }

        let total_hours: i64 = self
            .history
            .iter()
            .filter_map(|ev| Some((ev.finished_at()? - ev.started_at()).num_hours()))
            .sum();

        #[allow(clippy::cast_precision_loss)]
        {
            total_hours as f64 / self.history.len() as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EvacuationQueue, CRITICAL_SCORE};
    use crate::domain::{Evacuation, EvacuationStatus, Level};

    fn evacuation(id: &str, people: u32, urgency: Level) -> Evacuation {
        Evacuation::new(id, "Z1", "Z2", people, urgency, "ops", None)
    }

    #[test]
    fn pops_highest_score_first() {
        let mut queue = EvacuationQueue::new();
        queue.push(evacuation("EV1", 500, Level::High)); // 3
        queue.push(evacuation("EV2", 12_000, Level::High)); // 6
        queue.push(evacuation("EV3", 500, Level::Critical)); // 4

        assert_eq!(queue.pop().unwrap().id(), "EV2");
        assert_eq!(queue.pop().unwrap().id(), "EV3");
        assert_eq!(queue.pop().unwrap().id(), "EV1");
        assert!(queue.pop().is_none());
    }

    #[test]
    fn equal_scores_resolve_by_creation_order() {
        let mut queue = EvacuationQueue::new();
        queue.push(evacuation("first", 500, Level::High));
        queue.push(evacuation("second", 500, Level::High));
        queue.push(evacuation("third", 500, Level::High));

        assert_eq!(queue.pop().unwrap().id(), "first");
        assert_eq!(queue.pop().unwrap().id(), "second");
        assert_eq!(queue.pop().unwrap().id(), "third");
    }

    #[test]
    fn stale_scores_persist_until_reprioritize() {
        let mut queue = EvacuationQueue::new();
        queue.push(evacuation("EV1", 500, Level::Critical)); // 4
        queue.push(evacuation("EV2", 500, Level::Low)); // 1

        // Upgrade EV2 after the fact; the head does not move yet.
        assert!(queue.update("EV2", |ev| ev.set_urgency(Level::Critical)));
        assert_eq!(queue.peek().unwrap().id(), "EV1");

        // A full re-sort surfaces it: same score, but EV1 is older.
        queue.reprioritize();
        assert_eq!(queue.pop().unwrap().id(), "EV1");
        assert_eq!(queue.pop().unwrap().id(), "EV2");
    }

    #[test]
    fn reprioritize_reorders_on_changed_scores() {
        let mut queue = EvacuationQueue::new();
        queue.push(evacuation("EV1", 500, Level::Medium)); // 2
        queue.push(evacuation("EV2", 500, Level::Low)); // 1

        assert!(queue.update("EV2", |ev| ev.set_urgency(Level::Critical)));
        queue.reprioritize();
        assert_eq!(queue.peek().unwrap().id(), "EV2");
    }

    #[test]
    fn refresh_mutates_and_rescores_every_entry() {
        let mut queue = EvacuationQueue::new();
        queue.push(evacuation("EV1", 500, Level::Medium)); // 2
        queue.push(evacuation("EV2", 500, Level::Low)); // 1

        queue.refresh(|ev| {
            if ev.id() == "EV2" {
                ev.set_urgency(Level::Critical);
            }
        });
        assert_eq!(queue.peek().unwrap().id(), "EV2");
    }

    #[test]
    fn pop_records_history() {
        let mut queue = EvacuationQueue::new();
        queue.push(evacuation("EV1", 500, Level::High));
        queue.pop();
        assert_eq!(queue.history().len(), 1);
        assert_eq!(queue.history()[0].id(), "EV1");
    }

    #[test]
    fn purge_drops_terminal_entries() {
        let mut queue = EvacuationQueue::new();
        queue.push(evacuation("keep", 500, Level::High));

        let mut done = evacuation("done", 500, Level::High);
        done.start().unwrap();
        done.cancel().unwrap();
        queue.push(done);

        queue.purge_terminal();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.peek().unwrap().id(), "keep");
    }

    #[test]
    fn critical_filter_uses_current_scores() {
        let mut queue = EvacuationQueue::new();
        queue.push(evacuation("hot", 6_000, Level::High)); // 5
        queue.push(evacuation("cold", 500, Level::Low)); // 1

        let critical = queue.critical();
        assert_eq!(critical.len(), 1);
        assert_eq!(critical[0].id(), "hot");
        assert!(critical[0].priority_score() >= CRITICAL_SCORE);
    }

    #[test]
    fn by_status_filters_pending_entries() {
        let mut queue = EvacuationQueue::new();
        queue.push(evacuation("EV1", 500, Level::High));
        assert_eq!(queue.by_status(EvacuationStatus::Planned).len(), 1);
        assert!(queue.by_status(EvacuationStatus::InProgress).is_empty());
    }
}
