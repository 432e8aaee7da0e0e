//! Client-side answers store.
//!
//! Holds the one live [`AnswerSet`]. Every write replaces the whole record and wakes all
//! subscribers so the views can re-render.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use once_cell::sync::Lazy;
use tokio::sync::{watch, Mutex, MutexGuard};

use crate::models::AnswerSet;

static GLOBAL_STORE: Lazy<Arc<AnswersStore>> =
    Lazy::new(|| Arc::new(AnswersStore::new(AnswerSet::defaults())));

/// State container for the current answers.
#[derive(Debug)]
pub struct AnswersStore {
    answers: watch::Sender<AnswerSet>,
    in_flight: AtomicUsize,
    mutation_gate: Mutex<()>,
}

impl AnswersStore {
    pub fn new(initial: AnswerSet) -> Self {
        let (answers, _) = watch::channel(initial);
        Self {
            answers,
            in_flight: AtomicUsize::new(0),
            mutation_gate: Mutex::new(()),
        }
    }

    /// The process-wide store, seeded with default answers.
    pub fn global() -> Arc<AnswersStore> {
        Arc::clone(&GLOBAL_STORE)
    }

    /// Snapshot of the current answers.
    pub fn get_answers(&self) -> AnswerSet {
        self.answers.borrow().clone()
    }

    /// Replace the stored answers and notify subscribers.
    pub fn set_answers(&self, next: AnswerSet) {
        self.answers.send_replace(next);
        tracing::debug!(
            subscribers = self.answers.receiver_count(),
            "Answers replaced"
        );
    }

    /// Receiver that is marked changed on every write.
    pub fn subscribe(&self) -> watch::Receiver<AnswerSet> {
        self.answers.subscribe()
    }

    /// Whether a mutation is waiting for or holding the gate.
    pub fn is_mutating(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Wait for exclusive access for one mutation round-trip.
    ///
    /// Mutations run one at a time in the order they asked, so the last issued write wins.
    pub async fn begin_mutation(&self) -> MutationPermit<'_> {
        let in_flight = InFlight::enter(&self.in_flight);
        let guard = self.mutation_gate.lock().await;
        MutationPermit {
            _guard: guard,
            _in_flight: in_flight,
        }
    }
}

impl Default for AnswersStore {
    fn default() -> Self {
        Self::new(AnswerSet::defaults())
    }
}

/// Held for the duration of one mutation.
pub struct MutationPermit<'a> {
    _guard: MutexGuard<'a, ()>,
    _in_flight: InFlight<'a>,
}

/// Counts a mutation from the moment it asks for the gate, even if it is dropped while waiting.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
