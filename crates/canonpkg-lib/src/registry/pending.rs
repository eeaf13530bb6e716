//! In-flight slot: what waiters block on while a leader resolves a key.

use std::sync::{Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::error::ResolutionFailure;
use crate::types::TypedPackage;

pub(super) type Resolved = Result<TypedPackage, ResolutionFailure>;

#[derive(Default)]
pub(super) struct Pending {
    outcome: Mutex<Outcome>,
    ready: Condvar,
}

#[derive(Default)]
enum Outcome {
    #[default]
    Waiting,
    Done(Resolved),
    /// The leader went away without an answer. Waiters start over.
    Abandoned,
}

pub(super) enum Wait {
    Done(Resolved),
    Abandoned,
    TimedOut(Duration),
}

impl Pending {
    pub fn finish(&self, result: Resolved) {
        self.settle(Outcome::Done(result));
    }

    pub fn abandon(&self) {
        self.settle(Outcome::Abandoned);
    }

    fn settle(&self, outcome: Outcome) {
        let mut slot = self.outcome.lock().unwrap_or_else(PoisonError::into_inner);
        if matches!(*slot, Outcome::Waiting) {
            *slot = outcome;
        }
        drop(slot);
        self.ready.notify_all();
    }

    /// Block until the leader settles, or until `timeout` has passed.
    pub fn wait(&self, timeout: Option<Duration>) -> Wait {
        let started = Instant::now();
        let mut slot = self.outcome.lock().unwrap_or_else(PoisonError::into_inner);
        while matches!(*slot, Outcome::Waiting) {
            match timeout {
                None => {
                    slot = self.ready.wait(slot).unwrap_or_else(PoisonError::into_inner);
                }
                Some(limit) => {
                    let elapsed = started.elapsed();
                    if elapsed >= limit {
                        return Wait::TimedOut(elapsed);
                    }
                    slot = self
                        .ready
                        .wait_timeout(slot, limit - elapsed)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0;
                }
            }
        }
        match &*slot {
            Outcome::Done(result) => Wait::Done(result.clone()),
            Outcome::Abandoned => Wait::Abandoned,
            Outcome::Waiting => unreachable!("loop exits once settled"),
        }
    }
}
