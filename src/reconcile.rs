//! Change detection between fetched payloads and what is on screen.
//!
//! Each polled domain owns one [`Reconciler`]. A fetch result only becomes a
//! new snapshot (and thus a re-render) when it differs from the current one;
//! failures leave the old snapshot in place.

use crate::utils::{Error, Result};
use std::fmt::Debug;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Fetching,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Updated,
    Unchanged,
    Failed(String),
}

/// Last accepted payload and how many times it was published.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    value: Option<T>,
    revision: u64,
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            value: None,
            revision: 0,
        }
    }
}

impl<T: PartialEq> Snapshot<T> {
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Stores `fresh` unless it equals the current value.
    pub fn accept(&mut self, fresh: T) -> bool {
        if self.value.as_ref() == Some(&fresh) {
            false
        } else {
            self.value = Some(fresh);
            self.revision += 1;
            true
        }
    }
}

#[derive(Debug)]
pub struct Reconciler<T> {
    domain: &'static str,
    snapshot: Snapshot<T>,
    in_flight: usize,
    last: Option<Outcome>,
}

impl<T: PartialEq + Debug> Reconciler<T> {
    pub fn new(domain: &'static str) -> Self {
        Self {
            domain,
            snapshot: Snapshot::default(),
            in_flight: 0,
            last: None,
        }
    }

    pub const fn domain(&self) -> &'static str {
        self.domain
    }

    /// Overlapping fetches are allowed; each `begin` must be matched by one `complete`.
    pub fn begin(&mut self) {
        self.in_flight += 1;
    }

    /// Applies results in completion order, so the last one to land wins.
    pub fn complete(&mut self, result: Result<T>) -> Outcome {
        self.in_flight = self.in_flight.saturating_sub(1);

        let outcome = match result {
            Ok(fresh) => {
                if self.snapshot.accept(fresh) {
                    info!(
                        domain = self.domain,
                        revision = self.snapshot.revision(),
                        "refreshed at {}",
                        chrono::Local::now().format("%H:%M:%S")
                    );
                    Outcome::Updated
                } else {
                    debug!(domain = self.domain, "unchanged");
                    Outcome::Unchanged
                }
            }
            Err(error) => {
                Self::log_failure(self.domain, &error);
                Outcome::Failed(error.to_string())
            }
        };

        self.last = Some(outcome.clone());
        outcome
    }

    fn log_failure(domain: &str, error: &Error) {
        match error.status() {
            Some(status) => error!(domain, %status, "polling error: {error}"),
            None => error!(domain, "polling error: {error}"),
        }
    }

    pub const fn phase(&self) -> Phase {
        if self.in_flight > 0 {
            Phase::Fetching
        } else {
            Phase::Idle
        }
    }

    pub const fn last_outcome(&self) -> Option<&Outcome> {
        self.last.as_ref()
    }

    pub fn snapshot(&self) -> Option<&T> {
        self.snapshot.get()
    }

    pub const fn revision(&self) -> u64 {
        self.snapshot.revision()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anyerr;

    fn reconciler() -> Reconciler<Vec<u32>> {
        Reconciler::new("test")
    }

    #[test]
    fn same_payload_publishes_once() {
        let mut rec = reconciler();
        rec.begin();
        assert_eq!(rec.complete(Ok(vec![1, 2])), Outcome::Updated);
        rec.begin();
        assert_eq!(rec.complete(Ok(vec![1, 2])), Outcome::Unchanged);
        assert_eq!(rec.revision(), 1);
    }

    #[test]
    fn different_payload_publishes_again() {
        let mut rec = reconciler();
        rec.complete(Ok(vec![1, 2]));
        assert_eq!(rec.complete(Ok(vec![2, 1])), Outcome::Updated);
        assert_eq!(rec.revision(), 2);
        assert_eq!(rec.snapshot(), Some(&vec![2, 1]));
    }

    #[test]
    fn failure_keeps_stale_snapshot() {
        let mut rec = reconciler();
        rec.complete(Ok(vec![7]));
        rec.begin();
        let outcome = rec.complete(Err(anyerr!("offline")));

        assert_eq!(outcome, Outcome::Failed("offline".into()));
        assert_eq!(rec.last_outcome(), Some(&outcome));
        assert_eq!(rec.snapshot(), Some(&vec![7]));
        assert_eq!(rec.revision(), 1);

        assert_eq!(rec.complete(Ok(vec![7])), Outcome::Unchanged);
    }

    #[test]
    fn first_failure_leaves_nothing() {
        let mut rec = reconciler();
        rec.complete(Err(anyerr!("offline")));
        assert_eq!(rec.snapshot(), None);
        assert_eq!(rec.revision(), 0);
    }

    #[test]
    fn overlapping_fetches() {
        let mut rec = reconciler();
        rec.begin();
        rec.begin();
        assert_eq!(rec.phase(), Phase::Fetching);

        // issued second, lands first
        rec.complete(Ok(vec![2]));
        assert_eq!(rec.phase(), Phase::Fetching);
        rec.complete(Ok(vec![1]));

        assert_eq!(rec.phase(), Phase::Idle);
        assert_eq!(rec.snapshot(), Some(&vec![1]));
        assert_eq!(rec.revision(), 2);
    }
}
