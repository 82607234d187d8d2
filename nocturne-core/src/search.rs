//! Parallel attempt search over nonces.
//!
//! Workers receive one shared [`Job`] and then a nonce at a time. The
//! coordinator hands out nonces in increasing order and stops once every
//! nonce below the best success has been tried, so the result does not
//! depend on the number of workers or on thread timing.

use std::collections::BTreeMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use log::{debug, info};

use crate::catalog::Catalog;
use crate::options::RelicLocations;
use crate::placement::{place_relics, Placement};
use crate::seed::phase_rng;
use crate::{RandomiserError, Result};

/// Everything an attempt needs. Immutable and shared by all workers.
#[derive(Clone, Debug)]
pub struct Job {
    pub catalog: Catalog,
    pub relics: RelicLocations,
    pub version: String,
    /// Canonical options string, part of the RNG salt.
    pub options: String,
    pub seed: String,
}

impl Job {
    pub fn attempt(&self, nonce: u64) -> Result<Placement> {
        let mut rng = phase_rng(&self.version, &self.options, &self.seed, nonce);
        place_relics(&self.catalog, &self.relics, nonce, &mut rng)
    }
}

#[derive(Debug)]
pub enum Request {
    Bootstrap(Arc<Job>),
    Continue(u64),
    Cancel,
}

#[derive(Debug)]
pub enum Response {
    /// The attempt failed verification.
    Progress { worker: usize, nonce: u64 },
    Done { worker: usize, nonce: u64, placement: Box<Placement> },
    Error { worker: usize, nonce: u64, error: RandomiserError },
}

pub fn worker_count(cores: usize) -> usize {
    (3 * cores / 4).max(1)
}

pub fn default_workers() -> usize {
    worker_count(thread::available_parallelism().map_or(1, |n| n.get()))
}

fn work(worker: usize, requests: Receiver<Request>, responses: Sender<Response>) {
    let mut job: Option<Arc<Job>> = None;
    while let Ok(request) = requests.recv() {
        let nonce = match request {
            Request::Bootstrap(shared) => {
                job = Some(shared);
                continue;
            }
            Request::Continue(nonce) => nonce,
            Request::Cancel => break,
        };
        let Some(job) = &job else {
            continue;
        };
        let response = match job.attempt(nonce) {
            Ok(placement) => Response::Done { worker, nonce, placement: Box::new(placement) },
            Err(RandomiserError::Verification(reason)) => {
                debug!("attempt {} rejected: {}", nonce, reason);
                Response::Progress { worker, nonce }
            }
            Err(error) => Response::Error { worker, nonce, error },
        };
        if responses.send(response).is_err() {
            break;
        }
    }
}

struct Pool {
    requests: Vec<Sender<Request>>,
    handles: Vec<thread::JoinHandle<()>>,
}

impl Pool {
    fn cancel(self) -> Result<()> {
        for requests in &self.requests {
            let _ = requests.send(Request::Cancel);
        }
        drop(self.requests);
        for handle in self.handles {
            handle
                .join()
                .map_err(|_| RandomiserError::Config("search worker panicked".to_string()))?;
        }
        Ok(())
    }
}

/// Try nonces `nonce_start..nonce_start + budget` and return the successful
/// attempt with the lowest nonce.
pub fn search(job: Arc<Job>, workers: usize, nonce_start: u64, budget: u64) -> Result<Placement> {
    let workers = workers.max(1);
    let end = nonce_start.saturating_add(budget);
    let (responses, results) = mpsc::channel();
    let mut pool = Pool { requests: Vec::new(), handles: Vec::new() };
    for worker in 0..workers {
        let (requests, inbox) = mpsc::channel();
        let responses = responses.clone();
        pool.handles.push(thread::spawn(move || work(worker, inbox, responses)));
        pool.requests.push(requests);
    }
    drop(responses);

    let mut next = nonce_start;
    let mut outstanding = 0usize;
    for requests in &pool.requests {
        if next >= end {
            break;
        }
        let sent = requests.send(Request::Bootstrap(Arc::clone(&job))).is_ok()
            && requests.send(Request::Continue(next)).is_ok();
        if sent {
            next += 1;
            outstanding += 1;
        }
    }

    let mut found: BTreeMap<u64, Box<Placement>> = BTreeMap::new();
    let mut failure: Option<RandomiserError> = None;
    while outstanding > 0 {
        let Ok(response) = results.recv() else {
            break;
        };
        outstanding -= 1;
        let worker = match response {
            Response::Progress { worker, .. } => worker,
            Response::Done { worker, nonce, placement } => {
                found.insert(nonce, placement);
                worker
            }
            Response::Error { nonce, error, .. } => {
                debug!("attempt {} failed: {}", nonce, error);
                failure = Some(error);
                break;
            }
        };
        let best = found.keys().next().copied().unwrap_or(u64::MAX);
        if next < end && next < best && pool.requests[worker].send(Request::Continue(next)).is_ok() {
            next += 1;
            outstanding += 1;
        }
    }
    pool.cancel()?;

    if let Some(error) = failure {
        return Err(error);
    }
    match found.into_iter().next() {
        Some((nonce, placement)) => {
            info!("relics placed after {} attempts", nonce - nonce_start + 1);
            Ok(*placement)
        }
        None => Err(RandomiserError::Config(format!(
            "no satisfying assignment found in {} attempts",
            budget
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::RELIC_ATTEMPT_NONCE;
    use crate::options::{ComplexityGoal, LocationLocks};

    fn job(relics: RelicLocations) -> Arc<Job> {
        Arc::new(Job {
            catalog: Catalog::standard(),
            relics,
            version: "0.0.0-test".to_string(),
            options: "r".to_string(),
            seed: "search".to_string(),
        })
    }

    fn gated() -> RelicLocations {
        let mut relics = RelicLocations::default();
        relics.locations.insert(
            "B".to_string(),
            LocationLocks { locks: vec!["L".to_string()], escapes: vec![] },
        );
        relics.locations.insert(
            "M".to_string(),
            LocationLocks { locks: vec!["B".to_string()], escapes: vec![] },
        );
        relics.goal = Some(ComplexityGoal { min: 3, max: Some(3), goals: vec!["V".to_string()] });
        relics
    }

    #[test]
    fn worker_counts_leave_headroom() {
        assert_eq!(worker_count(1), 1);
        assert_eq!(worker_count(4), 3);
        assert_eq!(worker_count(8), 6);
    }

    #[test]
    fn results_do_not_depend_on_worker_count() {
        let job = job(gated());
        let single = search(Arc::clone(&job), 1, RELIC_ATTEMPT_NONCE, 20_000).unwrap();
        let many = search(job, 4, RELIC_ATTEMPT_NONCE, 20_000).unwrap();
        assert_eq!(single.nonce, many.nonce);
        assert_eq!(single.assignments(), many.assignments());
        assert_eq!(single.depth, Some(3));
    }

    #[test]
    fn lowest_nonce_wins() {
        let job = job(gated());
        let found = search(Arc::clone(&job), 3, RELIC_ATTEMPT_NONCE, 20_000).unwrap();
        for nonce in RELIC_ATTEMPT_NONCE..found.nonce {
            assert!(matches!(job.attempt(nonce), Err(RandomiserError::Verification(_))));
        }
    }

    #[test]
    fn exhausted_budgets_are_configuration_errors() {
        let mut relics = gated();
        relics.goal = Some(ComplexityGoal { min: 40, max: None, goals: vec!["V".to_string()] });
        let result = search(job(relics), 2, RELIC_ATTEMPT_NONCE, 50);
        assert!(matches!(result, Err(RandomiserError::Config(_))));
    }

    #[test]
    fn configuration_errors_stop_the_search() {
        let relics = RelicLocations {
            thrust_sword_ability: Some(true),
            ..RelicLocations::default()
        };
        let result = search(job(relics), 2, RELIC_ATTEMPT_NONCE, 1_000);
        assert!(matches!(result, Err(RandomiserError::Config(_))));
    }
}
