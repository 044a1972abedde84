//! Motivational messages attached to lookup results.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

pub const PASSED_QUOTES: [&str; 3] = [
    "Congratulations! Your hard work has paid off. Keep pushing forward!",
    "Success is the sum of small efforts repeated day in and day out. Well done!",
    "You've proven that you have what it takes. Now, aim even higher!",
];

pub const FAILED_QUOTES: [&str; 3] = [
    "Every setback is a setup for a comeback. Keep your head up and try again!",
    "Failure is not the opposite of success, it's part of success. Learn from this and grow stronger!",
    "The only true failure is giving up. You've got this, keep pushing forward!",
];

/// Picks a message uniformly at random from the pool for an outcome.
pub struct QuoteSelector {
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl QuoteSelector {
    /// Selector seeded from OS entropy
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic selector, same seed gives the same sequence
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng<R: RngCore + Send + 'static>(rng: R) -> Self {
        Self {
            rng: Mutex::new(Box::new(rng)),
        }
    }

    pub fn pool(passed: bool) -> &'static [&'static str] {
        if passed {
            &PASSED_QUOTES
        } else {
            &FAILED_QUOTES
        }
    }

    pub fn pick_message(&self, passed: bool) -> String {
        let pool = Self::pool(passed);
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let index = rng.gen_range(0..pool.len());
        pool[index].to_string()
    }
}

impl Default for QuoteSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for QuoteSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuoteSelector").finish_non_exhaustive()
    }
}
