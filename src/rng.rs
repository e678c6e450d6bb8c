//! Sources for the number a guess is checked against.
//!
//! The service only ever asks for "a number in `[min, max]`", so anything
//! implementing [`NumberSource`] can stand in: the thread RNG in production,
//! a seeded generator for reproducible runs, or a scripted list in tests.

use std::sync::{Mutex, PoisonError};

use rand::{Rng, SeedableRng, distributions::Uniform, rngs::StdRng};

pub trait NumberSource: Send + Sync {
    /// Return a number in the inclusive range `[min, max]`.
    fn draw(&self, min: i64, max: i64) -> i64;
}

/// Return a random integer in the inclusive range [min, max].
pub fn rand_in_range(min: i64, max: i64) -> i64 {
    let mut rng = rand::thread_rng();
    let distr = Uniform::new_inclusive(min, max);
    rng.sample(distr)
}

/// Uniform draws from the thread-local RNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadRngSource;

impl NumberSource for ThreadRngSource {
    fn draw(&self, min: i64, max: i64) -> i64 {
        rand_in_range(min, max)
    }
}

/// Uniform draws from a seeded `StdRng`; the same seed replays the same
/// sequence of targets.
#[derive(Debug)]
pub struct SeededSource {
    inner: Mutex<StdRng>,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl NumberSource for SeededSource {
    fn draw(&self, min: i64, max: i64) -> i64 {
        let mut rng = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        rng.sample(Uniform::new_inclusive(min, max))
    }
}

/// Hands out a fixed sequence, starting over when it runs out. Each value is
/// clamped into the requested range.
#[derive(Debug)]
pub struct ScriptedNumbers {
    values: Vec<i64>,
    next: Mutex<usize>,
}

impl ScriptedNumbers {
    pub fn new(values: impl IntoIterator<Item = i64>) -> Self {
        Self {
            values: values.into_iter().collect(),
            next: Mutex::new(0),
        }
    }
}

impl NumberSource for ScriptedNumbers {
    fn draw(&self, min: i64, max: i64) -> i64 {
        if self.values.is_empty() {
            return min;
        }
        let mut next = self.next.lock().unwrap_or_else(PoisonError::into_inner);
        let value = self.values[*next % self.values.len()];
        *next = next.wrapping_add(1);
        value.clamp(min, max)
    }
}
