use std::sync::Mutex;

use rand::Rng;

/// Uniform random source in `[0, 1)`.
pub trait IRandom: Send + Sync {
    fn next_f64(&self) -> f64;

    /// Uniform integer in `[0, upper)`.
    fn next_below(&self, upper: u64) -> u64 {
        if upper == 0 {
            return 0;
        }
        ((self.next_f64() * upper as f64) as u64).min(upper - 1)
    }
}

/// Thread-local RNG from `rand`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl IRandom for ThreadRandom {
    fn next_f64(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Cycles through a fixed sequence of values.
#[derive(Debug)]
pub struct FixedRandom {
    values: Vec<f64>,
    cursor: Mutex<usize>,
}

impl FixedRandom {
    pub fn new(values: Vec<f64>) -> Self {
        let values = if values.is_empty() { vec![0.0] } else { values };
        Self {
            values,
            cursor: Mutex::new(0),
        }
    }

    /// Always returns `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl IRandom for FixedRandom {
    fn next_f64(&self) -> f64 {
        let mut cursor = match self.cursor.lock() {
            Ok(c) => c,
            Err(poisoned) => poisoned.into_inner(),
        };
        let value = self.values[*cursor % self.values.len()];
        *cursor += 1;
        value
    }
}
