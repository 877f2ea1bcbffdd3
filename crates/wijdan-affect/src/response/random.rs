//! Injectable randomness for phrase selection

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform choices
pub trait RandomSource: Send {
    /// An index in `0..len`; `len` is never zero
    fn pick(&mut self, len: usize) -> usize;
}

/// Pick one item of `items`, `None` when empty
pub fn choose<'a, R>(rng: &mut R, items: &'a [String]) -> Option<&'a str>
where
    R: RandomSource + ?Sized,
{
    if items.is_empty() {
        return None;
    }

    let index = rng.pick(items.len()).min(items.len() - 1);
    Some(items[index].as_str())
}

/// Standard generator, seeded from entropy unless a seed is given
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    /// Seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded for reproducible choices
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for StdRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for StdRandom {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Always picks the same index (wrapped to the pool size)
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedRandom(pub usize);

impl RandomSource for FixedRandom {
    fn pick(&mut self, len: usize) -> usize {
        self.0 % len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> Vec<String> {
        vec!["a".to_string(), "b".to_string(), "c".to_string()]
    }

    #[test]
    fn test_choose_empty() {
        assert!(choose(&mut FixedRandom(0), &[]).is_none());
    }

    #[test]
    fn test_fixed_wraps() {
        assert_eq!(choose(&mut FixedRandom(4), &pool()), Some("b"));
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let items = pool();
        let mut a = StdRandom::seeded(42);
        let mut b = StdRandom::seeded(42);
        for _ in 0..10 {
            assert_eq!(choose(&mut a, &items), choose(&mut b, &items));
        }
    }
}
