use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

/// The source of every random choice a generator makes.
///
/// Generators never reach for ambient randomness; injecting the source is what makes a layout
/// reproducible. Both methods panic on an empty range.
pub trait MazeRandom {
    /// A value in `[0, exclusive_max)`.
    fn range(&mut self, exclusive_max: usize) -> usize;

    /// A value in `[inclusive_min, exclusive_max)`.
    fn range_between(&mut self, inclusive_min: usize, exclusive_max: usize) -> usize;
}

impl<'a, R: MazeRandom + ?Sized> MazeRandom for &'a mut R {
    #[inline]
    fn range(&mut self, exclusive_max: usize) -> usize {
        (**self).range(exclusive_max)
    }

    #[inline]
    fn range_between(&mut self, inclusive_min: usize, exclusive_max: usize) -> usize {
        (**self).range_between(inclusive_min, exclusive_max)
    }
}

/// Thread local, OS seeded randomness.
#[derive(Debug, Clone)]
pub struct SystemRandom {
    rng: ThreadRng,
}

impl SystemRandom {
    pub fn new() -> SystemRandom {
        SystemRandom { rng: rand::thread_rng() }
    }
}

impl Default for SystemRandom {
    fn default() -> SystemRandom {
        SystemRandom::new()
    }
}

impl MazeRandom for SystemRandom {
    fn range(&mut self, exclusive_max: usize) -> usize {
        self.rng.gen_range(0..exclusive_max)
    }

    fn range_between(&mut self, inclusive_min: usize, exclusive_max: usize) -> usize {
        self.rng.gen_range(inclusive_min..exclusive_max)
    }
}

/// Deterministic randomness: the same seed replays the same maze.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> SeededRandom {
        SeededRandom { rng: StdRng::seed_from_u64(seed) }
    }
}

impl MazeRandom for SeededRandom {
    fn range(&mut self, exclusive_max: usize) -> usize {
        self.rng.gen_range(0..exclusive_max)
    }

    fn range_between(&mut self, inclusive_min: usize, exclusive_max: usize) -> usize {
        self.rng.gen_range(inclusive_min..exclusive_max)
    }
}

/// Always answers with the lowest value of the requested range.
#[derive(Debug, Copy, Clone, Default)]
pub struct MinimumRandom;

impl MazeRandom for MinimumRandom {
    fn range(&mut self, exclusive_max: usize) -> usize {
        assert!(exclusive_max > 0, "cannot sample empty range");
        0
    }

    fn range_between(&mut self, inclusive_min: usize, exclusive_max: usize) -> usize {
        assert!(inclusive_min < exclusive_max, "cannot sample empty range");
        inclusive_min
    }
}
