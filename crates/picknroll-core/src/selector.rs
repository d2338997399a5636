use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Draw a uniform index in `[0, len)` that differs from `last` when possible.
///
/// With a single candidate the no-repeat rule is waived and `0` is returned
/// without drawing.
///
/// # Panics
///
/// Panics if `len == 0`. Callers check the candidate count first.
pub fn pick_index<R: Rng + ?Sized>(len: usize, last: Option<usize>, rng: &mut R) -> usize {
    assert!(len > 0, "pick_index called on an empty candidate pool");
    if len == 1 {
        return 0;
    }
    loop {
        let i = rng.random_range(0..len);
        if Some(i) != last {
            return i;
        }
    }
}

/// Random candidate picker that never repeats its previous pick.
pub struct RandomSelector {
    rng: StdRng,
    last: Option<usize>,
}

impl RandomSelector {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { rng, last: None }
    }

    /// Pick the next index for a pool of `len` candidates.
    pub fn roll(&mut self, len: usize) -> usize {
        let index = pick_index(len, self.last, &mut self.rng);
        self.last = Some(index);
        index
    }

    pub fn last(&self) -> Option<usize> {
        self.last
    }

    /// Forget the previous pick so the next roll is unconstrained.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
