use crate::common::NonEmpty;
use crate::roll::Roller;

/// A finite set of values handed out without replacement.
///
/// Lives for one stat-block generation. Once every value has been drawn the
/// pool is refilled and shuffled again instead of running dry, so asking for
/// more values than the pool holds repeats values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawPool<T> {
    source: NonEmpty<T>,
    remaining: Vec<T>,
}

impl<T: Copy> DrawPool<T> {
    pub fn shuffled<R: Roller>(source: NonEmpty<T>, roller: &mut R) -> Self {
        let mut pool = Self {
            source,
            remaining: Vec::new(),
        };
        pool.refill(roller);
        pool
    }

    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    pub fn draw<R: Roller>(&mut self, roller: &mut R) -> T {
        if self.remaining.is_empty() {
            tracing::debug!(size = self.source.len(), "draw pool exhausted; reshuffling");
            self.refill(roller);
        }
        // `source` is non-empty, so a refilled pool always has a value
        self.remaining.pop().unwrap_or(*self.source.first())
    }

    fn refill<R: Roller>(&mut self, roller: &mut R) {
        self.remaining = self.source.to_vec();
        roller.shuffle(&mut self.remaining);
    }
}
