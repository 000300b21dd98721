use crate::{LayeredEngine, LayeredProblem};

/// Block size ⌈√T⌉ for a problem with `num_layers` transitions (at least 1).
///
/// Balances the number of stored checkpoints against the length of the
/// block replayed during backtracking.
#[inline]
pub fn default_block_size(num_layers: usize) -> usize {
    if num_layers <= 1 {
        1
    } else {
        (num_layers as f64).sqrt().ceil() as usize
    }
}

pub struct EngineBuilder<P: LayeredProblem> {
    problem: P,
    block_size: Option<usize>,
}

impl<P: LayeredProblem> EngineBuilder<P> {
    pub fn new(problem: P) -> Self {
        Self {
            problem,
            block_size: None,
        }
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = Some(block_size);
        self
    }

    /// Keep every arg-min record: a single block spanning all layers.
    pub fn full_table(mut self) -> Self {
        self.block_size = Some(self.problem.num_layers().max(1));
        self
    }

    pub fn build(self) -> LayeredEngine<P> {
        match self.block_size {
            Some(b) => LayeredEngine::with_block_size(self.problem, b),
            None => LayeredEngine::new(self.problem),
        }
    }
}
