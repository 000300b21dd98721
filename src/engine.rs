//! Checkpointed engine for layered DPs.
//!
//! This module implements the two-phase algorithm:
//! 1. A forward pass that stores one frontier per block of `block_size`
//!    layers and keeps only the running frontier in between.
//! 2. A backward pass that walks the blocks from last to first, replays each
//!    block from its checkpoint to recover the arg-min records, and follows
//!    predecessors through them.
//!
//! Live memory is O((T / b + b) · W) frontiers' worth instead of O(T · W),
//! where W is the frontier width and b the block size; b ≈ √T balances the two.
//! The forward work roughly doubles. The engine is generic over
//! implementations of [`LayeredProblem`].

use crate::blocks::Checkpoint;
use crate::builder::default_block_size;
use crate::traits::LayeredProblem;

/// Checkpointed DP engine for a given problem instance `P`.
///
/// ```
/// use line_kmedian::{LayeredEngine, PlacementProblem, SegmentCostTable};
///
/// let table = SegmentCostTable::new(&[1u64, 1, 1, 1]).unwrap();
/// let engine = LayeredEngine::new(PlacementProblem::new(&table, 2));
/// let (cost, cuts) = engine.run().unwrap();
/// assert_eq!(cost, 2);
/// assert_eq!(cuts.len(), 3);
/// ```
pub struct LayeredEngine<P: LayeredProblem> {
    problem: P,
    block_size: usize,
}

impl<P: LayeredProblem> LayeredEngine<P> {
    /// Create a new engine with a heuristic block size (≈ √T).
    pub fn new(problem: P) -> Self {
        let b = default_block_size(problem.num_layers());
        Self::with_block_size(problem, b)
    }

    /// Create a new engine with an explicit block size.
    ///
    /// # Panics
    /// Panics if `block_size == 0`.
    pub fn with_block_size(problem: P, block_size: usize) -> Self {
        assert!(block_size > 0, "block_size must be positive");
        Self {
            problem,
            block_size,
        }
    }

    /// Expose immutable reference to the underlying problem.
    pub fn problem(&self) -> &P {
        &self.problem
    }

    /// Return the configured block size.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Phase I: run the recurrence to layer `T`, storing a checkpoint at the
    /// start of every block.
    ///
    /// Returns the checkpoints covering [0, T) and the frontier at layer `T`.
    fn build_checkpoints(&self) -> (Vec<Checkpoint<P::Frontier>>, P::Frontier) {
        let t = self.problem.num_layers();
        let b = self.block_size;
        let num_blocks = if t == 0 { 0 } else { t.div_ceil(b) };

        let mut checkpoints = Vec::with_capacity(num_blocks);
        let mut frontier = self.problem.init_frontier();

        for k in 0..num_blocks {
            let start = k * b;
            let end = ((k + 1) * b).min(t);
            #[cfg(feature = "tracing")]
            let span = tracing::trace_span!("forward_block", block = k, start, end);
            #[cfg(feature = "tracing")]
            let _enter = span.enter();

            let mut next = frontier.clone();
            for layer in start..end {
                next = self.problem.forward_step(layer, &next);
            }
            checkpoints.push(Checkpoint {
                start,
                end,
                frontier,
            });
            frontier = next;
        }

        (checkpoints, frontier)
    }

    /// Recompute the arg-min records of every transition in `checkpoint`.
    fn replay(&self, checkpoint: &Checkpoint<P::Frontier>) -> Vec<P::Choices> {
        #[cfg(feature = "tracing")]
        let span = tracing::trace_span!(
            "replay_block",
            start = checkpoint.start,
            end = checkpoint.end
        );
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        let mut choices = Vec::with_capacity(checkpoint.len());
        let mut frontier = checkpoint.frontier.clone();
        for layer in checkpoint.layers() {
            let (next, record) = self.problem.forward_step_with_choices(layer, &frontier);
            choices.push(record);
            frontier = next;
        }
        choices
    }

    /// Run the DP and backtrack an optimal path.
    ///
    /// Returns `(optimal_cost, states)` with one state per layer `0..=T`,
    /// layer 0 first, or `None` when the problem reports no feasible terminal
    /// state.
    pub fn run(&self) -> Option<(P::Cost, Vec<P::State>)> {
        #[cfg(feature = "tracing")]
        let span = tracing::debug_span!(
            "layered_run",
            layers = self.problem.num_layers(),
            block_size = self.block_size
        );
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        let (checkpoints, frontier_t) = self.build_checkpoints();
        let (terminal, cost) = self.problem.terminal(&frontier_t)?;

        let mut path = Vec::with_capacity(self.problem.num_layers() + 1);
        let mut state = terminal;
        path.push(state.clone());
        for checkpoint in checkpoints.iter().rev() {
            let choices = self.replay(checkpoint);
            for (layer, record) in checkpoint.layers().zip(&choices).rev() {
                state = self.problem.predecessor(layer, record, &state);
                path.push(state.clone());
            }
        }
        path.reverse();

        Some((cost, path))
    }
}
