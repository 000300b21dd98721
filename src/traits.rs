//! Core trait for layered dynamic programs.
//!
//! A layered DP computes one row (the *frontier*) per layer, each row only
//! from the previous one. The placement recurrence is of this shape: layer `t`
//! is the row `DP[t][0..=n]` of costs for `t` servers.
//!
//! Implementing [`LayeredProblem`] lets [`LayeredEngine`](crate::engine::LayeredEngine)
//! run the recurrence either keeping every arg-min row or keeping only
//! checkpoint rows and recomputing one block at a time while backtracking.

/// A fixed layered DP instance.
///
/// Semantics:
/// - There are `T = num_layers()` transitions, layers `0..=T`.
/// - `forward_step*(layer, f)` maps the frontier at `layer` to `layer + 1`.
/// - The choices returned alongside a step are enough to move a state at
///   `layer + 1` back to its optimal predecessor at `layer`.
pub trait LayeredProblem {
    /// A single state along the optimal path, e.g. a DP cell.
    type State: Clone + PartialEq;

    /// All DP values of one layer.
    type Frontier: Clone;

    /// Arg-min record of one transition.
    type Choices;

    /// Objective value.
    type Cost: Copy + PartialOrd;

    /// Number of transitions `T`.
    fn num_layers(&self) -> usize;

    /// Frontier at layer 0.
    fn init_frontier(&self) -> Self::Frontier;

    /// Advance from `layer` to `layer + 1`, discarding the arg-min record.
    ///
    /// Implementations can override this when the record is expensive to
    /// keep; the default delegates to [`forward_step_with_choices`].
    ///
    /// [`forward_step_with_choices`]: LayeredProblem::forward_step_with_choices
    fn forward_step(&self, layer: usize, frontier: &Self::Frontier) -> Self::Frontier {
        self.forward_step_with_choices(layer, frontier).0
    }

    /// Advance from `layer` to `layer + 1` and record the arg-min of every
    /// entry of the new frontier.
    ///
    /// Must be deterministic: recomputing a step from the same frontier has
    /// to yield the same choices, otherwise checkpointed backtracking drifts.
    fn forward_step_with_choices(
        &self,
        layer: usize,
        frontier: &Self::Frontier,
    ) -> (Self::Frontier, Self::Choices);

    /// Pick the terminal state at layer `T` and its cost, or `None` when no
    /// feasible state exists.
    fn terminal(&self, frontier_t: &Self::Frontier) -> Option<(Self::State, Self::Cost)>;

    /// Optimal predecessor at `layer` of `state` (which lives at `layer + 1`),
    /// using the choices recorded for that transition.
    fn predecessor(&self, layer: usize, choices: &Self::Choices, state: &Self::State)
        -> Self::State;
}
