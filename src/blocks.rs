//! Block-level data kept by the engine between its two passes.
//!
//! A `Checkpoint` covers the layer interval [start, end) and stores the
//! frontier at `start`, which is all that is needed to recompute the arg-min
//! rows of the block during backtracking.

/// Stored frontier for a contiguous interval of layers [start, end).
#[derive(Debug, Clone)]
pub struct Checkpoint<F> {
    /// Inclusive start layer.
    pub start: usize,
    /// Exclusive end layer.
    pub end: usize,
    /// Frontier at layer `start`.
    pub frontier: F,
}

impl<F> Checkpoint<F> {
    /// Number of transitions replayed from this checkpoint.
    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Layers whose transitions this checkpoint replays.
    #[inline]
    pub fn layers(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}
