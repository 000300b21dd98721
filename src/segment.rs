//! Single-server segment costs.
//!
//! For every contiguous client range the table stores the cheapest position
//! for one server inside that range together with the resulting weighted
//! distance. The cheapest position is the lower weighted median of the range:
//! the first client at which the cumulative weight (from the left end of the
//! range) reaches half of the range total.
//!
//! Ranges are addressed by the split pair `(p, j)` used by the placement
//! recurrence: the segment after split `p` ending at client `j` covers the
//! 0-indexed clients `p..j`.

use crate::error::PlacementError;
use crate::weight::Weight;

/// Best single-server placement for one client range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentCost<W> {
    /// Sum of `w[i] * |i - server|` over the range.
    pub cost: W,
    /// 0-indexed client hosting the server.
    pub server: usize,
}

/// All-pairs table of [`SegmentCost`] values for a weight vector.
#[derive(Clone, Debug)]
pub struct SegmentCostTable<W> {
    weights: Vec<W>,
    /// `rows[p][j - p - 1]` describes clients `p..j`.
    rows: Vec<Vec<SegmentCost<W>>>,
}

impl<W: Weight> SegmentCostTable<W> {
    /// Validate `weights` and build the table in O(n^2).
    ///
    /// # Errors
    /// [`PlacementError::NoClients`] for an empty slice,
    /// [`PlacementError::InvalidWeight`] for the first negative, NaN or
    /// infinite entry, and [`PlacementError::CostOverflow`] when the total
    /// weight or the cost of a segment does not fit `W`.
    pub fn new(weights: &[W]) -> Result<Self, PlacementError> {
        if weights.is_empty() {
            return Err(PlacementError::NoClients);
        }
        if let Some((index, weight)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_admissible())
        {
            return Err(PlacementError::InvalidWeight {
                index,
                value: format!("{weight:?}"),
            });
        }

        #[cfg(feature = "tracing")]
        let span = tracing::debug_span!("segment_costs", clients = weights.len());
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        let rows = sweep(weights).ok_or(PlacementError::CostOverflow)?;

        Ok(Self {
            weights: weights.to_vec(),
            rows,
        })
    }

    /// Number of clients `n`.
    pub fn clients(&self) -> usize {
        self.weights.len()
    }

    /// The validated weights the table was built from.
    pub fn weights(&self) -> &[W] {
        &self.weights
    }

    /// Best placement for clients `p..j`.
    ///
    /// # Panics
    /// Panics unless `p < j <= n`.
    pub fn segment(&self, p: usize, j: usize) -> SegmentCost<W> {
        assert!(
            p < j && j <= self.clients(),
            "segment {p}..{j} outside 0..{}",
            self.clients()
        );
        self.rows[p][j - p - 1]
    }

    /// Cost of serving clients `p..j` from their weighted median.
    #[inline]
    pub fn cost(&self, p: usize, j: usize) -> W {
        self.segment(p, j).cost
    }

    /// Weighted median of clients `p..j` (lower one on ties).
    #[inline]
    pub fn server(&self, p: usize, j: usize) -> usize {
        self.segment(p, j).server
    }
}

/// Running sums of one table row `start..` while its right end grows.
///
/// Every sum starts at `start` and only ever adds non-negative terms.
struct RowSweep<W> {
    start: usize,
    /// Current lower median.
    median: usize,
    /// `Σ w[i]` over `start..=median`.
    left_mass: W,
    /// `Σ w[i]` over `start..end`.
    total: W,
    /// `Σ w[i] · (median - i)` over `start..=median`.
    left_cost: W,
}

impl<W: Weight> RowSweep<W> {
    fn new(start: usize, weight: W) -> Self {
        Self {
            start,
            median: start,
            left_mass: weight,
            total: W::ZERO,
            left_cost: W::ZERO,
        }
    }

    /// Whether clients `start..=median` carry at least half of the total.
    #[inline]
    fn covers_half(&self) -> bool {
        // A doubled left mass beyond the range is larger than any total.
        self.left_mass
            .checked_add(self.left_mass)
            .map_or(true, |twice| twice >= self.total)
    }

    /// Grow the row to end at `end` and move the median right until it
    /// covers half of the weight again.
    ///
    /// Moving the median one step right lengthens the distance of every
    /// client on its left by one, which adds `left_mass` to `left_cost`.
    fn extend(&mut self, weights: &[W], end: usize) -> Option<()> {
        self.total = self.total.checked_add(weights[end - 1])?;
        while self.median + 1 < end && !self.covers_half() {
            self.left_cost = self.left_cost.checked_add(self.left_mass)?;
            self.median += 1;
            self.left_mass = self.left_mass.checked_add(weights[self.median])?;
        }
        Some(())
    }
}

/// Build every row of the table, or `None` when a sum overflows `W`.
///
/// The right end `j` sweeps outward once for all rows. `right[m]` holds
/// `Σ w[i] · (i - m)` over `m+1..j`, the cost of the clients right of a
/// median at `m`; it is the same for every row whose median is `m`. An entry
/// that overflows stays `None`, which only matters once a row needs it. The
/// lower median never moves left as a row grows to the right, so each row
/// advances its median pointer at most `n` times.
fn sweep<W: Weight>(weights: &[W]) -> Option<Vec<Vec<SegmentCost<W>>>> {
    let n = weights.len();
    let mut rows: Vec<Vec<SegmentCost<W>>> =
        (0..n).map(|p| Vec::with_capacity(n - p)).collect();
    let mut right: Vec<Option<W>> = vec![Some(W::ZERO); n];
    let mut sweeps: Vec<RowSweep<W>> = Vec::with_capacity(n);

    for j in 1..=n {
        let client = j - 1;
        let weight = weights[client];
        for (m, sum) in right.iter_mut().enumerate().take(client) {
            *sum = sum.and_then(|acc| {
                let distance = W::from_index(client - m)?;
                acc.checked_add(weight.checked_mul(distance)?)
            });
        }
        sweeps.push(RowSweep::new(client, weight));

        for row in sweeps.iter_mut() {
            row.extend(weights, j)?;
            let cost = row.left_cost.checked_add(right[row.median]?)?;
            rows[row.start].push(SegmentCost {
                cost,
                server: row.median,
            });
        }
    }

    Some(rows)
}
