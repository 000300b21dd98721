//! The placement recurrence and its backtracking.
//!
//! `DP[t][j]` is the cheapest way to serve the first `j` clients with exactly
//! `t` servers, each server owning a non-empty contiguous segment:
//!
//! ```text
//! DP[0][0] = 0,   DP[0][j > 0] = ∞
//! DP[t][j] = min_{t-1 <= p < j} DP[t-1][p] + Cost(p+1, j)      (1 <= t <= j)
//! ```
//!
//! Layer `t` of the recurrence is the row `DP[t][0..=n]`, so the placement is
//! a [`LayeredProblem`] and can run on the checkpointed
//! [`LayeredEngine`](crate::engine::LayeredEngine). [`PlacementTable`] is the
//! plain variant that keeps every row.
//!
//! Ties between split points are resolved towards the smallest `p`.

use crate::error::PlacementError;
use crate::segment::SegmentCostTable;
use crate::traits::LayeredProblem;
use crate::weight::Weight;

/// A DP cell: the first `clients` clients served by `servers` servers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cut {
    pub servers: usize,
    pub clients: usize,
}

/// One row `DP[t][0..=n]`; `None` marks an infeasible cell.
pub type CostRow<W> = Vec<Option<W>>;

/// Optimal split `p` for every cell of one row.
pub type SplitRow = Vec<Option<usize>>;

/// The placement recurrence over a prebuilt segment table.
#[derive(Clone, Copy, Debug)]
pub struct PlacementProblem<'a, W> {
    segments: &'a SegmentCostTable<W>,
    servers: usize,
}

impl<'a, W: Weight> PlacementProblem<'a, W> {
    /// Place `servers` servers on the clients of `segments`.
    ///
    /// No validation happens here; with more servers than clients the
    /// terminal cell is infeasible and engines report no solution.
    pub fn new(segments: &'a SegmentCostTable<W>, servers: usize) -> Self {
        Self { segments, servers }
    }

    pub fn segments(&self) -> &'a SegmentCostTable<W> {
        self.segments
    }

    pub fn servers(&self) -> usize {
        self.servers
    }

    fn clients(&self) -> usize {
        self.segments.clients()
    }
}

impl<W: Weight> LayeredProblem for PlacementProblem<'_, W> {
    type State = Cut;
    type Frontier = CostRow<W>;
    type Choices = SplitRow;
    type Cost = W;

    fn num_layers(&self) -> usize {
        self.servers
    }

    fn init_frontier(&self) -> CostRow<W> {
        let mut row = vec![None; self.clients() + 1];
        row[0] = Some(W::ZERO);
        row
    }

    fn forward_step_with_choices(&self, layer: usize, row: &CostRow<W>) -> (CostRow<W>, SplitRow) {
        let n = self.clients();
        let t = layer + 1;
        let mut next = vec![None; n + 1];
        let mut splits = vec![None; n + 1];
        // Zero clients cost nothing however many servers stand idle.
        next[0] = Some(W::ZERO);

        for j in t..=n {
            let mut best: Option<(W, usize)> = None;
            for p in (t - 1)..j {
                let Some(prefix) = row[p] else {
                    continue;
                };
                // A sum past the range of `W` exceeds every representable
                // candidate, so it can never be the minimum.
                let Some(candidate) = prefix.checked_add(self.segments.cost(p, j)) else {
                    continue;
                };
                if best.map_or(true, |(cost, _)| candidate < cost) {
                    best = Some((candidate, p));
                }
            }
            if let Some((cost, p)) = best {
                next[j] = Some(cost);
                splits[j] = Some(p);
            }
        }

        (next, splits)
    }

    fn terminal(&self, row: &CostRow<W>) -> Option<(Cut, W)> {
        let n = self.clients();
        let cost = row.get(n).copied().flatten()?;
        Some((
            Cut {
                servers: self.servers,
                clients: n,
            },
            cost,
        ))
    }

    fn predecessor(&self, layer: usize, splits: &SplitRow, state: &Cut) -> Cut {
        let p = splits[state.clients].expect("feasible cell records its split");
        Cut {
            servers: layer,
            clients: p,
        }
    }
}

/// Full `(k+1) × (n+1)` cost table plus the split of every cell.
#[derive(Clone, Debug)]
pub struct PlacementTable<'a, W> {
    problem: PlacementProblem<'a, W>,
    costs: Vec<CostRow<W>>,
    /// `splits[t - 1]` holds the splits of row `t`.
    splits: Vec<SplitRow>,
}

impl<'a, W: Weight> PlacementTable<'a, W> {
    /// Fill every row of the recurrence for `servers` servers.
    ///
    /// # Errors
    /// [`PlacementError::NoServers`] when `servers == 0`,
    /// [`PlacementError::TooManyServers`] when `servers` exceeds the number
    /// of clients, and [`PlacementError::CostOverflow`] when every way to
    /// serve all clients costs more than `W` can hold.
    pub fn build(segments: &'a SegmentCostTable<W>, servers: usize) -> Result<Self, PlacementError> {
        let clients = segments.clients();
        if servers == 0 {
            return Err(PlacementError::NoServers { clients });
        }
        if servers > clients {
            return Err(PlacementError::TooManyServers { servers, clients });
        }

        #[cfg(feature = "tracing")]
        let span = tracing::debug_span!("placement_table", servers, clients);
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        let problem = PlacementProblem::new(segments, servers);
        let mut costs = Vec::with_capacity(servers + 1);
        let mut splits = Vec::with_capacity(servers);
        costs.push(problem.init_frontier());
        for layer in 0..servers {
            let (row, split) = problem.forward_step_with_choices(layer, &costs[layer]);
            costs.push(row);
            splits.push(split);
        }

        if costs[servers][clients].is_none() {
            return Err(PlacementError::CostOverflow);
        }

        Ok(Self {
            problem,
            costs,
            splits,
        })
    }

    pub fn servers(&self) -> usize {
        self.problem.servers()
    }

    pub fn clients(&self) -> usize {
        self.problem.clients()
    }

    /// `DP[t][j]`, or `None` when the cell is infeasible or its cost does not
    /// fit `W`.
    ///
    /// # Panics
    /// Panics unless `t <= servers` and `j <= clients`.
    pub fn cost(&self, t: usize, j: usize) -> Option<W> {
        self.costs[t][j]
    }

    /// Split `p` realizing `DP[t][j]` for `t >= 1`; `None` for `t == 0` and
    /// for cells without a cost.
    ///
    /// # Panics
    /// Panics unless `t <= servers` and `j <= clients`.
    pub fn split(&self, t: usize, j: usize) -> Option<usize> {
        t.checked_sub(1).and_then(|row| self.splits[row][j])
    }

    /// `DP[k][n]`.
    pub fn min_cost(&self) -> W {
        self.costs[self.servers()][self.clients()]
            .expect("build rejects tables without a final cost")
    }

    /// Backtracked cells `(0, 0), ..., (k, n)`.
    pub fn cuts(&self) -> Vec<Cut> {
        let mut state = Cut {
            servers: self.servers(),
            clients: self.clients(),
        };
        let mut cuts = Vec::with_capacity(self.servers() + 1);
        cuts.push(state);
        for layer in (0..self.servers()).rev() {
            state = self.problem.predecessor(layer, &self.splits[layer], &state);
            cuts.push(state);
        }
        cuts.reverse();
        cuts
    }

    /// The optimal placement recorded in the table.
    pub fn placement(&self) -> Placement<W> {
        Placement::from_cuts(self.problem.segments(), self.min_cost(), &self.cuts())
    }
}

/// Clients `start..end` served from `server`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
    pub server: usize,
}

impl Segment {
    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn contains(&self, client: usize) -> bool {
        (self.start..self.end).contains(&client)
    }
}

/// Optimal server placement.
///
/// `servers` is strictly increasing and 0-indexed; `segments[i]` is the range
/// served by `servers[i]`, and the segments tile `0..n` in order.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Placement<W> {
    pub min_cost: W,
    pub servers: Vec<usize>,
    pub segments: Vec<Segment>,
}

impl<W: Weight> Placement<W> {
    /// Placement of zero servers on zero clients.
    pub fn empty() -> Self {
        Self {
            min_cost: W::ZERO,
            servers: Vec::new(),
            segments: Vec::new(),
        }
    }

    /// Turn a backtracked chain of cells into segments and servers.
    ///
    /// Consecutive cells `(t-1, p)` and `(t, j)` become the segment `p..j`
    /// served from its weighted median.
    pub fn from_cuts(segments: &SegmentCostTable<W>, min_cost: W, cuts: &[Cut]) -> Self {
        let segments: Vec<Segment> = cuts
            .windows(2)
            .map(|pair| {
                let (p, j) = (pair[0].clients, pair[1].clients);
                Segment {
                    start: p,
                    end: j,
                    server: segments.server(p, j),
                }
            })
            .collect();
        let servers = segments.iter().map(|s| s.server).collect();
        Self {
            min_cost,
            servers,
            segments,
        }
    }
}

/// `Σ w[i] · distance(i, nearest server)` for an arbitrary server set.
///
/// Returns `None` when there are clients but no servers, or when the sum does
/// not fit `W`.
pub fn service_cost<W: Weight>(weights: &[W], servers: &[usize]) -> Option<W> {
    let mut total = W::ZERO;
    for (i, &w) in weights.iter().enumerate() {
        let nearest = servers.iter().map(|&s| i.abs_diff(s)).min()?;
        total = total.checked_add(w.checked_mul(W::from_index(nearest)?)?)?;
    }
    Some(total)
}
