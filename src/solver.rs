//! Entry point: validate `(N, K, W)` and return the optimal placement.

use std::num::NonZeroUsize;

use crate::builder::EngineBuilder;
use crate::error::PlacementError;
use crate::placement::{Placement, PlacementProblem, PlacementTable};
use crate::segment::SegmentCostTable;
use crate::weight::Weight;

/// How the placement recurrence is evaluated.
///
/// Both strategies return the same placement; they differ in how many DP
/// rows stay alive during backtracking.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Keep all `k + 1` cost rows and `k` split rows.
    #[default]
    FullTable,
    /// Keep one row per block of `block_size` layers and replay a block at a
    /// time while backtracking. `None` uses ⌈√k⌉.
    Checkpointed { block_size: Option<NonZeroUsize> },
}

/// Configured placement solver.
///
/// ```
/// use line_kmedian::{PlacementSolver, Strategy};
///
/// let solver = PlacementSolver::new().with_strategy(Strategy::Checkpointed { block_size: None });
/// let placement = solver.solve(3, 1, &[1u64, 1, 1]).unwrap();
/// assert_eq!(placement.min_cost, 2);
/// assert_eq!(placement.servers, vec![1]);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct PlacementSolver {
    strategy: Strategy,
}

impl PlacementSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Place `servers` servers on `clients` clients weighted by `weights`.
    ///
    /// `clients == 0 && servers == 0` with no weights yields the empty
    /// placement.
    ///
    /// # Errors
    /// Length mismatch, no clients, no servers, more servers than clients,
    /// or an inadmissible weight, checked in that order before any table is
    /// built. [`PlacementError::CostOverflow`] when sums of weights or costs
    /// leave the range of `W`.
    pub fn solve<W: Weight>(
        &self,
        clients: usize,
        servers: usize,
        weights: &[W],
    ) -> Result<Placement<W>, PlacementError> {
        #[cfg(feature = "tracing")]
        let span = tracing::info_span!("place_servers", clients, servers, strategy = ?self.strategy);
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        validate_counts(clients, servers, weights.len())?;
        if clients == 0 {
            return Ok(Placement::empty());
        }

        let segments = SegmentCostTable::new(weights)?;
        let placement = match self.strategy {
            Strategy::FullTable => PlacementTable::build(&segments, servers)?.placement(),
            Strategy::Checkpointed { block_size } => {
                let builder = EngineBuilder::new(PlacementProblem::new(&segments, servers));
                let engine = match block_size {
                    Some(b) => builder.with_block_size(b.get()),
                    None => builder,
                }
                .build();
                // Counts are validated, so only an overflow leaves no terminal.
                let (min_cost, cuts) = engine.run().ok_or(PlacementError::CostOverflow)?;
                Placement::from_cuts(&segments, min_cost, &cuts)
            }
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(min_cost = ?placement.min_cost, servers = ?placement.servers, "placement found");

        Ok(placement)
    }
}

fn validate_counts(clients: usize, servers: usize, weights: usize) -> Result<(), PlacementError> {
    if weights != clients {
        return Err(PlacementError::LengthMismatch {
            declared: clients,
            actual: weights,
        });
    }
    match (clients, servers) {
        (0, 0) => Ok(()),
        (0, _) => Err(PlacementError::NoClients),
        (_, 0) => Err(PlacementError::NoServers { clients }),
        _ if servers > clients => Err(PlacementError::TooManyServers { servers, clients }),
        _ => Ok(()),
    }
}

/// Optimal placement with the default solver.
///
/// ```
/// let placement = line_kmedian::place_servers(5, 5, &[3u64, 1, 4, 1, 5]).unwrap();
/// assert_eq!(placement.min_cost, 0);
/// assert_eq!(placement.servers, vec![0, 1, 2, 3, 4]);
/// ```
///
/// # Errors
/// See [`PlacementSolver::solve`].
pub fn place_servers<W: Weight>(
    clients: usize,
    servers: usize,
    weights: &[W],
) -> Result<Placement<W>, PlacementError> {
    PlacementSolver::new().solve(clients, servers, weights)
}
