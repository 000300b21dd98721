//! Error types for server placement.

/// Errors reported instead of a placement.
///
/// Every variant is a violation of the input contract. All but
/// [`PlacementError::CostOverflow`] are detected before any table is built;
/// that one is raised as soon as a sum leaves the range of the weight type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    /// There are no clients to serve.
    #[error("at least one client is required")]
    NoClients,

    /// Clients exist but no server may be placed.
    #[error("at least one server is required for {clients} clients")]
    NoServers { clients: usize },

    /// Each server needs a non-empty segment of its own.
    #[error("cannot place {servers} servers on {clients} clients")]
    TooManyServers { servers: usize, clients: usize },

    /// The declared client count disagrees with the weight list.
    #[error("declared {declared} clients but received {actual} weights")]
    LengthMismatch { declared: usize, actual: usize },

    /// A weight is negative, NaN or infinite.
    #[error("weight of client {index} is {value}; weights must be finite and non-negative")]
    InvalidWeight { index: usize, value: String },

    /// A weight sum or a cost does not fit the weight type.
    #[error("costs exceed the range of the weight type")]
    CostOverflow,
}

impl PlacementError {
    /// True for every caller-side contract violation (currently all variants).
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            PlacementError::NoClients
                | PlacementError::NoServers { .. }
                | PlacementError::TooManyServers { .. }
                | PlacementError::LengthMismatch { .. }
                | PlacementError::InvalidWeight { .. }
                | PlacementError::CostOverflow
        )
    }
}
