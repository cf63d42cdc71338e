use crate::types::{FleetId, SystemId};
use std::fmt;

/// Errors reported by core operations.
///
/// Everything except [`CoreError::InvalidConfig`] is a recoverable
/// operation failure: the request is refused, no state is mutated, and
/// the simulation keeps running.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Configuration rejected before generation started.
    InvalidConfig(String),
    /// Rejection sampling exceeded the per-system attempt cap.
    LayoutInfeasible { node: usize, attempts: u32 },
    /// A system handle was out of range for the current graph.
    UnknownSystem(SystemId),
    /// A fleet handle was out of range for the current registry.
    UnknownFleet(FleetId),
    /// The fleet is already the subject of a running travel task.
    FleetBusy(FleetId),
}

/// Type alias for Results using [`CoreError`].
pub type CoreResult<T> = Result<T, CoreError>;

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CoreError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            CoreError::LayoutInfeasible { node, attempts } => write!(
                f,
                "no feasible position for system {} after {} attempts",
                node, attempts
            ),
            CoreError::UnknownSystem(id) => write!(f, "unknown system {}", id),
            CoreError::UnknownFleet(id) => write!(f, "unknown fleet {}", id),
            CoreError::FleetBusy(id) => write!(f, "fleet {} is already in transit", id),
        }
    }
}

impl std::error::Error for CoreError {}
