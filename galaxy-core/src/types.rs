/// Identifier for a system in a [`crate::graph::Graph`].
///
/// This is an index into `Graph::systems`, and is only meaningful within
/// the lifetime of a given `Graph` instance.
pub type SystemId = usize;

/// Identifier for a fleet in a [`crate::fleet::FleetRegistry`].
///
/// This is an index into `FleetRegistry::fleets`, and is only meaningful
/// within the lifetime of a given registry.
pub type FleetId = usize;

/// Stable identity of a ship, assigned once at spawn time.
///
/// Unlike the index aliases above, a `ShipId` follows the ship when it
/// moves between fleets.
pub type ShipId = usize;
