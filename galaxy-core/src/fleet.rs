//! Ships, fleets and the fleet registry.
//!
//! A fleet exclusively owns its ships; ownership of a ship moves between
//! fleets only through [`FleetRegistry::split_fleet`], which removes and
//! appends in one step. The association between a system and "its" fleet
//! is a lookup relation ([`FleetRegistry::fleet_at`]), not a reference
//! held by the system.

use crate::{
    config::Config,
    error::{CoreError, CoreResult},
    graph::Graph,
    math,
    types::{FleetId, ShipId, SystemId},
};
use glam::Vec3;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShipState {
    Idle,
    Transiting,
}

#[derive(Debug, Clone)]
pub struct Ship {
    pub id: ShipId,
    pub pos: Vec3,
    pub state: ShipState,
    /// Orbit center while idle, transit anchor while transiting.
    pub target: Vec3,
    pub orbit_radius: f32,
    /// Relative offset captured when a transit begins. Only meaningful
    /// while the state is [`ShipState::Transiting`]; recomputed on every
    /// transition, never reused across transits.
    pub offset: Vec3,
}

impl Ship {
    fn spawn(id: ShipId, owner_pos: Vec3, orbit_radius: f32, rng: &mut impl Rng) -> Self {
        let pos = owner_pos + math::random_unit_sphere(rng) * orbit_radius;
        Self {
            id,
            pos,
            state: ShipState::Idle,
            target: owner_pos,
            orbit_radius,
            offset: Vec3::ZERO,
        }
    }

    /// Captures the current relative offset and switches into transit
    /// toward `target`.
    pub(crate) fn begin_transit(&mut self, target: Vec3, orbit_radius: f32) {
        self.offset = self.pos - target;
        self.target = target;
        self.orbit_radius = orbit_radius;
        self.state = ShipState::Transiting;
    }
}

/// An ordered collection of ships associated with at most one system.
///
/// A fleet fresh out of a split has no owner until a travel task
/// completes and assigns one.
#[derive(Debug, Clone, Default)]
pub struct Fleet {
    pub ships: Vec<Ship>,
    owner: Option<SystemId>,
}

impl Fleet {
    pub fn owner(&self) -> Option<SystemId> {
        self.owner
    }

    /// Reassigns the owner and pushes the new orbit center and radius to
    /// every contained ship.
    pub fn set_owner(&mut self, owner: SystemId, owner_pos: Vec3, orbit_radius: f32) {
        self.owner = Some(owner);
        for ship in &mut self.ships {
            ship.target = owner_pos;
            ship.orbit_radius = orbit_radius;
        }
    }
}

/// All known fleets, plus the ship id counter.
#[derive(Debug, Default)]
pub struct FleetRegistry {
    pub fleets: Vec<Fleet>,
    next_ship_id: ShipId,
}

impl FleetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fleet of `count` ships orbiting `system`.
    ///
    /// Ships spawn on uniformly random unit-sphere offsets at the
    /// configured ship orbit radius; the system's stationed-ship tally
    /// grows by `count`.
    pub fn create_fleet(
        &mut self,
        system: SystemId,
        count: usize,
        graph: &mut Graph,
        cfg: &Config,
        rng: &mut impl Rng,
    ) -> CoreResult<FleetId> {
        let Some(owner) = graph.systems.get_mut(system) else {
            return Err(CoreError::UnknownSystem(system));
        };

        let radius = cfg.ship_orbit_radius();
        let ships = (0..count)
            .map(|_| {
                let id = self.next_ship_id;
                self.next_ship_id += 1;
                Ship::spawn(id, owner.pos, radius, rng)
            })
            .collect();
        owner.ships_present += count as u32;

        self.fleets.push(Fleet {
            ships,
            owner: Some(system),
        });
        log::info!("fleet {} created at system {system} with {count} ships", self.fleets.len() - 1);
        Ok(self.fleets.len() - 1)
    }

    /// Moves the first `count` ships (collection order) of `fleet` into a
    /// fresh, ownerless fleet and returns its id.
    ///
    /// Requesting more ships than available moves nothing; the source is
    /// untouched and the returned fleet is empty.
    pub fn split_fleet(&mut self, fleet: FleetId, count: usize) -> CoreResult<FleetId> {
        let Some(source) = self.fleets.get_mut(fleet) else {
            return Err(CoreError::UnknownFleet(fleet));
        };

        let detached = if count > source.ships.len() {
            log::warn!(
                "cannot split {count} ships out of fleet {fleet} holding {}",
                source.ships.len()
            );
            Vec::new()
        } else {
            source.ships.drain(..count).collect()
        };

        self.fleets.push(Fleet {
            ships: detached,
            owner: None,
        });
        Ok(self.fleets.len() - 1)
    }

    /// The fleet currently associated with `system`, if any. Linear scan
    /// over owner identity.
    pub fn fleet_at(&self, system: SystemId) -> Option<FleetId> {
        self.fleets.iter().position(|f| f.owner == Some(system))
    }

    /// Removes a fleet from the registry.
    ///
    /// Swap-remove based: the removed id and the last id are invalidated.
    /// Intended for empty, idle fleets only; never call it while a travel
    /// task still references a fleet.
    pub fn discard_fleet(&mut self, fleet: FleetId) -> CoreResult<Fleet> {
        if fleet >= self.fleets.len() {
            return Err(CoreError::UnknownFleet(fleet));
        }
        Ok(self.fleets.swap_remove(fleet))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn setup(system_count: usize) -> (Graph, FleetRegistry, Config, StdRng) {
        let cfg = Config {
            system_count,
            ..Config::default()
        };
        let mut rng = StdRng::seed_from_u64(99);
        let graph = Graph::generate(&cfg, &mut rng).unwrap();
        (graph, FleetRegistry::new(), cfg, rng)
    }

    #[test]
    fn create_fleet_spawns_ships_on_the_orbit_ring() {
        let (mut graph, mut registry, cfg, mut rng) = setup(3);

        let fleet = registry
            .create_fleet(1, 6, &mut graph, &cfg, &mut rng)
            .unwrap();

        let owner_pos = graph.systems[1].pos;
        let fleet = &registry.fleets[fleet];
        assert_eq!(fleet.ships.len(), 6);
        assert_eq!(fleet.owner(), Some(1));
        assert_eq!(graph.systems[1].ships_present, 6);

        for ship in &fleet.ships {
            assert_eq!(ship.state, ShipState::Idle);
            assert_eq!(ship.target, owner_pos);
            let dist = (ship.pos - owner_pos).length();
            assert!((dist - cfg.ship_orbit_radius()).abs() < 1e-4);
        }
    }

    #[test]
    fn create_fleet_rejects_unknown_system() {
        let (mut graph, mut registry, cfg, mut rng) = setup(2);
        let err = registry
            .create_fleet(9, 3, &mut graph, &cfg, &mut rng)
            .unwrap_err();
        assert_eq!(err, CoreError::UnknownSystem(9));
    }

    #[test]
    fn ship_ids_are_unique_across_fleets() {
        let (mut graph, mut registry, cfg, mut rng) = setup(2);
        registry.create_fleet(0, 4, &mut graph, &cfg, &mut rng).unwrap();
        registry.create_fleet(1, 4, &mut graph, &cfg, &mut rng).unwrap();

        let ids: HashSet<ShipId> = registry
            .fleets
            .iter()
            .flat_map(|f| f.ships.iter().map(|s| s.id))
            .collect();
        assert_eq!(ids.len(), 8);
    }

    #[test]
    fn split_moves_the_first_ships_in_collection_order() {
        let (mut graph, mut registry, cfg, mut rng) = setup(2);
        let source = registry
            .create_fleet(0, 6, &mut graph, &cfg, &mut rng)
            .unwrap();
        let before: Vec<ShipId> = registry.fleets[source].ships.iter().map(|s| s.id).collect();

        let detached = registry.split_fleet(source, 2).unwrap();

        let kept: Vec<ShipId> = registry.fleets[source].ships.iter().map(|s| s.id).collect();
        let moved: Vec<ShipId> = registry.fleets[detached].ships.iter().map(|s| s.id).collect();

        assert_eq!(kept.len(), 4);
        assert_eq!(moved, before[..2].to_vec());
        assert_eq!(registry.fleets[detached].owner(), None);

        // Identity conservation: moved + kept is exactly the original set.
        let mut reunited = moved.clone();
        reunited.extend(&kept);
        let reunited: HashSet<ShipId> = reunited.into_iter().collect();
        assert_eq!(reunited, before.into_iter().collect());
    }

    #[test]
    fn split_over_request_moves_nothing_but_returns_an_empty_fleet() {
        let (mut graph, mut registry, cfg, mut rng) = setup(2);
        let source = registry
            .create_fleet(0, 3, &mut graph, &cfg, &mut rng)
            .unwrap();

        let detached = registry.split_fleet(source, 5).unwrap();

        assert_eq!(registry.fleets[source].ships.len(), 3);
        assert!(registry.fleets[detached].ships.is_empty());
        assert_eq!(registry.fleets[detached].owner(), None);
    }

    #[test]
    fn split_rejects_unknown_fleet() {
        let mut registry = FleetRegistry::new();
        assert_eq!(
            registry.split_fleet(0, 1).unwrap_err(),
            CoreError::UnknownFleet(0)
        );
    }

    #[test]
    fn fleet_at_scans_owner_identity() {
        let (mut graph, mut registry, cfg, mut rng) = setup(3);
        let a = registry.create_fleet(2, 2, &mut graph, &cfg, &mut rng).unwrap();
        let detached = registry.split_fleet(a, 1).unwrap();

        assert_eq!(registry.fleet_at(2), Some(a));
        assert_eq!(registry.fleet_at(0), None);
        // Ownerless fleets are associated with no system.
        assert_ne!(registry.fleet_at(2), Some(detached));
    }

    #[test]
    fn set_owner_propagates_center_and_radius_to_every_ship() {
        let (mut graph, mut registry, cfg, mut rng) = setup(3);
        let id = registry.create_fleet(0, 4, &mut graph, &cfg, &mut rng).unwrap();

        let new_pos = graph.systems[2].pos;
        registry.fleets[id].set_owner(2, new_pos, 1.25);

        assert_eq!(registry.fleets[id].owner(), Some(2));
        for ship in &registry.fleets[id].ships {
            assert_eq!(ship.target, new_pos);
            assert_eq!(ship.orbit_radius, 1.25);
        }
    }

    #[test]
    fn discard_removes_the_fleet() {
        let (mut graph, mut registry, cfg, mut rng) = setup(2);
        let a = registry.create_fleet(0, 1, &mut graph, &cfg, &mut rng).unwrap();
        let empty = registry.split_fleet(a, 0).unwrap();

        assert!(registry.fleets[empty].ships.is_empty());
        registry.discard_fleet(empty).unwrap();
        assert_eq!(registry.fleets.len(), 1);

        assert!(registry.discard_fleet(7).is_err());
    }
}
