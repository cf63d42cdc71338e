//! High-level per-tick phases for the fleet travel simulation.
//!
//! The typical update loop looks like:
//! 1. [`transit_phase`] — advance every travel task, push the eased
//!    orbit radius and interpolated anchor to the transiting fleets, and
//!    hand arriving fleets over to their destinations.
//! 2. [`orbit_phase`] — recompute every ship transform exactly once for
//!    this tick, and advance the decorative planet orbits.
//!
//! Both phases run on the caller's frame scheduler; there is no
//! parallelism, and no phase may be skipped for a tick without ships
//! visibly freezing.

use crate::{
    config::Config,
    fleet::{FleetRegistry, ShipState},
    graph::Graph,
    math, travel,
    travel::TravelEngine,
    types::FleetId,
};
use std::f32::consts::TAU;

/// Advances all travel tasks by `dt` seconds.
///
/// For each task still in flight, every ship of its fleet receives the
/// same anchor position ([`travel::transit_target`]) and orbit radius
/// ([`travel::ease_radius`]) for the current normalized time. Tasks
/// crossing the end of their span run the exit actions instead: ships
/// flip back to idle, the fleet's owner becomes the destination with the
/// orbit radius reset to the maximum, and the destination's stationed
/// tally grows by the fleet size.
///
/// ### Returns
/// The ids of fleets that arrived during this tick, in task order.
pub fn transit_phase(
    engine: &mut TravelEngine,
    registry: &mut FleetRegistry,
    graph: &mut Graph,
    cfg: &Config,
    dt: f32,
) -> Vec<FleetId> {
    let mut arrivals = Vec::new();
    let max_radius = cfg.ship_orbit_radius();

    for task in &mut engine.tasks {
        task.elapsed += dt;
        let Some(fleet) = registry.fleets.get_mut(task.fleet) else {
            continue;
        };

        if task.arrived() {
            for ship in &mut fleet.ships {
                ship.state = ShipState::Idle;
            }
            let destination = &mut graph.systems[task.to];
            fleet.set_owner(task.to, destination.pos, max_radius);
            destination.ships_present += fleet.ships.len() as u32;
            log::info!("fleet {} arrived at system {}", task.fleet, task.to);
            arrivals.push(task.fleet);
        } else {
            let t_norm = task.progress();
            let anchor = travel::transit_target(
                t_norm,
                graph.systems[task.from].pos,
                graph.systems[task.to].pos,
            );
            let radius = travel::ease_radius(t_norm, max_radius);
            for ship in &mut fleet.ships {
                ship.target = anchor;
                ship.orbit_radius = radius;
            }
        }
    }

    engine.tasks.retain(|t| !t.arrived());
    arrivals
}

/// Recomputes every ship transform for this tick.
///
/// Idle ships patrol their fleet's owner: the offset from the orbit
/// center rotates around the fixed +Z axis by `orbit_speed * dt` turns
/// at constant radius. Transiting ships sit on their captured offset
/// direction at the current eased radius around the transit anchor.
///
/// Also advances the planet angles (decorative; per-planet rate).
pub fn orbit_phase(registry: &mut FleetRegistry, graph: &mut Graph, cfg: &Config, dt: f32) {
    let turns = cfg.orbit_speed * dt;

    for fleet in &mut registry.fleets {
        for ship in &mut fleet.ships {
            match ship.state {
                ShipState::Idle => {
                    let offset = math::rotate_z(ship.pos - ship.target, turns);
                    ship.pos = ship.target + offset.normalize_or_zero() * ship.orbit_radius;
                }
                ShipState::Transiting => {
                    ship.pos = ship.target + ship.offset.normalize_or_zero() * ship.orbit_radius;
                }
            }
        }
    }

    for system in &mut graph.systems {
        for planet in &mut system.planets {
            planet.angle = (planet.angle + planet.speed * dt * TAU).rem_euclid(TAU);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn setup() -> (Graph, FleetRegistry, TravelEngine, Config, StdRng) {
        let cfg = Config {
            system_count: 4,
            ..Config::default()
        };
        let mut rng = StdRng::seed_from_u64(64);
        let graph = Graph::generate(&cfg, &mut rng).unwrap();
        (graph, FleetRegistry::new(), TravelEngine::new(), cfg, rng)
    }

    #[test]
    fn two_second_transit_peaks_at_one_second_and_lands_at_two() {
        let (mut graph, mut registry, mut engine, cfg, mut rng) = setup();
        let fleet = registry.create_fleet(0, 3, &mut graph, &cfg, &mut rng).unwrap();
        engine
            .depart(fleet, 0, 1, 2.0, &mut registry, &mut graph, &cfg)
            .unwrap();

        // t = 1.0 of 2.0: normalized midpoint, radius at its maximum.
        let arrivals = transit_phase(&mut engine, &mut registry, &mut graph, &cfg, 1.0);
        orbit_phase(&mut registry, &mut graph, &cfg, 1.0);
        assert!(arrivals.is_empty());
        for ship in &registry.fleets[fleet].ships {
            assert_eq!(ship.state, ShipState::Transiting);
            assert!((ship.orbit_radius - cfg.ship_orbit_radius()).abs() < 1e-5);
        }

        // t = 2.0: exit actions run, ownership moves to the destination.
        let arrivals = transit_phase(&mut engine, &mut registry, &mut graph, &cfg, 1.0);
        assert_eq!(arrivals, vec![fleet]);
        assert!(!engine.is_underway(fleet));
        assert_eq!(registry.fleets[fleet].owner(), Some(1));
        assert_eq!(graph.systems[1].ships_present, 3);
        for ship in &registry.fleets[fleet].ships {
            assert_eq!(ship.state, ShipState::Idle);
            assert_eq!(ship.target, graph.systems[1].pos);
            assert_eq!(ship.orbit_radius, cfg.ship_orbit_radius());
        }
    }

    #[test]
    fn in_flight_fleet_shares_one_anchor_and_radius() {
        let (mut graph, mut registry, mut engine, cfg, mut rng) = setup();
        let fleet = registry.create_fleet(0, 4, &mut graph, &cfg, &mut rng).unwrap();
        let from = graph.systems[0].pos;
        let to = graph.systems[2].pos;
        engine
            .depart(fleet, 0, 2, 4.0, &mut registry, &mut graph, &cfg)
            .unwrap();

        transit_phase(&mut engine, &mut registry, &mut graph, &cfg, 1.0);
        orbit_phase(&mut registry, &mut graph, &cfg, 1.0);

        let t_norm = 0.25;
        let anchor = travel::transit_target(t_norm, from, to);
        let radius = travel::ease_radius(t_norm, cfg.ship_orbit_radius());
        for ship in &registry.fleets[fleet].ships {
            assert!(ship.target.distance(anchor) < 1e-5);
            assert!((ship.orbit_radius - radius).abs() < 1e-5);
            // The transform sits on the captured offset direction.
            let expected = anchor + ship.offset.normalize_or_zero() * radius;
            assert!(ship.pos.distance(expected) < 1e-4);
        }
    }

    #[test]
    fn independent_fleets_travel_concurrently() {
        let (mut graph, mut registry, mut engine, cfg, mut rng) = setup();
        let a = registry.create_fleet(0, 2, &mut graph, &cfg, &mut rng).unwrap();
        let b = registry.create_fleet(1, 2, &mut graph, &cfg, &mut rng).unwrap();

        engine.depart(a, 0, 1, 1.0, &mut registry, &mut graph, &cfg).unwrap();
        engine.depart(b, 1, 2, 3.0, &mut registry, &mut graph, &cfg).unwrap();

        let arrivals = transit_phase(&mut engine, &mut registry, &mut graph, &cfg, 1.5);
        assert_eq!(arrivals, vec![a]);
        assert!(!engine.is_underway(a));
        assert!(engine.is_underway(b));

        let arrivals = transit_phase(&mut engine, &mut registry, &mut graph, &cfg, 1.5);
        assert_eq!(arrivals, vec![b]);
        assert_eq!(registry.fleets[a].owner(), Some(1));
        assert_eq!(registry.fleets[b].owner(), Some(2));
    }

    #[test]
    fn idle_ships_orbit_at_constant_radius() {
        let (mut graph, mut registry, _, cfg, mut rng) = setup();
        let fleet = registry.create_fleet(0, 5, &mut graph, &cfg, &mut rng).unwrap();

        let radius = cfg.ship_orbit_radius();
        for _ in 0..10 {
            orbit_phase(&mut registry, &mut graph, &cfg, 0.1);
            for ship in &registry.fleets[fleet].ships {
                let dist = (ship.pos - ship.target).length();
                assert!((dist - radius).abs() < 1e-3, "radius drifted to {dist}");
            }
        }
    }

    #[test]
    fn idle_orbit_advances_by_the_configured_rate() {
        let (mut graph, mut registry, _, cfg, mut rng) = setup();
        let fleet = registry.create_fleet(0, 1, &mut graph, &cfg, &mut rng).unwrap();

        // Pin the ship on the +X side of its orbit center.
        let center = graph.systems[0].pos;
        let radius = cfg.ship_orbit_radius();
        registry.fleets[fleet].ships[0].pos = center + Vec3::X * radius;

        // orbit_speed 0.25 turns/s over 1 s is a quarter turn: +X -> +Y.
        orbit_phase(&mut registry, &mut graph, &cfg, 1.0);
        let ship = &registry.fleets[fleet].ships[0];
        assert!(ship.pos.distance(center + Vec3::Y * radius) < 1e-4);
    }

    #[test]
    fn planets_advance_their_angles() {
        let (mut graph, mut registry, _, cfg, _) = setup();
        let before: Vec<f32> = graph.systems[0].planets.iter().map(|p| p.angle).collect();

        orbit_phase(&mut registry, &mut graph, &cfg, 0.5);

        for (planet, old) in graph.systems[0].planets.iter().zip(before) {
            let expected = (old + planet.speed * 0.5 * TAU).rem_euclid(TAU);
            assert!((planet.angle - expected).abs() < 1e-5);
        }
    }
}
