//! Procedural system-graph generation and adjacency queries.
//!
//! A [`Graph`] is produced in one synchronous pass:
//! 1. Seed system 0 at the origin.
//! 2. For every further system, rejection-sample a position on a sphere
//!    around the current layout until its distance to the closest placed
//!    system falls strictly between `min_distance` and the derived
//!    maximum (`min_distance * (sqrt(2) - 0.1)`).
//! 3. Connect every pair closer than the maximum link distance.
//! 4. Shift all systems so their centroid is the origin.
//!
//! Regeneration always replaces the whole graph; nothing patches an
//! existing one in place.

use crate::{
    config::Config,
    error::{CoreError, CoreResult},
    math,
    system::System,
    types::SystemId,
};
use glam::Vec3;
use rand::Rng;

/// Upper bound for both placement acceptance and connectivity.
pub fn max_link_distance(min_distance: f32) -> f32 {
    min_distance * (2.0_f32.sqrt() - 0.1)
}

/// The full set of systems plus a symmetric adjacency relation.
///
/// Adjacency is stored as a flat `n * n` boolean matrix. It is computed
/// once, after all positions are finalized, and never mutated afterwards.
/// The diagonal carries no meaning and is never queried.
#[derive(Debug)]
pub struct Graph {
    pub systems: Vec<System>,
    connections: Vec<bool>,
}

impl Graph {
    /// Generates a new graph from the configuration.
    ///
    /// Fails fast on a non-positive `min_distance` or a zero
    /// `system_count`, and reports [`CoreError::LayoutInfeasible`] if any
    /// single system exhausts `max_place_attempts` samples.
    pub fn generate(cfg: &Config, rng: &mut impl Rng) -> CoreResult<Self> {
        if cfg.system_count == 0 {
            return Err(CoreError::InvalidConfig(
                "system_count must be at least 1".into(),
            ));
        }
        if cfg.min_distance <= 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "min_distance must be positive, got {}",
                cfg.min_distance
            )));
        }

        let max_distance = max_link_distance(cfg.min_distance);

        let mut graph = Self {
            systems: vec![System::generate(cfg, rng)],
            connections: Vec::new(),
        };

        for node in 1..cfg.system_count {
            let mut attempts = 0;
            loop {
                if attempts >= cfg.max_place_attempts {
                    return Err(CoreError::LayoutInfeasible { node, attempts });
                }
                attempts += 1;

                // Candidate on a sphere just outside the current layout.
                let pos = math::random_unit_sphere(rng) * (graph.radius() + max_distance);

                let closest = graph
                    .systems
                    .iter()
                    .map(|s| (s.pos - pos).length())
                    .fold(f32::INFINITY, f32::min);

                if cfg.min_distance < closest && closest < max_distance {
                    let mut system = System::generate(cfg, rng);
                    system.pos = pos;
                    graph.systems.push(system);
                    break;
                }
            }
        }

        // Adjacency is a pure function of the final distances, which are
        // translation-invariant, so it may be computed before centering.
        let n = graph.systems.len();
        graph.connections = vec![false; n * n];
        for i in 1..n {
            for j in 0..i {
                let dist = (graph.systems[i].pos - graph.systems[j].pos).length();
                let connected = dist < max_distance;
                graph.connections[i * n + j] = connected;
                graph.connections[j * n + i] = connected;
            }
        }

        graph.normalize_location();

        log::info!(
            "generated {} systems, {} connections",
            n,
            graph.connections.iter().filter(|&&c| c).count() / 2
        );

        Ok(graph)
    }

    /// Dimensions of the axis-aligned box the layout fits in.
    ///
    /// The box always includes the origin, matching the bounds used
    /// during placement.
    pub fn size(&self) -> Vec3 {
        let mut max = Vec3::ZERO;
        let mut min = Vec3::ZERO;
        for system in &self.systems {
            max = max.max(system.pos);
            min = min.min(system.pos);
        }
        max - min
    }

    /// Half of the bounding-box diagonal.
    pub fn radius(&self) -> f32 {
        0.5 * self.size().length()
    }

    /// Whether two systems are linked. Symmetric.
    pub fn are_connected(&self, a: SystemId, b: SystemId) -> bool {
        self.connections[a * self.systems.len() + b]
    }

    /// Ids of all systems linked to `id`. Fresh vector each call; the
    /// graph itself is unaffected by mutations of the result.
    pub fn neighbors(&self, id: SystemId) -> Vec<SystemId> {
        let n = self.systems.len();
        (0..n)
            .filter(|&j| j != id && self.connections[id * n + j])
            .collect()
    }

    /// Shifts all systems so the centroid of their positions is the
    /// origin. Runs once, as the final generation step.
    fn normalize_location(&mut self) {
        let sum: Vec3 = self.systems.iter().map(|s| s.pos).sum();
        let center = sum / self.systems.len() as f32;
        for system in &mut self.systems {
            system.pos -= center;
        }
    }
}
