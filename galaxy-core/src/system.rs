use crate::config::Config;
use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

/// Decorative orbital body owned by a [`System`].
#[derive(Debug, Clone)]
pub struct Planet {
    /// Radius of the orbit ring this planet sits on.
    pub orbit_radius: f32,
    /// Current angle along the ring, in radians.
    pub angle: f32,
    /// Orbit rate, in turns per second.
    pub speed: f32,
    pub banks: u32,
    pub factories: u32,
}

impl Planet {
    /// Planet position in the owning system's local frame.
    pub fn local_pos(&self) -> Vec3 {
        Vec3::new(
            self.orbit_radius * self.angle.cos(),
            self.orbit_radius * self.angle.sin(),
            0.0,
        )
    }
}

/// A star system: one node of the generated graph.
///
/// The position is immutable once generation completes; the only
/// exception is the one-time centering pass that shifts every system by
/// the same vector.
#[derive(Debug, Clone)]
pub struct System {
    pub pos: Vec3,
    pub planets: Vec<Planet>,
    /// Ships currently stationed at this system.
    pub ships_present: u32,
    pub selected: bool,
}

impl System {
    /// Generates a system at the origin with randomized planet rings.
    ///
    /// Ring `i` sits at radius `(i + 1) * planet_orbit_step` with a
    /// uniformly random start angle and orbit rate.
    pub fn generate(cfg: &Config, rng: &mut impl Rng) -> Self {
        let planets = (0..cfg.planets_per_system)
            .map(|i| Planet {
                orbit_radius: (i + 1) as f32 * cfg.planet_orbit_step,
                angle: rng.random_range(0.0..TAU),
                speed: rng.random_range(0.1..=0.3),
                banks: 1,
                factories: 1,
            })
            .collect();

        Self {
            pos: Vec3::ZERO,
            planets,
            ships_present: 0,
            selected: false,
        }
    }

    pub fn select(&mut self) {
        self.selected = true;
    }

    pub fn deselect(&mut self) {
        self.selected = false;
    }

    pub fn toggle_selection(&mut self) {
        self.selected = !self.selected;
    }
}
