#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Number of systems to place during graph generation.
    pub system_count: usize,
    /// Lower bound for the distance between a new system and its
    /// closest neighbor. The upper bound is derived:
    /// `min_distance * (sqrt(2) - 0.1)`.
    pub min_distance: f32,
    /// Rejection-sampling cap per system before generation gives up
    /// with a layout error.
    pub max_place_attempts: u32,
    /// Planets per system (orbital decoration).
    pub planets_per_system: usize,
    /// Orbit radius delta between consecutive planet rings.
    pub planet_orbit_step: f32,
    /// Default number of ships in a newly created fleet.
    pub ships_per_fleet: usize,
    /// Idle orbit rate of ships, in turns per second.
    pub orbit_speed: f32,
    /// Default fleet transit span, in seconds.
    pub transit_duration: f32,
}

impl Config {
    /// Orbit radius for ships: the ring just outside the outermost planet.
    ///
    /// Doubles as the maximum orbit radius of the transit ease curve.
    pub fn ship_orbit_radius(&self) -> f32 {
        (self.planets_per_system + 1) as f32 * self.planet_orbit_step
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            system_count: 10,
            min_distance: 3.0,
            max_place_attempts: 10_000,
            planets_per_system: 3,
            planet_orbit_step: 0.4,
            ships_per_fleet: 6,
            orbit_speed: 0.25,
            transit_duration: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ship_orbit_radius_sits_one_ring_outside_the_planets() {
        let cfg = Config {
            planets_per_system: 3,
            planet_orbit_step: 0.4,
            ..Config::default()
        };
        // Outermost planet ring is at 3 * 0.4; ships orbit at 4 * 0.4.
        assert!((cfg.ship_orbit_radius() - 1.6).abs() < 1e-6);
    }
}
