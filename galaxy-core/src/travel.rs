//! Tick-driven fleet transit tasks.
//!
//! A travel task moves every ship of one fleet from a source system to a
//! destination over a fixed duration. Entry forces the ships to rally at
//! the source; each tick pushes an eased orbit radius and an interpolated
//! anchor position to the whole fleet; crossing the end of the span flips
//! the ships back to idle and hands the fleet over to the destination.
//!
//! Scheduling is single-threaded and cooperative: a task advances only
//! when [`crate::phases::transit_phase`] is invoked, once per frame tick.
//! The relative order of different fleets' tasks within a tick is
//! unspecified.

use crate::{
    config::Config,
    error::{CoreError, CoreResult},
    fleet::FleetRegistry,
    graph::Graph,
    types::{FleetId, SystemId},
};
use glam::Vec3;

/// In-transit orbit radius at normalized time `t_norm`.
///
/// A quartic bump on the `(t² - t)²` term: zero at both ends of the
/// transit and `max_radius` at the midpoint, so a fleet gathers tight at
/// the endpoints and fans out mid-flight.
pub fn ease_radius(t_norm: f32, max_radius: f32) -> f32 {
    let bump = t_norm * t_norm - t_norm;
    max_radius * 16.0 * bump * bump
}

/// In-transit anchor position at normalized time `t_norm`.
///
/// Deliberately `from * (t - 1) + to * t`, not a convex lerp: at
/// `t = 0` the anchor undershoots the source by its full position
/// vector. The transit look is tuned against this exact curve; do not
/// swap in a standard lerp.
pub fn transit_target(t_norm: f32, from: Vec3, to: Vec3) -> Vec3 {
    from * (t_norm - 1.0) + to * t_norm
}

/// One fleet's transit between two systems.
#[derive(Debug, Clone)]
pub struct TravelTask {
    pub fleet: FleetId,
    pub from: SystemId,
    pub to: SystemId,
    pub duration: f32,
    pub elapsed: f32,
}

impl TravelTask {
    /// Normalized progress; 1.0 or beyond means the transit is over.
    pub fn progress(&self) -> f32 {
        self.elapsed / self.duration
    }

    pub fn arrived(&self) -> bool {
        self.progress() >= 1.0
    }
}

/// All running travel tasks.
///
/// At most one task per fleet: a second departure request for a fleet
/// already underway is rejected instead of racing over its targets.
#[derive(Debug, Default)]
pub struct TravelEngine {
    pub(crate) tasks: Vec<TravelTask>,
}

impl TravelEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a transit of `fleet` from `from` to `to` over `duration`
    /// seconds.
    ///
    /// Entry actions run immediately: every ship switches to transiting,
    /// captures its offset relative to the source system and rallies
    /// there at the maximum orbit radius; the ships leave the source
    /// system's stationed tally. Progress is then driven by
    /// [`crate::phases::transit_phase`].
    pub fn depart(
        &mut self,
        fleet: FleetId,
        from: SystemId,
        to: SystemId,
        duration: f32,
        registry: &mut FleetRegistry,
        graph: &mut Graph,
        cfg: &Config,
    ) -> CoreResult<()> {
        if from >= graph.systems.len() {
            return Err(CoreError::UnknownSystem(from));
        }
        if to >= graph.systems.len() {
            return Err(CoreError::UnknownSystem(to));
        }
        if duration <= 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "transit duration must be positive, got {duration}"
            )));
        }
        let Some(travelers) = registry.fleets.get_mut(fleet) else {
            return Err(CoreError::UnknownFleet(fleet));
        };
        if self.is_underway(fleet) {
            return Err(CoreError::FleetBusy(fleet));
        }

        let rally = graph.systems[from].pos;
        let radius = cfg.ship_orbit_radius();
        for ship in &mut travelers.ships {
            ship.begin_transit(rally, radius);
        }

        let source = &mut graph.systems[from];
        source.ships_present = source.ships_present.saturating_sub(travelers.ships.len() as u32);

        log::info!("fleet {fleet} departing system {from} for system {to} ({duration} s)");
        self.tasks.push(TravelTask {
            fleet,
            from,
            to,
            duration,
            elapsed: 0.0,
        });
        Ok(())
    }

    /// Whether a travel task for `fleet` is currently running.
    pub fn is_underway(&self, fleet: FleetId) -> bool {
        self.tasks.iter().any(|t| t.fleet == fleet)
    }

    /// Running tasks, for inspection.
    pub fn tasks(&self) -> &[TravelTask] {
        &self.tasks
    }

    /// Aborts the travel task of `fleet`, if any.
    ///
    /// The task is dropped as-is: the ships stay transiting with their
    /// last targets and the fleet keeps whatever owner it had before
    /// departure. Recovery is a fresh [`TravelEngine::depart`], which
    /// re-captures every offset.
    pub fn cancel(&mut self, fleet: FleetId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.fleet != fleet);
        if self.tasks.len() != before {
            log::info!("travel of fleet {fleet} cancelled");
            true
        } else {
            false
        }
    }
}
