//! Interactive galaxy viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the simulation state
//! (graph, fleets, travel engine, configuration) and implements
//! [`eframe::App`] to render and control the simulation through an
//! egui UI.

use eframe::App;
use galaxy_core::{
    config::Config,
    error::CoreResult,
    fleet::{FleetRegistry, ShipState},
    graph::Graph,
    phases,
    travel::TravelEngine,
    types::{FleetId, SystemId},
};
use glam::Vec3;
use rand::rng;

/// Screen-space pick radius for selecting systems, in pixels.
const PICK_RADIUS: f32 = 12.0;

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The simulation core: [`Graph`], [`FleetRegistry`], [`TravelEngine`], [`Config`].
/// - UI state (pan/zoom, selection, pending fleet commands).
/// - eframe/egui callbacks for drawing and user interaction.
///
/// The typical per-frame update is:
/// 1. Handle UI interactions / input.
/// 2. If `running` is `true`, advance the transit and orbit phases by
///    the frame delta.
/// 3. Render connections, systems, planets and ships in XY projection.
pub struct Viewer {
    graph: Graph,
    fleets: FleetRegistry,
    travel: TravelEngine,
    cfg: Config,

    rng: rand::rngs::ThreadRng,

    running: bool,
    zoom: f32,
    pan: egui::Vec2,

    selected: Option<SystemId>,
    /// A fleet armed for departure, waiting for a destination click.
    pending_send: Option<(FleetId, SystemId)>,
    split_count: usize,
    /// Fleets that arrived during the last simulation step.
    last_arrivals: Vec<FleetId>,
    status: String,
}

impl Viewer {
    /// Creates a new viewer with a freshly generated galaxy.
    ///
    /// ### Returns
    /// A fully-initialized [`Viewer`], or the generation error if the
    /// default configuration turns out to be infeasible.
    pub fn new() -> CoreResult<Self> {
        let cfg = Config::default();
        let mut rng = rng();
        let graph = Graph::generate(&cfg, &mut rng)?;

        Ok(Self {
            graph,
            fleets: FleetRegistry::new(),
            travel: TravelEngine::new(),
            cfg,
            rng,
            running: true,
            zoom: 40.0,
            pan: egui::vec2(0.0, 0.0),
            selected: None,
            pending_send: None,
            split_count: 2,
            last_arrivals: Vec::new(),
            status: String::new(),
        })
    }

    /// Regenerates the galaxy from the current configuration.
    ///
    /// On success the whole graph is replaced and all fleets, travel
    /// tasks and selections are dropped with it (their system handles
    /// would dangle). On failure the previous graph stays and the error
    /// is surfaced in the status line.
    fn regenerate(&mut self) {
        match Graph::generate(&self.cfg, &mut self.rng) {
            Ok(graph) => {
                self.graph = graph;
                self.fleets = FleetRegistry::new();
                self.travel = TravelEngine::new();
                self.selected = None;
                self.pending_send = None;
                self.last_arrivals.clear();
                self.status = format!("regenerated {} systems", self.graph.systems.len());
            }
            Err(err) => {
                log::warn!("regeneration failed: {err}");
                self.status = err.to_string();
            }
        }
    }

    /// Advances the simulation by `dt` seconds: transit phase first,
    /// then the orbit phase.
    fn step(&mut self, dt: f32) {
        self.last_arrivals = phases::transit_phase(
            &mut self.travel,
            &mut self.fleets,
            &mut self.graph,
            &self.cfg,
            dt,
        );
        phases::orbit_phase(&mut self.fleets, &mut self.graph, &self.cfg, dt);
    }

    /// Handles a click on `system`: either completes a pending send or
    /// moves the selection there.
    fn click_system(&mut self, system: SystemId) {
        if self.pending_send.is_some() {
            self.send_to(system);
            return;
        }

        if let Some(old) = self.selected.take() {
            self.graph.systems[old].deselect();
            if old == system {
                return;
            }
        }
        self.graph.systems[system].select();
        self.selected = Some(system);
    }

    /// Creates a default-sized fleet at the selected system.
    fn create_fleet_cmd(&mut self) {
        let Some(system) = self.selected else {
            self.status = "select a system first".into();
            return;
        };
        match self.fleets.create_fleet(
            system,
            self.cfg.ships_per_fleet,
            &mut self.graph,
            &self.cfg,
            &mut self.rng,
        ) {
            Ok(id) => self.status = format!("fleet {id} created"),
            Err(err) => self.status = err.to_string(),
        }
    }

    /// Arms the fleet stationed at the selected system for departure.
    fn send_fleet_cmd(&mut self) {
        let Some(system) = self.selected else {
            self.status = "select a system first".into();
            return;
        };
        let Some(fleet) = self.fleets.fleet_at(system) else {
            self.status = "no fleet at the selected system".into();
            return;
        };
        self.pending_send = Some((fleet, system));
        self.status = "click a linked system to set the destination".into();
    }

    /// Splits `split_count` ships off the selected system's fleet and
    /// arms the detachment for departure.
    fn detach_cmd(&mut self) {
        let Some(system) = self.selected else {
            self.status = "select a system first".into();
            return;
        };
        let Some(source) = self.fleets.fleet_at(system) else {
            self.status = "no fleet at the selected system".into();
            return;
        };
        match self.fleets.split_fleet(source, self.split_count) {
            Ok(detached) => {
                if self.fleets.fleets[detached].ships.is_empty() {
                    // Over-sized request: nothing moved. The empty fleet
                    // was pushed last, so discarding it shifts no ids.
                    let _ = self.fleets.discard_fleet(detached);
                    self.status = "not enough ships to detach".into();
                } else {
                    self.pending_send = Some((detached, system));
                    self.status = "click a linked system to set the destination".into();
                }
            }
            Err(err) => self.status = err.to_string(),
        }
    }

    /// Completes a pending send toward `dest`.
    ///
    /// The viewer only allows travel along graph links; the core itself
    /// accepts any pair of valid systems.
    fn send_to(&mut self, dest: SystemId) {
        let Some((fleet, from)) = self.pending_send.take() else {
            return;
        };
        if dest == from {
            self.status = "destination matches the source; send dropped".into();
            return;
        }
        if !self.graph.are_connected(from, dest) {
            self.status = "systems are not linked; send dropped".into();
            return;
        }
        match self.travel.depart(
            fleet,
            from,
            dest,
            self.cfg.transit_duration,
            &mut self.fleets,
            &mut self.graph,
            &self.cfg,
        ) {
            Ok(()) => self.status = format!("fleet {fleet} underway to system {dest}"),
            Err(err) => self.status = err.to_string(),
        }
    }

    /// Cancels the travel task of the fleet stationed at the selection.
    fn cancel_travel_cmd(&mut self) {
        let cancelled = self
            .selected
            .and_then(|system| self.fleets.fleet_at(system))
            .map(|fleet| self.travel.cancel(fleet))
            .unwrap_or(false);
        self.status = if cancelled {
            "travel cancelled; ships left adrift".into()
        } else {
            "nothing to cancel here".into()
        };
    }

    /// Converts a world-space position (XY projection) to screen-space.
    fn world_to_screen(&self, p: Vec3, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        egui::pos2(
            center.x + p.x * self.zoom + self.pan.x,
            center.y - p.y * self.zoom + self.pan.y,
        )
    }

    /// Converts a screen-space position back to world-space (z = 0).
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec3 {
        let center = rect.center();
        let x = (p.x - center.x - self.pan.x) / self.zoom;
        let y = (center.y - p.y + self.pan.y) / self.zoom;
        Vec3::new(x, y, 0.0)
    }

    /// The system whose projection is closest to `screen`, within the
    /// pick radius.
    fn pick_system(&self, screen: egui::Pos2, rect: egui::Rect) -> Option<SystemId> {
        let mut best = None;
        let mut best_d = PICK_RADIUS;
        for (id, system) in self.graph.systems.iter().enumerate() {
            let d = self.world_to_screen(system.pos, rect).distance(screen);
            if d < best_d {
                best_d = d;
                best = Some(id);
            }
        }
        best
    }

    /// Helper to draw a labeled `usize` [`egui::DragValue`].
    fn labeled_drag_usize(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut usize,
        range: std::ops::RangeInclusive<usize>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Helper to draw a labeled `f32` [`egui::DragValue`].
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel UI (run controls, regeneration, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                if ui.button("Regenerate").clicked() {
                    self.regenerate();
                }

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 5.0..=120.0).text("Zoom"));
            });
        });
    }

    /// Builds the bottom status bar (counts and the last status line).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("in transit = {}", self.travel.tasks().len()));
                    ui.label(format!(
                        "ships = {}",
                        self.fleets
                            .fleets
                            .iter()
                            .map(|f| f.ships.len())
                            .sum::<usize>()
                    ));
                    ui.label(format!("fleets = {}", self.fleets.fleets.len()));
                    ui.label(format!("systems = {}", self.graph.systems.len()));
                });
            });
        });
    }

    /// Builds the right-hand panel: configuration plus fleet commands
    /// for the current selection.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(230.0)
            .show(ctx, |ui| {
                ui.heading("Galaxy");
                Self::labeled_drag_usize(ui, "systems:", &mut self.cfg.system_count, 1..=64, 1.0);
                Self::labeled_drag_f32(
                    ui,
                    "min distance:",
                    &mut self.cfg.min_distance,
                    0.1..=20.0,
                    0.1,
                );
                Self::labeled_drag_usize(
                    ui,
                    "planets:",
                    &mut self.cfg.planets_per_system,
                    0..=8,
                    1.0,
                );
                Self::labeled_drag_f32(
                    ui,
                    "orbit step:",
                    &mut self.cfg.planet_orbit_step,
                    0.1..=2.0,
                    0.05,
                );

                ui.separator();
                ui.heading("Fleets");
                Self::labeled_drag_usize(
                    ui,
                    "ships per fleet:",
                    &mut self.cfg.ships_per_fleet,
                    1..=32,
                    1.0,
                );
                Self::labeled_drag_f32(
                    ui,
                    "orbit speed:",
                    &mut self.cfg.orbit_speed,
                    0.0..=2.0,
                    0.01,
                );
                Self::labeled_drag_f32(
                    ui,
                    "transit duration:",
                    &mut self.cfg.transit_duration,
                    0.1..=30.0,
                    0.1,
                );

                ui.separator();
                match self.selected {
                    Some(system) => {
                        ui.label(format!(
                            "system {}: {} ships stationed",
                            system, self.graph.systems[system].ships_present
                        ));

                        if ui.button("Create fleet").clicked() {
                            self.create_fleet_cmd();
                        }
                        if ui.button("Send fleet").clicked() {
                            self.send_fleet_cmd();
                        }
                        ui.horizontal(|ui| {
                            if ui.button("Detach & send").clicked() {
                                self.detach_cmd();
                            }
                            ui.add(
                                egui::DragValue::new(&mut self.split_count)
                                    .range(1..=32)
                                    .speed(1.0),
                            );
                        });
                        if ui.button("Cancel travel").clicked() {
                            self.cancel_travel_cmd();
                        }
                    }
                    None => {
                        ui.label("click a system to select it");
                    }
                }

                if self.pending_send.is_some() && ui.button("Drop pending send").clicked() {
                    self.pending_send = None;
                    self.status = "send dropped".into();
                }
            });
    }

    /// Builds the central panel where the galaxy is drawn and clicked.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            // Pan with drag.
            if response.dragged() {
                self.pan += response.drag_delta();
            }

            // Handle click-based selection and destination picking.
            if response.clicked()
                && let Some(pointer) = response.hover_pos()
            {
                if let Some(id) = self.pick_system(pointer, rect) {
                    self.click_system(id);
                } else if self.pending_send.take().is_some() {
                    self.status = "send dropped".into();
                }
            }

            // Zoom around the mouse cursor.
            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let pointer_screen = response.hover_pos().unwrap_or(rect.center());
                let world_before = self.screen_to_world(pointer_screen, rect);

                let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                self.zoom = (self.zoom * factor).clamp(5.0, 120.0);

                let screen_after = self.world_to_screen(world_before, rect);
                self.pan += pointer_screen - screen_after;
            }

            // Draw connections.
            for i in 0..self.graph.systems.len() {
                for j in 0..i {
                    if self.graph.are_connected(i, j) {
                        let a = self.world_to_screen(self.graph.systems[i].pos, rect);
                        let b = self.world_to_screen(self.graph.systems[j].pos, rect);
                        painter.line_segment([a, b], egui::Stroke::new(1.0, egui::Color32::DARK_GRAY));
                    }
                }
            }

            // Pending-send hint from the source system to the cursor.
            if let Some((_, from)) = self.pending_send
                && let Some(pointer) = response.hover_pos()
            {
                let a = self.world_to_screen(self.graph.systems[from].pos, rect);
                painter.line_segment([a, pointer], egui::Stroke::new(1.0, egui::Color32::YELLOW));
            }

            // Draw systems and their planets.
            for system in &self.graph.systems {
                let p = self.world_to_screen(system.pos, rect);
                let color = if system.selected {
                    egui::Color32::YELLOW
                } else {
                    egui::Color32::LIGHT_BLUE
                };
                painter.circle_filled(p, (0.2 * self.zoom).max(3.0), color);

                for planet in &system.planets {
                    let q = self.world_to_screen(system.pos + planet.local_pos(), rect);
                    painter.circle_filled(q, (0.05 * self.zoom).max(1.0), egui::Color32::GRAY);
                }
            }

            // Ring the destinations of fleets that just arrived.
            for &fleet in &self.last_arrivals {
                if let Some(owner) = self.fleets.fleets.get(fleet).and_then(|f| f.owner()) {
                    let p = self.world_to_screen(self.graph.systems[owner].pos, rect);
                    painter.circle_stroke(
                        p,
                        (0.3 * self.zoom).max(5.0),
                        egui::Stroke::new(1.5, egui::Color32::RED),
                    );
                }
            }

            // Draw ships, colored by motion state.
            for fleet in &self.fleets.fleets {
                for ship in &fleet.ships {
                    let p = self.world_to_screen(ship.pos, rect);
                    let color = match ship.state {
                        ShipState::Idle => egui::Color32::LIGHT_GREEN,
                        ShipState::Transiting => egui::Color32::LIGHT_RED,
                    };
                    painter.circle_filled(p, 2.0, color);
                }
            }

            // Advance the simulation with the frame delta.
            if self.running {
                let dt = ctx.input(|i| i.stable_dt).min(0.1);
                self.step(dt);
                ctx.request_repaint();
            }
        });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
