//! Headless host
//!
//! Runs a session without a renderer: a recording presenter stands in for the
//! UI, a fixed-step loop plays rope animations, and a seeded autoplayer taps
//! points (sometimes the wrong one) faster than ropes can animate.

use std::path::Path;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{DEMO_MISTAKE_CHANCE, DEMO_TAP_INTERVAL, MAX_LEVEL_STEPS, MAX_SUBSTEPS, SIM_DT};
use crate::easing::Easing;
use crate::presenter::Presenter;
use crate::rope::RopeGeometry;
use crate::session::{GameSession, LevelError, Screen};
use crate::settings::Settings;
use crate::sim::{AnimationTicket, CatalogError, TapOutcome};

/// Last screen the presenter was asked to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shown {
    Menu,
    Game,
    Error,
}

/// A rendered point widget
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointView {
    pub index: usize,
    pub position: Vec2,
    pub active: bool,
}

/// A rope that is still growing
#[derive(Debug, Clone, Copy)]
pub struct RopeAnimation {
    pub ticket: AnimationTicket,
    pub geometry: RopeGeometry,
    pub duration: f32,
    pub ease: Easing,
    pub elapsed: f32,
    /// Level visuals the rope was drawn into
    pub visuals: u64,
}

impl RopeAnimation {
    /// Normalized progress (0..=1)
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    pub fn current_length(&self) -> f32 {
        self.geometry.length_at(self.progress(), self.ease)
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }
}

/// Presenter that records what it was told to show
#[derive(Debug, Default)]
pub struct HeadlessPresenter {
    pub shown: Option<Shown>,
    /// (display index, level index)
    pub buttons: Vec<(usize, usize)>,
    pub points: Vec<PointView>,
    pub empty_level_error: bool,
    /// Every rope ever started, in start order
    pub started: Vec<AnimationTicket>,
    /// Ropes still growing. Clearing the level does not stop them; their
    /// completions still reach the session.
    pub in_flight: Vec<RopeAnimation>,
    /// Fully grown ropes of the current level
    pub ropes: Vec<RopeGeometry>,
    /// Bumped whenever the level visuals are cleared
    visuals: u64,
}

impl HeadlessPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance rope animations; returns tickets of ropes that finished
    pub fn advance(&mut self, dt: f32) -> Vec<AnimationTicket> {
        let mut finished = Vec::new();
        for rope in &mut self.in_flight {
            rope.elapsed += dt;
            if rope.is_finished() {
                finished.push(rope.ticket);
            }
        }
        let ropes = &mut self.ropes;
        let visuals = self.visuals;
        self.in_flight.retain(|rope| {
            if rope.is_finished() {
                // Ropes left over from a cleared level are not shown
                if rope.visuals == visuals {
                    ropes.push(rope.geometry);
                }
                false
            } else {
                true
            }
        });
        finished
    }
}

impl Presenter for HeadlessPresenter {
    type PointHandle = usize;

    fn render_point(&mut self, index: usize, position: Vec2) -> usize {
        self.points.push(PointView {
            index,
            position,
            active: false,
        });
        self.points.len() - 1
    }

    fn set_point_visual_state(&mut self, handle: &usize, active: bool) {
        if let Some(point) = self.points.get_mut(*handle) {
            point.active = active;
        }
    }

    fn clear_level_visuals(&mut self) {
        self.points.clear();
        self.ropes.clear();
        self.visuals += 1;
    }

    fn play_segment_animation(
        &mut self,
        ticket: AnimationTicket,
        from: Vec2,
        to: Vec2,
        duration: f32,
        ease: Easing,
    ) {
        log::debug!(
            "Rope {} -> {} ({:.2}s, {})",
            ticket.segment.from,
            ticket.segment.to,
            duration,
            ease.as_str()
        );
        self.started.push(ticket);
        self.in_flight.push(RopeAnimation {
            ticket,
            geometry: RopeGeometry::new(from, to),
            duration,
            ease,
            elapsed: 0.0,
            visuals: self.visuals,
        });
    }

    fn show_menu(&mut self, _fade: f32) {
        self.shown = Some(Shown::Menu);
    }

    fn show_game(&mut self, _fade: f32) {
        self.shown = Some(Shown::Game);
    }

    fn show_error(&mut self, _fade: f32) {
        self.shown = Some(Shown::Error);
    }

    fn set_empty_level_error(&mut self, visible: bool) {
        self.empty_level_error = visible;
    }

    fn instantiate_level_button(&mut self, display_index: usize, level_index: usize) {
        self.buttons.push((display_index, level_index));
    }
}

/// Picks which point to tap next
#[derive(Debug, Clone)]
pub struct Autoplayer {
    rng: Pcg32,
    mistake_chance: f64,
}

impl Autoplayer {
    pub fn new(seed: u64, mistake_chance: f64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            mistake_chance: mistake_chance.clamp(0.0, 1.0),
        }
    }

    /// Usually the expected point; sometimes any point at random
    pub fn choose(&mut self, expected: usize, point_count: usize) -> usize {
        if point_count > 1 && self.rng.random_bool(self.mistake_chance) {
            self.rng.random_range(0..point_count)
        } else {
            expected
        }
    }
}

/// Outcome of a demo run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemoReport {
    pub levels_completed: usize,
    pub empty_levels: usize,
    pub rejected_taps: usize,
    pub stalled_levels: usize,
}

/// Fixed-step host loop around a session
pub struct DemoHost {
    pub session: GameSession<HeadlessPresenter>,
    autoplayer: Autoplayer,
    accumulator: f32,
    tap_timer: f32,
    pub report: DemoReport,
}

impl DemoHost {
    pub fn new(settings: Settings, seed: u64) -> Self {
        Self {
            session: GameSession::new(HeadlessPresenter::new(), settings),
            autoplayer: Autoplayer::new(seed, DEMO_MISTAKE_CHANCE),
            accumulator: 0.0,
            tap_timer: 0.0,
            report: DemoReport::default(),
        }
    }

    /// Run fixed steps for `dt` seconds of wall time
    pub fn update(&mut self, dt: f32) {
        self.accumulator += dt.min(0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step(SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
    }

    fn step(&mut self, dt: f32) {
        self.tap_timer += dt;
        if self.tap_timer >= DEMO_TAP_INTERVAL {
            self.tap_timer = 0.0;
            self.autotap();
        }

        let finished = self.session.presenter_mut().advance(dt);
        for ticket in finished {
            self.session.segment_animation_complete(ticket);
        }
    }

    fn autotap(&mut self) {
        if self.session.screen() != Screen::Game {
            return;
        }
        let tracker = self.session.tracker();
        let Some(expected) = tracker.expected() else {
            return;
        };
        if tracker.all_tapped() {
            return;
        }

        let index = self.autoplayer.choose(expected, tracker.point_count());
        if self.session.point_tapped(index) == TapOutcome::Rejected {
            self.report.rejected_taps += 1;
        }
    }

    /// Play one level to completion
    pub fn play_level(&mut self, level_index: usize) -> Result<(), LevelError> {
        self.session.select_level(level_index)?;
        self.tap_timer = 0.0;

        for _ in 0..MAX_LEVEL_STEPS {
            if self.session.screen() != Screen::Game {
                self.report.levels_completed += 1;
                return Ok(());
            }
            self.update(SIM_DT);
        }

        log::error!("Level {} did not finish", level_index + 1);
        self.report.stalled_levels += 1;
        Ok(())
    }
}

/// Play every level of a catalog headlessly
pub fn run_all_levels(
    catalog_text: &str,
    settings: Settings,
    seed: u64,
) -> Result<DemoReport, CatalogError> {
    let mut host = DemoHost::new(settings, seed);
    let level_count = host.session.open_catalog(catalog_text)?;
    Ok(host.play_all(level_count))
}

/// Play every level of the catalog stored at `path`
pub fn run_all_levels_from_resource(
    path: &Path,
    settings: Settings,
    seed: u64,
) -> Result<DemoReport, CatalogError> {
    let mut host = DemoHost::new(settings, seed);
    let level_count = host.session.open_catalog_resource(path)?;
    Ok(host.play_all(level_count))
}

impl DemoHost {
    fn play_all(mut self, level_count: usize) -> DemoReport {
        for level_index in 0..level_count {
            match self.play_level(level_index) {
                Ok(()) => {}
                Err(LevelError::EmptyLevel(_)) => self.report.empty_levels += 1,
                Err(e) => log::warn!("Skipping level {}: {}", level_index + 1, e),
            }
        }

        // Drain ropes abandoned by earlier levels; their completions are stale
        while !self.session.presenter().in_flight.is_empty() {
            self.update(SIM_DT);
        }

        log::info!("Demo finished: {:?}", self.report);
        self.report
    }
}
