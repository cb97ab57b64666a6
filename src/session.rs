//! Game session
//!
//! Wires level loading, tap sequencing and rope animation together and tells
//! the presenter what to show. The host owns the session and feeds it events;
//! nothing here is global.

use std::path::Path;

use glam::Vec2;
use thiserror::Error;

use crate::presenter::Presenter;
use crate::settings::Settings;
use crate::sim::{
    AnimationQueue, AnimationTicket, CatalogError, Completion, LevelCatalog, SequenceTracker,
    TapOutcome, TrackerError, display_number,
};

/// Screen currently shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Game,
    /// Catalog failed to load; there is no way out of this screen
    Error,
}

/// Inbound events from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    PointTapped(usize),
    LevelSelected(usize),
    ExitRequested,
    SegmentAnimationComplete(AnimationTicket),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("no level catalog loaded")]
    NoCatalog,

    #[error("level {0} does not exist")]
    UnknownLevel(usize),

    #[error("level {0} has no valid points")]
    EmptyLevel(usize),
}

pub struct GameSession<P: Presenter> {
    presenter: P,
    settings: Settings,
    catalog: Option<LevelCatalog>,
    tracker: SequenceTracker,
    queue: AnimationQueue,
    screen: Screen,
    current_level: Option<usize>,
    /// Point widgets of the current level, by point index
    points: Vec<P::PointHandle>,
    positions: Vec<Vec2>,
}

impl<P: Presenter> GameSession<P> {
    pub fn new(presenter: P, settings: Settings) -> Self {
        Self {
            presenter,
            settings,
            catalog: None,
            tracker: SequenceTracker::new(),
            queue: AnimationQueue::new(),
            screen: Screen::Menu,
            current_level: None,
            points: Vec::new(),
            positions: Vec::new(),
        }
    }

    /// Load the catalog from JSON text and populate the menu.
    ///
    /// Meant to be called once at startup. On failure the error screen is
    /// shown and stays up.
    pub fn open_catalog(&mut self, text: &str) -> Result<usize, CatalogError> {
        self.install_catalog(LevelCatalog::from_json(text))
    }

    /// Load the catalog from the named resource
    pub fn open_catalog_resource(&mut self, path: &Path) -> Result<usize, CatalogError> {
        self.install_catalog(LevelCatalog::from_resource(path))
    }

    fn install_catalog(
        &mut self,
        catalog: Result<LevelCatalog, CatalogError>,
    ) -> Result<usize, CatalogError> {
        let catalog = match catalog {
            Ok(catalog) => catalog,
            Err(e) => {
                log::error!("Level catalog unavailable: {}", e);
                self.catalog = None;
                self.screen = Screen::Error;
                self.presenter.show_error(self.settings.effective_fade_time());
                return Err(e);
            }
        };

        for level_index in 0..catalog.len() {
            self.presenter
                .instantiate_level_button(display_number(level_index), level_index);
        }
        let count = catalog.len();
        self.catalog = Some(catalog);

        self.screen = Screen::Menu;
        self.presenter.set_empty_level_error(false);
        self.presenter.show_menu(0.0);
        Ok(count)
    }

    /// Dispatch a host event
    pub fn handle(&mut self, event: SessionEvent) -> Result<(), LevelError> {
        match event {
            SessionEvent::PointTapped(index) => {
                self.point_tapped(index);
            }
            SessionEvent::LevelSelected(index) => self.select_level(index)?,
            SessionEvent::ExitRequested => self.exit_to_menu(),
            SessionEvent::SegmentAnimationComplete(ticket) => {
                self.segment_animation_complete(ticket);
            }
        }
        Ok(())
    }

    /// Start (or restart) a level.
    ///
    /// An empty level shows the inline error and keeps the current screen.
    pub fn select_level(&mut self, level_index: usize) -> Result<(), LevelError> {
        let Some(catalog) = &self.catalog else {
            log::warn!("Level {} selected without a catalog", level_index);
            return Err(LevelError::NoCatalog);
        };
        let Some(level) = catalog.level(level_index) else {
            log::warn!("Level {} selected but does not exist", level_index);
            return Err(LevelError::UnknownLevel(level_index));
        };
        let positions: Vec<Vec2> = level.points().iter().map(|p| p.position).collect();

        // Fresh start: late completions from the previous level become stale
        self.presenter.clear_level_visuals();
        self.points.clear();
        self.positions.clear();
        self.queue.reset();
        self.current_level = None;

        match self.tracker.reset(positions.len()) {
            Ok(()) => {}
            Err(TrackerError::EmptyLevel) => {
                log::warn!("Level {} has no valid points", display_number(level_index));
                self.presenter.set_empty_level_error(true);
                return Err(LevelError::EmptyLevel(level_index));
            }
        }

        for (index, &position) in positions.iter().enumerate() {
            let handle = self.presenter.render_point(index, position);
            self.presenter.set_point_visual_state(&handle, false);
            self.points.push(handle);
        }
        self.positions = positions;
        self.current_level = Some(level_index);

        self.presenter.set_empty_level_error(false);
        self.presenter.show_game(self.settings.effective_fade_time());
        self.screen = Screen::Game;

        log::info!(
            "Started level {} ({} points, generation {})",
            display_number(level_index),
            self.positions.len(),
            self.queue.generation()
        );
        Ok(())
    }

    /// A point widget was tapped.
    ///
    /// Wrong or repeated taps are ignored. Accepted taps take effect
    /// immediately, even while ropes are still animating.
    pub fn point_tapped(&mut self, index: usize) -> TapOutcome {
        let outcome = self.tracker.tap(index);
        if !outcome.is_accepted() {
            log::debug!("Ignoring tap on point {}", index);
            return outcome;
        }

        if let Some(handle) = self.points.get(index) {
            self.presenter.set_point_visual_state(handle, true);
        }

        for segment in outcome.segments() {
            if let Some(ticket) = self.queue.enqueue(segment) {
                self.start_rope(ticket);
            }
        }
        outcome
    }

    /// The presenter finished the rope for `ticket`
    pub fn segment_animation_complete(&mut self, ticket: AnimationTicket) -> Completion {
        let completion = self.queue.complete(ticket);
        match completion {
            Completion::Next(next) => self.start_rope(next),
            Completion::LevelComplete => self.finish_level(),
            Completion::Stale | Completion::Drained => {}
        }
        completion
    }

    /// Abandon the current level and return to the menu
    pub fn exit_to_menu(&mut self) {
        if self.screen != Screen::Game {
            return;
        }
        self.queue.reset();
        self.tracker.clear();
        self.current_level = None;
        self.show_menu();
    }

    fn start_rope(&mut self, ticket: AnimationTicket) {
        let segment = ticket.segment;
        let (Some(&from), Some(&to)) = (
            self.positions.get(segment.from),
            self.positions.get(segment.to),
        ) else {
            log::error!("Rope {:?} references a missing point", segment);
            return;
        };

        self.presenter.play_segment_animation(
            ticket,
            from,
            to,
            self.settings.effective_rope_time(),
            self.settings.rope_ease,
        );
    }

    fn finish_level(&mut self) {
        self.tracker.mark_complete();
        if let Some(level_index) = self.current_level {
            log::info!("Level {} complete", display_number(level_index));
        }
        self.show_menu();
    }

    fn show_menu(&mut self) {
        self.screen = Screen::Menu;
        self.presenter.show_menu(self.settings.effective_fade_time());
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn current_level(&self) -> Option<usize> {
        self.current_level
    }

    pub fn tracker(&self) -> &SequenceTracker {
        &self.tracker
    }

    pub fn queue(&self) -> &AnimationQueue {
        &self.queue
    }

    pub fn catalog(&self) -> Option<&LevelCatalog> {
        self.catalog.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::{HeadlessPresenter, Shown};
    use crate::sim::{Segment, TrackerPhase};

    const CATALOG: &str = r#"{
        "levels": [
            { "level_data": ["0", "0", "10", "0", "10", "10"] },
            { "level_data": ["x", "1"] },
            { "level_data": ["5", "5", "6", "6"] }
        ]
    }"#;

    fn session() -> GameSession<HeadlessPresenter> {
        let mut session = GameSession::new(HeadlessPresenter::new(), Settings::default());
        session.open_catalog(CATALOG).unwrap();
        session
    }

    fn current_segment(session: &GameSession<HeadlessPresenter>) -> Option<Segment> {
        session.queue().current().map(|t| t.segment)
    }

    #[test]
    fn test_catalog_populates_menu() {
        let session = session();
        assert_eq!(session.screen(), Screen::Menu);
        assert_eq!(session.presenter().buttons, vec![(1, 0), (2, 1), (3, 2)]);
    }

    #[test]
    fn test_catalog_failure_shows_error() {
        let mut session = GameSession::new(HeadlessPresenter::new(), Settings::default());
        assert_eq!(session.open_catalog(""), Err(CatalogError::Empty));
        assert_eq!(session.screen(), Screen::Error);
        assert_eq!(session.presenter().shown, Some(Shown::Error));
        assert!(session.presenter().buttons.is_empty());
        assert_eq!(session.select_level(0), Err(LevelError::NoCatalog));
        assert_eq!(session.screen(), Screen::Error);
    }

    #[test]
    fn test_missing_catalog_resource_shows_error() {
        let mut session = GameSession::new(HeadlessPresenter::new(), Settings::default());
        let err = session
            .open_catalog_resource(Path::new("missing/level_data.json"))
            .unwrap_err();
        assert!(matches!(err, CatalogError::Missing(_)));
        assert_eq!(session.screen(), Screen::Error);
        assert!(session.catalog().is_none());
    }

    #[test]
    fn test_select_level_renders_points() {
        let mut session = session();
        session.select_level(0).unwrap();
        assert_eq!(session.screen(), Screen::Game);
        assert_eq!(session.tracker().phase(), TrackerPhase::Active { expected: 0 });

        let presenter = session.presenter();
        assert_eq!(presenter.points.len(), 3);
        assert!(presenter.points.iter().all(|p| !p.active));
        assert_eq!(presenter.points[2].position, Vec2::new(10.0, -10.0));
        assert_eq!(presenter.shown, Some(Shown::Game));
    }

    #[test]
    fn test_unknown_level() {
        let mut session = session();
        assert_eq!(session.select_level(7), Err(LevelError::UnknownLevel(7)));
        assert_eq!(session.screen(), Screen::Menu);
    }

    #[test]
    fn test_empty_level_stays_idle() {
        let mut session = session();
        assert_eq!(session.select_level(1), Err(LevelError::EmptyLevel(1)));
        assert_eq!(session.tracker().phase(), TrackerPhase::Idle);
        assert_eq!(session.screen(), Screen::Menu);
        assert!(session.presenter().empty_level_error);

        // Taps on an empty level do nothing
        assert_eq!(session.point_tapped(0), TapOutcome::Rejected);

        // Picking a real level hides the indicator again
        session.select_level(0).unwrap();
        assert!(!session.presenter().empty_level_error);
    }

    #[test]
    fn test_full_level_in_order() {
        let mut session = session();
        session.select_level(0).unwrap();

        assert!(session.point_tapped(0).is_accepted());
        assert!(!session.queue().is_animating());
        assert!(session.presenter().points[0].active);

        session.point_tapped(1);
        let first = session.queue().current().unwrap();
        assert_eq!(first.segment, Segment::forward(0, 1));

        // Tap ahead while the first rope is still animating
        session.point_tapped(2);
        assert!(session.tracker().all_tapped());
        assert_eq!(session.queue().pending_len(), 2);
        assert!(session.presenter().points.iter().all(|p| p.active));

        let Completion::Next(second) = session.segment_animation_complete(first) else {
            panic!("second rope should start");
        };
        assert_eq!(second.segment, Segment::forward(1, 2));

        let Completion::Next(closing) = session.segment_animation_complete(second) else {
            panic!("closing rope should start");
        };
        assert_eq!(closing.segment, Segment::closing(2));
        assert_eq!(session.screen(), Screen::Game);

        assert_eq!(
            session.segment_animation_complete(closing),
            Completion::LevelComplete
        );
        assert_eq!(session.tracker().phase(), TrackerPhase::Complete);
        assert_eq!(session.screen(), Screen::Menu);
        assert_eq!(session.presenter().shown, Some(Shown::Menu));

        let started: Vec<Segment> = session
            .presenter()
            .started
            .iter()
            .map(|t| t.segment)
            .collect();
        assert_eq!(
            started,
            vec![
                Segment::forward(0, 1),
                Segment::forward(1, 2),
                Segment::closing(2)
            ]
        );
    }

    #[test]
    fn test_taps_after_last_point_ignored() {
        let mut session = session();
        session.select_level(2).unwrap();
        session.point_tapped(0);
        session.point_tapped(1);
        assert_eq!(session.point_tapped(2), TapOutcome::Rejected);
        assert_eq!(session.point_tapped(3), TapOutcome::Rejected);
        assert_eq!(session.queue().pending_len(), 1);

        let first = session.queue().current().unwrap();
        let Completion::Next(closing) = session.segment_animation_complete(first) else {
            panic!("closing rope should start");
        };
        assert!(closing.segment.is_closing());
        assert_eq!(
            session.segment_animation_complete(closing),
            Completion::LevelComplete
        );
        assert_eq!(session.tracker().phase(), TrackerPhase::Complete);
        assert_eq!(session.screen(), Screen::Menu);
        assert!(!session.queue().is_animating());
    }

    #[test]
    fn test_out_of_order_taps_ignored() {
        let mut session = session();
        session.select_level(0).unwrap();
        assert_eq!(session.point_tapped(2), TapOutcome::Rejected);
        assert_eq!(session.point_tapped(1), TapOutcome::Rejected);
        assert!(!session.presenter().points[2].active);
        assert_eq!(session.tracker().expected(), Some(0));
        assert!(session.presenter().started.is_empty());
    }

    #[test]
    fn test_reset_mid_animation_drops_stale_completion() {
        let mut session = session();
        session.select_level(0).unwrap();
        session.point_tapped(0);
        session.point_tapped(1);
        let stale = session.queue().current().unwrap();

        session.select_level(2).unwrap();
        session.point_tapped(0);
        session.point_tapped(1);
        let fresh = session.queue().current().unwrap();
        assert_eq!(fresh.segment, Segment::forward(0, 1));

        assert_eq!(session.segment_animation_complete(stale), Completion::Stale);
        assert_eq!(current_segment(&session), Some(Segment::forward(0, 1)));
        assert_eq!(session.tracker().expected(), Some(2));
        assert_eq!(session.screen(), Screen::Game);
    }

    #[test]
    fn test_exit_to_menu_abandons_level() {
        let mut session = session();
        session.select_level(2).unwrap();
        session.point_tapped(0);
        session.point_tapped(1);
        let ticket = session.queue().current().unwrap();

        session.handle(SessionEvent::ExitRequested).unwrap();
        assert_eq!(session.screen(), Screen::Menu);
        assert_eq!(session.tracker().phase(), TrackerPhase::Idle);
        assert_eq!(session.segment_animation_complete(ticket), Completion::Stale);
        assert_eq!(session.point_tapped(0), TapOutcome::Rejected);
    }

    #[test]
    fn test_handle_dispatch() {
        let mut session = session();
        assert_eq!(
            session.handle(SessionEvent::LevelSelected(1)),
            Err(LevelError::EmptyLevel(1))
        );
        session.handle(SessionEvent::LevelSelected(2)).unwrap();
        session.handle(SessionEvent::PointTapped(0)).unwrap();
        session.handle(SessionEvent::PointTapped(1)).unwrap();
        let ticket = session.queue().current().unwrap();
        session
            .handle(SessionEvent::SegmentAnimationComplete(ticket))
            .unwrap();
        let closing = session.queue().current().unwrap();
        assert!(closing.segment.is_closing());
        session
            .handle(SessionEvent::SegmentAnimationComplete(closing))
            .unwrap();
        assert_eq!(session.screen(), Screen::Menu);
    }

    #[test]
    fn test_rope_uses_settings() {
        let settings = Settings {
            rope_animate_time: 2.0,
            rope_ease: crate::easing::Easing::CubicIn,
            ..Default::default()
        };
        let mut session = GameSession::new(HeadlessPresenter::new(), settings);
        session.open_catalog(CATALOG).unwrap();
        session.select_level(0).unwrap();
        session.point_tapped(0);
        session.point_tapped(1);

        let rope = &session.presenter().in_flight[0];
        assert_eq!(rope.duration, 2.0);
        assert_eq!(rope.ease, crate::easing::Easing::CubicIn);
        assert_eq!(rope.geometry.origin, Vec2::new(0.0, 0.0));
        assert_eq!(rope.geometry.target, Vec2::new(10.0, 0.0));
    }
}
