//! Presentation collaborator
//!
//! The session drives the UI only through this trait. Implementations own all
//! widgets, tweens and fades; they report back through session events
//! (`point_tapped`, `level_selected`, `segment_animation_complete`).

use glam::Vec2;

use crate::easing::Easing;
use crate::sim::AnimationTicket;

pub trait Presenter {
    /// Handle to a rendered point widget
    type PointHandle;

    /// Create the widget for point `index` (shows `index + 1` as its label)
    fn render_point(&mut self, index: usize, position: Vec2) -> Self::PointHandle;

    /// Active points show the "tapped" sprite and hide their label
    fn set_point_visual_state(&mut self, handle: &Self::PointHandle, active: bool);

    /// Remove every point and rope of the current level
    fn clear_level_visuals(&mut self);

    /// Grow a rope from `from` to `to`.
    ///
    /// When it finishes, the host must deliver
    /// `SessionEvent::SegmentAnimationComplete(ticket)`.
    fn play_segment_animation(
        &mut self,
        ticket: AnimationTicket,
        from: Vec2,
        to: Vec2,
        duration: f32,
        ease: Easing,
    );

    fn show_menu(&mut self, fade: f32);
    fn show_game(&mut self, fade: f32);
    /// Persistent catalog-load error screen
    fn show_error(&mut self, fade: f32);

    /// Inline "this level is empty" indicator
    fn set_empty_level_error(&mut self, visible: bool);

    /// Menu button labelled "Level {display_index}".
    ///
    /// Clicking it raises `SessionEvent::LevelSelected(level_index)`.
    fn instantiate_level_button(&mut self, display_index: usize, level_index: usize);
}
