//! Puzzle simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - No rendering or platform dependencies
//! - State changes only in response to taps and rope completions
//! - Order of points and ropes is load-bearing

pub mod catalog;
pub mod coords;
pub mod queue;
pub mod tracker;

pub use catalog::{CatalogError, Level, LevelCatalog, Point, RawCatalog, RawLevel, display_number};
pub use coords::{parse_coordinates, parse_invariant};
pub use queue::{AnimationQueue, AnimationTicket, Completion};
pub use tracker::{Segment, SegmentKind, SequenceTracker, TapOutcome, TrackerError, TrackerPhase};
