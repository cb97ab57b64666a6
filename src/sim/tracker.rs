//! Tap sequencing state machine
//!
//! The tracker is the only owner of puzzle progress. Point widgets raise taps;
//! the tracker decides whether a tap is the legal next step and which ropes
//! that step produces.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tracker phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackerPhase {
    /// No level loaded
    Idle,
    /// Waiting for the point at `expected`
    Active { expected: usize },
    /// Closing rope has finished animating
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TrackerError {
    #[error("level has no valid points")]
    EmptyLevel,
}

/// Which kind of rope a segment draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentKind {
    /// Between consecutive points
    Forward,
    /// From the last point back to point 0
    Closing,
}

/// A rope to draw, by point index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub from: usize,
    pub to: usize,
    pub kind: SegmentKind,
}

impl Segment {
    pub fn forward(from: usize, to: usize) -> Self {
        Self {
            from,
            to,
            kind: SegmentKind::Forward,
        }
    }

    pub fn closing(last: usize) -> Self {
        Self {
            from: last,
            to: 0,
            kind: SegmentKind::Closing,
        }
    }

    #[inline]
    pub fn is_closing(&self) -> bool {
        self.kind == SegmentKind::Closing
    }
}

/// Result of a tap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// Wrong point, repeat tap, or no active level. Nothing changed.
    Rejected,
    /// The tap advanced the sequence
    Accepted {
        index: usize,
        /// Rope from the previous point (none for point 0)
        forward: Option<Segment>,
        /// Rope back to point 0 (only for the last point)
        closing: Option<Segment>,
    },
}

impl TapOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, TapOutcome::Accepted { .. })
    }

    /// Segments produced by this tap, in the order they must animate
    pub fn segments(&self) -> impl Iterator<Item = Segment> {
        let (forward, closing) = match *self {
            TapOutcome::Accepted {
                forward, closing, ..
            } => (forward, closing),
            TapOutcome::Rejected => (None, None),
        };
        forward.into_iter().chain(closing)
    }
}

/// Expected-index state machine for one level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceTracker {
    phase: TrackerPhase,
    point_count: usize,
}

impl Default for SequenceTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceTracker {
    pub fn new() -> Self {
        Self {
            phase: TrackerPhase::Idle,
            point_count: 0,
        }
    }

    /// Start a level with `point_count` points.
    ///
    /// An empty level leaves the tracker `Idle`.
    pub fn reset(&mut self, point_count: usize) -> Result<(), TrackerError> {
        self.point_count = point_count;
        if point_count == 0 {
            self.phase = TrackerPhase::Idle;
            return Err(TrackerError::EmptyLevel);
        }
        self.phase = TrackerPhase::Active { expected: 0 };
        Ok(())
    }

    /// Drop the current level
    pub fn clear(&mut self) {
        self.phase = TrackerPhase::Idle;
        self.point_count = 0;
    }

    pub fn tap(&mut self, index: usize) -> TapOutcome {
        let TrackerPhase::Active { expected } = self.phase else {
            return TapOutcome::Rejected;
        };
        // Every point tapped: only the closing rope is left
        if index != expected || expected >= self.point_count {
            return TapOutcome::Rejected;
        }

        let forward = (expected > 0).then(|| Segment::forward(expected - 1, expected));
        let next = expected + 1;
        let closing = (next == self.point_count).then(|| Segment::closing(self.point_count - 1));

        self.phase = TrackerPhase::Active { expected: next };

        TapOutcome::Accepted {
            index,
            forward,
            closing,
        }
    }

    /// Closing rope finished: the level is done.
    ///
    /// Ignored unless every point has been tapped.
    pub fn mark_complete(&mut self) -> bool {
        match self.phase {
            TrackerPhase::Active { expected } if expected == self.point_count => {
                self.phase = TrackerPhase::Complete;
                true
            }
            _ => false,
        }
    }

    pub fn phase(&self) -> TrackerPhase {
        self.phase
    }

    /// Next index to tap, if a level is in progress
    pub fn expected(&self) -> Option<usize> {
        match self.phase {
            TrackerPhase::Active { expected } => Some(expected),
            _ => None,
        }
    }

    pub fn point_count(&self) -> usize {
        self.point_count
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, TrackerPhase::Active { .. })
    }

    /// Whether every point has been tapped (closing rope may still be animating)
    pub fn all_tapped(&self) -> bool {
        match self.phase {
            TrackerPhase::Active { expected } => expected == self.point_count,
            TrackerPhase::Complete => true,
            TrackerPhase::Idle => false,
        }
    }

    /// Derived from progress; there is no stored per-point flag.
    pub fn is_visited(&self, index: usize) -> bool {
        match self.phase {
            TrackerPhase::Active { expected } => index < expected,
            TrackerPhase::Complete => index < self.point_count,
            TrackerPhase::Idle => false,
        }
    }
}
