//! Rope animation queue
//!
//! Ropes animate one at a time in the order their taps were accepted, while
//! taps keep being accepted in the meantime. Each level load starts a new
//! generation; completions carrying an older generation are dropped.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::tracker::Segment;

/// Handle for one rope animation.
///
/// The host passes it back when the animation finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationTicket {
    pub generation: u64,
    pub segment: Segment,
}

/// What the host should do after a completion event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Ticket from a previous level, or not the rope currently animating
    Stale,
    /// Start this rope next
    Next(AnimationTicket),
    /// Nothing pending; wait for more taps
    Drained,
    /// The closing rope finished
    LevelComplete,
}

/// FIFO of pending ropes with at most one animating
#[derive(Debug, Clone, Default)]
pub struct AnimationQueue {
    pending: VecDeque<Segment>,
    current: Option<Segment>,
    generation: u64,
}

impl AnimationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a rope. Returns a ticket when the rope should start right away.
    pub fn enqueue(&mut self, segment: Segment) -> Option<AnimationTicket> {
        if self.current.is_none() {
            self.current = Some(segment);
            return Some(self.ticket(segment));
        }
        self.pending.push_back(segment);
        None
    }

    /// The rope for `ticket` finished animating
    pub fn complete(&mut self, ticket: AnimationTicket) -> Completion {
        if ticket.generation != self.generation || self.current != Some(ticket.segment) {
            log::debug!(
                "Ignoring stale rope completion {:?} (generation {})",
                ticket.segment,
                ticket.generation
            );
            return Completion::Stale;
        }

        self.current = None;

        if ticket.segment.is_closing() {
            self.pending.clear();
            return Completion::LevelComplete;
        }

        match self.pending.pop_front() {
            Some(next) => {
                self.current = Some(next);
                Completion::Next(self.ticket(next))
            }
            None => Completion::Drained,
        }
    }

    /// Forget all ropes and invalidate outstanding tickets
    pub fn reset(&mut self) {
        self.pending.clear();
        self.current = None;
        self.generation += 1;
    }

    pub fn current(&self) -> Option<AnimationTicket> {
        self.current.map(|segment| self.ticket(segment))
    }

    pub fn is_animating(&self) -> bool {
        self.current.is_some()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn ticket(&self, segment: Segment) -> AnimationTicket {
        AnimationTicket {
            generation: self.generation,
            segment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_enqueue_starts_immediately() {
        let mut queue = AnimationQueue::new();
        let ticket = queue.enqueue(Segment::forward(0, 1)).unwrap();
        assert_eq!(ticket.segment, Segment::forward(0, 1));
        assert!(queue.is_animating());
        assert_eq!(queue.pending_len(), 0);
    }

    #[test]
    fn test_busy_enqueue_defers_fifo() {
        let mut queue = AnimationQueue::new();
        let first = queue.enqueue(Segment::forward(0, 1)).unwrap();
        assert!(queue.enqueue(Segment::forward(1, 2)).is_none());
        assert!(queue.enqueue(Segment::forward(2, 3)).is_none());
        assert_eq!(queue.pending_len(), 2);

        let mut finished = vec![first.segment];
        let mut ticket = first;
        loop {
            match queue.complete(ticket) {
                Completion::Next(next) => {
                    // Never more than one animating
                    assert_eq!(queue.current(), Some(next));
                    finished.push(next.segment);
                    ticket = next;
                }
                Completion::Drained => break,
                other => panic!("unexpected completion {:?}", other),
            }
        }

        assert_eq!(
            finished,
            vec![
                Segment::forward(0, 1),
                Segment::forward(1, 2),
                Segment::forward(2, 3)
            ]
        );
        assert!(!queue.is_animating());
    }

    #[test]
    fn test_closing_completion_finishes_level() {
        let mut queue = AnimationQueue::new();
        let first = queue.enqueue(Segment::forward(0, 1)).unwrap();
        queue.enqueue(Segment::closing(1));

        let Completion::Next(closing) = queue.complete(first) else {
            panic!("closing rope should start next");
        };
        assert!(closing.segment.is_closing());
        assert_eq!(queue.complete(closing), Completion::LevelComplete);
        assert!(!queue.is_animating());
    }

    #[test]
    fn test_reset_makes_old_tickets_stale() {
        let mut queue = AnimationQueue::new();
        let old = queue.enqueue(Segment::forward(0, 1)).unwrap();
        queue.reset();
        assert_eq!(queue.generation(), old.generation + 1);
        assert!(!queue.is_animating());

        let fresh = queue.enqueue(Segment::forward(0, 1)).unwrap();
        assert_eq!(queue.complete(old), Completion::Stale);
        // New level's rope is still animating
        assert_eq!(queue.current(), Some(fresh));
        assert_eq!(queue.complete(fresh), Completion::Drained);
    }

    #[test]
    fn test_duplicate_completion_is_stale() {
        let mut queue = AnimationQueue::new();
        let first = queue.enqueue(Segment::forward(0, 1)).unwrap();
        queue.enqueue(Segment::forward(1, 2));
        assert!(matches!(queue.complete(first), Completion::Next(_)));
        assert_eq!(queue.complete(first), Completion::Stale);
        assert_eq!(queue.pending_len(), 0);
        assert!(queue.is_animating());
    }

    #[test]
    fn test_enqueue_after_drain_starts_again() {
        let mut queue = AnimationQueue::new();
        let first = queue.enqueue(Segment::forward(0, 1)).unwrap();
        assert_eq!(queue.complete(first), Completion::Drained);
        assert!(queue.enqueue(Segment::forward(1, 2)).is_some());
    }
}
