//! FIFO of inputs waiting to be played, paced by a fixed delay.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use stacker_core::Input;
use stacker_engine::{BoardState, LockOutcome};

#[derive(Debug, Clone)]
pub struct InputQueue {
    inputs: VecDeque<Input>,
    delay: Duration,
    next_at: Option<Instant>,
}

impl InputQueue {
    pub fn new(delay: Duration) -> Self {
        Self {
            inputs: VecDeque::new(),
            delay,
            next_at: None,
        }
    }

    /// Append a move list. A hold anywhere in it is played first, which
    /// only makes sense for a fresh piece: lists with a hold must be loaded
    /// into an empty queue.
    pub fn load(&mut self, inputs: &[Input]) {
        if inputs.contains(&Input::Hold) {
            debug_assert!(
                self.inputs.is_empty(),
                "hold loaded behind {} queued inputs",
                self.inputs.len()
            );
            self.inputs.push_back(Input::Hold);
        }
        self.inputs
            .extend(inputs.iter().copied().filter(|&i| i != Input::Hold));
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn clear(&mut self) {
        self.inputs.clear();
        self.next_at = None;
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Next input if the delay since the previous one has passed
    pub fn pop_due(&mut self, now: Instant) -> Option<Input> {
        if self.next_at.is_some_and(|at| now < at) {
            return None;
        }
        let input = self.inputs.pop_front()?;
        self.next_at = Some(now + self.delay);
        Some(input)
    }

    /// Feed every due input to `state`; returns the lock outcome if a hard
    /// drop went through
    pub fn play_due(&mut self, state: &mut BoardState, now: Instant) -> Option<LockOutcome> {
        while let Some(input) = self.pop_due(now) {
            if let Some(outcome) = state.apply_input(input) {
                return Some(outcome);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hold_goes_first() {
        let mut queue = InputQueue::new(Duration::ZERO);
        queue.load(&[Input::Left, Input::Hold, Input::HardDrop]);
        let now = Instant::now();
        let played: Vec<_> = std::iter::from_fn(|| queue.pop_due(now)).collect();
        assert_eq!(played, vec![Input::Hold, Input::Left, Input::HardDrop]);
    }

    #[test]
    fn test_delay_paces_inputs() {
        let mut queue = InputQueue::new(Duration::from_millis(10));
        queue.load(&[Input::Left, Input::Right]);
        let t0 = Instant::now();
        assert_eq!(queue.pop_due(t0), Some(Input::Left));
        assert_eq!(queue.pop_due(t0 + Duration::from_millis(5)), None);
        assert_eq!(queue.pop_due(t0 + Duration::from_millis(10)), Some(Input::Right));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_play_due_stops_at_lock() {
        let mut state = BoardState::with_seed(9, 3);
        let mut queue = InputQueue::new(Duration::ZERO);
        queue.load(&[Input::DasLeft, Input::HardDrop, Input::HardDrop]);
        let outcome = queue.play_due(&mut state, Instant::now()).unwrap();
        assert!(!outcome.game_over);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_plain_lists_append_in_order() {
        let mut queue = InputQueue::new(Duration::ZERO);
        queue.load(&[Input::Left]);
        queue.load(&[Input::RotateCw, Input::HardDrop]);
        let now = Instant::now();
        let played: Vec<Input> = std::iter::from_fn(|| queue.pop_due(now)).collect();
        assert_eq!(played, vec![Input::Left, Input::RotateCw, Input::HardDrop]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "hold loaded behind")]
    fn test_hold_behind_leftovers_is_rejected() {
        let mut queue = InputQueue::new(Duration::ZERO);
        queue.load(&[Input::Left]);
        queue.load(&[Input::Hold, Input::HardDrop]);
    }
}
