//! Mock pin driver for testing without hardware.
//!
//! [`MockPins`] plays the role of the platform layer: it holds the current
//! level of channel A and B and pushes each new state into a
//! [`TransitionSink`], exactly as a pin-change interrupt would.
//!
//! # Example
//!
//! ```rust
//! use rs_rotary::hal::MockPins;
//! use rs_rotary::{Direction, QuadratureDecoder};
//!
//! let mut decoder = QuadratureDecoder::new();
//! let mut pins = MockPins::new();
//!
//! pins.baseline(&mut decoder);
//! pins.rotate(&mut decoder, 8); // two detents clockwise
//! assert_eq!(decoder.position(), 2);
//! assert_eq!(decoder.direction(), Direction::Clockwise);
//!
//! // A single edge back drops below the second detent
//! pins.rotate(&mut decoder, -1);
//! assert_eq!(decoder.position(), 1);
//! assert_eq!(decoder.direction(), Direction::CounterClockwise);
//! assert_eq!(pins.history().len(), 10);
//! ```

use alloc::vec::Vec;

use crate::quadrature::{QuadratureState, Step};
use crate::traits::TransitionSink;

/// Simulated A/B pin pair.
///
/// Records every state it emits so tests can replay or inspect them. The
/// history grows with every edge; long-running drivers should call
/// [`clear_history`](Self::clear_history) periodically.
#[derive(Debug, Default, Clone)]
pub struct MockPins {
    state: QuadratureState,
    history: Vec<QuadratureState>,
}

impl MockPins {
    /// Creates pins resting at `00`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates pins resting at the given state.
    pub fn at(state: QuadratureState) -> Self {
        Self {
            state,
            history: Vec::new(),
        }
    }

    /// Current pin state.
    pub fn state(&self) -> QuadratureState {
        self.state
    }

    /// Every state emitted so far, oldest first.
    pub fn history(&self) -> &[QuadratureState] {
        &self.history
    }

    /// Drops the recorded history, keeping the current pin state.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn emit<S: TransitionSink>(&mut self, sink: &mut S, state: QuadratureState) -> Step {
        self.state = state;
        self.history.push(state);
        sink.on_transition(state)
    }

    /// Emits the current state without moving (first read).
    pub fn baseline<S: TransitionSink>(&mut self, sink: &mut S) -> Step {
        self.emit(sink, self.state)
    }

    /// Emits `steps` single Gray-code edges; negative is counter-clockwise.
    ///
    /// Returns how many of them the sink classified as movement.
    pub fn rotate<S: TransitionSink>(&mut self, sink: &mut S, steps: i32) -> u32 {
        let mut moved = 0;
        for _ in 0..steps.unsigned_abs() {
            let next = if steps > 0 {
                self.state.next_clockwise()
            } else {
                self.state.next_counter_clockwise()
            };
            if self.emit(sink, next).is_movement() {
                moved += 1;
            }
        }
        moved
    }

    /// Flips both channels at once, as if an edge had been missed.
    pub fn skip_edge<S: TransitionSink>(&mut self, sink: &mut S) -> Step {
        let skipped = QuadratureState::from_bits(self.state.bits() ^ 0b11);
        self.emit(sink, skipped)
    }

    /// Sets both levels directly and emits the result.
    pub fn set_levels<S: TransitionSink>(&mut self, sink: &mut S, a: bool, b: bool) -> Step {
        self.emit(sink, QuadratureState::from_pins(a, b))
    }

    /// Replays the recorded history into another sink.
    pub fn replay<S: TransitionSink>(&self, sink: &mut S) {
        for state in &self.history {
            sink.on_transition(*state);
        }
    }
}
