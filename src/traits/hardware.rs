//! Hardware-facing traits for feeding and reading a rotary encoder.
//!
//! The decoder is push-driven: the platform layer samples channel A and B
//! (from an interrupt or a polling loop) and hands each new two-bit state
//! to a [`TransitionSink`]. Consumers that only care about movement read it
//! back through [`EncoderInput`].
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`TransitionSink`] | Accepts two-bit pin states |
//! | [`EncoderInput`] | Relative movement since last read |
//!
//! # Example
//!
//! ```rust
//! use rs_rotary::traits::{Direction, TransitionSink};
//! use rs_rotary::QuadratureDecoder;
//!
//! let mut decoder = QuadratureDecoder::new();
//! decoder.set_divisor(1).unwrap();
//!
//! decoder.on_pins(false, false); // baseline
//! decoder.on_pins(false, true);  // one clockwise edge
//!
//! assert_eq!(decoder.position(), 1);
//! assert_eq!(decoder.direction(), Direction::Clockwise);
//! ```

use crate::quadrature::{QuadratureState, Step};

/// Direction of the last movement.
///
/// Numerically `+1`, `-1` or `0`, see [`as_i8`](Self::as_i8).
///
/// # Default
///
/// Defaults to [`Stopped`](Self::Stopped).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Position increased.
    Clockwise,
    /// Position decreased.
    CounterClockwise,
    /// No net movement since the previous decode step.
    #[default]
    Stopped,
}

impl Direction {
    /// Returns the direction as `+1`, `-1` or `0`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_rotary::Direction;
    ///
    /// assert_eq!(Direction::Clockwise.as_i8(), 1);
    /// assert_eq!(Direction::CounterClockwise.as_i8(), -1);
    /// assert_eq!(Direction::Stopped.as_i8(), 0);
    /// ```
    #[inline]
    pub const fn as_i8(self) -> i8 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
            Direction::Stopped => 0,
        }
    }

    /// Direction implied by a signed position change.
    #[inline]
    pub const fn from_delta(delta: i64) -> Self {
        if delta > 0 {
            Direction::Clockwise
        } else if delta < 0 {
            Direction::CounterClockwise
        } else {
            Direction::Stopped
        }
    }
}

impl From<Direction> for i8 {
    fn from(dir: Direction) -> i8 {
        dir.as_i8()
    }
}

/// Receiver of raw two-bit pin states.
///
/// Call once per observed edge on either channel. Implementations must be
/// bounded-time and must not allocate, since callers typically run in an
/// interrupt handler.
pub trait TransitionSink {
    /// Ingests a new combined A/B state and returns how it was classified.
    fn on_transition(&mut self, state: QuadratureState) -> Step;

    /// Convenience wrapper taking the individual channel levels.
    fn on_pins(&mut self, a: bool, b: bool) -> Step {
        self.on_transition(QuadratureState::from_pins(a, b))
    }
}

/// Relative encoder input, polled from the main loop.
///
/// # Implementation Notes
///
/// - `read_delta()` returns position units moved since the previous call
/// - Positive values = clockwise rotation
pub trait EncoderInput {
    /// Returns delta position since last call (positive = clockwise).
    fn read_delta(&mut self) -> i32;

    /// Returns the direction of the movement reported by `read_delta()`
    /// without consuming it.
    ///
    /// Default implementation reports [`Direction::Stopped`].
    fn pending_direction(&self) -> Direction {
        Direction::Stopped
    }
}
