//! Two-bit quadrature states and Gray-code step classification.
//!
//! Channel A and channel B of an incremental encoder form a 4-state
//! Gray-code cycle. Each valid edge changes exactly one bit:
//!
//! ```text
//! clockwise:          00 -> 01 -> 11 -> 10 -> 00
//! counter-clockwise:  00 -> 10 -> 11 -> 01 -> 00
//! ```
//!
//! A transition that flips both bits means at least one edge was missed,
//! and the direction of travel can no longer be recovered.
//!
//! # Example
//!
//! ```rust
//! use rs_rotary::{QuadratureState, Step};
//!
//! let a = QuadratureState::from_pins(false, false);
//! let b = QuadratureState::from_pins(false, true);
//!
//! assert_eq!(Step::between(a, b), Step::Clockwise);
//! assert_eq!(Step::between(b, a), Step::CounterClockwise);
//! assert_eq!(Step::between(a, QuadratureState::from_bits(0b11)), Step::Invalid);
//! ```

/// Combined level of channel A (high bit) and channel B (low bit).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuadratureState(u8);

impl QuadratureState {
    /// Clockwise traversal order of the Gray-code cycle.
    pub const SEQUENCE: [QuadratureState; 4] = [
        QuadratureState(0b00),
        QuadratureState(0b01),
        QuadratureState(0b11),
        QuadratureState(0b10),
    ];

    /// Builds a state from raw bits. Only the low two bits are kept.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0b11)
    }

    /// Builds a state from the logic levels of both channels.
    #[inline]
    pub const fn from_pins(a: bool, b: bool) -> Self {
        Self(((a as u8) << 1) | b as u8)
    }

    /// Returns the two-bit value (`A << 1 | B`).
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Level of channel A.
    #[inline]
    pub const fn a(self) -> bool {
        self.0 & 0b10 != 0
    }

    /// Level of channel B.
    #[inline]
    pub const fn b(self) -> bool {
        self.0 & 0b01 != 0
    }

    /// Index of this state within [`SEQUENCE`](Self::SEQUENCE).
    #[inline]
    const fn phase(self) -> u8 {
        match self.0 {
            0b00 => 0,
            0b01 => 1,
            0b11 => 2,
            _ => 3,
        }
    }

    /// The state one clockwise step ahead of this one.
    pub const fn next_clockwise(self) -> Self {
        Self::SEQUENCE[((self.phase() + 1) & 0b11) as usize]
    }

    /// The state one counter-clockwise step ahead of this one.
    pub const fn next_counter_clockwise(self) -> Self {
        Self::SEQUENCE[((self.phase() + 3) & 0b11) as usize]
    }
}

impl From<u8> for QuadratureState {
    fn from(bits: u8) -> Self {
        Self::from_bits(bits)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for QuadratureState {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=u8:b}", self.0)
    }
}

/// Classification of a transition between two observed states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// One Gray-code step in the clockwise direction.
    Clockwise,
    /// One Gray-code step in the counter-clockwise direction.
    CounterClockwise,
    /// Same state observed again; no movement.
    Unchanged,
    /// Both bits changed at once (missed edge). Direction is ambiguous.
    Invalid,
}

impl Step {
    /// Classifies the transition `from -> to`.
    pub const fn between(from: QuadratureState, to: QuadratureState) -> Self {
        match (to.phase() + 4 - from.phase()) & 0b11 {
            0 => Step::Unchanged,
            1 => Step::Clockwise,
            3 => Step::CounterClockwise,
            _ => Step::Invalid,
        }
    }

    /// Raw position change for this step: +1, -1 or 0.
    #[inline]
    pub const fn delta(self) -> i64 {
        match self {
            Step::Clockwise => 1,
            Step::CounterClockwise => -1,
            Step::Unchanged | Step::Invalid => 0,
        }
    }

    /// True if the step moved the raw counter.
    #[inline]
    pub const fn is_movement(self) -> bool {
        matches!(self, Step::Clockwise | Step::CounterClockwise)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(bits: u8) -> QuadratureState {
        QuadratureState::from_bits(bits)
    }

    // =========================================================================
    // QuadratureState Tests
    // =========================================================================

    #[test]
    fn from_pins_packs_a_high_b_low() {
        assert_eq!(QuadratureState::from_pins(false, false).bits(), 0b00);
        assert_eq!(QuadratureState::from_pins(false, true).bits(), 0b01);
        assert_eq!(QuadratureState::from_pins(true, false).bits(), 0b10);
        assert_eq!(QuadratureState::from_pins(true, true).bits(), 0b11);
    }

    #[test]
    fn from_bits_masks_high_bits() {
        assert_eq!(s(0b1110).bits(), 0b10);
        assert_eq!(QuadratureState::from(0xFF).bits(), 0b11);
    }

    #[test]
    fn channel_accessors() {
        let state = s(0b10);
        assert!(state.a());
        assert!(!state.b());
    }

    #[test]
    fn next_clockwise_walks_sequence() {
        let mut state = s(0b00);
        let mut seen = [0u8; 4];
        for slot in seen.iter_mut() {
            state = state.next_clockwise();
            *slot = state.bits();
        }
        assert_eq!(seen, [0b01, 0b11, 0b10, 0b00]);
    }

    #[test]
    fn next_counter_clockwise_reverses_sequence() {
        for state in QuadratureState::SEQUENCE {
            assert_eq!(state.next_clockwise().next_counter_clockwise(), state);
        }
    }

    // =========================================================================
    // Step Classification Tests
    // =========================================================================

    #[test]
    fn clockwise_steps() {
        assert_eq!(Step::between(s(0b00), s(0b01)), Step::Clockwise);
        assert_eq!(Step::between(s(0b01), s(0b11)), Step::Clockwise);
        assert_eq!(Step::between(s(0b11), s(0b10)), Step::Clockwise);
        assert_eq!(Step::between(s(0b10), s(0b00)), Step::Clockwise);
    }

    #[test]
    fn counter_clockwise_steps() {
        assert_eq!(Step::between(s(0b00), s(0b10)), Step::CounterClockwise);
        assert_eq!(Step::between(s(0b10), s(0b11)), Step::CounterClockwise);
        assert_eq!(Step::between(s(0b11), s(0b01)), Step::CounterClockwise);
        assert_eq!(Step::between(s(0b01), s(0b00)), Step::CounterClockwise);
    }

    #[test]
    fn double_bit_flips_are_invalid() {
        assert_eq!(Step::between(s(0b00), s(0b11)), Step::Invalid);
        assert_eq!(Step::between(s(0b11), s(0b00)), Step::Invalid);
        assert_eq!(Step::between(s(0b01), s(0b10)), Step::Invalid);
        assert_eq!(Step::between(s(0b10), s(0b01)), Step::Invalid);
    }

    #[test]
    fn same_state_is_unchanged() {
        for state in QuadratureState::SEQUENCE {
            assert_eq!(Step::between(state, state), Step::Unchanged);
        }
    }

    #[test]
    fn step_delta() {
        assert_eq!(Step::Clockwise.delta(), 1);
        assert_eq!(Step::CounterClockwise.delta(), -1);
        assert_eq!(Step::Unchanged.delta(), 0);
        assert_eq!(Step::Invalid.delta(), 0);
        assert!(Step::Clockwise.is_movement());
        assert!(!Step::Invalid.is_movement());
    }
}
