//! Interrupt-safe shared decoder.
//!
//! `SharedDecoder` lets an interrupt handler feed transitions while the main
//! loop reads position, direction and revolutions. Every call runs inside a
//! single critical section, so readers never see a half-applied update.
//!
//! # Example
//!
//! ```rust
//! use rs_rotary::{QuadratureState, SharedDecoder};
//!
//! static ENCODER: SharedDecoder = SharedDecoder::new();
//!
//! // Interrupt handler
//! fn on_pin_change(a: bool, b: bool) {
//!     ENCODER.on_transition(QuadratureState::from_pins(a, b));
//! }
//!
//! on_pin_change(false, false);
//! for _ in 0..2 {
//!     on_pin_change(false, true);
//!     on_pin_change(true, true);
//!     on_pin_change(true, false);
//!     on_pin_change(false, false);
//! }
//!
//! // Main loop
//! let state = ENCODER.state();
//! assert_eq!(state.position, 2);
//! assert_eq!(ENCODER.read_delta(), 2);
//! assert_eq!(ENCODER.read_delta(), 0);
//! ```
//!
//! On targets without `std`, link a `critical-section` implementation
//! (e.g. from the chip HAL) as usual.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::config::EncoderConfig;
use crate::decoder::{EncoderState, QuadratureDecoder, RevolutionRounding};
use crate::error::DecoderError;
use crate::quadrature::{QuadratureState, Step};
use crate::traits::{Direction, EncoderInput, TransitionSink};

struct Inner {
    decoder: QuadratureDecoder,
    /// Position at last read_delta() call
    last_read_position: i32,
}

/// A [`QuadratureDecoder`] behind a critical-section mutex.
///
/// All methods take `&self`, so the decoder can live in a `static` shared
/// between interrupt and thread context. No method blocks beyond the length
/// of the critical section.
pub struct SharedDecoder {
    inner: Mutex<RefCell<Inner>>,
}

impl Default for SharedDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedDecoder {
    /// Create a shared decoder with default configuration.
    pub const fn new() -> Self {
        Self::from_decoder(QuadratureDecoder::new())
    }

    /// Wrap an existing decoder.
    pub const fn from_decoder(decoder: QuadratureDecoder) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                last_read_position: decoder.position(),
                decoder,
            })),
        }
    }

    /// Create a shared decoder from a validated configuration.
    pub fn with_config(config: &EncoderConfig) -> Result<Self, DecoderError> {
        QuadratureDecoder::with_config(config).map(Self::from_decoder)
    }

    /// Run `f` with exclusive access to the decoder.
    ///
    /// Keep `f` short: interrupts are masked while it runs.
    pub fn with_decoder<R>(&self, f: impl FnOnce(&mut QuadratureDecoder) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow_ref_mut(cs).decoder))
    }

    /// Ingest one A/B state. Safe to call from an interrupt handler.
    pub fn on_transition(&self, state: QuadratureState) -> Step {
        self.with_decoder(|d| d.on_transition(state))
    }

    /// Consistent snapshot of position, direction and revolutions.
    pub fn state(&self) -> EncoderState {
        self.with_decoder(|d| d.state())
    }

    /// Current position.
    pub fn position(&self) -> i32 {
        self.with_decoder(|d| d.position())
    }

    /// Overwrite the position. Also resets the [`read_delta`](Self::read_delta)
    /// reference, since a manual reposition is not movement.
    pub fn set_position(&self, position: i32) -> Result<(), DecoderError> {
        critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            inner.decoder.set_position(position)?;
            inner.last_read_position = position;
            Ok(())
        })
    }

    /// Raw edges per position unit.
    pub fn divisor(&self) -> i32 {
        self.with_decoder(|d| d.divisor())
    }

    /// See [`QuadratureDecoder::set_divisor`].
    pub fn set_divisor(&self, divisor: i32) -> Result<(), DecoderError> {
        self.with_decoder(|d| d.set_divisor(divisor))
    }

    /// Position units per revolution.
    pub fn counts_per_revolution(&self) -> i32 {
        self.with_decoder(|d| d.counts_per_revolution())
    }

    /// See [`QuadratureDecoder::set_counts_per_revolution`].
    pub fn set_counts_per_revolution(&self, counts: i32) -> Result<(), DecoderError> {
        self.with_decoder(|d| d.set_counts_per_revolution(counts))
    }

    /// See [`QuadratureDecoder::set_rounding`].
    pub fn set_rounding(&self, rounding: RevolutionRounding) -> Result<(), DecoderError> {
        self.with_decoder(|d| d.set_rounding(rounding))
    }

    /// Direction of the last decode step.
    pub fn direction(&self) -> Direction {
        self.with_decoder(|d| d.direction())
    }

    /// Full revolutions from the origin.
    pub fn revolutions(&self) -> i32 {
        self.with_decoder(|d| d.revolutions())
    }

    /// Position change since the previous call (positive = clockwise).
    pub fn read_delta(&self) -> i32 {
        critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            let position = inner.decoder.position();
            let delta = position.wrapping_sub(inner.last_read_position);
            inner.last_read_position = position;
            delta
        })
    }

    /// Direction of the movement not yet consumed by `read_delta()`.
    pub fn pending_direction(&self) -> Direction {
        critical_section::with(|cs| {
            let inner = self.inner.borrow_ref(cs);
            Direction::from_delta(
                i64::from(inner.decoder.position()) - i64::from(inner.last_read_position),
            )
        })
    }

    /// Tear the decoder down; further transitions are ignored.
    pub fn deinit(&self) {
        self.with_decoder(|d| d.deinit())
    }

    /// True after [`deinit`](Self::deinit).
    pub fn is_deinited(&self) -> bool {
        self.with_decoder(|d| d.is_deinited())
    }

    /// Consume the wrapper and return the decoder.
    pub fn into_inner(self) -> QuadratureDecoder {
        self.inner.into_inner().into_inner().decoder
    }
}

impl TransitionSink for &SharedDecoder {
    fn on_transition(&mut self, state: QuadratureState) -> Step {
        SharedDecoder::on_transition(self, state)
    }
}

impl TransitionSink for SharedDecoder {
    fn on_transition(&mut self, state: QuadratureState) -> Step {
        SharedDecoder::on_transition(self, state)
    }
}

impl EncoderInput for &SharedDecoder {
    fn read_delta(&mut self) -> i32 {
        SharedDecoder::read_delta(self)
    }

    fn pending_direction(&self) -> Direction {
        SharedDecoder::pending_direction(self)
    }
}

impl EncoderInput for SharedDecoder {
    fn read_delta(&mut self) -> i32 {
        SharedDecoder::read_delta(self)
    }

    fn pending_direction(&self) -> Direction {
        SharedDecoder::pending_direction(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spin(shared: &SharedDecoder, steps: u32, clockwise: bool) {
        let mut state = QuadratureState::from_bits(0b00);
        shared.on_transition(state);
        for _ in 0..steps {
            state = if clockwise {
                state.next_clockwise()
            } else {
                state.next_counter_clockwise()
            };
            shared.on_transition(state);
        }
    }

    #[test]
    fn static_decoder_is_usable() {
        static ENCODER: SharedDecoder = SharedDecoder::new();
        spin(&ENCODER, 8, true);
        assert_eq!(ENCODER.position(), 2);
        assert_eq!(ENCODER.direction(), Direction::Clockwise);
    }

    #[test]
    fn read_delta_consumes_movement() {
        let shared = SharedDecoder::new();
        spin(&shared, 12, true);
        assert_eq!(shared.pending_direction(), Direction::Clockwise);
        assert_eq!(shared.read_delta(), 3);
        assert_eq!(shared.read_delta(), 0);
        assert_eq!(shared.pending_direction(), Direction::Stopped);
    }

    #[test]
    fn set_position_resets_delta_reference() {
        let shared = SharedDecoder::new();
        spin(&shared, 8, true);
        shared.set_position(100).unwrap();
        assert_eq!(shared.read_delta(), 0);
        assert_eq!(shared.revolutions(), 4);
    }

    #[test]
    fn config_errors_pass_through() {
        let shared = SharedDecoder::new();
        assert_eq!(
            shared.set_divisor(0),
            Err(DecoderError::invalid("divisor", 0))
        );
        assert!(shared.set_counts_per_revolution(-1).is_err());
        assert_eq!(shared.divisor(), 4);
        assert_eq!(shared.counts_per_revolution(), 24);
    }

    #[test]
    fn with_config_applies_values() {
        let config = EncoderConfig::default().with_divisor(1);
        let shared = SharedDecoder::with_config(&config).unwrap();
        spin(&shared, 3, false);
        assert_eq!(shared.position(), -3);
        assert_eq!(shared.into_inner().raw_position(), -3);
    }

    #[test]
    fn encoder_input_through_reference() {
        let shared = SharedDecoder::new();
        spin(&shared, 4, false);
        let mut input = &shared;
        assert_eq!(
            EncoderInput::pending_direction(&input),
            Direction::CounterClockwise
        );
        assert_eq!(EncoderInput::read_delta(&mut input), -1);
    }

    #[test]
    fn deinit_stops_ingestion() {
        let shared = SharedDecoder::new();
        shared.deinit();
        spin(&shared, 8, true);
        assert!(shared.is_deinited());
        assert_eq!(shared.position(), 0);
        assert_eq!(shared.set_position(1), Err(DecoderError::Deinitialized));
    }

    #[test]
    fn readers_never_see_torn_updates() {
        let config = EncoderConfig::default().with_divisor(3);
        let shared = SharedDecoder::with_config(&config).unwrap();

        std::thread::scope(|scope| {
            scope.spawn(|| spin(&shared, 20_000, true));

            for _ in 0..2_000 {
                let state = shared.state();
                assert_eq!(state.position as i64, state.raw_position / 3);
                assert_eq!(state.revolutions, state.position.div_euclid(24));
            }
        });

        assert_eq!(shared.state().raw_position, 20_000);
    }
}
