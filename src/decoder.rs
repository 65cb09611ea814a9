//! Quadrature decoding and position/direction/revolution tracking.
//!
//! This module provides [`QuadratureDecoder`], which turns a stream of
//! two-bit pin states into a relative position counter.
//!
//! # Overview
//!
//! The decoder:
//! - Counts one raw unit per valid Gray-code edge
//! - Scales raw edges down to user-visible position by `divisor`
//! - Reports the direction of the last decode step
//! - Derives a revolution count from `counts_per_revolution`
//!
//! The first state observed only sets the baseline. Transitions that flip
//! both channels at once are dropped: a missed edge cannot be attributed to
//! either direction, so the decoder undercounts rather than guessing.
//!
//! # Example
//!
//! ```rust
//! use rs_rotary::{Direction, QuadratureDecoder, QuadratureState};
//!
//! let mut decoder = QuadratureDecoder::new(); // divisor 4, 24 counts/rev
//!
//! let mut state = QuadratureState::from_bits(0b00);
//! decoder.on_transition(state); // baseline
//!
//! // One full detent clockwise: four edges
//! for _ in 0..4 {
//!     state = state.next_clockwise();
//!     decoder.on_transition(state);
//! }
//!
//! assert_eq!(decoder.position(), 1);
//! assert_eq!(decoder.direction(), Direction::Clockwise);
//! assert_eq!(decoder.revolutions(), 0);
//! ```

use crate::config::{EncoderConfig, ShortString, DEFAULT_COUNTS_PER_REVOLUTION, DEFAULT_DIVISOR};
use crate::error::DecoderError;
use crate::quadrature::{QuadratureState, Step};
use crate::traits::{Direction, TransitionSink};

/// Rounding rule used to derive revolutions from a negative position.
///
/// The two rules agree for non-negative positions. With 24 counts per
/// revolution, position `-1` is revolution `-1` under [`Floor`](Self::Floor)
/// and revolution `0` under [`Truncate`](Self::Truncate).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RevolutionRounding {
    /// Round toward negative infinity.
    #[default]
    Floor,
    /// Round toward zero.
    Truncate,
}

impl RevolutionRounding {
    /// Divides `position` by `counts_per_revolution` (which must be > 0).
    #[inline]
    pub const fn revolutions(self, position: i32, counts_per_revolution: i32) -> i32 {
        match self {
            RevolutionRounding::Floor => position.div_euclid(counts_per_revolution),
            RevolutionRounding::Truncate => position / counts_per_revolution,
        }
    }
}

/// Incremental rotary encoder decoder.
///
/// One instance per physical encoder. Feed it with
/// [`on_transition`](Self::on_transition) and read it back through the
/// accessors.
///
/// # Thread Safety
///
/// The decoder itself holds plain numeric state. When ingestion runs in an
/// interrupt handler and reads happen in the main loop, wrap it in
/// [`SharedDecoder`](crate::SharedDecoder) so each update is seen whole.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuadratureDecoder {
    name: ShortString,
    /// Last observed A/B state; `None` until the first read.
    last_state: Option<QuadratureState>,
    raw_position: i64,
    position: i32,
    last_position: i32,
    divisor: i32,
    direction: Direction,
    counts_per_revolution: i32,
    revolutions: i32,
    rounding: RevolutionRounding,
    invalid_transitions: u32,
    deinited: bool,
}

impl Default for QuadratureDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl QuadratureDecoder {
    /// Create a decoder with divisor 4 and 24 counts per revolution.
    pub const fn new() -> Self {
        Self {
            name: ShortString::new(),
            last_state: None,
            raw_position: 0,
            position: 0,
            last_position: 0,
            divisor: DEFAULT_DIVISOR,
            direction: Direction::Stopped,
            counts_per_revolution: DEFAULT_COUNTS_PER_REVOLUTION,
            revolutions: 0,
            rounding: RevolutionRounding::Floor,
            invalid_transitions: 0,
            deinited: false,
        }
    }

    /// Create a decoder from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DecoderError::InvalidArgument`] if the divisor or the
    /// counts per revolution is not positive.
    pub fn with_config(config: &EncoderConfig) -> Result<Self, DecoderError> {
        config.validate()?;
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "decoder '{=str}': divisor {=i32}, {=i32} counts/rev",
            config.name.as_str(),
            config.divisor,
            config.counts_per_revolution
        );
        Ok(Self {
            name: config.name.clone(),
            divisor: config.divisor,
            counts_per_revolution: config.counts_per_revolution,
            rounding: config.rounding,
            ..Self::new()
        })
    }

    /// Ingest one observed A/B state.
    ///
    /// Returns how the transition from the previous state was classified.
    /// The first call only records the baseline and returns
    /// [`Step::Unchanged`]. [`Step::Invalid`] transitions leave every counter
    /// untouched but still move the baseline to `state`.
    ///
    /// A deinitialized decoder ignores all input.
    pub fn on_transition(&mut self, state: QuadratureState) -> Step {
        if self.deinited {
            return Step::Unchanged;
        }

        let Some(previous) = self.last_state.replace(state) else {
            return Step::Unchanged;
        };

        let step = Step::between(previous, state);
        match step {
            Step::Clockwise | Step::CounterClockwise => {
                self.raw_position = self.clamp_raw(self.raw_position + step.delta());
                self.update_position();
            }
            Step::Invalid => {
                self.invalid_transitions = self.invalid_transitions.saturating_add(1);
                #[cfg(feature = "defmt")]
                defmt::trace!("ignored transition {} -> {}", previous, state);
            }
            Step::Unchanged => {}
        }
        step
    }

    /// Keeps `raw_position` inside the range whose quotient fits an `i32`,
    /// so `position == raw_position / divisor` holds at the limits too.
    fn clamp_raw(&self, raw: i64) -> i64 {
        let divisor = i64::from(self.divisor);
        raw.clamp(i64::from(i32::MIN) * divisor, i64::from(i32::MAX) * divisor)
    }

    fn update_position(&mut self) {
        self.position = saturate(self.raw_position / i64::from(self.divisor));
        self.direction =
            Direction::from_delta(i64::from(self.position) - i64::from(self.last_position));
        self.last_position = self.position;
        self.update_revolutions();
    }

    fn update_revolutions(&mut self) {
        self.revolutions = self
            .rounding
            .revolutions(self.position, self.counts_per_revolution);
    }

    fn ensure_active(&self) -> Result<(), DecoderError> {
        if self.deinited {
            Err(DecoderError::Deinitialized)
        } else {
            Ok(())
        }
    }

    /// Label taken from [`EncoderConfig::name`]; empty for [`new`](Self::new).
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Current position in divided units, relative to construction.
    #[inline]
    pub const fn position(&self) -> i32 {
        self.position
    }

    /// Overwrite the position.
    ///
    /// The raw counter is re-based to `position * divisor`, direction is
    /// reset to [`Direction::Stopped`] and revolutions are recomputed. A
    /// manual reposition is not a movement.
    pub fn set_position(&mut self, position: i32) -> Result<(), DecoderError> {
        self.ensure_active()?;
        self.position = position;
        self.raw_position = i64::from(position) * i64::from(self.divisor);
        self.last_position = position;
        self.direction = Direction::Stopped;
        self.update_revolutions();
        Ok(())
    }

    /// Raw edges per position unit.
    #[inline]
    pub fn divisor(&self) -> i32 {
        self.divisor
    }

    /// Change the divisor for future transitions.
    ///
    /// The reported position is kept as is. `raw_position` is re-based to
    /// `position * divisor` plus the edges already counted toward the next
    /// unit, capped at `divisor - 1` so the position does not jump.
    ///
    /// # Errors
    ///
    /// [`DecoderError::InvalidArgument`] if `divisor <= 0`; the previous
    /// divisor stays in effect.
    pub fn set_divisor(&mut self, divisor: i32) -> Result<(), DecoderError> {
        self.ensure_active()?;
        if divisor <= 0 {
            return Err(DecoderError::invalid("divisor", divisor));
        }
        let partial = self.raw_position % i64::from(self.divisor);
        let cap = i64::from(divisor) - 1;
        self.divisor = divisor;
        self.raw_position = self.clamp_raw(
            i64::from(self.position) * i64::from(divisor) + partial.clamp(-cap, cap),
        );
        #[cfg(feature = "defmt")]
        defmt::debug!("divisor set to {=i32}", divisor);
        Ok(())
    }

    /// Position units per full revolution.
    #[inline]
    pub fn counts_per_revolution(&self) -> i32 {
        self.counts_per_revolution
    }

    /// Change the revolution length and recompute revolutions immediately.
    ///
    /// # Errors
    ///
    /// [`DecoderError::InvalidArgument`] if `counts <= 0`; the previous
    /// value stays in effect.
    pub fn set_counts_per_revolution(&mut self, counts: i32) -> Result<(), DecoderError> {
        self.ensure_active()?;
        if counts <= 0 {
            return Err(DecoderError::invalid("counts_per_revolution", counts));
        }
        self.counts_per_revolution = counts;
        self.update_revolutions();
        #[cfg(feature = "defmt")]
        defmt::debug!("counts_per_revolution set to {=i32}", counts);
        Ok(())
    }

    /// Rounding rule for negative revolutions.
    #[inline]
    pub fn rounding(&self) -> RevolutionRounding {
        self.rounding
    }

    /// Change the rounding rule and recompute revolutions.
    pub fn set_rounding(&mut self, rounding: RevolutionRounding) -> Result<(), DecoderError> {
        self.ensure_active()?;
        self.rounding = rounding;
        self.update_revolutions();
        Ok(())
    }

    /// Direction of the last decode step.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Full revolutions from the origin.
    #[inline]
    pub fn revolutions(&self) -> i32 {
        self.revolutions
    }

    /// Undivided edge counter.
    #[inline]
    pub fn raw_position(&self) -> i64 {
        self.raw_position
    }

    /// Position as of the previous decode step.
    #[inline]
    pub fn last_position(&self) -> i32 {
        self.last_position
    }

    /// Last observed A/B state, `None` before the first transition.
    #[inline]
    pub fn last_state(&self) -> Option<QuadratureState> {
        self.last_state
    }

    /// True once a baseline state has been recorded.
    #[inline]
    pub fn is_tracking(&self) -> bool {
        self.last_state.is_some()
    }

    /// Number of out-of-sequence transitions ignored so far.
    #[inline]
    pub fn invalid_transitions(&self) -> u32 {
        self.invalid_transitions
    }

    /// Mark the decoder as torn down. Further input is ignored and
    /// mutators return [`DecoderError::Deinitialized`].
    pub fn deinit(&mut self) {
        self.deinited = true;
    }

    /// True after [`deinit`](Self::deinit).
    #[inline]
    pub fn is_deinited(&self) -> bool {
        self.deinited
    }

    /// Snapshot of all derived values.
    pub fn state(&self) -> EncoderState {
        EncoderState {
            position: self.position,
            raw_position: self.raw_position,
            direction: self.direction,
            revolutions: self.revolutions,
            divisor: self.divisor,
            counts_per_revolution: self.counts_per_revolution,
        }
    }
}

impl TransitionSink for QuadratureDecoder {
    fn on_transition(&mut self, state: QuadratureState) -> Step {
        QuadratureDecoder::on_transition(self, state)
    }
}

fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Consistent view of a decoder at one instant.
///
/// Implements `serde::Serialize` when the `serde` feature is enabled.
///
/// # Example
///
/// ```rust
/// use rs_rotary::{Direction, QuadratureDecoder};
///
/// let state = QuadratureDecoder::new().state();
/// assert_eq!(state.position, 0);
/// assert_eq!(state.direction, Direction::Stopped);
/// assert_eq!(state.divisor, 4);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderState {
    /// Position in divided units.
    pub position: i32,
    /// Undivided edge counter.
    pub raw_position: i64,
    /// Direction of the last decode step.
    pub direction: Direction,
    /// Full revolutions from the origin.
    pub revolutions: i32,
    /// Raw edges per position unit.
    pub divisor: i32,
    /// Position units per revolution.
    pub counts_per_revolution: i32,
}

impl Default for EncoderState {
    fn default() -> Self {
        QuadratureDecoder::new().state()
    }
}
