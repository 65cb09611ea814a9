//! # rs-rotary
//!
//! Decoding for incremental (quadrature) rotary encoders: turns a stream of
//! two-bit channel A/B states into a relative position, a direction, and a
//! revolution count.
//!
//! ## Features
//!
//! - **Gray-code decoding**: one raw count per valid edge, missed edges dropped
//! - **Divisor**: report position in detents rather than raw edges
//! - **Direction**: clockwise / counter-clockwise / stopped per decode step
//! - **Revolutions**: derived from a configurable counts-per-revolution
//! - **Interrupt-safe sharing**: [`SharedDecoder`] updates under one critical section
//!
//! ## Architecture
//!
//! - `quadrature` - Two-bit states and step classification
//! - `decoder` - The decoder state machine and its accessors
//! - `shared` - Critical-section wrapper for interrupt/main-loop sharing
//! - `config` - Construction parameters
//! - `traits` - Boundary traits toward the platform layer
//! - `hal` - Mock pin driver for testing on desktop
//!
//! ## Example
//!
//! ```rust
//! use rs_rotary::{hal::MockPins, Direction, QuadratureDecoder};
//!
//! let mut decoder = QuadratureDecoder::new(); // divisor 4, 24 counts/rev
//! let mut pins = MockPins::new();
//!
//! pins.baseline(&mut decoder);
//! pins.rotate(&mut decoder, 4 * 24); // one full turn
//!
//! assert_eq!(decoder.position(), 24);
//! assert_eq!(decoder.direction(), Direction::Clockwise);
//! assert_eq!(decoder.revolutions(), 1);
//!
//! decoder.set_position(0).unwrap();
//! assert_eq!(decoder.direction(), Direction::Stopped);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Encoder configuration and defaults.
pub mod config;
/// Quadrature decoder state machine.
pub mod decoder;
/// Error types.
pub mod error;
/// Mock hardware for testing.
pub mod hal;
/// Two-bit quadrature states and Gray-code classification.
pub mod quadrature;
/// Interrupt-safe shared decoder.
pub mod shared;
/// Core traits at the platform boundary.
pub mod traits;

// Re-exports for convenience
pub use config::{EncoderConfig, DEFAULT_COUNTS_PER_REVOLUTION, DEFAULT_DIVISOR};
pub use decoder::{EncoderState, QuadratureDecoder, RevolutionRounding};
pub use error::DecoderError;
pub use quadrature::{QuadratureState, Step};
pub use shared::SharedDecoder;
pub use traits::{Direction, EncoderInput, TransitionSink};
