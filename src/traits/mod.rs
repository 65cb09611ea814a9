//! Trait definitions at the boundary between the decoder and the platform.
//!
//! # Submodules
//!
//! - `hardware`: Direction type, transition ingestion, delta polling
//!
//! # Hardware Abstraction
//!
//! - [`TransitionSink`]: Receives two-bit A/B states from the platform layer
//! - [`EncoderInput`]: Relative movement for main-loop consumers

pub mod hardware;

pub use hardware::*;
