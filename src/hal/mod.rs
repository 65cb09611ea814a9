//! Hardware Abstraction Layer implementations.
//!
//! The decoder never touches pins itself. This module holds stand-ins for
//! the platform layer that samples channel A and B and pushes the result
//! into a [`TransitionSink`](crate::traits::TransitionSink).
//!
//! # Available Implementations
//!
//! - `mock`: Scripted pin pair for tests and desktop simulation

pub mod mock;

pub use mock::*;
