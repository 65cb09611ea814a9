//! Error types for decoder configuration.
//!
//! Out-of-sequence pin transitions are not errors: they are reported as
//! [`Step::Invalid`](crate::Step::Invalid) and dropped. Only configuration
//! calls can fail, and they fail synchronously without touching state.

use core::fmt;

/// Errors returned by [`QuadratureDecoder`](crate::QuadratureDecoder) mutators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecoderError {
    /// A configuration value was out of range (must be > 0).
    ///
    /// The previous value is left in place.
    InvalidArgument {
        /// Name of the rejected parameter.
        name: &'static str,
        /// The rejected value.
        value: i32,
    },

    /// The decoder was deinitialized and no longer accepts calls.
    Deinitialized,
}

impl DecoderError {
    pub(crate) const fn invalid(name: &'static str, value: i32) -> Self {
        Self::InvalidArgument { name, value }
    }
}

impl fmt::Display for DecoderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument { name, value } => {
                write!(f, "invalid {}: {} (must be greater than 0)", name, value)
            }
            Self::Deinitialized => write!(f, "decoder has been deinitialized"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecoderError {}

#[cfg(feature = "defmt")]
impl defmt::Format for DecoderError {
    fn format(&self, f: defmt::Formatter) {
        match *self {
            Self::InvalidArgument { name, value } => {
                defmt::write!(f, "invalid {=str}: {=i32}", name, value)
            }
            Self::Deinitialized => defmt::write!(f, "decoder deinitialized"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_argument() {
        let err = DecoderError::invalid("divisor", -3);
        assert_eq!(
            format!("{}", err),
            "invalid divisor: -3 (must be greater than 0)"
        );
    }

    #[test]
    fn display_deinitialized() {
        assert_eq!(
            format!("{}", DecoderError::Deinitialized),
            "decoder has been deinitialized"
        );
    }

    #[cfg(feature = "std")]
    #[test]
    fn implements_std_error() {
        let err = DecoderError::Deinitialized;
        let _: &dyn std::error::Error = &err;
    }
}
