//! Encoder configuration.
//!
//! Uses `heapless::String` for the encoder label so the whole config stays
//! `Copy`-cheap and `no_std` compatible.
//!
//! # Example
//!
//! ```rust
//! use rs_rotary::config::EncoderConfig;
//! use rs_rotary::{QuadratureDecoder, RevolutionRounding};
//!
//! let config = EncoderConfig::default()
//!     .with_name("volume")
//!     .with_divisor(2)
//!     .with_counts_per_revolution(20)
//!     .with_rounding(RevolutionRounding::Truncate);
//!
//! let decoder = QuadratureDecoder::with_config(&config).unwrap();
//! assert_eq!(decoder.divisor(), 2);
//! assert_eq!(decoder.counts_per_revolution(), 20);
//! ```

use heapless::String as HString;

use crate::decoder::RevolutionRounding;
use crate::error::DecoderError;

/// Default number of raw quadrature edges per reported position unit.
pub const DEFAULT_DIVISOR: i32 = 4;

/// Default number of position units in one revolution.
pub const DEFAULT_COUNTS_PER_REVOLUTION: i32 = 24;

/// Maximum length for the encoder label
pub const MAX_NAME: usize = 32;

/// Type alias for the encoder label
pub type ShortString = HString<MAX_NAME>;

/// Create a ShortString from a &str, truncating if too long
pub fn short_string(s: &str) -> ShortString {
    let mut hs = ShortString::new();
    let valid_end = s
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .take_while(|end| *end <= MAX_NAME)
        .last()
        .unwrap_or(0);
    let _ = hs.push_str(&s[..valid_end]);
    hs
}

/// Construction parameters for a [`QuadratureDecoder`](crate::QuadratureDecoder).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EncoderConfig {
    /// Human-readable label (diagnostics only)
    pub name: ShortString,
    /// Raw quadrature edges per reported position unit (> 0)
    pub divisor: i32,
    /// Position units per full revolution (> 0)
    pub counts_per_revolution: i32,
    /// Rounding rule for negative revolution counts
    pub rounding: RevolutionRounding,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            name: short_string("encoder"),
            divisor: DEFAULT_DIVISOR,
            counts_per_revolution: DEFAULT_COUNTS_PER_REVOLUTION,
            rounding: RevolutionRounding::default(),
        }
    }
}

impl EncoderConfig {
    /// Set the label
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = short_string(name);
        self
    }

    /// Set the divisor.
    ///
    /// Use 1 for encoders without detents or with 4 detents per cycle,
    /// 2 for encoders with 2 detents per cycle, 4 for 1 detent per cycle.
    pub fn with_divisor(mut self, divisor: i32) -> Self {
        self.divisor = divisor;
        self
    }

    /// Set the counts per revolution
    pub fn with_counts_per_revolution(mut self, counts: i32) -> Self {
        self.counts_per_revolution = counts;
        self
    }

    /// Set the revolution rounding rule
    pub fn with_rounding(mut self, rounding: RevolutionRounding) -> Self {
        self.rounding = rounding;
        self
    }

    /// Checks that both divisor and counts per revolution are positive.
    ///
    /// # Errors
    ///
    /// Returns [`DecoderError::InvalidArgument`] naming the first bad field.
    pub fn validate(&self) -> Result<(), DecoderError> {
        if self.divisor <= 0 {
            return Err(DecoderError::invalid("divisor", self.divisor));
        }
        if self.counts_per_revolution <= 0 {
            return Err(DecoderError::invalid(
                "counts_per_revolution",
                self.counts_per_revolution,
            ));
        }
        Ok(())
    }
}
