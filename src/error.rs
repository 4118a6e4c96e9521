//! Error types for the checked entry points.
//!
//! Block-level operations never fail; these errors only come out of the
//! boundaries that accept raw indices or whole frames.

use thiserror::Error;

/// Which prediction table a rejected mode index was meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    /// 4x4 luma sub-block modes.
    Luma4,
    /// 16x16 luma and 8x8 chroma modes.
    Luma16OrChroma,
}

impl core::fmt::Display for ModeKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ModeKind::Luma4 => f.write_str("4x4 luma"),
            ModeKind::Luma16OrChroma => f.write_str("16x16 luma / chroma"),
        }
    }
}

/// Errors returned by the checked entry points of this crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DspError {
    /// A prediction mode index is outside its table.
    #[error("Invalid {kind} prediction mode: {index}")]
    InvalidMode {
        /// The table the index was looked up in.
        kind: ModeKind,
        /// The rejected index.
        index: u8,
    },

    /// A plane or output buffer is shorter than the frame geometry requires.
    #[error("Buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall {
        /// Minimum length required.
        needed: usize,
        /// Length supplied.
        actual: usize,
    },

    /// Frame dimensions are zero or inconsistent with the supplied strides.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Frame width in pixels.
        width: usize,
        /// Frame height in pixels.
        height: usize,
    },
}
