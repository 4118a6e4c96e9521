//! Prediction modes and loop filter parameters shared by the reconstruction stages.

use crate::error::{DspError, ModeKind};

/// Number of 4x4 intra prediction modes.
pub const NUM_BMODES: usize = 10;
/// Number of 16x16 luma / 8x8 chroma prediction modes, including the edge-missing DC variants.
pub const NUM_B_DC_MODES: usize = 7;

/// 4x4 luma sub-block prediction modes, in prediction table order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum IntraMode {
    /// Average of the 4 top and 4 left neighbours.
    #[default]
    DC = 0,
    /// True motion: `top + left - top_left`.
    TM = 1,
    /// Vertical, smoothed with the top-left and top-right neighbours.
    VE = 2,
    /// Horizontal, smoothed with the top-left neighbour.
    HE = 3,
    /// Diagonal down-right.
    RD = 4,
    /// Vertical-right.
    VR = 5,
    /// Diagonal down-left.
    LD = 6,
    /// Vertical-left.
    VL = 7,
    /// Horizontal-down.
    HD = 8,
    /// Horizontal-up.
    HU = 9,
}

impl IntraMode {
    /// All modes in table order.
    pub const ALL: [IntraMode; NUM_BMODES] = [
        IntraMode::DC,
        IntraMode::TM,
        IntraMode::VE,
        IntraMode::HE,
        IntraMode::RD,
        IntraMode::VR,
        IntraMode::LD,
        IntraMode::VL,
        IntraMode::HD,
        IntraMode::HU,
    ];

    /// Position of this mode in the 4x4 prediction table.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether the mode reads the 4 pixels to the top-right of the block.
    pub const fn uses_top_right(self) -> bool {
        matches!(self, IntraMode::VE | IntraMode::LD | IntraMode::VL)
    }
}

impl TryFrom<u8> for IntraMode {
    type Error = DspError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        IntraMode::ALL
            .get(usize::from(index))
            .copied()
            .ok_or(DspError::InvalidMode {
                kind: ModeKind::Luma4,
                index,
            })
    }
}

/// Prediction modes shared by 16x16 luma and 8x8 chroma blocks, in prediction table order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PredictionMode {
    /// Average of the top row and left column.
    #[default]
    DC = 0,
    /// True motion: `top + left - top_left`.
    TM = 1,
    /// Copy of the row above.
    V = 2,
    /// Copy of the column to the left.
    H = 3,
    /// DC from the left column only (first macroblock row).
    DcNoTop = 4,
    /// DC from the top row only (first macroblock column).
    DcNoLeft = 5,
    /// Constant 128 (top-left macroblock).
    DcNoTopLeft = 6,
}

impl PredictionMode {
    /// All modes in table order.
    pub const ALL: [PredictionMode; NUM_B_DC_MODES] = [
        PredictionMode::DC,
        PredictionMode::TM,
        PredictionMode::V,
        PredictionMode::H,
        PredictionMode::DcNoTop,
        PredictionMode::DcNoLeft,
        PredictionMode::DcNoTopLeft,
    ];

    /// Position of this mode in the 16x16 / 8x8 prediction tables.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Replaces `DC` with the variant that only averages the edges available at
    /// macroblock `(mbx, mby)`. Other modes are returned unchanged.
    pub const fn for_position(self, mbx: usize, mby: usize) -> Self {
        match self {
            PredictionMode::DC => match (mbx == 0, mby == 0) {
                (true, true) => PredictionMode::DcNoTopLeft,
                (true, false) => PredictionMode::DcNoLeft,
                (false, true) => PredictionMode::DcNoTop,
                (false, false) => PredictionMode::DC,
            },
            other => other,
        }
    }
}

impl TryFrom<u8> for PredictionMode {
    type Error = DspError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        PredictionMode::ALL
            .get(usize::from(index))
            .copied()
            .ok_or(DspError::InvalidMode {
                kind: ModeKind::Luma16OrChroma,
                index,
            })
    }
}

/// Loop filter flavour selected by the frame header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterType {
    /// Complex filter on luma and chroma, with HEV detection.
    #[default]
    Normal,
    /// 2-pixel filter on luma only.
    Simple,
}

/// Per-edge loop filter thresholds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterParams {
    /// Edge difference limit (doubled and incremented by the filters).
    pub edge_limit: u8,
    /// Limit on differences between pixels on the same side of the edge.
    pub interior_limit: u8,
    /// High edge variance threshold.
    pub hev_threshold: u8,
}

impl FilterParams {
    /// Creates a threshold triple.
    pub const fn new(edge_limit: u8, interior_limit: u8, hev_threshold: u8) -> Self {
        Self {
            edge_limit,
            interior_limit,
            hev_threshold,
        }
    }

    /// Derives the thresholds for a macroblock from its filter level (0..=63)
    /// and the frame sharpness (0..=7).
    ///
    /// `edge_limit` is left at the filter level; use [`Self::macroblock_edge`]
    /// and [`Self::subblock_edge`] to get the per-edge variants.
    pub fn from_level(filter_level: u8, sharpness: u8) -> Self {
        let filter_level = filter_level.min(63);
        let sharpness = sharpness.min(7);

        let mut interior_limit = filter_level;
        if sharpness > 0 {
            interior_limit >>= if sharpness > 4 { 2 } else { 1 };
            if interior_limit > 9 - sharpness {
                interior_limit = 9 - sharpness;
            }
        }
        if interior_limit == 0 {
            interior_limit = 1;
        }

        let hev_threshold = if filter_level >= 40 {
            2
        } else if filter_level >= 15 {
            1
        } else {
            0
        };

        Self {
            edge_limit: filter_level,
            interior_limit,
            hev_threshold,
        }
    }

    /// Edge limit applied on macroblock boundaries: `(level + 2) * 2 + interior`.
    pub const fn macroblock_edge_limit(&self) -> u8 {
        self.edge_limit
            .saturating_add(2)
            .saturating_mul(2)
            .saturating_add(self.interior_limit)
    }

    /// Edge limit applied on inner sub-block boundaries: `level * 2 + interior`.
    pub const fn subblock_edge_limit(&self) -> u8 {
        self.edge_limit
            .saturating_mul(2)
            .saturating_add(self.interior_limit)
    }

    /// Copy of these parameters with the macroblock edge limit.
    pub const fn macroblock_edge(&self) -> Self {
        Self::new(
            self.macroblock_edge_limit(),
            self.interior_limit,
            self.hev_threshold,
        )
    }

    /// Copy of these parameters with the sub-block edge limit.
    pub const fn subblock_edge(&self) -> Self {
        Self::new(
            self.subblock_edge_limit(),
            self.interior_limit,
            self.hev_threshold,
        )
    }
}
