//! Block-level kernels and types shared by every stage of reconstruction

pub mod prediction;
/// DCT/IDCT transform functions
pub mod transform;
pub mod types;
