//! Output-stage options.

/// Methods for upsampling the chroma values during YUV to RGB conversion
///
/// The chroma red and blue planes are encoded in VP8 as half the size of the luma plane
/// Therefore we need to upsample these values up to fit each pixel in the image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UpsamplingMethod {
    /// Fancy upsampling
    ///
    /// Does bilinear interpolation using the 4 values nearest to the pixel, weighting based on the distance
    /// from the pixel.
    #[default]
    Bilinear,
    /// Simple upsampling, just uses the closest u/v value to the pixel when upsampling
    ///
    /// Matches the -nofancy option in dwebp.
    /// Faster, but may lead to slightly jagged edges.
    Simple,
}

/// Options consulted by the output stages of the pipeline.
///
/// # Example
///
/// ```rust
/// use zenwebp_dsp::{DspConfig, UpsamplingMethod};
///
/// let config = DspConfig::default().dithering(true).no_fancy_upsampling();
/// assert_eq!(config.upsampling, UpsamplingMethod::Simple);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DspConfig {
    /// Add the 8x8 dither pattern to reconstructed blocks. Default: `false`.
    pub dithering: bool,
    /// Chroma upsampling used by [`crate::convert_yuv420`]. Default: `Bilinear`.
    pub upsampling: UpsamplingMethod,
}

impl DspConfig {
    /// Same as [`DspConfig::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable dithering.
    #[must_use]
    pub fn dithering(mut self, enabled: bool) -> Self {
        self.dithering = enabled;
        self
    }

    /// Set the upsampling method.
    #[must_use]
    pub fn upsampling(mut self, method: UpsamplingMethod) -> Self {
        self.upsampling = method;
        self
    }

    /// Disable fancy upsampling.
    #[must_use]
    pub fn no_fancy_upsampling(mut self) -> Self {
        self.upsampling = UpsamplingMethod::Simple;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DspConfig::new();
        assert!(!config.dithering);
        assert_eq!(config.upsampling, UpsamplingMethod::Bilinear);
    }

    #[test]
    fn test_builders() {
        let config = DspConfig::new()
            .dithering(true)
            .upsampling(UpsamplingMethod::Simple);
        assert!(config.dithering);
        assert_eq!(config.upsampling, UpsamplingMethod::Simple);
        assert_eq!(
            config.clone().upsampling(UpsamplingMethod::Bilinear).no_fancy_upsampling(),
            config
        );
    }
}
