use crate::{Effect, ImageEffectError, ImageEffectResult, RasterImage};
use derivative::Derivative;
use derive_setters::Setters;

/// Widest kernel accepted.
pub const MAX_KERNEL_SIZE: u32 = 1001;

/// Gaussian blur with an odd, square kernel.
///
/// The kernel is separable, so it runs as a horizontal then a vertical pass.
/// Borders are mirrored without repeating the edge pixel (`dcb|abcd|cba`).
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct GaussianBlurConfig {
    #[derivative(Default(value = "3"))]
    kernel_size: u32,

    // <= 0 derives sigma from the kernel size
    #[derivative(Default(value = "0.0"))]
    sigma: f64,
}

impl GaussianBlurConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kernel_size(&self) -> u32 {
        self.kernel_size
    }

    pub fn validate(&self) -> ImageEffectResult<()> {
        if self.kernel_size == 0 || self.kernel_size % 2 == 0 {
            return Err(ImageEffectError::InvalidParameter(format!(
                "kernel size must be odd, got {}",
                self.kernel_size
            )));
        }

        if self.kernel_size > MAX_KERNEL_SIZE {
            return Err(ImageEffectError::InvalidParameter(format!(
                "kernel size must be at most {MAX_KERNEL_SIZE}, got {}",
                self.kernel_size
            )));
        }

        if !self.sigma.is_finite() {
            return Err(ImageEffectError::InvalidParameter(format!(
                "sigma must be finite, got {}",
                self.sigma
            )));
        }

        Ok(())
    }

    pub fn effective_sigma(&self) -> f64 {
        if self.sigma > 0.0 {
            self.sigma
        } else {
            0.3 * ((self.kernel_size as f64 - 1.0) * 0.5 - 1.0) + 0.8
        }
    }

    /// Normalized 1-D kernel, `kernel_size` taps summing to 1.
    pub fn kernel(&self) -> Vec<f64> {
        let sigma = self.effective_sigma();
        let radius = (self.kernel_size / 2) as f64;
        let denom = 2.0 * sigma * sigma;

        let weights: Vec<f64> = (0..self.kernel_size)
            .map(|i| {
                let d = i as f64 - radius;
                (-(d * d) / denom).exp()
            })
            .collect();

        let sum: f64 = weights.iter().sum();
        weights.into_iter().map(|w| w / sum).collect()
    }
}

fn reflect_101(mut i: i64, len: i64) -> usize {
    if len == 1 {
        return 0;
    }

    // Kernels may be wider than the image, so fold until inside.
    while i < 0 || i >= len {
        if i < 0 {
            i = -i;
        }
        if i >= len {
            i = 2 * (len - 1) - i;
        }
    }

    i as usize
}

fn tap_indices(len: usize, kernel_size: usize) -> Vec<usize> {
    let radius = (kernel_size / 2) as i64;
    let mut indices = Vec::with_capacity(len * kernel_size);

    for pos in 0..len as i64 {
        for k in 0..kernel_size as i64 {
            indices.push(reflect_101(pos + k - radius, len as i64));
        }
    }

    indices
}

impl Effect for GaussianBlurConfig {
    fn apply(&self, image: RasterImage) -> ImageEffectResult<RasterImage> {
        self.validate()?;

        if image.is_empty() {
            return Err(ImageEffectError::InvalidImage(format!(
                "cannot blur a {}x{} image",
                image.width(),
                image.height()
            )));
        }

        let (width, height) = (image.width() as usize, image.height() as usize);
        let channels = image.channels();
        let c = channels.count();
        let ks = self.kernel_size as usize;
        let kernel = self.kernel();
        let src = image.samples();

        let cols = tap_indices(width, ks);
        let mut horizontal = vec![0f64; width * height * c];
        for y in 0..height {
            let row = y * width;
            for x in 0..width {
                let taps = &cols[x * ks..(x + 1) * ks];
                for ch in 0..c {
                    let acc: f64 = taps
                        .iter()
                        .zip(&kernel)
                        .map(|(&sx, &w)| w * src[(row + sx) * c + ch] as f64)
                        .sum();
                    horizontal[(row + x) * c + ch] = acc;
                }
            }
        }

        let rows = tap_indices(height, ks);
        let mut samples = vec![0u8; width * height * c];
        for y in 0..height {
            let taps = &rows[y * ks..(y + 1) * ks];
            for x in 0..width {
                for ch in 0..c {
                    let acc: f64 = taps
                        .iter()
                        .zip(&kernel)
                        .map(|(&sy, &w)| w * horizontal[(sy * width + x) * c + ch])
                        .sum();
                    samples[(y * width + x) * c + ch] =
                        acc.round_ties_even().clamp(0.0, 255.0) as u8;
                }
            }
        }

        RasterImage::new(width as u32, height as u32, channels, samples)
    }
}
