//! Parameters for the mip-chain bloom. GPU passes live in `wasm::composer`.

pub const MIP_LEVELS: usize = 5;
pub const KERNEL_RADII: [usize; MIP_LEVELS] = [3, 5, 7, 9, 11];
pub const BLOOM_FACTORS: [f32; MIP_LEVELS] = [1.0, 0.8, 0.6, 0.4, 0.2];
/// Soft edge of the luminosity high-pass above the threshold.
pub const HIGH_PASS_SMOOTH_WIDTH: f32 = 0.01;

/// One-sided gaussian weights for a blur of `kernel_radius` taps, sigma = radius.
pub fn gaussian_coefficients(kernel_radius: usize) -> Vec<f32> {
    let sigma = kernel_radius as f32;
    (0..kernel_radius)
        .map(|i| {
            let x = i as f32;
            0.39894 * (-0.5 * x * x / (sigma * sigma)).exp() / sigma
        })
        .collect()
}

/// Per-level weights with larger `radius` shifting energy to the wide mips.
pub fn bloom_factors(radius: f32) -> [f32; MIP_LEVELS] {
    BLOOM_FACTORS.map(|f| f + (1.2 - f - f) * radius)
}

/// Sizes of the blur targets: half resolution first, halving per level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BloomChain {
    width: u32,
    height: u32,
    mips: [(u32, u32); MIP_LEVELS],
}

impl BloomChain {
    pub fn new(width: u32, height: u32) -> Self {
        let mut chain = Self {
            width: 0,
            height: 0,
            mips: [(1, 1); MIP_LEVELS],
        };
        chain.resize(width, height);
        chain
    }

    /// Returns false when the size did not change.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if (width, height) == (self.width, self.height) {
            return false;
        }
        self.width = width;
        self.height = height;
        let mut w = half(width);
        let mut h = half(height);
        for mip in self.mips.iter_mut() {
            *mip = (w, h);
            w = half(w);
            h = half(h);
        }
        true
    }

    /// Chain for a new size, or `None` when the size did not change.
    /// Leaves `self` untouched so callers can commit only once their
    /// targets exist.
    pub fn resized(&self, width: u32, height: u32) -> Option<Self> {
        let mut next = self.clone();
        next.resize(width, height).then_some(next)
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Size of the bright-pass target, equal to the first mip.
    pub fn bright_size(&self) -> (u32, u32) {
        self.mips[0]
    }

    pub fn mips(&self) -> &[(u32, u32); MIP_LEVELS] {
        &self.mips
    }
}

fn half(v: u32) -> u32 {
    ((v as f32 / 2.0).round() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coefficients_fall_off() {
        for radius in KERNEL_RADII {
            let c = gaussian_coefficients(radius);
            assert_eq!(c.len(), radius);
            assert!(c.windows(2).all(|w| w[0] > w[1]));
            assert!((c[0] - 0.39894 / radius as f32).abs() < 1e-6);
            // truncated kernels lose some tail weight
            let total = c[0] + 2.0 * c[1..].iter().sum::<f32>();
            assert!(total > 0.5 && total < 1.0, "radius {radius}: {total}");
        }
    }

    #[test]
    fn factors_lerp_with_radius() {
        assert_eq!(bloom_factors(0.0), BLOOM_FACTORS);
        let flipped = bloom_factors(1.0);
        for (f, base) in flipped.iter().zip(BLOOM_FACTORS) {
            assert!((f - (1.2 - base)).abs() < 1e-6);
        }
        let default = bloom_factors(0.4);
        assert!((default[0] - 0.68).abs() < 1e-6);
        assert!((default[4] - 0.52).abs() < 1e-6);
    }

    #[test]
    fn mips_halve_from_half_resolution() {
        let chain = BloomChain::new(1920, 1080);
        assert_eq!(chain.bright_size(), (960, 540));
        assert_eq!(
            chain.mips(),
            &[(960, 540), (480, 270), (240, 135), (120, 68), (60, 34)]
        );
    }

    #[test]
    fn tiny_viewports_never_reach_zero() {
        let chain = BloomChain::new(3, 1);
        assert!(chain.mips().iter().all(|&(w, h)| w >= 1 && h >= 1));
    }

    #[test]
    fn resize_reports_changes() {
        let mut chain = BloomChain::new(800, 600);
        assert!(!chain.resize(800, 600));
        assert!(chain.resize(1024, 768));
        assert_eq!(chain.size(), (1024, 768));
        assert_eq!(chain.mips()[0], (512, 384));
    }

    #[test]
    fn resized_leaves_the_current_chain_alone() {
        let chain = BloomChain::new(800, 600);
        assert!(chain.resized(800, 600).is_none());
        let next = chain.resized(640, 480).unwrap();
        assert_eq!(next, BloomChain::new(640, 480));
        assert_eq!(chain.size(), (800, 600));
        assert_eq!(chain.mips()[0], (400, 300));
        // a dropped candidate means the same resize is attempted again
        assert!(chain.resized(640, 480).is_some());
    }
}
