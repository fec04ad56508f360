//! Integer pixel scaling.
//!
//! Small sprite assets look blurry when stretched by fractional factors, so
//! the presentation layer renders them at an integer multiple of their
//! natural size. The factor is the largest whole number that still fits the
//! container in both dimensions, clamped to a sane upper bound.

/// Default upper bound on the computed scale factor.
pub const DEFAULT_MAX_SCALE: u32 = 3;

/// A width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Create a dimension pair.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero (unknown or degenerate).
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Compute the integer zoom factor for an asset inside a container,
/// clamped to [`DEFAULT_MAX_SCALE`].
///
/// Returns 1 when `integer_scale` is false or any dimension is zero.
/// Recompute whenever the container size changes.
pub fn compute_scale(natural: Dimensions, container: Dimensions, integer_scale: bool) -> u32 {
    compute_scale_clamped(natural, container, integer_scale, DEFAULT_MAX_SCALE)
}

/// [`compute_scale`] with an explicit upper bound.
pub fn compute_scale_clamped(
    natural: Dimensions,
    container: Dimensions,
    integer_scale: bool,
    max_scale: u32,
) -> u32 {
    if !integer_scale || natural.is_degenerate() || container.is_degenerate() {
        return 1;
    }

    let fit_x = container.width / natural.width;
    let fit_y = container.height / natural.height;
    fit_x.min(fit_y).clamp(1, max_scale.max(1))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(w: u32, h: u32) -> Dimensions {
        Dimensions::new(w, h)
    }

    #[test]
    fn test_limiting_dimension_wins() {
        // 16x16 sprite in a 100x40 container: 6x fits horizontally but only
        // 2x vertically.
        assert_eq!(compute_scale(dims(16, 16), dims(100, 40), true), 2);
    }

    #[test]
    fn test_non_integer_scale_is_identity() {
        assert_eq!(compute_scale(dims(16, 16), dims(100, 40), false), 1);
        assert_eq!(compute_scale(dims(1, 1), dims(1000, 1000), false), 1);
    }

    #[test]
    fn test_zero_dimension_is_identity() {
        assert_eq!(compute_scale(dims(0, 16), dims(100, 40), true), 1);
        assert_eq!(compute_scale(dims(16, 0), dims(100, 40), true), 1);
        assert_eq!(compute_scale(dims(16, 16), dims(0, 40), true), 1);
        assert_eq!(compute_scale(dims(16, 16), dims(100, 0), true), 1);
    }

    #[test]
    fn test_clamped_to_default_maximum() {
        assert_eq!(compute_scale(dims(8, 8), dims(640, 640), true), 3);
    }

    #[test]
    fn test_floor_at_one_when_asset_larger_than_container() {
        assert_eq!(compute_scale(dims(128, 128), dims(64, 64), true), 1);
    }

    #[test]
    fn test_explicit_bound() {
        assert_eq!(compute_scale_clamped(dims(8, 8), dims(640, 640), true, 5), 5);
        assert_eq!(compute_scale_clamped(dims(8, 8), dims(640, 640), true, 0), 1);
    }

    #[test]
    fn test_exact_fit() {
        assert_eq!(compute_scale(dims(32, 32), dims(64, 64), true), 2);
        assert_eq!(compute_scale(dims(32, 32), dims(63, 64), true), 1);
    }
}
