//! Rendering helpers for resolved images.
//!
//! Pure functions the presentation layer calls once an image reference and
//! its natural size are known:
//!
//! - [`compute_scale`]: integer zoom factor for crisp pixel-art rendering
//! - [`classify`]: tag a resolved candidate as raster, pixel art, or unknown
//!
//! Neither function touches resolver state; both are safe to call on every
//! layout or resize observation.

mod classify;
mod scale;

pub use classify::{classify, ImageKind};
pub use scale::{compute_scale, compute_scale_clamped, Dimensions, DEFAULT_MAX_SCALE};
