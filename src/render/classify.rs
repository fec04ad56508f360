//! Image kind classification.
//!
//! The presentation layer needs to know whether a resolved candidate is a
//! pixel-art sprite (render with integer scaling and nearest-neighbor
//! filtering) or an ordinary raster image. Classification is explicit and
//! centralized here instead of ad hoc filename matching at render sites.

/// The rendering category of a resolved candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// Ordinary raster image; smooth scaling is fine
    Raster,

    /// Pixel-art sprite; render at an integer scale
    PixelArt,

    /// Extension missing or unrecognized
    Unknown,
}

impl ImageKind {
    /// Whether this kind should be rendered at an integer scale factor.
    pub fn requires_integer_scale(&self) -> bool {
        matches!(self, ImageKind::PixelArt)
    }
}

/// Classify a resolved candidate string by its file extension.
///
/// Query strings and fragments are ignored. Crawled sprite sheets in this
/// database are GIFs; everything photographic comes in as JPEG/PNG/WebP.
pub fn classify(url: &str) -> ImageKind {
    let path = url.split(['?', '#']).next().unwrap_or(url);

    let extension = match path.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.contains('/') => ext.to_ascii_lowercase(),
        _ => return ImageKind::Unknown,
    };

    match extension.as_str() {
        "gif" => ImageKind::PixelArt,
        "png" | "jpg" | "jpeg" | "webp" | "bmp" => ImageKind::Raster,
        _ => ImageKind::Unknown,
    }
}

// =============================================================================
// Tests
// =============================================================================
