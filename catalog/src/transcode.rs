//! Raster image transcoding.
//!
//! Every uploaded photo is re-encoded to lossy WebP, scaled down (never
//! up) to a role-specific maximum width with aspect ratio preserved. The
//! transcoder is pure: bytes in, bytes out, no disk or network access.

use bytes::Bytes;
use image::imageops::FilterType;

use crate::error::{Error, Result};

/// Content type of every transcoded image.
pub const WEBP_CONTENT_TYPE: &str = "image/webp";

/// Quality and size cap for one image role.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TranscodeParams {
    /// Lossy encoding quality in `(0, 1]`.
    pub quality: f32,

    /// Maximum output width in pixels.
    pub max_width: u32,
}

/// A re-encoded image ready for storage.
#[derive(Debug, Clone)]
pub struct TranscodedImage {
    /// Source base name with the extension replaced by `.webp`.
    pub file_name: String,
    pub content: Bytes,
    pub width: u32,
    pub height: u32,
}

/// Re-encode `content` according to `params`.
///
/// The scale factor is `min(1, max_width / source_width)`; output
/// dimensions are the rounded scaled source dimensions, so a source
/// already narrower than the cap passes through unscaled. Output bytes
/// are deterministic in dimensions but not byte-for-byte (lossy encoder).
pub fn transcode(content: &[u8], source_name: &str, params: &TranscodeParams) -> Result<TranscodedImage> {
    if !(params.quality > 0.0 && params.quality <= 1.0) {
        return Err(Error::Validation(format!(
            "quality {} is outside (0, 1]",
            params.quality
        )));
    }
    if params.max_width == 0 {
        return Err(Error::Validation("max width must be positive".to_string()));
    }

    let source = image::load_from_memory(content)
        .map_err(|e| Error::Transcode(format!("failed to decode {}: {}", source_name, e)))?;

    let (src_w, src_h) = (source.width(), source.height());
    let scale = f64::min(1.0, f64::from(params.max_width) / f64::from(src_w));
    let out_w = (f64::from(src_w) * scale).round() as u32;
    let out_h = (f64::from(src_h) * scale).round() as u32;

    let scaled = if scale < 1.0 {
        source.resize_exact(out_w, out_h, FilterType::Lanczos3)
    } else {
        source
    };

    let rgba = scaled.to_rgba8();
    let encoded = webp::Encoder::from_rgba(rgba.as_raw(), out_w, out_h)
        .encode(params.quality * 100.0);

    Ok(TranscodedImage {
        file_name: webp_name(source_name),
        content: Bytes::copy_from_slice(&encoded),
        width: out_w,
        height: out_h,
    })
}

/// Replace the extension of `name` with `.webp`, keeping the base name.
fn webp_name(name: &str) -> String {
    match name.rfind('.') {
        Some(dot) if dot > 0 => format!("{}.webp", &name[..dot]),
        _ => format!("{}.webp", name),
    }
}
