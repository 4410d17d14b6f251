//! Framebuffer capture to PNG.

use std::path::Path;

use log::info;

use crate::error::CaptureError;
use crate::gpu::Backend;

/// Reverses the row order of a tightly packed image in place.
pub fn flip_rows(pixels: &mut [u8], width: usize, height: usize, channels: usize) {
    let stride = width.saturating_mul(channels);
    if stride == 0 {
        return;
    }
    for y in 0..(height / 2) {
        let top = y * stride;
        let bottom = (height - 1 - y) * stride;
        let (upper, lower) = pixels.split_at_mut(bottom);
        upper[top..top + stride].swap_with_slice(&mut lower[..stride]);
    }
}

/// Writes top-row-first RGB bytes as a PNG.
pub fn save_png(path: &Path, width: u32, height: u32, rgb: Vec<u8>) -> Result<(), CaptureError> {
    let len = rgb.len();
    let image = image::RgbImage::from_raw(width, height, rgb).ok_or(
        CaptureError::InvalidFramebuffer { width, height, len },
    )?;
    image.save(path).map_err(|source| CaptureError::Image {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads the back buffer and saves it to `path`.
pub fn capture_framebuffer<B: Backend>(
    backend: &B,
    width: u32,
    height: u32,
    path: &Path,
) -> Result<(), CaptureError> {
    if width == 0 || height == 0 {
        return Err(CaptureError::InvalidFramebuffer { width, height, len: 0 });
    }
    let mut pixels = backend.read_pixels_rgb(width, height);
    // GL rows start at the bottom of the image.
    flip_rows(&mut pixels, width as usize, height as usize, 3);
    save_png(path, width, height, pixels)?;
    info!("wrote {width}x{height} frame to {}", path.display());
    Ok(())
}
