//! Image export: gamma-2 encoding, ASCII PPM and other formats via `image`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{RenderError, RenderResult};
use crate::Color;
use cbox_math::Interval;

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a normalized radiance to 8-bit RGB.
///
/// Each channel is `256 * sqrt(c)` clamped to [0, 255.999] and truncated.
pub fn to_rgb8(color: Color) -> [u8; 3] {
    let intensity = Interval::new(0.0, 255.999);
    let encode = |c: f64| intensity.clamp(256.0 * linear_to_gamma(c)) as u8;
    [encode(color.x), encode(color.y), encode(color.z)]
}

fn check_len(width: u32, height: u32, pixels: &[Color]) -> RenderResult<()> {
    let expected = width as usize * height as usize;
    if pixels.len() != expected {
        return Err(RenderError::SizeMismatch {
            expected,
            actual: pixels.len(),
        });
    }
    Ok(())
}

/// Write a normalized image as ASCII PPM (P3), top row first.
pub fn write_ppm<W: Write>(out: &mut W, width: u32, height: u32, pixels: &[Color]) -> RenderResult<()> {
    check_len(width, height, pixels)?;

    writeln!(out, "P3")?;
    writeln!(out, "{} {}", width, height)?;
    writeln!(out, "255")?;

    for color in pixels {
        let [r, g, b] = to_rgb8(*color);
        writeln!(out, "{} {} {}", r, g, b)?;
    }

    Ok(())
}

/// Save a normalized image, choosing the format from the file extension.
///
/// `.ppm` uses the ASCII writer; anything else goes through the `image`
/// crate as 8-bit RGB.
pub fn save_image(path: &Path, width: u32, height: u32, pixels: &[Color]) -> RenderResult<()> {
    check_len(width, height, pixels)?;

    let is_ppm = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));

    if is_ppm {
        let mut writer = BufWriter::new(File::create(path)?);
        write_ppm(&mut writer, width, height, pixels)?;
        writer.flush()?;
    } else {
        let bytes: Vec<u8> = pixels.iter().flat_map(|c| to_rgb8(*c)).collect();
        let image = image::RgbImage::from_raw(width, height, bytes).ok_or(RenderError::SizeMismatch {
            expected: width as usize * height as usize,
            actual: pixels.len(),
        })?;
        image.save(path)?;
    }

    log::info!("Saved {}x{} image to {}", width, height, path.display());
    Ok(())
}
