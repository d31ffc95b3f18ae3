use anyhow::{anyhow, Context, Result};
use resvg::tiny_skia::{Pixmap, Transform};
use std::path::Path;

/// RGBA8 pixels ready for upload to the drawing surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
    /// SVG rasterisation yields premultiplied alpha, raster formats do not.
    pub premultiplied: bool,
}

impl DecodedImage {
    pub fn size(&self) -> [usize; 2] {
        [self.width as usize, self.height as usize]
    }
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("svg"))
        .unwrap_or(false)
}

/// Decode a PNG/JPEG icon, or rasterise an SVG so its longer side is
/// `svg_target_px`.
pub fn decode_image_file(path: &Path, svg_target_px: u32) -> Result<DecodedImage> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let decoded = if is_svg(path) {
        rasterize_svg(&bytes, svg_target_px)
    } else {
        decode_raster(&bytes)
    };
    decoded.with_context(|| format!("decoding {}", path.display()))
}

pub fn decode_raster(bytes: &[u8]) -> Result<DecodedImage> {
    let image = image::load_from_memory(bytes)?.into_rgba8();
    let (width, height) = image.dimensions();
    Ok(DecodedImage {
        width,
        height,
        rgba: image.into_raw(),
        premultiplied: false,
    })
}

pub fn rasterize_svg(bytes: &[u8], target_px: u32) -> Result<DecodedImage> {
    let tree = usvg::Tree::from_data(bytes, &usvg::Options::default())?;
    let size = tree.size();
    let longest = size.width().max(size.height());
    let scale = if longest > 0.0 {
        target_px.max(1) as f32 / longest
    } else {
        1.0
    };
    let width = ((size.width() * scale).round() as u32).max(1);
    let height = ((size.height() * scale).round() as u32).max(1);
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| anyhow!("cannot allocate {width}x{height} pixmap"))?;
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());
    Ok(DecodedImage {
        width,
        height,
        rgba: pixmap.take(),
        premultiplied: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="8">
        <rect width="16" height="8" fill="#ff0000"/>
    </svg>"##;

    #[test]
    fn svg_is_scaled_to_target_keeping_aspect() {
        let image = rasterize_svg(SQUARE_SVG.as_bytes(), 64).unwrap();
        assert_eq!((image.width, image.height), (64, 32));
        assert_eq!(image.rgba.len(), 64 * 32 * 4);
        assert!(image.premultiplied);
        assert_eq!(&image.rgba[..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn png_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icon.png");
        let pixels = image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
        pixels.save(&path).unwrap();

        let image = decode_image_file(&path, 256).unwrap();
        assert_eq!(image.size(), [3, 2]);
        assert!(!image.premultiplied);
        assert_eq!(&image.rgba[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("SWAY.SVG");
        std::fs::write(&path, SQUARE_SVG).unwrap();
        let image = decode_image_file(&path, 16).unwrap();
        assert_eq!((image.width, image.height), (16, 8));
    }

    #[test]
    fn unreadable_icon_reports_path() {
        let err = decode_image_file(Path::new("/nonexistent/kodi.png"), 256).unwrap_err();
        assert!(format!("{err:#}").contains("kodi.png"));
    }
}
