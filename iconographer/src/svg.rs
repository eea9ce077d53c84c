//!`svg`
//!
//! Turns the source SVG into the bitmap that every raster icon is derived from.
use std::{path::Path, sync::Arc};

use image::{imageops::FilterType, RgbaImage};
use resvg::{tiny_skia, usvg};

use crate::IconError;

/// Parses an SVG file into a render tree.
///
/// # Arguments
/// * `path`: The path to the file, will be used to allow the SVG to link to files in the same
///   directory, for example it will be used if the SVG embeds an image via a link.
/// * `bytes`: The bytes of the file.
/// * `load_system_fonts`: Whether to make the installed fonts available to text elements.
///
/// # Returns
/// The parsed SVG if it was successfully parsed, otherwise an error.
///
/// # Errors
/// [`IconError::ErrorParsingSvg`] if a tree cannot be parsed from the provided `bytes`.
#[allow(clippy::module_name_repetitions)]
pub fn parse_svg(
    path: &Path,
    bytes: &[u8],
    load_system_fonts: bool,
) -> Result<usvg::Tree, IconError> {
    let mut options = usvg::Options {
        resources_dir: path.parent().map(Path::to_path_buf),
        dpi: 96.0,
        languages: vec!["en-GB".to_string()],
        ..usvg::Options::default()
    };

    if load_system_fonts {
        let fontdb = Arc::make_mut(&mut options.fontdb);
        fontdb.load_system_fonts();

        fontdb.set_serif_family("Times New Roman");
        fontdb.set_sans_serif_family("Arial");
        fontdb.set_cursive_family("Comic Sans MS");
        fontdb.set_fantasy_family("Impact");
        fontdb.set_monospace_family("Courier New");
    }

    usvg::Tree::from_data(bytes, &options).map_err(IconError::ErrorParsingSvg)
}

/// Renders an SVG tree into a square bitmap.
///
/// The drawing is stretched to fill the whole square, so a square source keeps its proportions.
/// `tiny_skia` works in premultiplied alpha, the returned image holds straight RGBA.
///
/// # Arguments
/// * `tree`: The SVG to render.
/// * `size`: Width and height of the bitmap, in pixels.
///
/// # Returns
/// The rendered bitmap.
///
/// # Errors
/// [`IconError::FailedToAllocatePixmap`] if a pixmap of `size` cannot be created, e.g. for a
/// zero size.
pub fn rasterize(tree: &usvg::Tree, size: u32) -> Result<RgbaImage, IconError> {
    let mut pixmap =
        tiny_skia::Pixmap::new(size, size).ok_or(IconError::FailedToAllocatePixmap { size })?;

    #[allow(clippy::cast_precision_loss)]
    let transform = tiny_skia::Transform::from_scale(
        size as f32 / tree.size().width(),
        size as f32 / tree.size().height(),
    );
    resvg::render(tree, transform, &mut pixmap.as_mut());

    let rgba = pixmap
        .pixels()
        .iter()
        .flat_map(|pixel| {
            let colour = pixel.demultiply();
            [colour.red(), colour.green(), colour.blue(), colour.alpha()]
        })
        .collect::<Vec<_>>();

    RgbaImage::from_raw(size, size, rgba).ok_or(IconError::FailedToAllocatePixmap { size })
}

/// Scales the high resolution bitmap down (or up) to a square icon size.
///
/// Asking for the bitmap's own size returns a copy without resampling.
pub fn resize(raster: &RgbaImage, size: u32, filter: FilterType) -> RgbaImage {
    if raster.width() == size && raster.height() == size {
        return raster.clone();
    }
    image::imageops::resize(raster, size, size, filter)
}
