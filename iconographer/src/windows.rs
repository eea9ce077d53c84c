//! `windows`
//!
//! Builds the Windows `.ico` container.

use ico::{IconDir, IconDirEntry, IconImage, ResourceType};
use image::{imageops::FilterType, RgbaImage};

use crate::{svg::resize, IconError, WindowsIconMode};

/// The largest width or height an ICO directory entry can describe.
pub const MAX_ICO_SIZE: u32 = 256;

/// Encodes an ICO file from the high resolution bitmap.
///
/// # Arguments
/// * `raster`: The bitmap to scale from.
/// * `sizes`: Frame sizes, written in the given order.
/// * `mode`: Whether to keep every frame or only the largest one.
/// * `filter`: Resampling filter used when scaling.
///
/// # Returns
/// The bytes of the ICO file.
///
/// # Errors
/// [`IconError::UnsupportedIcoSize`] if a size is zero or over [`MAX_ICO_SIZE`], otherwise
/// [`IconError::FailedToEncodeIco`] if a frame cannot be encoded.
pub fn encode_windows_icon(
    raster: &RgbaImage,
    sizes: &[u32],
    mode: WindowsIconMode,
    filter: FilterType,
) -> Result<Vec<u8>, IconError> {
    if let Some(&size) = sizes
        .iter()
        .find(|&&size| size == 0 || size > MAX_ICO_SIZE)
    {
        return Err(IconError::UnsupportedIcoSize(size));
    }

    let frame_sizes = match mode {
        WindowsIconMode::MultiResolution => sizes.to_vec(),
        WindowsIconMode::SingleFrame => sizes.iter().max().copied().into_iter().collect(),
    };

    let mut icon_dir = IconDir::new(ResourceType::Icon);
    for size in frame_sizes {
        log::debug!("Adding {size}x{size} frame to ICO");
        let frame = resize(raster, size, filter);
        let image = IconImage::from_rgba_data(size, size, frame.into_raw());
        let entry = IconDirEntry::encode(&image).map_err(IconError::FailedToEncodeIco)?;
        icon_dir.add_entry(entry);
    }

    let mut bytes = vec![];
    icon_dir
        .write(&mut bytes)
        .map_err(IconError::FailedToEncodeIco)?;

    Ok(bytes)
}
