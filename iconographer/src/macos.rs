//! `macos`
//!
//! Builds the macOS `.icns` container.

use icns::{IconFamily, IconType, Image, OSType, PixelFormat};
use image::{imageops::FilterType, RgbaImage};

use crate::{svg::resize, IconError};

/// An ICNS entry: the pixel size of the bitmap and the type code it is stored under.
pub type IcnsEntry = (u32, &'static str);

/// The entries of the macOS icon, in the order they are written.
pub const MACOS_ICON_ENTRIES: [IcnsEntry; 7] = [
    (16, "icp4"),
    (32, "icp5"),
    (64, "icp6"),
    (128, "ic07"),
    (256, "ic08"),
    (512, "ic09"),
    (1024, "ic10"),
];

/// Looks up the ICNS icon type for a four character type code.
///
/// # Errors
/// [`IconError::UnknownIcnsTypeCode`] if the code is not four bytes long or is not a type code
/// that holds an RGBA bitmap.
fn icon_type(type_code: &str) -> Result<IconType, IconError> {
    let ostype: [u8; 4] = type_code
        .as_bytes()
        .try_into()
        .map_err(|_| IconError::UnknownIcnsTypeCode(type_code.to_string()))?;
    IconType::from_ostype(OSType(ostype))
        .ok_or_else(|| IconError::UnknownIcnsTypeCode(type_code.to_string()))
}

/// Encodes an ICNS file from the high resolution bitmap.
///
/// # Arguments
/// * `raster`: The bitmap to scale from.
/// * `entries`: The sizes and type codes to store, appended to the file in this order.
/// * `filter`: Resampling filter used when scaling.
///
/// # Returns
/// The bytes of the ICNS file.
///
/// # Errors
/// [`IconError::UnknownIcnsTypeCode`] or [`IconError::IcnsSizeMismatch`] for an entry the format
/// cannot store, [`IconError::FailedToEncodeIcns`] if a bitmap cannot be encoded.
pub fn encode_macos_icon(
    raster: &RgbaImage,
    entries: &[IcnsEntry],
    filter: FilterType,
) -> Result<Vec<u8>, IconError> {
    let mut family = IconFamily::new();

    for &(size, type_code) in entries {
        let icon_type = icon_type(type_code)?;
        if icon_type.pixel_width() != size {
            return Err(IconError::IcnsSizeMismatch {
                code: type_code.to_string(),
                expected: icon_type.pixel_width(),
                actual: size,
            });
        }

        log::debug!("Adding {size}x{size} {type_code} entry to ICNS");
        let bitmap = resize(raster, size, filter);
        let image = Image::from_data(PixelFormat::RGBA, size, size, bitmap.into_raw())
            .map_err(IconError::FailedToEncodeIcns)?;
        family
            .add_icon_with_type(&image, icon_type)
            .map_err(IconError::FailedToEncodeIcns)?;
    }

    let mut bytes = vec![];
    family
        .write(&mut bytes)
        .map_err(IconError::FailedToEncodeIcns)?;

    Ok(bytes)
}
