//! `iconographer`
//!
//! Turns a project's SVG logo into the application icons each platform expects: a PNG for
//! Linux, an ICO for Windows, an ICNS for macOS and a fixed size SVG favicon for the web.

pub mod favicon;
pub mod macos;
pub mod svg;
pub mod windows;

use std::{
    fmt::Display,
    io::{self, Cursor},
    path::{Path, PathBuf},
};

use image::{imageops::FilterType, ImageFormat, RgbaImage};
use macos::{encode_macos_icon, IcnsEntry, MACOS_ICON_ENTRIES};
use resvg::usvg;
use svg::{parse_svg, rasterize};
use windows::encode_windows_icon;

/// Width and height of the bitmap all raster icons are derived from, in pixels.
pub const RASTER_SIZE: u32 = 1024;

/// Default width and height written to the favicon.
pub const FAVICON_SIZE: (u32, u32) = (32, 32);

/// Sizes of the frames in the Windows icon, in pixels.
pub const WINDOWS_ICON_SIZES: [u32; 7] = [16, 24, 32, 48, 64, 128, 256];

/// Errors that can occur while generating the icons. Any of them ends the run.
#[derive(Debug, thiserror::Error)]
pub enum IconError {
    /// The source SVG does not exist.
    #[error("source image {} does not exist", .0.display())]
    SourceMissing(PathBuf),
    /// The source SVG exists but could not be read.
    #[error("failed to read source image {}", .0.display())]
    FailedToReadSource(PathBuf, #[source] io::Error),
    /// There was an error while parsing the SVG file.
    #[error("failed to parse SVG")]
    ErrorParsingSvg(#[source] usvg::Error),
    /// A bitmap of the requested size could not be created.
    #[error("failed to allocate a {size}x{size} pixmap")]
    FailedToAllocatePixmap {
        /// The requested width and height.
        size: u32,
    },
    /// The output directory could not be created.
    #[error("failed to create output directory {}", .0.display())]
    FailedToCreateOutputDirectory(PathBuf, #[source] io::Error),
    /// A bitmap could not be encoded as PNG.
    #[error("failed to encode PNG")]
    FailedToEncodePng(#[source] image::ImageError),
    /// The Windows icon could not be encoded.
    #[error("failed to encode ICO")]
    FailedToEncodeIco(#[source] io::Error),
    /// An ICO frame size outside of what the format can describe.
    #[error("ICO frames must be between 1 and 256 pixels, not {0}")]
    UnsupportedIcoSize(u32),
    /// The macOS icon could not be encoded.
    #[error("failed to encode ICNS")]
    FailedToEncodeIcns(#[source] io::Error),
    /// A type code that ICNS does not store RGBA bitmaps under.
    #[error("unknown ICNS type code {0:?}")]
    UnknownIcnsTypeCode(String),
    /// An ICNS entry whose size does not match its type code.
    #[error("ICNS type {code} holds {expected}px bitmaps, not {actual}px")]
    IcnsSizeMismatch {
        /// The type code of the entry.
        code: String,
        /// The size the type code requires.
        expected: u32,
        /// The size that was asked for.
        actual: u32,
    },
    /// The source SVG is not well formed enough to patch into a favicon.
    #[error("failed to parse SVG for favicon")]
    InvalidFaviconDocument(#[source] roxmltree::Error),
    /// An output file could not be written.
    #[error("failed to write {}", .0.display())]
    FailedToWriteOutput(PathBuf, #[source] io::Error),
}

/// Where the source image lives and where the icons are written, relative to a project root.
#[derive(Debug, Clone)]
pub struct AssetLayout {
    /// The project root.
    root: PathBuf,
}

impl AssetLayout {
    /// Name of the directory, under the root, holding the source and the icons.
    pub const STATIC_DIRECTORY: &'static str = "static";

    /// Creates a layout for a project root.
    ///
    /// # Arguments
    /// * `root`: The project root, all other paths are derived from it.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        AssetLayout { root: root.into() }
    }

    /// Gets the project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The directory the icons are written to, created when missing.
    pub fn output_directory(&self) -> PathBuf {
        self.root().join(Self::STATIC_DIRECTORY)
    }

    /// The source SVG, `static/logo.svg`.
    pub fn source(&self) -> PathBuf {
        self.output_directory().join("logo.svg")
    }

    /// The Linux icon, `static/icon.png`.
    pub fn linux_icon(&self) -> PathBuf {
        self.output_directory().join("icon.png")
    }

    /// The Windows icon, `static/icon.ico`.
    pub fn windows_icon(&self) -> PathBuf {
        self.output_directory().join("icon.ico")
    }

    /// The macOS icon, `static/icon.icns`.
    pub fn macos_icon(&self) -> PathBuf {
        self.output_directory().join("icon.icns")
    }

    /// The web favicon, `static/favicon.svg`.
    pub fn favicon(&self) -> PathBuf {
        self.output_directory().join("favicon.svg")
    }
}

/// How the Windows icon is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowsIconMode {
    /// Every size becomes its own frame, Windows picks the best one when drawing.
    #[default]
    MultiResolution,
    /// Only the largest size is written.
    SingleFrame,
}

/// Settings for a generation run.
///
/// The defaults produce the standard icon set, the setters exist mostly so that tests can run
/// quicker or check the alternative Windows layout.
#[derive(Debug, Clone)]
pub struct IconConfig {
    /// Size of the bitmap the raster icons are scaled from.
    pub raster_size: u32,
    /// Width and height written to the favicon.
    pub favicon_size: (u32, u32),
    /// Frame sizes of the Windows icon.
    pub windows_sizes: Vec<u32>,
    /// How the Windows icon frames are assembled.
    pub windows_icon_mode: WindowsIconMode,
    /// Sizes and type codes of the macOS icon entries, in file order.
    pub macos_entries: Vec<IcnsEntry>,
    /// Resampling filter used to scale the bitmap.
    pub resize_filter: FilterType,
    /// Whether text in the logo may use the fonts installed on the system.
    pub load_system_fonts: bool,
}

impl Default for IconConfig {
    fn default() -> Self {
        IconConfig {
            raster_size: RASTER_SIZE,
            favicon_size: FAVICON_SIZE,
            windows_sizes: WINDOWS_ICON_SIZES.to_vec(),
            windows_icon_mode: WindowsIconMode::default(),
            macos_entries: MACOS_ICON_ENTRIES.to_vec(),
            resize_filter: FilterType::Lanczos3,
            load_system_fonts: true,
        }
    }
}

impl IconConfig {
    /// Sets how the Windows icon is assembled.
    #[must_use]
    pub fn with_windows_icon_mode(mut self, mode: WindowsIconMode) -> Self {
        self.windows_icon_mode = mode;
        self
    }

    /// Sets whether system fonts are loaded before parsing the logo.
    #[must_use]
    pub fn with_system_fonts(mut self, load_system_fonts: bool) -> Self {
        self.load_system_fonts = load_system_fonts;
        self
    }

    /// Sets the favicon width and height.
    #[must_use]
    pub fn with_favicon_size(mut self, width: u32, height: u32) -> Self {
        self.favicon_size = (width, height);
        self
    }
}

/// The files written by a successful run, in the order they were written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedIcons {
    /// Paths of the written files.
    pub files: Vec<PathBuf>,
}

impl Display for GeneratedIcons {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Generated files:")?;
        for file in &self.files {
            writeln!(f, "  - {}", file.display())?;
        }
        Ok(())
    }
}

/// Encodes a bitmap as PNG.
///
/// # Errors
/// [`IconError::FailedToEncodePng`] if the encoder fails.
pub fn encode_png(raster: &RgbaImage) -> Result<Vec<u8>, IconError> {
    let mut bytes = Cursor::new(vec![]);
    raster
        .write_to(&mut bytes, ImageFormat::Png)
        .map_err(IconError::FailedToEncodePng)?;
    Ok(bytes.into_inner())
}

/// Writes a whole output file, replacing anything already there.
fn write_output(path: &Path, contents: &[u8]) -> Result<(), IconError> {
    std::fs::write(path, contents)
        .map_err(|err| IconError::FailedToWriteOutput(path.to_path_buf(), err))
}

/// Generates every icon for a project.
///
/// The source is read, rendered and patched into the favicon before anything is written, so a
/// missing or broken source leaves the output directory untouched. Outputs written before a later
/// failure are left in place.
///
/// # Arguments
/// * `layout`: Where to read the logo from and write the icons to.
/// * `config`: Sizes and encoding settings.
///
/// # Returns
/// The files that were written.
///
/// # Errors
/// The first [`IconError`] hit by any stage.
pub fn generate_icons(
    layout: &AssetLayout,
    config: &IconConfig,
) -> Result<GeneratedIcons, IconError> {
    let source_path = layout.source();
    if !source_path.is_file() {
        return Err(IconError::SourceMissing(source_path));
    }
    let source = std::fs::read(&source_path)
        .map_err(|err| IconError::FailedToReadSource(source_path.clone(), err))?;

    let size = config.raster_size;
    log::info!("Rendering {} at {size}x{size}", source_path.display());
    let tree = parse_svg(&source_path, &source, config.load_system_fonts)?;
    let raster = rasterize(&tree, size)?;

    // usvg also accepts gzipped SVG, which cannot be patched as text.
    let (width, height) = config.favicon_size;
    let favicon = favicon::set_root_size(&String::from_utf8_lossy(&source), width, height)
        .map_err(IconError::InvalidFaviconDocument)?;

    let output_directory = layout.output_directory();
    std::fs::create_dir_all(&output_directory)
        .map_err(|err| IconError::FailedToCreateOutputDirectory(output_directory.clone(), err))?;

    let mut files = vec![];

    let linux_icon = layout.linux_icon();
    log::info!("Writing Linux icon to {}", linux_icon.display());
    write_output(&linux_icon, &encode_png(&raster)?)?;
    files.push(linux_icon);

    let windows_icon = layout.windows_icon();
    log::info!(
        "Writing Windows icon ({:?}, sizes {:?}) to {}",
        config.windows_icon_mode,
        config.windows_sizes,
        windows_icon.display()
    );
    let ico = encode_windows_icon(
        &raster,
        &config.windows_sizes,
        config.windows_icon_mode,
        config.resize_filter,
    )?;
    write_output(&windows_icon, &ico)?;
    files.push(windows_icon);

    let macos_icon = layout.macos_icon();
    log::info!("Writing macOS icon to {}", macos_icon.display());
    let icns = encode_macos_icon(&raster, &config.macos_entries, config.resize_filter)?;
    write_output(&macos_icon, &icns)?;
    files.push(macos_icon);

    let favicon_path = layout.favicon();
    log::info!(
        "Writing {width}x{height} favicon to {}",
        favicon_path.display()
    );
    write_output(&favicon_path, favicon.as_bytes())?;
    files.push(favicon_path);

    Ok(GeneratedIcons { files })
}
