//! Integration tests for the icon generation pipeline.

use std::{
    fs,
    io::{Cursor, Write},
    path::Path,
};

use iconographer::{
    encode_png, generate_icons,
    svg::{parse_svg, rasterize},
    AssetLayout, IconConfig, IconError, WindowsIconMode,
};

const LOGO: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
  <rect x="10" y="10" width="80" height="80" rx="12" fill="#3465a4"/>
  <circle cx="50" cy="50" r="25" fill="#fce94f" fill-opacity="0.75"/>
</svg>
"##;

fn project_with_logo(logo: impl AsRef<[u8]>) -> (tempfile::TempDir, AssetLayout) {
    let root = tempfile::tempdir().expect("failed to create temporary project root");
    let layout = AssetLayout::new(root.path());
    fs::create_dir_all(layout.output_directory()).expect("failed to create static directory");
    fs::write(layout.source(), logo).expect("failed to write logo");
    (root, layout)
}

fn config() -> IconConfig {
    IconConfig::default().with_system_fonts(false)
}

fn read(path: &Path) -> Vec<u8> {
    fs::read(path).unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()))
}

#[test]
fn generates_every_icon() {
    let (_root, layout) = project_with_logo(LOGO);

    let generated = generate_icons(&layout, &config()).expect("generation should succeed");
    assert_eq!(
        generated.files,
        vec![
            layout.linux_icon(),
            layout.windows_icon(),
            layout.macos_icon(),
            layout.favicon(),
        ]
    );

    // Linux: the full size render, unscaled.
    let tree = parse_svg(&layout.source(), LOGO.as_bytes(), false).unwrap();
    let direct = encode_png(&rasterize(&tree, 1024).unwrap()).unwrap();
    assert!(
        read(&layout.linux_icon()) == direct,
        "Linux icon is the direct 1024x1024 render"
    );

    // Windows: every frame, largest decodes by default.
    let ico = read(&layout.windows_icon());
    let decoded = image::load_from_memory_with_format(&ico, image::ImageFormat::Ico).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (256, 256));
    let frames = ico::IconDir::read(Cursor::new(&ico))
        .unwrap()
        .entries()
        .iter()
        .map(ico::IconDirEntry::width)
        .collect::<Vec<_>>();
    assert_eq!(frames, vec![16, 24, 32, 48, 64, 128, 256]);

    // macOS: seven entries in a fixed order.
    let family = icns::IconFamily::read(Cursor::new(read(&layout.macos_icon()))).unwrap();
    let codes = family
        .elements
        .iter()
        .map(|element| element.ostype.0)
        .collect::<Vec<_>>();
    assert_eq!(
        codes,
        vec![*b"icp4", *b"icp5", *b"icp6", *b"ic07", *b"ic08", *b"ic09", *b"ic10"]
    );
    let largest = family
        .get_icon_with_type(icns::IconType::RGBA32_512x512_2x)
        .unwrap();
    assert_eq!((largest.width(), largest.height()), (1024, 1024));

    // Web: the source with a fixed size.
    let favicon = String::from_utf8(read(&layout.favicon())).unwrap();
    let document = roxmltree::Document::parse(&favicon).unwrap();
    let root = document.root_element();
    assert_eq!(root.attribute("width"), Some("32"));
    assert_eq!(root.attribute("height"), Some("32"));
    assert_eq!(
        favicon.replacen(r#" width="32" height="32""#, "", 1),
        LOGO,
        "nothing else in the favicon changes"
    );
}

#[test]
fn regenerating_gives_identical_files() {
    let (_root, layout) = project_with_logo(LOGO);

    let first = generate_icons(&layout, &config()).unwrap();
    let first_contents = first.files.iter().map(|file| read(file)).collect::<Vec<_>>();

    let second = generate_icons(&layout, &config()).unwrap();
    let second_contents = second.files.iter().map(|file| read(file)).collect::<Vec<_>>();

    assert_eq!(first.files, second.files);
    assert!(first_contents == second_contents, "outputs are deterministic");
}

#[test]
fn missing_source_writes_nothing() {
    let root = tempfile::tempdir().unwrap();
    let layout = AssetLayout::new(root.path());

    assert_eq!(layout.root(), root.path());

    let result = generate_icons(&layout, &config());

    assert!(
        matches!(result, Err(IconError::SourceMissing(ref path)) if *path == layout.source()),
        "a missing logo is reported, got {result:?}"
    );
    assert!(
        !layout.output_directory().exists(),
        "the output directory is not created"
    );
}

#[test]
fn broken_source_leaves_existing_icons_alone() {
    let (_root, layout) = project_with_logo("<svg this is not");
    fs::write(layout.linux_icon(), b"previous icon").unwrap();

    let result = generate_icons(&layout, &config());

    assert!(
        matches!(result, Err(IconError::ErrorParsingSvg(_))),
        "a broken logo is a parse error, got {result:?}"
    );
    assert_eq!(read(&layout.linux_icon()), b"previous icon");
    assert!(!layout.windows_icon().exists(), "no Windows icon is written");
    assert!(!layout.favicon().exists(), "no favicon is written");
}

#[test]
fn gzipped_source_leaves_existing_icons_alone() {
    let mut encoder = flate2::write::GzEncoder::new(vec![], flate2::Compression::default());
    encoder.write_all(LOGO.as_bytes()).unwrap();
    let (_root, layout) = project_with_logo(encoder.finish().unwrap());
    fs::write(layout.linux_icon(), b"previous icon").unwrap();

    let result = generate_icons(&layout, &config());

    assert!(
        matches!(result, Err(IconError::InvalidFaviconDocument(_))),
        "a gzipped logo renders but cannot become a favicon, got {result:?}"
    );
    assert_eq!(read(&layout.linux_icon()), b"previous icon");
    assert!(!layout.windows_icon().exists(), "no Windows icon is written");
    assert!(!layout.macos_icon().exists(), "no macOS icon is written");
    assert!(!layout.favicon().exists(), "no favicon is written");
}

#[test]
fn single_frame_windows_icon() {
    let (_root, layout) = project_with_logo(LOGO);

    generate_icons(
        &layout,
        &config().with_windows_icon_mode(WindowsIconMode::SingleFrame),
    )
    .unwrap();

    let ico = read(&layout.windows_icon());
    let icon_dir = ico::IconDir::read(Cursor::new(&ico)).unwrap();
    assert_eq!(icon_dir.entries().len(), 1);
    let decoded = image::load_from_memory_with_format(&ico, image::ImageFormat::Ico).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (256, 256));
}

#[test]
fn favicon_replaces_declared_size() {
    let logo = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100" viewBox="0 0 100 100"><rect width="100" height="100" fill="#000"/></svg>"##;
    let (_root, layout) = project_with_logo(logo);

    generate_icons(&layout, &config().with_favicon_size(48, 48)).unwrap();

    let favicon = String::from_utf8(read(&layout.favicon())).unwrap();
    insta::assert_snapshot!(favicon, @r##"<svg xmlns="http://www.w3.org/2000/svg" width="48" height="48" viewBox="0 0 100 100"><rect width="100" height="100" fill="#000"/></svg>"##);
}
