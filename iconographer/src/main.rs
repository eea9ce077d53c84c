//! `generate-icons`
//!
//! Regenerates the application icons in `static/` from `static/logo.svg`.
//! Run from the project root.

use std::{error::Error, path::PathBuf, process::ExitCode};

use iconographer::{generate_icons, AssetLayout, IconConfig};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let layout = AssetLayout::new(PathBuf::from("./"));
    log::debug!("Project root is {}", layout.root().display());
    match generate_icons(&layout, &IconConfig::default()) {
        Ok(generated) => {
            println!("Icon generation complete.");
            print!("{generated}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::debug!("{err:?}");
            eprintln!("Icon generation failed: {err}");
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
