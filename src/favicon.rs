// ABOUTME: Favicon generation module for the big-deck application
// ABOUTME: Rasterizes the deck logo SVG into PNG favicons and a Windows ICO file

use crate::errors::{DeckError, Result};
use crate::resources::ResourceFile;
use crate::utils;
use image::{ImageFormat, RgbaImage};
use log::info;
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};
use std::fs;
use std::path::{Path, PathBuf};

/// Built-in deck logo.
pub const LOGO_SVG: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<svg width="512" height="512" viewBox="0 0 512 512" fill="none" xmlns="http://www.w3.org/2000/svg">
  <rect width="512" height="512" rx="128" fill="#1a1a2e"/>
  <path d="M256 128C179.2 128 121.6 185.6 121.6 262.4C121.6 279.467 131.2 310.4 166.4 332.8C179.2 339.2 192 332.8 197.333 323.2C201.6 313.6 195.2 307.2 188.8 300.8C163.2 281.6 153.6 262.4 153.6 249.6C153.6 204.8 190.933 166.4 236.8 166.4C282.667 166.4 320 204.8 320 249.6C320 262.4 310.4 281.6 284.8 300.8C278.4 307.2 272 313.6 276.267 323.2C281.6 332.8 294.4 339.2 307.2 332.8C342.4 310.4 352 279.467 352 262.4C352 185.6 294.4 128 217.6 128H256Z" fill="#00b4d8"/>
  <path d="M236.8 345.6C236.8 358.4 247.467 368 260.267 368H268.8C281.6 368 292.267 358.4 292.267 345.6C292.267 332.8 281.6 323.2 268.8 323.2H260.267C247.467 323.2 236.8 332.8 236.8 345.6Z" fill="#00b4d8"/>
</svg>"##;

/// File name the source SVG is written to inside the output directory.
pub const LOGO_FILE_NAME: &str = "logo.svg";

/// A square PNG to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaviconTarget {
    pub name: String,
    pub size: u32,
}

impl FaviconTarget {
    pub fn new(name: &str, size: u32) -> Self {
        Self {
            name: name.to_string(),
            size,
        }
    }
}

/// The standard favicon set.
pub fn default_targets() -> Vec<FaviconTarget> {
    vec![
        FaviconTarget::new("favicon-16x16.png", 16),
        FaviconTarget::new("favicon-32x32.png", 32),
        FaviconTarget::new("apple-touch-icon.png", 180),
        FaviconTarget::new("logo-192x192.png", 192),
        FaviconTarget::new("logo-512x512.png", 512),
    ]
}

/// Configuration for favicon generation
#[derive(Debug, Clone)]
pub struct FaviconConfig {
    pub output_dir: PathBuf,
    pub ico_path: PathBuf,
    /// Logo to rasterize; the built-in logo when `None`.
    pub logo: Option<ResourceFile>,
    pub targets: Vec<FaviconTarget>,
    pub ico_size: u32,
}

impl Default for FaviconConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("assets/images"),
            ico_path: PathBuf::from("favicon.ico"),
            logo: None,
            targets: default_targets(),
            ico_size: 64,
        }
    }
}

/// Generate the favicon set. Returns every file written, the SVG first.
pub fn generate_favicons(config: &FaviconConfig) -> Result<Vec<PathBuf>> {
    info!("Generating favicons in {:?}", config.output_dir);

    utils::ensure_directory_exists(&config.output_dir)?;
    utils::validate_directory_writable(&config.output_dir)?;
    utils::ensure_parent_directory_exists(&config.ico_path)?;

    let svg = match &config.logo {
        Some(resource) => resource.bytes()?,
        None => LOGO_SVG.as_bytes().to_vec(),
    };

    let mut written = Vec::new();

    let svg_path = config.output_dir.join(LOGO_FILE_NAME);
    fs::write(&svg_path, &svg).map_err(DeckError::FileReadError)?;
    written.push(svg_path);

    let tree = parse_svg(&svg)?;

    for target in &config.targets {
        let path = config.output_dir.join(&target.name);
        rasterize(&tree, target.size)?.save_with_format(&path, ImageFormat::Png)?;
        info!("Generated {} ({}x{})", target.name, target.size, target.size);
        written.push(path);
    }

    write_ico(&tree, config.ico_size, &config.ico_path)?;
    written.push(config.ico_path.clone());

    info!("Favicon generation complete: {} files", written.len());
    Ok(written)
}

/// Parse SVG source into a render tree.
pub fn parse_svg(data: &[u8]) -> Result<Tree> {
    Tree::from_data(data, &Options::default()).map_err(|e| DeckError::SvgError(e.to_string()))
}

/// Render `tree` into a `size`×`size` image, scaled to fit and centered.
pub fn rasterize(tree: &Tree, size: u32) -> Result<RgbaImage> {
    let mut pixmap = Pixmap::new(size, size).ok_or_else(|| {
        DeckError::SvgError(format!("Cannot allocate a {}x{} pixmap", size, size))
    })?;

    let source = tree.size();
    let scale = size as f32 / source.width().max(source.height());
    let offset_x = (size as f32 - source.width() * scale) / 2.0;
    let offset_y = (size as f32 - source.height() * scale) / 2.0;
    let transform = Transform::from_row(scale, 0.0, 0.0, scale, offset_x, offset_y);
    resvg::render(tree, transform, &mut pixmap.as_mut());

    // tiny-skia stores premultiplied alpha; PNG wants straight alpha
    let mut image = RgbaImage::new(size, size);
    for (pixel, source) in image.pixels_mut().zip(pixmap.pixels()) {
        let color = source.demultiply();
        pixel.0 = [color.red(), color.green(), color.blue(), color.alpha()];
    }
    Ok(image)
}

/// Write a single-image ICO file.
fn write_ico(tree: &Tree, size: u32, path: &Path) -> Result<()> {
    rasterize(tree, size)?.save_with_format(path, ImageFormat::Ico)?;
    info!("Generated {:?} ({}x{})", path, size, size);
    Ok(())
}
