use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use std::path::Path;

use crate::models::{PostalCode, Zone};

pub const OVERLAY_ORIGIN: (i32, i32) = (10, 10);
pub const OVERLAY_SCALE: f32 = 24.0;
pub const OVERLAY_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

pub const NOT_FOUND: &str = "Not Found";
pub const NOT_APPLICABLE: &str = "N/A";

const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// The status line drawn on every frame
pub fn overlay_text(postcode: Option<&PostalCode>, zone: Option<Zone>) -> String {
    let code = postcode.map(PostalCode::as_str).unwrap_or(NOT_FOUND);
    let zone = zone.map(|z| z.label()).unwrap_or(NOT_APPLICABLE);
    format!("Postcode: {code} | Zone: {zone}")
}

pub fn load_font(path: &Path) -> anyhow::Result<FontVec> {
    let data = std::fs::read(path)?;
    FontVec::try_from_vec(data)
        .map_err(|_| anyhow::anyhow!("Failed to parse font file: {}", path.display()))
}

/// First font found in the usual system locations
pub fn find_system_font() -> Option<FontVec> {
    for path in SYSTEM_FONT_PATHS {
        if let Ok(font) = load_font(Path::new(path)) {
            log::info!("Loaded system font: {}", path);
            return Some(font);
        }
    }
    log::warn!("No system font found, overlay text will not be drawn");
    None
}

/// Copy of `frame` with `text` drawn at the fixed overlay position.
/// Without a font the copy is returned untouched.
pub fn render(frame: &RgbImage, text: &str, font: Option<&FontVec>, scale: f32) -> RgbImage {
    let mut annotated = frame.clone();
    if let Some(font) = font {
        let (x, y) = OVERLAY_ORIGIN;
        draw_text_mut(&mut annotated, OVERLAY_COLOR, x, y, PxScale::from(scale), font, text);
    }
    annotated
}
