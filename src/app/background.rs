use std::path::Path;

use eframe::egui::ColorImage;

/// Decode the background image from disk. A missing or unreadable file is
/// not fatal; the map falls back to a flat grid and stays fully usable.
pub(super) fn load(path: &Path) -> Option<ColorImage> {
    match image::open(path) {
        Ok(decoded) => {
            let rgba = decoded.into_rgba8();
            let size = [rgba.width() as usize, rgba.height() as usize];
            log::info!(
                "loaded background image {} ({}x{})",
                path.display(),
                size[0],
                size[1]
            );
            Some(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
        }
        Err(error) => {
            log::warn!(
                "could not load background image {}: {error}",
                path.display()
            );
            None
        }
    }
}
