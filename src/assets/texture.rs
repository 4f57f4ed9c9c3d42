//! RGBA8 texture decoding.

use std::path::Path;

use crate::error::AssetError;

/// Decoded texture pixels, rows top to bottom
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureData {
    /// 1x1 texture of a single color (stand-in until the real one loads)
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: rgba.to_vec(),
        }
    }

    /// Bytes per row, unpadded
    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }
}

/// Decode an image file into RGBA8
pub fn load_texture(path: impl AsRef<Path>) -> Result<TextureData, AssetError> {
    let path = path.as_ref();
    let image = image::open(path)?.to_rgba8();
    let (width, height) = image.dimensions();

    log::info!("Texture {}: {}x{}", path.display(), width, height);

    Ok(TextureData {
        width,
        height,
        rgba: image.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_texture() {
        let texture = TextureData::solid([255, 255, 255, 255]);
        assert_eq!((texture.width, texture.height), (1, 1));
        assert_eq!(texture.rgba.len(), 4);
        assert_eq!(texture.bytes_per_row(), 4);
    }

    #[test]
    fn test_load_round_trips_pixels() {
        let path =
            std::env::temp_dir().join(format!("galaxydrift-texture-{}.png", std::process::id()));
        let mut source = image::RgbaImage::new(2, 3);
        source.put_pixel(1, 2, image::Rgba([10, 20, 30, 40]));
        source.save(&path).unwrap();

        let texture = load_texture(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!((texture.width, texture.height), (2, 3));
        assert_eq!(texture.rgba.len(), 2 * 3 * 4);
        // Last pixel of the last row
        assert_eq!(&texture.rgba[20..24], &[10, 20, 30, 40]);
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(load_texture("does/not/exist.png").is_err());
    }
}
