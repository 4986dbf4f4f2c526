use anyhow::{Context, Result};
use image::imageops::FilterType;
use std::path::Path;

/// 表示面サイズにリサイズ済みの背景画像
#[derive(Debug, Clone)]
pub struct Background {
    pub pixels: Vec<u32>,
    pub width: usize,
    pub height: usize,
}

impl Background {
    /// 画像ファイルを読み込んで width x height にリサイズ
    pub fn load<P: AsRef<Path>>(path: P, width: u32, height: u32) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .with_context(|| format!("failed to load background {}", path.display()))?
            .to_rgb8();
        let resized = image::imageops::resize(&image, width, height, FilterType::Triangle);
        Ok(Self::from_rgb(resized.as_raw(), width as usize, height as usize))
    }

    /// RGB8バッファから作成
    pub fn from_rgb(rgb: &[u8], width: usize, height: usize) -> Self {
        let pixels = rgb
            .chunks_exact(3)
            .map(|c| ((c[0] as u32) << 16) | ((c[1] as u32) << 8) | c[2] as u32)
            .collect();
        Self {
            pixels,
            width,
            height,
        }
    }

    /// 単色 (背景画像無しの描画テスト用)
    pub fn solid(color: u32, width: usize, height: usize) -> Self {
        Self {
            pixels: vec![color; width * height],
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_error() {
        let err = Background::load("does/not/exist.png", 64, 36).unwrap_err();
        assert!(format!("{:#}", err).contains("does/not/exist.png"));
    }

    #[test]
    fn test_from_rgb_packs_pixels() {
        let bg = Background::from_rgb(&[0x12, 0x34, 0x56, 0xFF, 0x00, 0x00], 2, 1);
        assert_eq!(bg.pixels, vec![0x123456, 0xFF0000]);
    }

    #[test]
    fn test_load_and_resize() {
        let path = std::env::temp_dir().join(format!("gesture_hud_bg_{}.png", std::process::id()));
        let img = image::RgbImage::from_pixel(8, 4, image::Rgb([10, 20, 30]));
        img.save(&path).unwrap();

        let bg = Background::load(&path, 16, 8).unwrap();
        assert_eq!(bg.pixels.len(), 16 * 8);
        assert_eq!(bg.pixels[0], 0x0A141E);

        let _ = std::fs::remove_file(&path);
    }
}
