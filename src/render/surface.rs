use anyhow::Result;

use crate::render::Canvas;

/// 描画先。HUDはCanvasに描き、tickの最後にpresentする
pub trait Surface {
    /// falseになったら表示ループは停止を要求して抜ける
    fn is_open(&self) -> bool;

    fn present(&mut self, canvas: &Canvas) -> Result<()>;
}

/// ウィンドウを持たない描画先。指定フレーム数をpresentしたら閉じる
pub struct HeadlessSurface {
    max_frames: u64,
    presented: u64,
}

impl HeadlessSurface {
    pub fn new(max_frames: u64) -> Self {
        Self {
            max_frames,
            presented: 0,
        }
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl Surface for HeadlessSurface {
    fn is_open(&self) -> bool {
        self.presented < self.max_frames
    }

    fn present(&mut self, _canvas: &Canvas) -> Result<()> {
        self.presented += 1;
        Ok(())
    }
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn present(&mut self, canvas: &Canvas) -> Result<()> {
        (**self).present(canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_closes_after_max_frames() {
        let mut surface = HeadlessSurface::new(2);
        let canvas = Canvas::new(2, 2);
        assert!(surface.is_open());
        surface.present(&canvas).unwrap();
        assert!(surface.is_open());
        surface.present(&canvas).unwrap();
        assert!(!surface.is_open());
        assert_eq!(surface.presented(), 2);
    }

    fn present_once<S: Surface>(mut surface: S, canvas: &Canvas) -> bool {
        surface.present(canvas).unwrap();
        surface.is_open()
    }

    #[test]
    fn test_present_through_mut_ref() {
        let mut surface = HeadlessSurface::new(1);
        let canvas = Canvas::new(2, 1);
        assert!(!present_once(&mut surface, &canvas));
        assert_eq!(surface.presented(), 1);
    }
}
