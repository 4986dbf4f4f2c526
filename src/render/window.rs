use anyhow::Result;
use minifb::{Key, Window, WindowOptions};

use crate::render::{Canvas, Surface};

/// minifbを使用した描画先
pub struct MinifbSurface {
    window: Window,
}

impl MinifbSurface {
    /// ウィンドウを作成
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let window = Window::new(
            title,
            width,
            height,
            WindowOptions {
                resize: false,
                borderless: true,
                ..WindowOptions::default()
            },
        )?;

        Ok(Self { window })
    }
}

impl Surface for MinifbSurface {
    /// ウィンドウが開いていて、Esc / Q が押されていないか
    fn is_open(&self) -> bool {
        self.window.is_open()
            && !self.window.is_key_down(Key::Escape)
            && !self.window.is_key_down(Key::Q)
    }

    /// バッファをウィンドウに表示
    fn present(&mut self, canvas: &Canvas) -> Result<()> {
        self.window
            .update_with_buffer(canvas.buffer(), canvas.width(), canvas.height())?;
        Ok(())
    }
}
