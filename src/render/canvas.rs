use crate::render::font;

/// ソフトウェア描画バッファ (0xRRGGBB)
#[derive(Debug, Clone)]
pub struct Canvas {
    buffer: Vec<u32>,
    width: usize,
    height: usize,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            buffer: vec![0u32; width * height],
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn buffer(&self) -> &[u32] {
        &self.buffer
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.buffer[y * self.width + x])
        } else {
            None
        }
    }

    /// 同サイズの背景をコピー。サイズが異なる場合は重なる範囲のみ
    pub fn blit(&mut self, pixels: &[u32], width: usize, height: usize) {
        for y in 0..self.height.min(height) {
            let src = &pixels[y * width..y * width + self.width.min(width)];
            let dst_start = y * self.width;
            self.buffer[dst_start..dst_start + src.len()].copy_from_slice(src);
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32) {
        self.blend_rect(x, y, w, h, color, 1.0);
    }

    /// 半透明の矩形
    pub fn blend_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32, alpha: f32) {
        for py in y..y + h {
            for px in x..x + w {
                self.blend_pixel(px, py, color, alpha);
            }
        }
    }

    /// 半透明の線分 (DDA)。端点を含む
    pub fn blend_line(&mut self, from: (i32, i32), to: (i32, i32), color: u32, alpha: f32) {
        let dx = to.0 as i64 - from.0 as i64;
        let dy = to.1 as i64 - from.1 as i64;
        let steps = dx.abs().max(dy.abs());
        if steps == 0 {
            self.blend_pixel(from.0, from.1, color, alpha);
            return;
        }
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let x = from.0 as f64 + dx as f64 * t;
            let y = from.1 as f64 + dy as f64 * t;
            self.blend_pixel(x.round() as i32, y.round() as i32, color, alpha);
        }
    }

    /// 円を描画（塗りつぶし）
    pub fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: u32) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.set_pixel(cx.saturating_add(dx), cy.saturating_add(dy), color);
                }
            }
        }
    }

    /// 円環 (外半径 radius, 太さ thickness)
    pub fn draw_ring(&mut self, cx: i32, cy: i32, radius: i32, thickness: i32, color: u32) {
        self.draw_arc(cx, cy, radius, thickness, 1.0, color);
    }

    /// 12時方向から時計回りに fraction (0.0〜1.0) だけの円弧
    pub fn draw_arc(
        &mut self,
        cx: i32,
        cy: i32,
        radius: i32,
        thickness: i32,
        fraction: f32,
        color: u32,
    ) {
        let inner = (radius - thickness).max(0);
        let limit = fraction.clamp(0.0, 1.0) * std::f32::consts::TAU;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let d2 = dx * dx + dy * dy;
                if d2 > radius * radius || d2 < inner * inner {
                    continue;
                }
                // 画面座標はyが下向きなので atan2(dx, -dy) で12時起点・時計回り
                let mut angle = (dx as f32).atan2(-(dy as f32));
                if angle < 0.0 {
                    angle += std::f32::consts::TAU;
                }
                if angle <= limit {
                    self.set_pixel(cx.saturating_add(dx), cy.saturating_add(dy), color);
                }
            }
        }
    }

    /// 再生マーク (右向き三角形)
    pub fn draw_play_glyph(&mut self, x: i32, y: i32, size: i32, color: u32) {
        let half = size / 2;
        for dy in 0..size {
            let span = half - (dy - half).abs();
            self.blend_line((x, y + dy), (x + span, y + dy), color, 1.0);
        }
    }

    /// 一時停止マーク (縦棒2本)
    pub fn draw_pause_glyph(&mut self, x: i32, y: i32, size: i32, color: u32) {
        let bar = (size / 3).max(1);
        self.fill_rect(x, y, bar, size, color);
        self.fill_rect(x + size - bar, y, bar, size, color);
    }

    /// ビットマップフォントで文字列を描画
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, scale: i32, color: u32, alpha: f32) {
        let mut cx = x;
        for c in text.chars() {
            let rows = font::glyph(c);
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..font::GLYPH_WIDTH {
                    if (bits >> (font::GLYPH_WIDTH - 1 - col)) & 1 == 1 {
                        let px = cx + col as i32 * scale;
                        let py = y + row as i32 * scale;
                        self.blend_rect(px, py, scale, scale, color, alpha);
                    }
                }
            }
            cx += font::advance(scale);
        }
    }

    /// ピクセルをセット（境界チェック付き）
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.buffer[y as usize * self.width + x as usize] = color;
        }
    }

    fn blend_pixel(&mut self, x: i32, y: i32, color: u32, alpha: f32) {
        if x < 0 || x >= self.width as i32 || y < 0 || y >= self.height as i32 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.buffer[idx] = blend(self.buffer[idx], color, alpha);
    }
}

/// dst と src を alpha で合成
pub fn blend(dst: u32, src: u32, alpha: f32) -> u32 {
    let a = alpha.clamp(0.0, 1.0);
    if a >= 1.0 {
        return src;
    }
    let mix = |shift: u32| {
        let d = ((dst >> shift) & 0xFF) as f32;
        let s = ((src >> shift) & 0xFF) as f32;
        ((d + (s - d) * a).round() as u32) << shift
    };
    mix(16) | mix(8) | mix(0)
}
