use std::time::Instant;

use crate::hud::{ControlAction, HudController};
use crate::render::background::Background;
use crate::render::{font, Canvas};

pub const HUD_GREEN: u32 = 0x00FF00;
pub const PANEL_COLOR: u32 = 0x141414;
pub const CURSOR_COLOR: u32 = 0x00FFFF;
pub const CONTROL_COLOR: u32 = 0x3C3C3C;
pub const PROGRESS_COLOR: u32 = 0x00C8FF;
pub const LABEL_COLOR: u32 = 0xFFFFFF;

const TEXT_SCALE: i32 = 4;
const NOTIFICATION_SCALE: i32 = 8;
const CURSOR_RADIUS: i32 = 10;

/// HUDの1フレームを描画する
pub struct HudView {
    background: Background,
}

impl HudView {
    pub fn new(background: Background) -> Self {
        Self { background }
    }

    /// 描画面のサイズ (背景画像のサイズ)
    pub fn size(&self) -> (usize, usize) {
        (self.background.width, self.background.height)
    }

    pub fn draw(&self, canvas: &mut Canvas, hud: &HudController, now: Instant) {
        canvas.blit(&self.background.pixels, self.background.width, self.background.height);
        self.draw_music_panel(canvas, hud);
        self.draw_speed(canvas, hud);
        self.draw_controls(canvas, hud, now);
        self.draw_notification(canvas, hud, now);
        if let Some((x, y)) = hud.cursor() {
            canvas.draw_circle(x, y, CURSOR_RADIUS, CURSOR_COLOR);
        }
    }

    fn draw_music_panel(&self, canvas: &mut Canvas, hud: &HudController) {
        let state = hud.state();
        let top = canvas.height() as i32 - 150;
        canvas.blend_rect(50, top, 500, 80, PANEL_COLOR, 0.85);

        let glyph_size = 5 * TEXT_SCALE;
        let glyph_y = top + 40 - glyph_size / 2;
        if state.is_playing() {
            canvas.draw_play_glyph(62, glyph_y, glyph_size, HUD_GREEN);
        } else {
            canvas.draw_pause_glyph(62, glyph_y, glyph_size, HUD_GREEN);
        }
        let title_x = 62 + glyph_size + 14;
        canvas.draw_text(title_x, glyph_y, state.current_song(), TEXT_SCALE, HUD_GREEN, 1.0);
    }

    fn draw_speed(&self, canvas: &mut Canvas, hud: &HudController) {
        let mode = hud.state().drive_mode();
        canvas.blend_rect(50, 50, 260, 120, PANEL_COLOR, 0.85);
        canvas.draw_text(66, 66, &mode.speed_kmh.to_string(), 10, HUD_GREEN, 1.0);
        canvas.draw_text(66 + font::measure("000", 10), 96, "KM/H", 4, HUD_GREEN, 1.0);
        canvas.blend_line((66, 128), (294, 128), HUD_GREEN, 0.5);
        canvas.draw_text(66, 130 + 10, mode.name, 4, LABEL_COLOR, 1.0);
    }

    fn draw_controls(&self, canvas: &mut Canvas, hud: &HudController, now: Instant) {
        for control in hud.controls() {
            let (cx, cy) = control.center;
            canvas.draw_ring(cx, cy, control.radius, 6, CONTROL_COLOR);
            if let Some(progress) = control.timer().progress(now) {
                canvas.draw_arc(cx, cy, control.radius, 6, progress, PROGRESS_COLOR);
            }
            let label = match control.action {
                ControlAction::CycleDriveMode => "MODE",
                ControlAction::TogglePlay => {
                    if hud.state().is_playing() {
                        "PAUSE"
                    } else {
                        "PLAY"
                    }
                }
            };
            let w = font::measure(label, 3);
            canvas.draw_text(cx - w / 2, cy - 7, label, 3, LABEL_COLOR, 1.0);
        }
    }

    fn draw_notification(&self, canvas: &mut Canvas, hud: &HudController, now: Instant) {
        let Some(notification) = hud.state().notification() else {
            return;
        };
        let Some(alpha) = notification.alpha(now) else {
            return;
        };
        let w = font::measure(&notification.label, NOTIFICATION_SCALE);
        let x = (canvas.width() as i32 - w) / 2;
        canvas.draw_text(x, 60, &notification.label, NOTIFICATION_SCALE, HUD_GREEN, alpha);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::CommandEvent;
    use crate::hud::HudState;
    use std::time::Duration;

    const W: usize = 640;
    const H: usize = 360;

    fn setup() -> (HudController, HudView, Canvas) {
        let songs = vec!["Blinding Lights".to_string()];
        let hud = HudController::new(HudState::new(songs).unwrap(), W as u32, H as u32);
        let view = HudView::new(Background::solid(0x000080, W, H));
        (hud, view, Canvas::new(W, H))
    }

    #[test]
    fn test_background_drawn() {
        let (hud, view, mut canvas) = setup();
        view.draw(&mut canvas, &hud, Instant::now());
        assert_eq!(canvas.pixel(W - 1, 0), Some(0x000080));
    }

    #[test]
    fn test_cursor_drawn_only_when_active() {
        let (mut hud, view, mut canvas) = setup();
        let t0 = Instant::now();
        for i in 0..30 {
            let now = t0 + Duration::from_millis(i * 33);
            hud.tick([CommandEvent::Pointer { x: 400, y: 200 }], now);
        }
        let (cx, cy) = hud.cursor().unwrap();
        view.draw(&mut canvas, &hud, t0);
        assert_eq!(canvas.pixel(cx as usize, cy as usize), Some(CURSOR_COLOR));

        hud.tick([], t0 + Duration::from_millis(1100));
        view.draw(&mut canvas, &hud, t0 + Duration::from_millis(1100));
        assert_ne!(canvas.pixel(cx as usize, cy as usize), Some(CURSOR_COLOR));
    }

    #[test]
    fn test_notification_faded_in_midway() {
        let (mut hud, view, mut canvas) = setup();
        let t0 = Instant::now();
        hud.tick([CommandEvent::Count(5)], t0);
        view.draw(&mut canvas, &hud, t0 + Duration::from_millis(500));
        let label = &hud.state().notification().unwrap().label;
        let w = font::measure(label, NOTIFICATION_SCALE);
        let x = (W as i32 - w) / 2;
        // 'U' の左上ピクセルは完全不透明
        assert_eq!(canvas.pixel(x as usize, 60), Some(HUD_GREEN));
    }
}
